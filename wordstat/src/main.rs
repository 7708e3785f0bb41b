//! Counts word frequencies of text files using a slotdex table.
use std::{io::Read, path::PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{bail, WrapErr};
use slotdex::{fnv1a, BytesEq, KeyEq, Slot, SlotIndex, SlotTable, TableConfig};

mod count;
mod tokenize;

use count::WordCounts;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HashChoice {
    /// 32-bit FNV-1a
    Fnv1a,
    /// Position of the first letter in the alphabet, for demonstrating collisions
    FirstLetter,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input files, standard input is read when none are given
    files: Vec<PathBuf>,
    /// Number of slots in the table
    #[clap(short = 'c', long, default_value = "4096")]
    capacity: usize,
    /// Number of slots searched on each side of a word's primary slot
    #[clap(short = 'w', long, default_value = "8")]
    window: usize,
    #[clap(long, value_enum, default_value = "fnv1a")]
    hash: HashChoice,
    /// Treat words differing only in ASCII case as the same word
    #[clap(long)]
    ignore_case: bool,
    /// Number of most frequent words to print
    #[clap(short = 'n', long, default_value = "10")]
    top: usize,
}

fn fnv1a_ignore_case(key: &[u8]) -> u32 {
    key.iter().fold(fnv1a(b""), |hash, &byte| {
        (hash ^ byte.to_ascii_lowercase() as u32).wrapping_mul(0x01000193)
    })
}

fn first_letter(key: &[u8]) -> u32 {
    key.first()
        .map_or(0, |&b| u32::from(b.to_ascii_uppercase().wrapping_sub(b'A')))
}

fn eq_ignore_case(a: &[u8], b: &[u8]) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn read_inputs(files: &[PathBuf]) -> color_eyre::Result<Vec<Vec<u8>>> {
    if files.is_empty() {
        let mut input = vec![];
        std::io::stdin()
            .lock()
            .read_to_end(&mut input)
            .wrap_err("reading standard input")?;
        return Ok(vec![input]);
    }
    files
        .iter()
        .map(|path| std::fs::read(path).wrap_err_with(|| format!("reading {}", path.display())))
        .collect()
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    slotdex_logger::setup();

    if args.capacity > u32::MAX_INDEX {
        bail!(
            "a capacity of {} exceeds the supported maximum of {}",
            args.capacity,
            u32::MAX_INDEX
        );
    }

    let inputs = read_inputs(&args.files)?;
    log::info!(
        "read {} bytes from {} input(s)",
        inputs.iter().map(Vec::len).sum::<usize>(),
        inputs.len()
    );

    let hasher: fn(&[u8]) -> u32 = match (args.hash, args.ignore_case) {
        (HashChoice::Fnv1a, false) => fnv1a,
        (HashChoice::Fnv1a, true) => fnv1a_ignore_case,
        (HashChoice::FirstLetter, _) => first_letter,
    };
    let key_eq: fn(&[u8], &[u8]) -> bool = if args.ignore_case {
        eq_ignore_case
    } else {
        |a, b| BytesEq.key_eq(a, b)
    };

    let config = TableConfig::new(args.capacity)
        .probe_window(args.window)
        .hasher(hasher)
        .key_eq(key_eq);
    let mut buffer = Slot::<u32>::empty_buffer(config.capacity());
    let mut table = SlotTable::init(config, &mut buffer)?;

    let mut counts = WordCounts::default();
    for input in inputs.iter() {
        counts.count(&mut table, tokenize::words(input));
    }

    let stats = table.stats(&counts.records);
    log::info!("table: {stats}");
    if counts.rejected > 0 {
        log::warn!(
            "{} words found no slot, consider a larger capacity or window",
            counts.rejected
        );
    }

    println!("words:    {}", counts.total);
    println!("distinct: {}", counts.records.len());
    println!("rejected: {}", counts.rejected);
    println!("table:    {stats}");
    if args.top > 0 {
        println!();
        for record in counts.top(args.top) {
            let word = String::from_utf8_lossy(record.word);
            println!("{:>10} {word}", record.count);
        }
    }

    Ok(())
}
