//! Default logging setup for slotdex binaries
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

use std::{
    fmt,
    sync::{atomic::AtomicUsize, Mutex},
    time::Instant,
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct MemoryAmount(usize);

impl fmt::Debug for MemoryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self, f)
    }
}

impl fmt::Display for MemoryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1000 {
            write!(f, "{:5}B", self.0)
        } else if self.0 < 1000 << 10 {
            write!(f, "{:5.1}K", self.0 as f64 / (1u64 << 10) as f64)
        } else if self.0 < 1000 << 20 {
            write!(f, "{:5.1}M", self.0 as f64 / (1u64 << 20) as f64)
        } else {
            write!(f, "{:5.1}G", self.0 as f64 / (1u64 << 30) as f64)
        }
    }
}

impl MemoryAmount {
    /// Peak resident set size of the current process, or zero where that is unavailable.
    fn peak_rss() -> Self {
        #[cfg(all(unix, not(miri)))]
        {
            // SAFETY: rusage is plain old data so all zeros is valid
            let mut rusage: libc::rusage = unsafe { std::mem::zeroed() };
            // SAFETY: getrusage is safe to call as long as it can safely write to the passed
            // pointer
            if unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut rusage) } < 0 {
                return MemoryAmount(0);
            }
            let max_rss = rusage.ru_maxrss as usize;
            // macOS reports bytes, everyone else kilobytes
            if cfg!(target_os = "macos") {
                MemoryAmount(max_rss)
            } else {
                MemoryAmount(max_rss * 1024)
            }
        }
        #[cfg(not(all(unix, not(miri))))]
        {
            MemoryAmount(0)
        }
    }
}

const TIMESTAMP_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));

const MEMORY_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue)));
const MEMORY_NEW_PEAK_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red)));

const TARGET_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Magenta)));

/// Perform the default logging setup used by slotdex binaries.
///
/// The log filter is read from `SLOTDEX_LOG` (defaulting to `info`) and the color choice from
/// `SLOTDEX_LOG_STYLE`, using the `env_logger` syntax for both.
pub fn setup() {
    let start_time = Instant::now();
    let peak = AtomicUsize::new(MemoryAmount::peak_rss().0);
    let last_target = Mutex::new(String::new());

    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or("SLOTDEX_LOG", "info")
            .write_style("SLOTDEX_LOG_STYLE"),
    )
    .format(move |buf, record| {
        use std::io::Write;

        let timestamp = start_time.elapsed();
        let level = record.level();
        let target = record.target();

        let max = MemoryAmount::peak_rss();
        let new_peak = peak.fetch_max(max.0, std::sync::atomic::Ordering::Relaxed) < max.0;
        let memory_style = if new_peak {
            MEMORY_NEW_PEAK_STYLE
        } else {
            MEMORY_STYLE
        };

        let mut last_target = last_target.lock().unwrap_or_else(|err| err.into_inner());
        if target != *last_target {
            last_target.clear();
            last_target.push_str(target);

            writeln!(
                buf,
                "{} {} {}",
                format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
                format_args!("{style}{max}{style:#}", style = memory_style),
                format_args!("{style}{target}{style:#}", style = TARGET_STYLE)
            )?;
        }
        writeln!(
            buf,
            "{} {} {} {}",
            format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
            format_args!("{style}{max}{style:#}", style = memory_style),
            format_args!(
                "{style}{level}{style:#}",
                style = buf.default_level_style(level),
            ),
            record.args(),
        )
    })
    .init();
}
