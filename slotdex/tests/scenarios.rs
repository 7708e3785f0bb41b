#![allow(missing_docs)] // test only
use slotdex::{ConfigError, InsertOutcome, Keyed, Slot, SlotTable, TableConfig};

/// Maps `A`/`a` to 0, `B`/`b` to 1, and so on.
fn first_letter(key: &[u8]) -> u32 {
    key.first()
        .map_or(0, |&b| u32::from(b.to_ascii_uppercase().wrapping_sub(b'A')))
}

struct Word {
    text: &'static str,
    count: u32,
}

impl Keyed for Word {
    fn key(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

fn words(texts: &[&'static str]) -> Vec<Word> {
    Vec::from_iter(texts.iter().map(|&text| Word { text, count: 0 }))
}

#[test]
fn colliding_words_fill_window() {
    let records = words(&["World", "WWW", "Www", "WWW", "WXYZ", "Hello"]);
    let mut buffer = [Slot::<u8>::EMPTY; 26];
    let config = TableConfig::new(26).probe_window(1).hasher(first_letter);
    let mut table = SlotTable::init(config, &mut buffer).unwrap();

    assert_eq!(table.primary_slot(b"World"), 22);
    assert_eq!(
        table.insert(&records, 0),
        InsertOutcome::Inserted { slot: 22 }
    );
    assert_eq!(
        table.insert(&records, 1),
        InsertOutcome::Inserted { slot: 21 }
    );
    assert_eq!(
        table.insert(&records, 2),
        InsertOutcome::Inserted { slot: 23 }
    );
    assert_eq!(
        table.insert(&records, 3),
        InsertOutcome::Duplicate { existing: 1 }
    );
    assert_eq!(table.insert(&records, 4), InsertOutcome::NoEmptySlot);
    assert_eq!(
        table.insert(&records, 5),
        InsertOutcome::Inserted { slot: 7 }
    );

    assert_eq!(table.lookup(&records, b"World"), Some(0));
    assert_eq!(table.lookup(&records, b"WWW"), Some(1));
    assert_eq!(table.lookup(&records, b"Www"), Some(2));
    assert_eq!(table.lookup(&records, b"WXYZ"), None);
    assert_eq!(table.lookup(&records, b"Hello"), Some(5));
    assert_eq!(table.lookup(&records, b"Help"), None);
    assert_eq!(table.len(), 4);
    table.check(&records);

    assert_eq!(
        Vec::from_iter(table.iter()),
        vec![(7, 5), (21, 1), (22, 0), (23, 2)]
    );
}

#[test]
fn counting_through_lookups() {
    let mut records = words(&["to", "be", "or", "not"]);
    let mut buffer = Slot::<u32>::empty_buffer(8);
    let mut table = SlotTable::init(TableConfig::new(8).probe_window(3), &mut buffer).unwrap();
    for index in 0..records.len() {
        assert!(table.insert(&records, index).is_inserted());
    }

    for word in ["to", "be", "or", "not", "to", "be"] {
        let index = table.lookup(&records, word.as_bytes()).unwrap();
        records[index].count += 1;
    }

    let counts = Vec::from_iter(records.iter().map(|word| word.count));
    assert_eq!(counts, vec![2, 2, 1, 1]);
    table.check(&records);
}

#[test]
fn duplicate_keeps_first_index() {
    let records = ["same", "other", "same"];
    let mut buffer = Slot::<u16>::empty_buffer(32);
    let mut table = SlotTable::init(TableConfig::new(32).probe_window(2), &mut buffer).unwrap();
    assert!(table.insert(&records, 0).is_inserted());
    assert!(table.insert(&records, 1).is_inserted());
    assert_eq!(
        table.insert(&records, 2),
        InsertOutcome::Duplicate { existing: 0 }
    );
    assert_eq!(table.lookup(&records, b"same"), Some(0));
}

#[test]
fn overflow_keeps_prior_keys() {
    let texts = ["Ant", "Ape", "Asp", "Auk", "Axe", "Bat"];
    let records = words(&texts);
    let mut buffer = Slot::<u32>::empty_buffer(26);
    let config = TableConfig::new(26).probe_window(1).hasher(first_letter);
    let mut table = SlotTable::init(config, &mut buffer).unwrap();

    let outcomes = Vec::from_iter((0..records.len()).map(|i| table.insert(&records, i)));
    assert_eq!(
        outcomes,
        vec![
            InsertOutcome::Inserted { slot: 0 },
            InsertOutcome::Inserted { slot: 25 },
            InsertOutcome::Inserted { slot: 1 },
            InsertOutcome::NoEmptySlot,
            InsertOutcome::NoEmptySlot,
            // Bat's primary slot is taken by Asp, the slot above it is still free
            InsertOutcome::Inserted { slot: 2 },
        ]
    );
    for i in [0, 1, 2, 5] {
        assert_eq!(table.lookup(&records, texts[i].as_bytes()), Some(i));
    }
    assert_eq!(table.lookup(&records, b"Auk"), None);
    assert_eq!(table.lookup(&records, b"Axe"), None);
    table.check(&records);
}

#[test]
fn absent_keys_for_any_shape() {
    let records = Vec::from_iter((0..40).map(|i| format!("key{i}")));
    for capacity in [1, 2, 7, 16, 61] {
        for probe_window in [0, 1, 3, 100] {
            let mut buffer = Slot::<u32>::empty_buffer(capacity);
            let config = TableConfig::new(capacity).probe_window(probe_window);
            let mut table = SlotTable::init(config, &mut buffer).unwrap();
            for index in 0..records.len() {
                table.insert(&records, index);
            }
            table.check(&records);
            for i in 40..80 {
                assert_eq!(table.lookup(&records, format!("key{i}").as_bytes()), None);
            }
            for (slot, index) in table.iter() {
                assert_eq!(
                    table.lookup_slot(&records, records[index].as_bytes()),
                    Some((slot, index))
                );
            }
        }
    }
}

#[test]
fn case_insensitive_callbacks() {
    let records = ["Rust", "RUST", "rusty"];
    let mut buffer = Slot::<u32>::empty_buffer(16);
    let config = TableConfig::new(16)
        .probe_window(2)
        .hasher(|key: &[u8]| slotdex::fnv1a(&key.to_ascii_lowercase()))
        .key_eq(|a: &[u8], b: &[u8]| a.eq_ignore_ascii_case(b));
    let mut table = SlotTable::init(config, &mut buffer).unwrap();

    assert!(table.insert(&records, 0).is_inserted());
    assert_eq!(
        table.insert(&records, 1),
        InsertOutcome::Duplicate { existing: 0 }
    );
    assert!(table.insert(&records, 2).is_inserted());
    assert_eq!(table.lookup(&records, b"rUsT"), Some(0));
}

#[test]
fn rejected_configurations() {
    let mut buffer = [Slot::<u32>::EMPTY; 4];
    assert_eq!(
        SlotTable::init(TableConfig::new(0), &mut buffer).unwrap_err(),
        ConfigError::ZeroCapacity
    );
    let config = TableConfig::new(10);
    assert_eq!(config.required_bytes::<u32>(), 40);
    assert_eq!(
        SlotTable::init(config, &mut buffer).unwrap_err(),
        ConfigError::BufferTooSmall {
            required: 10,
            provided: 4
        }
    );
}
