#![cfg(test)]
#![allow(missing_docs)]
use crate::{InsertOutcome, KeyHasher, Slot, SlotTable, TableConfig};
use indexmap::IndexMap;
use rand::prelude::*;

// use u16 slots to keep the record array well below the sentinel
struct CheckedTable<'s, H: KeyHasher> {
    dut: SlotTable<'s, u16, H>,
    records: Vec<Vec<u8>>,
    ref_map: IndexMap<Vec<u8>, usize>,
    rejected: usize,
}

impl<'s, H: KeyHasher> CheckedTable<'s, H> {
    fn new(buffer: &'s mut [Slot<u16>], probe_window: usize, hasher: H) -> Self {
        let config = TableConfig::new(buffer.len())
            .probe_window(probe_window)
            .hasher(hasher);
        CheckedTable {
            dut: SlotTable::init(config, buffer).unwrap(),
            records: vec![],
            ref_map: IndexMap::new(),
            rejected: 0,
        }
    }

    fn insert(&mut self, key: Vec<u8>) -> InsertOutcome {
        let index = self.records.len();
        self.records.push(key.clone());
        let result = self.dut.insert(&self.records, index);
        match result {
            InsertOutcome::Inserted { slot } => {
                assert!(self.ref_map.insert(key, index).is_none());
                assert_eq!(self.dut.occupant(slot), Some(index));
            }
            InsertOutcome::Duplicate { existing } => {
                assert_eq!(self.ref_map.get(&key), Some(&existing));
            }
            InsertOutcome::NoEmptySlot => {
                assert!(!self.ref_map.contains_key(&key));
                self.rejected += 1;
            }
        }
        assert_eq!(self.dut.len(), self.ref_map.len());
        result
    }

    fn reinsert(&mut self, index: usize) -> InsertOutcome {
        let result = self.dut.insert(&self.records, index);
        match self.ref_map.get(&self.records[index]) {
            Some(&existing) => assert_eq!(result, InsertOutcome::Duplicate { existing }),
            // slots only ever fill up, so a rejected key stays rejected
            None => assert_eq!(result, InsertOutcome::NoEmptySlot),
        }
        result
    }

    fn lookup(&mut self, key: &[u8]) -> Option<usize> {
        let ref_result = self.ref_map.get(key).copied();
        let dut_result = self.dut.lookup(&self.records, key);
        assert_eq!(ref_result, dut_result);
        ref_result
    }

    fn check(&mut self) {
        self.dut.check(&self.records);
        for (key, &index) in self.ref_map.iter() {
            assert_eq!(self.dut.lookup(&self.records, key), Some(index));
        }
        let mut stored = Vec::from_iter(self.dut.iter().map(|(_, index)| index));
        stored.sort_unstable();
        let mut expected = Vec::from_iter(self.ref_map.values().copied());
        expected.sort_unstable();
        assert_eq!(stored, expected);
    }
}

macro_rules! weighted_choose {
    ($rng:expr, $($name:ident: $weight:expr => $body:expr),+) => {
        {
            enum Branches { $( $name,  )* }
            let weights = [$((Branches::$name, $weight)),+];
            match weights.choose_weighted($rng, |x| x.1).unwrap().0 {
                $(Branches::$name => $body),*
            }
        }
    }
}

fn random_key(rng: &mut impl Rng) -> Vec<u8> {
    let len = rng.gen_range(0..6);
    Vec::from_iter((0..len).map(|_| rng.gen_range(b'a'..=b'h')))
}

fn test_suite<H: KeyHasher>(capacity: usize, probe_window: usize, hasher: H) {
    let mut buffer = Slot::<u16>::empty_buffer(capacity);
    let mut table = CheckedTable::new(&mut buffer, probe_window, hasher);
    let mut rng = rand_pcg::Pcg64::seed_from_u64(25);
    let verbosity = 1;
    for _ in 0..4000 {
        weighted_choose! {&mut rng,
            Insert: 1.0 => {
                let key = random_key(&mut rng);
                let result = table.insert(key.clone());
                if verbosity > 0 {
                    println!("inserting {key:?} -> {result:?}");
                }
            },
            InsertPresent: 0.3 => {
                if let Some(key) = table.ref_map.keys().choose(&mut rng).cloned() {
                    let result = table.insert(key.clone());
                    assert!(matches!(result, InsertOutcome::Duplicate { .. }));
                    if verbosity > 0 {
                        println!("inserting present {key:?} -> {result:?}");
                    }
                }
            },
            Reinsert: 0.2 => {
                if !table.records.is_empty() {
                    let index = rng.gen_range(0..table.records.len());
                    let result = table.reinsert(index);
                    if verbosity > 0 {
                        println!("reinserting {index} -> {result:?}");
                    }
                }
            },
            GetPresent: 0.5 => {
                if let Some(key) = table.ref_map.keys().choose(&mut rng).cloned() {
                    let result = table.lookup(&key);
                    if verbosity > 0 {
                        println!("getting {key:?} -> {result:?}");
                    }
                }
            },
            GetRandom: 0.5 => {
                let key = random_key(&mut rng);
                let result = table.lookup(&key);
                if verbosity > 0 {
                    println!("getting {key:?} -> {result:?}");
                }
            },
            Check: 0.1 => {
                table.check();
                if verbosity > 0 {
                    println!("check");
                }
            }
        };
    }
    table.check();
    println!(
        "{} stored, {} rejected, {}",
        table.ref_map.len(),
        table.rejected,
        table.dut.stats(&table.records)
    );
}

fn first_byte(key: &[u8]) -> u32 {
    key.first().copied().map_or(0, u32::from)
}

#[test]
fn test_suite_fnv1a() {
    test_suite(1024, 4, crate::Fnv1a);
}

#[test]
fn test_suite_fnv1a_crowded() {
    // far more distinct keys than slots, so insertions regularly fail
    test_suite(97, 3, crate::Fnv1a);
}

#[test]
fn test_suite_first_byte() {
    // only 9 distinct primary slots, all keys pile up in a few windows
    test_suite(64, 5, first_byte);
}

#[test]
fn test_suite_full_window() {
    test_suite(13, 13, crate::Fnv1a);
}

#[test]
fn test_suite_no_window() {
    test_suite(251, 0, crate::Fnv1a);
}
