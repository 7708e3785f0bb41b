//! A fixed-capacity hash index over externally owned records.
//!
//! A [`SlotTable`] maps byte string keys to positions in a record array owned by the caller. The
//! table itself only stores record indices, in a slot buffer that is also provided by the caller,
//! and never allocates, grows or copies keys. Keys are read from the records through the [`Keyed`]
//! trait whenever they are needed.
//!
//! Collisions are resolved by searching a bounded window of slots around a key's primary slot, so
//! both insertion and lookup inspect at most `2 * probe_window + 1` slots. When the window is
//! exhausted, [`SlotTable::insert`] reports [`InsertOutcome::NoEmptySlot`] and leaves it to the
//! caller to use a larger table, a wider window or to drop the key.
//!
//! ```
//! use slotdex::{InsertOutcome, Slot, SlotTable, TableConfig};
//!
//! let records = ["alpha", "beta", "gamma", "beta"];
//!
//! let config = TableConfig::new(16).probe_window(2);
//! let mut buffer = vec![Slot::<u8>::EMPTY; 16];
//! let mut table = SlotTable::init(config, &mut buffer).unwrap();
//!
//! for index in 0..3 {
//!     assert!(table.insert(&records, index).is_inserted());
//! }
//! assert_eq!(table.insert(&records, 3), InsertOutcome::Duplicate { existing: 1 });
//!
//! assert_eq!(table.lookup(&records, b"gamma"), Some(2));
//! assert_eq!(table.lookup(&records, b"delta"), None);
//! ```
#![forbid(unsafe_code)]

pub mod key;
pub mod slot;
pub mod table;

mod test_table;

pub use key::{fnv1a, BytesEq, Fnv1a, KeyEq, KeyHasher, Keyed};
pub use slot::{Slot, SlotIndex};
pub use table::{ConfigError, InsertOutcome, SlotTable, TableConfig, TableStats};
