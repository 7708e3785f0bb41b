//! The [`SlotTable`] hash index and its configuration.
//!
//! A [`SlotTable`] stores record indices in a fixed-size slot buffer provided by the caller. A
//! record index is placed at the primary slot of its key (`hash % capacity`) if that slot is empty.
//! Otherwise the table searches a window of `probe_window` slots on both sides of the primary slot,
//! wrapping around at the ends of the buffer, and uses the first empty slot in the order
//! `-w, -w + 1, ..., -1, 1, ..., w`. Once every slot in the window is occupied, inserting another
//! key with the same primary slot fails with [`InsertOutcome::NoEmptySlot`].
//!
//! Lookups always scan the full window. An empty slot inside the window does not end the search,
//! as a key displaced to the far side of the window may still be found past it.
//!
//! The table never grows, never removes individual keys and never allocates.
use std::fmt;

use crate::{
    key::{BytesEq, Fnv1a, KeyEq, KeyHasher, Keyed},
    slot::{Slot, SlotIndex},
};

/// Parameters for creating a [`SlotTable`].
///
/// Starts out with the default FNV-1a hasher, byte-wise key equality and a probe window of zero,
/// each of which can be replaced using the builder methods.
#[derive(Clone, Copy, Debug)]
pub struct TableConfig<H = Fnv1a, E = BytesEq> {
    capacity: usize,
    probe_window: usize,
    hasher: H,
    key_eq: E,
}

impl TableConfig {
    /// Returns a configuration for a table of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        TableConfig {
            capacity,
            probe_window: 0,
            hasher: Fnv1a,
            key_eq: BytesEq,
        }
    }
}

impl<H, E> TableConfig<H, E> {
    /// Sets the number of slots searched on each side of a key's primary slot.
    ///
    /// Values larger than the capacity are clamped to the capacity when the table is created.
    pub fn probe_window(self, probe_window: usize) -> Self {
        TableConfig {
            probe_window,
            ..self
        }
    }

    /// Replaces the hash function.
    pub fn hasher<H2: KeyHasher>(self, hasher: H2) -> TableConfig<H2, E> {
        TableConfig {
            capacity: self.capacity,
            probe_window: self.probe_window,
            hasher,
            key_eq: self.key_eq,
        }
    }

    /// Replaces the key equality.
    pub fn key_eq<E2: KeyEq>(self, key_eq: E2) -> TableConfig<H, E2> {
        TableConfig {
            capacity: self.capacity,
            probe_window: self.probe_window,
            hasher: self.hasher,
            key_eq,
        }
    }

    /// Returns the configured number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bytes a slot buffer for this configuration requires when using `I` as index type.
    pub fn required_bytes<I: SlotIndex>(&self) -> usize {
        Slot::<I>::required_bytes(self.capacity)
    }
}

/// Reasons for rejecting a [`TableConfig`] and slot buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured capacity is zero.
    ZeroCapacity,
    /// The slot buffer has fewer slots than the configured capacity.
    BufferTooSmall {
        /// The configured capacity.
        required: usize,
        /// The length of the provided buffer.
        provided: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => f.write_str("slot table capacity must be non-zero"),
            ConfigError::BufferTooSmall { required, provided } => write!(
                f,
                "slot buffer holds {provided} slots but the table capacity is {required}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result of [`SlotTable::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record index was stored in the given slot.
    Inserted {
        /// Position of the slot now holding the record index.
        slot: usize,
    },
    /// A record with an equal key is already present, the table was not changed.
    Duplicate {
        /// Index of the record already holding the key.
        existing: usize,
    },
    /// Every slot in the probe window is occupied by other keys, the table was not changed.
    NoEmptySlot,
}

impl InsertOutcome {
    /// Returns `true` for [`InsertOutcome::Inserted`].
    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted { .. })
    }
}

/// A fixed-capacity hash index mapping byte string keys to indices of a caller-owned record array.
///
/// The table borrows its slot buffer and stores nothing but record indices of type `I`. Records
/// are passed to each operation that needs their keys, and must be the same array on every call,
/// at least as far as the keys of already inserted records are concerned. Other parts of the
/// records may be changed freely between calls.
pub struct SlotTable<'s, I: SlotIndex = u32, H = Fnv1a, E = BytesEq> {
    slots: &'s mut [Slot<I>],
    probe_window: usize,
    len: usize,
    hasher: H,
    key_eq: E,
}

impl<I: SlotIndex, H, E> fmt::Debug for SlotTable<'_, I, H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotTable")
            .field("probe_window", &self.probe_window)
            .field("len", &self.len)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}

/// Slot positions in the probe window around `home`, in search order.
#[inline(always)]
fn probe_sequence(
    home: usize,
    capacity: usize,
    probe_window: usize,
) -> impl Iterator<Item = usize> {
    let below = (1..=probe_window)
        .rev()
        .map(move |offset| (home + capacity - offset) % capacity);
    let above = (1..=probe_window).map(move |offset| (home + offset) % capacity);
    below.chain(above)
}

/// Distance between two slot positions, going around the end of the buffer if that is shorter.
#[inline(always)]
fn circular_distance(a: usize, b: usize, capacity: usize) -> usize {
    let forward = (b + capacity - a) % capacity;
    forward.min(capacity - forward)
}

impl<'s, I: SlotIndex, H: KeyHasher, E: KeyEq> SlotTable<'s, I, H, E> {
    /// Creates a table using the first `config.capacity()` slots of `buffer`.
    ///
    /// All used slots are reset to empty, discarding the previous buffer contents. The probe window
    /// is clamped to the capacity.
    pub fn init(config: TableConfig<H, E>, buffer: &'s mut [Slot<I>]) -> Result<Self, ConfigError> {
        let TableConfig {
            capacity,
            probe_window,
            hasher,
            key_eq,
        } = config;

        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if buffer.len() < capacity {
            return Err(ConfigError::BufferTooSmall {
                required: capacity,
                provided: buffer.len(),
            });
        }

        let slots = &mut buffer[..capacity];
        slots.fill(Slot::EMPTY);

        let probe_window = probe_window.min(capacity);

        log::debug!(
            "slot table with capacity {capacity}, probe window {probe_window}, {} byte slot buffer",
            Slot::<I>::required_bytes(capacity)
        );

        Ok(SlotTable {
            slots,
            probe_window,
            len: 0,
            hasher,
            key_eq,
        })
    }

    /// Returns the primary slot of `key`.
    #[inline(always)]
    pub fn primary_slot(&self, key: &[u8]) -> usize {
        self.hasher.hash_key(key) as usize % self.slots.len()
    }

    /// Returns the record index stored in the slot at position `slot`, if any.
    ///
    /// Panics if `slot >= self.capacity()`.
    #[inline(always)]
    pub fn occupant(&self, slot: usize) -> Option<usize> {
        self.slots[slot].get()
    }

    /// Inserts the record at `index` of `records` unless a record with an equal key is present.
    ///
    /// Panics if `index` is out of bounds for `records` or larger than `I::MAX_INDEX`.
    #[track_caller]
    pub fn insert<R: Keyed>(&mut self, records: &[R], index: usize) -> InsertOutcome {
        let new_slot = Slot::occupied(index);
        let key = records[index].key();
        let home = self.primary_slot(key);

        let Some(occupant) = self.slots[home].get() else {
            self.slots[home] = new_slot;
            self.len += 1;
            return InsertOutcome::Inserted { slot: home };
        };

        // Only a record that was placed at its own primary slot can be a duplicate here, displaced
        // records are handled by the window search below.
        let occupant_key = records[occupant].key();
        if self.primary_slot(occupant_key) == home && self.key_eq.key_eq(key, occupant_key) {
            return InsertOutcome::Duplicate { existing: occupant };
        }

        for slot in probe_sequence(home, self.slots.len(), self.probe_window) {
            match self.slots[slot].get() {
                None => {
                    self.slots[slot] = new_slot;
                    self.len += 1;
                    return InsertOutcome::Inserted { slot };
                }
                Some(other) if self.key_eq.key_eq(key, records[other].key()) => {
                    return InsertOutcome::Duplicate { existing: other };
                }
                Some(_) => (),
            }
        }

        log::trace!(
            "no empty slot within {} of slot {home} for record {index}",
            self.probe_window
        );
        InsertOutcome::NoEmptySlot
    }

    /// Returns the index of the record with a key equal to `key`, if present.
    #[inline]
    pub fn lookup<R: Keyed>(&self, records: &[R], key: &[u8]) -> Option<usize> {
        self.lookup_slot(records, key).map(|(_, index)| index)
    }

    /// Returns the slot position and the index of the record with a key equal to `key`, if
    /// present.
    pub fn lookup_slot<R: Keyed>(&self, records: &[R], key: &[u8]) -> Option<(usize, usize)> {
        let home = self.primary_slot(key);
        let occupant = self.slots[home].get()?;
        if self.key_eq.key_eq(key, records[occupant].key()) {
            return Some((home, occupant));
        }

        probe_sequence(home, self.slots.len(), self.probe_window).find_map(|slot| {
            let index = self.slots[slot].get()?;
            self.key_eq
                .key_eq(key, records[index].key())
                .then_some((slot, index))
        })
    }

    /// Returns occupancy and displacement statistics.
    pub fn stats<R: Keyed>(&self, records: &[R]) -> TableStats {
        let mut stats = TableStats {
            capacity: self.slots.len(),
            probe_window: self.probe_window,
            occupied: 0,
            displaced: 0,
            max_displacement: 0,
            total_displacement: 0,
        };
        for (slot, index) in self.iter() {
            let home = self.primary_slot(records[index].key());
            let displacement = circular_distance(home, slot, self.slots.len());
            stats.occupied += 1;
            stats.displaced += (displacement != 0) as usize;
            stats.max_displacement = stats.max_displacement.max(displacement);
            stats.total_displacement += displacement;
        }
        stats
    }

    /// Checks the internal invariants of the table, panicking if they do not hold.
    ///
    /// Every stored record must be within the probe window of its primary slot, and the primary
    /// slot of a displaced record must be occupied.
    pub fn check<R: Keyed>(&self, records: &[R]) {
        let mut occupied = 0;
        for (slot, index) in self.iter() {
            occupied += 1;
            let home = self.primary_slot(records[index].key());
            let displacement = circular_distance(home, slot, self.slots.len());
            assert!(
                displacement <= self.probe_window,
                "record {index} in slot {slot} is {displacement} slots from its primary slot {home}"
            );
            if displacement != 0 {
                assert!(
                    !self.slots[home].is_empty(),
                    "record {index} in slot {slot} is displaced from empty slot {home}"
                );
            }
        }
        assert_eq!(occupied, self.len);
    }
}

impl<I: SlotIndex, H, E> SlotTable<'_, I, H, E> {
    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of slots searched on each side of a key's primary slot.
    pub fn probe_window(&self) -> usize {
        self.probe_window
    }

    /// Returns the number of stored record indices.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no record index is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Returns the slots used by this table.
    pub fn slots(&self) -> &[Slot<I>] {
        self.slots
    }

    /// Returns an iterator over the positions and record indices of all occupied slots.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, value)| value.get().map(|index| (slot, index)))
    }

    /// Empties all slots.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::EMPTY);
        self.len = 0;
    }
}

/// Occupancy and displacement statistics of a [`SlotTable`], see [`SlotTable::stats`].
///
/// The displacement of a record is the distance between its primary slot and the slot it is stored
/// in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Number of slots.
    pub capacity: usize,
    /// Number of slots searched on each side of a primary slot.
    pub probe_window: usize,
    /// Number of occupied slots.
    pub occupied: usize,
    /// Number of records not stored in their primary slot.
    pub displaced: usize,
    /// Largest displacement of any record.
    pub max_displacement: usize,
    /// Sum of all displacements.
    pub total_displacement: usize,
}

impl TableStats {
    /// Fraction of occupied slots.
    pub fn load_factor(&self) -> f64 {
        self.occupied as f64 / self.capacity.max(1) as f64
    }

    /// Average displacement over all stored records.
    pub fn mean_displacement(&self) -> f64 {
        if self.occupied == 0 {
            0.0
        } else {
            self.total_displacement as f64 / self.occupied as f64
        }
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} slots ({:.1}%), window {}, {} displaced, mean displacement {:.2}, max {}",
            self.occupied,
            self.capacity,
            self.load_factor() * 100.0,
            self.probe_window,
            self.displaced,
            self.mean_displacement(),
            self.max_displacement,
        )
    }
}
