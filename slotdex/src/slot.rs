//! Slot values stored in a table's buffer.
use core::{fmt::Debug, hash::Hash};

/// Unsigned integer types used to store record indices in a slot buffer.
///
/// The largest value of each type is reserved to mark an empty slot, so an index type can refer to
/// records with indices in the range `0..=Self::MAX_INDEX`. Picking a narrower type shrinks the
/// slot buffer at the cost of limiting the size of the record array that can be indexed.
pub trait SlotIndex: Copy + Eq + Hash + Send + Sync + Debug + 'static {
    /// The reserved value marking an empty slot.
    const EMPTY: Self;

    /// The largest record index representable by this type.
    const MAX_INDEX: usize;

    /// Returns the value representing `index`, unless it is out of range.
    ///
    /// This returns `None` if and only if `index > Self::MAX_INDEX`.
    fn try_from_index(index: usize) -> Option<Self>;

    /// Returns the value representing `index`, panicking when the index is out of range.
    #[inline(always)]
    #[track_caller]
    fn from_index(index: usize) -> Self {
        match Self::try_from_index(index) {
            Some(value) => value,
            None => panic!(
                "record index {index} exceeds the maximum index {} of the slot index type",
                Self::MAX_INDEX
            ),
        }
    }

    /// Returns the record index represented by this value.
    ///
    /// Must not be called on [`Self::EMPTY`].
    fn index(self) -> usize;
}

macro_rules! impl_slot_index {
    ($($t:ty),*) => {
        $(
            impl SlotIndex for $t {
                const EMPTY: Self = <$t>::MAX;

                #[allow(clippy::unnecessary_cast)]
                const MAX_INDEX: usize = (<$t>::MAX - 1) as usize;

                #[inline(always)]
                fn try_from_index(index: usize) -> Option<Self> {
                    if index <= Self::MAX_INDEX {
                        Some(index as $t)
                    } else {
                        None
                    }
                }

                #[inline(always)]
                fn index(self) -> usize {
                    debug_assert!(self != Self::EMPTY);
                    self as usize
                }
            }
        )*
    };
}

impl_slot_index!(u8, u16, u32, usize);

#[cfg(target_pointer_width = "64")]
impl_slot_index!(u64);

/// A single cell of a slot buffer, either empty or holding a record index.
///
/// This has the same representation as `I`, with [`SlotIndex::EMPTY`] marking an empty slot. The
/// sentinel is never exposed: [`Slot::occupied`] rejects it and [`Slot::get`] maps it to `None`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Slot<I: SlotIndex = u32>(I);

impl<I: SlotIndex> Default for Slot<I> {
    #[inline(always)]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<I: SlotIndex> Debug for Slot<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.get() {
            Some(index) => Debug::fmt(&index, f),
            None => f.write_str("Empty"),
        }
    }
}

impl<I: SlotIndex> Slot<I> {
    /// The empty slot.
    pub const EMPTY: Self = Self(I::EMPTY);

    /// Returns a slot holding the record index `index`.
    ///
    /// Panics if `index > I::MAX_INDEX`.
    #[inline(always)]
    #[track_caller]
    pub fn occupied(index: usize) -> Self {
        Self(I::from_index(index))
    }

    /// Returns the stored record index, or `None` for an empty slot.
    #[inline(always)]
    pub fn get(self) -> Option<usize> {
        if self.0 == I::EMPTY {
            None
        } else {
            Some(self.0.index())
        }
    }

    /// Returns `true` if the slot holds no record index.
    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == I::EMPTY
    }

    /// Number of bytes a slot buffer for `capacity` slots occupies.
    pub const fn required_bytes(capacity: usize) -> usize {
        capacity * std::mem::size_of::<Self>()
    }

    /// Allocates a buffer of `capacity` empty slots on the heap.
    ///
    /// Tables never allocate on their own, this is a convenience for callers that have no other
    /// storage at hand.
    pub fn empty_buffer(capacity: usize) -> Vec<Self> {
        vec![Self::EMPTY; capacity]
    }
}
