//! Word frequency counting on top of a [`SlotTable`].
use slotdex::{InsertOutcome, KeyEq, KeyHasher, Keyed, SlotIndex, SlotTable};

/// A distinct word and the number of times it occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordRecord<'a> {
    /// The word, borrowed from the input.
    pub word: &'a [u8],
    /// Number of occurrences so far.
    pub count: u64,
}

impl Keyed for WordRecord<'_> {
    #[inline(always)]
    fn key(&self) -> &[u8] {
        self.word
    }
}

/// Result of counting a sequence of words.
#[derive(Clone, Debug, Default)]
pub struct WordCounts<'a> {
    /// One record per distinct word that found a slot, in order of first occurrence.
    pub records: Vec<WordRecord<'a>>,
    /// Total number of words seen, including rejected ones.
    pub total: u64,
    /// Number of occurrences of words that did not find a slot.
    pub rejected: u64,
}

impl<'a> WordCounts<'a> {
    /// Counts all `words`, indexing the records in `table`.
    pub fn count<I: SlotIndex, H: KeyHasher, E: KeyEq>(
        &mut self,
        table: &mut SlotTable<'_, I, H, E>,
        words: impl IntoIterator<Item = &'a [u8]>,
    ) {
        for word in words {
            self.total += 1;
            if let Some(index) = table.lookup(&self.records, word) {
                self.records[index].count += 1;
                continue;
            }

            let index = self.records.len();
            self.records.push(WordRecord { word, count: 1 });
            match table.insert(&self.records, index) {
                InsertOutcome::Inserted { .. } => (),
                InsertOutcome::Duplicate { existing } => {
                    // only reachable with a hasher or equality that disagrees with itself
                    self.records.pop();
                    self.records[existing].count += 1;
                }
                InsertOutcome::NoEmptySlot => {
                    self.records.pop();
                    self.rejected += 1;
                    log::debug!("no slot for {:?}", String::from_utf8_lossy(word));
                }
            }
        }
    }

    /// Returns up to `n` records with the highest counts, ties broken by word.
    pub fn top(&self, n: usize) -> Vec<&WordRecord<'a>> {
        let mut sorted = Vec::from_iter(self.records.iter());
        sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(b.word)));
        sorted.truncate(n);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::words;
    use slotdex::{Slot, TableConfig};
    use std::cell::Cell;

    #[test]
    fn counts_words() {
        let input = b"the cat and the hat and the bat";
        let mut buffer = Slot::<u32>::empty_buffer(64);
        let mut table = SlotTable::init(TableConfig::new(64).probe_window(4), &mut buffer).unwrap();
        let mut counts = WordCounts::default();
        counts.count(&mut table, words(input));

        assert_eq!(counts.total, 8);
        assert_eq!(counts.rejected, 0);
        assert_eq!(counts.records.len(), 5);
        let top = Vec::from_iter(counts.top(3).into_iter().map(|r| (r.word, r.count)));
        assert_eq!(
            top,
            vec![(&b"the"[..], 3), (&b"and"[..], 2), (&b"bat"[..], 1)]
        );
        table.check(&counts.records);
    }

    #[test]
    fn rejects_words_without_slot() {
        // every word has the same primary slot and the window fits only three of them
        let input = b"a b c d a e b";
        let mut buffer = Slot::<u8>::empty_buffer(8);
        let config = TableConfig::new(8).probe_window(1).hasher(|_: &[u8]| 0u32);
        let mut table = SlotTable::init(config, &mut buffer).unwrap();
        let mut counts = WordCounts::default();
        counts.count(&mut table, words(input));

        assert_eq!(counts.total, 7);
        assert_eq!(counts.rejected, 2);
        let found = Vec::from_iter(counts.records.iter().map(|r| (r.word, r.count)));
        assert_eq!(found, vec![(&b"a"[..], 2), (&b"b"[..], 2), (&b"c"[..], 1)]);
    }

    #[test]
    fn duplicate_after_missed_lookup() {
        // the third hash, the lookup of the second "a", points at an empty slot
        let calls = Cell::new(0);
        let hasher = |_: &[u8]| {
            calls.set(calls.get() + 1);
            if calls.get() == 3 { 5u32 } else { 0 }
        };
        let mut buffer = Slot::<u32>::empty_buffer(8);
        let config = TableConfig::new(8).probe_window(1).hasher(hasher);
        let mut table = SlotTable::init(config, &mut buffer).unwrap();
        let mut counts = WordCounts::default();
        counts.count(&mut table, words(b"a a"));

        assert_eq!(calls.get(), 5);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.rejected, 0);
        assert_eq!(counts.records, vec![WordRecord { word: b"a", count: 2 }]);
        assert_eq!(table.len(), 1);
    }
}
