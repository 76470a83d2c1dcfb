//! Range scan results.

use crate::shard::Slot;
use crate::Key;
use std::collections::BTreeMap;

/// One row of a range scan: a key and the length of its value.
///
/// Scans deliberately return value lengths instead of values, so callers
/// can plan iteration over large payloads without materializing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanEntry {
    /// The key.
    pub key: Key,
    /// Length in bytes of the value stored under `key`.
    pub value_len: usize,
}

/// An ordered page of scan results.
///
/// Entries are in ascending key order. A page shorter than the requested
/// count means the store was exhausted, not that an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    entries: Vec<ScanEntry>,
}

impl ScanPage {
    /// Creates a page from entries already in ascending key order.
    #[must_use]
    pub fn new(entries: Vec<ScanEntry>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].key < w[1].key));
        Self { entries }
    }

    /// Returns the entries of this page.
    #[must_use]
    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    /// Returns the keys of this page, in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        self.entries.iter().map(|e| e.key).collect()
    }

    /// Returns the value lengths of this page, parallel to [`keys`].
    ///
    /// [`keys`]: ScanPage::keys
    #[must_use]
    pub fn value_lens(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.value_len).collect()
    }

    /// Returns the number of entries in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the page has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ScanPage {
    type Item = ScanEntry;
    type IntoIter = std::vec::IntoIter<ScanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<ScanEntry> for ScanPage {
    fn from_iter<I: IntoIterator<Item = ScanEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Scans `cells` for the first `count` live keys at or after `start`.
///
/// Tombstones are skipped. The shard and snapshot scan paths both go
/// through here so they cannot drift apart.
pub(crate) fn scan_cells(cells: &BTreeMap<Key, Slot>, start: Key, count: usize) -> ScanPage {
    if count == 0 {
        return ScanPage::default();
    }
    cells
        .range(start..)
        .filter_map(|(key, slot)| {
            slot.value_len().map(|value_len| ScanEntry {
                key: *key,
                value_len,
            })
        })
        .take(count)
        .collect()
}
