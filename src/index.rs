//! Interval indexing for fast overlap queries.
//!
//! The index borrows the intervals it holds; it never owns or copies them.
//! Because the borrow is shared, an indexed interval cannot be moved or
//! mutated while the index is alive. Rebuild the index after editing.

use std::collections::BTreeMap;
use std::ops::Bound;

use rustc_hash::FxHashMap;

use crate::interval::{spans_overlap, Locus};

/// Key within one chromosome: `(start, end, insertion sequence)`.
type EntryKey = (u64, u64, usize);

/// Balanced per-chromosome tree ordered by start.
///
/// Tracks the longest interval seen so an overlap query only has to scan
/// entries starting within `[query.start - max_len, query.end)`.
struct ChromTree<'a, T> {
    entries: BTreeMap<EntryKey, &'a T>,
    max_len: u64,
}

impl<'a, T: Locus> ChromTree<'a, T> {
    fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            max_len: 0,
        }
    }

    fn insert(&mut self, item: &'a T, seq: usize) {
        self.max_len = self.max_len.max(item.width());
        self.entries.insert((item.start(), item.end(), seq), item);
    }

    fn overlapping<'q, Q: Locus + ?Sized>(
        &'q self,
        query: &'q Q,
    ) -> impl Iterator<Item = &'a T> + 'q {
        let (q_start, q_end) = (query.start(), query.end());
        // An inverted query matches nothing; guard before building the range.
        let valid = q_start <= q_end;
        let lower = q_start.saturating_sub(self.max_len);
        let range = if valid {
            Some(
                self.entries
                    .range((Bound::Included((lower, 0, 0)), Bound::Excluded((q_end, 0, 0)))),
            )
        } else {
            None
        };

        range
            .into_iter()
            .flatten()
            .filter(move |((start, end, _), _)| spans_overlap(*start, *end, q_start, q_end))
            .map(|(_, item)| *item)
    }
}

/// An indexed collection of interval references organized by chromosome.
///
/// Chromosomes are keyed by their raw name. Callers that want `chr1` and
/// `1` grouped together must canonicalize before inserting.
pub struct IntervalIndex<'a, T> {
    trees: FxHashMap<String, ChromTree<'a, T>>,
    len: usize,
}

impl<'a, T: Locus> IntervalIndex<'a, T> {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            trees: FxHashMap::default(),
            len: 0,
        }
    }

    /// Build an index from a collection of interval references.
    pub fn from_intervals<I>(intervals: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
    {
        let mut index = Self::new();
        for item in intervals {
            index.insert(item);
        }
        index
    }

    /// Insert a reference to `item` under its chromosome. O(log n).
    pub fn insert(&mut self, item: &'a T) {
        let seq = self.len;
        match self.trees.get_mut(item.chrom()) {
            Some(tree) => tree.insert(item, seq),
            None => {
                let mut tree = ChromTree::new();
                tree.insert(item, seq);
                self.trees.insert(item.chrom().to_string(), tree);
            }
        }
        self.len += 1;
    }

    /// Find all intervals on the query's chromosome whose half-open range
    /// intersects the query's. Touching ranges do not overlap.
    ///
    /// Results are ordered by start, then end, then insertion order.
    pub fn find_overlaps<Q: Locus + ?Sized>(&self, query: &Q) -> Vec<&'a T> {
        match self.trees.get(query.chrom()) {
            Some(tree) => tree.overlapping(query).collect(),
            None => Vec::new(),
        }
    }

    /// Count overlapping intervals.
    pub fn count_overlaps<Q: Locus + ?Sized>(&self, query: &Q) -> usize {
        self.trees
            .get(query.chrom())
            .map_or(0, |tree| tree.overlapping(query).count())
    }

    /// Check if any interval overlaps the query.
    pub fn has_overlap<Q: Locus + ?Sized>(&self, query: &Q) -> bool {
        self.trees
            .get(query.chrom())
            .is_some_and(|tree| tree.overlapping(query).next().is_some())
    }

    /// Every interval indexed under `chrom`, sorted by start.
    pub fn all_intervals(&self, chrom: &str) -> Vec<&'a T> {
        self.trees
            .get(chrom)
            .map(|tree| tree.entries.values().copied().collect())
            .unwrap_or_default()
    }

    /// Get all chromosomes in the index.
    pub fn chromosomes(&self) -> impl Iterator<Item = &String> {
        self.trees.keys()
    }

    /// Get the total number of indexed intervals.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry, releasing the borrows.
    pub fn clear(&mut self) {
        self.trees.clear();
        self.len = 0;
    }
}

impl<'a, T: Locus> Default for IntervalIndex<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}
