//! The rank array: a sorted `(position, length)` run list consumed by the
//! merger to interleave two BWTs.
//!
//! Grounded on `RLArray` in `support.cpp`, including its ordered-union
//! constructor `RLArray(a, b)`.

/// A forward-only, lazy source of `(position, length)` directives, bounded
/// by `|A|` and non-decreasing in position. This is the Rust rendering of
/// the `open()`/`operator*()`/`operator++()`/`close()` interface the merger
/// consumes from an external producer (§6); `RLArray` itself implements it
/// directly over an in-memory vector.
pub trait RankArraySource: Iterator<Item = (u64, u64)> {
    /// Prepares the source for iteration (e.g. opens a backing file).
    /// A no-op for in-memory sources.
    fn open(&mut self) {}

    /// Releases any resources opened by `open`. A no-op for in-memory
    /// sources.
    fn close(&mut self) {}
}

/// An immutable, sorted `(position, length)` run list with strictly
/// increasing positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RLArray {
    runs: Vec<(u64, u64)>,
}

impl RLArray {
    pub fn new() -> Self {
        RLArray::default()
    }

    /// Builds directly from an already sorted, coalesced run list. Only
    /// validated in debug builds, matching the "malformed RA is undefined
    /// behavior" failure model of §4.5.
    pub fn from_runs(runs: Vec<(u64, u64)>) -> Self {
        debug_assert!(
            runs.windows(2).all(|w| w[0].0 < w[1].0),
            "rank array positions must be strictly increasing"
        );
        RLArray { runs }
    }

    /// Merges two rank arrays by ordered union on position. Peripheral to
    /// the merge protocol itself (§3); provided for building composite rank
    /// arrays out of smaller ones. Positions are assumed disjoint between
    /// `a` and `b`, so there is nothing to coalesce.
    pub fn merge(a: &RLArray, b: &RLArray) -> RLArray {
        let mut out = Vec::with_capacity(a.runs.len() + b.runs.len());
        let mut ai = a.runs.iter().peekable();
        let mut bi = b.runs.iter().peekable();
        loop {
            match (ai.peek(), bi.peek()) {
                (Some(&&(pa, _)), Some(&&(pb, _))) => {
                    if pa <= pb { out.push(*ai.next().unwrap()) } else { out.push(*bi.next().unwrap()) }
                }
                (Some(_), None) => out.push(*ai.next().unwrap()),
                (None, Some(_)) => out.push(*bi.next().unwrap()),
                (None, None) => break,
            }
        }
        RLArray { runs: out }
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.runs.iter().copied()
    }

    pub fn into_source(self) -> RLArraySource {
        RLArraySource { runs: self.runs, cursor: 0 }
    }
}

/// A consumable, owned iteration over an `RLArray`'s runs.
pub struct RLArraySource {
    runs: Vec<(u64, u64)>,
    cursor: usize,
}

impl Iterator for RLArraySource {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.runs.get(self.cursor).copied();
        if item.is_some() {
            self.cursor += 1;
        }
        item
    }
}

impl RankArraySource for RLArraySource {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_iterates_in_order() {
        let ra = RLArray::from_runs(vec![(0, 3), (5, 1), (10, 4)]);
        let mut source = ra.into_source();
        source.open();
        assert_eq!(source.next(), Some((0, 3)));
        assert_eq!(source.next(), Some((5, 1)));
        assert_eq!(source.next(), Some((10, 4)));
        assert_eq!(source.next(), None);
        source.close();
    }

    #[test]
    fn merge_is_position_ordered_union() {
        let a = RLArray::from_runs(vec![(0, 1), (4, 2)]);
        let b = RLArray::from_runs(vec![(1, 5), (6, 1)]);
        let merged = RLArray::merge(&a, &b);
        let positions: Vec<u64> = merged.iter().map(|(p, _)| p).collect();
        assert_eq!(positions, vec![0, 1, 4, 6]);
    }
}
