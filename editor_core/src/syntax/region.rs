//! Region index: the offset intervals occupied by multi-line constructs.
//!
//! Regions are half-open `[start, end)` character ranges. The index keeps
//! them pairwise disjoint, which lets an ordered map keyed by `start` answer
//! "what does this edit touch" with a single range probe.

use super::token::MultilineKind;
use crate::error::HighlightError;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

/// An offset interval occupied by one multi-line construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub kind: MultilineKind,
}

impl Region {
    /// Creates a region. `start` must be less than `end`.
    pub fn new(start: usize, end: usize, kind: MultilineKind) -> Self {
        debug_assert!(start < end, "region start {} must be less than end {}", start, end);
        Self { start, end, kind }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns true if the two half-open ranges share at least one offset.
    pub fn intersects(&self, range: &Range<usize>) -> bool {
        self.start < range.end && range.start < self.end
    }

    /// Orders two regions, treating any overlap as equality.
    ///
    /// This is not a total order: with `a` overlapping `b` and `b`
    /// overlapping `c`, `a == b == c` holds even when `a < c`. It is only
    /// meaningful between disjoint regions, or between a stored region and a
    /// probe.
    pub fn probe_cmp(&self, other: &Region) -> Ordering {
        if self.intersects(&other.range()) {
            return Ordering::Equal;
        }
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }

    fn shifted(self, delta: isize) -> Self {
        Self {
            start: self.start.saturating_add_signed(delta),
            end: self.end.saturating_add_signed(delta),
            kind: self.kind,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}, {})", self.kind, self.start, self.end)
    }
}

/// Ordered set of disjoint regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionIndex {
    regions: BTreeMap<usize, Region>,
}

impl RegionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates the regions in start order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> + '_ {
        self.regions.values()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Returns a region overlapping `range`, if any.
    pub fn find_intersecting(&self, range: Range<usize>) -> Option<Region> {
        // Disjoint regions sorted by start are also sorted by end, so the
        // last region starting before `range.end` is the only candidate.
        self.regions
            .range(..range.end)
            .next_back()
            .map(|(_, region)| *region)
            .filter(|region| region.intersects(&range))
    }

    /// Iterates every region overlapping `range`, last first.
    pub fn intersecting(&self, range: Range<usize>) -> impl Iterator<Item = &Region> + '_ {
        let start = range.start;
        self.regions
            .range(..range.end)
            .rev()
            .map(|(_, region)| region)
            .take_while(move |region| region.end > start)
    }

    /// Removes and returns every region overlapping `range`, in start order.
    pub fn remove_intersecting(&mut self, range: Range<usize>) -> Vec<Region> {
        let mut removed = Vec::new();
        while let Some(region) = self.find_intersecting(range.clone()) {
            self.regions.remove(&region.start);
            removed.push(region);
        }
        removed.reverse();
        removed
    }

    /// Adds a region that must not overlap any stored region.
    pub fn insert(&mut self, region: Region) -> Result<(), HighlightError> {
        if let Some(existing) = self.find_intersecting(region.range()) {
            return Err(HighlightError::OverlappingRegion { region, existing });
        }
        self.regions.insert(region.start, region);
        Ok(())
    }

    /// Shifts every region starting at or after `offset` by `delta`.
    pub fn shift_from(&mut self, offset: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let tail = self.regions.split_off(&offset);
        for region in tail.into_values() {
            let region = region.shifted(delta);
            self.regions.insert(region.start, region);
        }
    }

    /// Drops every region starting at or after `offset`.
    pub fn remove_from(&mut self, offset: usize) -> usize {
        self.regions.split_off(&offset).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(start: usize, end: usize) -> Region {
        Region::new(start, end, MultilineKind::Comment)
    }

    #[test]
    fn test_probe_cmp_basic() {
        assert_eq!(region(0, 1).probe_cmp(&region(0, 1)), Ordering::Equal);
        assert_eq!(region(0, 1).probe_cmp(&region(1, 2)), Ordering::Less);
        assert_eq!(region(1, 2).probe_cmp(&region(0, 1)), Ordering::Greater);
    }

    #[test]
    fn test_probe_cmp_intersect() {
        // One encloses the other.
        assert_eq!(region(0, 1).probe_cmp(&region(0, 2)), Ordering::Equal);
        assert_eq!(region(0, 2).probe_cmp(&region(0, 1)), Ordering::Equal);

        // Overlap by one character.
        assert_eq!(region(0, 2).probe_cmp(&region(1, 3)), Ordering::Equal);
        assert_eq!(region(1, 3).probe_cmp(&region(0, 2)), Ordering::Equal);

        // Touching is not overlapping.
        assert_eq!(region(0, 2).probe_cmp(&region(2, 5)), Ordering::Less);
        assert_eq!(region(3, 5).probe_cmp(&region(0, 2)), Ordering::Greater);
    }

    #[test]
    fn test_find_intersecting() {
        let mut index = RegionIndex::new();
        index.insert(region(2, 6)).unwrap();
        index.insert(region(10, 14)).unwrap();

        assert_eq!(index.find_intersecting(0..2), None);
        assert_eq!(index.find_intersecting(0..3), Some(region(2, 6)));
        assert_eq!(index.find_intersecting(6..10), None);
        assert_eq!(index.find_intersecting(13..20), Some(region(10, 14)));
        assert_eq!(index.find_intersecting(5..6), Some(region(2, 6)));

        let both: Vec<_> = index.intersecting(4..11).copied().collect();
        assert_eq!(both, vec![region(10, 14), region(2, 6)]);
        assert_eq!(index.intersecting(6..10).count(), 0);
    }

    #[test]
    fn test_remove_intersecting_returns_start_order() {
        let mut index = RegionIndex::new();
        index.insert(region(0, 3)).unwrap();
        index.insert(region(5, 8)).unwrap();
        index.insert(region(9, 12)).unwrap();
        index.insert(region(20, 25)).unwrap();

        let removed = index.remove_intersecting(2..10);
        assert_eq!(removed, vec![region(0, 3), region(5, 8), region(9, 12)]);
        assert_eq!(index.len(), 1);
        assert!(index.remove_intersecting(2..10).is_empty());
    }

    #[test]
    fn test_insert_overlap_fails() {
        let mut index = RegionIndex::new();
        index.insert(region(4, 8)).unwrap();

        let err = index.insert(region(7, 9)).unwrap_err();
        assert_eq!(
            err,
            HighlightError::OverlappingRegion {
                region: region(7, 9),
                existing: region(4, 8),
            }
        );
        assert!(index.insert(region(8, 9)).is_ok());
    }

    #[test]
    fn test_shift_from() {
        let mut index = RegionIndex::new();
        index.insert(region(0, 4)).unwrap();
        index.insert(region(10, 14)).unwrap();
        index.insert(region(20, 24)).unwrap();

        index.shift_from(10, 3);
        let starts: Vec<_> = index.iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(starts, vec![(0, 4), (13, 17), (23, 27)]);

        index.shift_from(13, -5);
        let starts: Vec<_> = index.iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(starts, vec![(0, 4), (8, 12), (18, 22)]);
    }

    #[test]
    fn test_remove_from() {
        let mut index = RegionIndex::new();
        index.insert(region(0, 4)).unwrap();
        index.insert(region(10, 14)).unwrap();
        index.insert(region(20, 24)).unwrap();

        assert_eq!(index.remove_from(10), 2);
        assert_eq!(index.iter().count(), 1);
    }
}
