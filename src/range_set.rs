//! Ordered sets of [`Range`]s keyed by their start row.
//!
//! The mapper only talks to the [`RangeSet`] trait. Two backends are
//! provided:
//!
//! - `BTreeMap<usize, Range<K>>`: balanced ordered tree, the default.
//! - [`SortedRanges`]: a sorted `SmallVec`, cheaper while only a handful of
//!   rows are expanded.
//!
//! Starts are unique. Mutating closures handed to `update_*` must preserve
//! the relative order of the ranges they touch.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::range::Range;

pub trait RangeSet<K>: Default {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    fn clear(&mut self);

    /// Insert a range. Returns `false` and leaves the set untouched if a
    /// range with the same start already exists.
    fn insert(&mut self, range: Range<K>) -> bool;

    fn remove(&mut self, start: usize) -> Option<Range<K>>;

    fn get(&self, start: usize) -> Option<&Range<K>>;

    /// All ranges, ascending by start.
    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Range<K>>
    where
        K: 'a;

    /// Ranges starting strictly before `start`, ascending.
    fn before<'a>(&'a self, start: usize) -> impl Iterator<Item = &'a Range<K>>
    where
        K: 'a;

    /// Ranges starting strictly after `start`, ascending.
    fn after<'a>(&'a self, start: usize) -> impl Iterator<Item = &'a Range<K>>
    where
        K: 'a;

    /// First range (by start) matching the predicate. Linear scan.
    fn find<'a, F>(&'a self, mut pred: F) -> Option<&'a Range<K>>
    where
        K: 'a,
        F: FnMut(&Range<K>) -> bool,
    {
        return self.iter().find(|range| pred(range));
    }

    /// Drop every range for which `keep` returns false.
    fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Range<K>) -> bool;

    /// Mutate every range starting at or before `last`. The closure must
    /// not move `start`.
    fn update_through<F>(&mut self, last: usize, f: F)
    where
        F: FnMut(&mut Range<K>);

    /// Mutate every range starting strictly after `first`. The closure may
    /// move starts but must keep them ordered and above the untouched
    /// prefix.
    fn update_after<F>(&mut self, first: usize, f: F)
    where
        F: FnMut(&mut Range<K>);
}

impl<K> RangeSet<K> for BTreeMap<usize, Range<K>> {
    fn len(&self) -> usize {
        return BTreeMap::len(self);
    }

    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    fn insert(&mut self, range: Range<K>) -> bool {
        if self.contains_key(&range.start) {
            return false;
        }
        BTreeMap::insert(self, range.start, range);
        return true;
    }

    fn remove(&mut self, start: usize) -> Option<Range<K>> {
        return BTreeMap::remove(self, &start);
    }

    fn get(&self, start: usize) -> Option<&Range<K>> {
        return BTreeMap::get(self, &start);
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Range<K>>
    where
        K: 'a,
    {
        return self.values();
    }

    fn before<'a>(&'a self, start: usize) -> impl Iterator<Item = &'a Range<K>>
    where
        K: 'a,
    {
        return self.range(..start).map(|(_, range)| range);
    }

    fn after<'a>(&'a self, start: usize) -> impl Iterator<Item = &'a Range<K>>
    where
        K: 'a,
    {
        return self
            .range((std::ops::Bound::Excluded(start), std::ops::Bound::Unbounded))
            .map(|(_, range)| range);
    }

    fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Range<K>) -> bool,
    {
        BTreeMap::retain(self, |_, range| keep(range));
    }

    fn update_through<F>(&mut self, last: usize, mut f: F)
    where
        F: FnMut(&mut Range<K>),
    {
        for range in self.range_mut(..=last).map(|(_, range)| range) {
            f(range);
        }
    }

    fn update_after<F>(&mut self, first: usize, mut f: F)
    where
        F: FnMut(&mut Range<K>),
    {
        // Keys change, so the tail is detached and rekeyed.
        let Some(tail_start) = first.checked_add(1) else {
            return;
        };
        let tail = self.split_off(&tail_start);
        for (_, mut range) in tail {
            f(&mut range);
            BTreeMap::insert(self, range.start, range);
        }
    }
}

/// Array-backed range set, kept sorted by start.
#[derive(Clone, Debug)]
pub struct SortedRanges<K> {
    ranges: SmallVec<[Range<K>; 8]>,
}

impl<K> Default for SortedRanges<K> {
    fn default() -> Self {
        return SortedRanges { ranges: SmallVec::new() };
    }
}

impl<K> SortedRanges<K> {
    pub fn new() -> SortedRanges<K> {
        return SortedRanges::default();
    }

    /// Position of the first range whose start is `>= start`.
    fn lower_bound(&self, start: usize) -> usize {
        return self.ranges.partition_point(|range| range.start < start);
    }
}

impl<K> RangeSet<K> for SortedRanges<K> {
    fn len(&self) -> usize {
        return self.ranges.len();
    }

    fn clear(&mut self) {
        self.ranges.clear();
    }

    fn insert(&mut self, range: Range<K>) -> bool {
        let at = self.lower_bound(range.start);
        if self.ranges.get(at).is_some_and(|other| other.start == range.start) {
            return false;
        }
        self.ranges.insert(at, range);
        return true;
    }

    fn remove(&mut self, start: usize) -> Option<Range<K>> {
        let at = self.lower_bound(start);
        if self.ranges.get(at)?.start != start {
            return None;
        }
        return Some(self.ranges.remove(at));
    }

    fn get(&self, start: usize) -> Option<&Range<K>> {
        let at = self.lower_bound(start);
        return self.ranges.get(at).filter(|range| range.start == start);
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Range<K>>
    where
        K: 'a,
    {
        return self.ranges.iter();
    }

    fn before<'a>(&'a self, start: usize) -> impl Iterator<Item = &'a Range<K>>
    where
        K: 'a,
    {
        let end = self.lower_bound(start);
        return self.ranges[..end].iter();
    }

    fn after<'a>(&'a self, start: usize) -> impl Iterator<Item = &'a Range<K>>
    where
        K: 'a,
    {
        let from = self.ranges.partition_point(|range| range.start <= start);
        return self.ranges[from..].iter();
    }

    fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Range<K>) -> bool,
    {
        self.ranges.retain(|range| keep(range));
    }

    fn update_through<F>(&mut self, last: usize, mut f: F)
    where
        F: FnMut(&mut Range<K>),
    {
        let end = self.ranges.partition_point(|range| range.start <= last);
        for range in &mut self.ranges[..end] {
            f(range);
        }
    }

    fn update_after<F>(&mut self, first: usize, mut f: F)
    where
        F: FnMut(&mut Range<K>),
    {
        let from = self.ranges.partition_point(|range| range.start <= first);
        for range in &mut self.ranges[from..] {
            f(range);
        }
    }
}
