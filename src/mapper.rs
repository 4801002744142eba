//! Mapping between flat row indices and the expanded hierarchy.
//!
//! The mapper keeps one [`Range`] per expanded item plus one for the root
//! list, ordered by start row. Nothing else is stored: sizes, depths and
//! window decompositions are all derived from the range set.
//!
//! # Example
//!
//! ```
//! use canopy::mapper::HierarchyMapper;
//!
//! let mut mapper: HierarchyMapper<&str> = HierarchyMapper::new();
//! mapper.reset(3);
//!
//! // Row 0 gets two children, pushing rows 1 and 2 down to 3 and 4.
//! mapper.expand("item0", 0, 2).unwrap();
//! assert_eq!(mapper.tree_size(), 5);
//! assert_eq!(mapper.depth(Some(&"item0")).unwrap(), 1);
//!
//! assert_eq!(mapper.collapse(0).unwrap(), 2);
//! assert_eq!(mapper.tree_size(), 3);
//! ```

use std::collections::BTreeMap;
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::error::Error;
use crate::error::Result;
use crate::query::LevelQuery;
use crate::range::Range;
use crate::range_set::RangeSet;

/// Expansion state of one flattened tree view.
#[derive(Clone, Debug)]
pub struct HierarchyMapper<K, S = BTreeMap<usize, Range<K>>> {
    ranges: S,
    _key: PhantomData<K>,
}

impl<K, S> Default for HierarchyMapper<K, S>
where
    K: Clone + PartialEq,
    S: RangeSet<K>,
{
    fn default() -> Self {
        return HierarchyMapper::new();
    }
}

impl<K, S> HierarchyMapper<K, S>
where
    K: Clone + PartialEq,
    S: RangeSet<K>,
{
    /// A mapper over an empty root list.
    pub fn new() -> HierarchyMapper<K, S> {
        return HierarchyMapper::with_root_size(0);
    }

    pub fn with_root_size(root_size: usize) -> HierarchyMapper<K, S> {
        let mut mapper = HierarchyMapper {
            ranges: S::default(),
            _key: PhantomData,
        };
        mapper.reset(root_size);
        return mapper;
    }

    /// Forget every expansion and start over with `root_size` root rows.
    pub fn reset(&mut self, root_size: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(root_size, dropped = self.ranges.len().saturating_sub(1), "reset hierarchy");

        self.ranges.clear();
        self.ranges.insert(Range::new(None, 0, root_size));
    }

    /// Total number of flattened rows.
    pub fn tree_size(&self) -> usize {
        return self.ranges.iter().map(Range::len).sum();
    }

    /// Number of currently expanded items, the root list excluded.
    pub fn expanded_count(&self) -> usize {
        return self.ranges.len().saturating_sub(1);
    }

    /// All ranges ascending by start, the root first.
    pub fn ranges(&self) -> impl Iterator<Item = &Range<K>> {
        return self.ranges.iter();
    }

    pub fn is_collapsed(&self, key: &K) -> bool {
        return self.range_for_key(Some(key)).is_none();
    }

    /// The range holding the children of `key`, `None` meaning the root.
    pub fn range_for_key(&self, key: Option<&K>) -> Option<&Range<K>> {
        return self.ranges.find(|range| range.parent_key() == key);
    }

    /// Nesting level of the children of `key`; the root list is level 0.
    pub fn depth(&self, key: Option<&K>) -> Result<usize> {
        let node = self.range_for_key(key).ok_or(Error::KeyNotExpanded)?;
        let depth = self.ranges.before(node.start).filter(|other| other.encloses(node)).count();
        return Ok(depth);
    }

    /// Expand the item at flat row `row`, inserting `child_count` rows after it.
    ///
    /// Returns the number of inserted rows. On error nothing changes.
    pub fn expand(&mut self, parent_key: K, row: usize, child_count: usize) -> Result<usize> {
        let len = self.tree_size();
        if row >= len {
            return Err(Error::RowOutOfBounds { row, len });
        }
        // Every start and end is at most `len`, so this bounds all the
        // shifting below.
        if len.checked_add(child_count).is_none() {
            return Err(Error::TooManyRows { len, child_count });
        }
        let start = row + 1;
        if self.ranges.get(start).is_some() || !self.is_collapsed(&parent_key) {
            return Err(Error::AlreadyExpanded { row });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(row, child_count, "expand row");

        // Starts decide membership before anything moves: ranges after the
        // row shift, ranges at or before it grow if they contain the row.
        self.ranges.update_after(row, |range| range.shift_up(child_count));
        self.ranges.update_through(row, |range| {
            if range.contains_row(row) {
                range.end += child_count;
            }
        });
        self.ranges.insert(Range::new(Some(parent_key), start, child_count));

        return Ok(child_count);
    }

    /// Collapse the item at flat row `row`, dropping its whole subtree.
    ///
    /// Returns the number of removed rows, nested expansions included.
    pub fn collapse(&mut self, row: usize) -> Result<usize> {
        let start = row.checked_add(1).ok_or(Error::NotExpanded { row })?;
        let node = self.ranges.get(start).ok_or(Error::NotExpanded { row })?;
        let end = node.end;
        let removed = node.span();

        #[cfg(feature = "tracing")]
        tracing::debug!(row, removed, "collapse row");

        self.ranges.retain(|range| range.start < start || range.start > end);
        self.ranges.update_after(row, |range| range.shift_down(removed));
        self.ranges.update_through(row, |range| {
            if range.contains_row(row) {
                range.end -= removed;
            }
        });

        return Ok(removed);
    }

    /// Every range paired with its depth, in one pass over an ancestor stack.
    fn levels(&self) -> Vec<(&Range<K>, usize)> {
        let mut ancestors: SmallVec<[&Range<K>; 8]> = SmallVec::new();
        let mut levels = Vec::with_capacity(self.ranges.len());
        for range in self.ranges.iter() {
            while let Some(top) = ancestors.last() {
                if top.encloses(range) {
                    break;
                }
                ancestors.pop();
            }
            levels.push((range, ancestors.len()));
            ancestors.push(range);
        }
        return levels;
    }

    /// Split the inclusive flat window `[first_row, last_row]` into one
    /// query per intersecting level, ascending by range start.
    pub fn split_range_to_level_queries(&self, first_row: usize, last_row: usize) -> Vec<LevelQuery<K>> {
        if first_row > last_row {
            return Vec::new();
        }
        let window_end = last_row.saturating_add(1);
        let levels = self.levels();
        let mut queries = Vec::new();

        for (i, &(node, depth)) in levels.iter().enumerate() {
            if node.start >= window_end || node.end <= first_row {
                continue;
            }
            let mut start = node.start.max(first_row);
            let end = node.end.min(window_end);
            let mut excluded_rows = 0;
            let mut skipped_rows = 0;
            let mut excluded_subtrees = Vec::new();

            for &(child, child_depth) in &levels[i + 1..] {
                if child.start > node.end {
                    break;
                }
                if child_depth != depth + 1 || child.span() == 0 {
                    continue;
                }
                if child.end <= start {
                    skipped_rows += child.span();
                } else if child.start < start {
                    // The window begins inside this child's subtree.
                    skipped_rows += child.span();
                    start = child.end;
                } else if child.start < end {
                    excluded_rows += child.end.min(end) - child.start;
                    excluded_subtrees.push(child.clone());
                }
            }

            if start >= end {
                continue;
            }
            let local_size = end - start - excluded_rows;
            if local_size == 0 {
                continue;
            }
            let local_start = start - node.start;

            #[cfg(feature = "tracing")]
            tracing::trace!(node_start = node.start, local_start, local_size, depth, "level query");

            queries.push(LevelQuery {
                node: node.clone(),
                local_start,
                local_size,
                child_offset: local_start - skipped_rows,
                depth,
                excluded_subtrees,
            });
        }

        return queries;
    }
}
