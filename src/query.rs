//! Per-level fetch requests and merging their results back into flat rows.

use smallvec::SmallVec;

use crate::range::Range;

/// A fetch scoped to one range's local index space.
///
/// Produced by [`HierarchyMapper::split_range_to_level_queries`]. The query
/// asks for `local_size` of the node's own children, starting at the
/// node-local flat row `local_start`. Nested expanded subtrees that fall
/// inside the window are listed in `excluded_subtrees`: their rows are
/// served by their own level query and skipped when merging.
///
/// [`HierarchyMapper::split_range_to_level_queries`]: crate::mapper::HierarchyMapper::split_range_to_level_queries
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelQuery<K> {
    pub node: Range<K>,
    /// First requested row, relative to `node.start()`.
    pub local_start: usize,
    pub local_size: usize,
    /// Index of the first requested child among the node's own children.
    pub child_offset: usize,
    pub depth: usize,
    pub excluded_subtrees: Vec<Range<K>>,
}

impl<K> LevelQuery<K> {
    /// Global flat row of the first requested child.
    pub fn first_row(&self) -> usize {
        return self.node.start + self.local_start;
    }

    /// Key of the parent whose children this query fetches.
    pub fn parent_key(&self) -> Option<&K> {
        return self.node.parent_key();
    }

    /// Pair each fetched child with its global flat row.
    ///
    /// `items` must be the children starting at `child_offset`, in order.
    /// The query is left untouched, so it can be merged more than once.
    pub fn merge<I>(&self, items: I) -> Merge<'_, K, I::IntoIter>
    where
        I: IntoIterator,
    {
        return Merge {
            next_index: self.first_row(),
            pending: self.excluded_subtrees.iter().collect(),
            items: items.into_iter(),
        };
    }
}

/// Iterator returned by [`LevelQuery::merge`], yields `(flat_row, item)`.
pub struct Merge<'q, K, I> {
    next_index: usize,
    pending: SmallVec<[&'q Range<K>; 4]>,
    items: I,
}

impl<K, I: Iterator> Iterator for Merge<'_, K, I> {
    type Item = (usize, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;

        // Jump over nested subtrees; each one is skipped at most once.
        while let Some(at) = self.pending.iter().position(|subtree| subtree.contains_row(self.next_index)) {
            let subtree = self.pending.remove(at);
            self.next_index = subtree.end;
        }

        let index = self.next_index;
        self.next_index += 1;
        return Some((index, item));
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return self.items.size_hint();
    }
}
