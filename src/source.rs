//! The data source a flat view pulls children from.

use std::hash::Hash;

use crate::error::Result;

/// A request for the children of one parent.
#[derive(Debug)]
pub struct HierQuery<'a, T, F> {
    /// `None` asks for the root items.
    pub parent: Option<&'a T>,
    pub filter: Option<&'a F>,
    pub offset: usize,
    pub limit: usize,
}

impl<'a, T, F> HierQuery<'a, T, F> {
    /// All children of `parent`, unpaged.
    pub fn children_of(parent: Option<&'a T>, filter: Option<&'a F>) -> HierQuery<'a, T, F> {
        return HierQuery {
            parent,
            filter,
            offset: 0,
            limit: usize::MAX,
        };
    }

    pub fn page(self, offset: usize, limit: usize) -> HierQuery<'a, T, F> {
        return HierQuery { offset, limit, ..self };
    }
}

impl<T, F> Clone for HierQuery<'_, T, F> {
    fn clone(&self) -> Self {
        return *self;
    }
}

impl<T, F> Copy for HierQuery<'_, T, F> {}

/// Supplies child counts and paged children for a hierarchy.
///
/// Sorting and filtering are the source's business; the mapper only needs
/// counts and ordered pages to agree with each other for the same filter.
pub trait DataSource {
    type Item: Clone + Eq + Hash;
    type Filter;

    fn has_children(&self, item: &Self::Item) -> Result<bool>;

    /// Number of children matching the query's filter. Paging is ignored.
    fn child_count(&self, query: &HierQuery<'_, Self::Item, Self::Filter>) -> Result<usize>;

    /// The filtered children, skipping `offset` and taking at most `limit`.
    fn fetch_children(&self, query: &HierQuery<'_, Self::Item, Self::Filter>) -> Result<Vec<Self::Item>>;
}
