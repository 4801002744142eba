//! A flattened, lazily expanded view over a [`DataSource`].
//!
//! The view is the glue between a rendering layer that thinks in flat rows
//! and a data source that thinks in parents and children. It applies toggle
//! messages to its [`HierarchyMapper`] and answers row windows by fetching
//! one page per expanded level.
//!
//! ```
//! use canopy::memory::{HierarchyData, InMemorySource};
//! use canopy::view::{FlatView, Toggle};
//!
//! let mut builder = HierarchyData::builder();
//! builder.add_items(None, ["docs", "src", "Cargo.toml"])?;
//! builder.add_items(Some(&"src"), ["lib.rs", "main.rs"])?;
//!
//! let mut view = FlatView::new(InMemorySource::new(builder.build()))?;
//! view.toggle(Toggle { row_key: "src", row_index: 1, collapse: false })?;
//!
//! let rows: Vec<_> = view.fetch(0, 4)?.into_iter().map(|row| (row.index, row.item)).collect();
//! assert_eq!(rows, vec![(0, "docs"), (1, "src"), (2, "lib.rs"), (3, "main.rs"), (4, "Cargo.toml")]);
//! # Ok::<(), canopy::Error>(())
//! ```

use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::mapper::HierarchyMapper;
use crate::source::DataSource;
use crate::source::HierQuery;

/// One visible row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row<T> {
    pub index: usize,
    /// Nesting level, roots are 0.
    pub depth: usize,
    pub item: T,
    pub expanded: bool,
}

/// Expand/collapse request as sent by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toggle<T> {
    pub row_key: T,
    pub row_index: usize,
    pub collapse: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Rows inserted after the toggled row.
    Expanded(usize),
    /// Rows removed after the toggled row.
    Collapsed(usize),
}

impl ToggleOutcome {
    /// Signed change of the view length, saturating at the `isize` bounds.
    pub fn delta(&self) -> isize {
        return match *self {
            ToggleOutcome::Expanded(rows) => isize::try_from(rows).unwrap_or(isize::MAX),
            ToggleOutcome::Collapsed(rows) => isize::try_from(rows).map_or(isize::MIN, |rows| -rows),
        };
    }
}

pub struct FlatView<S: DataSource> {
    source: S,
    filter: Option<S::Filter>,
    mapper: HierarchyMapper<S::Item>,
}

impl<S: DataSource> FlatView<S> {
    /// A view showing the root items, all collapsed.
    pub fn new(source: S) -> Result<FlatView<S>> {
        return FlatView::build(source, None);
    }

    pub fn with_filter(source: S, filter: S::Filter) -> Result<FlatView<S>> {
        return FlatView::build(source, Some(filter));
    }

    fn build(source: S, filter: Option<S::Filter>) -> Result<FlatView<S>> {
        let mut view = FlatView {
            source,
            filter,
            mapper: HierarchyMapper::new(),
        };
        view.refresh_all()?;
        return Ok(view);
    }

    pub fn source(&self) -> &S {
        return &self.source;
    }

    pub fn mapper(&self) -> &HierarchyMapper<S::Item> {
        return &self.mapper;
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        return self.mapper.tree_size();
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    pub fn is_expanded(&self, item: &S::Item) -> bool {
        return !self.mapper.is_collapsed(item);
    }

    /// Nesting level of the children of an expanded `item`.
    ///
    /// A root item's children sit at level 1. Collapsed items have no level
    /// and fail with `KeyNotExpanded`.
    pub fn depth_of(&self, item: &S::Item) -> Result<usize> {
        return self.mapper.depth(Some(item));
    }

    /// Drop all expansion state and reload the root count.
    pub fn refresh_all(&mut self) -> Result<()> {
        let roots = HierQuery::children_of(None, self.filter.as_ref());
        let root_size = self.source.child_count(&roots)?;
        self.mapper.reset(root_size);
        return Ok(());
    }

    /// Replace the filter. Expansion state does not survive a filter change.
    pub fn set_filter(&mut self, filter: Option<S::Filter>) -> Result<()> {
        self.filter = filter;
        return self.refresh_all();
    }

    /// Expand `item`, shown at flat row `row`. Returns the rows inserted.
    pub fn expand(&mut self, item: S::Item, row: usize) -> Result<usize> {
        let query = HierQuery::children_of(Some(&item), self.filter.as_ref());
        let child_count = self.source.child_count(&query)?;
        return self.mapper.expand(item, row, child_count);
    }

    /// Collapse the item at flat row `row`. Returns the rows removed.
    pub fn collapse(&mut self, row: usize) -> Result<usize> {
        return self.mapper.collapse(row);
    }

    /// Apply a client toggle.
    ///
    /// When the toggle shows the client disagrees with us about the rows,
    /// the view is rebuilt from scratch before the error is returned.
    pub fn toggle(&mut self, toggle: Toggle<S::Item>) -> Result<ToggleOutcome> {
        let row = toggle.row_index;
        let outcome = if toggle.collapse {
            self.collapse(row).map(ToggleOutcome::Collapsed)
        } else {
            self.expand(toggle.row_key, row).map(ToggleOutcome::Expanded)
        };

        return match outcome {
            Err(error) if error.is_desync() => {
                #[cfg(feature = "tracing")]
                tracing::warn!(row, %error, "toggle out of sync, rebuilding view");

                self.refresh_all()?;
                Err(error)
            }
            other => other,
        };
    }

    /// Rows `first..=last`, sorted by index. Rows past the end are omitted.
    pub fn fetch(&self, first: usize, last: usize) -> Result<Vec<Row<S::Item>>> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("fetch", first, last).entered();

        let expanded: FxHashSet<&S::Item> = self.mapper.ranges().filter_map(|range| range.parent_key()).collect();
        let mut rows = Vec::new();
        for query in self.mapper.split_range_to_level_queries(first, last) {
            let request = HierQuery::children_of(query.parent_key(), self.filter.as_ref())
                .page(query.child_offset, query.local_size);
            let items = self.source.fetch_children(&request)?;
            for (index, item) in query.merge(items) {
                rows.push(Row {
                    index,
                    depth: query.depth,
                    expanded: expanded.contains(&item),
                    item,
                });
            }
        }

        rows.sort_by_key(|row| row.index);
        return Ok(rows);
    }
}
