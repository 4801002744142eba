//! Error type shared by the mapper, the data sources and the view.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A child range already starts right after this row.
    #[error("row {row} is already expanded")]
    AlreadyExpanded { row: usize },

    /// No child range starts right after this row.
    #[error("row {row} is not expanded")]
    NotExpanded { row: usize },

    /// Lookup by key found no expanded range.
    #[error("no expanded range for the given key")]
    KeyNotExpanded,

    #[error("row {row} is out of bounds for a tree of {len} rows")]
    RowOutOfBounds { row: usize, len: usize },

    /// Expanding would grow the tree past `usize::MAX` rows.
    #[error("cannot add {child_count} rows to a tree of {len} rows")]
    TooManyRows { len: usize, child_count: usize },

    /// The data source does not contain the requested item.
    #[error("item is not part of the hierarchy")]
    UnknownItem,

    #[error("parent must be added before its children")]
    MissingParent,

    #[error("item was already added to the hierarchy")]
    DuplicateItem,
}

impl Error {
    /// Errors caused by the caller's view of the rows drifting from ours.
    ///
    /// The only sound recovery is discarding the flattened state and
    /// rebuilding it from the data source.
    #[must_use]
    pub fn is_desync(&self) -> bool {
        return matches!(
            self,
            Error::AlreadyExpanded { .. } | Error::NotExpanded { .. } | Error::RowOutOfBounds { .. }
        );
    }
}
