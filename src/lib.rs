//! Canopy - flat row indexing for lazily expanded trees.
//!
//! A tree view shows a hierarchy as one flat list of rows. Expanding an item
//! inserts its children right after it; collapsing removes them again, along
//! with anything expanded underneath. Canopy tracks which rows are expanded
//! without ever loading the whole tree, and turns a window of flat rows into
//! one paged child query per expanded level.
//!
//! # Quick Start
//!
//! ```
//! use canopy::mapper::HierarchyMapper;
//!
//! let mut mapper: HierarchyMapper<u32> = HierarchyMapper::with_root_size(3);
//! mapper.expand(7, 0, 2).unwrap();
//!
//! // Rows 1 and 2 now belong to item 7; the old roots moved to 3 and 4.
//! let queries = mapper.split_range_to_level_queries(0, 4);
//! assert_eq!(queries.len(), 2);
//!
//! let roots: Vec<_> = queries[0].merge(["a", "b", "c"]).collect();
//! assert_eq!(roots, vec![(0, "a"), (3, "b"), (4, "c")]);
//! ```
//!
//! # Modules
//!
//! - `range`, `range_set`: expanded ranges and the ordered set holding them
//! - `mapper`: expand/collapse bookkeeping and window decomposition
//! - `query`: level queries and merging fetched children into flat rows
//! - `source`, `memory`: the data source trait and an in-memory hierarchy
//! - `view`: a flattened view driving all of the above

pub mod error;
pub mod mapper;
pub mod memory;
pub mod query;
pub mod range;
pub mod range_set;
pub mod source;
pub mod view;

pub use error::Error;
pub use error::Result;
pub use mapper::HierarchyMapper;
pub use query::LevelQuery;
pub use range::Range;
pub use source::DataSource;
pub use view::FlatView;
