//! In-memory hierarchies and a data source over them.
//!
//! ```
//! use canopy::memory::{HierarchyData, InMemorySource};
//!
//! let mut builder = HierarchyData::builder();
//! builder.add_items(None, ["fruit", "veg"])?;
//! builder.add_items(Some(&"fruit"), ["apple", "pear"])?;
//! let data = builder.build();
//!
//! assert_eq!(data.children(Some(&"fruit"))?, &["apple", "pear"]);
//! assert_eq!(data.parent_of(&"pear")?, Some(&"fruit"));
//! let _source = InMemorySource::new(data);
//! # Ok::<(), canopy::Error>(())
//! ```

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::Error;
use crate::error::Result;
use crate::source::DataSource;
use crate::source::HierQuery;

/// Filter applied to children by [`InMemorySource`].
pub type Predicate<T> = Box<dyn Fn(&T) -> bool>;

#[derive(Clone, Debug)]
struct Node<T> {
    parent: Option<T>,
    children: Vec<T>,
}

/// Items with ordered children. Each item appears once.
#[derive(Clone, Debug)]
pub struct HierarchyData<T> {
    roots: Vec<T>,
    nodes: FxHashMap<T, Node<T>>,
}

impl<T: Clone + Eq + Hash> Default for HierarchyData<T> {
    fn default() -> Self {
        return HierarchyData {
            roots: Vec::new(),
            nodes: FxHashMap::default(),
        };
    }
}

impl<T: Clone + Eq + Hash> HierarchyData<T> {
    pub fn builder() -> HierarchyDataBuilder<T> {
        return HierarchyDataBuilder { data: HierarchyData::default() };
    }

    /// A flat hierarchy where every item is a root.
    pub fn from_roots<I: IntoIterator<Item = T>>(items: I) -> Result<HierarchyData<T>> {
        let mut builder = HierarchyData::builder();
        builder.add_items(None, items)?;
        return Ok(builder.build());
    }

    /// Children of `parent` in insertion order; `None` gives the roots.
    pub fn children(&self, parent: Option<&T>) -> Result<&[T]> {
        return match parent {
            None => Ok(&self.roots),
            Some(item) => self.nodes.get(item).map(|node| node.children.as_slice()).ok_or(Error::UnknownItem),
        };
    }

    /// Parent of `item`, `None` for roots.
    pub fn parent_of(&self, item: &T) -> Result<Option<&T>> {
        let node = self.nodes.get(item).ok_or(Error::UnknownItem)?;
        return Ok(node.parent.as_ref());
    }

    pub fn contains(&self, item: &T) -> bool {
        return self.nodes.contains_key(item);
    }

    /// Number of items, at any level.
    pub fn len(&self) -> usize {
        return self.nodes.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.nodes.is_empty();
    }
}

/// Builds a [`HierarchyData`] top-down.
#[derive(Clone, Debug)]
pub struct HierarchyDataBuilder<T> {
    data: HierarchyData<T>,
}

impl<T: Clone + Eq + Hash> HierarchyDataBuilder<T> {
    /// Append `item` to the children of `parent`.
    ///
    /// The parent must already be present and the item must be new.
    pub fn add_item(&mut self, parent: Option<&T>, item: T) -> Result<&mut Self> {
        if let Some(parent) = parent {
            if !self.data.contains(parent) {
                return Err(Error::MissingParent);
            }
        }
        if self.data.contains(&item) {
            return Err(Error::DuplicateItem);
        }

        match parent {
            None => self.data.roots.push(item.clone()),
            Some(parent) => {
                if let Some(node) = self.data.nodes.get_mut(parent) {
                    node.children.push(item.clone());
                }
            }
        }
        let node = Node {
            parent: parent.cloned(),
            children: Vec::new(),
        };
        self.data.nodes.insert(item, node);
        return Ok(self);
    }

    pub fn add_items<I: IntoIterator<Item = T>>(&mut self, parent: Option<&T>, items: I) -> Result<&mut Self> {
        for item in items {
            self.add_item(parent, item)?;
        }
        return Ok(self);
    }

    /// Add several parent/children groups, in iteration order.
    pub fn add_items_map<M, I>(&mut self, groups: M) -> Result<&mut Self>
    where
        M: IntoIterator<Item = (Option<T>, I)>,
        I: IntoIterator<Item = T>,
    {
        for (parent, items) in groups {
            self.add_items(parent.as_ref(), items)?;
        }
        return Ok(self);
    }

    pub fn build(self) -> HierarchyData<T> {
        return self.data;
    }
}

/// [`DataSource`] over an owned [`HierarchyData`].
pub struct InMemorySource<T> {
    data: HierarchyData<T>,
}

impl<T: Clone + Eq + Hash> InMemorySource<T> {
    pub fn new(data: HierarchyData<T>) -> InMemorySource<T> {
        return InMemorySource { data };
    }

    pub fn data(&self) -> &HierarchyData<T> {
        return &self.data;
    }

    fn filtered<'a>(&'a self, query: &HierQuery<'a, T, Predicate<T>>) -> Result<impl Iterator<Item = &'a T>> {
        let filter = query.filter;
        let children = self.data.children(query.parent)?;
        return Ok(children.iter().filter(move |child| filter.is_none_or(|keep| keep(*child))));
    }
}

impl<T: Clone + Eq + Hash> From<HierarchyData<T>> for InMemorySource<T> {
    fn from(data: HierarchyData<T>) -> Self {
        return InMemorySource::new(data);
    }
}

impl<T: Clone + Eq + Hash> DataSource for InMemorySource<T> {
    type Item = T;
    type Filter = Predicate<T>;

    fn has_children(&self, item: &T) -> Result<bool> {
        return Ok(!self.data.children(Some(item))?.is_empty());
    }

    fn child_count(&self, query: &HierQuery<'_, T, Predicate<T>>) -> Result<usize> {
        return Ok(self.filtered(query)?.count());
    }

    fn fetch_children(&self, query: &HierQuery<'_, T, Predicate<T>>) -> Result<Vec<T>> {
        let page = self.filtered(query)?.skip(query.offset).take(query.limit);
        return Ok(page.cloned().collect());
    }
}
