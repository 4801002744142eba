//! A contiguous block of flat rows owned by one expanded parent.

/// One expanded level of the flattened tree.
///
/// The span `[start, end)` covers the parent's direct children plus every
/// row of their expanded descendants. `len` is the number of direct
/// children the range was created with; nested expansions grow the span
/// but never `len`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Range<K> {
    pub(crate) parent_key: Option<K>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) len: usize,
}

impl<K> Range<K> {
    /// A range of `len` children starting at flat row `start`.
    pub fn new(parent_key: Option<K>, start: usize, len: usize) -> Range<K> {
        return Range {
            parent_key,
            start,
            end: start + len,
            len,
        };
    }

    /// Key of the expanded item, `None` for the root list.
    pub fn parent_key(&self) -> Option<&K> {
        return self.parent_key.as_ref();
    }

    pub fn is_root(&self) -> bool {
        return self.parent_key.is_none();
    }

    /// First flat row of the range.
    pub fn start(&self) -> usize {
        return self.start;
    }

    /// One past the last flat row of the range.
    pub fn end(&self) -> usize {
        return self.end;
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// Number of flat rows covered, nested expansions included.
    pub fn span(&self) -> usize {
        return self.end - self.start;
    }

    /// Whether flat row `row` lies inside the span.
    pub fn contains_row(&self, row: usize) -> bool {
        return self.start <= row && row < self.end;
    }

    /// Whether `other` is a strict descendant of this range.
    ///
    /// A range's parent row sits at `start - 1`, so `other` descends from
    /// `self` exactly when that row lies in our span.
    pub fn encloses(&self, other: &Range<K>) -> bool {
        return self.start < other.start && other.start <= self.end;
    }

    pub(crate) fn shift_up(&mut self, by: usize) {
        self.start += by;
        self.end += by;
    }

    pub(crate) fn shift_down(&mut self, by: usize) {
        self.start -= by;
        self.end -= by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_and_len() {
        let range: Range<u32> = Range::new(Some(7), 3, 4);
        assert_eq!(range.start(), 3);
        assert_eq!(range.end(), 7);
        assert_eq!(range.span(), 4);
        assert_eq!(range.len(), 4);
        assert!(!range.is_root());
        assert_eq!(range.parent_key(), Some(&7));
    }

    #[test]
    fn row_containment() {
        let range: Range<u32> = Range::new(None, 0, 3);
        assert!(range.contains_row(0));
        assert!(range.contains_row(2));
        assert!(!range.contains_row(3));
    }

    #[test]
    fn enclosing() {
        let root: Range<u32> = Range::new(None, 0, 5);
        // Children of row 4, the last row of the root.
        let child = Range::new(Some(4), 5, 2);
        assert!(root.encloses(&child));
        assert!(!child.encloses(&root));

        // Empty expansion of the last row still descends from the root.
        let empty = Range::new(Some(4), 5, 0);
        assert!(root.encloses(&empty));
        assert!(empty.is_empty());
    }

    #[test]
    fn shifting() {
        let mut range: Range<u32> = Range::new(Some(1), 2, 3);
        range.shift_up(4);
        assert_eq!((range.start(), range.end()), (6, 9));
        range.shift_down(4);
        assert_eq!((range.start(), range.end()), (2, 5));
    }
}
