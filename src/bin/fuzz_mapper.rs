//! AFL fuzz harness for the hierarchy mapper
//!
//! Drives both range set backends with the same expand/collapse stream and
//! checks after every step:
//! 1. Agreement: both backends hold identical ranges
//! 2. Size: the tree size equals the root count plus all expanded children
//! 3. Coverage: the full window resolves every row exactly once

use std::collections::BTreeMap;

use afl::fuzz;
use canopy::mapper::HierarchyMapper;
use canopy::range_set::{RangeSet, SortedRanges};

#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Expand { row_frac: u8, count: u8 },
    Collapse { row_frac: u8 },
    Reset { root_size: u8 },
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        let (&tag, rest) = bytes.split_first()?;
        return match tag % 8 {
            0..=4 if rest.len() >= 2 => Some((
                FuzzOp::Expand {
                    row_frac: rest[0],
                    count: rest[1] % 16,
                },
                &rest[2..],
            )),
            5 | 6 if !rest.is_empty() => Some((FuzzOp::Collapse { row_frac: rest[0] }, &rest[1..])),
            7 if !rest.is_empty() => Some((FuzzOp::Reset { root_size: rest[0] % 32 }, &rest[1..])),
            _ => None,
        };
    }
}

fn pick_row(row_frac: u8, len: usize) -> usize {
    return (row_frac as usize * len / 256).min(len.saturating_sub(1));
}

fn check<S: RangeSet<u32>>(mapper: &HierarchyMapper<u32, S>, root_size: usize) {
    let size = mapper.tree_size();
    let children: usize = mapper.ranges().filter(|range| !range.is_root()).map(|range| range.len()).sum();
    assert_eq!(size, root_size + children, "size mismatch");

    if size == 0 {
        return;
    }
    let mut seen = vec![false; size];
    for query in mapper.split_range_to_level_queries(0, size - 1) {
        for (index, _) in query.merge(0..query.local_size) {
            assert!(!seen[index], "row {index} resolved twice");
            seen[index] = true;
        }
    }
    assert!(seen.iter().all(|&row| row), "row left unresolved");
}

fn main() {
    fuzz!(|data: &[u8]| {
        let mut root_size = 8;
        let mut tree: HierarchyMapper<u32, BTreeMap<usize, _>> = HierarchyMapper::with_root_size(root_size);
        let mut sorted: HierarchyMapper<u32, SortedRanges<u32>> = HierarchyMapper::with_root_size(root_size);
        let mut next_key = 0;
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;

            match op {
                FuzzOp::Expand { row_frac, count } => {
                    let len = tree.tree_size();
                    if len == 0 {
                        continue;
                    }
                    let row = pick_row(row_frac, len);
                    let expected = tree.expand(next_key, row, count as usize);
                    assert_eq!(sorted.expand(next_key, row, count as usize), expected);
                    next_key += 1;
                }
                FuzzOp::Collapse { row_frac } => {
                    let row = pick_row(row_frac, tree.tree_size());
                    let expected = tree.collapse(row);
                    assert_eq!(sorted.collapse(row), expected);
                }
                FuzzOp::Reset { root_size: size } => {
                    root_size = size as usize;
                    tree.reset(root_size);
                    sorted.reset(root_size);
                }
            }

            assert!(tree.ranges().eq(sorted.ranges()), "backends diverged");
            check(&tree, root_size);
        }
    });
}
