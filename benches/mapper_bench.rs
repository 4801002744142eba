// Benchmarks for the hierarchy mapper on both range set backends.
//
// Each mapper is grown by expanding random collapsed rows, then measured on
// window decomposition, toggles and the full view fetch path.

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use canopy::Range;
use canopy::mapper::HierarchyMapper;
use canopy::memory::{HierarchyData, InMemorySource};
use canopy::range_set::{RangeSet, SortedRanges};
use canopy::view::FlatView;

const ROOTS: usize = 1_000;
const FAN_OUT: usize = 8;

type TreeMapper = HierarchyMapper<u32, BTreeMap<usize, Range<u32>>>;
type SortedMapper = HierarchyMapper<u32, SortedRanges<u32>>;

// =============================================================================
// Benchmark Helpers
// =============================================================================

/// Expand `expansions` random rows. Keys are only unique, not meaningful.
fn grow<S: RangeSet<u32>>(expansions: usize, seed: u64) -> HierarchyMapper<u32, S> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut mapper = HierarchyMapper::with_root_size(ROOTS);
    let mut key = 0;
    while mapper.expanded_count() < expansions {
        let row = rng.gen_range(0..mapper.tree_size());
        if mapper.expand(key, row, FAN_OUT).is_ok() {
            key += 1;
        }
    }
    return mapper;
}

/// A two-level hierarchy: `ROOTS` roots with `FAN_OUT` children each.
fn source() -> InMemorySource<u32> {
    let mut builder = HierarchyData::builder();
    for root in 0..ROOTS as u32 {
        builder.add_item(None, root).unwrap();
        let children = (0..FAN_OUT as u32).map(|child| ROOTS as u32 + root * FAN_OUT as u32 + child);
        builder.add_items(Some(&root), children).unwrap();
    }
    return InMemorySource::new(builder.build());
}

// =============================================================================
// Window Decomposition
// =============================================================================

fn bench_split_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_window");

    for expansions in [10, 100, 1000] {
        let tree: TreeMapper = grow(expansions, 7);
        let sorted: SortedMapper = grow(expansions, 7);
        let middle = tree.tree_size() / 2;
        group.throughput(Throughput::Elements(50));

        group.bench_with_input(BenchmarkId::new("btree", expansions), &tree, |b, mapper| {
            b.iter(|| black_box(mapper.split_range_to_level_queries(middle, middle + 49).len()));
        });
        group.bench_with_input(BenchmarkId::new("sorted", expansions), &sorted, |b, mapper| {
            b.iter(|| black_box(mapper.split_range_to_level_queries(middle, middle + 49).len()));
        });
    }

    group.finish();
}

// =============================================================================
// Expand and Collapse
// =============================================================================

fn bench_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle");

    for expansions in [10, 100, 1000] {
        let tree: TreeMapper = grow(expansions, 11);
        let sorted: SortedMapper = grow(expansions, 11);

        group.bench_with_input(BenchmarkId::new("btree", expansions), &tree, |b, mapper| {
            let mut mapper = mapper.clone();
            let last = mapper.tree_size() - 1;
            b.iter(|| {
                mapper.expand(u32::MAX, last, FAN_OUT).unwrap();
                black_box(mapper.collapse(last).unwrap())
            });
        });
        group.bench_with_input(BenchmarkId::new("sorted", expansions), &sorted, |b, mapper| {
            let mut mapper = mapper.clone();
            let last = mapper.tree_size() - 1;
            b.iter(|| {
                mapper.expand(u32::MAX, last, FAN_OUT).unwrap();
                black_box(mapper.collapse(last).unwrap())
            });
        });
    }

    group.finish();
}

// =============================================================================
// Full View Fetch
// =============================================================================

fn bench_view_fetch(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_fetch");

    let mut view = FlatView::new(source()).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let root = rng.gen_range(0..ROOTS as u32);
        if view.is_expanded(&root) {
            continue;
        }
        let row = view.fetch(0, view.len() - 1).unwrap().into_iter().position(|row| row.item == root).unwrap();
        view.expand(root, row).unwrap();
    }

    for window in [20, 100, 500] {
        group.throughput(Throughput::Elements(window as u64));
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &window| {
            let first = view.len() / 3;
            b.iter(|| black_box(view.fetch(first, first + window - 1).unwrap().len()));
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_split_window, bench_toggle, bench_view_fetch);

criterion_main!(benches);
