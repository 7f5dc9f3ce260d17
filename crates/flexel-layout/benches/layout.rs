//! Benchmarks for layout passes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flexel_layout::{
    Direction, FlexDirection, LayoutTree, Length, MeasureFunc, NodeId, Size, Style, Wrap,
    UNDEFINED,
};

fn text_leaf(tree: &mut LayoutTree) -> NodeId {
    tree.new_leaf_with_measure(
        Style::new(),
        MeasureFunc::new(|width, _, _, _| {
            let width = if width.is_nan() { 120.0 } else { width.min(120.0) };
            Size::new(width, (120.0 / width.max(1.0)).ceil() * 14.0)
        }),
    )
}

/// A row of `n` flexible items, each wrapping a text leaf.
fn flat_tree(n: usize) -> (LayoutTree, NodeId) {
    let mut tree = LayoutTree::new();
    let mut style = Style::new();
    style.set_flex_direction(FlexDirection::Row);
    style.set_flex_wrap(Wrap::Wrap);
    style.set_width(Length::Point(1024.0));
    let root = tree.new_node_with_style(style);
    for index in 0..n {
        let mut item = Style::new();
        item.set_flex_grow(1.0);
        item.set_min_width(Length::Point(80.0));
        let child = tree.new_node_with_style(item);
        let leaf = text_leaf(&mut tree);
        tree.insert_child(child, leaf, 0).unwrap();
        tree.insert_child(root, child, index).unwrap();
    }
    (tree, root)
}

/// `depth` levels of nested containers with `fanout` children each.
fn nested_tree(depth: usize, fanout: usize) -> (LayoutTree, NodeId) {
    fn build(tree: &mut LayoutTree, depth: usize, fanout: usize, row: bool) -> NodeId {
        if depth == 0 {
            return text_leaf(tree);
        }
        let mut style = Style::new();
        if row {
            style.set_flex_direction(FlexDirection::Row);
        }
        style.set_flex_grow(1.0);
        let node = tree.new_node_with_style(style);
        for index in 0..fanout {
            let child = build(tree, depth - 1, fanout, !row);
            tree.insert_child(node, child, index).unwrap();
        }
        node
    }

    let mut tree = LayoutTree::new();
    let root = build(&mut tree, depth, fanout, true);
    (tree, root)
}

fn bench_flat_layout(c: &mut Criterion) {
    c.bench_function("layout_flat_100_items", |b| {
        b.iter_batched(
            || flat_tree(100),
            |(mut tree, root)| {
                tree.calculate_layout(root, black_box(UNDEFINED), UNDEFINED, Direction::Ltr)
                    .unwrap();
                tree
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_nested_layout(c: &mut Criterion) {
    c.bench_function("layout_nested_4x4", |b| {
        b.iter_batched(
            || nested_tree(4, 4),
            |(mut tree, root)| {
                tree.calculate_layout(root, black_box(800.0), 600.0, Direction::Ltr)
                    .unwrap();
                tree
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_cached_relayout(c: &mut Criterion) {
    let (mut tree, root) = nested_tree(4, 4);
    tree.calculate_layout(root, 800.0, 600.0, Direction::Ltr).unwrap();
    c.bench_function("relayout_clean_tree", |b| {
        b.iter(|| {
            tree.calculate_layout(root, black_box(800.0), 600.0, Direction::Ltr)
                .unwrap();
        });
    });
}

fn bench_dirty_leaf_relayout(c: &mut Criterion) {
    let (mut tree, root) = flat_tree(100);
    tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr).unwrap();
    let leaf = tree.child(tree.child(root, 50).unwrap(), 0).unwrap();
    c.bench_function("relayout_one_dirty_leaf", |b| {
        b.iter(|| {
            tree.mark_dirty(leaf).unwrap();
            tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr)
                .unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_flat_layout,
    bench_nested_layout,
    bench_cached_relayout,
    bench_dirty_leaf_relayout
);
criterion_main!(benches);
