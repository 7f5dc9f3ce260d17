//! Integration tests for flexel-layout.
//!
//! These tests build small trees through the public API and check computed layouts.

use flexel_layout::{
    Align, Config, Direction, Display, Edge, FlexDirection, FloatOptional, Justify, LayoutTree,
    Length, MeasureFunc, MeasureMode, NodeId, PrintOptions, Size, Style, Wrap, UNDEFINED,
};
use proptest::prelude::*;
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// Helpers
// =============================================================================

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn styled(tree: &mut LayoutTree, configure: impl FnOnce(&mut Style)) -> NodeId {
    let mut style = Style::new();
    configure(&mut style);
    tree.new_node_with_style(style)
}

fn append(tree: &mut LayoutTree, parent: NodeId, child: NodeId) {
    let index = tree.child_count(parent).unwrap();
    tree.insert_child(parent, child, index).unwrap();
}

fn rect(tree: &LayoutTree, id: NodeId) -> (f32, f32, f32, f32) {
    let layout = tree.layout(id).unwrap();
    (layout.left(), layout.top(), layout.width(), layout.height())
}

fn row(tree: &mut LayoutTree, width: f32, height: f32) -> NodeId {
    styled(tree, |s| {
        s.set_flex_direction(FlexDirection::Row);
        s.set_width(Length::Point(width));
        s.set_height(Length::Point(height));
    })
}

fn fixed(tree: &mut LayoutTree, width: f32, height: f32) -> NodeId {
    styled(tree, |s| {
        s.set_width(Length::Point(width));
        s.set_height(Length::Point(height));
    })
}

fn layout(tree: &mut LayoutTree, root: NodeId) {
    tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr).unwrap();
}

// =============================================================================
// Flexible lengths
// =============================================================================

#[test]
fn test_flex_grow_distributes_free_space() {
    init_logging();
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 120.0, 40.0);
    let items: Vec<NodeId> = [1.0, 1.0, 2.0]
        .into_iter()
        .map(|grow| styled(&mut tree, |s| s.set_flex_grow(grow)))
        .collect();
    for &item in &items {
        append(&mut tree, root, item);
    }
    layout(&mut tree, root);

    assert_eq!(rect(&tree, items[0]), (0.0, 0.0, 30.0, 40.0));
    assert_eq!(rect(&tree, items[1]), (30.0, 0.0, 30.0, 40.0));
    assert_eq!(rect(&tree, items[2]), (60.0, 0.0, 60.0, 40.0));
}

#[test]
fn test_zero_width_container_gives_zero_items() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 0.0, 40.0);
    let items: Vec<NodeId> = [1.0, 1.0, 2.0]
        .into_iter()
        .map(|grow| styled(&mut tree, |s| s.set_flex_grow(grow)))
        .collect();
    for &item in &items {
        append(&mut tree, root, item);
    }
    layout(&mut tree, root);

    for item in items {
        assert_eq!(tree.layout(item).unwrap().width(), 0.0);
    }
}

#[test]
fn test_max_width_freezes_item_and_redistributes() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 100.0, 10.0);
    let capped = styled(&mut tree, |s| {
        s.set_flex_grow(1.0);
        s.set_max_width(Length::Point(40.0));
    });
    let free = styled(&mut tree, |s| s.set_flex_grow(1.0));
    append(&mut tree, root, capped);
    append(&mut tree, root, free);
    layout(&mut tree, root);

    assert_eq!(rect(&tree, capped), (0.0, 0.0, 40.0, 10.0));
    assert_eq!(rect(&tree, free), (40.0, 0.0, 60.0, 10.0));
}

#[test]
fn test_flex_shrink_scales_by_basis() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 100.0, 10.0);
    let a = styled(&mut tree, |s| {
        s.set_width(Length::Point(80.0));
        s.set_flex_shrink(1.0);
    });
    let b = styled(&mut tree, |s| {
        s.set_width(Length::Point(80.0));
        s.set_flex_shrink(1.0);
    });
    append(&mut tree, root, a);
    append(&mut tree, root, b);
    layout(&mut tree, root);

    assert_eq!(rect(&tree, a), (0.0, 0.0, 50.0, 10.0));
    assert_eq!(rect(&tree, b), (50.0, 0.0, 50.0, 10.0));
}

// =============================================================================
// Percentages and measurement
// =============================================================================

#[test]
fn test_percent_width_resolves_against_owner() {
    let mut tree = LayoutTree::new();
    let root = fixed(&mut tree, 200.0, 100.0);
    let child = styled(&mut tree, |s| {
        s.set_width(Length::Percent(50.0));
        s.set_height(Length::Point(10.0));
    });
    append(&mut tree, root, child);
    layout(&mut tree, root);

    assert_eq!(rect(&tree, child), (0.0, 0.0, 100.0, 10.0));
}

#[test]
fn test_percent_width_without_owner_size_falls_back_to_measure() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let mut style = Style::new();
    style.set_width(Length::Percent(50.0));
    let leaf = tree.new_leaf_with_measure(style, MeasureFunc::new(|_, _, _, _| Size::new(40.0, 10.0)));
    append(&mut tree, root, leaf);
    layout(&mut tree, root);

    assert_eq!(rect(&tree, leaf), (0.0, 0.0, 40.0, 10.0));
    assert_eq!(rect(&tree, root), (0.0, 0.0, 40.0, 10.0));
}

#[test]
fn test_undefined_absorbs_arithmetic() {
    let sum = FloatOptional::UNDEFINED + 5.0;
    assert!(sum.is_undefined());
    assert!(Length::Percent(50.0).resolve(UNDEFINED).is_undefined());
    assert_eq!(Length::Percent(50.0).resolve(200.0), FloatOptional::new(100.0));
}

#[test]
fn test_measure_func_receives_layout_context() {
    struct Metrics {
        calls: usize,
    }

    let mut tree = LayoutTree::new();
    let root = fixed(&mut tree, 100.0, 100.0);
    let measure = MeasureFunc::with_context(|width, mode, _, _, ctx: &mut dyn Any| {
        if let Some(metrics) = ctx.downcast_mut::<Metrics>() {
            metrics.calls += 1;
        }
        let width = if mode == MeasureMode::Undefined { 30.0 } else { width.min(30.0) };
        Size::new(width, 12.0)
    });
    let leaf = tree.new_leaf_with_measure(Style::new(), measure);
    append(&mut tree, root, leaf);

    let mut metrics = Metrics { calls: 0 };
    tree.calculate_layout_with_context(root, UNDEFINED, UNDEFINED, Direction::Ltr, &mut metrics)
        .unwrap();

    assert!(metrics.calls > 0);
    // Stretched across the column, height from content.
    assert_eq!(rect(&tree, leaf), (0.0, 0.0, 100.0, 12.0));
}

#[test]
fn test_aspect_ratio_derives_cross_size() {
    let mut tree = LayoutTree::new();
    let root = fixed(&mut tree, 100.0, 100.0);
    let child = styled(&mut tree, |s| {
        s.set_width(Length::Point(50.0));
        s.set_aspect_ratio(2.0);
    });
    append(&mut tree, root, child);
    layout(&mut tree, root);

    assert_eq!(rect(&tree, child), (0.0, 0.0, 50.0, 25.0));
}

// =============================================================================
// Alignment
// =============================================================================

#[test]
fn test_justify_content_modes() {
    let cases = [
        (Justify::FlexStart, [0.0, 20.0]),
        (Justify::Center, [30.0, 50.0]),
        (Justify::FlexEnd, [60.0, 80.0]),
        (Justify::SpaceBetween, [0.0, 80.0]),
        (Justify::SpaceAround, [15.0, 65.0]),
        (Justify::SpaceEvenly, [20.0, 60.0]),
    ];
    for (justify, expected) in cases {
        let mut tree = LayoutTree::new();
        let root = row(&mut tree, 100.0, 100.0);
        tree.update_style(root, |s| s.set_justify_content(justify)).unwrap();
        let a = fixed(&mut tree, 20.0, 20.0);
        let b = fixed(&mut tree, 20.0, 20.0);
        append(&mut tree, root, a);
        append(&mut tree, root, b);
        layout(&mut tree, root);

        let lefts = [tree.layout(a).unwrap().left(), tree.layout(b).unwrap().left()];
        assert_eq!(lefts, expected, "{justify}");
    }
}

#[test]
fn test_align_items_positions_cross_axis() {
    for (align, left) in [(Align::FlexStart, 0.0), (Align::Center, 40.0), (Align::FlexEnd, 80.0)] {
        let mut tree = LayoutTree::new();
        let root = fixed(&mut tree, 100.0, 100.0);
        tree.update_style(root, |s| s.set_align_items(align)).unwrap();
        let child = fixed(&mut tree, 20.0, 20.0);
        append(&mut tree, root, child);
        layout(&mut tree, root);
        assert_eq!(tree.layout(child).unwrap().left(), left, "{align}");
    }
}

#[test]
fn test_auto_margins_center_item() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 100.0, 100.0);
    let child = styled(&mut tree, |s| {
        s.set_width(Length::Point(20.0));
        s.set_height(Length::Point(20.0));
        s.set_margin(Edge::All, Length::Auto);
    });
    append(&mut tree, root, child);
    layout(&mut tree, root);

    assert_eq!(rect(&tree, child), (40.0, 40.0, 20.0, 20.0));
}

#[test]
fn test_stretch_fills_cross_axis() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 100.0, 60.0);
    let child = styled(&mut tree, |s| s.set_width(Length::Point(10.0)));
    append(&mut tree, root, child);
    layout(&mut tree, root);

    assert_eq!(rect(&tree, child), (0.0, 0.0, 10.0, 60.0));
}

// =============================================================================
// Wrapping
// =============================================================================

fn wrapped(wrap: Wrap) -> (LayoutTree, Vec<NodeId>) {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 100.0, 100.0);
    tree.update_style(root, |s| s.set_flex_wrap(wrap)).unwrap();
    let items: Vec<NodeId> = (0..3).map(|_| fixed(&mut tree, 40.0, 20.0)).collect();
    for &item in &items {
        append(&mut tree, root, item);
    }
    layout(&mut tree, root);
    (tree, items)
}

#[test]
fn test_wrap_breaks_lines() {
    let (tree, items) = wrapped(Wrap::Wrap);
    assert_eq!(rect(&tree, items[0]), (0.0, 0.0, 40.0, 20.0));
    assert_eq!(rect(&tree, items[1]), (40.0, 0.0, 40.0, 20.0));
    assert_eq!(rect(&tree, items[2]), (0.0, 20.0, 40.0, 20.0));
}

#[test]
fn test_wrap_reverse_flips_lines() {
    let (tree, items) = wrapped(Wrap::WrapReverse);
    assert_eq!(tree.layout(items[0]).unwrap().top(), 80.0);
    assert_eq!(tree.layout(items[1]).unwrap().top(), 80.0);
    assert_eq!(tree.layout(items[2]).unwrap().top(), 60.0);
}

#[test]
fn test_no_wrap_overflows() {
    let (tree, items) = wrapped(Wrap::NoWrap);
    assert_eq!(tree.layout(items[2]).unwrap().left(), 80.0);
    let root = tree.owner(items[0]).unwrap().unwrap();
    assert!(tree.layout(root).unwrap().had_overflow());
}

// =============================================================================
// Direction, display and rounding
// =============================================================================

#[test]
fn test_rtl_lays_rows_out_from_the_right() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 100.0, 20.0);
    let a = styled(&mut tree, |s| {
        s.set_width(Length::Point(20.0));
        s.set_margin(Edge::Start, Length::Point(5.0));
    });
    let b = styled(&mut tree, |s| s.set_width(Length::Point(30.0)));
    append(&mut tree, root, a);
    append(&mut tree, root, b);
    tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Rtl).unwrap();

    assert_eq!(tree.layout(root).unwrap().direction(), Direction::Rtl);
    assert_eq!(tree.layout(a).unwrap().left(), 75.0);
    assert_eq!(tree.layout(b).unwrap().left(), 45.0);
}

#[test]
fn test_display_none_takes_no_space() {
    let mut tree = LayoutTree::new();
    let root = fixed(&mut tree, 100.0, 100.0);
    let hidden = styled(&mut tree, |s| {
        s.set_height(Length::Point(10.0));
        s.set_display(Display::None);
    });
    let shown = styled(&mut tree, |s| s.set_height(Length::Point(10.0)));
    append(&mut tree, root, hidden);
    append(&mut tree, root, shown);
    layout(&mut tree, root);

    assert_eq!(rect(&tree, hidden), (0.0, 0.0, 0.0, 0.0));
    assert_eq!(rect(&tree, shown), (0.0, 0.0, 100.0, 10.0));
}

#[test]
fn test_rounding_keeps_edges_adjacent() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 100.0, 20.0);
    let items: Vec<NodeId> = (0..3).map(|_| styled(&mut tree, |s| s.set_flex_grow(1.0))).collect();
    for &item in &items {
        append(&mut tree, root, item);
    }
    layout(&mut tree, root);

    let spans: Vec<(f32, f32)> = items
        .iter()
        .map(|&id| {
            let l = tree.layout(id).unwrap();
            (l.left(), l.width())
        })
        .collect();
    assert_eq!(spans, [(0.0, 33.0), (33.0, 34.0), (67.0, 33.0)]);
}

#[test]
fn test_zero_scale_disables_rounding() {
    let mut config = Config::new();
    config.set_point_scale_factor(0.0).unwrap();
    let mut tree = LayoutTree::with_config(config);
    let root = row(&mut tree, 100.0, 20.0);
    let items: Vec<NodeId> = (0..3).map(|_| styled(&mut tree, |s| s.set_flex_grow(1.0))).collect();
    for &item in &items {
        append(&mut tree, root, item);
    }
    layout(&mut tree, root);

    let width = tree.layout(items[1]).unwrap().width();
    assert!((width - 100.0 / 3.0).abs() < 1e-3);
}

// =============================================================================
// Incremental layout
// =============================================================================

fn counting_leaf(tree: &mut LayoutTree, calls: &Arc<AtomicUsize>) -> NodeId {
    let calls = Arc::clone(calls);
    tree.new_leaf_with_measure(
        Style::new(),
        MeasureFunc::new(move |_, _, _, _| {
            calls.fetch_add(1, Ordering::SeqCst);
            Size::new(25.5, 10.25)
        }),
    )
}

#[test]
fn test_layout_is_idempotent() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 150.0, 80.0);
    tree.update_style(root, |s| {
        s.set_flex_wrap(Wrap::Wrap);
        s.set_padding(Edge::All, Length::Point(3.0));
    })
    .unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    for _ in 0..4 {
        let item = styled(&mut tree, |s| {
            s.set_flex_grow(1.0);
            s.set_margin(Edge::Horizontal, Length::Point(1.5));
        });
        let leaf = counting_leaf(&mut tree, &calls);
        append(&mut tree, item, leaf);
        append(&mut tree, root, item);
    }

    layout(&mut tree, root);
    assert_subtree_clean(&tree, root);
    let first = tree.to_debug_string(root, PrintOptions::default()).unwrap();
    layout(&mut tree, root);
    assert_subtree_clean(&tree, root);
    let second = tree.to_debug_string(root, PrintOptions::default()).unwrap();
    assert_eq!(first, second);

    let leaf = tree.child(tree.child(root, 0).unwrap(), 0).unwrap();
    tree.mark_dirty(leaf).unwrap();
    assert!(tree.is_dirty(root).unwrap());
    layout(&mut tree, root);
    assert_subtree_clean(&tree, root);
    let third = tree.to_debug_string(root, PrintOptions::default()).unwrap();
    assert_eq!(first, third);
}

fn assert_subtree_clean(tree: &LayoutTree, id: NodeId) {
    assert!(!tree.is_dirty(id).unwrap(), "{id:?} still dirty after layout");
    for &child in tree.children(id).unwrap() {
        assert_subtree_clean(tree, child);
    }
}

#[test]
fn test_clean_tree_reuses_cached_measurements() {
    let mut tree = LayoutTree::new();
    let root = fixed(&mut tree, 100.0, 100.0);
    let calls = Arc::new(AtomicUsize::new(0));
    let leaf = counting_leaf(&mut tree, &calls);
    append(&mut tree, root, leaf);

    layout(&mut tree, root);
    let after_first = calls.load(Ordering::SeqCst);
    assert!(after_first > 0);

    layout(&mut tree, root);
    assert_eq!(calls.load(Ordering::SeqCst), after_first);

    tree.mark_dirty(leaf).unwrap();
    layout(&mut tree, root);
    assert!(calls.load(Ordering::SeqCst) > after_first);
}

#[test]
fn test_dirty_propagates_to_owners_only() {
    let mut tree = LayoutTree::new();
    let root = fixed(&mut tree, 100.0, 100.0);
    let branch = tree.new_node();
    let leaf = fixed(&mut tree, 10.0, 10.0);
    let sibling = fixed(&mut tree, 10.0, 10.0);
    append(&mut tree, root, branch);
    append(&mut tree, root, sibling);
    append(&mut tree, branch, leaf);
    layout(&mut tree, root);
    for id in [root, branch, leaf, sibling] {
        assert!(!tree.is_dirty(id).unwrap());
    }

    let changed = tree.update_style(leaf, |s| s.set_width(Length::Point(20.0))).unwrap();
    assert!(changed);
    assert!(tree.is_dirty(leaf).unwrap());
    assert!(tree.is_dirty(branch).unwrap());
    assert!(tree.is_dirty(root).unwrap());
    assert!(!tree.is_dirty(sibling).unwrap());

    layout(&mut tree, root);
    assert_eq!(tree.layout(leaf).unwrap().width(), 20.0);
    assert!(!tree.is_dirty(root).unwrap());
}

#[test]
fn test_has_new_layout_only_for_visited_nodes() {
    let mut tree = LayoutTree::new();
    let root = fixed(&mut tree, 100.0, 100.0);
    let child = fixed(&mut tree, 10.0, 10.0);
    append(&mut tree, root, child);
    layout(&mut tree, root);
    assert!(tree.has_new_layout(root).unwrap());
    assert!(tree.has_new_layout(child).unwrap());

    tree.set_has_new_layout(root, false).unwrap();
    tree.set_has_new_layout(child, false).unwrap();
    layout(&mut tree, root);
    assert!(tree.has_new_layout(root).unwrap());
    assert!(!tree.has_new_layout(child).unwrap());
}

#[test]
fn test_shared_child_is_cloned_per_owner() {
    let mut tree = LayoutTree::new();
    let wide = fixed(&mut tree, 100.0, 10.0);
    let narrow = fixed(&mut tree, 50.0, 10.0);
    let shared = tree.new_node();
    tree.insert_shared_child(wide, shared, 0).unwrap();
    tree.insert_shared_child(narrow, shared, 0).unwrap();

    layout(&mut tree, wide);
    layout(&mut tree, narrow);

    let in_wide = tree.child(wide, 0).unwrap();
    let in_narrow = tree.child(narrow, 0).unwrap();
    assert_ne!(in_wide, shared);
    assert_ne!(in_narrow, shared);
    assert_eq!(tree.owner(in_wide).unwrap(), Some(wide));
    assert_eq!(tree.layout(in_wide).unwrap().width(), 100.0);
    assert_eq!(tree.layout(in_narrow).unwrap().width(), 50.0);
    assert!(tree.layout(shared).unwrap().width().is_nan());
}

#[test]
fn test_write_through_one_owner_leaves_other_tree_untouched() {
    let mut tree = LayoutTree::new();
    let first = row(&mut tree, 100.0, 10.0);
    let second = row(&mut tree, 100.0, 10.0);
    let shared = styled(&mut tree, |s| s.set_width(Length::Point(10.0)));
    tree.insert_shared_child(first, shared, 0).unwrap();
    tree.insert_shared_child(second, shared, 0).unwrap();
    layout(&mut tree, first);
    layout(&mut tree, second);
    let in_first = tree.child(first, 0).unwrap();
    assert_eq!(rect(&tree, in_first), (0.0, 0.0, 10.0, 10.0));

    let writable = tree.child_for_write(second, 0).unwrap();
    assert_ne!(writable, in_first);
    tree.update_style(writable, |s| s.set_width(Length::Point(30.0)))
        .unwrap();
    assert!(tree.is_dirty(second).unwrap());
    assert!(!tree.is_dirty(first).unwrap());
    layout(&mut tree, second);

    assert_eq!(tree.layout(tree.child(second, 0).unwrap()).unwrap().width(), 30.0);
    assert_eq!(tree.child(first, 0).unwrap(), in_first);
    assert_eq!(rect(&tree, in_first), (0.0, 0.0, 10.0, 10.0));
    assert!(!tree.is_dirty(first).unwrap());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_from_toml_applies_web_defaults() {
    let config = Config::from_toml_str("use_web_defaults = true\npoint_scale_factor = 2.0\n").unwrap();
    assert_eq!(config.point_scale_factor(), 2.0);
    let mut tree = LayoutTree::with_config(config);
    let root = tree.new_node();
    assert_eq!(tree.style(root).unwrap().flex_direction(), FlexDirection::Row);
}

#[test]
fn test_serialized_style_reproduces_layout() {
    let mut tree = LayoutTree::new();
    let root = row(&mut tree, 100.0, 40.0);
    let item = styled(&mut tree, |s| {
        s.set_flex_grow(1.0);
        s.set_margin(Edge::Horizontal, Length::Point(5.0));
        s.set_max_width(Length::Percent(50.0));
    });
    append(&mut tree, root, item);

    let json = serde_json::to_string(tree.style(item).unwrap()).unwrap();
    let restored: Style = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, tree.style(item).unwrap());

    let copy_root = row(&mut tree, 100.0, 40.0);
    let copy = tree.new_node_with_style(restored);
    append(&mut tree, copy_root, copy);
    layout(&mut tree, root);
    layout(&mut tree, copy_root);
    assert_eq!(rect(&tree, copy), (5.0, 0.0, 50.0, 40.0));
    assert!(tree.layout_trees_equal(root, copy_root).unwrap());
}

#[test]
fn test_print_tree_logs_after_layout() {
    init_logging();
    let mut config = Config::new();
    config.print_tree = true;
    let mut tree = LayoutTree::with_config(config);
    let root = fixed(&mut tree, 10.0, 10.0);
    layout(&mut tree, root);
    assert_eq!(rect(&tree, root), (0.0, 0.0, 10.0, 10.0));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_grow_fills_container(
        width in 10.0f32..1000.0,
        grows in prop::collection::vec(1u8..5, 1..6),
    ) {
        let mut config = Config::new();
        config.set_point_scale_factor(0.0).unwrap();
        let mut tree = LayoutTree::with_config(config);
        let root = row(&mut tree, width, 10.0);
        let items: Vec<NodeId> = grows
            .iter()
            .map(|&g| styled(&mut tree, |s| s.set_flex_grow(f32::from(g))))
            .collect();
        for &item in &items {
            append(&mut tree, root, item);
        }
        layout(&mut tree, root);

        let total: f32 = items.iter().map(|&id| tree.layout(id).unwrap().width()).sum();
        prop_assert!((total - width).abs() < 0.01 * width.max(1.0));
    }

    #[test]
    fn prop_second_layout_changes_nothing(width in 1.0f32..500.0, height in 1.0f32..500.0) {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let child = styled(&mut tree, |s| s.set_flex_grow(1.0));
        append(&mut tree, root, child);
        tree.calculate_layout(root, width, height, Direction::Ltr).unwrap();
        let first = rect(&tree, child);
        tree.calculate_layout(root, width, height, Direction::Ltr).unwrap();
        prop_assert_eq!(first, rect(&tree, child));
    }
}
