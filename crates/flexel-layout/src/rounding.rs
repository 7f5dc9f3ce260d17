//! Pixel-grid snapping of computed layouts.

use crate::tree::NodeId;
use crate::node::Node;
use flexel_core::NodeType;
use slotmap::SlotMap;

const EPSILON: f64 = 0.0001;

fn nearly(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Snap `value` to the grid defined by `scale` physical pixels per point.
///
/// `force_ceil` and `force_floor` override round-half-up unless the value already sits on
/// the grid.
#[must_use]
pub fn round_value_to_pixel_grid(value: f32, scale: f32, force_ceil: bool, force_floor: bool) -> f32 {
    let scale = f64::from(scale);
    let mut scaled = f64::from(value) * scale;
    let mut fraction = scaled % 1.0;
    if fraction < 0.0 {
        fraction += 1.0;
    }
    scaled = if nearly(fraction, 0.0) {
        scaled - fraction
    } else if nearly(fraction, 1.0) {
        scaled - fraction + 1.0
    } else if force_ceil {
        scaled - fraction + 1.0
    } else if force_floor {
        scaled - fraction
    } else if fraction > 0.5 || nearly(fraction, 0.5) {
        scaled - fraction + 1.0
    } else {
        scaled - fraction
    };
    if scaled.is_nan() || scale.is_nan() {
        return f32::NAN;
    }
    #[allow(clippy::cast_possible_truncation)]
    let snapped = (scaled / scale) as f32;
    snapped
}

fn has_fraction(value: f32, scale: f32) -> bool {
    let fraction = (f64::from(value) * f64::from(scale)) % 1.0;
    !nearly(fraction, 0.0) && !nearly(fraction, 1.0)
}

/// Round positions and sizes of the subtree at `id` using absolute coordinates, so that
/// adjacent edges snap to the same pixel.
pub(crate) fn round_layout(
    nodes: &mut SlotMap<NodeId, Node>,
    id: NodeId,
    scale: f32,
    absolute_left: f32,
    absolute_top: f32,
) {
    let Some(node) = nodes.get_mut(id) else {
        return;
    };
    let layout = &mut node.layout;
    let left = layout.position[0];
    let top = layout.position[1];
    let width = layout.dimensions[0];
    let height = layout.dimensions[1];

    let abs_left = absolute_left + left;
    let abs_top = absolute_top + top;
    let abs_right = abs_left + width;
    let abs_bottom = abs_top + height;

    let text = node.flags.node_type == NodeType::Text;
    layout.position[0] = round_value_to_pixel_grid(left, scale, false, text);
    layout.position[1] = round_value_to_pixel_grid(top, scale, false, text);

    let frac_width = has_fraction(width, scale);
    let frac_height = has_fraction(height, scale);
    layout.dimensions[0] = round_value_to_pixel_grid(abs_right, scale, text && frac_width, text && !frac_width)
        - round_value_to_pixel_grid(abs_left, scale, false, text);
    layout.dimensions[1] = round_value_to_pixel_grid(abs_bottom, scale, text && frac_height, text && !frac_height)
        - round_value_to_pixel_grid(abs_top, scale, false, text);

    let children = node.children.clone();
    for child in children {
        round_layout(nodes, child, scale, abs_left, abs_top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_value_to_pixel_grid(1.5, 1.0, false, false), 2.0);
        assert_eq!(round_value_to_pixel_grid(1.49, 1.0, false, false), 1.0);
        assert_eq!(round_value_to_pixel_grid(-1.5, 1.0, false, false), -1.0);
    }

    #[test]
    fn test_forced_directions() {
        assert_eq!(round_value_to_pixel_grid(1.2, 1.0, true, false), 2.0);
        assert_eq!(round_value_to_pixel_grid(1.8, 1.0, false, true), 1.0);
        assert_eq!(round_value_to_pixel_grid(3.0, 1.0, true, false), 3.0);
        assert_eq!(round_value_to_pixel_grid(2.99999, 1.0, false, true), 3.0);
    }

    #[test]
    fn test_scale_factor() {
        assert_eq!(round_value_to_pixel_grid(1.3, 2.0, false, false), 1.5);
        assert_eq!(round_value_to_pixel_grid(1.2, 2.0, false, false), 1.0);
        assert_eq!(round_value_to_pixel_grid(0.34, 3.0, false, false), 1.0 / 3.0);
    }

    #[test]
    fn test_undefined_stays_undefined() {
        assert!(round_value_to_pixel_grid(f32::NAN, 1.0, false, false).is_nan());
    }

    #[test]
    fn test_round_layout_snaps_shared_edges() {
        let mut nodes: SlotMap<NodeId, Node> = SlotMap::with_key();
        let mut parent = Node::new(false);
        let a = nodes.insert({
            let mut n = Node::new(false);
            n.layout.position = [0.0, 0.0, 0.0, 0.0];
            n.layout.dimensions = [33.3, 10.0];
            n
        });
        let b = nodes.insert({
            let mut n = Node::new(false);
            n.layout.position = [33.3, 0.0, 0.0, 0.0];
            n.layout.dimensions = [33.3, 10.0];
            n
        });
        parent.children = vec![a, b];
        parent.layout.position = [0.0; 4];
        parent.layout.dimensions = [100.0, 10.0];
        let root = nodes.insert(parent);

        round_layout(&mut nodes, root, 1.0, 0.0, 0.0);
        let first = &nodes[a].layout;
        let second = &nodes[b].layout;
        assert_eq!(first.dimensions[0], 33.0);
        assert_eq!(second.position[0], 33.0);
        assert_eq!(second.dimensions[0], 34.0);
    }

    #[test]
    fn test_text_nodes_are_not_rounded_down() {
        let mut nodes: SlotMap<NodeId, Node> = SlotMap::with_key();
        let mut text = Node::new(false);
        text.flags.node_type = NodeType::Text;
        text.layout.position = [0.0; 4];
        text.layout.dimensions = [10.2, 4.0];
        let id = nodes.insert(text);
        round_layout(&mut nodes, id, 1.0, 0.0, 0.0);
        assert_eq!(nodes[id].layout.dimensions, [11.0, 4.0]);
    }

    proptest! {
        #[test]
        fn prop_rounding_is_idempotent(v in -10_000.0f32..10_000.0, scale in prop::sample::select(vec![1.0f32, 2.0, 3.0])) {
            let once = round_value_to_pixel_grid(v, scale, false, false);
            let twice = round_value_to_pixel_grid(once, scale, false, false);
            prop_assert!((once - twice).abs() < 1e-3);
        }
    }
}
