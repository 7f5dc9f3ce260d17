//! Out-of-flow children.
//!
//! Absolutely positioned children are sized and placed after the container's own size is
//! known. Percentages and insets resolve against the container's padding box, and a child
//! without insets on an axis sits at the start of that box unless the container centers
//! or end-aligns along it.

use crate::axis::{dim, leading};
use crate::engine::{LayoutEngine, PassReason, SizingRequest};
use crate::flex::FlexContext;
use crate::node::{align_item, Node};
use crate::tree::NodeId;
use flexel_core::{Align, Dimension, Direction, FlexDirection, Justify, MeasureMode, Wrap, UNDEFINED};

/// Size of `child` along `axis` implied by its style or by opposing insets.
fn definite_size(
    child: &Node,
    axis: FlexDirection,
    direction: Direction,
    reference: [f32; 2],
) -> f32 {
    let dimension = dim(axis);
    let size = reference[dimension as usize];
    let margin = child.margin_for_axis(axis, direction, reference[0]);
    if child.is_style_dim_defined(axis, size) {
        return child.resolved_dimension(dimension).resolve(size).raw() + margin;
    }
    if child.is_leading_position_defined(axis, direction)
        && child.is_trailing_position_defined(axis, direction)
    {
        let stretched = size
            - child.leading_position(axis, direction, size)
            - child.trailing_position(axis, direction, size);
        return child.bound_axis(axis, direction, stretched, size, reference[0]);
    }
    UNDEFINED
}

impl LayoutEngine<'_> {
    /// Size and position one absolutely positioned child of `ctx.id`.
    pub(crate) fn layout_absolute_child(
        &mut self,
        ctx: &FlexContext,
        child_id: NodeId,
        container_width_mode: MeasureMode,
    ) {
        let container = &self.nodes[ctx.id];
        let child = &self.nodes[child_id];
        let direction = child.resolve_direction(ctx.direction);
        let measured = container.layout.measured_dimensions;
        let padding_box = [
            measured[0]
                - container.leading_border(FlexDirection::Row, ctx.direction)
                - container.trailing_border(FlexDirection::Row, ctx.direction),
            measured[1]
                - container.leading_border(FlexDirection::Column, ctx.direction)
                - container.trailing_border(FlexDirection::Column, ctx.direction),
        ];
        let margin_row = child.margin_for_axis(FlexDirection::Row, direction, padding_box[0]);
        let margin_column = child.margin_for_axis(FlexDirection::Column, direction, padding_box[0]);

        let mut width = definite_size(child, FlexDirection::Row, direction, padding_box);
        let mut height =
            definite_size(child, FlexDirection::Column, direction, padding_box);

        if width.is_nan() != height.is_nan() {
            if let Some(ratio) = child.style.aspect_ratio().get() {
                if width.is_nan() {
                    width = margin_row + (height - margin_column) * ratio;
                } else {
                    height = margin_column + (width - margin_row) / ratio;
                }
            }
        }

        if width.is_nan() || height.is_nan() {
            let mode_for = |size: f32| {
                if size.is_nan() {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::Exactly
                }
            };
            let mut width_mode = mode_for(width);
            let height_mode = mode_for(height);
            // Column containers bound the width of content-sized children.
            if !ctx.is_row
                && width.is_nan()
                && container_width_mode != MeasureMode::Undefined
                && !ctx.inner_width.is_nan()
                && ctx.inner_width > 0.0
            {
                width = ctx.inner_width;
                width_mode = MeasureMode::AtMost;
            }
            let request = SizingRequest {
                available_width: width,
                available_height: height,
                owner_direction: ctx.direction,
                width_mode,
                height_mode,
                owner_width: padding_box[0],
                owner_height: padding_box[1],
                perform_layout: false,
            };
            self.layout_node_internal(child_id, &request, PassReason::AbsoluteMeasure);
            let child = &self.nodes[child_id];
            width = child.layout.measured_width() + margin_row;
            height = child.layout.measured_height() + margin_column;
        }

        let request = SizingRequest {
            available_width: width,
            available_height: height,
            owner_direction: ctx.direction,
            width_mode: MeasureMode::Exactly,
            height_mode: MeasureMode::Exactly,
            owner_width: padding_box[0],
            owner_height: padding_box[1],
            perform_layout: true,
        };
        self.layout_node_internal(child_id, &request, PassReason::AbsoluteLayout);

        let container = &self.nodes[ctx.id];
        let justify = container.style.justify_content();
        let align = align_item(container, &self.nodes[child_id]);
        let wrap_reverse = container.style.flex_wrap() == Wrap::WrapReverse;
        let main_placement = match justify {
            Justify::Center => Placement::Center,
            Justify::FlexEnd => Placement::End,
            _ => Placement::Start,
        };
        let cross_placement = if align == Align::Center {
            Placement::Center
        } else if (align == Align::FlexEnd) != wrap_reverse {
            Placement::End
        } else {
            Placement::Start
        };

        for (axis, placement) in [(ctx.main, main_placement), (ctx.cross, cross_placement)] {
            let position = self.absolute_offset(ctx, child_id, axis, placement, padding_box);
            self.nodes[child_id]
                .layout
                .set_position_at(leading(axis), position);
        }
    }

    /// Offset of an absolute child from the container's leading edge along `axis`.
    fn absolute_offset(
        &self,
        ctx: &FlexContext,
        child_id: NodeId,
        axis: FlexDirection,
        placement: Placement,
        padding_box: [f32; 2],
    ) -> f32 {
        let container = &self.nodes[ctx.id];
        let child = &self.nodes[child_id];
        let direction = child.resolve_direction(ctx.direction);
        let dimension = dim(axis);
        let reference = padding_box[dimension as usize];
        let container_size = container.layout.measured(dimension);
        let size = child.layout.measured(dimension);
        let width = padding_box[Dimension::Width as usize];

        if child.is_leading_position_defined(axis, direction) {
            child.leading_position(axis, direction, reference)
                + container.leading_border(axis, ctx.direction)
                + child.leading_margin(axis, direction, width)
        } else if child.is_trailing_position_defined(axis, direction) {
            container_size
                - size
                - container.trailing_border(axis, ctx.direction)
                - child.trailing_margin(axis, direction, width)
                - child.trailing_position(axis, direction, reference)
        } else {
            match placement {
                Placement::Center => (container_size - size) / 2.0,
                Placement::End => container_size - size,
                Placement::Start => {
                    container.leading_border(axis, ctx.direction)
                        + child.leading_margin(axis, direction, width)
                }
            }
        }
    }
}

/// Where an absolute child without insets sits along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Start,
    Center,
    End,
}

#[cfg(test)]
mod tests {
    use crate::tree::{LayoutTree, NodeId};
    use flexel_core::{
        Align, Direction, Edge, FlexDirection, Justify, Length, PositionType, Style, UNDEFINED,
    };

    fn container(tree: &mut LayoutTree, configure: impl FnOnce(&mut Style)) -> NodeId {
        let mut style = Style::new();
        style.set_width(Length::Point(100.0));
        style.set_height(Length::Point(100.0));
        configure(&mut style);
        tree.new_node_with_style(style)
    }

    fn absolute(tree: &mut LayoutTree, configure: impl FnOnce(&mut Style)) -> NodeId {
        let mut style = Style::new();
        style.set_position_type(PositionType::Absolute);
        configure(&mut style);
        tree.new_node_with_style(style)
    }

    fn rect(tree: &LayoutTree, id: NodeId) -> (f32, f32, f32, f32) {
        let layout = tree.layout(id).unwrap();
        (layout.left(), layout.top(), layout.width(), layout.height())
    }

    #[test]
    fn test_insets_place_child() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, |_| {});
        let child = absolute(&mut tree, |s| {
            s.set_position(Edge::Left, Length::Point(10.0));
            s.set_position(Edge::Top, Length::Point(20.0));
            s.set_width(Length::Point(30.0));
            s.set_height(Length::Point(40.0));
        });
        tree.insert_child(root, child, 0).unwrap();
        tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr).unwrap();
        assert_eq!(rect(&tree, child), (10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_opposing_insets_size_child() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, |s| s.set_border(Edge::All, 5.0));
        let child = absolute(&mut tree, |s| {
            s.set_position(Edge::Left, Length::Point(10.0));
            s.set_position(Edge::Right, Length::Point(10.0));
            s.set_position(Edge::Top, Length::Point(0.0));
            s.set_position(Edge::Bottom, Length::Percent(50.0));
        });
        tree.insert_child(root, child, 0).unwrap();
        tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr).unwrap();
        // Padding box is 90x90.
        assert_eq!(rect(&tree, child), (15.0, 5.0, 70.0, 45.0));
    }

    #[test]
    fn test_trailing_inset_measures_from_end() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, |_| {});
        let child = absolute(&mut tree, |s| {
            s.set_position(Edge::Right, Length::Point(5.0));
            s.set_position(Edge::Bottom, Length::Point(10.0));
            s.set_width(Length::Point(20.0));
            s.set_height(Length::Point(20.0));
        });
        tree.insert_child(root, child, 0).unwrap();
        tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr).unwrap();
        assert_eq!(rect(&tree, child), (75.0, 70.0, 20.0, 20.0));
    }

    #[test]
    fn test_container_alignment_applies_without_insets() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, |s| {
            s.set_flex_direction(FlexDirection::Row);
            s.set_justify_content(Justify::Center);
            s.set_align_items(Align::FlexEnd);
        });
        let child = absolute(&mut tree, |s| {
            s.set_width(Length::Point(20.0));
            s.set_height(Length::Point(10.0));
        });
        tree.insert_child(root, child, 0).unwrap();
        tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr).unwrap();
        assert_eq!(rect(&tree, child), (40.0, 90.0, 20.0, 10.0));
    }

    #[test]
    fn test_aspect_ratio_fills_missing_dimension() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, |_| {});
        let child = absolute(&mut tree, |s| {
            s.set_width(Length::Point(40.0));
            s.set_aspect_ratio(2.0);
        });
        tree.insert_child(root, child, 0).unwrap();
        tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr).unwrap();
        assert_eq!(rect(&tree, child), (0.0, 0.0, 40.0, 20.0));
    }

    #[test]
    fn test_absolute_child_does_not_take_space() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, |s| s.set_flex_direction(FlexDirection::Row));
        let floating = absolute(&mut tree, |s| {
            s.set_width(Length::Point(50.0));
            s.set_height(Length::Point(50.0));
        });
        let mut style = Style::new();
        style.set_width(Length::Point(10.0));
        let flowing = tree.new_node_with_style(style);
        tree.insert_child(root, floating, 0).unwrap();
        tree.insert_child(root, flowing, 1).unwrap();
        tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr).unwrap();
        assert_eq!(rect(&tree, flowing), (0.0, 0.0, 10.0, 100.0));
    }
}
