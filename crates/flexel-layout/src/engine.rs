//! Layout pass driver: entry points, sizing cache and the per-node algorithm.
//!
//! A pass walks the tree top-down. Every node is sized through
//! [`LayoutEngine::layout_node_internal`], which consults the node's [`LayoutCache`]
//! before running the flex algorithm in [`LayoutEngine::layout_impl`]. The line-level
//! steps live in `flex.rs`, out-of-flow children in `absolute.rs`.
//!
//! [`LayoutCache`]: crate::LayoutCache

use crate::axis::{dim, leading, trailing};
use crate::cache::{CacheQuery, CachedMeasurement};
use crate::config::Config;
use crate::error::TreeError;
use crate::flex::{FlexContext, FlexLine};
use crate::node::{Layout, Node};
use crate::print::PrintOptions;
use crate::rounding::round_layout;
use crate::tree::{clone_children, LayoutTree, NodeId};
use flexel_core::{
    float_eq, float_max, float_min, Dimension, Direction, Display, FlexDirection, FloatOptional,
    MeasureMode, Overflow, PositionType, Size, Wrap, UNDEFINED,
};
use slotmap::SlotMap;
use std::any::Any;

/// Why a node is being sized. Only used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PassReason {
    Initial,
    MeasureChild,
    Flex,
    Stretch,
    MultilineStretch,
    AbsoluteMeasure,
    AbsoluteLayout,
}

/// Inputs of one sizing request.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SizingRequest {
    pub(crate) available_width: f32,
    pub(crate) available_height: f32,
    pub(crate) owner_direction: Direction,
    pub(crate) width_mode: MeasureMode,
    pub(crate) height_mode: MeasureMode,
    pub(crate) owner_width: f32,
    pub(crate) owner_height: f32,
    pub(crate) perform_layout: bool,
}

/// State shared by every step of one layout pass.
pub(crate) struct LayoutEngine<'a> {
    pub(crate) nodes: &'a mut SlotMap<NodeId, Node>,
    pub(crate) config: &'a Config,
    pub(crate) generation: u32,
    pub(crate) config_generation: u32,
    pub(crate) context: &'a mut dyn Any,
    pub(crate) depth: usize,
}

impl LayoutTree {
    /// Compute the layout of the subtree rooted at `root`.
    ///
    /// `available_width` and `available_height` may be [`UNDEFINED`] to size the root to
    /// its content; negative values are treated as zero.
    pub fn calculate_layout(
        &mut self,
        root: NodeId,
        available_width: f32,
        available_height: f32,
        owner_direction: Direction,
    ) -> Result<(), TreeError> {
        self.calculate_layout_with_context(
            root,
            available_width,
            available_height,
            owner_direction,
            &mut (),
        )
    }

    /// Like [`LayoutTree::calculate_layout`], forwarding `context` to every
    /// context-carrying measure, baseline and print function.
    pub fn calculate_layout_with_context(
        &mut self,
        root: NodeId,
        available_width: f32,
        available_height: f32,
        owner_direction: Direction,
        context: &mut dyn Any,
    ) -> Result<(), TreeError> {
        self.node(root)?;
        self.generation = self.generation.wrapping_add(1);

        let mut engine = LayoutEngine {
            nodes: &mut self.nodes,
            config: &self.config,
            generation: self.generation,
            config_generation: self.config_generation,
            context,
            depth: 0,
        };
        engine.layout_root(
            root,
            clamp_available(available_width),
            clamp_available(available_height),
            owner_direction,
        );

        if self.config.print_tree {
            let dump = self.to_debug_string(root, PrintOptions::default())?;
            log::debug!("layout tree after pass {}:\n{dump}", self.generation);
        }
        Ok(())
    }
}

fn clamp_available(value: f32) -> f32 {
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Constrain `size` by the max dimension of `node` along `axis`.
pub(crate) fn constrain_max_size_for_mode(
    node: &Node,
    axis: FlexDirection,
    direction: Direction,
    owner_axis_size: f32,
    owner_width: f32,
    mode: MeasureMode,
    size: f32,
) -> (MeasureMode, f32) {
    let max = node.style.max_dimension(dim(axis)).resolve(owner_axis_size)
        + node.margin_for_axis(axis, direction, owner_width);
    match (mode, max.get()) {
        (MeasureMode::Exactly | MeasureMode::AtMost, Some(max)) if size.is_nan() || size >= max => {
            (mode, max)
        }
        (MeasureMode::Undefined, Some(max)) => (MeasureMode::AtMost, max),
        _ => (mode, size),
    }
}

/// Space left for children along a physical axis once margin, padding and border are
/// taken out, clamped to the node's min/max.
fn available_inner_dim(
    node: &Node,
    axis: FlexDirection,
    direction: Direction,
    available: f32,
    owner_size: f32,
    owner_width: f32,
) -> f32 {
    let dimension = dim(axis);
    let padding_and_border = node.padding_and_border_for_axis(axis, direction, owner_width);
    let inner = available - node.margin_for_axis(axis, direction, owner_width) - padding_and_border;
    if inner.is_nan() {
        return inner;
    }
    let min = node
        .style
        .min_dimension(dimension)
        .resolve(owner_size)
        .get()
        .map_or(0.0, |min| min - padding_and_border);
    let max = node
        .style
        .max_dimension(dimension)
        .resolve(owner_size)
        .get()
        .map_or(f32::MAX, |max| max - padding_and_border);
    float_max(float_min(inner, max), min)
}

/// Sizing constraint of the root along one physical axis.
fn root_constraint(
    node: &Node,
    axis: FlexDirection,
    direction: Direction,
    owner_size: f32,
    owner_width: f32,
) -> (f32, MeasureMode) {
    let dimension = dim(axis);
    if node.is_style_dim_defined(axis, owner_size) {
        let size = node.resolved_dimension(dimension).resolve(owner_size)
            + node.margin_for_axis(axis, direction, owner_width);
        return (size.raw(), MeasureMode::Exactly);
    }
    if let Some(max) = node.style.max_dimension(dimension).resolve(owner_size).get() {
        return (max, MeasureMode::AtMost);
    }
    if owner_size.is_nan() {
        (UNDEFINED, MeasureMode::Undefined)
    } else {
        (owner_size, MeasureMode::Exactly)
    }
}

fn sanitize_measurement(id: NodeId, size: Size) -> Size {
    let clamp = |value: f32, what: &str| {
        if value.is_nan() || value < 0.0 {
            log::warn!("measure function of {id:?} returned {what} {value}; using 0");
            0.0
        } else {
            value
        }
    };
    Size::new(clamp(size.width, "width"), clamp(size.height, "height"))
}

impl LayoutEngine<'_> {
    fn layout_root(
        &mut self,
        root: NodeId,
        owner_width: f32,
        owner_height: f32,
        owner_direction: Direction,
    ) {
        let node = &mut self.nodes[root];
        node.resolve_dimensions();
        let direction = node.resolve_direction(owner_direction);
        let (width, width_mode) =
            root_constraint(node, FlexDirection::Row, direction, owner_width, owner_width);
        let (height, height_mode) =
            root_constraint(node, FlexDirection::Column, direction, owner_height, owner_width);
        log::debug!(
            "layout pass {} for {root:?}: {width} ({width_mode}) x {height} ({height_mode})",
            self.generation
        );

        let request = SizingRequest {
            available_width: width,
            available_height: height,
            owner_direction,
            width_mode,
            height_mode,
            owner_width,
            owner_height,
            perform_layout: true,
        };
        self.layout_node_internal(root, &request, PassReason::Initial);

        let node = &mut self.nodes[root];
        let direction = node.layout.direction;
        node.set_position(
            direction,
            FlexDirection::Row,
            FlexDirection::Column,
            owner_width,
            owner_height,
            owner_width,
        );

        let scale = self.config.point_scale_factor();
        if scale != 0.0 {
            round_layout(self.nodes, root, scale, 0.0, 0.0);
        }
    }

    /// Size `id` for `request`, reusing a cached result when the inputs allow it.
    pub(crate) fn layout_node_internal(
        &mut self,
        id: NodeId,
        request: &SizingRequest,
        reason: PassReason,
    ) {
        self.depth += 1;
        let generation = self.generation;
        let config_generation = self.config_generation;
        let scale = self.config.point_scale_factor();

        let node = &mut self.nodes[id];
        let need_to_visit = (node.flags.is_dirty && node.layout.generation_count != generation)
            || node.layout.last_owner_direction != Some(request.owner_direction)
            || node.layout.config_generation != config_generation;

        let cached = if need_to_visit {
            node.layout.cache.invalidate();
            None
        } else {
            let measured_leaf = node.has_measure_func();
            let direction = node.resolve_direction(request.owner_direction);
            let (margin_row, margin_column) = if measured_leaf {
                (
                    node.margin_for_axis(FlexDirection::Row, direction, request.owner_width),
                    node.margin_for_axis(FlexDirection::Column, direction, request.owner_width),
                )
            } else {
                (0.0, 0.0)
            };
            let query = CacheQuery {
                width: request.available_width,
                height: request.available_height,
                width_mode: request.width_mode,
                height_mode: request.height_mode,
                margin_row,
                margin_column,
                point_scale_factor: scale,
            };
            node.layout
                .cache
                .lookup(&query, request.perform_layout, measured_leaf)
        };

        if let Some(size) = cached {
            log::trace!(
                "{:indent$}{id:?} cache hit ({reason:?}): {}x{}",
                "",
                size.width,
                size.height,
                indent = self.depth
            );
            node.layout.measured_dimensions = [size.width, size.height];
        } else {
            log::trace!(
                "{:indent$}{id:?} {reason:?}: {} ({}) x {} ({}) layout={}",
                "",
                request.available_width,
                request.width_mode,
                request.available_height,
                request.height_mode,
                request.perform_layout,
                indent = self.depth
            );
            self.layout_impl(id, request);

            let layout = &mut self.nodes[id].layout;
            layout.last_owner_direction = Some(request.owner_direction);
            let entry = CachedMeasurement {
                available_width: request.available_width,
                available_height: request.available_height,
                width_mode: request.width_mode,
                height_mode: request.height_mode,
                computed_width: layout.measured_dimensions[0],
                computed_height: layout.measured_dimensions[1],
            };
            layout.cache.store(entry, request.perform_layout);
        }

        let node = &mut self.nodes[id];
        if request.perform_layout {
            node.layout.dimensions = node.layout.measured_dimensions;
            node.flags.has_new_layout = true;
            node.flags.is_dirty = false;
        }
        node.layout.generation_count = generation;
        node.layout.config_generation = config_generation;
        self.depth -= 1;
    }

    /// Run the flex algorithm on one node.
    fn layout_impl(&mut self, id: NodeId, request: &SizingRequest) {
        let SizingRequest {
            available_width,
            available_height,
            owner_direction,
            width_mode,
            height_mode,
            owner_width,
            owner_height,
            perform_layout,
        } = *request;

        let node = &mut self.nodes[id];
        let direction = node.resolve_direction(owner_direction);
        node.layout.direction = direction;
        for (index, edge) in flexel_core::Edge::PHYSICAL.into_iter().enumerate() {
            node.layout.margin[index] = node
                .style
                .margin()
                .computed(edge, direction)
                .resolve_or_zero(owner_width);
            node.layout.border[index] = node.edge_border(edge, direction);
            node.layout.padding[index] = node.edge_padding(edge, direction, owner_width);
        }

        if node.has_measure_func() {
            self.measure_leaf(id, request);
            return;
        }
        if node.children.is_empty() {
            self.size_empty_container(id, request);
            return;
        }
        if !perform_layout && self.size_fixed_container(id, request) {
            return;
        }

        clone_children(self.nodes, self.config, id);
        self.nodes[id].layout.had_overflow = false;

        // Axes and box metrics.
        let node = &self.nodes[id];
        let style = node.style;
        let main = style.flex_direction().resolve(direction);
        let cross = main.cross(direction);
        let is_row = main.is_row();
        let wrap = style.flex_wrap() != Wrap::NoWrap;
        let (main_owner_size, cross_owner_size) = if is_row {
            (owner_width, owner_height)
        } else {
            (owner_height, owner_width)
        };
        let leading_pb_cross = node.leading_padding_and_border(cross, direction, owner_width);
        let pb_main = node.padding_and_border_for_axis(main, direction, owner_width);
        let pb_cross = node.padding_and_border_for_axis(cross, direction, owner_width);
        let (main_mode, cross_mode) = if is_row {
            (width_mode, height_mode)
        } else {
            (height_mode, width_mode)
        };
        let margin_row = node.margin_for_axis(FlexDirection::Row, direction, owner_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, direction, owner_width);
        let main_dimension = dim(main);
        let min_inner_main =
            style.min_dimension(main_dimension).resolve(main_owner_size).raw() - pb_main;
        let max_inner_main =
            style.max_dimension(main_dimension).resolve(main_owner_size).raw() - pb_main;

        // Space available to children.
        let inner_width = available_inner_dim(
            node,
            FlexDirection::Row,
            direction,
            available_width,
            owner_width,
            owner_width,
        );
        let inner_height = available_inner_dim(
            node,
            FlexDirection::Column,
            direction,
            available_height,
            owner_height,
            owner_width,
        );
        let (inner_main, inner_cross) = if is_row {
            (inner_width, inner_height)
        } else {
            (inner_height, inner_width)
        };

        let mut ctx = FlexContext {
            id,
            direction,
            main,
            cross,
            is_row,
            wrap,
            main_owner_size,
            owner_width,
            inner_width,
            inner_height,
            inner_main,
            inner_cross,
            percent_main: inner_main,
            main_mode,
            cross_mode,
            perform_layout,
            basis_overflows: false,
        };

        // Flex basis of every in-flow child.
        let total_outer_basis = self.compute_flex_basis_for_children(&ctx, width_mode, height_mode);
        ctx.basis_overflows = main_mode != MeasureMode::Undefined && total_outer_basis > inner_main;
        if wrap && ctx.basis_overflows && main_mode == MeasureMode::AtMost {
            ctx.main_mode = MeasureMode::Exactly;
        }

        // Lines: collect, flex, justify, align.
        let child_count = self.nodes[id].children.len();
        let mut lines: Vec<FlexLine> = Vec::new();
        let mut total_line_cross = 0.0f32;
        let mut max_line_main = 0.0f32;
        let mut start = 0;
        while start < child_count {
            let mut line = self.collect_line(&ctx, start, lines.len());
            let can_skip_flex = !perform_layout && ctx.cross_mode == MeasureMode::Exactly;

            let mut size_based_on_content = false;
            if ctx.main_mode != MeasureMode::Exactly {
                if !min_inner_main.is_nan() && line.size_consumed < min_inner_main {
                    ctx.inner_main = min_inner_main;
                } else if !max_inner_main.is_nan() && line.size_consumed > max_inner_main {
                    ctx.inner_main = max_inner_main;
                } else {
                    let legacy = self.config.use_legacy_stretch_behaviour;
                    if !legacy
                        && (line.total_grow == 0.0 || self.nodes[id].resolve_flex_grow() == 0.0)
                    {
                        ctx.inner_main = line.size_consumed;
                    }
                    size_based_on_content = !legacy;
                }
            }
            if !size_based_on_content && !ctx.inner_main.is_nan() {
                line.remaining_free_space = ctx.inner_main - line.size_consumed;
            } else if line.size_consumed < 0.0 {
                line.remaining_free_space = -line.size_consumed;
            }

            if !can_skip_flex {
                self.resolve_flexible_length(&ctx, &mut line);
            }
            self.nodes[id].layout.had_overflow |= line.remaining_free_space < 0.0;

            self.justify_main_axis(&ctx, &mut line);

            let node = &self.nodes[id];
            let mut container_cross = ctx.inner_cross;
            if ctx.cross_mode != MeasureMode::Exactly {
                container_cross = node.bound_axis(
                    cross,
                    direction,
                    line.cross_dim + pb_cross,
                    cross_owner_size,
                    owner_width,
                ) - pb_cross;
            }
            if !wrap && ctx.cross_mode == MeasureMode::Exactly {
                line.cross_dim = ctx.inner_cross;
            }
            line.cross_dim = node.bound_axis(
                cross,
                direction,
                line.cross_dim + pb_cross,
                cross_owner_size,
                owner_width,
            ) - pb_cross;

            if perform_layout {
                self.align_cross_axis(&ctx, &line, container_cross, total_line_cross, leading_pb_cross);
            }

            total_line_cross += line.cross_dim;
            max_line_main = max_line_main.max(line.main_dim);
            start = line.end;
            lines.push(line);
        }

        // Multi-line distribution and baselines.
        if perform_layout && (lines.len() > 1 || self.is_baseline_layout(id)) {
            self.align_lines(&ctx, &lines, total_line_cross, leading_pb_cross);
        }

        // Final dimensions.
        let node = &self.nodes[id];
        let scroll = style.overflow() == Overflow::Scroll;
        let mut measured = [
            node.bound_axis(
                FlexDirection::Row,
                direction,
                available_width - margin_row,
                owner_width,
                owner_width,
            ),
            node.bound_axis(
                FlexDirection::Column,
                direction,
                available_height - margin_column,
                owner_height,
                owner_width,
            ),
        ];
        let content_size = |mode: MeasureMode, axis, content: f32, inner: f32, pb: f32, owner| {
            if mode == MeasureMode::Undefined || (!scroll && mode == MeasureMode::AtMost) {
                Some(node.bound_axis(axis, direction, content, owner, owner_width))
            } else if mode == MeasureMode::AtMost {
                let bounded = node
                    .bound_axis_within_min_max(axis, FloatOptional::new(content), owner)
                    .raw();
                Some(float_max(float_min(inner + pb, bounded), pb))
            } else {
                None
            }
        };
        if let Some(size) =
            content_size(ctx.main_mode, main, max_line_main, ctx.percent_main, pb_main, main_owner_size)
        {
            measured[main_dimension as usize] = size;
        }
        if let Some(size) = content_size(
            ctx.cross_mode,
            cross,
            total_line_cross + pb_cross,
            ctx.inner_cross,
            pb_cross,
            cross_owner_size,
        ) {
            measured[dim(cross) as usize] = size;
        }
        self.nodes[id].layout.measured_dimensions = measured;

        if !perform_layout {
            return;
        }

        let children = self.nodes[id].children.clone();
        if style.flex_wrap() == Wrap::WrapReverse {
            let container_cross = measured[dim(cross) as usize];
            for &child_id in &children {
                let child = &mut self.nodes[child_id];
                if child.style.position_type() != PositionType::Relative
                    || child.style.display() == Display::None
                {
                    continue;
                }
                let edge = leading(cross);
                let flipped = container_cross
                    - child.layout.position_at(edge)
                    - child.layout.measured(dim(cross));
                child.layout.set_position_at(edge, flipped);
            }
        }

        for &child_id in &children {
            let child = &self.nodes[child_id];
            if child.style.position_type() == PositionType::Absolute
                && child.style.display() != Display::None
            {
                let container_width_mode = if is_row { ctx.main_mode } else { ctx.cross_mode };
                self.layout_absolute_child(&ctx, child_id, container_width_mode);
            }
        }

        // Reverse axes were laid out from their far edge.
        let reverse_main = main.is_reverse();
        let reverse_cross = cross.is_reverse();
        if reverse_main || reverse_cross {
            for &child_id in &children {
                let child = &mut self.nodes[child_id];
                if child.style.display() == Display::None {
                    continue;
                }
                if reverse_main {
                    set_trailing_position(measured, child, main);
                }
                if reverse_cross {
                    set_trailing_position(measured, child, cross);
                }
            }
        }
    }

    fn measure_leaf(&mut self, id: NodeId, request: &SizingRequest) {
        let node = &self.nodes[id];
        let direction = node.layout.direction;
        let owner_width = request.owner_width;
        let pb_row = node.padding_and_border_for_axis(FlexDirection::Row, direction, owner_width);
        let pb_column =
            node.padding_and_border_for_axis(FlexDirection::Column, direction, owner_width);
        let margin_row = node.margin_for_axis(FlexDirection::Row, direction, owner_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, direction, owner_width);
        let (available_width, available_height) =
            (request.available_width, request.available_height);
        let (width_mode, height_mode) = (request.width_mode, request.height_mode);

        let (width, height) =
            if width_mode == MeasureMode::Exactly && height_mode == MeasureMode::Exactly {
                (available_width - margin_row, available_height - margin_column)
            } else {
                let inner = |available: f32, used: f32| {
                    if available.is_nan() {
                        available
                    } else {
                        (available - used).max(0.0)
                    }
                };
                let inner_width = inner(available_width, margin_row + pb_row);
                let inner_height = inner(available_height, margin_column + pb_column);
                let measured = match node.measure.clone() {
                    Some(measure) => {
                        let size = measure.call(
                            inner_width,
                            width_mode,
                            inner_height,
                            height_mode,
                            &mut *self.context,
                        );
                        sanitize_measurement(id, size)
                    }
                    None => Size::ZERO,
                };
                log::trace!(
                    "measured {id:?} at {inner_width} ({width_mode}) x {inner_height} ({height_mode}): {}x{}",
                    measured.width,
                    measured.height
                );
                (
                    if width_mode == MeasureMode::Exactly {
                        available_width - margin_row
                    } else {
                        measured.width + pb_row
                    },
                    if height_mode == MeasureMode::Exactly {
                        available_height - margin_column
                    } else {
                        measured.height + pb_column
                    },
                )
            };

        self.set_bounded_measured(id, request, width, height);
    }

    fn size_empty_container(&mut self, id: NodeId, request: &SizingRequest) {
        let node = &self.nodes[id];
        let direction = node.layout.direction;
        let owner_width = request.owner_width;
        let width = if request.width_mode == MeasureMode::Exactly {
            request.available_width - node.margin_for_axis(FlexDirection::Row, direction, owner_width)
        } else {
            node.padding_and_border_for_axis(FlexDirection::Row, direction, owner_width)
        };
        let height = if request.height_mode == MeasureMode::Exactly {
            request.available_height
                - node.margin_for_axis(FlexDirection::Column, direction, owner_width)
        } else {
            node.padding_and_border_for_axis(FlexDirection::Column, direction, owner_width)
        };
        self.set_bounded_measured(id, request, width, height);
    }

    /// Size a container whose constraints already fix its size, without visiting its
    /// children. Returns `false` when the constraints leave the size open.
    fn size_fixed_container(&mut self, id: NodeId, request: &SizingRequest) -> bool {
        let SizingRequest {
            available_width,
            available_height,
            width_mode,
            height_mode,
            owner_width,
            ..
        } = *request;
        let zero_at_most =
            |available: f32, mode| !available.is_nan() && mode == MeasureMode::AtMost && available <= 0.0;
        let fixed = zero_at_most(available_width, width_mode)
            || zero_at_most(available_height, height_mode)
            || (width_mode == MeasureMode::Exactly && height_mode == MeasureMode::Exactly);
        if !fixed {
            return false;
        }

        let node = &self.nodes[id];
        let direction = node.layout.direction;
        let size = |available: f32, mode, margin: f32| {
            if available.is_nan() || (mode == MeasureMode::AtMost && available < 0.0) {
                0.0
            } else {
                available - margin
            }
        };
        let width = size(
            available_width,
            width_mode,
            node.margin_for_axis(FlexDirection::Row, direction, owner_width),
        );
        let height = size(
            available_height,
            height_mode,
            node.margin_for_axis(FlexDirection::Column, direction, owner_width),
        );
        self.set_bounded_measured(id, request, width, height);
        true
    }

    fn set_bounded_measured(&mut self, id: NodeId, request: &SizingRequest, width: f32, height: f32) {
        let node = &mut self.nodes[id];
        let direction = node.layout.direction;
        let owner_width = request.owner_width;
        let width = node.bound_axis(FlexDirection::Row, direction, width, owner_width, owner_width);
        let height = node.bound_axis(
            FlexDirection::Column,
            direction,
            height,
            request.owner_height,
            owner_width,
        );
        node.layout.measured_dimensions = [width, height];
    }

    /// Compute the flex basis of every child and return the sum of the outer bases.
    fn compute_flex_basis_for_children(
        &mut self,
        ctx: &FlexContext,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
    ) -> f32 {
        let children = self.nodes[ctx.id].children.clone();
        let main_mode = if ctx.is_row { width_mode } else { height_mode };
        let single_flex_child = if main_mode == MeasureMode::Exactly {
            self.single_flex_child(&children)
        } else {
            None
        };

        let (main_size, cross_size) = if ctx.is_row {
            (ctx.inner_width, ctx.inner_height)
        } else {
            (ctx.inner_height, ctx.inner_width)
        };
        let mut total = 0.0;
        for child_id in children {
            let child = &mut self.nodes[child_id];
            child.resolve_dimensions();
            if child.style.display() == Display::None {
                self.zero_out_layout(child_id);
                continue;
            }
            let child_direction = child.resolve_direction(ctx.direction);
            if ctx.perform_layout {
                child.set_position(
                    child_direction,
                    ctx.main,
                    ctx.cross,
                    main_size,
                    cross_size,
                    ctx.inner_width,
                );
            }
            if child.style.position_type() == PositionType::Absolute {
                continue;
            }

            if Some(child_id) == single_flex_child {
                child.layout.computed_flex_basis_generation = self.generation;
                child.layout.computed_flex_basis = FloatOptional::new(0.0);
            } else {
                self.compute_flex_basis_for_child(ctx, child_id, width_mode);
            }

            let child = &self.nodes[child_id];
            total += (child.layout.computed_flex_basis
                + child.margin_for_axis(ctx.main, child_direction, ctx.inner_width))
            .raw();
        }
        total
    }

    /// The only flexible child when exactly one child both grows and shrinks.
    fn single_flex_child(&self, children: &[NodeId]) -> Option<NodeId> {
        let mut single = None;
        for &child_id in children {
            let child = &self.nodes[child_id];
            if !child.is_flexible() {
                continue;
            }
            if single.is_some()
                || float_eq(child.resolve_flex_grow(), 0.0)
                || float_eq(child.resolve_flex_shrink(), 0.0)
            {
                return None;
            }
            single = Some(child_id);
        }
        single
    }

    fn compute_flex_basis_for_child(
        &mut self,
        ctx: &FlexContext,
        child_id: NodeId,
        width_mode: MeasureMode,
    ) {
        let width = ctx.inner_width;
        let height = ctx.inner_height;
        let owner = &self.nodes[ctx.id];
        let owner_overflow = owner.style.overflow();
        let child = &self.nodes[child_id];
        let align = crate::node::align_item(owner, child);
        let direction = child.resolve_direction(ctx.direction);
        let main_size = if ctx.is_row { width } else { height };
        let resolved_basis = child.resolve_flex_basis().resolve(main_size);
        let row_defined = child.is_style_dim_defined(FlexDirection::Row, width);
        let column_defined = child.is_style_dim_defined(FlexDirection::Column, height);

        if resolved_basis.is_defined() && !main_size.is_nan() {
            let stale = child.layout.computed_flex_basis.is_undefined()
                || (self.config.experimental_features.web_flex_basis
                    && child.layout.computed_flex_basis_generation != self.generation);
            if stale {
                let padding_and_border =
                    child.padding_and_border_for_axis(ctx.main, direction, width);
                let basis = resolved_basis.max_defined(FloatOptional::new(padding_and_border));
                self.nodes[child_id].layout.computed_flex_basis = basis;
            }
        } else if ctx.is_row && row_defined {
            let padding_and_border =
                child.padding_and_border_for_axis(FlexDirection::Row, direction, width);
            let basis = child
                .resolved_dimension(Dimension::Width)
                .resolve(width)
                .max_defined(FloatOptional::new(padding_and_border));
            self.nodes[child_id].layout.computed_flex_basis = basis;
        } else if !ctx.is_row && column_defined {
            let padding_and_border =
                child.padding_and_border_for_axis(FlexDirection::Column, direction, width);
            let basis = child
                .resolved_dimension(Dimension::Height)
                .resolve(height)
                .max_defined(FloatOptional::new(padding_and_border));
            self.nodes[child_id].layout.computed_flex_basis = basis;
        } else {
            // Size from content.
            let margin_row = child.margin_for_axis(FlexDirection::Row, direction, width);
            let margin_column = child.margin_for_axis(FlexDirection::Column, direction, width);
            let (mut child_width, mut child_width_mode) = (UNDEFINED, MeasureMode::Undefined);
            let (mut child_height, mut child_height_mode) = (UNDEFINED, MeasureMode::Undefined);

            if row_defined {
                child_width =
                    child.resolved_dimension(Dimension::Width).resolve(width).raw() + margin_row;
                child_width_mode = MeasureMode::Exactly;
            }
            if column_defined {
                child_height = child.resolved_dimension(Dimension::Height).resolve(height).raw()
                    + margin_column;
                child_height_mode = MeasureMode::Exactly;
            }

            // A scrolling container leaves its main axis unconstrained.
            let scroll = owner_overflow == Overflow::Scroll;
            if (!scroll || !ctx.is_row) && child_width.is_nan() && !width.is_nan() {
                child_width = width;
                child_width_mode = MeasureMode::AtMost;
            }
            if (!scroll || ctx.is_row) && child_height.is_nan() && !height.is_nan() {
                child_height = height;
                child_height_mode = MeasureMode::AtMost;
            }

            let ratio = child.style.aspect_ratio().get();
            if let Some(ratio) = ratio {
                if !ctx.is_row && child_width_mode == MeasureMode::Exactly {
                    child_height = margin_column + (child_width - margin_row) / ratio;
                    child_height_mode = MeasureMode::Exactly;
                } else if ctx.is_row && child_height_mode == MeasureMode::Exactly {
                    child_width = margin_row + (child_height - margin_column) * ratio;
                    child_width_mode = MeasureMode::Exactly;
                }
            }

            // Stretched children take the exact cross size.
            let height_mode = if ctx.is_row { ctx.cross_mode } else { ctx.main_mode };
            let stretch = align == flexel_core::Align::Stretch;
            if !ctx.is_row
                && !row_defined
                && !width.is_nan()
                && width_mode == MeasureMode::Exactly
                && stretch
                && child_width_mode != MeasureMode::Exactly
            {
                child_width = width;
                child_width_mode = MeasureMode::Exactly;
                if let Some(ratio) = ratio {
                    child_height = margin_column + (child_width - margin_row) / ratio;
                    child_height_mode = MeasureMode::Exactly;
                }
            }
            if ctx.is_row
                && !column_defined
                && !height.is_nan()
                && height_mode == MeasureMode::Exactly
                && stretch
                && child_height_mode != MeasureMode::Exactly
            {
                child_height = height;
                child_height_mode = MeasureMode::Exactly;
                if let Some(ratio) = ratio {
                    child_width = margin_row + (child_height - margin_column) * ratio;
                    child_width_mode = MeasureMode::Exactly;
                }
            }

            let (child_width_mode, child_width) = constrain_max_size_for_mode(
                child,
                FlexDirection::Row,
                direction,
                width,
                width,
                child_width_mode,
                child_width,
            );
            let (child_height_mode, child_height) = constrain_max_size_for_mode(
                child,
                FlexDirection::Column,
                direction,
                height,
                width,
                child_height_mode,
                child_height,
            );

            let request = SizingRequest {
                available_width: child_width,
                available_height: child_height,
                owner_direction: ctx.direction,
                width_mode: child_width_mode,
                height_mode: child_height_mode,
                owner_width: width,
                owner_height: height,
                perform_layout: false,
            };
            self.layout_node_internal(child_id, &request, PassReason::MeasureChild);

            let child = &mut self.nodes[child_id];
            let basis = float_max(
                child.layout.measured(dim(ctx.main)),
                child.padding_and_border_for_axis(ctx.main, direction, width),
            );
            child.layout.computed_flex_basis = FloatOptional::new(basis);
        }
        self.nodes[child_id].layout.computed_flex_basis_generation = self.generation;
    }

    /// Reset the layout of a `display: none` subtree to zero.
    fn zero_out_layout(&mut self, id: NodeId) {
        clone_children(self.nodes, self.config, id);
        let node = &mut self.nodes[id];
        node.layout = Layout::zeroed();
        node.flags.has_new_layout = true;
        node.flags.is_dirty = false;
        let children = node.children.clone();
        for child in children {
            self.zero_out_layout(child);
        }
    }
}

/// Mirror a position laid out from the far edge of a reverse axis.
fn set_trailing_position(container: [f32; 2], child: &mut Node, axis: FlexDirection) {
    let dimension = dim(axis) as usize;
    let size = child.layout.measured_dimensions[dimension];
    let lead = child.layout.position_at(leading(axis));
    child
        .layout
        .set_position_at(trailing(axis), container[dimension] - size - lead);
}
