//! Flex line steps: collecting items into lines, resolving flexible lengths, main-axis
//! justification and cross-axis alignment.

use crate::axis::{dim, leading};
use crate::engine::{constrain_max_size_for_mode, LayoutEngine, PassReason, SizingRequest};
use crate::node::align_item;
use crate::tree::NodeId;
use flexel_core::{
    float_eq, float_max, Align, Direction, Display, Edge, FlexDirection, Justify, Length,
    MeasureMode, PositionType,
};

/// Per-container values shared by the line steps.
#[derive(Debug, Clone)]
pub(crate) struct FlexContext {
    pub(crate) id: NodeId,
    pub(crate) direction: Direction,
    pub(crate) main: FlexDirection,
    pub(crate) cross: FlexDirection,
    pub(crate) is_row: bool,
    pub(crate) wrap: bool,
    pub(crate) main_owner_size: f32,
    pub(crate) owner_width: f32,
    pub(crate) inner_width: f32,
    pub(crate) inner_height: f32,
    /// Inner main size; shrinks to the content of a line when the main size is open.
    pub(crate) inner_main: f32,
    pub(crate) inner_cross: f32,
    /// Inner main size before any per-line adjustment, used to resolve percentages.
    pub(crate) percent_main: f32,
    pub(crate) main_mode: MeasureMode,
    pub(crate) cross_mode: MeasureMode,
    pub(crate) perform_layout: bool,
    pub(crate) basis_overflows: bool,
}

impl FlexContext {
    fn direction_of(&self, engine: &LayoutEngine<'_>, child: NodeId) -> Direction {
        engine.nodes[child].resolve_direction(self.direction)
    }
}

/// One line of in-flow items.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlexLine {
    /// Child index range covered by the line, including out-of-flow children.
    pub(crate) start: usize,
    pub(crate) end: usize,
    /// Relative, displayed children in order.
    pub(crate) items: Vec<NodeId>,
    pub(crate) size_consumed: f32,
    pub(crate) total_grow: f32,
    pub(crate) total_shrink_scaled: f32,
    pub(crate) remaining_free_space: f32,
    /// Main size of the line, padding and border included.
    pub(crate) main_dim: f32,
    pub(crate) cross_dim: f32,
    /// Items are aligned on their baselines.
    pub(crate) baseline: bool,
}

fn is_auto(length: Length) -> bool {
    length == Length::Auto
}

impl LayoutEngine<'_> {
    /// Gather the items of the line starting at child `start`.
    pub(crate) fn collect_line(
        &mut self,
        ctx: &FlexContext,
        start: usize,
        line_index: usize,
    ) -> FlexLine {
        let children = self.nodes[ctx.id].children.clone();
        let mut line = FlexLine {
            start,
            end: children.len(),
            ..FlexLine::default()
        };

        for (index, &child_id) in children.iter().enumerate().skip(start) {
            let child_direction = ctx.direction_of(self, child_id);
            let child = &mut self.nodes[child_id];
            if child.style.display() == Display::None
                || child.style.position_type() == PositionType::Absolute
            {
                continue;
            }
            child.line_index = line_index;
            let margin = child.margin_for_axis(ctx.main, child_direction, ctx.inner_width);
            let basis = child
                .bound_axis_within_min_max(ctx.main, child.layout.computed_flex_basis, ctx.percent_main)
                .raw();

            if ctx.wrap
                && !line.items.is_empty()
                && line.size_consumed + basis + margin > ctx.inner_main
            {
                line.end = index;
                break;
            }

            line.size_consumed += basis + margin;
            if child.is_flexible() {
                line.total_grow += child.resolve_flex_grow();
                line.total_shrink_scaled +=
                    -child.resolve_flex_shrink() * child.layout.computed_flex_basis.raw();
            }
            line.items.push(child_id);
        }

        if line.total_grow > 0.0 && line.total_grow < 1.0 {
            line.total_grow = 1.0;
        }
        if line.total_shrink_scaled > 0.0 && line.total_shrink_scaled < 1.0 {
            line.total_shrink_scaled = 1.0;
        }
        log::trace!(
            "line {line_index} of {:?}: children {}..{}, consumed {}",
            ctx.id,
            line.start,
            line.end,
            line.size_consumed
        );
        line
    }

    /// Distribute the line's free space among its items and lay them out at their
    /// final main size.
    pub(crate) fn resolve_flexible_length(&mut self, ctx: &FlexContext, line: &mut FlexLine) {
        let original_free_space = line.remaining_free_space;
        self.freeze_violating_items(ctx, line);
        let distributed = self.distribute_free_space(ctx, line);
        line.remaining_free_space = original_free_space - distributed;
    }

    /// First pass: items whose flexed size would violate their min/max stop
    /// participating, and their clamped growth leaves the free space.
    fn freeze_violating_items(&self, ctx: &FlexContext, line: &mut FlexLine) {
        let mut delta = 0.0;
        for &child_id in &line.items {
            let child = &self.nodes[child_id];
            let direction = child.resolve_direction(ctx.direction);
            let basis = child
                .bound_axis_within_min_max(ctx.main, child.layout.computed_flex_basis, ctx.percent_main)
                .raw();

            let (factor, total) = if line.remaining_free_space < 0.0 {
                (-child.resolve_flex_shrink() * basis, line.total_shrink_scaled)
            } else if line.remaining_free_space > 0.0 {
                (child.resolve_flex_grow(), line.total_grow)
            } else {
                continue;
            };
            if factor.is_nan() || factor == 0.0 {
                continue;
            }
            let base = basis + line.remaining_free_space / total * factor;
            let bound = child.bound_axis(ctx.main, direction, base, ctx.percent_main, ctx.inner_width);
            if !base.is_nan() && !bound.is_nan() && base != bound {
                delta += bound - basis;
                if line.remaining_free_space < 0.0 {
                    line.total_shrink_scaled -= factor;
                } else {
                    line.total_grow -= factor;
                }
            }
        }
        line.remaining_free_space -= delta;
    }

    /// Second pass: size every item and return the space handed out.
    fn distribute_free_space(&mut self, ctx: &FlexContext, line: &FlexLine) -> f32 {
        let remaining = line.remaining_free_space;
        let mut delta = 0.0;
        for &child_id in &line.items {
            let child = &self.nodes[child_id];
            let direction = child.resolve_direction(ctx.direction);
            let basis = child
                .bound_axis_within_min_max(ctx.main, child.layout.computed_flex_basis, ctx.percent_main)
                .raw();
            let mut main_size = basis;
            if remaining < 0.0 {
                let factor = -child.resolve_flex_shrink() * basis;
                if factor != 0.0 {
                    let size = if line.total_shrink_scaled == 0.0 {
                        basis + factor
                    } else {
                        basis + remaining / line.total_shrink_scaled * factor
                    };
                    main_size =
                        child.bound_axis(ctx.main, direction, size, ctx.percent_main, ctx.inner_width);
                }
            } else if remaining > 0.0 {
                let factor = child.resolve_flex_grow();
                if !factor.is_nan() && factor != 0.0 {
                    main_size = child.bound_axis(
                        ctx.main,
                        direction,
                        basis + remaining / line.total_grow * factor,
                        ctx.percent_main,
                        ctx.inner_width,
                    );
                }
            }
            delta += main_size - basis;

            let owner = &self.nodes[ctx.id];
            let align = align_item(owner, child);
            let margin_main = child.margin_for_axis(ctx.main, direction, ctx.inner_width);
            let margin_cross = child.margin_for_axis(ctx.cross, direction, ctx.inner_width);
            let auto_cross_margin = is_auto(child.margin_leading_value(ctx.cross, direction))
                || is_auto(child.margin_trailing_value(ctx.cross, direction));
            let cross_defined = child.is_style_dim_defined(ctx.cross, ctx.inner_cross);

            let child_main = main_size + margin_main;
            let mut child_main_mode = MeasureMode::Exactly;
            let mut child_cross;
            let mut child_cross_mode;
            if let Some(ratio) = child.style.aspect_ratio().get() {
                child_cross = if ctx.is_row {
                    (child_main - margin_main) / ratio
                } else {
                    (child_main - margin_main) * ratio
                } + margin_cross;
                child_cross_mode = MeasureMode::Exactly;
            } else if !ctx.inner_cross.is_nan()
                && !cross_defined
                && ctx.cross_mode == MeasureMode::Exactly
                && !(ctx.wrap && ctx.basis_overflows)
                && align == Align::Stretch
                && !auto_cross_margin
            {
                child_cross = ctx.inner_cross;
                child_cross_mode = MeasureMode::Exactly;
            } else if !cross_defined {
                child_cross = ctx.inner_cross;
                child_cross_mode = if child_cross.is_nan() {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::AtMost
                };
            } else {
                let resolved = child.resolved_dimension(dim(ctx.cross));
                child_cross = resolved.resolve(ctx.inner_cross).raw() + margin_cross;
                let loose_percent =
                    matches!(resolved, Length::Percent(_)) && ctx.cross_mode != MeasureMode::Exactly;
                child_cross_mode = if child_cross.is_nan() || loose_percent {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::Exactly
                };
            }

            let mut child_main_size = child_main;
            (child_main_mode, child_main_size) = constrain_max_size_for_mode(
                child,
                ctx.main,
                direction,
                ctx.percent_main,
                ctx.inner_width,
                child_main_mode,
                child_main_size,
            );
            (child_cross_mode, child_cross) = constrain_max_size_for_mode(
                child,
                ctx.cross,
                direction,
                ctx.inner_cross,
                ctx.inner_width,
                child_cross_mode,
                child_cross,
            );
            let requires_stretch = !cross_defined && align == Align::Stretch && !auto_cross_margin;

            let (width, width_mode, height, height_mode) = if ctx.is_row {
                (child_main_size, child_main_mode, child_cross, child_cross_mode)
            } else {
                (child_cross, child_cross_mode, child_main_size, child_main_mode)
            };
            let request = SizingRequest {
                available_width: width,
                available_height: height,
                owner_direction: ctx.direction,
                width_mode,
                height_mode,
                owner_width: ctx.inner_width,
                owner_height: ctx.inner_height,
                perform_layout: ctx.perform_layout && !requires_stretch,
            };
            self.layout_node_internal(child_id, &request, PassReason::Flex);
            let child_overflow = self.nodes[child_id].layout.had_overflow;
            self.nodes[ctx.id].layout.had_overflow |= child_overflow;
        }
        delta
    }

    /// Place items along the main axis and measure the line.
    pub(crate) fn justify_main_axis(&mut self, ctx: &FlexContext, line: &mut FlexLine) {
        let node = &self.nodes[ctx.id];
        let style = node.style;
        let leading_pb = node.leading_padding_and_border(ctx.main, ctx.direction, ctx.owner_width);
        let trailing_pb = node.trailing_padding_and_border(ctx.main, ctx.direction, ctx.owner_width);

        // An open main size only leaves room to distribute up to the min dimension.
        if ctx.main_mode == MeasureMode::AtMost && line.remaining_free_space > 0.0 {
            line.remaining_free_space = match style
                .min_dimension(dim(ctx.main))
                .resolve(ctx.main_owner_size)
                .get()
            {
                Some(min) => {
                    let min_inner = min - leading_pb - trailing_pb;
                    let occupied = ctx.inner_main - line.remaining_free_space;
                    float_max(0.0, min_inner - occupied)
                }
                None => 0.0,
            };
        }
        let remaining = line.remaining_free_space;

        let mut auto_margins = 0u16;
        for &child_id in &line.items {
            let child = &self.nodes[child_id];
            let direction = child.resolve_direction(ctx.direction);
            auto_margins += u16::from(is_auto(child.margin_leading_value(ctx.main, direction)));
            auto_margins += u16::from(is_auto(child.margin_trailing_value(ctx.main, direction)));
        }

        let count = line.items.len();
        let (leading_space, between) = if auto_margins > 0 || count == 0 {
            (0.0, 0.0)
        } else {
            match style.justify_content() {
                Justify::FlexStart => (0.0, 0.0),
                Justify::Center => (remaining / 2.0, 0.0),
                Justify::FlexEnd => (remaining, 0.0),
                Justify::SpaceBetween if count > 1 => {
                    (0.0, float_max(remaining, 0.0) / (count - 1) as f32)
                }
                Justify::SpaceBetween => (0.0, 0.0),
                Justify::SpaceEvenly => {
                    let space = remaining / (count + 1) as f32;
                    (space, space)
                }
                Justify::SpaceAround => {
                    let space = remaining / count as f32;
                    (space / 2.0, space)
                }
            }
        };
        let auto_margin_space = if auto_margins > 0 {
            remaining / f32::from(auto_margins)
        } else {
            0.0
        };

        line.baseline = self.is_baseline_layout(ctx.id) && self.line_has_baseline(ctx, line);
        let can_skip_flex = !ctx.perform_layout && ctx.cross_mode == MeasureMode::Exactly;
        let mut main_dim = leading_pb + leading_space;
        let mut cross_dim = 0.0f32;
        let mut max_ascent = 0.0f32;
        let mut max_descent = 0.0f32;

        for &child_id in &line.items {
            let direction = ctx.direction_of(self, child_id);
            let child = &mut self.nodes[child_id];
            if is_auto(child.margin_leading_value(ctx.main, direction)) {
                main_dim += auto_margin_space;
            }
            if ctx.perform_layout {
                let edge = leading(ctx.main);
                let position = child.layout.position_at(edge) + main_dim;
                child.layout.set_position_at(edge, position);
            }
            if is_auto(child.margin_trailing_value(ctx.main, direction)) {
                main_dim += auto_margin_space;
            }

            if can_skip_flex {
                main_dim += between
                    + child.margin_for_axis(ctx.main, direction, ctx.inner_width)
                    + child.layout.computed_flex_basis.raw();
                cross_dim = ctx.inner_cross;
            } else {
                main_dim += between + child.dim_with_margin(ctx.main, direction, ctx.inner_width);
                if line.baseline {
                    let height = child.layout.measured_height();
                    let leading_margin =
                        child.leading_margin(FlexDirection::Column, direction, ctx.inner_width);
                    let margin_column =
                        child.margin_for_axis(FlexDirection::Column, direction, ctx.inner_width);
                    let ascent = self.baseline(child_id).unwrap_or(height) + leading_margin;
                    let descent = height + margin_column - ascent;
                    max_ascent = max_ascent.max(ascent);
                    max_descent = max_descent.max(descent);
                } else {
                    cross_dim = float_max(
                        cross_dim,
                        child.dim_with_margin(ctx.cross, direction, ctx.inner_width),
                    );
                }
            }
        }
        main_dim += trailing_pb;
        if line.baseline {
            cross_dim = max_ascent + max_descent;
        }
        line.main_dim = main_dim;
        line.cross_dim = cross_dim;
    }

    /// Position (or stretch) each item of `line` within the line's cross size.
    pub(crate) fn align_cross_axis(
        &mut self,
        ctx: &FlexContext,
        line: &FlexLine,
        container_cross: f32,
        total_line_cross: f32,
        leading_pb_cross: f32,
    ) {
        for &child_id in &line.items {
            let owner = &self.nodes[ctx.id];
            let child = &self.nodes[child_id];
            let direction = child.resolve_direction(ctx.direction);
            let align = align_item(owner, child);
            let leading_auto = is_auto(child.margin_leading_value(ctx.cross, direction));
            let trailing_auto = is_auto(child.margin_trailing_value(ctx.cross, direction));
            let mut lead = leading_pb_cross;

            if align == Align::Stretch && !leading_auto && !trailing_auto {
                if !child.is_style_dim_defined(ctx.cross, ctx.inner_cross) {
                    let measured_main = child.layout.measured(dim(ctx.main));
                    let margin_cross = child.margin_for_axis(ctx.cross, direction, ctx.inner_width);
                    let cross_size = match child.style.aspect_ratio().get() {
                        Some(ratio) if ctx.is_row => margin_cross + measured_main / ratio,
                        Some(ratio) => margin_cross + measured_main * ratio,
                        None => line.cross_dim,
                    };
                    let main_size =
                        measured_main + child.margin_for_axis(ctx.main, direction, ctx.inner_width);
                    let (_, main_size) = constrain_max_size_for_mode(
                        child,
                        ctx.main,
                        direction,
                        ctx.percent_main,
                        ctx.inner_width,
                        MeasureMode::Exactly,
                        main_size,
                    );
                    let (_, cross_size) = constrain_max_size_for_mode(
                        child,
                        ctx.cross,
                        direction,
                        ctx.inner_cross,
                        ctx.inner_width,
                        MeasureMode::Exactly,
                        cross_size,
                    );
                    let (width, height) = if ctx.is_row {
                        (main_size, cross_size)
                    } else {
                        (cross_size, main_size)
                    };
                    let mode_for = |size: f32| {
                        if size.is_nan() {
                            MeasureMode::Undefined
                        } else {
                            MeasureMode::Exactly
                        }
                    };
                    let request = SizingRequest {
                        available_width: width,
                        available_height: height,
                        owner_direction: ctx.direction,
                        width_mode: mode_for(width),
                        height_mode: mode_for(height),
                        owner_width: ctx.inner_width,
                        owner_height: ctx.inner_height,
                        perform_layout: true,
                    };
                    self.layout_node_internal(child_id, &request, PassReason::Stretch);
                }
            } else {
                let remaining =
                    container_cross - child.dim_with_margin(ctx.cross, direction, ctx.inner_width);
                lead += if leading_auto && trailing_auto {
                    float_max(0.0, remaining / 2.0)
                } else if trailing_auto {
                    0.0
                } else if leading_auto {
                    float_max(0.0, remaining)
                } else if align == Align::FlexStart {
                    0.0
                } else if align == Align::Center {
                    remaining / 2.0
                } else {
                    remaining
                };
            }

            let child = &mut self.nodes[child_id];
            let edge = leading(ctx.cross);
            let position = child.layout.position_at(edge) + total_line_cross + lead;
            child.layout.set_position_at(edge, position);
        }
    }

    /// Distribute the container's cross space among lines and align items inside each
    /// line, including baseline alignment.
    pub(crate) fn align_lines(
        &mut self,
        ctx: &FlexContext,
        lines: &[FlexLine],
        total_line_cross: f32,
        leading_pb_cross: f32,
    ) {
        let available = if ctx.inner_cross.is_nan() {
            total_line_cross
        } else {
            ctx.inner_cross
        };
        let remaining = available - total_line_cross;
        let count = lines.len() as f32;
        let mut cross_lead = 0.0;
        let mut current_lead = leading_pb_cross;
        match self.nodes[ctx.id].style.align_content() {
            Align::FlexEnd => current_lead += remaining,
            Align::Center => current_lead += remaining / 2.0,
            Align::Stretch => {
                if available > total_line_cross {
                    cross_lead = remaining / count;
                }
            }
            Align::SpaceAround => {
                if available > total_line_cross {
                    current_lead += remaining / (2.0 * count);
                    if lines.len() > 1 {
                        cross_lead = remaining / count;
                    }
                } else {
                    current_lead += remaining / 2.0;
                }
            }
            Align::SpaceBetween => {
                if available > total_line_cross && lines.len() > 1 {
                    cross_lead = remaining / (count - 1.0);
                }
            }
            Align::Auto | Align::FlexStart | Align::Baseline => {}
        }

        for line in lines {
            let mut line_height = 0.0f32;
            let mut max_ascent = 0.0f32;
            let mut max_descent = 0.0f32;
            for &child_id in &line.items {
                let owner = &self.nodes[ctx.id];
                let child = &self.nodes[child_id];
                let direction = child.resolve_direction(ctx.direction);
                if child.is_layout_dim_defined(ctx.cross) {
                    line_height = line_height.max(
                        child.layout.measured(dim(ctx.cross))
                            + child.margin_for_axis(ctx.cross, direction, ctx.inner_width),
                    );
                }
                if line.baseline && align_item(owner, child) == Align::Baseline {
                    let height = child.layout.measured_height();
                    let leading_margin =
                        child.leading_margin(FlexDirection::Column, direction, ctx.inner_width);
                    let margin_column =
                        child.margin_for_axis(FlexDirection::Column, direction, ctx.inner_width);
                    let ascent = self.baseline(child_id).unwrap_or(height) + leading_margin;
                    let descent = height + margin_column - ascent;
                    max_ascent = max_ascent.max(ascent);
                    max_descent = max_descent.max(descent);
                    line_height = line_height.max(max_ascent + max_descent);
                }
            }
            line_height += cross_lead;

            for &child_id in &line.items {
                let owner = &self.nodes[ctx.id];
                let child = &self.nodes[child_id];
                let direction = child.resolve_direction(ctx.direction);
                let edge = leading(ctx.cross);
                let cross_size = child.layout.measured(dim(ctx.cross));
                let position = match align_item(owner, child) {
                    Align::Baseline if line.baseline => {
                        let height = child.layout.measured_height();
                        let offset = child.leading_position(
                            FlexDirection::Column,
                            direction,
                            ctx.inner_height,
                        );
                        let baseline = self.baseline(child_id).unwrap_or(height);
                        self.nodes[child_id]
                            .layout
                            .set_position_at(Edge::Top, current_lead + max_ascent - baseline + offset);
                        continue;
                    }
                    Align::FlexStart | Align::Baseline => {
                        current_lead + child.leading_margin(ctx.cross, direction, ctx.inner_width)
                    }
                    Align::FlexEnd => {
                        current_lead + line_height
                            - child.trailing_margin(ctx.cross, direction, ctx.inner_width)
                            - cross_size
                    }
                    Align::Center => current_lead + (line_height - cross_size) / 2.0,
                    Align::Stretch => {
                        let position =
                            current_lead + child.leading_margin(ctx.cross, direction, ctx.inner_width);
                        if !child.is_style_dim_defined(ctx.cross, ctx.inner_cross) {
                            let main_size = child.layout.measured(dim(ctx.main))
                                + child.margin_for_axis(ctx.main, direction, ctx.inner_width);
                            let (width, height) = if ctx.is_row {
                                (main_size, line_height)
                            } else {
                                (line_height, main_size)
                            };
                            let unchanged = float_eq(width, child.layout.measured_width())
                                && float_eq(height, child.layout.measured_height());
                            self.nodes[child_id].layout.set_position_at(edge, position);
                            if !unchanged {
                                let request = SizingRequest {
                                    available_width: width,
                                    available_height: height,
                                    owner_direction: ctx.direction,
                                    width_mode: MeasureMode::Exactly,
                                    height_mode: MeasureMode::Exactly,
                                    owner_width: ctx.inner_width,
                                    owner_height: ctx.inner_height,
                                    perform_layout: true,
                                };
                                self.layout_node_internal(
                                    child_id,
                                    &request,
                                    PassReason::MultilineStretch,
                                );
                            }
                            continue;
                        }
                        position
                    }
                    Align::Auto | Align::SpaceBetween | Align::SpaceAround => continue,
                };
                self.nodes[child_id].layout.set_position_at(edge, position);
            }
            current_lead += line_height;
        }
    }

    /// Whether any item of `line` is aligned on its baseline.
    fn line_has_baseline(&self, ctx: &FlexContext, line: &FlexLine) -> bool {
        let owner = &self.nodes[ctx.id];
        line.items
            .iter()
            .any(|&child| {
                align_item(owner, &self.nodes[child]) == Align::Baseline
                    && self.supplies_baseline(child)
            })
    }
}

