//! Nodes and their computed layout.

use crate::axis::{dim, idx, leading, trailing};
use crate::cache::LayoutCache;
use crate::measure::{BaselineFunc, DirtiedFunc, MeasureFunc, PrintFunc};
use crate::tree::NodeId;
use flexel_core::{
    float_eq, float_max, Align, Dimension, Direction, Edge, FlexDirection, FloatOptional,
    LayoutEdge, Length, NodeType, PositionType, Rect, Style, UNDEFINED,
};
use std::any::Any;
use std::sync::Arc;

/// Opaque host value attached to a node.
pub type NodeContext = Arc<dyn Any + Send + Sync>;

/// Named node flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFlags {
    /// Set by every layout that touched the node; cleared by the host.
    pub has_new_layout: bool,
    /// Layout is stale.
    pub is_dirty: bool,
    /// Text nodes round up on the pixel grid.
    pub node_type: NodeType,
    /// Preferred child when the owner computes its own baseline.
    pub is_reference_baseline: bool,
    /// Web defaults were active when the node was created.
    pub use_web_defaults: bool,
}

impl NodeFlags {
    const fn new(use_web_defaults: bool) -> Self {
        Self {
            has_new_layout: true,
            is_dirty: true,
            node_type: NodeType::Default,
            is_reference_baseline: false,
            use_web_defaults,
        }
    }
}

/// Computed layout of a node.
///
/// Edge arrays are physical, ordered `[Left, Top, Right, Bottom]`.
#[derive(Debug, Clone)]
pub struct Layout {
    pub(crate) position: [f32; 4],
    pub(crate) dimensions: [f32; 2],
    pub(crate) measured_dimensions: [f32; 2],
    pub(crate) margin: [f32; 4],
    pub(crate) border: [f32; 4],
    pub(crate) padding: [f32; 4],
    pub(crate) direction: Direction,
    pub(crate) had_overflow: bool,
    pub(crate) computed_flex_basis: FloatOptional,
    pub(crate) computed_flex_basis_generation: u32,
    pub(crate) generation_count: u32,
    pub(crate) last_owner_direction: Option<Direction>,
    pub(crate) config_generation: u32,
    pub(crate) cache: LayoutCache,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            position: [0.0; 4],
            dimensions: [UNDEFINED; 2],
            measured_dimensions: [UNDEFINED; 2],
            margin: [0.0; 4],
            border: [0.0; 4],
            padding: [0.0; 4],
            direction: Direction::Inherit,
            had_overflow: false,
            computed_flex_basis: FloatOptional::UNDEFINED,
            computed_flex_basis_generation: 0,
            generation_count: 0,
            last_owner_direction: None,
            config_generation: 0,
            cache: LayoutCache::new(),
        }
    }
}

impl Layout {
    /// Layout of a node removed from the flow by `display: none`.
    pub(crate) fn zeroed() -> Self {
        Self {
            dimensions: [0.0; 2],
            measured_dimensions: [0.0; 2],
            ..Self::default()
        }
    }

    /// Offset of the left margin edge from the owner's left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.position[0]
    }

    /// Offset of the top margin edge from the owner's top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.position[1]
    }

    /// Position recorded for the right edge.
    #[must_use]
    pub const fn right(&self) -> f32 {
        self.position[2]
    }

    /// Position recorded for the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.position[3]
    }

    /// Border-box width.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.dimensions[0]
    }

    /// Border-box height.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.dimensions[1]
    }

    /// Resolved layout direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Content overflowed the node during the last layout.
    #[must_use]
    pub const fn had_overflow(&self) -> bool {
        self.had_overflow
    }

    /// Computed margin of one edge. `Start`/`End` follow the layout direction.
    #[must_use]
    pub const fn margin(&self, edge: LayoutEdge) -> f32 {
        self.margin[edge.physical_index(self.direction)]
    }

    /// Computed border of one edge.
    #[must_use]
    pub const fn border(&self, edge: LayoutEdge) -> f32 {
        self.border[edge.physical_index(self.direction)]
    }

    /// Computed padding of one edge.
    #[must_use]
    pub const fn padding(&self, edge: LayoutEdge) -> f32 {
        self.padding[edge.physical_index(self.direction)]
    }

    /// Position and size relative to the owner.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.left(), self.top(), self.width(), self.height())
    }

    /// Measured size before rounding.
    #[must_use]
    pub const fn measured_width(&self) -> f32 {
        self.measured_dimensions[0]
    }

    /// Measured size before rounding.
    #[must_use]
    pub const fn measured_height(&self) -> f32 {
        self.measured_dimensions[1]
    }

    /// Sizing cache of this node.
    #[must_use]
    pub const fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub(crate) const fn measured(&self, dimension: Dimension) -> f32 {
        self.measured_dimensions[dimension as usize]
    }

    pub(crate) const fn position_at(&self, edge: Edge) -> f32 {
        self.position[idx(edge)]
    }

    pub(crate) fn set_position_at(&mut self, edge: Edge, value: f32) {
        self.position[idx(edge)] = value;
    }

    /// Equality of the computed outputs.
    pub(crate) fn same_output(&self, other: &Self) -> bool {
        let eq = |a: &[f32], b: &[f32]| a.iter().zip(b).all(|(x, y)| float_eq(*x, *y));
        eq(&self.position, &other.position)
            && eq(&self.dimensions, &other.dimensions)
            && eq(&self.margin, &other.margin)
            && eq(&self.border, &other.border)
            && eq(&self.padding, &other.padding)
            && self.direction == other.direction
            && self.had_overflow == other.had_overflow
    }
}

/// A box in a [`crate::LayoutTree`].
#[derive(Clone)]
pub struct Node {
    pub(crate) style: Style,
    pub(crate) layout: Layout,
    pub(crate) children: Vec<NodeId>,
    pub(crate) owner: Option<NodeId>,
    pub(crate) flags: NodeFlags,
    pub(crate) measure: Option<MeasureFunc>,
    pub(crate) baseline: Option<BaselineFunc>,
    pub(crate) print: Option<PrintFunc>,
    pub(crate) dirtied: Option<DirtiedFunc>,
    pub(crate) context: Option<NodeContext>,
    pub(crate) line_index: usize,
    pub(crate) resolved_dimensions: [Length; 2],
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("style", &self.style)
            .field("layout", &self.layout)
            .field("children", &self.children)
            .field("owner", &self.owner)
            .field("flags", &self.flags)
            .field("measure", &self.measure)
            .field("baseline", &self.baseline)
            .finish_non_exhaustive()
    }
}

impl Node {
    /// Fresh node with the default (or web default) style.
    #[must_use]
    pub fn new(use_web_defaults: bool) -> Self {
        let style = if use_web_defaults {
            Style::web()
        } else {
            Style::default()
        };
        Self::with_style(style, use_web_defaults)
    }

    pub(crate) fn with_style(style: Style, use_web_defaults: bool) -> Self {
        let mut node = Self {
            style,
            layout: Layout::default(),
            children: Vec::new(),
            owner: None,
            flags: NodeFlags::new(use_web_defaults),
            measure: None,
            baseline: None,
            print: None,
            dirtied: None,
            context: None,
            line_index: 0,
            resolved_dimensions: [Length::Auto; 2],
        };
        node.resolve_dimensions();
        node
    }

    /// Style of the node.
    #[must_use]
    pub const fn style(&self) -> &Style {
        &self.style
    }

    /// Computed layout.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Child handles in order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Owning node; `None` for roots and shared nodes.
    #[must_use]
    pub const fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Node flags.
    #[must_use]
    pub const fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Host context.
    #[must_use]
    pub fn context(&self) -> Option<&NodeContext> {
        self.context.as_ref()
    }

    /// Whether a measure function is installed.
    #[must_use]
    pub const fn has_measure_func(&self) -> bool {
        self.measure.is_some()
    }

    /// Whether a baseline function is installed.
    #[must_use]
    pub const fn has_baseline_func(&self) -> bool {
        self.baseline.is_some()
    }

    /// Replace the style. Returns whether anything changed.
    pub(crate) fn replace_style(&mut self, style: Style) -> bool {
        if self.style == style {
            return false;
        }
        self.style = style;
        self.resolve_dimensions();
        true
    }

    /// Refresh the resolved dimensions: a max equal to the min replaces the dimension.
    pub(crate) fn resolve_dimensions(&mut self) {
        for dimension in [Dimension::Width, Dimension::Height] {
            let max = self.style.max_dimension(dimension);
            self.resolved_dimensions[dimension as usize] =
                if !max.is_undefined() && max == self.style.min_dimension(dimension) {
                    max
                } else {
                    self.style.dimension(dimension)
                };
        }
    }

    pub(crate) const fn resolved_dimension(&self, dimension: Dimension) -> Length {
        self.resolved_dimensions[dimension as usize]
    }

    /// Effective direction given the owner's.
    pub(crate) const fn resolve_direction(&self, owner: Direction) -> Direction {
        match self.style.direction() {
            Direction::Inherit => match owner {
                Direction::Inherit => Direction::Ltr,
                other => other,
            },
            own => own,
        }
    }

    // ========================================================================
    // Flex factors
    // ========================================================================

    pub(crate) fn resolve_flex_grow(&self) -> f32 {
        if self.owner.is_none() {
            return 0.0;
        }
        if let Some(grow) = self.style.flex_grow().get() {
            return grow;
        }
        match self.style.flex().get() {
            Some(flex) if flex > 0.0 => flex,
            _ => 0.0,
        }
    }

    pub(crate) fn resolve_flex_shrink(&self) -> f32 {
        if self.owner.is_none() {
            return 0.0;
        }
        if let Some(shrink) = self.style.flex_shrink().get() {
            return shrink;
        }
        let web = self.flags.use_web_defaults;
        match self.style.flex().get() {
            Some(flex) if !web && flex < 0.0 => -flex,
            _ if web => 1.0,
            _ => 0.0,
        }
    }

    pub(crate) fn resolve_flex_basis(&self) -> Length {
        let basis = self.style.flex_basis();
        if !basis.is_auto() && !basis.is_undefined() {
            return basis;
        }
        match self.style.flex().get() {
            Some(flex) if flex > 0.0 => {
                if self.flags.use_web_defaults {
                    Length::Auto
                } else {
                    Length::Point(0.0)
                }
            }
            _ => Length::Auto,
        }
    }

    pub(crate) fn is_flexible(&self) -> bool {
        self.style.position_type() == PositionType::Relative
            && (self.resolve_flex_grow() != 0.0 || self.resolve_flex_shrink() != 0.0)
    }

    // ========================================================================
    // Box edges
    // ========================================================================

    pub(crate) fn margin_leading_value(&self, axis: FlexDirection, direction: Direction) -> Length {
        self.style.margin().computed(leading(axis), direction)
    }

    pub(crate) fn margin_trailing_value(&self, axis: FlexDirection, direction: Direction) -> Length {
        self.style.margin().computed(trailing(axis), direction)
    }

    pub(crate) fn leading_margin(&self, axis: FlexDirection, direction: Direction, width: f32) -> f32 {
        self.margin_leading_value(axis, direction).resolve_or_zero(width)
    }

    pub(crate) fn trailing_margin(&self, axis: FlexDirection, direction: Direction, width: f32) -> f32 {
        self.margin_trailing_value(axis, direction).resolve_or_zero(width)
    }

    pub(crate) fn margin_for_axis(&self, axis: FlexDirection, direction: Direction, width: f32) -> f32 {
        self.leading_margin(axis, direction, width) + self.trailing_margin(axis, direction, width)
    }

    pub(crate) fn edge_padding(&self, edge: Edge, direction: Direction, width: f32) -> f32 {
        self.style.padding().computed(edge, direction).resolve_or_zero(width).max(0.0)
    }

    pub(crate) fn edge_border(&self, edge: Edge, direction: Direction) -> f32 {
        self.style.border().computed(edge, direction).resolve_or_zero(0.0).max(0.0)
    }

    pub(crate) fn leading_border(&self, axis: FlexDirection, direction: Direction) -> f32 {
        self.edge_border(leading(axis), direction)
    }

    pub(crate) fn trailing_border(&self, axis: FlexDirection, direction: Direction) -> f32 {
        self.edge_border(trailing(axis), direction)
    }

    pub(crate) fn leading_padding_and_border(
        &self,
        axis: FlexDirection,
        direction: Direction,
        width: f32,
    ) -> f32 {
        self.edge_padding(leading(axis), direction, width) + self.leading_border(axis, direction)
    }

    pub(crate) fn trailing_padding_and_border(
        &self,
        axis: FlexDirection,
        direction: Direction,
        width: f32,
    ) -> f32 {
        self.edge_padding(trailing(axis), direction, width) + self.trailing_border(axis, direction)
    }

    pub(crate) fn padding_and_border_for_axis(
        &self,
        axis: FlexDirection,
        direction: Direction,
        width: f32,
    ) -> f32 {
        self.leading_padding_and_border(axis, direction, width)
            + self.trailing_padding_and_border(axis, direction, width)
    }

    // ========================================================================
    // Insets
    // ========================================================================

    pub(crate) fn is_leading_position_defined(&self, axis: FlexDirection, direction: Direction) -> bool {
        !self.style.position().computed(leading(axis), direction).is_undefined()
    }

    pub(crate) fn is_trailing_position_defined(&self, axis: FlexDirection, direction: Direction) -> bool {
        !self.style.position().computed(trailing(axis), direction).is_undefined()
    }

    pub(crate) fn leading_position(&self, axis: FlexDirection, direction: Direction, size: f32) -> f32 {
        self.style
            .position()
            .computed(leading(axis), direction)
            .resolve_or_zero(size)
    }

    pub(crate) fn trailing_position(&self, axis: FlexDirection, direction: Direction, size: f32) -> f32 {
        self.style
            .position()
            .computed(trailing(axis), direction)
            .resolve_or_zero(size)
    }

    /// Offset applied by relative positioning along `axis`.
    pub(crate) fn relative_position(&self, axis: FlexDirection, direction: Direction, size: f32) -> f32 {
        if self.is_leading_position_defined(axis, direction) {
            self.leading_position(axis, direction, size)
        } else {
            -self.trailing_position(axis, direction, size)
        }
    }

    /// Write the initial margin-plus-offset positions for `main` and `cross`.
    pub(crate) fn set_position(
        &mut self,
        direction: Direction,
        main: FlexDirection,
        cross: FlexDirection,
        main_size: f32,
        cross_size: f32,
        owner_width: f32,
    ) {
        for (axis, size) in [(main, main_size), (cross, cross_size)] {
            let relative = self.relative_position(axis, direction, size);
            let lead = self.leading_margin(axis, direction, owner_width) + relative;
            let trail = self.trailing_margin(axis, direction, owner_width) + relative;
            self.layout.set_position_at(leading(axis), lead);
            self.layout.set_position_at(trailing(axis), trail);
        }
    }

    // ========================================================================
    // Dimensions
    // ========================================================================

    /// Whether the style fixes the size along `axis` given the owner's size on that axis.
    pub(crate) fn is_style_dim_defined(&self, axis: FlexDirection, owner_size: f32) -> bool {
        match self.resolved_dimension(dim(axis)) {
            Length::Auto | Length::Undefined => false,
            Length::Point(v) => v >= 0.0,
            Length::Percent(p) => p >= 0.0 && !owner_size.is_nan(),
        }
    }

    pub(crate) fn is_layout_dim_defined(&self, axis: FlexDirection) -> bool {
        let value = self.layout.measured(dim(axis));
        !value.is_nan() && value >= 0.0
    }

    /// Clamp `value` to the min/max style of `axis`.
    pub(crate) fn bound_axis_within_min_max(
        &self,
        axis: FlexDirection,
        value: FloatOptional,
        axis_size: f32,
    ) -> FloatOptional {
        let dimension = dim(axis);
        let min = self.style.min_dimension(dimension).resolve(axis_size);
        let max = self.style.max_dimension(dimension).resolve(axis_size);
        let mut bound = value;
        if max.is_defined() && bound > max {
            bound = max;
        }
        if min.is_defined() && bound < min {
            bound = min;
        }
        bound
    }

    /// Clamp to min/max and never below padding plus border.
    pub(crate) fn bound_axis(
        &self,
        axis: FlexDirection,
        direction: Direction,
        value: f32,
        axis_size: f32,
        width: f32,
    ) -> f32 {
        float_max(
            self.bound_axis_within_min_max(axis, FloatOptional::new(value), axis_size)
                .raw(),
            self.padding_and_border_for_axis(axis, direction, width),
        )
    }

    /// Measured size plus margins along `axis`.
    pub(crate) fn dim_with_margin(&self, axis: FlexDirection, direction: Direction, width: f32) -> f32 {
        self.layout.measured(dim(axis)) + self.margin_for_axis(axis, direction, width)
    }
}

/// Cross alignment of `child` inside `owner`.
pub(crate) fn align_item(owner: &Node, child: &Node) -> Align {
    let align = match child.style.align_self() {
        Align::Auto => owner.style.align_items(),
        own => own,
    };
    if align == Align::Baseline && owner.style.flex_direction().is_column() {
        Align::FlexStart
    } else {
        align
    }
}
