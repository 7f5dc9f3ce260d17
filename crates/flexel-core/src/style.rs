//! The per-node style model.
//!
//! [`Style`] is a plain value holder: setters store, getters return, nothing else happens.
//! Marking layout dirty is the job of whoever owns the style.

use crate::edges::Edges;
use crate::enums::{
    Align, Dimension, Direction, Display, Edge, FlexDirection, Justify, Overflow, PositionType,
    Wrap,
};
use crate::error::StyleError;
use crate::value::{FloatOptional, Length};
use serde::{Deserialize, Deserializer, Serialize};

/// Style properties of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    direction: Direction,
    flex_direction: FlexDirection,
    justify_content: Justify,
    align_content: Align,
    align_items: Align,
    align_self: Align,
    position_type: PositionType,
    flex_wrap: Wrap,
    overflow: Overflow,
    display: Display,
    flex: FloatOptional,
    flex_grow: FloatOptional,
    flex_shrink: FloatOptional,
    flex_basis: Length,
    margin: Edges,
    position: Edges,
    padding: Edges,
    border: Edges,
    dimensions: [Length; 2],
    min_dimensions: [Length; 2],
    max_dimensions: [Length; 2],
    #[serde(deserialize_with = "deserialize_aspect_ratio")]
    aspect_ratio: FloatOptional,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            justify_content: Justify::FlexStart,
            align_content: Align::FlexStart,
            align_items: Align::Stretch,
            align_self: Align::Auto,
            position_type: PositionType::Relative,
            flex_wrap: Wrap::NoWrap,
            overflow: Overflow::Visible,
            display: Display::Flex,
            flex: FloatOptional::UNDEFINED,
            flex_grow: FloatOptional::UNDEFINED,
            flex_shrink: FloatOptional::UNDEFINED,
            flex_basis: Length::Auto,
            margin: Edges::default(),
            position: Edges::default(),
            padding: Edges::default(),
            border: Edges::default(),
            dimensions: [Length::Auto; 2],
            min_dimensions: [Length::Undefined; 2],
            max_dimensions: [Length::Undefined; 2],
            aspect_ratio: FloatOptional::UNDEFINED,
        }
    }
}

macro_rules! keyword_accessors {
    ($($field:ident, $setter:ident: $ty:ty;)+) => {
        $(
            #[doc = concat!("`", stringify!($field), "` value.")]
            #[must_use]
            pub const fn $field(&self) -> $ty {
                self.$field
            }

            #[doc = concat!("Set `", stringify!($field), "`.")]
            pub fn $setter(&mut self, value: $ty) {
                self.$field = value;
            }
        )+
    };
}

impl Style {
    /// Default style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Style with web-compatible defaults: row direction and stretched content lines.
    #[must_use]
    pub fn web() -> Self {
        Self {
            flex_direction: FlexDirection::Row,
            align_content: Align::Stretch,
            ..Self::default()
        }
    }

    keyword_accessors! {
        direction, set_direction: Direction;
        flex_direction, set_flex_direction: FlexDirection;
        justify_content, set_justify_content: Justify;
        align_content, set_align_content: Align;
        align_items, set_align_items: Align;
        align_self, set_align_self: Align;
        position_type, set_position_type: PositionType;
        flex_wrap, set_flex_wrap: Wrap;
        overflow, set_overflow: Overflow;
        display, set_display: Display;
    }

    /// Flex basis.
    #[must_use]
    pub const fn flex_basis(&self) -> Length {
        self.flex_basis
    }

    /// Set the flex basis.
    pub fn set_flex_basis(&mut self, value: Length) {
        self.flex_basis = value.normalized();
    }

    /// The `flex` shorthand.
    #[must_use]
    pub const fn flex(&self) -> FloatOptional {
        self.flex
    }

    /// Set the `flex` shorthand. NaN clears it.
    pub fn set_flex(&mut self, value: impl Into<FloatOptional>) {
        self.flex = value.into();
    }

    /// Explicit grow factor.
    #[must_use]
    pub const fn flex_grow(&self) -> FloatOptional {
        self.flex_grow
    }

    /// Set the grow factor. NaN clears it.
    pub fn set_flex_grow(&mut self, value: impl Into<FloatOptional>) {
        self.flex_grow = value.into();
    }

    /// Explicit shrink factor.
    #[must_use]
    pub const fn flex_shrink(&self) -> FloatOptional {
        self.flex_shrink
    }

    /// Set the shrink factor. NaN clears it.
    pub fn set_flex_shrink(&mut self, value: impl Into<FloatOptional>) {
        self.flex_shrink = value.into();
    }

    /// Width-over-height ratio.
    #[must_use]
    pub const fn aspect_ratio(&self) -> FloatOptional {
        self.aspect_ratio
    }

    /// Set the aspect ratio. Zero, negative and non-finite ratios clear it.
    pub fn set_aspect_ratio(&mut self, value: impl Into<FloatOptional>) {
        self.aspect_ratio = valid_aspect_ratio(value.into());
    }

    /// Margin edges.
    #[must_use]
    pub const fn margin(&self) -> &Edges {
        &self.margin
    }

    /// Set one margin edge.
    pub fn set_margin(&mut self, edge: Edge, value: Length) {
        self.margin.set(edge, value);
    }

    /// Position (inset) edges.
    #[must_use]
    pub const fn position(&self) -> &Edges {
        &self.position
    }

    /// Set one position edge.
    pub fn set_position(&mut self, edge: Edge, value: Length) {
        self.position.set(edge, value);
    }

    /// Padding edges.
    #[must_use]
    pub const fn padding(&self) -> &Edges {
        &self.padding
    }

    /// Set one padding edge.
    pub fn set_padding(&mut self, edge: Edge, value: Length) {
        self.padding.set(edge, value);
    }

    /// Border edges.
    #[must_use]
    pub const fn border(&self) -> &Edges {
        &self.border
    }

    /// Set one border edge in points. NaN clears it.
    pub fn set_border(&mut self, edge: Edge, value: f32) {
        self.border.set(edge, Length::point(value));
    }

    /// Size along `dimension`.
    #[must_use]
    pub const fn dimension(&self, dimension: Dimension) -> Length {
        self.dimensions[dimension as usize]
    }

    /// Minimum size along `dimension`.
    #[must_use]
    pub const fn min_dimension(&self, dimension: Dimension) -> Length {
        self.min_dimensions[dimension as usize]
    }

    /// Maximum size along `dimension`.
    #[must_use]
    pub const fn max_dimension(&self, dimension: Dimension) -> Length {
        self.max_dimensions[dimension as usize]
    }

    /// Width.
    #[must_use]
    pub const fn width(&self) -> Length {
        self.dimension(Dimension::Width)
    }

    /// Set the width.
    pub fn set_width(&mut self, value: Length) {
        self.dimensions[Dimension::Width as usize] = value.normalized();
    }

    /// Height.
    #[must_use]
    pub const fn height(&self) -> Length {
        self.dimension(Dimension::Height)
    }

    /// Set the height.
    pub fn set_height(&mut self, value: Length) {
        self.dimensions[Dimension::Height as usize] = value.normalized();
    }

    /// Minimum width.
    #[must_use]
    pub const fn min_width(&self) -> Length {
        self.min_dimension(Dimension::Width)
    }

    /// Set the minimum width.
    pub fn set_min_width(&mut self, value: Length) {
        self.min_dimensions[Dimension::Width as usize] = value.normalized();
    }

    /// Minimum height.
    #[must_use]
    pub const fn min_height(&self) -> Length {
        self.min_dimension(Dimension::Height)
    }

    /// Set the minimum height.
    pub fn set_min_height(&mut self, value: Length) {
        self.min_dimensions[Dimension::Height as usize] = value.normalized();
    }

    /// Maximum width.
    #[must_use]
    pub const fn max_width(&self) -> Length {
        self.max_dimension(Dimension::Width)
    }

    /// Set the maximum width.
    pub fn set_max_width(&mut self, value: Length) {
        self.max_dimensions[Dimension::Width as usize] = value.normalized();
    }

    /// Maximum height.
    #[must_use]
    pub const fn max_height(&self) -> Length {
        self.max_dimension(Dimension::Height)
    }

    /// Set the maximum height.
    pub fn set_max_height(&mut self, value: Length) {
        self.max_dimensions[Dimension::Height as usize] = value.normalized();
    }

    /// Apply a CSS-like declaration such as `("align-items", "center")` or
    /// `("margin-start", "4")`.
    ///
    /// On error the style is left untouched.
    pub fn set_property(&mut self, name: &str, value: &str) -> Result<(), StyleError> {
        let name = name.trim();
        let invalid = || StyleError::InvalidValue {
            property: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "direction" => self.direction = value.parse()?,
            "flex-direction" => self.flex_direction = value.parse()?,
            "justify-content" => self.justify_content = value.parse()?,
            "align-content" => self.align_content = value.parse()?,
            "align-items" => self.align_items = value.parse()?,
            "align-self" => self.align_self = value.parse()?,
            "position" | "position-type" => self.position_type = value.parse()?,
            "flex-wrap" => self.flex_wrap = value.parse()?,
            "overflow" => self.overflow = value.parse()?,
            "display" => self.display = value.parse()?,
            "flex" => self.flex = parse_factor(value).ok_or_else(invalid)?,
            "flex-grow" => self.flex_grow = parse_factor(value).ok_or_else(invalid)?,
            "flex-shrink" => self.flex_shrink = parse_factor(value).ok_or_else(invalid)?,
            "aspect-ratio" => {
                let ratio = parse_factor(value).ok_or_else(invalid)?;
                self.set_aspect_ratio(ratio);
            }
            "flex-basis" => self.flex_basis = value.parse()?,
            "width" => self.set_width(value.parse()?),
            "height" => self.set_height(value.parse()?),
            "min-width" => self.set_min_width(value.parse()?),
            "min-height" => self.set_min_height(value.parse()?),
            "max-width" => self.set_max_width(value.parse()?),
            "max-height" => self.set_max_height(value.parse()?),
            _ => return self.set_edge_property(name, value),
        }
        Ok(())
    }

    fn set_edge_property(&mut self, name: &str, value: &str) -> Result<(), StyleError> {
        let invalid = || StyleError::InvalidValue {
            property: name.to_string(),
            value: value.to_string(),
        };
        if let Some(edge) = inset_edge(name) {
            self.position.set(edge, value.parse()?);
            return Ok(());
        }
        let (group, edge) = split_edge_property(name)
            .ok_or_else(|| StyleError::UnknownProperty(name.to_string()))?;
        let length: Length = value.parse()?;
        match group {
            "margin" => self.margin.set(edge, length),
            "padding" => {
                if length.is_auto() {
                    return Err(invalid());
                }
                self.padding.set(edge, length);
            }
            "border" => match length {
                Length::Point(_) | Length::Undefined => self.border.set(edge, length),
                _ => return Err(invalid()),
            },
            _ => return Err(StyleError::UnknownProperty(name.to_string())),
        }
        Ok(())
    }
}

fn valid_aspect_ratio(value: FloatOptional) -> FloatOptional {
    match value.get() {
        Some(v) if v > 0.0 && v.is_finite() => value,
        _ => FloatOptional::UNDEFINED,
    }
}

fn deserialize_aspect_ratio<'de, D>(deserializer: D) -> Result<FloatOptional, D::Error>
where
    D: Deserializer<'de>,
{
    FloatOptional::deserialize(deserializer).map(valid_aspect_ratio)
}

fn parse_factor(value: &str) -> Option<FloatOptional> {
    match value.trim() {
        "undefined" | "auto" => Some(FloatOptional::UNDEFINED),
        number => number.parse::<f32>().ok().map(FloatOptional::new),
    }
}

fn inset_edge(name: &str) -> Option<Edge> {
    match name {
        "inset" => Some(Edge::All),
        "left" | "top" | "right" | "bottom" | "start" | "end" => name.parse().ok(),
        "inset-horizontal" => Some(Edge::Horizontal),
        "inset-vertical" => Some(Edge::Vertical),
        _ => None,
    }
}

fn split_edge_property(name: &str) -> Option<(&str, Edge)> {
    ["margin", "padding", "border"].into_iter().find_map(|group| {
        let rest = name.strip_prefix(group)?;
        if rest.is_empty() || rest == "-width" {
            return Some((group, Edge::All));
        }
        let suffix = rest.strip_prefix('-')?;
        let suffix = suffix.strip_suffix("-width").unwrap_or(suffix);
        suffix.parse().ok().map(|edge| (group, edge))
    })
}
