//! Core types for the Flexel layout engine.
//!
//! This crate provides the value types and style model consumed by `flexel-layout`:
//! - Numeric values: [`FloatOptional`], [`Length`] and the [`UNDEFINED`] sentinel
//! - Keyword enums: [`FlexDirection`], [`Justify`], [`Align`], [`Edge`] and friends
//! - Per-edge storage: [`Edges`]
//! - The style value holder: [`Style`]
//! - Geometric primitives: [`Size`], [`Rect`]

mod edges;
mod enums;
mod error;
mod geometry;
mod style;
mod value;

pub use edges::Edges;
pub use enums::{
    Align, Dimension, Direction, Display, Edge, FlexDirection, Justify, LayoutEdge, MeasureMode,
    NodeType, Overflow, PositionType, Wrap,
};
pub use error::StyleError;
pub use geometry::{Rect, Size};
pub use style::Style;
pub use value::{float_eq, float_max, float_min, is_undefined, FloatOptional, Length, UNDEFINED};
