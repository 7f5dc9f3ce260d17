#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::if_not_else)]
#![allow(clippy::suboptimal_flops)]
//! Flexbox layout engine for Flexel.
//!
//! A [`LayoutTree`] owns every node of one or more layout trees in an arena, addressed by
//! [`NodeId`]. Hosts build trees, assign styles, attach measure functions to leaves whose
//! size comes from content (text, images), then call [`LayoutTree::calculate_layout`].
//!
//! - **Caching**: each node keeps a [`LayoutCache`] of recent sizing results, so a second
//!   pass over an unchanged tree only visits the root.
//! - **Dirty tracking**: style and tree mutations mark the node and its owners dirty.
//! - **Shared subtrees**: a node may be a child of several parents; the first layout
//!   that touches a shared child clones it for the parent being laid out.
//! - **Pixel grid**: results are snapped to [`Config::point_scale_factor`] unless it is
//!   zero.
//!
//! ```
//! use flexel_layout::{Direction, FlexDirection, LayoutTree, Length, Style, UNDEFINED};
//!
//! let mut tree = LayoutTree::new();
//! let mut style = Style::new();
//! style.set_flex_direction(FlexDirection::Row);
//! style.set_width(Length::Point(120.0));
//! style.set_height(Length::Point(40.0));
//! let root = tree.new_node_with_style(style);
//!
//! for grow in [1.0, 1.0, 2.0] {
//!     let mut item = Style::new();
//!     item.set_flex_grow(grow);
//!     let child = tree.new_node_with_style(item);
//!     let index = tree.child_count(root)?;
//!     tree.insert_child(root, child, index)?;
//! }
//!
//! tree.calculate_layout(root, UNDEFINED, UNDEFINED, Direction::Ltr)?;
//! let widths: Vec<f32> = tree
//!     .children(root)?
//!     .iter()
//!     .map(|&child| tree.layout(child).map(|l| l.width()))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(widths, [30.0, 30.0, 60.0]);
//! # Ok::<(), flexel_layout::TreeError>(())
//! ```

mod absolute;
mod axis;
mod baseline;
mod cache;
mod config;
mod engine;
mod error;
mod flex;
mod measure;
mod node;
mod print;
mod rounding;
mod tree;

pub use cache::{CachedMeasurement, LayoutCache, MAX_CACHED_MEASUREMENTS};
pub use config::{Config, ExperimentalFeatures};
pub use error::{ConfigError, TreeError};
pub use measure::{BaselineFunc, CloneNodeFunc, DirtiedFunc, MeasureFunc, PrintFunc};
pub use node::{Layout, Node, NodeContext, NodeFlags};
pub use print::PrintOptions;
pub use rounding::round_value_to_pixel_grid;
pub use tree::{LayoutTree, NodeId};

pub use flexel_core::{
    Align, Dimension, Direction, Display, Edge, Edges, FlexDirection, FloatOptional, Justify,
    LayoutEdge, Length, MeasureMode, NodeType, Overflow, PositionType, Rect, Size, Style,
    StyleError, Wrap, UNDEFINED,
};
