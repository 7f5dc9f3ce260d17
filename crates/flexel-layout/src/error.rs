//! Error types for flexel-layout.

use crate::tree::NodeId;
use flexel_core::StyleError;
use thiserror::Error;

/// Errors from tree mutation and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The handle does not refer to a live node.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Child index outside `0..=len` for inserts or `0..len` for reads.
    #[error("Index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    /// `child` is not among the children of `parent`.
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// The child is already owned by another node.
    #[error("Child {child:?} already has owner {owner:?}")]
    ChildHasOwner { child: NodeId, owner: NodeId },

    /// Nodes with a measure function cannot have children.
    #[error("Cannot add child: node {0:?} has a measure function")]
    ParentHasMeasureFunc(NodeId),

    /// Nodes with children cannot have a measure function.
    #[error("Cannot set measure function: node {0:?} has children")]
    MeasureFuncWithChildren(NodeId),

    /// Inserting would make a node its own ancestor.
    #[error("Inserting {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    /// Only nodes with a measure function can be marked dirty by the host.
    #[error("Only leaves with a measure function can be marked dirty: {0:?}")]
    MarkDirtyWithoutMeasure(NodeId),

    /// Reset is only valid for detached, childless nodes.
    #[error("Cannot reset node {0:?} while it has children or an owner")]
    ResetAttached(NodeId),

    /// Style declaration rejected.
    #[error("Style error: {0}")]
    Style(#[from] StyleError),
}

/// Errors from configuration setters and loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Scale factors must be zero (rounding disabled) or positive and finite.
    #[error("Point scale factor must be finite and >= 0, got {0}")]
    InvalidPointScaleFactor(f32),

    /// TOML input could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be written as TOML.
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
