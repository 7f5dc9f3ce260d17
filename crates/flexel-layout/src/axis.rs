//! Main/cross axis tables.

use flexel_core::{Dimension, Edge, FlexDirection};

/// Edge where items along `axis` start.
pub(crate) const fn leading(axis: FlexDirection) -> Edge {
    match axis {
        FlexDirection::Column => Edge::Top,
        FlexDirection::ColumnReverse => Edge::Bottom,
        FlexDirection::Row => Edge::Left,
        FlexDirection::RowReverse => Edge::Right,
    }
}

/// Edge where items along `axis` end.
pub(crate) const fn trailing(axis: FlexDirection) -> Edge {
    match axis {
        FlexDirection::Column => Edge::Bottom,
        FlexDirection::ColumnReverse => Edge::Top,
        FlexDirection::Row => Edge::Right,
        FlexDirection::RowReverse => Edge::Left,
    }
}

/// Dimension measured along `axis`.
pub(crate) const fn dim(axis: FlexDirection) -> Dimension {
    if axis.is_row() {
        Dimension::Width
    } else {
        Dimension::Height
    }
}

/// Index into a physical `[Left, Top, Right, Bottom]` array.
pub(crate) const fn idx(edge: Edge) -> usize {
    match edge {
        Edge::Left => 0,
        Edge::Top => 1,
        Edge::Right => 2,
        _ => 3,
    }
}
