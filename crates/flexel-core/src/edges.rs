//! Nine-slot edge storage for margin, padding, border and position.

use crate::enums::{Direction, Edge};
use crate::value::Length;
use serde::{Deserialize, Serialize};

/// Per-edge lengths indexed by [`Edge`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Edges([Length; 9]);

impl Edges {
    /// All slots undefined.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the `All` slot set.
    #[must_use]
    pub fn all(value: Length) -> Self {
        Self::new().with(Edge::All, value)
    }

    /// Raw slot value.
    #[must_use]
    pub fn get(&self, edge: Edge) -> Length {
        self.0[edge as usize]
    }

    /// Set a raw slot. NaN lengths are stored as undefined.
    pub fn set(&mut self, edge: Edge, value: Length) {
        self.0[edge as usize] = value.normalized();
    }

    /// Builder form of [`Edges::set`].
    #[must_use]
    pub fn with(mut self, edge: Edge, value: Length) -> Self {
        self.set(edge, value);
        self
    }

    /// Effective value of an edge after applying logical aliases and shorthands.
    ///
    /// For a physical edge the lookup order is: the logical alias (`Start` or `End`
    /// depending on `direction`), the physical slot, `Horizontal`/`Vertical`, `All`.
    /// `Start`/`End` are first mapped to their physical edge. Shorthand slots return
    /// their raw value.
    #[must_use]
    pub fn computed(&self, edge: Edge, direction: Direction) -> Length {
        let physical = edge.to_physical(direction);
        let axis_shorthand = match physical {
            Edge::Left | Edge::Right => Edge::Horizontal,
            Edge::Top | Edge::Bottom => Edge::Vertical,
            other => return self.get(other),
        };
        let alias = logical_alias(physical, direction);
        alias
            .into_iter()
            .chain([physical, axis_shorthand, Edge::All])
            .map(|slot| self.get(slot))
            .find(|value| !value.is_undefined())
            .unwrap_or(Length::Undefined)
    }
}

/// Logical slot that maps onto `physical` in `direction`.
const fn logical_alias(physical: Edge, direction: Direction) -> Option<Edge> {
    match (physical, direction) {
        (Edge::Left, Direction::Rtl) | (Edge::Right, Direction::Ltr | Direction::Inherit) => {
            Some(Edge::End)
        }
        (Edge::Left, _) | (Edge::Right, Direction::Rtl) => Some(Edge::Start),
        _ => None,
    }
}
