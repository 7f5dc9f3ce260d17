//! Keyword enums used by styles and layout results.
//!
//! Every enum parses from and prints to its CSS-like keyword, and (de)serializes through
//! that same keyword.

use crate::error::StyleError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $keyword:literal, )+
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Keyword for this variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $keyword,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StyleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($keyword => Ok(Self::$variant),)+
                    other => Err(StyleError::InvalidKeyword {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let keyword = String::deserialize(deserializer)?;
                keyword.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

keyword_enum! {
    /// Inline layout direction.
    pub enum Direction {
        /// Take the direction of the owner.
        Inherit => "inherit",
        /// Left to right.
        Ltr => "ltr",
        /// Right to left.
        Rtl => "rtl",
    }
    default = Inherit;
}

keyword_enum! {
    /// Direction of the main axis.
    pub enum FlexDirection {
        /// Top to bottom.
        Column => "column",
        /// Bottom to top.
        ColumnReverse => "column-reverse",
        /// Start to end of the inline direction.
        Row => "row",
        /// End to start of the inline direction.
        RowReverse => "row-reverse",
    }
    default = Column;
}

impl FlexDirection {
    /// Horizontal axis?
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Vertical axis?
    #[must_use]
    pub const fn is_column(self) -> bool {
        matches!(self, Self::Column | Self::ColumnReverse)
    }

    /// Items are laid out from the trailing edge?
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }

    /// Apply the inline direction: rows flip under RTL.
    #[must_use]
    pub const fn resolve(self, direction: Direction) -> Self {
        match (self, direction) {
            (Self::Row, Direction::Rtl) => Self::RowReverse,
            (Self::RowReverse, Direction::Rtl) => Self::Row,
            (axis, _) => axis,
        }
    }

    /// The cross axis for this (already resolved) main axis.
    #[must_use]
    pub const fn cross(self, direction: Direction) -> Self {
        if self.is_column() {
            Self::Row.resolve(direction)
        } else {
            Self::Column
        }
    }
}

keyword_enum! {
    /// Main-axis distribution of free space.
    pub enum Justify {
        FlexStart => "flex-start",
        Center => "center",
        FlexEnd => "flex-end",
        SpaceBetween => "space-between",
        SpaceAround => "space-around",
        SpaceEvenly => "space-evenly",
    }
    default = FlexStart;
}

keyword_enum! {
    /// Cross-axis alignment, used by `align-items`, `align-self` and `align-content`.
    pub enum Align {
        /// Defer to the owner's `align-items` (only meaningful for `align-self`).
        Auto => "auto",
        FlexStart => "flex-start",
        Center => "center",
        FlexEnd => "flex-end",
        Stretch => "stretch",
        Baseline => "baseline",
        SpaceBetween => "space-between",
        SpaceAround => "space-around",
    }
    default = Auto;
}

keyword_enum! {
    /// Positioning scheme.
    pub enum PositionType {
        /// In flow, offset by insets.
        Relative => "relative",
        /// Out of flow, placed against the owner's padding box.
        Absolute => "absolute",
    }
    default = Relative;
}

keyword_enum! {
    /// Line wrapping.
    pub enum Wrap {
        NoWrap => "nowrap",
        Wrap => "wrap",
        WrapReverse => "wrap-reverse",
    }
    default = NoWrap;
}

keyword_enum! {
    /// Overflow behavior. `Scroll` leaves the main axis unconstrained for children.
    pub enum Overflow {
        Visible => "visible",
        Hidden => "hidden",
        Scroll => "scroll",
    }
    default = Visible;
}

keyword_enum! {
    /// Whether the node takes part in layout at all.
    pub enum Display {
        Flex => "flex",
        None => "none",
    }
    default = Flex;
}

keyword_enum! {
    /// Style edge slot. `Start`/`End` follow the layout direction; `Horizontal`,
    /// `Vertical` and `All` are shorthands.
    pub enum Edge {
        Left => "left",
        Top => "top",
        Right => "right",
        Bottom => "bottom",
        Start => "start",
        End => "end",
        Horizontal => "horizontal",
        Vertical => "vertical",
        All => "all",
    }
    default = All;
}

impl Edge {
    /// The four physical edges.
    pub const PHYSICAL: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];

    /// Map `Start`/`End` to a physical edge for `direction`. Other edges pass through.
    #[must_use]
    pub const fn to_physical(self, direction: Direction) -> Self {
        match (self, direction) {
            (Self::Start, Direction::Rtl) | (Self::End, Direction::Ltr | Direction::Inherit) => {
                Self::Right
            }
            (Self::Start, _) | (Self::End, Direction::Rtl) => Self::Left,
            (edge, _) => edge,
        }
    }
}

keyword_enum! {
    /// Edge of a computed layout.
    pub enum LayoutEdge {
        Left => "left",
        Top => "top",
        Right => "right",
        Bottom => "bottom",
        Start => "start",
        End => "end",
    }
    default = Left;
}

impl LayoutEdge {
    /// Physical index (`Left`, `Top`, `Right`, `Bottom`) for `direction`.
    #[must_use]
    pub const fn physical_index(self, direction: Direction) -> usize {
        match (self, direction) {
            (Self::Left, _) | (Self::Start, Direction::Ltr | Direction::Inherit) | (Self::End, Direction::Rtl) => 0,
            (Self::Top, _) => 1,
            (Self::Right, _) | (Self::End, Direction::Ltr | Direction::Inherit) | (Self::Start, Direction::Rtl) => 2,
            (Self::Bottom, _) => 3,
        }
    }
}

keyword_enum! {
    /// Axis dimension.
    pub enum Dimension {
        Width => "width",
        Height => "height",
    }
    default = Width;
}

keyword_enum! {
    /// Constraint kind accompanying a proposed size.
    pub enum MeasureMode {
        /// No constraint.
        Undefined => "undefined",
        /// The result must equal the proposed size.
        Exactly => "exactly",
        /// The proposed size is an upper bound.
        AtMost => "at-most",
    }
    default = Undefined;
}

keyword_enum! {
    /// Node kind. Text nodes are never rounded down on the pixel grid.
    pub enum NodeType {
        Default => "default",
        Text => "text",
    }
    default = Default;
}
