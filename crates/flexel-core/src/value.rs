//! Numeric values: the undefined sentinel, [`FloatOptional`] and [`Length`].
//!
//! A single reserved float, [`UNDEFINED`], stands for "no value" everywhere a raw `f32`
//! crosses the style/layout surface. Inside the engine it is wrapped in [`FloatOptional`],
//! whose arithmetic is absorbing: combining anything with an undefined operand yields
//! undefined.

use crate::error::StyleError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

/// The reserved "no value" float.
pub const UNDEFINED: f32 = f32::NAN;

/// Tolerance used when comparing layout floats.
const EPSILON: f32 = 0.0001;

/// Check whether a raw float is the undefined sentinel.
#[must_use]
#[inline]
pub fn is_undefined(value: f32) -> bool {
    value.is_nan()
}

/// Compare two raw floats, treating two undefined values as equal.
#[must_use]
pub fn float_eq(a: f32, b: f32) -> bool {
    match (is_undefined(a), is_undefined(b)) {
        (false, false) => (a - b).abs() < EPSILON,
        (true, true) => true,
        _ => false,
    }
}

/// Maximum of two raw floats, preferring whichever one is defined.
#[must_use]
pub fn float_max(a: f32, b: f32) -> f32 {
    match (is_undefined(a), is_undefined(b)) {
        (false, false) => a.max(b),
        (true, _) => b,
        (false, true) => a,
    }
}

/// Minimum of two raw floats, preferring whichever one is defined.
#[must_use]
pub fn float_min(a: f32, b: f32) -> f32 {
    match (is_undefined(a), is_undefined(b)) {
        (false, false) => a.min(b),
        (true, _) => b,
        (false, true) => a,
    }
}

/// An `f32` that may be undefined.
///
/// Arithmetic is absorbing: `defined + undefined == undefined`. Two undefined values
/// compare equal; ordering comparisons involving an undefined operand are `false`.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(from = "Option<f32>", into = "Option<f32>")]
pub struct FloatOptional(f32);

impl FloatOptional {
    /// The undefined value.
    pub const UNDEFINED: Self = Self(UNDEFINED);

    /// Wrap a raw float. NaN becomes undefined.
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Check if the value is undefined.
    #[must_use]
    pub fn is_undefined(self) -> bool {
        is_undefined(self.0)
    }

    /// Check if the value is defined.
    #[must_use]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// The defined value, if any.
    #[must_use]
    pub fn get(self) -> Option<f32> {
        if self.is_undefined() {
            None
        } else {
            Some(self.0)
        }
    }

    /// The raw float, which is [`UNDEFINED`] when no value is present.
    #[must_use]
    pub const fn raw(self) -> f32 {
        self.0
    }

    /// The value, or `default` when undefined.
    #[must_use]
    pub fn unwrap_or(self, default: f32) -> f32 {
        if self.is_undefined() {
            default
        } else {
            self.0
        }
    }

    /// Maximum of two optionals, preferring whichever one is defined.
    #[must_use]
    pub fn max_defined(self, other: Self) -> Self {
        Self(float_max(self.0, other.0))
    }

    /// Minimum of two optionals, preferring whichever one is defined.
    #[must_use]
    pub fn min_defined(self, other: Self) -> Self {
        Self(float_min(self.0, other.0))
    }
}

impl Default for FloatOptional {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

impl fmt::Debug for FloatOptional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("undefined"),
        }
    }
}

impl From<f32> for FloatOptional {
    fn from(value: f32) -> Self {
        Self(value)
    }
}

impl From<Option<f32>> for FloatOptional {
    fn from(value: Option<f32>) -> Self {
        value.map_or(Self::UNDEFINED, Self)
    }
}

impl From<FloatOptional> for Option<f32> {
    fn from(value: FloatOptional) -> Self {
        value.get()
    }
}

impl PartialEq for FloatOptional {
    fn eq(&self, other: &Self) -> bool {
        match (self.get(), other.get()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    }
}

impl PartialEq<f32> for FloatOptional {
    fn eq(&self, other: &f32) -> bool {
        self.get() == Some(*other)
    }
}

impl PartialOrd for FloatOptional {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.get(), other.get()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            (None, None) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl PartialOrd<f32> for FloatOptional {
    fn partial_cmp(&self, other: &f32) -> Option<Ordering> {
        self.get().and_then(|v| v.partial_cmp(other))
    }
}

macro_rules! absorbing_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for FloatOptional {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                if self.is_undefined() || rhs.is_undefined() {
                    Self::UNDEFINED
                } else {
                    Self(self.0 $op rhs.0)
                }
            }
        }

        impl $trait<f32> for FloatOptional {
            type Output = Self;

            fn $method(self, rhs: f32) -> Self {
                self $op Self(rhs)
            }
        }
    };
}

absorbing_op!(Add, add, +);
absorbing_op!(Sub, sub, -);
absorbing_op!(Mul, mul, *);
absorbing_op!(Div, div, /);

impl Neg for FloatOptional {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// A style length: undefined, auto, a point value or a percentage.
///
/// `Point` and `Percent` never hold NaN once they pass through a style setter or
/// deserialization; NaN collapses to [`Length::Undefined`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "LengthRepr")]
pub enum Length {
    /// No value was set.
    #[default]
    Undefined,
    /// Size is derived by the algorithm.
    Auto,
    /// Absolute value in points.
    Point(f32),
    /// Percentage of a reference size supplied by the owner.
    Percent(f32),
}

impl Length {
    /// Point length. NaN yields [`Length::Undefined`].
    #[must_use]
    pub fn point(value: f32) -> Self {
        if is_undefined(value) {
            Self::Undefined
        } else {
            Self::Point(value)
        }
    }

    /// Percent length. NaN yields [`Length::Undefined`].
    #[must_use]
    pub fn percent(value: f32) -> Self {
        if is_undefined(value) {
            Self::Undefined
        } else {
            Self::Percent(value)
        }
    }

    /// Collapse a NaN point or percent value to [`Length::Undefined`].
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Point(v) => Self::point(v),
            Self::Percent(p) => Self::percent(p),
            other => other,
        }
    }

    /// Check if the length is [`Length::Undefined`].
    #[must_use]
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Check if the length is [`Length::Auto`].
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve against a reference size.
    ///
    /// Percentages of an undefined reference stay undefined; a negative reference is
    /// treated as zero.
    #[must_use]
    pub fn resolve(self, reference: f32) -> FloatOptional {
        match self {
            Self::Undefined | Self::Auto => FloatOptional::UNDEFINED,
            Self::Point(v) => FloatOptional::new(v),
            Self::Percent(p) => {
                if is_undefined(reference) {
                    FloatOptional::UNDEFINED
                } else {
                    FloatOptional::new(p * reference.max(0.0) / 100.0)
                }
            }
        }
    }

    /// Resolve for a box edge, where anything unresolved counts as zero.
    #[must_use]
    pub fn resolve_or_zero(self, reference: f32) -> f32 {
        self.resolve(reference).unwrap_or(0.0)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
enum LengthRepr {
    Undefined,
    Auto,
    Point(f32),
    Percent(f32),
}

impl From<LengthRepr> for Length {
    fn from(repr: LengthRepr) -> Self {
        match repr {
            LengthRepr::Undefined => Self::Undefined,
            LengthRepr::Auto => Self::Auto,
            LengthRepr::Point(v) => Self::point(v),
            LengthRepr::Percent(p) => Self::percent(p),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Auto => f.write_str("auto"),
            Self::Point(v) => write!(f, "{v}px"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

impl FromStr for Length {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || StyleError::InvalidLength(s.to_string());
        match trimmed {
            "auto" => Ok(Self::Auto),
            "undefined" | "" => Ok(Self::Undefined),
            _ => {
                if let Some(pct) = trimmed.strip_suffix('%') {
                    let v: f32 = pct.trim().parse().map_err(|_| invalid())?;
                    Ok(Self::percent(v))
                } else {
                    let number = trimmed
                        .strip_suffix("px")
                        .or_else(|| trimmed.strip_suffix("pt"))
                        .unwrap_or(trimmed);
                    let v: f32 = number.trim().parse().map_err(|_| invalid())?;
                    Ok(Self::point(v))
                }
            }
        }
    }
}
