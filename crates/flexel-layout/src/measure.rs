//! Host callback slots.
//!
//! Each slot is either a plain closure or one that also receives the layout context passed
//! to [`crate::LayoutTree::calculate_layout_with_context`]. When no context was supplied the
//! context-carrying variant receives `&mut ()`.

use crate::node::Node;
use crate::tree::NodeId;
use flexel_core::{MeasureMode, Size};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

type PlainMeasure = dyn Fn(f32, MeasureMode, f32, MeasureMode) -> Size + Send + Sync;
type ContextMeasure = dyn Fn(f32, MeasureMode, f32, MeasureMode, &mut dyn Any) -> Size + Send + Sync;
type PlainBaseline = dyn Fn(f32, f32) -> f32 + Send + Sync;
type ContextBaseline = dyn Fn(f32, f32, &mut dyn Any) -> f32 + Send + Sync;
type PlainPrint = dyn Fn(NodeId) -> String + Send + Sync;
type ContextPrint = dyn Fn(NodeId, &mut dyn Any) -> String + Send + Sync;

/// Reports the intrinsic size of a childless node.
///
/// Arguments are `(width, width_mode, height, height_mode)`. The result must honor
/// `AtMost` as an upper bound and `Exactly` as a forced value.
#[derive(Clone)]
pub enum MeasureFunc {
    /// Closure without layout context.
    Plain(Arc<PlainMeasure>),
    /// Closure receiving the layout context.
    WithContext(Arc<ContextMeasure>),
}

impl MeasureFunc {
    /// Wrap a plain closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f32, MeasureMode, f32, MeasureMode) -> Size + Send + Sync + 'static,
    {
        Self::Plain(Arc::new(f))
    }

    /// Wrap a context-carrying closure.
    pub fn with_context<F>(f: F) -> Self
    where
        F: Fn(f32, MeasureMode, f32, MeasureMode, &mut dyn Any) -> Size + Send + Sync + 'static,
    {
        Self::WithContext(Arc::new(f))
    }

    pub(crate) fn call(
        &self,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
        context: &mut dyn Any,
    ) -> Size {
        match self {
            Self::Plain(f) => f(width, width_mode, height, height_mode),
            Self::WithContext(f) => f(width, width_mode, height, height_mode, context),
        }
    }
}

/// Reports the distance from the top of a node to its first baseline, given the node's
/// laid-out `(width, height)`.
#[derive(Clone)]
pub enum BaselineFunc {
    /// Closure without layout context.
    Plain(Arc<PlainBaseline>),
    /// Closure receiving the layout context.
    WithContext(Arc<ContextBaseline>),
}

impl BaselineFunc {
    /// Wrap a plain closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f32, f32) -> f32 + Send + Sync + 'static,
    {
        Self::Plain(Arc::new(f))
    }

    /// Wrap a context-carrying closure.
    pub fn with_context<F>(f: F) -> Self
    where
        F: Fn(f32, f32, &mut dyn Any) -> f32 + Send + Sync + 'static,
    {
        Self::WithContext(Arc::new(f))
    }

    pub(crate) fn call(&self, width: f32, height: f32, context: &mut dyn Any) -> f32 {
        match self {
            Self::Plain(f) => f(width, height),
            Self::WithContext(f) => f(width, height, context),
        }
    }
}

/// Produces extra text for a node in the tree dump.
#[derive(Clone)]
pub enum PrintFunc {
    /// Closure without layout context.
    Plain(Arc<PlainPrint>),
    /// Closure receiving the layout context.
    WithContext(Arc<ContextPrint>),
}

impl PrintFunc {
    /// Wrap a plain closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(NodeId) -> String + Send + Sync + 'static,
    {
        Self::Plain(Arc::new(f))
    }

    /// Wrap a context-carrying closure.
    pub fn with_context<F>(f: F) -> Self
    where
        F: Fn(NodeId, &mut dyn Any) -> String + Send + Sync + 'static,
    {
        Self::WithContext(Arc::new(f))
    }

    pub(crate) fn call(&self, id: NodeId, context: &mut dyn Any) -> String {
        match self {
            Self::Plain(f) => f(id),
            Self::WithContext(f) => f(id, context),
        }
    }
}

/// Invoked with the node's id whenever it goes from clean to dirty.
pub type DirtiedFunc = Arc<dyn Fn(NodeId) + Send + Sync>;

/// Clone policy for copy-on-write: receives the shared node, the new owner and the child
/// index, and returns the node to insert in its place.
pub type CloneNodeFunc = Arc<dyn Fn(&Node, NodeId, usize) -> Node + Send + Sync>;

macro_rules! opaque_debug {
    ($($name:ident),+) => {
        $(
            impl fmt::Debug for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    match self {
                        Self::Plain(_) => write!(f, "{}::Plain(..)", stringify!($name)),
                        Self::WithContext(_) => write!(f, "{}::WithContext(..)", stringify!($name)),
                    }
                }
            }
        )+
    };
}

opaque_debug!(MeasureFunc, BaselineFunc, PrintFunc);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_measure_ignores_context() {
        let f = MeasureFunc::new(|w, _, h, _| Size::new(w / 2.0, h / 2.0));
        let size = f.call(10.0, MeasureMode::Exactly, 20.0, MeasureMode::AtMost, &mut ());
        assert_eq!(size, Size::new(5.0, 10.0));
    }

    #[test]
    fn test_context_measure_reads_context() {
        let f = MeasureFunc::with_context(|_, _, _, _, ctx| {
            let scale = ctx.downcast_ref::<f32>().copied().unwrap_or(1.0);
            Size::new(10.0 * scale, 1.0)
        });
        let mut scale = 3.0_f32;
        let size = f.call(0.0, MeasureMode::Undefined, 0.0, MeasureMode::Undefined, &mut scale);
        assert_eq!(size.width, 30.0);
    }

    #[test]
    fn test_baseline_variants() {
        let plain = BaselineFunc::new(|_, h| h * 0.8);
        assert_eq!(plain.call(10.0, 10.0, &mut ()), 8.0);
        let ctx = BaselineFunc::with_context(|_, _, ctx| {
            ctx.downcast_mut::<u32>().map_or(0.0, |n| {
                *n += 1;
                1.0
            })
        });
        let mut calls = 0_u32;
        assert_eq!(ctx.call(0.0, 0.0, &mut calls), 1.0);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_debug_is_opaque() {
        let f = PrintFunc::new(|_| String::new());
        assert_eq!(format!("{f:?}"), "PrintFunc::Plain(..)");
    }
}
