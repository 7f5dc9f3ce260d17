//! Baseline resolution.

use crate::engine::LayoutEngine;
use crate::node::align_item;
use crate::tree::NodeId;
use flexel_core::{Align, Display, PositionType};

impl LayoutEngine<'_> {
    /// Distance from the top of `id` to its first baseline.
    ///
    /// Uses the node's baseline function when present, otherwise the baseline of its
    /// baseline child offset by that child's top. Returns `None` when neither exists,
    /// in which case callers fall back to the node's height. A line aligns on baselines
    /// only when one of its baseline-aligned items supplies a baseline function.
    pub(crate) fn baseline(&mut self, id: NodeId) -> Option<f32> {
        let node = &self.nodes[id];
        if let Some(func) = node.baseline.clone() {
            let (width, height) = (node.layout.measured_width(), node.layout.measured_height());
            let baseline = func.call(width, height, &mut *self.context);
            if baseline.is_nan() {
                log::warn!("baseline function of {id:?} returned NaN; using the node height");
                return Some(height);
            }
            return Some(baseline);
        }

        let child = self.baseline_child(id)?;
        let layout = &self.nodes[child].layout;
        let (height, top) = (layout.measured_height(), layout.top());
        Some(self.baseline(child).unwrap_or(height) + top)
    }

    /// First-line child that defines the baseline of `id`: the first one aligned on its
    /// baseline or flagged as the reference, else the first in-flow child.
    fn baseline_child(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id];
        let mut first = None;
        for &child_id in &node.children {
            let child = &self.nodes[child_id];
            if child.line_index > 0 {
                break;
            }
            if child.style.position_type() == PositionType::Absolute
                || child.style.display() == Display::None
            {
                continue;
            }
            if align_item(node, child) == Align::Baseline || child.flags.is_reference_baseline {
                return Some(child_id);
            }
            first.get_or_insert(child_id);
        }
        first
    }

    /// Whether `id` or its baseline child chain carries a baseline function.
    pub(crate) fn supplies_baseline(&self, id: NodeId) -> bool {
        self.nodes[id].baseline.is_some()
            || self
                .baseline_child(id)
                .is_some_and(|child| self.supplies_baseline(child))
    }

    /// Whether the children of `id` take part in baseline alignment.
    pub(crate) fn is_baseline_layout(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        if node.style.flex_direction().is_column() {
            return false;
        }
        if node.style.align_items() == Align::Baseline {
            return true;
        }
        node.children.iter().any(|&child_id| {
            let child = &self.nodes[child_id];
            child.style.position_type() == PositionType::Relative
                && child.style.align_self() == Align::Baseline
        })
    }
}
