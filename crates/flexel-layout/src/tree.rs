//! The node arena and the tree mutation API.
//!
//! Nodes live in a [`SlotMap`] and are addressed by generational [`NodeId`] handles. A
//! child's `owner` is the node allowed to mutate it in place; a child reached through a
//! node that does not own it is shared and gets cloned before the first write through
//! that node (see [`LayoutTree::child_for_write`]).

use crate::config::Config;
use crate::error::TreeError;
use crate::measure::{BaselineFunc, DirtiedFunc, MeasureFunc, PrintFunc};
use crate::node::{Layout, Node, NodeContext};
use flexel_core::{FloatOptional, NodeType, Style};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a node in a [`LayoutTree`].
    pub struct NodeId;
}

/// Arena of nodes sharing one [`Config`].
#[derive(Debug, Default)]
pub struct LayoutTree {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    pub(crate) config: Config,
    pub(crate) config_generation: u32,
    pub(crate) generation: u32,
}

impl LayoutTree {
    /// Create an empty tree with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with `config`.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // ========================================================================
    // Config
    // ========================================================================

    /// The tree's config.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the config. Cached layouts of every node become invalid.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
        self.bump_config_generation();
    }

    /// Modify the config in place. Cached layouts of every node become invalid.
    pub fn update_config<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Config),
    {
        f(&mut self.config);
        self.bump_config_generation();
    }

    /// Counter bumped on every config change.
    #[must_use]
    pub const fn config_generation(&self) -> u32 {
        self.config_generation
    }

    fn bump_config_generation(&mut self) {
        self.config_generation = self.config_generation.wrapping_add(1);
        log::debug!("config changed, generation {}", self.config_generation);
    }

    // ========================================================================
    // Creation and lookup
    // ========================================================================

    /// Create a node with the default style.
    pub fn new_node(&mut self) -> NodeId {
        self.nodes.insert(Node::new(self.config.use_web_defaults))
    }

    /// Create a node with `style`.
    pub fn new_node_with_style(&mut self, style: Style) -> NodeId {
        self.nodes
            .insert(Node::with_style(style, self.config.use_web_defaults))
    }

    /// Create a measured leaf.
    pub fn new_leaf_with_measure(&mut self, style: Style, measure: MeasureFunc) -> NodeId {
        let mut node = Node::with_style(style, self.config.use_web_defaults);
        node.measure = Some(measure);
        node.flags.node_type = NodeType::Text;
        self.nodes.insert(node)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id).ok_or(TreeError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::NodeNotFound(id))
    }

    /// Style of a node.
    pub fn style(&self, id: NodeId) -> Result<&Style, TreeError> {
        Ok(self.node(id)?.style())
    }

    /// Computed layout of a node.
    pub fn layout(&self, id: NodeId) -> Result<&Layout, TreeError> {
        Ok(self.node(id)?.layout())
    }

    /// Children of a node.
    pub fn children(&self, parent: NodeId) -> Result<&[NodeId], TreeError> {
        Ok(self.node(parent)?.children())
    }

    /// Child at `index`.
    pub fn child(&self, parent: NodeId, index: usize) -> Result<NodeId, TreeError> {
        let children = self.children(parent)?;
        children
            .get(index)
            .copied()
            .ok_or(TreeError::IndexOutOfBounds {
                index,
                len: children.len(),
            })
    }

    /// Number of children.
    pub fn child_count(&self, parent: NodeId) -> Result<usize, TreeError> {
        Ok(self.children(parent)?.len())
    }

    /// Owner of a node.
    pub fn owner(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.owner)
    }

    /// Whether the node's layout is stale.
    pub fn is_dirty(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(id)?.flags.is_dirty)
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Insert `child` at `index`, shifting later children right.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), TreeError> {
        self.check_insert(parent, child, index)?;
        if let Some(owner) = self.node(child)?.owner {
            return Err(TreeError::ChildHasOwner { child, owner });
        }
        clone_children(&mut self.nodes, &self.config, parent);
        self.nodes[parent].children.insert(index, child);
        self.nodes[child].owner = Some(parent);
        mark_dirty_and_propagate(&mut self.nodes, parent);
        Ok(())
    }

    /// Insert `child` at `index` without taking ownership. The child becomes shared and
    /// is cloned before any write through `parent`.
    pub fn insert_shared_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), TreeError> {
        self.check_insert(parent, child, index)?;
        self.nodes[parent].children.insert(index, child);
        self.nodes[child].owner = None;
        mark_dirty_and_propagate(&mut self.nodes, parent);
        Ok(())
    }

    fn check_insert(&self, parent: NodeId, child: NodeId, index: usize) -> Result<(), TreeError> {
        let parent_node = self.node(parent)?;
        self.node(child)?;
        if parent_node.has_measure_func() {
            return Err(TreeError::ParentHasMeasureFunc(parent));
        }
        let len = parent_node.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        if self.reaches(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Whether `target` is `from` or one of its descendants.
    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if let Some(node) = self.nodes.get(id) {
                stack.extend_from_slice(&node.children);
            }
        }
        false
    }

    /// Remove the first reference to `child`. Returns `Ok(false)` when `child` is not a
    /// child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool, TreeError> {
        self.node(child)?;
        let Some(index) = self.node(parent)?.children.iter().position(|c| *c == child) else {
            return Ok(false);
        };
        self.detach_at(parent, index);
        Ok(true)
    }

    /// Remove the child at `index` and return it.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<NodeId, TreeError> {
        let child = self.child(parent, index)?;
        self.detach_at(parent, index);
        Ok(child)
    }

    fn detach_at(&mut self, parent: NodeId, index: usize) {
        let child = self.nodes[parent].children.remove(index);
        let removed = &mut self.nodes[child];
        if removed.owner == Some(parent) {
            removed.layout = Layout::default();
            removed.owner = None;
        }
        clone_children(&mut self.nodes, &self.config, parent);
        mark_dirty_and_propagate(&mut self.nodes, parent);
    }

    /// Replace `old` with `new` at the same index.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), TreeError> {
        let index = self
            .node(parent)?
            .children
            .iter()
            .position(|c| *c == old)
            .ok_or(TreeError::NotAChild { parent, child: old })?;
        if old == new {
            return Ok(());
        }
        if let Some(owner) = self.node(new)?.owner {
            return Err(TreeError::ChildHasOwner { child: new, owner });
        }
        if self.reaches(new, parent) {
            return Err(TreeError::Cycle { parent, child: new });
        }
        self.detach_at(parent, index);
        self.nodes[parent].children.insert(index, new);
        self.nodes[new].owner = Some(parent);
        Ok(())
    }

    /// Detach every child.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<(), TreeError> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        if children.is_empty() {
            return Ok(());
        }
        for child in children {
            let node = &mut self.nodes[child];
            if node.owner == Some(parent) {
                node.layout = Layout::default();
                node.owner = None;
            }
        }
        mark_dirty_and_propagate(&mut self.nodes, parent);
        Ok(())
    }

    /// Replace the child list wholesale. Every new child becomes owned by `parent`.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), TreeError> {
        let parent_node = self.node(parent)?;
        if parent_node.has_measure_func() && !children.is_empty() {
            return Err(TreeError::ParentHasMeasureFunc(parent));
        }
        for &child in children {
            match self.node(child)?.owner {
                Some(owner) if owner != parent => {
                    return Err(TreeError::ChildHasOwner { child, owner });
                }
                _ => {}
            }
            if self.reaches(child, parent) {
                return Err(TreeError::Cycle { parent, child });
            }
        }

        let old = std::mem::replace(&mut self.nodes[parent].children, children.to_vec());
        for child in old {
            if children.contains(&child) {
                continue;
            }
            let node = &mut self.nodes[child];
            if node.owner == Some(parent) {
                node.layout = Layout::default();
                node.owner = None;
            }
        }
        for &child in children {
            self.nodes[child].owner = Some(parent);
        }
        mark_dirty_and_propagate(&mut self.nodes, parent);
        Ok(())
    }

    // ========================================================================
    // Copy-on-write
    // ========================================================================

    /// Return a handle to the child at `index` that is safe to mutate through `parent`,
    /// cloning it first when `parent` does not own it.
    pub fn child_for_write(&mut self, parent: NodeId, index: usize) -> Result<NodeId, TreeError> {
        let child = self.child(parent, index)?;
        if self.nodes[child].owner == Some(parent) {
            return Ok(child);
        }
        let clone = clone_for_owner(&mut self.nodes, &self.config, child, parent, index);
        self.nodes[parent].children[index] = clone;
        Ok(clone)
    }

    /// Clone every child of `parent` that `parent` does not own.
    pub fn clone_children_if_needed(&mut self, parent: NodeId) -> Result<(), TreeError> {
        self.node(parent)?;
        clone_children(&mut self.nodes, &self.config, parent);
        Ok(())
    }

    /// Shallow clone: style, layout, callbacks, context and child references are copied.
    /// The clone has no owner.
    pub fn clone_node(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        let mut copy = self.node(id)?.clone();
        copy.owner = None;
        Ok(self.nodes.insert(copy))
    }

    // ========================================================================
    // Destruction
    // ========================================================================

    /// Detach `id` from every node referencing it and free it. Children it owned become
    /// ownerless.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        let children = self.node(id)?.children.clone();
        let parents: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.children.contains(&id))
            .map(|(key, _)| key)
            .collect();
        for parent in parents {
            self.nodes[parent].children.retain(|c| *c != id);
            mark_dirty_and_propagate(&mut self.nodes, parent);
        }
        for child in children {
            if let Some(node) = self.nodes.get_mut(child) {
                if node.owner == Some(id) {
                    node.owner = None;
                }
            }
        }
        self.nodes.remove(id);
        Ok(())
    }

    /// Free `id` and every descendant it owns. Shared descendants are only detached.
    pub fn remove_recursive(&mut self, id: NodeId) -> Result<(), TreeError> {
        let children = self.node(id)?.children.clone();
        for child in children {
            if self.nodes.get(child).and_then(|n| n.owner) == Some(id) {
                self.remove_recursive(child)?;
            }
        }
        self.remove(id)
    }

    /// Restore a detached, childless node to its initial state.
    pub fn reset(&mut self, id: NodeId) -> Result<(), TreeError> {
        let web = self.config.use_web_defaults;
        let node = self.node_mut(id)?;
        if !node.children.is_empty() || node.owner.is_some() {
            return Err(TreeError::ResetAttached(id));
        }
        *node = Node::new(web);
        Ok(())
    }

    // ========================================================================
    // Style
    // ========================================================================

    /// Replace the style. Marks the node dirty when it changed.
    pub fn set_style(&mut self, id: NodeId, style: Style) -> Result<bool, TreeError> {
        self.update_style(id, |s| *s = style)
    }

    /// Modify the style in place. Marks the node dirty when it changed.
    ///
    /// Dirtiness propagates through the owner chain only. A shared node (attached with
    /// [`LayoutTree::insert_shared_child`]) has no owner, and every parent that lays it
    /// out works on its own clone, so writing the shared node never reaches those
    /// parents. To change the child one parent sees, take the handle from
    /// [`LayoutTree::child_for_write`] and write through that.
    pub fn update_style<F>(&mut self, id: NodeId, f: F) -> Result<bool, TreeError>
    where
        F: FnOnce(&mut Style),
    {
        let node = self.node_mut(id)?;
        let mut style = node.style;
        f(&mut style);
        let changed = node.replace_style(style);
        if changed {
            mark_dirty_and_propagate(&mut self.nodes, id);
        }
        Ok(changed)
    }

    /// Apply a CSS-like declaration such as `("width", "50%")`. On error the style is
    /// left untouched.
    pub fn set_style_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<bool, TreeError> {
        let mut style = *self.style(id)?;
        style.set_property(name, value)?;
        self.set_style(id, style)
    }

    /// Copy the style of `src` onto `dst`.
    pub fn copy_style(&mut self, dst: NodeId, src: NodeId) -> Result<bool, TreeError> {
        let style = *self.style(src)?;
        self.set_style(dst, style)
    }

    // ========================================================================
    // Dirty state and flags
    // ========================================================================

    /// Mark a measured leaf dirty, e.g. after its text changed.
    pub fn mark_dirty(&mut self, id: NodeId) -> Result<(), TreeError> {
        if !self.node(id)?.has_measure_func() {
            return Err(TreeError::MarkDirtyWithoutMeasure(id));
        }
        mark_dirty_and_propagate(&mut self.nodes, id);
        Ok(())
    }

    /// One-shot flag set by layout and cleared by the host.
    pub fn has_new_layout(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(id)?.flags.has_new_layout)
    }

    /// Set or clear the new-layout flag.
    pub fn set_has_new_layout(&mut self, id: NodeId, value: bool) -> Result<(), TreeError> {
        self.node_mut(id)?.flags.has_new_layout = value;
        Ok(())
    }

    /// Set the node type.
    pub fn set_node_type(&mut self, id: NodeId, node_type: NodeType) -> Result<(), TreeError> {
        self.node_mut(id)?.flags.node_type = node_type;
        Ok(())
    }

    /// Prefer this node when its owner resolves a baseline.
    pub fn set_is_reference_baseline(&mut self, id: NodeId, value: bool) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.flags.is_reference_baseline != value {
            node.flags.is_reference_baseline = value;
            mark_dirty_and_propagate(&mut self.nodes, id);
        }
        Ok(())
    }

    // ========================================================================
    // Callbacks and context
    // ========================================================================

    /// Install or clear the measure function. Installing one makes the node a text node.
    pub fn set_measure_func(
        &mut self,
        id: NodeId,
        measure: Option<MeasureFunc>,
    ) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if measure.is_some() && !node.children.is_empty() {
            return Err(TreeError::MeasureFuncWithChildren(id));
        }
        node.flags.node_type = if measure.is_some() {
            NodeType::Text
        } else {
            NodeType::Default
        };
        node.measure = measure;
        mark_dirty_and_propagate(&mut self.nodes, id);
        Ok(())
    }

    /// Install or clear the baseline function.
    pub fn set_baseline_func(
        &mut self,
        id: NodeId,
        baseline: Option<BaselineFunc>,
    ) -> Result<(), TreeError> {
        self.node_mut(id)?.baseline = baseline;
        Ok(())
    }

    /// Install or clear the print function.
    pub fn set_print_func(&mut self, id: NodeId, print: Option<PrintFunc>) -> Result<(), TreeError> {
        self.node_mut(id)?.print = print;
        Ok(())
    }

    /// Install or clear the dirtied callback.
    pub fn set_dirtied_func(
        &mut self,
        id: NodeId,
        dirtied: Option<DirtiedFunc>,
    ) -> Result<(), TreeError> {
        self.node_mut(id)?.dirtied = dirtied;
        Ok(())
    }

    /// Attach a host value.
    pub fn set_context(&mut self, id: NodeId, context: Option<NodeContext>) -> Result<(), TreeError> {
        self.node_mut(id)?.context = context;
        Ok(())
    }

    /// Host value attached to the node.
    pub fn context(&self, id: NodeId) -> Result<Option<&NodeContext>, TreeError> {
        Ok(self.node(id)?.context())
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Whether two subtrees have identical computed layouts.
    pub fn layout_trees_equal(&self, a: NodeId, b: NodeId) -> Result<bool, TreeError> {
        let (left, right) = (self.node(a)?, self.node(b)?);
        if left.children.len() != right.children.len() || !left.layout.same_output(&right.layout) {
            return Ok(false);
        }
        for (ca, cb) in left.children.iter().zip(&right.children) {
            if !self.layout_trees_equal(*ca, *cb)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Set `id` dirty and walk up the owner chain, stopping at the first node that is
/// already dirty.
pub(crate) fn mark_dirty_and_propagate(nodes: &mut SlotMap<NodeId, Node>, id: NodeId) {
    let mut current = Some(id);
    while let Some(node_id) = current {
        let Some(node) = nodes.get_mut(node_id) else {
            break;
        };
        if node.flags.is_dirty {
            break;
        }
        node.flags.is_dirty = true;
        node.layout.computed_flex_basis = FloatOptional::UNDEFINED;
        if let Some(dirtied) = &node.dirtied {
            dirtied(node_id);
        }
        current = node.owner;
    }
}

/// Clone every child of `parent` not owned by it.
pub(crate) fn clone_children(nodes: &mut SlotMap<NodeId, Node>, config: &Config, parent: NodeId) {
    for index in 0..nodes[parent].children.len() {
        let child = nodes[parent].children[index];
        if nodes[child].owner != Some(parent) {
            let clone = clone_for_owner(nodes, config, child, parent, index);
            nodes[parent].children[index] = clone;
        }
    }
}

fn clone_for_owner(
    nodes: &mut SlotMap<NodeId, Node>,
    config: &Config,
    child: NodeId,
    parent: NodeId,
    index: usize,
) -> NodeId {
    let source = &nodes[child];
    let mut copy = match config.clone_node_func() {
        Some(clone) => clone(source, parent, index),
        None => source.clone(),
    };
    copy.owner = Some(parent);
    let clone = nodes.insert(copy);
    log::trace!("cloned shared node {child:?} as {clone:?} for owner {parent:?}");
    clone
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexel_core::{Direction, FlexDirection, Length, Size, UNDEFINED};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn clean(tree: &mut LayoutTree, ids: &[NodeId]) {
        for id in ids {
            tree.nodes[*id].flags.is_dirty = false;
        }
    }

    // ========================================================================
    // Insert / remove
    // ========================================================================

    #[test]
    fn test_insert_child_sets_owner_and_order() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        let b = tree.new_node();
        tree.insert_child(root, a, 0).unwrap();
        tree.insert_child(root, b, 0).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[b, a]);
        assert_eq!(tree.owner(a).unwrap(), Some(root));
    }

    #[test]
    fn test_insert_out_of_bounds_does_not_mutate() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        let err = tree.insert_child(root, a, 1).unwrap_err();
        assert_eq!(err, TreeError::IndexOutOfBounds { index: 1, len: 0 });
        assert_eq!(tree.child_count(root).unwrap(), 0);
        assert_eq!(tree.owner(a).unwrap(), None);
    }

    #[test]
    fn test_insert_owned_child_elsewhere_fails() {
        let mut tree = LayoutTree::new();
        let p1 = tree.new_node();
        let p2 = tree.new_node();
        let c = tree.new_node();
        tree.insert_child(p1, c, 0).unwrap();
        let err = tree.insert_child(p2, c, 0).unwrap_err();
        assert_eq!(err, TreeError::ChildHasOwner { child: c, owner: p1 });
    }

    #[test]
    fn test_insert_rejects_cycles_and_measured_parents() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        tree.insert_child(root, child, 0).unwrap();
        assert!(matches!(
            tree.insert_shared_child(child, root, 0),
            Err(TreeError::Cycle { .. })
        ));

        let leaf = tree.new_leaf_with_measure(Style::new(), MeasureFunc::new(|_, _, _, _| Size::ZERO));
        let other = tree.new_node();
        assert_eq!(
            tree.insert_child(leaf, other, 0),
            Err(TreeError::ParentHasMeasureFunc(leaf))
        );
    }

    #[test]
    fn test_remove_child_absent_is_noop() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let stray = tree.new_node();
        clean(&mut tree, &[root]);
        assert_eq!(tree.remove_child(root, stray), Ok(false));
        assert!(!tree.is_dirty(root).unwrap());
    }

    #[test]
    fn test_remove_child_clears_owner_and_dirties() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        let b = tree.new_node();
        tree.set_children(root, &[a, b]).unwrap();
        clean(&mut tree, &[root, a, b]);
        assert_eq!(tree.remove_child(root, a), Ok(true));
        assert_eq!(tree.children(root).unwrap(), &[b]);
        assert_eq!(tree.owner(a).unwrap(), None);
        assert!(tree.is_dirty(root).unwrap());
    }

    #[test]
    fn test_remove_child_at_bounds() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        tree.insert_child(root, a, 0).unwrap();
        assert!(tree.remove_child_at(root, 3).is_err());
        assert_eq!(tree.remove_child_at(root, 0), Ok(a));
    }

    #[test]
    fn test_replace_child_keeps_position() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let ids: Vec<NodeId> = (0..3).map(|_| tree.new_node()).collect();
        tree.set_children(root, &ids).unwrap();
        let fresh = tree.new_node();
        tree.replace_child(root, ids[1], fresh).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[ids[0], fresh, ids[2]]);
        assert_eq!(tree.owner(ids[1]).unwrap(), None);
        assert_eq!(tree.owner(fresh).unwrap(), Some(root));

        let another = tree.new_node();
        let err = tree.replace_child(root, ids[1], another).unwrap_err();
        assert!(matches!(err, TreeError::NotAChild { .. }));
    }

    #[test]
    fn test_clear_children() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        tree.insert_child(root, a, 0).unwrap();
        tree.clear_children(root).unwrap();
        assert_eq!(tree.child_count(root).unwrap(), 0);
        assert_eq!(tree.owner(a).unwrap(), None);
    }

    #[test]
    fn test_set_children_releases_dropped_children() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        let b = tree.new_node();
        tree.set_children(root, &[a]).unwrap();
        tree.set_children(root, &[b]).unwrap();
        assert_eq!(tree.owner(a).unwrap(), None);
        assert_eq!(tree.owner(b).unwrap(), Some(root));
    }

    #[test]
    fn test_remove_scrubs_all_references() {
        let mut tree = LayoutTree::new();
        let p1 = tree.new_node();
        let p2 = tree.new_node();
        let c = tree.new_node();
        let grandchild = tree.new_node();
        tree.insert_child(p1, c, 0).unwrap();
        tree.insert_shared_child(p2, c, 0).unwrap();
        tree.insert_child(c, grandchild, 0).unwrap();
        tree.remove(c).unwrap();
        assert!(!tree.contains(c));
        assert_eq!(tree.child_count(p1).unwrap(), 0);
        assert_eq!(tree.child_count(p2).unwrap(), 0);
        assert_eq!(tree.owner(grandchild).unwrap(), None);
    }

    #[test]
    fn test_remove_recursive_frees_owned_subtree() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        let b = tree.new_node();
        let shared = tree.new_node();
        tree.insert_child(root, a, 0).unwrap();
        tree.insert_child(a, b, 0).unwrap();
        tree.insert_shared_child(a, shared, 1).unwrap();
        tree.remove_recursive(root).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.contains(shared));
    }

    #[test]
    fn test_reset_requires_detached_node() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let a = tree.new_node();
        tree.insert_child(root, a, 0).unwrap();
        assert_eq!(tree.reset(root), Err(TreeError::ResetAttached(root)));
        tree.remove_child(root, a).unwrap();
        tree.set_style_property(root, "width", "10").unwrap();
        tree.reset(root).unwrap();
        assert_eq!(tree.style(root).unwrap().width(), Length::Auto);
    }

    // ========================================================================
    // Dirty propagation
    // ========================================================================

    #[test]
    fn test_style_change_dirties_ancestors_only() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let mid = tree.new_node();
        let leaf = tree.new_node();
        let sibling = tree.new_node();
        tree.insert_child(root, mid, 0).unwrap();
        tree.insert_child(mid, leaf, 0).unwrap();
        tree.insert_child(root, sibling, 1).unwrap();
        clean(&mut tree, &[root, mid, leaf, sibling]);

        tree.update_style(leaf, |s| s.set_width(Length::Point(5.0))).unwrap();
        assert!(tree.is_dirty(leaf).unwrap());
        assert!(tree.is_dirty(mid).unwrap());
        assert!(tree.is_dirty(root).unwrap());
        assert!(!tree.is_dirty(sibling).unwrap());
    }

    #[test]
    fn test_unchanged_style_does_not_dirty() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        clean(&mut tree, &[node]);
        let style = *tree.style(node).unwrap();
        assert_eq!(tree.set_style(node, style), Ok(false));
        assert!(!tree.is_dirty(node).unwrap());
    }

    #[test]
    fn test_dirtied_callback_fires_on_transition() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        tree.set_dirtied_func(node, Some(Arc::new(move |_: NodeId| {
            counter.fetch_add(1, Ordering::SeqCst);
        })))
        .unwrap();
        clean(&mut tree, &[node]);
        tree.set_style_property(node, "height", "3").unwrap();
        tree.set_style_property(node, "height", "4").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mark_dirty_requires_measure() {
        let mut tree = LayoutTree::new();
        let plain = tree.new_node();
        assert_eq!(tree.mark_dirty(plain), Err(TreeError::MarkDirtyWithoutMeasure(plain)));
        let leaf = tree.new_leaf_with_measure(Style::new(), MeasureFunc::new(|_, _, _, _| Size::ZERO));
        clean(&mut tree, &[leaf]);
        tree.mark_dirty(leaf).unwrap();
        assert!(tree.is_dirty(leaf).unwrap());
    }

    #[test]
    fn test_set_style_property_error_keeps_style() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        tree.set_style_property(node, "flex-direction", "row").unwrap();
        assert!(tree.set_style_property(node, "flex-direction", "diagonal").is_err());
        assert_eq!(
            tree.style(node).unwrap().flex_direction(),
            flexel_core::FlexDirection::Row
        );
    }

    #[test]
    fn test_measure_func_and_children_are_exclusive() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        tree.insert_child(root, child, 0).unwrap();
        let measure = MeasureFunc::new(|_, _, _, _| Size::ZERO);
        assert_eq!(
            tree.set_measure_func(root, Some(measure.clone())),
            Err(TreeError::MeasureFuncWithChildren(root))
        );
        tree.set_measure_func(child, Some(measure)).unwrap();
        assert_eq!(tree.node(child).unwrap().flags().node_type, NodeType::Text);
        tree.set_measure_func(child, None).unwrap();
        assert_eq!(tree.node(child).unwrap().flags().node_type, NodeType::Default);
    }

    // ========================================================================
    // Copy-on-write
    // ========================================================================

    #[test]
    fn test_nan_length_style_is_stable_across_set_style() {
        let mut tree = LayoutTree::new();
        let mut style = Style::new();
        style.set_width(Length::Point(f32::NAN));
        style.set_height(Length::Point(10.0));
        let node = tree.new_node_with_style(style);
        tree.calculate_layout(node, 40.0, UNDEFINED, Direction::Ltr).unwrap();
        assert!(!tree.is_dirty(node).unwrap());

        let current = *tree.style(node).unwrap();
        assert_eq!(tree.set_style(node, current), Ok(false));
        assert!(!tree.is_dirty(node).unwrap());
    }

    #[test]
    fn test_shared_writes_stay_out_of_laid_out_owners() {
        let mut tree = LayoutTree::new();
        let mut row = Style::new();
        row.set_flex_direction(FlexDirection::Row);
        row.set_height(Length::Point(10.0));
        let owner = tree.new_node_with_style(row);
        let mut fixed = Style::new();
        fixed.set_width(Length::Point(10.0));
        let shared = tree.new_node_with_style(fixed);
        tree.insert_shared_child(owner, shared, 0).unwrap();
        tree.calculate_layout(owner, UNDEFINED, UNDEFINED, Direction::Ltr).unwrap();
        let seen = tree.child(owner, 0).unwrap();
        assert_ne!(seen, shared);

        tree.update_style(shared, |s| s.set_width(Length::Point(30.0))).unwrap();
        assert!(tree.is_dirty(shared).unwrap());
        assert!(!tree.is_dirty(owner).unwrap());
        assert_eq!(tree.layout(seen).unwrap().width(), 10.0);
    }

    #[test]
    fn test_child_for_write_clones_shared_child() {
        let mut tree = LayoutTree::new();
        let p1 = tree.new_node();
        let p2 = tree.new_node();
        let c = tree.new_node();
        tree.insert_child(p1, c, 0).unwrap();
        tree.insert_shared_child(p2, c, 0).unwrap();

        let writable = tree.child_for_write(p2, 0).unwrap();
        assert_ne!(writable, c);
        assert_eq!(tree.owner(writable).unwrap(), Some(p2));
        assert_eq!(tree.child(p1, 0).unwrap(), c);
        assert_eq!(tree.child_for_write(p2, 0).unwrap(), writable);
    }

    #[test]
    fn test_clone_policy_is_used() {
        let mut tree = LayoutTree::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        tree.update_config(|config| {
            config.set_clone_node_func(Some(Arc::new(move |node: &Node, _: NodeId, _: usize| {
                counter.fetch_add(1, Ordering::SeqCst);
                node.clone()
            })));
        });
        let p = tree.new_node();
        let shared = tree.new_node();
        tree.insert_shared_child(p, shared, 0).unwrap();
        tree.clone_children_if_needed(p).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_ne!(tree.child(p, 0).unwrap(), shared);
    }

    #[test]
    fn test_clone_node_is_shallow_and_ownerless() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        tree.insert_child(root, child, 0).unwrap();
        tree.set_style_property(root, "width", "7").unwrap();
        let copy = tree.clone_node(root).unwrap();
        assert_eq!(tree.children(copy).unwrap(), &[child]);
        assert_eq!(tree.owner(child).unwrap(), Some(root));
        assert_eq!(tree.style(copy).unwrap().width(), Length::Point(7.0));
    }

    #[test]
    fn test_config_updates_bump_generation() {
        let mut tree = LayoutTree::new();
        let before = tree.config_generation();
        tree.update_config(|c| c.use_web_defaults = true);
        tree.set_config(Config::default());
        assert_eq!(tree.config_generation(), before + 2);
    }

    #[test]
    fn test_web_defaults_apply_at_creation() {
        let mut tree = LayoutTree::with_config(Config::new().with_web_defaults(true));
        let node = tree.new_node();
        assert_eq!(
            tree.style(node).unwrap().flex_direction(),
            flexel_core::FlexDirection::Row
        );
    }

    #[test]
    fn test_missing_node_errors() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        tree.remove(node).unwrap();
        assert_eq!(tree.layout(node).unwrap_err(), TreeError::NodeNotFound(node));
    }
}
