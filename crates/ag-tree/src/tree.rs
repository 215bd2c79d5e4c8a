//! `ModelTree`: arena-backed composition tree.
//!
//! # Design
//!
//! Nodes live in a `Vec<Option<ModelNode>>` indexed by [`ModelId`].  Parent
//! and child links are plain ids, so traversal needs no shared ownership and
//! no interior mutability.  Slots of detached nodes are tombstoned and never
//! reused: a stale `ModelId` resolves to `None` rather than to a stranger.
//!
//! The single structural invariant, "a node's type accepts its parent's
//! type", is checked on every attach before anything is linked.  A failed
//! attach leaves the tree unchanged.

use std::collections::HashMap;

use ag_core::ModelId;

use crate::{
    InvalidParentError, ModelNode, ModelType, PropertyValue, TreeError, TreeResult,
};

// ── ModelSubtree ──────────────────────────────────────────────────────────────

/// An owned, detached run of nodes in pre-order.
///
/// Produced by [`ModelTree::detach`] or from a document; consumed by
/// [`ModelTree::attach`].  Dropping it destroys the nodes.
#[derive(Clone, Debug, Default)]
pub struct ModelSubtree {
    /// `(index of parent within this subtree, node)`; only entry 0 has `None`.
    pub(crate) nodes: Vec<(Option<usize>, ModelNode)>,
}

impl ModelSubtree {
    /// A subtree holding one node.
    pub fn single(node: ModelNode) -> Self {
        Self { nodes: vec![(None, node.unlinked())] }
    }

    /// Append `node` under the subtree entry at `parent` and return its index.
    ///
    /// Placement is not checked until the subtree is attached.
    pub fn push(&mut self, parent: usize, node: ModelNode) -> usize {
        self.nodes.push((Some(parent), node.unlinked()));
        self.nodes.len() - 1
    }

    pub fn root(&self) -> Option<&ModelNode> {
        self.nodes.first().map(|(_, n)| n)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelNode> + '_ {
        self.nodes.iter().map(|(_, n)| n)
    }

    /// Dotted path of entry `i` relative to the subtree root.
    fn relative_path(&self, mut i: usize) -> String {
        let mut names = Vec::new();
        loop {
            let (parent, node) = &self.nodes[i];
            names.push(node.name.as_str());
            match parent {
                Some(p) => i = *p,
                None => break,
            }
        }
        names.reverse();
        names.join(".")
    }
}

// ── Descendants ───────────────────────────────────────────────────────────────

/// Lazy pre-order iterator over the descendants of one node.
///
/// Each call to [`ModelTree::find_all_children`] builds a fresh iterator;
/// there is no cursor shared between traversals.
pub struct Descendants<'a> {
    tree:  &'a ModelTree,
    stack: Vec<ModelId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (ModelId, &'a ModelNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.tree.get(id) {
                self.stack.extend(node.children.iter().rev());
                return Some((id, node));
            }
        }
        None
    }
}

// ── Validation report ─────────────────────────────────────────────────────────

/// One outstanding warning-severity constraint violation.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationWarning {
    pub path:     String,
    pub property: String,
    pub message:  String,
}

// ── ModelTree ─────────────────────────────────────────────────────────────────

/// A rooted tree of [`ModelNode`]s.
#[derive(Clone, Debug)]
pub struct ModelTree {
    slots: Vec<Option<ModelNode>>,
    root:  ModelId,
    live:  usize,
}

impl ModelTree {
    /// A tree consisting of `root` alone.  The root has no parent, so its
    /// accepted-parent set is not consulted.
    pub fn new(root: ModelNode) -> Self {
        Self { slots: vec![Some(root.unlinked())], root: ModelId::ROOT, live: 1 }
    }

    #[inline]
    pub fn root(&self) -> ModelId {
        self.root
    }

    /// Number of attached nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[inline]
    pub fn get(&self, id: ModelId) -> Option<&ModelNode> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: ModelId) -> bool {
        self.get(id).is_some()
    }

    pub fn node(&self, id: ModelId) -> TreeResult<&ModelNode> {
        self.get(id).ok_or(TreeError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: ModelId) -> TreeResult<&mut ModelNode> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(TreeError::NodeNotFound(id))
    }

    // ── Structural edits ──────────────────────────────────────────────────

    /// Attach a single new node under `parent`.
    pub fn add_child(&mut self, parent: ModelId, node: ModelNode) -> TreeResult<ModelId> {
        self.check_placement(parent, &node)?;
        self.link(parent, node.unlinked())
    }

    /// Attach a whole subtree under `parent`.
    ///
    /// Every parent/child pair inside the subtree is re-validated, as is the
    /// subtree root against `parent`.  Nothing is linked unless all checks
    /// pass.
    pub fn attach(&mut self, parent: ModelId, subtree: ModelSubtree) -> TreeResult<ModelId> {
        let Some((_, root)) = subtree.nodes.first() else {
            return Err(TreeError::Document("cannot attach an empty subtree".into()));
        };
        self.check_placement(parent, root)?;

        let base = self.path(parent);
        for (i, (parent_index, node)) in subtree.nodes.iter().enumerate().skip(1) {
            let Some(p) = *parent_index else {
                return Err(TreeError::Document(format!("subtree has a second root `{}`", node.name)));
            };
            if p >= i {
                return Err(TreeError::Document(format!("subtree entry `{}` precedes its parent", node.name)));
            }
            check_name(&node.name, || format!("{base}.{}", subtree.relative_path(p)))?;
            let parent_node = &subtree.nodes[p].1;
            if !node.model_type.accepts_parent(parent_node.model_type) {
                return Err(invalid_parent(node, parent_node, format!("{base}.{}", subtree.relative_path(p))).into());
            }
            let clash = subtree.nodes[..i]
                .iter()
                .any(|(pp, other)| *pp == Some(p) && other.name == node.name);
            if clash {
                return Err(TreeError::DuplicateName {
                    parent_path: format!("{base}.{}", subtree.relative_path(p)),
                    name:        node.name.clone(),
                });
            }
        }

        let needed = subtree.nodes.len();
        if ModelId::from_index(self.slots.len() + needed - 1).is_none() {
            return Err(TreeError::ArenaFull { needed });
        }
        let mut ids: Vec<ModelId> = Vec::with_capacity(needed);
        for (parent_index, node) in subtree.nodes {
            let p = parent_index.map_or(parent, |i| ids[i]);
            ids.push(self.link(p, node)?);
        }
        Ok(ids[0])
    }

    /// Unlink `id` and its whole subtree, returning them as an owned
    /// [`ModelSubtree`] that can be re-attached elsewhere or dropped.
    pub fn detach(&mut self, id: ModelId) -> TreeResult<ModelSubtree> {
        if id == self.root {
            return Err(TreeError::DetachRoot);
        }
        let parent = self.node(id)?.parent.ok_or(TreeError::DetachRoot)?;

        let order: Vec<ModelId> = std::iter::once(id)
            .chain(self.find_all_children(id).map(|(child, _)| child))
            .collect();
        let position: HashMap<ModelId, usize> =
            order.iter().enumerate().map(|(i, &m)| (m, i)).collect();

        let mut subtree = ModelSubtree::default();
        for &m in &order {
            if let Some(node) = self.slots[m.index()].take() {
                let parent_index = if m == id { None } else { node.parent.and_then(|p| position.get(&p).copied()) };
                subtree.nodes.push((parent_index, node.unlinked()));
            }
        }
        self.live -= subtree.nodes.len();
        self.node_mut(parent)?.children.retain(|&c| c != id);

        tracing::debug!(path = %self.path(parent), detached = subtree.nodes.len(), "detached subtree");
        Ok(subtree)
    }

    /// Detach and drop `id` with all its descendants.
    pub fn remove(&mut self, id: ModelId) -> TreeResult<()> {
        self.detach(id).map(drop)
    }

    /// Validate and assign one property of a node.
    pub fn set_property(
        &mut self,
        id:       ModelId,
        property: &str,
        value:    impl Into<PropertyValue>,
    ) -> TreeResult<()> {
        let outcome = {
            let node = self.node_mut(id)?;
            node.property(property).is_some().then(|| node.set(property, value))
        };
        match outcome {
            Some(Ok(())) => Ok(()),
            Some(Err(source)) => Err(TreeError::Validation { path: self.path(id), source }),
            None => Err(TreeError::UnknownProperty { path: self.path(id), property: property.to_string() }),
        }
    }

    pub fn set_enabled(&mut self, id: ModelId, enabled: bool) -> TreeResult<()> {
        self.node_mut(id)?.enabled = enabled;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Lazy pre-order traversal of every descendant of `id` (not `id`
    /// itself).  An unknown id yields an empty sequence.
    pub fn find_all_children(&self, id: ModelId) -> Descendants<'_> {
        let stack = self
            .get(id)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        Descendants { tree: self, stack }
    }

    /// Descendants of `id` of type `model_type`, in pre-order.
    pub fn find_all_children_of_type(
        &self,
        id:         ModelId,
        model_type: ModelType,
    ) -> impl Iterator<Item = (ModelId, &ModelNode)> + '_ {
        self.find_all_children(id).filter(move |(_, n)| n.model_type == model_type)
    }

    /// Direct children of `id` of type `model_type`, in insertion order.
    pub fn children_of_type(
        &self,
        id:         ModelId,
        model_type: ModelType,
    ) -> impl Iterator<Item = (ModelId, &ModelNode)> + '_ {
        self.get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&c| self.get(c).map(|n| (c, n)))
            .filter(move |(_, n)| n.model_type == model_type)
    }

    /// Either of the two queries above, selected at run time.
    pub fn find_children(
        &self,
        id:         ModelId,
        model_type: ModelType,
        recursive:  bool,
    ) -> Box<dyn Iterator<Item = (ModelId, &ModelNode)> + '_> {
        if recursive {
            Box::new(self.find_all_children_of_type(id, model_type))
        } else {
            Box::new(self.children_of_type(id, model_type))
        }
    }

    /// Every attached node in pre-order, root first.
    pub fn iter(&self) -> impl Iterator<Item = (ModelId, &ModelNode)> + '_ {
        self.get(self.root)
            .map(|n| (self.root, n))
            .into_iter()
            .chain(self.find_all_children(self.root))
    }

    /// Nearest ancestor of `id` (excluding `id`) with the given type.
    pub fn ancestor_of_type(&self, id: ModelId, model_type: ModelType) -> Option<ModelId> {
        let mut current = self.get(id)?.parent;
        while let Some(p) = current {
            let node = self.get(p)?;
            if node.model_type == model_type {
                return Some(p);
            }
            current = node.parent;
        }
        None
    }

    /// `false` if `id` or any ancestor is disabled, or `id` is not attached.
    pub fn is_effectively_enabled(&self, id: ModelId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            match self.get(c) {
                Some(node) if node.enabled => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Dotted full path, e.g. `.Simulations.Sim.Paddock`.
    pub fn path(&self, id: ModelId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            match self.get(c) {
                Some(node) => {
                    names.push(node.name.as_str());
                    current = node.parent;
                }
                None => break,
            }
        }
        names.reverse();
        format!(".{}", names.join("."))
    }

    /// Resolve a dotted path produced by [`path`](Self::path).
    pub fn find_by_path(&self, path: &str) -> Option<ModelId> {
        let mut parts = path.split('.').filter(|s| !s.is_empty());
        let root = self.get(self.root)?;
        if parts.next()? != root.name {
            return None;
        }
        parts.try_fold(self.root, |id, name| {
            self.get(id)?
                .children
                .iter()
                .copied()
                .find(|&c| self.get(c).is_some_and(|n| n.name == name))
        })
    }

    /// Every outstanding warning in the tree, in pre-order.
    ///
    /// Error-severity problems cannot exist in a tree: they are rejected at
    /// assignment and attach time.
    pub fn validate(&self) -> Vec<ValidationWarning> {
        self.iter()
            .flat_map(|(id, node)| {
                node.warnings().into_iter().map(move |(property, message)| ValidationWarning {
                    path: self.path(id),
                    property,
                    message,
                })
            })
            .collect()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn check_placement(&self, parent: ModelId, node: &ModelNode) -> TreeResult<()> {
        let parent_node = self.node(parent)?;
        check_name(&node.name, || self.path(parent))?;
        if !node.model_type.accepts_parent(parent_node.model_type) {
            let err = invalid_parent(node, parent_node, self.path(parent));
            tracing::debug!("{err}");
            return Err(err.into());
        }
        let clash = parent_node
            .children
            .iter()
            .any(|&c| self.get(c).is_some_and(|n| n.name == node.name));
        if clash {
            return Err(TreeError::DuplicateName { parent_path: self.path(parent), name: node.name.clone() });
        }
        Ok(())
    }

    /// Link a validated, unlinked node.  Callers have run `check_placement`.
    fn link(&mut self, parent: ModelId, mut node: ModelNode) -> TreeResult<ModelId> {
        let id = ModelId::from_index(self.slots.len()).ok_or(TreeError::ArenaFull { needed: 1 })?;
        node.parent = Some(parent);
        node.children.clear();
        self.slots.push(Some(node));
        if let Some(Some(p)) = self.slots.get_mut(parent.index()) {
            p.children.push(id);
        }
        self.live += 1;
        Ok(id)
    }
}

/// Names are path segments: non-empty, no separator, no surrounding space.
fn check_name(name: &str, parent_path: impl FnOnce() -> String) -> TreeResult<()> {
    let reason = if name.trim().is_empty() {
        "empty"
    } else if name.contains('.') {
        "contains '.'"
    } else if name.trim() != name {
        "leading or trailing whitespace"
    } else {
        return Ok(());
    };
    Err(TreeError::InvalidName { parent_path: parent_path(), name: name.to_string(), reason })
}

fn invalid_parent(node: &ModelNode, parent: &ModelNode, parent_path: String) -> InvalidParentError {
    InvalidParentError {
        child_type: node.model_type,
        child_name: node.name.clone(),
        parent_type: parent.model_type,
        parent_path,
        accepted: node
            .model_type
            .valid_parents()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    }
}
