// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A persistent tree of drawing layers.
//!
//! [`LayerTree`] is the opaque rendering surface the cartesian code draws into. Nodes live in a
//! generational arena: a [`LayerId`] stays valid for as long as its node exists, and a removed
//! node's id never resolves again, even after its slot is reused.
//!
//! Every structural or attribute change records a [`LayerDiff`]. A backend drains the diffs
//! with [`LayerTree::take_diffs`] and mirrors them, the same way mark diffs are consumed.
//!
//! Keyed children are reconciled in two steps: [`LayerTree::join`] computes a [`JoinPlan`]
//! (which keys need a node, which nodes survive, which go away), and [`LayerTree::apply`]
//! executes it.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{BezPath, Rect, Vec2};
use peniko::Color;
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Stable handle to a node of a [`LayerTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId {
    index: u32,
    generation: u32,
}

/// What a node draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// A container.
    Group,
    /// A filled rectangle (`attrs.rect`).
    Rect,
    /// A stroked or filled path (`attrs.path`).
    Path,
    /// A clip path definition (`attrs.dom_id` names it, `attrs.rect` bounds it).
    ClipPath,
    /// A text run (`attrs.text`).
    Text,
}

/// Drawing attributes of a node. Unset fields inherit from the parent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerAttrs {
    /// Document-wide id, used for clip paths.
    pub dom_id: Option<String>,
    /// Rectangle geometry.
    pub rect: Option<Rect>,
    /// Path geometry.
    pub path: Option<BezPath>,
    /// Fill color.
    pub fill: Option<Color>,
    /// Stroke color.
    pub stroke: Option<Color>,
    /// Stroke width.
    pub stroke_width: Option<f64>,
    /// Translation applied to the node and its children.
    pub translate: Option<Vec2>,
    /// Id of the clip path applied to the node.
    pub clip_path: Option<String>,
    /// Text content.
    pub text: Option<String>,
    /// Text anchor (`start`, `middle`, `end`).
    pub text_anchor: Option<&'static str>,
    /// Whether the node is hidden.
    pub hidden: bool,
}

/// One node of the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerNode {
    /// Class names; the first one is the primary class.
    pub classes: SmallVec<[String; 2]>,
    /// What the node draws.
    pub kind: LayerKind,
    /// Parent node, `None` for the root.
    pub parent: Option<LayerId>,
    /// Children in paint order.
    pub children: Vec<LayerId>,
    /// Join key, for nodes created by [`LayerTree::apply`].
    pub key: Option<String>,
    /// Drawing attributes.
    pub attrs: LayerAttrs,
}

impl LayerNode {
    /// The primary class.
    pub fn class(&self) -> &str {
        self.classes.first().map(String::as_str).unwrap_or("")
    }

    /// Whether the node carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A change to the tree.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerDiff {
    /// A node was created.
    Enter {
        /// The new node.
        id: LayerId,
        /// Its kind.
        kind: LayerKind,
        /// Its parent.
        parent: Option<LayerId>,
    },
    /// A node's attributes or child order changed.
    Update {
        /// The changed node.
        id: LayerId,
        /// Its kind.
        kind: LayerKind,
    },
    /// A node was removed, together with its subtree.
    Exit {
        /// The removed node.
        id: LayerId,
        /// Its kind.
        kind: LayerKind,
    },
}

/// The result of [`LayerTree::join`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinPlan {
    /// Keys without a node.
    pub create: Vec<String>,
    /// Keys whose node survives, with that node.
    pub update: Vec<(String, LayerId)>,
    /// Nodes whose key is gone.
    pub destroy: Vec<LayerId>,
    /// Every key, in data order.
    pub keys: Vec<String>,
}

impl JoinPlan {
    /// Whether applying the plan would change the tree structure.
    pub fn is_noop(&self) -> bool {
        self.create.is_empty() && self.destroy.is_empty()
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<LayerNode>,
}

/// Generational arena of [`LayerNode`]s with a single root.
#[derive(Clone, Debug)]
pub struct LayerTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: LayerId,
    diffs: Vec<LayerDiff>,
}

impl Default for LayerTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerTree {
    /// Creates a tree holding only an empty root group.
    pub fn new() -> Self {
        let root_node = LayerNode {
            classes: SmallVec::from_iter([String::from("root")]),
            kind: LayerKind::Group,
            parent: None,
            children: Vec::new(),
            key: None,
            attrs: LayerAttrs::default(),
        };
        Self {
            slots: alloc::vec![Slot {
                generation: 0,
                node: Some(root_node),
            }],
            free: Vec::new(),
            root: LayerId {
                index: 0,
                generation: 0,
            },
            diffs: Vec::new(),
        }
    }

    /// The root group.
    pub fn root(&self) -> LayerId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// Whether only the root is left.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: LayerId) -> bool {
        self.get(id).is_some()
    }

    /// Looks up a live node.
    pub fn get(&self, id: LayerId) -> Option<&LayerNode> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node(&self, id: LayerId) -> Result<&LayerNode> {
        self.get(id).ok_or(Error::StaleLayer(id))
    }

    fn node_mut(&mut self, id: LayerId) -> Result<&mut LayerNode> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .ok_or(Error::StaleLayer(id))?;
        slot.node.as_mut().ok_or(Error::StaleLayer(id))
    }

    /// Children of `parent` in paint order; empty for stale ids.
    pub fn children(&self, parent: LayerId) -> &[LayerId] {
        self.get(parent).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The first child of `parent` carrying `class`.
    pub fn child(&self, parent: LayerId, class: &str) -> Option<LayerId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.has_class(class)))
    }

    /// Every child of `parent` carrying `class`, in paint order.
    pub fn children_with_class(&self, parent: LayerId, class: &str) -> Vec<LayerId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(|n| n.has_class(class)))
            .collect()
    }

    /// The child of `parent` whose `dom_id` is `dom_id`.
    pub fn child_by_dom_id(&self, parent: LayerId, dom_id: &str) -> Option<LayerId> {
        self.children(parent).iter().copied().find(|&c| {
            self.get(c)
                .is_some_and(|n| n.attrs.dom_id.as_deref() == Some(dom_id))
        })
    }

    /// `id` followed by all of its descendants, depth first in paint order.
    pub fn descendants(&self, id: LayerId) -> Vec<LayerId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.get(next) else { continue };
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Counts nodes carrying `class` in the subtree rooted at `id`.
    pub fn count_class(&self, id: LayerId, class: &str) -> usize {
        self.descendants(id)
            .into_iter()
            .filter(|&d| self.get(d).is_some_and(|n| n.has_class(class)))
            .count()
    }

    /// Appends a new node as the last child of `parent`.
    ///
    /// `class` may hold several space-separated class names.
    pub fn append(&mut self, parent: LayerId, kind: LayerKind, class: &str) -> Result<LayerId> {
        let len = self.node(parent)?.children.len();
        self.insert_at(parent, len, kind, class)
    }

    /// Inserts a new node as the first child of `parent`.
    pub fn insert_first(
        &mut self,
        parent: LayerId,
        kind: LayerKind,
        class: &str,
    ) -> Result<LayerId> {
        self.insert_at(parent, 0, kind, class)
    }

    /// Returns the first child of `parent` with `class`, appending one if there is none.
    pub fn ensure_single(
        &mut self,
        parent: LayerId,
        kind: LayerKind,
        class: &str,
    ) -> Result<LayerId> {
        let primary = class.split_whitespace().next().unwrap_or(class);
        match self.child(parent, primary) {
            Some(id) => Ok(id),
            None => self.append(parent, kind, class),
        }
    }

    /// Like [`LayerTree::ensure_single`], but a new node goes first.
    pub fn ensure_first(
        &mut self,
        parent: LayerId,
        kind: LayerKind,
        class: &str,
    ) -> Result<LayerId> {
        let primary = class.split_whitespace().next().unwrap_or(class);
        match self.child(parent, primary) {
            Some(id) => Ok(id),
            None => self.insert_first(parent, kind, class),
        }
    }

    fn insert_at(
        &mut self,
        parent: LayerId,
        position: usize,
        kind: LayerKind,
        class: &str,
    ) -> Result<LayerId> {
        self.node(parent)?;
        let node = LayerNode {
            classes: class.split_whitespace().map(String::from).collect(),
            kind,
            parent: Some(parent),
            children: Vec::new(),
            key: None,
            attrs: LayerAttrs::default(),
        };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                LayerId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                LayerId {
                    index,
                    generation: 0,
                }
            }
        };
        let siblings = &mut self.node_mut(parent)?.children;
        siblings.insert(position.min(siblings.len()), id);
        self.diffs.push(LayerDiff::Enter {
            id,
            kind,
            parent: Some(parent),
        });
        Ok(id)
    }

    /// Removes a node and its whole subtree. Removing a stale id does nothing.
    ///
    /// The root cannot be removed; removing it clears its children instead.
    pub fn remove(&mut self, id: LayerId) {
        if id == self.root {
            for child in self.children(id).to_vec() {
                self.remove(child);
            }
            return;
        }
        let Some(parent) = self.get(id).map(|n| n.parent) else {
            return;
        };
        if let Some(parent) = parent
            && let Ok(p) = self.node_mut(parent)
        {
            p.children.retain(|&c| c != id);
        }
        for victim in self.descendants(id).into_iter().rev() {
            let slot = &mut self.slots[victim.index as usize];
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(victim.index);
                self.diffs.push(LayerDiff::Exit {
                    id: victim,
                    kind: node.kind,
                });
            }
        }
    }

    /// Removes every child of `parent` carrying `class`.
    pub fn remove_class(&mut self, parent: LayerId, class: &str) {
        for id in self.children_with_class(parent, class) {
            self.remove(id);
        }
    }

    /// Edits a node's attributes, recording an update only when something changed.
    ///
    /// Returns whether the attributes changed.
    pub fn update(&mut self, id: LayerId, f: impl FnOnce(&mut LayerAttrs)) -> Result<bool> {
        let node = self.node_mut(id)?;
        let mut attrs = node.attrs.clone();
        f(&mut attrs);
        if attrs == node.attrs {
            return Ok(false);
        }
        node.attrs = attrs;
        let kind = node.kind;
        self.diffs.push(LayerDiff::Update { id, kind });
        Ok(true)
    }

    /// Read access to a node's attributes.
    pub fn attrs(&self, id: LayerId) -> Result<&LayerAttrs> {
        Ok(&self.node(id)?.attrs)
    }

    /// Adds `class` to a node if it is missing.
    pub fn add_class(&mut self, id: LayerId, class: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        if !node.has_class(class) {
            node.classes.push(String::from(class));
            let kind = node.kind;
            self.diffs.push(LayerDiff::Update { id, kind });
        }
        Ok(())
    }

    /// Matches the keyed children of `parent` carrying `class` against `keys`.
    ///
    /// Duplicate keys after the first are ignored.
    pub fn join<K: AsRef<str>>(
        &self,
        parent: LayerId,
        class: &str,
        keys: &[K],
    ) -> Result<JoinPlan> {
        self.node(parent)?;
        let mut existing: HashMap<&str, LayerId> = HashMap::new();
        let mut plan = JoinPlan::default();
        for id in self.children_with_class(parent, class) {
            let key = self.get(id).and_then(|n| n.key.as_deref());
            match key {
                Some(key) if !existing.contains_key(key) => {
                    existing.insert(key, id);
                }
                _ => plan.destroy.push(id),
            }
        }

        for key in keys {
            let key = key.as_ref();
            if plan.keys.iter().any(|k| k == key) {
                continue;
            }
            plan.keys.push(String::from(key));
            match existing.remove(key) {
                Some(id) => plan.update.push((String::from(key), id)),
                None => plan.create.push(String::from(key)),
            }
        }
        let mut leftover: Vec<LayerId> = existing.into_values().collect();
        leftover.sort();
        plan.destroy.extend(leftover);
        Ok(plan)
    }

    /// Executes a [`JoinPlan`] computed for `parent`.
    ///
    /// Destroyed nodes are removed, new keys get a fresh node appended with `kind` and
    /// `class`. Returns every key with its node, in data order. Paint order is left alone;
    /// call [`LayerTree::order`] to sort it.
    pub fn apply(
        &mut self,
        parent: LayerId,
        kind: LayerKind,
        class: &str,
        plan: &JoinPlan,
    ) -> Result<Vec<(String, LayerId)>> {
        for &id in &plan.destroy {
            tracing::trace!(?id, "layer exit");
            self.remove(id);
        }
        let mut created: HashMap<&str, LayerId> = HashMap::new();
        for key in &plan.create {
            let id = self.append(parent, kind, class)?;
            self.node_mut(id)?.key = Some(key.clone());
            tracing::trace!(?id, key = key.as_str(), "layer enter");
            created.insert(key.as_str(), id);
        }
        let mut out = Vec::with_capacity(plan.keys.len());
        for key in &plan.keys {
            let id = created.get(key.as_str()).copied().or_else(|| {
                plan.update
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|&(_, id)| id)
            });
            if let Some(id) = id {
                out.push((key.clone(), id));
            }
        }
        Ok(out)
    }

    /// Reorders `ids` (all children of `parent`) to follow the given sequence.
    ///
    /// Only the slots those ids occupy are permuted; other children keep their position.
    pub fn order(&mut self, parent: LayerId, ids: &[LayerId]) -> Result<()> {
        let node = self.node_mut(parent)?;
        let mut positions: Vec<usize> = ids
            .iter()
            .filter_map(|id| node.children.iter().position(|c| c == id))
            .collect();
        positions.sort_unstable();
        let ids: Vec<LayerId> = ids
            .iter()
            .copied()
            .filter(|id| node.children.contains(id))
            .collect();
        let mut changed = false;
        for (&pos, &id) in positions.iter().zip(ids.iter()) {
            if node.children[pos] != id {
                node.children[pos] = id;
                changed = true;
            }
        }
        if changed {
            let kind = node.kind;
            self.diffs.push(LayerDiff::Update { id: parent, kind });
        }
        Ok(())
    }

    /// Recorded diffs since the last [`LayerTree::take_diffs`].
    pub fn diffs(&self) -> &[LayerDiff] {
        &self.diffs
    }

    /// Drains the recorded diffs.
    pub fn take_diffs(&mut self) -> Vec<LayerDiff> {
        core::mem::take(&mut self.diffs)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn removed_ids_never_resolve_again() {
        let mut tree = LayerTree::new();
        let root = tree.root();
        let a = tree.append(root, LayerKind::Group, "a").unwrap();
        let inner = tree.append(a, LayerKind::Rect, "bg").unwrap();
        tree.remove(a);
        assert!(!tree.contains(a) && !tree.contains(inner), "subtree is gone");

        let b = tree.append(root, LayerKind::Group, "b").unwrap();
        assert!(!tree.contains(a), "reused slot has a new generation");
        assert!(tree.contains(b));
        assert_eq!(tree.append(a, LayerKind::Group, "c"), Err(Error::StaleLayer(a)));
    }

    #[test]
    fn ensure_single_is_idempotent() {
        let mut tree = LayerTree::new();
        let root = tree.root();
        let first = tree.ensure_single(root, LayerKind::Group, "gridlayer").unwrap();
        let again = tree.ensure_single(root, LayerKind::Group, "gridlayer").unwrap();
        assert_eq!(first, again);
        assert_eq!(tree.children(root), [first]);

        let bg = tree.ensure_first(root, LayerKind::Rect, "bg").unwrap();
        assert_eq!(tree.children(root), [bg, first], "ensure_first inserts in front");
    }

    #[test]
    fn updates_are_recorded_only_on_change() {
        let mut tree = LayerTree::new();
        let root = tree.root();
        let rect = tree.append(root, LayerKind::Rect, "bg").unwrap();
        tree.take_diffs();

        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(tree.update(rect, |a| a.rect = Some(r)).unwrap());
        assert!(!tree.update(rect, |a| a.rect = Some(r)).unwrap(), "same value");
        assert_eq!(
            tree.take_diffs(),
            vec![LayerDiff::Update {
                id: rect,
                kind: LayerKind::Rect
            }]
        );
    }

    #[test]
    fn join_keeps_surviving_nodes_and_orders_by_data() {
        let mut tree = LayerTree::new();
        let root = tree.root();
        let plan = tree.join(root, "subplot", &["xy", "x2y2"]).unwrap();
        assert_eq!(plan.create, ["xy", "x2y2"]);
        let first = tree.apply(root, LayerKind::Group, "subplot", &plan).unwrap();
        let xy = first[0].1;
        let x2y2 = first[1].1;

        let plan = tree.join(root, "subplot", &["x3y3", "xy"]).unwrap();
        assert_eq!(plan.update, [(String::from("xy"), xy)]);
        assert_eq!(plan.destroy, [x2y2]);
        let second = tree.apply(root, LayerKind::Group, "subplot", &plan).unwrap();
        assert_eq!(second[1], (String::from("xy"), xy), "identity preserved");
        assert!(!tree.contains(x2y2));

        let ids: Vec<LayerId> = second.iter().map(|(_, id)| *id).collect();
        tree.order(root, &ids).unwrap();
        assert_eq!(tree.children(root), ids.as_slice(), "paint order follows data");
    }

    #[test]
    fn join_ignores_other_classes() {
        let mut tree = LayerTree::new();
        let root = tree.root();
        let other = tree.append(root, LayerKind::Group, "bglayer").unwrap();
        let plan = tree.join(root, "subplot", &["xy"]).unwrap();
        assert!(plan.destroy.is_empty());
        tree.apply(root, LayerKind::Group, "subplot", &plan).unwrap();
        assert!(tree.contains(other));
        assert_eq!(tree.count_class(root, "subplot"), 1);
    }

    #[test]
    fn multiple_classes_match_each_name() {
        let mut tree = LayerTree::new();
        let root = tree.root();
        let id = tree.append(root, LayerKind::Group, "subplot xy").unwrap();
        assert_eq!(tree.child(root, "xy"), Some(id));
        assert_eq!(tree.get(id).unwrap().class(), "subplot");
        tree.add_class(id, "overlay").unwrap();
        assert_eq!(tree.child(root, "overlay"), Some(id));
    }
}
