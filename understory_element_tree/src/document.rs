// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, traversal, focusability, focus state.

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Rect;
use smallvec::SmallVec;

use crate::types::{Element, ElementFlags, ElementId};

/// Root-to-element path; deep enough for typical UI nesting without spilling.
type Path = SmallVec<[ElementId; 16]>;

/// A headless element document.
///
/// Elements form an ordered forest: each element has at most one parent and an
/// ordered list of children, and top-level elements are ordered by insertion.
/// Document order is the pre-order depth-first walk of that forest.
///
/// The document also owns the focus state a platform would own: the active
/// element, the "focus visible" modality flag, and a count of attached global
/// listener sets.
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use understory_element_tree::{Document, Element, ElementKind};
///
/// let mut doc = Document::new();
/// let dialog = doc.insert(None, Element::region(Rect::new(0.0, 0.0, 200.0, 100.0)));
/// let ok = doc.insert(
///     Some(dialog),
///     Element::new(ElementKind::Button, Rect::new(10.0, 60.0, 90.0, 90.0)),
/// );
///
/// assert!(doc.focus(ok));
/// assert_eq!(doc.active_element(), Some(ok));
/// assert!(doc.contains(dialog, ok));
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    roots: Vec<ElementId>,
    active: Option<ElementId>,
    focus_visible: bool,
    listener_sets: u32,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("roots", &self.roots.len())
            .field("active", &self.active)
            .field("focus_visible", &self.focus_visible)
            .field("listener_sets", &self.listener_sets)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    element: Element,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        }
    }
}

impl Document {
    /// Create an empty document with nothing focused.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            active: None,
            focus_visible: false,
            listener_sets: 0,
        }
    }

    /// Insert a new element as the last child of `parent` (or as a new
    /// top-level element if `None`).
    pub fn insert(&mut self, parent: Option<ElementId>, element: Element) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ElementId::new(idx, generation);
        match parent {
            Some(p) => self.link_parent(id, p),
            None => self.roots.push(id),
        }
        id
    }

    /// Remove an element and its subtree.
    ///
    /// If the active element lives in the removed subtree, focus is dropped,
    /// as a platform does when the focused element is detached.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(active) = self.active
            && self.contains(id, active)
        {
            tracing::trace!(?active, "active element detached");
            self.active = None;
        }
        match self.node(id).parent {
            Some(parent) => self.unlink_parent(id, parent),
            None => self.roots.retain(|r| *r != id),
        }
        self.free_subtree(id);
    }

    /// Move `id` under `new_parent` (as its last child), or to the top level.
    ///
    /// Moving an element into its own subtree is ignored.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.contains(id, p))
        {
            return;
        }
        match self.node(id).parent {
            Some(parent) => self.unlink_parent(id, parent),
            None => self.roots.retain(|r| *r != id),
        }
        match new_parent {
            Some(p) => self.link_parent(id, p),
            None => self.roots.push(id),
        }
    }

    /// Access the data of a live element.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Update bounds.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.bounds = bounds;
        }
    }

    /// Replace attribute flags.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.flags = flags;
        }
    }

    /// Set or clear the explicit tab index.
    pub fn set_tab_index(&mut self, id: ElementId, tab_index: Option<i32>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.element.tab_index = tab_index;
        }
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Returns the parent of an element if live, or `None` for top-level or stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of an element, or an empty slice if it is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Top-level elements in insertion order.
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Bounds of a live element.
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.element.bounds)
    }

    /// Get the next element in document order.
    ///
    /// Returns `None` at the end of the document or if `current` is stale.
    pub fn next_depth_first(&self, current: ElementId) -> Option<ElementId> {
        let node = self.node_opt(current)?;
        if let Some(&first_child) = node.children.first() {
            return Some(first_child);
        }
        let mut at = current;
        loop {
            if let Some(next) = self.next_sibling(at) {
                return Some(next);
            }
            at = self.parent_of(at)?;
        }
    }

    /// Get the previous element in document order.
    ///
    /// Returns `None` at the start of the document or if `current` is stale.
    pub fn prev_depth_first(&self, current: ElementId) -> Option<ElementId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(prev_sibling) = self.prev_sibling(current) {
            return Some(self.last_in_subtree(prev_sibling));
        }
        self.parent_of(current)
    }

    /// Iterate `root` and its descendants in document order.
    pub fn descendants(&self, root: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let mut stack: Vec<ElementId> = Vec::new();
        if self.is_alive(root) {
            stack.push(root);
        }
        core::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children_of(id).iter().rev().copied());
            Some(id)
        })
    }

    /// Returns true if `element` is `ancestor` or lies in its subtree.
    pub fn contains(&self, ancestor: ElementId, element: ElementId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(element) {
            return false;
        }
        let mut at = Some(element);
        while let Some(id) = at {
            if id == ancestor {
                return true;
            }
            at = self.parent_of(id);
        }
        false
    }

    /// Compare two elements by document order.
    ///
    /// Ancestors precede their descendants. Stale ids sort after live ones.
    pub fn compare_document_order(&self, a: ElementId, b: ElementId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        match (self.is_alive(a), self.is_alive(b)) {
            (true, true) => {}
            (false, false) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
        }
        let pa = self.path_to(a);
        let pb = self.path_to(b);
        let shared = pa.iter().zip(pb.iter()).take_while(|(x, y)| x == y).count();
        match (pa.get(shared), pb.get(shared)) {
            (Some(&ca), Some(&cb)) => {
                let siblings = if shared == 0 {
                    &self.roots[..]
                } else {
                    self.children_of(pa[shared - 1])
                };
                let ia = siblings.iter().position(|&s| s == ca);
                let ib = siblings.iter().position(|&s| s == cb);
                ia.cmp(&ib)
            }
            // One path is a prefix of the other: the ancestor comes first.
            (None, _) => Ordering::Less,
            (_, None) => Ordering::Greater,
        }
    }

    /// Whether a live element matches the focusable category.
    ///
    /// See [`Element::is_focus_candidate`].
    pub fn is_focus_candidate(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(Element::is_focus_candidate)
    }

    /// Effective tab index of a live element; `None` if it is not a candidate.
    pub fn tab_index(&self, id: ElementId) -> Option<i32> {
        self.element(id).and_then(Element::effective_tab_index)
    }

    /// Whether a live element carries [`ElementFlags::AUTOFOCUS`].
    pub fn is_autofocus(&self, id: ElementId) -> bool {
        self.element(id)
            .is_some_and(|e| e.flags.contains(ElementFlags::AUTOFOCUS))
    }

    /// Whether a focus request on `id` would succeed right now.
    ///
    /// The element must be a live candidate, not disabled, and neither it nor
    /// any ancestor may be hidden.
    pub fn can_receive_focus(&self, id: ElementId) -> bool {
        let Some(element) = self.element(id) else {
            return false;
        };
        if !element.is_focus_candidate() || element.flags.contains(ElementFlags::DISABLED) {
            return false;
        }
        let mut at = Some(id);
        while let Some(current) = at {
            if self
                .element(current)
                .is_some_and(|e| e.flags.contains(ElementFlags::HIDDEN))
            {
                return false;
            }
            at = self.parent_of(current);
        }
        true
    }

    /// Request focus on `id`. Returns whether the element now holds focus.
    ///
    /// A refused request leaves the current focus untouched.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if !self.can_receive_focus(id) {
            tracing::trace!(?id, "focus request refused");
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Remove focus from the document.
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// The element currently holding focus, if any.
    pub fn active_element(&self) -> Option<ElementId> {
        self.active.filter(|&id| self.is_alive(id))
    }

    /// Whether focus indication should currently be visible (keyboard modality).
    pub fn focus_visible(&self) -> bool {
        self.focus_visible
    }

    /// Update the focus-visible modality flag.
    pub fn set_focus_visible(&mut self, visible: bool) {
        self.focus_visible = visible;
    }

    /// Record that a global listener set (focus, keydown, pointerdown) was attached.
    pub fn attach_listeners(&mut self) {
        self.listener_sets += 1;
        tracing::debug!(sets = self.listener_sets, "global listeners attached");
    }

    /// Record that a global listener set was detached.
    pub fn detach_listeners(&mut self) {
        debug_assert!(self.listener_sets > 0, "detaching listeners that were never attached");
        self.listener_sets = self.listener_sets.saturating_sub(1);
        tracing::debug!(sets = self.listener_sets, "global listeners detached");
    }

    /// Number of attached global listener sets.
    pub fn listener_sets(&self) -> u32 {
        self.listener_sets
    }

    // --- internals ---

    fn node(&self, id: ElementId) -> &Node {
        self.node_opt(id).expect("dangling ElementId")
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.node_opt_mut(id).expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn siblings_of(&self, id: ElementId) -> &[ElementId] {
        match self.parent_of(id) {
            Some(parent) => self.children_of(parent),
            None => &self.roots[..],
        }
    }

    fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        let siblings = self.siblings_of(id);
        let pos = siblings.iter().position(|&s| s == id)?;
        siblings.get(pos + 1).copied()
    }

    fn prev_sibling(&self, id: ElementId) -> Option<ElementId> {
        let siblings = self.siblings_of(id);
        let pos = siblings.iter().position(|&s| s == id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    fn last_in_subtree(&self, mut id: ElementId) -> ElementId {
        while let Some(&last) = self.children_of(id).last() {
            id = last;
        }
        id
    }

    fn path_to(&self, id: ElementId) -> Path {
        let mut path = Path::new();
        let mut at = Some(id);
        while let Some(current) = at {
            path.push(current);
            at = self.parent_of(current);
        }
        path.reverse();
        path
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn free_subtree(&mut self, id: ElementId) {
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes[current.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(current.idx());
            }
        }
    }
}
