// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordering and approval strategies for focus candidates.
//!
//! Candidates are resolved as an unordered set; a [`CandidateOrder`] turns
//! them into a sequence and an [`ApproveCandidate`] predicate decides which of
//! them may receive focus. Both can be set per scope (see
//! [`ScopeProps`](crate::ScopeProps)) and overridden per call through
//! [`FocusOptions`].
//!
//! Two orders ship with the crate:
//!
//! - [`DocumentOrder`] (the default): depth-first tree position.
//! - [`TabOrder`]: positive tab indices first in ascending order, then
//!   everything else, with document order breaking ties. This matches native
//!   sequential navigation.
//!
//! Closures work as strategies too:
//!
//! ```rust
//! use understory_focus_scope::{ApproveCandidate, DynTree};
//!
//! fn assert_strategy<K>(_: &dyn ApproveCandidate<K>) {}
//!
//! let only_tabbable = |tree: &DynTree<'_, u32>, el: u32| tree.is_tabbable(el);
//! assert_strategy(&only_tabbable);
//! ```

use core::cmp::Ordering;

use crate::host::ElementTree;

/// Shorthand for a type-erased element tree with element type `K`.
pub type DynTree<'a, K> = dyn ElementTree<Element = K> + 'a;

/// Comparator used to sort focus candidates.
pub trait CandidateOrder<K> {
    /// Compare two candidates.
    fn compare(&self, tree: &DynTree<'_, K>, a: K, b: K) -> Ordering;
}

impl<K, F> CandidateOrder<K> for F
where
    F: Fn(&DynTree<'_, K>, K, K) -> Ordering,
{
    fn compare(&self, tree: &DynTree<'_, K>, a: K, b: K) -> Ordering {
        self(tree, a, b)
    }
}

/// Predicate deciding whether a candidate may receive focus.
pub trait ApproveCandidate<K> {
    /// Return true to let the candidate be tried.
    fn approve(&self, tree: &DynTree<'_, K>, candidate: K) -> bool;
}

impl<K, F> ApproveCandidate<K> for F
where
    F: Fn(&DynTree<'_, K>, K) -> bool,
{
    fn approve(&self, tree: &DynTree<'_, K>, candidate: K) -> bool {
        self(tree, candidate)
    }
}

/// Document (depth-first tree) order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentOrder;

impl<K> CandidateOrder<K> for DocumentOrder {
    fn compare(&self, tree: &DynTree<'_, K>, a: K, b: K) -> Ordering {
        tree.compare_document_order(a, b)
    }
}

/// Sequential navigation order.
///
/// Elements with a positive tab index come first, ascending; elements with
/// tab index zero (or no explicit positive index) follow. Document order
/// breaks ties within a group.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TabOrder;

impl TabOrder {
    fn group<K>(tree: &DynTree<'_, K>, element: K) -> (u8, i32) {
        match tree.tab_index(element) {
            Some(i) if i > 0 => (0, i),
            _ => (1, 0),
        }
    }
}

impl<K: Copy> CandidateOrder<K> for TabOrder {
    fn compare(&self, tree: &DynTree<'_, K>, a: K, b: K) -> Ordering {
        Self::group(tree, a)
            .cmp(&Self::group(tree, b))
            .then_with(|| tree.compare_document_order(a, b))
    }
}

bitflags::bitflags! {
    /// Host-level restrictions applied to candidates in addition to any
    /// approval predicate.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CandidateFilter: u8 {
        /// Only candidates that take part in Tab navigation.
        const TABBABLE  = 0b0000_0001;
        /// Only candidates marked for autofocus.
        const AUTOFOCUS = 0b0000_0010;
    }
}

impl CandidateFilter {
    /// Whether `element` passes every restriction in this filter.
    pub fn admits<K: Copy>(self, tree: &DynTree<'_, K>, element: K) -> bool {
        (!self.contains(Self::TABBABLE) || tree.is_tabbable(element))
            && (!self.contains(Self::AUTOFOCUS) || tree.is_autofocus(element))
    }
}

/// Per-call overrides for a navigation operation.
///
/// - `approve` replaces the scope's approval predicate for this call.
/// - `order` replaces the scope's ordering for this call.
/// - `filter` always applies, ANDed with whichever predicate is in effect.
pub struct FocusOptions<'a, K> {
    /// Approval override.
    pub approve: Option<&'a dyn ApproveCandidate<K>>,
    /// Ordering override.
    pub order: Option<&'a dyn CandidateOrder<K>>,
    /// Extra restrictions.
    pub filter: CandidateFilter,
}

impl<K> Default for FocusOptions<'_, K> {
    fn default() -> Self {
        Self {
            approve: None,
            order: None,
            filter: CandidateFilter::empty(),
        }
    }
}

impl<K> Clone for FocusOptions<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for FocusOptions<'_, K> {}

impl<K> core::fmt::Debug for FocusOptions<'_, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FocusOptions")
            .field("approve", &self.approve.is_some())
            .field("order", &self.order.is_some())
            .field("filter", &self.filter)
            .finish()
    }
}

impl<'a, K> FocusOptions<'a, K> {
    /// Options with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the approval predicate.
    #[must_use]
    pub fn with_approve(mut self, approve: &'a dyn ApproveCandidate<K>) -> Self {
        self.approve = Some(approve);
        self
    }

    /// Override the ordering.
    #[must_use]
    pub fn with_order(mut self, order: &'a dyn CandidateOrder<K>) -> Self {
        self.order = Some(order);
        self
    }

    /// Add restrictions.
    #[must_use]
    pub fn with_filter(mut self, filter: CandidateFilter) -> Self {
        self.filter |= filter;
        self
    }
}

/// The predicate actually applied to a candidate: filter AND approval.
pub(crate) struct Approval<'a, K> {
    pub(crate) filter: CandidateFilter,
    pub(crate) approve: Option<&'a dyn ApproveCandidate<K>>,
}

impl<K: Copy> ApproveCandidate<K> for Approval<'_, K> {
    fn approve(&self, tree: &DynTree<'_, K>, candidate: K) -> bool {
        self.filter.admits(tree, candidate)
            && self.approve.is_none_or(|a| a.approve(tree, candidate))
    }
}

#[cfg(all(test, feature = "element_tree_adapter"))]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use kurbo::Rect;
    use understory_element_tree::{Document, Element, ElementFlags, ElementId, ElementKind};

    fn button() -> Element {
        Element::new(ElementKind::Button, Rect::new(0.0, 0.0, 1.0, 1.0))
    }

    #[test]
    fn tab_order_puts_positive_indices_first() {
        let mut doc = Document::new();
        let root = doc.insert(None, Element::default());
        let plain_a = doc.insert(Some(root), button());
        let third = doc.insert(Some(root), button().with_tab_index(3));
        let zero = doc.insert(Some(root), button().with_tab_index(0));
        let first = doc.insert(Some(root), button().with_tab_index(1));
        let also_first = doc.insert(Some(root), button().with_tab_index(1));

        let tree: &DynTree<'_, ElementId> = &doc;
        let mut items = vec![plain_a, third, zero, first, also_first];
        items.sort_by(|&a, &b| TabOrder.compare(tree, a, b));
        assert_eq!(items, vec![first, also_first, third, plain_a, zero]);
    }

    #[test]
    fn document_order_sorts_by_tree_position() {
        let mut doc = Document::new();
        let root = doc.insert(None, Element::default());
        let group = doc.insert(Some(root), Element::default());
        let late = doc.insert(Some(root), button());
        let early = doc.insert(Some(group), button());

        let tree: &DynTree<'_, ElementId> = &doc;
        let mut items = vec![late, early];
        items.sort_by(|&a, &b| DocumentOrder.compare(tree, a, b));
        assert_eq!(items, vec![early, late]);
    }

    #[test]
    fn approval_ands_filter_and_predicate() {
        let mut doc = Document::new();
        let root = doc.insert(None, Element::default());
        let auto = doc.insert(Some(root), button().with_flags(ElementFlags::AUTOFOCUS));
        let auto_skipped = doc.insert(
            Some(root),
            button().with_flags(ElementFlags::AUTOFOCUS).with_tab_index(-1),
        );
        let plain = doc.insert(Some(root), button());

        let tabbable_only = |tree: &DynTree<'_, ElementId>, el: ElementId| tree.is_tabbable(el);
        let approval = Approval {
            filter: CandidateFilter::AUTOFOCUS,
            approve: Some(&tabbable_only),
        };
        let tree: &DynTree<'_, ElementId> = &doc;
        let approved: Vec<_> = [auto, auto_skipped, plain]
            .into_iter()
            .filter(|&el| approval.approve(tree, el))
            .collect();
        assert_eq!(approved, vec![auto]);
    }
}
