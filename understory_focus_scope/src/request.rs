// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus requests with fallback.

use crate::host::FocusHost;
use crate::order::{ApproveCandidate, DynTree};

/// Ask the host to focus `element` and report whether it took.
///
/// Platforms may refuse focus silently (detached, disabled, hidden), so
/// success is judged by the active element after the request.
pub fn try_focus<K, H>(host: &mut H, element: K) -> bool
where
    K: Copy + Eq + core::fmt::Debug,
    H: FocusHost<Element = K>,
{
    host.request_focus(element);
    let took = host.active_element() == Some(element);
    tracing::trace!(?element, took, "focus request");
    took
}

/// Walk `candidates` from `start`, focusing the first approved candidate that
/// accepts focus.
///
/// Rejected candidates and candidates that refuse focus are skipped. Returns
/// false when the list is exhausted, leaving focus where it was unless a
/// refused request moved it.
pub fn focus_at_index<K, H>(
    host: &mut H,
    candidates: &[K],
    start: usize,
    approve: Option<&dyn ApproveCandidate<K>>,
) -> bool
where
    K: Copy + Eq + core::fmt::Debug,
    H: FocusHost<Element = K>,
{
    for &candidate in candidates.iter().skip(start) {
        let approved = approve.is_none_or(|a| {
            let tree: &DynTree<'_, K> = &*host;
            a.approve(tree, candidate)
        });
        if approved && try_focus(host, candidate) {
            return true;
        }
    }
    false
}

#[cfg(all(test, feature = "element_tree_adapter"))]
mod tests {
    use super::*;
    use kurbo::Rect;
    use understory_element_tree::{Document, Element, ElementFlags, ElementId, ElementKind};

    fn button() -> Element {
        Element::new(ElementKind::Button, Rect::new(0.0, 0.0, 1.0, 1.0))
    }

    #[test]
    fn falls_back_past_rejected_and_refusing_candidates() {
        let mut doc = Document::new();
        let root = doc.insert(None, Element::default());
        let rejected = doc.insert(Some(root), button());
        let refuses = doc.insert(Some(root), button().with_flags(ElementFlags::HIDDEN));
        let accepts = doc.insert(Some(root), button());

        let approve = |_: &DynTree<'_, ElementId>, el: ElementId| el != rejected;
        assert!(focus_at_index(
            &mut doc,
            &[rejected, refuses, accepts],
            0,
            Some(&approve)
        ));
        assert_eq!(doc.active_element(), Some(accepts));
    }

    #[test]
    fn exhausted_list_leaves_focus_unchanged() {
        let mut doc = Document::new();
        let root = doc.insert(None, Element::default());
        let current = doc.insert(Some(root), button());
        let hidden_a = doc.insert(Some(root), button().with_flags(ElementFlags::HIDDEN));
        let hidden_b = doc.insert(Some(root), button().with_flags(ElementFlags::HIDDEN));
        assert!(doc.focus(current));

        assert!(!focus_at_index(&mut doc, &[hidden_a, hidden_b], 0, None));
        assert_eq!(doc.active_element(), Some(current));
    }

    #[test]
    fn starts_at_the_given_index() {
        let mut doc = Document::new();
        let root = doc.insert(None, Element::default());
        let a = doc.insert(Some(root), button());
        let b = doc.insert(Some(root), button());

        assert!(focus_at_index(&mut doc, &[a, b], 1, None));
        assert_eq!(doc.active_element(), Some(b));
        assert!(!focus_at_index(&mut doc, &[a, b], 2, None));
    }
}
