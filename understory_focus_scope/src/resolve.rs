// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate resolution and containment over a scope and its nested scopes.
//!
//! Nothing here is cached: every call walks the registry's children index and
//! asks the host for the focusable elements under each container.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;

use crate::host::ElementTree;
use crate::registry::{ScopeHandle, ScopeRegistry};

impl<K: Copy + Eq + Hash + Debug> ScopeRegistry<K> {
    /// Focus candidates of a scope.
    ///
    /// This is every focusable element under the scope's container (the
    /// container included if it qualifies) together with the candidates of
    /// every mounted scope nested in it. Empty if the scope is not mounted or
    /// has no container anywhere in its subtree.
    pub fn candidates<T>(&self, tree: &T, handle: ScopeHandle) -> HashSet<K>
    where
        T: ElementTree<Element = K> + ?Sized,
    {
        let mut found = Vec::new();
        self.collect_candidates(tree, handle, &mut found);
        let set: HashSet<K> = found.into_iter().collect();
        tracing::trace!(?handle, candidates = set.len(), "resolved candidates");
        set
    }

    fn collect_candidates<T>(&self, tree: &T, handle: ScopeHandle, out: &mut Vec<K>)
    where
        T: ElementTree<Element = K> + ?Sized,
    {
        let Some(scope) = self.entry(handle) else {
            return;
        };
        if let Some(container) = scope.container {
            tree.collect_focusable(container, out);
        }
        for &child in self.children_of(handle) {
            self.collect_candidates(tree, child, out);
        }
    }

    /// Whether `element` lies inside the scope's container or inside the
    /// container of any mounted scope nested in it.
    ///
    /// Nested scopes need not be nested in the element tree: a popover
    /// rendered elsewhere still belongs to the scope that opened it.
    pub fn contains_element<T>(&self, tree: &T, handle: ScopeHandle, element: K) -> bool
    where
        T: ElementTree<Element = K> + ?Sized,
    {
        let Some(scope) = self.entry(handle) else {
            return false;
        };
        if scope
            .container
            .is_some_and(|container| tree.contains(container, element))
        {
            return true;
        }
        self.children_of(handle)
            .iter()
            .any(|&child| self.contains_element(tree, child, element))
    }

    /// Whether `other` is `handle` itself or a mounted scope nested in it.
    ///
    /// A handle always contains itself, mounted or not.
    pub fn contains_scope(&self, handle: ScopeHandle, other: ScopeHandle) -> bool {
        handle == other
            || self
                .children_of(handle)
                .iter()
                .any(|&child| self.contains_scope(child, other))
    }
}

#[cfg(all(test, feature = "element_tree_adapter"))]
mod tests {
    use crate::registry::{ScopeProps, ScopeRegistry};
    use kurbo::Rect;
    use understory_element_tree::{Document, Element, ElementFlags, ElementKind};

    fn button() -> Element {
        Element::new(ElementKind::Button, Rect::new(0.0, 0.0, 1.0, 1.0))
    }

    #[test]
    fn nested_scope_candidates_are_included_once() {
        let mut doc = Document::new();
        let dialog = doc.insert(None, Element::default());
        let ok = doc.insert(Some(dialog), button());
        let menu = doc.insert(Some(dialog), Element::default());
        let item = doc.insert(Some(menu), button());
        let popover = doc.insert(None, Element::default());
        let floating = doc.insert(Some(popover), button());
        let _disabled = doc.insert(Some(dialog), button().with_flags(ElementFlags::DISABLED));

        let mut registry = ScopeRegistry::new();
        let outer = registry.create_handle();
        let inner = registry.create_handle();
        let portal = registry.create_handle();
        registry.mount(&mut doc, outer, None, Some(dialog), ScopeProps::default());
        // Shares part of the outer container.
        registry.mount(&mut doc, inner, Some(outer), Some(menu), ScopeProps::default());
        registry.mount(&mut doc, portal, Some(inner), Some(popover), ScopeProps::default());

        let found = registry.candidates(&doc, outer);
        assert_eq!(found.len(), 3);
        assert!(found.contains(&ok) && found.contains(&item) && found.contains(&floating));

        assert!(registry.contains_element(&doc, outer, floating));
        assert!(!registry.contains_element(&doc, inner, ok));
        assert!(registry.contains_scope(outer, portal));
        assert!(!registry.contains_scope(portal, outer));

        registry.unmount(&mut doc, portal);
        assert!(!registry.contains_element(&doc, outer, floating));
        assert!(!registry.contains_scope(outer, portal));
    }

    #[test]
    fn scope_contains_itself_while_unmounted() {
        let mut registry = ScopeRegistry::<understory_element_tree::ElementId>::new();
        let idle = registry.create_handle();
        let other = registry.create_handle();
        assert!(!registry.is_mounted(idle));
        assert!(registry.contains_scope(idle, idle));
        assert!(!registry.contains_scope(idle, other));
    }

    #[test]
    fn scope_without_container_has_no_candidates() {
        let mut doc = Document::new();
        let root = doc.insert(None, Element::default());
        let _b = doc.insert(Some(root), button());

        let mut registry = ScopeRegistry::new();
        let handle = registry.create_handle();
        assert!(registry.candidates(&doc, handle).is_empty(), "not mounted");
        registry.mount(&mut doc, handle, None, None, ScopeProps::default());
        assert!(registry.candidates(&doc, handle).is_empty());
        registry.set_container(handle, Some(root));
        assert_eq!(registry.candidates(&doc, handle).len(), 1);
    }
}
