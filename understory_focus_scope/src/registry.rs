// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scope registry: handles, mounted scopes, nesting, and listener lifecycle.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::host::FocusHost;
use crate::order::{ApproveCandidate, CandidateOrder};

/// Public identity of a focus scope.
///
/// Handles are created by [`ScopeRegistry::create_handle`] before the scope
/// mounts, so that nested regions can name their enclosing scope as a parent
/// regardless of the order in which the two mount.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeHandle(u32);

/// Configuration of a focus scope.
///
/// ```rust
/// use understory_focus_scope::ScopeProps;
///
/// // A modal: trap focus, always autofocus, always restore.
/// let props = ScopeProps::<u32>::default()
///     .with_trap(true)
///     .with_autofocus(true)
///     .with_restore_focus(true);
/// assert!(props.trap);
/// ```
pub struct ScopeProps<K> {
    /// Keep focus inside this scope while it is the active trap.
    pub trap: bool,
    /// Focus a candidate on mount. `None` follows the host's focus-visible signal.
    pub autofocus: Option<bool>,
    /// Refocus the previously focused element on unmount. `None` follows the
    /// host's focus-visible signal.
    pub restore_focus: Option<bool>,
    /// Predicate every candidate must pass, unless overridden per call.
    pub approve: Option<Box<dyn ApproveCandidate<K>>>,
    /// Candidate ordering, unless overridden per call. `None` means document order.
    pub order: Option<Box<dyn CandidateOrder<K>>>,
}

impl<K> Default for ScopeProps<K> {
    fn default() -> Self {
        Self {
            trap: false,
            autofocus: None,
            restore_focus: None,
            approve: None,
            order: None,
        }
    }
}

impl<K> Debug for ScopeProps<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScopeProps")
            .field("trap", &self.trap)
            .field("autofocus", &self.autofocus)
            .field("restore_focus", &self.restore_focus)
            .field("approve", &self.approve.is_some())
            .field("order", &self.order.is_some())
            .finish()
    }
}

impl<K> ScopeProps<K> {
    /// Set whether the scope traps focus.
    #[must_use]
    pub fn with_trap(mut self, trap: bool) -> Self {
        self.trap = trap;
        self
    }

    /// Set autofocus explicitly instead of following the focus-visible signal.
    #[must_use]
    pub fn with_autofocus(mut self, autofocus: bool) -> Self {
        self.autofocus = Some(autofocus);
        self
    }

    /// Set restoration explicitly instead of following the focus-visible signal.
    #[must_use]
    pub fn with_restore_focus(mut self, restore: bool) -> Self {
        self.restore_focus = Some(restore);
        self
    }

    /// Install an approval predicate.
    #[must_use]
    pub fn with_approve(mut self, approve: impl ApproveCandidate<K> + 'static) -> Self {
        self.approve = Some(Box::new(approve));
        self
    }

    /// Install a candidate ordering.
    #[must_use]
    pub fn with_order(mut self, order: impl CandidateOrder<K> + 'static) -> Self {
        self.order = Some(Box::new(order));
        self
    }
}

/// State of a mounted scope.
#[derive(Debug)]
pub(crate) struct Scope<K> {
    pub(crate) container: Option<K>,
    pub(crate) parent: Option<ScopeHandle>,
    pub(crate) props: ScopeProps<K>,
    pub(crate) last_focused: Option<K>,
}

/// A scope names a parent handle this registry does not know.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownScope {
    /// The scope making the claim.
    pub child: ScopeHandle,
    /// The unknown parent handle.
    pub parent: ScopeHandle,
}

impl core::fmt::Display for UnknownScope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "focus scope {:?} claims parent {:?}, which was never registered",
            self.child, self.parent
        )
    }
}

impl core::error::Error for UnknownScope {}

/// Registry of focus scopes.
///
/// One registry is owned by the root of an application (or of an isolated
/// embedded widget) and passed by reference wherever scopes mount, navigate,
/// or handle events. It tracks:
///
/// - every handle it created, and the scope state of the mounted ones;
/// - mounted scopes in most-recently-mounted-first order, which decides the
///   active trap;
/// - a parent → children index keyed by the parent handle each scope declared;
/// - whether the global listener set is attached on the host. It is attached
///   exactly while at least one scope is mounted.
pub struct ScopeRegistry<K> {
    pub(crate) scopes: HashMap<ScopeHandle, Option<Scope<K>>>,
    pub(crate) order: Vec<ScopeHandle>,
    pub(crate) children: HashMap<ScopeHandle, SmallVec<[ScopeHandle; 4]>>,
    next_handle: u32,
    listening: bool,
}

impl<K> Debug for ScopeRegistry<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScopeRegistry")
            .field("handles", &self.scopes.len())
            .field("order", &self.order)
            .field("listening", &self.listening)
            .finish_non_exhaustive()
    }
}

impl<K> Default for ScopeRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ScopeRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            scopes: HashMap::new(),
            order: Vec::new(),
            children: HashMap::new(),
            next_handle: 0,
            listening: false,
        }
    }

    /// Allocate a handle for a scope that will mount later.
    pub fn create_handle(&mut self) -> ScopeHandle {
        let handle = ScopeHandle(self.next_handle);
        self.next_handle = self
            .next_handle
            .checked_add(1)
            .expect("scope handle space exhausted");
        self.scopes.insert(handle, None);
        handle
    }

    /// Forget a handle whose region is gone for good.
    ///
    /// Mounted handles are kept; unmount first. Returns whether the handle was
    /// released. Scopes that still name a released handle as their parent are
    /// invalid, and resolving their parent panics.
    pub fn release_handle(&mut self, handle: ScopeHandle) -> bool {
        if self.is_mounted(handle) {
            tracing::warn!(?handle, "refusing to release a mounted scope handle");
            return false;
        }
        self.scopes.remove(&handle).is_some()
    }

    /// Whether this registry created `handle` and has not released it.
    pub fn is_known(&self, handle: ScopeHandle) -> bool {
        self.scopes.contains_key(&handle)
    }

    /// Whether `handle` is currently mounted.
    pub fn is_mounted(&self, handle: ScopeHandle) -> bool {
        self.entry(handle).is_some()
    }

    /// Number of mounted scopes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no scope is mounted.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the global listener set is attached.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Mounted scopes, most recently mounted first.
    pub fn mounted(&self) -> impl Iterator<Item = ScopeHandle> + '_ {
        self.order.iter().copied()
    }

    /// Mounted scopes that declared `handle` as their parent.
    pub fn children_of(&self, handle: ScopeHandle) -> &[ScopeHandle] {
        self.children.get(&handle).map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// Parent handle declared by a mounted scope, whether or not it is mounted.
    pub fn declared_parent(&self, handle: ScopeHandle) -> Option<ScopeHandle> {
        self.entry(handle).and_then(|s| s.parent)
    }

    /// Resolve the mounted parent of a mounted scope.
    ///
    /// Returns `Ok(None)` for root scopes and for parents that are known but
    /// not mounted right now, and `Err` if the declared parent handle is not
    /// known to this registry.
    pub fn try_resolve_parent(
        &self,
        handle: ScopeHandle,
    ) -> Result<Option<ScopeHandle>, UnknownScope> {
        let Some(parent) = self.declared_parent(handle) else {
            return Ok(None);
        };
        match self.scopes.get(&parent) {
            None => Err(UnknownScope {
                child: handle,
                parent,
            }),
            Some(None) => Ok(None),
            Some(Some(_)) => Ok(Some(parent)),
        }
    }

    /// Resolve the mounted parent of a mounted scope.
    ///
    /// # Panics
    ///
    /// Panics if the declared parent handle is unknown to this registry: the
    /// nesting was built from a handle that was never registered here.
    pub fn resolve_parent(&self, handle: ScopeHandle) -> Option<ScopeHandle> {
        self.try_resolve_parent(handle)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// The active trap: the most recently mounted trap scope with a container.
    pub fn active_trap(&self) -> Option<ScopeHandle> {
        self.order.iter().copied().find(|&h| {
            self.entry(h)
                .is_some_and(|s| s.props.trap && s.container.is_some())
        })
    }

    /// Configuration of a mounted scope.
    pub fn props(&self, handle: ScopeHandle) -> Option<&ScopeProps<K>> {
        self.entry(handle).map(|s| &s.props)
    }

    pub(crate) fn entry(&self, handle: ScopeHandle) -> Option<&Scope<K>> {
        self.scopes.get(&handle).and_then(Option::as_ref)
    }

    pub(crate) fn entry_mut(&mut self, handle: ScopeHandle) -> Option<&mut Scope<K>> {
        self.scopes.get_mut(&handle).and_then(Option::as_mut)
    }

    /// Panics unless `parent` is a known handle whose mounted ancestor chain
    /// does not lead back to `handle`.
    pub(crate) fn check_nesting(&self, handle: ScopeHandle, parent: Option<ScopeHandle>) {
        let Some(parent) = parent else {
            return;
        };
        if !self.is_known(parent) {
            panic!(
                "{}",
                UnknownScope {
                    child: handle,
                    parent
                }
            );
        }
        let mut at = Some(parent);
        while let Some(current) = at {
            assert!(
                current != handle,
                "focus scope {handle:?} would become its own ancestor through {parent:?}"
            );
            at = self.declared_parent(current);
        }
    }

    /// Insert a scope at the front of the mounted order and attach the global
    /// listeners if it is the first.
    pub(crate) fn register<H>(&mut self, host: &mut H, handle: ScopeHandle, scope: Scope<K>)
    where
        H: FocusHost<Element = K>,
    {
        if let Some(parent) = scope.parent {
            self.children.entry(parent).or_default().push(handle);
        }
        self.order.insert(0, handle);
        self.scopes.insert(handle, Some(scope));
        if !self.listening {
            host.attach_listeners();
            self.listening = true;
        }
    }

    /// Remove a mounted scope and detach the global listeners if it was the
    /// last. Unknown or unmounted handles are ignored.
    pub(crate) fn unregister<H>(&mut self, host: &mut H, handle: ScopeHandle) -> Option<Scope<K>>
    where
        H: FocusHost<Element = K>,
    {
        let scope = self.scopes.get_mut(&handle)?.take()?;
        self.order.retain(|&h| h != handle);
        if let Some(parent) = scope.parent
            && let Some(siblings) = self.children.get_mut(&parent)
        {
            siblings.retain(|h| *h != handle);
            if siblings.is_empty() {
                self.children.remove(&parent);
            }
        }
        if self.order.is_empty() && self.listening {
            host.detach_listeners();
            self.listening = false;
        }
        Some(scope)
    }
}

impl<K: Copy> ScopeRegistry<K> {
    /// Current container of a mounted scope.
    pub fn container(&self, handle: ScopeHandle) -> Option<K> {
        self.entry(handle).and_then(|s| s.container)
    }

    /// Attach, replace, or clear the container of a mounted scope.
    ///
    /// A scope without a container contributes no candidates and cannot be
    /// the active trap.
    pub fn set_container(&mut self, handle: ScopeHandle, container: Option<K>) {
        if let Some(scope) = self.entry_mut(handle) {
            scope.container = container;
        }
    }

    /// Element that held focus right before the scope mounted, or the one it
    /// inherited from a nested or earlier scope when that scope unmounted.
    pub fn last_focused(&self, handle: ScopeHandle) -> Option<K> {
        self.entry(handle).and_then(|s| s.last_focused)
    }
}

#[cfg(all(test, feature = "element_tree_adapter"))]
mod tests {
    use super::*;
    use understory_element_tree::{Document, Element, ElementId};

    fn mounted_trap(
        registry: &mut ScopeRegistry<ElementId>,
        doc: &mut Document,
        container: Option<ElementId>,
    ) -> ScopeHandle {
        let handle = registry.create_handle();
        registry.mount(
            doc,
            handle,
            None,
            container,
            ScopeProps::default().with_trap(true).with_autofocus(false),
        );
        handle
    }

    #[test]
    fn listeners_follow_the_first_and_last_scope() {
        let mut doc = Document::new();
        let mut registry = ScopeRegistry::new();
        let a = registry.create_handle();
        let b = registry.create_handle();

        registry.mount(&mut doc, a, None, None, ScopeProps::default());
        assert_eq!(doc.listener_sets(), 1);
        registry.mount(&mut doc, b, None, None, ScopeProps::default());
        assert_eq!(doc.listener_sets(), 1, "second scope attaches nothing");

        registry.unmount(&mut doc, a);
        assert_eq!(doc.listener_sets(), 1);
        registry.unmount(&mut doc, b);
        assert_eq!(doc.listener_sets(), 0);
        assert!(!registry.is_listening());

        registry.unmount(&mut doc, b);
        assert_eq!(doc.listener_sets(), 0, "repeated unmount is a no-op");
    }

    #[test]
    fn active_trap_is_the_newest_with_a_container() {
        let mut doc = Document::new();
        let first_root = doc.insert(None, Element::default());
        let second_root = doc.insert(None, Element::default());
        let mut registry = ScopeRegistry::new();

        let first = mounted_trap(&mut registry, &mut doc, Some(first_root));
        let second = mounted_trap(&mut registry, &mut doc, Some(second_root));
        let detached = mounted_trap(&mut registry, &mut doc, None);
        let plain = registry.create_handle();
        registry.mount(&mut doc, plain, None, Some(first_root), ScopeProps::default());

        assert_eq!(registry.active_trap(), Some(second));
        registry.set_container(detached, Some(second_root));
        assert_eq!(registry.active_trap(), Some(detached));

        registry.unmount(&mut doc, detached);
        registry.unmount(&mut doc, second);
        assert_eq!(registry.active_trap(), Some(first));
        registry.unmount(&mut doc, first);
        assert_eq!(registry.active_trap(), None);
    }

    #[test]
    fn parents_resolve_by_handle() {
        let mut doc = Document::new();
        let mut registry = ScopeRegistry::new();
        let outer = registry.create_handle();
        let inner = registry.create_handle();

        // The inner region mounts first; its parent is known but not mounted yet.
        registry.mount(&mut doc, inner, Some(outer), None, ScopeProps::default());
        assert_eq!(registry.resolve_parent(inner), None);
        assert_eq!(registry.children_of(outer), &[inner]);

        registry.mount(&mut doc, outer, None, None, ScopeProps::default());
        assert_eq!(registry.resolve_parent(inner), Some(outer));
        assert_eq!(registry.resolve_parent(outer), None);
    }

    #[test]
    fn released_parent_is_reported() {
        let mut doc = Document::new();
        let mut registry = ScopeRegistry::new();
        let outer = registry.create_handle();
        let inner = registry.create_handle();
        registry.mount(&mut doc, inner, Some(outer), None, ScopeProps::default());
        assert!(registry.release_handle(outer));

        let err = registry.try_resolve_parent(inner).unwrap_err();
        assert_eq!(err, UnknownScope { child: inner, parent: outer });
    }

    #[test]
    #[should_panic(expected = "was never registered")]
    fn mounting_under_a_foreign_handle_panics() {
        let mut doc = Document::new();
        let mut other = ScopeRegistry::<ElementId>::new();
        let _ = other.create_handle();
        let foreign = other.create_handle();

        let mut registry = ScopeRegistry::new();
        let handle = registry.create_handle();
        registry.mount(&mut doc, handle, Some(foreign), None, ScopeProps::default());
    }

    #[test]
    #[should_panic(expected = "its own ancestor")]
    fn nesting_cycles_panic() {
        let mut doc = Document::new();
        let mut registry = ScopeRegistry::new();
        let a = registry.create_handle();
        let b = registry.create_handle();
        registry.mount(&mut doc, a, Some(b), None, ScopeProps::default());
        registry.mount(&mut doc, b, Some(a), None, ScopeProps::default());
    }

    #[test]
    fn mounted_handles_are_not_released() {
        let mut doc = Document::new();
        let mut registry = ScopeRegistry::new();
        let a = registry.create_handle();
        registry.mount(&mut doc, a, None, None, ScopeProps::default());
        assert!(!registry.release_handle(a));
        registry.unmount(&mut doc, a);
        assert!(registry.release_handle(a));
        assert!(!registry.is_known(a));
    }
}
