// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scope lifecycle and navigation.
//!
//! ## Mount
//!
//! 1. Validate the declared parent and register the scope.
//! 2. Remember the element that was focused (the restoration target).
//! 3. If autofocus is on, focus the first candidate marked for autofocus, or
//!    failing that the first candidate at all. A trap that finds nothing to
//!    focus blurs, so focus does not linger behind it.
//! 4. If autofocus is off, a trap blurs.
//!
//! ## Unmount
//!
//! Scopes may unmount in any order. A leaving scope hands its restoration
//! target to its parent when the parent is mounted. Without a mounted parent,
//! the scope mounted right after it (if any) inherits the target instead.
//! Then, if restoration is on, focus returns to the target.
//!
//! ## Navigation
//!
//! Candidates are resolved fresh, sorted (per-call order, else the scope's
//! order, else document order), and tried one by one with the effective
//! approval predicate until one accepts focus.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use crate::direction::{Direction, rank_in_direction};
use crate::host::FocusHost;
use crate::order::{
    Approval, ApproveCandidate, CandidateFilter, CandidateOrder, DocumentOrder, DynTree,
    FocusOptions,
};
use crate::registry::{Scope, ScopeHandle, ScopeProps, ScopeRegistry};
use crate::request::{focus_at_index, try_focus};

impl<K: Copy + Eq + Hash + Debug> ScopeRegistry<K> {
    /// Mount a scope.
    ///
    /// `parent` is the handle of the enclosing scope, if any. It need not be
    /// mounted yet. `container` may be `None` while the region has no element
    /// and can be attached later with [`ScopeRegistry::set_container`].
    ///
    /// Mounting an already mounted handle is ignored.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was not created by this registry, if `parent` is
    /// unknown to it, or if the nesting would make the scope its own ancestor.
    pub fn mount<H>(
        &mut self,
        host: &mut H,
        handle: ScopeHandle,
        parent: Option<ScopeHandle>,
        container: Option<K>,
        props: ScopeProps<K>,
    ) where
        H: FocusHost<Element = K>,
    {
        assert!(
            self.is_known(handle),
            "mounting focus scope {handle:?}, which this registry never created"
        );
        if self.is_mounted(handle) {
            tracing::warn!(?handle, "focus scope is already mounted");
            return;
        }
        self.check_nesting(handle, parent);

        let trap = props.trap;
        let autofocus = props.autofocus.unwrap_or_else(|| host.focus_visible());
        let last_focused = host.active_element();
        self.register(
            host,
            handle,
            Scope {
                container,
                parent,
                props,
                last_focused,
            },
        );
        tracing::debug!(?handle, ?parent, trap, autofocus, ?last_focused, "mounted focus scope");

        if autofocus {
            let marked = FocusOptions::new().with_filter(CandidateFilter::AUTOFOCUS);
            if self.focus_absolute(host, handle, false, &marked)
                || self.focus_absolute(host, handle, false, &FocusOptions::new())
            {
                return;
            }
        }
        if trap {
            tracing::debug!(?handle, "trap mounted without focusing; blurring");
            host.blur();
        }
    }

    /// Unmount a scope. Unmounting a handle that is not mounted is ignored.
    pub fn unmount<H>(&mut self, host: &mut H, handle: ScopeHandle)
    where
        H: FocusHost<Element = K>,
    {
        let Some(position) = self.order.iter().position(|&h| h == handle) else {
            tracing::warn!(?handle, "unmounting a focus scope that is not mounted");
            return;
        };
        // A mounted parent takes over; independent scopes hand off to the
        // scope mounted right after them.
        let heir = match self.try_resolve_parent(handle) {
            Ok(Some(parent)) => Some(parent),
            _ => (position > 0).then(|| self.order[position - 1]),
        };
        if let Some(heir) = heir {
            let inherited = self.last_focused(handle);
            if let Some(scope) = self.entry_mut(heir) {
                scope.last_focused = inherited;
            }
            tracing::debug!(?handle, ?heir, ?inherited, "handed restoration target on unmount");
        }

        let Some(scope) = self.unregister(host, handle) else {
            return;
        };
        tracing::debug!(?handle, "unmounted focus scope");

        let restore = scope
            .props
            .restore_focus
            .unwrap_or_else(|| host.focus_visible());
        if restore && let Some(target) = scope.last_focused {
            let restored = try_focus(host, target);
            tracing::debug!(?handle, ?target, restored, "restoring focus");
        }
    }

    /// Focus the first (or, `reversed`, the last) candidate of the scope that
    /// passes approval and accepts focus.
    pub fn focus_absolute<H>(
        &self,
        host: &mut H,
        handle: ScopeHandle,
        reversed: bool,
        options: &FocusOptions<'_, K>,
    ) -> bool
    where
        H: FocusHost<Element = K>,
    {
        let Some(scope) = self.entry(handle) else {
            return false;
        };
        let sorted = self.sorted_candidates(&*host, handle, scope, reversed, options);
        let approval = approval(scope, options);
        focus_at_index(host, &sorted, 0, Some(&approval))
    }

    /// Focus the candidate after (or, `reversed`, before) the focused element.
    ///
    /// Returns false if nothing is focused or no later candidate accepts
    /// focus. If the focused element is not a candidate of this scope, the
    /// search starts from the first candidate.
    pub fn focus_relative<H>(
        &self,
        host: &mut H,
        handle: ScopeHandle,
        reversed: bool,
        options: &FocusOptions<'_, K>,
    ) -> bool
    where
        H: FocusHost<Element = K>,
    {
        let Some(active) = host.active_element() else {
            return false;
        };
        let Some(scope) = self.entry(handle) else {
            return false;
        };
        let sorted = self.sorted_candidates(&*host, handle, scope, reversed, options);
        let start = sorted
            .iter()
            .position(|&c| c == active)
            .map_or(0, |i| i + 1);
        let approval = approval(scope, options);
        focus_at_index(host, &sorted, start, Some(&approval))
    }

    /// Focus the nearest candidate in `direction` from the focused element.
    ///
    /// Returns false if nothing is focused. The scope's ordering does not
    /// apply; candidates are ranked by proximity.
    pub fn focus_in_direction<H>(
        &self,
        host: &mut H,
        handle: ScopeHandle,
        direction: Direction,
        options: &FocusOptions<'_, K>,
    ) -> bool
    where
        H: FocusHost<Element = K>,
    {
        let Some(active) = host.active_element() else {
            return false;
        };
        let Some(scope) = self.entry(handle) else {
            return false;
        };
        let ranked = {
            let tree: &DynTree<'_, K> = &*host;
            rank_in_direction(tree, active, self.candidates(tree, handle), direction)
        };
        tracing::trace!(?handle, ?direction, ranked = ranked.len(), "directional search");
        let approval = approval(scope, options);
        focus_at_index(host, &ranked, 0, Some(&approval))
    }

    /// Whether the focused element lies inside the scope (nested scopes included).
    pub fn has_focus<H>(&self, host: &H, handle: ScopeHandle) -> bool
    where
        H: FocusHost<Element = K>,
    {
        host.active_element()
            .is_some_and(|active| self.contains_element(host, handle, active))
    }

    /// Whether the scope should present itself as active.
    ///
    /// True when it has focus, and also when it is the active trap while no
    /// element holds focus at all (focus was blurred out of it).
    pub fn is_active<H>(&self, host: &H, handle: ScopeHandle) -> bool
    where
        H: FocusHost<Element = K>,
    {
        self.has_focus(host, handle)
            || (self.active_trap() == Some(handle) && host.active_element().is_none())
    }

    fn sorted_candidates<H>(
        &self,
        host: &H,
        handle: ScopeHandle,
        scope: &Scope<K>,
        reversed: bool,
        options: &FocusOptions<'_, K>,
    ) -> Vec<K>
    where
        H: FocusHost<Element = K>,
    {
        let tree: &DynTree<'_, K> = host;
        let order: &dyn CandidateOrder<K> = match (options.order, scope.props.order.as_deref()) {
            (Some(order), _) => order,
            (None, Some(order)) => order,
            (None, None) => &DocumentOrder,
        };
        let mut sorted: Vec<K> = self.candidates(tree, handle).into_iter().collect();
        sorted.sort_by(|&a, &b| order.compare(tree, a, b));
        if reversed {
            sorted.reverse();
        }
        sorted
    }
}

/// Effective predicate for a call: the filter AND (per-call approval, else the
/// scope's approval).
fn approval<'a, K>(scope: &'a Scope<K>, options: &FocusOptions<'a, K>) -> Approval<'a, K> {
    let approve: Option<&'a dyn ApproveCandidate<K>> = match options.approve {
        Some(approve) => Some(approve),
        None => match scope.props.approve.as_deref() {
            Some(approve) => Some(approve),
            None => None,
        },
    };
    Approval {
        filter: options.filter,
        approve,
    }
}
