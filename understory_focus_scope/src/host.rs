// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host traits: what the focus-scope system needs from the platform.
//!
//! The focus-scope system never owns elements. It asks an [`ElementTree`] for
//! structure, ordering, and geometry, and asks a [`FocusHost`] to move focus
//! and to attach or detach its global listeners. Both are consulted live on
//! every query; nothing is cached between calls.

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Rect;

/// Read-only view of the host's element tree.
///
/// This trait is object safe so that ordering and approval strategies can
/// receive a `&dyn ElementTree<Element = K>` regardless of the concrete host.
pub trait ElementTree {
    /// Element handle. The registry requires it to be a small
    /// `Copy + Eq + Hash + Debug` value.
    type Element;

    /// Append every focus candidate in the subtree rooted at `container`
    /// (including `container` itself if it qualifies) to `out`.
    ///
    /// Candidates are elements that are natively focusable or explicitly
    /// marked focusable: enabled form controls, links with a target, elements
    /// with an explicit tab index, content-editable regions, and media with
    /// controls. Order is unspecified.
    fn collect_focusable(&self, container: Self::Element, out: &mut Vec<Self::Element>);

    /// Returns true if `element` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Element, element: Self::Element) -> bool;

    /// Compare two elements by document (depth-first tree) order.
    fn compare_document_order(&self, a: Self::Element, b: Self::Element) -> Ordering;

    /// Effective tab index of a candidate, or `None` if it is not focusable.
    fn tab_index(&self, element: Self::Element) -> Option<i32>;

    /// Whether the element takes part in sequential (Tab) navigation.
    fn is_tabbable(&self, element: Self::Element) -> bool {
        self.tab_index(element).is_some_and(|i| i >= 0)
    }

    /// Whether the element is marked to receive focus when its scope mounts.
    fn is_autofocus(&self, element: Self::Element) -> bool;

    /// Axis-aligned bounding box (`x0` left, `y0` top, `x1` right, `y1`
    /// bottom; y grows downward), or `None` if the element has no box.
    fn bounds(&self, element: Self::Element) -> Option<Rect>;
}

/// Focus control and global-listener plumbing on top of an [`ElementTree`].
pub trait FocusHost: ElementTree {
    /// The element currently holding input focus, if any.
    fn active_element(&self) -> Option<Self::Element>;

    /// Ask the platform to focus `element`. The request may fail silently;
    /// callers check [`FocusHost::active_element`] afterwards.
    fn request_focus(&mut self, element: Self::Element);

    /// Unconditionally remove focus from the document.
    fn blur(&mut self);

    /// Ambient signal: whether focus indication should currently be visible.
    ///
    /// Used as the default for autofocus and restoration when a scope does
    /// not specify them.
    fn focus_visible(&self) -> bool;

    /// Attach the capture-phase focus, keydown, and pointerdown listeners that
    /// route events to the registry's trap handlers.
    fn attach_listeners(&mut self);

    /// Detach the listeners attached by [`FocusHost::attach_listeners`].
    fn detach_listeners(&mut self);
}
