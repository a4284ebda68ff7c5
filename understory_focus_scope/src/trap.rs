// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trap controller: global event handlers that keep focus inside the active trap.
//!
//! While at least one scope is mounted, the host routes three capture-phase
//! events to the registry, once per event and before any scope-specific
//! handler sees them:
//!
//! - focus: if focus lands outside the active trap, move it back to where it
//!   came from, or blur;
//! - keydown: Tab and Shift+Tab cycle through the trap's tabbable candidates,
//!   wrapping at either end;
//! - pointerdown: presses outside the active trap have their default action
//!   (focusing the pressed element) prevented.
//!
//! Cancellation lives on the event payload: handlers set `default_prevented`
//! and the host decides what to skip.
//!
//! ```rust
//! # #[cfg(feature = "element_tree_adapter")]
//! # {
//! use kurbo::Rect;
//! use understory_element_tree::{Document, Element, ElementKind};
//! use understory_focus_scope::{Key, KeyDownEvent, Modifiers, ScopeProps, ScopeRegistry};
//!
//! let mut doc = Document::new();
//! let dialog = doc.insert(None, Element::default());
//! let first = doc.insert(Some(dialog), Element::new(ElementKind::Button, Rect::ZERO));
//! let last = doc.insert(Some(dialog), Element::new(ElementKind::Button, Rect::ZERO));
//!
//! let mut registry = ScopeRegistry::new();
//! let modal = registry.create_handle();
//! let props = ScopeProps::default().with_trap(true).with_autofocus(true);
//! registry.mount(&mut doc, modal, None, Some(dialog), props);
//! assert_eq!(doc.active_element(), Some(first));
//!
//! // Shift+Tab on the first candidate wraps to the last.
//! let mut ev = KeyDownEvent::new(Key::Tab, Modifiers::SHIFT);
//! assert!(registry.handle_key_down(&mut doc, &mut ev));
//! assert!(ev.default_prevented);
//! assert_eq!(doc.active_element(), Some(last));
//! # }
//! ```

use core::fmt::Debug;
use core::hash::Hash;

use crate::host::FocusHost;
use crate::order::{CandidateFilter, FocusOptions, TabOrder};
use crate::registry::ScopeRegistry;
use crate::request::try_focus;

/// Keys the focus system reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Sequential navigation.
    Tab,
    /// Arrow up.
    ArrowUp,
    /// Arrow down.
    ArrowDown,
    /// Arrow left.
    ArrowLeft,
    /// Arrow right.
    ArrowRight,
    /// Any other key.
    Other,
}

bitflags::bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Alt / Option.
        const ALT   = 0b0000_0010;
        /// Control.
        const CTRL  = 0b0000_0100;
        /// Meta / Command / Windows.
        const META  = 0b0000_1000;
    }
}

/// Focus moved to `target`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusEvent<K> {
    /// Element that received focus.
    pub target: K,
    /// Element that lost focus, if any.
    pub related_target: Option<K>,
}

/// A key was pressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyDownEvent {
    /// The key.
    pub key: Key,
    /// Modifiers held at the time.
    pub modifiers: Modifiers,
    /// Set by handlers that consumed the key.
    pub default_prevented: bool,
}

impl KeyDownEvent {
    /// A key event that has not been handled yet.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            default_prevented: false,
        }
    }
}

/// A pointer button went down over `target`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PointerDownEvent<K> {
    /// Element under the pointer.
    pub target: K,
    /// Set when the press must not move focus.
    pub default_prevented: bool,
}

impl<K> PointerDownEvent<K> {
    /// A pointer event that has not been handled yet.
    pub fn new(target: K) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> ScopeRegistry<K> {
    /// Keep focus inside the active trap.
    ///
    /// Returns true if focus landed outside the trap and was redirected.
    pub fn handle_focus<H>(&self, host: &mut H, event: &FocusEvent<K>) -> bool
    where
        H: FocusHost<Element = K>,
    {
        if !self.is_listening() {
            return false;
        }
        let Some(trap) = self.active_trap() else {
            return false;
        };
        if self.contains_element(&*host, trap, event.target) {
            return false;
        }
        let returned = event
            .related_target
            .is_some_and(|previous| try_focus(host, previous));
        if !returned {
            host.blur();
        }
        tracing::debug!(?trap, target = ?event.target, returned, "focus escaped trap");
        true
    }

    /// Cycle Tab and Shift+Tab through the active trap's tabbable candidates.
    ///
    /// Only Tab without Alt, Ctrl, or Meta is handled. Returns true (and
    /// marks the event) if the key was consumed.
    pub fn handle_key_down<H>(&self, host: &mut H, event: &mut KeyDownEvent) -> bool
    where
        H: FocusHost<Element = K>,
    {
        if !self.is_listening()
            || event.key != Key::Tab
            || event
                .modifiers
                .intersects(Modifiers::ALT | Modifiers::CTRL | Modifiers::META)
        {
            return false;
        }
        let Some(trap) = self.active_trap() else {
            return false;
        };
        event.default_prevented = true;

        let backward = event.modifiers.contains(Modifiers::SHIFT);
        let options = FocusOptions::new()
            .with_filter(CandidateFilter::TABBABLE)
            .with_order(&TabOrder);
        let moved = self.focus_relative(host, trap, backward, &options)
            || self.focus_absolute(host, trap, backward, &options);
        tracing::debug!(?trap, backward, moved, "tab cycled inside trap");
        true
    }

    /// Prevent presses outside the active trap from moving focus.
    pub fn handle_pointer_down<H>(&self, host: &H, event: &mut PointerDownEvent<K>) -> bool
    where
        H: FocusHost<Element = K>,
    {
        if !self.is_listening() {
            return false;
        }
        let Some(trap) = self.active_trap() else {
            return false;
        };
        if self.contains_element(host, trap, event.target) {
            return false;
        }
        event.default_prevented = true;
        tracing::debug!(?trap, target = ?event.target, "pointer down outside trap");
        true
    }
}

#[cfg(all(test, feature = "element_tree_adapter"))]
mod tests {
    use super::*;
    use crate::registry::{ScopeHandle, ScopeProps};
    use kurbo::Rect;
    use understory_element_tree::{Document, Element, ElementId, ElementKind};

    fn button() -> Element {
        Element::new(ElementKind::Button, Rect::new(0.0, 0.0, 1.0, 1.0))
    }

    fn trap_with(
        doc: &mut Document,
        registry: &mut ScopeRegistry<ElementId>,
        container: ElementId,
    ) -> ScopeHandle {
        let handle = registry.create_handle();
        registry.mount(
            doc,
            handle,
            None,
            Some(container),
            ScopeProps::default().with_trap(true).with_autofocus(true),
        );
        handle
    }

    #[test]
    fn tab_skips_negative_tab_index_and_honors_positive_ones() {
        let mut doc = Document::new();
        let dialog = doc.insert(None, Element::default());
        let plain = doc.insert(Some(dialog), button());
        let skipped = doc.insert(Some(dialog), button().with_tab_index(-1));
        let prioritized = doc.insert(Some(dialog), button().with_tab_index(2));
        let mut registry = ScopeRegistry::new();
        let _trap = trap_with(&mut doc, &mut registry, dialog);
        assert_eq!(doc.active_element(), Some(plain), "autofocus uses document order");

        let mut tab = KeyDownEvent::new(Key::Tab, Modifiers::empty());
        assert!(registry.handle_key_down(&mut doc, &mut tab));
        // Tab order is [prioritized, plain]; plain is last, so it wraps.
        assert_eq!(doc.active_element(), Some(prioritized));
        assert!(registry.handle_key_down(&mut doc, &mut tab));
        assert_eq!(doc.active_element(), Some(plain));
        assert_ne!(doc.active_element(), Some(skipped));
    }

    #[test]
    fn modified_tab_and_other_keys_pass_through() {
        let mut doc = Document::new();
        let dialog = doc.insert(None, Element::default());
        let _a = doc.insert(Some(dialog), button());
        let mut registry = ScopeRegistry::new();
        let _trap = trap_with(&mut doc, &mut registry, dialog);

        let mut ctrl_tab = KeyDownEvent::new(Key::Tab, Modifiers::CTRL);
        assert!(!registry.handle_key_down(&mut doc, &mut ctrl_tab));
        assert!(!ctrl_tab.default_prevented);
        let mut arrow = KeyDownEvent::new(Key::ArrowDown, Modifiers::empty());
        assert!(!registry.handle_key_down(&mut doc, &mut arrow));
    }

    #[test]
    fn tab_without_trap_is_left_alone() {
        let mut doc = Document::new();
        let region = doc.insert(None, Element::default());
        let _a = doc.insert(Some(region), button());
        let mut registry = ScopeRegistry::new();
        let handle = registry.create_handle();
        registry.mount(&mut doc, handle, None, Some(region), ScopeProps::default());

        let mut tab = KeyDownEvent::new(Key::Tab, Modifiers::empty());
        assert!(!registry.handle_key_down(&mut doc, &mut tab));
        assert!(!tab.default_prevented);
    }

    #[test]
    fn escaped_focus_returns_or_blurs() {
        let mut doc = Document::new();
        let dialog = doc.insert(None, Element::default());
        let inside = doc.insert(Some(dialog), button());
        let outside = doc.insert(None, button());
        let mut registry = ScopeRegistry::new();
        let _trap = trap_with(&mut doc, &mut registry, dialog);
        assert_eq!(doc.active_element(), Some(inside));

        // The platform already moved focus out; the handler moves it back.
        assert!(doc.focus(outside));
        let escaped = FocusEvent {
            target: outside,
            related_target: Some(inside),
        };
        assert!(registry.handle_focus(&mut doc, &escaped));
        assert_eq!(doc.active_element(), Some(inside));

        assert!(doc.focus(outside));
        let from_nowhere = FocusEvent {
            target: outside,
            related_target: None,
        };
        assert!(registry.handle_focus(&mut doc, &from_nowhere));
        assert_eq!(doc.active_element(), None);

        let within = FocusEvent {
            target: inside,
            related_target: None,
        };
        assert!(!registry.handle_focus(&mut doc, &within));
    }

    #[test]
    fn pointer_down_outside_is_prevented() {
        let mut doc = Document::new();
        let dialog = doc.insert(None, Element::default());
        let inside = doc.insert(Some(dialog), button());
        let outside = doc.insert(None, button());
        let mut registry = ScopeRegistry::new();
        let trap = trap_with(&mut doc, &mut registry, dialog);

        let mut press = PointerDownEvent::new(outside);
        assert!(registry.handle_pointer_down(&doc, &mut press));
        assert!(press.default_prevented);
        let mut press = PointerDownEvent::new(inside);
        assert!(!registry.handle_pointer_down(&doc, &mut press));
        assert!(!press.default_prevented);

        registry.unmount(&mut doc, trap);
        let mut press = PointerDownEvent::new(outside);
        assert!(!registry.handle_pointer_down(&doc, &mut press), "not listening");
    }
}
