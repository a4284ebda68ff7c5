// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element document: identifiers, kinds, flags, and element data.

use kurbo::Rect;

/// Identifier for an element in the document (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// The semantic role of an element, as far as focus is concerned.
///
/// Only the distinctions that change native focusability are modeled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A plain region or text; not natively focusable.
    #[default]
    Generic,
    /// A push button.
    Button,
    /// A single-line form input.
    Input,
    /// A selection list.
    Select,
    /// A multi-line text field.
    TextArea,
    /// A hyperlink; natively focusable only with [`ElementFlags::HREF`].
    Link,
    /// Audio or video; natively focusable only with [`ElementFlags::CONTROLS`].
    Media,
}

impl ElementKind {
    /// Returns true for form controls (buttons, inputs, selects, text areas).
    pub const fn is_form_control(self) -> bool {
        matches!(
            self,
            Self::Button | Self::Input | Self::Select | Self::TextArea
        )
    }
}

bitflags::bitflags! {
    /// Element attributes that affect focus.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Form control is disabled; it neither matches nor accepts focus.
        const DISABLED         = 0b0000_0001;
        /// Element (and its subtree) is not rendered. It may still match the
        /// focusable category, but focus requests on it fail.
        const HIDDEN           = 0b0000_0010;
        /// Link has a navigation target.
        const HREF             = 0b0000_0100;
        /// Media element shows its controls.
        const CONTROLS         = 0b0000_1000;
        /// Region is editable in place.
        const CONTENT_EDITABLE = 0b0001_0000;
        /// Element asks to be focused when its enclosing scope mounts.
        const AUTOFOCUS        = 0b0010_0000;
    }
}

/// Per-element data.
#[derive(Clone, Debug)]
pub struct Element {
    /// Semantic kind.
    pub kind: ElementKind,
    /// Focus-related attributes.
    pub flags: ElementFlags,
    /// Explicit tab index, if the element carries one.
    ///
    /// Any explicit value makes the element a focus candidate; negative values
    /// keep it out of sequential (Tab) navigation.
    pub tab_index: Option<i32>,
    /// Bounding rectangle in document coordinates (y grows downward).
    ///
    /// This crate does not perform layout; the host writes the boxes it
    /// computed elsewhere.
    pub bounds: Rect,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            kind: ElementKind::Generic,
            flags: ElementFlags::empty(),
            tab_index: None,
            bounds: Rect::ZERO,
        }
    }
}

impl Element {
    /// A generic region with the given bounds.
    pub fn region(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// An element of `kind` with the given bounds.
    pub fn new(kind: ElementKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            ..Self::default()
        }
    }

    /// Add attribute flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Set an explicit tab index.
    #[must_use]
    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Whether the element matches the "natively focusable or explicitly
    /// marked focusable" category on its own attributes.
    pub fn is_focus_candidate(&self) -> bool {
        let native = match self.kind {
            kind if kind.is_form_control() => !self.flags.contains(ElementFlags::DISABLED),
            ElementKind::Link => self.flags.contains(ElementFlags::HREF),
            ElementKind::Media => self.flags.contains(ElementFlags::CONTROLS),
            _ => false,
        };
        native || self.tab_index.is_some() || self.flags.contains(ElementFlags::CONTENT_EDITABLE)
    }

    /// Effective tab index: the explicit value, or 0 for other candidates.
    pub fn effective_tab_index(&self) -> Option<i32> {
        if let Some(explicit) = self.tab_index {
            return Some(explicit);
        }
        self.is_focus_candidate().then_some(0)
    }
}
