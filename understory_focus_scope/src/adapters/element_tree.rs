// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host traits for Understory Element Tree.
//!
//! ## Feature
//!
//! Enable with `element_tree_adapter`.
//!
//! ## Notes
//!
//! Candidates are the live descendants of the container (container included)
//! that match the document's focusable category. Whether a candidate can take
//! focus right now (disabled, hidden ancestor) is left to the focus request,
//! which the document refuses silently.

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::Rect;
use understory_element_tree::{Document, ElementId};

use crate::host::{ElementTree, FocusHost};

impl ElementTree for Document {
    type Element = ElementId;

    fn collect_focusable(&self, container: ElementId, out: &mut Vec<ElementId>) {
        out.extend(
            self.descendants(container)
                .filter(|&id| self.is_focus_candidate(id)),
        );
    }

    fn contains(&self, ancestor: ElementId, element: ElementId) -> bool {
        Self::contains(self, ancestor, element)
    }

    fn compare_document_order(&self, a: ElementId, b: ElementId) -> Ordering {
        Self::compare_document_order(self, a, b)
    }

    fn tab_index(&self, element: ElementId) -> Option<i32> {
        Self::tab_index(self, element)
    }

    fn is_autofocus(&self, element: ElementId) -> bool {
        Self::is_autofocus(self, element)
    }

    fn bounds(&self, element: ElementId) -> Option<Rect> {
        Self::bounds(self, element)
    }
}

impl FocusHost for Document {
    fn active_element(&self) -> Option<ElementId> {
        Self::active_element(self)
    }

    fn request_focus(&mut self, element: ElementId) {
        let _ = self.focus(element);
    }

    fn blur(&mut self) {
        Self::blur(self);
    }

    fn focus_visible(&self) -> bool {
        Self::focus_visible(self)
    }

    fn attach_listeners(&mut self) {
        Self::attach_listeners(self);
    }

    fn detach_listeners(&mut self) {
        Self::detach_listeners(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_element_tree::{Element, ElementFlags, ElementKind};

    #[test]
    fn collects_candidates_in_subtree_only() {
        let mut doc = Document::new();
        let panel = doc.insert(None, Element::region(Rect::ZERO).with_tab_index(0));
        let link = doc.insert(
            Some(panel),
            Element::new(ElementKind::Link, Rect::ZERO).with_flags(ElementFlags::HREF),
        );
        let _anchor = doc.insert(Some(panel), Element::new(ElementKind::Link, Rect::ZERO));
        let _elsewhere = doc.insert(None, Element::new(ElementKind::Button, Rect::ZERO));

        let mut out = Vec::new();
        ElementTree::collect_focusable(&doc, panel, &mut out);
        assert_eq!(out, [panel, link]);
    }

    #[test]
    fn refused_requests_leave_focus() {
        let mut doc = Document::new();
        let a = doc.insert(None, Element::new(ElementKind::Button, Rect::ZERO));
        let disabled = doc.insert(
            None,
            Element::new(ElementKind::Input, Rect::ZERO).with_flags(ElementFlags::DISABLED),
        );
        FocusHost::request_focus(&mut doc, a);
        FocusHost::request_focus(&mut doc, disabled);
        assert_eq!(FocusHost::active_element(&doc), Some(a));
    }
}
