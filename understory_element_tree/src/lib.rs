// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_element_tree --heading-base-level=0

//! Understory Element Tree: a headless element document with focus state.
//!
//! This crate stands in for the platform side of focus management. It keeps
//! an ordered forest of elements and answers the questions a focus system asks
//! of a host:
//!
//! - Which elements under a container are focus candidates ("natively
//!   focusable or explicitly marked focusable")?
//! - Does one element contain another, and which comes first in document order?
//! - What is an element's tab index and bounding box?
//! - Which element is focused, and does a focus request succeed?
//!
//! It is the reference host for `understory_focus_scope`, which adapts
//! [`Document`] through its `element_tree_adapter` feature.
//!
//! ## Not a layout engine
//!
//! Bounds are written by the caller in document coordinates; nothing here
//! measures or arranges elements.
//!
//! ## API overview
//!
//! - [`Document`]: structure, traversal, focusability, and focus state.
//! - [`Element`]: per-element data (kind, flags, tab index, bounds).
//! - [`ElementKind`] and [`ElementFlags`]: the attributes that decide focusability.
//! - [`ElementId`]: generational handle of an element.
//!
//! Key operations:
//! - [`Document::insert`] / [`Document::remove`] / [`Document::reparent`]
//! - [`Document::next_depth_first`] / [`Document::prev_depth_first`] / [`Document::descendants`]
//! - [`Document::contains`] / [`Document::compare_document_order`]
//! - [`Document::focus`] / [`Document::blur`] / [`Document::active_element`]
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod types;

pub use document::Document;
pub use types::{Element, ElementFlags, ElementId, ElementKind};
