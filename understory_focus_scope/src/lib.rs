// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_focus_scope --heading-base-level=0

//! Understory Focus Scope: nested focus regions for UI.
//!
//! A *focus scope* is a region of the element tree with its own focus rules.
//! Scopes mount and unmount independently (dialogs, menus, popovers) and nest
//! by naming an enclosing scope's handle, so the scope tree need not mirror
//! the element tree. This crate provides:
//!
//! - **Autofocus**: focus a marked candidate (or the first one) on mount.
//! - **Trapping**: keep focus inside the most recently mounted trap; Tab and
//!   Shift+Tab wrap inside it and presses outside it do not move focus.
//! - **Restoration**: return focus to where it was before a scope mounted,
//!   even when scopes unmount out of order.
//! - **Navigation**: first/last, next/previous, and spatial arrow-key moves
//!   over candidates resolved live from the host.
//!
//! The crate owns no elements. Hosts implement [`ElementTree`] and
//! [`FocusHost`]; the `element_tree_adapter` feature implements them for
//! `understory_element_tree::Document`.
//!
//! ## Minimal example
//!
//! ```rust
//! # #[cfg(feature = "element_tree_adapter")]
//! # {
//! use kurbo::Rect;
//! use understory_element_tree::{Document, Element, ElementKind};
//! use understory_focus_scope::{FocusOptions, ScopeProps, ScopeRegistry};
//!
//! let button = |x: f64| Element::new(ElementKind::Button, Rect::new(x, 0.0, x + 10.0, 10.0));
//!
//! let mut doc = Document::new();
//! let opener = doc.insert(None, button(100.0));
//! let dialog = doc.insert(None, Element::default());
//! let yes = doc.insert(Some(dialog), button(0.0));
//! let no = doc.insert(Some(dialog), button(20.0));
//! assert!(doc.focus(opener));
//!
//! let mut registry = ScopeRegistry::new();
//! let modal = registry.create_handle();
//! let props = ScopeProps::default()
//!     .with_trap(true)
//!     .with_autofocus(true)
//!     .with_restore_focus(true);
//! registry.mount(&mut doc, modal, None, Some(dialog), props);
//! assert_eq!(doc.active_element(), Some(yes));
//!
//! let mut scope = registry.scope(&mut doc, modal);
//! assert!(scope.focus_right(&FocusOptions::new()));
//! assert!(scope.has_focus());
//! assert_eq!(doc.active_element(), Some(no));
//!
//! registry.unmount(&mut doc, modal);
//! assert_eq!(doc.active_element(), Some(opener));
//! # }
//! ```
//!
//! ## API overview
//!
//! - [`ScopeRegistry`]: handles, mount/unmount, nesting, and the global
//!   listener lifecycle. One registry per application root.
//! - [`ScopeProps`]: trap, autofocus, restoration, approval, ordering.
//! - [`FocusScope`]: navigation and activity queries bound to one scope,
//!   from [`ScopeRegistry::scope`].
//! - [`CandidateOrder`] / [`ApproveCandidate`]: strategies, with
//!   [`DocumentOrder`] and [`TabOrder`] built in; [`FocusOptions`] overrides
//!   them per call.
//! - [`direction`]: the spatial ranking heuristic.
//! - Trap events: [`FocusEvent`], [`KeyDownEvent`], [`PointerDownEvent`],
//!   routed to [`ScopeRegistry::handle_focus`],
//!   [`ScopeRegistry::handle_key_down`], and
//!   [`ScopeRegistry::handle_pointer_down`].
//!
//! ## Errors
//!
//! Lookups return `Option` or `bool`. Lifecycle misuse (mounting twice,
//! unmounting a scope that is not mounted) is ignored and logged. A scope
//! nested under a handle this registry never created is a programming error
//! and panics; [`ScopeRegistry::try_resolve_parent`] reports it as
//! [`UnknownScope`] instead.
//!
//! ## Logging
//!
//! Lifecycle and trap decisions are emitted through `tracing` at `debug`,
//! individual focus attempts at `trace`, and ignored misuse at `warn`.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: `no_std` floating-point support for `kurbo`.
//! - `element_tree_adapter` (default): enables [`adapters::element_tree`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod direction;

mod host;
mod manager;
mod order;
mod registry;
mod request;
mod resolve;
mod scope;
mod trap;

pub use direction::{Direction, rank_in_direction};
pub use host::{ElementTree, FocusHost};
pub use order::{
    ApproveCandidate, CandidateFilter, CandidateOrder, DocumentOrder, DynTree, FocusOptions,
    TabOrder,
};
pub use registry::{ScopeHandle, ScopeProps, ScopeRegistry, UnknownScope};
pub use request::{focus_at_index, try_focus};
pub use scope::{FocusScope, Navigation};
pub use trap::{FocusEvent, Key, KeyDownEvent, Modifiers, PointerDownEvent};
