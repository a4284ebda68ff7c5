// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the core stays host-agnostic.
//!
//! ## Available Adapters
//!
//! - [`element_tree`] (`element_tree_adapter` feature): implements the host
//!   traits for [`understory_element_tree::Document`].

#[cfg(feature = "element_tree_adapter")]
pub mod element_tree;
