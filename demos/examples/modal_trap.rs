// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A modal dialog with a nested popup menu, driven by simulated platform events.
//!
//! This example shows how to:
//! - mount a trapping, autofocusing, restoring scope for a dialog,
//! - nest a popup rendered outside the dialog's subtree under the dialog scope,
//! - route focus, keydown, and pointerdown events to the registry while it listens,
//! - navigate with arrow keys through the `FocusScope` capability.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example modal_trap`

use kurbo::Rect;
use tracing::info;
use understory_element_tree::{Document, Element, ElementFlags, ElementId, ElementKind};
use understory_focus_scope::{
    FocusEvent, FocusOptions, Key, KeyDownEvent, Modifiers, Navigation, PointerDownEvent,
    ScopeHandle, ScopeProps, ScopeRegistry,
};

fn button(x: f64, y: f64) -> Element {
    Element::new(ElementKind::Button, Rect::new(x, y, x + 80.0, y + 24.0))
}

/// Deliver a key press the way a host would: trap handlers first, then
/// scope-level arrow navigation if the trap did not consume it.
fn press(
    doc: &mut Document,
    registry: &ScopeRegistry<ElementId>,
    scope: ScopeHandle,
    key: Key,
    modifiers: Modifiers,
) {
    let mut event = KeyDownEvent::new(key, modifiers);
    if !registry.handle_key_down(doc, &mut event)
        && let Some(nav) = Navigation::from_key(key, modifiers)
    {
        registry.scope(doc, scope).navigate(nav, &FocusOptions::new());
    }
    info!(?key, ?modifiers, focused = ?doc.active_element(), "key");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new();
    doc.set_focus_visible(true);

    let page = doc.insert(None, Element::region(Rect::new(0.0, 0.0, 800.0, 600.0)));
    let open_button = doc.insert(Some(page), button(10.0, 10.0));
    let help_link = doc.insert(
        Some(page),
        Element::new(ElementKind::Link, Rect::new(10.0, 50.0, 90.0, 70.0))
            .with_flags(ElementFlags::HREF),
    );

    let dialog = doc.insert(None, Element::region(Rect::new(200.0, 150.0, 600.0, 450.0)));
    let name = doc.insert(
        Some(dialog),
        Element::new(ElementKind::Input, Rect::new(220.0, 170.0, 580.0, 194.0)),
    );
    let more = doc.insert(Some(dialog), button(220.0, 400.0));
    let cancel = doc.insert(Some(dialog), button(400.0, 400.0));
    let ok = doc.insert(
        Some(dialog),
        button(500.0, 400.0).with_flags(ElementFlags::AUTOFOCUS),
    );

    let popup = doc.insert(None, Element::region(Rect::new(220.0, 430.0, 320.0, 520.0)));
    let copy = doc.insert(Some(popup), button(230.0, 440.0));
    let paste = doc.insert(Some(popup), button(230.0, 470.0));

    let mut registry = ScopeRegistry::new();
    assert!(doc.focus(open_button));

    // Open the dialog.
    let modal = registry.create_handle();
    registry.mount(
        &mut doc,
        modal,
        None,
        Some(dialog),
        ScopeProps::default().with_trap(true),
    );
    info!(focused = ?doc.active_element(), ?ok, "dialog open");

    press(&mut doc, &registry, modal, Key::ArrowLeft, Modifiers::empty());
    info!(?cancel, "arrow left from ok");
    press(&mut doc, &registry, modal, Key::Tab, Modifiers::empty());
    press(&mut doc, &registry, modal, Key::Tab, Modifiers::empty());
    info!(?name, "tab wrapped to the first field");

    // Focus tries to escape to the page.
    let previous = doc.active_element();
    doc.focus(help_link);
    registry.handle_focus(
        &mut doc,
        &FocusEvent {
            target: help_link,
            related_target: previous,
        },
    );
    info!(focused = ?doc.active_element(), "focus escape reverted");

    // Click on the page behind the dialog.
    let mut click = PointerDownEvent::new(open_button);
    registry.handle_pointer_down(&doc, &mut click);
    info!(prevented = click.default_prevented, "click outside dialog");

    // Open the popup menu from "more"; it renders in its own layer.
    doc.focus(more);
    let menu = registry.create_handle();
    registry.mount(&mut doc, menu, Some(modal), Some(popup), ScopeProps::default());
    info!(focused = ?doc.active_element(), ?copy, "menu open");
    press(&mut doc, &registry, menu, Key::ArrowDown, Modifiers::empty());
    info!(?paste, "arrow down in menu");

    let mut click = PointerDownEvent::new(paste);
    registry.handle_pointer_down(&doc, &mut click);
    info!(prevented = click.default_prevented, "click inside nested menu");

    registry.unmount(&mut doc, menu);
    info!(focused = ?doc.active_element(), ?more, "menu closed");
    info!(target = ?registry.last_focused(modal), "dialog inherits the menu's restoration target");

    registry.unmount(&mut doc, modal);
    info!(
        focused = ?doc.active_element(),
        ?more,
        listening = registry.is_listening(),
        "dialog closed"
    );
}
