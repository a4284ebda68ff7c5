// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-scope capability handed to consumers.

use core::fmt::Debug;
use core::hash::Hash;

use crate::direction::Direction;
use crate::host::FocusHost;
use crate::order::FocusOptions;
use crate::registry::{ScopeHandle, ScopeRegistry};
use crate::trap::{Key, Modifiers};

/// Navigation intent.
///
/// These map one-to-one onto the navigation methods of [`FocusScope`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// First candidate in the scope's order.
    First,
    /// Last candidate in the scope's order.
    Last,
    /// Candidate after the focused one (for example, Tab).
    Next,
    /// Candidate before the focused one (for example, Shift+Tab).
    Prev,
    /// Nearest candidate above the focused one.
    Up,
    /// Nearest candidate below the focused one.
    Down,
    /// Nearest candidate left of the focused one.
    Left,
    /// Nearest candidate right of the focused one.
    Right,
}

impl Navigation {
    /// Map a key press to an intent.
    ///
    /// Tab and Shift+Tab map to [`Navigation::Next`] and [`Navigation::Prev`],
    /// unmodified arrows to directions. Anything else, or any press with Alt,
    /// Ctrl, or Meta held, maps to `None`.
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        if modifiers.intersects(Modifiers::ALT | Modifiers::CTRL | Modifiers::META) {
            return None;
        }
        let shift = modifiers.contains(Modifiers::SHIFT);
        match key {
            Key::Tab if shift => Some(Self::Prev),
            Key::Tab => Some(Self::Next),
            _ if shift => None,
            Key::ArrowUp => Some(Self::Up),
            Key::ArrowDown => Some(Self::Down),
            Key::ArrowLeft => Some(Self::Left),
            Key::ArrowRight => Some(Self::Right),
            Key::Other => None,
        }
    }

    /// The compass direction of a spatial intent.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::First | Self::Last | Self::Next | Self::Prev => None,
        }
    }
}

/// Navigation and activity queries bound to one scope.
///
/// Obtained from [`ScopeRegistry::scope`]. Every navigation method returns
/// whether focus moved; a scope that is not mounted never moves focus.
pub struct FocusScope<'a, K, H> {
    registry: &'a ScopeRegistry<K>,
    host: &'a mut H,
    handle: ScopeHandle,
}

impl<K, H> Debug for FocusScope<'_, K, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FocusScope")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash + Debug> ScopeRegistry<K> {
    /// Bind the scope `handle` to `host` for navigation.
    pub fn scope<'a, H>(&'a self, host: &'a mut H, handle: ScopeHandle) -> FocusScope<'a, K, H>
    where
        H: FocusHost<Element = K>,
    {
        FocusScope {
            registry: self,
            host,
            handle,
        }
    }
}

impl<K, H> FocusScope<'_, K, H>
where
    K: Copy + Eq + Hash + Debug,
    H: FocusHost<Element = K>,
{
    /// The handle this capability is bound to.
    pub fn handle(&self) -> ScopeHandle {
        self.handle
    }

    /// Focus the first candidate.
    pub fn focus_first(&mut self, options: &FocusOptions<'_, K>) -> bool {
        self.registry
            .focus_absolute(self.host, self.handle, false, options)
    }

    /// Focus the last candidate.
    pub fn focus_last(&mut self, options: &FocusOptions<'_, K>) -> bool {
        self.registry
            .focus_absolute(self.host, self.handle, true, options)
    }

    /// Focus the candidate after the focused element.
    pub fn focus_next(&mut self, options: &FocusOptions<'_, K>) -> bool {
        self.registry
            .focus_relative(self.host, self.handle, false, options)
    }

    /// Focus the candidate before the focused element.
    pub fn focus_previous(&mut self, options: &FocusOptions<'_, K>) -> bool {
        self.registry
            .focus_relative(self.host, self.handle, true, options)
    }

    /// Focus the nearest candidate above.
    pub fn focus_up(&mut self, options: &FocusOptions<'_, K>) -> bool {
        self.focus_toward(Direction::Up, options)
    }

    /// Focus the nearest candidate to the right.
    pub fn focus_right(&mut self, options: &FocusOptions<'_, K>) -> bool {
        self.focus_toward(Direction::Right, options)
    }

    /// Focus the nearest candidate below.
    pub fn focus_down(&mut self, options: &FocusOptions<'_, K>) -> bool {
        self.focus_toward(Direction::Down, options)
    }

    /// Focus the nearest candidate to the left.
    pub fn focus_left(&mut self, options: &FocusOptions<'_, K>) -> bool {
        self.focus_toward(Direction::Left, options)
    }

    /// Perform a navigation intent.
    pub fn navigate(&mut self, nav: Navigation, options: &FocusOptions<'_, K>) -> bool {
        match nav {
            Navigation::First => self.focus_first(options),
            Navigation::Last => self.focus_last(options),
            Navigation::Next => self.focus_next(options),
            Navigation::Prev => self.focus_previous(options),
            Navigation::Up => self.focus_up(options),
            Navigation::Down => self.focus_down(options),
            Navigation::Left => self.focus_left(options),
            Navigation::Right => self.focus_right(options),
        }
    }

    /// See [`ScopeRegistry::is_active`].
    pub fn is_active(&self) -> bool {
        self.registry.is_active(&*self.host, self.handle)
    }

    /// See [`ScopeRegistry::has_focus`].
    pub fn has_focus(&self) -> bool {
        self.registry.has_focus(&*self.host, self.handle)
    }

    /// Whether `element` belongs to this scope or a scope nested in it.
    pub fn contains(&self, element: K) -> bool {
        self.registry
            .contains_element(&*self.host, self.handle, element)
    }

    fn focus_toward(&mut self, direction: Direction, options: &FocusOptions<'_, K>) -> bool {
        self.registry
            .focus_in_direction(self.host, self.handle, direction, options)
    }
}
