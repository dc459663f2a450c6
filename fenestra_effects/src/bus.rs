// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-window change notification bus.
//!
//! Channels subscribe one handler per `(window, channel)` when a window is
//! added and drop it when the window is removed. The host publishes
//! [`WindowEvent`]s; each event reaches the handlers of its window only.
//!
//! Publishing snapshots the handlers first, so a handler may subscribe or
//! unsubscribe (itself included) while being called.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use fenestra_core::window::WindowId;

use crate::channel::ChannelKind;
use crate::window::WindowEvent;

/// A bus handler.
pub type Handler = Rc<dyn Fn(&WindowEvent)>;

/// Routes window events to per-window channel handlers.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<BTreeMap<(WindowId, ChannelKind), Handler>>,
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `handler` for `window` on `kind`.
    ///
    /// Returns `false` and keeps the existing handler if one is already
    /// subscribed.
    pub fn subscribe(&self, window: WindowId, kind: ChannelKind, handler: Handler) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        if handlers.contains_key(&(window, kind)) {
            return false;
        }
        handlers.insert((window, kind), handler);
        true
    }

    /// Drops the handler for `window` on `kind`.
    pub fn unsubscribe(&self, window: WindowId, kind: ChannelKind) -> bool {
        self.handlers.borrow_mut().remove(&(window, kind)).is_some()
    }

    /// Drops every handler of `window`.
    pub fn unsubscribe_window(&self, window: WindowId) {
        self.handlers.borrow_mut().retain(|(w, _), _| *w != window);
    }

    /// Whether a handler exists for `window` on `kind`.
    #[must_use]
    pub fn is_subscribed(&self, window: WindowId, kind: ChannelKind) -> bool {
        self.handlers.borrow().contains_key(&(window, kind))
    }

    /// Number of subscribed handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Returns `true` if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Delivers `event` to the handlers of its window.
    pub fn publish(&self, event: &WindowEvent) {
        let window = event.window().id();
        let snapshot: Vec<Handler> = self
            .handlers
            .borrow()
            .range((window, ChannelKind::Blur)..=(window, ChannelKind::Fade))
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in snapshot {
            handler(event);
        }
    }
}
