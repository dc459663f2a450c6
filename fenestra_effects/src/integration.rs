// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic effect channel registry.
//!
//! One [`Integration`] exists per channel. Effects register a callback under
//! their [`EffectId`]; while at least one registrant exists the channel's
//! support name is advertised and, for channels with a protocol surface
//! source, a protocol global is live.
//!
//! ## Reentrancy
//!
//! Callbacks run with no internal borrow held. A callback may add or remove
//! registrants (itself included); the change takes effect for the next
//! broadcast, the current one completes on a snapshot.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use fenestra_core::window::WindowId;
use tracing::debug;

use crate::attribute;
use crate::bus::EventBus;
use crate::channel::{Channel, FadeChannel};
use crate::global::{GlobalHost, ProtocolGlobal};
use crate::support::{EffectId, SupportRegistry};
use crate::update::{FadeState, Update};
use crate::window::{AttributeSink, EffectWindow, EffectWindowRef, Probe, WindowEvent, WindowSource};

/// Callback receiving channel updates.
pub type UpdateCallback<V> = Rc<dyn Fn(&Update<V>)>;

struct State<V> {
    registrants: Vec<(EffectId, UpdateCallback<V>)>,
    global: Option<ProtocolGlobal>,
}

/// Registry and value derivation for one effect channel.
pub struct Integration<C: Channel> {
    support: Rc<SupportRegistry>,
    globals: Option<Rc<dyn GlobalHost>>,
    source: Rc<dyn WindowSource>,
    state: RefCell<State<C::Value>>,
    _channel: PhantomData<fn() -> C>,
}

impl<C: Channel> core::fmt::Debug for Integration<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state.borrow();
        let ids: Vec<EffectId> = state.registrants.iter().map(|(id, _)| *id).collect();
        f.debug_struct("Integration")
            .field("kind", &C::KIND)
            .field("registrants", &ids)
            .field("global", &state.global)
            .finish_non_exhaustive()
    }
}

impl<C: Channel> Integration<C> {
    /// Creates an unregistered channel.
    ///
    /// `globals` is `None` on backends without protocol surfaces.
    pub fn new(
        source: Rc<dyn WindowSource>,
        support: Rc<SupportRegistry>,
        globals: Option<Rc<dyn GlobalHost>>,
    ) -> Self {
        Self {
            support,
            globals,
            source,
            state: RefCell::new(State {
                registrants: Vec::new(),
                global: None,
            }),
            _channel: PhantomData,
        }
    }

    /// Registers `callback` under `effect` and sends it the current value of
    /// every stacked window before returning.
    ///
    /// Adding an already registered effect replaces its callback in place.
    pub fn add(&self, effect: EffectId, callback: UpdateCallback<C::Value>) {
        {
            let mut state = self.state.borrow_mut();
            if let Some(slot) = state.registrants.iter_mut().find(|(id, _)| *id == effect) {
                slot.1 = callback;
            } else {
                let first = state.registrants.is_empty();
                state.registrants.push((effect, callback));
                self.support.announce(effect, C::SUPPORT_NAME);
                if first && C::NEEDS_PROTOCOL_GLOBAL {
                    if let Some(host) = &self.globals {
                        state.global = Some(ProtocolGlobal::create(Rc::clone(host), C::KIND));
                    }
                }
                debug!(kind = ?C::KIND, ?effect, "effect registered");
            }
        }
        for window in self.source.stacked_windows() {
            self.update(&*window);
        }
    }

    /// Unregisters `effect`. The last removal releases the protocol global
    /// and withdraws support.
    pub fn remove(&self, effect: EffectId) {
        let released = {
            let mut state = self.state.borrow_mut();
            let Some(pos) = state.registrants.iter().position(|(id, _)| *id == effect) else {
                return;
            };
            state.registrants.remove(pos);
            self.support.withdraw(effect, C::SUPPORT_NAME);
            debug!(kind = ?C::KIND, ?effect, "effect unregistered");
            if state.registrants.is_empty() {
                state.global.take()
            } else {
                None
            }
        };
        drop(released);
    }

    /// Recomputes the value of `window` and broadcasts it.
    pub fn update(&self, window: &dyn EffectWindow) {
        if self.state.borrow().registrants.is_empty() {
            return;
        }
        if let Some(update) = Self::derive(window) {
            self.broadcast(&update);
        }
    }

    /// Tells every registrant that cached values are stale.
    pub fn reset(&self) {
        self.broadcast(&Update::reset());
    }

    /// Probes the window's sources in priority order. `None` means no update.
    fn derive(window: &dyn EffectWindow) -> Option<Update<C::Value>> {
        let id = window.id();
        if let Some(name) = C::INTERNAL_PROPERTY {
            match window.internal_property(name) {
                Probe::Set(value) => {
                    return Some(match C::from_internal(&value) {
                        Some(v) => Update::valid(id, v),
                        None => Update::invalid(id),
                    });
                }
                Probe::Cleared => return Some(Update::invalid(id)),
                Probe::NotApplicable => {}
            }
        }
        if !C::SURFACE_MASK.is_empty() {
            if let Some(state) = window.surface_state() {
                match C::from_surface(&state) {
                    Probe::Set(v) => return Some(Update::valid(id, v)),
                    Probe::Cleared => return Some(Update::invalid(id)),
                    Probe::NotApplicable => {}
                }
            }
        }
        match window.attribute(C::SUPPORT_NAME) {
            None => Some(Update::invalid(id)),
            Some(bytes) => C::from_attribute(&bytes).map(|v| Update::valid(id, v)),
        }
    }

    fn broadcast(&self, update: &Update<C::Value>) {
        let snapshot: Vec<UpdateCallback<C::Value>> = self
            .state
            .borrow()
            .registrants
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in snapshot {
            callback(update);
        }
    }

    /// Recomputes on events relevant to this channel.
    pub fn handle_event(&self, event: &WindowEvent) {
        let relevant = match event {
            WindowEvent::AttributeChanged { name, .. } => name == C::SUPPORT_NAME,
            WindowEvent::SurfaceCommitted { changes, .. } => changes.intersects(C::SURFACE_MASK),
            WindowEvent::InternalPropertyChanged { name, .. } => {
                C::INTERNAL_PROPERTY == Some(name.as_str())
            }
        };
        if relevant {
            self.update(&**event.window());
        }
    }

    /// Subscribes to change events of `window` and sends its current value.
    pub fn window_added(self: &Rc<Self>, bus: &EventBus, window: &EffectWindowRef) {
        let weak = Rc::downgrade(self);
        bus.subscribe(
            window.id(),
            C::KIND,
            Rc::new(move |event| {
                if let Some(this) = weak.upgrade() {
                    this.handle_event(event);
                }
            }),
        );
        self.update(&**window);
    }

    /// Drops the event subscription of a closed window.
    pub fn window_removed(&self, bus: &EventBus, window: WindowId) {
        bus.unsubscribe(window, C::KIND);
    }

    /// Number of registered effects.
    #[must_use]
    pub fn registrant_count(&self) -> usize {
        self.state.borrow().registrants.len()
    }

    /// Whether `effect` is registered.
    #[must_use]
    pub fn is_registered(&self, effect: EffectId) -> bool {
        self.state
            .borrow()
            .registrants
            .iter()
            .any(|(id, _)| *id == effect)
    }

    /// Whether the channel's protocol global is live.
    #[must_use]
    pub fn has_global(&self) -> bool {
        self.state.borrow().global.is_some()
    }
}

impl Integration<FadeChannel> {
    /// Publishes the compositor's fade state to clients.
    pub fn change_state(&self, sink: &dyn AttributeSink, state: FadeState) {
        debug!(?state, "fade state published");
        sink.set_attribute(attribute::FADE_STATE, &attribute::encode_fade(state));
    }
}
