// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effect integration channels.
//!
//! Visual effects (blur, background contrast, slide, fade) need per-window
//! hints from clients. This crate derives those hints from whichever source a
//! window offers and broadcasts them as typed [`Update`](update::Update)s.
//!
//! # Architecture
//!
//! ```text
//!   host window events ──► EventBus ──► Integration<C>::handle_event
//!                                              │
//!          internal property / surface state / legacy attribute
//!                                              │
//!                                              ▼
//!                                   Update<C::Value> ──► effect callbacks
//! ```
//!
//! **[`integration`]** — [`Integration`](integration::Integration), the
//! generic per-channel registry.
//!
//! **[`channel`]** — The four channel descriptions.
//!
//! **[`support`]** — [`SupportRegistry`](support::SupportRegistry),
//! reference-counted support advertisement with deferred retirement.
//!
//! **[`bus`]** — Per-window change notification routing.
//!
//! **[`global`]** — Protocol globals held while a channel is registered.
//!
//! **[`attribute`]**, **[`surface`]**, **[`window`]** — Window sources and
//! their codecs.
//!
//! **[`update`]**, **[`color`]** — Value types effects receive.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod attribute;
pub mod bus;
pub mod channel;
pub mod color;
pub mod global;
pub mod integration;
pub mod support;
pub mod surface;
pub mod update;
pub mod window;

use std::rc::Rc;

use fenestra_core::window::WindowId;

use crate::bus::EventBus;
use crate::channel::{BlurChannel, ContrastChannel, FadeChannel, SlideChannel};
use crate::global::GlobalHost;
use crate::integration::Integration;
use crate::support::SupportRegistry;
use crate::window::{EffectWindowRef, WindowEvent, WindowSource};

/// The four channels sharing one event bus and support registry.
#[derive(Debug)]
pub struct Effects {
    /// Blur-behind regions.
    pub blur: Rc<Integration<BlurChannel>>,
    /// Background contrast.
    pub contrast: Rc<Integration<ContrastChannel>>,
    /// Slide animations.
    pub slide: Rc<Integration<SlideChannel>>,
    /// Global fade state.
    pub fade: Rc<Integration<FadeChannel>>,
    support: Rc<SupportRegistry>,
    bus: EventBus,
}

impl Effects {
    /// Creates every channel in the unregistered state.
    pub fn new(
        source: Rc<dyn WindowSource>,
        support: Rc<SupportRegistry>,
        globals: Option<Rc<dyn GlobalHost>>,
    ) -> Self {
        Self {
            blur: Rc::new(Integration::new(
                Rc::clone(&source),
                Rc::clone(&support),
                globals.clone(),
            )),
            contrast: Rc::new(Integration::new(
                Rc::clone(&source),
                Rc::clone(&support),
                globals.clone(),
            )),
            slide: Rc::new(Integration::new(
                Rc::clone(&source),
                Rc::clone(&support),
                globals.clone(),
            )),
            fade: Rc::new(Integration::new(source, Rc::clone(&support), globals)),
            support,
            bus: EventBus::new(),
        }
    }

    /// Subscribes every channel to `window` and sends its current values.
    pub fn window_added(&self, window: &EffectWindowRef) {
        self.blur.window_added(&self.bus, window);
        self.contrast.window_added(&self.bus, window);
        self.slide.window_added(&self.bus, window);
        self.fade.window_added(&self.bus, window);
    }

    /// Forgets a closed window.
    pub fn window_removed(&self, window: WindowId) {
        self.bus.unsubscribe_window(window);
    }

    /// Routes a host change notification.
    pub fn publish(&self, event: &WindowEvent) {
        self.bus.publish(event);
    }

    /// Marks every cached value stale.
    pub fn reset_all(&self) {
        self.blur.reset();
        self.contrast.reset();
        self.slide.reset();
        self.fade.reset();
    }

    /// The shared support registry.
    #[must_use]
    pub fn support(&self) -> &Rc<SupportRegistry> {
        &self.support
    }

    /// The shared event bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}
