// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Backend`] implementation over an [`XConnection`].

use std::rc::Rc;

use fenestra_core::backend::{
    Backend, SafePoint, SceneFactory, SharedSceneFactory, share_factories,
};
use fenestra_core::clock::FrameClock;
use fenestra_core::output::Output;
use fenestra_core::time::HostTime;
use tracing::{debug, info};

use crate::connection::XConnection;

/// X11 compositing backend.
pub struct X11Backend<C> {
    conn: Rc<C>,
    selection: String,
    owns_selection: bool,
    redirected: bool,
    clock: FrameClock,
    scenes: Vec<SharedSceneFactory>,
}

impl<C> core::fmt::Debug for X11Backend<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("X11Backend")
            .field("selection", &self.selection)
            .field("owns_selection", &self.owns_selection)
            .field("redirected", &self.redirected)
            .field("clock", &self.clock)
            .field("scenes", &self.scenes.len())
            .finish_non_exhaustive()
    }
}

impl<C: XConnection> X11Backend<C> {
    /// Creates a backend for `screen`. Nothing is claimed until
    /// [`Backend::prepare`].
    pub fn new(conn: Rc<C>, screen: u32) -> Self {
        Self {
            conn,
            selection: format!("_NET_WM_CM_S{screen}"),
            owns_selection: false,
            redirected: false,
            clock: FrameClock::default(),
            scenes: Vec::new(),
        }
    }

    /// Uses `clock` for frame timestamps, normally
    /// [`CompositorConfig::frame_clock`](fenestra_core::config::CompositorConfig::frame_clock).
    #[must_use]
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Appends a scene factory. Factories are tried in insertion order.
    #[must_use]
    pub fn with_scene(mut self, factory: SharedSceneFactory) -> Self {
        self.scenes.push(factory);
        self
    }

    /// Name of the compositing selection.
    #[must_use]
    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Whether the compositing selection is held.
    #[must_use]
    pub fn owns_selection(&self) -> bool {
        self.owns_selection
    }

    /// Whether subwindows are redirected.
    #[must_use]
    pub fn is_redirected(&self) -> bool {
        self.redirected
    }
}

impl<C: XConnection> Backend for X11Backend<C> {
    fn name(&self) -> &str {
        "x11"
    }

    fn compositing_possible(&self) -> bool {
        self.conn.has_composite()
    }

    fn prepare(&mut self) -> fenestra_core::Result<()> {
        if !self.owns_selection {
            self.conn.claim_selection(&self.selection)?;
            self.owns_selection = true;
            info!(selection = %self.selection, "compositing selection claimed");
        }
        if !self.redirected {
            self.conn.redirect_subwindows()?;
            self.redirected = true;
        }
        Ok(())
    }

    fn scene_factories(&self) -> Vec<SceneFactory> {
        share_factories(&self.scenes)
    }

    fn outputs(&self) -> Vec<Output> {
        self.conn.outputs()
    }

    fn now(&self) -> HostTime {
        self.clock.now()
    }

    fn finish_compositing(&mut self) {
        if self.redirected {
            self.conn.unredirect_subwindows();
            self.redirected = false;
            debug!("subwindows unredirected");
        }
    }

    fn release_selection(&mut self) {
        if self.owns_selection {
            self.conn.release_selection(&self.selection);
            self.owns_selection = false;
            info!(selection = %self.selection, "compositing selection released");
        }
    }

    fn overlay_visible(&self) -> bool {
        self.conn.overlay_visible()
    }

    fn create_safe_point(&mut self, point: SafePoint) {
        self.conn.insert_safe_point(point);
    }

    fn flush(&mut self) {
        self.conn.flush();
    }
}
