// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Backend`] implementation for a Wayland display server.
//!
//! The compositor is the display server, so there is no selection to claim
//! and no window to redirect. Outputs are owned by the host's DRM or nested
//! output code and shared through an [`OutputLayout`].

use std::cell::RefCell;
use std::rc::Rc;

use fenestra_core::backend::{Backend, SceneFactory, SharedSceneFactory, share_factories};
use fenestra_core::clock::FrameClock;
use fenestra_core::output::{Output, OutputId};
use fenestra_core::time::HostTime;
use tracing::info;

/// Shared, host-maintained list of outputs.
#[derive(Clone, Debug, Default)]
pub struct OutputLayout(Rc<RefCell<Vec<Output>>>);

impl OutputLayout {
    /// Creates a layout holding `outputs`.
    #[must_use]
    pub fn new(outputs: Vec<Output>) -> Self {
        Self(Rc::new(RefCell::new(outputs)))
    }

    /// Adds `output`, replacing an output with the same id.
    pub fn insert(&self, output: Output) {
        let mut outputs = self.0.borrow_mut();
        match outputs.iter_mut().find(|o| o.id == output.id) {
            Some(slot) => *slot = output,
            None => outputs.push(output),
        }
    }

    /// Removes the output `id`. Returns whether it existed.
    pub fn remove(&self, id: OutputId) -> bool {
        let mut outputs = self.0.borrow_mut();
        let before = outputs.len();
        outputs.retain(|o| o.id != id);
        outputs.len() != before
    }

    /// Copy of the current outputs.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Output> {
        self.0.borrow().clone()
    }
}

/// Wayland compositing backend.
pub struct WaylandBackend {
    outputs: OutputLayout,
    clock: FrameClock,
    scenes: Vec<SharedSceneFactory>,
    active: bool,
}

impl core::fmt::Debug for WaylandBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WaylandBackend")
            .field("outputs", &self.outputs)
            .field("clock", &self.clock)
            .field("scenes", &self.scenes.len())
            .field("active", &self.active)
            .finish()
    }
}

impl WaylandBackend {
    /// Creates a backend reading outputs from `outputs`.
    #[must_use]
    pub fn new(outputs: OutputLayout) -> Self {
        Self {
            outputs,
            clock: FrameClock::default(),
            scenes: Vec::new(),
            active: false,
        }
    }

    /// Uses `clock` for frame timestamps, normally
    /// [`CompositorConfig::frame_clock`](fenestra_core::config::CompositorConfig::frame_clock).
    #[must_use]
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Clock id to send in `wp_presentation.clock_id`, so client feedback
    /// timestamps share the frame clock.
    #[must_use]
    pub fn presentation_clock_id(&self) -> u32 {
        self.clock.clock_id()
    }

    /// Appends a scene factory. Factories are tried in insertion order.
    #[must_use]
    pub fn with_scene(mut self, factory: SharedSceneFactory) -> Self {
        self.scenes.push(factory);
        self
    }
}

impl Backend for WaylandBackend {
    fn name(&self) -> &str {
        "wayland"
    }

    fn prepare(&mut self) -> fenestra_core::Result<()> {
        if !self.active {
            info!(clock = ?self.clock, "wayland compositing prepared");
            self.active = true;
        }
        Ok(())
    }

    fn scene_factories(&self) -> Vec<SceneFactory> {
        share_factories(&self.scenes)
    }

    fn outputs(&self) -> Vec<Output> {
        self.outputs.snapshot()
    }

    fn now(&self) -> HostTime {
        self.clock.now()
    }

    fn finish_compositing(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn output(id: u32, rate: u32) -> Output {
        Output::new(OutputId(id), Rect::new(0.0, 0.0, 800.0, 600.0), rate)
    }

    #[test]
    fn layout_changes_are_visible_to_the_backend() {
        let layout = OutputLayout::default();
        let backend = WaylandBackend::new(layout.clone());
        layout.insert(output(1, 60_000));
        layout.insert(output(1, 120_000));
        layout.insert(output(2, 60_000));
        assert_eq!(backend.outputs(), [output(1, 120_000), output(2, 60_000)]);

        assert!(layout.remove(OutputId(1)));
        assert!(!layout.remove(OutputId(1)));
        assert_eq!(backend.outputs(), [output(2, 60_000)]);
    }

    #[test]
    fn presentation_clock_follows_frame_clock() {
        let backend = WaylandBackend::new(OutputLayout::default());
        assert_eq!(backend.presentation_clock_id(), 1);

        let backend = backend.with_clock(FrameClock::Boottime);
        assert_eq!(backend.presentation_clock_id(), 7);
        assert!(backend.now() > fenestra_core::time::HostTime(0));
    }
}
