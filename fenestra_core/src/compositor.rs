// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compositor platform: lifecycle, frame timer, and damage aggregation.
//!
//! [`Compositor`] turns repaint requests into painted frames. It owns the
//! lifecycle state machine, the suspend-reason bitset, the single composite
//! timer, the accumulated repaint region, and the buffer-swap bookkeeping.
//! Window-system specifics are injected as a [`Backend`]; the window list
//! comes from a [`Space`].
//!
//! # Frame loop
//!
//! ```text
//!   add_repaint / schedule_repaint
//!       │
//!       ▼
//!   set_composite_timer ──► (host waits until next_deadline)
//!                                   │
//!                                   ▼
//!   dispatch_timers ──► perform_compositing
//!                           ├── prepare_composition ──► Frame { repaints, windows }
//!                           ├── Scene::paint ──► paint duration
//!                           └── about_to_swap_buffers (swap in flight)
//!                                   │
//!                                   ▼
//!   buffer_swap_complete ──► delay = refresh − margin − worst paint
//!                       └──► set_composite_timer
//! ```
//!
//! # Single flight
//!
//! While a buffer swap is pending no frame is built and no timer is armed.
//! Repaints requested in the meantime accumulate in the repaint region and
//! are painted by the first frame after the swap completes. The region is
//! taken atomically when a frame is built, so a repaint is painted exactly
//! once.
//!
//! # Contract violations
//!
//! Announcing a swap while one is pending, and suspending or resuming with an
//! empty reason, are caller bugs and panic.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::backend::{Backend, FrameObserver, SafePoint, Scene, Space, SpaceEvent};
use crate::config::CompositorConfig;
use crate::dirty::{FULL_REPAINT, OutputDirty};
use crate::error::{Error, Result};
use crate::output::{OutputId, refresh_length};
use crate::pacing::{PaintDurations, next_frame_delay};
use crate::region::Region;
use crate::suspend::{CompositorState, SuspendReason};
use crate::time::{Duration, HostTime};
use crate::timer::DeadlineTimer;
use crate::trace::{
    FramePreparedEvent, FrameSkippedEvent, PaintEvent, SkipReason, StateChangeEvent,
    SwapBeginEvent, SwapCompleteEvent, TimerArmedEvent, TraceSink, Tracer,
};
use crate::window::{WindowRef, raise_elevated};

/// A built frame, ready to be painted.
#[derive(Clone)]
pub struct Frame {
    /// Area to repaint, in global coordinates.
    pub repaints: Region,
    /// Windows to paint, bottom to top, elevated windows last.
    pub windows: Vec<WindowRef>,
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Frame")
            .field("repaints", &self.repaints)
            .field(
                "windows",
                &self.windows.iter().map(|w| w.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The compositor platform.
///
/// Exactly one instance exists per process. All methods run to completion
/// synchronously; the only suspension point is the composite timer, which
/// the host drives through [`next_deadline`](Self::next_deadline) and
/// [`dispatch_timers`](Self::dispatch_timers).
pub struct Compositor {
    backend: Box<dyn Backend>,
    config: CompositorConfig,
    state: CompositorState,
    suspended: SuspendReason,
    space: Option<Rc<dyn Space>>,
    scene: Option<Box<dyn Scene>>,
    repaints: Region,
    timer: DeadlineTimer,
    release_timer: DeadlineTimer,
    delay: Duration,
    swap_pending: bool,
    paint_durations: PaintDurations,
    frames_to_test: u32,
    msc: u64,
    dirty: OutputDirty,
    output_damage: HashMap<OutputId, Region>,
    observers: Vec<Rc<dyn FrameObserver>>,
    tracer: Tracer,
}

impl core::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Compositor")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("suspended", &self.suspended)
            .field("scene", &self.scene.as_ref().map(|s| s.name()))
            .field("delay", &self.delay)
            .field("swap_pending", &self.swap_pending)
            .field("msc", &self.msc)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Creates a stopped compositor. Nothing happens until
    /// [`start`](Self::start).
    #[must_use]
    pub fn new(backend: Box<dyn Backend>, config: CompositorConfig) -> Self {
        let suspended = if config.use_compositing {
            SuspendReason::empty()
        } else {
            SuspendReason::USER
        };
        Self {
            backend,
            state: CompositorState::Off,
            suspended,
            space: None,
            scene: None,
            repaints: Region::new(),
            timer: DeadlineTimer::new(),
            release_timer: DeadlineTimer::new(),
            delay: Duration::ZERO,
            swap_pending: false,
            paint_durations: PaintDurations::new(config.paint_window),
            frames_to_test: config.max_frames_tested,
            msc: 0,
            dirty: OutputDirty::new(),
            output_damage: HashMap::new(),
            observers: Vec::new(),
            tracer: Tracer::none(),
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> CompositorState {
        self.state
    }

    /// Currently held suspend reasons.
    #[must_use]
    pub fn suspended(&self) -> SuspendReason {
        self.suspended
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Delay used the next time the composite timer is armed.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a buffer swap is in flight.
    #[must_use]
    pub fn is_swap_pending(&self) -> bool {
        self.swap_pending
    }

    /// The composite timer.
    #[must_use]
    pub fn composite_timer(&self) -> &DeadlineTimer {
        &self.timer
    }

    /// The timer releasing the compositing selection after a suspend.
    #[must_use]
    pub fn release_timer(&self) -> &DeadlineTimer {
        &self.release_timer
    }

    /// Repaints accumulated for the next frame.
    #[must_use]
    pub fn pending_repaints(&self) -> &Region {
        &self.repaints
    }

    /// Media stream counter: number of frames painted so far.
    #[must_use]
    pub fn msc(&self) -> u64 {
        self.msc
    }

    /// Name of the active scene.
    #[must_use]
    pub fn scene_name(&self) -> Option<&str> {
        self.scene.as_ref().map(|s| s.name())
    }

    /// Worst paint duration of the recent frame windows.
    #[must_use]
    pub fn max_paint_duration(&self) -> Duration {
        self.paint_durations.max()
    }

    /// Damage painted on `output` by the most recent frame.
    #[must_use]
    pub fn output_damage(&self, output: OutputId) -> Option<&Region> {
        self.output_damage.get(&output)
    }

    /// The injected backend.
    #[must_use]
    pub fn backend(&self) -> &dyn Backend {
        &*self.backend
    }

    /// Registers an observer of frame boundaries.
    pub fn add_frame_observer(&mut self, observer: Rc<dyn FrameObserver>) {
        self.observers.push(observer);
    }

    /// Installs a trace sink, replacing any previous one.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer.replace(Some(sink));
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Starts compositing on `space`.
    ///
    /// The first call binds the space; structural events are ignored before
    /// that. Suspension and "compositing not possible" are valid steady
    /// states and only logged. Backend and scene failures are logged and
    /// leave the compositor `Off` with backend resources torn down.
    pub fn start(&mut self, space: Rc<dyn Space>) {
        if self.space.is_none() {
            debug!(backend = self.backend.name(), "binding space");
            self.space = Some(space);
        }

        if !self.suspended.is_empty() {
            let mut reasons = Vec::new();
            if self.suspended.contains(SuspendReason::USER) {
                reasons.push("disabled by user");
            }
            if self.suspended.contains(SuspendReason::RULE) {
                reasons.push("disabled by window");
            }
            if self.suspended.contains(SuspendReason::SCRIPT) {
                reasons.push("disabled by script");
            }
            debug!(?reasons, "compositing is suspended");
            return;
        }

        if !self.backend.compositing_possible() {
            error!(backend = self.backend.name(), "compositing is not possible");
            return;
        }

        if let Err(err) = self.start_scene() {
            warn!(%err, "compositing not possible, continuing without it");
            self.scene = None;
            self.set_state(CompositorState::Off);
            self.backend.teardown();
        }
    }

    fn start_scene(&mut self) -> Result<()> {
        if self.state != CompositorState::Off {
            return Ok(());
        }
        self.set_state(CompositorState::Starting);

        self.backend.prepare()?;
        let scene = self.create_scene()?;
        self.backend.create_renderer()?;
        self.scene = Some(scene);
        self.frames_to_test = self.config.max_frames_tested;

        self.set_state(CompositorState::On);

        // Render at least once.
        self.full_repaint();
        self.perform_compositing();
        Ok(())
    }

    /// Tries each scene factory in order. Error messages of failed attempts
    /// are chained in attempt order.
    fn create_scene(&self) -> Result<Box<dyn Scene>> {
        let factories = self.backend.scene_factories();
        if factories.is_empty() {
            return Err(Error::NoScene);
        }
        let mut chain = String::new();
        for factory in &factories {
            match factory(&self.config) {
                Ok(scene) => {
                    if !chain.is_empty() {
                        debug!(error = %chain, "fallback after error");
                    }
                    info!(scene = scene.name(), "created scene");
                    return Ok(scene);
                }
                Err(err) => {
                    if !chain.is_empty() {
                        chain.push(' ');
                    }
                    chain.push_str(&err.to_string());
                }
            }
        }
        Err(Error::SceneCreation { chain })
    }

    /// Stops compositing and drops the scene. The compositing selection is
    /// kept; it is released by the release timer armed in
    /// [`suspend`](Self::suspend).
    pub fn stop(&mut self) {
        if matches!(
            self.state,
            CompositorState::Off | CompositorState::Stopping
        ) {
            return;
        }
        self.set_state(CompositorState::Stopping);

        self.backend.finish_compositing();
        self.scene = None;
        self.swap_pending = false;
        self.timer.stop();
        self.repaints.clear();

        self.set_state(CompositorState::Off);
        for observer in self.observers.clone() {
            observer.compositing_stopped();
        }
    }

    /// Suspends compositing for `reason`.
    ///
    /// # Panics
    ///
    /// Panics if `reason` is empty.
    pub fn suspend(&mut self, reason: SuspendReason) {
        assert!(!reason.is_empty(), "suspend requires a reason");
        self.suspended |= reason;

        let now = self.backend.now();
        self.release_timer.start(
            now,
            Duration::from_millis(self.config.selection_release_delay_ms),
        );
        self.stop();
    }

    /// Clears `reason` and starts again. Compositing only resumes once no
    /// other reason is held.
    ///
    /// # Panics
    ///
    /// Panics if `reason` is empty.
    pub fn resume(&mut self, reason: SuspendReason) {
        assert!(!reason.is_empty(), "resume requires a reason");
        self.suspended.remove(reason);

        match self.space.clone() {
            Some(space) => self.start(space),
            None => debug!("resume before the first start, nothing to do"),
        }
    }

    /// Resumes with every reason when suspended, otherwise suspends on behalf
    /// of the user.
    pub fn toggle(&mut self) {
        if self.suspended.is_empty() {
            self.suspend(SuspendReason::USER);
        } else {
            self.resume(SuspendReason::ALL);
        }
    }

    /// Clears every suspend reason and restarts compositing.
    pub fn reinitialize(&mut self) {
        self.suspended = SuspendReason::empty();
        self.stop();
        if let Some(space) = self.space.clone() {
            self.start(space);
        }
    }

    /// Applies a new configuration.
    ///
    /// A suspended compositor just stops; otherwise compositing restarts with
    /// the new settings and repaints everything.
    pub fn config_changed(&mut self, config: CompositorConfig) {
        self.paint_durations = PaintDurations::new(config.paint_window);
        self.config = config;
        if !self.suspended.is_empty() {
            self.stop();
            return;
        }
        self.reinitialize();
        self.full_repaint();
    }

    /// Re-evaluates window-rule blocking.
    ///
    /// A blocking `window` suspends with [`SuspendReason::RULE`]. `None`
    /// checks whether any window still blocks and resumes the rule reason if
    /// none does.
    pub fn update_blocking(&mut self, window: Option<&WindowRef>) {
        match window {
            Some(window) => {
                if window.is_blocking_compositing()
                    && !self.suspended.contains(SuspendReason::RULE)
                {
                    debug!(window = ?window.id(), "window blocks compositing");
                    self.suspend(SuspendReason::RULE);
                }
            }
            None => {
                if !self.suspended.contains(SuspendReason::RULE) {
                    return;
                }
                let blocked = self
                    .space
                    .as_ref()
                    .is_some_and(|space| space.windows().iter().any(|w| w.is_blocking_compositing()));
                if !blocked {
                    self.resume(SuspendReason::RULE);
                }
            }
        }
    }

    fn set_state(&mut self, to: CompositorState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        debug!(?from, ?to, "compositor state changed");
        self.tracer.state_change(&StateChangeEvent {
            from,
            to,
            suspended: self.suspended,
        });
    }

    // -----------------------------------------------------------------------
    // Repaint requests
    // -----------------------------------------------------------------------

    /// Ensures a frame will be built. No-op unless compositing is on.
    pub fn schedule_repaint(&mut self) {
        if self.state.is_on() {
            self.set_composite_timer();
        }
    }

    /// Adds `region` to the next frame. No-op unless compositing is on.
    pub fn add_repaint(&mut self, region: &Region) {
        if !self.state.is_on() {
            return;
        }
        self.repaints.union(region);
        self.schedule_repaint();
    }

    /// Marks every output for a full repaint. No-op unless compositing is
    /// on.
    pub fn full_repaint(&mut self) {
        if !self.state.is_on() {
            return;
        }
        for output in self.backend.outputs() {
            self.dirty.mark(output.id, FULL_REPAINT);
        }
        self.schedule_repaint();
    }

    /// Reacts to a structural change of the space. Ignored before the first
    /// [`start`](Self::start).
    pub fn handle_space_event(&mut self, event: SpaceEvent) {
        if self.space.is_none() {
            return;
        }
        match event {
            SpaceEvent::StackingChanged | SpaceEvent::DesktopChanged => self.full_repaint(),
            SpaceEvent::OutputRemoved(output) => {
                debug!(?output, "purging output damage");
                self.dirty.remove(output);
                self.output_damage.remove(&output);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Buffer swaps
    // -----------------------------------------------------------------------

    /// Marks a buffer swap as in flight. The next frame waits for
    /// [`buffer_swap_complete`](Self::buffer_swap_complete).
    ///
    /// The compositor announces the swap itself after painting with a scene
    /// whose [`Scene::has_swap_event`] is `true`; hosts must not call this
    /// for such scenes. It is only for hosts that submit buffers outside
    /// [`dispatch_timers`](Self::dispatch_timers).
    ///
    /// # Panics
    ///
    /// Panics if a swap is already pending.
    pub fn about_to_swap_buffers(&mut self) {
        assert!(!self.swap_pending, "buffer swap announced while one is pending");
        self.swap_pending = true;
        self.tracer.swap_begin(&SwapBeginEvent {
            msc: self.msc,
            now: self.backend.now(),
        });
    }

    /// Completes the in-flight buffer swap and schedules the next frame
    /// shortly before the next vertical blank.
    ///
    /// A completion without a pending swap is logged and ignored.
    pub fn buffer_swap_complete(&mut self, presented: bool) {
        if !self.swap_pending {
            debug!(presented, "buffer swap completed without a pending swap");
            return;
        }
        self.swap_pending = false;

        let refresh = refresh_length(&self.backend.outputs());
        self.delay = next_frame_delay(
            refresh,
            self.config.vblank_margin_divisor,
            self.paint_durations.max(),
        );
        self.tracer.swap_complete(&SwapCompleteEvent {
            msc: self.msc,
            now: self.backend.now(),
            presented,
            delay: self.delay,
        });

        self.timer.stop();
        self.set_composite_timer();
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    fn set_composite_timer(&mut self) {
        if self.timer.is_active() || self.swap_pending {
            return;
        }
        let wait_ms = self.delay.as_millis().min(self.config.max_wait_ms);
        let wait = Duration::from_millis(wait_ms);
        let now = self.backend.now();
        self.timer.start(now, wait);
        self.tracer.timer_armed(&TimerArmedEvent {
            now,
            delay: self.delay,
            wait,
        });
    }

    /// The earliest armed timer deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        match (self.timer.deadline(), self.release_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fires every timer due at `now`.
    pub fn dispatch_timers(&mut self, now: HostTime) {
        if self.release_timer.fire_if_due(now) {
            self.release_compositor_selection(now);
        }
        if self.timer.fire_if_due(now) {
            self.perform_compositing();
        }
    }

    fn release_compositor_selection(&mut self, now: HostTime) {
        match self.state {
            CompositorState::On => {}
            CompositorState::Off => {
                debug!("releasing compositor selection");
                self.backend.release_selection();
            }
            CompositorState::Starting | CompositorState::Stopping => {
                self.release_timer.start(
                    now,
                    Duration::from_millis(self.config.selection_release_delay_ms),
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    /// Builds and paints one frame if there is anything to paint.
    pub fn perform_compositing(&mut self) {
        let Some(frame) = self.prepare_composition() else {
            return;
        };

        self.msc += 1;
        self.create_safe_point(SafePoint::PreFrame);

        let now = self.backend.now();
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let duration = scene.paint(&frame.repaints, &frame.windows, now);

        self.paint_durations.record(duration);
        self.tracer.paint(&PaintEvent {
            msc: self.msc,
            start: now,
            duration,
        });
        self.create_safe_point(SafePoint::PostFrame);
        self.retard_next_composition();

        for observer in self.observers.clone() {
            observer.frame_finished(self.msc);
        }

        if let Some(space) = &self.space {
            for window in frame.windows.iter().filter(|w| w.is_releasable_remnant()) {
                space.release_remnant(window);
            }
        }
    }

    /// Builds the next frame.
    ///
    /// Returns `None` when the overlay is hidden, a swap is pending,
    /// compositing is not running, or there is nothing to repaint. In the
    /// last case the scene goes idle and the delay drops to zero so the next
    /// genuine request paints without lag.
    pub fn prepare_composition(&mut self) -> Option<Frame> {
        self.timer.stop();

        let now = self.backend.now();
        if !self.backend.overlay_visible() {
            self.skip(now, SkipReason::OverlayHidden);
            return None;
        }
        if self.swap_pending {
            self.skip(now, SkipReason::SwapPending);
            return None;
        }
        let space = self.space.clone()?;
        let scene = self.scene.as_mut()?;

        let mut windows = Vec::new();
        let mut damaged = 0;
        let mut has_pending = false;
        let mut window_repaints = Region::new();
        for window in space.stacking_order() {
            if !window.ready_for_painting() {
                continue;
            }
            if window.has_pending_repaints() {
                has_pending = true;
                window_repaints.union(&window.pending_repaints());
            }
            if window.native_damage_reset_and_fetch() {
                damaged += 1;
            }
            windows.push(window);
        }

        if damaged > 0 {
            scene.trigger_fence();
            self.backend.flush();
        }

        raise_elevated(&mut windows);

        let outputs = self.backend.outputs();
        for id in self.dirty.drain(FULL_REPAINT) {
            if let Some(output) = outputs.iter().find(|o| o.id == id) {
                self.repaints.union_rect(output.geometry);
            }
        }
        self.repaints.union(&window_repaints);

        if self.repaints.is_empty() && !has_pending {
            scene.idle();
            self.delay = Duration::ZERO;
            self.skip(now, SkipReason::NoDamage);
            return None;
        }

        let repaints = self.repaints.take();
        for output in &outputs {
            self.output_damage
                .insert(output.id, repaints.clip_to(output.geometry));
        }

        self.tracer.frame_prepared(&FramePreparedEvent {
            msc: self.msc + 1,
            now,
            windows: windows.len(),
            damaged,
            rects: repaints.rects().len(),
        });
        Some(Frame { repaints, windows })
    }

    fn skip(&mut self, now: HostTime, reason: SkipReason) {
        self.tracer
            .frame_skipped(&FrameSkippedEvent { now, reason });
    }

    /// Paces the next frame after painting. Scenes with swap events wait for
    /// [`buffer_swap_complete`](Self::buffer_swap_complete); others are paced
    /// by one refresh length.
    fn retard_next_composition(&mut self) {
        let has_swap_event = self.scene.as_ref().is_some_and(|s| s.has_swap_event());
        if has_swap_event {
            self.about_to_swap_buffers();
            return;
        }
        self.delay = refresh_length(&self.backend.outputs());
        self.set_composite_timer();
    }

    fn create_safe_point(&mut self, point: SafePoint) {
        if self.frames_to_test == 0 {
            return;
        }
        if !self.scene.as_ref().is_some_and(|s| s.is_opengl()) {
            return;
        }
        self.backend.create_safe_point(point);
        if point == SafePoint::PostFrame {
            self.frames_to_test -= 1;
            if self.frames_to_test == 0 {
                self.backend
                    .create_safe_point(SafePoint::PostLastGuardedFrame);
            }
        }
    }
}

impl Drop for Compositor {
    fn drop(&mut self) {
        self.stop();
        self.backend.release_selection();
    }
}
