// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channel scenarios driven through fake windows and backends.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use fenestra_core::backend::FrameObserver;
use fenestra_core::region::Region;
use fenestra_core::window::WindowId;
use fenestra_effects::Effects;
use fenestra_effects::attribute::{BLUR_REGION, FADE_STATE};
use fenestra_effects::channel::ChannelKind;
use fenestra_effects::global::{GlobalHost, GlobalId};
use fenestra_effects::integration::UpdateCallback;
use fenestra_effects::support::{EffectId, SupportAdvertiser, SupportRegistry, SupportToken};
use fenestra_effects::surface::{SurfaceChanges, SurfaceState};
use fenestra_effects::update::{FadeState, Update};
use fenestra_effects::window::{
    AttributeSink, EffectWindow, EffectWindowRef, InternalValue, Probe, WindowEvent,
    WindowSource,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeWindow {
    id: u64,
    attributes: RefCell<HashMap<String, Vec<u8>>>,
    surface: RefCell<Option<SurfaceState>>,
    internal: RefCell<HashMap<String, Probe<InternalValue>>>,
}

impl FakeWindow {
    fn new(id: u64) -> Rc<Self> {
        Rc::new(Self {
            id,
            ..Self::default()
        })
    }

    fn set_attribute(&self, name: &str, words: &[u32]) {
        let bytes = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        self.attributes.borrow_mut().insert(name.to_owned(), bytes);
    }

    fn clear_attribute(&self, name: &str) {
        self.attributes.borrow_mut().remove(name);
    }

    fn set_internal(&self, name: &str, value: Probe<InternalValue>) {
        self.internal.borrow_mut().insert(name.to_owned(), value);
    }
}

impl EffectWindow for FakeWindow {
    fn id(&self) -> WindowId {
        WindowId(self.id)
    }

    fn internal_property(&self, name: &str) -> Probe<InternalValue> {
        self.internal.borrow().get(name).cloned().unwrap_or_default()
    }

    fn surface_state(&self) -> Option<SurfaceState> {
        self.surface.borrow().clone()
    }

    fn attribute(&self, name: &str) -> Option<Vec<u8>> {
        self.attributes.borrow().get(name).cloned()
    }
}

#[derive(Default)]
struct FakeSource {
    windows: RefCell<Vec<EffectWindowRef>>,
}

impl WindowSource for FakeSource {
    fn stacked_windows(&self) -> Vec<EffectWindowRef> {
        self.windows.borrow().clone()
    }
}

#[derive(Default)]
struct AdvertLog {
    next: u32,
    live: Vec<(u32, String)>,
}

struct Advertiser(Rc<RefCell<AdvertLog>>);

impl SupportAdvertiser for Advertiser {
    fn advertise(&mut self, name: &str) -> SupportToken {
        let mut log = self.0.borrow_mut();
        log.next += 1;
        let token = log.next;
        log.live.push((token, name.to_owned()));
        SupportToken(token)
    }

    fn retract(&mut self, token: SupportToken) {
        self.0.borrow_mut().live.retain(|(t, _)| *t != token.0);
    }
}

#[derive(Default)]
struct Globals {
    live: RefCell<Vec<ChannelKind>>,
    next: Cell<u32>,
    ids: RefCell<HashMap<u32, ChannelKind>>,
}

impl GlobalHost for Globals {
    fn create_global(&self, kind: ChannelKind) -> GlobalId {
        let id = self.next.get();
        self.next.set(id + 1);
        self.live.borrow_mut().push(kind);
        self.ids.borrow_mut().insert(id, kind);
        GlobalId(id)
    }

    fn remove_global(&self, id: GlobalId) {
        if let Some(kind) = self.ids.borrow_mut().remove(&id.0) {
            self.live.borrow_mut().retain(|k| *k != kind);
        }
    }
}

#[derive(Default)]
struct RootWindow {
    written: RefCell<Vec<(String, Vec<u8>)>>,
}

impl AttributeSink for RootWindow {
    fn set_attribute(&self, name: &str, data: &[u8]) {
        self.written
            .borrow_mut()
            .push((name.to_owned(), data.to_vec()));
    }
}

struct Harness {
    source: Rc<FakeSource>,
    adverts: Rc<RefCell<AdvertLog>>,
    globals: Rc<Globals>,
    effects: Effects,
}

impl Harness {
    fn new() -> Self {
        let source = Rc::new(FakeSource::default());
        let adverts = Rc::new(RefCell::new(AdvertLog::default()));
        let globals = Rc::new(Globals::default());
        let support = Rc::new(SupportRegistry::new(Box::new(Advertiser(adverts.clone()))));
        let effects = Effects::new(source.clone(), support, Some(globals.clone()));
        Self {
            source,
            adverts,
            globals,
            effects,
        }
    }

    fn map(&self, window: &Rc<FakeWindow>) {
        let window: EffectWindowRef = window.clone();
        self.source.windows.borrow_mut().push(window.clone());
        self.effects.window_added(&window);
    }

    fn advertised(&self) -> Vec<String> {
        self.adverts
            .borrow()
            .live
            .iter()
            .map(|(_, n)| n.clone())
            .collect()
    }
}

type Log<T> = Rc<RefCell<Vec<Update<T>>>>;

fn recorder<T: Clone + 'static>() -> (Log<T>, UpdateCallback<T>) {
    let log: Log<T> = Rc::default();
    let sink = log.clone();
    (log, Rc::new(move |u: &Update<T>| sink.borrow_mut().push(u.clone())))
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn two_effects_see_blur_attribute_changes() {
    let h = Harness::new();
    let window = FakeWindow::new(7);
    h.map(&window);

    let (first, cb1) = recorder();
    let (second, cb2) = recorder();
    h.effects.blur.add(EffectId(1), cb1);
    h.effects.blur.add(EffectId(2), cb2);
    first.borrow_mut().clear();
    second.borrow_mut().clear();

    window.set_attribute(BLUR_REGION, &[0, 0, 10, 10]);
    h.effects.publish(&WindowEvent::AttributeChanged {
        window: window.clone(),
        name: BLUR_REGION.into(),
    });
    for log in [&first, &second] {
        let log = log.borrow();
        assert_eq!(log.len(), 1, "one update per attribute change");
        assert!(log[0].base.valid);
        assert_eq!(log[0].base.window, Some(WindowId(7)));
        assert_eq!(log[0].value, Region::from_xywh(&[(0, 0, 10, 10)]));
    }

    window.clear_attribute(BLUR_REGION);
    h.effects.publish(&WindowEvent::AttributeChanged {
        window: window.clone(),
        name: BLUR_REGION.into(),
    });
    let log = first.borrow();
    assert_eq!(log.len(), 2);
    assert!(!log[1].base.valid, "cleared attribute must be invalid");
}

#[test]
fn unrelated_attribute_changes_are_ignored() {
    let h = Harness::new();
    let window = FakeWindow::new(1);
    h.map(&window);
    let (log, cb) = recorder();
    h.effects.blur.add(EffectId(1), cb);
    log.borrow_mut().clear();

    h.effects.publish(&WindowEvent::AttributeChanged {
        window: window.clone(),
        name: "_NET_WM_NAME".into(),
    });
    assert!(log.borrow().is_empty());
}

#[test]
fn internal_windows_update_on_their_own_property() {
    let h = Harness::new();
    let panel = FakeWindow::new(3);
    h.map(&panel);
    let (log, cb) = recorder();
    h.effects.blur.add(EffectId(1), cb);
    log.borrow_mut().clear();

    let area = Region::from_xywh(&[(0, 0, 40, 20)]);
    panel.set_internal("kwin_blur", Probe::Set(InternalValue::Region(area.clone())));
    h.effects.publish(&WindowEvent::InternalPropertyChanged {
        window: panel.clone(),
        name: "kwin_slide".into(),
    });
    assert!(log.borrow().is_empty(), "other channels' properties are ignored");

    h.effects.publish(&WindowEvent::InternalPropertyChanged {
        window: panel.clone(),
        name: "kwin_blur".into(),
    });
    {
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert!(log[0].base.valid);
        assert_eq!(log[0].value, area);
    }

    panel.set_internal("kwin_blur", Probe::Cleared);
    h.effects.publish(&WindowEvent::InternalPropertyChanged {
        window: panel.clone(),
        name: "kwin_blur".into(),
    });
    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert!(!log[1].base.valid, "cleared property must be invalid");
}

#[test]
fn add_sends_initial_state_for_every_stacked_window() {
    let h = Harness::new();
    for id in 1..=3 {
        let window = FakeWindow::new(id);
        window.set_attribute(BLUR_REGION, &[0, 0, 4, 4]);
        h.map(&window);
    }

    let (log, cb) = recorder();
    h.effects.blur.add(EffectId(1), cb);
    let windows: Vec<_> = log.borrow().iter().map(|u| u.base.window).collect();
    assert_eq!(
        windows,
        [Some(WindowId(1)), Some(WindowId(2)), Some(WindowId(3))]
    );
}

#[test]
fn support_follows_registrant_count() {
    let h = Harness::new();
    let effects: Vec<EffectId> = (1..=3).map(EffectId).collect();
    for &e in &effects {
        h.effects.slide.add(e, Rc::new(|_| {}));
    }
    assert_eq!(h.advertised(), ["_KDE_SLIDE"]);

    h.effects.slide.remove(effects[0]);
    h.effects.slide.remove(effects[1]);
    assert_eq!(h.effects.support().live_count(), 1);

    h.effects.slide.remove(effects[2]);
    assert_eq!(h.effects.support().live_count(), 0);
    assert_eq!(
        h.advertised(),
        ["_KDE_SLIDE"],
        "retracted before the next frame boundary"
    );

    h.effects.support().frame_finished(1);
    assert!(h.advertised().is_empty());
}

#[test]
fn readding_before_frame_boundary_keeps_advertisement() {
    let h = Harness::new();
    h.effects.blur.add(EffectId(1), Rc::new(|_| {}));
    h.effects.blur.remove(EffectId(1));
    h.effects.blur.add(EffectId(2), Rc::new(|_| {}));
    h.effects.support().frame_finished(1);
    assert_eq!(h.advertised(), ["_KDE_NET_WM_BLUR_BEHIND_REGION"]);
    assert_eq!(h.adverts.borrow().next, 1, "advertised twice");
}

#[test]
fn effect_can_remove_itself_during_broadcast() {
    let h = Harness::new();
    let window = FakeWindow::new(1);
    h.map(&window);

    let calls = Rc::new(Cell::new(0));
    let blur = Rc::downgrade(&h.effects.blur);
    let counter = calls.clone();
    h.effects.blur.add(
        EffectId(1),
        Rc::new(move |_| {
            counter.set(counter.get() + 1);
            if let Some(blur) = blur.upgrade() {
                blur.remove(EffectId(1));
            }
        }),
    );
    let (other, cb) = recorder();
    h.effects.blur.add(EffectId(2), cb);

    assert_eq!(calls.get(), 1);
    assert!(!h.effects.blur.is_registered(EffectId(1)));
    assert_eq!(other.borrow().len(), 1);
}

#[test]
fn surface_commits_are_filtered_by_mask() {
    let h = Harness::new();
    let window = FakeWindow::new(4);
    *window.surface.borrow_mut() = Some(SurfaceState {
        changed: SurfaceChanges::BLUR,
        blur: Some(Region::from_xywh(&[(1, 1, 2, 2)])),
        ..SurfaceState::default()
    });
    h.map(&window);

    let (blur, cb) = recorder();
    h.effects.blur.add(EffectId(1), cb);
    let (slide, cb) = recorder();
    h.effects.slide.add(EffectId(1), cb);
    blur.borrow_mut().clear();
    slide.borrow_mut().clear();

    h.effects.publish(&WindowEvent::SurfaceCommitted {
        window: window.clone(),
        changes: SurfaceChanges::BLUR,
    });
    assert_eq!(blur.borrow().len(), 1);
    assert!(blur.borrow()[0].base.valid);
    assert!(slide.borrow().is_empty(), "slide reacted to a blur commit");
}

#[test]
fn protocol_globals_live_while_registered() {
    let h = Harness::new();
    h.effects.contrast.add(EffectId(1), Rc::new(|_| {}));
    h.effects.contrast.add(EffectId(2), Rc::new(|_| {}));
    h.effects.fade.add(EffectId(1), Rc::new(|_| {}));
    assert_eq!(*h.globals.live.borrow(), [ChannelKind::Contrast]);
    assert!(!h.effects.fade.has_global());

    h.effects.contrast.remove(EffectId(1));
    assert!(h.effects.contrast.has_global());
    h.effects.contrast.remove(EffectId(2));
    assert!(h.globals.live.borrow().is_empty());
}

#[test]
fn fade_state_is_written_back() {
    let h = Harness::new();
    let root = RootWindow::default();
    h.effects.fade.change_state(&root, FadeState::FadingOut);
    assert_eq!(
        *root.written.borrow(),
        [(FADE_STATE.to_owned(), 1_u32.to_le_bytes().to_vec())]
    );
}

#[test]
fn reset_reaches_every_registrant() {
    let h = Harness::new();
    let (a, cb) = recorder();
    h.effects.fade.add(EffectId(1), cb);
    let (b, cb) = recorder();
    h.effects.fade.add(EffectId(2), cb);

    h.effects.reset_all();
    for log in [&a, &b] {
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].base.window, None);
        assert!(!log[0].base.valid);
    }
}

#[test]
fn removed_windows_stop_receiving_events() {
    let h = Harness::new();
    let window = FakeWindow::new(2);
    h.map(&window);
    let (log, cb) = recorder();
    h.effects.blur.add(EffectId(1), cb);
    log.borrow_mut().clear();

    h.effects.window_removed(WindowId(2));
    h.effects.publish(&WindowEvent::AttributeChanged {
        window: window.clone(),
        name: BLUR_REGION.into(),
    });
    assert!(log.borrow().is_empty());
    assert!(h.effects.bus().is_empty());
}
