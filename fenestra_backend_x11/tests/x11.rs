// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The X11 backend driven by the compositor against a recording connection.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fenestra_backend_x11::{Atom, AtomAdvertiser, RootAtoms, X11Backend, X11Error, XConnection};
use fenestra_core::backend::{Scene, SharedSceneFactory, Space};
use fenestra_core::compositor::Compositor;
use fenestra_core::config::CompositorConfig;
use fenestra_core::output::{Output, OutputId};
use fenestra_core::region::Region;
use fenestra_core::suspend::{CompositorState, SuspendReason};
use fenestra_core::time::{Duration, HostTime};
use fenestra_core::window::WindowRef;
use fenestra_effects::support::{EffectId, SupportRegistry};
use kurbo::Rect;

#[derive(Default)]
struct FakeConnection {
    composite: Cell<bool>,
    foreign_owner: Cell<bool>,
    log: RefCell<Vec<String>>,
}

impl FakeConnection {
    fn new() -> Rc<Self> {
        let conn = Self::default();
        conn.composite.set(true);
        Rc::new(conn)
    }

    fn record(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }

    fn take_log(&self) -> Vec<String> {
        self.log.take()
    }
}

impl XConnection for FakeConnection {
    fn has_composite(&self) -> bool {
        self.composite.get()
    }

    fn claim_selection(&self, selection: &str) -> Result<(), X11Error> {
        self.record(format!("claim {selection}"));
        if self.foreign_owner.get() {
            return Err(X11Error::SelectionOwned {
                selection: selection.to_owned(),
            });
        }
        Ok(())
    }

    fn release_selection(&self, selection: &str) {
        self.record(format!("release {selection}"));
    }

    fn redirect_subwindows(&self) -> Result<(), X11Error> {
        self.record("redirect".into());
        Ok(())
    }

    fn unredirect_subwindows(&self) {
        self.record("unredirect".into());
    }

    fn outputs(&self) -> Vec<Output> {
        vec![Output::new(
            OutputId(0),
            Rect::new(0.0, 0.0, 1280.0, 1024.0),
            60_000,
        )]
    }
}

impl RootAtoms for FakeConnection {
    fn intern_atom(&self, name: &str) -> Atom {
        self.record(format!("intern {name}"));
        Atom(u32::try_from(name.len()).unwrap())
    }

    fn append_supported(&self, atom: Atom) {
        self.record(format!("append {}", atom.0));
    }

    fn remove_supported(&self, atom: Atom) {
        self.record(format!("remove {}", atom.0));
    }
}

struct XRenderScene;

impl Scene for XRenderScene {
    fn name(&self) -> &str {
        "xrender"
    }

    fn paint(&mut self, _: &Region, _: &[WindowRef], _: HostTime) -> Duration {
        Duration::from_millis(1)
    }

    fn has_swap_event(&self) -> bool {
        false
    }
}

struct EmptySpace;

impl Space for EmptySpace {
    fn stacking_order(&self) -> Vec<WindowRef> {
        Vec::new()
    }
}

fn compositor(conn: &Rc<FakeConnection>) -> Compositor {
    let factory: SharedSceneFactory =
        Rc::new(|_: &CompositorConfig| Ok(Box::new(XRenderScene) as Box<dyn Scene>));
    let backend = X11Backend::new(Rc::clone(conn), 0).with_scene(factory);
    Compositor::new(Box::new(backend), CompositorConfig::default())
}

#[test]
fn start_claims_selection_then_redirects() {
    let conn = FakeConnection::new();
    let mut compositor = compositor(&conn);
    compositor.start(Rc::new(EmptySpace));

    assert_eq!(compositor.state(), CompositorState::On);
    assert_eq!(compositor.scene_name(), Some("xrender"));
    assert_eq!(conn.take_log(), ["claim _NET_WM_CM_S0", "redirect"]);
}

#[test]
fn suspend_keeps_selection_until_release_timer() {
    let conn = FakeConnection::new();
    let mut compositor = compositor(&conn);
    compositor.start(Rc::new(EmptySpace));
    conn.take_log();

    compositor.suspend(SuspendReason::USER);
    assert_eq!(conn.take_log(), ["unredirect"]);

    let deadline = compositor
        .release_timer()
        .deadline()
        .expect("release timer not armed");
    compositor.dispatch_timers(deadline);
    assert_eq!(conn.take_log(), ["release _NET_WM_CM_S0"]);

    compositor.resume(SuspendReason::USER);
    assert_eq!(conn.take_log(), ["claim _NET_WM_CM_S0", "redirect"]);
}

#[test]
fn foreign_selection_owner_leaves_compositing_off() {
    let conn = FakeConnection::new();
    conn.foreign_owner.set(true);
    let mut compositor = compositor(&conn);
    compositor.start(Rc::new(EmptySpace));

    assert_eq!(compositor.state(), CompositorState::Off);
    assert_eq!(
        conn.take_log(),
        ["claim _NET_WM_CM_S0"],
        "nothing to undo after a failed claim"
    );
}

#[test]
fn missing_extensions_skip_startup() {
    let conn = FakeConnection::new();
    conn.composite.set(false);
    let mut compositor = compositor(&conn);
    compositor.start(Rc::new(EmptySpace));

    assert_eq!(compositor.state(), CompositorState::Off);
    assert!(conn.take_log().is_empty());
}

#[test]
fn dropping_the_compositor_releases_everything() {
    let conn = FakeConnection::new();
    let mut compositor = compositor(&conn);
    compositor.start(Rc::new(EmptySpace));
    conn.take_log();

    drop(compositor);
    assert_eq!(conn.take_log(), ["unredirect", "release _NET_WM_CM_S0"]);
}

#[test]
fn support_names_become_root_atoms() {
    let conn = FakeConnection::new();
    let registry = SupportRegistry::new(Box::new(AtomAdvertiser::new(Rc::clone(&conn))));

    registry.announce(EffectId(1), "_KDE_SLIDE");
    assert_eq!(conn.take_log(), ["intern _KDE_SLIDE", "append 10"]);

    registry.withdraw(EffectId(1), "_KDE_SLIDE");
    assert!(conn.take_log().is_empty(), "removed before frame boundary");
    registry.flush_retired();
    assert_eq!(conn.take_log(), ["remove 10"]);
}
