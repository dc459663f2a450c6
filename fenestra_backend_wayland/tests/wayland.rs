// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation feedback and protocol globals against fakes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fenestra_backend_wayland::{
    GlobalAdvertiser, GlobalRegistry, OutputLayout, PresentEvent, PresentEventQueue,
    SubmissionId, WaylandBackend,
};
use fenestra_backend_x11::{Atom, AtomAdvertiser, RootAtoms};
use fenestra_core::backend::{FrameObserver, Scene, SharedSceneFactory, Space};
use fenestra_core::compositor::Compositor;
use fenestra_core::config::CompositorConfig;
use fenestra_core::output::{Output, OutputId};
use fenestra_core::region::Region;
use fenestra_core::suspend::CompositorState;
use fenestra_core::time::{Duration, HostTime};
use fenestra_core::window::WindowRef;
use fenestra_effects::Effects;
use fenestra_effects::global::GlobalHost;
use fenestra_effects::support::{EffectId, SupportRegistry};
use fenestra_effects::window::{EffectWindowRef, WindowSource};
use kurbo::Rect;

struct GlScene;

impl Scene for GlScene {
    fn name(&self) -> &str {
        "egl"
    }

    fn paint(&mut self, _: &Region, _: &[WindowRef], _: HostTime) -> Duration {
        Duration::from_millis(2)
    }
}

struct EmptySpace;

impl Space for EmptySpace {
    fn stacking_order(&self) -> Vec<WindowRef> {
        Vec::new()
    }
}

fn started_compositor() -> Compositor {
    let layout = OutputLayout::new(vec![Output::new(
        OutputId(1),
        Rect::new(0.0, 0.0, 1920.0, 1080.0),
        60_000,
    )]);
    let factory: SharedSceneFactory =
        Rc::new(|_: &CompositorConfig| Ok(Box::new(GlScene) as Box<dyn Scene>));
    let backend = WaylandBackend::new(layout).with_scene(factory);
    let mut compositor = Compositor::new(Box::new(backend), CompositorConfig::default());
    compositor.start(Rc::new(EmptySpace));
    compositor
}

fn presented(id: u64) -> PresentEvent {
    PresentEvent::Presented {
        id: SubmissionId(id),
        presented_at: HostTime(0),
        refresh: None,
        output: Some(OutputId(1)),
    }
}

#[test]
fn presentation_feedback_completes_the_swap() {
    let mut compositor = started_compositor();
    assert_eq!(compositor.state(), CompositorState::On);
    assert!(compositor.is_swap_pending(), "first frame not submitted");

    let mut queue = PresentEventQueue::default();
    queue.push(presented(1));
    assert_eq!(queue.drain_into(&mut compositor), 1);
    assert!(!compositor.is_swap_pending());
    assert!(compositor.composite_timer().is_active());
    assert!(queue.is_empty());
}

#[test]
fn discarded_frames_also_complete_the_swap() {
    let mut compositor = started_compositor();
    let mut queue = PresentEventQueue::default();
    queue.push(PresentEvent::Discarded {
        id: SubmissionId(1),
    });
    queue.drain_into(&mut compositor);
    assert!(!compositor.is_swap_pending());
}

#[test]
fn surplus_feedback_is_ignored() {
    let mut compositor = started_compositor();
    let mut queue = PresentEventQueue::default();
    queue.push(presented(1));
    queue.push(presented(2));
    assert_eq!(queue.drain_into(&mut compositor), 2);
    assert!(!compositor.is_swap_pending());
    assert_eq!(compositor.msc(), 1);
}

// ---------------------------------------------------------------------------
// Globals
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Registry {
    next: Cell<u32>,
    live: RefCell<Vec<(u32, String, u32)>>,
}

impl Registry {
    fn interfaces(&self) -> Vec<String> {
        self.live.borrow().iter().map(|(_, i, _)| i.clone()).collect()
    }
}

impl GlobalRegistry for Registry {
    fn create_global(&self, interface: &str, version: u32) -> u32 {
        let name = self.next.get() + 1;
        self.next.set(name);
        self.live
            .borrow_mut()
            .push((name, interface.to_owned(), version));
        name
    }

    fn remove_global(&self, name: u32) {
        self.live.borrow_mut().retain(|(n, _, _)| *n != name);
    }
}

/// Root window of the Xwayland server.
#[derive(Default)]
struct Xwayland {
    atoms: RefCell<Vec<String>>,
    supported: RefCell<Vec<Atom>>,
}

impl Xwayland {
    fn supported_names(&self) -> Vec<String> {
        let atoms = self.atoms.borrow();
        self.supported
            .borrow()
            .iter()
            .map(|a| atoms[usize::try_from(a.0).unwrap() - 1].clone())
            .collect()
    }
}

impl RootAtoms for Xwayland {
    fn intern_atom(&self, name: &str) -> Atom {
        let mut atoms = self.atoms.borrow_mut();
        let index = match atoms.iter().position(|a| a == name) {
            Some(index) => index,
            None => {
                atoms.push(name.to_owned());
                atoms.len() - 1
            }
        };
        Atom(u32::try_from(index + 1).unwrap())
    }

    fn append_supported(&self, atom: Atom) {
        self.supported.borrow_mut().push(atom);
    }

    fn remove_supported(&self, atom: Atom) {
        self.supported.borrow_mut().retain(|a| *a != atom);
    }
}

struct NoWindows;

impl WindowSource for NoWindows {
    fn stacked_windows(&self) -> Vec<EffectWindowRef> {
        Vec::new()
    }
}

fn effects(registry: &Rc<Registry>, xwayland: &Rc<Xwayland>) -> Effects {
    let advertiser = GlobalAdvertiser::new(Rc::clone(registry));
    let support = Rc::new(SupportRegistry::new(Box::new(AtomAdvertiser::new(
        Rc::clone(xwayland),
    ))));
    Effects::new(Rc::new(NoWindows), support, Some(Rc::new(advertiser)))
}

#[test]
fn manager_global_follows_registration() {
    let registry = Rc::new(Registry::default());
    let xwayland = Rc::new(Xwayland::default());
    let effects = effects(&registry, &xwayland);

    effects.contrast.add(EffectId(1), Rc::new(|_| {}));
    assert_eq!(registry.interfaces(), ["org_kde_kwin_contrast_manager"]);
    assert_eq!(registry.live.borrow()[0].2, 2, "contrast manager version");
    assert_eq!(
        xwayland.supported_names(),
        ["_KDE_NET_WM_BACKGROUND_CONTRAST_REGION"],
        "support names are root window atoms"
    );

    effects.contrast.remove(EffectId(1));
    assert!(
        registry.interfaces().is_empty(),
        "manager global outlived its last registrant"
    );
    assert_eq!(xwayland.supported_names().len(), 1, "retracted before frame boundary");

    effects.support().frame_finished(1);
    assert!(xwayland.supported_names().is_empty());
}

#[test]
fn fade_has_no_manager_global() {
    let registry = Rc::new(Registry::default());
    let xwayland = Rc::new(Xwayland::default());
    let effects = effects(&registry, &xwayland);

    effects.fade.add(EffectId(1), Rc::new(|_| {}));
    assert!(registry.interfaces().is_empty());
    assert_eq!(xwayland.supported_names(), ["_KDE_KWIN_KSCREEN_SUPPORT"]);
    assert!(!effects.fade.has_global());

    let advertiser = GlobalAdvertiser::new(Rc::clone(&registry));
    let id = advertiser.create_global(fenestra_effects::channel::ChannelKind::Fade);
    advertiser.remove_global(id);
    assert!(registry.interfaces().is_empty());
}
