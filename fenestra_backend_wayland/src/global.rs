// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Protocol globals for effect channels and support bookkeeping.

use std::collections::BTreeMap;
use std::rc::Rc;

use fenestra_effects::channel::ChannelKind;
use fenestra_effects::global::{GlobalHost, GlobalId};
use fenestra_effects::support::{SupportAdvertiser, SupportToken};
use tracing::warn;

/// The display's global registry.
pub trait GlobalRegistry {
    /// Publishes a global for `interface` at `version`; returns its name.
    /// Names are never zero.
    fn create_global(&self, interface: &str, version: u32) -> u32;

    /// Withdraws the global `name`.
    fn remove_global(&self, name: u32);
}

/// Manager interface and version serving `kind`, if the channel has one.
#[must_use]
pub const fn manager_interface(kind: ChannelKind) -> Option<(&'static str, u32)> {
    match kind {
        ChannelKind::Blur => Some(("org_kde_kwin_blur_manager", 1)),
        ChannelKind::Contrast => Some(("org_kde_kwin_contrast_manager", 2)),
        ChannelKind::Slide => Some(("org_kde_kwin_slide_manager", 1)),
        ChannelKind::Fade => None,
    }
}

/// Creates effect manager globals on a [`GlobalRegistry`].
///
/// Cloning shares the registry.
pub struct GlobalAdvertiser<R> {
    registry: Rc<R>,
}

impl<R> Clone for GlobalAdvertiser<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<R> core::fmt::Debug for GlobalAdvertiser<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlobalAdvertiser").finish_non_exhaustive()
    }
}

impl<R: GlobalRegistry> GlobalAdvertiser<R> {
    /// Creates an advertiser on `registry`.
    pub fn new(registry: Rc<R>) -> Self {
        Self { registry }
    }
}

impl<R: GlobalRegistry> GlobalHost for GlobalAdvertiser<R> {
    fn create_global(&self, kind: ChannelKind) -> GlobalId {
        match manager_interface(kind) {
            Some((interface, version)) => {
                GlobalId(self.registry.create_global(interface, version))
            }
            None => {
                warn!(?kind, "channel has no protocol global");
                GlobalId(0)
            }
        }
    }

    fn remove_global(&self, id: GlobalId) {
        if id.0 != 0 {
            self.registry.remove_global(id.0);
        }
    }
}

/// Support advertiser for Wayland sessions without Xwayland.
///
/// Support names are X11 root window atoms; native Wayland clients learn
/// about effects from the manager globals instead. With Xwayland running,
/// hosts use `fenestra_backend_x11::AtomAdvertiser` on the Xwayland
/// connection. Without it, this keeps track of advertised names so they can
/// be listed once Xwayland starts.
#[derive(Debug, Default)]
pub struct SupportLedger {
    next: u32,
    names: BTreeMap<SupportToken, String>,
}

impl SupportLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently advertised names, in advertisement order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }
}

impl SupportAdvertiser for SupportLedger {
    fn advertise(&mut self, name: &str) -> SupportToken {
        self.next += 1;
        let token = SupportToken(self.next);
        self.names.insert(token, name.to_owned());
        token
    }

    fn retract(&mut self, token: SupportToken) {
        self.names.remove(&token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_tracks_live_names() {
        let mut ledger = SupportLedger::new();
        let blur = ledger.advertise("_KDE_NET_WM_BLUR_BEHIND_REGION");
        ledger.advertise("_KDE_SLIDE");
        ledger.retract(blur);
        assert_eq!(ledger.names().collect::<Vec<_>>(), ["_KDE_SLIDE"]);
    }
}
