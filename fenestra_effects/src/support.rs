// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Process-wide support advertisement.
//!
//! Clients only send effect hints (blur regions, slide parameters, ...) when
//! the compositor advertises that some effect consumes them. The
//! [`SupportRegistry`] reference-counts each advertised name by the effects
//! depending on it and keeps the advertisement alive until one frame
//! boundary after the last effect withdrew. A consumer that observed the
//! previous state therefore always gets a chance to act on it before the
//! capability disappears.
//!
//! The actual advertisement is backend specific (a root window atom list on
//! X11, a protocol global on Wayland) and is abstracted by
//! [`SupportAdvertiser`].

use std::cell::RefCell;
use std::collections::BTreeMap;

use fenestra_core::backend::FrameObserver;
use tracing::{debug, info};

/// Identity of an effect registered with a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectId(pub u64);

/// Opaque handle to one advertisement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SupportToken(pub u32);

/// Publishes and retracts support names on a backend.
pub trait SupportAdvertiser {
    /// Starts advertising `name`.
    fn advertise(&mut self, name: &str) -> SupportToken;

    /// Stops advertising the name behind `token`.
    fn retract(&mut self, token: SupportToken);
}

#[derive(Debug)]
struct Entry {
    token: SupportToken,
    effects: Vec<EffectId>,
}

#[derive(Debug)]
struct Retiring {
    name: String,
    token: SupportToken,
}

struct Inner {
    advertiser: Box<dyn SupportAdvertiser>,
    live: BTreeMap<String, Entry>,
    retiring: Vec<Retiring>,
}

impl Inner {
    fn retract_all_retiring(&mut self) -> usize {
        let retired = core::mem::take(&mut self.retiring);
        for r in &retired {
            info!(name = %r.name, "support withdrawn");
            self.advertiser.retract(r.token);
        }
        retired.len()
    }
}

/// Reference-counted table of advertised support names.
pub struct SupportRegistry {
    inner: RefCell<Inner>,
}

impl core::fmt::Debug for SupportRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SupportRegistry")
            .field("live", &inner.live)
            .field("retiring", &inner.retiring)
            .finish_non_exhaustive()
    }
}

impl SupportRegistry {
    /// Creates an empty registry advertising through `advertiser`.
    pub fn new(advertiser: Box<dyn SupportAdvertiser>) -> Self {
        Self {
            inner: RefCell::new(Inner {
                advertiser,
                live: BTreeMap::new(),
                retiring: Vec::new(),
            }),
        }
    }

    /// Records that `effect` depends on `name`, advertising it if needed.
    /// Every announcement counts; it takes as many withdrawals to drop
    /// the dependency.
    ///
    /// A name still waiting for retirement is revived with its old token.
    pub fn announce(&self, effect: EffectId, name: &str) -> SupportToken {
        let mut inner = self.inner.borrow_mut();
        if let Some(entry) = inner.live.get_mut(name) {
            entry.effects.push(effect);
            return entry.token;
        }
        let token = if let Some(pos) = inner.retiring.iter().position(|r| r.name == name) {
            debug!(name, "support retirement cancelled");
            inner.retiring.remove(pos).token
        } else {
            info!(name, "support advertised");
            inner.advertiser.advertise(name)
        };
        inner.live.insert(
            name.to_owned(),
            Entry {
                token,
                effects: vec![effect],
            },
        );
        token
    }

    /// Drops one dependency of `effect` on `name`.
    ///
    /// When no effect depends on the name anymore, its advertisement is
    /// queued and retracted at the next [`flush_retired`](Self::flush_retired).
    pub fn withdraw(&self, effect: EffectId, name: &str) {
        let mut inner = self.inner.borrow_mut();
        let Some(entry) = inner.live.get_mut(name) else {
            debug!(name, ?effect, "withdraw of unknown support name");
            return;
        };
        let Some(pos) = entry.effects.iter().position(|e| *e == effect) else {
            return;
        };
        entry.effects.remove(pos);
        if !entry.effects.is_empty() {
            return;
        }
        let token = entry.token;
        inner.live.remove(name);
        debug!(name, "support queued for retirement");
        inner.retiring.push(Retiring {
            name: name.to_owned(),
            token,
        });
    }

    /// Retracts every queued advertisement. Returns how many were retracted.
    pub fn flush_retired(&self) -> usize {
        self.inner.borrow_mut().retract_all_retiring()
    }

    /// Advertises every live name again after the backend lost its state.
    ///
    /// Queued retirements are forgotten without retracting; their tokens
    /// belong to the lost connection.
    pub fn readvertise_all(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.retiring.clear();
        let names: Vec<String> = inner.live.keys().cloned().collect();
        for name in names {
            let token = inner.advertiser.advertise(&name);
            if let Some(entry) = inner.live.get_mut(&name) {
                entry.token = token;
            }
        }
        info!(count = inner.live.len(), "support re-advertised");
    }

    /// Number of names with at least one dependent effect.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.inner.borrow().live.len()
    }

    /// Number of names currently advertised, queued retirements included.
    #[must_use]
    pub fn advertised_count(&self) -> usize {
        let inner = self.inner.borrow();
        inner.live.len() + inner.retiring.len()
    }

    /// Number of effects depending on `name`.
    #[must_use]
    pub fn dependents(&self, name: &str) -> usize {
        self.inner
            .borrow()
            .live
            .get(name)
            .map_or(0, |e| e.effects.len())
    }

    /// Token currently advertising `name`, if live.
    #[must_use]
    pub fn token(&self, name: &str) -> Option<SupportToken> {
        self.inner.borrow().live.get(name).map(|e| e.token)
    }
}

impl FrameObserver for SupportRegistry {
    fn frame_finished(&self, msc: u64) {
        let retired = self.flush_retired();
        if retired > 0 {
            debug!(msc, retired, "support retired at frame boundary");
        }
    }

    fn compositing_stopped(&self) {
        self.flush_retired();
    }
}
