// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Support advertisement through root window atoms.

use std::collections::HashMap;
use std::rc::Rc;

use fenestra_effects::support::{SupportAdvertiser, SupportToken};

use crate::connection::{Atom, RootAtoms};

/// Advertises support names by listing their atoms on the root window.
///
/// Tokens are the atoms themselves. Works on any [`RootAtoms`], including
/// the Xwayland connection of a Wayland session.
pub struct AtomAdvertiser<C> {
    conn: Rc<C>,
    listed: HashMap<SupportToken, Atom>,
}

impl<C> core::fmt::Debug for AtomAdvertiser<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtomAdvertiser")
            .field("listed", &self.listed)
            .finish_non_exhaustive()
    }
}

impl<C: RootAtoms> AtomAdvertiser<C> {
    /// Creates an advertiser on `conn`.
    pub fn new(conn: Rc<C>) -> Self {
        Self {
            conn,
            listed: HashMap::new(),
        }
    }
}

impl<C: RootAtoms> SupportAdvertiser for AtomAdvertiser<C> {
    fn advertise(&mut self, name: &str) -> SupportToken {
        let atom = self.conn.intern_atom(name);
        self.conn.append_supported(atom);
        self.conn.flush();
        let token = SupportToken(atom.0);
        self.listed.insert(token, atom);
        token
    }

    fn retract(&mut self, token: SupportToken) {
        if let Some(atom) = self.listed.remove(&token) {
            self.conn.remove_supported(atom);
            self.conn.flush();
        }
    }
}
