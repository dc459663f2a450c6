// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Protocol globals backing surface-state channels.

use std::rc::Rc;

use crate::channel::ChannelKind;

/// Backend-assigned identity of a protocol global.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlobalId(pub u32);

/// Creates and removes protocol globals.
pub trait GlobalHost {
    /// Publishes the global for `kind`.
    fn create_global(&self, kind: ChannelKind) -> GlobalId;

    /// Withdraws a global created by [`create_global`](Self::create_global).
    fn remove_global(&self, id: GlobalId);
}

/// A live protocol global, removed from its host on drop.
pub struct ProtocolGlobal {
    host: Rc<dyn GlobalHost>,
    id: GlobalId,
    kind: ChannelKind,
}

impl ProtocolGlobal {
    /// Creates the global for `kind` on `host`.
    pub fn create(host: Rc<dyn GlobalHost>, kind: ChannelKind) -> Self {
        let id = host.create_global(kind);
        tracing::debug!(?kind, ?id, "protocol global created");
        Self { host, id, kind }
    }

    /// The host-assigned id.
    #[must_use]
    pub fn id(&self) -> GlobalId {
        self.id
    }
}

impl Drop for ProtocolGlobal {
    fn drop(&mut self) {
        tracing::debug!(kind = ?self.kind, id = ?self.id, "protocol global removed");
        self.host.remove_global(self.id);
    }
}

impl core::fmt::Debug for ProtocolGlobal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProtocolGlobal")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Host {
        live: RefCell<Vec<u32>>,
    }

    impl GlobalHost for Host {
        fn create_global(&self, kind: ChannelKind) -> GlobalId {
            let id = kind as u32 + 10;
            self.live.borrow_mut().push(id);
            GlobalId(id)
        }

        fn remove_global(&self, id: GlobalId) {
            self.live.borrow_mut().retain(|g| *g != id.0);
        }
    }

    #[test]
    fn dropping_removes_the_global() {
        let host = Rc::new(Host::default());
        let global = ProtocolGlobal::create(host.clone(), ChannelKind::Contrast);
        assert_eq!(global.id(), GlobalId(11));
        assert_eq!(*host.live.borrow(), [11]);
        drop(global);
        assert!(host.live.borrow().is_empty(), "global outlived its handle");
    }
}
