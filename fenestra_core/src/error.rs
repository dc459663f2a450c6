// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for compositor startup.
//!
//! Only recoverable failures are represented here. Contract violations by the
//! caller (for example announcing a buffer swap while one is pending) are
//! assertions, and transient conditions such as "nothing to paint" are plain
//! early returns.

use thiserror::Error;

/// Failures while bringing compositing up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Every scene factory failed. `chain` joins the individual messages in
    /// attempt order.
    #[error("failed to create a scene: {chain}")]
    SceneCreation {
        /// The chained factory error messages.
        chain: String,
    },
    /// The backend failed to prepare or to create its renderer.
    #[error("backend failure: {0}")]
    Backend(String),
    /// The backend offered no scene factory.
    #[error("backend offers no scene")]
    NoScene,
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_include_context() {
        let err = Error::SceneCreation {
            chain: "no gl no vulkan".into(),
        };
        assert_eq!(err.to_string(), "failed to create a scene: no gl no vulkan");
        assert_eq!(
            Error::Backend("selection owned".into()).to_string(),
            "backend failure: selection owned"
        );
    }
}
