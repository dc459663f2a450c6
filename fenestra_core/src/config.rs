// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor configuration.
//!
//! [`CompositorConfig`] gathers the tuning knobs of the frame scheduler. The
//! defaults match a 60 Hz desktop; hosts may deserialize the struct from a
//! settings file (every field is optional) and overlay environment switches
//! with [`CompositorConfig::from_env`].

use serde::Deserialize;
use tracing::warn;

use crate::clock::FrameClock;

/// Environment variable disabling explicit GPU synchronization.
pub const ENV_NO_EXPLICIT_SYNC: &str = "FENESTRA_NO_EXPLICIT_SYNC";

/// Environment variable overriding [`CompositorConfig::max_frames_tested`].
pub const ENV_MAX_FRAMES_TESTED: &str = "FENESTRA_MAX_FRAMES_TESTED";

/// Environment variable overriding [`CompositorConfig::frame_clock`].
pub const ENV_FRAME_CLOCK: &str = "FENESTRA_FRAME_CLOCK";

/// Tuning knobs for the compositor platform.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Whether compositing is wanted at all. `false` starts the compositor
    /// suspended by the user.
    pub use_compositing: bool,
    /// Whether scenes should use explicit GPU synchronization.
    pub explicit_sync: bool,
    /// Number of initial frames wrapped in GPU safe points.
    pub max_frames_tested: u32,
    /// The vblank margin is one refresh length divided by this value.
    pub vblank_margin_divisor: u32,
    /// Frames after which the paint-duration maximum collapses into the
    /// previous-window slot.
    pub paint_window: u32,
    /// Upper bound for a single composite timer wait, in milliseconds.
    pub max_wait_ms: u64,
    /// Delay before a suspended compositor releases its selection, in
    /// milliseconds.
    pub selection_release_delay_ms: u64,
    /// Clock backends timestamp frames with.
    pub frame_clock: FrameClock,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            use_compositing: true,
            explicit_sync: true,
            max_frames_tested: 3,
            vblank_margin_divisor: 10,
            paint_window: 100,
            max_wait_ms: 250,
            selection_release_delay_ms: 2000,
            frame_clock: FrameClock::Monotonic,
        }
    }
}

impl CompositorConfig {
    /// Default configuration with the process environment overlaid.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Default configuration with variables from `lookup` overlaid.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.apply_lookup(lookup);
        config
    }

    /// Overlays variables from `lookup` onto this configuration.
    ///
    /// Unparsable values are logged and ignored.
    pub fn apply_lookup(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_NO_EXPLICIT_SYNC) {
            let value = value.trim();
            if !value.is_empty() && value != "0" {
                self.explicit_sync = false;
            }
        }
        if let Some(value) = lookup(ENV_MAX_FRAMES_TESTED) {
            match value.trim().parse() {
                Ok(frames) => self.max_frames_tested = frames,
                Err(err) => warn!(%value, %err, "ignoring {ENV_MAX_FRAMES_TESTED}"),
            }
        }
        if let Some(value) = lookup(ENV_FRAME_CLOCK) {
            match FrameClock::from_name(value.trim()) {
                Some(clock) => self.frame_clock = clock,
                None => warn!(%value, "ignoring unknown {ENV_FRAME_CLOCK}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    #[test]
    fn defaults_without_environment() {
        let config = CompositorConfig::from_lookup(lookup(&[]));
        assert_eq!(config, CompositorConfig::default());
        assert!(config.explicit_sync);
        assert_eq!(config.max_frames_tested, 3);
        assert_eq!(config.max_wait_ms, 250);
    }

    #[test]
    fn explicit_sync_opt_out() {
        let config = CompositorConfig::from_lookup(lookup(&[(ENV_NO_EXPLICIT_SYNC, "1")]));
        assert!(!config.explicit_sync);

        let config = CompositorConfig::from_lookup(lookup(&[(ENV_NO_EXPLICIT_SYNC, "0")]));
        assert!(config.explicit_sync, "\"0\" keeps explicit sync enabled");
    }

    #[test]
    fn deserializes_partial_settings() {
        let config: CompositorConfig =
            serde_json::from_str(r#"{ "max_wait_ms": 100, "use_compositing": false }"#)
                .expect("valid settings");
        assert_eq!(config.max_wait_ms, 100);
        assert!(!config.use_compositing);
        assert_eq!(config.paint_window, 100, "missing fields keep defaults");
    }

    #[test]
    fn max_frames_tested_override() {
        let config = CompositorConfig::from_lookup(lookup(&[(ENV_MAX_FRAMES_TESTED, "0")]));
        assert_eq!(config.max_frames_tested, 0);

        let config =
            CompositorConfig::from_lookup(lookup(&[(ENV_MAX_FRAMES_TESTED, "many")]));
        assert_eq!(config.max_frames_tested, 3, "garbage is ignored");
    }

    #[test]
    fn frame_clock_from_settings_and_environment() {
        let config: CompositorConfig =
            serde_json::from_str(r#"{ "frame_clock": "monotonic_raw" }"#).expect("valid settings");
        assert_eq!(config.frame_clock, FrameClock::MonotonicRaw);

        let config = CompositorConfig::from_lookup(lookup(&[(ENV_FRAME_CLOCK, "boottime")]));
        assert_eq!(config.frame_clock, FrameClock::Boottime);

        let config = CompositorConfig::from_lookup(lookup(&[(ENV_FRAME_CLOCK, "tai")]));
        assert_eq!(config.frame_clock, FrameClock::Monotonic);
    }
}
