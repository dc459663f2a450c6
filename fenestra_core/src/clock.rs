// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host clocks backends timestamp frames with.
//!
//! The scheduler itself never reads a clock. Backends read the configured
//! [`FrameClock`] in [`Backend::now`](crate::backend::Backend::now), and a
//! Wayland display server advertises the same clock to clients through
//! `wp_presentation.clock_id` so feedback timestamps are comparable.

use rustix::time::{ClockId, clock_gettime};
use serde::Deserialize;

use crate::time::HostTime;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Clock frame timestamps are read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameClock {
    /// `CLOCK_MONOTONIC`.
    #[default]
    Monotonic,
    /// `CLOCK_MONOTONIC_RAW`, not slewed by NTP.
    MonotonicRaw,
    /// `CLOCK_BOOTTIME`, which keeps counting across suspend.
    Boottime,
}

impl FrameClock {
    /// Parses the configuration spelling of a clock.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "monotonic" => Some(Self::Monotonic),
            "monotonic_raw" => Some(Self::MonotonicRaw),
            "boottime" => Some(Self::Boottime),
            _ => None,
        }
    }

    /// The kernel `clockid_t` value, as sent in `wp_presentation.clock_id`.
    #[must_use]
    pub const fn clock_id(self) -> u32 {
        match self {
            Self::Monotonic => 1,
            Self::MonotonicRaw => 4,
            Self::Boottime => 7,
        }
    }

    /// Reads the clock.
    #[must_use]
    pub fn now(self) -> HostTime {
        let id = match self {
            Self::Monotonic => ClockId::Monotonic,
            Self::MonotonicRaw => ClockId::MonotonicRaw,
            Self::Boottime => ClockId::Boottime,
        };
        let ts = clock_gettime(id);
        host_time_from_parts(ts.tv_sec, ts.tv_nsec)
    }
}

/// Converts a `(seconds, nanoseconds)` timestamp, as carried by DRM page
/// flip events and presentation feedback, to [`HostTime`].
///
/// Negative parts count as zero; the result saturates.
#[must_use]
pub fn host_time_from_parts(secs: i64, nanos: i64) -> HostTime {
    let secs = u64::try_from(secs).unwrap_or(0);
    let nanos = u64::try_from(nanos).unwrap_or(0).min(NANOS_PER_SECOND - 1);
    HostTime(secs.saturating_mul(NANOS_PER_SECOND).saturating_add(nanos))
}
