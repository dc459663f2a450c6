// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display output identification and refresh timing.
//!
//! [`OutputId`] is a lightweight handle identifying a specific display.
//! Backends assign these; core treats them as opaque. [`Output`] carries the
//! two facts the frame scheduler needs: where the output sits in the global
//! compositor space and how fast it refreshes.

use core::fmt;

use kurbo::Rect;

use crate::time::Duration;

/// Lowest refresh rate assumed when computing the refresh cycle, in mHz.
///
/// Outputs reporting slower (or unknown, zero) rates are scheduled as if
/// they ran at 60 Hz.
pub const MIN_REFRESH_RATE_MHZ: u32 = 60_000;

/// Identifies a specific display output.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OutputId(pub u32);

impl fmt::Debug for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputId({})", self.0)
    }
}

/// A display output as seen by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Output {
    /// Backend-assigned identity.
    pub id: OutputId,
    /// Position and size in global compositor coordinates.
    pub geometry: Rect,
    /// Refresh rate in millihertz (60 Hz is `60_000`).
    pub refresh_rate_mhz: u32,
}

impl Output {
    /// Creates an output description.
    #[must_use]
    pub const fn new(id: OutputId, geometry: Rect, refresh_rate_mhz: u32) -> Self {
        Self {
            id,
            geometry,
            refresh_rate_mhz,
        }
    }
}

/// Returns the fastest refresh rate among `outputs`, never below
/// [`MIN_REFRESH_RATE_MHZ`].
#[must_use]
pub fn max_refresh_rate_mhz(outputs: &[Output]) -> u32 {
    outputs
        .iter()
        .map(|o| o.refresh_rate_mhz)
        .fold(MIN_REFRESH_RATE_MHZ, u32::max)
}

/// Length of one refresh cycle of the fastest output.
#[must_use]
pub fn refresh_length(outputs: &[Output]) -> Duration {
    let rate = u64::from(max_refresh_rate_mhz(outputs));
    Duration(1_000_000_000_000 / rate)
}
