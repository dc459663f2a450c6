// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed effect updates.
//!
//! Every channel broadcasts [`Update<T>`] values. The [`UpdateBase`] tells an
//! effect *which* window changed and *whether* a window-specific value exists:
//!
//! - `valid == true`: `value` is the window's current value.
//! - `valid == false`: the source was explicitly cleared; `value` is the
//!   channel default and must be ignored.
//! - `window == None`: the whole channel was reset; every cached value is
//!   stale until the next per-window update.
//!
//! Not receiving an update at all means nothing changed.

use fenestra_core::region::Region;
use fenestra_core::window::WindowId;

use crate::color::ColorMatrix;

/// Which window an update is about, and whether it carries a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateBase {
    /// The window, or `None` for a channel-wide reset.
    pub window: Option<WindowId>,
    /// Whether [`Update::value`] holds a window-specific value.
    pub valid: bool,
}

/// A channel value for one window.
#[derive(Clone, Debug, PartialEq)]
pub struct Update<T> {
    /// Window and validity.
    pub base: UpdateBase,
    /// The value. Channel default when invalid.
    pub value: T,
}

impl<T: Default> Update<T> {
    /// An update carrying `value` for `window`.
    #[must_use]
    pub fn valid(window: WindowId, value: T) -> Self {
        Self {
            base: UpdateBase {
                window: Some(window),
                valid: true,
            },
            value,
        }
    }

    /// An update telling that `window` has no value on this channel.
    #[must_use]
    pub fn invalid(window: WindowId) -> Self {
        Self {
            base: UpdateBase {
                window: Some(window),
                valid: false,
            },
            value: T::default(),
        }
    }

    /// A channel-wide reset.
    #[must_use]
    pub fn reset() -> Self {
        Self {
            base: UpdateBase {
                window: None,
                valid: false,
            },
            value: T::default(),
        }
    }
}

/// Blur-behind region relative to the window. An empty region blurs the
/// whole window.
pub type RegionUpdate = Update<Region>;

/// Background-contrast region and color matrix.
pub type ColorUpdate = Update<ColorValue>;

/// Slide animation parameters.
pub type AnimUpdate = Update<SlideAnimation>;

/// Global fade state.
pub type FadeUpdate = Update<FadeState>;

/// Region plus color matrix, the background-contrast value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorValue {
    /// Area to apply the matrix to. Empty means the whole window.
    pub region: Region,
    /// Color matrix.
    pub matrix: ColorMatrix,
}

/// Screen edge a window slides from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SlideLocation {
    /// Left screen edge.
    Left,
    /// Top screen edge.
    Top,
    /// Right screen edge.
    Right,
    /// Bottom screen edge.
    #[default]
    Bottom,
}

impl SlideLocation {
    /// Maps the wire code; unknown codes slide from the bottom.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Left,
            1 => Self::Top,
            2 => Self::Right,
            _ => Self::Bottom,
        }
    }
}

/// Slide animation parameters.
///
/// `None` fields ask the effect to pick its own default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlideAnimation {
    /// Edge to slide from.
    pub location: SlideLocation,
    /// Distance of the slide start from the edge, in pixels.
    pub offset: Option<i32>,
    /// Slide-in duration in milliseconds.
    pub in_ms: Option<u32>,
    /// Slide-out duration in milliseconds.
    pub out_ms: Option<u32>,
    /// Slide distance in pixels.
    pub distance: Option<u32>,
}

impl SlideAnimation {
    /// Builds parameters from raw wire values. Negative offsets and zero
    /// durations mean "default".
    #[must_use]
    pub fn sanitized(location: SlideLocation, offset: i32, in_ms: u32, out_ms: u32) -> Self {
        Self {
            location,
            offset: (offset >= 0).then_some(offset),
            in_ms: (in_ms > 0).then_some(in_ms),
            out_ms: (out_ms > 0).then_some(out_ms),
            distance: None,
        }
    }
}

/// Global fade state published by the display configuration service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FadeState {
    /// Screens are fully visible.
    #[default]
    FadedIn = 0,
    /// Screens are fading to black.
    FadingOut = 1,
    /// Screens are black.
    FadedOut = 2,
    /// Screens are fading back in.
    FadingIn = 3,
}

impl FadeState {
    /// Maps a wire code. Unknown codes map to `None`.
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::FadedIn),
            1 => Some(Self::FadingOut),
            2 => Some(Self::FadedOut),
            3 => Some(Self::FadingIn),
            _ => None,
        }
    }

    /// The wire code.
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }
}
