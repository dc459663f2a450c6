// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legacy window-attribute payloads.
//!
//! X11 clients configure effects through window properties holding arrays
//! of 32-bit words, little-endian once fetched. Layouts:
//!
//! | Channel  | Words                                                        |
//! |----------|--------------------------------------------------------------|
//! | blur     | `(x, y, w, h)*`                                              |
//! | contrast | `(x, y, w, h)*` then 16 `f32` bit patterns, row-major matrix |
//! | slide    | `offset, location [, in_ms [, out_ms [, distance]]]`         |
//! | fade     | `state`                                                      |
//!
//! Decoding never fails. Payloads of the wrong length decode to the channel
//! default, which an effect sees as a valid update with an empty value.

use fenestra_core::region::Region;
use tracing::debug;

use crate::color::ColorMatrix;
use crate::update::{ColorValue, FadeState, SlideAnimation, SlideLocation};

/// Blur-behind region attribute.
pub const BLUR_REGION: &str = "_KDE_NET_WM_BLUR_BEHIND_REGION";
/// Background-contrast attribute.
pub const CONTRAST_REGION: &str = "_KDE_NET_WM_BACKGROUND_CONTRAST_REGION";
/// Slide animation attribute.
pub const SLIDE: &str = "_KDE_SLIDE";
/// Fade state attribute.
pub const FADE_STATE: &str = "_KDE_KWIN_KSCREEN_SUPPORT";

const RECT_BYTES: usize = 16;
const MATRIX_BYTES: usize = 64;

fn words(bytes: &[u8]) -> impl Iterator<Item = u32> + '_ {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
}

fn rects(bytes: &[u8]) -> Region {
    let values: Vec<i32> = words(bytes).map(|w| w as i32).collect();
    let tuples: Vec<_> = values
        .chunks_exact(4)
        .map(|r| (r[0], r[1], r[2], r[3]))
        .collect();
    Region::from_xywh(&tuples)
}

/// Decodes a blur region. Empty or malformed payloads blur the whole window.
#[must_use]
pub fn decode_blur(bytes: &[u8]) -> Region {
    if bytes.len() % RECT_BYTES != 0 {
        debug!(len = bytes.len(), "malformed blur region");
        return Region::new();
    }
    rects(bytes)
}

/// Decodes a contrast region and matrix.
#[must_use]
pub fn decode_contrast(bytes: &[u8]) -> ColorValue {
    if bytes.len() < MATRIX_BYTES || (bytes.len() - MATRIX_BYTES) % RECT_BYTES != 0 {
        debug!(len = bytes.len(), "malformed contrast payload");
        return ColorValue::default();
    }
    let split = bytes.len() - MATRIX_BYTES;
    let mut matrix = [0.0; 16];
    for (slot, word) in matrix.iter_mut().zip(words(&bytes[split..])) {
        *slot = f32::from_bits(word);
    }
    ColorValue {
        region: rects(&bytes[..split]),
        matrix: ColorMatrix::from_row_major(matrix),
    }
}

/// Decodes slide parameters. Fewer than two words give the default.
#[must_use]
pub fn decode_slide(bytes: &[u8]) -> SlideAnimation {
    let d: Vec<u32> = words(bytes).collect();
    if d.len() < 2 || bytes.len() % 4 != 0 {
        debug!(len = bytes.len(), "malformed slide payload");
        return SlideAnimation::default();
    }
    let location = SlideLocation::from_code(d[1]);
    let (in_ms, out_ms) = match d.len() {
        2 => (0, 0),
        3 => (d[2], d[2]),
        _ => (d[2], d[3]),
    };
    let mut anim = SlideAnimation::sanitized(location, d[0] as i32, in_ms, out_ms);
    anim.distance = d.get(4).copied().filter(|&v| v > 0);
    anim
}

/// Decodes the fade state.
///
/// A payload that is not exactly one word gives [`FadeState::FadedIn`]; an
/// unknown state code gives `None`, meaning no update.
#[must_use]
pub fn decode_fade(bytes: &[u8]) -> Option<FadeState> {
    if bytes.len() != 4 {
        debug!(len = bytes.len(), "malformed fade state");
        return Some(FadeState::default());
    }
    let code = words(bytes).next().unwrap_or_default();
    let state = FadeState::from_code(code);
    if state.is_none() {
        debug!(code, "unknown fade state");
    }
    state
}

/// Encodes a fade state as one word.
#[must_use]
pub fn encode_fade(state: FadeState) -> Vec<u8> {
    state.code().to_le_bytes().to_vec()
}
