// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effect channels: how each property family is read from a window.
//!
//! A [`Channel`] is a zero-sized description plugged into
//! [`Integration`](crate::integration::Integration). It names the channel's
//! sources and converts raw source data into the channel value.

use crate::attribute;
use crate::surface::{SurfaceChanges, SurfaceState};
use crate::update::{ColorValue, FadeState, SlideAnimation};
use crate::window::{InternalValue, Probe};
use fenestra_core::region::Region;

/// Identifies a channel on the event bus and in protocol globals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChannelKind {
    /// Blur-behind region.
    Blur,
    /// Background contrast.
    Contrast,
    /// Slide animation.
    Slide,
    /// Global fade state.
    Fade,
}

/// Static description of an effect channel.
pub trait Channel: 'static {
    /// The value broadcast to effects.
    type Value: Clone + Default + 'static;

    /// Bus and global identity.
    const KIND: ChannelKind;

    /// Advertised support name, which is also the legacy attribute name.
    const SUPPORT_NAME: &'static str;

    /// Name of the internal-window property, if the channel has one.
    const INTERNAL_PROPERTY: Option<&'static str> = None;

    /// Surface commit fields this channel reads. Empty if the channel has no
    /// protocol surface source.
    const SURFACE_MASK: SurfaceChanges = SurfaceChanges::empty();

    /// Whether the channel needs a protocol global while it has registrants.
    const NEEDS_PROTOCOL_GLOBAL: bool = !Self::SURFACE_MASK.is_empty();

    /// Converts an internal-window property. `None` means the property has
    /// an unexpected type and is treated as cleared.
    fn from_internal(value: &InternalValue) -> Option<Self::Value> {
        _ = value;
        None
    }

    /// Reads the channel's field of the surface state.
    fn from_surface(state: &SurfaceState) -> Probe<Self::Value> {
        _ = state;
        Probe::NotApplicable
    }

    /// Decodes a legacy attribute payload. `None` means no update.
    fn from_attribute(bytes: &[u8]) -> Option<Self::Value>;
}

fn present<T>(value: Option<T>) -> Probe<T> {
    value.map_or(Probe::Cleared, Probe::Set)
}

/// Blur-behind region channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlurChannel;

impl Channel for BlurChannel {
    type Value = Region;
    const KIND: ChannelKind = ChannelKind::Blur;
    const SUPPORT_NAME: &'static str = attribute::BLUR_REGION;
    const INTERNAL_PROPERTY: Option<&'static str> = Some("kwin_blur");
    const SURFACE_MASK: SurfaceChanges = SurfaceChanges::BLUR;

    fn from_internal(value: &InternalValue) -> Option<Region> {
        match value {
            InternalValue::Region(region) => Some(region.clone()),
            _ => None,
        }
    }

    fn from_surface(state: &SurfaceState) -> Probe<Region> {
        present(state.blur.clone())
    }

    fn from_attribute(bytes: &[u8]) -> Option<Region> {
        Some(attribute::decode_blur(bytes))
    }
}

/// Background-contrast channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContrastChannel;

impl Channel for ContrastChannel {
    type Value = ColorValue;
    const KIND: ChannelKind = ChannelKind::Contrast;
    const SUPPORT_NAME: &'static str = attribute::CONTRAST_REGION;
    const INTERNAL_PROPERTY: Option<&'static str> = Some("kwin_background_contrast");
    const SURFACE_MASK: SurfaceChanges = SurfaceChanges::CONTRAST;

    fn from_internal(value: &InternalValue) -> Option<ColorValue> {
        match value {
            InternalValue::Color(color) => Some(color.clone()),
            _ => None,
        }
    }

    fn from_surface(state: &SurfaceState) -> Probe<ColorValue> {
        present(state.contrast.as_ref().map(|c| ColorValue {
            region: c.region.clone(),
            matrix: c.params.matrix(),
        }))
    }

    fn from_attribute(bytes: &[u8]) -> Option<ColorValue> {
        Some(attribute::decode_contrast(bytes))
    }
}

/// Slide animation channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct SlideChannel;

impl Channel for SlideChannel {
    type Value = SlideAnimation;
    const KIND: ChannelKind = ChannelKind::Slide;
    const SUPPORT_NAME: &'static str = attribute::SLIDE;
    const INTERNAL_PROPERTY: Option<&'static str> = Some("kwin_slide");
    const SURFACE_MASK: SurfaceChanges = SurfaceChanges::SLIDE;

    fn from_internal(value: &InternalValue) -> Option<SlideAnimation> {
        match value {
            InternalValue::Slide(anim) => Some(*anim),
            _ => None,
        }
    }

    fn from_surface(state: &SurfaceState) -> Probe<SlideAnimation> {
        present(state.slide)
    }

    fn from_attribute(bytes: &[u8]) -> Option<SlideAnimation> {
        Some(attribute::decode_slide(bytes))
    }
}

/// Global fade state channel. Attribute source only.
#[derive(Clone, Copy, Debug, Default)]
pub struct FadeChannel;

impl Channel for FadeChannel {
    type Value = FadeState;
    const KIND: ChannelKind = ChannelKind::Fade;
    const SUPPORT_NAME: &'static str = attribute::FADE_STATE;

    fn from_attribute(bytes: &[u8]) -> Option<FadeState> {
        attribute::decode_fade(bytes)
    }
}
