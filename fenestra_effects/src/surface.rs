// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Protocol surface state as seen by effect channels.
//!
//! Wayland clients configure effects through per-surface protocol objects.
//! The host snapshots the committed values into a [`SurfaceState`] together
//! with a [`SurfaceChanges`] mask of what the last commit touched, so each
//! channel can ignore unrelated commits.

use bitflags::bitflags;
use fenestra_core::region::Region;

use crate::color::ColorMatrix;
use crate::update::SlideAnimation;

bitflags! {
    /// Fields touched by a surface commit.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SurfaceChanges: u32 {
        /// Blur region.
        const BLUR = 1 << 0;
        /// Background contrast.
        const CONTRAST = 1 << 1;
        /// Slide animation.
        const SLIDE = 1 << 2;
    }
}

/// Contrast parameters as sent by the client.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContrastParams {
    /// Three factors, turned into a matrix on read.
    Factors {
        /// Contrast factor.
        contrast: f32,
        /// Intensity factor.
        intensity: f32,
        /// Saturation factor.
        saturation: f32,
    },
    /// A precomputed matrix.
    Matrix(ColorMatrix),
}

impl ContrastParams {
    /// The effective color matrix.
    #[must_use]
    pub fn matrix(&self) -> ColorMatrix {
        match *self {
            Self::Factors {
                contrast,
                intensity,
                saturation,
            } => ColorMatrix::from_contrast(contrast, intensity, saturation),
            Self::Matrix(m) => m,
        }
    }
}

/// Committed background-contrast object of a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct ContrastState {
    /// Area to apply contrast to. Empty means the whole surface.
    pub region: Region,
    /// Contrast parameters.
    pub params: ContrastParams,
}

/// Committed effect state of a surface. `None` fields mean the client has
/// no such object (never created or destroyed).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceState {
    /// Fields touched by the last commit.
    pub changed: SurfaceChanges,
    /// Blur region.
    pub blur: Option<Region>,
    /// Background contrast.
    pub contrast: Option<ContrastState>,
    /// Slide animation.
    pub slide: Option<SlideAnimation>,
}
