// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only window probes for effect channels.
//!
//! A channel reads a window through three sources, in order:
//!
//! 1. a typed property on windows owned by the compositor process itself,
//! 2. the committed protocol surface state,
//! 3. a legacy attribute keyed by the channel's support name.
//!
//! [`EffectWindow`] exposes all three; backends implement it for their own
//! window types.

use std::rc::Rc;

use fenestra_core::region::Region;
use fenestra_core::window::WindowId;

use crate::surface::{SurfaceChanges, SurfaceState};
use crate::update::{ColorValue, SlideAnimation};

/// Result of probing one source.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Probe<T> {
    /// The source does not exist for this window; try the next one.
    #[default]
    NotApplicable,
    /// The source exists but was explicitly cleared.
    Cleared,
    /// The source holds a value.
    Set(T),
}

/// Typed value of an internal-window property.
#[derive(Clone, Debug, PartialEq)]
pub enum InternalValue {
    /// A region, e.g. the blur-behind area.
    Region(Region),
    /// Contrast region and matrix.
    Color(ColorValue),
    /// Slide parameters.
    Slide(SlideAnimation),
}

/// Window as seen by effect channels.
pub trait EffectWindow {
    /// Identity of the window.
    fn id(&self) -> WindowId;

    /// Reads a typed property of a window owned by the compositor process.
    fn internal_property(&self, name: &str) -> Probe<InternalValue> {
        _ = name;
        Probe::NotApplicable
    }

    /// Committed protocol surface state, if the window has a protocol
    /// surface.
    fn surface_state(&self) -> Option<SurfaceState> {
        None
    }

    /// Raw legacy attribute payload, or `None` if the attribute is absent.
    fn attribute(&self, name: &str) -> Option<Vec<u8>> {
        _ = name;
        None
    }
}

/// Shared handle to an effect window.
pub type EffectWindowRef = Rc<dyn EffectWindow>;

/// Source of the currently stacked windows.
pub trait WindowSource {
    /// Windows in stacking order, bottom to top.
    fn stacked_windows(&self) -> Vec<EffectWindowRef>;
}

/// Writes legacy attributes on the root window.
pub trait AttributeSink {
    /// Replaces attribute `name` with `data`.
    fn set_attribute(&self, name: &str, data: &[u8]);
}

/// Change notifications delivered through the
/// [`EventBus`](crate::bus::EventBus).
#[derive(Clone)]
pub enum WindowEvent {
    /// A legacy attribute changed.
    AttributeChanged {
        /// The window.
        window: EffectWindowRef,
        /// Attribute name.
        name: String,
    },
    /// A protocol surface state was committed.
    SurfaceCommitted {
        /// The window.
        window: EffectWindowRef,
        /// Fields the commit touched.
        changes: SurfaceChanges,
    },
    /// A property of a compositor-owned window changed.
    InternalPropertyChanged {
        /// The window.
        window: EffectWindowRef,
        /// Property name.
        name: String,
    },
}

impl WindowEvent {
    /// The window the event is about.
    #[must_use]
    pub fn window(&self) -> &EffectWindowRef {
        match self {
            Self::AttributeChanged { window, .. }
            | Self::SurfaceCommitted { window, .. }
            | Self::InternalPropertyChanged { window, .. } => window,
        }
    }
}

impl core::fmt::Debug for WindowEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AttributeChanged { window, name } => f
                .debug_struct("AttributeChanged")
                .field("window", &window.id())
                .field("name", name)
                .finish(),
            Self::SurfaceCommitted { window, changes } => f
                .debug_struct("SurfaceCommitted")
                .field("window", &window.id())
                .field("changes", changes)
                .finish(),
            Self::InternalPropertyChanged { window, name } => f
                .debug_struct("InternalPropertyChanged")
                .field("window", &window.id())
                .field("name", name)
                .finish(),
        }
    }
}
