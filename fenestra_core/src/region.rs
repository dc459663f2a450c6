// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle-set regions for damage and repaint tracking.
//!
//! A [`Region`] is an unordered set of axis-aligned rectangles in global
//! compositor coordinates. It is deliberately simple: unions keep the
//! rectangle list free of rectangles already covered by another one, but
//! overlapping rectangles are not split. Consumers that need exact pixel
//! coverage (a scene painting with scissor rects) iterate
//! [`rects`](Region::rects) directly.

use kurbo::Rect;

/// A set of axis-aligned rectangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Creates an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Creates a region covering a single rectangle.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        region.union_rect(rect);
        region
    }

    /// Creates a region from integer `(x, y, width, height)` tuples, the
    /// layout used by client-supplied rectangle lists.
    #[must_use]
    pub fn from_xywh(rects: &[(i32, i32, i32, i32)]) -> Self {
        let mut region = Self::new();
        for &(x, y, w, h) in rects {
            region.union_rect(Rect::new(
                f64::from(x),
                f64::from(y),
                f64::from(x) + f64::from(w),
                f64::from(y) + f64::from(h),
            ));
        }
        region
    }

    /// Returns `true` if the region covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The rectangles making up this region.
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Adds a rectangle to the region. Zero-area rectangles are ignored.
    pub fn union_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        if rect.is_zero_area() {
            return;
        }
        if self.rects.iter().any(|r| covers(r, &rect)) {
            return;
        }
        self.rects.retain(|r| !covers(&rect, r));
        self.rects.push(rect);
    }

    /// Merges every rectangle of `other` into this region.
    pub fn union(&mut self, other: &Self) {
        for rect in &other.rects {
            self.union_rect(*rect);
        }
    }

    /// Returns `true` if any rectangle of the region covers `rect` entirely.
    #[must_use]
    pub fn contains_rect(&self, rect: Rect) -> bool {
        let rect = rect.abs();
        self.rects.iter().any(|r| covers(r, &rect))
    }

    /// Returns `true` if the region overlaps `rect` with non-zero area.
    #[must_use]
    pub fn intersects(&self, rect: Rect) -> bool {
        self.rects
            .iter()
            .any(|r| !r.intersect(rect).is_zero_area())
    }

    /// Returns the part of this region that lies inside `clip`.
    #[must_use]
    pub fn clip_to(&self, clip: Rect) -> Self {
        let mut out = Self::new();
        for r in &self.rects {
            out.union_rect(r.intersect(clip));
        }
        out
    }

    /// Smallest rectangle enclosing the whole region, if non-empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut iter = self.rects.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(*r)))
    }

    /// Moves the region out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Removes every rectangle.
    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

fn covers(outer: &Rect, inner: &Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && outer.x1 >= inner.x1 && outer.y1 >= inner.y1
}
