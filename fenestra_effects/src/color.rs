// Copyright 2026 the Fenestra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 4×4 color matrices for the background-contrast channel.
//!
//! Clients either send a precomputed matrix or three factors (contrast,
//! intensity, saturation). [`ColorMatrix::from_contrast`] turns the factors
//! into the matrix the contrast effect multiplies pixels by:
//!
//! ```text
//!   M = C · S · I
//! ```
//!
//! where `S` desaturates towards Rec. 709 luma, `I` scales every channel,
//! and `C` scales around mid-grey. A factor of exactly `1.0` leaves its
//! matrix as the identity.

use core::fmt;
use core::ops::Mul;

/// Rec. 709 luma weights.
const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// A row-major 4×4 matrix.
#[derive(Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub [[f32; 4]; 4]);

impl ColorMatrix {
    /// The identity matrix.
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Builds a matrix from 16 values in row-major order.
    #[must_use]
    pub const fn from_row_major(v: [f32; 16]) -> Self {
        Self([
            [v[0], v[1], v[2], v[3]],
            [v[4], v[5], v[6], v[7]],
            [v[8], v[9], v[10], v[11]],
            [v[12], v[13], v[14], v[15]],
        ])
    }

    /// The 16 values in row-major order.
    #[must_use]
    pub fn to_row_major(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (row, values) in self.0.iter().enumerate() {
            out[row * 4..row * 4 + 4].copy_from_slice(values);
        }
        out
    }

    /// Builds the contrast-effect matrix from its three factors.
    #[must_use]
    pub fn from_contrast(contrast: f32, intensity: f32, saturation: f32) -> Self {
        let mut sat = Self::IDENTITY;
        if saturation != 1.0 {
            let [r, g, b] = LUMA.map(|w| (1.0 - saturation) * w);
            sat = Self([
                [r + saturation, r, r, 0.0],
                [g, g + saturation, g, 0.0],
                [b, b, b + saturation, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]);
        }

        let mut int = Self::IDENTITY;
        if intensity != 1.0 {
            for i in 0..3 {
                int.0[i][i] = intensity;
            }
        }

        let mut cont = Self::IDENTITY;
        if contrast != 1.0 {
            let t = (1.0 - contrast) / 2.0;
            cont = Self([
                [contrast, 0.0, 0.0, 0.0],
                [0.0, contrast, 0.0, 0.0],
                [0.0, 0.0, contrast, 0.0],
                [t, t, t, 1.0],
            ]);
        }

        cont * sat * int
    }

    /// Returns `true` if every entry is within `epsilon` of `other`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.to_row_major()
            .iter()
            .zip(other.to_row_major())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for ColorMatrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [[0.0_f32; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[i][k] * rhs.0[k][j]).sum();
            }
        }
        Self(out)
    }
}

impl fmt::Debug for ColorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
