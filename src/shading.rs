// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns escape values into colors.
//!
//! Each policy derives a mixing weight from the escape value and
//! mixes the two colors of a palette with it.  Every default palette
//! paints interior points (escape value 0.0) black.

use crate::color::{mix, Color, Narrowing};

/// The orange used by the log-scale policy.
pub const LOG_ORANGE: Color = Color::new(200, 100, 50);

/// The orange used by the arctangent and linear policies.
pub const ATAN_ORANGE: Color = Color::new(204, 51, 25);

/// The scale used by the log-scale policy when none is configured.
pub const DEFAULT_SCALE: f64 = 4000.0;

/// The divisor used by the linear policy when none is configured.
pub const DEFAULT_DIVISOR: f64 = 50.0;

/// Selects how an escape value becomes a mixing weight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColoringPolicy {
    /// `fract(ln(escape / scale))`, with the sign of the logarithm
    /// preserved.  The colors cycle once per factor of `e`.
    LogScale,
    /// `atan(escape)`.  Saturates quickly; no cycling.
    ArcTangent,
    /// `escape / divisor`.
    Linear {
        /// Escape value at which the palette reaches its first color.
        divisor: f64,
    },
}

impl Default for ColoringPolicy {
    fn default() -> Self {
        ColoringPolicy::LogScale
    }
}

impl ColoringPolicy {
    /// The linear policy with its usual divisor.
    pub fn linear() -> Self {
        ColoringPolicy::Linear {
            divisor: DEFAULT_DIVISOR,
        }
    }

    /// The palette this policy was designed around.
    pub fn default_palette(&self) -> Palette {
        match *self {
            ColoringPolicy::LogScale => Palette::new(Color::BLACK, LOG_ORANGE),
            ColoringPolicy::ArcTangent | ColoringPolicy::Linear { .. } => {
                Palette::new(ATAN_ORANGE, Color::BLACK)
            }
        }
    }

    /// The mixing weight for an escape value.  `scale` is only read by
    /// the log-scale policy.
    pub fn weight(&self, escape: f64, scale: f64) -> f64 {
        match *self {
            // `%` on floats has the semantics of C's fmod
            ColoringPolicy::LogScale => (escape / scale).ln() % 1.0,
            ColoringPolicy::ArcTangent => escape.atan(),
            ColoringPolicy::Linear { divisor } => escape / divisor,
        }
    }
}

/// The two colors a policy mixes between.  A weight of 1.0 gives
/// `first`, 0.0 gives `second`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    /// The color at weight 1.0.
    pub first: Color,
    /// The color at weight 0.0.
    pub second: Color,
}

impl Palette {
    /// Constructor.
    pub fn new(first: Color, second: Color) -> Self {
        Palette { first, second }
    }
}

/// Everything needed to color one pixel from its escape value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shader {
    /// The weighting policy.
    pub policy: ColoringPolicy,
    /// Colors to mix.
    pub palette: Palette,
    /// Divisor for the log-scale policy.
    pub scale: f64,
    /// How channels are brought back into eight bits.
    pub narrowing: Narrowing,
}

impl Shader {
    /// The color for an escape value.
    #[inline]
    pub fn shade(&self, escape: f64) -> Color {
        let x = self.policy.weight(escape, self.scale);
        mix(self.palette.first, self.palette.second, x, self.narrowing)
    }
}
