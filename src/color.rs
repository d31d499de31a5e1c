// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colors, and the one operation allowed on them: linear
//! interpolation between two of them.

use num::clamp;

/// An 8-bit RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Black.
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// Constructor.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// The channels in r, g, b order.
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// How an interpolated channel, computed in floating point, is
/// narrowed back into eight bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Narrowing {
    /// Clamp to [0, 255], then truncate toward zero.
    Clamp,
    /// Truncate toward zero and keep the low eight bits, so 300.0
    /// becomes 44 and -1.0 becomes 255.  Matches the output of the
    /// legacy renderer, which never clamped.
    Wrap,
}

impl Default for Narrowing {
    fn default() -> Self {
        Narrowing::Clamp
    }
}

impl Narrowing {
    /// Narrow one channel.  NaN becomes 0 in both modes.
    #[inline]
    pub fn narrow(self, channel: f64) -> u8 {
        match self {
            Narrowing::Clamp => clamp(channel, 0.0, 255.0) as u8,
            Narrowing::Wrap => (channel as i64) as u8,
        }
    }
}

/// Linear interpolation: each channel is `a * x + b * (1 - x)`.  So
/// `x == 1.0` gives `a` and `x == 0.0` gives `b`.  Weights outside
/// [0, 1] extrapolate, and the narrowing mode decides what happens to
/// channels that leave the eight-bit range.
pub fn mix(a: Color, b: Color, x: f64, narrowing: Narrowing) -> Color {
    let channel = |p: u8, q: u8| narrowing.narrow(f64::from(p) * x + f64::from(q) * (1.0 - x));
    Color {
        r: channel(a.r, b.r),
        g: channel(a.g, b.g),
        b: channel(a.b, b.b),
    }
}

/// Packs a buffer of colors into consecutive r, g, b bytes, the layout
/// binary pixmaps and most image viewers expect.
pub fn to_rgb_bytes(pixels: &[Color]) -> Vec<u8> {
    let mut raw = Vec::with_capacity(pixels.len() * 3);
    for pixel in pixels {
        raw.extend_from_slice(&pixel.channels());
    }
    raw
}
