#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c`, starting from
//! zero, never runs off to infinity.  Points outside the set do run
//! off, and how quickly they do so is what gets colored.
//!
//! This crate renders one static image: each pixel is mapped onto a
//! window of the complex plane, the point's escape time is estimated
//! with a smoothing correction so that neighbouring pixels blend
//! instead of banding, and the result is mixed between two colors.
//! Writing the pixels anywhere is up to the caller.

#[macro_use]
extern crate failure;

pub mod color;
pub mod config;
pub mod escape;
pub mod planes;
pub mod render;
pub mod shading;

pub use color::{mix, Color, Narrowing};
pub use config::{ConfigError, RenderConfig};
pub use escape::{Escape, EscapeEstimator};
pub use planes::{Pixel, PlaneMapper, Point2D};
pub use render::{render, render_image, render_threaded};
pub use shading::{ColoringPolicy, Palette, Shader};
