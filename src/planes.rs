// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane described by a center and
//! the size of the visible region.
use num::Complex;

/// A pair of floating point values.  Used both for a point on the
/// plane (the center of the view) and for a size (the viewport).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point2D {
    /// Horizontal component, or the width of a region.
    pub x: f64,
    /// Vertical component, or the height of a region.
    pub y: f64,
}

impl Point2D {
    /// Constructor.
    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the column, row of a pixel in an integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels on the integral plane to points on the complex plane.
/// The visible region is `viewport` wide and high, and it sits at
/// `-center`.  Pixel coordinates are normalized to [0, 1) before
/// scaling, so the mapping does not depend on the resolution.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    pub integral_plane: IntegralPlane,
    /// Translation of the view.  Subtracted from every mapped point.
    pub center: Point2D,
    /// The size of the visible region of the complex plane.
    pub viewport: Point2D,
}

impl PlaneMapper {
    /// Constructor.  The caller guarantees that width and height are
    /// non-zero; `RenderConfig::validate` is where that gets checked.
    pub fn new(width: usize, height: usize, center: Point2D, viewport: Point2D) -> PlaneMapper {
        PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            center,
            viewport,
        }
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral cartesian plane, map it to a
    /// point on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let u = (pixel.0 as f64) / (self.integral_plane.0 as f64);
        let v = (pixel.1 as f64) / (self.integral_plane.1 as f64);
        Complex::new(
            (u - 0.5) * self.viewport.x - self.center.x,
            (v - 0.5) * self.viewport.y - self.center.y,
        )
    }

    /// The linear, row-major offset of a pixel from the root of the
    /// image buffer.
    pub fn pixel_to_offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.integral_plane.0 + pixel.0
    }
}
