// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parameters of a single render, and the checks they must pass
//! before any pixel is touched.

use crate::color::Narrowing;
use crate::escape::{EscapeEstimator, DEFAULT_LIMIT};
use crate::planes::{PlaneMapper, Point2D};
use crate::shading::{ColoringPolicy, Palette, Shader, DEFAULT_SCALE};

/// Reasons a render refuses to start.
#[derive(Debug, Fail, PartialEq)]
pub enum ConfigError {
    /// The image has no pixels.
    #[fail(display = "Image dimensions must be positive, got {}x{}", width, height)]
    EmptyImage {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// The viewport is not a finite, positive size.
    #[fail(display = "Viewport must be finite and positive, got {},{}", x, y)]
    BadViewport {
        /// Requested viewport width.
        x: f64,
        /// Requested viewport height.
        y: f64,
    },
    /// The center is not a finite point.
    #[fail(display = "Center must be finite, got {},{}", x, y)]
    BadCenter {
        /// Requested center, real part.
        x: f64,
        /// Requested center, imaginary part.
        y: f64,
    },
    /// The log-scale policy was given a scale it cannot divide by.
    #[fail(display = "Scale must be finite and positive, got {}", _0)]
    BadScale(f64),
    /// The linear policy was given a divisor it cannot divide by.
    #[fail(display = "Divisor must be finite and positive, got {}", _0)]
    BadDivisor(f64),
    /// The smoothing term needs `ln(limit) > 0`.
    #[fail(display = "Iteration limit must be at least 2, got {}", _0)]
    BadLimit(usize),
    /// The caller's buffer is not exactly one slot per pixel.
    #[fail(display = "Buffer holds {} pixels, image needs {}", actual, expected)]
    BufferSize {
        /// width * height
        expected: usize,
        /// The buffer's length.
        actual: usize,
    },
    /// width * height does not fit in a `usize`.
    #[fail(display = "Image of {}x{} pixels is too large to address", width, height)]
    TooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// A threaded render was asked to use no threads.
    #[fail(display = "Thread count must be at least 1")]
    NoThreads,
}

/// The full description of one image.  Constructed once per render,
/// never modified while the render runs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Subtracted from every mapped point; the view sits at `-center`.
    pub center: Point2D,
    /// Width and height of the visible region of the complex plane.
    pub viewport: Point2D,
    /// Divides the escape value under the log-scale policy.
    pub scale: f64,
    /// How escape values become mixing weights.
    pub policy: ColoringPolicy,
    /// The two colors mixed per pixel.
    pub palette: Palette,
    /// Maximum iterations per point.
    pub limit: usize,
    /// How mixed channels are narrowed to eight bits.
    pub narrowing: Narrowing,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig::new(800, 600)
    }
}

impl RenderConfig {
    /// A configuration of the given size with every other setting at
    /// its default: the whole set in a 3x2 window, log-scale coloring.
    pub fn new(width: usize, height: usize) -> Self {
        let policy = ColoringPolicy::default();
        RenderConfig {
            width,
            height,
            center: Point2D::new(0.75, 0.0),
            viewport: Point2D::new(3.0, 2.0),
            scale: DEFAULT_SCALE,
            policy,
            palette: policy.default_palette(),
            limit: DEFAULT_LIMIT,
            narrowing: Narrowing::default(),
        }
    }

    /// Sets the center.
    pub fn center(mut self, center: Point2D) -> Self {
        self.center = center;
        self
    }

    /// Sets the viewport.
    pub fn viewport(mut self, viewport: Point2D) -> Self {
        self.viewport = viewport;
        self
    }

    /// Sets the log-scale divisor.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the coloring policy and resets the palette to the one the
    /// policy expects.  Call `palette` afterwards to override it.
    pub fn policy(mut self, policy: ColoringPolicy) -> Self {
        self.policy = policy;
        self.palette = policy.default_palette();
        self
    }

    /// Sets the palette.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Sets the iteration limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the narrowing mode.
    pub fn narrowing(mut self, narrowing: Narrowing) -> Self {
        self.narrowing = narrowing;
        self
    }

    /// The number of pixels in the image, saturating at `usize::MAX`
    /// for sizes `validate` rejects.
    pub fn len(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Checks every precondition of a render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_empty() {
            return Err(ConfigError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(ConfigError::TooLarge {
                width: self.width,
                height: self.height,
            });
        }
        let Point2D { x, y } = self.viewport;
        if !self.viewport.is_finite() || x <= 0.0 || y <= 0.0 {
            return Err(ConfigError::BadViewport { x, y });
        }
        if !self.center.is_finite() {
            return Err(ConfigError::BadCenter {
                x: self.center.x,
                y: self.center.y,
            });
        }
        match self.policy {
            ColoringPolicy::LogScale if !positive(self.scale) => {
                return Err(ConfigError::BadScale(self.scale));
            }
            ColoringPolicy::Linear { divisor } if !positive(divisor) => {
                return Err(ConfigError::BadDivisor(divisor));
            }
            _ => {}
        }
        if self.limit < 2 {
            return Err(ConfigError::BadLimit(self.limit));
        }
        Ok(())
    }

    /// As `validate`, and also checks the caller's buffer length.
    pub fn validate_buffer(&self, len: usize) -> Result<(), ConfigError> {
        self.validate()?;
        if len != self.len() {
            return Err(ConfigError::BufferSize {
                expected: self.len(),
                actual: len,
            });
        }
        Ok(())
    }

    /// The pixel-to-plane mapping this configuration describes.
    pub fn plane(&self) -> PlaneMapper {
        PlaneMapper::new(self.width, self.height, self.center, self.viewport)
    }

    /// The estimator this configuration describes.
    pub fn estimator(&self) -> EscapeEstimator {
        EscapeEstimator::new(self.limit)
    }

    /// The coloring this configuration describes.
    pub fn shader(&self) -> Shader {
        Shader {
            policy: self.policy,
            palette: self.palette,
            scale: self.scale,
            narrowing: self.narrowing,
        }
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::shading::ATAN_ORANGE;

    #[test]
    fn defaults_are_valid() {
        let config = RenderConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.limit, 300);
        assert_eq!(config.len(), 800 * 600);
    }

    #[test]
    fn rejects_empty_images() {
        assert_eq!(
            RenderConfig::new(0, 4).validate(),
            Err(ConfigError::EmptyImage {
                width: 0,
                height: 4
            })
        );
        assert!(RenderConfig::new(4, 0).validate().is_err());
    }

    #[test]
    fn rejects_bad_viewports() {
        for &(x, y) in &[(0.0, 2.0), (3.0, 0.0), (-1.0, 2.0), (std::f64::INFINITY, 2.0)] {
            let config = RenderConfig::new(4, 4).viewport(Point2D::new(x, y));
            match config.validate() {
                Err(ConfigError::BadViewport { .. }) => {}
                other => panic!("{},{} gave {:?}", x, y, other),
            }
        }
        let nan = RenderConfig::new(4, 4).viewport(Point2D::new(std::f64::NAN, 1.0));
        assert!(nan.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_center() {
        let config = RenderConfig::new(4, 4).center(Point2D::new(0.0, std::f64::NAN));
        match config.validate() {
            Err(ConfigError::BadCenter { .. }) => {}
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn scale_only_matters_for_log_scale() {
        let config = RenderConfig::new(4, 4).scale(0.0);
        assert_eq!(config.validate(), Err(ConfigError::BadScale(0.0)));
        let config = config.policy(ColoringPolicy::ArcTangent);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_divisor() {
        let config = RenderConfig::new(4, 4).policy(ColoringPolicy::Linear { divisor: -1.0 });
        assert_eq!(config.validate(), Err(ConfigError::BadDivisor(-1.0)));
    }

    #[test]
    fn rejects_tiny_limits() {
        assert_eq!(
            RenderConfig::new(4, 4).limit(1).validate(),
            Err(ConfigError::BadLimit(1))
        );
        assert_eq!(RenderConfig::new(4, 4).limit(2).validate(), Ok(()));
    }

    #[test]
    fn rejects_unaddressable_sizes() {
        let config = RenderConfig::new(std::usize::MAX, 2);
        let expected = Err(ConfigError::TooLarge {
            width: std::usize::MAX,
            height: 2,
        });
        assert_eq!(config.validate(), expected);
        assert_eq!(config.validate_buffer(0), expected);
        assert_eq!(config.len(), std::usize::MAX);
    }

    #[test]
    fn checks_buffer_length() {
        let config = RenderConfig::new(4, 4);
        assert_eq!(config.validate_buffer(16), Ok(()));
        assert_eq!(
            config.validate_buffer(15),
            Err(ConfigError::BufferSize {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn policy_resets_palette_and_palette_overrides_it() {
        let config = RenderConfig::new(4, 4).policy(ColoringPolicy::ArcTangent);
        assert_eq!(config.palette.first, ATAN_ORANGE);
        let blue = Palette::new(Color::new(0, 0, 255), Color::BLACK);
        let config = config.palette(blue);
        assert_eq!(config.palette, blue);
        assert_eq!(config.shader().palette, blue);
    }

    #[test]
    fn errors_describe_themselves() {
        let e = ConfigError::BufferSize {
            expected: 16,
            actual: 15,
        };
        assert_eq!(e.to_string(), "Buffer holds 15 pixels, image needs 16");
        assert_eq!(
            ConfigError::EmptyImage {
                width: 0,
                height: 3
            }
            .to_string(),
            "Image dimensions must be positive, got 0x3"
        );
    }
}
