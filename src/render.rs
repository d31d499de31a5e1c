// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The compositor: walks every pixel of the image, maps it onto the
//! complex plane, estimates how fast it escapes, and writes the
//! resulting color into the caller's buffer.
//!
//! Every pixel is independent of every other, so the threaded version
//! just cuts the buffer into bands of whole rows and hands each band
//! to its own scoped thread.  No locks; each slot is written exactly
//! once by exactly one thread.

use itertools::iproduct;

use crate::color::Color;
use crate::config::{ConfigError, RenderConfig};
use crate::escape::EscapeEstimator;
use crate::planes::{Pixel, PlaneMapper};
use crate::shading::Shader;

/// The per-pixel pipeline, built once from a validated configuration.
struct Compositor {
    plane: PlaneMapper,
    estimator: EscapeEstimator,
    shader: Shader,
}

impl Compositor {
    fn new(config: &RenderConfig) -> Self {
        Compositor {
            plane: config.plane(),
            estimator: config.estimator(),
            shader: config.shader(),
        }
    }

    #[inline]
    fn pixel(&self, pixel: &Pixel) -> Color {
        let c = self.plane.pixel_to_point(pixel);
        self.shader.shade(self.estimator.escape_value(c))
    }

    /// Fills `band`, which holds whole rows starting at `first_row`.
    fn band(&self, band: &mut [Color], first_row: usize) {
        let width = self.plane.integral_plane.0;
        let rows = band.len() / width;
        for (slot, (row, column)) in band
            .iter_mut()
            .zip(iproduct!(first_row..first_row + rows, 0..width))
        {
            *slot = self.pixel(&Pixel(column, row));
        }
    }
}

/// Renders the whole image into `buffer` on the calling thread.  The
/// buffer must hold exactly `width * height` colors.  If the
/// configuration is rejected the buffer is left untouched.
pub fn render(config: &RenderConfig, buffer: &mut [Color]) -> Result<(), ConfigError> {
    config.validate_buffer(buffer.len())?;
    Compositor::new(config).band(buffer, 0);
    Ok(())
}

/// As `render`, splitting the rows as evenly as possible across
/// `threads` scoped threads.  The output is identical to `render`'s
/// for any thread count.
pub fn render_threaded(
    config: &RenderConfig,
    buffer: &mut [Color],
    threads: usize,
) -> Result<(), ConfigError> {
    config.validate_buffer(buffer.len())?;
    if threads == 0 {
        return Err(ConfigError::NoThreads);
    }
    let threads = threads.min(config.height);
    let compositor = Compositor::new(config);
    let rows_per_band = config.height / threads + (config.height % threads != 0) as usize;
    let band_size = rows_per_band * config.width;

    let result = crossbeam::scope(|spawner| {
        let compositor = &compositor;
        for (i, band) in buffer.chunks_mut(band_size).enumerate() {
            spawner.spawn(move |_| compositor.band(band, i * rows_per_band));
        }
    });
    if let Err(panic) = result {
        std::panic::resume_unwind(panic);
    }
    Ok(())
}

/// Allocates a buffer for the configured image and renders into it.
pub fn render_image(config: &RenderConfig, threads: usize) -> Result<Vec<Color>, ConfigError> {
    config.validate()?;
    let mut buffer = vec![Color::BLACK; config.len()];
    render_threaded(config, &mut buffer, threads)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Narrowing;
    use crate::planes::Point2D;
    use crate::shading::{ColoringPolicy, LOG_ORANGE};

    // Never produced by any default palette: the channels of every
    // mix of black and a default orange keep red >= green >= blue.
    const SENTINEL: Color = Color::new(1, 2, 3);

    fn small(policy: ColoringPolicy) -> RenderConfig {
        RenderConfig::new(4, 4).policy(policy)
    }

    #[test]
    fn every_slot_is_written() {
        for &policy in &[
            ColoringPolicy::LogScale,
            ColoringPolicy::ArcTangent,
            ColoringPolicy::linear(),
        ] {
            let mut buffer = vec![SENTINEL; 16];
            render(&small(policy), &mut buffer).unwrap();
            assert!(buffer.iter().all(|c| *c != SENTINEL), "{:?}", policy);
        }
    }

    #[test]
    fn rejected_configuration_leaves_buffer_untouched() {
        let mut buffer = vec![SENTINEL; 16];
        let config = RenderConfig::new(4, 4).viewport(Point2D::new(0.0, 2.0));
        assert!(render(&config, &mut buffer).is_err());
        assert!(render_threaded(&config, &mut buffer, 4).is_err());
        assert!(buffer.iter().all(|c| *c == SENTINEL));

        let config = RenderConfig::new(0, 4);
        let empty = Err(ConfigError::EmptyImage {
            width: 0,
            height: 4,
        });
        assert_eq!(render(&config, &mut buffer), empty);
        assert_eq!(render_threaded(&config, &mut buffer, 4), empty);
        assert!(buffer.iter().all(|c| *c == SENTINEL));
    }

    #[test]
    fn huge_thread_counts_fall_back_to_one_band_per_row() {
        let config = RenderConfig::new(7, 5);
        let mut single = vec![SENTINEL; config.len()];
        render(&config, &mut single).unwrap();
        for &threads in &[5, 6, 1000, std::usize::MAX] {
            let mut banded = vec![SENTINEL; config.len()];
            render_threaded(&config, &mut banded, threads).unwrap();
            assert_eq!(single, banded, "{} threads", threads);
        }
    }

    #[test]
    fn unaddressable_image_is_rejected_before_rendering() {
        let config = RenderConfig::new(std::usize::MAX, 2);
        let mut buffer = vec![SENTINEL; 4];
        assert_eq!(
            render_threaded(&config, &mut buffer, 2),
            Err(ConfigError::TooLarge {
                width: std::usize::MAX,
                height: 2
            })
        );
        assert!(buffer.iter().all(|c| *c == SENTINEL));
    }

    #[test]
    fn wrong_buffer_length_is_rejected() {
        let mut buffer = vec![SENTINEL; 15];
        assert_eq!(
            render(&RenderConfig::new(4, 4), &mut buffer),
            Err(ConfigError::BufferSize {
                expected: 16,
                actual: 15
            })
        );
        assert!(buffer.iter().all(|c| *c == SENTINEL));
    }

    #[test]
    fn zero_threads_is_rejected() {
        let mut buffer = vec![SENTINEL; 16];
        assert_eq!(
            render_threaded(&RenderConfig::new(4, 4), &mut buffer, 0),
            Err(ConfigError::NoThreads)
        );
        assert!(buffer.iter().all(|c| *c == SENTINEL));
    }

    #[test]
    fn repeated_renders_are_identical() {
        let config = RenderConfig::new(64, 48);
        let a = render_image(&config, 1).unwrap();
        let b = render_image(&config, 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn thread_count_does_not_change_output() {
        for &policy in &[ColoringPolicy::LogScale, ColoringPolicy::ArcTangent] {
            let config = RenderConfig::new(37, 23).policy(policy);
            let mut single = vec![SENTINEL; config.len()];
            render(&config, &mut single).unwrap();
            for threads in 1..9 {
                let mut banded = vec![SENTINEL; config.len()];
                render_threaded(&config, &mut banded, threads).unwrap();
                assert_eq!(single, banded, "{} threads", threads);
            }
            // more threads than rows
            let mut banded = vec![SENTINEL; config.len()];
            render_threaded(&config, &mut banded, 64).unwrap();
            assert_eq!(single, banded);
        }
    }

    #[test]
    fn pixels_land_row_major() {
        let config = RenderConfig::new(5, 3).policy(ColoringPolicy::ArcTangent);
        let buffer = render_image(&config, 2).unwrap();
        let compositor = Compositor::new(&config);
        for row in 0..3 {
            for column in 0..5 {
                assert_eq!(
                    buffer[row * 5 + column],
                    compositor.pixel(&Pixel(column, row))
                );
            }
        }
    }

    #[test]
    fn interior_is_black_and_exterior_is_not() {
        // Centered on the origin with a tiny window, every pixel is
        // inside the main cardioid.
        let config = RenderConfig::new(8, 8)
            .center(Point2D::new(0.0, 0.0))
            .viewport(Point2D::new(0.01, 0.01));
        let buffer = render_image(&config, 1).unwrap();
        assert!(buffer.iter().all(|c| *c == Color::BLACK));

        // Far outside the set everything escapes on the first step.
        let config = RenderConfig::new(8, 8)
            .policy(ColoringPolicy::ArcTangent)
            .center(Point2D::new(-10.0, 0.0))
            .viewport(Point2D::new(1.0, 1.0));
        let buffer = render_image(&config, 1).unwrap();
        assert!(buffer.iter().all(|c| *c != Color::BLACK));
    }

    #[test]
    fn narrowing_mode_reaches_the_pixels() {
        // Far points have escape values well below the scale, so the
        // log-scale weight is negative and channels overflow.
        let base = RenderConfig::new(8, 8)
            .center(Point2D::new(-10.0, 0.0))
            .viewport(Point2D::new(1.0, 1.0));
        let clamped = render_image(&base, 1).unwrap();
        let wrapped = render_image(&base.narrowing(Narrowing::Wrap), 1).unwrap();
        assert_ne!(clamped, wrapped);
        assert!(clamped.iter().all(|c| c.r >= LOG_ORANGE.r));
    }
}
