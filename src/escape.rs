// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time estimation for a single point.
//!
//! A point `c` is in the Mandelbrot set if the orbit of `z = z^2 + c`,
//! starting at zero, stays bounded.  Once `|z|` exceeds 2 the orbit is
//! guaranteed to run off to infinity, so the iteration at which that
//! happens is a measure of how "fast" the point escapes.  A raw
//! integer count produces visible bands in the final image; the
//! estimator corrects it with how far past the escape radius the
//! orbit landed, giving a continuous value.

use num::Complex;

/// The iteration limit used when none is configured.
pub const DEFAULT_LIMIT: usize = 300;

const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// How the estimator reached its answer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// The point lies in the region bounded by the closed-form
    /// cardioid test.  No iteration was performed.
    Cardioid,
    /// The orbit stayed inside the escape radius for every iteration
    /// up to the limit.
    Bounded,
    /// The orbit escaped.
    Escaped {
        /// The iteration (counting from 1) at which `|z|^2 >= 4`.
        iteration: usize,
        /// `|z|^2` at that iteration.
        norm_sqr: f64,
        /// The smoothed, fractional escape value.
        value: f64,
    },
}

impl Escape {
    /// The escape value: 0.0 for points presumed to be in the set,
    /// the smoothed iteration count otherwise.
    pub fn value(&self) -> f64 {
        match *self {
            Escape::Cardioid | Escape::Bounded => 0.0,
            Escape::Escaped { value, .. } => value,
        }
    }

    /// True if the point is presumed to be in the set.
    pub fn is_inside(&self) -> bool {
        match *self {
            Escape::Escaped { .. } => false,
            _ => true,
        }
    }
}

/// The closed-form interior test.  Points for which this returns true
/// will not diverge and need not be iterated.  The inequality is kept
/// exactly as written; rearranging it changes which boundary points
/// take the short cut.
#[inline]
pub fn in_main_cardioid(c: Complex<f64>) -> bool {
    let r_squared = c.im * c.im + c.re * c.re;
    r_squared * (8.0 * r_squared - 3.0) < 3.0 / 32.0 - c.re
}

/// Computes escape values with a fixed iteration limit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeEstimator {
    limit: usize,
    log_limit: f64,
}

impl Default for EscapeEstimator {
    fn default() -> Self {
        EscapeEstimator::new(DEFAULT_LIMIT)
    }
}

impl EscapeEstimator {
    /// The limit must be at least 2, otherwise `ln(limit)` is not
    /// positive and the smoothing term is meaningless.  The render
    /// configuration rejects smaller limits before we get here.
    pub fn new(limit: usize) -> Self {
        EscapeEstimator {
            limit,
            log_limit: (limit as f64).ln(),
        }
    }

    /// The iteration limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Classifies a point and, if it escapes, computes the smoothed
    /// escape value
    ///
    /// `n - ln(ln(|z|) / ln(limit)) / ln(2)`
    ///
    /// The inner logarithm would be zero only if `|z| == 1`.  At escape
    /// `|z| >= 2`, so `ln(|z|) / ln(limit)` is strictly positive for
    /// every `limit >= 2` and the outer logarithm is always defined.
    /// Values of `|z|^2` very close to 4.0 are an accepted precision
    /// edge: they carry ordinary floating point rounding into the
    /// result and are deliberately not special-cased.
    pub fn estimate(&self, c: Complex<f64>) -> Escape {
        if in_main_cardioid(c) {
            return Escape::Cardioid;
        }

        let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
        for i in 1..self.limit {
            z = z * z + c;
            let r_squared = z.im * z.im + z.re * z.re;
            if r_squared >= ESCAPE_RADIUS_SQUARED {
                let value = (i as f64)
                    - (r_squared.sqrt().ln() / self.log_limit).ln() / std::f64::consts::LN_2;
                return Escape::Escaped {
                    iteration: i,
                    norm_sqr: r_squared,
                    value,
                };
            }
        }
        Escape::Bounded
    }

    /// Shorthand for `estimate(c).value()`.
    #[inline]
    pub fn escape_value(&self, c: Complex<f64>) -> f64 {
        self.estimate(c).value()
    }
}
