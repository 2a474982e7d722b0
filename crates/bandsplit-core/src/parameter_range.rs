//! Range mapping for parameter normalization.
//!
//! Maps plain values (Hz, linear gain) to the normalized 0.0-1.0 domain that
//! host automation works in, and back.
//!
//! - [`LinearMapper`] - straight interpolation (gains, feedback)
//! - [`PowerMapper`] - skewed curve (crossover frequencies)
//!
//! ```ignore
//! let crossover = PowerMapper::new(20.0..=20000.0, 0.25);
//! // Most of the normalized travel covers the low end of the range
//! assert!(crossover.denormalize(0.5) < 1300.0);
//! ```

use std::ops::RangeInclusive;

/// Conversion between plain and normalized values.
///
/// Implementations are shared with parameter objects read from several
/// threads, so they must be `Send + Sync`.
pub trait RangeMapper: Send + Sync {
    /// Plain value to normalized (0.0-1.0). Out-of-range input is clamped.
    fn normalize(&self, plain: f64) -> f64;

    /// Normalized value to plain. Input outside 0.0-1.0 is clamped.
    fn denormalize(&self, normalized: f64) -> f64;

    /// Plain range as `(min, max)`.
    fn range(&self) -> (f64, f64);
}

/// Linear range mapping.
#[derive(Debug, Clone)]
pub struct LinearMapper {
    min: f64,
    max: f64,
}

impl LinearMapper {
    /// Create a linear mapper over `range`.
    pub fn new(range: RangeInclusive<f64>) -> Self {
        Self {
            min: *range.start(),
            max: *range.end(),
        }
    }
}

impl RangeMapper for LinearMapper {
    fn normalize(&self, plain: f64) -> f64 {
        if (self.max - self.min).abs() < f64::EPSILON {
            return 0.5;
        }
        ((plain - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    fn denormalize(&self, normalized: f64) -> f64 {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }

    fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Power curve range mapping.
///
/// `normalized = linear ^ exponent`, where `linear` is the plain value's
/// position in the range. An exponent below 1.0 spreads the bottom of the
/// range over more of the normalized travel, which suits frequencies.
///
/// # Panics
///
/// Panics if the exponent is not positive or the range is empty.
#[derive(Debug, Clone)]
pub struct PowerMapper {
    min: f64,
    max: f64,
    exponent: f64,
    inv_exponent: f64,
}

impl PowerMapper {
    /// Create a power mapper over `range` with the given exponent.
    pub fn new(range: RangeInclusive<f64>, exponent: f64) -> Self {
        let min = *range.start();
        let max = *range.end();
        assert!(max > min, "PowerMapper requires max > min, got min={min}, max={max}");
        assert!(exponent > 0.0, "PowerMapper requires positive exponent, got {exponent}");

        Self {
            min,
            max,
            exponent,
            inv_exponent: 1.0 / exponent,
        }
    }
}

impl RangeMapper for PowerMapper {
    fn normalize(&self, plain: f64) -> f64 {
        let linear = ((plain - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        linear.powf(self.exponent)
    }

    fn denormalize(&self, normalized: f64) -> f64 {
        let linear = normalized.clamp(0.0, 1.0).powf(self.inv_exponent);
        self.min + linear * (self.max - self.min)
    }

    fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}
