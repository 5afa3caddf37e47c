//! Output clamp policy for controller outputs.
//!
//! An `OutputClamp` maps a raw controller output into `[0, max]`. It is attached
//! to a controller optionally and runs after the raw output has been computed.
//!
//! # Example
//! ```rust
//! use pid_core::utils::math::clamp::OutputClamp;
//! let clamp = OutputClamp::default();
//! assert_eq!(clamp.apply(150.0), 100.0);
//! assert_eq!(clamp.apply(-5.0), 0.0);
//! ```

use thiserror::Error;

/// Ceiling used by [`OutputClamp::default`].
pub const DEFAULT_OUTPUT_MAX: f64 = 100.0;

/// Errors raised while configuring a controller.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The clamp ceiling is negative, infinite or NaN.
    #[error("output ceiling must be finite and non-negative, got {0}")]
    InvalidOutputMax(f64),
}

/// Clamps controller output into `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputClamp {
    max: f64,
}

impl OutputClamp {
    /// Create a clamp with the given ceiling.
    ///
    /// Fails unless `max` is finite and `>= 0`, since `[0, max]` would otherwise be empty.
    pub fn new(max: f64) -> Result<Self, ConfigError> {
        if !max.is_finite() || max < 0.0 {
            return Err(ConfigError::InvalidOutputMax(max));
        }
        Ok(Self { max })
    }

    /// Upper bound of the output range.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Map `raw` into `[0, max]`.
    ///
    /// Values in range pass through unchanged. NaN is not comparable and is
    /// returned as-is so the caller can see the fault.
    pub fn apply(
        &self,
        raw: f64,
    ) -> f64 {
        if raw < 0.0 {
            0.0
        } else if raw > self.max {
            self.max
        } else {
            raw
        }
    }
}

impl Default for OutputClamp {
    fn default() -> Self {
        Self {
            max: DEFAULT_OUTPUT_MAX,
        }
    }
}
