//! Incremental (delta) PID controller.
//!
//! Each cycle returns the *change* in actuation; the caller adds it onto the
//! previous absolute command. The derivative is a second difference over the
//! last three errors, so no integral sum is kept and the controller cannot wind up.
//!
//! # Example
//! ```rust
//! use pid_core::utils::{Controller, Gains, IncrementalPid};
//! let mut pid = IncrementalPid::new(50.0).with_gains(Gains::new(0.3, 0.5, 0.0));
//! let delta = pid.calculate(3.4);
//! assert!((delta - 37.28).abs() < 1e-9);
//! ```

use super::{Controller, PidMode, PidState};

/// PID controller producing per-cycle output deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncrementalPid {
    state: PidState,
    /// Error from two cycles ago.
    error_before_previous: f64,
}

impl IncrementalPid {
    /// Create an initialized controller with zero gains and no clamp.
    pub fn new(target: f64) -> Self {
        Self {
            state: PidState::new(target),
            error_before_previous: 0.0,
        }
    }

    pub fn error_before_previous(&self) -> f64 {
        self.error_before_previous
    }
}

impl Controller for IncrementalPid {
    fn mode(&self) -> PidMode {
        PidMode::Incremental
    }

    fn state(&self) -> &PidState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PidState {
        &mut self.state
    }

    fn initialize(
        &mut self,
        target: f64,
    ) {
        tracing::debug!(setpoint = target, "incremental controller initialized");
        self.state.reset(target);
        self.error_before_previous = 0.0;
    }

    fn calculate(
        &mut self,
        measured: f64,
    ) -> f64 {
        let error = self.state.begin_cycle(measured);
        let prev = self.state.previous_error;
        let gains = self.state.gains();

        let p = gains.kp * (error - prev);
        let i = gains.ki * error;
        let d = gains.kd * (error - 2.0 * prev + self.error_before_previous);
        let raw = p + i + d;

        // oldest sample first, then shift in the new one
        self.error_before_previous = prev;
        self.state.previous_error = error;

        tracing::trace!(measured, error, p, i, d, raw, "incremental cycle");
        self.state.finish_cycle(raw)
    }
}
