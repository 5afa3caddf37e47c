//! Positional (absolute) PID controller.
//!
//! Each cycle returns the absolute actuation. The integral term is a running sum
//! of every error since the last `initialize`; bound it externally with an
//! [`OutputClamp`](crate::utils::OutputClamp) if the plant saturates.

use super::{Controller, PidMode, PidState};

/// PID controller producing absolute outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionalPid {
    state: PidState,
    integral_sum: f64,
}

impl PositionalPid {
    /// Create an initialized controller with zero gains and no clamp.
    pub fn new(target: f64) -> Self {
        Self {
            state: PidState::new(target),
            integral_sum: 0.0,
        }
    }

    /// Sum of all errors seen since the last initialization.
    pub fn integral_sum(&self) -> f64 {
        self.integral_sum
    }
}

impl Controller for PositionalPid {
    fn mode(&self) -> PidMode {
        PidMode::Positional
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
        tracing::debug!(setpoint = target, "positional controller initialized");
        self.state.reset(target);
        self.integral_sum = 0.0;
    }

    fn calculate(
        &mut self,
        measured: f64,
    ) -> f64 {
        let error = self.state.begin_cycle(measured);
        self.integral_sum += error;
        let gains = self.state.gains();

        let p = gains.kp * error;
        let i = gains.ki * self.integral_sum;
        let d = gains.kd * (error - self.state.previous_error);
        let raw = p + i + d;

        self.state.previous_error = error;

        tracing::trace!(
            measured,
            error,
            integral_sum = self.integral_sum,
            raw,
            "positional cycle"
        );
        self.state.finish_cycle(raw)
    }
}
