//! Controller contract and shared state.
//!
//! - `incremental`: delta-output PID driven by a two-sample error history
//! - `positional`: absolute-output PID with a running error sum
//! - `selector`: `Pid`, the variant chosen from a `PidMode` at construction

pub mod incremental;
pub mod positional;
pub mod selector;

use serde::{Deserialize, Serialize};

use crate::utils::math::clamp::{ConfigError, OutputClamp};

pub use incremental::IncrementalPid;
pub use positional::PositionalPid;
pub use selector::{ControllerConfig, Pid};

/// Which PID variant a controller runs.
///
/// Serialized as `"incremental"` or `"positional"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PidMode {
    /// Each cycle yields the change in actuation.
    #[default]
    Incremental,
    /// Each cycle yields the absolute actuation.
    Positional,
}

/// Proportional, integral and derivative gains.
///
/// No validation is performed; zero and negative gains are accepted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Gains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Gains {
    pub fn new(
        kp: f64,
        ki: f64,
        kd: f64,
    ) -> Self {
        Self { kp, ki, kd }
    }
}

/// Runtime reconfiguration commands for a running controller.
///
/// Serialized as JSON with tag `"pc"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "pc", rename_all = "snake_case")]
pub enum PidCommand {
    /// Reset the setpoint and zero the error history.
    Initialize { target: f64 },
    /// Replace all three gains.
    SetParameters { kp: f64, ki: f64, kd: f64 },
    /// Move the setpoint, keeping the error history.
    SetTarget { target: f64 },
    /// Attach a clamp with the given ceiling, or detach it with `null`.
    SetOutputMax { max: Option<f64> },
}

/// State shared by both controller variants.
///
/// The error history is only advanced by [`Controller::calculate`]; it cannot be
/// written from outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidState {
    gains: Gains,
    target: f64,
    pub(crate) current_error: f64,
    pub(crate) previous_error: f64,
    clamp: Option<OutputClamp>,
}

impl PidState {
    pub(crate) fn new(target: f64) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn gains(&self) -> Gains {
        self.gains
    }

    pub fn set_gains(
        &mut self,
        gains: Gains,
    ) {
        self.gains = gains;
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(
        &mut self,
        target: f64,
    ) {
        self.target = target;
    }

    pub fn current_error(&self) -> f64 {
        self.current_error
    }

    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }

    pub fn output_clamp(&self) -> Option<OutputClamp> {
        self.clamp
    }

    pub fn set_output_clamp(
        &mut self,
        clamp: Option<OutputClamp>,
    ) {
        self.clamp = clamp;
    }

    /// Set a new target and zero the shared history. Gains and clamp survive.
    pub(crate) fn reset(
        &mut self,
        target: f64,
    ) {
        self.target = target;
        self.current_error = 0.0;
        self.previous_error = 0.0;
    }

    /// Record `target - measured` as this cycle's error and return it.
    pub(crate) fn begin_cycle(
        &mut self,
        measured: f64,
    ) -> f64 {
        self.current_error = self.target - measured;
        self.current_error
    }

    /// Apply the clamp policy, if any, to a raw output.
    pub(crate) fn finish_cycle(
        &self,
        raw: f64,
    ) -> f64 {
        if !raw.is_finite() {
            tracing::warn!(raw, setpoint = self.target, "non-finite controller output");
        }
        match self.clamp {
            Some(clamp) => clamp.apply(raw),
            None => raw,
        }
    }
}

/// Common interface for PID controllers, whatever their output mode.
///
/// Implementors provide access to their [`PidState`], the variant-specific
/// history reset and the per-cycle algorithm; everything else is shared.
pub trait Controller {
    /// Variant of this controller. Fixed for its whole lifetime.
    fn mode(&self) -> PidMode;

    fn state(&self) -> &PidState;

    fn state_mut(&mut self) -> &mut PidState;

    /// Reset the setpoint to `target` and zero every error-history field.
    fn initialize(
        &mut self,
        target: f64,
    );

    /// Advance the controller by one cycle and return its output.
    ///
    /// Must be called exactly once per control tick.
    fn calculate(
        &mut self,
        measured: f64,
    ) -> f64;

    /// Overwrite the gains.
    fn set_parameters(
        &mut self,
        kp: f64,
        ki: f64,
        kd: f64,
    ) {
        tracing::debug!(kp, ki, kd, mode = ?self.mode(), "gains updated");
        self.state_mut().set_gains(Gains::new(kp, ki, kd));
    }

    /// Move the setpoint without touching the error history.
    fn set_target(
        &mut self,
        target: f64,
    ) {
        tracing::debug!(setpoint = target, "setpoint updated");
        self.state_mut().set_target(target);
    }

    fn target(&self) -> f64 {
        self.state().target()
    }

    fn gains(&self) -> Gains {
        self.state().gains()
    }

    /// Error recorded by the most recent `calculate`.
    fn current_error(&self) -> f64 {
        self.state().current_error()
    }

    /// Error from one cycle before the most recent one.
    fn previous_error(&self) -> f64 {
        self.state().previous_error()
    }

    fn output_clamp(&self) -> Option<OutputClamp> {
        self.state().output_clamp()
    }

    /// Attach or detach the output clamp.
    fn set_output_clamp(
        &mut self,
        clamp: Option<OutputClamp>,
    ) {
        self.state_mut().set_output_clamp(clamp);
    }

    /// Builder form of [`Controller::set_parameters`].
    fn with_gains(
        mut self,
        gains: Gains,
    ) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_gains(gains);
        self
    }

    /// Builder form of [`Controller::set_output_clamp`].
    fn with_output_clamp(
        mut self,
        clamp: OutputClamp,
    ) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_output_clamp(Some(clamp));
        self
    }

    /// Execute a `PidCommand` against this controller.
    ///
    /// Only `SetOutputMax` can fail, when the ceiling is rejected; the controller
    /// is left unchanged in that case.
    #[tracing::instrument(level = "debug", skip(self))]
    fn ex_command(
        &mut self,
        cmd: PidCommand,
    ) -> Result<(), ConfigError> {
        match cmd {
            PidCommand::Initialize { target } => self.initialize(target),
            PidCommand::SetParameters { kp, ki, kd } => self.set_parameters(kp, ki, kd),
            PidCommand::SetTarget { target } => self.set_target(target),
            PidCommand::SetOutputMax { max } => {
                let clamp = max.map(OutputClamp::new).transpose()?;
                self.set_output_clamp(clamp);
            }
        }
        Ok(())
    }
}
