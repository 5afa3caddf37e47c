//! Variant selection.
//!
//! `Pid` owns whichever controller a `PidMode` picked and forwards the shared
//! contract to it, so call sites never branch on the mode themselves.
//!
//! # Example
//! ```rust
//! use pid_core::utils::{Controller, ControllerConfig, Gains, Pid, PidMode};
//! let config = ControllerConfig {
//!     mode: PidMode::Positional,
//!     target: 50.0,
//!     gains: Gains::new(0.3, 0.5, 0.0),
//!     output_max: Some(100.0),
//! };
//! let mut pid = Pid::from_config(&config).unwrap();
//! let out = pid.calculate(3.4);
//! assert!((out - 37.28).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use super::{Controller, Gains, IncrementalPid, PidMode, PidState, PositionalPid};
use crate::utils::math::clamp::{ConfigError, OutputClamp};

/// Everything needed to build a controller.
///
/// `gains` defaults to all zeros and `output_max` to no clamp when omitted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ControllerConfig {
    pub mode: PidMode,
    pub target: f64,
    #[serde(default)]
    pub gains: Gains,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_max: Option<f64>,
}

/// A controller of either variant, chosen once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pid {
    Incremental(IncrementalPid),
    Positional(PositionalPid),
}

impl Pid {
    /// Create an initialized controller of the given variant.
    pub fn new(
        mode: PidMode,
        target: f64,
    ) -> Self {
        match mode {
            PidMode::Incremental => Pid::Incremental(IncrementalPid::new(target)),
            PidMode::Positional => Pid::Positional(PositionalPid::new(target)),
        }
    }

    /// Build and configure a controller from `config`.
    ///
    /// Fails only if `output_max` is not a usable clamp ceiling.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, ConfigError> {
        let clamp = config.output_max.map(OutputClamp::new).transpose()?;
        let mut pid = Pid::new(config.mode, config.target).with_gains(config.gains);
        pid.set_output_clamp(clamp);
        tracing::debug!(?config, "controller built from config");
        Ok(pid)
    }

    /// Running error sum, for the positional variant only.
    pub fn integral_sum(&self) -> Option<f64> {
        match self {
            Pid::Incremental(_) => None,
            Pid::Positional(pid) => Some(pid.integral_sum()),
        }
    }

    /// Error from two cycles ago, for the incremental variant only.
    pub fn error_before_previous(&self) -> Option<f64> {
        match self {
            Pid::Incremental(pid) => Some(pid.error_before_previous()),
            Pid::Positional(_) => None,
        }
    }

    fn inner(&self) -> &dyn Controller {
        match self {
            Pid::Incremental(pid) => pid,
            Pid::Positional(pid) => pid,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Controller {
        match self {
            Pid::Incremental(pid) => pid,
            Pid::Positional(pid) => pid,
        }
    }
}

impl Controller for Pid {
    fn mode(&self) -> PidMode {
        self.inner().mode()
    }

    fn state(&self) -> &PidState {
        self.inner().state()
    }

    fn state_mut(&mut self) -> &mut PidState {
        self.inner_mut().state_mut()
    }

    fn initialize(
        &mut self,
        target: f64,
    ) {
        self.inner_mut().initialize(target);
    }

    fn calculate(
        &mut self,
        measured: f64,
    ) -> f64 {
        self.inner_mut().calculate(measured)
    }
}

impl From<IncrementalPid> for Pid {
    fn from(pid: IncrementalPid) -> Self {
        Pid::Incremental(pid)
    }
}

impl From<PositionalPid> for Pid {
    fn from(pid: PositionalPid) -> Self {
        Pid::Positional(pid)
    }
}
