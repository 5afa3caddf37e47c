//! Utility re-exports for the PID controller crate.
//!
//! - `controllers`: the shared `Controller` contract, the incremental and
//!   positional variants, and the mode selector
//! - `math`: output clamping applied as the last step of a cycle

pub mod controllers;
pub mod math;

pub use controllers::{
    Controller, ControllerConfig, Gains, IncrementalPid, Pid, PidCommand, PidMode, PidState,
    PositionalPid,
};
pub use math::clamp::{ConfigError, OutputClamp, DEFAULT_OUTPUT_MAX};
