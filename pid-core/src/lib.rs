//! Incremental and positional PID controllers for no-std control loops.
//!
//! Both variants implement [`utils::Controller`]; pick one at construction time
//! with [`utils::PidMode`] and drive it once per control tick.
//!
//! For a runnable driving loop, see the `loop-sim` binary in `pid-app/`.
#![cfg_attr(not(test), no_std)]

pub mod utils;
