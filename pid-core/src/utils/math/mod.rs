//! Math utilities for the PID controllers.
//!
//! This module provides the output clamp policy shared by both controller variants.

pub mod clamp;
