//! Runtime systems that drive the pulse field each frame.

/// Throttled logging of pulse and frame-rate statistics.
pub mod diagnostics;

/// Pulse plugin: scheduler ticks, line entity lifecycle and render sync.
pub mod pulse;
