//! Point cloud pulse field: clusters wired to two reference grids, lit by
//! overlapping timed pulses.

pub mod engine;
