/// Chance that any (grid cell, cluster) pair receives a connection template.
pub const LINE_PROBABILITY: f32 = 0.2;

/// Depth the curve midpoint is pushed down by.
pub const SAG_AMOUNT: f32 = 0.15;

/// Segments per curve; templates hold `CURVE_SEGMENTS + 1` points.
pub const CURVE_SEGMENTS: usize = 20;
