/// Cells per grid side.
pub const GRID_SIZE: usize = 16;

/// Cells per sub-cluster side. Must divide `GRID_SIZE`.
pub const SUB_CLUSTER_SIZE: usize = 4;

/// Cell edge length and in-cluster separation.
pub const CELL_SPACING: f32 = 0.03;

/// Additional separation between neighbouring sub-clusters.
pub const EXTRA_GAP: f32 = 0.10;

/// Maximum random depth offset applied per sub-cluster.
pub const DEPTH_JITTER_RANGE: f32 = 0.1;

/// Fraction of the free space between sub-clusters used for in-plane jitter.
pub const PLANE_JITTER_FRACTION: f32 = 0.4;

/// Depth plane of grid A (cluster to cell traces, final highlight).
pub const GRID_A_DEPTH: f32 = -1.0;

/// Depth plane of grid B (first highlight, cell to cluster traces).
pub const GRID_B_DEPTH: f32 = 1.0;
