/// Full lifetime of one pulse instance, in milliseconds.
pub const TOTAL_CYCLE_MS: u64 = 1000;

/// Highlight grid B cells.
pub const PHASE1_MS: u64 = 100;
/// Trace grid B lines backward, cell towards cluster.
pub const PHASE2_MS: u64 = 300;
/// Fade the cluster to white.
pub const PHASE3_MS: u64 = 100;
/// Trace grid A lines forward, cluster towards cell.
pub const PHASE4_MS: u64 = 300;
/// Highlight grid A cells.
pub const PHASE5_MS: u64 = 200;

pub const PHASE_MS: [u64; 5] = [PHASE1_MS, PHASE2_MS, PHASE3_MS, PHASE4_MS, PHASE5_MS];

/// Seconds for a fully lit vertex to decay back to its own colour.
pub const FADE_WINDOW_SECS: f32 = 1.0;
