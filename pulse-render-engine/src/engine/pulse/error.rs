//! Configuration validation errors.

use std::fmt;

/// Reasons a [`PulseConfig`](super::config::PulseConfig) is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroCycle,
    PhaseSumMismatch { total_ms: u64, phase_sum_ms: u64 },
    ProbabilityOutOfRange(f32),
    NoCurveSegments,
    EmptyGrid,
    UnevenSubClusters { grid_size: usize, sub_cluster_size: usize },
    InvalidDistance { field: &'static str, value: f32 },
    NonPositiveFadeWindow(f32),
    InvertedDelayBounds { min_ms: u64, max_ms: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCycle => write!(f, "Total cycle duration must be greater than zero"),
            ConfigError::PhaseSumMismatch {
                total_ms,
                phase_sum_ms,
            } => write!(
                f,
                "Phase durations sum to {}ms but the cycle lasts {}ms",
                phase_sum_ms, total_ms
            ),
            ConfigError::ProbabilityOutOfRange(p) => {
                write!(f, "Line probability {} is outside [0, 1]", p)
            }
            ConfigError::NoCurveSegments => write!(f, "Curves need at least one segment"),
            ConfigError::EmptyGrid => write!(f, "Grid and sub-cluster sizes must be non-zero"),
            ConfigError::UnevenSubClusters {
                grid_size,
                sub_cluster_size,
            } => write!(
                f,
                "Sub-cluster size {} does not divide grid size {}",
                sub_cluster_size, grid_size
            ),
            ConfigError::InvalidDistance { field, value } => {
                write!(f, "{} must be finite and non-negative, got {}", field, value)
            }
            ConfigError::NonPositiveFadeWindow(secs) => {
                write!(f, "Fade window must be finite and positive, got {}s", secs)
            }
            ConfigError::InvertedDelayBounds { min_ms, max_ms } => write!(
                f,
                "Spawn delay lower bound {}ms exceeds upper bound {}ms",
                min_ms, max_ms
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
