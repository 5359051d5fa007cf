//! Tunables for the pulse field, resolved once at startup.
//!
//! Every field defaults to the matching value in the `constants` crate, so a
//! JSON document only needs to name the values it overrides.

use std::time::Duration;

use bevy::prelude::*;
use constants::{connection, grid, path, render_settings, scheduling, timing};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::phase::PhaseTimeline;

/// Complete configuration surface of the effect.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub timing: TimingConfig,
    pub connections: ConnectionConfig,
    pub grid: GridLayout,
    pub scheduling: SchedulingConfig,
    pub visuals: VisualConfig,
    /// Fixed seed for reproducible layouts and spawn sequences.
    pub seed: Option<u64>,
    /// ASCII PLY file, relative to the asset root.
    pub point_cloud_path: String,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            connections: ConnectionConfig::default(),
            grid: GridLayout::default(),
            scheduling: SchedulingConfig::default(),
            visuals: VisualConfig::default(),
            seed: None,
            point_cloud_path: path::POINT_CLOUD_PATH.to_string(),
        }
    }
}

impl PulseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.timeline()?;
        self.connections.validate()?;
        self.grid.validate()?;
        self.scheduling.validate()
    }

    /// Independent random stream for one consumer of randomness.
    ///
    /// With a seed, every stream is reproducible and distinct from the others.
    pub fn rng(&self, stream: RngStream) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream as u64)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Consumers of randomness, each with its own generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngStream {
    Layout = 0,
    Connections = 1,
    Scheduler = 2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub total_ms: u64,
    pub phase_ms: [u64; 5],
    /// Seconds for a fade value to decay from 1 to 0.
    pub fade_window_secs: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            total_ms: timing::TOTAL_CYCLE_MS,
            phase_ms: timing::PHASE_MS,
            fade_window_secs: timing::FADE_WINDOW_SECS,
        }
    }
}

impl TimingConfig {
    pub fn timeline(&self) -> Result<PhaseTimeline, ConfigError> {
        if !(self.fade_window_secs.is_finite() && self.fade_window_secs > 0.0) {
            return Err(ConfigError::NonPositiveFadeWindow(self.fade_window_secs));
        }
        PhaseTimeline::from_millis(self.total_ms, self.phase_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub line_probability: f32,
    pub sag_amount: f32,
    pub curve_segments: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            line_probability: connection::LINE_PROBABILITY,
            sag_amount: connection::SAG_AMOUNT,
            curve_segments: connection::CURVE_SEGMENTS,
        }
    }
}

impl ConnectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.line_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(self.line_probability));
        }
        if !self.sag_amount.is_finite() {
            return Err(ConfigError::InvalidDistance {
                field: "sag_amount",
                value: self.sag_amount,
            });
        }
        if self.curve_segments == 0 {
            return Err(ConfigError::NoCurveSegments);
        }
        Ok(())
    }

    /// Points sampled along every curve.
    pub fn curve_points(&self) -> usize {
        self.curve_segments + 1
    }
}

/// Geometry of both reference grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub grid_size: usize,
    pub sub_cluster_size: usize,
    pub cell_spacing: f32,
    pub extra_gap: f32,
    pub depth_jitter_range: f32,
    pub plane_jitter_fraction: f32,
    pub grid_a_depth: f32,
    pub grid_b_depth: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            grid_size: grid::GRID_SIZE,
            sub_cluster_size: grid::SUB_CLUSTER_SIZE,
            cell_spacing: grid::CELL_SPACING,
            extra_gap: grid::EXTRA_GAP,
            depth_jitter_range: grid::DEPTH_JITTER_RANGE,
            plane_jitter_fraction: grid::PLANE_JITTER_FRACTION,
            grid_a_depth: grid::GRID_A_DEPTH,
            grid_b_depth: grid::GRID_B_DEPTH,
        }
    }
}

impl GridLayout {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 || self.sub_cluster_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.grid_size % self.sub_cluster_size != 0 {
            return Err(ConfigError::UnevenSubClusters {
                grid_size: self.grid_size,
                sub_cluster_size: self.sub_cluster_size,
            });
        }
        for (field, value) in [
            ("cell_spacing", self.cell_spacing),
            ("extra_gap", self.extra_gap),
            ("depth_jitter_range", self.depth_jitter_range),
            ("plane_jitter_fraction", self.plane_jitter_fraction),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidDistance { field, value });
            }
        }
        Ok(())
    }

    pub fn sub_clusters_per_side(&self) -> usize {
        self.grid_size / self.sub_cluster_size.max(1)
    }

    /// Width of one sub-cluster of cells.
    pub fn sub_cluster_width(&self) -> f32 {
        self.sub_cluster_size as f32 * self.cell_spacing
    }

    /// Distance between neighbouring sub-cluster centres before jitter.
    pub fn sub_cluster_pitch(&self) -> f32 {
        self.sub_cluster_width() + self.cell_spacing + self.extra_gap
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: scheduling::SPAWN_DELAY_MIN_MS,
            max_delay_ms: scheduling::SPAWN_DELAY_MAX_MS,
        }
    }
}

impl SchedulingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::InvertedDelayBounds {
                min_ms: self.min_delay_ms,
                max_ms: self.max_delay_ms,
            });
        }
        Ok(())
    }

    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Hex colours for the rendered grid cells and lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    pub cell_default_color: u32,
    pub cell_highlight_color: u32,
    pub line_color: u32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            cell_default_color: render_settings::CELL_DEFAULT_COLOR,
            cell_highlight_color: render_settings::CELL_HIGHLIGHT_COLOR,
            line_color: render_settings::LINE_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(PulseConfig::default().validate(), Ok(()));
    }

    #[test]
    fn phase_sum_must_match_total() {
        let mut config = PulseConfig::default();
        config.timing.phase_ms = [100, 300, 100, 300, 100];
        assert_eq!(
            config.validate(),
            Err(ConfigError::PhaseSumMismatch {
                total_ms: 1000,
                phase_sum_ms: 900
            })
        );
    }

    #[test]
    fn sub_cluster_size_must_divide_grid() {
        let mut config = PulseConfig::default();
        config.grid.sub_cluster_size = 5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnevenSubClusters { .. })
        ));
    }

    #[test]
    fn rejects_probability_above_one() {
        let mut config = PulseConfig::default();
        config.connections.line_probability = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange(1.5))
        );
    }

    #[test]
    fn rejects_zero_fade_window() {
        let mut config = PulseConfig::default();
        config.timing.fade_window_secs = 0.0;
        let err = config.validate().unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveFadeWindow(0.0));
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn rejects_inverted_delay_bounds() {
        let mut config = PulseConfig::default();
        config.scheduling.min_delay_ms = 800;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedDelayBounds { .. })
        ));
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let json = r#"{ "seed": 7, "connections": { "line_probability": 0.5 } }"#;
        let config: PulseConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.connections.line_probability, 0.5);
        assert_eq!(config.connections.curve_segments, connection::CURVE_SEGMENTS);
        assert_eq!(config.timing, TimingConfig::default());
        assert_eq!(config.point_cloud_path, path::POINT_CLOUD_PATH);
    }

    #[test]
    fn seeded_streams_are_reproducible_and_distinct() {
        use rand::Rng;

        let config = PulseConfig {
            seed: Some(42),
            ..default()
        };
        let a: u64 = config.rng(RngStream::Layout).gen_range(0..u64::MAX);
        let b: u64 = config.rng(RngStream::Layout).gen_range(0..u64::MAX);
        let c: u64 = config.rng(RngStream::Scheduler).gen_range(0..u64::MAX);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
