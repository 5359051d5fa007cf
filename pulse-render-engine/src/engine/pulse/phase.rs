//! Phase timeline of a single pulse and the sliding draw window.

use std::time::Duration;

use super::error::ConfigError;

/// What a pulse does at a given elapsed time.
///
/// `progress` is the fraction of the current phase already spent, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Light the instance's grid B cells.
    HighlightB,
    /// Run a spark along grid B lines from the cell back to the cluster.
    TraceB { progress: f32 },
    /// Fade the cluster to white.
    Fade,
    /// Run a spark along grid A lines from the cluster out to the cell.
    TraceA { progress: f32 },
    /// Light the instance's grid A cells.
    HighlightA,
    /// The cycle is over; the instance is retired.
    Expired,
}

impl Phase {
    /// One-based phase number, `None` once expired.
    pub fn number(&self) -> Option<u8> {
        match self {
            Phase::HighlightB => Some(1),
            Phase::TraceB { .. } => Some(2),
            Phase::Fade => Some(3),
            Phase::TraceA { .. } => Some(4),
            Phase::HighlightA => Some(5),
            Phase::Expired => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Phase::Expired)
    }
}

/// Five contiguous phase windows covering `[0, total)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimeline {
    total: Duration,
    phases: [Duration; 5],
}

impl PhaseTimeline {
    pub fn new(total: Duration, phases: [Duration; 5]) -> Result<Self, ConfigError> {
        let sum: Duration = phases.iter().sum();
        if total.is_zero() {
            return Err(ConfigError::ZeroCycle);
        }
        if sum != total {
            return Err(ConfigError::PhaseSumMismatch {
                total_ms: total.as_millis() as u64,
                phase_sum_ms: sum.as_millis() as u64,
            });
        }
        Ok(Self { total, phases })
    }

    pub fn from_millis(total_ms: u64, phase_ms: [u64; 5]) -> Result<Self, ConfigError> {
        Self::new(
            Duration::from_millis(total_ms),
            phase_ms.map(Duration::from_millis),
        )
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn phases(&self) -> [Duration; 5] {
        self.phases
    }

    /// Start offset of the phase with the given zero-based index.
    pub fn phase_start(&self, index: usize) -> Duration {
        self.phases.iter().take(index).sum()
    }

    /// Maps elapsed time to the first phase whose window contains it.
    pub fn phase_at(&self, elapsed: Duration) -> Phase {
        if elapsed >= self.total {
            return Phase::Expired;
        }

        let mut start = Duration::ZERO;
        for (index, length) in self.phases.iter().enumerate() {
            let end = start + *length;
            if elapsed < end {
                let progress = phase_progress(elapsed - start, *length);
                return match index {
                    0 => Phase::HighlightB,
                    1 => Phase::TraceB { progress },
                    2 => Phase::Fade,
                    3 => Phase::TraceA { progress },
                    _ => Phase::HighlightA,
                };
            }
            start = end;
        }

        // Unreachable while the phases sum to `total`.
        Phase::HighlightA
    }
}

/// Fraction of a phase already spent. A zero-length phase counts as complete.
pub fn phase_progress(into_phase: Duration, phase_length: Duration) -> f32 {
    if phase_length.is_zero() {
        return 1.0;
    }
    (into_phase.as_secs_f64() / phase_length.as_secs_f64()).clamp(0.0, 1.0) as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// First pair towards last pair as progress grows.
    Forward,
    /// Last pair towards first pair as progress grows.
    Backward,
}

/// Sub-range of a line's points that is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawRange {
    pub start: usize,
    pub count: usize,
}

impl DrawRange {
    pub const EMPTY: DrawRange = DrawRange { start: 0, count: 0 };

    pub fn end(&self) -> usize {
        self.start + self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Two-point window of a line with `total_points` points at `progress`.
///
/// The start index is always within `[0, total_points - 2]`.
pub fn sliding_window(progress: f32, total_points: usize, direction: SweepDirection) -> DrawRange {
    if total_points < 2 {
        return DrawRange {
            start: 0,
            count: total_points,
        };
    }

    let t = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let span = (total_points - 1) as f32;
    let raw = match direction {
        SweepDirection::Forward => t * span,
        SweepDirection::Backward => (1.0 - t) * span,
    };

    DrawRange {
        start: (raw.floor().max(0.0) as usize).min(total_points - 2),
        count: 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_timeline() -> PhaseTimeline {
        PhaseTimeline::from_millis(1000, [100, 300, 100, 300, 200]).unwrap()
    }

    #[test]
    fn every_millisecond_maps_to_exactly_one_phase() {
        let timeline = default_timeline();
        let bounds = [(0, 100, 1), (100, 400, 2), (400, 500, 3), (500, 800, 4), (800, 1000, 5)];

        for ms in 0..1000u64 {
            let phase = timeline.phase_at(Duration::from_millis(ms));
            let expected = bounds
                .iter()
                .find(|(start, end, _)| (*start..*end).contains(&ms))
                .map(|(_, _, number)| *number);
            assert_eq!(phase.number(), expected, "elapsed {}ms", ms);
        }
    }

    #[test]
    fn cycle_end_and_beyond_is_expired() {
        let timeline = default_timeline();
        assert!(timeline.phase_at(Duration::from_millis(1000)).is_expired());
        assert!(timeline.phase_at(Duration::from_secs(60)).is_expired());
        assert!(!timeline.phase_at(Duration::from_micros(999_999)).is_expired());
    }

    #[test]
    fn trace_progress_spans_its_window() {
        let timeline = default_timeline();
        assert_eq!(
            timeline.phase_at(Duration::from_millis(100)),
            Phase::TraceB { progress: 0.0 }
        );
        assert_eq!(
            timeline.phase_at(Duration::from_millis(650)),
            Phase::TraceA { progress: 0.5 }
        );
    }

    #[test]
    fn zero_length_phases_are_skipped() {
        let timeline = PhaseTimeline::from_millis(500, [100, 0, 100, 300, 0]).unwrap();
        assert_eq!(timeline.phase_at(Duration::from_millis(100)), Phase::Fade);
        assert_eq!(
            timeline.phase_at(Duration::from_millis(499)).number(),
            Some(4)
        );
        assert!(timeline.phase_at(Duration::from_millis(500)).is_expired());
    }

    #[test]
    fn rejects_mismatched_sum() {
        assert!(PhaseTimeline::from_millis(1000, [100, 100, 100, 100, 100]).is_err());
        assert_eq!(
            PhaseTimeline::from_millis(0, [0; 5]),
            Err(ConfigError::ZeroCycle)
        );
    }

    #[test]
    fn zero_length_phase_progress_is_complete() {
        assert_eq!(phase_progress(Duration::ZERO, Duration::ZERO), 1.0);
        assert_eq!(
            sliding_window(
                phase_progress(Duration::ZERO, Duration::ZERO),
                21,
                SweepDirection::Forward
            ),
            DrawRange { start: 19, count: 2 }
        );
    }

    #[test]
    fn backward_sweep_runs_last_pair_to_first() {
        assert_eq!(sliding_window(0.0, 21, SweepDirection::Backward).start, 19);
        assert_eq!(sliding_window(0.5, 21, SweepDirection::Backward).start, 10);
        assert_eq!(sliding_window(1.0, 21, SweepDirection::Backward).start, 0);
    }

    #[test]
    fn forward_sweep_runs_first_pair_to_last() {
        assert_eq!(sliding_window(0.0, 21, SweepDirection::Forward).start, 0);
        assert_eq!(sliding_window(0.52, 21, SweepDirection::Forward).start, 10);
        assert_eq!(sliding_window(1.0, 21, SweepDirection::Forward).start, 19);
    }

    #[test]
    fn window_start_stays_in_bounds() {
        for total_points in 2..40usize {
            for step in 0..=100 {
                let t = step as f32 / 100.0;
                for direction in [SweepDirection::Forward, SweepDirection::Backward] {
                    let range = sliding_window(t, total_points, direction);
                    assert_eq!(range.count, 2);
                    assert!(range.start <= total_points - 2);
                    assert!(range.end() <= total_points);
                }
            }
        }
    }

    #[test]
    fn degenerate_lines_draw_what_they_have() {
        assert_eq!(
            sliding_window(0.3, 1, SweepDirection::Forward),
            DrawRange { start: 0, count: 1 }
        );
        assert_eq!(sliding_window(0.3, 0, SweepDirection::Backward), DrawRange::EMPTY);
    }
}
