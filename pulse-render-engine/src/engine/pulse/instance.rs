//! A single pulse: owned line copies plus the cells it lights.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use bevy::prelude::*;

use super::cluster_index::ClusterKey;
use super::connection::{ConnectionTemplate, TemplateSet};
use super::field::PulseField;
use super::grid_model::{CellKey, GridId, GridPair};
use super::phase::{DrawRange, Phase, PhaseTimeline, SweepDirection, sliding_window};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pulse#{}", self.0)
    }
}

/// An instance's own copy of a template, with its drawn window.
#[derive(Debug, Clone, PartialEq)]
pub struct PulseLine {
    cell: CellKey,
    points: Vec<Vec3>,
    draw: DrawRange,
    visible: bool,
}

impl PulseLine {
    pub fn from_template(template: &ConnectionTemplate) -> Self {
        let points = template.points().to_vec();
        Self {
            cell: template.cell(),
            draw: DrawRange {
                start: 0,
                count: points.len(),
            },
            points,
            visible: false,
        }
    }

    pub fn cell(&self) -> CellKey {
        self.cell
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn total_points(&self) -> usize {
        self.points.len()
    }

    pub fn draw_range(&self) -> DrawRange {
        self.draw
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Points inside the current draw range.
    pub fn visible_points(&self) -> &[Vec3] {
        let end = self.draw.end().min(self.points.len());
        &self.points[self.draw.start.min(end)..end]
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn sweep(&mut self, progress: f32, direction: SweepDirection) {
        self.visible = true;
        self.draw = sliding_window(progress, self.points.len(), direction);
    }
}

/// One timed cycle rooted at a cluster.
#[derive(Debug, Clone)]
pub struct PulseInstance {
    id: InstanceId,
    started_at: Duration,
    cluster: ClusterKey,
    lines_a: Vec<PulseLine>,
    lines_b: Vec<PulseLine>,
    cells_a: BTreeSet<CellKey>,
    cells_b: BTreeSet<CellKey>,
    phase: Phase,
}

impl PulseInstance {
    /// Copies every template of the cluster into lines owned by this instance.
    pub fn new(
        id: InstanceId,
        started_at: Duration,
        cluster: ClusterKey,
        templates: &TemplateSet,
    ) -> Self {
        let lines = |grid| -> Vec<PulseLine> {
            templates
                .for_cluster(grid, &cluster)
                .map(PulseLine::from_template)
                .collect()
        };
        let lines_a = lines(GridId::A);
        let lines_b = lines(GridId::B);
        let cells_a = lines_a.iter().map(PulseLine::cell).collect();
        let cells_b = lines_b.iter().map(PulseLine::cell).collect();

        Self {
            id,
            started_at,
            cluster,
            lines_a,
            lines_b,
            cells_a,
            cells_b,
            phase: Phase::HighlightB,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    pub fn cluster(&self) -> ClusterKey {
        self.cluster
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    pub fn lines(&self, grid: GridId) -> &[PulseLine] {
        match grid {
            GridId::A => &self.lines_a,
            GridId::B => &self.lines_b,
        }
    }

    pub fn cells(&self, grid: GridId) -> &BTreeSet<CellKey> {
        match grid {
            GridId::A => &self.cells_a,
            GridId::B => &self.cells_b,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines_a.len() + self.lines_b.len()
    }

    /// Runs the behaviour of whichever phase `now` falls in.
    ///
    /// Only one phase acts per call. An expired instance hides its lines and
    /// touches nothing else.
    pub fn advance(
        &mut self,
        now: Duration,
        timeline: &PhaseTimeline,
        field: &mut PulseField,
        grids: &mut GridPair,
    ) -> Phase {
        let phase = timeline.phase_at(self.elapsed(now));
        self.phase = phase;

        match phase {
            Phase::HighlightB => {
                grids.grid_mut(GridId::B).highlight(&self.cells_b);
                self.hide_all();
            }
            Phase::TraceB { progress } => {
                for line in &mut self.lines_b {
                    line.sweep(progress, SweepDirection::Backward);
                }
                hide(&mut self.lines_a);
            }
            Phase::Fade => {
                field.trigger(&self.cluster);
                self.hide_all();
            }
            Phase::TraceA { progress } => {
                for line in &mut self.lines_a {
                    line.sweep(progress, SweepDirection::Forward);
                }
                hide(&mut self.lines_b);
            }
            Phase::HighlightA => {
                self.hide_all();
                grids.grid_mut(GridId::A).highlight(&self.cells_a);
            }
            Phase::Expired => self.hide_all(),
        }
        phase
    }

    fn hide_all(&mut self) {
        hide(&mut self.lines_a);
        hide(&mut self.lines_b);
    }
}

fn hide(lines: &mut [PulseLine]) {
    lines.iter_mut().for_each(PulseLine::hide);
}
