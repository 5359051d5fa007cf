//! Spawns pulses on a randomised cadence and advances the live set each tick.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;
use rand::rngs::StdRng;

use super::cluster_index::ClusterKey;
use super::config::{PulseConfig, RngStream};
use super::connection::TemplateSet;
use super::error::ConfigError;
use super::field::PulseField;
use super::grid_model::GridPair;
use super::instance::{InstanceId, PulseInstance};
use super::phase::PhaseTimeline;

/// Running totals of lines handed out to instances and given back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineLedger {
    pub acquired: u64,
    pub released: u64,
}

impl LineLedger {
    pub fn outstanding(&self) -> u64 {
        self.acquired - self.released
    }
}

/// Owns the live pulses and the spawn timer.
///
/// Time is a monotonic offset supplied by the caller; the scheduler never
/// reads a clock.
#[derive(Resource, Debug)]
pub struct InstanceScheduler {
    timeline: PhaseTimeline,
    min_delay: Duration,
    max_delay: Duration,
    live: Vec<PulseInstance>,
    next_spawn_at: Option<Duration>,
    last_tick: Option<Duration>,
    next_id: u64,
    ledger: LineLedger,
    rng: StdRng,
}

impl InstanceScheduler {
    pub fn new(
        timeline: PhaseTimeline,
        min_delay: Duration,
        max_delay: Duration,
        rng: StdRng,
    ) -> Self {
        Self {
            timeline,
            min_delay: min_delay.min(max_delay),
            max_delay,
            live: Vec::new(),
            next_spawn_at: None,
            last_tick: None,
            next_id: 0,
            ledger: LineLedger::default(),
            rng,
        }
    }

    pub fn from_config(config: &PulseConfig) -> Result<Self, ConfigError> {
        config.scheduling.validate()?;
        Ok(Self::new(
            config.timing.timeline()?,
            config.scheduling.min_delay(),
            config.scheduling.max_delay(),
            config.rng(RngStream::Scheduler),
        ))
    }

    /// Arms the spawn timer. The first pulse fires one random delay after `now`.
    pub fn start(&mut self, now: Duration) {
        if self.next_spawn_at.is_none() {
            self.next_spawn_at = Some(now + self.next_delay());
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_spawn_at.is_some()
    }

    pub fn next_spawn_at(&self) -> Option<Duration> {
        self.next_spawn_at
    }

    fn next_delay(&mut self) -> Duration {
        if self.max_delay > self.min_delay {
            self.rng.gen_range(self.min_delay..self.max_delay)
        } else {
            self.min_delay
        }
    }

    /// Spawns at most one pulse if the timer has fired, then re-arms it.
    ///
    /// The pulse starts at `now` and takes part in the next tick.
    pub fn spawn_due(&mut self, now: Duration, field: &PulseField) -> Option<InstanceId> {
        let due = self.next_spawn_at?;
        if now < due {
            return None;
        }
        self.next_spawn_at = Some(now + self.next_delay());

        let cluster = field.clusters().choose(&mut self.rng)?;
        Some(self.spawn_instance(now, cluster, field.templates()))
    }

    /// Creates a pulse for a specific cluster. Clusters without templates
    /// still produce a pulse that fades and expires.
    pub fn spawn_instance(
        &mut self,
        now: Duration,
        cluster: ClusterKey,
        templates: &TemplateSet,
    ) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;

        let instance = PulseInstance::new(id, now, cluster, templates);
        self.ledger.acquired += instance.line_count() as u64;
        self.live.push(instance);
        id
    }

    /// One frame of the effect, in fixed order: decay fades, recompute
    /// colours, reset cell visuals, run every live pulse in creation order,
    /// retire the expired ones.
    ///
    /// Returns the retired pulses so the caller can release their lines.
    pub fn tick(
        &mut self,
        now: Duration,
        field: &mut PulseField,
        grids: &mut GridPair,
    ) -> Vec<PulseInstance> {
        let delta = self
            .last_tick
            .map(|last| now.saturating_sub(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        field.fade_mut().decay(delta.as_secs_f32());
        field.fade_mut().refresh_colors();
        grids.reset_visuals();

        for instance in &mut self.live {
            instance.advance(now, &self.timeline, field, grids);
        }

        let (retired, live): (Vec<_>, Vec<_>) = self
            .live
            .drain(..)
            .partition(|instance| instance.phase().is_expired());
        self.live = live;
        self.ledger.released += retired.iter().map(|i| i.line_count() as u64).sum::<u64>();
        retired
    }

    pub fn timeline(&self) -> &PhaseTimeline {
        &self.timeline
    }

    pub fn live(&self) -> &[PulseInstance] {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn get(&self, id: InstanceId) -> Option<&PulseInstance> {
        self.live.iter().find(|instance| instance.id() == id)
    }

    pub fn ledger(&self) -> LineLedger {
        self.ledger
    }
}
