use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::pulse::field::PulseField;
use crate::engine::pulse::scheduler::InstanceScheduler;
use crate::engine::scene::lines::PulseLineEntities;

const STATS_INTERVAL_SECS: f32 = 5.0;

/// Logs a one-line summary of the pulse field every few seconds.
pub fn pulse_stats_system(
    scheduler: Res<InstanceScheduler>,
    field: Res<PulseField>,
    entities: Res<PulseLineEntities>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_log_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_log_time < STATS_INTERVAL_SECS {
        return;
    }
    *last_log_time = current_time;

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or_default();
    let fading = field.fade().values().iter().filter(|v| **v > 0.0).count();
    let ledger = scheduler.ledger();

    info!(
        "fps {:.1} | {} live pulses, {} line entities | lines acquired {} released {} | {} vertices fading",
        fps,
        scheduler.live_count(),
        entities.line_count(),
        ledger.acquired,
        ledger.released,
        fading
    );
    if entities.instance_count() != scheduler.live_count() {
        warn!(
            "{} pulses hold line entities but {} are live",
            entities.instance_count(),
            scheduler.live_count()
        );
    }
}
