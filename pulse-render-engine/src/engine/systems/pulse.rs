//! Per-frame driving of the pulse scheduler and syncing of its output.

use bevy::prelude::*;
use bevy::render::mesh::Indices;
use bevy::render::view::NoFrustumCulling;

use crate::engine::core::app_state::AppState;
use crate::engine::loading::point_cloud_creator::PointCloud;
use crate::engine::pulse::config::PulseConfig;
use crate::engine::pulse::field::PulseField;
use crate::engine::pulse::grid_model::{GridId, GridPair};
use crate::engine::pulse::instance::InstanceId;
use crate::engine::pulse::scheduler::InstanceScheduler;
use crate::engine::scene::colors::hex_color;
use crate::engine::scene::grid::sync_grid_cells;
use crate::engine::scene::lines::{
    PulseLineEntities, PulseLineMarker, PulseLineMaterial, line_mesh, window_indices,
};
use crate::engine::systems::diagnostics::pulse_stats_system;

/// Pulses spawned this frame that still need line entities.
#[derive(Resource, Default)]
pub struct PendingPulses(pub Vec<InstanceId>);

/// Pulses retired this frame whose line entities must go.
#[derive(Resource, Default)]
pub struct RetiredPulses(pub Vec<InstanceId>);

pub struct PulsePlugin;

impl Plugin for PulsePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PulseLineEntities>()
            .init_resource::<PendingPulses>()
            .init_resource::<RetiredPulses>()
            .add_systems(
                OnEnter(AppState::Running),
                (create_line_material, start_scheduler),
            )
            .add_systems(
                Update,
                (
                    advance_pulses,
                    release_retired_lines,
                    spawn_due_pulses,
                    create_line_entities,
                    (
                        sync_point_colors,
                        sync_grid_cells,
                        sync_pulse_lines,
                        pulse_stats_system,
                    ),
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}

fn create_line_material(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<PulseConfig>,
) {
    let material = materials.add(StandardMaterial {
        base_color: hex_color(config.visuals.line_color),
        unlit: true,
        ..default()
    });
    commands.insert_resource(PulseLineMaterial(material));
}

fn start_scheduler(time: Res<Time>, mut scheduler: ResMut<InstanceScheduler>) {
    scheduler.start(time.elapsed());
    info!(
        "Pulse scheduler started, first pulse due at {:?}",
        scheduler.next_spawn_at()
    );
}

/// Decay, colour refresh, cell reset, phase logic and retirement, in that order.
pub fn advance_pulses(
    time: Res<Time>,
    mut scheduler: ResMut<InstanceScheduler>,
    mut field: ResMut<PulseField>,
    mut grids: ResMut<GridPair>,
    mut retired: ResMut<RetiredPulses>,
) {
    let finished = scheduler.tick(time.elapsed(), &mut field, &mut grids);
    retired.0.extend(finished.iter().map(|instance| instance.id()));
}

pub fn release_retired_lines(
    mut commands: Commands,
    mut retired: ResMut<RetiredPulses>,
    mut entities: ResMut<PulseLineEntities>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for id in retired.0.drain(..) {
        for (entity, mesh) in entities.remove(id) {
            commands.entity(entity).despawn();
            meshes.remove(&mesh);
        }
    }
}

pub fn spawn_due_pulses(
    time: Res<Time>,
    mut scheduler: ResMut<InstanceScheduler>,
    field: Res<PulseField>,
    mut pending: ResMut<PendingPulses>,
) {
    if let Some(id) = scheduler.spawn_due(time.elapsed(), &field) {
        if let Some(instance) = scheduler.get(id) {
            debug!(
                "Spawned {} from cluster {} with {} lines",
                id,
                instance.cluster(),
                instance.line_count()
            );
        }
        pending.0.push(id);
    }
}

pub fn create_line_entities(
    mut commands: Commands,
    mut pending: ResMut<PendingPulses>,
    mut entities: ResMut<PulseLineEntities>,
    mut meshes: ResMut<Assets<Mesh>>,
    scheduler: Res<InstanceScheduler>,
    material: Res<PulseLineMaterial>,
) {
    for id in pending.0.drain(..) {
        let Some(instance) = scheduler.get(id) else {
            continue;
        };

        let mut owned = Vec::with_capacity(instance.line_count());
        for grid in GridId::ALL {
            for (index, line) in instance.lines(grid).iter().enumerate() {
                let mesh = meshes.add(line_mesh(line));
                let entity = commands
                    .spawn((
                        Mesh3d(mesh.clone()),
                        MeshMaterial3d(material.0.clone()),
                        Transform::IDENTITY,
                        Visibility::Hidden,
                        NoFrustumCulling,
                        PulseLineMarker {
                            instance: id,
                            grid,
                            line: index,
                            drawn: line.draw_range(),
                        },
                    ))
                    .id();
                owned.push((entity, mesh));
            }
        }
        entities.insert(id, owned);
    }
}

pub fn sync_point_colors(
    field: Res<PulseField>,
    clouds: Query<&Mesh3d, With<PointCloud>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for mesh in &clouds {
        if let Some(mesh) = meshes.get_mut(&mesh.0) {
            mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, field.fade().colors().to_vec());
        }
    }
}

/// Applies each line's visibility and rewrites its indices when the window moves.
pub fn sync_pulse_lines(
    scheduler: Res<InstanceScheduler>,
    mut lines: Query<(&mut PulseLineMarker, &Mesh3d, &mut Visibility)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (mut marker, mesh, mut visibility) in &mut lines {
        let Some(line) = scheduler
            .get(marker.instance)
            .and_then(|instance| instance.lines(marker.grid).get(marker.line))
        else {
            continue;
        };

        let wanted = if line.is_visible() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted {
            *visibility = wanted;
        }

        if line.is_visible() && marker.drawn != line.draw_range() {
            if let Some(mesh) = meshes.get_mut(&mesh.0) {
                mesh.insert_indices(Indices::U32(window_indices(line.draw_range())));
                marker.drawn = line.draw_range();
            }
        }
    }
}
