//! Grid cell entities: one unlit disc per cell, recoloured from the grid model.
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::{CELL_RADIUS_FRACTION, CELL_RESOLUTION};

use super::colors::cell_color;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::pulse::config::{PulseConfig, RngStream};
use crate::engine::pulse::grid_model::{CellKey, CellVisual, GridId, GridPair};

#[derive(Component, Debug, Clone, Copy)]
pub struct GridCellMarker {
    pub grid: GridId,
    pub key: CellKey,
}

/// Generates both grids as soon as the configuration is known.
pub fn create_grids_when_configured(
    mut loading_progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Option<Res<PulseConfig>>,
) {
    if loading_progress.grids_created || !loading_progress.config_resolved {
        return;
    }
    let Some(config) = config else {
        return;
    };

    let grids = GridPair::build(&config.grid, &mut config.rng(RngStream::Layout));
    spawn_grid_cells(&mut commands, &mut meshes, &mut materials, &grids, &config);

    info!(
        "Grids created: {} cells at depth {} and {} cells at depth {}",
        grids.grid(GridId::A).len(),
        grids.grid(GridId::A).plane_depth(),
        grids.grid(GridId::B).len(),
        grids.grid(GridId::B).plane_depth()
    );
    commands.insert_resource(grids);
    loading_progress.grids_created = true;
}

fn spawn_grid_cells(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    grids: &GridPair,
    config: &PulseConfig,
) {
    let radius = config.grid.cell_spacing * CELL_RADIUS_FRACTION;
    let disc = meshes.add(
        Circle::new(radius)
            .mesh()
            .resolution(CELL_RESOLUTION)
            .build(),
    );

    for grid in grids.iter() {
        for cell in grid.cells() {
            // Each cell owns its material so highlights stay per cell.
            let material = materials.add(StandardMaterial {
                base_color: cell_color(CellVisual::Default, &config.visuals),
                unlit: true,
                ..default()
            });
            commands.spawn((
                Mesh3d(disc.clone()),
                MeshMaterial3d(material),
                Transform::from_translation(cell.position()),
                Visibility::Visible,
                NoFrustumCulling,
                GridCellMarker {
                    grid: grid.id(),
                    key: cell.key(),
                },
            ));
        }
    }
}

/// Copies each cell's visual state into its material.
pub fn sync_grid_cells(
    grids: Res<GridPair>,
    config: Res<PulseConfig>,
    cells: Query<(&GridCellMarker, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (marker, material) in &cells {
        let Some(cell) = grids.grid(marker.grid).cell(&marker.key) else {
            continue;
        };
        let color = cell_color(cell.visual(), &config.visuals);

        let unchanged = materials
            .get(&material.0)
            .is_some_and(|current| current.base_color == color);
        if unchanged {
            continue;
        }
        if let Some(current) = materials.get_mut(&material.0) {
            current.base_color = color;
        }
    }
}
