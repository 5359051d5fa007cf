use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::CAMERA_MARGIN;

use crate::engine::assets::bounds::AxisBounds;
use crate::engine::assets::point_cloud_assets::{PointCloudAssets, PointCloudFeed};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::pulse::config::{PulseConfig, RngStream};
use crate::engine::pulse::field::PulseField;
use crate::engine::pulse::grid_model::GridPair;
use crate::engine::pulse::scheduler::InstanceScheduler;

/// Marks the entity holding the point cloud mesh.
#[derive(Component)]
pub struct PointCloud;

/// Builds clusters and templates from the finished feed, spawns the cloud
/// and hands the scheduler to the app.
pub fn create_point_cloud_when_ready(
    mut loading_progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut assets: ResMut<PointCloudAssets>,
    feeds: Res<Assets<PointCloudFeed>>,
    config: Option<Res<PulseConfig>>,
    grids: Option<Res<GridPair>>,
    mut cameras: Query<(&mut Transform, &Projection), With<Camera3d>>,
) {
    if loading_progress.point_cloud_created
        || !loading_progress.feed_loaded
        || !loading_progress.grids_created
    {
        return;
    }
    let (Some(config), Some(grids)) = (config, grids) else {
        return;
    };

    let empty = PointCloudFeed::default();
    let feed = assets.get_feed(&feeds).unwrap_or(&empty);

    let field = PulseField::build(
        &feed.vertices,
        &grids,
        &config.connections,
        config.timing.fade_window_secs,
        &mut config.rng(RngStream::Connections),
    );
    info!(
        "Indexed {} clusters from {} vertices ({} excluded), {} connection templates",
        field.clusters().len(),
        feed.vertex_count(),
        field.clusters().excluded().len(),
        field.templates().len()
    );
    if field.clusters().is_empty() {
        warn!("No clusters found in the point cloud, pulses will not spawn");
    }

    let scheduler = match InstanceScheduler::from_config(&config) {
        Ok(scheduler) => scheduler,
        Err(err) => {
            error!("Scheduler rejected the configuration: {}", err);
            return;
        }
    };

    let cloud_bounds = feed.bounds();
    if feed.vertex_count() > 0 {
        spawn_point_cloud_entity(&mut commands, &mut meshes, &mut materials, feed, &field);
    }

    for (mut transform, projection) in &mut cameras {
        let fov = match projection {
            Projection::Perspective(perspective) => perspective.fov,
            _ => std::f32::consts::FRAC_PI_4,
        };
        *transform = camera_framing(&cloud_bounds, &grids, fov);
    }

    commands.insert_resource(field);
    commands.insert_resource(scheduler);
    assets.is_loaded = true;
    loading_progress.point_cloud_created = true;
    info!("Point cloud and pulse field ready");
}

fn spawn_point_cloud_entity(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    feed: &PointCloudFeed,
    field: &PulseField,
) {
    let positions: Vec<[f32; 3]> = feed.vertices.iter().map(|v| v.position.to_array()).collect();

    // Colours are rewritten every frame, so the mesh stays in the main world too.
    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, field.fade().colors().to_vec());

    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        Visibility::Visible,
        NoFrustumCulling,
        PointCloud,
    ));

    info!("Point cloud entity spawned with {} vertices", feed.vertex_count());
}

/// Places the camera on the near side of grid B, looking down -Z at the
/// centre of everything drawn, far enough back to fit it all in view.
pub fn camera_framing(cloud: &AxisBounds, grids: &GridPair, fov: f32) -> Transform {
    let mut bounds = *cloud;
    for cell in grids.iter().flat_map(|grid| grid.cells()) {
        bounds.update(cell.position());
    }
    if bounds.is_empty() {
        return Transform::from_xyz(0.0, 0.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y);
    }

    let center = bounds.center();
    let half_extent = (bounds.size().x.max(bounds.size().y) * 0.5).max(0.1);
    let distance = half_extent / (fov * 0.5).tan() * CAMERA_MARGIN;
    let eye = Vec3::new(center.x, center.y, bounds.max.z + distance);

    Transform::from_translation(eye).looking_at(center, Vec3::Y)
}
