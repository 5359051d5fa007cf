//! PLY text through clustering and template building.

use bevy::prelude::*;
use pulse_render_engine::engine::assets::point_cloud_assets::PointCloudFeed;
use pulse_render_engine::engine::loading::ply_loader::parse_ascii_ply;
use pulse_render_engine::engine::pulse::cluster_index::ClusterKey;
use pulse_render_engine::engine::pulse::config::{ConnectionConfig, GridLayout};
use pulse_render_engine::engine::pulse::field::PulseField;
use pulse_render_engine::engine::pulse::grid_model::{GridId, GridPair};
use rand::SeedableRng;
use rand::rngs::StdRng;

const CLOUD: &str = "ply
format ascii 1.0
element vertex 5
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
property float x_idx
property float y_idx
property float z_idx
end_header
0 0 0 255 255 255 1 1 0
2 2 2 255 255 255 1.1 0.9 0
-1 0 1 128 128 128 4 2 1
5 5 5 0 0 0 x 1 1
0 0 4 10 20 30 4 2 1
";

#[test]
fn parsed_cloud_clusters_and_links() {
    let feed = PointCloudFeed::new(parse_ascii_ply(CLOUD).unwrap());
    assert_eq!(feed.vertex_count(), 5);
    assert_eq!(feed.unclustered_count(), 1);

    let layout = GridLayout {
        grid_size: 4,
        sub_cluster_size: 2,
        ..default()
    };
    let grids = GridPair::build(&layout, &mut StdRng::seed_from_u64(4));
    let connections = ConnectionConfig {
        line_probability: 1.0,
        ..default()
    };
    let field = PulseField::build(
        &feed.vertices,
        &grids,
        &connections,
        1.0,
        &mut StdRng::seed_from_u64(5),
    );

    let clusters = field.clusters();
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters.excluded(), &[3]);
    assert_eq!(clusters.members(&ClusterKey::new(1, 1, 0)), &[0, 1]);
    assert_eq!(
        clusters.get(&ClusterKey::new(1, 1, 0)).unwrap().centroid(),
        Vec3::ONE
    );
    assert_eq!(
        clusters.get(&ClusterKey::new(4, 2, 1)).unwrap().centroid(),
        Vec3::new(-0.5, 0.0, 2.5)
    );

    // Every cell of both grids links to both clusters.
    assert_eq!(field.templates().grid(GridId::A).len(), 16 * 2);
    assert_eq!(field.templates().grid(GridId::B).len(), 16 * 2);
    let from_first: Vec<_> = field
        .templates()
        .for_cluster(GridId::B, &ClusterKey::new(1, 1, 0))
        .collect();
    assert_eq!(from_first.len(), 16);
    assert!(from_first.iter().all(|t| t.points()[0] == Vec3::ONE));

    assert_eq!(field.fade().len(), 5);
    assert!(field.fade().values().iter().all(|v| *v == 0.0));
}

#[test]
fn bundled_sample_cloud_loads_with_every_cluster() {
    let text = include_str!("../assets/pointcloud/cloud.ply");
    let feed = PointCloudFeed::new(parse_ascii_ply(text).unwrap());
    assert_eq!(feed.vertex_count(), 722);
    assert_eq!(feed.unclustered_count(), 2);

    let field = PulseField::build(
        &feed.vertices,
        &GridPair::build(&GridLayout::default(), &mut StdRng::seed_from_u64(6)),
        &ConnectionConfig::default(),
        1.0,
        &mut StdRng::seed_from_u64(7),
    );
    assert_eq!(field.clusters().len(), 9 * 16);
    assert_eq!(field.clusters().excluded(), &[720, 721]);
    assert!(
        field
            .clusters()
            .iter()
            .all(|cluster| cluster.members().len() == 5)
    );
    assert!(!field.templates().is_empty());
}
