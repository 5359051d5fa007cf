use bevy::prelude::*;

use crate::engine::assets::bounds::AxisBounds;
use crate::engine::pulse::cluster_index::ClusterKey;

/// One point of the cloud as delivered by the loader. Never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    /// Original colour, channels in [0, 1].
    pub color: [f32; 3],
    /// Raw cluster axis indices; `None` when absent or unreadable.
    pub axis_indices: Option<[f32; 3]>,
}

impl Vertex {
    pub fn new(position: Vec3, color: [f32; 3], axis_indices: Option<[f32; 3]>) -> Self {
        Self {
            position,
            color,
            axis_indices,
        }
    }

    /// Cluster this vertex belongs to, if its indices are well formed.
    pub fn cluster_key(&self) -> Option<ClusterKey> {
        self.axis_indices.and_then(ClusterKey::from_axis_indices)
    }
}

/// The full vertex feed, available once loading completes.
#[derive(Asset, TypePath, Debug, Clone, Default)]
pub struct PointCloudFeed {
    pub vertices: Vec<Vertex>,
}

impl PointCloudFeed {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn bounds(&self) -> AxisBounds {
        AxisBounds::from_points(self.vertices.iter().map(|v| v.position))
    }

    /// Vertices that will not join any cluster.
    pub fn unclustered_count(&self) -> usize {
        self.vertices
            .iter()
            .filter(|v| v.cluster_key().is_none())
            .count()
    }
}

/// Handles to everything the loading pipeline waits on.
#[derive(Resource, Default)]
pub struct PointCloudAssets {
    pub feed: Handle<PointCloudFeed>,
    pub is_loaded: bool,
}

impl PointCloudAssets {
    pub fn get_feed<'a>(&self, feeds: &'a Assets<PointCloudFeed>) -> Option<&'a PointCloudFeed> {
        feeds.get(&self.feed)
    }
}
