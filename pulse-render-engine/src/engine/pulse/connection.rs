//! Curved link templates between cluster centroids and grid cells.

use std::collections::BTreeMap;

use bevy::prelude::*;
use rand::Rng;

use super::cluster_index::{ClusterIndex, ClusterKey};
use super::config::ConnectionConfig;
use super::grid_model::{CellKey, GridId, GridPair};

/// Immutable sampled curve from a cluster centroid to one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionTemplate {
    grid: GridId,
    cell: CellKey,
    cluster: ClusterKey,
    points: Vec<Vec3>,
}

impl ConnectionTemplate {
    pub fn new(
        grid: GridId,
        cell: CellKey,
        cluster: ClusterKey,
        from: Vec3,
        to: Vec3,
        sag: f32,
        segments: usize,
    ) -> Self {
        let control = sagging_control_point(from, to, sag);
        Self {
            grid,
            cell,
            cluster,
            points: quadratic_curve(from, control, to, segments),
        }
    }

    pub fn grid(&self) -> GridId {
        self.grid
    }

    pub fn cell(&self) -> CellKey {
        self.cell
    }

    pub fn cluster(&self) -> ClusterKey {
        self.cluster
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

/// Midpoint of the two ends pushed down the depth axis by `sag`.
pub fn sagging_control_point(from: Vec3, to: Vec3, sag: f32) -> Vec3 {
    from.lerp(to, 0.5) - Vec3::Z * sag
}

/// Samples `segments + 1` evenly spaced points of a quadratic Bézier curve.
pub fn quadratic_curve(from: Vec3, control: Vec3, to: Vec3, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|step| {
            let t = step as f32 / segments as f32;
            let u = 1.0 - t;
            from * (u * u) + control * (2.0 * u * t) + to * (t * t)
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
struct ClusterTemplates {
    a: Vec<usize>,
    b: Vec<usize>,
}

/// Every template of both grids, with a per-cluster lookup.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    a: Vec<ConnectionTemplate>,
    b: Vec<ConnectionTemplate>,
    by_cluster: BTreeMap<ClusterKey, ClusterTemplates>,
}

impl TemplateSet {
    /// Draws one uniform value per (grid, cell, cluster) and keeps the pair
    /// when the value falls below the line probability.
    ///
    /// Grid A is visited before grid B, cells in key order, clusters in key
    /// order, so a seeded generator always yields the same set.
    pub fn build(
        grids: &GridPair,
        clusters: &ClusterIndex,
        config: &ConnectionConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let mut set = Self::default();
        for id in GridId::ALL {
            for cell in grids.grid(id).cells() {
                for cluster in clusters.iter() {
                    let draw: f32 = rng.gen_range(0.0..1.0);
                    if draw < config.line_probability {
                        set.insert(ConnectionTemplate::new(
                            id,
                            cell.key(),
                            cluster.key(),
                            cluster.centroid(),
                            cell.position(),
                            config.sag_amount,
                            config.curve_segments,
                        ));
                    }
                }
            }
        }
        set
    }

    pub fn insert(&mut self, template: ConnectionTemplate) {
        let entry = self.by_cluster.entry(template.cluster).or_default();
        match template.grid {
            GridId::A => {
                entry.a.push(self.a.len());
                self.a.push(template);
            }
            GridId::B => {
                entry.b.push(self.b.len());
                self.b.push(template);
            }
        }
    }

    pub fn grid(&self, id: GridId) -> &[ConnectionTemplate] {
        match id {
            GridId::A => &self.a,
            GridId::B => &self.b,
        }
    }

    /// Templates of one grid that start at the given cluster, in build order.
    pub fn for_cluster(
        &self,
        id: GridId,
        key: &ClusterKey,
    ) -> impl Iterator<Item = &ConnectionTemplate> + '_ {
        let templates = self.grid(id);
        let indices: &[usize] = match (self.by_cluster.get(key), id) {
            (Some(entry), GridId::A) => &entry.a,
            (Some(entry), GridId::B) => &entry.b,
            (None, _) => &[],
        };
        indices.iter().filter_map(move |&i| templates.get(i))
    }

    pub fn len(&self) -> usize {
        self.a.len() + self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
