//! Groups vertices into clusters keyed by their three axis indices.

use std::collections::BTreeMap;
use std::fmt;

use bevy::prelude::*;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::assets::bounds::AxisBounds;
use crate::engine::assets::point_cloud_assets::Vertex;

/// Rounded `(x_idx, y_idx, z_idx)` triple shared by every member of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterKey {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ClusterKey {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Rounds raw indices to a key. Non-finite or out-of-range values yield `None`.
    pub fn from_axis_indices(raw: [f32; 3]) -> Option<Self> {
        let [x, y, z] = raw.map(round_index);
        Some(Self::new(x?, y?, z?))
    }
}

fn round_index(value: f32) -> Option<i32> {
    let rounded = value.round();
    (rounded.is_finite() && rounded >= i32::MIN as f32 && rounded <= i32::MAX as f32)
        .then_some(rounded as i32)
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.x, self.y, self.z)
    }
}

/// Vertices sharing one key, with the bounds of their positions.
#[derive(Debug, Clone)]
pub struct Cluster {
    key: ClusterKey,
    members: Vec<usize>,
    bounds: AxisBounds,
}

impl Cluster {
    fn new(key: ClusterKey) -> Self {
        Self {
            key,
            members: Vec::new(),
            bounds: AxisBounds::new(),
        }
    }

    fn push(&mut self, index: usize, position: Vec3) {
        self.members.push(index);
        self.bounds.update(position);
    }

    pub fn key(&self) -> ClusterKey {
        self.key
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn bounds(&self) -> AxisBounds {
        self.bounds
    }

    /// Midpoint of the member bounding box. Deliberately not the arithmetic mean.
    pub fn centroid(&self) -> Vec3 {
        self.bounds.center()
    }
}

/// Every cluster of the cloud, ordered by key. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct ClusterIndex {
    clusters: BTreeMap<ClusterKey, Cluster>,
    keys: Vec<ClusterKey>,
    excluded: Vec<usize>,
}

impl ClusterIndex {
    /// Single pass over the vertices. Vertices without a well-formed key are
    /// recorded as excluded and join no cluster.
    pub fn build(vertices: &[Vertex]) -> Self {
        let mut clusters: BTreeMap<ClusterKey, Cluster> = BTreeMap::new();
        let mut excluded = Vec::new();

        for (index, vertex) in vertices.iter().enumerate() {
            match vertex.cluster_key() {
                Some(key) => clusters
                    .entry(key)
                    .or_insert_with(|| Cluster::new(key))
                    .push(index, vertex.position),
                None => excluded.push(index),
            }
        }

        let keys = clusters.keys().copied().collect();
        Self {
            clusters,
            keys,
            excluded,
        }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn get(&self, key: &ClusterKey) -> Option<&Cluster> {
        self.clusters.get(key)
    }

    /// Member vertex indices; empty for unknown keys.
    pub fn members(&self, key: &ClusterKey) -> &[usize] {
        self.clusters
            .get(key)
            .map(|cluster| cluster.members())
            .unwrap_or(&[])
    }

    pub fn keys(&self) -> &[ClusterKey] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values()
    }

    /// Indices of vertices that joined no cluster.
    pub fn excluded(&self) -> &[usize] {
        &self.excluded
    }

    /// Uniformly random cluster key.
    pub fn choose(&self, rng: &mut impl Rng) -> Option<ClusterKey> {
        self.keys.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn vertex(position: [f32; 3], axis: Option<[f32; 3]>) -> Vertex {
        Vertex::new(Vec3::from_array(position), [0.2, 0.4, 0.6], axis)
    }

    #[test]
    fn keys_round_raw_indices() {
        assert_eq!(
            ClusterKey::from_axis_indices([2.4, 2.6, -0.4]),
            Some(ClusterKey::new(2, 3, 0))
        );
        assert_eq!(ClusterKey::from_axis_indices([f32::NAN, 0.0, 0.0]), None);
        assert_eq!(ClusterKey::from_axis_indices([0.0, f32::INFINITY, 0.0]), None);
        assert_eq!(ClusterKey::new(3, 5, 1).to_string(), "3_5_1");
    }

    #[test]
    fn partition_is_exhaustive_and_disjoint() {
        let vertices = vec![
            vertex([0.0, 0.0, 0.0], Some([1.0, 1.0, 0.0])),
            vertex([1.0, 0.0, 0.0], Some([2.0, 1.0, 0.0])),
            vertex([2.0, 0.0, 0.0], None),
            vertex([3.0, 0.0, 0.0], Some([1.2, 0.8, 0.1])),
            vertex([4.0, 0.0, 0.0], Some([f32::NAN, 1.0, 0.0])),
            vertex([5.0, 0.0, 0.0], Some([2.0, 1.0, 0.0])),
        ];
        let index = ClusterIndex::build(&vertices);

        let mut seen: Vec<usize> = index.iter().flat_map(|c| c.members().to_vec()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 3, 5]);
        assert_eq!(index.excluded(), &[2, 4]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.members(&ClusterKey::new(1, 1, 0)), &[0, 3]);
    }

    #[test]
    fn same_key_regardless_of_input_order() {
        let forward = vec![
            vertex([0.0, 0.0, 0.0], Some([4.0, 4.0, 1.0])),
            vertex([1.0, 1.0, 1.0], Some([3.9, 4.1, 0.9])),
        ];
        let reversed: Vec<Vertex> = forward.iter().rev().copied().collect();

        let a = ClusterIndex::build(&forward);
        let b = ClusterIndex::build(&reversed);
        assert_eq!(a.keys(), b.keys());
        assert_eq!(a.len(), 1);
        assert_eq!(
            a.get(&ClusterKey::new(4, 4, 1)).map(|c| c.centroid()),
            b.get(&ClusterKey::new(4, 4, 1)).map(|c| c.centroid())
        );
    }

    #[test]
    fn centroid_of_symmetric_pair() {
        let index = ClusterIndex::build(&[
            vertex([0.0, 0.0, 0.0], Some([0.0, 0.0, 0.0])),
            vertex([2.0, 2.0, 2.0], Some([0.0, 0.0, 0.0])),
        ]);
        let cluster = index.get(&ClusterKey::new(0, 0, 0)).unwrap();
        assert_eq!(cluster.centroid(), Vec3::ONE);
    }

    #[test]
    fn centroid_uses_bounding_box_on_skewed_members() {
        let index = ClusterIndex::build(&[
            vertex([0.0, 0.0, 0.0], Some([0.0, 0.0, 0.0])),
            vertex([0.0, 0.0, 0.0], Some([0.0, 0.0, 0.0])),
            vertex([4.0, 0.0, 0.0], Some([0.0, 0.0, 0.0])),
        ]);
        let centroid = index.get(&ClusterKey::new(0, 0, 0)).unwrap().centroid();
        assert_eq!(centroid, Vec3::new(2.0, 0.0, 0.0));
        assert!((centroid.x - 4.0 / 3.0).abs() > 0.5);
    }

    #[test]
    fn unknown_keys_have_no_members() {
        let index = ClusterIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.members(&ClusterKey::new(9, 9, 9)).is_empty());
        assert_eq!(index.choose(&mut StdRng::seed_from_u64(1)), None);
    }

    #[test]
    fn choose_only_returns_existing_keys() {
        let index = ClusterIndex::build(&[
            vertex([0.0, 0.0, 0.0], Some([0.0, 1.0, 0.0])),
            vertex([0.0, 0.0, 0.0], Some([5.0, 1.0, 1.0])),
        ]);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let key = index.choose(&mut rng).unwrap();
            assert!(index.get(&key).is_some());
        }
    }
}
