//! Line entities for live pulses. Each owned line becomes a `LineList` mesh
//! whose index buffer is cut down to the current draw window.
use std::collections::BTreeMap;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use crate::engine::pulse::grid_model::GridId;
use crate::engine::pulse::instance::{InstanceId, PulseLine};
use crate::engine::pulse::phase::DrawRange;

#[derive(Component, Debug, Clone, Copy)]
pub struct PulseLineMarker {
    pub instance: InstanceId,
    pub grid: GridId,
    pub line: usize,
    /// Window currently written into the index buffer.
    pub drawn: DrawRange,
}

/// Shared unlit material for every pulse line.
#[derive(Resource)]
pub struct PulseLineMaterial(pub Handle<StandardMaterial>);

/// Render resources held by each live pulse, released when it retires.
#[derive(Resource, Default)]
pub struct PulseLineEntities {
    by_instance: BTreeMap<InstanceId, Vec<(Entity, Handle<Mesh>)>>,
}

impl PulseLineEntities {
    pub fn insert(&mut self, id: InstanceId, lines: Vec<(Entity, Handle<Mesh>)>) {
        self.by_instance.insert(id, lines);
    }

    pub fn remove(&mut self, id: InstanceId) -> Vec<(Entity, Handle<Mesh>)> {
        self.by_instance.remove(&id).unwrap_or_default()
    }

    pub fn instance_count(&self) -> usize {
        self.by_instance.len()
    }

    pub fn line_count(&self) -> usize {
        self.by_instance.values().map(Vec::len).sum()
    }
}

/// Full-point mesh of a line, with indices for its current window.
pub fn line_mesh(line: &PulseLine) -> Mesh {
    let positions: Vec<[f32; 3]> = line.points().iter().map(|p| p.to_array()).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32(window_indices(line.draw_range())));
    mesh
}

/// Segment indices covering the points of `range`.
pub fn window_indices(range: DrawRange) -> Vec<u32> {
    if range.count < 2 {
        return Vec::new();
    }
    (range.start..range.end() - 1)
        .flat_map(|i| [i as u32, i as u32 + 1])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_point_window_is_one_segment() {
        assert_eq!(window_indices(DrawRange { start: 7, count: 2 }), vec![7, 8]);
    }

    #[test]
    fn full_range_covers_every_segment() {
        assert_eq!(
            window_indices(DrawRange { start: 0, count: 4 }),
            vec![0, 1, 1, 2, 2, 3]
        );
    }

    #[test]
    fn short_ranges_draw_nothing() {
        assert!(window_indices(DrawRange::EMPTY).is_empty());
        assert!(window_indices(DrawRange { start: 3, count: 1 }).is_empty());
    }
}
