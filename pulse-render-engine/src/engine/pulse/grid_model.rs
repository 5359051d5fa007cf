//! The two reference grids: fixed cell positions plus per-cell visual state.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use bevy::prelude::*;
use rand::Rng;

use super::config::GridLayout;

/// Which of the two grids a cell or connection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GridId {
    /// Far plane: receives the outward trace and the final highlight.
    A,
    /// Near plane: highlighted first, traced back towards the cloud.
    B,
}

impl GridId {
    pub const ALL: [GridId; 2] = [GridId::A, GridId::B];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub row: usize,
    pub col: usize,
}

impl CellKey {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellVisual {
    #[default]
    Default,
    Highlighted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    key: CellKey,
    position: Vec3,
    visual: CellVisual,
}

impl GridCell {
    pub fn key(&self) -> CellKey {
        self.key
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn visual(&self) -> CellVisual {
        self.visual
    }

    pub fn is_highlighted(&self) -> bool {
        self.visual == CellVisual::Highlighted
    }
}

/// One grid. Geometry is frozen at construction; only visuals change.
#[derive(Debug, Clone)]
pub struct GridModel {
    id: GridId,
    plane_depth: f32,
    cells: BTreeMap<CellKey, GridCell>,
}

impl GridModel {
    /// Tiles `grid_size²` cells in `sub_cluster_size²` blocks around the origin.
    ///
    /// Each block centre receives a random in-plane offset and a random depth
    /// offset; cells sit at fixed offsets from their block centre.
    pub fn build(id: GridId, layout: &GridLayout, plane_depth: f32, rng: &mut impl Rng) -> Self {
        let sub = layout.sub_cluster_size.max(1);
        let per_side = layout.sub_clusters_per_side();
        let pitch = layout.sub_cluster_pitch();

        let half_span = per_side.saturating_sub(1) as f32 * pitch / 2.0;
        let jitter_xy = (pitch - layout.sub_cluster_width()) * layout.plane_jitter_fraction;

        // Consumed in row-major block order: x, y, then depth per block.
        let mut centres = BTreeMap::new();
        for ci in 0..per_side {
            for cj in 0..per_side {
                let base = Vec2::new(ci as f32 * pitch - half_span, cj as f32 * pitch - half_span);
                let jitter = Vec2::new(symmetric(rng, jitter_xy), symmetric(rng, jitter_xy));
                let depth = symmetric(rng, layout.depth_jitter_range);
                centres.insert((ci, cj), (base + jitter, depth));
            }
        }

        let local_mid = (sub - 1) as f32 / 2.0;
        let mut cells = BTreeMap::new();
        for row in 0..layout.grid_size {
            for col in 0..layout.grid_size {
                let Some(&(centre, depth)) = centres.get(&(row / sub, col / sub)) else {
                    continue;
                };
                let offset = Vec2::new(
                    ((row % sub) as f32 - local_mid) * layout.cell_spacing,
                    ((col % sub) as f32 - local_mid) * layout.cell_spacing,
                );
                let key = CellKey::new(row, col);
                cells.insert(
                    key,
                    GridCell {
                        key,
                        position: (centre + offset).extend(plane_depth + depth),
                        visual: CellVisual::Default,
                    },
                );
            }
        }

        Self {
            id,
            plane_depth,
            cells,
        }
    }

    pub fn id(&self) -> GridId {
        self.id
    }

    pub fn plane_depth(&self) -> f32 {
        self.plane_depth
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, key: &CellKey) -> Option<&GridCell> {
        self.cells.get(key)
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.values()
    }

    pub fn reset_visuals(&mut self) {
        for cell in self.cells.values_mut() {
            cell.visual = CellVisual::Default;
        }
    }

    /// Highlights the listed cells; unknown keys are ignored.
    pub fn highlight(&mut self, keys: &BTreeSet<CellKey>) {
        for key in keys {
            if let Some(cell) = self.cells.get_mut(key) {
                cell.visual = CellVisual::Highlighted;
            }
        }
    }

    pub fn highlighted(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.cells
            .values()
            .filter(|cell| cell.is_highlighted())
            .map(|cell| cell.key)
    }
}

fn symmetric(rng: &mut impl Rng, range: f32) -> f32 {
    if range > 0.0 {
        rng.gen_range(-range..range)
    } else {
        0.0
    }
}

/// Both grids, built together from one layout.
#[derive(Resource, Debug, Clone)]
pub struct GridPair {
    a: GridModel,
    b: GridModel,
}

impl GridPair {
    pub fn build(layout: &GridLayout, rng: &mut impl Rng) -> Self {
        let a = GridModel::build(GridId::A, layout, layout.grid_a_depth, rng);
        let b = GridModel::build(GridId::B, layout, layout.grid_b_depth, rng);
        Self { a, b }
    }

    pub fn grid(&self, id: GridId) -> &GridModel {
        match id {
            GridId::A => &self.a,
            GridId::B => &self.b,
        }
    }

    pub fn grid_mut(&mut self, id: GridId) -> &mut GridModel {
        match id {
            GridId::A => &mut self.a,
            GridId::B => &mut self.b,
        }
    }

    pub fn reset_visuals(&mut self) {
        self.a.reset_visuals();
        self.b.reset_visuals();
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridModel> {
        [&self.a, &self.b].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn still_layout() -> GridLayout {
        GridLayout {
            depth_jitter_range: 0.0,
            plane_jitter_fraction: 0.0,
            ..default()
        }
    }

    #[test]
    fn builds_one_cell_per_key() {
        let layout = GridLayout::default();
        let grid = GridModel::build(GridId::A, &layout, -1.0, &mut StdRng::seed_from_u64(3));

        assert_eq!(grid.len(), 16 * 16);
        for row in 0..16 {
            for col in 0..16 {
                assert!(grid.cell(&CellKey::new(row, col)).is_some());
            }
        }
    }

    #[test]
    fn unjittered_grid_is_centred_on_origin() {
        let grid = GridModel::build(GridId::B, &still_layout(), 1.0, &mut StdRng::seed_from_u64(0));
        let (min, max) = grid.cells().fold(
            (Vec3::INFINITY, Vec3::NEG_INFINITY),
            |(min, max), cell| (min.min(cell.position()), max.max(cell.position())),
        );

        assert!((min.x + max.x).abs() < 1e-5);
        assert!((min.y + max.y).abs() < 1e-5);
        assert!(grid.cells().all(|c| c.position().z == 1.0));
    }

    #[test]
    fn cells_share_their_block_offsets() {
        let layout = GridLayout::default();
        let grid = GridModel::build(GridId::A, &layout, -1.0, &mut StdRng::seed_from_u64(9));

        let first = grid.cell(&CellKey::new(0, 0)).unwrap().position();
        let neighbour = grid.cell(&CellKey::new(1, 0)).unwrap().position();
        let corner = grid.cell(&CellKey::new(3, 3)).unwrap().position();

        assert!((neighbour.x - first.x - layout.cell_spacing).abs() < 1e-5);
        assert_eq!(neighbour.z, first.z);
        assert_eq!(corner.z, first.z);
        assert!((first.z + 1.0).abs() <= layout.depth_jitter_range);
    }

    #[test]
    fn jitter_stays_within_layout_limits() {
        let layout = GridLayout::default();
        let grid = GridModel::build(GridId::A, &layout, 0.0, &mut StdRng::seed_from_u64(21));
        let reference = GridModel::build(
            GridId::A,
            &still_layout(),
            0.0,
            &mut StdRng::seed_from_u64(21),
        );
        let jitter = (layout.sub_cluster_pitch() - layout.sub_cluster_width())
            * layout.plane_jitter_fraction;

        for cell in grid.cells() {
            let nominal = reference.cell(&cell.key()).unwrap().position();
            let delta = cell.position() - nominal;
            assert!(delta.x.abs() <= jitter + 1e-5);
            assert!(delta.y.abs() <= jitter + 1e-5);
            assert!(delta.z.abs() <= layout.depth_jitter_range + 1e-5);
        }
    }

    #[test]
    fn highlight_and_reset() {
        let mut pair = GridPair::build(&GridLayout::default(), &mut StdRng::seed_from_u64(5));
        let keys: BTreeSet<CellKey> = [CellKey::new(2, 3), CellKey::new(99, 99)].into();

        pair.grid_mut(GridId::B).highlight(&keys);
        assert_eq!(
            pair.grid(GridId::B).highlighted().collect::<Vec<_>>(),
            vec![CellKey::new(2, 3)]
        );
        assert_eq!(pair.grid(GridId::A).highlighted().count(), 0);

        pair.reset_visuals();
        assert_eq!(pair.grid(GridId::B).highlighted().count(), 0);
    }

    #[test]
    fn grids_sit_on_their_planes() {
        let pair = GridPair::build(&still_layout(), &mut StdRng::seed_from_u64(5));
        assert_eq!(pair.grid(GridId::A).plane_depth(), -1.0);
        assert_eq!(pair.grid(GridId::B).plane_depth(), 1.0);
        assert!(pair.grid(GridId::A).cells().all(|c| c.position().z == -1.0));
    }
}
