//! Uniform spatial hash over scene objects
//!
//! Space is cut into cubic cells of a fixed edge length. Every indexed object
//! lives in the one cell containing its global position, so a 3×3×3 sweep
//! around a point finds every object within one cell size on each axis.
//!
//! The grid is a disposable view: [`SpatialGrid::rebuild`] throws the previous
//! buckets away and re-buckets everything from scratch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::config::GridConfig;
use crate::foundation::math::{utils, Vec3};
use crate::physics::collision_filter::IgnoreSet;
use crate::scene::ObjectId;

/// Integer cell coordinates
pub type CellKey = (i32, i32, i32);

/// Offsets of the 27 cells visited by a neighbor query, dx outermost
const NEIGHBOR_OFFSETS: [CellKey; 27] = {
    let mut offsets = [(0, 0, 0); 27];
    let mut i = 0;
    while i < 27 {
        offsets[i] = (i as i32 / 9 - 1, i as i32 / 3 % 3 - 1, i as i32 % 3 - 1);
        i += 1;
    }
    offsets
};

/// How a scaled coordinate is rounded to an integer cell index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellKeyMode {
    /// Round toward negative infinity; every cell has the same size
    #[default]
    Floor,
    /// Round toward zero; the cells touching zero on each axis are twice as wide
    Truncate,
}

impl CellKeyMode {
    fn index(self, scaled: f32) -> i32 {
        match self {
            Self::Floor => scaled.floor() as i32,
            Self::Truncate => scaled.trunc() as i32,
        }
    }
}

/// Spatial hash mapping cell keys to the objects inside them
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    key_mode: CellKeyMode,
    cells: HashMap<CellKey, Vec<ObjectId>>,
    object_count: usize,
}

impl SpatialGrid {
    /// Create an empty grid
    pub fn new(config: &GridConfig) -> Self {
        Self {
            cell_size: config.cell_size,
            key_mode: config.key_mode,
            cells: HashMap::new(),
            object_count: 0,
        }
    }

    /// Edge length of every cell
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Key rounding mode in use
    pub fn key_mode(&self) -> CellKeyMode {
        self.key_mode
    }

    /// Cell containing `point`
    pub fn cell_key(&self, point: &Vec3) -> CellKey {
        (
            self.key_mode.index(point.x / self.cell_size),
            self.key_mode.index(point.y / self.cell_size),
            self.key_mode.index(point.z / self.cell_size),
        )
    }

    /// Drop every bucket
    pub fn clear(&mut self) {
        self.cells.clear();
        self.object_count = 0;
    }

    /// Re-bucket `objects` from scratch, skipping ignored ids
    ///
    /// Objects are appended to their bucket in iteration order, which fixes the
    /// order later returned by neighbor queries. Objects with a non-finite
    /// position cannot collide and are left out.
    pub fn rebuild<I>(&mut self, objects: I, ignore: &IgnoreSet)
    where
        I: IntoIterator<Item = (ObjectId, Vec3)>,
    {
        self.clear();

        for (id, position) in objects {
            if ignore.contains(id) {
                continue;
            }

            if !utils::is_finite(&position) {
                log::warn!("Skipping object {:?} with non-finite position {:?}", id, position);
                continue;
            }

            let key = self.cell_key(&position);
            self.cells.entry(key).or_default().push(id);
            self.object_count += 1;
        }

        log::trace!(
            "Spatial grid rebuilt: {} objects in {} cells",
            self.object_count,
            self.cells.len()
        );
    }

    /// Objects in the 27 cells around `point`, written into `buf`
    ///
    /// `buf` is cleared first. Cells are visited with dx, dy, dz each
    /// ascending (dx outermost); within a cell, objects keep insertion order.
    pub fn query_neighbors_into(&self, point: &Vec3, buf: &mut Vec<ObjectId>) {
        buf.clear();
        if self.cells.is_empty() {
            return;
        }

        let (cx, cy, cz) = self.cell_key(point);
        for (dx, dy, dz) in NEIGHBOR_OFFSETS {
            let key = (
                cx.saturating_add(dx),
                cy.saturating_add(dy),
                cz.saturating_add(dz),
            );
            if let Some(ids) = self.cells.get(&key) {
                buf.extend_from_slice(ids);
            }
        }
    }

    /// Objects in the 27 cells around `point`
    pub fn query_neighbors(&self, point: &Vec3) -> Vec<ObjectId> {
        let mut buf = Vec::new();
        self.query_neighbors_into(point, &mut buf);
        buf
    }

    /// Contents of a single cell
    pub fn bucket(&self, key: CellKey) -> &[ObjectId] {
        self.cells.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Number of indexed objects
    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<ObjectId> {
        let mut map: SlotMap<ObjectId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn grid() -> SpatialGrid {
        SpatialGrid::new(&GridConfig::default())
    }

    #[test]
    fn test_neighbor_offsets_order() {
        assert_eq!(NEIGHBOR_OFFSETS[0], (-1, -1, -1));
        assert_eq!(NEIGHBOR_OFFSETS[1], (-1, -1, 0));
        assert_eq!(NEIGHBOR_OFFSETS[3], (-1, 0, -1));
        assert_eq!(NEIGHBOR_OFFSETS[13], (0, 0, 0));
        assert_eq!(NEIGHBOR_OFFSETS[26], (1, 1, 1));
    }

    #[test]
    fn test_cell_key_modes() {
        let floor = grid();
        assert_eq!(floor.cell_key(&Vec3::new(4.9, 5.0, -0.1)), (0, 1, -1));

        let truncate = SpatialGrid::new(&GridConfig::default().with_key_mode(CellKeyMode::Truncate));
        assert_eq!(truncate.cell_key(&Vec3::new(4.9, 5.0, -0.1)), (0, 1, 0));
        assert_eq!(truncate.cell_key(&Vec3::new(-4.9, 0.0, -5.1)), (0, 0, -1));
    }

    #[test]
    fn test_empty_grid_returns_nothing() {
        let grid = grid();
        assert!(grid.query_neighbors(&Vec3::zeros()).is_empty());
        assert_eq!(grid.object_count(), 0);
        assert_eq!(grid.cell_count(), 0);
    }

    #[test]
    fn test_partition_invariant() {
        let ids = ids(5);
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(12.0, -3.0, 7.5),
            Vec3::new(-0.5, 0.2, 0.0),
            Vec3::new(4.99, 4.99, 4.99),
            Vec3::new(-20.0, 1.0, 33.0),
        ];
        let ignore = IgnoreSet::from_iter([ids[2]]);

        let mut grid = grid();
        grid.rebuild(ids.iter().copied().zip(positions), &ignore);

        assert_eq!(grid.object_count(), 4);
        for (id, pos) in ids.iter().zip(positions) {
            let hits: usize = grid
                .cells
                .values()
                .map(|bucket| bucket.iter().filter(|&&b| b == *id).count())
                .sum();
            if *id == ids[2] {
                assert_eq!(hits, 0);
            } else {
                assert_eq!(hits, 1);
                assert!(grid.bucket(grid.cell_key(&pos)).contains(id));
            }
        }
    }

    #[test]
    fn test_rebuild_discards_previous_state() {
        let ids = ids(2);
        let mut grid = grid();
        grid.rebuild([(ids[0], Vec3::zeros())], &IgnoreSet::default());
        grid.rebuild([(ids[1], Vec3::new(50.0, 0.0, 0.0))], &IgnoreSet::default());

        assert_eq!(grid.object_count(), 1);
        assert_eq!(grid.cell_count(), 1);
        assert!(grid.query_neighbors(&Vec3::zeros()).is_empty());
    }

    #[test]
    fn test_adjacent_cells_found_across_boundary() {
        let ids = ids(1);
        let mut grid = grid();
        grid.rebuild([(ids[0], Vec3::new(4.9, 0.0, 0.0))], &IgnoreSet::default());

        let agent = Vec3::new(5.1, 0.0, 0.0);
        assert_ne!(grid.cell_key(&agent), grid.cell_key(&Vec3::new(4.9, 0.0, 0.0)));
        assert_eq!(grid.query_neighbors(&agent), vec![ids[0]]);
    }

    #[test]
    fn test_neighbor_completeness() {
        let ids = ids(1);
        let coords = [-7.5_f32, -5.0, -0.01, 0.0, 2.5, 4.99, 5.0, 9.99];
        for &ax in &coords {
            for &ay in &coords {
                let a = Vec3::new(ax, ay, 1.0);
                let mut grid = grid();
                grid.rebuild([(ids[0], a)], &IgnoreSet::default());
                for &dx in &[-5.0_f32, -2.5, 0.0, 3.0, 5.0] {
                    for &dz in &[-5.0_f32, 0.0, 4.0] {
                        let b = a + Vec3::new(dx, -dx, dz);
                        assert!(
                            grid.query_neighbors(&b).contains(&ids[0]),
                            "{:?} not found from {:?}",
                            a,
                            b
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_scan_order_is_offset_then_insertion() {
        let ids = ids(4);
        let mut grid = grid();
        grid.rebuild(
            [
                (ids[0], Vec3::new(6.0, 0.0, 0.0)),
                (ids[1], Vec3::new(-1.0, 0.0, 0.0)),
                (ids[2], Vec3::new(1.0, 0.0, 0.0)),
                (ids[3], Vec3::new(-2.0, 0.0, 0.0)),
            ],
            &IgnoreSet::default(),
        );

        // Cell -1 on X is visited first, then 0, then 1.
        let found = grid.query_neighbors(&Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(found, vec![ids[1], ids[3], ids[2], ids[0]]);
    }

    #[test]
    fn test_query_into_reuses_buffer() {
        let ids = ids(1);
        let mut grid = grid();
        grid.rebuild([(ids[0], Vec3::zeros())], &IgnoreSet::default());

        let mut buf = vec![ids[0], ids[0]];
        grid.query_neighbors_into(&Vec3::new(100.0, 0.0, 0.0), &mut buf);
        assert!(buf.is_empty());
        grid.query_neighbors_into(&Vec3::zeros(), &mut buf);
        assert_eq!(buf, vec![ids[0]]);
    }

    #[test]
    fn test_non_finite_positions_skipped() {
        let ids = ids(2);
        let mut grid = grid();
        grid.rebuild(
            [(ids[0], Vec3::new(f32::NAN, 0.0, 0.0)), (ids[1], Vec3::zeros())],
            &IgnoreSet::default(),
        );
        assert_eq!(grid.object_count(), 1);
    }
}
