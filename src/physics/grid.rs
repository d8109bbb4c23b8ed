//! Broad-phase spatial grid
//!
//! A uniform grid rebuilt from scratch every collision pass, so no cell ever
//! holds a stale reference. Cell size matches the largest collider diameter;
//! each entity lands in every cell its AABB touches and candidate pairs come
//! from a cell and its eight neighbors, deduplicated by sorted id pair.

use hecs::Entity;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::math::Rect;

/// Default cell size, sized to the largest collider the game ships
pub const DEFAULT_CELL_SIZE: f32 = 256.0;

/// Uniform spatial grid over collider AABBs
pub struct SpatialGrid {
    cell_size: f32,
    /// Inserted AABBs in insertion order
    entries: Vec<(Entity, Rect)>,
    /// Cell coordinate to indices into `entries`
    cells: FxHashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            entries: Vec::new(),
            cells: FxHashMap::default(),
        }
    }

    /// Drop all entries, keeping allocations for the next pass
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
    }

    fn cell_of(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    fn cells_covering(&self, aabb: &Rect) -> ((i32, i32), (i32, i32)) {
        (
            self.cell_of(aabb.min.x, aabb.min.y),
            self.cell_of(aabb.max.x, aabb.max.y),
        )
    }

    /// Insert an entity into every cell its AABB touches
    pub fn insert(&mut self, entity: Entity, aabb: Rect) {
        let index = self.entries.len();
        self.entries.push((entity, aabb));

        let ((min_x, min_y), (max_x, max_y)) = self.cells_covering(&aabb);
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                self.cells.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    /// Number of inserted entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate pairs from shared and neighboring cells.
    ///
    /// Entries are visited in insertion order and each unordered pair is
    /// produced at most once, so the output order is deterministic for a
    /// deterministic insertion sequence.
    #[must_use]
    pub fn candidate_pairs(&self) -> Vec<(Entity, Entity)> {
        let mut seen: FxHashSet<(u64, u64)> = FxHashSet::default();
        let mut pairs = Vec::new();

        for (i, (entity, aabb)) in self.entries.iter().enumerate() {
            let ((min_x, min_y), (max_x, max_y)) = self.cells_covering(aabb);
            for cx in (min_x - 1)..=(max_x + 1) {
                for cy in (min_y - 1)..=(max_y + 1) {
                    let Some(indices) = self.cells.get(&(cx, cy)) else {
                        continue;
                    };
                    for &j in indices {
                        if j == i {
                            continue;
                        }
                        let other = self.entries[j].0;
                        let (lo, hi) = if entity.to_bits() <= other.to_bits() {
                            (*entity, other)
                        } else {
                            (other, *entity)
                        };
                        if seen.insert((lo.to_bits().get(), hi.to_bits().get())) {
                            pairs.push((lo, hi));
                        }
                    }
                }
            }
        }
        pairs
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn spawn(world: &mut hecs::World) -> Entity {
        world.spawn(())
    }

    #[test]
    fn test_nearby_entries_pair_once() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world);
        let b = spawn(&mut world);

        let mut grid = SpatialGrid::new(100.0);
        // Both straddle cell borders, so they share several cells
        grid.insert(a, Rect::from_center_half_extents(Vec2::ZERO, Vec2::splat(60.0)));
        grid.insert(
            b,
            Rect::from_center_half_extents(Vec2::new(50.0, 0.0), Vec2::splat(60.0)),
        );

        let pairs = grid.candidate_pairs();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_distant_entries_do_not_pair() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world);
        let b = spawn(&mut world);

        let mut grid = SpatialGrid::new(100.0);
        grid.insert(a, Rect::from_center_half_extents(Vec2::ZERO, Vec2::splat(10.0)));
        grid.insert(
            b,
            Rect::from_center_half_extents(Vec2::new(1000.0, 1000.0), Vec2::splat(10.0)),
        );

        assert!(grid.candidate_pairs().is_empty());
    }

    #[test]
    fn test_neighbor_cells_are_candidates() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world);
        let b = spawn(&mut world);

        let mut grid = SpatialGrid::new(100.0);
        // Different cells, but adjacent ones
        grid.insert(a, Rect::from_center_half_extents(Vec2::new(90.0, 50.0), Vec2::splat(5.0)));
        grid.insert(
            b,
            Rect::from_center_half_extents(Vec2::new(110.0, 50.0), Vec2::splat(5.0)),
        );

        assert_eq!(grid.candidate_pairs().len(), 1);
    }

    #[test]
    fn test_clear_resets_entries() {
        let mut world = hecs::World::new();
        let a = spawn(&mut world);

        let mut grid = SpatialGrid::default();
        grid.insert(a, Rect::from_center_half_extents(Vec2::ZERO, Vec2::splat(10.0)));
        assert_eq!(grid.len(), 1);

        grid.clear();
        assert!(grid.is_empty());
        assert!(grid.candidate_pairs().is_empty());
    }
}
