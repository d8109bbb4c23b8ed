//! Quad batching with texture-slot multiplexing
//!
//! Distinct textures are assigned slots 0..31; the batch flushes when the
//! slot table fills, when the vertex budget is reached, or at the end of the
//! draw list. A flush resets slot assignments, so batching is deterministic:
//! K distinct textures cost at most ceil(K / 32) submissions.

use glam::Vec2;
use rustc_hash::FxHashMap;

use super::vertex::QuadVertex;

/// Hardware-practical texture unit count per submission
pub const MAX_TEXTURE_SLOTS: usize = 32;

/// Vertex budget per submission, in quads
pub const MAX_QUADS: usize = 10_000;

/// One pending submission: vertices, indices, and the textures bound to
/// slots 0..N in order
#[derive(Debug, Default)]
pub struct DrawBatch {
    pub vertices: Vec<QuadVertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<u64>,
}

/// Accumulates quads and splits them into submissions
#[derive(Debug, Default)]
pub struct SpriteBatch {
    vertices: Vec<QuadVertex>,
    indices: Vec<u32>,
    slots: FxHashMap<u64, u32>,
    textures: Vec<u64>,
    finished: Vec<DrawBatch>,
}

impl SpriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quads accumulated in the open submission
    #[must_use]
    pub fn pending_quads(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Assign a slot for a texture, flushing first when the table is full
    fn slot_for(&mut self, texture: u64) -> u32 {
        if let Some(&slot) = self.slots.get(&texture) {
            return slot;
        }
        if self.textures.len() >= MAX_TEXTURE_SLOTS {
            self.flush();
        }
        let slot = self.textures.len() as u32;
        self.slots.insert(texture, slot);
        self.textures.push(texture);
        slot
    }

    /// Push one quad.
    ///
    /// `rotation` is in radians around the center; UVs address the sub-frame
    /// of the atlas bound at `texture`'s slot.
    #[allow(clippy::too_many_arguments)]
    pub fn quad(
        &mut self,
        texture: u64,
        center: Vec2,
        size: Vec2,
        rotation: f32,
        uv_min: [f32; 2],
        uv_max: [f32; 2],
        color: [f32; 4],
    ) {
        if self.pending_quads() >= MAX_QUADS {
            self.flush();
        }
        let slot = self.slot_for(texture) as f32;

        let half = size * 0.5;
        let (sin, cos) = rotation.sin_cos();
        let rotate = |corner: Vec2| -> [f32; 3] {
            let p = Vec2::new(
                corner.x * cos - corner.y * sin,
                corner.x * sin + corner.y * cos,
            ) + center;
            [p.x, p.y, 0.0]
        };

        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            QuadVertex::new(rotate(Vec2::new(-half.x, -half.y)), color, [uv_min[0], uv_min[1]], slot),
            QuadVertex::new(rotate(Vec2::new(half.x, -half.y)), color, [uv_max[0], uv_min[1]], slot),
            QuadVertex::new(rotate(Vec2::new(half.x, half.y)), color, [uv_max[0], uv_max[1]], slot),
            QuadVertex::new(rotate(Vec2::new(-half.x, half.y)), color, [uv_min[0], uv_max[1]], slot),
        ]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// Close the open submission and reset slot assignments
    pub fn flush(&mut self) {
        if self.vertices.is_empty() {
            self.slots.clear();
            self.textures.clear();
            return;
        }
        self.finished.push(DrawBatch {
            vertices: std::mem::take(&mut self.vertices),
            indices: std::mem::take(&mut self.indices),
            textures: std::mem::take(&mut self.textures),
        });
        self.slots.clear();
    }

    /// Flush the remainder and take every pending submission
    #[must_use]
    pub fn finish(&mut self) -> Vec<DrawBatch> {
        self.flush();
        std::mem::take(&mut self.finished)
    }

    /// Submissions completed so far, not counting the open one
    #[must_use]
    pub fn submission_count(&self) -> usize {
        self.finished.len()
    }
}

/// Line and point primitives; they share the quad vertex layout and draw
/// with the white texture in slot zero.
#[derive(Debug, Default)]
pub struct PrimitiveBatch {
    pub lines: Vec<QuadVertex>,
    pub points: Vec<QuadVertex>,
}

impl PrimitiveBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: [f32; 4]) {
        self.lines
            .push(QuadVertex::new([from.x, from.y, 0.0], color, [0.0, 0.0], 0.0));
        self.lines
            .push(QuadVertex::new([to.x, to.y, 0.0], color, [1.0, 1.0], 0.0));
    }

    pub fn point(&mut self, at: Vec2, color: [f32; 4]) {
        self.points
            .push(QuadVertex::new([at.x, at.y, 0.0], color, [0.5, 0.5], 0.0));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.points.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_unit_quad(batch: &mut SpriteBatch, texture: u64) {
        batch.quad(
            texture,
            Vec2::ZERO,
            Vec2::ONE,
            0.0,
            [0.0, 0.0],
            [1.0, 1.0],
            [1.0; 4],
        );
    }

    #[test]
    fn test_distinct_textures_bound_by_slot_capacity() {
        let mut batch = SpriteBatch::new();
        let distinct = 70;
        for texture in 0..distinct {
            push_unit_quad(&mut batch, texture);
        }
        let batches = batch.finish();
        // ceil(70 / 32) submissions
        assert_eq!(batches.len(), distinct.div_ceil(MAX_TEXTURE_SLOTS as u64) as usize);
        assert!(batches.iter().all(|b| b.textures.len() <= MAX_TEXTURE_SLOTS));
    }

    #[test]
    fn test_repeated_texture_shares_one_slot() {
        let mut batch = SpriteBatch::new();
        for _ in 0..100 {
            push_unit_quad(&mut batch, 7);
        }
        let batches = batch.finish();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].textures, vec![7]);
        assert_eq!(batches[0].vertices.len(), 400);
        assert_eq!(batches[0].indices.len(), 600);
    }

    #[test]
    fn test_vertex_budget_forces_flush() {
        let mut batch = SpriteBatch::new();
        for _ in 0..(MAX_QUADS + 1) {
            push_unit_quad(&mut batch, 1);
        }
        let batches = batch.finish();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].vertices.len(), MAX_QUADS * 4);
        assert_eq!(batches[1].vertices.len(), 4);
    }

    #[test]
    fn test_flush_resets_slot_assignments() {
        let mut batch = SpriteBatch::new();
        push_unit_quad(&mut batch, 42);
        batch.flush();
        push_unit_quad(&mut batch, 99);
        let batches = batch.finish();
        // After a flush the next texture starts again at slot zero
        assert_eq!(batches[1].textures, vec![99]);
        assert_eq!(batches[1].vertices[0].slot, 0.0);
    }

    #[test]
    fn test_quad_uvs_address_sub_frame() {
        let mut batch = SpriteBatch::new();
        batch.quad(
            1,
            Vec2::ZERO,
            Vec2::splat(2.0),
            0.0,
            [0.25, 0.5],
            [0.5, 1.0],
            [1.0; 4],
        );
        let batches = batch.finish();
        let v = &batches[0].vertices;
        assert_eq!(v[0].uv, [0.25, 0.5]);
        assert_eq!(v[2].uv, [0.5, 1.0]);
        // Counter-clockwise unit square around the center
        assert_eq!(v[0].position[0], -1.0);
        assert_eq!(v[2].position[1], 1.0);
    }
}
