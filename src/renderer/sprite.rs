//! Sprite components and world-space draw collection

use glam::Vec2;

use super::batch::SpriteBatch;
use super::WHITE_TEXTURE;
use crate::animation::SpriteAnimation;
use crate::ecs::{Scene, Transform};

/// Base size in world units of one atlas frame at scale 1
pub const SPRITE_UNIT: f32 = 100.0;

/// World-space sprite: one animation, a draw layer, flips, and a tint
#[derive(Debug, Clone)]
pub struct Sprite {
    pub animation: SpriteAnimation,
    /// Draw order; lower layers draw first
    pub layer: i32,
    pub flip_x: bool,
    pub flip_y: bool,
    /// RGBA tint multiplied over the texture
    pub color: [f32; 4],
    pub active: bool,
}

impl Sprite {
    #[must_use]
    pub fn new(animation: SpriteAnimation) -> Self {
        Self {
            animation,
            layer: 0,
            flip_x: false,
            flip_y: false,
            color: [1.0; 4],
            active: true,
        }
    }

    #[must_use]
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }
}

/// Camera-space sprite, collected through the owning canvas
#[derive(Debug, Clone)]
pub struct SpriteUi {
    pub sprite: Sprite,
    /// Skipped by the UI pass when false
    pub renderable: bool,
}

impl SpriteUi {
    #[must_use]
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            renderable: true,
        }
    }
}

/// Push a single sprite quad with the owning world pose applied
pub fn queue_sprite(batch: &mut SpriteBatch, sprite: &Sprite, transform: &Transform, shift: Vec2) {
    let texture = sprite
        .animation
        .texture
        .as_ref()
        .map(|t| t.id())
        .unwrap_or(WHITE_TEXTURE);
    // A sprite with no resolved texture is silently skipped
    if sprite.animation.texture.is_none() && !sprite.animation.texture_name.is_empty() {
        return;
    }

    let world = transform.world();
    let (mut uv_min, mut uv_max) = sprite.animation.uv_rect();
    if sprite.flip_x {
        std::mem::swap(&mut uv_min[0], &mut uv_max[0]);
    }
    if sprite.flip_y {
        std::mem::swap(&mut uv_min[1], &mut uv_max[1]);
    }

    batch.quad(
        texture,
        world.position + shift,
        Vec2::splat(SPRITE_UNIT) * world.scale,
        world.rotation,
        uv_min,
        uv_max,
        sprite.color,
    );
}

/// Collect every active world-space sprite into the batch, sorted by layer
/// ascending and by insertion order within a layer.
pub fn collect_world(scene: &Scene, batch: &mut SpriteBatch) {
    let mut order: Vec<(i32, hecs::Entity)> = Vec::new();
    for entity in scene.all() {
        let Ok(sprite) = scene.world.get::<&Sprite>(entity) else {
            continue;
        };
        if !sprite.active {
            continue;
        }
        order.push((sprite.layer, entity));
    }
    // Stable sort keeps insertion order within a layer
    order.sort_by_key(|(layer, _)| *layer);

    for (_, entity) in order {
        let (Ok(sprite), Ok(transform)) = (
            scene.world.get::<&Sprite>(entity),
            scene.world.get::<&Transform>(entity),
        ) else {
            continue;
        };
        queue_sprite(batch, &sprite, &transform, Vec2::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::batch::MAX_TEXTURE_SLOTS;

    #[test]
    fn test_unresolved_texture_is_skipped() {
        let mut scene = Scene::new();
        let e = scene.create("ghost");
        scene
            .world
            .insert_one(e, Sprite::new(SpriteAnimation::single("missing_atlas")))
            .unwrap();

        let mut batch = SpriteBatch::new();
        collect_world(&scene, &mut batch);
        assert_eq!(batch.finish().len(), 0);
    }

    #[test]
    fn test_layers_draw_in_ascending_order() {
        let mut scene = Scene::new();
        // Insertion order deliberately reversed against layer order
        let top = scene.create("top");
        scene
            .world
            .insert_one(
                top,
                Sprite::new(SpriteAnimation::new(String::new(), 1, 1, 1, 0.0)).with_layer(5),
            )
            .unwrap();
        let bottom = scene.create("bottom");
        scene
            .world
            .insert_one(
                bottom,
                Sprite::new(SpriteAnimation::new(String::new(), 1, 1, 1, 0.0)).with_layer(1),
            )
            .unwrap();

        let mut batch = SpriteBatch::new();
        collect_world(&scene, &mut batch);
        let batches = batch.finish();
        assert_eq!(batches.len(), 1);
        // Both sprites use the white fallback (empty texture name), so the
        // single batch holds eight vertices with the bottom layer first
        assert_eq!(batches[0].vertices.len(), 8);
        assert!(batches[0].textures.len() <= MAX_TEXTURE_SLOTS);
    }
}
