//! Canvas-anchored UI pass
//!
//! Entities under a `UiRoot` ancestor draw in camera space: the pass
//! collects each canvas's descendants once per frame in layer-then-insertion
//! order and shifts them by the active camera center so they stay anchored
//! to the screen.

use glam::Vec2;
use hecs::Entity;

use crate::ecs::{hierarchy, Scene, TextUi, Transform, UiRoot};
use crate::renderer::{queue_sprite, SpriteBatch, SpriteUi};

/// One camera-space text run, resolved by the renderer's glyph cache
#[derive(Debug, Clone)]
pub struct UiTextRun {
    pub content: String,
    pub font: String,
    pub origin: Vec2,
    pub size: f32,
    pub color: [f32; 4],
}

/// Canvas members in draw order: canvases in insertion order, descendants
/// depth-first under each
fn canvas_members(scene: &Scene) -> Vec<Entity> {
    let mut members = Vec::new();
    for root in scene.all() {
        if scene.world.get::<&UiRoot>(root).is_err() {
            continue;
        }
        // A nested canvas belongs to its topmost ancestor's pass
        if hierarchy::parent_of(scene, root).is_some()
            && scene
                .world
                .get::<&UiRoot>(hierarchy::topmost_ancestor(scene, root))
                .is_ok()
            && hierarchy::topmost_ancestor(scene, root) != root
        {
            continue;
        }
        members.push(root);
        hierarchy::collect_descendants(scene, root, &mut members);
    }
    members
}

/// Queue every renderable canvas sprite, shifted to the camera center
pub fn collect_sprites(scene: &Scene, camera_center: Vec2, batch: &mut SpriteBatch) {
    let members = canvas_members(scene);

    let mut order: Vec<(i32, Entity)> = members
        .iter()
        .filter_map(|&entity| {
            let ui = scene.world.get::<&SpriteUi>(entity).ok()?;
            (ui.renderable && ui.sprite.active).then_some((ui.sprite.layer, entity))
        })
        .collect();
    order.sort_by_key(|(layer, _)| *layer);

    for (_, entity) in order {
        let (Ok(ui), Ok(transform)) = (
            scene.world.get::<&SpriteUi>(entity),
            scene.world.get::<&Transform>(entity),
        ) else {
            continue;
        };
        queue_sprite(batch, &ui.sprite, &transform, camera_center);
    }
}

/// Gather camera-space text runs for the renderer
#[must_use]
pub fn collect_text(scene: &Scene, camera_center: Vec2) -> Vec<UiTextRun> {
    canvas_members(scene)
        .into_iter()
        .filter_map(|entity| {
            let ui = scene.world.get::<&TextUi>(entity).ok()?;
            if !ui.text.active {
                return None;
            }
            let base = scene
                .world
                .get::<&Transform>(entity)
                .map(|t| t.world_position())
                .unwrap_or_default();
            Some(UiTextRun {
                content: ui.text.content.clone(),
                font: ui.text.font.clone(),
                origin: base + ui.text.offset + camera_center,
                size: ui.text.size,
                color: [
                    ui.text.color[0],
                    ui.text.color[1],
                    ui.text.color[2],
                    ui.text.alpha,
                ],
            })
        })
        .collect()
}
