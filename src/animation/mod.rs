//! Sprite animation and animator state machines

pub mod controller;
mod sprite;

pub use controller::{
    Animator, Compare, Condition, ControllerDesc, ControllerError, ParamRecord, ParamType,
    StateDesc, TransitionDesc,
};
pub use sprite::SpriteAnimation;

use crate::assets::AssetRegistry;
use crate::ecs::Scene;
use crate::renderer::{Sprite, SpriteUi};

/// Advance animators and sprite playback by one tick.
///
/// Animator transitions swap the owning sprite's animation to the new
/// state's sheet, resolving the texture through the registry; afterwards
/// every active sprite advances its frame clock.
pub fn update(scene: &mut Scene, assets: &AssetRegistry, dt: f32) {
    for (_, (animator, sprite)) in scene.world.query_mut::<(&mut Animator, &mut Sprite)>() {
        if !animator.active {
            continue;
        }
        if let Some(state) = animator.update(dt) {
            let mut animation = SpriteAnimation::new(
                state.texture.clone(),
                state.frames_x,
                state.frames_y,
                state.frames_total,
                state.fps,
            );
            animation.texture = assets.texture(&state.texture);
            sprite.animation = animation;
        }
    }

    for (_, sprite) in scene.world.query_mut::<&mut Sprite>() {
        if sprite.active {
            sprite.animation.advance(dt);
        }
    }
    for (_, ui) in scene.world.query_mut::<&mut SpriteUi>() {
        if ui.sprite.active {
            ui.sprite.animation.advance(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetHandle;
    use std::collections::BTreeMap;

    #[test]
    fn test_transition_swaps_sprite_sheet() {
        let desc = ControllerDesc {
            parameters: BTreeMap::from([(
                "Speed".to_string(),
                ParamRecord {
                    kind: ParamType::Float,
                    value: 0.0,
                },
            )]),
            states: vec![
                StateDesc {
                    name: "Idle".to_string(),
                    texture: "idle_sheet".to_string(),
                    frames_x: 2,
                    frames_y: 1,
                    frames_total: 2,
                    fps: 4.0,
                },
                StateDesc {
                    name: "Run".to_string(),
                    texture: "run_sheet".to_string(),
                    frames_x: 6,
                    frames_y: 1,
                    frames_total: 6,
                    fps: 12.0,
                },
            ],
            transitions: vec![TransitionDesc {
                from: "Idle".to_string(),
                to: "Run".to_string(),
                condition: Some(Condition {
                    param: "Speed".to_string(),
                    compare: Compare::Greater,
                    threshold: 5.0,
                }),
                time: 0.0,
            }],
        };

        let mut scene = Scene::new();
        let assets = AssetRegistry::new();
        let e = scene.create("runner");
        scene
            .world
            .insert_one(e, Sprite::new(SpriteAnimation::new("idle_sheet", 2, 1, 2, 4.0)))
            .unwrap();
        scene
            .world
            .insert_one(e, Animator::new("runner.controller", AssetHandle::new(desc)))
            .unwrap();

        scene
            .world
            .get::<&mut Animator>(e)
            .unwrap()
            .set_parameter("Speed", 10.0);
        update(&mut scene, &assets, 1.0 / 60.0);

        let sprite = scene.world.get::<&Sprite>(e).unwrap();
        assert_eq!(sprite.animation.texture_name, "run_sheet");
        assert_eq!(sprite.animation.fps, 12.0);
        assert_eq!(
            scene
                .world
                .get::<&Animator>(e)
                .unwrap()
                .current_state()
                .name,
            "Run"
        );
    }
}
