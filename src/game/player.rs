//! Player controller
//!
//! Movement forces from bound actions, projectile fire toward the cursor,
//! and the Speed parameter feeding the player's animator.

use glam::Vec2;
use hecs::Entity;
use smallvec::SmallVec;

use crate::animation::Animator;
use crate::core::{EventQueue, GameEvent};
use crate::ecs::{ColliderBox, RectCollider, RigidBody, Scene, Transform};
use crate::input::{Action, Bindings, Input};
use crate::renderer::ShakeKind;

use super::ai::AiState;

/// Speed of a fired projectile in world units per second
pub const PROJECTILE_SPEED: f32 = 900.0;

/// Clip scheduled on fire
pub const SHOOT_SOUND: &str = "shoot";

/// Player-controlled entity
#[derive(Debug, Clone)]
pub struct Player {
    /// Movement force magnitude
    pub move_force: f32,
    /// Key bindings owned by this component
    pub bindings: Bindings,
    /// Seconds between shots
    pub fire_cooldown: f32,
    pub active: bool,
    cooldown_remaining: f32,
}

impl Player {
    #[must_use]
    pub fn new(move_force: f32) -> Self {
        Self {
            move_force,
            bindings: Bindings::with_defaults(),
            fire_cooldown: 0.25,
            active: true,
            cooldown_remaining: 0.0,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(2400.0)
    }
}

/// Advance every player by one tick
pub fn update(
    scene: &mut Scene,
    input: &Input,
    events: &mut EventQueue,
    cursor_world: Vec2,
    dt: f32,
) {
    let players: Vec<Entity> = scene
        .all()
        .filter(|e| scene.world.get::<&Player>(*e).is_ok())
        .collect();

    for entity in players {
        let (move_dir, fire, origin) = {
            let Ok(mut player) = scene.world.get::<&mut Player>(entity) else {
                continue;
            };
            if !player.active {
                continue;
            }
            player.cooldown_remaining = (player.cooldown_remaining - dt).max(0.0);

            let mut dir = Vec2::ZERO;
            if player.bindings.is_down(input, Action::MoveUp) {
                dir.y += 1.0;
            }
            if player.bindings.is_down(input, Action::MoveDown) {
                dir.y -= 1.0;
            }
            if player.bindings.is_down(input, Action::MoveLeft) {
                dir.x -= 1.0;
            }
            if player.bindings.is_down(input, Action::MoveRight) {
                dir.x += 1.0;
            }

            let fire = player.bindings.is_down(input, Action::Fire)
                && player.cooldown_remaining <= 0.0;
            if fire {
                player.cooldown_remaining = player.fire_cooldown;
            }

            // The pause menu button owns un-pausing; the player only pauses
            if player.bindings.just_pressed(input, Action::Pause) {
                events.push(GameEvent::PauseToggled);
            }

            let origin = scene
                .world
                .get::<&Transform>(entity)
                .map(|t| t.world_position())
                .unwrap_or(Vec2::ZERO);

            (dir.normalize_or_zero() * player.move_force, fire, origin)
        };

        if move_dir != Vec2::ZERO
            && let Ok(mut body) = scene.world.get::<&mut RigidBody>(entity)
        {
            body.apply_force(move_dir);
        }

        // Feed the animator's Speed parameter from the body velocity
        let speed = scene
            .world
            .get::<&RigidBody>(entity)
            .map(|b| b.velocity.length())
            .unwrap_or(0.0);
        if let Ok(mut animator) = scene.world.get::<&mut Animator>(entity) {
            animator.set_parameter("Speed", speed);
        }

        if fire {
            spawn_projectile(scene, origin, cursor_world);
            events.push(GameEvent::PlaySound {
                clip: SHOOT_SOUND.to_string(),
            });
            events.push(GameEvent::CameraShake {
                kind: ShakeKind::Shooting,
                intensity: 2.0,
            });
        }
    }
}

/// Spawn a projectile flying from `origin` toward `target`
fn spawn_projectile(scene: &mut Scene, origin: Vec2, target: Vec2) -> Entity {
    let direction = (target - origin).normalize_or_zero();
    let direction = if direction == Vec2::ZERO {
        Vec2::X
    } else {
        direction
    };

    let entity = scene.create("Projectile");
    scene.set_tag(entity, "Projectile");
    if let Ok(mut transform) = scene.world.get::<&mut Transform>(entity) {
        transform.set_local_position(origin);
        transform.set_local_rotation(direction.y.atan2(direction.x));
    }
    let mut body = RigidBody::new(2.0);
    body.velocity = direction * PROJECTILE_SPEED;
    let _ = scene.world.insert_one(entity, body);
    let mut boxes: SmallVec<[ColliderBox; 2]> = SmallVec::new();
    boxes.push(ColliderBox::new(Vec2::splat(8.0), Vec2::ZERO));
    let _ = scene.world.insert_one(entity, RectCollider::from_boxes(boxes));
    let _ = scene.world.insert_one(entity, AiState::projectile());
    entity
}
