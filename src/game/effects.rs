//! Timed visual effects
//!
//! Explosions play out and despawn, damage numbers float upward and fade,
//! and follower effects track another entity's world position.

use glam::Vec2;
use hecs::Entity;

use crate::ecs::{Scene, Text, Transform};
use crate::renderer::Sprite;

/// One-shot effect that despawns when its animation time elapses
#[derive(Debug, Clone)]
pub struct Explosion {
    pub duration: f32,
    pub active: bool,
    elapsed: f32,
}

impl Explosion {
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            active: true,
            elapsed: 0.0,
        }
    }
}

/// Rises and fades over its lifetime (damage numbers, pickups)
#[derive(Debug, Clone)]
pub struct FloatUp {
    /// Upward speed in world units per second
    pub speed: f32,
    pub duration: f32,
    pub active: bool,
    elapsed: f32,
}

impl FloatUp {
    #[must_use]
    pub fn new(speed: f32, duration: f32) -> Self {
        Self {
            speed,
            duration,
            active: true,
            elapsed: 0.0,
        }
    }
}

/// Pins this entity to another entity's world position plus an offset
#[derive(Debug, Clone, Copy)]
pub struct VfxFollow {
    pub target: Entity,
    pub offset: Vec2,
    pub active: bool,
}

impl VfxFollow {
    #[must_use]
    pub fn new(target: Entity, offset: Vec2) -> Self {
        Self {
            target,
            offset,
            active: true,
        }
    }
}

/// Advance every effect by one tick
pub fn update(scene: &mut Scene, dt: f32) {
    let entities: Vec<Entity> = scene.all().collect();

    for entity in entities {
        let mut expired = false;
        if let Ok(mut explosion) = scene.world.get::<&mut Explosion>(entity) {
            if explosion.active {
                explosion.elapsed += dt;
                expired = explosion.elapsed >= explosion.duration;
            }
        }

        if let Ok(mut float) = scene.world.get::<&mut FloatUp>(entity) {
            if float.active {
                float.elapsed += dt;
                let fade = 1.0 - (float.elapsed / float.duration).min(1.0);
                let rise = float.speed * dt;
                expired |= float.elapsed >= float.duration;
                drop(float);

                if let Ok(mut transform) = scene.world.get::<&mut Transform>(entity) {
                    let pos = transform.local_position() + Vec2::new(0.0, rise);
                    transform.set_local_position(pos);
                }
                if let Ok(mut text) = scene.world.get::<&mut Text>(entity) {
                    text.alpha = fade;
                }
                if let Ok(mut sprite) = scene.world.get::<&mut Sprite>(entity) {
                    sprite.color[3] = fade;
                }
            }
        }

        let follow = scene.world.get::<&VfxFollow>(entity).map(|f| *f).ok();
        if let Some(follow) = follow
            && follow.active
        {
            let target_pos = scene
                .world
                .get::<&Transform>(follow.target)
                .map(|t| t.world_position())
                .ok();
            match target_pos {
                Some(pos) => {
                    if let Ok(mut transform) = scene.world.get::<&mut Transform>(entity) {
                        transform.set_local_position(pos + follow.offset);
                    }
                }
                // The followed entity is gone; the effect goes with it
                None => expired = true,
            }
        }

        if expired {
            scene.destroy(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explosion_expires_after_duration() {
        let mut scene = Scene::new();
        let e = scene.create("boom");
        scene.world.insert_one(e, Explosion::new(0.1)).unwrap();

        update(&mut scene, 0.05);
        scene.drain_despawned();
        assert!(scene.world.contains(e));

        update(&mut scene, 0.06);
        scene.drain_despawned();
        assert!(!scene.world.contains(e));
    }

    #[test]
    fn test_float_up_rises_and_fades() {
        let mut scene = Scene::new();
        let e = scene.create("damage_number");
        scene.world.insert_one(e, FloatUp::new(100.0, 1.0)).unwrap();
        scene
            .world
            .insert_one(e, Text::new("12", "default", 16.0))
            .unwrap();

        update(&mut scene, 0.5);
        let y = scene
            .world
            .get::<&Transform>(e)
            .unwrap()
            .local_position()
            .y;
        assert!((y - 50.0).abs() < 1e-3);
        let alpha = scene.world.get::<&Text>(e).unwrap().alpha;
        assert!((alpha - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_follow_tracks_target_and_dies_with_it() {
        let mut scene = Scene::new();
        let target = scene.create("target");
        scene
            .world
            .get::<&mut Transform>(target)
            .unwrap()
            .set_local_position(Vec2::new(30.0, 0.0));
        crate::ecs::hierarchy::propagate(&mut scene);

        let fx = scene.create("aura");
        scene
            .world
            .insert_one(fx, VfxFollow::new(target, Vec2::new(0.0, 10.0)))
            .unwrap();

        update(&mut scene, 1.0 / 60.0);
        assert_eq!(
            scene.world.get::<&Transform>(fx).unwrap().local_position(),
            Vec2::new(30.0, 10.0)
        );

        scene.destroy(target);
        scene.drain_despawned();
        update(&mut scene, 1.0 / 60.0);
        scene.drain_despawned();
        assert!(!scene.world.contains(fx));
    }
}
