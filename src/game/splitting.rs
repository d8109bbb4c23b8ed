//! On-death splitting
//!
//! A splitting entity that dies spawns scaled-down copies of a prefab at its
//! world pose. Splits are spawned unparented regardless of the original's
//! place in the hierarchy, and the flag guards against a second split from
//! the copies' shared record.

use glam::Vec2;
use hecs::Entity;

use crate::assets::AssetRegistry;
use crate::ecs::{Health, RigidBody, Scene, Transform};
use crate::scene::loader;

use super::ai::AiState;

/// Split behavior, mirrored from the scene table
#[derive(Debug, Clone)]
pub struct Splitting {
    pub num_splits: u32,
    pub health_multiplier: f32,
    pub speed_multiplier: f32,
    pub size_multiplier: f32,
    pub has_split: bool,
    pub split_prefab_path: String,
    pub split_prefab_name: String,
}

impl Splitting {
    #[must_use]
    pub fn new(num_splits: u32, prefab_path: impl Into<String>, prefab_name: impl Into<String>) -> Self {
        Self {
            num_splits,
            health_multiplier: 0.5,
            speed_multiplier: 1.25,
            size_multiplier: 0.6,
            has_split: false,
            split_prefab_path: prefab_path.into(),
            split_prefab_name: prefab_name.into(),
        }
    }
}

/// Spawn splits for dying splitter entities.
///
/// Runs before the death pass so the copies exist in the same tick the
/// original is queued for despawn.
pub fn update(scene: &mut Scene, assets: &AssetRegistry) {
    let splitters: Vec<Entity> = scene
        .all()
        .filter(|e| {
            let dying = scene
                .world
                .get::<&Health>(*e)
                .map(|h| h.is_dead())
                .unwrap_or(false);
            let unsplit = scene
                .world
                .get::<&Splitting>(*e)
                .map(|s| !s.has_split)
                .unwrap_or(false);
            dying && unsplit
        })
        .collect();

    for entity in splitters {
        let (config, origin) = {
            let Ok(mut splitting) = scene.world.get::<&mut Splitting>(entity) else {
                continue;
            };
            splitting.has_split = true;
            let origin = scene
                .world
                .get::<&Transform>(entity)
                .map(|t| t.world_position())
                .unwrap_or(Vec2::ZERO);
            (splitting.clone(), origin)
        };

        for i in 0..config.num_splits {
            let Ok(spawn) = loader::create_from_table(
                scene,
                assets,
                &config.split_prefab_path,
                &config.split_prefab_name,
            ) else {
                log::warn!(
                    "split prefab {}:{} missing, skipping",
                    config.split_prefab_path,
                    config.split_prefab_name
                );
                break;
            };

            // Ring placement around the original, deterministic by index
            let angle = i as f32 / config.num_splits.max(1) as f32 * std::f32::consts::TAU;
            let offset = Vec2::new(angle.cos(), angle.sin()) * 40.0 * config.size_multiplier;
            if let Ok(mut transform) = scene.world.get::<&mut Transform>(spawn) {
                transform.set_local_position(origin + offset);
                let scale = transform.local_scale() * config.size_multiplier;
                transform.set_local_scale(scale);
            }
            if let Ok(mut health) = scene.world.get::<&mut Health>(spawn) {
                health.max *= config.health_multiplier;
                health.current = health.max;
            }
            if let Ok(mut ai) = scene.world.get::<&mut AiState>(spawn) {
                ai.move_force *= config.speed_multiplier;
            }
            if let Ok(mut body) = scene.world.get::<&mut RigidBody>(spawn) {
                body.mass *= config.size_multiplier;
            }
            // Copies of a splitter must not split again
            if let Ok(mut splitting) = scene.world.get::<&mut Splitting>(spawn) {
                splitting.has_split = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{EntityRecord, NameRecord, SceneTable, TransformRecord};

    fn slime_prefab() -> SceneTable {
        SceneTable {
            entities: vec![EntityRecord {
                name: NameRecord {
                    name: "Slime".to_string(),
                    tag: "Enemy".to_string(),
                },
                transform: Some(TransformRecord::default()),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_death_spawns_scaled_splits() {
        let mut scene = Scene::new();
        let mut assets = AssetRegistry::new();
        assets.insert_prefab("prefabs/slime.prefab", slime_prefab());

        let big = scene.create("BigSlime");
        scene.set_tag(big, "Enemy");
        scene
            .world
            .get::<&mut Transform>(big)
            .unwrap()
            .set_local_position(Vec2::new(100.0, 50.0));
        scene.world.insert_one(big, Health::new(20.0)).unwrap();
        scene
            .world
            .insert_one(big, Splitting::new(2, "prefabs/slime.prefab", "Slime"))
            .unwrap();
        crate::ecs::hierarchy::propagate(&mut scene);

        scene.world.get::<&mut Health>(big).unwrap().damage(20.0);
        update(&mut scene, &assets);

        // Two copies spawned near the original's world pose
        let enemies = scene.find_by_tag("Enemy");
        assert_eq!(enemies.len(), 3);
        assert!(scene.world.get::<&Splitting>(big).unwrap().has_split);

        // Running again does not split twice
        update(&mut scene, &assets);
        assert_eq!(scene.find_by_tag("Enemy").len(), 3);
    }

    #[test]
    fn test_missing_prefab_is_recoverable() {
        let mut scene = Scene::new();
        let assets = AssetRegistry::new();

        let e = scene.create("Splitter");
        scene.world.insert_one(e, Health::new(1.0)).unwrap();
        scene
            .world
            .insert_one(e, Splitting::new(3, "prefabs/missing.prefab", "Nothing"))
            .unwrap();
        scene.world.get::<&mut Health>(e).unwrap().damage(1.0);

        update(&mut scene, &assets);
        // No spawns, no panic, flag still consumed
        assert_eq!(scene.len(), 1);
        assert!(scene.world.get::<&Splitting>(e).unwrap().has_split);
    }
}
