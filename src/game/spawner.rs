//! Interval prefab spawner

use hecs::Entity;

use crate::assets::AssetRegistry;
use crate::ecs::{Scene, Transform};
use crate::scene::loader;

/// Spawns a prefab on an interval, capped by the number still alive
#[derive(Debug, Clone)]
pub struct Spawner {
    pub prefab_path: String,
    pub prefab_name: String,
    /// Seconds between spawns
    pub interval: f32,
    /// Most spawned entities alive at once
    pub max_alive: usize,
    pub active: bool,
    timer: f32,
    spawned: Vec<Entity>,
}

impl Spawner {
    #[must_use]
    pub fn new(prefab_path: impl Into<String>, prefab_name: impl Into<String>, interval: f32) -> Self {
        Self {
            prefab_path: prefab_path.into(),
            prefab_name: prefab_name.into(),
            interval,
            max_alive: 8,
            active: true,
            timer: 0.0,
            spawned: Vec::new(),
        }
    }

    /// Spawned entities still alive
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.spawned.len()
    }
}

/// Advance every spawner by one tick
pub fn update(scene: &mut Scene, assets: &AssetRegistry, dt: f32) {
    let spawners: Vec<Entity> = scene
        .all()
        .filter(|e| scene.world.get::<&Spawner>(*e).is_ok())
        .collect();

    for entity in spawners {
        let (due, origin, path, name) = {
            let Ok(mut spawner) = scene.world.get::<&mut Spawner>(entity) else {
                continue;
            };
            if !spawner.active {
                continue;
            }
            // Forget despawned children before checking the cap
            let world = &scene.world;
            spawner.spawned.retain(|e| world.contains(*e));

            spawner.timer += dt;
            let due = spawner.timer >= spawner.interval && spawner.spawned.len() < spawner.max_alive;
            if due {
                spawner.timer = 0.0;
            }
            let origin = scene
                .world
                .get::<&Transform>(entity)
                .map(|t| t.world_position())
                .unwrap_or_default();
            (due, origin, spawner.prefab_path.clone(), spawner.prefab_name.clone())
        };

        if !due {
            continue;
        }

        match loader::create_from_table(scene, assets, &path, &name) {
            Ok(spawn) => {
                if let Ok(mut transform) = scene.world.get::<&mut Transform>(spawn) {
                    transform.set_local_position(origin);
                }
                if let Ok(mut spawner) = scene.world.get::<&mut Spawner>(entity) {
                    spawner.spawned.push(spawn);
                }
            }
            Err(e) => log::warn!("spawner could not instantiate {path}:{name}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{EntityRecord, NameRecord, SceneTable, TransformRecord};

    fn bat_prefab() -> SceneTable {
        SceneTable {
            entities: vec![EntityRecord {
                name: NameRecord {
                    name: "Bat".to_string(),
                    tag: "Enemy".to_string(),
                },
                transform: Some(TransformRecord::default()),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_spawns_on_interval_up_to_cap() {
        let mut scene = Scene::new();
        let mut assets = AssetRegistry::new();
        assets.insert_prefab("prefabs/bat.prefab", bat_prefab());

        let nest = scene.create("nest");
        let mut spawner = Spawner::new("prefabs/bat.prefab", "Bat", 1.0);
        spawner.max_alive = 2;
        scene.world.insert_one(nest, spawner).unwrap();

        // Before the interval elapses nothing spawns
        update(&mut scene, &assets, 0.5);
        assert_eq!(scene.find_by_tag("Enemy").len(), 0);

        update(&mut scene, &assets, 0.6);
        assert_eq!(scene.find_by_tag("Enemy").len(), 1);

        update(&mut scene, &assets, 1.1);
        assert_eq!(scene.find_by_tag("Enemy").len(), 2);

        // Cap reached
        update(&mut scene, &assets, 1.1);
        assert_eq!(scene.find_by_tag("Enemy").len(), 2);

        // Killing one frees a slot
        let victim = scene.find_by_tag("Enemy")[0];
        scene.destroy(victim);
        scene.drain_despawned();
        update(&mut scene, &assets, 1.1);
        assert_eq!(scene.find_by_tag("Enemy").len(), 2);
    }
}
