//! Scene and prefab instantiation
//!
//! Tables parse fully before any entity is touched, so a malformed file
//! leaves the current scene exactly as it was. Prefab subtrees are built in
//! one transaction: components and parent links first, a single propagation
//! pass at the end.

use std::fs;
use std::path::Path;

use glam::Vec2;
use hecs::Entity;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::format::{
    AnimatorRecord, AudioRecord, BoxRecord, ColliderRecord, EntityRecord, NameRecord,
    ParticleRecord, RigidBodyRecord, SceneTable, SliderRecord, SplittingRecord, SpriteRecord,
    SpriteUiRecord, StateTable, TextRecord, TransformRecord, VideoRecord, VolumeType,
};
use crate::animation::{Animator, SpriteAnimation};
use crate::assets::AssetRegistry;
use crate::audio::VolumeKind;
use crate::ecs::{
    hierarchy, AudioEmitter, ColliderBox, Health, RectCollider, RigidBody, Scene, Text, TextUi,
    Transform, UiRoot, DEFAULT_LAYER,
};
use crate::game::{AiState, Particles, Player, Slider, Splitting, Video};
use crate::math::Pose2;
use crate::renderer::{Sprite, SpriteUi};

/// Errors from scene loading and saving
#[derive(Debug, Clone)]
pub enum SceneError {
    /// IO error reading or writing a table file
    Io(String),
    /// Malformed table; the scene in memory is untouched
    Format(String),
    /// A prefab table was not found in the registry or on disk
    MissingPrefab(String),
    /// A prefab table has no record with the requested name
    MissingRecord(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Format(e) => write!(f, "Scene format error: {e}"),
            Self::MissingPrefab(name) => write!(f, "prefab table not found: {name}"),
            Self::MissingRecord(name) => write!(f, "prefab record not found: {name}"),
        }
    }
}

impl std::error::Error for SceneError {}

/// Parse a scene table from text
///
/// # Errors
///
/// Returns a format error without touching any scene state
pub fn parse_table(text: &str) -> Result<SceneTable, SceneError> {
    ron::from_str(text).map_err(|e| SceneError::Format(e.to_string()))
}

/// Load a scene table from a file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn load_table(path: impl AsRef<Path>) -> Result<SceneTable, SceneError> {
    let text = fs::read_to_string(&path).map_err(|e| SceneError::Io(e.to_string()))?;
    parse_table(&text)
}

/// Write a scene table to a file
///
/// # Errors
///
/// Returns an error if serialization or the write fails
pub fn save_table(table: &SceneTable, path: impl AsRef<Path>) -> Result<(), SceneError> {
    let text = ron::ser::to_string_pretty(table, ron::ser::PrettyConfig::default())
        .map_err(|e| SceneError::Format(e.to_string()))?;
    fs::write(path, text).map_err(|e| SceneError::Io(e.to_string()))
}

/// Replace the scene contents with the table's entities.
///
/// The previous entities are dropped only after the table has parsed, so
/// load failures never leave a half-built scene.
pub fn load_scene(scene: &mut Scene, assets: &AssetRegistry, table: &SceneTable) -> Vec<Entity> {
    scene.clear();
    instantiate_records(scene, assets, &table.entities)
}

/// Instantiate a list of records as one transaction.
///
/// Entities spawn with deserialized local poses, parent markers link with
/// local poses kept, and world derivation runs once at the end over the
/// finished subtree.
pub fn instantiate_records(
    scene: &mut Scene,
    assets: &AssetRegistry,
    records: &[EntityRecord],
) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(records.len());

    for record in records {
        let entity = scene.create(record.name.name.clone());
        scene.set_tag(entity, record.name.tag.clone());
        if let Some(layer) = &record.layer {
            scene.set_layer(entity, layer.clone());
        }
        apply_record(scene, assets, entity, record);
        spawned.push(entity);
    }

    for (record, &entity) in records.iter().zip(&spawned) {
        if let Some(parent_index) = record.parent
            && let Some(&parent) = spawned.get(parent_index)
            && hierarchy::set_parent_keep_local(scene, entity, parent).is_err()
        {
            log::warn!(
                "record {} has an invalid parent marker {parent_index}",
                record.name.name
            );
        }
    }

    hierarchy::propagate(scene);
    attach_gameplay_by_tag(scene, &spawned);
    spawned
}

/// Instantiate a named prefab record and its child records.
///
/// # Errors
///
/// Returns a recoverable error when the table or the named record is
/// missing; the scene is unchanged in that case.
pub fn create_from_table(
    scene: &mut Scene,
    assets: &AssetRegistry,
    path: &str,
    name: &str,
) -> Result<Entity, SceneError> {
    let table = match assets.prefab(path) {
        Some(handle) => handle,
        None => {
            // Not registered; fall back to a one-shot disk read
            let table = load_table(path).map_err(|_| SceneError::MissingPrefab(path.to_string()))?;
            crate::assets::AssetHandle::new(table)
        }
    };

    let root_index = table
        .find_record(name)
        .ok_or_else(|| SceneError::MissingRecord(name.to_string()))?;

    // The named record is the root; records whose parent chain reaches it
    // belong to the subtree
    let mut member_of_subtree = vec![false; table.entities.len()];
    member_of_subtree[root_index] = true;
    let mut grew = true;
    while grew {
        grew = false;
        for (i, record) in table.entities.iter().enumerate() {
            if member_of_subtree[i] {
                continue;
            }
            if let Some(parent) = record.parent
                && member_of_subtree.get(parent).copied().unwrap_or(false)
            {
                member_of_subtree[i] = true;
                grew = true;
            }
        }
    }

    let mut subtree: Vec<EntityRecord> = Vec::new();
    let mut remap: FxHashMap<usize, usize> = FxHashMap::default();
    for (i, record) in table.entities.iter().enumerate() {
        if member_of_subtree[i] {
            remap.insert(i, subtree.len());
            subtree.push(record.clone());
        }
    }
    for record in &mut subtree {
        record.parent = record.parent.and_then(|p| remap.get(&p).copied());
    }

    let spawned = instantiate_records(scene, assets, &subtree);
    Ok(spawned[remap[&root_index]])
}

/// Gameplay behaviors attach by tag after deserialization
fn attach_gameplay_by_tag(scene: &mut Scene, entities: &[Entity]) {
    for &entity in entities {
        let Some(tag) = scene.tag_of(entity) else {
            continue;
        };
        match tag.as_str() {
            "Player" => {
                if scene.world.get::<&Player>(entity).is_err() {
                    let _ = scene.world.insert_one(entity, Player::default());
                }
                if scene.world.get::<&Health>(entity).is_err() {
                    let _ = scene.world.insert_one(entity, Health::new(100.0));
                }
            }
            "Enemy" => {
                if scene.world.get::<&AiState>(entity).is_err() {
                    let _ = scene.world.insert_one(entity, AiState::default());
                }
                if scene.world.get::<&Health>(entity).is_err() {
                    let _ = scene.world.insert_one(entity, Health::new(20.0));
                }
            }
            _ => {}
        }
    }
}

fn volume_kind(volume_type: VolumeType) -> VolumeKind {
    match volume_type {
        VolumeType::Master => VolumeKind::Master,
        VolumeType::Bgm => VolumeKind::Bgm,
        VolumeType::Sfx => VolumeKind::Sfx,
    }
}

fn volume_type(kind: VolumeKind) -> VolumeType {
    match kind {
        VolumeKind::Master => VolumeType::Master,
        VolumeKind::Bgm => VolumeType::Bgm,
        VolumeKind::Sfx => VolumeType::Sfx,
    }
}

fn sprite_animation(assets: &AssetRegistry, record: &SpriteRecord) -> SpriteAnimation {
    let mut animation = SpriteAnimation::new(
        record.path_name.clone(),
        record.frames_x,
        record.frames_y,
        record.total_frames,
        record.fps,
    );
    animation.texture = assets.texture(&record.path_name);
    animation
}

fn text_component(record: &TextRecord) -> Text {
    let mut text = Text::new(record.content.clone(), record.font.clone(), record.font_size);
    text.offset = Vec2::new(record.position_x, record.position_y);
    text.color = [record.r, record.g, record.b];
    text.alpha = record.alpha;
    text
}

fn apply_record(scene: &mut Scene, assets: &AssetRegistry, entity: Entity, record: &EntityRecord) {
    if let Some(t) = &record.transform
        && let Ok(mut transform) = scene.world.get::<&mut Transform>(entity)
    {
        transform.set_local(Pose2 {
            position: Vec2::new(t.position_x, t.position_y),
            scale: Vec2::new(t.scale_x, t.scale_y),
            rotation: t.rotation,
        });
    }

    if let Some(c) = &record.collider {
        let boxes: SmallVec<[ColliderBox; 2]> = c
            .boxes
            .iter()
            .map(|b| {
                ColliderBox::new(Vec2::new(b.size_x, b.size_y), Vec2::new(b.center_x, b.center_y))
            })
            .collect();
        let mut collider = RectCollider::from_boxes(boxes);
        collider.is_trigger = c.is_trigger;
        let _ = scene.world.insert_one(entity, collider);
    }

    if let Some(rb) = &record.rigid_body {
        let mut body = RigidBody::new(rb.mass);
        body.velocity = Vec2::new(rb.velocity_x, rb.velocity_y);
        body.acceleration = Vec2::new(rb.acceleration_x, rb.acceleration_y);
        body.drag = rb.drag;
        let _ = scene.world.insert_one(entity, body);
    }

    if let Some(s) = &record.sprite {
        let mut sprite = Sprite::new(sprite_animation(assets, s));
        sprite.layer = s.layer;
        sprite.flip_x = s.flip_x;
        sprite.flip_y = s.flip_y;
        let _ = scene.world.insert_one(entity, sprite);
    }

    if let Some(s) = &record.sprite_ui {
        let base = SpriteRecord {
            path_name: s.path_name.clone(),
            fps: s.fps,
            total_frames: s.total_frames,
            frames_x: s.frames_x,
            frames_y: s.frames_y,
            layer: s.layer,
            flip_x: s.flip_x,
            flip_y: s.flip_y,
        };
        let mut sprite = Sprite::new(sprite_animation(assets, &base));
        sprite.layer = s.layer;
        sprite.flip_x = s.flip_x;
        sprite.flip_y = s.flip_y;
        let mut ui = SpriteUi::new(sprite);
        ui.renderable = s.renderable;
        let _ = scene.world.insert_one(entity, ui);
    }

    if let Some(t) = &record.text {
        let _ = scene.world.insert_one(entity, text_component(t));
    }

    if let Some(t) = &record.text_ui {
        let _ = scene.world.insert_one(entity, TextUi::new(text_component(t)));
    }

    if let Some(a) = &record.animator {
        match assets.controller(&a.controller_path) {
            Some(desc) => {
                let _ = scene
                    .world
                    .insert_one(entity, Animator::new(a.controller_path.clone(), desc));
            }
            None => log::warn!(
                "animator controller not registered: {}",
                a.controller_path
            ),
        }
    }

    if let Some(p) = &record.particle_system {
        let mut particles = Particles::new(p.path_name.clone(), p.lifetime, p.speed);
        particles.texture = assets.texture(&p.path_name);
        particles.size = Vec2::new(p.size_x, p.size_y);
        particles.spread = p.spread;
        particles.looping = p.looping;
        particles.duration = p.duration;
        let _ = scene.world.insert_one(entity, particles);
    }

    if let Some(s) = &record.slider {
        let _ = scene.world.insert_one(
            entity,
            Slider::new(s.max_pos_x_offset, s.current_value, volume_kind(s.volume_type)),
        );
    }

    if let Some(s) = &record.splitting {
        let mut splitting = Splitting::new(
            s.num_splits,
            s.split_prefab_path.clone(),
            s.split_prefab_name.clone(),
        );
        splitting.health_multiplier = s.health_multiplier;
        splitting.speed_multiplier = s.speed_multiplier;
        splitting.size_multiplier = s.size_multiplier;
        splitting.has_split = s.has_split;
        let _ = scene.world.insert_one(entity, splitting);
    }

    if let Some(v) = &record.video {
        let mut video = Video::new(v.switch_interval, v.total_scenes);
        video.elapsed = v.elapsed_time;
        video.current_scene = v.current_scene;
        let _ = scene.world.insert_one(entity, video);
    }

    if let Some(a) = &record.audio {
        let mut emitter = AudioEmitter::new(a.path_name.clone());
        emitter.volume = a.volume;
        emitter.looping = a.looping;
        let _ = scene.world.insert_one(entity, emitter);
    }

    if record.canvas {
        let _ = scene.world.insert_one(entity, UiRoot);
    }
}

/// Serialize the live scene back into a table, preserving hierarchy via
/// parent markers
#[must_use]
pub fn write_scene(scene: &Scene) -> SceneTable {
    let order: Vec<Entity> = scene.all().collect();
    let index_of: FxHashMap<Entity, usize> =
        order.iter().enumerate().map(|(i, e)| (*e, i)).collect();

    let entities = order
        .iter()
        .map(|&entity| {
            let mut record = record_from_entity(scene, entity);
            record.parent = hierarchy::parent_of(scene, entity)
                .and_then(|p| index_of.get(&p).copied());
            record
        })
        .collect();

    SceneTable { entities }
}

/// Serialize one entity's components into a record (without parent marker)
#[must_use]
pub fn record_from_entity(scene: &Scene, entity: Entity) -> EntityRecord {
    let mut record = EntityRecord {
        name: NameRecord {
            name: scene
                .world
                .get::<&crate::ecs::Name>(entity)
                .map(|n| n.0.clone())
                .unwrap_or_default(),
            tag: scene.tag_of(entity).unwrap_or_default(),
        },
        ..Default::default()
    };

    record.layer = scene.layer_of(entity).filter(|l| l != DEFAULT_LAYER);
    record.canvas = scene.world.get::<&UiRoot>(entity).is_ok();

    if let Ok(transform) = scene.world.get::<&Transform>(entity) {
        let local = transform.local();
        record.transform = Some(TransformRecord {
            position_x: local.position.x,
            position_y: local.position.y,
            scale_x: local.scale.x,
            scale_y: local.scale.y,
            rotation: local.rotation,
        });
    }

    if let Ok(collider) = scene.world.get::<&RectCollider>(entity) {
        record.collider = Some(ColliderRecord {
            is_trigger: collider.is_trigger,
            boxes: collider
                .boxes
                .iter()
                .map(|b| BoxRecord {
                    size_x: b.half_extents.x,
                    size_y: b.half_extents.y,
                    center_x: b.offset.x,
                    center_y: b.offset.y,
                })
                .collect(),
        });
    }

    if let Ok(body) = scene.world.get::<&RigidBody>(entity) {
        record.rigid_body = Some(RigidBodyRecord {
            mass: body.mass,
            velocity_x: body.velocity.x,
            velocity_y: body.velocity.y,
            drag: body.drag,
            acceleration_x: body.acceleration.x,
            acceleration_y: body.acceleration.y,
        });
    }

    if let Ok(sprite) = scene.world.get::<&Sprite>(entity) {
        let a = &sprite.animation;
        record.sprite = Some(SpriteRecord {
            path_name: a.texture_name.clone(),
            fps: a.fps,
            total_frames: a.total_frames,
            frames_x: a.frames_x,
            frames_y: a.frames_y,
            layer: sprite.layer,
            flip_x: sprite.flip_x,
            flip_y: sprite.flip_y,
        });
    }

    if let Ok(ui) = scene.world.get::<&SpriteUi>(entity) {
        let a = &ui.sprite.animation;
        record.sprite_ui = Some(SpriteUiRecord {
            path_name: a.texture_name.clone(),
            fps: a.fps,
            total_frames: a.total_frames,
            frames_x: a.frames_x,
            frames_y: a.frames_y,
            layer: ui.sprite.layer,
            flip_x: ui.sprite.flip_x,
            flip_y: ui.sprite.flip_y,
            renderable: ui.renderable,
        });
    }

    let text_record = |text: &Text| TextRecord {
        content: text.content.clone(),
        font: text.font.clone(),
        position_x: text.offset.x,
        position_y: text.offset.y,
        alpha: text.alpha,
        r: text.color[0],
        g: text.color[1],
        b: text.color[2],
        font_size: text.size,
    };
    if let Ok(text) = scene.world.get::<&Text>(entity) {
        record.text = Some(text_record(&text));
    }
    if let Ok(ui) = scene.world.get::<&TextUi>(entity) {
        record.text_ui = Some(text_record(&ui.text));
    }

    if let Ok(animator) = scene.world.get::<&Animator>(entity) {
        record.animator = Some(AnimatorRecord {
            controller_path: animator.controller_path.clone(),
        });
    }

    if let Ok(particles) = scene.world.get::<&Particles>(entity) {
        record.particle_system = Some(ParticleRecord {
            path_name: particles.texture_name.clone(),
            size_x: particles.size.x,
            size_y: particles.size.y,
            lifetime: particles.lifetime,
            spread: particles.spread,
            looping: particles.looping,
            duration: particles.duration,
            speed: particles.speed,
        });
    }

    if let Ok(slider) = scene.world.get::<&Slider>(entity) {
        record.slider = Some(SliderRecord {
            max_pos_x_offset: slider.max_offset,
            current_value: slider.value,
            volume_type: volume_type(slider.volume),
        });
    }

    if let Ok(splitting) = scene.world.get::<&Splitting>(entity) {
        record.splitting = Some(SplittingRecord {
            num_splits: splitting.num_splits,
            health_multiplier: splitting.health_multiplier,
            speed_multiplier: splitting.speed_multiplier,
            size_multiplier: splitting.size_multiplier,
            has_split: splitting.has_split,
            split_prefab_path: splitting.split_prefab_path.clone(),
            split_prefab_name: splitting.split_prefab_name.clone(),
        });
    }

    if let Ok(video) = scene.world.get::<&Video>(entity) {
        record.video = Some(VideoRecord {
            elapsed_time: video.elapsed,
            current_scene: video.current_scene,
            switch_interval: video.switch_interval,
            total_scenes: video.total_scenes,
        });
    }

    if let Ok(audio) = scene.world.get::<&AudioEmitter>(entity) {
        record.audio = Some(AudioRecord {
            path_name: audio.clip.clone(),
            volume: audio.volume,
            looping: audio.looping,
        });
    }

    record
}

/// Persist the last-loaded scene path
///
/// # Errors
///
/// Returns an error if serialization or the write fails
pub fn write_state(last_scene_path: &str, path: impl AsRef<Path>) -> Result<(), SceneError> {
    let state = StateTable {
        last_scene_path: last_scene_path.to_string(),
    };
    let text = ron::to_string(&state).map_err(|e| SceneError::Format(e.to_string()))?;
    fs::write(path, text).map_err(|e| SceneError::Io(e.to_string()))
}

/// Read the persisted state table
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn read_state(path: impl AsRef<Path>) -> Result<StateTable, SceneError> {
    let text = fs::read_to_string(path).map_err(|e| SceneError::Io(e.to_string()))?;
    ron::from_str(&text).map_err(|e| SceneError::Format(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SpriteAnimation;

    fn family_scene() -> (Scene, Entity, Entity, Entity) {
        let mut scene = Scene::new();

        let parent = scene.create("Root");
        scene.set_tag(parent, "Prop");
        scene
            .world
            .get::<&mut Transform>(parent)
            .unwrap()
            .set_local_position(Vec2::new(10.0, 20.0));
        let mut sprite = Sprite::new(SpriteAnimation::new("prop_atlas", 2, 2, 4, 6.0));
        sprite.layer = 2;
        scene.world.insert_one(parent, sprite).unwrap();
        scene
            .world
            .insert_one(parent, RectCollider::single(Vec2::splat(25.0)))
            .unwrap();

        let child_a = scene.create("Label");
        let mut text = Text::new("hello", "default", 18.0);
        text.color = [1.0, 0.5, 0.25];
        scene.world.insert_one(child_a, text).unwrap();
        hierarchy::set_parent_keep_local(&mut scene, child_a, parent).unwrap();

        let child_b = scene.create("Chime");
        scene
            .world
            .insert_one(child_b, AudioEmitter::new("chime"))
            .unwrap();
        hierarchy::set_parent_keep_local(&mut scene, child_b, parent).unwrap();

        hierarchy::propagate(&mut scene);
        (scene, parent, child_a, child_b)
    }

    #[test]
    fn test_scene_round_trip_preserves_everything() {
        let (scene, ..) = family_scene();
        let table = write_scene(&scene);
        let text =
            ron::ser::to_string_pretty(&table, ron::ser::PrettyConfig::default()).unwrap();

        let parsed = parse_table(&text).unwrap();
        assert_eq!(parsed, table);

        let assets = AssetRegistry::new();
        let mut reloaded = Scene::new();
        let spawned = load_scene(&mut reloaded, &assets, &parsed);

        assert_eq!(reloaded.len(), 3);
        // Hierarchy restored
        let root = spawned[0];
        let label = spawned[1];
        assert_eq!(hierarchy::parent_of(&reloaded, label), Some(root));
        // Component fields survive
        let sprite = reloaded.world.get::<&Sprite>(root).unwrap();
        assert_eq!(sprite.animation.texture_name, "prop_atlas");
        assert_eq!(sprite.layer, 2);
        let text = reloaded.world.get::<&Text>(label).unwrap();
        assert_eq!(text.content, "hello");
        assert!((text.color[1] - 0.5).abs() < 1e-6);
        let audio = reloaded.world.get::<&AudioEmitter>(spawned[2]).unwrap();
        assert_eq!(audio.clip, "chime");
        // World pose derived for the whole subtree
        assert_eq!(
            reloaded
                .world
                .get::<&Transform>(label)
                .unwrap()
                .world_position(),
            Vec2::new(10.0, 20.0)
        );

        // A second write produces the identical table
        assert_eq!(write_scene(&reloaded), table);
    }

    #[test]
    fn test_malformed_table_leaves_scene_alone() {
        let (scene, ..) = family_scene();
        let before = scene.len();

        let result = parse_table("(entities: [oops");
        assert!(matches!(result, Err(SceneError::Format(_))));
        // Nothing parsed, nothing touched
        assert_eq!(scene.len(), before);
    }

    #[test]
    fn test_prefab_subtree_instantiates_under_root() {
        let mut table = SceneTable::default();
        table.entities.push(EntityRecord {
            name: NameRecord {
                name: "Turret".to_string(),
                tag: "Enemy".to_string(),
            },
            transform: Some(TransformRecord::default()),
            ..Default::default()
        });
        table.entities.push(EntityRecord {
            name: NameRecord {
                name: "Barrel".to_string(),
                tag: "Untagged".to_string(),
            },
            parent: Some(0),
            transform: Some(TransformRecord {
                position_x: 0.0,
                position_y: 16.0,
                ..Default::default()
            }),
            ..Default::default()
        });
        // Unrelated record in the same file stays out of the subtree
        table.entities.push(EntityRecord {
            name: NameRecord {
                name: "Decoration".to_string(),
                tag: "Untagged".to_string(),
            },
            ..Default::default()
        });

        let mut assets = AssetRegistry::new();
        assets.insert_prefab("prefabs/turret.prefab", table);

        let mut scene = Scene::new();
        let root =
            create_from_table(&mut scene, &assets, "prefabs/turret.prefab", "Turret").unwrap();

        assert_eq!(scene.len(), 2);
        let children: Vec<Entity> = scene
            .all()
            .filter(|e| hierarchy::parent_of(&scene, *e) == Some(root))
            .collect();
        assert_eq!(children.len(), 1);
        // Tag-driven gameplay attachment gave the enemy its behaviors
        assert!(scene.world.get::<&AiState>(root).is_ok());
        assert!(scene.world.get::<&Health>(root).is_ok());
    }

    #[test]
    fn test_missing_prefab_is_an_error() {
        let mut scene = Scene::new();
        let assets = AssetRegistry::new();
        let result = create_from_table(&mut scene, &assets, "prefabs/nope.prefab", "Nope");
        assert!(matches!(result, Err(SceneError::MissingPrefab(_))));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_state_table_round_trip() {
        let dir = std::env::temp_dir().join("vantage_state_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("state.table");

        write_state("scenes/level_2.scene", &path).unwrap();
        let state = read_state(&path).unwrap();
        assert_eq!(state.last_scene_path, "scenes/level_2.scene");
    }
}
