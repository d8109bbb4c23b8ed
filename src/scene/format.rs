//! Scene table records
//!
//! The textual scene/prefab format: one record per entity, keyed sub-tables
//! per component. Field names here are the canonical names the readers and
//! writers use; they are part of the on-disk contract, not Rust style.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Entity head: display name and gameplay tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NameRecord {
    pub name: String,
    pub tag: String,
}

/// Local pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    #[serde(rename = "positionX")]
    pub position_x: f32,
    #[serde(rename = "positionY")]
    pub position_y: f32,
    #[serde(rename = "scaleX")]
    pub scale_x: f32,
    #[serde(rename = "scaleY")]
    pub scale_y: f32,
    pub rotation: f32,
}

impl Default for TransformRecord {
    fn default() -> Self {
        Self {
            position_x: 0.0,
            position_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

/// One collider box in the flattened table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxRecord {
    pub size_x: f32,
    pub size_y: f32,
    pub center_x: f32,
    pub center_y: f32,
}

/// Collider table.
///
/// Serialized with indexed keys: `ColliderCount`, `isTrigger`, then
/// `CollisionSizeX_i` / `CollisionSizeY_i` / `CollisionCenterX_i` /
/// `CollisionCenterY_i` for i in [0, ColliderCount).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColliderRecord {
    pub is_trigger: bool,
    pub boxes: Vec<BoxRecord>,
}

impl Serialize for ColliderRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.boxes.len() * 4))?;
        map.serialize_entry("ColliderCount", &(self.boxes.len() as u32))?;
        map.serialize_entry("isTrigger", &self.is_trigger)?;
        for (i, b) in self.boxes.iter().enumerate() {
            map.serialize_entry(&format!("CollisionSizeX_{i}"), &b.size_x)?;
            map.serialize_entry(&format!("CollisionSizeY_{i}"), &b.size_y)?;
            map.serialize_entry(&format!("CollisionCenterX_{i}"), &b.center_x)?;
            map.serialize_entry(&format!("CollisionCenterY_{i}"), &b.center_y)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ColliderRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            Bool(bool),
            Number(f32),
        }

        struct ColliderVisitor;

        impl<'de> Visitor<'de> for ColliderVisitor {
            type Value = ColliderRecord;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a collider table with indexed box keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut count = 0usize;
                let mut is_trigger = false;
                let mut values: Vec<(String, f32)> = Vec::new();

                while let Some((key, value)) = access.next_entry::<String, Scalar>()? {
                    match (key.as_str(), value) {
                        ("ColliderCount", Scalar::Number(n)) => count = n as usize,
                        ("isTrigger", Scalar::Bool(b)) => is_trigger = b,
                        (_, Scalar::Number(n)) => values.push((key, n)),
                        (_, Scalar::Bool(_)) => {
                            return Err(serde::de::Error::custom(format!(
                                "unexpected boolean collider key: {key}"
                            )));
                        }
                    }
                }

                let field = |name: &str, i: usize| -> f32 {
                    let wanted = format!("{name}_{i}");
                    values
                        .iter()
                        .find(|(key, _)| *key == wanted)
                        .map(|(_, v)| *v)
                        .unwrap_or(0.0)
                };

                let boxes = (0..count)
                    .map(|i| BoxRecord {
                        size_x: field("CollisionSizeX", i),
                        size_y: field("CollisionSizeY", i),
                        center_x: field("CollisionCenterX", i),
                        center_y: field("CollisionCenterY", i),
                    })
                    .collect();

                Ok(ColliderRecord { is_trigger, boxes })
            }
        }

        deserializer.deserialize_map(ColliderVisitor)
    }
}

/// Rigid body state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyRecord {
    pub mass: f32,
    #[serde(rename = "velocityX")]
    pub velocity_x: f32,
    #[serde(rename = "velocityY")]
    pub velocity_y: f32,
    pub drag: f32,
    #[serde(rename = "accelerationX")]
    pub acceleration_x: f32,
    #[serde(rename = "accelerationY")]
    pub acceleration_y: f32,
}

/// World-space sprite and its animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteRecord {
    #[serde(rename = "SpritePathName_0")]
    pub path_name: String,
    /// Frames per second
    #[serde(rename = "SpriteAnimationFrame_0")]
    pub fps: f32,
    #[serde(rename = "SpriteAnimationTotalFrame_0")]
    pub total_frames: u32,
    #[serde(rename = "SpriteAnimationFrameX_0")]
    pub frames_x: u32,
    #[serde(rename = "SpriteAnimationFrameY_0")]
    pub frames_y: u32,
    #[serde(rename = "Spritelayer")]
    pub layer: i32,
    #[serde(rename = "SpriteFlipX")]
    pub flip_x: bool,
    #[serde(rename = "SpriteFlipY")]
    pub flip_y: bool,
}

/// Camera-space sprite: the sprite shape plus the renderable flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteUiRecord {
    #[serde(rename = "SpritePathName_0")]
    pub path_name: String,
    #[serde(rename = "SpriteAnimationFrame_0")]
    pub fps: f32,
    #[serde(rename = "SpriteAnimationTotalFrame_0")]
    pub total_frames: u32,
    #[serde(rename = "SpriteAnimationFrameX_0")]
    pub frames_x: u32,
    #[serde(rename = "SpriteAnimationFrameY_0")]
    pub frames_y: u32,
    #[serde(rename = "Spritelayer")]
    pub layer: i32,
    #[serde(rename = "SpriteFlipX")]
    pub flip_x: bool,
    #[serde(rename = "SpriteFlipY")]
    pub flip_y: bool,
    #[serde(rename = "Renderable")]
    pub renderable: bool,
}

/// Text block, world- or camera-space depending on the sub-table key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    #[serde(rename = "textContent")]
    pub content: String,
    pub font: String,
    #[serde(rename = "positionX")]
    pub position_x: f32,
    #[serde(rename = "positionY")]
    pub position_y: f32,
    pub alpha: f32,
    #[serde(rename = "RGB_R")]
    pub r: f32,
    #[serde(rename = "RGB_G")]
    pub g: f32,
    #[serde(rename = "RGB_B")]
    pub b: f32,
    #[serde(rename = "fontSize")]
    pub font_size: f32,
}

/// Animator controller reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimatorRecord {
    #[serde(rename = "ControllerPathName")]
    pub controller_path: String,
}

/// Particle system parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    #[serde(rename = "SpritePathName_0")]
    pub path_name: String,
    #[serde(rename = "particleSizeX")]
    pub size_x: f32,
    #[serde(rename = "particleSizeY")]
    pub size_y: f32,
    #[serde(rename = "particleLifetime")]
    pub lifetime: f32,
    pub spread: f32,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub duration: f32,
    pub speed: f32,
}

/// Mixer bus a slider drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolumeType {
    Master,
    Bgm,
    Sfx,
}

/// Volume slider widget state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRecord {
    #[serde(rename = "maxPosXOffset")]
    pub max_pos_x_offset: f32,
    #[serde(rename = "currentValue")]
    pub current_value: f32,
    #[serde(rename = "volumeType")]
    pub volume_type: VolumeType,
}

/// On-death splitting behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplittingRecord {
    #[serde(rename = "numSplits")]
    pub num_splits: u32,
    #[serde(rename = "healthMultiplier")]
    pub health_multiplier: f32,
    #[serde(rename = "speedMultiplier")]
    pub speed_multiplier: f32,
    #[serde(rename = "sizeMultiplier")]
    pub size_multiplier: f32,
    #[serde(rename = "hasSplit")]
    pub has_split: bool,
    #[serde(rename = "splitPrefabPath")]
    pub split_prefab_path: String,
    #[serde(rename = "splitPrefabName")]
    pub split_prefab_name: String,
}

/// Timed scene-index slideshow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(rename = "elapsedTime")]
    pub elapsed_time: f32,
    #[serde(rename = "currentScene")]
    pub current_scene: u32,
    #[serde(rename = "switchInterval")]
    pub switch_interval: f32,
    #[serde(rename = "totalScenes")]
    pub total_scenes: u32,
}

/// Audio emitter reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioRecord {
    #[serde(rename = "audioPathName")]
    pub path_name: String,
    pub volume: f32,
    #[serde(rename = "isLooping")]
    pub looping: bool,
}

/// One entity and its component sub-tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EntityRecord {
    #[serde(rename = "Name")]
    pub name: NameRecord,
    /// Layer the entity lives on; default layer when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// Parent marker: index of the parent record within the same table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    /// Marks a canvas root whose descendants draw in camera space
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub canvas: bool,
    #[serde(rename = "Transform", default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformRecord>,
    #[serde(rename = "Collider", default, skip_serializing_if = "Option::is_none")]
    pub collider: Option<ColliderRecord>,
    #[serde(rename = "RigidBody", default, skip_serializing_if = "Option::is_none")]
    pub rigid_body: Option<RigidBodyRecord>,
    #[serde(rename = "Sprite", default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<SpriteRecord>,
    #[serde(rename = "SpriteUI", default, skip_serializing_if = "Option::is_none")]
    pub sprite_ui: Option<SpriteUiRecord>,
    #[serde(rename = "Text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextRecord>,
    #[serde(rename = "TextUI", default, skip_serializing_if = "Option::is_none")]
    pub text_ui: Option<TextRecord>,
    #[serde(rename = "Animator", default, skip_serializing_if = "Option::is_none")]
    pub animator: Option<AnimatorRecord>,
    #[serde(rename = "ParticleSystem", default, skip_serializing_if = "Option::is_none")]
    pub particle_system: Option<ParticleRecord>,
    #[serde(rename = "SliderComponent", default, skip_serializing_if = "Option::is_none")]
    pub slider: Option<SliderRecord>,
    #[serde(rename = "Splitting", default, skip_serializing_if = "Option::is_none")]
    pub splitting: Option<SplittingRecord>,
    #[serde(rename = "Video", default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoRecord>,
    #[serde(rename = "Audio", default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioRecord>,
}

/// A whole scene or prefab file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneTable {
    pub entities: Vec<EntityRecord>,
}

impl SceneTable {
    /// Index of a record by entity name
    #[must_use]
    pub fn find_record(&self, name: &str) -> Option<usize> {
        self.entities.iter().position(|r| r.name.name == name)
    }
}

/// Persisted engine state: the last-loaded scene path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StateTable {
    #[serde(rename = "lastScenePath")]
    pub last_scene_path: String,
}
