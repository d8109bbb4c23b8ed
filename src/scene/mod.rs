//! Scene persistence
//!
//! Textual tables of entities and components, prefab instancing, and the
//! persisted engine state.

mod format;
pub mod loader;

pub use format::{
    AnimatorRecord, AudioRecord, BoxRecord, ColliderRecord, EntityRecord, NameRecord,
    ParticleRecord, RigidBodyRecord, SceneTable, SliderRecord, SplittingRecord, SpriteRecord,
    SpriteUiRecord, StateTable, TextRecord, TransformRecord, VideoRecord, VolumeType,
};
pub use loader::{
    create_from_table, load_scene, load_table, parse_table, save_table, write_scene, SceneError,
};
