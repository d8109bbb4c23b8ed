//! A 2D game engine for top-down action games
//!
//! The engine provides:
//! - A fixed-timestep scheduler over an entity/component scene
//! - Grid-based AABB collision with triggers and knockback
//! - Batched 2D rendering (quads, glyphs, lines, points) with wgpu
//! - An orthographic follow camera with dead-zone, borders, and shake
//! - Scene and prefab persistence in a textual table format

pub mod animation;
pub mod assets;
pub mod audio;
pub mod core;
pub mod ecs;
pub mod game;
pub mod input;
pub mod math;
pub mod physics;
pub mod renderer;
pub mod scene;
pub mod ui;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use wgpu;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::animation::{Animator, ControllerDesc, SpriteAnimation};
    pub use crate::assets::{AssetHandle, AssetRegistry};
    pub use crate::audio::{AudioBus, VolumeKind};
    pub use crate::core::{
        Engine, EngineConfig, EngineContext, EventQueue, Game, GameEvent, GameState, FIXED_DT,
    };
    pub use crate::ecs::{
        hierarchy, AudioEmitter, ColliderBox, Gravity, Health, Name, RectCollider, RigidBody,
        Scene, Tag, Text, TextUi, Transform, UiRoot,
    };
    pub use crate::game::{
        AiState, Button, ButtonAction, Explosion, FloatUp, Particles, PauseMenuButton, Player,
        Slider, Spawner, Splitting, VfxFollow, Video,
    };
    pub use crate::input::{Action, Bindings, Input};
    pub use crate::math::{Pose2, Rect};
    pub use crate::renderer::{
        Camera2D, EditorCamera, Renderer2d, ShakeKind, Sprite, SpriteBatch, SpriteUi, Texture,
        WorldBorders,
    };
    pub use crate::scene::{loader, SceneTable};
    pub use glam::{Mat4, Vec2, Vec3, Vec4};
    pub use winit::keyboard::KeyCode;
}
