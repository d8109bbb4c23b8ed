//! Rendering module
//!
//! Batched 2D rendering with wgpu: quads, font glyphs, lines, and points
//! share one vertex layout and draw through texture-slot batching under an
//! orthographic camera.

mod batch;
mod camera;
mod context;
mod sprite;
pub mod text;
mod texture;
mod vertex;

pub use batch::{DrawBatch, PrimitiveBatch, SpriteBatch, MAX_QUADS, MAX_TEXTURE_SLOTS};
pub use camera::{Camera2D, EditorCamera, ShakeKind, WorldBorders, MAX_ZOOM, MIN_ZOOM};
pub use context::{Renderer2d, WHITE_TEXTURE};
pub use sprite::{collect_world, queue_sprite, Sprite, SpriteUi, SPRITE_UNIT};
pub use text::{Font, FontError, Glyph, GlyphCache};
pub use texture::{Texture, TextureError};
pub use vertex::QuadVertex;
