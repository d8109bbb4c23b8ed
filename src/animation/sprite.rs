//! Frame-indexed sprite animation
//!
//! Animates over an atlas of `frames_x` by `frames_y` cells in row-major
//! order. Cloning shares the texture handle but owns independent playback
//! state.

use crate::assets::AssetHandle;
use crate::renderer::Texture;

/// Animation state over a sprite sheet
#[derive(Clone)]
pub struct SpriteAnimation {
    /// Shared atlas texture; `None` draws nothing
    pub texture: Option<AssetHandle<Texture>>,
    /// Registry name of the atlas, kept for serialization
    pub texture_name: String,
    /// Atlas columns
    pub frames_x: u32,
    /// Atlas rows
    pub frames_y: u32,
    /// Frames actually used (may be less than the full grid)
    pub total_frames: u32,
    /// Playback rate in frames per second
    pub fps: f32,
    /// Playback speed multiplier
    pub speed: f32,
    frame_u: u32,
    frame_v: u32,
    accumulator: f32,
    playing: bool,
}

impl SpriteAnimation {
    #[must_use]
    pub fn new(
        texture_name: impl Into<String>,
        frames_x: u32,
        frames_y: u32,
        total_frames: u32,
        fps: f32,
    ) -> Self {
        Self {
            texture: None,
            texture_name: texture_name.into(),
            frames_x: frames_x.max(1),
            frames_y: frames_y.max(1),
            total_frames: total_frames.max(1),
            fps,
            speed: 1.0,
            frame_u: 0,
            frame_v: 0,
            accumulator: 0.0,
            playing: true,
        }
    }

    /// A single-frame animation over the whole texture
    #[must_use]
    pub fn single(texture_name: impl Into<String>) -> Self {
        Self::new(texture_name, 1, 1, 1, 0.0)
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Rewind to the first frame and drop accumulated time
    pub fn reset(&mut self) {
        self.frame_u = 0;
        self.frame_v = 0;
        self.accumulator = 0.0;
    }

    /// Current frame as (column, row) into the atlas
    #[must_use]
    pub fn frame(&self) -> (u32, u32) {
        (self.frame_u, self.frame_v)
    }

    /// Jump to a frame by row-major index, wrapping at the frame count
    pub fn set_frame_index(&mut self, index: u32) {
        let index = index % self.total_frames;
        self.frame_u = index % self.frames_x;
        self.frame_v = index / self.frames_x;
        self.accumulator = 0.0;
    }

    /// Linear index of the current frame in row-major order
    #[must_use]
    pub fn frame_index(&self) -> u32 {
        self.frame_v * self.frames_x + self.frame_u
    }

    /// Advance playback by one step.
    ///
    /// Accumulated time grows by `dt * speed`; whole frame periods are spent
    /// advancing through the atlas in row-major order, wrapping at
    /// `total_frames`.
    pub fn advance(&mut self, dt: f32) {
        if !self.playing || self.fps <= 0.0 {
            return;
        }
        let frame_period = 1.0 / self.fps;
        self.accumulator += dt * self.speed;
        while self.accumulator >= frame_period {
            self.accumulator -= frame_period;
            let next = (self.frame_index() + 1) % self.total_frames;
            self.frame_u = next % self.frames_x;
            self.frame_v = next / self.frames_x;
        }
    }

    /// UV rectangle of the current frame as (min, max).
    ///
    /// Frame (k, l) maps to u in [k/Nx, (k+1)/Nx] and v in [l/Ny, (l+1)/Ny];
    /// v = 0 is the bottom row, matching the texture load orientation.
    #[must_use]
    pub fn uv_rect(&self) -> ([f32; 2], [f32; 2]) {
        let w = 1.0 / self.frames_x as f32;
        let h = 1.0 / self.frames_y as f32;
        let u = self.frame_u as f32 * w;
        let v = self.frame_v as f32 * h;
        ([u, v], [u + w, v + h])
    }
}

impl std::fmt::Debug for SpriteAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteAnimation")
            .field("texture_name", &self.texture_name)
            .field("frame", &self.frame())
            .field("fps", &self.fps)
            .field("playing", &self.playing)
            .finish()
    }
}
