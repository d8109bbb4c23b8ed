//! Orthographic camera with follow, dead-zone, borders, and shake
//!
//! The game camera follows the player toward a cursor look-ahead point,
//! ignores motion inside a dead-zone rectangle, and clamps its center to the
//! world borders. Two shake channels add bounded, decaying offsets. The
//! editor camera reuses the same model without follow.

use glam::{Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ecs::{Scene, Transform};
use crate::input::Input;
use crate::math::{damp_vec2, Rect};

/// Zoom bounds
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;

/// The two shake channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShakeKind {
    /// Continuous pull effects
    Suction,
    /// Weapon fire
    Shooting,
}

#[derive(Debug, Clone, Copy)]
struct ShakeChannel {
    intensity: f32,
    cap: f32,
    decay: f32,
}

impl ShakeChannel {
    const fn new(cap: f32, decay: f32) -> Self {
        Self {
            intensity: 0.0,
            cap,
            decay,
        }
    }
}

/// World borders gathered from tagged entities; `None` leaves that side
/// unclamped.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldBorders {
    pub left: Option<f32>,
    pub right: Option<f32>,
    pub top: Option<f32>,
    pub bottom: Option<f32>,
}

impl WorldBorders {
    /// Read the border positions from the scene's border-tagged entities
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        let position_of = |tag: &str| -> Option<Vec2> {
            let entity = scene.find_by_tag(tag).first().copied()?;
            scene
                .world
                .get::<&Transform>(entity)
                .map(|t| t.world_position())
                .ok()
        };
        Self {
            left: position_of("LeftBorder").map(|p| p.x),
            right: position_of("RightBorder").map(|p| p.x),
            top: position_of("TopBorder").map(|p| p.y),
            bottom: position_of("LowerBorder").map(|p| p.y),
        }
    }
}

/// Orthographic 2D camera
#[derive(Debug)]
pub struct Camera2D {
    /// World-space center
    pub center: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Half extents of the orthographic bounds at zoom 1
    pub half_extents: Vec2,
    /// Damping rate for follow interpolation, per second
    pub follow_damping: f32,
    /// Half extents of the dead-zone rectangle around the center
    pub dead_zone: Vec2,
    /// Maximum look-ahead distance toward the cursor
    pub look_ahead_max: f32,
    zoom: f32,
    channels: [ShakeChannel; 2],
    shake_offset: Vec2,
    shake_rotation: f32,
    rng: StdRng,
}

impl Camera2D {
    #[must_use]
    pub fn new(half_extents: Vec2) -> Self {
        Self {
            center: Vec2::ZERO,
            rotation: 0.0,
            half_extents,
            follow_damping: 6.0,
            dead_zone: Vec2::new(40.0, 30.0),
            look_ahead_max: 120.0,
            zoom: 1.0,
            channels: [ShakeChannel::new(12.0, 30.0), ShakeChannel::new(6.0, 40.0)],
            shake_offset: Vec2::ZERO,
            shake_rotation: 0.0,
            rng: StdRng::seed_from_u64(0x5eed_cafe),
        }
    }

    /// Current zoom factor
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set zoom, clamped to [0.1, 5.0]
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Half the visible world extent: bounds scaled by zoom
    #[must_use]
    pub fn view_range(&self) -> Vec2 {
        self.half_extents * self.zoom
    }

    /// The visible world rectangle, ignoring rotation and shake
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        Rect::from_center_half_extents(self.center, self.view_range())
    }

    /// View matrix: inverse of translate(center) * rotateZ * scale(zoom)
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        let center = self.center + self.shake_offset;
        let transform = Mat4::from_translation(Vec3::new(center.x, center.y, 0.0))
            * Mat4::from_rotation_z(self.rotation + self.shake_rotation)
            * Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0));
        transform.inverse()
    }

    /// Orthographic projection over the camera bounds
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(
            -self.half_extents.x,
            self.half_extents.x,
            -self.half_extents.y,
            self.half_extents.y,
            -1.0,
            1.0,
        )
    }

    /// Combined view-projection matrix
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Convert a screen position (pixels, origin top-left) to world space
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2, surface_size: (u32, u32)) -> Vec2 {
        let size = Vec2::new(surface_size.0.max(1) as f32, surface_size.1.max(1) as f32);
        let ndc = Vec2::new(
            screen.x / size.x * 2.0 - 1.0,
            1.0 - screen.y / size.y * 2.0,
        );
        self.center + ndc * self.view_range()
    }

    /// Advance the follow behavior by one tick.
    ///
    /// The target is a look-ahead point from the player toward the cursor,
    /// clipped to the maximum distance. Player motion inside the dead-zone
    /// does not move the center. The final center is clamped so the view
    /// stays inside the world borders.
    pub fn follow(&mut self, player: Vec2, cursor_world: Vec2, borders: &WorldBorders, dt: f32) {
        let dead_zone = Rect::from_center_half_extents(self.center, self.dead_zone);
        if !dead_zone.contains(player) {
            let look_ahead =
                player + (cursor_world - player).clamp_length_max(self.look_ahead_max);
            self.center = damp_vec2(self.center, look_ahead, self.follow_damping, dt);
        }
        self.clamp_to_borders(borders);
    }

    /// Clamp the center so the viewing range stays within the borders
    pub fn clamp_to_borders(&mut self, borders: &WorldBorders) {
        let range = self.view_range();
        if let Some(right) = borders.right {
            self.center.x = self.center.x.min(right - range.x);
        }
        if let Some(left) = borders.left {
            self.center.x = self.center.x.max(left + range.x);
        }
        if let Some(top) = borders.top {
            self.center.y = self.center.y.min(top - range.y);
        }
        if let Some(bottom) = borders.bottom {
            self.center.y = self.center.y.max(bottom + range.y);
        }
    }

    /// Add intensity to a shake channel, bounded by the channel cap
    pub fn add_shake(&mut self, kind: ShakeKind, intensity: f32) {
        let channel = &mut self.channels[kind as usize];
        channel.intensity = (channel.intensity + intensity).min(channel.cap);
    }

    /// Immediately cancel one shake channel
    pub fn cancel_shake(&mut self, kind: ShakeKind) {
        self.channels[kind as usize].intensity = 0.0;
    }

    /// Advance shake: each active channel adds a bounded random offset and
    /// decays by its rate.
    pub fn update_shake(&mut self, dt: f32) {
        self.shake_offset = Vec2::ZERO;
        self.shake_rotation = 0.0;
        for channel in &mut self.channels {
            if channel.intensity <= 0.0 {
                continue;
            }
            let i = channel.intensity;
            self.shake_offset += Vec2::new(self.rng.gen_range(-i..=i), self.rng.gen_range(-i..=i));
            self.shake_rotation += self.rng.gen_range(-i..=i) * 0.002;
            channel.intensity = (channel.intensity - channel.decay * dt).max(0.0);
        }
    }

    /// Total shake intensity currently active
    #[must_use]
    pub fn shake_intensity(&self) -> f32 {
        self.channels.iter().map(|c| c.intensity).sum()
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Vec2::new(640.0, 360.0))
    }
}

/// Free camera for the editor build: same model, driven by held keys and
/// mouse drag instead of follow.
#[derive(Debug)]
pub struct EditorCamera {
    pub camera: Camera2D,
    pub pan_speed: f32,
    default_center: Vec2,
    default_zoom: f32,
}

impl EditorCamera {
    #[must_use]
    pub fn new(camera: Camera2D) -> Self {
        let default_center = camera.center;
        let default_zoom = camera.zoom();
        Self {
            camera,
            pan_speed: 600.0,
            default_center,
            default_zoom,
        }
    }

    /// Drive the camera from held keys, mouse drag, and scroll
    pub fn update(&mut self, input: &Input, dt: f32) {
        use winit::event::MouseButton;
        use winit::keyboard::KeyCode;

        let mut pan = Vec2::ZERO;
        if input.is_key_down(KeyCode::ArrowLeft) {
            pan.x -= 1.0;
        }
        if input.is_key_down(KeyCode::ArrowRight) {
            pan.x += 1.0;
        }
        if input.is_key_down(KeyCode::ArrowUp) {
            pan.y += 1.0;
        }
        if input.is_key_down(KeyCode::ArrowDown) {
            pan.y -= 1.0;
        }
        self.camera.center += pan * self.pan_speed * self.camera.zoom() * dt;

        if input.is_mouse_down(MouseButton::Middle) {
            let delta = input.cursor_delta();
            // Screen-space drag moves the world the opposite way
            self.camera.center += Vec2::new(-delta.x, delta.y) * self.camera.zoom();
        }

        let scroll = input.scroll_delta().y;
        if scroll.abs() > 0.0 {
            self.camera.set_zoom(self.camera.zoom() * (1.0 - scroll * 0.1));
        }

        if input.is_key_down(KeyCode::Home) {
            self.reset();
        }
    }

    /// Return to the default pose
    pub fn reset(&mut self) {
        self.camera.center = self.default_center;
        self.camera.set_zoom(self.default_zoom);
        self.camera.rotation = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamped() {
        let mut camera = Camera2D::default();
        camera.set_zoom(0.01);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.set_zoom(50.0);
        assert_eq!(camera.zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_dead_zone_blocks_follow() {
        let mut camera = Camera2D::new(Vec2::new(200.0, 100.0));
        camera.center = Vec2::ZERO;
        camera.dead_zone = Vec2::new(50.0, 50.0);

        // Player inside the dead-zone: the center stays put
        camera.follow(
            Vec2::new(20.0, 10.0),
            Vec2::new(500.0, 0.0),
            &WorldBorders::default(),
            1.0 / 60.0,
        );
        assert_eq!(camera.center, Vec2::ZERO);

        // Player outside the dead-zone: the center moves toward it
        camera.follow(
            Vec2::new(120.0, 0.0),
            Vec2::new(500.0, 0.0),
            &WorldBorders::default(),
            1.0 / 60.0,
        );
        assert!(camera.center.x > 0.0);
    }

    #[test]
    fn test_border_clamp_beats_look_ahead() {
        // Viewing half-range (200, 100), right border at x = 500, player at
        // x = 490 aiming far right: the clamp wins over the look-ahead.
        let mut camera = Camera2D::new(Vec2::new(200.0, 100.0));
        camera.center = Vec2::new(400.0, 0.0);
        camera.dead_zone = Vec2::new(40.0, 30.0);
        camera.follow_damping = 1000.0;

        let borders = WorldBorders {
            right: Some(500.0),
            ..Default::default()
        };
        camera.follow(
            Vec2::new(490.0, 0.0),
            Vec2::new(1000.0, 0.0),
            &borders,
            1.0 / 60.0,
        );
        assert!((camera.center.x - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_shake_decays_and_cancels() {
        let mut camera = Camera2D::default();
        camera.add_shake(ShakeKind::Shooting, 100.0);
        // Intensity bounded by the channel cap
        assert!(camera.shake_intensity() <= 6.0);

        camera.update_shake(1.0 / 60.0);
        let after_one = camera.shake_intensity();
        camera.update_shake(1.0 / 60.0);
        assert!(camera.shake_intensity() < after_one);

        camera.add_shake(ShakeKind::Suction, 5.0);
        camera.cancel_shake(ShakeKind::Suction);
        camera.cancel_shake(ShakeKind::Shooting);
        assert_eq!(camera.shake_intensity(), 0.0);
    }

    #[test]
    fn test_borders_read_from_tagged_entities() {
        let mut scene = Scene::new();
        let right = scene.create("right_wall");
        scene
            .world
            .get::<&mut Transform>(right)
            .unwrap()
            .set_local_position(Vec2::new(500.0, 0.0));
        scene.set_tag(right, "RightBorder");
        crate::ecs::hierarchy::propagate(&mut scene);

        let borders = WorldBorders::from_scene(&scene);
        assert_eq!(borders.right, Some(500.0));
        assert_eq!(borders.left, None);
    }
}
