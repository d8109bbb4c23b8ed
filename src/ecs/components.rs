//! Core data components
//!
//! The engine's component kinds are a closed set of concrete structs; hecs
//! guarantees at most one component of each kind per entity. Gameplay-only
//! kinds live in the `game` module, animation kinds in `animation`.

use glam::Vec2;
use hecs::Entity;
use smallvec::SmallVec;

use crate::math::{Pose2, Rect};

/// Entity display name
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Single gameplay tag, a member of the scene's tag registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag(pub String);

/// Named partition used for rendering order and collision activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer(pub String);

/// Transform component with a local pose and a derived world pose.
///
/// The world pose is recomputed from the parent chain once per tick unless
/// the physics step wrote it directly for this frame.
#[derive(Debug, Clone)]
pub struct Transform {
    local: Pose2,
    world: Pose2,
    /// Set when the physics step authored the world pose this frame
    physics_set: bool,
}

impl Transform {
    #[must_use]
    pub fn new(local: Pose2) -> Self {
        Self {
            local,
            world: local,
            physics_set: false,
        }
    }

    #[must_use]
    pub fn from_position(position: Vec2) -> Self {
        Self::new(Pose2::from_position(position))
    }

    pub fn set_local_position(&mut self, position: Vec2) {
        self.local.position = position;
    }

    pub fn set_local_scale(&mut self, scale: Vec2) {
        self.local.scale = scale;
    }

    pub fn set_local_rotation(&mut self, rotation: f32) {
        self.local.rotation = rotation;
    }

    #[must_use]
    pub fn local(&self) -> &Pose2 {
        &self.local
    }

    #[must_use]
    pub fn local_position(&self) -> Vec2 {
        self.local.position
    }

    #[must_use]
    pub fn local_scale(&self) -> Vec2 {
        self.local.scale
    }

    #[must_use]
    pub fn local_rotation(&self) -> f32 {
        self.local.rotation
    }

    #[must_use]
    pub fn world(&self) -> &Pose2 {
        &self.world
    }

    #[must_use]
    pub fn world_position(&self) -> Vec2 {
        self.world.position
    }

    #[must_use]
    pub fn world_scale(&self) -> Vec2 {
        self.world.scale
    }

    #[must_use]
    pub fn world_rotation(&self) -> f32 {
        self.world.rotation
    }

    /// Replace the local pose wholesale (deserialization path)
    pub fn set_local(&mut self, local: Pose2) {
        self.local = local;
    }

    /// Authoritative world write from the collision response.
    ///
    /// Marks the transform so the next propagation pass leaves the world pose
    /// untouched for this frame.
    pub fn set_world_position_physics(&mut self, position: Vec2) {
        self.world.position = position;
        self.physics_set = true;
    }

    #[must_use]
    pub fn physics_set(&self) -> bool {
        self.physics_set
    }

    /// Called by the hierarchy pass when it derives the world pose
    pub(crate) fn write_world(&mut self, world: Pose2) {
        self.world = world;
    }

    /// End-of-tick reconciliation: recompute the local pose from the
    /// physics-written world pose and clear the flag.
    pub(crate) fn clear_physics_flag(&mut self, parent_world: Option<&Pose2>) {
        if !self.physics_set {
            return;
        }
        match parent_world {
            Some(parent) => self.local = Pose2::relative_to(&self.world, parent),
            None => self.local = self.world,
        }
        self.physics_set = false;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Pose2::IDENTITY)
    }
}

/// One axis-aligned box of a collider: half extents plus an offset from the
/// owning transform's world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderBox {
    pub half_extents: Vec2,
    pub offset: Vec2,
}

impl ColliderBox {
    #[must_use]
    pub const fn new(half_extents: Vec2, offset: Vec2) -> Self {
        Self {
            half_extents,
            offset,
        }
    }
}

/// Wall-clock window during which a cleared contact is still reported
pub const TOUCH_DEBOUNCE: f32 = 0.1;

/// Axis-aligned box collider with one or more boxes.
///
/// Triggers report overlap without positional or velocity response.
#[derive(Debug, Clone)]
pub struct RectCollider {
    pub boxes: SmallVec<[ColliderBox; 2]>,
    pub is_trigger: bool,
    pub active: bool,
    touching: Option<Entity>,
    touch_timer: f32,
}

impl RectCollider {
    #[must_use]
    pub fn single(half_extents: Vec2) -> Self {
        let mut boxes = SmallVec::new();
        boxes.push(ColliderBox::new(half_extents, Vec2::ZERO));
        Self::from_boxes(boxes)
    }

    #[must_use]
    pub fn from_boxes(boxes: SmallVec<[ColliderBox; 2]>) -> Self {
        Self {
            boxes,
            is_trigger: false,
            active: true,
            touching: None,
            touch_timer: 0.0,
        }
    }

    #[must_use]
    pub fn trigger(half_extents: Vec2) -> Self {
        let mut collider = Self::single(half_extents);
        collider.is_trigger = true;
        collider
    }

    /// World AABB of box `index`, scaled by the owning world pose.
    ///
    /// An out-of-range index yields a zero box at the owner's position.
    #[must_use]
    pub fn box_aabb(&self, index: usize, world: &Pose2) -> Rect {
        let Some(b) = self.boxes.get(index) else {
            return Rect::from_center_half_extents(world.position, Vec2::ZERO);
        };
        let scale = world.scale.abs();
        Rect::from_center_half_extents(world.position + b.offset * scale, b.half_extents * scale)
    }

    /// Union of all box AABBs, used for broad-phase insertion
    #[must_use]
    pub fn world_aabb(&self, world: &Pose2) -> Rect {
        let mut aabb = self.box_aabb(0, world);
        for i in 1..self.boxes.len() {
            aabb = aabb.union(&self.box_aabb(i, world));
        }
        aabb
    }

    /// Record `other` as the current contact and refresh the debounce window
    pub fn set_touching(&mut self, other: Entity) {
        self.touching = Some(other);
        self.touch_timer = TOUCH_DEBOUNCE;
    }

    /// The entity currently overlapping this collider, if any
    #[must_use]
    pub fn touching(&self) -> Option<Entity> {
        self.touching
    }

    /// Advance the debounce timer; clears the contact once the window closes
    pub fn tick_debounce(&mut self, dt: f32) {
        if self.touching.is_some() {
            self.touch_timer -= dt;
            if self.touch_timer <= 0.0 {
                self.touching = None;
                self.touch_timer = 0.0;
            }
        }
    }
}

/// Rigid body state for the fixed-step integrator.
///
/// Force accumulated during a tick is consumed by the integrator; the
/// acceleration is reset at the end of the step. While the knockback timer is
/// active, gameplay forces are suppressed and the velocity is authoritative.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub mass: f32,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub drag: f32,
    pub active: bool,
    force: Vec2,
    knockback_remaining: f32,
}

impl RigidBody {
    #[must_use]
    pub fn new(mass: f32) -> Self {
        Self {
            mass: mass.max(f32::EPSILON),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            drag: 0.0,
            active: true,
            force: Vec2::ZERO,
            knockback_remaining: 0.0,
        }
    }

    /// Accumulate a gameplay force for this tick. Ignored during knockback.
    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_knocked_back() {
            return;
        }
        self.force += force;
    }

    /// Force accumulated regardless of knockback (drag, collision response)
    pub(crate) fn apply_internal_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub(crate) fn take_force(&mut self) -> Vec2 {
        std::mem::take(&mut self.force)
    }

    /// Start a knockback window: the velocity is set directly and gameplay
    /// forces are suppressed until the timer expires.
    pub fn apply_knockback(&mut self, velocity: Vec2, duration: f32) {
        self.velocity = velocity;
        self.knockback_remaining = duration;
        self.force = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }

    #[must_use]
    pub fn is_knocked_back(&self) -> bool {
        self.knockback_remaining > 0.0
    }

    pub(crate) fn tick_knockback(&mut self, dt: f32) {
        if self.knockback_remaining > 0.0 {
            self.knockback_remaining = (self.knockback_remaining - dt).max(0.0);
        }
    }
}

/// Constant force feeding the integrator each tick
#[derive(Debug, Clone, Copy)]
pub struct Gravity {
    pub force: Vec2,
    pub active: bool,
}

impl Gravity {
    #[must_use]
    pub const fn new(force: Vec2) -> Self {
        Self {
            force,
            active: true,
        }
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, -980.0))
    }
}

/// World-space text attached to an entity
#[derive(Debug, Clone)]
pub struct Text {
    pub content: String,
    pub font: String,
    pub offset: Vec2,
    pub color: [f32; 3],
    pub alpha: f32,
    pub size: f32,
    pub active: bool,
}

impl Text {
    #[must_use]
    pub fn new(content: impl Into<String>, font: impl Into<String>, size: f32) -> Self {
        Self {
            content: content.into(),
            font: font.into(),
            offset: Vec2::ZERO,
            color: [1.0, 1.0, 1.0],
            alpha: 1.0,
            size,
            active: true,
        }
    }
}

/// Camera-space text, collected through the owning canvas
#[derive(Debug, Clone)]
pub struct TextUi {
    pub text: Text,
}

impl TextUi {
    #[must_use]
    pub fn new(text: Text) -> Self {
        Self { text }
    }
}

/// Marks an entity whose descendants draw in camera space
#[derive(Debug, Clone, Copy, Default)]
pub struct UiRoot;

/// Remaining health; death queues the entity for despawn
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub max: f32,
    pub current: f32,
}

impl Health {
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { max, current: max }
    }

    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Named audio clip triggered through the audio bus
#[derive(Debug, Clone)]
pub struct AudioEmitter {
    pub clip: String,
    pub volume: f32,
    pub looping: bool,
    pub play_on_spawn: bool,
    pub active: bool,
}

impl AudioEmitter {
    #[must_use]
    pub fn new(clip: impl Into<String>) -> Self {
        Self {
            clip: clip.into(),
            volume: 1.0,
            looping: false,
            play_on_spawn: false,
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collider_box_index_clamps_to_zero_box() {
        let collider = RectCollider::single(Vec2::splat(25.0));
        let world = Pose2::from_position(Vec2::new(3.0, 4.0));
        let ok = collider.box_aabb(0, &world);
        assert_eq!(ok.half_extents(), Vec2::splat(25.0));

        let out_of_range = collider.box_aabb(5, &world);
        assert_eq!(out_of_range.half_extents(), Vec2::ZERO);
        assert_eq!(out_of_range.center(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_collider_scale_applies_to_boxes() {
        let collider = RectCollider::single(Vec2::splat(10.0));
        let world = Pose2 {
            position: Vec2::ZERO,
            scale: Vec2::splat(2.0),
            rotation: 0.0,
        };
        let aabb = collider.world_aabb(&world);
        assert_eq!(aabb.half_extents(), Vec2::splat(20.0));
    }

    #[test]
    fn test_rigidbody_force_suppressed_during_knockback() {
        let mut body = RigidBody::new(1.0);
        body.apply_knockback(Vec2::new(-50.0, 0.0), 0.2);
        body.apply_force(Vec2::new(100.0, 0.0));
        assert_eq!(body.take_force(), Vec2::ZERO);

        body.tick_knockback(0.25);
        assert!(!body.is_knocked_back());
        body.apply_force(Vec2::new(100.0, 0.0));
        assert_eq!(body.take_force(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_touch_debounce_window() {
        let mut world = hecs::World::new();
        let other = world.spawn(());

        let mut collider = RectCollider::trigger(Vec2::splat(10.0));
        collider.set_touching(other);
        assert_eq!(collider.touching(), Some(other));

        // Still reported inside the debounce window
        collider.tick_debounce(0.05);
        assert_eq!(collider.touching(), Some(other));

        collider.tick_debounce(0.06);
        assert_eq!(collider.touching(), None);
    }

    #[test]
    fn test_physics_flag_reconciles_local() {
        let mut t = Transform::from_position(Vec2::ZERO);
        t.set_world_position_physics(Vec2::new(5.0, 0.0));
        assert!(t.physics_set());

        let parent_world = Pose2::from_position(Vec2::new(2.0, 0.0));
        t.clear_physics_flag(Some(&parent_world));
        assert!(!t.physics_set());
        assert_eq!(t.local_position(), Vec2::new(3.0, 0.0));
    }
}
