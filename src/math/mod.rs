//! Math kernel
//!
//! Scalar helpers, rectangles, and the 2D pose type used by the transform
//! hierarchy. Vector and matrix types come from glam.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Wrap an angle in radians into the (-PI, PI] range
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let two_pi = std::f32::consts::TAU;
    let mut a = angle % two_pi;
    if a > std::f32::consts::PI {
        a -= two_pi;
    } else if a <= -std::f32::consts::PI {
        a += two_pi;
    }
    a
}

/// Linear interpolation between two scalars
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Frame-rate independent exponential approach from `a` toward `b`.
///
/// `lambda` is the approach rate per second; higher values converge faster.
#[must_use]
pub fn damp(a: f32, b: f32, lambda: f32, dt: f32) -> f32 {
    lerp(a, b, 1.0 - (-lambda * dt).exp())
}

/// Two-component variant of [`damp`]
#[must_use]
pub fn damp_vec2(a: Vec2, b: Vec2, lambda: f32, dt: f32) -> Vec2 {
    a.lerp(b, 1.0 - (-lambda * dt).exp())
}

/// An axis-aligned rectangle stored as min/max corners
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Bottom-left corner
    pub min: Vec2,
    /// Top-right corner
    pub max: Vec2,
}

impl Rect {
    /// Create a rectangle from min/max corners
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from a center point and half extents
    #[must_use]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Center of the rectangle
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half extents of the rectangle
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Check whether a point lies inside the rectangle (inclusive)
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Strict axis-aligned overlap test
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Smallest rectangle containing both inputs
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// A 2D pose: position, per-axis scale, and rotation in radians.
///
/// Used twice per transform, once for the local pose and once for the derived
/// world pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2 {
    /// Translation
    pub position: Vec2,
    /// Per-axis scale factor
    pub scale: Vec2,
    /// Rotation in radians
    pub rotation: f32,
}

impl Pose2 {
    /// The identity pose
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        scale: Vec2::ONE,
        rotation: 0.0,
    };

    /// Create a pose from a position with unit scale and no rotation
    #[must_use]
    pub const fn from_position(position: Vec2) -> Self {
        Self {
            position,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }

    /// Derive a world pose from a parent world pose and a local pose.
    ///
    /// Positions add, scales multiply component-wise, rotations add.
    #[must_use]
    pub fn compose(parent: &Pose2, local: &Pose2) -> Pose2 {
        Pose2 {
            position: parent.position + local.position,
            scale: parent.scale * local.scale,
            rotation: wrap_angle(parent.rotation + local.rotation),
        }
    }

    /// Recover the local pose that composes with `parent` into `world`.
    ///
    /// Inverse of [`Pose2::compose`]; a zero parent scale axis yields a unit
    /// local scale on that axis.
    #[must_use]
    pub fn relative_to(world: &Pose2, parent: &Pose2) -> Pose2 {
        let scale = Vec2::new(
            if parent.scale.x != 0.0 {
                world.scale.x / parent.scale.x
            } else {
                1.0
            },
            if parent.scale.y != 0.0 {
                world.scale.y / parent.scale.y
            } else {
                1.0
            },
        );
        Pose2 {
            position: world.position - parent.position,
            scale,
            rotation: wrap_angle(world.rotation - parent.rotation),
        }
    }
}

impl Default for Pose2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_angle() {
        let pi = std::f32::consts::PI;
        assert!((wrap_angle(pi * 3.0) - pi).abs() < 1e-5);
        assert!((wrap_angle(-pi * 2.5) + pi * 0.5).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::from_center_half_extents(Vec2::ZERO, Vec2::splat(25.0));
        let b = Rect::from_center_half_extents(Vec2::new(40.0, 0.0), Vec2::splat(25.0));
        let c = Rect::from_center_half_extents(Vec2::new(60.0, 0.0), Vec2::splat(25.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        // Touching edges do not overlap
        let d = Rect::from_center_half_extents(Vec2::new(50.0, 0.0), Vec2::splat(25.0));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_pose_compose_roundtrip() {
        let parent = Pose2 {
            position: Vec2::new(10.0, -4.0),
            scale: Vec2::new(2.0, 3.0),
            rotation: 0.5,
        };
        let local = Pose2 {
            position: Vec2::new(1.0, 2.0),
            scale: Vec2::new(0.5, 1.0),
            rotation: -0.25,
        };
        let world = Pose2::compose(&parent, &local);
        assert_eq!(world.position, Vec2::new(11.0, -2.0));
        assert_eq!(world.scale, Vec2::new(1.0, 3.0));

        let recovered = Pose2::relative_to(&world, &parent);
        assert!((recovered.position - local.position).length() < 1e-5);
        assert!((recovered.scale - local.scale).length() < 1e-5);
        assert!((recovered.rotation - local.rotation).abs() < 1e-5);
    }
}
