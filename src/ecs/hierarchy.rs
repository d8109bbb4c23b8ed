//! Entity hierarchy
//!
//! Parent-child links are entity ids, never pointers. Reparenting preserves
//! the world pose by recomputing the local pose, and a cycle check rejects
//! any link that would make an entity its own ancestor.

use hecs::Entity;
use smallvec::SmallVec;

use super::components::Transform;
use super::entity::Scene;
use crate::math::Pose2;

/// Parent component - indicates this entity has a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Children component - tracks all children of this entity
#[derive(Debug, Clone, Default)]
pub struct Children(pub SmallVec<[Entity; 8]>);

impl Children {
    #[must_use]
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Add a child, ignoring duplicates
    pub fn add(&mut self, child: Entity) {
        if !self.0.contains(&child) {
            self.0.push(child);
        }
    }

    /// Remove a child, returning whether it was present
    pub fn remove(&mut self, child: Entity) -> bool {
        if let Some(pos) = self.0.iter().position(|&e| e == child) {
            self.0.remove(pos);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.0.iter()
    }
}

/// Errors from hierarchy edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// The link would make an entity its own ancestor
    WouldCycle,
    /// One of the entities no longer exists
    NoSuchEntity,
}

impl std::fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WouldCycle => write!(f, "reparenting would create a cycle"),
            Self::NoSuchEntity => write!(f, "entity does not exist"),
        }
    }
}

impl std::error::Error for HierarchyError {}

/// Parent of an entity, if it has one
#[must_use]
pub fn parent_of(scene: &Scene, entity: Entity) -> Option<Entity> {
    scene.world.get::<&Parent>(entity).map(|p| p.0).ok()
}

/// Walk up the parent chain to the topmost ancestor
#[must_use]
pub fn topmost_ancestor(scene: &Scene, entity: Entity) -> Entity {
    let mut current = entity;
    while let Some(parent) = parent_of(scene, current) {
        current = parent;
    }
    current
}

fn is_ancestor(scene: &Scene, candidate: Entity, of: Entity) -> bool {
    let mut current = Some(of);
    while let Some(e) = current {
        if e == candidate {
            return true;
        }
        current = parent_of(scene, e);
    }
    false
}

fn world_pose(scene: &Scene, entity: Entity) -> Pose2 {
    scene
        .world
        .get::<&Transform>(entity)
        .map(|t| *t.world())
        .unwrap_or_default()
}

fn detach_from_current_parent(scene: &mut Scene, child: Entity) {
    if let Some(old_parent) = parent_of(scene, child) {
        if let Ok(mut children) = scene.world.get::<&mut Children>(old_parent) {
            children.remove(child);
        }
        let _ = scene.world.remove_one::<Parent>(child);
    }
}

/// Attach `child` under `parent`, preserving the child's world pose.
///
/// The child's local pose is recomputed against the new parent so the world
/// pose is unchanged in the tick the reparent occurs.
pub fn set_parent(scene: &mut Scene, child: Entity, parent: Entity) -> Result<(), HierarchyError> {
    if !scene.world.contains(child) || !scene.world.contains(parent) {
        return Err(HierarchyError::NoSuchEntity);
    }
    if child == parent || is_ancestor(scene, child, parent) {
        return Err(HierarchyError::WouldCycle);
    }

    let child_world = world_pose(scene, child);
    let parent_world = world_pose(scene, parent);

    attach(scene, child, parent);

    if let Ok(mut transform) = scene.world.get::<&mut Transform>(child) {
        transform.set_local(Pose2::relative_to(&child_world, &parent_world));
    }
    Ok(())
}

/// Attach `child` under `parent` without touching the child's local pose.
///
/// Used while instantiating a prefab subtree, where deserialized local poses
/// are authoritative and propagation runs once the whole subtree exists.
pub fn set_parent_keep_local(
    scene: &mut Scene,
    child: Entity,
    parent: Entity,
) -> Result<(), HierarchyError> {
    if !scene.world.contains(child) || !scene.world.contains(parent) {
        return Err(HierarchyError::NoSuchEntity);
    }
    if child == parent || is_ancestor(scene, child, parent) {
        return Err(HierarchyError::WouldCycle);
    }
    attach(scene, child, parent);
    Ok(())
}

fn attach(scene: &mut Scene, child: Entity, parent: Entity) {
    detach_from_current_parent(scene, child);
    let _ = scene.world.insert_one(child, Parent(parent));
    if let Ok(mut children) = scene.world.get::<&mut Children>(parent) {
        children.add(child);
    } else {
        let mut children = Children::new();
        children.add(child);
        let _ = scene.world.insert_one(parent, children);
    }
}

/// Detach an entity from its parent; the local pose becomes a copy of the
/// current world pose.
pub fn unset_parent(scene: &mut Scene, child: Entity) {
    let world = world_pose(scene, child);
    detach_from_current_parent(scene, child);
    if let Ok(mut transform) = scene.world.get::<&mut Transform>(child) {
        transform.set_local(world);
    }
}

/// Append every descendant of `entity` to `out`, depth-first
pub fn collect_descendants(scene: &Scene, entity: Entity, out: &mut Vec<Entity>) {
    let children: SmallVec<[Entity; 8]> = scene
        .world
        .get::<&Children>(entity)
        .map(|c| c.0.clone())
        .unwrap_or_default();
    for child in children {
        out.push(child);
        collect_descendants(scene, child, out);
    }
}

/// Re-derive world poses from the parent chain.
///
/// Roots are visited in insertion order, children depth-first, so a parent's
/// change is visible to its children in the same pass. Transforms flagged by
/// the physics step keep their world pose for this frame.
pub fn propagate(scene: &mut Scene) {
    let roots: Vec<Entity> = scene
        .all()
        .filter(|e| parent_of(scene, *e).is_none())
        .collect();
    for root in roots {
        propagate_subtree(scene, root, None);
    }
}

fn propagate_subtree(scene: &mut Scene, entity: Entity, parent_world: Option<Pose2>) {
    let world = {
        let Ok(mut transform) = scene.world.get::<&mut Transform>(entity) else {
            return;
        };
        if !transform.physics_set() {
            let derived = match parent_world {
                Some(parent) => Pose2::compose(&parent, transform.local()),
                None => *transform.local(),
            };
            transform.write_world(derived);
        }
        *transform.world()
    };

    let children: SmallVec<[Entity; 8]> = scene
        .world
        .get::<&Children>(entity)
        .map(|c| c.0.clone())
        .unwrap_or_default();
    for child in children {
        propagate_subtree(scene, child, Some(world));
    }
}

/// End-of-tick pass: reconcile physics-written world poses back into local
/// poses and drop the single-frame flags.
pub fn clear_physics_flags(scene: &mut Scene) {
    let flagged: Vec<Entity> = scene
        .all()
        .filter(|e| {
            scene
                .world
                .get::<&Transform>(*e)
                .map(|t| t.physics_set())
                .unwrap_or(false)
        })
        .collect();
    for entity in flagged {
        let parent_world = parent_of(scene, entity).map(|p| world_pose(scene, p));
        if let Ok(mut transform) = scene.world.get::<&mut Transform>(entity) {
            transform.clear_physics_flag(parent_world.as_ref());
        }
    }
}
