//! Entity store
//!
//! Wraps hecs with the bookkeeping the engine needs on top of it: a
//! deterministic insertion order, tag and layer indices, and a despawn queue
//! that is drained once per tick by the scheduler, never mid-iteration.

use hecs::Entity;
use rustc_hash::{FxHashMap, FxHashSet};

use super::components::{Layer, Name, RectCollider, RigidBody, Tag, Transform};
use super::hierarchy::{self, Children, Parent};

/// Tag assigned to entities created without one
pub const DEFAULT_TAG: &str = "Untagged";

/// Layer assigned to entities created without one
pub const DEFAULT_LAYER: &str = "Default";

/// The set of entities currently alive, plus the indices over them
pub struct Scene {
    /// The underlying hecs world
    pub world: hecs::World,
    /// Alive entities in insertion order
    order: Vec<Entity>,
    /// Tag name to entities carrying it
    tag_index: FxHashMap<String, Vec<Entity>>,
    /// Layer name to entities on it
    layer_index: FxHashMap<String, Vec<Entity>>,
    /// Entities queued for removal at the next drain
    despawn_queue: Vec<Entity>,
    queued: FxHashSet<Entity>,
    /// Every tag value seen so far
    tags: Vec<String>,
    /// Every layer value seen so far
    layers: Vec<String>,
}

impl Scene {
    /// Create an empty scene
    #[must_use]
    pub fn new() -> Self {
        Self {
            world: hecs::World::new(),
            order: Vec::new(),
            tag_index: FxHashMap::default(),
            layer_index: FxHashMap::default(),
            despawn_queue: Vec::new(),
            queued: FxHashSet::default(),
            tags: vec![DEFAULT_TAG.to_string()],
            layers: vec![DEFAULT_LAYER.to_string()],
        }
    }

    /// Create a blank entity with a name, the default tag and layer, and an
    /// identity transform
    pub fn create(&mut self, name: impl Into<String>) -> Entity {
        let entity = self.world.spawn((
            Name::new(name),
            Tag(DEFAULT_TAG.to_string()),
            Layer(DEFAULT_LAYER.to_string()),
            Transform::default(),
        ));
        self.order.push(entity);
        self.tag_index
            .entry(DEFAULT_TAG.to_string())
            .or_default()
            .push(entity);
        self.layer_index
            .entry(DEFAULT_LAYER.to_string())
            .or_default()
            .push(entity);
        entity
    }

    /// Queue an entity for removal at the end of the current tick.
    ///
    /// Destroying an entity that is already queued or already gone is a
    /// no-op; iteration over the scene stays valid until the drain.
    pub fn destroy(&mut self, entity: Entity) {
        if !self.world.contains(entity) || !self.queued.insert(entity) {
            return;
        }
        self.despawn_queue.push(entity);
    }

    /// Whether an entity is queued for removal
    #[must_use]
    pub fn is_queued_for_despawn(&self, entity: Entity) -> bool {
        self.queued.contains(&entity)
    }

    /// Stable integer identifier for an entity
    #[must_use]
    pub fn id(entity: Entity) -> u64 {
        entity.to_bits().get()
    }

    /// Look up an entity by its integer identifier
    #[must_use]
    pub fn find(&self, id: u64) -> Option<Entity> {
        Entity::from_bits(id).filter(|e| self.world.contains(*e))
    }

    /// All alive entities in insertion order
    pub fn all(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order.iter().copied()
    }

    /// Entities carrying the given tag, in insertion order
    #[must_use]
    pub fn find_by_tag(&self, tag: &str) -> &[Entity] {
        self.tag_index.get(tag).map_or(&[], Vec::as_slice)
    }

    /// Entities on the given layer, in insertion order
    #[must_use]
    pub fn find_by_layer(&self, layer: &str) -> &[Entity] {
        self.layer_index.get(layer).map_or(&[], Vec::as_slice)
    }

    /// Retag an entity, registering the tag if it is new
    pub fn set_tag(&mut self, entity: Entity, tag: impl Into<String>) {
        let tag = tag.into();
        if let Ok(mut current) = self.world.get::<&mut Tag>(entity) {
            if current.0 == tag {
                return;
            }
            if let Some(list) = self.tag_index.get_mut(&current.0) {
                list.retain(|e| *e != entity);
            }
            current.0 = tag.clone();
        } else if self.world.contains(entity) {
            let _ = self.world.insert_one(entity, Tag(tag.clone()));
        } else {
            return;
        }
        if !self.tags.contains(&tag) {
            self.tags.push(tag.clone());
        }
        self.tag_index.entry(tag).or_default().push(entity);
    }

    /// Move an entity to a layer, registering the layer if it is new
    pub fn set_layer(&mut self, entity: Entity, layer: impl Into<String>) {
        let layer = layer.into();
        if let Ok(mut current) = self.world.get::<&mut Layer>(entity) {
            if current.0 == layer {
                return;
            }
            if let Some(list) = self.layer_index.get_mut(&current.0) {
                list.retain(|e| *e != entity);
            }
            current.0 = layer.clone();
        } else if self.world.contains(entity) {
            let _ = self.world.insert_one(entity, Layer(layer.clone()));
        } else {
            return;
        }
        if !self.layers.contains(&layer) {
            self.layers.push(layer.clone());
        }
        self.layer_index.entry(layer).or_default().push(entity);
    }

    /// Tag of an entity, if it has one
    #[must_use]
    pub fn tag_of(&self, entity: Entity) -> Option<String> {
        self.world.get::<&Tag>(entity).map(|t| t.0.clone()).ok()
    }

    /// Layer of an entity, if it has one
    #[must_use]
    pub fn layer_of(&self, entity: Entity) -> Option<String> {
        self.world.get::<&Layer>(entity).map(|l| l.0.clone()).ok()
    }

    /// Registered tag values
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Registered layer values
    #[must_use]
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Detach the rigid body from an entity.
    ///
    /// The collider goes with it; a collider without a body has no meaning to
    /// the response pass.
    pub fn remove_rigid_body(&mut self, entity: Entity) {
        let _ = self.world.remove_one::<RigidBody>(entity);
        let _ = self.world.remove_one::<RectCollider>(entity);
    }

    /// Number of alive entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Remove every entity immediately (scene swap)
    pub fn clear(&mut self) {
        self.world.clear();
        self.order.clear();
        self.tag_index.clear();
        self.layer_index.clear();
        self.despawn_queue.clear();
        self.queued.clear();
    }

    /// Remove queued entities and their descendants.
    ///
    /// Run by the scheduler once per tick after all component updates.
    /// Returns the number of entities removed.
    pub fn drain_despawned(&mut self) -> usize {
        if self.despawn_queue.is_empty() {
            return 0;
        }

        let mut doomed: Vec<Entity> = Vec::new();
        for entity in std::mem::take(&mut self.despawn_queue) {
            if !self.world.contains(entity) {
                continue;
            }
            doomed.push(entity);
            hierarchy::collect_descendants(self, entity, &mut doomed);
        }
        self.queued.clear();

        let doomed_set: FxHashSet<Entity> = doomed.iter().copied().collect();
        for &entity in &doomed {
            // Detach from a surviving parent so its child list stays
            // consistent
            if let Ok(parent) = self.world.get::<&Parent>(entity).map(|p| p.0)
                && !doomed_set.contains(&parent)
                && let Ok(mut children) = self.world.get::<&mut Children>(parent)
            {
                children.remove(entity);
            }
        }

        for &entity in &doomed {
            if let Ok(tag) = self.world.get::<&Tag>(entity).map(|t| t.0.clone())
                && let Some(list) = self.tag_index.get_mut(&tag)
            {
                list.retain(|e| *e != entity);
            }
            if let Ok(layer) = self.world.get::<&Layer>(entity).map(|l| l.0.clone())
                && let Some(list) = self.layer_index.get_mut(&layer)
            {
                list.retain(|e| *e != entity);
            }
            let _ = self.world.despawn(entity);
        }
        self.order.retain(|e| !doomed_set.contains(e));

        doomed.len()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_defaults() {
        let mut scene = Scene::new();
        let e = scene.create("Player");
        assert_eq!(scene.tag_of(e).as_deref(), Some(DEFAULT_TAG));
        assert_eq!(scene.layer_of(e).as_deref(), Some(DEFAULT_LAYER));
        assert_eq!(scene.find_by_tag(DEFAULT_TAG), &[e]);
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let mut scene = Scene::new();
        let a = scene.create("a");
        let b = scene.create("b");
        let c = scene.create("c");
        let order: Vec<Entity> = scene.all().collect();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn test_set_tag_registers_and_reindexes() {
        let mut scene = Scene::new();
        let e = scene.create("wall");
        scene.set_tag(e, "TopBorder");
        assert!(scene.tags().contains(&"TopBorder".to_string()));
        assert_eq!(scene.find_by_tag("TopBorder"), &[e]);
        assert!(scene.find_by_tag(DEFAULT_TAG).is_empty());
    }

    #[test]
    fn test_destroy_is_queued_and_idempotent() {
        let mut scene = Scene::new();
        let e = scene.create("doomed");
        scene.destroy(e);
        scene.destroy(e);
        // Still alive until the drain
        assert!(scene.world.contains(e));
        assert_eq!(scene.len(), 1);

        assert_eq!(scene.drain_despawned(), 1);
        assert!(!scene.world.contains(e));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_find_by_id_roundtrip() {
        let mut scene = Scene::new();
        let e = scene.create("findme");
        let id = Scene::id(e);
        assert_eq!(scene.find(id), Some(e));

        scene.destroy(e);
        scene.drain_despawned();
        assert_eq!(scene.find(id), None);
    }

    #[test]
    fn test_remove_rigid_body_takes_collider() {
        use glam::Vec2;

        let mut scene = Scene::new();
        let e = scene.create("body");
        scene.world.insert_one(e, RigidBody::new(1.0)).unwrap();
        scene
            .world
            .insert_one(e, RectCollider::single(Vec2::splat(10.0)))
            .unwrap();

        scene.remove_rigid_body(e);
        assert!(scene.world.get::<&RigidBody>(e).is_err());
        assert!(scene.world.get::<&RectCollider>(e).is_err());
    }
}
