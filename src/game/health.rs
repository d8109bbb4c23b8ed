//! Death handling
//!
//! Entities whose health reaches zero are queued for despawn and announce
//! their death on the event queue. The actual removal happens in the
//! scheduler's drain phase, so a dying entity stays visible to the rest of
//! the tick.

use hecs::Entity;

use crate::core::{EventQueue, GameEvent};
use crate::ecs::{Health, Scene};

/// Queue dead entities for despawn
pub fn update(scene: &mut Scene, events: &mut EventQueue) {
    let dead: Vec<Entity> = scene
        .all()
        .filter(|e| {
            scene
                .world
                .get::<&Health>(*e)
                .map(|h| h.is_dead())
                .unwrap_or(false)
                && !scene.is_queued_for_despawn(*e)
        })
        .collect();

    for entity in dead {
        events.push(GameEvent::Killed { entity });
        scene.destroy(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_entity_queued_not_removed() {
        let mut scene = Scene::new();
        let mut events = EventQueue::new();

        let e = scene.create("dying");
        scene.world.insert_one(e, Health::new(10.0)).unwrap();
        scene.world.get::<&mut Health>(e).unwrap().damage(10.0);

        update(&mut scene, &mut events);
        // Still alive until the drain phase
        assert!(scene.world.contains(e));
        assert!(scene.is_queued_for_despawn(e));
        assert!(events
            .take()
            .iter()
            .any(|ev| matches!(ev, GameEvent::Killed { entity } if *entity == e)));

        scene.drain_despawned();
        assert!(!scene.world.contains(e));
    }

    #[test]
    fn test_killed_fires_once() {
        let mut scene = Scene::new();
        let mut events = EventQueue::new();

        let e = scene.create("dying");
        scene.world.insert_one(e, Health::new(1.0)).unwrap();
        scene.world.get::<&mut Health>(e).unwrap().damage(5.0);

        update(&mut scene, &mut events);
        update(&mut scene, &mut events);
        let kills = events
            .take()
            .iter()
            .filter(|ev| matches!(ev, GameEvent::Killed { .. }))
            .count();
        assert_eq!(kills, 1);
    }
}
