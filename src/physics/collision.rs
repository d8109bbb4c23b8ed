//! Collision detection and response
//!
//! Broad phase through the spatial grid, narrow phase as axis-aligned box
//! overlap with a swept variant for fast movers. Response depends on the
//! roles of the pair: solids split penetration along the dominant axis,
//! player/enemy contacts add knockback and damage, triggers only report.

use glam::Vec2;
use hecs::Entity;
use rustc_hash::FxHashSet;

use super::grid::SpatialGrid;
use crate::core::{EventQueue, GameEvent};
use crate::ecs::{Health, RectCollider, RigidBody, Scene, Transform};
use crate::game::{AiState, Player};
use crate::math::Rect;
use crate::renderer::Sprite;

/// Damage dealt per unit of the opponent's mass
pub const MASS_DAMAGE_FACTOR: f32 = 5.0;

/// Knockback speed per unit of the opponent's mass
pub const KNOCKBACK_SPEED_PER_MASS: f32 = 120.0;

/// How long a knockback window suppresses gameplay forces
pub const KNOCKBACK_DURATION: f32 = 0.25;

/// Clip scheduled when the player takes a hit
pub const HIT_SOUND: &str = "hit";

const MOVING_EPSILON: f32 = 1e-4;

/// How a collider participates in response resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Player,
    Enemy,
    Projectile,
    Static,
}

fn role_of(scene: &Scene, entity: Entity) -> Role {
    if scene.world.get::<&Player>(entity).is_ok() {
        return Role::Player;
    }
    if let Ok(ai) = scene.world.get::<&AiState>(entity) {
        return if ai.projectile {
            Role::Projectile
        } else {
            Role::Enemy
        };
    }
    Role::Static
}

/// Overlap of two AABBs along both axes; positive on both means contact
fn overlap_amounts(a: &Rect, b: &Rect) -> Vec2 {
    Vec2::new(
        a.max.x.min(b.max.x) - a.min.x.max(b.min.x),
        a.max.y.min(b.max.y) - a.min.y.max(b.min.y),
    )
}

/// First time of impact of `a` against `b` across the step, in [0, 1].
///
/// Classic swept AABB on the relative displacement. Returns `None` when the
/// boxes never meet within the step.
#[must_use]
pub fn swept_toi(a: &Rect, va: Vec2, b: &Rect, vb: Vec2, dt: f32) -> Option<f32> {
    let rel = (va - vb) * dt;
    if rel.length_squared() < MOVING_EPSILON * MOVING_EPSILON {
        return None;
    }

    let mut t_entry = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..2 {
        let (a_min, a_max, b_min, b_max, v) = if axis == 0 {
            (a.min.x, a.max.x, b.min.x, b.max.x, rel.x)
        } else {
            (a.min.y, a.max.y, b.min.y, b.max.y, rel.y)
        };

        if v.abs() < MOVING_EPSILON {
            if a_max <= b_min || a_min >= b_max {
                return None;
            }
            continue;
        }

        let (entry, exit) = if v > 0.0 {
            ((b_min - a_max) / v, (b_max - a_min) / v)
        } else {
            ((b_max - a_min) / v, (b_min - a_max) / v)
        };
        t_entry = t_entry.max(entry);
        t_exit = t_exit.min(exit);
    }

    if t_entry <= t_exit && (0.0..=1.0).contains(&t_entry) {
        Some(t_entry)
    } else {
        None
    }
}

struct Contact {
    a: Entity,
    b: Entity,
    /// Positive penetration along both axes from the deepest overlapping
    /// box pair
    overlap: Vec2,
    /// Direction pushing `a` away from `b` along the dominant axis
    push_a: Vec2,
}

fn body_velocity(scene: &Scene, entity: Entity) -> Vec2 {
    scene
        .world
        .get::<&RigidBody>(entity)
        .map(|b| if b.active { b.velocity } else { Vec2::ZERO })
        .unwrap_or(Vec2::ZERO)
}

/// Run one collision pass over the entities on active layers.
///
/// `active_layers` empty means every layer participates. Velocities written
/// by the integrator are composed into world positions here, then contacts
/// are resolved. Each unordered pair is reported at most once per tick.
pub fn run(
    scene: &mut Scene,
    events: &mut EventQueue,
    active_layers: &FxHashSet<String>,
    dt: f32,
) {
    advance_positions(scene, dt);

    let mut grid = SpatialGrid::default();
    for entity in scene.all().collect::<Vec<_>>() {
        if scene.is_queued_for_despawn(entity) {
            continue;
        }
        if !active_layers.is_empty() {
            match scene.layer_of(entity) {
                Some(layer) if active_layers.contains(&layer) => {}
                _ => continue,
            }
        }
        let Ok(collider) = scene.world.get::<&RectCollider>(entity) else {
            continue;
        };
        if !collider.active {
            continue;
        }
        let Ok(transform) = scene.world.get::<&Transform>(entity) else {
            continue;
        };
        let aabb = collider.world_aabb(transform.world());
        drop(collider);
        drop(transform);
        grid.insert(entity, aabb);
    }

    for (a, b) in grid.candidate_pairs() {
        // An owner destroyed earlier in the pass is skipped
        if !scene.world.contains(a)
            || !scene.world.contains(b)
            || scene.is_queued_for_despawn(a)
            || scene.is_queued_for_despawn(b)
        {
            continue;
        }

        let Some(contact) = find_contact(scene, a, b) else {
            // No static overlap; a fast-moving projectile may still cross
            // the gap within this step
            try_swept_projectile(scene, events, a, b, dt);
            continue;
        };

        let a_trigger = scene
            .world
            .get::<&RectCollider>(a)
            .map(|c| c.is_trigger)
            .unwrap_or(false);
        let b_trigger = scene
            .world
            .get::<&RectCollider>(b)
            .map(|c| c.is_trigger)
            .unwrap_or(false);

        record_touch(scene, a, b);

        if a_trigger || b_trigger {
            // Triggers never resolve
            continue;
        }

        match (role_of(scene, a), role_of(scene, b)) {
            (Role::Player, Role::Enemy) => player_enemy(scene, events, &contact, a, b, false),
            (Role::Enemy, Role::Player) => {
                player_enemy(scene, events, &contact.flipped(), b, a, false);
            }
            (Role::Player, Role::Projectile) => player_enemy(scene, events, &contact, a, b, true),
            (Role::Projectile, Role::Player) => {
                player_enemy(scene, events, &contact.flipped(), b, a, true);
            }
            (Role::Projectile, Role::Enemy) => projectile_enemy(scene, events, a, b),
            (Role::Enemy, Role::Projectile) => projectile_enemy(scene, events, b, a),
            (Role::Projectile, Role::Static) => deactivate_projectile(scene, a),
            (Role::Static, Role::Projectile) => deactivate_projectile(scene, b),
            (Role::Projectile, Role::Projectile) => {}
            _ => solid_solid(scene, &contact),
        }
    }

    for (_, collider) in scene.world.query_mut::<&mut RectCollider>() {
        collider.tick_debounce(dt);
    }
}

/// Compose integrated velocities into world positions
fn advance_positions(scene: &mut Scene, dt: f32) {
    for (_, (transform, body)) in scene.world.query_mut::<(&mut Transform, &RigidBody)>() {
        if !body.active || body.velocity.length_squared() < MOVING_EPSILON * MOVING_EPSILON {
            continue;
        }
        let next = transform.world_position() + body.velocity * dt;
        transform.set_world_position_physics(next);
    }
}

/// Any-box overlap between two colliders; the deepest pair wins
fn find_contact(scene: &Scene, a: Entity, b: Entity) -> Option<Contact> {
    let collider_a = scene.world.get::<&RectCollider>(a).ok()?;
    let collider_b = scene.world.get::<&RectCollider>(b).ok()?;
    let world_a = *scene.world.get::<&Transform>(a).ok()?.world();
    let world_b = *scene.world.get::<&Transform>(b).ok()?.world();

    let mut best: Option<(Vec2, Rect, Rect)> = None;
    for i in 0..collider_a.boxes.len() {
        let box_a = collider_a.box_aabb(i, &world_a);
        for j in 0..collider_b.boxes.len() {
            let box_b = collider_b.box_aabb(j, &world_b);
            if !box_a.overlaps(&box_b) {
                continue;
            }
            let overlap = overlap_amounts(&box_a, &box_b);
            let depth = overlap.x.min(overlap.y);
            let better = best
                .as_ref()
                .map(|(o, _, _)| depth > o.x.min(o.y))
                .unwrap_or(true);
            if better {
                best = Some((overlap, box_a, box_b));
            }
        }
    }

    let (overlap, box_a, box_b) = best?;
    let push_a = if overlap.x <= overlap.y {
        Vec2::new(if box_a.center().x < box_b.center().x { -1.0 } else { 1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if box_a.center().y < box_b.center().y { -1.0 } else { 1.0 })
    };

    Some(Contact {
        a,
        b,
        overlap,
        push_a,
    })
}

impl Contact {
    fn depth(&self) -> f32 {
        self.overlap.x.min(self.overlap.y)
    }

    fn flipped(&self) -> Contact {
        Contact {
            a: self.b,
            b: self.a,
            overlap: self.overlap,
            push_a: -self.push_a,
        }
    }
}

fn record_touch(scene: &mut Scene, a: Entity, b: Entity) {
    if let Ok(mut collider) = scene.world.get::<&mut RectCollider>(a) {
        collider.set_touching(b);
    }
    if let Ok(mut collider) = scene.world.get::<&mut RectCollider>(b) {
        collider.set_touching(a);
    }
}

fn shift_world(scene: &mut Scene, entity: Entity, delta: Vec2) {
    if let Ok(mut transform) = scene.world.get::<&mut Transform>(entity) {
        let next = transform.world_position() + delta;
        transform.set_world_position_physics(next);
    }
}

/// Solid response: split the penetration along the dominant axis and zero
/// the moving participants' velocity along it. A stationary participant is
/// never moved.
fn solid_solid(scene: &mut Scene, contact: &Contact) {
    let a_moving = body_velocity(scene, contact.a).length_squared() > MOVING_EPSILON;
    let b_moving = body_velocity(scene, contact.b).length_squared() > MOVING_EPSILON;
    let depth = contact.depth();

    match (a_moving, b_moving) {
        (true, true) => {
            shift_world(scene, contact.a, contact.push_a * depth * 0.5);
            shift_world(scene, contact.b, -contact.push_a * depth * 0.5);
            zero_axis_velocity(scene, contact.a, contact.push_a);
            zero_axis_velocity(scene, contact.b, contact.push_a);
        }
        (true, false) => {
            shift_world(scene, contact.a, contact.push_a * depth);
            zero_axis_velocity(scene, contact.a, contact.push_a);
        }
        (false, true) => {
            shift_world(scene, contact.b, -contact.push_a * depth);
            zero_axis_velocity(scene, contact.b, contact.push_a);
        }
        (false, false) => {}
    }
}

fn zero_axis_velocity(scene: &mut Scene, entity: Entity, axis: Vec2) {
    if let Ok(mut body) = scene.world.get::<&mut RigidBody>(entity) {
        if axis.x != 0.0 {
            body.velocity.x = 0.0;
        } else {
            body.velocity.y = 0.0;
        }
    }
}

/// Player/enemy contact: both receive half the correction, both are knocked
/// back away from each other scaled by the opponent's mass, and the player
/// takes mass-derived damage. A projectile opponent deals no damage and is
/// deactivated instead.
fn player_enemy(
    scene: &mut Scene,
    events: &mut EventQueue,
    contact: &Contact,
    player: Entity,
    enemy: Entity,
    enemy_is_projectile: bool,
) {
    let depth = contact.depth();
    shift_world(scene, player, contact.push_a * depth * 0.5);
    shift_world(scene, enemy, -contact.push_a * depth * 0.5);

    let player_mass = scene
        .world
        .get::<&RigidBody>(player)
        .map(|b| b.mass)
        .unwrap_or(1.0);
    let enemy_mass = scene
        .world
        .get::<&RigidBody>(enemy)
        .map(|b| b.mass)
        .unwrap_or(1.0);

    if let Ok(mut body) = scene.world.get::<&mut RigidBody>(player) {
        body.apply_knockback(
            contact.push_a * KNOCKBACK_SPEED_PER_MASS * enemy_mass,
            KNOCKBACK_DURATION,
        );
    }
    if let Ok(mut body) = scene.world.get::<&mut RigidBody>(enemy) {
        body.apply_knockback(
            -contact.push_a * KNOCKBACK_SPEED_PER_MASS * player_mass,
            KNOCKBACK_DURATION,
        );
    }

    if enemy_is_projectile {
        deactivate_projectile(scene, enemy);
        return;
    }

    let damage = enemy_mass * MASS_DAMAGE_FACTOR;
    if let Ok(mut health) = scene.world.get::<&mut Health>(player) {
        health.damage(damage);
    }
    events.push(GameEvent::Damaged {
        entity: player,
        amount: damage,
    });
    events.push(GameEvent::PlaySound {
        clip: HIT_SOUND.to_string(),
    });
}

/// Projectile impact: the projectile's mass drives damage, then it is
/// deactivated with its rotation and visual state reset.
fn projectile_enemy(scene: &mut Scene, events: &mut EventQueue, projectile: Entity, enemy: Entity) {
    let damage = scene
        .world
        .get::<&RigidBody>(projectile)
        .map(|b| b.mass)
        .unwrap_or(1.0)
        * MASS_DAMAGE_FACTOR;

    if let Ok(mut health) = scene.world.get::<&mut Health>(enemy) {
        health.damage(damage);
    }
    events.push(GameEvent::Damaged {
        entity: enemy,
        amount: damage,
    });

    deactivate_projectile(scene, projectile);
}

fn try_swept_projectile(
    scene: &mut Scene,
    events: &mut EventQueue,
    a: Entity,
    b: Entity,
    dt: f32,
) {
    let (projectile, target) = match (role_of(scene, a), role_of(scene, b)) {
        (Role::Projectile, Role::Enemy) => (a, b),
        (Role::Enemy, Role::Projectile) => (b, a),
        _ => return,
    };

    let aabb_of = |scene: &Scene, e: Entity| -> Option<Rect> {
        let collider = scene.world.get::<&RectCollider>(e).ok()?;
        let transform = scene.world.get::<&Transform>(e).ok()?;
        Some(collider.world_aabb(transform.world()))
    };
    let (Some(proj_aabb), Some(target_aabb)) = (aabb_of(scene, projectile), aabb_of(scene, target))
    else {
        return;
    };

    let vp = body_velocity(scene, projectile);
    let vt = body_velocity(scene, target);
    if swept_toi(&proj_aabb, vp, &target_aabb, vt, dt).is_some() {
        record_touch(scene, projectile, target);
        projectile_enemy(scene, events, projectile, target);
    }
}

fn deactivate_projectile(scene: &mut Scene, projectile: Entity) {
    if let Ok(mut ai) = scene.world.get::<&mut AiState>(projectile) {
        ai.active = false;
    }
    if let Ok(mut body) = scene.world.get::<&mut RigidBody>(projectile) {
        body.velocity = Vec2::ZERO;
        body.active = false;
    }
    if let Ok(mut collider) = scene.world.get::<&mut RectCollider>(projectile) {
        collider.active = false;
    }
    if let Ok(mut transform) = scene.world.get::<&mut Transform>(projectile) {
        transform.set_local_rotation(0.0);
    }
    if let Ok(mut sprite) = scene.world.get::<&mut Sprite>(projectile) {
        sprite.animation.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::hierarchy;
    use crate::physics::integrator;

    const DT: f32 = 1.0 / 60.0;

    fn no_layers() -> FxHashSet<String> {
        FxHashSet::default()
    }

    fn solid(scene: &mut Scene, name: &str, pos: Vec2, mass: f32, half: f32) -> Entity {
        let e = scene.create(name);
        scene
            .world
            .get::<&mut Transform>(e)
            .unwrap()
            .set_local_position(pos);
        scene.world.insert_one(e, RigidBody::new(mass)).unwrap();
        scene
            .world
            .insert_one(e, RectCollider::single(Vec2::splat(half)))
            .unwrap();
        e
    }

    fn world_x(scene: &Scene, e: Entity) -> f32 {
        scene
            .world
            .get::<&Transform>(e)
            .unwrap()
            .world_position()
            .x
    }

    #[test]
    fn test_knockback_scenario() {
        // Player at origin (mass 1), enemy overlapping by 10 along x (mass 4),
        // both with a 50x50 collider.
        let mut scene = Scene::new();
        let mut events = EventQueue::new();

        let player = solid(&mut scene, "player", Vec2::ZERO, 1.0, 25.0);
        scene.world.insert_one(player, Player::default()).unwrap();
        scene.world.insert_one(player, Health::new(100.0)).unwrap();

        let enemy = solid(&mut scene, "enemy", Vec2::new(40.0, 0.0), 4.0, 25.0);
        scene.world.insert_one(enemy, AiState::default()).unwrap();

        hierarchy::propagate(&mut scene);
        run(&mut scene, &mut events, &no_layers(), DT);

        // Positions split the 10-unit penetration equally
        assert!((world_x(&scene, player) + 5.0).abs() < 1e-3);
        assert!((world_x(&scene, enemy) - 45.0).abs() < 1e-3);

        // Knockback pushed the player left and the enemy right
        let pv = scene.world.get::<&RigidBody>(player).unwrap().velocity;
        let ev = scene.world.get::<&RigidBody>(enemy).unwrap().velocity;
        assert!(pv.x < 0.0);
        assert!(ev.x > 0.0);
        // Magnitude scales with the opponent's mass
        assert!(pv.x.abs() > ev.x.abs());

        // Player health dropped by the enemy's mass-derived damage
        let health = scene.world.get::<&Health>(player).unwrap();
        assert!((health.current - (100.0 - 4.0 * MASS_DAMAGE_FACTOR)).abs() < 1e-3);

        // A hit sound was scheduled
        assert!(events
            .take()
            .iter()
            .any(|e| matches!(e, GameEvent::PlaySound { clip } if clip == HIT_SOUND)));
    }

    #[test]
    fn test_trigger_reports_without_response() {
        let mut scene = Scene::new();
        let mut events = EventQueue::new();

        let a = scene.create("sensor_a");
        scene
            .world
            .insert_one(a, RectCollider::trigger(Vec2::splat(25.0)))
            .unwrap();
        let b = scene.create("sensor_b");
        scene
            .world
            .get::<&mut Transform>(b)
            .unwrap()
            .set_local_position(Vec2::new(10.0, 0.0));
        scene
            .world
            .insert_one(b, RectCollider::trigger(Vec2::splat(25.0)))
            .unwrap();
        scene.world.insert_one(b, RigidBody::new(1.0)).unwrap();

        hierarchy::propagate(&mut scene);
        let before_a = world_x(&scene, a);
        let before_b = world_x(&scene, b);

        // Overlapping for two consecutive ticks reports on both
        for _ in 0..2 {
            run(&mut scene, &mut events, &no_layers(), DT);
            assert_eq!(
                scene.world.get::<&RectCollider>(a).unwrap().touching(),
                Some(b)
            );
            assert_eq!(
                scene.world.get::<&RectCollider>(b).unwrap().touching(),
                Some(a)
            );
        }

        // Trigger participation never moved anyone
        assert_eq!(world_x(&scene, a), before_a);
        assert_eq!(world_x(&scene, b), before_b);
        assert_eq!(
            scene.world.get::<&RigidBody>(b).unwrap().velocity,
            Vec2::ZERO
        );

        // After separation the contact clears within the debounce window
        scene
            .world
            .get::<&mut Transform>(b)
            .unwrap()
            .set_local_position(Vec2::new(500.0, 0.0));
        hierarchy::propagate(&mut scene);
        let mut elapsed = 0.0;
        while elapsed <= crate::ecs::TOUCH_DEBOUNCE + DT {
            run(&mut scene, &mut events, &no_layers(), DT);
            elapsed += DT;
        }
        assert_eq!(scene.world.get::<&RectCollider>(a).unwrap().touching(), None);
    }

    #[test]
    fn test_moving_solid_stops_at_static_wall() {
        let mut scene = Scene::new();
        let mut events = EventQueue::new();

        let mover = solid(&mut scene, "mover", Vec2::ZERO, 1.0, 25.0);
        scene.world.get::<&mut RigidBody>(mover).unwrap().velocity = Vec2::new(600.0, 0.0);

        // Wall without a body is stationary
        let wall = scene.create("wall");
        scene
            .world
            .get::<&mut Transform>(wall)
            .unwrap()
            .set_local_position(Vec2::new(55.0, 0.0));
        scene
            .world
            .insert_one(wall, RectCollider::single(Vec2::splat(25.0)))
            .unwrap();

        hierarchy::propagate(&mut scene);
        run(&mut scene, &mut events, &no_layers(), DT);

        // The mover advanced then was pushed back out of the wall
        assert!(world_x(&scene, mover) <= 5.0 + 1e-3);
        // Velocity along the contact axis was zeroed; the wall did not move
        assert_eq!(scene.world.get::<&RigidBody>(mover).unwrap().velocity.x, 0.0);
        assert_eq!(world_x(&scene, wall), 55.0);
    }

    #[test]
    fn test_pair_reported_once_per_tick() {
        let mut scene = Scene::new();
        let mut events = EventQueue::new();

        let player = solid(&mut scene, "player", Vec2::ZERO, 1.0, 25.0);
        scene.world.insert_one(player, Player::default()).unwrap();
        scene.world.insert_one(player, Health::new(100.0)).unwrap();
        let enemy = solid(&mut scene, "enemy", Vec2::new(30.0, 0.0), 2.0, 25.0);
        scene.world.insert_one(enemy, AiState::default()).unwrap();

        hierarchy::propagate(&mut scene);
        run(&mut scene, &mut events, &no_layers(), DT);

        // Exactly one damage event despite shared grid cells
        let damage_events = events
            .take()
            .iter()
            .filter(|e| matches!(e, GameEvent::Damaged { .. }))
            .count();
        assert_eq!(damage_events, 1);
    }

    #[test]
    fn test_projectile_impact_deactivates_and_damages() {
        let mut scene = Scene::new();
        let mut events = EventQueue::new();

        let projectile = solid(&mut scene, "bolt", Vec2::ZERO, 2.0, 5.0);
        scene
            .world
            .insert_one(projectile, AiState::projectile())
            .unwrap();

        let enemy = solid(&mut scene, "enemy", Vec2::new(6.0, 0.0), 3.0, 10.0);
        scene.world.insert_one(enemy, AiState::default()).unwrap();
        scene.world.insert_one(enemy, Health::new(50.0)).unwrap();

        hierarchy::propagate(&mut scene);
        run(&mut scene, &mut events, &no_layers(), DT);

        let health = scene.world.get::<&Health>(enemy).unwrap();
        assert!((health.current - (50.0 - 2.0 * MASS_DAMAGE_FACTOR)).abs() < 1e-3);

        assert!(!scene.world.get::<&AiState>(projectile).unwrap().active);
        assert!(!scene.world.get::<&RigidBody>(projectile).unwrap().active);
        assert_eq!(
            scene.world.get::<&RigidBody>(projectile).unwrap().velocity,
            Vec2::ZERO
        );
    }

    #[test]
    fn test_swept_toi_catches_tunneling() {
        let a = Rect::from_center_half_extents(Vec2::ZERO, Vec2::splat(5.0));
        let b = Rect::from_center_half_extents(Vec2::new(100.0, 0.0), Vec2::splat(5.0));

        // Fast enough to cross the whole gap within one step
        let toi = swept_toi(&a, Vec2::new(12000.0, 0.0), &b, Vec2::ZERO, DT);
        assert!(toi.is_some());
        let toi = toi.unwrap();
        assert!(toi > 0.0 && toi < 1.0);

        // Too slow to arrive
        assert!(swept_toi(&a, Vec2::new(10.0, 0.0), &b, Vec2::ZERO, DT).is_none());
        // Moving apart
        assert!(swept_toi(&a, Vec2::new(-12000.0, 0.0), &b, Vec2::ZERO, DT).is_none());
    }

    #[test]
    fn test_energy_containment_under_drag() {
        let mut scene = Scene::new();
        let mut events = EventQueue::new();

        let e = solid(&mut scene, "drifting", Vec2::ZERO, 1.0, 10.0);
        {
            let mut body = scene.world.get::<&mut RigidBody>(e).unwrap();
            body.velocity = Vec2::new(250.0, 100.0);
            body.drag = 2.0;
        }

        hierarchy::propagate(&mut scene);
        let mut last = scene.world.get::<&RigidBody>(e).unwrap().velocity.length();
        for _ in 0..60 {
            integrator::integrate(&mut scene, DT);
            run(&mut scene, &mut events, &no_layers(), DT);
            let speed = scene.world.get::<&RigidBody>(e).unwrap().velocity.length();
            assert!(speed <= last + 1e-4);
            last = speed;
        }
    }
}
