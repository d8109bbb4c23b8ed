//! Fixed-step velocity integration
//!
//! Consumes the force accumulated on each rigid body during the tick and
//! advances velocities. Positions are not touched here; the collision pass
//! composes velocity into position when it resolves.

use crate::ecs::{Gravity, RigidBody, Scene};

/// Advance every active rigid body by one fixed step.
///
/// Per body: drag force `-v * drag` joins the accumulated force, the force
/// becomes acceleration through the mass, velocity integrates, and the
/// acceleration resets for the next tick. Knockback timers expire here.
pub fn integrate(scene: &mut Scene, dt: f32) {
    for (_, (body, gravity)) in scene
        .world
        .query_mut::<(&mut RigidBody, Option<&Gravity>)>()
    {
        if !body.active {
            continue;
        }

        if let Some(gravity) = gravity
            && gravity.active
        {
            body.apply_internal_force(gravity.force);
        }

        let drag_force = -body.velocity * body.drag;
        body.apply_internal_force(drag_force);

        let force = body.take_force();
        body.acceleration += force / body.mass;
        body.velocity += body.acceleration * dt;
        body.acceleration = glam::Vec2::ZERO;

        body.tick_knockback(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_force_accelerates_body() {
        let mut scene = Scene::new();
        let e = scene.create("mover");
        scene.world.insert_one(e, RigidBody::new(2.0)).unwrap();

        scene
            .world
            .get::<&mut RigidBody>(e)
            .unwrap()
            .apply_force(Vec2::new(120.0, 0.0));
        integrate(&mut scene, DT);

        let body = scene.world.get::<&RigidBody>(e).unwrap();
        assert!((body.velocity.x - 60.0 * DT).abs() < 1e-5);
        // Acceleration resets at the end of the step
        assert_eq!(body.acceleration, Vec2::ZERO);
    }

    #[test]
    fn test_drag_never_increases_speed() {
        let mut scene = Scene::new();
        let e = scene.create("slowing");
        let mut body = RigidBody::new(1.0);
        body.velocity = Vec2::new(300.0, -200.0);
        body.drag = 4.0;
        scene.world.insert_one(e, body).unwrap();

        let mut last_speed = 300.0_f32.hypot(200.0);
        for _ in 0..120 {
            integrate(&mut scene, DT);
            let speed = scene
                .world
                .get::<&RigidBody>(e)
                .unwrap()
                .velocity
                .length();
            assert!(speed <= last_speed + 1e-4);
            last_speed = speed;
        }
    }

    #[test]
    fn test_gravity_feeds_integration() {
        let mut scene = Scene::new();
        let e = scene.create("falling");
        scene
            .world
            .insert(e, (RigidBody::new(1.0), Gravity::new(Vec2::new(0.0, -600.0))))
            .unwrap();

        integrate(&mut scene, DT);
        let vy = scene.world.get::<&RigidBody>(e).unwrap().velocity.y;
        assert!((vy + 600.0 * DT).abs() < 1e-4);
    }

    #[test]
    fn test_inactive_body_is_skipped() {
        let mut scene = Scene::new();
        let e = scene.create("frozen");
        let mut body = RigidBody::new(1.0);
        body.active = false;
        body.velocity = Vec2::new(10.0, 0.0);
        body.drag = 5.0;
        scene.world.insert_one(e, body).unwrap();

        integrate(&mut scene, DT);
        assert_eq!(
            scene.world.get::<&RigidBody>(e).unwrap().velocity,
            Vec2::new(10.0, 0.0)
        );
    }
}
