//! CPU particle systems
//!
//! Each system emits quads from its owner's world position with a random
//! direction inside a spread cone. Particles integrate on the CPU and are
//! collected as plain quads by the render pass.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assets::AssetHandle;
use crate::ecs::{Scene, Transform};
use crate::renderer::{SpriteBatch, Texture, WHITE_TEXTURE};

/// Particles emitted per second
const EMISSION_RATE: f32 = 24.0;

#[derive(Debug, Clone, Copy)]
struct LiveParticle {
    /// Offset from the emitter origin at spawn time
    position: Vec2,
    velocity: Vec2,
    age: f32,
}

/// Particle emitter component
pub struct Particles {
    /// Registry name of the particle texture; white quad when unresolved
    pub texture_name: String,
    pub texture: Option<AssetHandle<Texture>>,
    /// Size of one particle quad
    pub size: Vec2,
    /// Seconds each particle lives
    pub lifetime: f32,
    /// Full emission cone angle in radians, around +Y
    pub spread: f32,
    pub looping: bool,
    /// Emission window; ignored when looping
    pub duration: f32,
    /// Initial particle speed
    pub speed: f32,
    pub active: bool,
    elapsed: f32,
    emit_accumulator: f32,
    rng: StdRng,
    particles: Vec<LiveParticle>,
}

impl Particles {
    #[must_use]
    pub fn new(texture_name: impl Into<String>, lifetime: f32, speed: f32) -> Self {
        Self {
            texture_name: texture_name.into(),
            texture: None,
            size: Vec2::splat(8.0),
            lifetime: lifetime.max(0.01),
            spread: std::f32::consts::TAU,
            looping: true,
            duration: 1.0,
            speed,
            active: true,
            elapsed: 0.0,
            emit_accumulator: 0.0,
            rng: StdRng::seed_from_u64(0x70ab_51de),
            particles: Vec::new(),
        }
    }

    /// Live particle count
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Whether the emission window is still open
    #[must_use]
    pub fn emitting(&self) -> bool {
        self.active && (self.looping || self.elapsed < self.duration)
    }

    fn step(&mut self, dt: f32) {
        self.elapsed += dt;

        if self.emitting() {
            self.emit_accumulator += EMISSION_RATE * dt;
            while self.emit_accumulator >= 1.0 {
                self.emit_accumulator -= 1.0;
                let half = self.spread * 0.5;
                let angle = std::f32::consts::FRAC_PI_2 + self.rng.gen_range(-half..=half);
                self.particles.push(LiveParticle {
                    position: Vec2::ZERO,
                    velocity: Vec2::new(angle.cos(), angle.sin()) * self.speed,
                    age: 0.0,
                });
            }
        }

        for particle in &mut self.particles {
            particle.age += dt;
            particle.position += particle.velocity * dt;
        }
        let lifetime = self.lifetime;
        self.particles.retain(|p| p.age < lifetime);
    }
}

impl std::fmt::Debug for Particles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Particles")
            .field("texture_name", &self.texture_name)
            .field("live", &self.particles.len())
            .field("looping", &self.looping)
            .finish()
    }
}

/// Advance every particle system by one tick
pub fn update(scene: &mut Scene, dt: f32) {
    for (_, particles) in scene.world.query_mut::<&mut Particles>() {
        if particles.active {
            particles.step(dt);
        }
    }
}

/// Collect particle quads into the batch, faded by remaining life
pub fn collect(scene: &Scene, batch: &mut SpriteBatch) {
    for entity in scene.all() {
        let (Ok(particles), Ok(transform)) = (
            scene.world.get::<&Particles>(entity),
            scene.world.get::<&Transform>(entity),
        ) else {
            continue;
        };
        if !particles.active {
            continue;
        }
        let origin = transform.world_position();
        let texture = particles
            .texture
            .as_ref()
            .map(|t| t.id())
            .unwrap_or(WHITE_TEXTURE);

        for particle in &particles.particles {
            let fade = 1.0 - particle.age / particles.lifetime;
            batch.quad(
                texture,
                origin + particle.position,
                particles.size,
                0.0,
                [0.0, 0.0],
                [1.0, 1.0],
                [1.0, 1.0, 1.0, fade],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emits_and_expires() {
        let mut scene = Scene::new();
        let e = scene.create("emitter");
        let mut particles = Particles::new("spark", 0.5, 100.0);
        particles.looping = false;
        particles.duration = 0.25;
        scene.world.insert_one(e, particles).unwrap();

        // Emission window open
        for _ in 0..15 {
            update(&mut scene, 1.0 / 60.0);
        }
        let live = scene.world.get::<&Particles>(e).unwrap().len();
        assert!(live > 0);

        // Window closed and every particle aged out
        for _ in 0..60 {
            update(&mut scene, 1.0 / 60.0);
        }
        assert!(scene.world.get::<&Particles>(e).unwrap().is_empty());
        assert!(!scene.world.get::<&Particles>(e).unwrap().emitting());
    }

    #[test]
    fn test_collect_fades_with_age() {
        let mut scene = Scene::new();
        let e = scene.create("emitter");
        scene
            .world
            .insert_one(e, Particles::new("spark", 1.0, 50.0))
            .unwrap();

        for _ in 0..30 {
            update(&mut scene, 1.0 / 60.0);
        }
        let mut batch = SpriteBatch::new();
        collect(&scene, &mut batch);
        let batches = batch.finish();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].vertices.iter().all(|v| v.color[3] <= 1.0));
        assert!(!batches[0].vertices.is_empty());
    }
}
