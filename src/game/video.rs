//! Frame-flip video playback
//!
//! "Video" here is a slideshow over an atlas: the component flips the owning
//! sprite to the next frame on an interval and deactivates after the last
//! one. Used for the intro sequence.

use hecs::Entity;

use crate::ecs::Scene;
use crate::renderer::Sprite;

/// Timed slideshow over a sprite sheet
#[derive(Debug, Clone, Copy)]
pub struct Video {
    pub elapsed: f32,
    /// Index of the frame currently shown
    pub current_scene: u32,
    /// Seconds per frame
    pub switch_interval: f32,
    pub total_scenes: u32,
    pub active: bool,
}

impl Video {
    #[must_use]
    pub fn new(switch_interval: f32, total_scenes: u32) -> Self {
        Self {
            elapsed: 0.0,
            current_scene: 0,
            switch_interval,
            total_scenes: total_scenes.max(1),
            active: true,
        }
    }

    /// Whether the last frame has been shown for its full interval
    #[must_use]
    pub fn finished(&self) -> bool {
        !self.active
    }
}

/// Advance every video by one tick
pub fn update(scene: &mut Scene, dt: f32) {
    let videos: Vec<Entity> = scene
        .all()
        .filter(|e| scene.world.get::<&Video>(*e).is_ok())
        .collect();

    for entity in videos {
        let frame = {
            let Ok(mut video) = scene.world.get::<&mut Video>(entity) else {
                continue;
            };
            if !video.active {
                continue;
            }
            video.elapsed += dt;
            if video.elapsed < video.switch_interval {
                continue;
            }
            video.elapsed -= video.switch_interval;
            if video.current_scene + 1 >= video.total_scenes {
                video.active = false;
                continue;
            }
            video.current_scene += 1;
            video.current_scene
        };

        if let Ok(mut sprite) = scene.world.get::<&mut Sprite>(entity) {
            sprite.animation.pause();
            sprite.animation.set_frame_index(frame);
        }
    }
}
