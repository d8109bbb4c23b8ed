//! Event queue for decoupled communication
//!
//! Gameplay and collision systems push events during a tick; the scheduler
//! drains the queue at the end of the tick and routes each event to its
//! consumer (audio bus, camera shake, scene swap). Systems never call into
//! each other directly.

use hecs::Entity;

use crate::audio::VolumeKind;
use crate::renderer::ShakeKind;

/// Something that happened in the game world this tick
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum GameEvent {
    /// An entity took damage
    Damaged {
        entity: Entity,
        amount: f32,
    },
    /// An entity's health reached zero
    Killed {
        entity: Entity,
    },
    /// Schedule a one-shot sound by clip name
    PlaySound {
        clip: String,
    },
    /// Add intensity to one of the camera shake channels
    CameraShake {
        kind: ShakeKind,
        intensity: f32,
    },
    /// Change a mixer bus volume (slider widgets)
    VolumeChanged {
        bus: VolumeKind,
        volume: f32,
    },
    /// Swap to the scene stored at the given path
    SceneSwapRequested {
        path: String,
    },
    /// Toggle the pause state
    PauseToggled,
    /// Quit the game
    QuitRequested,
}

/// FIFO queue of game events, drained once per tick by the scheduler
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event for this tick
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every pending event, leaving the queue empty
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
