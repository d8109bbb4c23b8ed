//! Gameplay components and their per-tick systems
//!
//! Everything here runs in the scheduler's script phase, before physics
//! integration and transform propagation. Order within the phase is the
//! fixed table the engine walks.

pub mod ai;
pub mod effects;
pub mod health;
pub mod particles;
pub mod player;
pub mod spawner;
pub mod splitting;
pub mod video;
pub mod widgets;

pub use ai::{AiBehavior, AiState};
pub use effects::{Explosion, FloatUp, VfxFollow};
pub use particles::Particles;
pub use player::Player;
pub use spawner::Spawner;
pub use splitting::Splitting;
pub use video::Video;
pub use widgets::{Button, ButtonAction, PauseMenuButton, Slider};
