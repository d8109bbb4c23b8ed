//! Core engine module
//!
//! The engine context, the fixed-step scheduler, events, and frame stats

mod debug;
mod engine;
mod events;
mod time;

pub use debug::FrameStats;
pub use engine::{Engine, EngineConfig, EngineContext, Game, GameState};
pub use events::{EventQueue, GameEvent};
pub use time::{Time, FIXED_DT};
