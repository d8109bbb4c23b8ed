//! Audio playback

mod manager;

pub use manager::{AudioBus, AudioError, BusVolumes, VolumeKind};
