//! Audio bus
//!
//! Engine-side trigger/volume/ducking interface over rodio. Clips are raw
//! encoded bytes shared out of the asset registry; one-shots decode on
//! trigger and detach, music loops hold a named sink. Device control beyond
//! opening the default output stream is out of scope.

use std::io::Cursor;

use rodio::{mixer::Mixer, Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use rustc_hash::FxHashMap;

use crate::assets::AssetHandle;

/// The three mixer buses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    Master,
    Bgm,
    Sfx,
}

/// Rate at which a ducked bus gain recovers toward 1, per second
const DUCK_RECOVERY_RATE: f32 = 2.0;

#[derive(Debug, Clone, Copy)]
struct DuckState {
    gain: f32,
    hold_remaining: f32,
}

impl Default for DuckState {
    fn default() -> Self {
        Self {
            gain: 1.0,
            hold_remaining: 0.0,
        }
    }
}

/// Pure volume state: per-bus levels plus temporary ducking gains.
///
/// Kept separate from the device-facing bus so volume math is testable
/// without an output device.
#[derive(Debug)]
pub struct BusVolumes {
    master: f32,
    bgm: f32,
    sfx: f32,
    ducks: [DuckState; 3],
    muted: bool,
}

impl BusVolumes {
    #[must_use]
    pub fn new() -> Self {
        Self {
            master: 1.0,
            bgm: 1.0,
            sfx: 1.0,
            ducks: [DuckState::default(); 3],
            muted: false,
        }
    }

    pub fn set(&mut self, kind: VolumeKind, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        match kind {
            VolumeKind::Master => self.master = volume,
            VolumeKind::Bgm => self.bgm = volume,
            VolumeKind::Sfx => self.sfx = volume,
        }
    }

    #[must_use]
    pub fn get(&self, kind: VolumeKind) -> f32 {
        match kind {
            VolumeKind::Master => self.master,
            VolumeKind::Bgm => self.bgm,
            VolumeKind::Sfx => self.sfx,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Temporarily multiply a bus by `factor`, holding for `seconds` before
    /// the gain recovers at a fixed rate
    pub fn duck(&mut self, kind: VolumeKind, factor: f32, seconds: f32) {
        let duck = &mut self.ducks[kind as usize];
        duck.gain = factor.clamp(0.0, 1.0);
        duck.hold_remaining = seconds.max(0.0);
    }

    /// Advance duck hold timers and recovery
    pub fn update(&mut self, dt: f32) {
        for duck in &mut self.ducks {
            if duck.hold_remaining > 0.0 {
                duck.hold_remaining = (duck.hold_remaining - dt).max(0.0);
            } else if duck.gain < 1.0 {
                duck.gain = (duck.gain + DUCK_RECOVERY_RATE * dt).min(1.0);
            }
        }
    }

    /// Final gain for a bus: master level and duck times the bus's own
    #[must_use]
    pub fn effective(&self, kind: VolumeKind) -> f32 {
        if self.muted {
            return 0.0;
        }
        let master = self.master * self.ducks[VolumeKind::Master as usize].gain;
        if kind == VolumeKind::Master {
            return master;
        }
        master * self.get(kind) * self.ducks[kind as usize].gain
    }
}

impl Default for BusVolumes {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero-copy reader over registry clip bytes
struct ClipBytes(AssetHandle<Vec<u8>>);

impl AsRef<[u8]> for ClipBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.get()
    }
}

/// Device-facing audio bus
pub struct AudioBus {
    /// The output stream (must be kept alive)
    _stream: OutputStream,
    mixer: Mixer,
    /// Registered clips by name
    clips: FxHashMap<String, AssetHandle<Vec<u8>>>,
    /// Named looping sinks (music)
    loops: FxHashMap<String, Sink>,
    pub volumes: BusVolumes,
}

impl AudioBus {
    /// Open the default output device
    ///
    /// # Errors
    ///
    /// Returns an error if no audio output device is available
    pub fn new() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::from_default_device()
            .map_err(|_| AudioError::NoDevice)?
            .open_stream()
            .map_err(|_| AudioError::NoDevice)?;
        let mixer = stream.mixer().clone();

        Ok(Self {
            _stream: stream,
            mixer,
            clips: FxHashMap::default(),
            loops: FxHashMap::default(),
            volumes: BusVolumes::new(),
        })
    }

    /// Make a registry clip triggerable by name
    pub fn register_clip(&mut self, name: impl Into<String>, bytes: AssetHandle<Vec<u8>>) {
        self.clips.insert(name.into(), bytes);
    }

    fn decode(&self, name: &str) -> Option<Decoder<Cursor<ClipBytes>>> {
        let bytes = match self.clips.get(name) {
            Some(bytes) => bytes.clone(),
            None => {
                log::warn!("audio clip not registered: {name}");
                return None;
            }
        };
        match Decoder::new(Cursor::new(ClipBytes(bytes))) {
            Ok(decoder) => Some(decoder),
            Err(e) => {
                log::warn!("audio clip {name} failed to decode: {e}");
                None
            }
        }
    }

    /// Fire a one-shot on the SFX bus. Missing names are a no-op.
    pub fn trigger(&mut self, name: &str) {
        let Some(source) = self.decode(name) else {
            return;
        };
        let sink = Sink::connect_new(&self.mixer);
        sink.set_volume(self.volumes.effective(VolumeKind::Sfx));
        sink.append(source);
        sink.detach();
    }

    /// Start (or restart) a named loop on the BGM bus
    pub fn play_music(&mut self, name: &str) {
        self.stop_music(name);
        let Some(source) = self.decode(name) else {
            return;
        };
        let sink = Sink::connect_new(&self.mixer);
        sink.set_volume(self.volumes.effective(VolumeKind::Bgm));
        sink.append(source.repeat_infinite());
        self.loops.insert(name.to_string(), sink);
    }

    /// Stop a named loop
    pub fn stop_music(&mut self, name: &str) {
        if let Some(sink) = self.loops.remove(name) {
            sink.stop();
        }
    }

    /// Duck a bus: temporary gain with a hold window, recovering afterwards
    pub fn duck(&mut self, kind: VolumeKind, factor: f32, seconds: f32) {
        self.volumes.duck(kind, factor, seconds);
    }

    /// Advance duck recovery and push volumes onto live loops
    pub fn update(&mut self, dt: f32) {
        self.volumes.update(dt);
        let bgm = self.volumes.effective(VolumeKind::Bgm);
        self.loops.retain(|_, sink| !sink.empty());
        for sink in self.loops.values() {
            sink.set_volume(bgm);
        }
    }

    /// Pause every live loop (engine pause)
    pub fn pause_all(&self) {
        for sink in self.loops.values() {
            sink.pause();
        }
    }

    /// Resume every live loop
    pub fn resume_all(&self) {
        for sink in self.loops.values() {
            sink.play();
        }
    }

    /// Duck everything briefly around a scene swap
    pub fn duck_for_transition(&mut self) {
        self.duck(VolumeKind::Master, 0.2, 0.3);
    }
}

/// Errors from the audio bus
#[derive(Debug, Clone)]
pub enum AudioError {
    /// No audio output device is available
    NoDevice,
    /// IO error reading a clip
    Io(String),
    /// Clip could not be decoded
    Decode(String),
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDevice => write!(f, "no audio output device available"),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Decode(e) => write!(f, "Decode error: {e}"),
        }
    }
}

impl std::error::Error for AudioError {}
