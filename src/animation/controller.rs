//! Animator state machines
//!
//! A controller file declares parameters, states, and predicate-driven
//! transitions; the description is immutable after load and a small
//! interpreter per entity walks it. State textures resolve through the asset
//! registry when the owning sprite swaps animation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::assets::AssetHandle;

/// Declared parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Float,
    Int,
    Bool,
}

/// A declared parameter with its default value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRecord {
    #[serde(rename = "type")]
    pub kind: ParamType,
    pub value: f32,
}

/// Comparison operator in a transition condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compare {
    Greater,
    Less,
    Equals,
    NotEquals,
}

impl Compare {
    #[must_use]
    pub fn evaluate(&self, value: f32, threshold: f32) -> bool {
        match self {
            Self::Greater => value > threshold,
            Self::Less => value < threshold,
            Self::Equals => (value - threshold).abs() < f32::EPSILON,
            Self::NotEquals => (value - threshold).abs() >= f32::EPSILON,
        }
    }
}

/// Predicate over the parameter dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub param: String,
    pub compare: Compare,
    pub threshold: f32,
}

/// One animation state: a sprite sheet and its playback rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDesc {
    pub name: String,
    pub texture: String,
    #[serde(rename = "FramesX")]
    pub frames_x: u32,
    #[serde(rename = "FramesY")]
    pub frames_y: u32,
    #[serde(rename = "FramesTotal")]
    pub frames_total: u32,
    #[serde(rename = "FramesPS")]
    pub fps: f32,
}

/// A transition between two named states.
///
/// Fires when the condition holds (if present) and the state has been active
/// for at least `time` seconds (if positive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDesc {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub time: f32,
}

/// Immutable controller description built at load time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerDesc {
    #[serde(rename = "Parameters", default)]
    pub parameters: BTreeMap<String, ParamRecord>,
    #[serde(rename = "States")]
    pub states: Vec<StateDesc>,
    #[serde(rename = "Transitions", default)]
    pub transitions: Vec<TransitionDesc>,
}

impl ControllerDesc {
    /// Parse a controller table from text
    ///
    /// # Errors
    ///
    /// Returns a format error for malformed tables or an empty state list
    pub fn from_str(text: &str) -> Result<Self, ControllerError> {
        let desc: ControllerDesc =
            ron::from_str(text).map_err(|e| ControllerError::Format(e.to_string()))?;
        if desc.states.is_empty() {
            return Err(ControllerError::Format(
                "controller declares no states".to_string(),
            ));
        }
        Ok(desc)
    }

    /// Load a controller table from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ControllerError> {
        let text =
            fs::read_to_string(path).map_err(|e| ControllerError::Io(e.to_string()))?;
        Self::from_str(&text)
    }

    /// Index of a state by name
    #[must_use]
    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name == name)
    }
}

/// Errors from controller loading
#[derive(Debug, Clone)]
pub enum ControllerError {
    /// IO error reading the file
    Io(String),
    /// Malformed controller table
    Format(String),
}

impl std::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Format(e) => write!(f, "Controller format error: {e}"),
        }
    }
}

impl std::error::Error for ControllerError {}

/// Per-entity interpreter over a shared controller description
pub struct Animator {
    /// Path of the controller table, kept for serialization
    pub controller_path: String,
    pub active: bool,
    desc: AssetHandle<ControllerDesc>,
    params: FxHashMap<String, f32>,
    current: usize,
    state_time: f32,
}

impl Animator {
    #[must_use]
    pub fn new(controller_path: impl Into<String>, desc: AssetHandle<ControllerDesc>) -> Self {
        let params = desc
            .parameters
            .iter()
            .map(|(name, record)| (name.clone(), record.value))
            .collect();
        Self {
            controller_path: controller_path.into(),
            active: true,
            desc,
            params,
            current: 0,
            state_time: 0.0,
        }
    }

    /// Set a parameter by name. Booleans use 0.0 / 1.0.
    pub fn set_parameter(&mut self, name: &str, value: f32) {
        self.params.insert(name.to_string(), value);
    }

    /// Current value of a parameter
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<f32> {
        self.params.get(name).copied()
    }

    /// The state the animator is currently in
    #[must_use]
    pub fn current_state(&self) -> &StateDesc {
        &self.desc.states[self.current]
    }

    /// Evaluate transitions once; returns the new state when one fires.
    ///
    /// Transitions out of the current state are checked in declaration
    /// order; the first whose condition holds and whose exit time has
    /// elapsed wins.
    pub fn update(&mut self, dt: f32) -> Option<StateDesc> {
        self.state_time += dt;
        let current_name = self.desc.states[self.current].name.clone();

        for transition in &self.desc.transitions {
            if transition.from != current_name {
                continue;
            }
            if transition.time > 0.0 && self.state_time < transition.time {
                continue;
            }
            if let Some(condition) = &transition.condition {
                let value = self.params.get(&condition.param).copied().unwrap_or(0.0);
                if !condition.compare.evaluate(value, condition.threshold) {
                    continue;
                }
            }
            if let Some(index) = self.desc.state_index(&transition.to) {
                self.current = index;
                self.state_time = 0.0;
                return Some(self.desc.states[index].clone());
            }
        }
        None
    }
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("controller_path", &self.controller_path)
            .field("state", &self.current_state().name)
            .field("state_time", &self.state_time)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_run_desc() -> ControllerDesc {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "Speed".to_string(),
            ParamRecord {
                kind: ParamType::Float,
                value: 0.0,
            },
        );
        ControllerDesc {
            parameters,
            states: vec![
                StateDesc {
                    name: "Idle".to_string(),
                    texture: "player_idle".to_string(),
                    frames_x: 4,
                    frames_y: 1,
                    frames_total: 4,
                    fps: 8.0,
                },
                StateDesc {
                    name: "Run".to_string(),
                    texture: "player_run".to_string(),
                    frames_x: 6,
                    frames_y: 1,
                    frames_total: 6,
                    fps: 12.0,
                },
            ],
            transitions: vec![
                TransitionDesc {
                    from: "Idle".to_string(),
                    to: "Run".to_string(),
                    condition: Some(Condition {
                        param: "Speed".to_string(),
                        compare: Compare::Greater,
                        threshold: 5.0,
                    }),
                    time: 0.0,
                },
                TransitionDesc {
                    from: "Run".to_string(),
                    to: "Idle".to_string(),
                    condition: Some(Condition {
                        param: "Speed".to_string(),
                        compare: Compare::Less,
                        threshold: 0.5,
                    }),
                    time: 0.0,
                },
            ],
        }
    }

    #[test]
    fn test_parameter_transition() {
        let desc = AssetHandle::new(idle_run_desc());
        let mut animator = Animator::new("player.controller", desc);
        assert_eq!(animator.current_state().name, "Idle");

        // Below threshold: no transition
        animator.set_parameter("Speed", 3.0);
        assert!(animator.update(1.0 / 60.0).is_none());
        assert_eq!(animator.current_state().name, "Idle");

        // Above threshold: Idle -> Run after one tick
        animator.set_parameter("Speed", 10.0);
        let new_state = animator.update(1.0 / 60.0).expect("transition fires");
        assert_eq!(new_state.name, "Run");
        assert_eq!(new_state.texture, "player_run");
        assert_eq!(animator.current_state().name, "Run");
    }

    #[test]
    fn test_exit_time_gates_transition() {
        let mut desc = idle_run_desc();
        desc.transitions[0].time = 0.5;
        let mut animator = Animator::new("player.controller", AssetHandle::new(desc));

        animator.set_parameter("Speed", 10.0);
        assert!(animator.update(0.2).is_none());
        assert!(animator.update(0.2).is_none());
        assert!(animator.update(0.2).is_some());
    }

    #[test]
    fn test_round_trip_through_table_text() {
        let desc = idle_run_desc();
        let text = ron::ser::to_string_pretty(&desc, ron::ser::PrettyConfig::default()).unwrap();
        let loaded = ControllerDesc::from_str(&text).unwrap();
        assert_eq!(loaded, desc);
    }

    #[test]
    fn test_empty_states_rejected() {
        let result = ControllerDesc::from_str("(States: [])");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_parameters_seed_dictionary() {
        let desc = AssetHandle::new(idle_run_desc());
        let animator = Animator::new("player.controller", desc);
        assert_eq!(animator.parameter("Speed"), Some(0.0));
        assert_eq!(animator.parameter("Missing"), None);
    }
}
