//! Entity store and component model
//!
//! Built on top of the hecs ECS library

mod components;
mod entity;
pub mod hierarchy;

pub use components::{
    AudioEmitter, ColliderBox, Gravity, Health, Layer, Name, RectCollider, RigidBody, Tag, Text,
    TextUi, Transform, UiRoot, TOUCH_DEBOUNCE,
};
pub use entity::{Scene, DEFAULT_LAYER, DEFAULT_TAG};
pub use hierarchy::{Children, HierarchyError, Parent};
