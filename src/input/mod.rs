//! Input handling

mod bindings;
mod state;

pub use bindings::{Action, Bindings};
pub use state::Input;
