//! Platform-agnostic input.
//!
//! `platform` turns winit window events into [`InputEvent`]s and
//! [`InputState`] folds them into held state, deriving pointer drags.

mod state;
mod types;

pub(crate) mod platform;

pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerDragEvent, PointerMoveEvent,
};
