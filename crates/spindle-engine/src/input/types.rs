use crate::coords::Vec2;

/// Keyboard key identifier.
///
/// Only the keys the runtime and demos react to have variants; everything
/// else arrives as `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Pointer move event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub pos: Vec2,
}

/// Pointer button event.
///
/// `pos` is the last known pointer position; `None` when no cursor motion has
/// been seen since the pointer entered the window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub pos: Option<Vec2>,
    pub modifiers: Modifiers,
}

/// Pointer moved while a button is held.
///
/// `start` is where the button went down; it stays fixed for the whole drag.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerDragEvent {
    pub button: MouseButton,
    pub start: Vec2,
    pub current: Vec2,
    pub modifiers: Modifiers,
}

impl PointerDragEvent {
    /// Distance from the drag start, in logical pixels.
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.current - self.start
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),

    /// Derived by `InputState`; never produced by platform translation.
    PointerDragged(PointerDragEvent),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}
