use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerDragEvent,
    PointerMoveEvent,
};

/// Current input state for a single window.
///
/// Holds "is down" information, the pointer position, and the origin of the
/// drag in progress (if any).
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<Vec2>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,

    /// Button that started the current drag and where it went down.
    drag_origin: Option<(MouseButton, Vec2)>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    ///
    /// Returns a derived `InputEvent::PointerDragged` when the event is a pointer
    /// move while a button is held.
    pub fn apply_event(&mut self, ev: &InputEvent) -> Option<InputEvent> {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Focus loss mid-press never delivers the release.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                    self.drag_origin = None;
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { pos }) => {
                self.pointer_pos = Some(*pos);

                if let Some((button, start)) = self.drag_origin {
                    return Some(InputEvent::PointerDragged(PointerDragEvent {
                        button,
                        start,
                        current: *pos,
                        modifiers: self.modifiers,
                    }));
                }
            }

            InputEvent::PointerLeft => {
                // Drags continue outside the window; only the hover position is lost.
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(*key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                pos,
                modifiers,
            }) => {
                if pos.is_some() {
                    self.pointer_pos = *pos;
                }
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                        // A press at an unknown position cannot anchor a drag.
                        if let (None, Some(origin)) = (self.drag_origin, pos) {
                            self.drag_origin = Some((*button, *origin));
                        }
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                        if self.drag_origin.is_some_and(|(b, _)| b == *button) {
                            self.drag_origin = None;
                        }
                    }
                }
            }

            InputEvent::PointerDragged(_) => {}
        }

        None
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    /// Start position of the drag in progress.
    pub fn drag_start(&self) -> Option<Vec2> {
        self.drag_origin.map(|(_, start)| start)
    }
}
