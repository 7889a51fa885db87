//! Raw input events

use super::{KeyCode, MouseButton};

/// Input events delivered by the windowing layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key was pressed
    KeyPressed(KeyCode),

    /// Key was released
    KeyReleased(KeyCode),

    /// Relative mouse movement (pointer-locked)
    MouseMoved {
        /// Horizontal movement in pixels
        dx: f64,
        /// Vertical movement in pixels
        dy: f64,
    },

    /// Mouse button event
    MouseButton {
        /// The mouse button that was pressed/released
        button: MouseButton,
        /// Whether the button was pressed (true) or released (false)
        pressed: bool,
    },

    /// The surface lost focus; every held key and button is released
    FocusLost,
}
