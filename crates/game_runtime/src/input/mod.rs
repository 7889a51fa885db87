//! Input management system
//!
//! The [`InputManager`] is fed raw [`InputEvent`]s by whatever owns the
//! window and answers polling queries from game objects during a frame.

pub mod event;

pub use event::InputEvent;

use std::collections::HashSet;

use crate::core::InputOptions;
use crate::render::Canvas;

/// Input manager bound to one render surface
pub struct InputManager {
    canvas: Canvas,
    options: InputOptions,
    keyboard: Keyboard,
    mouse: Mouse,
}

impl InputManager {
    /// Create an input manager listening to `canvas`
    pub fn new(canvas: Canvas, options: InputOptions) -> Self {
        log::debug!(
            "InputManager: bound to {}x{} canvas, sensitivity {}",
            canvas.width, canvas.height, options.mouse_sensitivity
        );
        Self {
            canvas,
            options,
            keyboard: Keyboard::default(),
            mouse: Mouse::default(),
        }
    }

    /// Apply one raw input event
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyPressed(key) => self.keyboard.set_key(key, true),
            InputEvent::KeyReleased(key) => self.keyboard.set_key(key, false),
            InputEvent::MouseMoved { dx, dy } => self.mouse.accumulate(dx, dy, &self.options),
            InputEvent::MouseButton { button, pressed } => self.mouse.set_button(button, pressed),
            InputEvent::FocusLost => {
                self.keyboard.release_all();
                self.mouse.buttons.clear();
            }
        }
    }

    /// Keyboard state
    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// Mouse state
    pub fn mouse(&self) -> &Mouse {
        &self.mouse
    }

    /// The surface this manager is bound to
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Active options
    pub fn options(&self) -> &InputOptions {
        &self.options
    }
}

/// Which keys are currently held
#[derive(Debug, Default, Clone)]
pub struct Keyboard {
    down: HashSet<KeyCode>,
}

impl Keyboard {
    /// Whether `key` is currently held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }

    fn release_all(&mut self) {
        self.down.clear();
    }
}

/// Accumulated mouse-look state
#[derive(Debug, Default, Clone)]
pub struct Mouse {
    yaw: f32,
    pitch: f32,
    buttons: HashSet<MouseButton>,
}

impl Mouse {
    /// Accumulated yaw in radians; moving the mouse right turns right
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Accumulated pitch in radians, clamped to the configured limit
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Whether `button` is currently held
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    fn accumulate(&mut self, dx: f64, dy: f64, options: &InputOptions) {
        self.yaw -= dx as f32 * options.mouse_sensitivity;
        self.pitch = (self.pitch - dy as f32 * options.mouse_sensitivity)
            .clamp(-options.pitch_limit, options.pitch_limit);
    }

    fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// E key
    E,
    /// Q key
    Q,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Shift key
    Shift,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

impl KeyCode {
    /// Map a DOM-style key name (`" "`, `"w"`, `"ArrowUp"`) to a key code
    pub fn from_key_name(name: &str) -> Option<Self> {
        let key = match name {
            " " | "Space" | "Spacebar" => Self::Space,
            "Shift" => Self::Shift,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            _ => match name.to_ascii_lowercase().as_str() {
                "a" => Self::A,
                "d" => Self::D,
                "e" => Self::E,
                "q" => Self::Q,
                "s" => Self::S,
                "w" => Self::W,
                _ => return None,
            },
        };
        Some(key)
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}
