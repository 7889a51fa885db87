//! Demo configuration

use game_runtime::config::Config;
use game_runtime::input::{InputEvent, KeyCode};
use serde::{Deserialize, Serialize};

/// How the headless demo runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DemoConfig {
    /// Directory holding `game.json` and the scenes
    pub asset_dir: String,
    /// Frames to simulate in total
    pub frames: u32,
    /// Fixed frame delta in seconds
    pub delta_time: f32,
    /// Key presses and releases, by frame
    pub inputs: Vec<ScriptedInput>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            asset_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/assets").to_string(),
            frames: 240,
            delta_time: 1.0 / 60.0,
            inputs: vec![
                ScriptedInput::press(10, "w"),
                ScriptedInput::release(60, "w"),
                ScriptedInput::press(100, " "),
                ScriptedInput::release(102, " "),
            ],
        }
    }
}

impl Config for DemoConfig {}

impl DemoConfig {
    /// Events scheduled for `frame`, in file order
    pub fn events_at(&self, frame: u32) -> impl Iterator<Item = InputEvent> + '_ {
        self.inputs
            .iter()
            .filter(move |input| input.frame == frame)
            .filter_map(|input| {
                let event = input.event();
                if event.is_none() {
                    log::warn!("Demo: ignoring unknown key '{}'", input.key);
                }
                event
            })
    }
}

/// One scripted key transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Frame index the transition happens on
    pub frame: u32,
    /// DOM-style key name (`"w"`, `" "`, `"ArrowUp"`)
    pub key: String,
    /// Pressed or released
    #[serde(default = "pressed_by_default")]
    pub pressed: bool,
}

fn pressed_by_default() -> bool {
    true
}

impl ScriptedInput {
    fn press(frame: u32, key: &str) -> Self {
        Self { frame, key: key.to_string(), pressed: true }
    }

    fn release(frame: u32, key: &str) -> Self {
        Self { frame, key: key.to_string(), pressed: false }
    }

    /// The input event, if the key name is known
    pub fn event(&self) -> Option<InputEvent> {
        let key = KeyCode::from_key_name(&self.key)?;
        Some(if self.pressed {
            InputEvent::KeyPressed(key)
        } else {
            InputEvent::KeyReleased(key)
        })
    }
}
