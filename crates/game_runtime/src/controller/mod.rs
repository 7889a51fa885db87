//! Character controllers
//!
//! [`CharacterController`] maps input to intent (where to look, where to go).
//! [`DynamicCharacterController`] turns that intent into impulses on a
//! dynamic capsule and adds cooldown-gated, ground-checked jumping.

mod character_controller;
mod dynamic_character_controller;

pub use character_controller::CharacterController;
pub use dynamic_character_controller::{
    jump_permitted, CapsuleOptions, ControllerOptions, DynamicCharacterController, FALLING_THRESHOLD,
    JUMP_COOLDOWN_MS, JUMP_IMPULSE, MOVEMENT_IMPULSE, TYPE_NAME as DYNAMIC_CHARACTER_CONTROLLER,
};
