//! Input-to-intent mapping shared by character controllers

use crate::foundation::math::Vec3;
use crate::input::{InputManager, KeyCode};

/// Turns raw input into the orientation and movement a character wants
///
/// Forward is −Z and right is +X in the character's own frame. The default
/// methods read the mouse-look accumulators and W/A/S/D plus arrow keys.
pub trait CharacterController {
    /// Yaw in radians the character should face
    fn desired_yaw(&self, input: &InputManager) -> f32 {
        input.mouse().yaw()
    }

    /// Pitch in radians the character should look at
    fn desired_pitch(&self, input: &InputManager) -> f32 {
        input.mouse().pitch()
    }

    /// Unit planar movement in the character's frame, or zero
    fn desired_translation(&self, input: &InputManager) -> Vec3 {
        let keyboard = input.keyboard();
        let axis = |positive: [KeyCode; 2], negative: [KeyCode; 2]| {
            let held = |keys: [KeyCode; 2]| keys.iter().any(|key| keyboard.is_key_down(*key));
            f32::from(u8::from(held(positive))) - f32::from(u8::from(held(negative)))
        };

        let right = axis([KeyCode::D, KeyCode::Right], [KeyCode::A, KeyCode::Left]);
        let back = axis([KeyCode::S, KeyCode::Down], [KeyCode::W, KeyCode::Up]);

        let movement = Vec3::new(right, 0.0, back);
        if movement == Vec3::zeros() {
            movement
        } else {
            movement.normalize()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use crate::testing;
    use approx::assert_relative_eq;

    struct Plain;
    impl CharacterController for Plain {}

    #[test]
    fn test_translation_from_keys() {
        let mut input = testing::input();
        assert_eq!(Plain.desired_translation(&input), Vec3::zeros());

        input.handle_event(InputEvent::KeyPressed(KeyCode::W));
        assert_eq!(Plain.desired_translation(&input), Vec3::new(0.0, 0.0, -1.0));

        input.handle_event(InputEvent::KeyPressed(KeyCode::Right));
        let diagonal = Plain.desired_translation(&input);
        assert_relative_eq!(diagonal.norm(), 1.0, epsilon = 1e-6);
        assert!(diagonal.x > 0.0 && diagonal.z < 0.0);

        input.handle_event(InputEvent::KeyPressed(KeyCode::S));
        assert_eq!(Plain.desired_translation(&input), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_orientation_from_mouse() {
        let mut input = testing::input();
        input.handle_event(InputEvent::MouseMoved { dx: -100.0, dy: 50.0 });

        assert_relative_eq!(Plain.desired_yaw(&input), 0.2, epsilon = 1e-6);
        assert_relative_eq!(Plain.desired_pitch(&input), -0.1, epsilon = 1e-6);
    }
}
