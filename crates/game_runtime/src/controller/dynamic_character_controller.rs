//! Physics-driven character controller
//!
//! The character is a dynamic capsule whose orientation is set straight from
//! mouse look every frame, which moves by impulses, and which jumps when a
//! short probe below the capsule finds ground.

use serde::{Deserialize, Serialize};
use std::any::Any;

use super::CharacterController;
use crate::foundation::collections::BodyHandle;
use crate::foundation::math::{euler, Vec3};
use crate::foundation::time::FrameInfo;
use crate::game::GameError;
use crate::input::KeyCode;
use crate::physics::{
    BodyType, ColliderOptions, EnabledRotations, PhysicsBackend, Ray, RigidBodyOptions,
};
use crate::scene::{self, GameObject, GameObjectBehavior, GameObjectFactory, GameObjectOptions, HookContext};

/// Type name the controller is registered under
pub const TYPE_NAME: &str = "DynamicCharacterController";

/// Scale applied to the unit movement vector before it becomes an impulse
pub const MOVEMENT_IMPULSE: f32 = 400.0;
/// Vertical impulse of a jump
pub const JUMP_IMPULSE: f32 = 1300.0;
/// Minimum milliseconds between two jumps
pub const JUMP_COOLDOWN_MS: f64 = 1500.0;
/// Vertical velocity below which the character counts as falling
pub const FALLING_THRESHOLD: f32 = -0.1;

const GROUND_PROBE_GAP: f32 = 0.05;
const GROUND_PROBE_DIRECTION_Y: f32 = -0.1;
const GROUND_PROBE_MAX_TOI: f32 = 0.01;

/// Capsule geometry; unset fields keep their defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapsuleOptions {
    /// Half the length of the cylindrical segment
    pub half_height: f32,
    /// Radius of the caps
    pub radius: f32,
    /// Mass density
    pub density: f32,
}

impl Default for CapsuleOptions {
    fn default() -> Self {
        Self {
            half_height: 0.45,
            radius: 0.4,
            density: 500.0,
        }
    }
}

/// The `controllerOptions` key of a controller's game-object options
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerOptions {
    /// Collider geometry
    pub capsule: CapsuleOptions,
}

impl ControllerOptions {
    /// Rigid body the controller wants when the caller specifies nothing
    pub fn rigid_body_defaults(&self) -> RigidBodyOptions {
        let CapsuleOptions { half_height, radius, density } = self.capsule;
        RigidBodyOptions {
            body_type: Some(BodyType::Dynamic),
            colliders: Some(vec![ColliderOptions::Capsule { half_height, radius, density }]),
            enabled_rotations: Some(EnabledRotations::YAW_ONLY),
        }
    }

    /// Distance from the body's center to just below the capsule's bottom
    fn probe_offset(&self) -> f32 {
        self.capsule.half_height + self.capsule.radius + GROUND_PROBE_GAP
    }
}

/// Whether a jump may start now
///
/// There is no grounded/airborne state: each frame decides from scratch.
pub fn jump_permitted(time_since_last_jump: f64, cooldown: f64, ground_hit: bool, vertical_velocity: f32) -> bool {
    time_since_last_jump > cooldown && ground_hit && vertical_velocity >= FALLING_THRESHOLD
}

/// Character driven by a dynamic rigid body
#[derive(Debug, Clone)]
pub struct DynamicCharacterController {
    options: ControllerOptions,
    last_jump_time: f64,
    jump_cooldown: f64,
    jump_impulse: f32,
}

impl DynamicCharacterController {
    /// Create a controller that has never jumped
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            options,
            last_jump_time: 0.0,
            jump_cooldown: JUMP_COOLDOWN_MS,
            jump_impulse: JUMP_IMPULSE,
        }
    }

    /// Build a controller from game-object options
    ///
    /// Reads `controllerOptions` and fills every rigid-body field the caller
    /// left unset with the controller's capsule defaults.
    pub fn configure(options: &mut GameObjectOptions) -> Result<Self, GameError> {
        let controller_options: ControllerOptions = options
            .extra_as("controllerOptions")
            .map_err(|e| GameError::InvalidGameObjectOptions(format!("controllerOptions: {}", e)))?
            .unwrap_or_default();

        let caller = options.rigid_body.take().unwrap_or_default();
        options.rigid_body = Some(caller.merged_over(controller_options.rigid_body_defaults()));

        Ok(Self::new(controller_options))
    }

    /// Factory suitable for a [`GameObjectRegistry`](crate::scene::GameObjectRegistry)
    pub fn factory() -> GameObjectFactory {
        scene::factory(|options| Ok(Box::new(Self::configure(options)?)))
    }

    /// Merged controller options
    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Frame time (ms) of the last jump
    pub fn last_jump_time(&self) -> f64 {
        self.last_jump_time
    }

    fn ground_hit(&self, physics: &dyn PhysicsBackend, body: BodyHandle) -> bool {
        let Some(position) = physics.translation(body) else {
            return false;
        };
        let origin = position - Vec3::new(0.0, self.options.probe_offset(), 0.0);
        physics
            .cast_ray(&Ray::new(origin, Vec3::new(0.0, GROUND_PROBE_DIRECTION_Y, 0.0)), GROUND_PROBE_MAX_TOI, true)
            .is_some()
    }
}

impl Default for DynamicCharacterController {
    fn default() -> Self {
        Self::new(ControllerOptions::default())
    }
}

impl CharacterController for DynamicCharacterController {}

impl GameObjectBehavior for DynamicCharacterController {
    fn after_loaded(&mut self, ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        if ctx.game_object().and_then(GameObject::rigid_body).is_none() {
            log::warn!("DynamicCharacterController: object {:?} has no rigid body and will not move", ctx.id);
        }
        Ok(())
    }

    fn before_render(&mut self, ctx: &mut HookContext<'_>, frame: &FrameInfo) -> Result<(), GameError> {
        let Some(body) = ctx.game_object().and_then(GameObject::rigid_body) else {
            return Ok(());
        };
        let input = ctx.input;
        let physics = ctx.physics();

        let yaw = self.desired_yaw(input);
        let pitch = self.desired_pitch(input);
        physics.set_rotation(body, euler::from_yxz(pitch, yaw, 0.0))?;

        let movement = euler::rotate_about_y(&self.desired_translation(input), yaw) * MOVEMENT_IMPULSE;
        physics.apply_impulse(body, movement)?;

        if !input.keyboard().is_key_down(KeyCode::Space) {
            return Ok(());
        }

        let time_since_last_jump = frame.time - self.last_jump_time;
        if time_since_last_jump <= self.jump_cooldown {
            return Ok(());
        }

        let ground_hit = self.ground_hit(physics, body);
        let vertical_velocity = physics.linvel(body).map_or(0.0, |v| v.y);
        if jump_permitted(time_since_last_jump, self.jump_cooldown, ground_hit, vertical_velocity) {
            physics.apply_impulse(body, Vec3::new(0.0, self.jump_impulse, 0.0))?;
            self.last_jump_time = frame.time;
            log::debug!("DynamicCharacterController: jump at {:.0} ms", frame.time);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use crate::input::{InputEvent, InputManager};
    use crate::scene::{GameObjectDescription, GameObjectRegistry, ListSceneGraph, Scene, SceneDescription};
    use crate::testing::{self, ScriptedPhysics, ScriptedState};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Rig {
        scene: Scene,
        state: Rc<RefCell<ScriptedState>>,
        input: InputManager,
        player: crate::foundation::collections::GameObjectId,
        body: BodyHandle,
    }

    impl Rig {
        fn new(options_json: &str) -> Self {
            let mut registry = GameObjectRegistry::new();
            registry.register(TYPE_NAME, DynamicCharacterController::factory());
            let options: GameObjectOptions = serde_json::from_str(options_json).unwrap();
            let description = SceneDescription::default()
                .with_game_object(GameObjectDescription::new(options).of_type(TYPE_NAME));
            let (physics, state) = ScriptedPhysics::shared();
            let scene = Scene::from_description(
                "rig",
                description,
                &registry,
                Box::new(ListSceneGraph::default()),
                Box::new(physics),
            )
            .unwrap();
            let player = scene.root_game_objects()[0];
            let body = scene.get(player).unwrap().rigid_body().unwrap();

            Self { scene, state, input: testing::input(), player, body }
        }

        fn frame(&mut self, time: f64) {
            self.scene
                .fire_before_render(&self.input, &FrameInfo::new(1.0 / 60.0, time))
                .unwrap();
        }

        fn controller(&mut self) -> &mut DynamicCharacterController {
            self.scene.get_mut(self.player).unwrap().behavior_mut().unwrap()
        }

        fn jumps(&self) -> usize {
            self.state
                .borrow()
                .impulses
                .iter()
                .filter(|(_, impulse)| impulse.y == JUMP_IMPULSE)
                .count()
        }
    }

    fn ready_to_jump() -> Rig {
        let mut rig = Rig::new("{}");
        rig.input.handle_event(InputEvent::KeyPressed(KeyCode::Space));
        rig.state.borrow_mut().ground_hit = true;
        rig
    }

    #[test]
    fn test_capsule_merge_is_field_level() {
        let rig = Rig::new(r#"{ "controllerOptions": { "capsule": { "radius": 0.9 } } }"#);
        let options = rig.scene.get(rig.player).unwrap().options().clone();

        assert_eq!(
            options.rigid_body.unwrap().colliders(),
            &[ColliderOptions::Capsule { half_height: 0.45, radius: 0.9, density: 500.0 }]
        );
        let controller = rig.scene.get(rig.player).unwrap().behavior::<DynamicCharacterController>().unwrap();
        assert_eq!(controller.options().capsule.half_height, 0.45);
        assert_eq!(controller.options().capsule.radius, 0.9);
    }

    #[test]
    fn test_caller_rigid_body_fields_win() {
        let rig = Rig::new(r#"{ "rigidBody": { "type": "kinematicPositionBased" } }"#);
        let body = rig.state.borrow().bodies[rig.body].options.clone();

        assert_eq!(body.body_type(), BodyType::KinematicPositionBased);
        assert_eq!(body.enabled_rotations(), EnabledRotations::YAW_ONLY);
        assert_eq!(body.colliders(), &[ColliderOptions::Capsule { half_height: 0.45, radius: 0.4, density: 500.0 }]);
    }

    #[test]
    fn test_malformed_controller_options_fail() {
        let mut options: GameObjectOptions =
            serde_json::from_str(r#"{ "controllerOptions": { "capsule": { "radius": "wide" } } }"#).unwrap();

        assert!(matches!(
            DynamicCharacterController::configure(&mut options),
            Err(GameError::InvalidGameObjectOptions(_))
        ));
    }

    #[test]
    fn test_jump_respects_cooldown() {
        let t0 = 10_000.0;
        let mut rig = ready_to_jump();
        rig.controller().last_jump_time = t0;

        rig.frame(t0 + 1499.0);
        assert_eq!(rig.jumps(), 0);
        assert_eq!(rig.controller().last_jump_time(), t0);

        rig.frame(t0 + 1501.0);
        assert_eq!(rig.jumps(), 1);
        assert_eq!(rig.controller().last_jump_time(), t0 + 1501.0);

        rig.frame(t0 + 1600.0);
        assert_eq!(rig.jumps(), 1);
    }

    #[test]
    fn test_no_jump_while_falling() {
        let mut rig = ready_to_jump();
        rig.state.borrow_mut().set_linvel(rig.body, Vec3::new(0.0, -0.2, 0.0));

        rig.frame(5000.0);

        assert_eq!(rig.jumps(), 0);
        assert_eq!(rig.controller().last_jump_time(), 0.0);
    }

    #[test]
    fn test_no_jump_without_ground() {
        let mut rig = ready_to_jump();
        rig.state.borrow_mut().ground_hit = false;

        rig.frame(5000.0);

        assert_eq!(rig.jumps(), 0);
    }

    #[test]
    fn test_no_jump_without_key() {
        let mut rig = ready_to_jump();
        rig.input.handle_event(InputEvent::KeyReleased(KeyCode::Space));

        rig.frame(5000.0);

        assert_eq!(rig.jumps(), 0);
        assert!(rig.state.borrow().rays.is_empty());
    }

    #[test]
    fn test_ground_probe_below_capsule() {
        let mut rig = ready_to_jump();
        rig.state.borrow_mut().set_translation(rig.body, Vec3::new(1.0, 2.0, 3.0));

        rig.frame(5000.0);

        let state = rig.state.borrow();
        let (ray, max_toi, solid) = state.rays[0];
        assert_relative_eq!(ray.origin, Vec3::new(1.0, 2.0 - 0.45 - 0.4 - 0.05, 3.0), epsilon = 1e-6);
        assert_eq!(ray.direction, Vec3::new(0.0, -0.1, 0.0));
        assert_eq!(max_toi, 0.01);
        assert!(solid);
    }

    #[test]
    fn test_forward_follows_yaw() {
        let mut rig = Rig::new("{}");
        rig.input.handle_event(InputEvent::KeyPressed(KeyCode::W));
        rig.frame(16.0);
        rig.input.handle_event(InputEvent::MouseMoved {
            dx: f64::from(-HALF_PI / testing::input().options().mouse_sensitivity),
            dy: 0.0,
        });
        rig.frame(32.0);

        let state = rig.state.borrow();
        assert_relative_eq!(state.impulses[0].1, Vec3::new(0.0, 0.0, -MOVEMENT_IMPULSE), epsilon = 1e-3);
        assert_relative_eq!(state.impulses[1].1, Vec3::new(-MOVEMENT_IMPULSE, 0.0, 0.0), epsilon = 1e-2);

        let (_, rotation) = state.rotations[1];
        assert_relative_eq!(rotation.angle(), HALF_PI, epsilon = 1e-4);
    }

    #[test]
    fn test_missing_body_is_skipped_quietly() {
        let description = SceneDescription::default().with_game_object(
            GameObjectDescription::new(GameObjectOptions::named("ghost"))
                .with_factory(scene::factory(|_| Ok(Box::new(DynamicCharacterController::default())))),
        );
        let (physics, state) = ScriptedPhysics::shared();
        let mut scene = Scene::from_description(
            "ghost",
            description,
            &GameObjectRegistry::new(),
            Box::new(ListSceneGraph::default()),
            Box::new(physics),
        )
        .unwrap();
        let mut input = testing::input();
        input.handle_event(InputEvent::KeyPressed(KeyCode::Space));

        scene.fire_after_loaded(&input).unwrap();
        for frame in 0..3 {
            scene
                .fire_before_render(&input, &FrameInfo::new(1.0 / 60.0, 10_000.0 + f64::from(frame)))
                .unwrap();
        }

        assert!(state.borrow().bodies.is_empty());
        assert!(state.borrow().impulses.is_empty());
        assert!(state.borrow().rotations.is_empty());
    }

    #[test]
    fn test_jump_predicate() {
        assert!(jump_permitted(1501.0, 1500.0, true, 0.0));
        assert!(jump_permitted(1501.0, 1500.0, true, -0.1));
        assert!(!jump_permitted(1500.0, 1500.0, true, 0.0));
        assert!(!jump_permitted(2000.0, 1500.0, false, 0.0));
        assert!(!jump_permitted(2000.0, 1500.0, true, -0.11));
    }
}
