//! Shared fixtures for unit tests

use slotmap::SlotMap;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::assets::{AssetStore, MemoryAssetSource};
use crate::core::{GameManifest, InputOptions, RendererOptions};
use crate::foundation::collections::BodyHandle;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::foundation::time::FrameInfo;
use crate::game::{Game, GameError};
use crate::input::InputManager;
use crate::physics::{PhysicsBackend, PhysicsError, Ray, RayHit, RigidBodyOptions};
use crate::render::Canvas;
use crate::scene::{factory, GameObjectBehavior, GameObjectFactory, HookContext};

pub type HookLog = Rc<RefCell<Vec<String>>>;

pub fn hook_log() -> HookLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Behaviour that writes every hook it receives to a shared log
pub struct Recorder {
    label: String,
    log: HookLog,
}

impl Recorder {
    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{}", hook, self.label));
    }
}

impl GameObjectBehavior for Recorder {
    fn after_loaded(&mut self, _ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        self.record("after_loaded");
        Ok(())
    }

    fn before_unloaded(&mut self, _ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        self.record("before_unloaded");
        Ok(())
    }

    fn before_render(&mut self, _ctx: &mut HookContext<'_>, frame: &FrameInfo) -> Result<(), GameError> {
        self.log
            .borrow_mut()
            .push(format!("before_render:{}@{}", self.label, frame.time));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Factory for [`Recorder`]s labelled with the object's name
pub fn recorder_factory(log: &HookLog) -> GameObjectFactory {
    let log = Rc::clone(log);
    factory(move |options| {
        Ok(Box::new(Recorder {
            label: options.name.clone().unwrap_or_default(),
            log: Rc::clone(&log),
        }))
    })
}

/// Like [`recorder_factory`], but also logs `build:<name>` when constructed
pub fn building_recorder_factory(log: &HookLog) -> GameObjectFactory {
    let log = Rc::clone(log);
    let inner = recorder_factory(&log);
    factory(move |options| {
        log.borrow_mut()
            .push(format!("build:{}", options.name.as_deref().unwrap_or_default()));
        inner(options)
    })
}

/// Behaviour with no hooks, distinguishable by its payload
#[derive(Debug, PartialEq, Eq)]
pub struct Marker(pub u32);

impl GameObjectBehavior for Marker {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub struct ScriptedBody {
    pub options: RigidBodyOptions,
    pub translation: Vec3,
    pub rotation: Quat,
    pub linvel: Vec3,
}

/// Everything a [`ScriptedPhysics`] was told, plus the answers it gives
#[derive(Default)]
pub struct ScriptedState {
    pub bodies: SlotMap<BodyHandle, ScriptedBody>,
    pub impulses: Vec<(BodyHandle, Vec3)>,
    pub rotations: Vec<(BodyHandle, Quat)>,
    pub rays: Vec<(Ray, f32, bool)>,
    pub ground_hit: bool,
    pub steps: usize,
}

impl ScriptedState {
    pub fn set_translation(&mut self, handle: BodyHandle, translation: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.translation = translation;
        }
    }

    pub fn set_linvel(&mut self, handle: BodyHandle, linvel: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.linvel = linvel;
        }
    }
}

/// Physics backend that records commands and never simulates
#[derive(Default)]
pub struct ScriptedPhysics {
    state: Rc<RefCell<ScriptedState>>,
}

impl ScriptedPhysics {
    /// A backend plus a handle to inspect and script it after it is boxed
    pub fn shared() -> (Self, Rc<RefCell<ScriptedState>>) {
        let physics = Self::default();
        let state = Rc::clone(&physics.state);
        (physics, state)
    }
}

impl PhysicsBackend for ScriptedPhysics {
    fn create_rigid_body(
        &mut self,
        options: &RigidBodyOptions,
        transform: &Transform,
    ) -> Result<BodyHandle, PhysicsError> {
        options.colliders().iter().try_for_each(|collider| collider.validate())?;
        Ok(self.state.borrow_mut().bodies.insert(ScriptedBody {
            options: options.clone(),
            translation: transform.position,
            rotation: transform.rotation,
            linvel: Vec3::zeros(),
        }))
    }

    fn remove_rigid_body(&mut self, handle: BodyHandle) -> bool {
        self.state.borrow_mut().bodies.remove(handle).is_some()
    }

    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) -> Result<(), PhysicsError> {
        let mut state = self.state.borrow_mut();
        let body = state.bodies.get_mut(handle).ok_or(PhysicsError::UnknownBody(handle))?;
        body.rotation = rotation;
        state.rotations.push((handle, rotation));
        Ok(())
    }

    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> Result<(), PhysicsError> {
        let mut state = self.state.borrow_mut();
        if !state.bodies.contains_key(handle) {
            return Err(PhysicsError::UnknownBody(handle));
        }
        state.impulses.push((handle, impulse));
        Ok(())
    }

    fn translation(&self, handle: BodyHandle) -> Option<Vec3> {
        self.state.borrow().bodies.get(handle).map(|b| b.translation)
    }

    fn rotation(&self, handle: BodyHandle) -> Option<Quat> {
        self.state.borrow().bodies.get(handle).map(|b| b.rotation)
    }

    fn linvel(&self, handle: BodyHandle) -> Option<Vec3> {
        self.state.borrow().bodies.get(handle).map(|b| b.linvel)
    }

    fn cast_ray(&self, ray: &Ray, max_toi: f32, solid: bool) -> Option<RayHit> {
        let mut state = self.state.borrow_mut();
        state.rays.push((*ray, max_toi, solid));
        state.ground_hit.then(|| RayHit {
            body: None,
            time_of_impact: 0.0,
            point: ray.origin,
        })
    }

    fn step(&mut self, _dt: f32) {
        self.state.borrow_mut().steps += 1;
    }

    fn body_count(&self) -> usize {
        self.state.borrow().bodies.len()
    }
}

pub fn input() -> InputManager {
    InputManager::new(Canvas::new(800, 600), InputOptions::default())
}

const BASE_URL: &str = "mem://game";

const PLAIN_SCENE: &str = r#"{
    "background": "black",
    "gameObjects": [
        { "name": "root", "gameObjects": [ { "name": "leaf" } ] }
    ]
}"#;

const FIRST_SCENE: &str = r#"{
    "gameObjects": [
        { "type": "Recorder", "name": "a", "gameObjects": [ { "type": "Recorder", "name": "b" } ] }
    ]
}"#;

const SECOND_SCENE: &str = r#"{
    "gameObjects": [ { "type": "Recorder", "name": "c" } ]
}"#;

fn memory_source(manifest: &GameManifest) -> MemoryAssetSource {
    let manifest = serde_json::to_string(manifest).unwrap();
    MemoryAssetSource::new()
        .with_file(format!("{}/game.json", BASE_URL), manifest)
        .with_file(format!("{}/scenes/plain.json", BASE_URL), PLAIN_SCENE)
        .with_file(format!("{}/scenes/first.json", BASE_URL), FIRST_SCENE)
        .with_file(format!("{}/scenes/second.json", BASE_URL), SECOND_SCENE)
}

pub fn memory_assets() -> AssetStore {
    AssetStore::new(BASE_URL, Box::new(memory_source(&GameManifest::default())))
}

/// A game served from memory whose scenes log every hook
///
/// Scenes: `first` is `a(b)`, `second` is `c`, `plain` has no behaviours.
pub fn memory_game_with(manifest: GameManifest) -> (Game, HookLog) {
    let mut manifest = manifest
        .with_scene("first", "scenes/first.json")
        .with_scene("second", "scenes/second.json")
        .with_scene("plain", "scenes/plain.json");
    manifest.renderer_options = RendererOptions::default().with_size(320, 240);

    let log = hook_log();
    let mut game = Game::new(BASE_URL)
        .unwrap()
        .with_asset_source(memory_source(&manifest))
        .with_physics_factory(|_| Box::new(ScriptedPhysics::default()));
    game.register_game_object_classes([("Recorder", building_recorder_factory(&log))]);
    (game, log)
}

pub fn memory_game() -> (Game, HookLog) {
    memory_game_with(GameManifest::default())
}
