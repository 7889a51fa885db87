//! Game objects: nodes of a scene's logical tree
//!
//! A [`GameObject`] is plain data living in its scene's arena. Custom logic is
//! attached through a boxed [`GameObjectBehavior`] whose lifecycle hooks run
//! with a [`HookContext`] giving access to the rest of the scene.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeSet;

use super::Scene;
use crate::foundation::collections::{BodyHandle, GameObjectId};
use crate::foundation::math::{euler, Transform, Vec3};
use crate::foundation::time::FrameInfo;
use crate::game::GameError;
use crate::input::InputManager;
use crate::physics::{PhysicsBackend, RigidBodyOptions};

/// Non-owning link from a node to whatever holds it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// Root-level object owned by the scene
    Scene,
    /// Child of another game object
    GameObject(GameObjectId),
}

/// Options a game object is constructed from
///
/// Known keys are typed; anything else is kept verbatim in `extra` for
/// behaviours to interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameObjectOptions {
    /// Optional, non-unique name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tag set
    pub tags: BTreeSet<String>,
    /// Local position
    pub position: [f32; 3],
    /// Local rotation as Euler angles in radians, applied X then Y then Z
    pub rotation: [f32; 3],
    /// Local scale
    pub scale: [f32; 3],
    /// Rigid body the scene creates for this object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rigid_body: Option<RigidBodyOptions>,
    /// Every other key of the description
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for GameObjectOptions {
    fn default() -> Self {
        Self {
            name: None,
            tags: BTreeSet::new(),
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            rigid_body: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl GameObjectOptions {
    /// Options with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Set the local position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = [x, y, z];
        self
    }

    /// Local transform described by these options
    pub fn transform(&self) -> Transform {
        let [px, py, pz] = self.position;
        let [rx, ry, rz] = self.rotation;
        let [sx, sy, sz] = self.scale;
        Transform {
            position: Vec3::new(px, py, pz),
            rotation: euler::from_xyz(rx, ry, rz),
            scale: Vec3::new(sx, sy, sz),
        }
    }

    /// Deserialize one of the extra keys
    pub fn extra_as<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.extra
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }
}

/// Lifecycle hooks of a game object
///
/// Every hook defaults to a no-op. Hooks run while the behaviour is detached
/// from its node, so `ctx.scene` can be inspected and mutated freely, but
/// looking up this object's own behaviour from inside its hook yields `None`.
pub trait GameObjectBehavior: Any {
    /// Fired once, after the whole scene exists
    fn after_loaded(&mut self, ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        let _ = ctx;
        Ok(())
    }

    /// Fired once, before the object leaves the scene
    fn before_unloaded(&mut self, ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        let _ = ctx;
        Ok(())
    }

    /// Fired every simulated frame while attached and active
    fn before_render(&mut self, ctx: &mut HookContext<'_>, frame: &FrameInfo) -> Result<(), GameError> {
        let _ = (ctx, frame);
        Ok(())
    }

    /// For down-casting
    fn as_any(&self) -> &dyn Any;

    /// For down-casting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// What a hook can reach while it runs
pub struct HookContext<'a> {
    /// The object whose hook is running
    pub id: GameObjectId,
    /// The scene the object lives in
    pub scene: &'a mut Scene,
    /// Input state of the game
    pub input: &'a InputManager,
}

impl HookContext<'_> {
    /// The object whose hook is running
    pub fn game_object(&self) -> Option<&GameObject> {
        self.scene.get(self.id)
    }

    /// Mutable access to the object whose hook is running
    pub fn game_object_mut(&mut self) -> Option<&mut GameObject> {
        self.scene.get_mut(self.id)
    }

    /// The scene's physics world
    pub fn physics(&mut self) -> &mut dyn PhysicsBackend {
        self.scene.physics_mut()
    }

    /// Destroy a game object (and its subtree) of this scene
    pub fn destroy(&mut self, id: GameObjectId) -> Result<(), GameError> {
        self.scene.destroy_game_object(id, self.input)
    }
}

/// A node in a scene's game-object tree
pub struct GameObject {
    pub(super) id: GameObjectId,
    pub(super) name: Option<String>,
    pub(super) tags: BTreeSet<String>,
    pub(super) kind: Option<String>,
    pub(super) transform: Transform,
    pub(super) world_transform: Transform,
    pub(super) parent: Option<ParentRef>,
    pub(super) children: Vec<GameObjectId>,
    pub(super) rigid_body: Option<BodyHandle>,
    pub(super) options: GameObjectOptions,
    pub(super) behavior: Option<Box<dyn GameObjectBehavior>>,
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("rigid_body", &self.rigid_body)
            .finish_non_exhaustive()
    }
}

impl GameObject {
    pub(super) fn new(
        id: GameObjectId,
        kind: Option<String>,
        options: GameObjectOptions,
        behavior: Option<Box<dyn GameObjectBehavior>>,
    ) -> Self {
        let transform = options.transform();
        Self {
            id,
            name: options.name.clone(),
            tags: options.tags.clone(),
            kind,
            world_transform: transform.clone(),
            transform,
            parent: None,
            children: Vec::new(),
            rigid_body: None,
            options,
            behavior,
        }
    }

    /// Arena id
    pub fn id(&self) -> GameObjectId {
        self.id
    }

    /// Name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Rename the object
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Tag set
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Whether the object carries `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Add a tag
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    /// Registered type name the object was built from
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Local transform relative to the parent
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable local transform; picked up by the next graph sync
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// World transform as of the last graph sync
    pub fn world_transform(&self) -> &Transform {
        &self.world_transform
    }

    /// Link to the owner; `None` once detached
    pub fn parent(&self) -> Option<ParentRef> {
        self.parent
    }

    /// Child ids in order
    pub fn children(&self) -> &[GameObjectId] {
        &self.children
    }

    /// Rigid body owned by this object
    pub fn rigid_body(&self) -> Option<BodyHandle> {
        self.rigid_body
    }

    /// Options the object was constructed with
    pub fn options(&self) -> &GameObjectOptions {
        &self.options
    }

    /// Whether a behaviour is attached (and not currently running a hook)
    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// Typed access to the behaviour
    pub fn behavior<T: GameObjectBehavior>(&self) -> Option<&T> {
        self.behavior.as_deref().and_then(|b| b.as_any().downcast_ref())
    }

    /// Typed mutable access to the behaviour
    pub fn behavior_mut<T: GameObjectBehavior>(&mut self) -> Option<&mut T> {
        self.behavior.as_deref_mut().and_then(|b| b.as_any_mut().downcast_mut())
    }
}
