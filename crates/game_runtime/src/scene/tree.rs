//! The scene: an arena-backed game-object tree mirrored into a scene graph

use crate::assets::AssetStore;
use crate::foundation::collections::{GameObjectId, SlotMap};
use crate::foundation::math::Transform;
use crate::foundation::time::FrameInfo;
use crate::game::GameError;
use crate::input::InputManager;
use crate::physics::PhysicsBackend;
use crate::render::{Color, Renderer};

use super::{
    GameObject, GameObjectBehavior, GameObjectDescription, GameObjectRegistry, HookContext,
    ParentRef, SceneDescription, SceneGraph,
};

/// Collaborators a scene is loaded with
pub struct SceneLoadContext<'a> {
    /// Where the description asset comes from
    pub assets: &'a mut AssetStore,
    /// Resolves `type` names
    pub registry: &'a GameObjectRegistry,
    /// Creates the scene graph
    pub renderer: &'a mut dyn Renderer,
    /// Physics world the scene will own
    pub physics: Box<dyn PhysicsBackend>,
}

/// One loaded scene
///
/// Owns every game object of the scene in an arena. Roots are kept in
/// insertion order and each node owns its ordered child list, so a pre-order
/// walk of the roots reproduces the description's nesting and list order.
pub struct Scene {
    name: String,
    objects: SlotMap<GameObjectId, GameObject>,
    roots: Vec<GameObjectId>,
    graph: Box<dyn SceneGraph>,
    physics: Box<dyn PhysicsBackend>,
    active: bool,
    loaded: bool,
}

impl Scene {
    /// Create an empty scene
    pub fn new(
        name: impl Into<String>,
        graph: Box<dyn SceneGraph>,
        physics: Box<dyn PhysicsBackend>,
    ) -> Self {
        Self {
            name: name.into(),
            objects: SlotMap::with_key(),
            roots: Vec::new(),
            graph,
            physics,
            active: true,
            loaded: false,
        }
    }

    /// Build a scene from a description
    ///
    /// The background is applied to the graph before any object is created.
    /// On error the partially built scene is dropped.
    pub fn from_description(
        name: impl Into<String>,
        description: SceneDescription,
        registry: &GameObjectRegistry,
        graph: Box<dyn SceneGraph>,
        physics: Box<dyn PhysicsBackend>,
    ) -> Result<Self, GameError> {
        let mut scene = Self::new(name, graph, physics);
        scene.graph.set_background(description.background.unwrap_or_default());

        for root in description.game_objects {
            scene.create_game_object(ParentRef::Scene, root, registry)?;
        }

        log::debug!("Scene '{}': built {} game object(s)", scene.name, scene.objects.len());
        Ok(scene)
    }

    /// Load the description at `path` and build it
    pub async fn load(
        name: impl Into<String>,
        path: &str,
        context: SceneLoadContext<'_>,
    ) -> Result<Self, GameError> {
        let asset = context.assets.load(path).await?;
        let description = SceneDescription::from_asset(&asset)?;
        let graph = context
            .renderer
            .create_scene_graph(description.background.unwrap_or_default());

        Self::from_description(name, description, context.registry, graph, context.physics)
    }

    /// Create a game object (and, recursively, its described children) under `parent`
    ///
    /// The behaviour comes from the description's explicit factory, else from
    /// the registry entry named by its type, else the object is a plain node.
    /// The node is attached and mirrored into the graph before any child is
    /// built.
    pub fn create_game_object(
        &mut self,
        parent: ParentRef,
        description: GameObjectDescription,
        registry: &GameObjectRegistry,
    ) -> Result<GameObjectId, GameError> {
        let GameObjectDescription { kind, factory, mut options, game_objects } = description;

        let parent_world = match parent {
            ParentRef::Scene => Transform::identity(),
            ParentRef::GameObject(parent_id) => self
                .objects
                .get(parent_id)
                .map(|p| p.world_transform.clone())
                .ok_or(GameError::GameObjectNotFound(parent_id))?,
        };

        let factory = match (factory, kind.as_deref()) {
            (Some(factory), _) => Some(factory),
            (None, Some(kind)) => Some(
                registry
                    .get(kind)
                    .ok_or_else(|| GameError::UnknownGameObjectType(kind.to_string()))?,
            ),
            (None, None) => None,
        };
        let behavior = factory.map(|build| build(&mut options)).transpose()?;

        let rigid_body = options.rigid_body.clone();
        let id = self
            .objects
            .insert_with_key(|id| GameObject::new(id, kind, options, behavior));
        self.link(id, parent);

        let visible = match parent {
            ParentRef::Scene => true,
            ParentRef::GameObject(parent_id) => self.graph.contains(parent_id),
        };

        if let Some(object) = self.objects.get_mut(id) {
            object.world_transform = parent_world.combine(&object.transform);
            if let Some(rigid_body) = rigid_body {
                object.rigid_body = Some(self.physics.create_rigid_body(&rigid_body, &object.world_transform)?);
            }
            if visible {
                self.graph.add(id, object.world_transform.clone());
            }
        }

        for child in game_objects {
            self.create_game_object(ParentRef::GameObject(id), child, registry)?;
        }
        Ok(id)
    }

    /// Attach an object at the root level; returns false if it already is a root
    ///
    /// An object currently parented elsewhere is moved. Its subtree is added
    /// back to the scene graph.
    pub fn add_game_object(&mut self, id: GameObjectId) -> bool {
        if self.roots.contains(&id) || !self.objects.contains_key(id) {
            return false;
        }

        self.unlink(id);
        self.link(id, ParentRef::Scene);
        for node in self.subtree(id) {
            if let Some(object) = self.objects.get(node) {
                self.graph.add(node, object.world_transform.clone());
            }
        }
        true
    }

    /// Detach a root-level object; returns false if it is not a root
    ///
    /// The object stays owned by the scene with no parent, and its subtree
    /// leaves the scene graph.
    pub fn remove_game_object(&mut self, id: GameObjectId) -> bool {
        if !self.roots.contains(&id) {
            return false;
        }

        self.unlink(id);
        for node in self.subtree(id) {
            self.graph.remove(node);
        }
        true
    }

    /// Fire `before_unloaded` on an object's subtree, then delete it entirely
    ///
    /// Rigid bodies, graph nodes, and arena entries are released. Unknown ids
    /// are ignored.
    pub fn destroy_game_object(&mut self, id: GameObjectId, input: &InputManager) -> Result<(), GameError> {
        if !self.objects.contains_key(id) {
            return Ok(());
        }

        let subtree = self.subtree(id);
        for &node in &subtree {
            self.run_hook(node, input, |behavior, ctx| behavior.before_unloaded(ctx))?;
        }

        self.unlink(id);
        for node in subtree {
            if let Some(object) = self.objects.remove(node) {
                if let Some(body) = object.rigid_body {
                    self.physics.remove_rigid_body(body);
                }
                self.graph.remove(node);
            }
        }
        Ok(())
    }

    /// Game object by id
    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    /// Mutable game object by id
    pub fn get_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    /// Root-level objects in order
    pub fn root_game_objects(&self) -> &[GameObjectId] {
        &self.roots
    }

    /// Pre-order walk of the attached tree
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(self, &self.roots)
    }

    /// Ids of the attached tree in pre-order
    pub fn game_object_ids(&self) -> Vec<GameObjectId> {
        self.iter().map(GameObject::id).collect()
    }

    /// Visit every attached object in pre-order
    pub fn for_each_game_object(&self, f: impl FnMut(&GameObject)) {
        self.iter().for_each(f);
    }

    /// First object in pre-order matching `predicate`
    pub fn find(&self, mut predicate: impl FnMut(&GameObject) -> bool) -> Option<&GameObject> {
        self.iter().find(|object| predicate(object))
    }

    /// Every object matching `predicate`, in pre-order
    pub fn find_all(&self, mut predicate: impl FnMut(&GameObject) -> bool) -> Vec<&GameObject> {
        self.iter().filter(|object| predicate(object)).collect()
    }

    /// First object named `name`
    pub fn find_by_name(&self, name: &str) -> Option<&GameObject> {
        self.find(|object| object.name() == Some(name))
    }

    /// Every object tagged `tag`
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&GameObject> {
        self.find_all(|object| object.has_tag(tag))
    }

    /// First strict descendant of `id` in pre-order matching `predicate`
    pub fn find_descendant(
        &self,
        id: GameObjectId,
        mut predicate: impl FnMut(&GameObject) -> bool,
    ) -> Option<&GameObject> {
        let children = self.objects.get(id).map(GameObject::children).unwrap_or_default();
        PreOrder::new(self, children).find(|object| predicate(object))
    }

    /// Every strict descendant of `id` matching `predicate`, in pre-order
    pub fn find_all_descendants(
        &self,
        id: GameObjectId,
        mut predicate: impl FnMut(&GameObject) -> bool,
    ) -> Vec<&GameObject> {
        let children = self.objects.get(id).map(GameObject::children).unwrap_or_default();
        PreOrder::new(self, children).filter(|object| predicate(object)).collect()
    }

    /// Number of objects owned by the scene, attached or not
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene owns no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Background color
    pub fn background(&self) -> Color {
        self.graph.background()
    }

    /// Change the background color
    pub fn set_background(&mut self, color: Color) {
        self.graph.set_background(color);
    }

    /// The render backend's container for this scene
    pub fn graph(&self) -> &dyn SceneGraph {
        self.graph.as_ref()
    }

    /// The scene's physics world
    pub fn physics(&self) -> &dyn PhysicsBackend {
        self.physics.as_ref()
    }

    /// Mutable access to the scene's physics world
    pub fn physics_mut(&mut self) -> &mut dyn PhysicsBackend {
        self.physics.as_mut()
    }

    /// Fired once by the game after the whole tree is built
    pub fn after_loaded(&mut self) {
        self.loaded = true;
        log::debug!("Scene '{}': loaded", self.name);
    }

    /// Fired once by the game before the scene's objects are unloaded
    pub fn before_unloaded(&mut self) {
        log::debug!("Scene '{}': unloading", self.name);
    }

    /// Whether `after_loaded` has run
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether the scene is still attached to a game
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the scene as detached from its game; frames stop reaching it
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Release every rigid body and graph node
    pub fn unload(&mut self) {
        for object in self.objects.values_mut() {
            if let Some(body) = object.rigid_body.take() {
                self.physics.remove_rigid_body(body);
            }
        }
        self.graph.clear();
    }

    /// Fire `after_loaded` on every attached object in pre-order
    pub fn fire_after_loaded(&mut self, input: &InputManager) -> Result<(), GameError> {
        for id in self.game_object_ids() {
            self.run_hook(id, input, |behavior, ctx| behavior.after_loaded(ctx))?;
        }
        Ok(())
    }

    /// Fire `before_unloaded` on every attached object in pre-order
    pub fn fire_before_unloaded(&mut self, input: &InputManager) -> Result<(), GameError> {
        for id in self.game_object_ids() {
            self.run_hook(id, input, |behavior, ctx| behavior.before_unloaded(ctx))?;
        }
        Ok(())
    }

    /// Fire `before_render` on every attached object in pre-order; inactive scenes skip it
    pub fn fire_before_render(&mut self, input: &InputManager, frame: &FrameInfo) -> Result<(), GameError> {
        if !self.active {
            return Ok(());
        }
        for id in self.game_object_ids() {
            self.run_hook(id, input, |behavior, ctx| behavior.before_render(ctx, frame))?;
        }
        Ok(())
    }

    /// Advance the scene's physics world
    pub fn step_physics(&mut self, dt: f32) {
        self.physics.step(dt);
    }

    /// Recompute world transforms and push them into the scene graph
    ///
    /// Objects with a rigid body take their world pose from the body; their
    /// local pose is recomputed against the parent.
    pub fn sync_scene_graph(&mut self) {
        for id in self.game_object_ids() {
            let parent_world = match self.objects.get(id).and_then(GameObject::parent) {
                Some(ParentRef::GameObject(parent_id)) => self
                    .objects
                    .get(parent_id)
                    .map_or_else(Transform::identity, |p| p.world_transform.clone()),
                _ => Transform::identity(),
            };

            let Some(object) = self.objects.get_mut(id) else {
                continue;
            };

            let body_pose = object
                .rigid_body
                .and_then(|body| Some((self.physics.translation(body)?, self.physics.rotation(body)?)));

            match body_pose {
                Some((position, rotation)) => {
                    let world = Transform {
                        position,
                        rotation,
                        scale: parent_world.scale.component_mul(&object.transform.scale),
                    };
                    object.transform = parent_world.inverse().combine(&world);
                    object.world_transform = world;
                }
                None => object.world_transform = parent_world.combine(&object.transform),
            }

            self.graph.update(id, object.world_transform.clone());
        }
    }

    fn run_hook<F>(&mut self, id: GameObjectId, input: &InputManager, hook: F) -> Result<(), GameError>
    where
        F: FnOnce(&mut dyn GameObjectBehavior, &mut HookContext<'_>) -> Result<(), GameError>,
    {
        let Some(mut behavior) = self.objects.get_mut(id).and_then(|o| o.behavior.take()) else {
            return Ok(());
        };

        let result = {
            let mut ctx = HookContext { id, scene: &mut *self, input };
            hook(behavior.as_mut(), &mut ctx)
        };

        // The hook may have destroyed its own object.
        if let Some(object) = self.objects.get_mut(id) {
            object.behavior = Some(behavior);
        }
        result
    }

    fn link(&mut self, id: GameObjectId, parent: ParentRef) {
        match parent {
            ParentRef::Scene => self.roots.push(id),
            ParentRef::GameObject(parent_id) => {
                if let Some(p) = self.objects.get_mut(parent_id) {
                    p.children.push(id);
                }
            }
        }
        if let Some(object) = self.objects.get_mut(id) {
            object.parent = Some(parent);
        }
    }

    fn unlink(&mut self, id: GameObjectId) {
        let Some(parent) = self.objects.get_mut(id).and_then(|o| o.parent.take()) else {
            return;
        };
        match parent {
            ParentRef::Scene => self.roots.retain(|root| *root != id),
            ParentRef::GameObject(parent_id) => {
                if let Some(p) = self.objects.get_mut(parent_id) {
                    p.children.retain(|child| *child != id);
                }
            }
        }
    }

    fn subtree(&self, id: GameObjectId) -> Vec<GameObjectId> {
        PreOrder::new(self, &[id]).map(GameObject::id).collect()
    }
}

/// Depth-first pre-order iterator over part of a scene's tree
pub struct PreOrder<'a> {
    scene: &'a Scene,
    stack: Vec<GameObjectId>,
}

impl<'a> PreOrder<'a> {
    fn new(scene: &'a Scene, start: &[GameObjectId]) -> Self {
        Self {
            scene,
            stack: start.iter().rev().copied().collect(),
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a GameObject;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(object) = self.scene.objects.get(id) {
                self.stack.extend(object.children.iter().rev().copied());
                return Some(object);
            }
        }
        None
    }
}
