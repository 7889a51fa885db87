//! Top-level game state machine
//!
//! A [`Game`] starts uninitialized. The first [`Game::load_scene`] or
//! [`Game::load_asset`] reads the manifest and brings up the renderer and
//! input manager. From then on at most one [`Scene`] is current.
//!
//! Loading is asynchronous but not reentrant: callers must await one
//! `load_scene` before starting the next.

use serde::Deserialize;
use std::rc::Rc;
use thiserror::Error;

use crate::assets::{Asset, AssetData, AssetError, AssetSource, AssetStore, FileSystemSource};
use crate::config::{Config, ConfigError};
use crate::controller::{DynamicCharacterController, DYNAMIC_CHARACTER_CONTROLLER};
use crate::core::{GameManifest, PhysicsOptions, RendererOptions, MANIFEST_PATH};
use crate::foundation::collections::GameObjectId;
use crate::foundation::time::{FrameClock, FrameInfo, Stopwatch};
use crate::input::{InputEvent, InputManager};
use crate::physics::{PhysicsBackend, PhysicsError, RapierPhysicsWorld};
use crate::render::{HeadlessRenderer, RenderError, Renderer};
use crate::scene::{GameObjectFactory, GameObjectRegistry, Scene, SceneLoadContext};

/// Builds the renderer from the manifest's renderer options
pub type RendererFactory = Box<dyn Fn(&RendererOptions) -> Result<Box<dyn Renderer>, RenderError>>;

/// Builds a fresh physics world for every scene
pub type PhysicsFactory = Box<dyn Fn(&PhysicsOptions) -> Box<dyn PhysicsBackend>>;

/// Subsystems that exist once the game is initialized
struct Runtime {
    manifest: GameManifest,
    renderer: Box<dyn Renderer>,
    input: InputManager,
}

/// A running game
pub struct Game {
    base_url: String,
    assets: AssetStore,
    registry: GameObjectRegistry,
    renderer_factory: RendererFactory,
    physics_factory: PhysicsFactory,
    runtime: Option<Runtime>,
    scene: Option<Scene>,
    clock: FrameClock,
}

impl Game {
    /// Create a game rooted at `base_url` (a directory or `file://` URL)
    ///
    /// Defaults: assets from the file system, a headless renderer, rapier
    /// physics, and `"DynamicCharacterController"` registered.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GameError> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(GameError::MissingBaseUrl);
        }

        let mut registry = GameObjectRegistry::new();
        registry.register(DYNAMIC_CHARACTER_CONTROLLER, DynamicCharacterController::factory());

        Ok(Self {
            base_url: base_url.to_string(),
            assets: AssetStore::new(base_url, Box::new(FileSystemSource::new())),
            registry,
            renderer_factory: Box::new(headless_renderer),
            physics_factory: Box::new(rapier_physics),
            runtime: None,
            scene: None,
            clock: FrameClock::new(),
        })
    }

    /// Read assets through `source` instead of the file system
    pub fn with_asset_source(mut self, source: impl AssetSource + 'static) -> Self {
        self.assets = AssetStore::new(self.base_url.clone(), Box::new(source));
        self
    }

    /// Use a different rendering backend
    pub fn with_renderer_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&RendererOptions) -> Result<Box<dyn Renderer>, RenderError> + 'static,
    {
        self.renderer_factory = Box::new(factory);
        self
    }

    /// Use a different physics backend
    pub fn with_physics_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&PhysicsOptions) -> Box<dyn PhysicsBackend> + 'static,
    {
        self.physics_factory = Box::new(factory);
        self
    }

    /// Register game-object types; later registrations of a name win
    pub fn register_game_object_classes<I, S>(&mut self, classes: I)
    where
        I: IntoIterator<Item = (S, GameObjectFactory)>,
        S: Into<String>,
    {
        self.registry.register_classes(classes);
    }

    /// Factory registered under `name`
    pub fn get_game_object_class(&self, name: &str) -> Option<GameObjectFactory> {
        self.registry.get(name)
    }

    async fn init(&mut self) -> Result<(), GameError> {
        if self.runtime.is_some() {
            return Err(GameError::AlreadyInitialized);
        }
        log::info!("Game: reading {} to initialize game...", MANIFEST_PATH);

        let asset = self.assets.load(MANIFEST_PATH).await?;
        let manifest = parse_manifest(&asset)?;

        let renderer = (self.renderer_factory)(&manifest.renderer_options)?;
        let input = InputManager::new(renderer.canvas(), manifest.input_options.clone());

        log::info!(
            "Game: initialized with {} scene(s), {}x{} canvas",
            manifest.scenes.len(),
            manifest.renderer_options.width,
            manifest.renderer_options.height
        );
        self.runtime = Some(Runtime { manifest, renderer, input });
        Ok(())
    }

    /// Replace the current scene with the one named `scene_name` in the manifest
    ///
    /// The current scene and then each of its objects get `before_unloaded`
    /// before anything of the new scene is built. The new scene is fully
    /// constructed before `after_loaded` runs on it and then on each object.
    /// If building fails the game is left without a scene.
    pub async fn load_scene(&mut self, scene_name: &str) -> Result<(), GameError> {
        if scene_name.is_empty() {
            return Err(GameError::InvalidSceneName(scene_name.to_string()));
        }
        if self.runtime.is_none() {
            self.init().await?;
        }

        let Self { assets, registry, physics_factory, runtime, scene, .. } = self;
        let runtime = runtime.as_mut().ok_or(GameError::NotInitialized)?;
        let stopwatch = Stopwatch::start_new();
        log::debug!("Game: loading scene: {}", scene_name);

        if let Some(mut previous) = scene.take() {
            log::debug!("Game: unloading scene: {}", previous.name());
            previous.before_unloaded();
            previous.fire_before_unloaded(&runtime.input)?;
            previous.deactivate();
            previous.unload();
        }

        if !runtime.manifest.asset_options.retain_assets_between_scene {
            log::debug!("Game: clearing all assets as assetOptions.retainAssetsBetweenScene was not set");
            assets.unload_all();
        }

        let path = runtime
            .manifest
            .scene_path(scene_name)
            .ok_or_else(|| GameError::SceneNotFound(scene_name.to_string()))?
            .to_string();

        let context = SceneLoadContext {
            assets,
            registry,
            renderer: runtime.renderer.as_mut(),
            physics: (**physics_factory)(&runtime.manifest.physics_options),
        };
        let current = scene.insert(Scene::load(scene_name, &path, context).await?);

        log::info!(
            "Game: successfully loaded scene: {} ({} objects, {:.1} ms)",
            scene_name,
            current.len(),
            stopwatch.elapsed_millis()
        );

        current.after_loaded();
        current.fire_after_loaded(&runtime.input)
    }

    /// Load an asset through the game's store, initializing the game if needed
    pub async fn load_asset(&mut self, path: &str) -> Result<Rc<Asset>, GameError> {
        if self.runtime.is_none() {
            self.init().await?;
        }
        Ok(self.assets.load(path).await?)
    }

    /// Start the render loop
    pub fn play(&mut self) -> Result<(), GameError> {
        if self.scene.is_none() {
            return Err(GameError::NoSceneLoaded);
        }
        let runtime = self.runtime.as_mut().ok_or(GameError::NotInitialized)?;

        runtime.renderer.play();
        self.clock.resume();
        log::info!("Game: playing");
        Ok(())
    }

    /// Halt the render loop; no-op before initialization
    pub fn pause(&mut self) {
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.renderer.pause();
            log::info!("Game: paused");
        }
    }

    /// Whether frames are currently being produced
    pub fn is_playing(&self) -> bool {
        self.runtime.as_ref().is_some_and(|r| r.renderer.is_playing())
    }

    /// Run one frame with explicit timing
    ///
    /// Fires `before_render` across the tree, steps physics, syncs the scene
    /// graph, and renders. Does nothing while paused or without a scene.
    pub fn advance(&mut self, frame: FrameInfo) -> Result<(), GameError> {
        let (Some(runtime), Some(scene)) = (self.runtime.as_mut(), self.scene.as_mut()) else {
            return Ok(());
        };
        if !runtime.renderer.is_playing() {
            return Ok(());
        }

        scene.fire_before_render(&runtime.input, &frame)?;
        scene.step_physics(frame.delta_time_in_sec);
        scene.sync_scene_graph();
        runtime.renderer.render(scene.graph())?;
        Ok(())
    }

    /// Run one frame timed by the game's clock
    pub fn tick(&mut self) -> Result<(), GameError> {
        if !self.is_playing() {
            return Ok(());
        }
        let frame = self.clock.tick();
        self.advance(frame)
    }

    /// Feed a raw input event; ignored before initialization
    pub fn handle_input(&mut self, event: InputEvent) {
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.input.handle_event(event);
        }
    }

    /// Whether the manifest has been read
    pub fn is_initialized(&self) -> bool {
        self.runtime.is_some()
    }

    /// Base URL without a trailing separator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Parsed manifest, once initialized
    pub fn manifest(&self) -> Option<&GameManifest> {
        self.runtime.as_ref().map(|r| &r.manifest)
    }

    /// Current scene
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Mutable current scene
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Input manager, once initialized
    pub fn input(&self) -> Option<&InputManager> {
        self.runtime.as_ref().map(|r| &r.input)
    }

    /// Renderer, once initialized
    pub fn renderer(&self) -> Option<&dyn Renderer> {
        self.runtime.as_ref().map(|r| r.renderer.as_ref())
    }

    /// Asset store
    pub fn asset_store(&self) -> &AssetStore {
        &self.assets
    }

    /// Game-object type registry
    pub fn registry(&self) -> &GameObjectRegistry {
        &self.registry
    }
}

fn headless_renderer(options: &RendererOptions) -> Result<Box<dyn Renderer>, RenderError> {
    Ok(Box::new(HeadlessRenderer::new(options)?))
}

fn rapier_physics(options: &PhysicsOptions) -> Box<dyn PhysicsBackend> {
    Box::new(RapierPhysicsWorld::new(options))
}

fn parse_manifest(asset: &Asset) -> Result<GameManifest, GameError> {
    let manifest = match &asset.data {
        AssetData::Json(value) => {
            GameManifest::deserialize(value).map_err(|e| ConfigError::Parse(e.to_string()))?
        }
        AssetData::Text(text) => GameManifest::parse(&asset.path, text)?,
        _ => return Err(ConfigError::Parse(format!("{} is not a text document", asset.path)).into()),
    };
    Ok(manifest)
}

/// Game errors
#[derive(Error, Debug)]
pub enum GameError {
    /// The game was created without a base URL
    #[error("Game must be constructed with a base URL, e.g. Game::new(\"file://my_project\")")]
    MissingBaseUrl,

    /// Scene names must be non-empty
    #[error("Invalid scene name '{0}': must name a scene defined in game.json")]
    InvalidSceneName(String),

    /// Initialization ran twice
    #[error("Game already initialized")]
    AlreadyInitialized,

    /// Operation needs an initialized game
    #[error("Game is not initialized")]
    NotInitialized,

    /// `play` was called before any scene was loaded
    #[error("You must call load_scene() before calling play()")]
    NoSceneLoaded,

    /// The manifest has no scene of that name
    #[error("No scene with name '{0}' defined in game.json")]
    SceneNotFound(String),

    /// A description names a type nobody registered
    #[error("Unknown game object type '{0}'")]
    UnknownGameObjectType(String),

    /// An id does not name an object of the scene
    #[error("Game object {0:?} not found")]
    GameObjectNotFound(GameObjectId),

    /// Game-object options a behaviour could not interpret
    #[error("Invalid game object options: {0}")]
    InvalidGameObjectOptions(String),

    /// A scene description could not be parsed
    #[error("Invalid scene description {path}: {reason}")]
    InvalidSceneDescription {
        /// Asset path of the description
        path: String,
        /// Parser message
        reason: String,
    },

    /// Asset loading failed
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration could not be read
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Physics backend rejected a command
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Render backend failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Error raised by a game-object behaviour
    #[error("{0}")]
    Custom(String),
}
