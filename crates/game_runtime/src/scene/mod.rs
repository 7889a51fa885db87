//! Scene management system
//!
//! A [`Scene`] owns the game-object tree of one loaded scene and mirrors it
//! into the render backend's [`SceneGraph`].
//!
//! ## Architecture
//!
//! ```text
//! SceneDescription (JSON / TOML / RON asset)
//!      ↓  GameObjectRegistry resolves `type`
//! Scene (arena of GameObjects, ordered roots)
//!      ↓  add / remove / update, synchronously
//! SceneGraph (render backend)
//! ```
//!
//! The Scene:
//! - Builds its tree in pre-order, parents attached before children are built
//! - Dispatches lifecycle hooks in the same pre-order
//! - Owns the physics world its objects' rigid bodies live in
//! - Copies body poses back into transforms after each physics step

mod description;
mod game_object;
mod registry;
mod scene_graph;
mod tree;

pub use description::{GameObjectDescription, SceneDescription};
pub use game_object::{GameObject, GameObjectBehavior, GameObjectOptions, HookContext, ParentRef};
pub use registry::{factory, GameObjectFactory, GameObjectRegistry};
pub use scene_graph::{ListSceneGraph, SceneGraph};
pub use tree::{PreOrder, Scene, SceneLoadContext};
