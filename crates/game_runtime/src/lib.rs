//! # Game Runtime
//!
//! A declarative game runtime: a game is a manifest plus scene descriptions,
//! and behaviour is attached to game objects by registered type name.
//!
//! ## Features
//!
//! - **Scenes**: tree of game objects built from JSON, TOML, or RON descriptions
//! - **Lifecycle Hooks**: `after_loaded`, `before_render`, `before_unloaded` in pre-order
//! - **Physics**: rapier-backed rigid bodies declared per game object
//! - **Character Controller**: impulse-driven capsule with ground-checked jumping
//! - **Asset Management**: base-URL-relative asset cache with pluggable sources
//! - **Render Backends**: scene graph mirroring behind a `Renderer` trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use game_runtime::prelude::*;
//!
//! fn main() -> Result<(), GameError> {
//!     let mut game = Game::new("file://assets")?;
//!     futures::executor::block_on(game.load_scene("main"))?;
//!     game.play()?;
//!     for _ in 0..60 {
//!         game.tick()?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod assets;
pub mod input;
pub mod render;
pub mod physics;
pub mod scene;
pub mod controller;

mod game;

#[cfg(test)]
mod testing;

pub use game::{Game, GameError, PhysicsFactory, RendererFactory};

/// Common imports for game code
pub mod prelude {
    pub use crate::{
        Game, GameError,
        assets::{Asset, AssetData, AssetStore},
        config::Config,
        controller::{CharacterController, DynamicCharacterController},
        core::GameManifest,
        foundation::{
            math::{Quat, Transform, Vec3},
            time::{FrameInfo, Stopwatch},
        },
        input::{InputEvent, InputManager, KeyCode, MouseButton},
        physics::{PhysicsBackend, RigidBodyOptions},
        render::{Color, Renderer},
        scene::{
            factory, GameObject, GameObjectBehavior, GameObjectDescription, GameObjectOptions,
            HookContext, Scene, SceneDescription,
        },
    };
}
