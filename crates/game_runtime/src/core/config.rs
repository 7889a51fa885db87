//! # Game Manifest
//!
//! The manifest (`game.json` at the root of a game's base URL) is the single
//! declarative entry point of a game. It names every scene and carries the
//! options each runtime subsystem is constructed with.
//!
//! ## Sections
//!
//! - **rendererOptions**: canvas size and title for the renderer
//! - **inputOptions**: mouse-look tuning for the input manager
//! - **physicsOptions**: gravity for every scene's physics world
//! - **assetOptions**: asset cache retention policy
//! - **scenes**: scene name → asset path
//!
//! Every section is optional; missing sections fall back to defaults.

use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

use crate::foundation::math::constants::HALF_PI;

// Re-export from the config module for convenience
pub use crate::config::{Config, ConfigError};

/// Well-known manifest path, relative to the game's base URL
pub const MANIFEST_PATH: &str = "game.json";

/// # Renderer Options
///
/// Describes the output surface the renderer creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererOptions {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Window or document title
    pub title: String,
}

impl RendererOptions {
    /// Set the canvas size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("Canvas must have a non-zero size, got {}x{}", self.width, self.height));
        }
        Ok(())
    }
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Game".to_string(),
        }
    }
}

/// # Input Options
///
/// Mouse-look tuning consumed by the input manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputOptions {
    /// Radians of rotation per pixel of mouse movement
    pub mouse_sensitivity: f32,
    /// Maximum absolute pitch in radians
    pub pitch_limit: f32,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.002,
            pitch_limit: HALF_PI - 0.01,
        }
    }
}

/// # Physics Options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsOptions {
    /// Gravity acceleration in m/s²
    pub gravity: [f32; 3],
}

impl Default for PhysicsOptions {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
        }
    }
}

/// # Asset Options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetOptions {
    /// Keep cached assets when switching scenes instead of flushing them
    pub retain_assets_between_scene: bool,
}

/// # Game Manifest
///
/// Top-level configuration of a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameManifest {
    /// Renderer configuration
    pub renderer_options: RendererOptions,
    /// Input configuration
    pub input_options: InputOptions,
    /// Physics configuration
    pub physics_options: PhysicsOptions,
    /// Asset cache configuration
    pub asset_options: AssetOptions,
    /// Scene name → scene description asset path
    pub scenes: BTreeMap<String, String>,
}

impl GameManifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene
    pub fn with_scene(mut self, name: impl Into<String>, asset_path: impl Into<String>) -> Self {
        self.scenes.insert(name.into(), asset_path.into());
        self
    }

    /// Keep or flush assets between scenes
    pub fn with_asset_retention(mut self, retain: bool) -> Self {
        self.asset_options.retain_assets_between_scene = retain;
        self
    }

    /// Resolve a scene name to its asset path
    pub fn scene_path(&self, name: &str) -> Option<&str> {
        self.scenes.get(name).map(String::as_str)
    }
}

impl Config for GameManifest {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_parses_camel_case_sections() {
        let json = r#"{
            "rendererOptions": { "width": 1024, "height": 768 },
            "inputOptions": { "mouseSensitivity": 0.01 },
            "assetOptions": { "retainAssetsBetweenScene": true },
            "scenes": { "main": "scenes/main.json" }
        }"#;

        let manifest = GameManifest::parse(MANIFEST_PATH, json).unwrap();

        assert_eq!(manifest.renderer_options.width, 1024);
        assert_eq!(manifest.renderer_options.title, "Game");
        assert_eq!(manifest.input_options.mouse_sensitivity, 0.01);
        assert!(manifest.asset_options.retain_assets_between_scene);
        assert_eq!(manifest.scene_path("main"), Some("scenes/main.json"));
        assert_eq!(manifest.physics_options, PhysicsOptions::default());
    }

    #[test]
    fn test_empty_manifest_uses_defaults() {
        let manifest = GameManifest::parse(MANIFEST_PATH, "{}").unwrap();

        assert!(!manifest.asset_options.retain_assets_between_scene);
        assert!(manifest.scenes.is_empty());
        assert!(manifest.renderer_options.validate().is_ok());
    }

    #[test]
    fn test_zero_sized_canvas_is_rejected() {
        let options = RendererOptions::default().with_size(0, 600);
        assert!(options.validate().is_err());
    }
}
