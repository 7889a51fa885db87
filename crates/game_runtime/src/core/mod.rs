//! # Core Module
//!
//! Shared declarative types every subsystem is configured from.
//!
//! ## Organization
//!
//! - **Config**: the game manifest and its per-subsystem option sections

pub mod config;

// Re-export commonly used config types
pub use config::{
    GameManifest,
    RendererOptions,
    InputOptions,
    PhysicsOptions,
    AssetOptions,
    MANIFEST_PATH,
    Config,
    ConfigError,
};
