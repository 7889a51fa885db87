//! Asset management system
//!
//! The [`AssetStore`] is a key-addressed cache in front of an [`AssetSource`].
//! Paths are resolved against the game's base URL, decoded by extension, and
//! kept until [`AssetStore::unload_all`] flushes the cache.

pub mod image_loader;
pub mod source;

pub use image_loader::ImageData;
pub use source::{AssetSource, FileSystemSource, MemoryAssetSource};

use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Decoded payload of an asset
#[derive(Debug, Clone, PartialEq)]
pub enum AssetData {
    /// Parsed JSON document
    Json(serde_json::Value),
    /// UTF-8 text (TOML, RON, shaders, plain text)
    Text(String),
    /// Decoded RGBA image
    Image(ImageData),
    /// Anything without a known decoder
    Binary(Vec<u8>),
}

impl AssetData {
    /// Borrow the JSON document, if this is one
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the text, if this is a text asset
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the image, if this is an image asset
    pub fn as_image(&self) -> Option<&ImageData> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// A loaded asset
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Path the asset was requested with (relative to the base URL)
    pub path: String,
    /// Decoded contents
    pub data: AssetData,
}

/// Cache of loaded assets for one game
pub struct AssetStore {
    base_url: String,
    source: Box<dyn AssetSource>,
    cache: HashMap<String, Rc<Asset>>,
}

impl AssetStore {
    /// Create a store reading through `source`, rooted at `base_url`
    pub fn new(base_url: impl Into<String>, source: Box<dyn AssetSource>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            source,
            cache: HashMap::new(),
        }
    }

    /// The base URL every path is resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a relative asset path into a full URL
    pub fn resolve(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Load an asset, returning the cached copy when there is one
    ///
    /// # Arguments
    /// * `path` - Path to the asset, relative to the base URL
    ///
    /// # Example
    /// ```ignore
    /// let scene = asset_store.load("scenes/main.json").await?;
    /// ```
    pub async fn load(&mut self, path: &str) -> Result<Rc<Asset>, AssetError> {
        let path = cache_key(path);
        if let Some(asset) = self.cache.get(path) {
            return Ok(Rc::clone(asset));
        }

        let url = self.resolve(path);
        log::debug!("AssetStore: loading {}", url);
        let bytes = self.source.read(&url).await?;
        let data = decode(path, bytes)?;

        let asset = Rc::new(Asset {
            path: path.to_string(),
            data,
        });
        self.cache.insert(path.to_string(), Rc::clone(&asset));
        Ok(asset)
    }

    /// Check whether `path` is currently cached
    pub fn is_loaded(&self, path: &str) -> bool {
        self.cache.contains_key(cache_key(path))
    }

    /// Number of cached assets
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop every cached asset
    pub fn unload_all(&mut self) {
        log::debug!("AssetStore: unloading {} cached asset(s)", self.cache.len());
        self.cache.clear();
    }
}

/// `/a.json` and `a.json` name the same asset
fn cache_key(path: &str) -> &str {
    path.trim_start_matches('/')
}

fn decode(path: &str, bytes: Vec<u8>) -> Result<AssetData, AssetError> {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => serde_json::from_slice(&bytes)
            .map(AssetData::Json)
            .map_err(|e| AssetError::InvalidData(format!("{}: {}", path, e))),
        "png" | "jpg" | "jpeg" | "bmp" => ImageData::from_bytes(&bytes).map(AssetData::Image),
        "txt" | "toml" | "ron" | "glsl" | "wgsl" => String::from_utf8(bytes)
            .map(AssetData::Text)
            .map_err(|e| AssetError::InvalidData(format!("{}: {}", path, e))),
        _ => Ok(AssetData::Binary(bytes)),
    }
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
