//! Byte sources the asset store reads from
//!
//! A source turns a fully resolved URL into raw bytes. Reads are futures so
//! a source backed by real I/O can yield while it waits.

use futures::future::{FutureExt, LocalBoxFuture};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::assets::AssetError;

/// Something that can fetch raw asset bytes by URL
pub trait AssetSource {
    /// Read every byte at `url`
    fn read<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, AssetError>>;
}

/// Reads assets from the local file system
///
/// Accepts bare paths and `file://` URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemSource;

impl FileSystemSource {
    /// Create a file-system source
    pub fn new() -> Self {
        Self
    }

    fn to_path(url: &str) -> PathBuf {
        PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
    }
}

impl AssetSource for FileSystemSource {
    fn read<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, AssetError>> {
        async move {
            let path = Self::to_path(url);
            if !path.exists() {
                return Err(AssetError::NotFound(url.to_string()));
            }
            log::trace!("Reading asset file {:?}", path);
            Ok(std::fs::read(&path)?)
        }
        .boxed_local()
    }
}

/// Serves assets from memory, keyed by full URL
///
/// Useful for games embedded in the binary and for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the bytes served at `url`
    pub fn insert(&mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(url.into(), bytes.into());
    }

    /// Builder form of [`MemoryAssetSource::insert`]
    pub fn with_file(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(url, bytes);
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn read<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<Vec<u8>, AssetError>> {
        async move {
            self.files
                .get(url)
                .cloned()
                .ok_or_else(|| AssetError::NotFound(url.to_string()))
        }
        .boxed_local()
    }
}
