// src/resources/cache.rs

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::resources::finder::{Resource, ResourceError, ResourceFinder};

/// A filesystem cache for resources that need to live as real files,
/// e.g. shared libraries shipped inside an archive.
#[derive(Debug, Clone)]
pub struct Cache {
    base: PathBuf,
}

impl Cache {
    /// Create a cache rooted at `base`, or at the default location
    /// (`$DISTKIT_CACHE`, falling back to `~/.distkit/resource-cache`).
    /// The directory is created if absent.
    pub fn new(base: Option<PathBuf>) -> Result<Self, ResourceError> {
        let base = base.unwrap_or_else(|| default_cache_base().join("resource-cache"));
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Convert a resource prefix (an archive path) to a directory name in
    /// the cache: path separators become `--`, drive colons `---`, with a
    /// `.cache` suffix.
    pub fn prefix_to_dir(prefix: &str) -> String {
        let mangled = prefix.replace(':', "---").replace(['/', '\\'], "--");
        format!("{mangled}.cache")
    }

    /// Get a resource into the cache, returning the pathname of a real file
    /// holding its bytes. File-backed resources pass through untouched;
    /// archive-backed resources are written out under the cache base.
    /// Cached copies are always refreshed (cache invalidation is a hard
    /// problem).
    pub fn get(
        &self,
        finder: &dyn ResourceFinder,
        resource: &Resource,
    ) -> Result<PathBuf, ResourceError> {
        let (prefix, path) = finder.cache_info(resource);
        let prefix = match prefix {
            None => return Ok(path),
            Some(prefix) => prefix,
        };

        let target = self.base.join(Self::prefix_to_dir(&prefix)).join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = finder.bytes(resource)?;
        fs::write(&target, bytes)?;
        debug!(name = %resource.name, ?target, "materialised resource in cache");
        Ok(target)
    }

    /// Remove everything under the cache base; returns the paths that could
    /// not be removed.
    pub fn clear(&self) -> Vec<PathBuf> {
        let mut not_removed = Vec::new();
        let entries = match fs::read_dir(&self.base) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(%err, base = ?self.base, "cannot list cache directory");
                return not_removed;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if result.is_err() {
                not_removed.push(path);
            }
        }
        not_removed
    }
}

fn default_cache_base() -> PathBuf {
    if let Ok(dir) = env::var("DISTKIT_CACHE") {
        return PathBuf::from(dir);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".distkit")
}
