// src/resources/finder.rs

use std::fs::{self, File};
use std::io::Read;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

/// Errors raised while locating or reading resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource '{0}' not found")]
    NotFound(String),

    #[error("resource '{0}' is not a container")]
    NotAContainer(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// An in-package resource, such as a data file, located by a
/// [`ResourceFinder`]. Obtained from [`ResourceFinder::find`], not built
/// directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// `/`-separated name relative to the finder's base.
    pub name: String,
    /// True when the resource contains other resources (a directory, or a
    /// name prefix inside an archive).
    pub is_container: bool,
}

/// Locates in-package resources by `/`-separated name.
pub trait ResourceFinder {
    /// Resolve a resource name; `None` when nothing exists under it.
    fn find(&self, name: &str) -> Option<Resource>;

    /// The full contents of a non-container resource.
    fn bytes(&self, resource: &Resource) -> Result<Vec<u8>, ResourceError>;

    /// Size in bytes of a non-container resource.
    fn size(&self, resource: &Resource) -> Result<u64, ResourceError>;

    /// Names of a container's immediate children.
    fn children(&self, resource: &Resource) -> Result<Vec<String>, ResourceError>;

    /// Cache placement: `(Some(prefix), relative path)` when the resource
    /// needs materialising, `(None, path)` when it is already a real file.
    fn cache_info(&self, resource: &Resource) -> (Option<String>, PathBuf);
}

/// Resource finder over a filesystem directory.
#[derive(Debug, Clone)]
pub struct FileFinder {
    base: PathBuf,
}

impl FileFinder {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn make_path(&self, name: &str) -> PathBuf {
        let mut path = self.base.clone();
        for part in name.split('/').filter(|p| !p.is_empty()) {
            path.push(part);
        }
        path
    }
}

impl ResourceFinder for FileFinder {
    fn find(&self, name: &str) -> Option<Resource> {
        let path = self.make_path(name);
        if !path.exists() {
            debug!(name, ?path, "resource not found");
            return None;
        }
        Some(Resource {
            name: name.to_string(),
            is_container: path.is_dir(),
        })
    }

    fn bytes(&self, resource: &Resource) -> Result<Vec<u8>, ResourceError> {
        if resource.is_container {
            return Err(ResourceError::NotAContainer(resource.name.clone()));
        }
        Ok(fs::read(self.make_path(&resource.name))?)
    }

    fn size(&self, resource: &Resource) -> Result<u64, ResourceError> {
        Ok(fs::metadata(self.make_path(&resource.name))?.len())
    }

    fn children(&self, resource: &Resource) -> Result<Vec<String>, ResourceError> {
        if !resource.is_container {
            return Err(ResourceError::NotAContainer(resource.name.clone()));
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(self.make_path(&resource.name))? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort_unstable();
        Ok(names)
    }

    fn cache_info(&self, resource: &Resource) -> (Option<String>, PathBuf) {
        (None, self.make_path(&resource.name))
    }
}

/// Resource finder over entries of a `.zip` archive.
///
/// The entry listing is indexed once at open time; file reads reopen the
/// archive, keeping the finder itself cheap to share and free of interior
/// mutability.
#[derive(Debug, Clone)]
pub struct ZipFinder {
    archive_path: PathBuf,
    /// Sorted file entry names; containers are derived from name prefixes.
    index: Vec<(String, u64)>,
}

impl ZipFinder {
    pub fn open(archive_path: impl Into<PathBuf>) -> Result<Self, ResourceError> {
        let archive_path = archive_path.into();
        let mut archive = ZipArchive::new(File::open(&archive_path)?)?;

        let mut index = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index(i)?;
            if !entry.is_dir() {
                index.push((entry.name().to_string(), entry.size()));
            }
        }
        index.sort_unstable();
        Ok(Self {
            archive_path,
            index,
        })
    }

    fn entry(&self, name: &str) -> Option<&(String, u64)> {
        self.index
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|i| &self.index[i])
    }

    /// True when at least one entry lives under `prefix` (the bisect probe
    /// over the sorted index).
    fn has_prefix(&self, prefix: &str) -> bool {
        let i = self.index.partition_point(|(n, _)| n.as_str() < prefix);
        self.index
            .get(i)
            .map(|(n, _)| n.starts_with(prefix))
            .unwrap_or(false)
    }
}

impl ResourceFinder for ZipFinder {
    fn find(&self, name: &str) -> Option<Resource> {
        let name = name.trim_matches('/');
        if self.entry(name).is_some() {
            return Some(Resource {
                name: name.to_string(),
                is_container: false,
            });
        }
        let prefix = format!("{name}/");
        if name.is_empty() || self.has_prefix(&prefix) {
            return Some(Resource {
                name: name.to_string(),
                is_container: true,
            });
        }
        debug!(name, archive = ?self.archive_path, "resource not found in archive");
        None
    }

    fn bytes(&self, resource: &Resource) -> Result<Vec<u8>, ResourceError> {
        if resource.is_container {
            return Err(ResourceError::NotAContainer(resource.name.clone()));
        }
        let mut archive = ZipArchive::new(File::open(&self.archive_path)?)?;
        let mut entry = archive.by_name(&resource.name)?;
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn size(&self, resource: &Resource) -> Result<u64, ResourceError> {
        self.entry(&resource.name)
            .map(|(_, size)| *size)
            .ok_or_else(|| ResourceError::NotFound(resource.name.clone()))
    }

    fn children(&self, resource: &Resource) -> Result<Vec<String>, ResourceError> {
        if !resource.is_container {
            return Err(ResourceError::NotAContainer(resource.name.clone()));
        }
        let prefix = if resource.name.is_empty() {
            String::new()
        } else {
            format!("{}/", resource.name)
        };

        let mut names = Vec::new();
        let start = self.index.partition_point(|(n, _)| n.as_str() < prefix.as_str());
        for (name, _) in &self.index[start..] {
            if !name.starts_with(&prefix) {
                break;
            }
            let rest = &name[prefix.len()..];
            let child = match rest.split_once('/') {
                Some((first, _)) => first,
                None => rest,
            };
            if names.last().map(|l| l != child).unwrap_or(true) {
                names.push(child.to_string());
            }
        }
        names.dedup();
        Ok(names)
    }

    fn cache_info(&self, resource: &Resource) -> (Option<String>, PathBuf) {
        (
            Some(self.archive_path.to_string_lossy().into_owned()),
            PathBuf::from(&resource.name),
        )
    }
}
