// src/archive.rs

//! Safe archive extraction for the formats packages ship in: `.zip`,
//! `.tar`, `.tar.gz`/`.tgz`.
//!
//! Entry paths are validated before anything touches the filesystem:
//! absolute paths and `..` components are refused.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive as TarArchive;
use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unknown archive format: {0}")]
    UnknownFormat(PathBuf),

    #[error("archive entry has an unsafe path: {0}")]
    UnsafePath(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Extract `src` into the directory `dest`, which is created if absent.
///
/// The format is chosen from the file name suffix.
pub fn unarchive(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<(), ArchiveError> {
    let src = src.as_ref();
    let dest = dest.as_ref();
    fs::create_dir_all(dest)?;

    let name = src
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if name.ends_with(".zip") {
        unzip(src, dest)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        let file = File::open(src)?;
        untar(TarArchive::new(GzDecoder::new(file)), dest)
    } else if name.ends_with(".tar") {
        let file = File::open(src)?;
        untar(TarArchive::new(file), dest)
    } else {
        Err(ArchiveError::UnknownFormat(src.to_path_buf()))
    }
}

/// A relative path with no `..` or root components.
fn is_path_safe(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn unzip(src: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let mut archive = ZipArchive::new(File::open(src)?)?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let raw = PathBuf::from(entry.name());
        let relative = entry
            .enclosed_name()
            .filter(|p| is_path_safe(p))
            .ok_or(ArchiveError::UnsafePath(raw))?;

        let target = dest.join(&relative);
        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
    }
    debug!(?src, ?dest, "extracted zip archive");
    Ok(())
}

fn untar<R: io::Read>(mut archive: TarArchive<R>, dest: &Path) -> Result<(), ArchiveError> {
    for entry in archive.entries()? {
        let mut entry = entry?;
        let relative = entry.path()?.into_owned();
        if !is_path_safe(&relative) {
            return Err(ArchiveError::UnsafePath(relative));
        }
        entry.unpack_in(dest)?;
    }
    debug!(?dest, "extracted tar archive");
    Ok(())
}
