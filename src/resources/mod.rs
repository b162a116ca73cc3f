// src/resources/mod.rs

//! Locating and caching in-package resources.
//!
//! - [`finder`] resolves `/`-separated resource names against a directory
//!   tree or a zip archive.
//! - [`cache`] materialises archive-backed resources to real files for
//!   consumers that need a filesystem path.

pub mod cache;
pub mod finder;

pub use cache::Cache;
pub use finder::{FileFinder, Resource, ResourceError, ResourceFinder, ZipFinder};
