// src/errors.rs

//! Crate-wide error aliases and re-exports.
//!
//! The application boundary uses `anyhow`; the individual modules define
//! structured error types, gathered here for convenient importing.

pub use anyhow::{Error, Result};

pub use crate::archive::ArchiveError;
pub use crate::events::EventsError;
pub use crate::export::ExportError;
pub use crate::metadata::MetadataError;
pub use crate::resources::ResourceError;
pub use crate::sequencer::SequencerError;
