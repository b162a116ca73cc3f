// src/pipeline/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::pipeline::model::PipelineFile;
use crate::pipeline::validate::validate_pipeline;

/// Load a pipeline file from a given path and return the raw `PipelineFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (reference checks, cycle reporting). Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<PipelineFile> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading pipeline file at {path:?}"))?;

    let pipeline: PipelineFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML pipeline from {path:?}"))?;

    Ok(pipeline)
}

/// Load a pipeline file from path and run validation.
///
/// This is the recommended entry point for the rest of the application: it
/// reads TOML, applies defaults, checks `after` references and reports any
/// cycles (as warnings, since the sequencer tolerates them).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PipelineFile> {
    let pipeline = load_from_path(&path)?;
    validate_pipeline(&pipeline)?;
    Ok(pipeline)
}

/// Default pipeline path: `Distkit.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Distkit.toml")
}
