// src/pipeline/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level pipeline description as read from a TOML file.
///
/// ```toml
/// [step.check]
/// description = "verify package metadata"
///
/// [step.sdist]
/// after = ["check"]
///
/// [step.upload_sdist]
/// after = ["sdist", "register"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineFile {
    /// All steps from `[step.<name>]`. Keys are the step names.
    #[serde(default)]
    pub step: BTreeMap<String, StepConfig>,
}

/// `[step.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepConfig {
    /// Optional human-readable description, shown in `--dry-run` output.
    #[serde(default)]
    pub description: Option<String>,

    /// Steps that must run before this one (`after = ["a", "b"]`).
    #[serde(default)]
    pub after: Vec<String>,
}
