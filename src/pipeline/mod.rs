// src/pipeline/mod.rs

//! Pipeline descriptions: a TOML file naming build/install steps and their
//! must-run-before relations, turned into a [`Sequencer`].
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a pipeline file from disk (`loader.rs`).
//! - Validate references and report (but not reject) cycles (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{PipelineFile, StepConfig};
pub use validate::validate_pipeline;

use crate::sequencer::Sequencer;

/// Build a [`Sequencer`] from a loaded pipeline.
///
/// Steps are registered in key order and relations in `after` order, so the
/// resulting orderings are stable for a given file.
pub fn build_sequencer(cfg: &PipelineFile) -> Sequencer {
    let mut seq = Sequencer::new();
    for name in cfg.step.keys() {
        seq.add_step(name);
    }
    for (name, step) in cfg.step.iter() {
        for dep in step.after.iter() {
            seq.add(dep, name);
        }
    }
    seq
}

/// Steps nothing else depends on; the natural "plan everything up to here"
/// targets when the CLI is given no explicit `--target`.
pub fn terminal_steps(seq: &Sequencer) -> Vec<String> {
    let mut names: Vec<String> = seq
        .steps()
        .filter(|name| seq.succs_of(name).is_empty())
        .map(str::to_string)
        .collect();
    names.sort_unstable();
    names
}
