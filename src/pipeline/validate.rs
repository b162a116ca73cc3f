// src/pipeline/validate.rs

use anyhow::{Result, anyhow};
use tracing::warn;

use crate::pipeline::build_sequencer;
use crate::pipeline::model::PipelineFile;

/// Run semantic validation against a loaded pipeline.
///
/// This checks:
/// - there is at least one step
/// - all `after` references refer to existing steps
/// - no step lists itself in `after`
///
/// Cycles are **not** an error: the sequencer resolves them at query time by
/// dropping an edge, so they are only reported here as warnings.
pub fn validate_pipeline(cfg: &PipelineFile) -> Result<()> {
    ensure_has_steps(cfg)?;
    validate_step_references(cfg)?;
    warn_on_cycles(cfg);
    Ok(())
}

fn ensure_has_steps(cfg: &PipelineFile) -> Result<()> {
    if cfg.step.is_empty() {
        return Err(anyhow!(
            "pipeline must contain at least one [step.<name>] section"
        ));
    }
    Ok(())
}

fn validate_step_references(cfg: &PipelineFile) -> Result<()> {
    for (name, step) in cfg.step.iter() {
        for dep in step.after.iter() {
            if !cfg.step.contains_key(dep) {
                return Err(anyhow!(
                    "step '{}' has unknown dependency '{}' in `after`",
                    name,
                    dep
                ));
            }
            if dep == name {
                return Err(anyhow!("step '{}' cannot depend on itself in `after`", name));
            }
        }
    }
    Ok(())
}

fn warn_on_cycles(cfg: &PipelineFile) {
    let seq = build_sequencer(cfg);
    for cycle in seq.strong_connections() {
        warn!(
            steps = ?cycle,
            "cycle in step relations; one relation per cycle will be ignored when ordering"
        );
    }
}
