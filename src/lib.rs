// src/lib.rs

//! Support library for a packaging ecosystem: dependency-ordered step
//! sequencing, package metadata across historical format versions,
//! in-package resource location and caching, and a handful of smaller
//! utilities (export-entry parsing, archive extraction, pub/sub events,
//! progress accounting).

pub mod archive;
pub mod cli;
pub mod errors;
pub mod events;
pub mod export;
pub mod logging;
pub mod metadata;
pub mod pipeline;
pub mod progress;
pub mod resources;
pub mod sequencer;

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::pipeline::{PipelineFile, build_sequencer, load_and_validate, terminal_steps};
use crate::sequencer::Sequencer;

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the pipeline file, builds the sequencer, and prints
/// either the DOT graph, a dry-run listing, or ordered plans.
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let seq = build_sequencer(&cfg);

    if args.dry_run {
        print_dry_run(&cfg, &seq);
        return Ok(());
    }
    if args.dot {
        print!("{}", seq.dot());
        return Ok(());
    }

    let targets = match args.target {
        Some(target) => vec![target],
        None => terminal_steps(&seq),
    };
    debug!(?targets, "planning targets");

    for target in targets {
        let plan = seq.get_steps(&target)?;
        println!("{target}: {}", plan.join(" -> "));
    }
    Ok(())
}

/// Simple dry-run output: print steps, relations and descriptions.
fn print_dry_run(cfg: &PipelineFile, seq: &Sequencer) {
    println!("distkit dry-run");
    println!();
    println!("steps ({}):", cfg.step.len());
    for (name, step) in cfg.step.iter() {
        println!("  - {name}");
        if let Some(ref description) = step.description {
            println!("      description: {description}");
        }
        if !step.after.is_empty() {
            println!("      after: {:?}", step.after);
        }
    }
    let cycles = seq.strong_connections();
    if !cycles.is_empty() {
        println!();
        println!("cycles: {cycles:?}");
    }
}
