// src/sequencer/mod.rs

//! Dependency-ordered step sequencing.
//!
//! - [`graph`] holds the mutable predecessor/successor relation and the
//!   ordering query.
//! - [`analysis`] adds cycle diagnostics and Graphviz export on top.

pub mod analysis;
pub mod graph;

pub use graph::{Sequencer, SequencerError};
