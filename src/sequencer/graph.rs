// src/sequencer/graph.rs

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::debug;

/// Errors raised by [`Sequencer`] operations.
///
/// Both variants signal a caller-side logic error (asking about a step that
/// was never registered, or removing a relation twice); neither is a
/// transient condition worth retrying.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SequencerError {
    /// The requested step was never registered, explicitly or via a relation.
    #[error("unknown step '{0}'")]
    UnknownStep(String),

    /// The exact (predecessor, successor) pair was never added.
    #[error("unknown relation '{pred}' -> '{succ}'")]
    UnknownRelation { pred: String, succ: String },
}

/// Internal node structure: immediate predecessors and successors.
///
/// Both lists are kept in insertion order and de-duplicated on insert, so
/// iteration (and therefore [`Sequencer::get_steps`] output) is
/// deterministic across runs.
#[derive(Debug, Clone, Default)]
struct StepNode {
    preds: Vec<String>,
    succs: Vec<String>,
}

/// A partial order over named steps ("A must run before B") that can be
/// queried for a total ordering of everything a given step depends on.
///
/// Steps are opaque names, registered either explicitly via
/// [`add_step`](Sequencer::add_step) or implicitly by appearing in a
/// relation. Relations may form cycles: insertion never rejects them, and
/// [`get_steps`](Sequencer::get_steps) breaks them at query time instead.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    nodes: HashMap<String, StepNode>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `step` with no relations. No-op if already known.
    pub fn add_step(&mut self, step: &str) {
        self.ensure_step(step);
    }

    /// Single registration point shared by [`add_step`](Self::add_step) and
    /// [`add`](Self::add).
    fn ensure_step(&mut self, step: &str) -> &mut StepNode {
        self.nodes.entry(step.to_string()).or_default()
    }

    /// Record that `pred` must run strictly before `succ`.
    ///
    /// Both steps are registered implicitly if unknown. Adding the same pair
    /// twice is idempotent. Never fails, even when the new relation closes a
    /// cycle.
    pub fn add(&mut self, pred: &str, succ: &str) {
        let succ_node = self.ensure_step(succ);
        if !succ_node.preds.iter().any(|p| p == pred) {
            succ_node.preds.push(pred.to_string());
        }
        let pred_node = self.ensure_step(pred);
        if !pred_node.succs.iter().any(|s| s == succ) {
            pred_node.succs.push(succ.to_string());
        }
    }

    /// Delete the specific direct relation `pred` -> `succ`.
    ///
    /// Fails with [`SequencerError::UnknownRelation`] when the exact pair was
    /// never added; the check happens before any mutation, so state is
    /// untouched on error. The steps themselves stay registered.
    pub fn remove(&mut self, pred: &str, succ: &str) -> Result<(), SequencerError> {
        let present = self
            .nodes
            .get(succ)
            .map(|n| n.preds.iter().any(|p| p == pred))
            .unwrap_or(false);
        if !present {
            return Err(SequencerError::UnknownRelation {
                pred: pred.to_string(),
                succ: succ.to_string(),
            });
        }
        if let Some(node) = self.nodes.get_mut(succ) {
            node.preds.retain(|p| p != pred);
        }
        if let Some(node) = self.nodes.get_mut(pred) {
            node.succs.retain(|s| s != succ);
        }
        Ok(())
    }

    /// Delete `step` and purge it from every other step's relation lists.
    ///
    /// Safe to call defensively: unknown steps are silently ignored.
    pub fn remove_step(&mut self, step: &str) {
        if self.nodes.remove(step).is_none() {
            debug!(step, "remove_step on unknown step; ignoring");
            return;
        }
        for node in self.nodes.values_mut() {
            node.preds.retain(|p| p != step);
            node.succs.retain(|s| s != step);
        }
    }

    /// True iff `step` is currently known (explicitly added or implied by a
    /// relation).
    pub fn is_step(&self, step: &str) -> bool {
        self.nodes.contains_key(step)
    }

    /// All known step names, in no particular order.
    pub fn steps(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Immediate predecessors of a step, in the order their relations were
    /// added. Empty for unknown steps.
    pub fn preds_of(&self, step: &str) -> &[String] {
        self.nodes
            .get(step)
            .map(|n| n.preds.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate successors of a step, in the order their relations were
    /// added. Empty for unknown steps.
    pub fn succs_of(&self, step: &str) -> &[String] {
        self.nodes
            .get(step)
            .map(|n| n.succs.as_slice())
            .unwrap_or(&[])
    }

    /// Compute one valid total ordering of `final_step` and every step that
    /// must (transitively) precede it.
    ///
    /// The result contains each step exactly once, ends with `final_step`,
    /// and places `p` strictly before `s` for every direct relation
    /// `(p, s)` whose endpoints both appear — except that each cycle has at
    /// least one relation dropped so the query terminates. Which relation of
    /// a cycle is dropped depends on insertion order and is not part of the
    /// contract.
    ///
    /// Fails with [`SequencerError::UnknownStep`] when `final_step` is
    /// unknown; never returns a partial result.
    pub fn get_steps(&self, final_step: &str) -> Result<Vec<String>, SequencerError> {
        if !self.is_step(final_step) {
            return Err(SequencerError::UnknownStep(final_step.to_string()));
        }
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        self.visit(final_step, &mut seen, &mut result);
        Ok(result)
    }

    /// Depth-first post-order over predecessors.
    ///
    /// A step is marked seen *before* its predecessors are visited; a cycle
    /// therefore closes back onto a seen step and stops, instead of
    /// recursing forever. The seen check also collapses diamonds.
    fn visit(&self, step: &str, seen: &mut HashSet<String>, result: &mut Vec<String>) {
        if !seen.insert(step.to_string()) {
            return;
        }
        for pred in self.preds_of(step) {
            self.visit(pred, seen, result);
        }
        result.push(step.to_string());
    }
}
