// src/sequencer/analysis.rs

//! Read-only diagnostics over a [`Sequencer`]'s relation graph.
//!
//! The sequencer itself never rejects cycles; these helpers let callers
//! (e.g. pipeline validation) detect and report them, and render the graph
//! for inspection.

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;

use crate::sequencer::Sequencer;

impl Sequencer {
    /// Build a petgraph view of the current relations.
    ///
    /// Nodes and edges are inserted in sorted order so downstream
    /// algorithms produce stable output.
    fn digraph(&self) -> DiGraphMap<&str, ()> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        let mut names: Vec<&str> = self.steps().collect();
        names.sort_unstable();

        for name in names.iter().copied() {
            graph.add_node(name);
        }
        for name in names.iter().copied() {
            for pred in self.preds_of(name) {
                graph.add_edge(pred.as_str(), name, ());
            }
        }
        graph
    }

    /// True iff the current relations contain no cycle.
    pub fn is_acyclic(&self) -> bool {
        toposort(&self.digraph(), None).is_ok()
    }

    /// Strongly connected components with more than one member, i.e. the
    /// cycles currently present. Empty for an acyclic relation set.
    pub fn strong_connections(&self) -> Vec<Vec<String>> {
        tarjan_scc(&self.digraph())
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| scc.into_iter().map(str::to_string).collect())
            .collect()
    }

    /// Render the relation graph in Graphviz DOT format.
    ///
    /// Isolated steps appear as bare nodes; every direct relation becomes
    /// one edge. Output is sorted, so it is stable across runs.
    pub fn dot(&self) -> String {
        let mut names: Vec<&str> = self.steps().collect();
        names.sort_unstable();

        let mut out = String::from("digraph G {\n");
        for name in &names {
            if self.preds_of(name).is_empty() && self.succs_of(name).is_empty() {
                out.push_str(&format!("  \"{name}\";\n"));
            }
        }
        for name in &names {
            let mut preds: Vec<&String> = self.preds_of(name).iter().collect();
            preds.sort_unstable();
            for pred in preds {
                out.push_str(&format!("  \"{pred}\" -> \"{name}\";\n"));
            }
        }
        out.push_str("}\n");
        out
    }
}
