//! Latest-Deadline-First sequence construction.
//!
//! Builds the sequence end-to-start: repeatedly take, among jobs whose
//! successors have all been placed, the one ranked first by the LDF rule
//! (latest deadline, larger ID on ties) and put it at the back. Reversing
//! the result yields a topological order in which every job precedes its
//! successors.
//!
//! # Reference
//! Lawler (1973), "Optimal Sequencing of a Single Machine Subject to
//! Precedence Constraints"

use crate::dispatching::{RuleEngine, SchedulingContext};
use crate::graph::TaskGraph;

/// Returns job indices in execution order.
pub fn reverse_sequence(graph: &TaskGraph, engine: &RuleEngine) -> Vec<usize> {
    let n = graph.len();
    let mut unplaced_succs: Vec<usize> = (0..n).map(|i| graph.successors(i).len()).collect();
    let mut schedulable: Vec<usize> = (0..n).filter(|&i| unplaced_succs[i] == 0).collect();
    let ctx = SchedulingContext::default();

    let mut order = Vec::with_capacity(n);
    while let Some(last) = engine.select_best(&schedulable, graph, &ctx) {
        schedulable.retain(|&i| i != last);
        order.push(last);
        for edge in graph.predecessors(last) {
            unplaced_succs[edge.peer] -= 1;
            if unplaced_succs[edge.peer] == 0 {
                schedulable.push(edge.peer);
            }
        }
    }
    order.reverse();
    order
}
