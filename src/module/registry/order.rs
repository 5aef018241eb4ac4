//! Activation ordering of the fulfilled subgraph
//!
//! Kahn's algorithm over the provider relation: a module becomes ready once
//! all of its providers have been emitted. Ties among ready modules are
//! broken by a fixed rank, so the output is deterministic.

use std::collections::BTreeSet;
use tracing::error;

use crate::config::TieBreak;
use crate::module::registry::graph::{DependencyGraph, FulfilledSubgraph, VertexId};

/// Rank of every vertex of `graph` under the given tie-break (lower first)
fn ranks(graph: &DependencyGraph, tie_break: TieBreak) -> Vec<usize> {
    let mut by_key: Vec<VertexId> = (0..graph.len()).collect();
    match tie_break {
        TieBreak::Registration => by_key.sort_by_key(|&v| graph.vertex(v).candidate),
        TieBreak::Name => by_key.sort_by(|&a, &b| {
            let (va, vb) = (graph.vertex(a), graph.vertex(b));
            va.name
                .cmp(&vb.name)
                .then(va.candidate.cmp(&vb.candidate))
        }),
    }

    let mut rank = vec![0; graph.len()];
    for (position, vertex) in by_key.into_iter().enumerate() {
        rank[vertex] = position;
    }
    rank
}

/// Order the subgraph so every provider precedes its consumers
pub fn topological_order(
    subgraph: &FulfilledSubgraph,
    graph: &DependencyGraph,
    tie_break: TieBreak,
) -> Vec<VertexId> {
    let rank = ranks(graph, tie_break);

    // Providers still to be emitted, and reverse adjacency provider -> consumers
    let mut pending = vec![0usize; graph.len()];
    let mut consumers: Vec<Vec<VertexId>> = vec![Vec::new(); graph.len()];
    for (&consumer, providers) in subgraph.vertices.iter().zip(&subgraph.providers) {
        pending[consumer] = providers.len();
        for &provider in providers {
            consumers[provider].push(consumer);
        }
    }

    let mut ready: BTreeSet<(usize, VertexId)> = subgraph
        .vertices
        .iter()
        .filter(|&&v| pending[v] == 0)
        .map(|&v| (rank[v], v))
        .collect();

    let mut order = Vec::with_capacity(subgraph.len());
    while let Some((_, vertex)) = ready.pop_first() {
        order.push(vertex);
        for &consumer in &consumers[vertex] {
            pending[consumer] -= 1;
            if pending[consumer] == 0 {
                ready.insert((rank[consumer], consumer));
            }
        }
    }

    if order.len() != subgraph.len() {
        let stuck: Vec<&str> = subgraph
            .vertices
            .iter()
            .filter(|&&v| pending[v] > 0)
            .map(|&v| graph.vertex(v).name.as_str())
            .collect();
        error!(
            "Fulfilled subgraph is not acyclic, dropping {:?} from the activation order",
            stuck
        );
    }

    order
}
