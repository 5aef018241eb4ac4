//! Capability dependency graph
//!
//! One vertex per described module, edges consumer -> provider. Edges are
//! matched from a fixed snapshot of provide-sets; whether a provider can
//! itself be activated is judged later by the fulfillability pass.

use std::collections::BTreeSet;
use tracing::debug;

use crate::module::traits::ModuleDescriptor;

/// Index of a vertex within a [`DependencyGraph`]
pub type VertexId = usize;

/// Graph vertex for one successfully described module
#[derive(Debug, Clone)]
pub struct Vertex {
    /// Position of the module in the candidate sequence
    pub candidate: usize,
    /// Module name (diagnostics only)
    pub name: String,
    pub all_feature_needs: BTreeSet<String>,
    /// Feature needs no provider has been matched against yet
    pub unresolved_feature_needs: BTreeSet<String>,
    pub feature_provides: BTreeSet<String>,
    pub all_class_needs: BTreeSet<String>,
    /// Class needs no provider has been matched against yet
    pub unresolved_class_needs: BTreeSet<String>,
    pub class_provides: BTreeSet<String>,
    /// Set once by the fulfillability pass
    pub fulfilled: bool,
}

impl Vertex {
    /// Create a vertex with every need still unresolved
    pub fn from_descriptor(candidate: usize, name: String, descriptor: ModuleDescriptor) -> Self {
        Self {
            candidate,
            name,
            unresolved_feature_needs: descriptor.needs.clone(),
            all_feature_needs: descriptor.needs,
            feature_provides: descriptor.provides,
            unresolved_class_needs: descriptor.class_needs.clone(),
            all_class_needs: descriptor.class_needs,
            class_provides: descriptor.class_provides,
            fulfilled: false,
        }
    }

    /// Whether every declared need was matched to some provider
    pub fn is_resolved(&self) -> bool {
        self.unresolved_feature_needs.is_empty() && self.unresolved_class_needs.is_empty()
    }
}

/// Directed capability graph (adjacency list, consumer -> providers)
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    vertices: Vec<Vertex>,
    providers: Vec<Vec<VertexId>>,
}

impl DependencyGraph {
    /// Build the graph, matching every ordered pair of distinct vertices once
    ///
    /// For consumer `i` and provider `j`, the still-unresolved needs of `i`
    /// that `j` provides are removed from `i`'s unresolved sets and a single
    /// edge `(i, j)` is recorded, whether the match was by feature, by class,
    /// or both. Shrinking `i`'s sets only affects the pairs `(i, k)` visited
    /// after `(i, j)`.
    pub fn build(mut vertices: Vec<Vertex>) -> Self {
        let mut providers = vec![Vec::new(); vertices.len()];

        for i in 0..vertices.len() {
            for j in 0..vertices.len() {
                if i == j {
                    continue;
                }
                if vertices[i].is_resolved() {
                    break;
                }

                let feature_match: BTreeSet<String> = vertices[i]
                    .unresolved_feature_needs
                    .intersection(&vertices[j].feature_provides)
                    .cloned()
                    .collect();
                let class_match: BTreeSet<String> = vertices[i]
                    .unresolved_class_needs
                    .intersection(&vertices[j].class_provides)
                    .cloned()
                    .collect();

                if feature_match.is_empty() && class_match.is_empty() {
                    continue;
                }

                debug!(
                    "{} -> {}: features {:?}, classes {:?}",
                    vertices[i].name, vertices[j].name, feature_match, class_match
                );

                let consumer = &mut vertices[i];
                for feature in &feature_match {
                    consumer.unresolved_feature_needs.remove(feature);
                }
                for class in &class_match {
                    consumer.unresolved_class_needs.remove(class);
                }
                providers[i].push(j);
            }
        }

        Self {
            vertices,
            providers,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id]
    }

    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id]
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Providers the given consumer depends on, in candidate order
    pub fn providers(&self, consumer: VertexId) -> &[VertexId] {
        &self.providers[consumer]
    }

    /// All edges as `(consumer, provider)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.providers
            .iter()
            .enumerate()
            .flat_map(|(consumer, providers)| providers.iter().map(move |&p| (consumer, p)))
    }

    pub fn edge_count(&self) -> usize {
        self.providers.iter().map(Vec::len).sum()
    }

    /// Restrict the graph to fulfilled vertices and the edges between them
    pub fn fulfilled_subgraph(&self) -> FulfilledSubgraph {
        let keep: Vec<bool> = self.vertices.iter().map(|v| v.fulfilled).collect();
        let vertices: Vec<VertexId> = (0..self.vertices.len()).filter(|&v| keep[v]).collect();
        let providers = vertices
            .iter()
            .map(|&v| {
                self.providers[v]
                    .iter()
                    .copied()
                    .filter(|&p| keep[p])
                    .collect()
            })
            .collect();

        FulfilledSubgraph {
            vertices,
            providers,
        }
    }
}

/// Fulfilled-only projection of a [`DependencyGraph`]
///
/// Vertex ids are those of the parent graph; `providers[k]` belongs to
/// `vertices[k]`.
#[derive(Debug, Clone, Default)]
pub struct FulfilledSubgraph {
    pub vertices: Vec<VertexId>,
    pub providers: Vec<Vec<VertexId>>,
}

impl FulfilledSubgraph {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Events raised by [`depth_first`]
pub trait DfsVisitor {
    /// Edge `source -> target` where `target` is still on the DFS stack
    fn back_edge(&mut self, _source: VertexId, _target: VertexId) {}

    /// Every vertex reachable from `vertex` has already finished
    fn finish_vertex(&mut self, _vertex: VertexId) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Depth-first search over the whole graph with three-state coloring
///
/// Roots are taken in vertex order and edges in adjacency order, so the
/// traversal (and every event raised) is deterministic for a given graph.
pub fn depth_first<V: DfsVisitor>(graph: &DependencyGraph, visitor: &mut V) {
    let mut color = vec![Color::White; graph.len()];
    // (vertex, index of next outgoing edge to explore)
    let mut stack: Vec<(VertexId, usize)> = Vec::new();

    for root in 0..graph.len() {
        if color[root] != Color::White {
            continue;
        }
        color[root] = Color::Gray;
        stack.push((root, 0));

        while let Some(top) = stack.last_mut() {
            let vertex = top.0;
            let next = top.1;
            top.1 += 1;

            match graph.providers(vertex).get(next).copied() {
                Some(target) => match color[target] {
                    Color::White => {
                        color[target] = Color::Gray;
                        stack.push((target, 0));
                    }
                    Color::Gray => visitor.back_edge(vertex, target),
                    Color::Black => {}
                },
                None => {
                    color[vertex] = Color::Black;
                    stack.pop();
                    visitor.finish_vertex(vertex);
                }
            }
        }
    }
}
