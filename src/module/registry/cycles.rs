//! Cycle detection over the capability graph

use std::collections::BTreeSet;
use tracing::debug;

use crate::module::registry::graph::{depth_first, DependencyGraph, DfsVisitor, VertexId};

/// Result of the cycle detection pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Vertices originating at least one back edge; these are never fulfilled
    pub sources: BTreeSet<VertexId>,
    /// Every vertex lying on some cycle (superset of `sources`)
    ///
    /// The union of the strongly connected components of the sources. Used
    /// only to classify exclusions, never to decide them.
    pub members: BTreeSet<VertexId>,
}

impl CycleReport {
    pub fn is_acyclic(&self) -> bool {
        self.sources.is_empty()
    }
}

struct CycleDetector {
    sources: BTreeSet<VertexId>,
}

impl DfsVisitor for CycleDetector {
    fn back_edge(&mut self, source: VertexId, _target: VertexId) {
        self.sources.insert(source);
    }
}

/// Vertices reachable from `start` (inclusive) following `next`
fn reachable<'g, F>(graph_len: usize, start: VertexId, next: F) -> Vec<bool>
where
    F: Fn(VertexId) -> &'g [VertexId],
{
    let mut seen = vec![false; graph_len];
    let mut queue = vec![start];
    seen[start] = true;
    while let Some(vertex) = queue.pop() {
        for &adjacent in next(vertex) {
            if !seen[adjacent] {
                seen[adjacent] = true;
                queue.push(adjacent);
            }
        }
    }
    seen
}

/// Find the sources of all back edges in a depth-first traversal
///
/// Every cycle contains at least one back edge, so the components of the
/// sources cover every vertex on a cycle. Does not modify the graph.
pub fn find_cycle_sources(graph: &DependencyGraph) -> CycleReport {
    let mut detector = CycleDetector {
        sources: BTreeSet::new(),
    };
    depth_first(graph, &mut detector);

    let mut report = CycleReport {
        sources: detector.sources,
        members: BTreeSet::new(),
    };
    if report.is_acyclic() {
        return report;
    }

    let mut consumers: Vec<Vec<VertexId>> = vec![Vec::new(); graph.len()];
    for (consumer, provider) in graph.edges() {
        consumers[provider].push(consumer);
    }

    for &source in &report.sources {
        debug!("{} originates a back edge", graph.vertex(source).name);
        if report.members.contains(&source) {
            continue;
        }
        let forward = reachable(graph.len(), source, move |v| graph.providers(v));
        let backward = reachable(graph.len(), source, |v| consumers[v].as_slice());
        report
            .members
            .extend((0..graph.len()).filter(|&v| forward[v] && backward[v]));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::registry::graph::Vertex;
    use crate::module::traits::ModuleDescriptor;

    fn build(modules: &[(&str, &[&str], &[&str])]) -> DependencyGraph {
        DependencyGraph::build(
            modules
                .iter()
                .enumerate()
                .map(|(i, (name, needs, provides))| {
                    Vertex::from_descriptor(
                        i,
                        name.to_string(),
                        ModuleDescriptor::new()
                            .with_needs(needs.iter().copied())
                            .with_provides(provides.iter().copied()),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_acyclic_graph_has_no_sources() {
        let graph = build(&[("a", &[], &["a"]), ("b", &["a"], &["b"]), ("c", &["b"], &[])]);
        let report = find_cycle_sources(&graph);
        assert!(report.is_acyclic());
        assert!(report.members.is_empty());
    }

    #[test]
    fn test_two_cycle() {
        let graph = build(&[("a", &["y"], &["z"]), ("b", &["z"], &["y"])]);
        let report = find_cycle_sources(&graph);
        assert_eq!(report.sources, BTreeSet::from([1]));
        assert_eq!(report.members, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_three_cycle_with_tail() {
        // d -> a -> b -> c -> a
        let graph = build(&[
            ("d", &["a"], &[]),
            ("a", &["b"], &["a"]),
            ("b", &["c"], &["b"]),
            ("c", &["a"], &["c"]),
        ]);
        let report = find_cycle_sources(&graph);
        assert_eq!(report.sources, BTreeSet::from([3]));
        assert_eq!(report.members, BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn test_member_reached_through_finished_vertex() {
        // a -> b -> a is found first; c -> b is a cross edge to a finished vertex,
        // yet c sits on the cycle a -> c -> b -> a
        let graph = build(&[
            ("a", &["b", "c"], &["a"]),
            ("b", &["a"], &["b"]),
            ("c", &["b"], &["c"]),
        ]);
        let report = find_cycle_sources(&graph);
        assert_eq!(report.sources, BTreeSet::from([1]));
        assert_eq!(report.members, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn test_dependent_of_cycle_is_not_a_member() {
        let graph = build(&[
            ("a", &["y"], &["z"]),
            ("b", &["z"], &["y"]),
            ("tail", &["z"], &[]),
        ]);
        let report = find_cycle_sources(&graph);
        assert_eq!(report.members, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let graph = build(&[
            ("top", &["l", "r"], &[]),
            ("left", &["base"], &["l"]),
            ("right", &["base"], &["r"]),
            ("base", &[], &["base"]),
        ]);
        assert!(find_cycle_sources(&graph).is_acyclic());
    }
}
