//! Fulfillability propagation
//!
//! Decides, per vertex, whether the module can be activated. Vertices are
//! judged in depth-first finish order, so every provider a vertex depends on
//! has already been judged when the vertex itself is. The one exception is a
//! back-edge target, and back-edge sources are excluded up front.

use tracing::debug;

use crate::module::registry::cycles::CycleReport;
use crate::module::registry::dependencies::{Exclusion, ExclusionReason};
use crate::module::registry::graph::{depth_first, DependencyGraph, DfsVisitor, VertexId};

struct FulfillableChecker<'a> {
    graph: &'a DependencyGraph,
    cycles: &'a CycleReport,
    fulfilled: Vec<bool>,
    exclusions: Vec<Exclusion>,
}

impl FulfillableChecker<'_> {
    fn exclude(&mut self, vertex: VertexId, reason: ExclusionReason) {
        let v = self.graph.vertex(vertex);
        self.exclusions
            .push(Exclusion::new(v.name.clone(), v.candidate, reason));
    }
}

impl DfsVisitor for FulfillableChecker<'_> {
    fn finish_vertex(&mut self, vertex: VertexId) {
        let graph = self.graph;
        if self.cycles.sources.contains(&vertex) {
            self.exclude(vertex, ExclusionReason::CyclicDependency);
            return;
        }

        let v = graph.vertex(vertex);
        if !v.is_resolved() {
            let reason = ExclusionReason::UnresolvedRequirement {
                features: v.unresolved_feature_needs.iter().cloned().collect(),
                classes: v.unresolved_class_needs.iter().cloned().collect(),
            };
            self.exclude(vertex, reason);
            return;
        }

        let failed: Vec<String> = graph
            .providers(vertex)
            .iter()
            .filter(|&&p| !self.fulfilled[p])
            .map(|&p| graph.vertex(p).name.clone())
            .collect();

        if failed.is_empty() {
            debug!("Module {} is fulfilled", v.name);
            self.fulfilled[vertex] = true;
        } else if self.cycles.members.contains(&vertex) {
            self.exclude(vertex, ExclusionReason::CyclicDependency);
        } else {
            self.exclude(
                vertex,
                ExclusionReason::InheritedUnfulfillability {
                    dependencies: failed,
                },
            );
        }
    }
}

/// Annotate every vertex with its `fulfilled` flag
///
/// Returns one exclusion record per unfulfilled vertex, in finish order.
pub fn compute_fulfillment(graph: &mut DependencyGraph, cycles: &CycleReport) -> Vec<Exclusion> {
    let (fulfilled, exclusions) = {
        let snapshot: &DependencyGraph = graph;
        let mut checker = FulfillableChecker {
            graph: snapshot,
            cycles,
            fulfilled: vec![false; snapshot.len()],
            exclusions: Vec::new(),
        };
        depth_first(snapshot, &mut checker);
        (checker.fulfilled, checker.exclusions)
    };

    for (vertex, flag) in fulfilled.into_iter().enumerate() {
        graph.vertex_mut(vertex).fulfilled = flag;
    }
    exclusions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::registry::cycles::find_cycle_sources;
    use crate::module::registry::graph::Vertex;
    use crate::module::traits::ModuleDescriptor;

    fn judge(modules: &[(&str, &[&str], &[&str])]) -> (DependencyGraph, Vec<Exclusion>) {
        let mut graph = DependencyGraph::build(
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
        );
        let cycles = find_cycle_sources(&graph);
        let exclusions = compute_fulfillment(&mut graph, &cycles);
        (graph, exclusions)
    }

    fn reason_of<'a>(exclusions: &'a [Exclusion], module: &str) -> &'a ExclusionReason {
        &exclusions
            .iter()
            .find(|e| e.module == module)
            .expect("module should be excluded")
            .reason
    }

    #[test]
    fn test_all_satisfiable() {
        let (graph, exclusions) = judge(&[("a", &[], &["net"]), ("b", &["net"], &[])]);
        assert!(exclusions.is_empty());
        assert!(graph.vertices().iter().all(|v| v.fulfilled));
    }

    #[test]
    fn test_unresolved_requirement() {
        let (graph, exclusions) = judge(&[("a", &["x"], &[])]);
        assert!(!graph.vertex(0).fulfilled);
        assert_eq!(
            reason_of(&exclusions, "a"),
            &ExclusionReason::UnresolvedRequirement {
                features: vec!["x".to_string()],
                classes: vec![],
            }
        );
    }

    #[test]
    fn test_unfulfillability_is_transitive() {
        // c -> b -> a, a misses "x"
        let (graph, exclusions) = judge(&[
            ("c", &["b"], &[]),
            ("b", &["a"], &["b"]),
            ("a", &["x"], &["a"]),
        ]);
        assert!(graph.vertices().iter().all(|v| !v.fulfilled));
        assert_eq!(
            reason_of(&exclusions, "b"),
            &ExclusionReason::InheritedUnfulfillability {
                dependencies: vec!["a".to_string()],
            }
        );
        assert_eq!(
            reason_of(&exclusions, "c"),
            &ExclusionReason::InheritedUnfulfillability {
                dependencies: vec!["b".to_string()],
            }
        );
    }

    #[test]
    fn test_cycle_members_reported_as_cyclic() {
        let (graph, exclusions) = judge(&[("a", &["y"], &["z"]), ("b", &["z"], &["y"])]);
        assert!(!graph.vertex(0).fulfilled);
        assert!(!graph.vertex(1).fulfilled);
        assert_eq!(reason_of(&exclusions, "a"), &ExclusionReason::CyclicDependency);
        assert_eq!(reason_of(&exclusions, "b"), &ExclusionReason::CyclicDependency);
    }

    #[test]
    fn test_cycle_member_behind_cross_edge_is_cyclic() {
        // a <-> b, plus a -> c -> b: c closes a second cycle through b
        let (graph, exclusions) = judge(&[
            ("a", &["b", "c"], &["a"]),
            ("b", &["a"], &["b"]),
            ("c", &["b"], &["c"]),
        ]);
        assert!(graph.vertices().iter().all(|v| !v.fulfilled));
        for module in ["a", "b", "c"] {
            assert_eq!(reason_of(&exclusions, module), &ExclusionReason::CyclicDependency);
        }
    }

    #[test]
    fn test_dependent_of_cycle_inherits() {
        let (graph, exclusions) = judge(&[
            ("a", &["y"], &["z"]),
            ("b", &["z"], &["y"]),
            ("c", &["z"], &[]),
            ("free", &[], &["w"]),
        ]);
        assert!(!graph.vertex(2).fulfilled);
        assert!(graph.vertex(3).fulfilled);
        assert!(matches!(
            reason_of(&exclusions, "c"),
            ExclusionReason::InheritedUnfulfillability { .. }
        ));
        assert_eq!(exclusions.len(), 3);
    }
}
