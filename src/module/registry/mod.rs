//! Module registry and dependency resolution
//!
//! Handles manifest parsing, capability graph construction and activation ordering.

pub mod cycles;
pub mod dependencies;
pub mod fulfillment;
pub mod graph;
pub mod manifest;
pub mod order;

pub use cycles::{find_cycle_sources, CycleReport};
pub use dependencies::{
    DependencyResolution, Exclusion, ExclusionReason, ModuleDependencies, ModuleResolver,
};
pub use fulfillment::compute_fulfillment;
pub use graph::{depth_first, DependencyGraph, DfsVisitor, FulfilledSubgraph, Vertex, VertexId};
pub use manifest::{ManifestSet, ModuleManifest};
pub use order::topological_order;
