//! Module dependency resolution
//!
//! Decides which candidate modules can be activated and in which order.
//! Every pass recomputes from scratch:
//!
//! 1. Drop disabled candidates and those that cannot be described
//! 2. Build the capability graph (consumer -> provider edges)
//! 3. Find back-edge sources (cycle participants)
//! 4. Propagate fulfillability in depth-first finish order
//! 5. Topologically sort the fulfilled subgraph
//!
//! Nothing in the candidate set can make resolution fail; every omitted
//! module is reported as an [`Exclusion`] and logged.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ResolutionConfig;
use crate::module::registry::cycles::find_cycle_sources;
use crate::module::registry::fulfillment::compute_fulfillment;
use crate::module::registry::graph::{DependencyGraph, Vertex};
use crate::module::registry::order::topological_order;
use crate::module::traits::{CandidateSource, ModuleInfo};

/// Why a candidate was left out of the activation order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExclusionReason {
    #[error("disabled by configuration")]
    Disabled,

    #[error("descriptor unavailable: {0}")]
    DescriptionFailure(String),

    #[error("unresolved requirements: features {features:?}, classes {classes:?}")]
    UnresolvedRequirement {
        features: Vec<String>,
        classes: Vec<String>,
    },

    #[error("participates in a dependency cycle")]
    CyclicDependency,

    #[error("depends on an unfulfillable module: {dependencies:?}")]
    InheritedUnfulfillability { dependencies: Vec<String> },
}

impl ExclusionReason {
    /// Whether the module itself is at fault, as opposed to something it depends on
    pub fn is_direct(&self) -> bool {
        !matches!(self, ExclusionReason::InheritedUnfulfillability { .. })
    }
}

/// A candidate omitted from the activation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    /// Module name as reported by the handle
    pub module: String,
    /// Position of the module in the candidate sequence
    pub candidate: usize,
    pub reason: ExclusionReason,
}

impl Exclusion {
    /// Record an omitted candidate, logging it once at `warn`
    pub(crate) fn new(module: String, candidate: usize, reason: ExclusionReason) -> Self {
        warn!("Module {} excluded: {}", module, reason);
        Self {
            module,
            candidate,
            reason,
        }
    }
}

/// Dependency resolution result
#[derive(Debug, Clone)]
pub struct DependencyResolution<H> {
    /// Modules in activation order (providers first)
    pub load_order: Vec<H>,
    /// Providers of each activated module, by name, in activation order
    pub dependencies: Vec<(String, Vec<String>)>,
    /// Omitted candidates, by candidate position
    pub excluded: Vec<Exclusion>,
}

impl<H> Default for DependencyResolution<H> {
    fn default() -> Self {
        Self {
            load_order: Vec::new(),
            dependencies: Vec::new(),
            excluded: Vec::new(),
        }
    }
}

impl<H> DependencyResolution<H> {
    /// Exclusion record for the named module, if it was left out
    pub fn exclusion(&self, module: &str) -> Option<&Exclusion> {
        self.excluded.iter().find(|e| e.module == module)
    }

    pub fn is_complete(&self) -> bool {
        self.excluded.is_empty()
    }
}

/// Dependency resolver
pub struct ModuleDependencies;

impl ModuleDependencies {
    /// Resolve with the default configuration
    pub fn resolve<H: ModuleInfo + Clone>(candidates: &[H]) -> DependencyResolution<H> {
        Self::resolve_with(candidates, &ResolutionConfig::default())
    }

    /// Resolve the candidates supplied by a [`CandidateSource`]
    pub fn resolve_source<S>(source: &S, config: &ResolutionConfig) -> DependencyResolution<S::Handle>
    where
        S: CandidateSource + ?Sized,
        S::Handle: ModuleInfo + Clone,
    {
        Self::resolve_with(&source.candidates(), config)
    }

    /// Resolve module dependencies and determine activation order
    pub fn resolve_with<H: ModuleInfo + Clone>(
        candidates: &[H],
        config: &ResolutionConfig,
    ) -> DependencyResolution<H> {
        let mut excluded = Vec::new();
        let vertices = Self::describe_candidates(candidates, config, &mut excluded);

        let mut graph = DependencyGraph::build(vertices);
        debug!(
            "Built dependency graph: {} vertices, {} edges",
            graph.len(),
            graph.edge_count()
        );

        let cycles = find_cycle_sources(&graph);
        if !cycles.is_acyclic() {
            info!(
                "Dependency cycles detected through {} module(s)",
                cycles.members.len()
            );
        }

        excluded.extend(compute_fulfillment(&mut graph, &cycles));
        excluded.sort_by_key(|e| e.candidate);

        let subgraph = graph.fulfilled_subgraph();
        let order = topological_order(&subgraph, &graph, config.tie_break);

        let dependencies = order
            .iter()
            .map(|&v| {
                let providers = graph
                    .providers(v)
                    .iter()
                    .map(|&p| graph.vertex(p).name.clone())
                    .collect();
                (graph.vertex(v).name.clone(), providers)
            })
            .collect();
        let load_order: Vec<H> = order
            .iter()
            .map(|&v| candidates[graph.vertex(v).candidate].clone())
            .collect();

        info!(
            "Dependency resolution complete: {} of {} modules activatable",
            load_order.len(),
            candidates.len()
        );

        DependencyResolution {
            load_order,
            dependencies,
            excluded,
        }
    }

    /// Capture a descriptor per candidate, dropping those that cannot be described
    fn describe_candidates<H: ModuleInfo>(
        candidates: &[H],
        config: &ResolutionConfig,
        excluded: &mut Vec<Exclusion>,
    ) -> Vec<Vertex> {
        let mut vertices = Vec::with_capacity(candidates.len());

        for (candidate, handle) in candidates.iter().enumerate() {
            let name = handle.name();

            if config.is_disabled(&name) {
                excluded.push(Exclusion::new(name, candidate, ExclusionReason::Disabled));
                continue;
            }

            match handle.describe() {
                Ok(descriptor) => {
                    vertices.push(Vertex::from_descriptor(candidate, name, descriptor));
                }
                Err(e) => {
                    excluded.push(Exclusion::new(
                        name,
                        candidate,
                        ExclusionReason::DescriptionFailure(e.to_string()),
                    ));
                }
            }
        }

        vertices
    }
}

/// Stateful resolver holding a candidate set and the last computed result
///
/// Changing the candidate set does not touch the cached result; call
/// [`ModuleResolver::calculate`] to recompute.
#[derive(Debug, Clone)]
pub struct ModuleResolver<H> {
    candidates: Vec<H>,
    config: ResolutionConfig,
    last: Option<DependencyResolution<H>>,
}

impl<H: ModuleInfo + Clone> ModuleResolver<H> {
    pub fn new() -> Self {
        Self::with_config(ResolutionConfig::default())
    }

    pub fn with_config(config: ResolutionConfig) -> Self {
        Self {
            candidates: Vec::new(),
            config,
            last: None,
        }
    }

    pub fn add_module(&mut self, module: H) {
        self.candidates.push(module);
    }

    pub fn add_modules<I: IntoIterator<Item = H>>(&mut self, modules: I) {
        self.candidates.extend(modules);
    }

    /// Remove every candidate with the given name, returning how many were removed
    pub fn remove_module(&mut self, name: &str) -> usize {
        let before = self.candidates.len();
        self.candidates.retain(|m| m.name() != name);
        before - self.candidates.len()
    }

    pub fn candidates(&self) -> &[H] {
        &self.candidates
    }

    /// Recompute the activation order from the current candidate set
    pub fn calculate(&mut self) -> &[H] {
        let resolution = ModuleDependencies::resolve_with(&self.candidates, &self.config);
        &self.last.insert(resolution).load_order
    }

    /// Activation order from the most recent [`calculate`](Self::calculate)
    ///
    /// Empty if nothing has been calculated yet.
    pub fn last_result(&self) -> &[H] {
        self.last
            .as_ref()
            .map(|r| r.load_order.as_slice())
            .unwrap_or(&[])
    }

    pub fn last_resolution(&self) -> Option<&DependencyResolution<H>> {
        self.last.as_ref()
    }
}

impl<H: ModuleInfo + Clone> Default for ModuleResolver<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> CandidateSource for ModuleResolver<H> {
    type Handle = H;

    fn candidates(&self) -> Vec<H> {
        self.candidates.clone()
    }
}
