//! The add-on dependency graph.
//!
//! Nodes are [`ManifestSpec`]s keyed by identifier; edges are the
//! [`DependencyEdge`]s each spec declares, stored as identifier pairs rather
//! than references between nodes. Edges pointing at identifiers that are not
//! in the graph are kept as-is; the resolver reports them.
//!
//! # Example
//!
//! ```
//! use addon_resolver::graph::AddOnGraph;
//! use addon_resolver::manifest::{ManifestSpec, RawManifest};
//!
//! let core = ManifestSpec::build(&RawManifest::new("core", "1.0.0", "2.0.0")).unwrap();
//! let ui = ManifestSpec::build(
//!     &RawManifest::new("ui", "1.0.0", "2.0.0").with_dependency("core", ">=1.0.0"),
//! )
//! .unwrap();
//!
//! let mut graph = AddOnGraph::new();
//! graph.insert(&ui).unwrap();
//! graph.insert(&core).unwrap();
//!
//! assert_eq!(graph.identifiers().collect::<Vec<_>>(), vec!["core", "ui"]);
//! assert_eq!(graph.edges_from("ui")[0].target(), "core");
//! ```

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::manifest::{DependencyEdge, ManifestSpec};

/// Directed graph of add-ons borrowed from a resolution batch.
///
/// Edges point from dependent to dependency: if A depends on B, the edge
/// is `A -> B`.
#[derive(Debug, Clone, Default)]
pub struct AddOnGraph<'a> {
    nodes: BTreeMap<&'a str, &'a ManifestSpec>,
}

impl<'a> AddOnGraph<'a> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spec to the graph.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateIdentifier` if a spec with the same
    /// identifier is already present. The graph is left unchanged.
    pub fn insert(&mut self, spec: &'a ManifestSpec) -> Result<()> {
        if self.nodes.contains_key(spec.identifier()) {
            return Err(Error::DuplicateIdentifier(spec.identifier().to_string()));
        }
        self.nodes.insert(spec.identifier(), spec);
        Ok(())
    }

    /// Look up a spec by identifier.
    pub fn get(&self, id: &str) -> Option<&'a ManifestSpec> {
        self.nodes.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Dependencies declared by `id`, in declaration order.
    ///
    /// Unknown identifiers have no edges.
    pub fn edges_from(&self, id: &str) -> &'a [DependencyEdge] {
        self.nodes
            .get(id)
            .copied()
            .map(ManifestSpec::dependencies)
            .unwrap_or_default()
    }

    /// All identifiers in ascending order.
    pub fn identifiers(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.nodes.keys().copied()
    }

    /// Return the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the number of declared edges, including unsatisfied ones.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|spec| spec.dependencies().len()).sum()
    }
}
