//! Resolution of a batch of add-ons into a safe load order.
//!
//! A run goes through five passes over a fresh [`AddOnGraph`]:
//!
//! 1. host compatibility: add-ons whose host window excludes the host are
//!    left out of the graph;
//! 2. graph construction: duplicate identifiers are reported;
//! 3. edge satisfaction: dependencies on absent or out-of-range add-ons are
//!    reported and dropped from ordering;
//! 4. cycle detection over the remaining edges;
//! 5. topological ordering, ties broken by ascending identifier.
//!
//! Any problem in any pass makes the run fail with a [`ResolutionReport`]
//! listing every distinct problem found. Passes 2 to 4 do not need the host,
//! so [`resolve_records`] still runs them when the host version is malformed.
//!
//! # Example
//!
//! ```
//! use addon_resolver::manifest::{ManifestSpec, RawManifest};
//! use addon_resolver::resolver::Resolver;
//! use addon_resolver::version::Version;
//!
//! let specs: Vec<ManifestSpec> = [
//!     RawManifest::new("a", "1.0.0", "2.0.0").with_dependency("b", ">=1.0.0"),
//!     RawManifest::new("b", "1.2.0", "2.0.0"),
//! ]
//! .iter()
//! .map(|raw| ManifestSpec::build(raw).unwrap())
//! .collect();
//!
//! let order = Resolver::new(Version::new(2, 14, 0)).resolve(&specs).unwrap();
//! assert_eq!(order.as_slice(), ["b", "a"]);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::compat;
use crate::graph::AddOnGraph;
use crate::manifest::{ManifestSpec, RawManifest};
use crate::report::{LoadOrder, Problem, ResolutionReport, ResolutionResult};
use crate::version::Version;

/// Validated edges: each identifier maps to the dependencies it may be
/// ordered after.
type Adjacency<'a> = BTreeMap<&'a str, Vec<&'a str>>;

/// Resolves batches of add-ons against one host version.
///
/// Holds no state between runs; a single resolver can serve many threads.
#[derive(Debug, Clone)]
pub struct Resolver {
    host_version: Version,
}

impl Resolver {
    pub fn new(host_version: Version) -> Self {
        Self { host_version }
    }

    /// Validate and order a batch of specs.
    pub fn resolve(&self, specs: &[ManifestSpec]) -> ResolutionResult {
        tracing::debug!(
            host = %self.host_version,
            specs = specs.len(),
            "starting add-on resolution"
        );
        run_passes(Some(&self.host_version), specs, &[], ProblemLog::default())
    }
}

/// Resolve `specs` for a host at `host_version`.
pub fn resolve(host_version: &Version, specs: &[ManifestSpec]) -> ResolutionResult {
    Resolver::new(host_version.clone()).resolve(specs)
}

/// Validate raw records and resolve the valid ones.
///
/// A malformed host version and every invalid record are reported together
/// with the problems found among the valid records. Without a usable host
/// the graph passes still run; only host compatibility and ordering are
/// skipped, and no add-on is reported as unaffected.
pub fn resolve_records(host_version: &str, records: &[RawManifest]) -> ResolutionResult {
    let mut problems = ProblemLog::default();

    let host = Version::parse(host_version)
        .map_err(|_| {
            problems.record(Problem::MalformedVersion {
                text: host_version.to_string(),
            })
        })
        .ok();

    let mut specs = Vec::with_capacity(records.len());
    let mut invalid = BTreeSet::new();
    for record in records {
        match ManifestSpec::build(record) {
            Ok(spec) => specs.push(spec),
            Err(errors) => {
                if let Some(id) = record.addon.id.as_deref().filter(|id| !id.is_empty()) {
                    invalid.insert(id);
                }
                for error in errors {
                    problems.record(error.into());
                }
            }
        }
    }

    let invalid: Vec<&str> = invalid.into_iter().collect();
    run_passes(host.as_ref(), &specs, &invalid, problems)
}

/// Run every pass over one batch.
///
/// `invalid` lists identifiers claimed by records that failed validation;
/// each one also claimed by a valid spec is a duplicate.
fn run_passes(
    host: Option<&Version>,
    specs: &[ManifestSpec],
    invalid: &[&str],
    mut problems: ProblemLog,
) -> ResolutionResult {
    // Stable sort: among duplicates the first in input order is kept.
    let mut sorted: Vec<&ManifestSpec> = specs.iter().collect();
    sorted.sort_by(|a, b| a.identifier().cmp(b.identifier()));

    let accepted = match host {
        Some(host) => host_pass(host, &sorted, &mut problems),
        None => sorted.clone(),
    };

    let graph = build_graph(&accepted, &mut problems);
    for &id in invalid {
        if sorted
            .binary_search_by(|spec| spec.identifier().cmp(id))
            .is_ok()
        {
            problems.record(Problem::DuplicateIdentifier {
                identifier: id.to_string(),
            });
        }
    }

    let adjacency = satisfy_edges(&graph, &mut problems);
    for identifiers in find_cycles(&adjacency) {
        problems.record(Problem::Cycle { identifiers });
    }

    if problems.is_empty() {
        let order = load_order(&adjacency);
        tracing::info!(count = order.len(), "resolved add-on load order");
        return Ok(LoadOrder::new(order));
    }

    let problems = problems.into_vec();
    let unaffected = match host {
        Some(_) => {
            let implicated: HashSet<&str> = problems.iter().flat_map(Problem::subjects).collect();
            graph
                .identifiers()
                .filter(|id| !implicated.contains(id))
                .map(String::from)
                .collect()
        }
        None => Vec::new(),
    };

    Err(ResolutionReport {
        problems,
        unaffected,
    })
}

fn host_pass<'a>(
    host: &Version,
    sorted: &[&'a ManifestSpec],
    problems: &mut ProblemLog,
) -> Vec<&'a ManifestSpec> {
    let mut accepted = Vec::with_capacity(sorted.len());
    for &spec in sorted {
        if spec.admits_host(host) {
            accepted.push(spec);
        } else {
            problems.record(Problem::HostIncompatible {
                identifier: spec.identifier().to_string(),
                required: spec.host_window(),
                actual: host.clone(),
            });
        }
    }
    tracing::debug!(
        accepted = accepted.len(),
        excluded = sorted.len() - accepted.len(),
        "host compatibility pass complete"
    );
    accepted
}

/// Distinct problems in the order they were found.
#[derive(Debug, Default)]
struct ProblemLog {
    problems: Vec<Problem>,
    seen: HashSet<Problem>,
}

impl ProblemLog {
    fn record(&mut self, problem: Problem) {
        if !self.seen.insert(problem.clone()) {
            return;
        }
        tracing::warn!("{problem}");
        self.problems.push(problem);
    }

    fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    fn into_vec(self) -> Vec<Problem> {
        self.problems
    }
}

fn build_graph<'a>(accepted: &[&'a ManifestSpec], problems: &mut ProblemLog) -> AddOnGraph<'a> {
    let mut graph = AddOnGraph::new();
    for &spec in accepted {
        if let Err(err) = graph.insert(spec) {
            tracing::debug!("{err}");
            problems.record(Problem::DuplicateIdentifier {
                identifier: spec.identifier().to_string(),
            });
        }
    }
    tracing::debug!(
        nodes = graph.len(),
        edges = graph.edge_count(),
        "add-on graph built"
    );
    graph
}

/// Check every declared edge; return only the satisfied ones.
fn satisfy_edges<'a>(graph: &AddOnGraph<'a>, problems: &mut ProblemLog) -> Adjacency<'a> {
    let mut adjacency = Adjacency::new();
    for id in graph.identifiers() {
        let mut satisfied = Vec::new();
        for edge in graph.edges_from(id) {
            match graph.get(edge.target()) {
                None => problems.record(Problem::MissingDependency {
                    source: id.to_string(),
                    target: edge.target().to_string(),
                }),
                Some(target) if !compat::satisfies(target.version(), edge.range()) => {
                    problems.record(Problem::VersionMismatch {
                        source: id.to_string(),
                        target: edge.target().to_string(),
                        required: edge.range().clone(),
                        actual: target.version().clone(),
                    })
                }
                Some(_) => satisfied.push(edge.target()),
            }
        }
        adjacency.insert(id, satisfied);
    }
    adjacency
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first search from each unvisited node in ascending order.
///
/// Each back edge yields one cycle, listed from the re-entered node along the
/// current path. The path is an explicit stack of (node, next edge) frames.
fn find_cycles<'a>(adjacency: &Adjacency<'a>) -> Vec<Vec<String>> {
    let mut marks: HashMap<&'a str, Mark> = adjacency
        .keys()
        .map(|&id| (id, Mark::Unvisited))
        .collect();
    let mut cycles = Vec::new();

    for &root in adjacency.keys() {
        if marks.get(root) != Some(&Mark::Unvisited) {
            continue;
        }
        marks.insert(root, Mark::InProgress);
        let mut stack: Vec<(&'a str, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, index) = *frame;
            let edges = adjacency.get(node).map(Vec::as_slice).unwrap_or_default();
            let Some(&next) = edges.get(index) else {
                marks.insert(node, Mark::Done);
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks.get(next).copied().unwrap_or(Mark::Done) {
                Mark::Unvisited => {
                    marks.insert(next, Mark::InProgress);
                    stack.push((next, 0));
                }
                Mark::InProgress => {
                    if let Some(start) = stack.iter().position(|&(id, _)| id == next) {
                        cycles.push(stack[start..].iter().map(|&(id, _)| id.to_string()).collect());
                    }
                }
                Mark::Done => {}
            }
        }
    }

    cycles
}

/// Kahn's algorithm over an acyclic adjacency; the ready set is kept sorted.
fn load_order(adjacency: &Adjacency<'_>) -> Vec<String> {
    let mut pending: BTreeMap<&str, usize> = adjacency
        .iter()
        .map(|(&id, deps)| (id, deps.len()))
        .collect();

    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for (&id, deps) in adjacency {
        for &dep in deps {
            dependents.entry(dep).or_default().push(id);
        }
    }

    let mut ready: BTreeSet<&str> = pending
        .iter()
        .filter(|&(_, &count)| count == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut order = Vec::with_capacity(adjacency.len());
    while let Some(id) = ready.pop_first() {
        order.push(id.to_string());
        for &dependent in dependents.get(id).into_iter().flatten() {
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    order
}
