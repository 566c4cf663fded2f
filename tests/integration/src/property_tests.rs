//! Ordering and cycle properties over randomly generated add-on batches.

use addon_resolver::manifest::{ManifestSpec, RawManifest};
use addon_resolver::version::Version;
use addon_resolver::{Problem, Resolver};
use proptest::prelude::*;

/// A random acyclic batch: add-on `i` may only depend on add-ons `j < i`.
fn dag_strategy() -> impl Strategy<Value = Vec<ManifestSpec>> {
    (1usize..8)
        .prop_flat_map(|n| prop::collection::vec(prop::collection::vec(any::<bool>(), n), n))
        .prop_map(|matrix| {
            (0..matrix.len())
                .map(|i| {
                    let raw = (0..i)
                        .filter(|&j| matrix[i][j])
                        .fold(RawManifest::new(format!("addon{i}"), "1.0.0", "1.0.0"), |raw, j| {
                            raw.with_dependency(format!("addon{j}"), ">=1.0.0")
                        });
                    ManifestSpec::build(&raw).unwrap()
                })
                .collect()
        })
}

fn depends_on(spec: &ManifestSpec, target: usize) -> bool {
    let target = format!("addon{target}");
    spec.dependencies().iter().any(|edge| edge.target() == target)
}

/// Rebuild `spec` with one more dependency on `addon{target}`.
fn with_edge(spec: &ManifestSpec, target: usize) -> ManifestSpec {
    let raw = spec
        .dependencies()
        .iter()
        .fold(RawManifest::new(spec.identifier(), "1.0.0", "1.0.0"), |raw, edge| {
            raw.with_dependency(edge.target(), edge.range().to_string())
        })
        .with_dependency(format!("addon{target}"), ">=1.0.0");
    ManifestSpec::build(&raw).unwrap()
}

proptest! {
    #[test]
    fn test_order_is_independent_of_input_order(
        (specs, shuffled) in dag_strategy().prop_flat_map(|specs| {
            let shuffled = Just(specs.clone()).prop_shuffle();
            (Just(specs), shuffled)
        })
    ) {
        let resolver = Resolver::new(Version::new(1, 0, 0));
        let order = resolver.resolve(&specs).unwrap();
        let reordered = resolver.resolve(&shuffled).unwrap();
        prop_assert_eq!(&order, &reordered);
        prop_assert_eq!(order.len(), specs.len());

        for spec in &specs {
            for edge in spec.dependencies() {
                prop_assert!(order.position(edge.target()) < order.position(edge.source()));
            }
        }
    }

    #[test]
    fn test_back_edge_always_reports_cycle(specs in dag_strategy(), pick in 0usize..8) {
        let mut specs = specs;
        let last = specs.len() - 1;
        let first = pick % specs.len();

        // first -> last plus last -> first closes a loop; first == last is a self-loop.
        specs[first] = with_edge(&specs[first], last);
        if first != last && !depends_on(&specs[last], first) {
            specs[last] = with_edge(&specs[last], first);
        }

        let report = Resolver::new(Version::new(1, 0, 0)).resolve(&specs).unwrap_err();
        prop_assert!(!report.problems.is_empty());
        let all_cycles = report.problems.iter().all(|p| matches!(p, Problem::Cycle { .. }));
        prop_assert!(all_cycles);
    }
}
