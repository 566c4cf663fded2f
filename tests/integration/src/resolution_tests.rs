//! End-to-end resolution from manifest directories on disk.
//!
//! Each test writes `addon.toml` files with `ManifestTree`, loads them back
//! through the loader and resolves them as the CLI does.

use addon_resolver::{
    CONFIG_FILENAME, LifecycleStatus, Problem, ResolutionResult, ResolverConfig, Version,
    load_dirs, resolve_records,
};
use addon_test_utils::{ManifestToml, ManifestTree};
use pretty_assertions::assert_eq;

/// Load every manifest under `dir` of the tree and resolve for `host`.
fn resolve_dir(tree: &ManifestTree, dir: &str, host: &str) -> ResolutionResult {
    let loaded = load_dirs(&[tree.path().join(dir)]).unwrap();
    let records: Vec<_> = loaded
        .into_iter()
        .map(|manifest| manifest.record.unwrap())
        .collect();
    resolve_records(host, &records)
}

/// A small add-on set modelled on a scanner distribution.
fn scanner_tree() -> ManifestTree {
    let tree = ManifestTree::new();
    tree.add_in("addOns", &ManifestToml::new("commonlib", "1.20.0", "2.14.0"));
    tree.add_in(
        "addOns",
        &ManifestToml::new("network", "0.12.0", "2.14.0").dependency("commonlib", ">=1.17.0"),
    );
    tree.add_in(
        "addOns",
        &ManifestToml::new("selenium", "15.16.0", "2.14.0")
            .dependency("network", ">=0.10.0, <1.0.0")
            .dependency("commonlib", ">=1.0.0"),
    );
    tree.add_in(
        "addOns",
        &ManifestToml::new("spider", "0.8.0", "2.14.0")
            .status("beta")
            .dependency("selenium", "*"),
    );
    tree.add_in("addOns", &ManifestToml::new("bruteforce", "13.0.0", "2.14.0"));
    tree
}

#[test]
fn test_scanner_set_resolves_dependencies_first() {
    let tree = scanner_tree();
    let order = resolve_dir(&tree, "addOns", "2.14.0").unwrap();

    assert_eq!(
        order.as_slice(),
        ["bruteforce", "commonlib", "network", "selenium", "spider"]
    );
}

#[test]
fn test_every_dependency_precedes_its_dependent() {
    let tree = scanner_tree();
    let order = resolve_dir(&tree, "addOns", "2.14.0").unwrap();

    let pairs = [
        ("commonlib", "network"),
        ("network", "selenium"),
        ("commonlib", "selenium"),
        ("selenium", "spider"),
    ];
    for (dependency, dependent) in pairs {
        assert!(
            order.position(dependency) < order.position(dependent),
            "{dependency} should load before {dependent}: {order:?}"
        );
    }
}

#[test]
fn test_older_host_rejects_whole_set() {
    let tree = scanner_tree();
    let report = resolve_dir(&tree, "addOns", "2.13.0").unwrap_err();

    let incompatible: Vec<_> = report
        .problems
        .iter()
        .filter(|p| matches!(p, Problem::HostIncompatible { .. }))
        .collect();
    assert_eq!(incompatible.len(), 5);
    assert!(report.unaffected.is_empty());
}

#[test]
fn test_failures_are_isolated_from_unaffected_addons() {
    let tree = scanner_tree();
    tree.add_in(
        "addOns",
        &ManifestToml::new("reports", "1.0.0", "2.14.0").dependency("commonlib", ">=2.0.0"),
    );
    tree.add_in(
        "addOns",
        &ManifestToml::new("legacy", "1.0.0", "2.0.0").max_host("2.10.0"),
    );

    let report = resolve_dir(&tree, "addOns", "2.14.0").unwrap_err();

    assert_eq!(
        report.problems,
        vec![
            Problem::HostIncompatible {
                identifier: "legacy".to_string(),
                required: ">=2.0.0, <2.10.0".parse().unwrap(),
                actual: Version::new(2, 14, 0),
            },
            Problem::VersionMismatch {
                source: "reports".to_string(),
                target: "commonlib".to_string(),
                required: ">=2.0.0".parse().unwrap(),
                actual: Version::new(1, 20, 0),
            },
        ]
    );
    assert_eq!(
        report.unaffected,
        ["bruteforce", "commonlib", "network", "selenium", "spider"]
    );
}

#[test]
fn test_cycle_across_directories() {
    let tree = ManifestTree::new();
    tree.add_in(
        "core",
        &ManifestToml::new("alpha", "1.0.0", "1.0.0").dependency("beta", ">=1.0.0"),
    );
    tree.add_in(
        "extra",
        &ManifestToml::new("beta", "1.0.0", "1.0.0").dependency("alpha", ">=1.0.0"),
    );
    tree.add_in("extra", &ManifestToml::new("gamma", "1.0.0", "1.0.0"));

    let loaded = load_dirs(&[tree.path().join("core"), tree.path().join("extra")]).unwrap();
    let records: Vec<_> = loaded.into_iter().map(|m| m.record.unwrap()).collect();
    let report = resolve_records("1.0.0", &records).unwrap_err();

    assert_eq!(
        report.problems,
        vec![Problem::Cycle {
            identifiers: vec!["alpha".to_string(), "beta".to_string()],
        }]
    );
    assert_eq!(report.unaffected, ["gamma"]);
}

#[test]
fn test_duplicate_across_directories_keeps_first_directory() {
    let tree = ManifestTree::new();
    tree.add_in("bundled", &ManifestToml::new("core", "1.0.0", "1.0.0"));
    tree.add_in("user", &ManifestToml::new("core", "2.0.0", "1.0.0"));
    tree.add_in(
        "user",
        &ManifestToml::new("ui", "1.0.0", "1.0.0").dependency("core", ">=1.0.0, <2.0.0"),
    );

    let loaded = load_dirs(&[tree.path().join("bundled"), tree.path().join("user")]).unwrap();
    let records: Vec<_> = loaded.into_iter().map(|m| m.record.unwrap()).collect();
    let report = resolve_records("1.0.0", &records).unwrap_err();

    // The bundled 1.0.0 copy is the one ui is checked against.
    assert_eq!(
        report.problems,
        vec![Problem::DuplicateIdentifier {
            identifier: "core".to_string(),
        }]
    );
    assert_eq!(report.unaffected, ["ui"]);
}

#[test]
fn test_invalid_manifest_reported_with_valid_ones_resolved() {
    let tree = ManifestTree::new();
    tree.add_in("addOns", &ManifestToml::new("good", "1.0.0", "1.0.0"));
    tree.add_in(
        "addOns",
        &ManifestToml::new("bad", "1.0.0", "1.0.0").dependency("good", "~1.0"),
    );

    let report = resolve_dir(&tree, "addOns", "1.0.0").unwrap_err();

    assert_eq!(report.problems.len(), 1);
    assert!(matches!(
        &report.problems[0],
        Problem::Validation { identifier, .. } if identifier == "bad"
    ));
    assert_eq!(report.unaffected, ["good"]);
}

#[test]
fn test_config_drives_host_and_directories() {
    let tree = scanner_tree();
    tree.write_file(
        CONFIG_FILENAME,
        "[host]\nversion = \"2.14.0\"\n\n[manifests]\ndirs = [\"addOns\"]\n",
    );

    let config = ResolverConfig::load(&tree.path().join(CONFIG_FILENAME)).unwrap();
    assert_eq!(config.manifests.dirs, vec![tree.path().join("addOns")]);

    let loaded = load_dirs(&config.manifests.dirs).unwrap();
    let records: Vec<_> = loaded.into_iter().map(|m| m.record.unwrap()).collect();
    let order = resolve_records(&config.host.version.to_string(), &records).unwrap();
    assert_eq!(order.len(), 5);
}

#[test]
fn test_manifest_metadata_survives_loading() {
    let tree = scanner_tree();
    let loaded = load_dirs(&[tree.path().join("addOns")]).unwrap();

    let spider = loaded
        .iter()
        .find(|m| m.path.ends_with("spider/addon.toml"))
        .unwrap();
    let spec = addon_resolver::ManifestSpec::build(spider.record.as_ref().unwrap()).unwrap();

    assert_eq!(spec.status(), LifecycleStatus::Beta);
    assert_eq!(spec.dependencies().len(), 1);
    assert_eq!(spec.dependencies()[0].target(), "selenium");
}
