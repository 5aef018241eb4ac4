//! Resolution of declarative manifest sets and resolver configuration files

use module_resolver::module::{CandidateSource, ManifestSet, ModuleManifest};
use module_resolver::{ExclusionReason, ModuleDependencies, ResolverConfig, TieBreak};
use tempfile::TempDir;

mod common;
use common::names;

const DESKTOP: &str = r#"
[[module]]
name = "http"
version = "1.0.0"
provides = ["http"]

[[module]]
name = "browser"
version = "2.1.0"
needs = ["http"]
provides = ["webbrowser"]
class_provides = ["org.example.browser.plugins"]

[[module]]
name = "adblock"
version = "0.3.0"
class_needs = ["org.example.browser.plugins"]

[[module]]
name = "aggregator"
version = "0.6.0"
needs = ["http", "webbrowser"]

[[module]]
name = "torrent"
version = "1.4"
needs = ["dht"]

[[module]]
name = "bad name"
provides = ["dht"]
"#;

#[test]
fn test_resolve_manifest_set_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("modules.toml");
    std::fs::write(&path, DESKTOP).unwrap();

    let set = ManifestSet::from_file(&path).unwrap();
    assert_eq!(set.candidates().len(), 6);

    let resolution = ModuleDependencies::resolve_source(&set, &Default::default());
    assert_eq!(
        names(&resolution.load_order),
        vec!["http", "browser", "adblock", "aggregator"]
    );

    // The invalid manifest cannot be described, so "dht" is never provided
    assert!(matches!(
        resolution.exclusion("bad name").unwrap().reason,
        ExclusionReason::DescriptionFailure(_)
    ));
    assert_eq!(
        resolution.exclusion("torrent").unwrap().reason,
        ExclusionReason::UnresolvedRequirement {
            features: vec!["dht".to_string()],
            classes: vec![],
        }
    );
}

#[test]
fn test_config_disables_module_and_its_dependents() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("resolver.toml");
    std::fs::write(
        &config_path,
        r#"
[resolution]
tie_break = "name"
disabled_modules = ["browser"]

[logging]
filter = "module_resolver=debug"
"#,
    )
    .unwrap();

    let config = ResolverConfig::from_toml_file(&config_path).unwrap();
    assert_eq!(config.resolution.tie_break, TieBreak::Name);
    assert_eq!(
        config.logging.as_ref().and_then(|l| l.filter.as_deref()),
        Some("module_resolver=debug")
    );

    let set = ManifestSet::from_toml_str(DESKTOP).unwrap();
    let resolution = ModuleDependencies::resolve_source(&set, &config.resolution);
    assert_eq!(names(&resolution.load_order), vec!["http"]);
    assert_eq!(
        resolution.exclusion("browser").unwrap().reason,
        ExclusionReason::Disabled
    );
    assert!(resolution.exclusion("adblock").unwrap().reason.is_direct());
}

#[test]
fn test_single_manifest_file_as_handle() {
    let temp_dir = TempDir::new().unwrap();
    let manifest_path = temp_dir.path().join("module.toml");
    let manifest = ModuleManifest {
        name: "standalone".to_string(),
        version: "1.0.0".to_string(),
        provides: vec!["clock".to_string()],
        ..Default::default()
    };
    std::fs::write(&manifest_path, manifest.to_toml_string().unwrap()).unwrap();

    let loaded = ModuleManifest::from_file(&manifest_path).unwrap();
    assert_eq!(loaded, manifest);
    let resolution = ModuleDependencies::resolve(&[loaded]);
    assert_eq!(names(&resolution.load_order), vec!["standalone"]);
}

#[test]
fn test_malformed_config_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("resolver.json");
    std::fs::write(&path, r#"{"resolution": {"tie_break": "random"}}"#).unwrap();
    assert!(ResolverConfig::from_json_file(&path).is_err());
}
