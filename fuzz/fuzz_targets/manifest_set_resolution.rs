#![no_main]
use libfuzzer_sys::fuzz_target;
use module_resolver::module::{CandidateSource, ManifestSet, ModuleDependencies, ModuleInfo};
use module_resolver::ResolutionConfig;

fuzz_target!(|data: &[u8]| {
    // Fuzz manifest parsing and resolution of arbitrary candidate sets

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(set) = ManifestSet::from_toml_str(text) else {
        return;
    };

    let resolution = ModuleDependencies::resolve_source(&set, &ResolutionConfig::default());

    // Every candidate is either ordered or excluded, never both, never lost
    assert_eq!(
        resolution.load_order.len() + resolution.excluded.len(),
        set.candidates().len()
    );

    // Providers always precede consumers
    let order: Vec<String> = resolution.load_order.iter().map(|m| m.name()).collect();
    for (position, (consumer, providers)) in resolution.dependencies.iter().enumerate() {
        assert_eq!(&order[position], consumer);
        for provider in providers {
            assert!(order[..position].contains(provider));
        }
    }
});
