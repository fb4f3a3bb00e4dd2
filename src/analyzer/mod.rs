//! Analyzer dispatch: class-keyed registry with ancestor-walk lookup.

mod static_mesh;

pub use static_mesh::StaticMeshAnalyzer;

use crate::asset::{Asset, AssetClass, AssetRef};
use crate::profile::Profile;
use crate::report::AnalysisResult;
use crate::rules::CheckContext;

/// Runs every applicable rule against one loaded asset.
pub trait AssetAnalyzer: Send + Sync {
    fn analyze(
        &self,
        asset: &AssetRef,
        object: &dyn Asset,
        profile: &Profile,
        ctx: &CheckContext,
        results: &mut Vec<AnalysisResult>,
    );
}

/// Ordered analyzer registrations keyed by asset class.
///
/// Dispatch walks the asset's class ancestry most-derived first, so an
/// analyzer registered on `Mesh` serves a `StaticMesh` that has no
/// specific registration. Within one class, the earliest registration
/// wins. An asset whose whole ancestry has no registration is a no-op,
/// never an error: hosts plug in analyzers for the classes they care
/// about.
#[derive(Default)]
pub struct AnalyzerRegistry {
    entries: Vec<(AssetClass, Box<dyn AssetAnalyzer>)>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in static-mesh analyzer installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(AssetClass::StaticMesh, Box::new(StaticMeshAnalyzer::new()));
        registry
    }

    pub fn register(&mut self, class: AssetClass, analyzer: Box<dyn AssetAnalyzer>) {
        self.entries.push((class, analyzer));
    }

    fn lookup(&self, class: AssetClass) -> Option<&dyn AssetAnalyzer> {
        class.ancestry().find_map(|ancestor| {
            self.entries
                .iter()
                .find(|(registered, _)| *registered == ancestor)
                .map(|(_, analyzer)| analyzer.as_ref())
        })
    }

    /// Dispatch one asset to its analyzer, if any is registered for its
    /// class or an ancestor.
    pub fn analyze(
        &self,
        asset: &AssetRef,
        object: &dyn Asset,
        profile: &Profile,
        ctx: &CheckContext,
        results: &mut Vec<AnalysisResult>,
    ) {
        match self.lookup(object.class()) {
            Some(analyzer) => analyzer.analyze(asset, object, profile, ctx, results),
            None => {
                tracing::debug!(asset = %asset, class = %object.class(), "no analyzer registered");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::StaticMesh;
    use crate::report::Severity;

    struct StubAnalyzer {
        tag: &'static str,
    }

    impl AssetAnalyzer for StubAnalyzer {
        fn analyze(
            &self,
            asset: &AssetRef,
            _object: &dyn Asset,
            _profile: &Profile,
            _ctx: &CheckContext,
            results: &mut Vec<AnalysisResult>,
        ) {
            results.push(AnalysisResult::new(
                asset.clone(),
                Severity::Info,
                self.tag,
                "stub",
            ));
        }
    }

    fn run(registry: &AnalyzerRegistry) -> Vec<AnalysisResult> {
        let mesh = StaticMesh::new("SM_X", &[10]);
        let mut results = Vec::new();
        registry.analyze(
            &AssetRef::new("x", "SM_X"),
            &mesh,
            &Profile::with_default_rules(),
            &CheckContext::default(),
            &mut results,
        );
        results
    }

    #[test]
    fn ancestor_registration_serves_descendants() {
        let mut registry = AnalyzerRegistry::new();
        registry.register(AssetClass::Mesh, Box::new(StubAnalyzer { tag: "mesh" }));
        let results = run(&registry);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rule_id, "mesh");
    }

    #[test]
    fn specific_registration_beats_ancestor() {
        let mut registry = AnalyzerRegistry::new();
        registry.register(AssetClass::Mesh, Box::new(StubAnalyzer { tag: "mesh" }));
        registry.register(
            AssetClass::StaticMesh,
            Box::new(StubAnalyzer { tag: "static" }),
        );
        let results = run(&registry);
        assert_eq!(results[0].rule_id, "static");
    }

    #[test]
    fn unregistered_class_is_a_no_op() {
        let registry = AnalyzerRegistry::new();
        assert!(run(&registry).is_empty());
    }
}
