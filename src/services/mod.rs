pub mod aggregate;
pub mod artisans;
pub mod crafts;
pub mod materials;
pub mod techniques;

use tracing::warn;

use crate::gateway::{CompatibilityList, Suggestion};
use crate::types::{AnnotatedItem, Domain, DomainItem, ResolutionTier, SmartResult};

pub use aggregate::load_wizard_data;
pub use artisans::SmartArtisans;
pub use crafts::SmartCrafts;
pub use materials::SmartMaterials;
pub use techniques::SmartTechniques;

/// What the user has told the wizard so far. Everything is optional; the
/// services pick the strongest tier the context allows.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    pub description: Option<String>,
    pub material_id: Option<u64>,
    pub craft_id: Option<u64>,
    pub technique_id: Option<u64>,
}

impl SelectionContext {
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// The description, if it holds anything beyond whitespace.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

pub(crate) fn ai_reason(domain: Domain, category: Option<&str>) -> String {
    match category {
        Some(category) => format!("Suggested for your {category} project"),
        None => format!("Suggested {} for this project", domain.as_slug()),
    }
}

/// Partition the catalog by AI-suggested ids. Endorsed items are ranked by
/// relevance (authenticity for artisans), rank becoming priority; items the
/// AI did not name stay in `others`.
pub(crate) fn apply_suggestions(
    domain: Domain,
    catalog: Vec<DomainItem>,
    suggestions: &[Suggestion],
    category: Option<&str>,
) -> (Vec<AnnotatedItem>, Vec<DomainItem>) {
    let mut ranked: Vec<&Suggestion> = suggestions.iter().collect();
    ranked.sort_by(|a, b| suggestion_score(b).total_cmp(&suggestion_score(a)));

    let mut recommended = Vec::new();
    let mut others = Vec::new();
    for item in catalog {
        match ranked.iter().position(|s| s.id == item.id) {
            Some(rank) => {
                let suggestion = ranked[rank];
                let mut annotated =
                    AnnotatedItem::new(item, ai_reason(domain, category), rank as u32 + 1);
                annotated.relevance_score = suggestion
                    .relevance_score
                    .or(suggestion.authenticity_score);
                recommended.push(annotated);
            }
            None => others.push(item),
        }
    }
    recommended.sort_by_key(|a| a.priority);
    (recommended, others)
}

fn suggestion_score(suggestion: &Suggestion) -> f64 {
    suggestion
        .relevance_score
        .or(suggestion.authenticity_score)
        .unwrap_or(0.0)
}

/// Resolve a compatibility response against the locally held catalog. Bare
/// ids are enriched to full catalog items; ids the catalog cannot resolve
/// become flagged placeholders so the UI never shows a broken empty state.
pub(crate) fn resolve_compatibility(
    domain: Domain,
    list: CompatibilityList,
    catalog: &[DomainItem],
) -> (Vec<DomainItem>, usize) {
    match list {
        CompatibilityList::Items(items) => (items, 0),
        CompatibilityList::Ids(ids) => {
            let mut resolved = Vec::with_capacity(ids.len());
            let mut synthesized = 0;
            for id in ids {
                match catalog.iter().find(|item| item.id == id) {
                    Some(item) => resolved.push(item.clone()),
                    None => {
                        warn!(
                            "compatible {} id {id} not found in catalog, synthesizing placeholder",
                            domain.as_slug()
                        );
                        synthesized += 1;
                        resolved.push(DomainItem::synthesized(domain, id));
                    }
                }
            }
            (resolved, synthesized)
        }
    }
}

/// The compatibility endpoint's result is the full recommended set; the
/// `others` bucket stays empty on this tier.
pub(crate) fn compatibility_result(
    domain: Domain,
    items: Vec<DomainItem>,
    synthesized: usize,
    filter_label: &str,
) -> SmartResult {
    let recommended = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            AnnotatedItem::new(
                item,
                format!("Compatible with your selected {filter_label}"),
                index as u32 + 1,
            )
        })
        .collect();
    let mut result = SmartResult::new(domain, ResolutionTier::Compatibility)
        .with_recommended(recommended)
        .with_ai_message(format!(
            "Showing {} compatible with your selected {filter_label}",
            domain.as_slug()
        ));
    if synthesized > 0 {
        result = result.with_context_message(format!(
            "{synthesized} compatible {} could not be matched against the catalog and are shown as placeholders",
            domain.as_slug()
        ));
    }
    result
}

/// Last rung: the whole catalog, nothing endorsed.
pub(crate) fn catalog_fallback(domain: Domain, catalog: Vec<DomainItem>) -> SmartResult {
    SmartResult::new(domain, ResolutionTier::CatalogFallback)
        .with_others(catalog)
        .with_ai_message(format!("Showing all available {}", domain.as_slug()))
}

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::gateway::{
        CompatibilityList, GatewayError, HealthStatus, ProjectAnalysis, RemoteGateway, Suggestion,
    };
    use crate::types::{Domain, DomainItem};

    fn unavailable(path: &str) -> GatewayError {
        GatewayError::Transport {
            url: path.to_string(),
            message: "stub: not configured".to_string(),
        }
    }

    /// Canned-response gateway recording the order of calls it receives.
    pub(crate) struct StubGateway {
        pub catalogs: BTreeMap<Domain, Result<Vec<DomainItem>, GatewayError>>,
        pub analysis: Result<ProjectAnalysis, GatewayError>,
        pub suggestions: Result<Vec<Suggestion>, GatewayError>,
        pub compatibility: Result<CompatibilityList, GatewayError>,
        pub calls: Mutex<Vec<String>>,
    }

    impl StubGateway {
        pub fn new() -> Self {
            Self {
                catalogs: BTreeMap::new(),
                analysis: Err(unavailable("analyze-project")),
                suggestions: Err(unavailable("suggest-materials")),
                compatibility: Err(unavailable("compatible")),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_catalog(domain: Domain, items: Vec<DomainItem>) -> Self {
            let mut stub = Self::new();
            stub.catalogs.insert(domain, Ok(items));
            stub
        }

        pub fn set_catalog(
            &mut self,
            domain: Domain,
            result: Result<Vec<DomainItem>, GatewayError>,
        ) {
            self.catalogs.insert(domain, result);
        }

        pub fn recorded_calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().expect("calls lock").push(call.into());
        }
    }

    #[async_trait]
    impl RemoteGateway for StubGateway {
        async fn fetch_catalog(&self, domain: Domain) -> Result<Vec<DomainItem>, GatewayError> {
            self.record(format!("fetch_catalog:{}", domain.as_slug()));
            self.catalogs
                .get(&domain)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn compatible_crafts(
            &self,
            material_id: u64,
        ) -> Result<CompatibilityList, GatewayError> {
            self.record(format!("compatible_crafts:{material_id}"));
            self.compatibility.clone()
        }

        async fn compatible_materials(
            &self,
            craft_id: u64,
        ) -> Result<CompatibilityList, GatewayError> {
            self.record(format!("compatible_materials:{craft_id}"));
            self.compatibility.clone()
        }

        async fn compatible_techniques(
            &self,
            material_id: Option<u64>,
            craft_id: Option<u64>,
        ) -> Result<CompatibilityList, GatewayError> {
            self.record(format!(
                "compatible_techniques:{}:{}",
                material_id.map_or("-".to_string(), |id| id.to_string()),
                craft_id.map_or("-".to_string(), |id| id.to_string()),
            ));
            self.compatibility.clone()
        }

        async fn compatible_artisans(
            &self,
            craft_id: Option<u64>,
            technique_id: Option<u64>,
        ) -> Result<CompatibilityList, GatewayError> {
            self.record(format!(
                "compatible_artisans:{}:{}",
                craft_id.map_or("-".to_string(), |id| id.to_string()),
                technique_id.map_or("-".to_string(), |id| id.to_string()),
            ));
            self.compatibility.clone()
        }

        async fn analyze_project(
            &self,
            _description: &str,
            _image_url: Option<&str>,
        ) -> Result<ProjectAnalysis, GatewayError> {
            self.record("analyze_project");
            self.analysis.clone()
        }

        async fn suggest_materials(
            &self,
            _description: &str,
        ) -> Result<Vec<Suggestion>, GatewayError> {
            self.record("suggest_materials");
            self.suggestions.clone()
        }

        async fn match_artisans(
            &self,
            _description: &str,
            _craft_id: Option<u64>,
        ) -> Result<Vec<Suggestion>, GatewayError> {
            self.record("match_artisans");
            self.suggestions.clone()
        }

        async fn health(&self) -> Result<HealthStatus, GatewayError> {
            self.record("health");
            Ok(HealthStatus {
                status: "ok".to_string(),
                service: Some("stub".to_string()),
                error: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Suggestion;

    fn suggestion(id: u64, relevance: f64) -> Suggestion {
        Suggestion {
            id,
            relevance_score: Some(relevance),
            authenticity_score: None,
        }
    }

    #[test]
    fn suggestions_rank_by_relevance_and_partition_catalog() {
        let catalog = vec![
            DomainItem::new(1, "Organic Cotton"),
            DomainItem::new(2, "Recycled Steel"),
            DomainItem::new(3, "Linen"),
        ];
        let suggestions = vec![suggestion(3, 0.6), suggestion(1, 0.9)];
        let (recommended, others) = apply_suggestions(
            Domain::Materials,
            catalog,
            &suggestions,
            Some("bedsheet"),
        );

        assert_eq!(recommended.len(), 2);
        assert_eq!(recommended[0].item.id, 1);
        assert_eq!(recommended[0].priority, 1);
        assert_eq!(recommended[0].relevance_score, Some(0.9));
        assert_eq!(recommended[0].reason, "Suggested for your bedsheet project");
        assert_eq!(recommended[1].item.id, 3);
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].id, 2);
    }

    #[test]
    fn bare_ids_resolve_against_catalog_or_synthesize() {
        let catalog = vec![DomainItem::new(5, "Natural Dyeing")];
        let (resolved, synthesized) = resolve_compatibility(
            Domain::Techniques,
            CompatibilityList::Ids(vec![5, 99]),
            &catalog,
        );
        assert_eq!(synthesized, 1);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].name, "Natural Dyeing");
        assert!(resolved[1].placeholder);
        assert_eq!(resolved[1].name, "Technique 99");
    }

    #[test]
    fn compatibility_result_flags_placeholder_degradation() {
        let items = vec![
            DomainItem::new(1, "Block Printing"),
            DomainItem::synthesized(Domain::Techniques, 9),
        ];
        let result = compatibility_result(Domain::Techniques, items, 1, "craft");
        assert_eq!(result.recommended.len(), 2);
        assert!(result.others.is_empty());
        assert!(result
            .context_message
            .as_deref()
            .is_some_and(|m| m.contains("placeholders")));
    }

    #[test]
    fn catalog_fallback_keeps_everything_in_others() {
        let result = catalog_fallback(
            Domain::Crafts,
            vec![DomainItem::new(1, "Blue Pottery")],
        );
        assert!(result.recommended.is_empty());
        assert_eq!(result.others.len(), 1);
        assert_eq!(result.ai_message, "Showing all available crafts");
    }
}
