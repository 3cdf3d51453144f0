use std::sync::Arc;

use tracing::{debug, warn};

use crate::gateway::{GatewayError, RemoteGateway};
use crate::recommend::{partition, Classifier};
use crate::services::{
    apply_suggestions, catalog_fallback, compatibility_result, resolve_compatibility,
    SelectionContext,
};
use crate::types::{Domain, DomainItem, ResolutionTier, SmartResult};

/// Craft recommendations: AI analysis -> keyword analysis -> material
/// compatibility -> full catalog.
pub struct SmartCrafts {
    gateway: Arc<dyn RemoteGateway>,
    classifier: Classifier,
}

impl SmartCrafts {
    pub fn new(gateway: Arc<dyn RemoteGateway>, classifier: Classifier) -> Self {
        Self {
            gateway,
            classifier,
        }
    }

    pub async fn get_crafts(&self, context: &SelectionContext) -> SmartResult {
        let catalog = match self.gateway.fetch_catalog(Domain::Crafts).await {
            Ok(catalog) => catalog,
            Err(error) => {
                warn!("crafts catalog fetch failed: {error}");
                return SmartResult::failed(Domain::Crafts, error.to_string());
            }
        };

        if let Some(description) = context.description() {
            match self.ai_tier(description, &catalog).await {
                Ok(Some(result)) => return result,
                Ok(None) => debug!("AI returned no usable craft suggestions"),
                Err(error) => warn!("crafts AI tier failed: {error}"),
            }
            if let Some(result) = self.keyword_tier(description, &catalog) {
                return result;
            }
        }

        if let Some(material_id) = context.material_id {
            match self.gateway.compatible_crafts(material_id).await {
                Ok(list) if !list.is_empty() => {
                    let (items, synthesized) = resolve_compatibility(Domain::Crafts, list, &catalog);
                    return compatibility_result(Domain::Crafts, items, synthesized, "material");
                }
                Ok(_) => debug!("no compatible crafts for material {material_id}"),
                Err(error) => warn!("crafts compatibility tier failed: {error}"),
            }
        }

        catalog_fallback(Domain::Crafts, catalog)
    }

    async fn ai_tier(
        &self,
        description: &str,
        catalog: &[DomainItem],
    ) -> Result<Option<SmartResult>, GatewayError> {
        let analysis = self.gateway.analyze_project(description, None).await?;
        let suggestions = analysis.suggestions_for(Domain::Crafts);
        if suggestions.is_empty() {
            return Ok(None);
        }

        let (recommended, others) = apply_suggestions(
            Domain::Crafts,
            catalog.to_vec(),
            suggestions,
            analysis.project_category.as_deref(),
        );
        if recommended.is_empty() {
            return Ok(None);
        }

        let count = recommended.len();
        let mut result = SmartResult::new(Domain::Crafts, ResolutionTier::AiAssisted)
            .with_recommended(recommended)
            .with_others(others)
            .with_ai_message(format!("Found {count} crafts matched to your project"));
        if let Some(category) = analysis.project_category {
            result = result.with_category(category, analysis.confidence_score);
        }
        Ok(Some(result))
    }

    fn keyword_tier(&self, description: &str, catalog: &[DomainItem]) -> Option<SmartResult> {
        let bundle = self.classifier.classify(description)?;
        let partitioned = partition(catalog.to_vec(), &bundle.crafts);
        if partitioned.recommended.is_empty() {
            debug!(
                "keyword analysis matched {} but no catalog crafts",
                bundle.project_type
            );
            return None;
        }
        Some(
            SmartResult::new(Domain::Crafts, ResolutionTier::KeywordAnalysis)
                .with_recommended(partitioned.recommended)
                .with_others(partitioned.others)
                .with_category(bundle.project_type.clone(), None)
                .with_context_message(bundle.context_message.clone())
                .with_ai_message(format!(
                    "Recommended crafts for your {} project",
                    bundle.project_type
                )),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_test::block_on;

    use super::*;
    use crate::gateway::CompatibilityList;
    use crate::services::stub::StubGateway;

    fn craft_catalog() -> Vec<DomainItem> {
        vec![
            DomainItem::new(10, "Block Printing"),
            DomainItem::new(11, "Dhokra"),
            DomainItem::new(12, "Handloom Weaving"),
        ]
    }

    fn service(stub: StubGateway) -> SmartCrafts {
        SmartCrafts::new(Arc::new(stub), Classifier::with_builtin_table())
    }

    #[test]
    fn keyword_tier_partitions_crafts_for_bedsheet() {
        let stub = StubGateway::with_catalog(Domain::Crafts, craft_catalog());
        let result = block_on(
            service(stub).get_crafts(&SelectionContext::with_description("a printed bedsheet")),
        );

        assert_eq!(result.tier, ResolutionTier::KeywordAnalysis);
        let recommended_ids: Vec<u64> = result.recommended.iter().map(|a| a.item.id).collect();
        assert_eq!(recommended_ids, vec![10, 12]);
        assert_eq!(result.others.len(), 1);
        assert_eq!(result.others[0].id, 11);
        assert_eq!(result.total_items(), 3);
    }

    #[test]
    fn compatibility_items_become_the_recommended_set() {
        let mut stub = StubGateway::with_catalog(Domain::Crafts, craft_catalog());
        stub.compatibility = Ok(CompatibilityList::Items(vec![DomainItem::new(
            11, "Dhokra",
        )]));
        let stub = Arc::new(stub);
        let service = SmartCrafts::new(stub.clone(), Classifier::with_builtin_table());

        let context = SelectionContext {
            material_id: Some(7),
            ..SelectionContext::default()
        };
        let result = block_on(service.get_crafts(&context));

        assert_eq!(result.tier, ResolutionTier::Compatibility);
        assert_eq!(result.recommended.len(), 1);
        assert_eq!(
            result.recommended[0].reason,
            "Compatible with your selected material"
        );
        assert!(result.others.is_empty());
        assert_eq!(
            stub.recorded_calls(),
            vec!["fetch_catalog:crafts", "compatible_crafts:7"]
        );
    }

    #[test]
    fn failed_compatibility_tier_still_resolves() {
        let mut stub = StubGateway::with_catalog(Domain::Crafts, craft_catalog());
        stub.compatibility = Err(GatewayError::Status {
            url: "compatible-crafts".to_string(),
            status: 500,
            preview: "internal error".to_string(),
        });
        let context = SelectionContext {
            material_id: Some(7),
            ..SelectionContext::default()
        };
        let result = block_on(service(stub).get_crafts(&context));

        assert_eq!(result.tier, ResolutionTier::CatalogFallback);
        assert_eq!(result.others.len(), 3);
        assert!(!result.is_failure());
    }
}
