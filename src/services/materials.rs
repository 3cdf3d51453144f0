use std::sync::Arc;

use tracing::{debug, warn};

use crate::gateway::{GatewayError, RemoteGateway};
use crate::recommend::{partition, Classifier};
use crate::services::{
    apply_suggestions, catalog_fallback, compatibility_result, resolve_compatibility,
    SelectionContext,
};
use crate::types::{Domain, DomainItem, ResolutionTier, SmartResult};

/// Material recommendations with the tier ladder:
/// AI analysis -> local keyword analysis -> craft compatibility -> full catalog.
pub struct SmartMaterials {
    gateway: Arc<dyn RemoteGateway>,
    classifier: Classifier,
}

impl SmartMaterials {
    pub fn new(gateway: Arc<dyn RemoteGateway>, classifier: Classifier) -> Self {
        Self {
            gateway,
            classifier,
        }
    }

    pub async fn get_materials(&self, context: &SelectionContext) -> SmartResult {
        let catalog = match self.gateway.fetch_catalog(Domain::Materials).await {
            Ok(catalog) => catalog,
            Err(error) => {
                warn!("materials catalog fetch failed: {error}");
                return SmartResult::failed(Domain::Materials, error.to_string());
            }
        };

        if let Some(description) = context.description() {
            match self.ai_tier(description, &catalog).await {
                Ok(Some(result)) => return result,
                Ok(None) => debug!("AI returned no usable material suggestions"),
                Err(error) => warn!("materials AI tier failed: {error}"),
            }
            if let Some(result) = self.keyword_tier(description, &catalog) {
                return result;
            }
        }

        if let Some(craft_id) = context.craft_id {
            match self.gateway.compatible_materials(craft_id).await {
                Ok(list) if !list.is_empty() => {
                    let (items, synthesized) =
                        resolve_compatibility(Domain::Materials, list, &catalog);
                    return compatibility_result(Domain::Materials, items, synthesized, "craft");
                }
                Ok(_) => debug!("no compatible materials for craft {craft_id}"),
                Err(error) => warn!("materials compatibility tier failed: {error}"),
            }
        }

        catalog_fallback(Domain::Materials, catalog)
    }

    async fn ai_tier(
        &self,
        description: &str,
        catalog: &[DomainItem],
    ) -> Result<Option<SmartResult>, GatewayError> {
        let analysis = self.gateway.analyze_project(description, None).await?;
        let mut suggestions = analysis.suggested_materials.clone();
        // A thin analysis still gets a second chance via the dedicated
        // material suggestion endpoint.
        if suggestions.is_empty() {
            suggestions = self.gateway.suggest_materials(description).await?;
        }
        if suggestions.is_empty() {
            return Ok(None);
        }

        let (recommended, others) = apply_suggestions(
            Domain::Materials,
            catalog.to_vec(),
            &suggestions,
            analysis.project_category.as_deref(),
        );
        if recommended.is_empty() {
            // None of the suggested ids exist in the catalog we hold.
            return Ok(None);
        }

        let count = recommended.len();
        let mut result = SmartResult::new(Domain::Materials, ResolutionTier::AiAssisted)
            .with_recommended(recommended)
            .with_others(others)
            .with_ai_message(format!("Found {count} materials matched to your project"));
        if let Some(category) = analysis.project_category {
            result = result.with_category(category, analysis.confidence_score);
        }
        Ok(Some(result))
    }

    fn keyword_tier(&self, description: &str, catalog: &[DomainItem]) -> Option<SmartResult> {
        let bundle = self.classifier.classify(description)?;
        let partitioned = partition(catalog.to_vec(), &bundle.materials);
        if partitioned.recommended.is_empty() {
            debug!(
                "keyword analysis matched {} but no catalog materials",
                bundle.project_type
            );
            return None;
        }
        Some(
            SmartResult::new(Domain::Materials, ResolutionTier::KeywordAnalysis)
                .with_recommended(partitioned.recommended)
                .with_others(partitioned.others)
                .with_category(bundle.project_type.clone(), None)
                .with_context_message(bundle.context_message.clone())
                .with_ai_message(format!(
                    "Recommended materials for your {} project",
                    bundle.project_type
                )),
        )
    }
}
