use std::sync::Arc;

use tracing::{debug, warn};

use crate::gateway::{GatewayError, RemoteGateway};
use crate::recommend::{partition, Classifier};
use crate::services::{
    apply_suggestions, catalog_fallback, compatibility_result, resolve_compatibility,
    SelectionContext,
};
use crate::types::{Domain, DomainItem, ResolutionTier, SmartResult};

/// Technique recommendations. The AI tier only runs once the user has
/// picked a material or craft; techniques suggested against a bare
/// description are too generic to be useful.
pub struct SmartTechniques {
    gateway: Arc<dyn RemoteGateway>,
    classifier: Classifier,
}

impl SmartTechniques {
    pub fn new(gateway: Arc<dyn RemoteGateway>, classifier: Classifier) -> Self {
        Self {
            gateway,
            classifier,
        }
    }

    pub async fn get_techniques(&self, context: &SelectionContext) -> SmartResult {
        let catalog = match self.gateway.fetch_catalog(Domain::Techniques).await {
            Ok(catalog) => catalog,
            Err(error) => {
                warn!("techniques catalog fetch failed: {error}");
                return SmartResult::failed(Domain::Techniques, error.to_string());
            }
        };

        if let Some(description) = context.description() {
            if context.material_id.is_some() || context.craft_id.is_some() {
                match self.ai_tier(description, &catalog).await {
                    Ok(Some(result)) => return result,
                    Ok(None) => debug!("AI returned no usable technique suggestions"),
                    Err(error) => warn!("techniques AI tier failed: {error}"),
                }
            }
            if let Some(result) = self.keyword_tier(description, &catalog) {
                return result;
            }
        }

        if context.material_id.is_some() || context.craft_id.is_some() {
            match self
                .gateway
                .compatible_techniques(context.material_id, context.craft_id)
                .await
            {
                Ok(list) if !list.is_empty() => {
                    let (items, synthesized) =
                        resolve_compatibility(Domain::Techniques, list, &catalog);
                    return compatibility_result(
                        Domain::Techniques,
                        items,
                        synthesized,
                        filter_label(context),
                    );
                }
                Ok(_) => debug!("no compatible techniques for current selection"),
                Err(error) => warn!("techniques compatibility tier failed: {error}"),
            }
        }

        catalog_fallback(Domain::Techniques, catalog)
    }

    async fn ai_tier(
        &self,
        description: &str,
        catalog: &[DomainItem],
    ) -> Result<Option<SmartResult>, GatewayError> {
        let analysis = self.gateway.analyze_project(description, None).await?;
        let suggestions = analysis.suggestions_for(Domain::Techniques);
        if suggestions.is_empty() {
            return Ok(None);
        }

        let (recommended, others) = apply_suggestions(
            Domain::Techniques,
            catalog.to_vec(),
            suggestions,
            analysis.project_category.as_deref(),
        );
        if recommended.is_empty() {
            return Ok(None);
        }

        let count = recommended.len();
        let mut result = SmartResult::new(Domain::Techniques, ResolutionTier::AiAssisted)
            .with_recommended(recommended)
            .with_others(others)
            .with_ai_message(format!("Found {count} techniques matched to your project"));
        if let Some(category) = analysis.project_category {
            result = result.with_category(category, analysis.confidence_score);
        }
        Ok(Some(result))
    }

    fn keyword_tier(&self, description: &str, catalog: &[DomainItem]) -> Option<SmartResult> {
        let bundle = self.classifier.classify(description)?;
        let partitioned = partition(catalog.to_vec(), &bundle.techniques);
        if partitioned.recommended.is_empty() {
            debug!(
                "keyword analysis matched {} but no catalog techniques",
                bundle.project_type
            );
            return None;
        }
        Some(
            SmartResult::new(Domain::Techniques, ResolutionTier::KeywordAnalysis)
                .with_recommended(partitioned.recommended)
                .with_others(partitioned.others)
                .with_category(bundle.project_type.clone(), None)
                .with_context_message(bundle.context_message.clone())
                .with_ai_message(format!(
                    "Recommended techniques for your {} project",
                    bundle.project_type
                )),
        )
    }
}

fn filter_label(context: &SelectionContext) -> &'static str {
    match (context.material_id, context.craft_id) {
        (Some(_), Some(_)) => "material and craft",
        (Some(_), None) => "material",
        _ => "craft",
    }
}
