use std::sync::Arc;

use tracing::{debug, warn};

use crate::gateway::{GatewayError, RemoteGateway};
use crate::services::{
    apply_suggestions, catalog_fallback, compatibility_result, resolve_compatibility,
    SelectionContext,
};
use crate::types::{Domain, DomainItem, ResolutionTier, SmartResult};

/// Artisan matching: remote matching -> craft/technique compatibility ->
/// full directory. There is no keyword tier; the builtin tables recommend
/// materials, crafts and techniques, not people.
pub struct SmartArtisans {
    gateway: Arc<dyn RemoteGateway>,
}

impl SmartArtisans {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self { gateway }
    }

    pub async fn get_artisans(&self, context: &SelectionContext) -> SmartResult {
        let catalog = match self.gateway.fetch_catalog(Domain::Artisans).await {
            Ok(catalog) => catalog,
            Err(error) => {
                warn!("artisan directory fetch failed: {error}");
                return SmartResult::failed(Domain::Artisans, error.to_string());
            }
        };

        if let Some(description) = context.description() {
            if context.craft_id.is_some() {
                match self.ai_tier(description, context.craft_id, &catalog).await {
                    Ok(Some(result)) => return result,
                    Ok(None) => debug!("matching returned no usable artisans"),
                    Err(error) => warn!("artisan matching tier failed: {error}"),
                }
            }
        }

        if context.craft_id.is_some() || context.technique_id.is_some() {
            match self
                .gateway
                .compatible_artisans(context.craft_id, context.technique_id)
                .await
            {
                Ok(list) if !list.is_empty() => {
                    let (items, synthesized) =
                        resolve_compatibility(Domain::Artisans, list, &catalog);
                    return compatibility_result(
                        Domain::Artisans,
                        items,
                        synthesized,
                        filter_label(context),
                    );
                }
                Ok(_) => debug!("no compatible artisans for current selection"),
                Err(error) => warn!("artisan compatibility tier failed: {error}"),
            }
        }

        catalog_fallback(Domain::Artisans, catalog)
    }

    async fn ai_tier(
        &self,
        description: &str,
        craft_id: Option<u64>,
        catalog: &[DomainItem],
    ) -> Result<Option<SmartResult>, GatewayError> {
        let matches = self.gateway.match_artisans(description, craft_id).await?;
        if matches.is_empty() {
            return Ok(None);
        }

        let (recommended, others) =
            apply_suggestions(Domain::Artisans, catalog.to_vec(), &matches, None);
        if recommended.is_empty() {
            return Ok(None);
        }

        let count = recommended.len();
        Ok(Some(
            SmartResult::new(Domain::Artisans, ResolutionTier::AiAssisted)
                .with_recommended(recommended)
                .with_others(others)
                .with_ai_message(format!("Matched {count} artisans to your project")),
        ))
    }
}

fn filter_label(context: &SelectionContext) -> &'static str {
    match (context.craft_id, context.technique_id) {
        (Some(_), Some(_)) => "craft and technique",
        (Some(_), None) => "craft",
        _ => "technique",
    }
}
