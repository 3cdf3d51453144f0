use std::sync::Arc;

use tracing::warn;

use crate::gateway::RemoteGateway;
use crate::recommend::Classifier;
use crate::services::{SelectionContext, SmartCrafts, SmartMaterials, SmartTechniques};
use crate::types::WizardData;

/// Load materials, crafts and techniques for one wizard screen in
/// parallel. Each service is total, so a failing domain surfaces as an
/// error-flagged empty result instead of aborting its siblings.
pub async fn load_wizard_data(
    gateway: Arc<dyn RemoteGateway>,
    classifier: &Classifier,
    context: &SelectionContext,
) -> WizardData {
    let materials = SmartMaterials::new(gateway.clone(), classifier.clone());
    let crafts = SmartCrafts::new(gateway.clone(), classifier.clone());
    let techniques = SmartTechniques::new(gateway, classifier.clone());

    let (materials, crafts, techniques) = tokio::join!(
        materials.get_materials(context),
        crafts.get_crafts(context),
        techniques.get_techniques(context),
    );

    let data = WizardData::new(materials, crafts, techniques);
    for domain in &data.failed_domains {
        warn!("wizard load: {domain} unavailable");
    }
    data
}
