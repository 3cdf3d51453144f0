pub mod http;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ApiConfig;
use crate::types::{de_flexible_id, Domain, DomainItem};

pub use http::GatewayError;

/// A compatibility endpoint answers with either full objects or bare ids,
/// depending on the server build. The shape is discriminated here, once,
/// so nothing downstream ever sniffs payload types.
#[derive(Debug, Clone, PartialEq)]
pub enum CompatibilityList {
    Items(Vec<DomainItem>),
    Ids(Vec<u64>),
}

impl CompatibilityList {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Items(items) => items.is_empty(),
            Self::Ids(ids) => ids.is_empty(),
        }
    }
}

/// One suggested item id from an AI-assisted endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    #[serde(deserialize_with = "de_flexible_id")]
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticity_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    #[serde(default)]
    pub project_category: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub suggested_materials: Vec<Suggestion>,
    #[serde(default)]
    pub suggested_crafts: Vec<Suggestion>,
    #[serde(default)]
    pub suggested_techniques: Vec<Suggestion>,
}

impl ProjectAnalysis {
    pub fn suggestions_for(&self, domain: Domain) -> &[Suggestion] {
        match domain {
            Domain::Materials => &self.suggested_materials,
            Domain::Crafts => &self.suggested_crafts,
            Domain::Techniques => &self.suggested_techniques,
            Domain::Artisans => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The seam the smart services depend on. Production uses [`ApiGateway`];
/// tests substitute recording stubs.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn fetch_catalog(&self, domain: Domain) -> Result<Vec<DomainItem>, GatewayError>;

    async fn compatible_crafts(&self, material_id: u64) -> Result<CompatibilityList, GatewayError>;
    async fn compatible_materials(&self, craft_id: u64) -> Result<CompatibilityList, GatewayError>;
    async fn compatible_techniques(
        &self,
        material_id: Option<u64>,
        craft_id: Option<u64>,
    ) -> Result<CompatibilityList, GatewayError>;
    async fn compatible_artisans(
        &self,
        craft_id: Option<u64>,
        technique_id: Option<u64>,
    ) -> Result<CompatibilityList, GatewayError>;

    async fn analyze_project(
        &self,
        description: &str,
        image_url: Option<&str>,
    ) -> Result<ProjectAnalysis, GatewayError>;
    async fn suggest_materials(&self, description: &str) -> Result<Vec<Suggestion>, GatewayError>;
    async fn match_artisans(
        &self,
        description: &str,
        craft_id: Option<u64>,
    ) -> Result<Vec<Suggestion>, GatewayError>;

    async fn health(&self) -> Result<HealthStatus, GatewayError>;
}

/// HTTP client for the DirectCreate REST API. The API multiplexes every
/// endpoint behind one URL with a `path` query selector
/// (`?path=materials`, `?path=compatible-crafts&material_id=90`, ...).
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: Client,
    base_url: String,
}

impl ApiGateway {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: http::build_client(config.timeout_secs, config.connect_timeout_secs),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_defaults(base_url: impl Into<String>) -> Self {
        Self {
            client: http::shared_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_path(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, GatewayError> {
        let mut query: Vec<(&str, String)> = vec![("path", path.to_string())];
        query.extend(params.iter().cloned());
        let label = format!("{}?path={path}", self.base_url);
        http::execute_json(&label, self.client.get(&self.base_url).query(&query)).await
    }

    async fn post_path(&self, path: &str, body: Value) -> Result<Value, GatewayError> {
        let label = format!("{}?path={path}", self.base_url);
        http::execute_json(
            &label,
            self.client
                .post(&self.base_url)
                .query(&[("path", path)])
                .json(&body),
        )
        .await
    }
}

#[async_trait]
impl RemoteGateway for ApiGateway {
    async fn fetch_catalog(&self, domain: Domain) -> Result<Vec<DomainItem>, GatewayError> {
        let payload = self.get_path(domain.as_slug(), &[]).await?;
        let data = unwrap_collection(domain.as_slug(), payload)?;
        Ok(decode_items(domain.as_slug(), data))
    }

    async fn compatible_crafts(&self, material_id: u64) -> Result<CompatibilityList, GatewayError> {
        let payload = self
            .get_path(
                "compatible-crafts",
                &[("material_id", material_id.to_string())],
            )
            .await?;
        let data = unwrap_collection("compatible-crafts", payload)?;
        Ok(discriminate_compatibility("compatible-crafts", data))
    }

    async fn compatible_materials(&self, craft_id: u64) -> Result<CompatibilityList, GatewayError> {
        let payload = self
            .get_path("compatible-materials", &[("craft_id", craft_id.to_string())])
            .await?;
        let data = unwrap_collection("compatible-materials", payload)?;
        Ok(discriminate_compatibility("compatible-materials", data))
    }

    async fn compatible_techniques(
        &self,
        material_id: Option<u64>,
        craft_id: Option<u64>,
    ) -> Result<CompatibilityList, GatewayError> {
        let mut params = Vec::new();
        if let Some(id) = material_id {
            params.push(("material_id", id.to_string()));
        }
        if let Some(id) = craft_id {
            params.push(("craft_id", id.to_string()));
        }
        let payload = self.get_path("compatible-techniques", &params).await?;
        let data = unwrap_collection("compatible-techniques", payload)?;
        Ok(discriminate_compatibility("compatible-techniques", data))
    }

    async fn compatible_artisans(
        &self,
        craft_id: Option<u64>,
        technique_id: Option<u64>,
    ) -> Result<CompatibilityList, GatewayError> {
        let mut params = Vec::new();
        if let Some(id) = craft_id {
            params.push(("craft_id", id.to_string()));
        }
        if let Some(id) = technique_id {
            params.push(("technique_id", id.to_string()));
        }
        let payload = self.get_path("compatible-artisans", &params).await?;
        let data = unwrap_collection("compatible-artisans", payload)?;
        Ok(discriminate_compatibility("compatible-artisans", data))
    }

    async fn analyze_project(
        &self,
        description: &str,
        image_url: Option<&str>,
    ) -> Result<ProjectAnalysis, GatewayError> {
        let mut body = json!({ "description": description });
        if let Some(url) = image_url {
            body["image_url"] = json!(url);
        }
        let payload = self.post_path("analyze-project", body).await?;
        let data = unwrap_object("analyze-project", payload)?;
        serde_json::from_value(data).map_err(|e| GatewayError::InvalidFormat {
            url: "analyze-project".to_string(),
            message: e.to_string(),
        })
    }

    async fn suggest_materials(&self, description: &str) -> Result<Vec<Suggestion>, GatewayError> {
        let payload = self
            .get_path(
                "suggest-materials",
                &[("description", description.to_string())],
            )
            .await?;
        let data = unwrap_collection("suggest-materials", payload)?;
        Ok(decode_suggestions("suggest-materials", data))
    }

    async fn match_artisans(
        &self,
        description: &str,
        craft_id: Option<u64>,
    ) -> Result<Vec<Suggestion>, GatewayError> {
        let mut body = json!({ "description": description });
        if let Some(id) = craft_id {
            body["craft_id"] = json!(id);
        }
        let payload = self.post_path("match-artisans", body).await?;
        let data = unwrap_collection("match-artisans", payload)?;
        Ok(decode_suggestions("match-artisans", data))
    }

    async fn health(&self) -> Result<HealthStatus, GatewayError> {
        let payload = self.get_path("health", &[]).await?;
        serde_json::from_value(payload).map_err(|e| GatewayError::InvalidFormat {
            url: "health".to_string(),
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    available_endpoints: Vec<String>,
}

/// Unwrap the standard `{success, data, message}` envelope down to its
/// `data` payload, mapping the server's soft-failure shapes onto
/// [`GatewayError`] variants.
fn unwrap_envelope(path: &str, payload: Value) -> Result<Value, GatewayError> {
    let envelope: WireEnvelope =
        serde_json::from_value(payload).map_err(|e| GatewayError::InvalidFormat {
            url: path.to_string(),
            message: e.to_string(),
        })?;
    if let Some(error) = envelope.error {
        if error.eq_ignore_ascii_case("unknown endpoint") {
            return Err(GatewayError::UnknownEndpoint {
                path: path.to_string(),
                available: envelope.available_endpoints,
            });
        }
        return Err(GatewayError::Rejected {
            path: path.to_string(),
            message: error,
        });
    }
    if !envelope.success {
        return Err(GatewayError::Rejected {
            path: path.to_string(),
            message: envelope
                .message
                .unwrap_or_else(|| "request unsuccessful".to_string()),
        });
    }
    Ok(envelope.data)
}

fn unwrap_collection(path: &str, payload: Value) -> Result<Vec<Value>, GatewayError> {
    match unwrap_envelope(path, payload)? {
        Value::Array(data) => Ok(data),
        other => Err(GatewayError::InvalidFormat {
            url: path.to_string(),
            message: format!("expected data array, got {}", value_kind(&other)),
        }),
    }
}

fn unwrap_object(path: &str, payload: Value) -> Result<Value, GatewayError> {
    match unwrap_envelope(path, payload)? {
        data @ Value::Object(_) => Ok(data),
        other => Err(GatewayError::InvalidFormat {
            url: path.to_string(),
            message: format!("expected data object, got {}", value_kind(&other)),
        }),
    }
}

fn decode_items(path: &str, data: Vec<Value>) -> Vec<DomainItem> {
    data.into_iter()
        .filter_map(|entry| match serde_json::from_value::<DomainItem>(entry) {
            Ok(item) => Some(item),
            Err(error) => {
                debug!("skipping malformed {path} entry: {error}");
                None
            }
        })
        .collect()
}

fn decode_suggestions(path: &str, data: Vec<Value>) -> Vec<Suggestion> {
    data.into_iter()
        .filter_map(|entry| match serde_json::from_value::<Suggestion>(entry) {
            Ok(suggestion) => Some(suggestion),
            Err(error) => {
                debug!("skipping malformed {path} suggestion: {error}");
                None
            }
        })
        .collect()
}

fn discriminate_compatibility(path: &str, data: Vec<Value>) -> CompatibilityList {
    if data.iter().any(Value::is_object) {
        CompatibilityList::Items(decode_items(path, data))
    } else {
        CompatibilityList::Ids(data.iter().filter_map(http::coerce_id).collect())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unwraps_successful_envelope() {
        let data = unwrap_collection(
            "materials",
            json!({"success": true, "data": [{"id": 1, "name": "Organic Cotton"}]}),
        )
        .expect("envelope should unwrap");
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn server_failure_becomes_rejected() {
        let error = unwrap_collection(
            "materials",
            json!({"success": false, "data": [], "message": "backend offline"}),
        )
        .expect_err("failure envelope");
        assert!(matches!(error, GatewayError::Rejected { .. }));
        assert!(error.to_string().contains("backend offline"));
    }

    #[test]
    fn unknown_endpoint_carries_available_paths() {
        let error = unwrap_collection(
            "compatible-gems",
            json!({"error": "Unknown endpoint", "available_endpoints": ["materials", "crafts"]}),
        )
        .expect_err("unknown endpoint envelope");
        match error {
            GatewayError::UnknownEndpoint { available, .. } => {
                assert_eq!(available, vec!["materials", "crafts"]);
            }
            other => panic!("expected UnknownEndpoint, got {other:?}"),
        }
    }

    #[test]
    fn non_array_data_is_invalid_format() {
        let error = unwrap_collection("materials", json!({"success": true, "data": 17}))
            .expect_err("scalar data");
        assert!(matches!(error, GatewayError::InvalidFormat { .. }));
    }

    #[test]
    fn discriminates_objects_from_bare_ids() {
        let items = discriminate_compatibility(
            "compatible-techniques",
            vec![json!({"id": 5, "name": "Natural Dyeing"})],
        );
        assert!(matches!(items, CompatibilityList::Items(ref v) if v.len() == 1));

        let ids = discriminate_compatibility("compatible-techniques", vec![json!(5), json!("9")]);
        assert_eq!(ids, CompatibilityList::Ids(vec![5, 9]));
    }

    #[test]
    fn analysis_decodes_string_ids_and_missing_fields() {
        let analysis: ProjectAnalysis = serde_json::from_value(json!({
            "project_category": "bedsheet",
            "confidence_score": 0.87,
            "suggested_materials": [{"id": "12", "relevance_score": 0.9}]
        }))
        .expect("analysis payload");
        assert_eq!(analysis.suggested_materials[0].id, 12);
        assert!(analysis.suggested_crafts.is_empty());
    }
}
