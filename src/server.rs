use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::gateway::{ApiGateway, ProjectAnalysis, RemoteGateway};
use crate::recommend::Classifier;
use crate::services::{
    load_wizard_data, SelectionContext, SmartArtisans, SmartCrafts, SmartMaterials,
    SmartTechniques,
};
use crate::types::{SmartResult, WizardData};

#[derive(Clone)]
struct ApiState {
    config: Config,
    gateway: Arc<dyn RemoteGateway>,
    classifier: Classifier,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn upstream(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

/// Mirrors the wizard's client-side state; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct SelectionRequest {
    description: Option<String>,
    material_id: Option<u64>,
    craft_id: Option<u64>,
    technique_id: Option<u64>,
}

impl From<SelectionRequest> for SelectionContext {
    fn from(request: SelectionRequest) -> Self {
        Self {
            description: request.description,
            material_id: request.material_id,
            craft_id: request.craft_id,
            technique_id: request.technique_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AnalyzeRequest {
    description: String,
    image_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let gateway: Arc<dyn RemoteGateway> = Arc::new(ApiGateway::new(&config.api));
    let state = ApiState {
        config,
        gateway,
        classifier: Classifier::with_builtin_table(),
    };

    // The caller is the browser wizard, served from a different origin.
    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/materials", post(materials))
        .route("/v1/crafts", post(crafts))
        .route("/v1/techniques", post(techniques))
        .route("/v1/artisans", post(artisans))
        .route("/v1/wizard", post(wizard))
        .route("/v1/analyze", post(analyze))
        .route("/v1/config", get(show_config))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse { status: "ok" })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn materials(
    State(state): State<ApiState>,
    Json(request): Json<SelectionRequest>,
) -> Json<ApiResponse<SmartResult>> {
    let service = SmartMaterials::new(state.gateway.clone(), state.classifier.clone());
    ok(service.get_materials(&request.into()).await)
}

async fn crafts(
    State(state): State<ApiState>,
    Json(request): Json<SelectionRequest>,
) -> Json<ApiResponse<SmartResult>> {
    let service = SmartCrafts::new(state.gateway.clone(), state.classifier.clone());
    ok(service.get_crafts(&request.into()).await)
}

async fn techniques(
    State(state): State<ApiState>,
    Json(request): Json<SelectionRequest>,
) -> Json<ApiResponse<SmartResult>> {
    let service = SmartTechniques::new(state.gateway.clone(), state.classifier.clone());
    ok(service.get_techniques(&request.into()).await)
}

async fn artisans(
    State(state): State<ApiState>,
    Json(request): Json<SelectionRequest>,
) -> Json<ApiResponse<SmartResult>> {
    let service = SmartArtisans::new(state.gateway.clone());
    ok(service.get_artisans(&request.into()).await)
}

async fn wizard(
    State(state): State<ApiState>,
    Json(request): Json<SelectionRequest>,
) -> Json<ApiResponse<WizardData>> {
    let data = load_wizard_data(
        state.gateway.clone(),
        &state.classifier,
        &request.into(),
    )
    .await;
    ok(data)
}

async fn analyze(
    State(state): State<ApiState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<ProjectAnalysis> {
    if request.description.trim().len() < 2 {
        return Err(ApiError::bad_request("description too short to analyze"));
    }
    let analysis = state
        .gateway
        .analyze_project(&request.description, request.image_url.as_deref())
        .await
        .map_err(ApiError::upstream)?;
    Ok(ok(analysis))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}
