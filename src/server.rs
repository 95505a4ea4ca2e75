use crate::client::Lodestone;
use crate::config::ScraperConfig;
use crate::error::LodestoneError;
use crate::http::HttpClient;
use crate::model::{Achievement, Candidate, CharacterProfile, FreeCompanyProfile, NewsTopic};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub ready: bool,
    pub port: u16,
    pub domain: String,
}

#[derive(Debug, Serialize)]
pub struct TopicsResponse {
    pub success: bool,
    pub topics: Vec<NewsTopic>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub server: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub candidate: Option<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub server: String,
    pub name: String,
    pub code: String,
    pub lodestone_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub verified: bool,
    pub lodestone_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CharacterResponse {
    pub success: bool,
    pub character: CharacterProfile,
}

#[derive(Debug, Serialize)]
pub struct AchievementsResponse {
    pub success: bool,
    pub achievements: BTreeMap<u32, Achievement>,
}

#[derive(Debug, Serialize)]
pub struct FreeCompanyResponse {
    pub success: bool,
    pub free_company: FreeCompanyProfile,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub port: u16,
    /// Scraper settings every request starts from.
    pub config: ScraperConfig,
    /// Optional Lodestone base URL override for integration tests.
    ///
    /// When set, every page is fetched from this base instead of
    /// `http://{domain}/lodestone`.
    pub base_url_override: Option<String>,

    /// Optional HTTP request timeout override (seconds).
    ///
    /// This exists primarily for hermetic integration tests to validate TIMEOUT
    /// error mapping without waiting for the production default timeout.
    pub http_timeout_secs_override: Option<u64>,
}

impl ServerState {
    pub fn new(port: u16, config: ScraperConfig) -> Self {
        Self {
            port,
            config,
            base_url_override: None,
            http_timeout_secs_override: None,
        }
    }
}

fn effective_config(state: &ServerState) -> ScraperConfig {
    let mut config = state.config.clone();
    if let Some(base) = state.base_url_override.as_deref() {
        config = config.with_base_url(base);
    }
    if let Some(secs) = state.http_timeout_secs_override {
        config = config.with_timeout_secs(secs);
    }
    config
}

fn error_to_http(e: &LodestoneError) -> (StatusCode, &'static str) {
    match e {
        LodestoneError::DoesNotExist(_) => (StatusCode::NOT_FOUND, "DOES_NOT_EXIST"),
        LodestoneError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        LodestoneError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
        LodestoneError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        LodestoneError::ValidationError(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        LodestoneError::FieldNotFound(_)
        | LodestoneError::CoercionError { .. }
        | LodestoneError::InvalidSelector(_) => (StatusCode::BAD_GATEWAY, "PARSE_ERROR"),
        LodestoneError::IoError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        _ => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
    }
}

fn api_error(e: LodestoneError) -> ApiError {
    let (status, code) = error_to_http(&e);
    debug!(error = %e, code, "request failed");
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: e.to_string(),
            error_code: code.to_string(),
        }),
    )
}

fn build_client(state: &ServerState) -> Result<Lodestone<HttpClient>, ApiError> {
    Lodestone::with_config(effective_config(state)).map_err(api_error)
}

/// Lodestone ids are decimal; anything else is rejected before a request is made.
fn validate_id(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Ok(id)
    } else {
        Err(api_error(LodestoneError::ValidationError(format!(
            "Invalid Lodestone id: {:?}",
            id
        ))))
    }
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(api_error(LodestoneError::ValidationError(format!(
            "Missing {}",
            field
        ))));
    }
    Ok(())
}

async fn status_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(StatusResponse {
        status: "ok".to_string(),
        version: SERVER_VERSION.to_string(),
        ready: true,
        port: state.port,
        domain: state.config.domain.clone(),
    })
}

async fn topics_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<TopicsResponse>, ApiError> {
    let client = build_client(&state)?;
    let topics = client.scrape_topics().await.map_err(api_error)?;
    Ok(Json(TopicsResponse {
        success: true,
        topics,
    }))
}

async fn search_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    require("server", &query.server)?;
    require("name", &query.name)?;

    let client = build_client(&state)?;
    let candidate = client
        .validate_character(query.server.trim(), query.name.trim())
        .await
        .map_err(api_error)?;
    Ok(Json(SearchResponse {
        success: true,
        candidate,
    }))
}

async fn verify_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    require("server", &request.server)?;
    require("name", &request.name)?;
    require("code", &request.code)?;
    let lodestone_id = match request.lodestone_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Some(validate_id(id)?),
        _ => None,
    };

    let client = build_client(&state)?;
    let verified = client
        .verify_character(&request.server, &request.name, &request.code, lodestone_id)
        .await
        .map_err(api_error)?;

    info!(
        server = %request.server,
        name = %request.name,
        verified = verified.is_some(),
        "verification"
    );
    Ok(Json(VerifyResponse {
        success: true,
        verified: verified.is_some(),
        lodestone_id: verified,
    }))
}

async fn character_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<CharacterResponse>, ApiError> {
    let id = validate_id(&id)?;
    let client = build_client(&state)?;
    let character = client.scrape_character(id).await.map_err(api_error)?;
    Ok(Json(CharacterResponse {
        success: true,
        character,
    }))
}

async fn achievements_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<AchievementsResponse>, ApiError> {
    let id = validate_id(&id)?;
    let client = build_client(&state)?;
    let achievements = client.scrape_achievements(id).await.map_err(api_error)?;
    Ok(Json(AchievementsResponse {
        success: true,
        achievements,
    }))
}

async fn free_company_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<FreeCompanyResponse>, ApiError> {
    let id = validate_id(&id)?;
    let client = build_client(&state)?;
    let free_company = client.scrape_free_company(id).await.map_err(api_error)?;
    Ok(Json(FreeCompanyResponse {
        success: true,
        free_company,
    }))
}

pub fn create_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/topics", get(topics_handler))
        .route("/api/search", get(search_handler))
        .route("/api/verify", post(verify_handler))
        .route("/api/character/:id", get(character_handler))
        .route("/api/character/:id/achievements", get(achievements_handler))
        .route("/api/freecompany/:id", get(free_company_handler))
        .with_state(state)
        .layer(cors)
}

pub async fn start_server(port: u16) -> Result<(), std::io::Error> {
    let state = Arc::new(ServerState::new(port, ScraperConfig::from_env()));
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port, "Lodestone HTTP server listening");
    axum::serve(listener, app).await
}
