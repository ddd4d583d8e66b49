use crate::auth::AuthProvider;
use crate::category::ActiveCategories;
use crate::domain::{Attraction, Identity, Position};
use crate::error::{Result, TravelokiError};
use crate::moderation::{ModerationService, SubmissionPayload};
use crate::search;
use crate::storage::DirectoryStore;
use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, Method},
    response::{IntoResponse, Json},
    routing::{get, post},
    Extension, Router,
};
use hyper::Server;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DirectoryStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub moderation: Arc<ModerationService>,
    pub area: String,
}

/// Response envelope matching the client contract.
#[derive(Serialize)]
struct ApiResponse<T: Serialize> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

fn success<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        status: "success",
        message: None,
        data: Some(data),
    })
}

fn ack(message: &str) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        status: "success",
        message: Some(message.to_string()),
        data: None,
    })
}

/// Resolve the bearer token to an identity, failing closed when the header
/// is missing or the token is unknown.
async fn require_identity(headers: &HeaderMap, auth: &Arc<dyn AuthProvider>) -> Result<Identity> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(TravelokiError::Unauthorized)?;

    auth.authenticate(token)
        .await?
        .ok_or(TravelokiError::Unauthorized)
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "traveloki",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn list_attractions(
    Path(area): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse> {
    if !area.eq_ignore_ascii_case(&state.area) {
        return Err(TravelokiError::NotFound(format!("area {area}")));
    }
    let listing = state.store.list_attractions().await?;
    Ok(success(listing))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search_attractions(
    Query(params): Query<SearchParams>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse> {
    let directory = state.store.list_attractions().await?;
    // The HTTP surface has no per-user filter state; search across all
    // categories and let the client apply activation.
    let mut active = ActiveCategories::all();

    if params.q.trim().is_empty() {
        return Ok(success(None::<Attraction>));
    }

    match search::search_by_text(&params.q, &mut active, &directory) {
        Some(hit) => Ok(success(Some(hit.attraction))),
        None => Err(TravelokiError::NotFound(format!(
            "no attraction matching '{}'",
            params.q.trim()
        ))),
    }
}

#[derive(Deserialize)]
struct NearbyParams {
    lat: f64,
    lng: f64,
    /// Radius in kilometers, matching the client contract.
    #[serde(default = "default_radius_km")]
    radius: f64,
}

fn default_radius_km() -> f64 {
    5.0
}

async fn nearby_attractions(
    Query(params): Query<NearbyParams>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse> {
    crate::domain::validate_coordinates(params.lat, params.lng)?;
    let directory = state.store.list_attractions().await?;
    let position = Position::new(params.lat, params.lng);

    let hits = search::nearby(
        &position,
        params.radius * 1000.0,
        &ActiveCategories::all(),
        &directory,
    );
    let attractions: Vec<Attraction> = hits.into_iter().map(|h| h.attraction).collect();
    Ok(success(attractions))
}

async fn submit_recommendation(
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
    Json(payload): Json<SubmissionPayload>,
) -> Result<impl IntoResponse> {
    let identity = require_identity(&headers, &state.auth).await?;
    let rec = state.moderation.submit(payload, &identity).await?;
    Ok(success(rec))
}

async fn list_pending(
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse> {
    let identity = require_identity(&headers, &state.auth).await?;
    let pending = state.moderation.list_pending(&identity).await?;
    Ok(success(pending))
}

#[derive(Deserialize)]
struct ApprovePayload {
    category_id: Option<u32>,
    category: Option<String>,
}

async fn approve_recommendation(
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
    Json(payload): Json<ApprovePayload>,
) -> Result<impl IntoResponse> {
    let identity = require_identity(&headers, &state.auth).await?;
    let category_name = match (payload.category, payload.category_id) {
        (Some(name), _) => name,
        (None, Some(category_id)) => state.moderation.category_name_for(category_id),
        (None, None) => {
            return Err(TravelokiError::Validation(
                "category or category_id is required".to_string(),
            ))
        }
    };

    // The confirmation dialog lives on the client; reaching this endpoint
    // means it was answered.
    let attraction = state
        .moderation
        .approve(id, &category_name, &identity, true)
        .await?;
    Ok(success(attraction))
}

async fn reject_recommendation(
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse> {
    let identity = require_identity(&headers, &state.auth).await?;
    state.moderation.reject(id, &identity, true).await?;
    Ok(ack("Recommendation rejected"))
}

async fn create_attraction(
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
    Json(payload): Json<SubmissionPayload>,
) -> Result<impl IntoResponse> {
    let identity = require_identity(&headers, &state.auth).await?;
    let attraction = state.moderation.create_direct(payload, &identity).await?;
    Ok(success(attraction))
}

async fn delete_attraction(
    Path(id): Path<String>,
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse> {
    let identity = require_identity(&headers, &state.auth).await?;
    let id = Uuid::parse_str(&id)
        .map_err(|_| TravelokiError::Validation(format!("invalid attraction id '{id}'")))?;
    state
        .moderation
        .delete_published(id, &identity, true)
        .await?;
    Ok(ack("Attraction deleted"))
}

/// Create the HTTP router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/attractions/search", get(search_attractions))
        .route("/attractions/nearby", get(nearby_attractions))
        .route("/attractions/recommend", post(submit_recommendation))
        .route("/attractions/recommendations/pending", get(list_pending))
        .route(
            "/attractions/recommendations/:id/approve",
            post(approve_recommendation),
        )
        .route(
            "/attractions/recommendations/:id/reject",
            post(reject_recommendation),
        )
        .route("/attractions", post(create_attraction))
        // One parameterized segment serves both: GET lists an area's
        // attractions, DELETE removes a published attraction by id.
        .route(
            "/attractions/:key",
            get(list_attractions).delete(delete_attraction),
        )
        .layer(Extension(state))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the specified port
pub async fn start_server(state: AppState, port: u16) -> Result<()> {
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("HTTP server running on http://localhost:{port}");

    Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|e| TravelokiError::Config(format!("Server error: {e}")))?;

    Ok(())
}
