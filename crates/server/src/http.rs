//! HTTP Endpoints
//!
//! REST API for extraction, pending-entity handoff and hydration.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, Json, Path, Query, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use loan_autofill_core::{EntityRecord, FormField};
use loan_autofill_persistence::{decode_prefill, HandoffMessage};
use loan_autofill_text_processing::ExtractionRequest;

use crate::metrics::{metrics_handler, record_extraction, record_fields_filled};
use crate::state::AppState;
use crate::ServerError;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const ANONYMOUS_CLIENT: &str = "anonymous";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.timeout_seconds);

    Router::new()
        // Extraction
        .route("/api/extract-entities", post(extract_entities))
        // Pending-entity handoff
        .route(
            "/api/handoff/:session",
            put(store_pending).get(peek_pending).delete(clear_pending),
        )
        .route("/api/handoff/:session/accept", post(accept_pending))
        .route("/api/handoff/:session/message", post(receive_message))
        // Hydration
        .route("/api/hydrate", post(hydrate))
        // Health check
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        if !origins.is_empty() {
            tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        } else {
            tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        }
        return base_cors().allow_origin(HeaderValue::from_static(DEFAULT_CORS_ORIGIN));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    base_cors().allow_origin(parsed_origins)
}

fn base_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Rate-limit key: first forwarded address, then the socket peer
fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string())
}

#[derive(Debug, Default, Deserialize)]
struct SessionQuery {
    session: Option<String>,
}

/// Extract entities from a chat transcript
///
/// With `?session=<id>` a useful record is also stored as that session's
/// pending entity.
async fn extract_entities(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Result<Json<EntityRecord>, ServerError> {
    let client = client_key(&headers, peer.map(|ConnectInfo(addr)| addr));
    state.rate_limiter.check(&client).map_err(|e| {
        tracing::warn!(client = %client, error = %e, "Extraction rate limited");
        ServerError::from(e)
    })?;

    let request = ExtractionRequest::from_slice(&body)?;
    let record = state.extractor.extract_request(&request);
    record_extraction(record.present_paths().len());

    if let Some(session) = query.session.filter(|s| !s.is_empty()) {
        if record.has_useful() {
            state.pending.put(&session, record.clone()).await?;
        } else {
            tracing::debug!(session = %session, "Nothing useful to store");
        }
    }

    Ok(Json(record))
}

fn parse_record(body: &[u8]) -> Result<EntityRecord, ServerError> {
    serde_json::from_slice(body).map_err(|e| ServerError::MalformedRequest(e.to_string()))
}

/// `PUT /api/handoff/:session`
async fn store_pending(
    State(state): State<AppState>,
    Path(session): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ServerError> {
    let record = parse_record(&body)?;
    state.pending.put(&session, record).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn record_or_empty(record: Option<EntityRecord>) -> Response {
    match record {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// `GET /api/handoff/:session`
async fn peek_pending(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Response, ServerError> {
    Ok(record_or_empty(state.pending.peek(&session).await?))
}

/// `POST /api/handoff/:session/accept`
async fn accept_pending(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Response, ServerError> {
    let record = state.pending.take(&session).await?;
    if record.is_some() {
        tracing::info!(session = %session, "Pending entities accepted");
    }
    Ok(record_or_empty(record))
}

/// `DELETE /api/handoff/:session`
async fn clear_pending(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.pending.clear(&session).await?;
    tracing::info!(session = %session, "Pending entities rejected");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/handoff/:session/message`
///
/// Accepts a handoff envelope from an allow-listed `Origin`.
async fn receive_message(
    State(state): State<AppState>,
    Path(session): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ServerError> {
    let origin = headers
        .get(axum::http::header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let raw: Value =
        serde_json::from_slice(&body).map_err(|e| ServerError::MalformedRequest(e.to_string()))?;

    match state.origins.receive(origin, &raw)? {
        HandoffMessage::Entities { payload } => {
            state.pending.put(&session, payload).await?;
            Ok(Json(serde_json::json!({ "stored": true })))
        }
        HandoffMessage::ApplyReady => {
            let pending = state.pending.peek(&session).await?.is_some();
            Ok(Json(serde_json::json!({ "pending": pending })))
        }
    }
}

#[derive(Debug, Deserialize)]
struct HydrateRequest {
    #[serde(default)]
    entities: Option<Value>,
    #[serde(default)]
    prefill: Option<String>,
    #[serde(default)]
    session: Option<String>,
    #[serde(default)]
    fields: Vec<FormField>,
}

#[derive(Debug, Serialize)]
struct HydrateResponse {
    filled: usize,
    fields: Vec<FormField>,
}

/// First present source wins; an unusable one yields nothing
async fn resolve_source(state: &AppState, request: &HydrateRequest) -> Option<EntityRecord> {
    if let Some(entities) = &request.entities {
        return serde_json::from_value(entities.clone())
            .map_err(|e| tracing::warn!(error = %e, "Unusable entities payload"))
            .ok();
    }

    if let Some(prefill) = &request.prefill {
        return decode_prefill(prefill)
            .map_err(|e| tracing::warn!(error = %e, "Unusable prefill parameter"))
            .ok();
    }

    if let Some(session) = &request.session {
        return state
            .pending
            .take(session)
            .await
            .map_err(|e| tracing::warn!(session = %session, error = %e, "Pending lookup failed"))
            .ok()
            .flatten();
    }

    None
}

/// `POST /api/hydrate`
async fn hydrate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<HydrateResponse>, ServerError> {
    let request: HydrateRequest =
        serde_json::from_slice(&body).map_err(|e| ServerError::MalformedRequest(e.to_string()))?;

    let record = resolve_source(&state, &request).await;
    let mut fields = request.fields;
    let filled = match record {
        Some(record) => state.hydrator.hydrate(&record, &mut fields),
        None => 0,
    };
    record_fields_filled(filled);

    Ok(Json(HydrateResponse { filled, fields }))
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let config = state.config();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "checks": {
                "pending_store": {
                    "status": "ok",
                    "ttl_seconds": state.pending.ttl().num_seconds(),
                },
                "rate_limit": {
                    "enabled": state.rate_limiter.is_enabled(),
                    "requests_per_minute": config.server.rate_limit.requests_per_minute,
                },
                "metrics": {
                    "enabled": config.observability.metrics_enabled,
                },
            }
        })),
    )
}
