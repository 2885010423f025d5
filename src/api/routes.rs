//! HTTP routes and handlers.
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/health` | GET | Liveness probe |
//! | `/send` | POST | Send one message synchronously |
//! | `/send/bulk` | POST | Validate, group and schedule a paced bulk dispatch |

use crate::api::error::ApiError;
use crate::api::extract::{Authenticated, JsonBody};
use crate::api::state::AppState;
use crate::core::grouper::group_by_recipient;
use crate::core::validator::{validate_batch, validate_single};
use crate::domain::model::EntryError;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub status: &'static str,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub status: &'static str,
    pub recipients: usize,
    pub messages: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EntryError>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/send", post(send_single).fallback(not_found))
        .route("/send/bulk", post(send_bulk).fallback(not_found))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn handle_panic(_payload: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    ApiError::Internal.into_response()
}

async fn send_single(
    State(state): State<AppState>,
    Authenticated(tenant): Authenticated,
    JsonBody(body): JsonBody,
) -> Result<Json<SendResponse>, ApiError> {
    let request = validate_single(&body).map_err(ApiError::bad_request)?;
    let session = tenant.session_id();

    if !state.transport.has_active_session(session).await {
        return Err(ApiError::SessionUnavailable);
    }

    state
        .transport
        .send_message(session, &request.to, &request.message)
        .await
        .map_err(|e| {
            error!(session = %session, recipient = %request.to, error = %e, "Send failed");
            ApiError::DeliveryFailed
        })?;

    Ok(Json(SendResponse {
        status: "sent",
        to: request.to,
    }))
}

async fn send_bulk(
    State(state): State<AppState>,
    Authenticated(tenant): Authenticated,
    JsonBody(body): JsonBody,
) -> Result<Json<BulkResponse>, ApiError> {
    let validation = validate_batch(body.get("messages"), state.max_batch)?;
    let groups = group_by_recipient(validation.accepted);
    let session = tenant.session_id();

    if !state.transport.has_active_session(session).await {
        return Err(ApiError::SessionUnavailable);
    }

    let recipients = groups.recipient_count();
    let messages = groups.message_count();

    state.scheduler.schedule(session.to_string(), groups).await;

    info!(
        session = %session,
        recipients,
        messages,
        rejected = validation.errors.len(),
        "Bulk dispatch scheduled"
    );

    Ok(Json(BulkResponse {
        status: "scheduled",
        recipients,
        messages,
        errors: validation.errors,
    }))
}
