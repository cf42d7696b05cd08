//! REST API request handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::event::{Event, IngestOutcome, IngestionPipeline, RejectReason};
use crate::store::EventStore;

/// Application state shared across handlers.
pub struct ApiState {
    /// Natural-language ingestion pipeline.
    pub pipeline: IngestionPipeline,
    /// Event store for the direct endpoints.
    pub store: Arc<dyn EventStore>,
}

impl ApiState {
    /// Create new API state.
    pub fn new(pipeline: IngestionPipeline, store: Arc<dyn EventStore>) -> Self {
        Self { pipeline, store }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Direct event creation request (bypasses the NLP pipeline).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
}

/// Delete request. The address is a surrogate id or the legacy
/// `"<start>-<title>"` composite.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteEventRequest {
    pub id: String,
}

/// Natural-language ingestion request.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseRequest {
    /// Free-form event description.
    #[serde(default)]
    pub text: Option<String>,
    /// Persist even when the proposed event conflicts.
    #[serde(default)]
    pub force: bool,
}

/// Successful ingestion response.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    pub event: Event,
    pub message: String,
}

/// Conflict response: the proposed event is returned, not persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    pub message: String,
    pub conflicts: Vec<Event>,
    pub suggested_event: Event,
}

/// Delete confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
        }
    }
}

// ============================================================================
// Handler Functions
// ============================================================================

/// GET /api/events - List all events.
pub async fn list_events_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    match state.store.read_all().await {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to read events");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response()
        }
    }
}

/// POST /api/events - Create an event from structured fields.
pub async fn create_event_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CreateEventRequest>,
) -> impl IntoResponse {
    let mut event = Event::new(request.title, request.start).with_all_day(request.all_day);
    if let Some(end) = request.end {
        event = event.with_end(end);
    }

    match state.store.append(event.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(event)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to append event");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response()
        }
    }
}

/// DELETE /api/events - Delete by surrogate or composite identity.
pub async fn delete_event_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<DeleteEventRequest>,
) -> impl IntoResponse {
    match state.store.delete(&request.id).await {
        Ok(removed) => {
            tracing::debug!(id = %request.id, removed, "delete handled");
            (
                StatusCode::OK,
                Json(DeleteResponse {
                    message: "Event deleted".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to delete event");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response()
        }
    }
}

/// POST /api/parse - Ingest a natural-language event description.
pub async fn parse_event_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ParseRequest>,
) -> impl IntoResponse {
    let text = request.text.unwrap_or_default();

    match state.pipeline.ingest(&text, request.force).await {
        Ok(IngestOutcome::Created(event)) => {
            let message = format!(
                "Added \"{}\" on {}",
                event.title,
                event.start.format("%Y-%m-%d")
            );
            (StatusCode::OK, Json(ParseResponse { event, message })).into_response()
        }
        Ok(IngestOutcome::Conflict {
            conflicts,
            proposed,
        }) => {
            let message = format!(
                "Time conflict with \"{}\" from {}",
                conflicts[0].title,
                conflicts[0].start.format("%H:%M")
            );
            (
                StatusCode::CONFLICT,
                Json(ConflictResponse {
                    message,
                    conflicts,
                    suggested_event: proposed,
                }),
            )
                .into_response()
        }
        Ok(IngestOutcome::Rejected(RejectReason::InvalidInput)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid input: text is required")),
        )
            .into_response(),
        Ok(IngestOutcome::Rejected(RejectReason::NoDateFound)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Could not determine a date from your input".to_string(),
                suggestion: Some(
                    "Try being more specific (e.g., 'Team meeting Thursday at 2pm')".to_string(),
                ),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "ingestion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}
