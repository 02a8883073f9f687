//! REST endpoints for driving the conversation over HTTP.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::engine::Action;
use super::message::{Message, Step};
use super::session::{Conversation, PendingTurn, Turn};
use super::state::{DetailField, PersonalDetails, SelectionState};
use crate::catalog::{self, FaqCategory};
use crate::error::FlowError;

/// Shared state for conversation routes.
#[derive(Clone)]
pub struct ApiState {
    pub conversation: Arc<Mutex<Conversation>>,
    /// Suggested pause before showing a scripted reply.
    pub reveal_delay: Duration,
}

/// Snapshot of the whole conversation.
#[derive(Debug, Serialize)]
struct ConversationView {
    id: Uuid,
    messages: Vec<Message>,
    selection: SelectionState,
    form: PersonalDetails,
    responding: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_step: Option<Step>,
}

/// Messages appended by one action.
#[derive(Debug, Serialize)]
struct ActionResponse {
    messages: Vec<Message>,
    /// How long the client should wait before showing the assistant reply.
    reveal_after_ms: u64,
}

#[derive(Debug, Deserialize)]
struct FieldUpdate {
    field: DetailField,
    value: String,
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "ruby-assist"
    }))
}

// ── Catalog ─────────────────────────────────────────────────────────────

/// GET /api/catalog
async fn get_catalog() -> impl IntoResponse {
    let faqs: serde_json::Map<String, serde_json::Value> = FaqCategory::ALL
        .into_iter()
        .map(|c| {
            (
                c.name().to_string(),
                serde_json::to_value(catalog::faqs(c)).unwrap_or_default(),
            )
        })
        .collect();

    Json(serde_json::json!({
        "membership_types": catalog::membership_types(),
        "recurring_plans": catalog::recurring_plans(),
        "day_passes": catalog::day_passes(),
        "faqs": faqs,
    }))
}

// ── Conversation ────────────────────────────────────────────────────────

/// GET /api/conversation
async fn get_conversation(State(state): State<ApiState>) -> impl IntoResponse {
    let conv = state.conversation.lock().await;
    Json(ConversationView {
        id: conv.id(),
        messages: conv.messages().to_vec(),
        selection: conv.selection().clone(),
        form: conv.form().clone(),
        responding: conv.is_responding(),
        active_step: conv.active_step().cloned(),
    })
}

/// POST /api/conversation/actions
///
/// The session lock is released while the assistant responder works, so
/// reads keep answering and further actions get 409 until the reply lands.
async fn post_action(State(state): State<ApiState>, Json(action): Json<Action>) -> Response {
    let pending = {
        let mut conv = state.conversation.lock().await;
        match conv.begin(action) {
            Ok(Turn::Complete(messages)) => {
                return Json(ActionResponse {
                    messages,
                    reveal_after_ms: millis(state.reveal_delay),
                })
                .into_response();
            }
            Ok(Turn::Pending(pending)) => pending,
            Err(e) => return flow_error_response(e),
        }
    };

    // The turn finishes on its own task so a client hanging up cannot
    // leave the conversation responding forever.
    let turn = pending.turn;
    let handle = tokio::spawn(finish_turn(Arc::clone(&state.conversation), pending));

    match handle.await {
        Ok(Ok(messages)) => Json(ActionResponse {
            messages,
            reveal_after_ms: 0,
        })
        .into_response(),
        Ok(Err(e)) => flow_error_response(e),
        Err(e) => {
            error!(turn, error = %e, "Assistant turn task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Assistant turn failed" })),
            )
                .into_response()
        }
    }
}

/// Ask the responder for a delegated turn and append its reply.
async fn finish_turn(
    conversation: Arc<Mutex<Conversation>>,
    pending: PendingTurn,
) -> Result<Vec<Message>, FlowError> {
    let responder = conversation.lock().await.responder();

    debug!(turn = pending.turn, "Awaiting assistant responder");
    let reply = responder.respond(&pending.history).await;

    conversation.lock().await.complete(pending, reply)
}

/// PUT /api/conversation/details
async fn put_details(
    State(state): State<ApiState>,
    Json(update): Json<FieldUpdate>,
) -> impl IntoResponse {
    let mut conv = state.conversation.lock().await;
    conv.update_field(update.field, update.value);
    Json(conv.form().clone())
}

/// POST /api/conversation/details/submit
async fn submit_details(State(state): State<ApiState>) -> Response {
    let mut conv = state.conversation.lock().await;
    match conv.submit_details() {
        Ok(messages) => Json(ActionResponse {
            messages,
            reveal_after_ms: millis(state.reveal_delay),
        })
        .into_response(),
        Err(e) => flow_error_response(e),
    }
}

fn flow_error_response(e: FlowError) -> Response {
    let status = match e {
        FlowError::Busy | FlowError::UnknownTurn { .. } => StatusCode::CONFLICT,
        FlowError::EmptyMessage | FlowError::IncompleteDetails { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    warn!(error = %e, status = status.as_u16(), "Rejected conversation action");

    let mut body = serde_json::json!({ "error": e.to_string() });
    if let FlowError::IncompleteDetails { missing } = e {
        body["missing"] = serde_json::json!(missing);
    }
    (status, Json(body)).into_response()
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Build the conversation REST routes.
pub fn conversation_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/catalog", get(get_catalog))
        .route("/api/conversation", get(get_conversation))
        .route("/api/conversation/actions", post(post_action))
        .route("/api/conversation/details", put(put_details))
        .route("/api/conversation/details/submit", post(submit_details))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
