//! Chat API endpoint — the relay's single unit of work.
//!
//! `POST /assist/thread-chat` accepts either input mode and returns
//! `{reply}` on success, `{error}` with 400 (validation) or 500
//! (anything fatal) otherwise.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};

use crate::runtime::{self, ChatRequest};
use crate::state::AppState;

pub async fn thread_chat(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    // Deserialize by hand so shape errors share the `{error}` envelope
    // instead of axum's plain-text rejection.
    let req: ChatRequest = match serde_json::from_value(body) {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": format!("invalid request: {e}") })),
            )
                .into_response();
        }
    };

    match runtime::handle_chat(&state, req).await {
        Ok(reply) => Json(serde_json::json!({ "reply": reply })).into_response(),
        Err(e) if e.is_client_error() => {
            tracing::debug!(error = %e, "rejected chat request");
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "chat request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
