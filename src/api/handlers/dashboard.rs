//! Dashboard handler: aggregated events with subscription summaries.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::identity::CurrentUser;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /dashboard` — Paginated events with nested subscription
/// summaries.
///
/// A single aggregation query slices the page and embeds the window
/// total, so the envelope metadata comes from the annotating pagination
/// strategy.
///
/// # Errors
///
/// Returns [`GatewayError`] with the collected parameter violations.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    summary = "Event dashboard",
    description = "Returns every event with its subscription summaries (subscriber e-mail and translated current status), newest first, paginated.",
    responses(
        (status = 200, description = "Paginated dashboard", body = serde_json::Value),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, GatewayError> {
    let envelope = state.event_service.dashboard(&query).await?;
    Ok(Json(envelope))
}

/// Dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}
