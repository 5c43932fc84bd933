//! Event CRUD handlers: create, list, detail, update, delete.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{CreateEventRequest, DataResponse, MessageResponse, UpdateEventRequest};
use crate::api::identity::CurrentUser;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /events` — Create an event owned by the caller.
///
/// # Errors
///
/// Returns [`GatewayError`] on validation failure or an unknown caller.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create an event",
    description = "Creates an event owned by the calling promoter. The start timestamp must not lie in the past.",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Event created", body = serde_json::Value),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state
        .event_service
        .create_event(user.uid, req.into_new_event())
        .await?;
    Ok(Json(DataResponse::new(event)))
}

/// `GET /events` — List events with filtering, ordering and pagination.
///
/// Accepted query parameters: `limit`, `page`, `order_by` (`start_at` |
/// `title`), `order` (`asc` | `desc`), `search`, `start_at`.
///
/// # Errors
///
/// Returns [`GatewayError`] with the collected parameter violations.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns events starting at or after the given bound, optionally filtered by a title+address search, ordered and paginated.",
    responses(
        (status = 200, description = "Paginated event list", body = serde_json::Value),
        (status = 400, description = "Invalid filter parameters", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, GatewayError> {
    let envelope = state.event_service.list_events(&query).await?;
    Ok(Json(envelope))
}

/// `GET /events/{uid}` — Event details.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the uid does not resolve.
#[utoipa::path(
    get,
    path = "/api/v1/events/{uid}",
    tag = "Events",
    summary = "Event details",
    params(("uid" = Uuid, Path, description = "Event uid")),
    responses(
        (status = 200, description = "Event details", body = serde_json::Value),
        (status = 400, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn detail_event(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(uid): Path<Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state.event_service.event_detail(uid).await?;
    Ok(Json(DataResponse::new(event)))
}

/// `PUT /events/{uid}` — Partial update of an owned event.
///
/// # Errors
///
/// Returns [`GatewayError`] on validation failure or when the caller owns
/// no such event.
#[utoipa::path(
    put,
    path = "/api/v1/events/{uid}",
    tag = "Events",
    summary = "Update an event",
    description = "Applies a partial update to an event owned by the caller. Absent fields stay unchanged.",
    params(("uid" = Uuid, Path, description = "Event uid")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = serde_json::Value),
        (status = 400, description = "Validation failure or event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(uid): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state
        .event_service
        .update_event(user.uid, uid, req.into_patch())
        .await?;
    Ok(Json(DataResponse::new(event)))
}

/// `DELETE /events/{uid}` — Delete an owned event.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] when the caller owns no such
/// event.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{uid}",
    tag = "Events",
    summary = "Delete an event",
    description = "Deletes an event owned by the caller. Subscriptions and their status history cascade.",
    params(("uid" = Uuid, Path, description = "Event uid")),
    responses(
        (status = 200, description = "Event deleted", body = serde_json::Value),
        (status = 400, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(uid): Path<Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state.event_service.delete_event(user.uid, uid).await?;
    Ok(Json(MessageResponse::new("Evento removido com sucesso")))
}

/// Event management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/{uid}",
            get(detail_event).put(update_event).delete(delete_event),
        )
}
