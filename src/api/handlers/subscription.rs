//! Subscription handlers: subscribe, list, detail, unsubscribe.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{CreateSubscriptionRequest, DataResponse, MessageDataResponse, MessageResponse};
use crate::api::identity::CurrentUser;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /subscriptions` — Subscribe the caller to an event.
///
/// # Errors
///
/// Returns [`GatewayError`] for a missing or inactive event, or when the
/// caller is already subscribed.
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    tag = "Subscriptions",
    summary = "Subscribe to an event",
    description = "Creates a subscription for the caller and appends the initial CREATED status. One subscription per (user, event) pair.",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription created", body = serde_json::Value),
        (status = 400, description = "Event missing, inactive, or already subscribed", body = ErrorResponse),
    )
)]
pub async fn create_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let subscription = state.event_service.subscribe(user.uid, req.event_uid).await?;
    Ok(Json(MessageDataResponse::new(
        "Inscrição criada com sucesso",
        subscription,
    )))
}

/// `GET /subscriptions` — List subscriptions with filtering, ordering
/// and pagination.
///
/// Accepted query parameters: `limit`, `page`, `order_by` (`start_at` |
/// `title` | `status`), `order` (`asc` | `desc`), `search`, `status`,
/// `start_at`.
///
/// # Errors
///
/// Returns [`GatewayError`] with the collected parameter violations.
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions",
    tag = "Subscriptions",
    summary = "List subscriptions",
    description = "Returns subscriptions whose event starts at or after the given bound, optionally filtered by search and current status, ordered and paginated.",
    responses(
        (status = 200, description = "Paginated subscription list", body = serde_json::Value),
        (status = 400, description = "Invalid filter parameters", body = ErrorResponse),
    )
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, GatewayError> {
    let envelope = state.event_service.list_subscriptions(&query).await?;
    Ok(Json(envelope))
}

/// `GET /subscriptions/{uid}` — Details of an owned subscription.
///
/// # Errors
///
/// Returns [`GatewayError::SubscriptionNotFound`] if the uid does not
/// resolve for the caller.
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/{uid}",
    tag = "Subscriptions",
    summary = "Subscription details",
    params(("uid" = Uuid, Path, description = "Subscription uid")),
    responses(
        (status = 200, description = "Subscription details", body = serde_json::Value),
        (status = 400, description = "Subscription not found", body = ErrorResponse),
    )
)]
pub async fn detail_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(uid): Path<Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let subscription = state.event_service.subscription_detail(user.uid, uid).await?;
    Ok(Json(DataResponse::new(subscription)))
}

/// `POST /subscriptions/{uid}/unsign` — Unsubscribe.
///
/// Appends an UNSIGNED status row; the subscription itself is kept.
///
/// # Errors
///
/// Returns [`GatewayError::AlreadyUnsigned`] when the current status is
/// already UNSIGNED, or [`GatewayError::SubscriptionNotFound`].
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions/{uid}/unsign",
    tag = "Subscriptions",
    summary = "Unsubscribe from an event",
    description = "Appends an UNSIGNED status to the subscription's history. The subscription row is never deleted.",
    params(("uid" = Uuid, Path, description = "Subscription uid")),
    responses(
        (status = 200, description = "Unsubscribed", body = serde_json::Value),
        (status = 400, description = "Not found or already unsigned", body = ErrorResponse),
    )
)]
pub async fn unsign_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(uid): Path<Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state.event_service.unsubscribe(user.uid, uid).await?;
    Ok(Json(MessageResponse::new("Inscrição removida com sucesso")))
}

/// Subscription routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            post(create_subscription).get(list_subscriptions),
        )
        .route("/subscriptions/{uid}", get(detail_subscription))
        .route("/subscriptions/{uid}/unsign", post(unsign_subscription))
}
