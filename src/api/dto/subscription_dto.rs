//! Subscription request DTOs.

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body for `POST /subscriptions`.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    /// Event to subscribe to.
    pub event_uid: Uuid,
}
