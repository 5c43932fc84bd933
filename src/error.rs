//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type. Every failure surfaces as a
//! structured list of [`FieldError`]s in the response body:
//!
//! ```json
//! {
//!   "success": false,
//!   "error": [
//!     { "loc": "search", "msg": "Pesquisa deve ter no mínimo 3 caracteres", "type": "value_error" }
//!   ]
//! }
//! ```
//!
//! Business and validation failures map to 400, a missing caller identity
//! to 401, database faults to 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// One validation or business-rule violation, tied to the offending field.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    /// Name of the offending field (e.g. `"search"`, `"event_uid"`).
    pub loc: String,
    /// Human-readable message.
    pub msg: String,
    /// Machine-readable error kind (e.g. `"value_error"`, `"not_found"`).
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    /// Creates a field error with an explicit kind tag.
    #[must_use]
    pub fn new(loc: &str, msg: &str, kind: &str) -> Self {
        Self {
            loc: loc.to_string(),
            msg: msg.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Creates a `value_error`, the kind shared by all parser violations.
    #[must_use]
    pub fn value_error(loc: &str, msg: &str) -> Self {
        Self::new(loc, msg, "value_error")
    }
}

/// Error response body wrapping the violation list.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// The violations, one entry per offending field.
    pub error: Vec<FieldError>,
}

/// Server-side error enum with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request parameters or body failed validation.
    #[error("request validation failed")]
    Validation(Vec<FieldError>),

    /// Event with the given uid was not found (or not owned by the caller).
    #[error("event not found")]
    EventNotFound,

    /// Event exists but is not accepting subscriptions.
    #[error("event is not active")]
    EventNotActive,

    /// Subscription with the given uid was not found for the caller.
    #[error("subscription not found")]
    SubscriptionNotFound,

    /// Caller identity did not resolve to a known user.
    #[error("user not found")]
    UserNotFound,

    /// The (user, event) pair already has a subscription. Surfaced by the
    /// uniqueness constraint at insert time.
    #[error("subscription already exists for this user and event")]
    AlreadySubscribed,

    /// Unsubscribe requested but the current status is already UNSIGNED.
    #[error("subscription is already unsigned")]
    AlreadyUnsigned,

    /// Caller identity header is missing or malformed.
    #[error("unauthorized")]
    Unauthorized,

    /// Database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error (e.g. malformed embedded payloads).
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::EventNotFound
            | Self::EventNotActive
            | Self::SubscriptionNotFound
            | Self::UserNotFound
            | Self::AlreadySubscribed
            | Self::AlreadyUnsigned => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders the variant as the violation list of the response body.
    #[must_use]
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            Self::Validation(errors) => errors.clone(),
            Self::EventNotFound => {
                vec![FieldError::new("event_uid", "Evento não encontrado", "not_found")]
            }
            Self::EventNotActive => {
                vec![FieldError::new("event_uid", "Evento não está ativo", "not_active")]
            }
            Self::SubscriptionNotFound => vec![FieldError::new(
                "subscription_uid",
                "Inscrição não encontrada",
                "not_found",
            )],
            Self::UserNotFound => {
                vec![FieldError::new("user", "Usuário não encontrado", "not_found")]
            }
            Self::AlreadySubscribed => vec![FieldError::new(
                "event_uid",
                "Inscrição já existe para este evento",
                "already_subscribed",
            )],
            Self::AlreadyUnsigned => vec![FieldError::new(
                "status",
                "Você já não é inscrito neste evento",
                "already_unsigned",
            )],
            Self::Unauthorized => {
                vec![FieldError::new("x-user-id", "Não Autorizado", "unauthorized")]
            }
            Self::Database(_) | Self::Internal(_) => {
                vec![FieldError::new("server", "Erro interno", "internal_error")]
            }
        }
    }
}

impl From<Vec<FieldError>> for GatewayError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            Self::Database(err) => tracing::error!(error = %err, "database failure"),
            Self::Internal(msg) => tracing::error!(error = %msg, "internal failure"),
            _ => {}
        }
        let status = self.status_code();
        let body = ErrorResponse {
            success: false,
            error: self.field_errors(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_keep_their_field_list() {
        let err = GatewayError::Validation(vec![
            FieldError::value_error("search", "Pesquisa deve ter no mínimo 3 caracteres"),
            FieldError::value_error("limit", "Limite deve ser entre 1 e 100"),
        ]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn field_error_kind_serializes_as_type() {
        let err = FieldError::value_error("search", "curta demais");
        let Ok(json) = serde_json::to_value(&err) else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("value_error"));
        assert_eq!(json.get("loc").and_then(|v| v.as_str()), Some("search"));
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn business_conflicts_map_to_bad_request() {
        for err in [
            GatewayError::EventNotFound,
            GatewayError::EventNotActive,
            GatewayError::AlreadySubscribed,
            GatewayError::AlreadyUnsigned,
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.field_errors().len(), 1);
        }
    }

    #[test]
    fn already_unsigned_carries_its_kind_tag() {
        let errors = GatewayError::AlreadyUnsigned.field_errors();
        assert_eq!(errors.first().map(|e| e.kind.as_str()), Some("already_unsigned"));
        assert_eq!(errors.first().map(|e| e.loc.as_str()), Some("status"));
    }

    #[test]
    fn missing_identity_is_unauthorized() {
        assert_eq!(GatewayError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }
}
