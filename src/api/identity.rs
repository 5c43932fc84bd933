//! Caller identity extraction.
//!
//! Session and token management live outside this service; upstream
//! authentication injects the caller's uid in the `x-user-id` header and
//! [`CurrentUser`] is the boundary where that identity enters the
//! handlers. A missing or malformed header rejects with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::GatewayError;

/// Header carrying the authenticated caller's uid.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, extracted from the identity header.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// Public opaque identifier of the caller.
    pub uid: Uuid,
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let uid = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or(GatewayError::Unauthorized)?;
        Ok(Self { uid })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    use super::*;

    async fn extract(header: Option<&str>) -> Result<CurrentUser, GatewayError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let Ok(request) = builder.body(()) else {
            panic!("request build failed");
        };
        let (mut parts, ()) = request.into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn valid_uid_header_extracts() {
        let uid = Uuid::new_v4();
        let Ok(user) = extract(Some(&uid.to_string())).await else {
            panic!("valid header must extract");
        };
        assert_eq!(user.uid, uid);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        assert!(matches!(extract(None).await, Err(GatewayError::Unauthorized)));
    }

    #[tokio::test]
    async fn malformed_uid_is_unauthorized() {
        assert!(matches!(
            extract(Some("not-a-uuid")).await,
            Err(GatewayError::Unauthorized)
        ));
    }
}
