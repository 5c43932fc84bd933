//! Shared response envelopes used across endpoints.

use serde::Serialize;

/// Success envelope carrying a single payload.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// The payload.
    pub data: T,
}

impl<T> DataResponse<T> {
    /// Wraps a payload in the success envelope.
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success envelope carrying a confirmation message plus a payload.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDataResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub msg: String,
    /// The payload.
    pub data: T,
}

impl<T> MessageDataResponse<T> {
    /// Wraps a payload and message in the success envelope.
    #[must_use]
    pub fn new(msg: &str, data: T) -> Self {
        Self {
            success: true,
            msg: msg.to_string(),
            data,
        }
    }
}

/// Success envelope carrying only a confirmation message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub msg: String,
}

impl MessageResponse {
    /// Wraps a confirmation message in the success envelope.
    #[must_use]
    pub fn new(msg: &str) -> Self {
        Self {
            success: true,
            msg: msg.to_string(),
        }
    }
}
