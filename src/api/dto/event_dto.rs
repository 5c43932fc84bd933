//! Event request DTOs for create and update operations.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::persistence::models::{EventPatch, NewEvent};

/// Request body for `POST /events`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Start timestamp; must not lie in the past.
    pub start_at: DateTime<Utc>,
    /// Venue address.
    pub address: String,
}

impl CreateEventRequest {
    /// Converts the request into the insert payload, trimming free-text
    /// fields.
    #[must_use]
    pub fn into_new_event(self) -> NewEvent {
        NewEvent {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            address: self.address.trim().to_string(),
            start_at: self.start_at,
        }
    }
}

/// Request body for `PUT /events/{uid}`. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// New title, if any.
    #[serde(default)]
    pub title: Option<String>,
    /// New description, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// New start timestamp, if any; must not lie in the past.
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    /// New venue address, if any.
    #[serde(default)]
    pub address: Option<String>,
    /// New active flag, if any.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateEventRequest {
    /// Converts the request into the partial-update payload, trimming
    /// free-text fields.
    #[must_use]
    pub fn into_patch(self) -> EventPatch {
        EventPatch {
            title: self.title.map(|s| s.trim().to_string()),
            description: self.description.map(|s| s.trim().to_string()),
            address: self.address.map(|s| s.trim().to_string()),
            start_at: self.start_at,
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn create_request_trims_free_text() {
        let Ok(req) = serde_json::from_value::<CreateEventRequest>(serde_json::json!({
            "title": "  São João  ",
            "description": " desc ",
            "start_at": "2030-06-24T00:00:00Z",
            "address": " rua 1 ",
        })) else {
            panic!("request must deserialize");
        };
        let new_event = req.into_new_event();
        assert_eq!(new_event.title, "São João");
        assert_eq!(new_event.description, "desc");
        assert_eq!(new_event.address, "rua 1");
    }

    #[test]
    fn update_request_defaults_every_field_to_absent() {
        let Ok(req) = serde_json::from_value::<UpdateEventRequest>(serde_json::json!({})) else {
            panic!("empty body must deserialize");
        };
        let patch = req.into_patch();
        assert!(patch.title.is_none());
        assert!(patch.start_at.is_none());
        assert!(patch.is_active.is_none());
    }
}
