//! Database row models for events, subscriptions and the dashboard.
//!
//! List and detail rows double as response payloads, so they carry the
//! serde names clients already consume (subscription rows keep the
//! `event__*` key style of the original wire format).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::pagination::WindowTotal;

/// Resolved caller: internal row id plus public identity.
#[derive(Debug, Clone, FromRow)]
pub struct UserRef {
    /// Internal row id, used for foreign keys.
    pub id: i64,
    /// Public opaque identifier.
    pub uid: Uuid,
    /// E-mail address.
    pub email: String,
}

/// Fields of an event insert.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Venue address.
    pub address: String,
    /// Start timestamp.
    pub start_at: DateTime<Utc>,
}

/// Partial event update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    /// New title, if any.
    pub title: Option<String>,
    /// New description, if any.
    pub description: Option<String>,
    /// New venue address, if any.
    pub address: Option<String>,
    /// New start timestamp, if any.
    pub start_at: Option<DateTime<Utc>>,
    /// New active flag, if any.
    pub is_active: Option<bool>,
}

/// An event row as returned by list, detail and write operations.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EventRow {
    /// Public opaque identifier.
    pub uid: Uuid,
    /// Promoter's e-mail address.
    pub promoter: String,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Venue address.
    pub address: String,
    /// Start timestamp.
    pub start_at: DateTime<Utc>,
    /// Whether the event accepts subscriptions.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A subscription row joined with its event and current translated status.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SubscriptionRow {
    /// Public opaque identifier.
    pub uid: Uuid,
    /// Related event's title.
    #[serde(rename = "event__title")]
    pub event_title: String,
    /// Related event's description.
    #[serde(rename = "event__description")]
    pub event_description: String,
    /// Related event's venue address.
    #[serde(rename = "event__address")]
    pub event_address: String,
    /// Related event's start timestamp.
    #[serde(rename = "event__start_at")]
    pub event_start_at: DateTime<Utc>,
    /// Whether the related event is active.
    #[serde(rename = "event__is_active")]
    pub event_is_active: bool,
    /// Subscription creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Subscription update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Translated current status (latest history row).
    pub status: String,
}

/// Raw dashboard row as fetched from the aggregation query.
///
/// `list_subscriptions` arrives as the JSON payload the query embedded per
/// row; [`DashboardRow::decode`] turns it into structured data before the
/// row reaches the pagination engine.
#[derive(Debug, Clone, FromRow)]
pub struct DashboardRow {
    /// Window count of all matching events, identical on every row.
    pub total: i64,
    /// Public opaque identifier.
    pub uid: Uuid,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Venue address.
    pub address: String,
    /// Start timestamp.
    pub start_at: DateTime<Utc>,
    /// Whether the event accepts subscriptions.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Embedded JSON array of subscription summaries.
    pub list_subscriptions: serde_json::Value,
}

/// Subscription summary nested inside a dashboard entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSubscription {
    /// Subscription identifier.
    pub uid: Uuid,
    /// Subscriber's e-mail address.
    pub email: String,
    /// Translated current status.
    pub status: String,
}

/// Decoded dashboard row handed to strategy-(b) pagination and serialized
/// into the response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardEntry {
    /// Window count of all matching events.
    pub total: i64,
    /// Public opaque identifier.
    pub uid: Uuid,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Venue address.
    pub address: String,
    /// Start timestamp.
    pub start_at: DateTime<Utc>,
    /// Whether the event accepts subscriptions.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Subscription summaries for this event.
    pub list_subscriptions: Vec<DashboardSubscription>,
}

impl DashboardRow {
    /// Decodes the embedded `list_subscriptions` payload.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the embedded JSON does not match the
    /// expected summary shape.
    pub fn decode(self) -> Result<DashboardEntry, serde_json::Error> {
        let list_subscriptions = serde_json::from_value(self.list_subscriptions)?;
        Ok(DashboardEntry {
            total: self.total,
            uid: self.uid,
            title: self.title,
            description: self.description,
            address: self.address,
            start_at: self.start_at,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            list_subscriptions,
        })
    }
}

impl WindowTotal for DashboardEntry {
    fn window_total(&self) -> i64 {
        self.total
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn subscription_row_serializes_with_event_prefixed_keys() {
        let row = SubscriptionRow {
            uid: Uuid::new_v4(),
            event_title: "São João".to_string(),
            event_description: "O Melhor São João do Brasil".to_string(),
            event_address: "rua 1".to_string(),
            event_start_at: Utc::now(),
            event_is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            status: "Desinscrito".to_string(),
        };
        let Ok(json) = serde_json::to_value(&row) else {
            panic!("serialization failed");
        };
        assert!(json.get("event__title").is_some());
        assert!(json.get("event__is_active").is_some());
        assert!(json.get("event_title").is_none());
        assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("Desinscrito"));
    }

    #[test]
    fn dashboard_row_decodes_its_embedded_payload() {
        let sub_uid = Uuid::new_v4();
        let row = DashboardRow {
            total: 2,
            uid: Uuid::new_v4(),
            title: "São João".to_string(),
            description: "O São João do Brasil".to_string(),
            address: "rua 1".to_string(),
            start_at: Utc::now(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            list_subscriptions: serde_json::json!([
                { "uid": sub_uid, "email": "aa@aa.com", "status": "Desinscrito" }
            ]),
        };
        let Ok(entry) = row.decode() else {
            panic!("decode failed");
        };
        assert_eq!(entry.window_total(), 2);
        assert_eq!(entry.list_subscriptions.len(), 1);
        assert_eq!(
            entry.list_subscriptions.first().map(|s| s.uid),
            Some(sub_uid)
        );
    }

    #[test]
    fn dashboard_row_with_empty_array_decodes_to_no_subscriptions() {
        let row = DashboardRow {
            total: 1,
            uid: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            address: "a".to_string(),
            start_at: Utc::now(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            list_subscriptions: serde_json::json!([]),
        };
        let Ok(entry) = row.decode() else {
            panic!("decode failed");
        };
        assert!(entry.list_subscriptions.is_empty());
    }

    #[test]
    fn malformed_embedded_payload_is_a_decode_error() {
        let row = DashboardRow {
            total: 1,
            uid: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            address: "a".to_string(),
            start_at: Utc::now(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            list_subscriptions: serde_json::json!({ "not": "a list" }),
        };
        assert!(row.decode().is_err());
    }
}
