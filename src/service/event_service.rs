//! Business logic for events, subscriptions and the dashboard.
//!
//! [`EventService`] ties the layers together: it validates raw query
//! parameters into filter specifications, compiles them into query plans,
//! runs them through the store and feeds the result into the matching
//! pagination strategy. Write operations resolve the caller first and
//! enforce the business rules the storage constraints cannot express.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    DashboardParams, EventParams, QueryPlan, SubscriptionParams, SubscriptionStatus,
};
use crate::error::{FieldError, GatewayError};
use crate::pagination::{PageEnvelope, annotate_rows, paginate_rows};
use crate::persistence::models::{
    DashboardEntry, EventPatch, EventRow, NewEvent, SubscriptionRow,
};
use crate::persistence::postgres::PostgresStore;

/// Service layer for all event, subscription and dashboard operations.
#[derive(Debug, Clone)]
pub struct EventService {
    store: PostgresStore,
}

impl EventService {
    /// Creates the service over the given store.
    #[must_use]
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Creates an event owned by the calling promoter.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `start_at` lies in the past,
    /// [`GatewayError::UserNotFound`] for an unknown caller, or a database
    /// error.
    pub async fn create_event(
        &self,
        promoter_uid: Uuid,
        event: NewEvent,
    ) -> Result<EventRow, GatewayError> {
        if event.start_at < Utc::now() {
            return Err(GatewayError::Validation(vec![FieldError::value_error(
                "start_at",
                "Data de início não pode ser uma data passada",
            )]));
        }

        let promoter = self.store.resolve_user(promoter_uid).await?;
        let row = self.store.insert_event(&promoter, event).await?;
        tracing::info!(event_uid = %row.uid, promoter = %promoter.uid, "event created");
        Ok(row)
    }

    /// Lists events matching the raw query parameters, paginated by the
    /// evaluated-collection strategy.
    ///
    /// # Errors
    ///
    /// Returns the collected parameter violations or a database error.
    pub async fn list_events(
        &self,
        query: &HashMap<String, String>,
    ) -> Result<PageEnvelope<EventRow>, GatewayError> {
        let params = EventParams::from_query(query).map_err(GatewayError::Validation)?;
        let plan = QueryPlan::for_events(&params);
        let rows = self.store.list_events(&plan).await?;
        Ok(paginate_rows(rows, params.page, params.limit))
    }

    /// Fetches one event by uid.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] or a database error.
    pub async fn event_detail(&self, uid: Uuid) -> Result<EventRow, GatewayError> {
        self.store
            .fetch_event(uid)
            .await?
            .ok_or(GatewayError::EventNotFound)
    }

    /// Applies a partial update to an event the caller owns.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a past `start_at`,
    /// [`GatewayError::EventNotFound`] when the caller owns no such event,
    /// or a database error.
    pub async fn update_event(
        &self,
        promoter_uid: Uuid,
        uid: Uuid,
        patch: EventPatch,
    ) -> Result<EventRow, GatewayError> {
        if let Some(start_at) = patch.start_at
            && start_at < Utc::now()
        {
            return Err(GatewayError::Validation(vec![FieldError::value_error(
                "start_at",
                "Data de início não pode ser uma data passada",
            )]));
        }

        let promoter = self.store.resolve_user(promoter_uid).await?;
        self.store
            .update_event(uid, promoter.id, patch)
            .await?
            .ok_or(GatewayError::EventNotFound)
    }

    /// Deletes an event the caller owns.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] when the caller owns no
    /// such event, or a database error.
    pub async fn delete_event(&self, promoter_uid: Uuid, uid: Uuid) -> Result<(), GatewayError> {
        let promoter = self.store.resolve_user(promoter_uid).await?;
        if self.store.delete_event(uid, promoter.id).await? {
            tracing::info!(event_uid = %uid, promoter = %promoter.uid, "event deleted");
            Ok(())
        } else {
            Err(GatewayError::EventNotFound)
        }
    }

    /// Subscribes the caller to an event. The (user, event) uniqueness is
    /// enforced by the constrained insert, never by a prior check.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] /
    /// [`GatewayError::EventNotActive`] for a missing or inactive event,
    /// [`GatewayError::AlreadySubscribed`] on a uniqueness conflict, or a
    /// database error.
    pub async fn subscribe(
        &self,
        user_uid: Uuid,
        event_uid: Uuid,
    ) -> Result<SubscriptionRow, GatewayError> {
        let user = self.store.resolve_user(user_uid).await?;
        let (event_id, is_active) = self
            .store
            .fetch_event_ref(event_uid)
            .await?
            .ok_or(GatewayError::EventNotFound)?;
        if !is_active {
            return Err(GatewayError::EventNotActive);
        }

        let uid = self
            .store
            .insert_subscription(user.id, event_id)
            .await?
            .ok_or(GatewayError::AlreadySubscribed)?;
        tracing::info!(subscription_uid = %uid, event_uid = %event_uid, "subscription created");

        self.store
            .fetch_subscription(uid, user.id)
            .await?
            .ok_or(GatewayError::SubscriptionNotFound)
    }

    /// Lists subscriptions matching the raw query parameters, paginated
    /// by the evaluated-collection strategy.
    ///
    /// # Errors
    ///
    /// Returns the collected parameter violations or a database error.
    pub async fn list_subscriptions(
        &self,
        query: &HashMap<String, String>,
    ) -> Result<PageEnvelope<SubscriptionRow>, GatewayError> {
        let params = SubscriptionParams::from_query(query).map_err(GatewayError::Validation)?;
        let plan = QueryPlan::for_subscriptions(&params);
        let rows = self.store.list_subscriptions(&plan).await?;
        Ok(paginate_rows(rows, params.page, params.limit))
    }

    /// Fetches one subscription the caller owns.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SubscriptionNotFound`] or a database error.
    pub async fn subscription_detail(
        &self,
        user_uid: Uuid,
        uid: Uuid,
    ) -> Result<SubscriptionRow, GatewayError> {
        let user = self.store.resolve_user(user_uid).await?;
        self.store
            .fetch_subscription(uid, user.id)
            .await?
            .ok_or(GatewayError::SubscriptionNotFound)
    }

    /// Unsubscribes the caller: appends an UNSIGNED status row. The
    /// subscription row itself is never deleted.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SubscriptionNotFound`] for an unknown or
    /// foreign subscription, [`GatewayError::AlreadyUnsigned`] when the
    /// current status is already UNSIGNED, or a database error.
    pub async fn unsubscribe(&self, user_uid: Uuid, uid: Uuid) -> Result<(), GatewayError> {
        let user = self.store.resolve_user(user_uid).await?;
        let subscription_id = self
            .store
            .fetch_subscription_id(uid, user.id)
            .await?
            .ok_or(GatewayError::SubscriptionNotFound)?;

        let current = self.store.latest_status(subscription_id).await?;
        if current == Some(SubscriptionStatus::Unsigned.code()) {
            return Err(GatewayError::AlreadyUnsigned);
        }

        self.store
            .append_status(subscription_id, SubscriptionStatus::Unsigned)
            .await?;
        tracing::info!(subscription_uid = %uid, "subscription unsigned");
        Ok(())
    }

    /// Runs the dashboard aggregation: one raw query slices the page and
    /// embeds the window total, the service decodes the nested payload and
    /// the annotating strategy fills in the metadata.
    ///
    /// # Errors
    ///
    /// Returns the collected parameter violations, a database error, or an
    /// internal error when an embedded payload fails to decode.
    pub async fn dashboard(
        &self,
        query: &HashMap<String, String>,
    ) -> Result<PageEnvelope<DashboardEntry>, GatewayError> {
        let params = DashboardParams::from_query(query).map_err(GatewayError::Validation)?;
        let rows = self
            .store
            .fetch_dashboard(i64::from(params.limit), params.offset())
            .await?;

        let entries = rows
            .into_iter()
            .map(|row| {
                row.decode()
                    .map_err(|e| GatewayError::Internal(format!("dashboard payload: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(annotate_rows(entries, params.page, params.limit))
    }
}
