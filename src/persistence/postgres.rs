//! PostgreSQL store for events, subscriptions and the dashboard.
//!
//! List queries are assembled from the compiled filter fragments in
//! [`super::sql`]; everything else is a fixed statement. The store returns
//! full (unsliced) row sets for the list queries — slicing is the
//! evaluated-collection pagination strategy's job — while the dashboard
//! query applies `LIMIT`/`OFFSET` itself and embeds the window total.

use sqlx::PgPool;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use uuid::Uuid;

use super::models::{DashboardRow, EventPatch, EventRow, NewEvent, SubscriptionRow, UserRef};
use super::sql::{BindValue, LATEST_STATUS_SUBQUERY, compile, translated_status_case};
use crate::domain::{QueryPlan, SubscriptionStatus};
use crate::error::GatewayError;

/// Base SELECT for event rows, promoter e-mail joined in.
const EVENT_SELECT: &str = "SELECT e.uid, u.email AS promoter, e.title, e.description, \
     e.address, e.start_at, e.is_active, e.created_at, e.updated_at \
     FROM events e JOIN users u ON u.id = e.promoter_id";

/// Base SELECT for subscription rows: event columns plus the translated
/// current status, aliased `status` so the compiled `ORDER BY` can target
/// it.
fn subscription_select() -> String {
    format!(
        "SELECT s.uid, e.title AS event_title, e.description AS event_description, \
         e.address AS event_address, e.start_at AS event_start_at, \
         e.is_active AS event_is_active, s.created_at, s.updated_at, \
         {} AS status \
         FROM subscriptions s JOIN events e ON e.id = s.event_id",
        translated_status_case(LATEST_STATUS_SUBQUERY)
    )
}

/// The dashboard aggregation: every event with a window count of all
/// matching rows and its subscription summaries embedded as JSON. The
/// query slices with `LIMIT`/`OFFSET`, so its rows feed the annotating
/// pagination strategy.
fn dashboard_sql() -> String {
    format!(
        "SELECT COUNT(*) OVER () AS total, \
         e.uid, e.title, e.description, e.address, e.start_at, e.is_active, \
         e.created_at, e.updated_at, \
         COALESCE((SELECT json_agg(json_build_object( \
             'uid', s.uid, 'email', u.email, 'status', {})) \
             FROM subscriptions s JOIN users u ON u.id = s.user_id \
             WHERE s.event_id = e.id), '[]'::json) AS list_subscriptions \
         FROM events e \
         ORDER BY e.created_at DESC \
         LIMIT $1 OFFSET $2",
        translated_status_case(LATEST_STATUS_SUBQUERY)
    )
}

/// Binds compiled filter values onto a query in placeholder order.
fn bind_values<'q, T>(
    mut query: QueryAs<'q, sqlx::Postgres, T, PgArguments>,
    binds: Vec<BindValue>,
) -> QueryAs<'q, sqlx::Postgres, T, PgArguments> {
    for bind in binds {
        query = match bind {
            BindValue::Timestamp(ts) => query.bind(ts),
            BindValue::Text(text) => query.bind(text),
            BindValue::SmallInt(code) => query.bind(code),
        };
    }
    query
}

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolves a caller uid to its user row.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UserNotFound`] when the uid does not
    /// resolve, or a database error.
    pub async fn resolve_user(&self, uid: Uuid) -> Result<UserRef, GatewayError> {
        sqlx::query_as::<_, UserRef>("SELECT id, uid, email FROM users WHERE uid = $1")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(GatewayError::UserNotFound)
    }

    /// Inserts a new event for the given promoter.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn insert_event(
        &self,
        promoter: &UserRef,
        event: NewEvent,
    ) -> Result<EventRow, GatewayError> {
        let row = sqlx::query_as::<_, (Uuid, chrono::DateTime<chrono::Utc>, bool, chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)>(
            "INSERT INTO events (promoter_id, title, description, address, start_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING uid, start_at, is_active, created_at, updated_at",
        )
        .bind(promoter.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.address)
        .bind(event.start_at)
        .fetch_one(&self.pool)
        .await?;

        let (uid, start_at, is_active, created_at, updated_at) = row;
        Ok(EventRow {
            uid,
            promoter: promoter.email.clone(),
            title: event.title,
            description: event.description,
            address: event.address,
            start_at,
            is_active,
            created_at,
            updated_at,
        })
    }

    /// Fetches one event by uid.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn fetch_event(&self, uid: Uuid) -> Result<Option<EventRow>, GatewayError> {
        let sql = format!("{EVENT_SELECT} WHERE e.uid = $1");
        Ok(sqlx::query_as::<_, EventRow>(&sql)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Applies a partial update to an event owned by the promoter.
    /// Returns the refreshed row, or `None` if no owned event matched.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn update_event(
        &self,
        uid: Uuid,
        promoter_id: i64,
        patch: EventPatch,
    ) -> Result<Option<EventRow>, GatewayError> {
        let updated = sqlx::query_scalar::<_, i64>(
            "UPDATE events SET \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 address = COALESCE($5, address), \
                 start_at = COALESCE($6, start_at), \
                 is_active = COALESCE($7, is_active), \
                 updated_at = now() \
             WHERE uid = $1 AND promoter_id = $2 \
             RETURNING id",
        )
        .bind(uid)
        .bind(promoter_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.address)
        .bind(patch.start_at)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }
        self.fetch_event(uid).await
    }

    /// Deletes an event owned by the promoter. Cascades to subscriptions
    /// and their status history.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn delete_event(&self, uid: Uuid, promoter_id: i64) -> Result<bool, GatewayError> {
        let result = sqlx::query("DELETE FROM events WHERE uid = $1 AND promoter_id = $2")
            .bind(uid)
            .bind(promoter_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Runs a compiled event filter and returns the full ordered row set.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn list_events(&self, plan: &QueryPlan) -> Result<Vec<EventRow>, GatewayError> {
        let compiled = compile(plan);
        let sql = format!("{EVENT_SELECT} {} {}", compiled.where_sql, compiled.order_sql);
        let query = sqlx::query_as::<_, EventRow>(&sql);
        Ok(bind_values(query, compiled.binds).fetch_all(&self.pool).await?)
    }

    /// Looks up the internal id and active flag of an event.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn fetch_event_ref(
        &self,
        uid: Uuid,
    ) -> Result<Option<(i64, bool)>, GatewayError> {
        Ok(
            sqlx::query_as::<_, (i64, bool)>("SELECT id, is_active FROM events WHERE uid = $1")
                .bind(uid)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Inserts a subscription plus its initial CREATED status row in one
    /// transaction. The uniqueness of (user, event) is enforced by the
    /// constraint on the insert itself; a conflict returns `None`.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn insert_subscription(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Uuid>, GatewayError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, (i64, Uuid)>(
            "INSERT INTO subscriptions (user_id, event_id) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT unique_user_event_subscription DO NOTHING \
             RETURNING id, uid",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((id, uid)) = inserted else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("INSERT INTO subscription_statuses (subscription_id, status) VALUES ($1, $2)")
            .bind(id)
            .bind(SubscriptionStatus::Created.code())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(uid))
    }

    /// Fetches one subscription by uid, restricted to its owner.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn fetch_subscription(
        &self,
        uid: Uuid,
        user_id: i64,
    ) -> Result<Option<SubscriptionRow>, GatewayError> {
        let sql = format!(
            "{} WHERE s.uid = $1 AND s.user_id = $2",
            subscription_select()
        );
        Ok(sqlx::query_as::<_, SubscriptionRow>(&sql)
            .bind(uid)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Looks up the internal id of an owned subscription.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn fetch_subscription_id(
        &self,
        uid: Uuid,
        user_id: i64,
    ) -> Result<Option<i64>, GatewayError> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT id FROM subscriptions WHERE uid = $1 AND user_id = $2",
        )
        .bind(uid)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Returns the current status code of a subscription: the latest
    /// history row, ties broken by row id.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn latest_status(
        &self,
        subscription_id: i64,
    ) -> Result<Option<i16>, GatewayError> {
        Ok(sqlx::query_scalar::<_, i16>(
            "SELECT ss.status FROM subscription_statuses ss \
             WHERE ss.subscription_id = $1 \
             ORDER BY ss.created_at DESC, ss.id DESC LIMIT 1",
        )
        .bind(subscription_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Appends a new status row. The history is append-only; rows are
    /// never updated or deleted.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn append_status(
        &self,
        subscription_id: i64,
        status: SubscriptionStatus,
    ) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO subscription_statuses (subscription_id, status) VALUES ($1, $2)")
            .bind(subscription_id)
            .bind(status.code())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Runs a compiled subscription filter and returns the full ordered
    /// row set.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn list_subscriptions(
        &self,
        plan: &QueryPlan,
    ) -> Result<Vec<SubscriptionRow>, GatewayError> {
        let compiled = compile(plan);
        let sql = format!(
            "{} {} {}",
            subscription_select(),
            compiled.where_sql,
            compiled.order_sql
        );
        let query = sqlx::query_as::<_, SubscriptionRow>(&sql);
        Ok(bind_values(query, compiled.binds).fetch_all(&self.pool).await?)
    }

    /// Runs the dashboard aggregation for one page of events.
    ///
    /// # Errors
    ///
    /// Returns a database error on failure.
    pub async fn fetch_dashboard(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DashboardRow>, GatewayError> {
        let sql = dashboard_sql();
        Ok(sqlx::query_as::<_, DashboardRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_select_aliases_the_translated_status() {
        let sql = subscription_select();
        assert!(sql.contains("AS status"));
        assert!(sql.contains(LATEST_STATUS_SUBQUERY));
        assert!(sql.contains("JOIN events e ON e.id = s.event_id"));
    }

    #[test]
    fn dashboard_query_embeds_total_and_subscription_payload() {
        let sql = dashboard_sql();
        assert!(sql.contains("COUNT(*) OVER () AS total"));
        assert!(sql.contains("json_agg"));
        assert!(sql.contains("'[]'::json"));
        assert!(sql.contains("LIMIT $1 OFFSET $2"));
        assert!(sql.contains("ORDER BY e.created_at DESC"));
    }

    #[test]
    fn event_select_joins_the_promoter_email() {
        assert!(EVENT_SELECT.contains("u.email AS promoter"));
        assert!(EVENT_SELECT.contains("JOIN users u ON u.id = e.promoter_id"));
    }
}
