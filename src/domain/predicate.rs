//! Predicate trees built from validated filter specifications.
//!
//! A [`QueryPlan`] is the storage-agnostic output of the filter layer: a
//! conjunction of [`Predicate`] leaves plus one [`OrderDirective`]. Building
//! a plan is a pure function of the filter specification, so composing the
//! same specification twice always yields the same plan — conditions never
//! accumulate across calls. The persistence layer compiles plans to SQL.

use chrono::{DateTime, Utc};

use crate::domain::filter::{
    EventOrderField, EventParams, SortOrder, SubscriptionOrderField, SubscriptionParams,
};
use crate::domain::status::SubscriptionStatus;

/// Which entity a plan filters. Decides the table layout the compiler
/// targets and which columns `start_at`/`title` resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEntity {
    /// The `events` table itself.
    Event,
    /// The `subscriptions` table joined to its event.
    Subscription,
}

/// One boolean condition over the filtered rows. All leaves of a plan are
/// combined with logical AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `start_at >= bound` on the event's own column (events) or the
    /// related event's column (subscriptions).
    StartAtAtLeast(DateTime<Utc>),
    /// Case-insensitive substring match that must hit *both* the title and
    /// the address.
    SearchContains(String),
    /// The subscription's current status code equals the given status.
    /// Subscription plans only.
    StatusEquals(SubscriptionStatus),
}

/// Column an ordering directive resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderColumn {
    /// The event's `start_at` column.
    EventStartAt,
    /// The event's `title` column.
    EventTitle,
    /// The subscription's latest translated status string.
    LatestStatus,
}

/// Normalized ordering: column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDirective {
    /// Column to order on.
    pub column: OrderColumn,
    /// Ascending or descending.
    pub direction: SortOrder,
}

/// A compiled filter: entity, AND-combined conditions and an ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Entity the plan applies to.
    pub entity: FilterEntity,
    /// Conditions, combined with AND. Order of the leaves is irrelevant.
    pub conditions: Vec<Predicate>,
    /// Ordering directive.
    pub order: OrderDirective,
}

impl QueryPlan {
    /// Builds the plan for an event list query.
    #[must_use]
    pub fn for_events(params: &EventParams) -> Self {
        let mut conditions = vec![Predicate::StartAtAtLeast(params.start_at)];
        if let Some(search) = &params.search {
            conditions.push(Predicate::SearchContains(search.clone()));
        }

        let column = match params.order_by {
            EventOrderField::StartAt => OrderColumn::EventStartAt,
            EventOrderField::Title => OrderColumn::EventTitle,
        };

        Self {
            entity: FilterEntity::Event,
            conditions,
            order: OrderDirective {
                column,
                direction: params.order,
            },
        }
    }

    /// Builds the plan for a subscription list query.
    ///
    /// The `start_at` bound and the search both apply to the *related
    /// event's* columns; the status filter applies to the subscription's
    /// current (latest) status.
    #[must_use]
    pub fn for_subscriptions(params: &SubscriptionParams) -> Self {
        let mut conditions = vec![Predicate::StartAtAtLeast(params.start_at)];
        if let Some(search) = &params.search {
            conditions.push(Predicate::SearchContains(search.clone()));
        }
        if let Some(status) = params.status {
            conditions.push(Predicate::StatusEquals(status));
        }

        let column = match params.order_by {
            SubscriptionOrderField::StartAt => OrderColumn::EventStartAt,
            SubscriptionOrderField::Title => OrderColumn::EventTitle,
            SubscriptionOrderField::Status => OrderColumn::LatestStatus,
        };

        Self {
            entity: FilterEntity::Subscription,
            conditions,
            order: OrderDirective {
                column,
                direction: params.order,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn subscription_params(pairs: &[(&str, &str)]) -> SubscriptionParams {
        let Ok(params) = SubscriptionParams::from_query(&query(pairs)) else {
            panic!("params must validate");
        };
        params
    }

    #[test]
    fn event_plan_always_carries_the_start_at_bound() {
        let Ok(params) = EventParams::from_query(&HashMap::new()) else {
            panic!("params must validate");
        };
        let plan = QueryPlan::for_events(&params);
        assert_eq!(plan.entity, FilterEntity::Event);
        assert_eq!(plan.conditions.len(), 1);
        assert!(matches!(
            plan.conditions.first(),
            Some(Predicate::StartAtAtLeast(_))
        ));
    }

    #[test]
    fn search_adds_a_single_substring_leaf() {
        let Ok(params) = EventParams::from_query(&query(&[("search", "festa")])) else {
            panic!("params must validate");
        };
        let plan = QueryPlan::for_events(&params);
        assert_eq!(plan.conditions.len(), 2);
        assert!(
            plan.conditions
                .contains(&Predicate::SearchContains("festa".to_string()))
        );
    }

    #[test]
    fn status_filter_becomes_an_equality_leaf_on_code_three() {
        let plan = QueryPlan::for_subscriptions(&subscription_params(&[("status", "Cancelado")]));
        assert!(
            plan.conditions
                .contains(&Predicate::StatusEquals(SubscriptionStatus::Canceled))
        );
        let Some(Predicate::StatusEquals(status)) = plan
            .conditions
            .iter()
            .find(|c| matches!(c, Predicate::StatusEquals(_)))
        else {
            panic!("status leaf expected");
        };
        assert_eq!(status.code(), 3);
    }

    #[test]
    fn subscription_ordering_maps_to_event_columns() {
        let plan = QueryPlan::for_subscriptions(&subscription_params(&[("order_by", "title")]));
        assert_eq!(
            plan.order,
            OrderDirective {
                column: OrderColumn::EventTitle,
                direction: SortOrder::Asc,
            }
        );
    }

    #[test]
    fn status_desc_orders_on_the_latest_translation_descending() {
        let plan = QueryPlan::for_subscriptions(&subscription_params(&[
            ("order_by", "status"),
            ("order", "desc"),
        ]));
        assert_eq!(
            plan.order,
            OrderDirective {
                column: OrderColumn::LatestStatus,
                direction: SortOrder::Desc,
            }
        );
    }

    #[test]
    fn building_twice_yields_an_equivalent_plan() {
        let params = subscription_params(&[
            ("search", "festa"),
            ("status", "confirmado"),
            ("start_at", "2025-06-24T00:00:00"),
            ("order", "desc"),
        ]);
        let first = QueryPlan::for_subscriptions(&params);
        let second = QueryPlan::for_subscriptions(&params);
        assert_eq!(first, second);
        assert_eq!(first.conditions.len(), 3);
    }
}
