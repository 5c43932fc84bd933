//! Compilation of predicate trees into SQL fragments.
//!
//! [`compile`] turns a [`QueryPlan`] into a `WHERE` clause, an `ORDER BY`
//! clause and an ordered list of bind values with `$n` placeholders. The
//! fragments assume the table aliases used by the list queries: `e` for
//! `events`, `s` for `subscriptions` (subscription plans only).
//!
//! The compiler is pure string manipulation, so the exact SQL a plan
//! produces is unit-tested without a database.

use crate::domain::predicate::{OrderColumn, Predicate, QueryPlan};
use crate::domain::{SortOrder, SubscriptionStatus};

/// Correlated subquery resolving a subscription's current status code:
/// the latest history row by `created_at`, ties broken by the serial row
/// id (last inserted wins).
pub const LATEST_STATUS_SUBQUERY: &str = "(SELECT ss.status FROM subscription_statuses ss \
     WHERE ss.subscription_id = s.id \
     ORDER BY ss.created_at DESC, ss.id DESC LIMIT 1)";

/// One value bound to a `$n` placeholder of a compiled filter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// A timestamp bound (the `start_at` lower bound).
    Timestamp(chrono::DateTime<chrono::Utc>),
    /// A text bound (`ILIKE` patterns).
    Text(String),
    /// A smallint bound (status codes).
    SmallInt(i16),
}

/// Compiled filter: SQL fragments plus their bind values in placeholder
/// order.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    /// `WHERE ...` fragment, never empty (the start-at bound is always
    /// present).
    pub where_sql: String,
    /// `ORDER BY ...` fragment.
    pub order_sql: String,
    /// Bind values, `binds[0]` maps to `$1`.
    pub binds: Vec<BindValue>,
}

/// Compiles a plan into SQL fragments.
///
/// Status-equality leaves reference the subscription alias `s` and are
/// only produced by subscription plans.
#[must_use]
pub fn compile(plan: &QueryPlan) -> CompiledFilter {
    let mut clauses = Vec::with_capacity(plan.conditions.len());
    let mut binds = Vec::new();

    for condition in &plan.conditions {
        match condition {
            Predicate::StartAtAtLeast(bound) => {
                binds.push(BindValue::Timestamp(*bound));
                clauses.push(format!("e.start_at >= ${}", binds.len()));
            }
            Predicate::SearchContains(term) => {
                let pattern = like_pattern(term);
                binds.push(BindValue::Text(pattern.clone()));
                let title_param = binds.len();
                binds.push(BindValue::Text(pattern));
                let address_param = binds.len();
                clauses.push(format!(
                    "(e.title ILIKE ${title_param} ESCAPE '\\' AND e.address ILIKE ${address_param} ESCAPE '\\')"
                ));
            }
            Predicate::StatusEquals(status) => {
                binds.push(BindValue::SmallInt(status.code()));
                clauses.push(format!("{LATEST_STATUS_SUBQUERY} = ${}", binds.len()));
            }
        }
    }

    let direction = match plan.order.direction {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    let column = match plan.order.column {
        OrderColumn::EventStartAt => "e.start_at",
        OrderColumn::EventTitle => "e.title",
        // Alias of the translated-status column in the subscription
        // SELECT list.
        OrderColumn::LatestStatus => "status",
    };

    CompiledFilter {
        where_sql: format!("WHERE {}", clauses.join(" AND ")),
        order_sql: format!("ORDER BY {column} {direction}"),
        binds,
    }
}

/// Renders the SQL `CASE` translating a status-code expression into its
/// display string, defaulting to the reserved fallback.
#[must_use]
pub fn translated_status_case(code_expr: &str) -> String {
    let mut case = format!("CASE {code_expr}");
    for status in SubscriptionStatus::OBSERVABLE {
        case.push_str(&format!(
            " WHEN {} THEN '{}'",
            status.code(),
            status.translation()
        ));
    }
    case.push_str(&format!(
        " ELSE '{}' END",
        SubscriptionStatus::Undefined.translation()
    ));
    case
}

/// Builds a `%term%` pattern, escaping LIKE metacharacters in the term.
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::{EventParams, SubscriptionParams};

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn event_plan(pairs: &[(&str, &str)]) -> QueryPlan {
        let Ok(params) = EventParams::from_query(&query(pairs)) else {
            panic!("params must validate");
        };
        QueryPlan::for_events(&params)
    }

    fn subscription_plan(pairs: &[(&str, &str)]) -> QueryPlan {
        let Ok(params) = SubscriptionParams::from_query(&query(pairs)) else {
            panic!("params must validate");
        };
        QueryPlan::for_subscriptions(&params)
    }

    #[test]
    fn default_event_plan_compiles_to_a_single_bound() {
        let compiled = compile(&event_plan(&[]));
        assert_eq!(compiled.where_sql, "WHERE e.start_at >= $1");
        assert_eq!(compiled.order_sql, "ORDER BY e.start_at ASC");
        assert_eq!(compiled.binds.len(), 1);
        assert!(matches!(compiled.binds.first(), Some(BindValue::Timestamp(_))));
    }

    #[test]
    fn search_requires_both_title_and_address_to_match() {
        let compiled = compile(&event_plan(&[("search", "festa")]));
        assert!(compiled.where_sql.contains("e.title ILIKE $2"));
        assert!(compiled.where_sql.contains("AND e.address ILIKE $3"));
        assert_eq!(
            compiled.binds.get(1),
            Some(&BindValue::Text("%festa%".to_string()))
        );
        assert_eq!(compiled.binds.get(1), compiled.binds.get(2));
    }

    #[test]
    fn status_filter_compiles_to_the_latest_status_subquery() {
        let compiled = compile(&subscription_plan(&[("status", "Cancelado")]));
        assert!(compiled.where_sql.contains(LATEST_STATUS_SUBQUERY));
        assert!(compiled.binds.contains(&BindValue::SmallInt(3)));
    }

    #[test]
    fn latest_status_breaks_created_at_ties_on_row_id() {
        assert!(LATEST_STATUS_SUBQUERY.contains("ORDER BY ss.created_at DESC, ss.id DESC"));
        assert!(LATEST_STATUS_SUBQUERY.contains("LIMIT 1"));
    }

    #[test]
    fn ordering_by_status_descending_uses_the_translated_alias() {
        let compiled = compile(&subscription_plan(&[("order_by", "status"), ("order", "desc")]));
        assert_eq!(compiled.order_sql, "ORDER BY status DESC");
    }

    #[test]
    fn ordering_by_title_uses_the_event_column() {
        let compiled = compile(&subscription_plan(&[("order_by", "title")]));
        assert_eq!(compiled.order_sql, "ORDER BY e.title ASC");
    }

    #[test]
    fn placeholders_are_numbered_across_all_leaves() {
        let compiled = compile(&subscription_plan(&[
            ("search", "festa"),
            ("status", "criado"),
        ]));
        assert_eq!(compiled.binds.len(), 4);
        assert!(compiled.where_sql.contains("$4"));
        assert!(!compiled.where_sql.contains("$5"));
    }

    #[test]
    fn translated_case_covers_every_observable_status() {
        let case = translated_status_case("x.status");
        for status in SubscriptionStatus::OBSERVABLE {
            assert!(case.contains(status.translation()));
        }
        assert!(case.ends_with("ELSE 'Desconhecido' END"));
    }

    #[test]
    fn like_patterns_escape_metacharacters() {
        assert_eq!(like_pattern("festa"), "%festa%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c\\d"), "%c\\\\d%");
    }
}
