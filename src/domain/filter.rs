//! Filter parameter parsing and validation.
//!
//! Query-string values arrive as plain strings; this module turns them into
//! typed, validated filter specifications ([`EventParams`],
//! [`SubscriptionParams`], [`DashboardParams`]). Every violation is collected
//! into a list of [`FieldError`] so the client sees all offending fields at
//! once.
//!
//! Validation rules (applied per field):
//! - `limit`: integer, default 10, range 1..=100
//! - `page`: integer, default 1, minimum 1
//! - `order_by`: entity-specific fixed field set, default `start_at`
//! - `order`: `asc` | `desc`, default `asc`
//! - `search`: trimmed; empty counts as absent; otherwise at least 3 chars
//! - `status`: one of the four display translations, case-insensitive
//!   (subscriptions only)
//! - `start_at`: timestamp, defaults to the validation moment

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::status::SubscriptionStatus;
use crate::error::FieldError;

/// Sort direction of a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending (the default).
    Asc,
    /// Descending; negates the effective sort key.
    Desc,
}

/// Orderable fields for event list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrderField {
    /// Order by the event's start timestamp (the default).
    StartAt,
    /// Order by the event title.
    Title,
}

/// Orderable fields for subscription list queries.
///
/// `start_at` and `title` order on the *related event's* column; `status`
/// orders on the subscription's latest translated status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionOrderField {
    /// Order by the related event's start timestamp (the default).
    StartAt,
    /// Order by the related event's title.
    Title,
    /// Order by the latest translated status of the subscription.
    Status,
}

/// Validated filter specification for event list queries.
#[derive(Debug, Clone)]
pub struct EventParams {
    /// Lower bound on `start_at`; events starting earlier are excluded.
    pub start_at: DateTime<Utc>,
    /// Page size, 1..=100.
    pub limit: u32,
    /// 1-based page number.
    pub page: u32,
    /// Validated ordering field.
    pub order_by: EventOrderField,
    /// Sort direction.
    pub order: SortOrder,
    /// Trimmed search term (at least 3 chars) or absent.
    pub search: Option<String>,
}

/// Validated filter specification for subscription list queries.
#[derive(Debug, Clone)]
pub struct SubscriptionParams {
    /// Lower bound on the related event's `start_at`.
    pub start_at: DateTime<Utc>,
    /// Optional filter on the subscription's current status.
    pub status: Option<SubscriptionStatus>,
    /// Page size, 1..=100.
    pub limit: u32,
    /// 1-based page number.
    pub page: u32,
    /// Validated ordering field.
    pub order_by: SubscriptionOrderField,
    /// Sort direction.
    pub order: SortOrder,
    /// Trimmed search term (at least 3 chars) or absent.
    pub search: Option<String>,
}

/// Validated paging parameters for the dashboard query.
///
/// The dashboard applies `LIMIT`/`OFFSET` inside the aggregation query
/// itself, so only `limit` and `page` are accepted here.
#[derive(Debug, Clone, Copy)]
pub struct DashboardParams {
    /// Page size, 1..=100.
    pub limit: u32,
    /// 1-based page number.
    pub page: u32,
}

impl EventParams {
    /// Parses and validates raw query parameters for the event list.
    ///
    /// # Errors
    ///
    /// Returns all field violations as a list of [`FieldError`]s, each
    /// tagged with the offending field name.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let limit = collect(parse_limit(query), &mut errors);
        let page = collect(parse_page(query), &mut errors);
        let order_by = collect(parse_event_order_by(query), &mut errors);
        let order = collect(parse_order(query), &mut errors);
        let search = collect(parse_search(query), &mut errors);
        let start_at = collect(parse_start_at(query), &mut errors);

        if errors.is_empty() {
            Ok(Self {
                start_at: start_at.unwrap_or_else(Utc::now),
                limit: limit.unwrap_or(DEFAULT_LIMIT),
                page: page.unwrap_or(DEFAULT_PAGE),
                order_by: order_by.unwrap_or(EventOrderField::StartAt),
                order: order.unwrap_or(SortOrder::Asc),
                search: search.flatten(),
            })
        } else {
            Err(errors)
        }
    }
}

impl SubscriptionParams {
    /// Parses and validates raw query parameters for the subscription list.
    ///
    /// # Errors
    ///
    /// Returns all field violations as a list of [`FieldError`]s, each
    /// tagged with the offending field name.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let limit = collect(parse_limit(query), &mut errors);
        let page = collect(parse_page(query), &mut errors);
        let order_by = collect(parse_subscription_order_by(query), &mut errors);
        let order = collect(parse_order(query), &mut errors);
        let search = collect(parse_search(query), &mut errors);
        let status = collect(parse_status(query), &mut errors);
        let start_at = collect(parse_start_at(query), &mut errors);

        if errors.is_empty() {
            Ok(Self {
                start_at: start_at.unwrap_or_else(Utc::now),
                status: status.flatten(),
                limit: limit.unwrap_or(DEFAULT_LIMIT),
                page: page.unwrap_or(DEFAULT_PAGE),
                order_by: order_by.unwrap_or(SubscriptionOrderField::StartAt),
                order: order.unwrap_or(SortOrder::Asc),
                search: search.flatten(),
            })
        } else {
            Err(errors)
        }
    }
}

impl DashboardParams {
    /// Parses and validates raw query parameters for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns all field violations as a list of [`FieldError`]s.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let limit = collect(parse_limit(query), &mut errors);
        let page = collect(parse_page(query), &mut errors);

        if errors.is_empty() {
            Ok(Self {
                limit: limit.unwrap_or(DEFAULT_LIMIT),
                page: page.unwrap_or(DEFAULT_PAGE),
            })
        } else {
            Err(errors)
        }
    }

    /// Row offset for the dashboard query: `(page - 1) * limit`.
    #[must_use]
    pub const fn offset(self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

const DEFAULT_LIMIT: u32 = 10;
const DEFAULT_PAGE: u32 = 1;

/// Unwraps a per-field result, pushing the error into the accumulator.
fn collect<T>(result: Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

fn parse_limit(query: &HashMap<String, String>) -> Result<u32, FieldError> {
    let Some(raw) = query.get("limit") else {
        return Ok(DEFAULT_LIMIT);
    };
    let limit: u32 = raw
        .trim()
        .parse()
        .map_err(|_| FieldError::value_error("limit", "Limite deve ser um número inteiro"))?;
    if !(1..=100).contains(&limit) {
        return Err(FieldError::value_error("limit", "Limite deve ser entre 1 e 100"));
    }
    Ok(limit)
}

fn parse_page(query: &HashMap<String, String>) -> Result<u32, FieldError> {
    let Some(raw) = query.get("page") else {
        return Ok(DEFAULT_PAGE);
    };
    let page: u32 = raw
        .trim()
        .parse()
        .map_err(|_| FieldError::value_error("page", "Pagina deve ser um número inteiro"))?;
    if page < 1 {
        return Err(FieldError::value_error("page", "Pagina não pode ser menor que 1"));
    }
    Ok(page)
}

fn parse_order(query: &HashMap<String, String>) -> Result<SortOrder, FieldError> {
    match query.get("order").map(String::as_str) {
        None => Ok(SortOrder::Asc),
        Some("asc") => Ok(SortOrder::Asc),
        Some("desc") => Ok(SortOrder::Desc),
        Some(_) => Err(FieldError::value_error("order", "Ordem inválida")),
    }
}

fn parse_event_order_by(query: &HashMap<String, String>) -> Result<EventOrderField, FieldError> {
    match query.get("order_by").map(String::as_str) {
        None | Some("start_at") => Ok(EventOrderField::StartAt),
        Some("title") => Ok(EventOrderField::Title),
        Some(_) => Err(FieldError::value_error("order_by", "Ordenação inválida")),
    }
}

fn parse_subscription_order_by(
    query: &HashMap<String, String>,
) -> Result<SubscriptionOrderField, FieldError> {
    match query.get("order_by").map(String::as_str) {
        None | Some("start_at") => Ok(SubscriptionOrderField::StartAt),
        Some("title") => Ok(SubscriptionOrderField::Title),
        Some("status") => Ok(SubscriptionOrderField::Status),
        Some(_) => Err(FieldError::value_error("order_by", "Ordenação inválida")),
    }
}

fn parse_search(query: &HashMap<String, String>) -> Result<Option<String>, FieldError> {
    let Some(raw) = query.get("search") else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() < 3 {
        return Err(FieldError::value_error(
            "search",
            "Pesquisa deve ter no mínimo 3 caracteres",
        ));
    }
    Ok(Some(trimmed.to_string()))
}

fn parse_status(query: &HashMap<String, String>) -> Result<Option<SubscriptionStatus>, FieldError> {
    let Some(raw) = query.get("status") else {
        return Ok(None);
    };
    SubscriptionStatus::from_translation(raw.trim())
        .map(Some)
        .ok_or_else(|| FieldError::value_error("status", "Status inválido"))
}

fn parse_start_at(query: &HashMap<String, String>) -> Result<DateTime<Utc>, FieldError> {
    let Some(raw) = query.get("start_at") else {
        return Ok(Utc::now());
    };
    parse_timestamp(raw.trim())
        .ok_or_else(|| FieldError::value_error("start_at", "Data inválida"))
}

/// Parses a timestamp in RFC 3339 or naive ISO form (`2025-06-24T00:00:00`).
/// Naive values are taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn event_defaults_apply_when_query_is_empty() {
        let Ok(params) = EventParams::from_query(&HashMap::new()) else {
            panic!("empty query must validate");
        };
        assert_eq!(params.limit, 10);
        assert_eq!(params.page, 1);
        assert_eq!(params.order_by, EventOrderField::StartAt);
        assert_eq!(params.order, SortOrder::Asc);
        assert_eq!(params.search, None);
    }

    #[test]
    fn limit_out_of_range_is_a_value_error() {
        for raw in ["0", "101"] {
            let Err(errors) = EventParams::from_query(&query(&[("limit", raw)])) else {
                panic!("limit {raw} must fail");
            };
            assert_eq!(errors.len(), 1);
            let Some(err) = errors.first() else {
                panic!("one error expected");
            };
            assert_eq!(err.loc, "limit");
            assert_eq!(err.kind, "value_error");
            assert_eq!(err.msg, "Limite deve ser entre 1 e 100");
        }
    }

    #[test]
    fn non_numeric_limit_is_a_value_error() {
        let Err(errors) = EventParams::from_query(&query(&[("limit", "dez")])) else {
            panic!("non-numeric limit must fail");
        };
        assert_eq!(errors.first().map(|e| e.loc.as_str()), Some("limit"));
    }

    #[test]
    fn page_zero_is_rejected_by_the_parser() {
        let Err(errors) = EventParams::from_query(&query(&[("page", "0")])) else {
            panic!("page 0 must fail");
        };
        assert_eq!(errors.first().map(|e| e.loc.as_str()), Some("page"));
    }

    #[test]
    fn invalid_order_by_and_order_are_rejected() {
        let Err(errors) = EventParams::from_query(&query(&[
            ("order_by", "description"),
            ("order", "sideways"),
        ])) else {
            panic!("invalid ordering must fail");
        };
        let locs: Vec<&str> = errors.iter().map(|e| e.loc.as_str()).collect();
        assert!(locs.contains(&"order_by"));
        assert!(locs.contains(&"order"));
    }

    #[test]
    fn status_is_not_an_event_order_field() {
        assert!(EventParams::from_query(&query(&[("order_by", "status")])).is_err());
        assert!(SubscriptionParams::from_query(&query(&[("order_by", "status")])).is_ok());
    }

    #[test]
    fn short_search_is_a_value_error() {
        let Err(errors) = EventParams::from_query(&query(&[("search", "ab")])) else {
            panic!("2-char search must fail");
        };
        let Some(err) = errors.first() else {
            panic!("one error expected");
        };
        assert_eq!(err.loc, "search");
        assert_eq!(err.kind, "value_error");
    }

    #[test]
    fn search_is_trimmed_and_blank_counts_as_absent() {
        let Ok(params) = EventParams::from_query(&query(&[("search", "  festa  ")])) else {
            panic!("padded search must validate");
        };
        assert_eq!(params.search.as_deref(), Some("festa"));

        let Ok(params) = EventParams::from_query(&query(&[("search", "   ")])) else {
            panic!("blank search must validate");
        };
        assert_eq!(params.search, None);
    }

    #[test]
    fn search_of_exactly_three_chars_passes() {
        let Ok(params) = EventParams::from_query(&query(&[("search", " rua ")])) else {
            panic!("3-char search must validate");
        };
        assert_eq!(params.search.as_deref(), Some("rua"));
    }

    #[test]
    fn subscription_status_filter_is_case_insensitive() {
        let Ok(params) = SubscriptionParams::from_query(&query(&[("status", "cancelado")])) else {
            panic!("lowercase status must validate");
        };
        assert_eq!(params.status, Some(SubscriptionStatus::Canceled));

        let Err(errors) = SubscriptionParams::from_query(&query(&[("status", "pendente")])) else {
            panic!("unknown status must fail");
        };
        assert_eq!(errors.first().map(|e| e.loc.as_str()), Some("status"));
    }

    #[test]
    fn status_is_ignored_for_events() {
        // The event parser has no status rule; an unknown key passes through.
        assert!(EventParams::from_query(&query(&[("status", "pendente")])).is_ok());
    }

    #[test]
    fn start_at_accepts_rfc3339_and_naive_iso() {
        let Ok(params) =
            EventParams::from_query(&query(&[("start_at", "2025-06-24T00:00:00Z")]))
        else {
            panic!("rfc3339 must validate");
        };
        assert_eq!(params.start_at.to_rfc3339(), "2025-06-24T00:00:00+00:00");

        let Ok(params) = EventParams::from_query(&query(&[("start_at", "2025-06-24T00:00:00")]))
        else {
            panic!("naive iso must validate");
        };
        assert_eq!(params.start_at.to_rfc3339(), "2025-06-24T00:00:00+00:00");
    }

    #[test]
    fn malformed_start_at_is_a_value_error() {
        let Err(errors) = EventParams::from_query(&query(&[("start_at", "24/06/2025")])) else {
            panic!("malformed date must fail");
        };
        let Some(err) = errors.first() else {
            panic!("one error expected");
        };
        assert_eq!(err.loc, "start_at");
        assert_eq!(err.kind, "value_error");
    }

    #[test]
    fn violations_are_collected_across_fields() {
        let Err(errors) = SubscriptionParams::from_query(&query(&[
            ("limit", "500"),
            ("search", "ab"),
            ("status", "pendente"),
        ])) else {
            panic!("multiple violations must fail");
        };
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn dashboard_offset_reflects_page_and_limit() {
        let Ok(params) = DashboardParams::from_query(&query(&[("limit", "20"), ("page", "3")]))
        else {
            panic!("dashboard params must validate");
        };
        assert_eq!(params.offset(), 40);
    }
}
