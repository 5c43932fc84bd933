//! Domain layer: status vocabulary, filter specifications and predicates.
//!
//! Everything here is pure and storage-agnostic: raw query parameters are
//! validated into filter specifications, specifications are compiled into
//! predicate trees, and the status vocabulary translates between stored
//! codes and display strings.

pub mod filter;
pub mod predicate;
pub mod status;

pub use filter::{DashboardParams, EventParams, SortOrder, SubscriptionParams};
pub use predicate::{FilterEntity, OrderColumn, OrderDirective, Predicate, QueryPlan};
pub use status::SubscriptionStatus;
