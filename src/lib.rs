//! # eventos-gateway
//!
//! REST API backend for managing events and subscriptions.
//!
//! Promoters create and manage events; participants subscribe to them.
//! Subscription status is tracked as an append-only history, and the
//! promoter dashboard aggregates subscriptions per event directly in SQL.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── EventService (service/)
//!     │
//!     ├── Filter parsing and query plans (domain/)
//!     ├── Pagination engine (pagination)
//!     │
//!     └── PostgreSQL Persistence (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod pagination;
pub mod persistence;
pub mod service;
