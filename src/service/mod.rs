//! Service layer: business logic orchestration.
//!
//! [`EventService`] coordinates reads and writes: parameter validation,
//! predicate compilation, store execution and pagination.

pub mod event_service;

pub use event_service::EventService;
