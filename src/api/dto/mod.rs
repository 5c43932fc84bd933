//! Data Transfer Objects for REST request/response serialization.
//!
//! List endpoints return the pagination envelope directly; single-item
//! endpoints wrap their row in the success envelopes defined in
//! [`common_dto`].

pub mod common_dto;
pub mod event_dto;
pub mod subscription_dto;

pub use common_dto::*;
pub use event_dto::*;
pub use subscription_dto::*;
