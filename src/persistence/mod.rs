//! Persistence layer: PostgreSQL store and predicate-to-SQL compilation.
//!
//! [`postgres::PostgresStore`] executes all reads and writes over a
//! `sqlx::PgPool`; [`sql`] compiles the domain's predicate trees into the
//! SQL fragments the list queries are assembled from.

pub mod models;
pub mod postgres;
pub mod sql;

pub use postgres::PostgresStore;
