//! PostgreSQL persistence
//!
//! [`Database`] owns the connection pool. Every statement it runs is timed
//! and passed to the [`QueryLogger`] hook.

pub mod database;
pub mod indices;
pub mod query_logger;
pub mod users;

pub use database::{log_store, Database};
pub use indices::IndexStore;
pub use query_logger::{QueryEvent, QueryLogLevel, QueryLogger};
pub use users::{ReadinessCheck, UserStore};
