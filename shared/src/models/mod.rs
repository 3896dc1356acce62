//! Data models
//!
//! Shared between the service and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL).

pub mod order;
pub mod price;
pub mod search;
pub mod serde_helpers;
pub mod stats;

// Re-exports
pub use order::*;
pub use price::*;
pub use search::*;
pub use stats::*;
