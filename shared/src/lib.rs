//! Shared types for the order desk
//!
//! Common types used by the service and its tooling: the unified error
//! system, order/statistics/search models and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, ErrorBody, ErrorCode};
