//! Database access layer
//!
//! Handlers talk to the store through [`OrderStore`]; [`PgOrderStore`] backs
//! it with PostgreSQL, [`MemoryOrderStore`] keeps everything in process.

pub mod memory;
pub mod orders;

pub use memory::MemoryOrderStore;
pub use orders::PgOrderStore;

use async_trait::async_trait;
use serde::Serialize;
use shared::models::{DateRange, GroupBy, NewOrder, Order, OrderArticle, PeriodCount};
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Table privilege held by the current database role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Grant {
    pub privilege_type: String,
    pub table_schema: String,
    pub table_name: String,
}

/// Read/insert operations over the order collection
///
/// Period keys produced by [`OrderStore::period_counts`] must equal
/// [`GroupBy::period_key`] and come back sorted descending.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders whose creation timestamp lies in `range`
    async fn count_orders(&self, range: &DateRange) -> StoreResult<i64>;

    /// Distinct period keys among orders in `range`
    async fn count_periods(&self, group_by: GroupBy, range: &DateRange) -> StoreResult<i64>;

    /// One page of `(period, count)` rows, most recent period first
    async fn period_counts(
        &self,
        group_by: GroupBy,
        range: &DateRange,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Vec<PeriodCount>>;

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>>;

    /// Line items of an order, in insertion order
    async fn find_articles(&self, order_id: i64) -> StoreResult<Vec<OrderArticle>>;

    /// Persist an order with its articles, returning the new id
    async fn insert_order(&self, order: NewOrder) -> StoreResult<i64>;

    /// Table grants of the role the store connects as
    async fn grants(&self) -> StoreResult<Vec<Grant>>;
}
