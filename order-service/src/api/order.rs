//! Order statistics and lookup endpoints

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::NaiveDateTime;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{DateRange, OrderStats, OrderSummary, OrderWithArticles};

use crate::error::ServiceError;
use crate::services::stats::{self, parse_date_bound};
use crate::state::AppState;

use super::ApiResult;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const DEFAULT_GROUP_BY: &str = "month";

/// GET /orders/stats query, kept as raw strings so malformed numbers get an
/// `InvalidFormat` body instead of a bare extractor rejection
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub group_by: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn int_param(name: &'static str, value: &Option<String>, default: i64) -> Result<i64, AppError> {
    match non_blank(value) {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| {
            AppError::with_message(ErrorCode::InvalidFormat, format!("{name} must be an integer"))
                .with_detail("field", name)
        }),
    }
}

fn date_param(
    name: &'static str,
    value: &Option<String>,
    is_end: bool,
) -> Result<Option<NaiveDateTime>, AppError> {
    non_blank(value)
        .map(|v| {
            parse_date_bound(v, is_end).ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidFormat,
                    format!("{name} must be YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"),
                )
                .with_detail("field", name)
            })
        })
        .transpose()
}

/// GET /orders/stats
pub async fn get_order_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<OrderStats> {
    let page = int_param("page", &query.page, DEFAULT_PAGE)?;
    let limit = int_param("limit", &query.limit, DEFAULT_LIMIT)?;
    let group_by = query.group_by.as_deref().unwrap_or(DEFAULT_GROUP_BY);
    let range = DateRange::new(
        date_param("start_date", &query.start_date, false)?,
        date_param("end_date", &query.end_date, true)?,
    );

    let stats = stats::get_order_stats(state.store.as_ref(), page, limit, group_by, range).await?;
    Ok(Json(stats))
}

fn order_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| {
        AppError::with_message(ErrorCode::InvalidFormat, "Order id must be an integer")
            .with_detail("id", raw)
    })
}

/// GET /orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OrderSummary> {
    let id = order_id(&id)?;
    let order = state
        .store
        .find_order(id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("id", id))?;
    Ok(Json(OrderSummary::from(&order)))
}

/// GET /orders/{id}/articles
pub async fn get_order_articles(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OrderWithArticles> {
    let id = order_id(&id)?;
    let order = state
        .store
        .find_order(id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("id", id))?;
    let articles = state
        .store
        .find_articles(id)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(OrderWithArticles { order, articles }))
}
