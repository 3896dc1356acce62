//! Order search endpoint

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use shared::models::SearchResult;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<String>,
}

/// GET /search
///
/// Always 200; upstream failures are reported inside the envelope.
pub async fn search_orders(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResult> {
    let limit = query.limit.as_deref().and_then(|l| l.trim().parse().ok());
    Json(state.search.search_orders(&query.q, limit).await)
}
