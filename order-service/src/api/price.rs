//! Product price endpoint

use axum::Json;
use axum::extract::{Query, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{PriceQuote, PriceRequest};

use crate::state::AppState;

use super::ApiResult;

/// GET /price
pub async fn get_price(
    State(state): State<AppState>,
    Query(request): Query<PriceRequest>,
) -> ApiResult<PriceQuote> {
    let key = state.prices.validate(&request)?;

    match state.prices.fetch_price(&key).await {
        Ok(Some(quote)) => Ok(Json(quote)),
        Ok(None) => Err(AppError::new(ErrorCode::PriceNotFound)),
        Err(e) => {
            tracing::error!(
                error = %e,
                factory = %key.factory,
                collection = %key.collection,
                article = %key.article,
                "Error fetching price"
            );
            Err(e.into())
        }
    }
}
