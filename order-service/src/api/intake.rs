//! XML order intake endpoint

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use shared::error::AppError;
use shared::models::OrderCreated;

use crate::services::intake;
use crate::state::AppState;

/// POST /soap
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<OrderCreated>), AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let id = intake::create_order(state.store.as_ref(), content_type, &body).await?;
    Ok((StatusCode::CREATED, Json(OrderCreated::new(id))))
}
