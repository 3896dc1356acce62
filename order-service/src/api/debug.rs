//! Diagnostics endpoints

use axum::Json;
use axum::extract::State;
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

use super::ApiResult;

/// GET /debug/check-privileges
///
/// Logs the table grants of the database role in use.
pub async fn check_privileges(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    let grants = state.store.grants().await.map_err(|e| {
        tracing::error!("Error checking privileges: {e}");
        AppError::with_message(ErrorCode::DatabaseError, "Failed to check privileges.")
    })?;

    tracing::info!(count = grants.len(), "Database privileges:");
    for grant in &grants {
        tracing::info!(
            privilege = %grant.privilege_type,
            schema = %grant.table_schema,
            table = %grant.table_name,
            "grant"
        );
    }

    Ok(Json(serde_json::json!({
        "message": "Privileges logged successfully."
    })))
}
