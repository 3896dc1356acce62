//! HTTP routes

pub mod debug;
pub mod health;
pub mod intake;
pub mod order;
pub mod price;
pub mod search;

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use http::{HeaderName, HeaderValue};
use shared::error::AppError;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::state::AppState;

pub(crate) type ApiResult<T> = Result<Json<T>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// UUID v4 request IDs
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build the routes (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    let orders = Router::new()
        .route("/orders/stats", get(order::get_order_stats))
        .route("/orders/{id}", get(order::get_order))
        .route("/orders/{id}/articles", get(order::get_order_articles))
        .route("/soap", post(intake::create_order));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(orders)
        .route("/search", get(search::search_orders))
        .route("/price", get(price::get_price))
        .route("/debug/check-privileges", get(debug::check_privileges))
}

/// Create the service router with middleware and state
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), XRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
