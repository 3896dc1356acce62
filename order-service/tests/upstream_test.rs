//! Search and price lookups against mocked upstream servers

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use order_service::api::create_router;
use order_service::config::{Config, SearchConfig};
use order_service::db::MemoryOrderStore;
use order_service::services::{PriceFetcher, SearchClient};
use order_service::services::price::PriceKey;
use order_service::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn search_client(base_url: &str) -> SearchClient {
    SearchClient::new(&SearchConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(2),
        ..SearchConfig::default()
    })
    .unwrap()
}

fn price_key() -> PriceKey {
    PriceKey {
        factory: "cobsa".into(),
        collection: "manual".into(),
        article: "manu7530".into(),
    }
}

#[tokio::test]
async fn test_search_blank_query_sends_match_all() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json/search"))
        .and(body_json(json!({
            "index": "orders",
            "query": {"match_all": {}},
            "limit": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 0,
            "timed_out": false,
            "hits": {
                "total": 2,
                "hits": [
                    {"_id": 1, "_score": 1, "_source": {"name": "Order 1"}},
                    {"_id": 2, "_score": 1, "_source": {"name": "Order 2"}}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = search_client(&server.uri()).search_orders("", None).await;
    assert_eq!(result.total, 2);
    assert_eq!(result.hits.len(), 2);
    assert!(result.error.is_none());
    assert!(result.warning.is_none());
}

#[tokio::test]
async fn test_search_match_query_passes_warning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json/search"))
        .and(body_json(json!({
            "index": "orders",
            "query": {"match": {"name": "Order 7"}},
            "limit": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {"total": 0, "hits": []},
            "warning": {"message": "index orders: query too short"}
        })))
        .mount(&server)
        .await;

    let result = search_client(&server.uri())
        .search_orders("Order 7", Some(3))
        .await;
    assert_eq!(result.total, 0);
    assert!(result.error.is_none());
    assert_eq!(
        result.warning,
        Some(json!({"message": "index orders: query too short"}))
    );
}

#[tokio::test]
async fn test_search_upstream_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = search_client(&server.uri()).search_orders("x", None).await;
    assert!(result.hits.is_empty());
    assert_eq!(result.total, 0);
    assert_eq!(
        result.error.as_deref(),
        Some("Search engine returned status code: 500")
    );
}

#[tokio::test]
async fn test_search_undecodable_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = search_client(&server.uri()).search_orders("x", None).await;
    let error = result.error.unwrap();
    assert!(error.starts_with("An unexpected error occurred: "), "{error}");
}

#[tokio::test]
async fn test_search_unreachable_engine() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let result = search_client(&uri).search_orders("x", None).await;
    let error = result.error.unwrap();
    assert!(error.starts_with("Network error: "), "{error}");
}

#[tokio::test]
async fn test_search_endpoint_always_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = Config {
        search: SearchConfig {
            base_url: server.uri(),
            ..SearchConfig::default()
        },
        ..Config::default()
    };
    let state = AppState::with_store(Arc::new(MemoryOrderStore::new()), &config).unwrap();
    let response = create_router(state)
        .oneshot(Request::get("/search?q=tile").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({
            "hits": [],
            "total": 0,
            "error": "Search engine returned status code: 503",
            "warning": null
        })
    );
}

#[tokio::test]
async fn test_price_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cobsa/manual/a/manu7530"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><div class="js-price-tag price" data-price-raw="38.99">38,99 €</div></body></html>"#,
        ))
        .mount(&server)
        .await;

    let fetcher = PriceFetcher::new(&server.uri(), Duration::from_secs(2)).unwrap();
    let quote = fetcher.fetch_price(&price_key()).await.unwrap().unwrap();
    assert_eq!(quote.price, "38.99");
    assert_eq!(quote.article, "manu7530");
}

#[tokio::test]
async fn test_price_missing_and_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cobsa/manual/a/manu7530"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><p>sold out</p></html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cobsa/manual/a/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = Config {
        price_base_url: server.uri(),
        ..Config::default()
    };
    let state = AppState::with_store(Arc::new(MemoryOrderStore::new()), &config).unwrap();
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(
            Request::get("/price?factory=cobsa&collection=manual&article=manu7530")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::get("/price?factory=cobsa&collection=manual&article=gone")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "An internal error occurred");
}
