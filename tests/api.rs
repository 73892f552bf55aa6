//! Endpoint tests running the router in-process against the in-memory store.
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use coffee_shop::{
    app,
    config::Config,
    database::{FakeMenuStore, MenuStore},
    menu::{MenuItem, sample_menu, seed_if_empty},
    state::AppState,
};

fn test_app(store: Arc<FakeMenuStore>) -> Router {
    let config = Config {
        port: 0,
        mongodb_uri: String::new(),
    };
    app(AppState::with_store(config, store))
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();

    (status, body)
}

fn item(name: &str, category: &str, price: f64, in_stock: bool) -> MenuItem {
    MenuItem::new(name, category, price, in_stock).unwrap()
}

#[tokio::test]
async fn root_returns_banner() {
    let router = test_app(Arc::new(FakeMenuStore::default()));

    let (status, body) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Coffee Shop API");
}

#[tokio::test]
async fn menu_is_sorted_by_category_then_name() {
    let store = Arc::new(FakeMenuStore::default());
    store
        .insert_many(vec![
            item("Mocha", "Hot Drinks", 950.0, true),
            item("Donut", "Pastries", 350.0, true),
            item("Cold Brew", "Cold Drinks", 850.0, true),
            item("Americano", "Hot Drinks", 600.0, true),
            item("Croissant", "Pastries", 700.5, false),
        ])
        .await
        .unwrap();
    let router = test_app(store);

    let (status, body) = get(&router, "/menu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["Cold Brew", "Americano", "Mocha", "Croissant", "Donut"]
    );
}

#[tokio::test]
async fn menu_count_matches_data_length() {
    let store = Arc::new(FakeMenuStore::default());
    seed_if_empty(store.as_ref()).await.unwrap();
    let router = test_app(store);

    let (status, body) = get(&router, "/menu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["count"].as_u64().unwrap() as usize,
        body["data"].as_array().unwrap().len()
    );
}

#[tokio::test]
async fn seeded_menu_lists_cold_drinks_first() {
    let store = Arc::new(FakeMenuStore::default());
    seed_if_empty(store.as_ref()).await.unwrap();
    let router = test_app(store);

    let (status, body) = get(&router, "/menu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 14);
    assert_eq!(body["data"][0]["category"], "Cold Drinks");
}

#[tokio::test]
async fn menu_item_json_shape() {
    let store = Arc::new(FakeMenuStore::default());
    store
        .insert_many(vec![item("Latte", "Hot Drinks", 900.0, true)])
        .await
        .unwrap();
    let router = test_app(store);

    let (_, body) = get(&router, "/menu").await;
    let first = &body["data"][0];

    assert_eq!(first["_id"].as_str().unwrap().len(), 24);
    assert_eq!(first["name"], "Latte");
    assert_eq!(first["category"], "Hot Drinks");
    assert_eq!(first["price"], 900.0);
    assert_eq!(first["inStock"], true);
    assert!(first["createdAt"].is_string());
    assert!(first["updatedAt"].is_string());
}

#[tokio::test]
async fn random_only_returns_in_stock_items() {
    let store = Arc::new(FakeMenuStore::default());
    store
        .insert_many(vec![
            item("Muffin", "Pastries", 400.0, false),
            item("Donut", "Pastries", 350.0, true),
            item("Scone", "Pastries", 450.0, false),
        ])
        .await
        .unwrap();
    let router = test_app(store);

    for _ in 0..10 {
        let (status, body) = get(&router, "/menu/random").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Donut");
    }
}

#[tokio::test]
async fn random_never_returns_excluded_id() {
    let store = Arc::new(FakeMenuStore::default());
    seed_if_empty(store.as_ref()).await.unwrap();
    let router = test_app(store);

    let (_, menu) = get(&router, "/menu").await;
    let excluded = menu["data"][0]["_id"].as_str().unwrap().to_string();

    for _ in 0..30 {
        let (status, body) = get(&router, &format!("/menu/random?exclude={excluded}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(body["data"]["_id"].as_str().unwrap(), excluded);
    }
}

#[tokio::test]
async fn random_excluding_sole_in_stock_item_is_404() {
    let store = Arc::new(FakeMenuStore::default());
    store
        .insert_many(vec![
            item("Espresso", "Hot Drinks", 800.5, true),
            item("Muffin", "Pastries", 400.0, false),
        ])
        .await
        .unwrap();
    let router = test_app(store.clone());

    let (_, body) = get(&router, "/menu/random").await;
    let only_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = get(&router, &format!("/menu/random?exclude={only_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No in-stock items available");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn random_with_nothing_in_stock_is_404() {
    let store = Arc::new(FakeMenuStore::default());
    let sold_out = sample_menu()
        .unwrap()
        .into_iter()
        .map(|mut item| {
            item.in_stock = false;
            item
        })
        .collect();
    store.insert_many(sold_out).await.unwrap();
    let router = test_app(store);

    let (status, body) = get(&router, "/menu/random").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No in-stock items available");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn random_ignores_unparsable_exclude() {
    let store = Arc::new(FakeMenuStore::default());
    store
        .insert_many(vec![item("Espresso", "Hot Drinks", 800.5, true)])
        .await
        .unwrap();
    let router = test_app(store);

    let (status, body) = get(&router, "/menu/random?exclude=not-an-object-id").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Espresso");
}

#[tokio::test]
async fn menu_reports_500_when_store_fails() {
    let store = Arc::new(FakeMenuStore::default());
    seed_if_empty(store.as_ref()).await.unwrap();
    store.set_failing(true);
    let router = test_app(store);

    let (status, body) = get(&router, "/menu").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to fetch menu items");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn random_reports_500_when_store_fails() {
    let store = Arc::new(FakeMenuStore::default());
    seed_if_empty(store.as_ref()).await.unwrap();
    store.set_failing(true);
    let router = test_app(store);

    let (status, body) = get(&router, "/menu/random").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to fetch random item");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn empty_menu_lists_zero_items() {
    let router = test_app(Arc::new(FakeMenuStore::default()));

    let (status, body) = get(&router, "/menu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
