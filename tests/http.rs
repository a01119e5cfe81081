mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use common::{booter, order_registry, order_service, RecordingStore};
use gota_boot::config::AppConfig;
use gota_boot::App;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn router(store: Arc<RecordingStore>) -> Router {
    App::new(booter(store, order_registry(), AppConfig::default()))
        .service(order_service())
        .router()
        .unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn read_returns_data_access_result_unwrapped() {
    let store = Arc::new(RecordingStore::default());
    let (status, body) = send(router(store.clone()), Method::GET, "/api/order/42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "42", "customer": "Ann" }));
    assert_eq!(store.calls(), vec![("read".to_string(), json!("42"))]);
}

#[tokio::test]
async fn create_with_array_goes_to_bulk_create() {
    let store = Arc::new(RecordingStore::default());
    let orders = json!([{ "customer": "A" }, { "customer": "B" }]);
    let (status, body) = send(router(store.clone()), Method::POST, "/api/order", Some(orders.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(2));
    assert_eq!(store.calls(), vec![("create_many".to_string(), orders)]);
}

#[tokio::test]
async fn create_with_object_returns_new_id() {
    let store = Arc::new(RecordingStore::default());
    let (_, body) = send(router(store.clone()), Method::POST, "/api/order", Some(json!({ "customer": "A" }))).await;
    assert_eq!(body, json!("new-id"));
    assert_eq!(store.calls()[0].0, "create");
}

#[tokio::test]
async fn update_and_delete_wrap_the_result() {
    let store = Arc::new(RecordingStore::default());
    let (_, updated) = send(router(store.clone()), Method::PATCH, "/api/order/7", Some(json!({ "customer": "Z" }))).await;
    assert_eq!(updated, json!({ "result": 1 }));
    let (_, deleted) = send(router(store.clone()), Method::DELETE, "/api/order/7", None).await;
    assert_eq!(deleted, json!({ "result": true }));
    assert_eq!(
        store.calls(),
        vec![
            ("update".to_string(), json!(["7", { "customer": "Z" }])),
            ("delete".to_string(), json!("7")),
        ]
    );
}

#[tokio::test]
async fn update_many_passes_query_and_body() {
    let store = Arc::new(RecordingStore::default());
    let (_, body) = send(
        router(store.clone()),
        Method::PATCH,
        "/api/order?customer=Ann",
        Some(json!({ "paid": true })),
    )
    .await;
    assert_eq!(body, json!({ "result": 2 }));
    assert_eq!(
        store.calls(),
        vec![("update_many".to_string(), json!([{ "customer": "Ann" }, { "paid": true }]))]
    );
}

#[tokio::test]
async fn search_folds_regex_values() {
    let store = Arc::new(RecordingStore::with_docs(vec![
        json!({ "id": "1", "customer": "Nguyễn Văn Ánh" }),
        json!({ "id": "2", "customer": "Trần Bình" }),
    ]));
    let (status, body) = send(router(store.clone()), Method::GET, "/api/order?customer=$regex:anh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": "1", "customer": "Nguyễn Văn Ánh" }]));
}

#[tokio::test]
async fn search_flattens_nested_query_keys() {
    let store = Arc::new(RecordingStore::with_docs(vec![
        json!({ "id": "1", "address": { "city": "Hue" } }),
        json!({ "id": "2", "address": { "city": "Hanoi" } }),
    ]));
    let (_, body) = send(router(store.clone()), Method::GET, "/api/order?address%5Bcity%5D=Hue", None).await;
    assert_eq!(body, json!([{ "id": "1", "address": { "city": "Hue" } }]));
    assert_eq!(store.calls(), vec![("search".to_string(), json!(["address.city"]))]);
}

#[tokio::test]
async fn create_child_needs_a_marked_relation() {
    let store = Arc::new(RecordingStore::default());
    let (_, body) = send(router(store.clone()), Method::POST, "/api/order/5", Some(json!({ "sku": "x" }))).await;
    assert_eq!(body, json!({ "result": null }));
    assert!(store.calls().is_empty());

    let (_, body) = send(router(store.clone()), Method::POST, "/api/order/5?lines=$", Some(json!({ "sku": "x" }))).await;
    assert_eq!(body, json!({ "result": 1 }));
    assert_eq!(store.calls(), vec![("create_child".to_string(), json!(["5", "lines", { "sku": "x" }]))]);
}

#[tokio::test]
async fn data_access_errors_map_to_status() {
    let store = Arc::new(RecordingStore::default());
    let (status, body) = send(router(store), Method::GET, "/api/order/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("not_found"));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = router(Arc::new(RecordingStore::default()));
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/order")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_handler_receives_bound_arguments_and_sets_response() {
    let app = router(Arc::new(RecordingStore::default()));
    let req = Request::builder()
        .method(Method::PUT)
        .uri("/api/order/9/tag")
        .header("x-tenant", "acme")
        .body(Body::from(json!({ "tag": "rush" }).to_string()))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(res.headers()["x-tagged"], "yes");
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!(["9", "rush", "acme"]));
}

#[tokio::test]
async fn options_serves_the_url_summary() {
    let (status, body) = send(router(Arc::new(RecordingStore::default())), Method::OPTIONS, "/api/order", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], json!("/api/order"));
    assert_eq!(body["GET"]["responseType"], json!("Array<Order>"));
    assert_eq!(body["POST"]["responseType"], json!("Order"));

    let get_query: Vec<&str> = body["GET"]["requestData"]["query"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(get_query, vec!["id", "customer"]);
    let post_body: Vec<&str> = body["POST"]["requestData"]["body"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(post_body, vec!["customer", "secret"]);

    let schema: Vec<&str> = body["schema"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(schema, vec!["id", "customer", "secret"]);
    assert_eq!(body["schema"][0]["dynamicAccessMode"], json!(["READ"]));
}

#[tokio::test]
async fn options_lists_only_registered_verbs() {
    let (_, body) = send(router(Arc::new(RecordingStore::default())), Method::OPTIONS, "/api/health", None).await;
    assert_eq!(body["GET"]["responseType"], json!("String"));
    assert!(body.get("POST").is_none());
    assert_eq!(body["schema"], json!([]));
}
