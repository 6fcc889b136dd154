use std::io::Write;

use catalog_engine::{
    ApiSettings, CatalogApi, FailureKind, ProductListQuery, ProductPayload, ReqwestCatalogApi,
    WebhookPayload,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestCatalogApi {
    catalog_logging::initialize_for_tests();
    ReqwestCatalogApi::new(&ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn upload_sends_multipart_file_and_returns_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload-csv/"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("sku,name,description"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "abc-123"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut csv = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("temp csv");
    writeln!(csv, "sku,name,description").unwrap();
    writeln!(csv, "A-1,Apple,Red").unwrap();

    let receipt = api_for(&server)
        .upload_csv(csv.path())
        .await
        .expect("upload ok");
    assert_eq!(receipt.task_id, "abc-123");
}

#[tokio::test]
async fn upload_of_missing_file_fails_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = api_for(&server)
        .upload_csv(&dir.path().join("absent.csv"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::File);
}

#[tokio::test]
async fn progress_is_read_from_task_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/upload-progress/abc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"progress": 40})))
        .mount(&server)
        .await;

    let report = api_for(&server)
        .upload_progress("abc-123")
        .await
        .expect("progress ok");
    assert_eq!(report.progress, 40);
}

#[tokio::test]
async fn list_sends_paging_and_only_present_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/"))
        .and(query_param("skip", "50"))
        .and(query_param("limit", "50"))
        .and(query_param("filter_name", "desk lamp & co"))
        .and(query_param("filter_active", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 51, "sku": "LAMP-1", "name": "Desk lamp", "description": null, "active": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = api_for(&server)
        .list_products(&ProductListQuery {
            skip: 50,
            limit: 50,
            sku: None,
            name: Some("desk lamp & co".to_string()),
            active: Some("true".to_string()),
        })
        .await
        .expect("list ok");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 51);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(!query.contains("filter_sku"), "unexpected sku filter in {query}");
}

#[tokio::test]
async fn rejected_request_carries_status_and_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "SKU already exists"})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .create_product(&ProductPayload {
            sku: "A-1".to_string(),
            name: "Apple".to_string(),
            description: String::new(),
            active: true,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::HttpStatus {
            status: 400,
            detail: Some("SKU already exists".to_string()),
        }
    );
}

#[tokio::test]
async fn product_writes_send_json_bodies() {
    let server = MockServer::start().await;
    let payload = ProductPayload {
        sku: "MUG-1".to_string(),
        name: "Mug".to_string(),
        description: "Stoneware".to_string(),
        active: false,
    };
    let expected = json!({
        "sku": "MUG-1",
        "name": "Mug",
        "description": "Stoneware",
        "active": false
    });
    Mock::given(method("POST"))
        .and(path("/products/"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/products/7"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    api.create_product(&payload).await.expect("create ok");
    api.update_product(7, &payload).await.expect("update ok");
}

#[tokio::test]
async fn deletes_hit_item_and_collection_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/products/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": 3})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/webhooks/4"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Webhook not found"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    api.delete_product(7).await.expect("single delete ok");
    api.delete_all_products().await.expect("bulk delete ok");
    let err = api.delete_webhook(4).await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::HttpStatus { status: 404, .. }
    ));
}

#[tokio::test]
async fn webhook_crud_and_test_fire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhooks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "url": "https://h.example.com", "event": "product.created", "enabled": true}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhooks/"))
        .and(body_json(json!({
            "url": "https://h.example.com",
            "event": "product.deleted",
            "enabled": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhooks/test/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status_code": 204, "response_time_ms": 12.5})),
        )
        .mount(&server)
        .await;

    let api = api_for(&server);
    let hooks = api.list_webhooks().await.expect("list ok");
    assert_eq!(hooks[0].event, "product.created");

    api.create_webhook(&WebhookPayload {
        url: "https://h.example.com".to_string(),
        event: "product.deleted".to_string(),
        enabled: true,
    })
    .await
    .expect("create ok");

    let result = api.test_webhook(1).await.expect("test ok");
    assert_eq!(result.status_code, 204);
    assert_eq!(result.response_time_ms, 12.5);
}

#[tokio::test]
async fn unexpected_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .list_products(&ProductListQuery {
            limit: 50,
            ..ProductListQuery::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    let api = ReqwestCatalogApi::new(&ApiSettings {
        base_url: "http://127.0.0.1:1".to_string(),
        ..ApiSettings::default()
    })
    .unwrap();
    let err = api.list_webhooks().await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::Network | FailureKind::Timeout
    ));
}
