//! Integration tests for `ShopifyAdminClient`.
//!
//! Each test stands up a `wiremock` server in place of the Admin API so no
//! real network traffic is made.

use std::io::Write as _;

use merch_core::{ProductRecord, ProductStatus, ShopifyCredentials};
use merch_publisher::{PublishError, ShopifyAdminClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "shpat_test_token";

fn credentials() -> ShopifyCredentials {
    ShopifyCredentials {
        shop_domain: "merch-lab.myshopify.com".to_string(),
        access_token: TOKEN.to_string(),
        api_version: "2024-01".to_string(),
    }
}

fn test_client(base_url: &str) -> ShopifyAdminClient {
    ShopifyAdminClient::with_base_url(&credentials(), 5, "merch-test/0.1", base_url)
        .expect("failed to build test ShopifyAdminClient")
}

fn sample_record() -> ProductRecord {
    ProductRecord {
        title: "AI Generated Creative T-Shirt".to_string(),
        description: "Bold shapes".to_string(),
        tags: vec!["ai-generated".to_string(), "creative".to_string()],
        keywords: None,
    }
}

fn created_product_json(id: i64) -> serde_json::Value {
    json!({
        "product": {
            "id": id,
            "title": "AI Generated Creative T-Shirt",
            "status": "draft",
            "variants": [{ "id": 1, "price": "19.99" }]
        }
    })
}

fn write_image() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("temp image");
    file.write_all(b"\x89PNG\r\n\x1a\nfake").unwrap();
    file
}

// ---------------------------------------------------------------------------
// list_products
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_products_returns_summaries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("limit", "5"))
        .and(header("X-Shopify-Access-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                { "id": 1, "title": "Tee", "status": "active" },
                { "id": 2, "title": "Hoodie" }
            ]
        })))
        .mount(&server)
        .await;

    let products = test_client(&server.uri()).list_products(5).await;

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, 1);
    assert_eq!(products[0].status.as_deref(), Some("active"));
    assert!(products[1].status.is_none());
}

#[tokio::test]
async fn list_products_returns_empty_on_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let products = test_client(&server.uri()).list_products(1).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn list_products_returns_empty_on_unreachable_host() {
    // Nothing listens on port 1.
    let products = test_client("http://127.0.0.1:1").list_products(1).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn list_products_returns_empty_on_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    assert!(test_client(&server.uri()).list_products(1).await.is_empty());
}

// ---------------------------------------------------------------------------
// create_product
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_product_sends_draft_with_fixed_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/products.json"))
        .and(header("X-Shopify-Access-Token", TOKEN))
        .and(body_partial_json(json!({
            "product": {
                "title": "AI Generated Creative T-Shirt",
                "body_html": "Bold shapes",
                "vendor": "AI Merch Maker",
                "product_type": "T-Shirt",
                "tags": "ai-generated, creative",
                "status": "draft",
                "variants": [{
                    "option1": "Default Title",
                    "price": "19.99",
                    "compare_at_price": "24.99",
                    "inventory_quantity": 100,
                    "inventory_management": "shopify"
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_product_json(9001)))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .create_product(&sample_record(), None)
        .await
        .expect("create should succeed");

    assert_eq!(result.external_id.as_deref(), Some("9001"));
    assert_eq!(result.status, ProductStatus::Draft);
    assert_eq!(
        result.admin_url.as_deref(),
        Some("https://merch-lab.myshopify.com/admin/products/9001")
    );
}

#[tokio::test]
async fn create_product_without_tags_sends_empty_tag_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/products.json"))
        .and(body_partial_json(json!({ "product": { "tags": "" } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_product_json(5)))
        .expect(1)
        .mount(&server)
        .await;

    let record: ProductRecord =
        serde_json::from_value(json!({ "title": "Plain Tee", "description": "Cotton" })).unwrap();
    let result = test_client(&server.uri())
        .create_product(&record, None)
        .await
        .expect("record without tags should still be created");

    assert_eq!(result.external_id.as_deref(), Some("5"));
}

#[tokio::test]
async fn create_product_sends_record_copy_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/products.json"))
        .and(body_partial_json(json!({
            "product": {
                "title": "Neon Fox Tee",
                "body_html": ""
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_product_json(6)))
        .expect(1)
        .mount(&server)
        .await;

    let record = ProductRecord {
        title: "Neon Fox Tee".to_string(),
        description: String::new(),
        tags: vec!["fox".to_string()],
        keywords: None,
    };
    let result = test_client(&server.uri()).create_product(&record, None).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn create_product_propagates_rejection_with_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/products.json"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(r#"{"errors":{"title":["can't be blank"]}}"#),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .create_product(&sample_record(), None)
        .await
        .unwrap_err();

    match err {
        PublishError::Rejected {
            operation,
            status,
            body,
        } => {
            assert_eq!(operation, "create product");
            assert_eq!(status, 422);
            assert!(body.contains("can't be blank"));
        }
        other => panic!("expected PublishError::Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn create_product_treats_200_as_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_product_json(1)))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .create_product(&sample_record(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PublishError::Rejected { status: 200, .. }));
}

#[tokio::test]
async fn create_product_reports_transport_error_on_unreachable_host() {
    let err = test_client("http://127.0.0.1:1")
        .create_product(&sample_record(), None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, PublishError::Transport(_)),
        "expected Transport, got: {err:?}"
    );
}

#[tokio::test]
async fn create_product_attaches_existing_image_as_base64() {
    let server = MockServer::start().await;
    let image = write_image();

    Mock::given(method("POST"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_product_json(77)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/images.json"))
        .and(header("X-Shopify-Access-Token", TOKEN))
        .and(body_partial_json(json!({
            "image": {
                "product_id": "77",
                "attachment": "iVBORw0KGgpmYWtl",
                "alt": "Mockup for AI Generated Creative T-Shirt"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "image": { "id": 501 } })))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .create_product(&sample_record(), Some(image.path()))
        .await
        .expect("create should succeed");
    assert_eq!(result.external_id.as_deref(), Some("77"));
}

#[tokio::test]
async fn create_product_survives_image_attachment_failure() {
    let server = MockServer::start().await;
    let image = write_image();

    Mock::given(method("POST"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_product_json(88)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/images.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upload failed"))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server.uri())
        .create_product(&sample_record(), Some(image.path()))
        .await
        .expect("image failure must not fail product creation");

    assert_eq!(result.external_id.as_deref(), Some("88"));
    assert_eq!(result.status, ProductStatus::Draft);
}

#[tokio::test]
async fn create_product_skips_upload_when_image_missing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_product_json(3)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/images.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "image": { "id": 1 } })))
        .expect(0)
        .mount(&server)
        .await;

    let missing = dir.path().join("mockup.png");
    let result = test_client(&server.uri())
        .create_product(&sample_record(), Some(&missing))
        .await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

// ---------------------------------------------------------------------------
// attach_image
// ---------------------------------------------------------------------------

#[tokio::test]
async fn attach_image_reports_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = test_client("http://127.0.0.1:1")
        .attach_image("1", &dir.path().join("absent.png"), "alt")
        .await
        .unwrap_err();
    assert!(
        matches!(err, PublishError::Image { .. }),
        "expected Image, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// publish_product
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_product_returns_true_on_200() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/products/9001.json"))
        .and(header("X-Shopify-Access-Token", TOKEN))
        .and(body_partial_json(json!({
            "product": { "id": "9001", "status": "active" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product": { "id": 9001, "title": "Tee", "status": "active" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(test_client(&server.uri()).publish_product("9001").await);
}

#[tokio::test]
async fn publish_product_returns_false_on_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/products/9001.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    assert!(!test_client(&server.uri()).publish_product("9001").await);
}

#[tokio::test]
async fn publish_product_returns_false_on_unreachable_host() {
    assert!(!test_client("http://127.0.0.1:1").publish_product("1").await);
}
