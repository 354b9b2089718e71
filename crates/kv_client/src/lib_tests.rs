//! Unit tests for the kv_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A URL on a local port that was bound and released, so nothing listens on it.
fn unreachable_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{address}")).unwrap()
}

fn client_for(mock_server: &MockServer) -> KvClient {
    let base_url = Url::parse(&mock_server.uri()).unwrap();
    KvClient::with_timeout(base_url, Some(Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn test_range_prefix_scan_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/kv/range"))
        .and(body_json(json!({
            "key": "L3BsdWdpbl90ZW1wbGF0ZXMv",
            "range_end": "L3BsdWdpbl90ZW1wbGF0ZXMw",
            "limit": 1000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "header": { "revision": "7" },
            "kvs": [
                { "key": "L3BsdWdpbl90ZW1wbGF0ZXMvdDE=", "value": "e30=", "mod_revision": "7" }
            ],
            "count": "1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let range = KeyRange::prefix("/plugin_templates/", RangeEndStrategy::Successor);

    let response = client
        .range(&RangeRequest::range(&range, 1000))
        .await
        .unwrap();

    assert_eq!(response.kvs.len(), 1);
    assert_eq!(key_codec::decode(&response.kvs[0].value).unwrap(), "{}");
}

#[tokio::test]
async fn test_range_non_success_status_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/kv/range"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string("{\"error\":\"etcdserver: no leader\"}"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.range(&RangeRequest::single("/plugin_templates/t1")).await;

    match result {
        Err(Error::BackendStatus { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("no leader"));
        }
        other => panic!("Expected BackendStatus error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_range_malformed_body_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/kv/range"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.range(&RangeRequest::single("k")).await;

    let error = result.unwrap_err();
    assert!(matches!(error, Error::Deserialization(_)));
    assert!(error.backend_responded());
}

#[tokio::test]
async fn test_put_sends_encoded_key_and_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/kv/put"))
        .and(body_json(json!({
            "key": "L3BsdWdpbl90ZW1wbGF0ZXMvdDE=",
            "value": "w7w="
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "header": {} })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .put(&PutRequest::new("/plugin_templates/t1", "ü"))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_put_ignores_unreadable_acknowledgement() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/kv/put"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    assert!(client.put(&PutRequest::new("k", "v")).await.is_ok());
}

#[tokio::test]
async fn test_delete_range_reports_deleted_count() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/kv/deleterange"))
        .and(body_json(json!({ "key": "L3BsdWdpbl90ZW1wbGF0ZXMvdDE=" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "header": {}, "deleted": "1" })),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .delete_range(&DeleteRangeRequest::single("/plugin_templates/t1"))
        .await
        .unwrap();

    assert_eq!(response.deleted_count(), 1);
}

#[tokio::test]
async fn test_base_url_path_is_preserved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/etcd/v3/kv/range"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base_url = Url::parse(&format!("{}/etcd", mock_server.uri())).unwrap();
    let client = KvClient::with_timeout(base_url, None).unwrap();

    assert_eq!(client.base_url().path(), "/etcd/");
    let response = client.range(&RangeRequest::single("k")).await.unwrap();
    assert!(response.kvs.is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let base_url = unreachable_url();

    let client = KvClient::with_timeout(base_url, Some(Duration::from_secs(2))).unwrap();
    let result = client.range(&RangeRequest::single("k")).await;

    let error = result.unwrap_err();
    assert!(matches!(error, Error::Transport(_)));
    assert!(!error.backend_responded());
}
