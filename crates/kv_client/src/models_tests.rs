use super::*;
use crate::range_bound::RangeEndStrategy;
use serde_json::json;

#[test]
fn test_single_range_request_omits_range_end_and_limit() {
    let request = RangeRequest::single("/plugin_templates/t1");

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({ "key": "L3BsdWdpbl90ZW1wbGF0ZXMvdDE=" })
    );
}

#[test]
fn test_prefix_range_request_serialization() {
    let range = KeyRange::prefix("/plugin_templates/", RangeEndStrategy::Successor);
    let request = RangeRequest::range(&range, 1000);

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "key": "L3BsdWdpbl90ZW1wbGF0ZXMv",
            "range_end": "L3BsdWdpbl90ZW1wbGF0ZXMw",
            "limit": 1000
        })
    );
}

#[test]
fn test_with_limit_sets_limit() {
    let request = RangeRequest::single("k").with_limit(1);

    assert_eq!(request.limit, Some(1));
    assert_eq!(request.range_end, None);
}

#[test]
fn test_put_request_encodes_key_and_value() {
    let request = PutRequest::new("/plugin_templates/t1", "ü");

    assert_eq!(request.key, "L3BsdWdpbl90ZW1wbGF0ZXMvdDE=");
    assert_eq!(request.value, "w7w=");
}

#[test]
fn test_range_response_with_gateway_string_numbers() {
    let body = json!({
        "header": {
            "cluster_id": "14841639068965178418",
            "member_id": "10276657743932975437",
            "revision": "12",
            "raft_term": "3"
        },
        "kvs": [{
            "key": "L3BsdWdpbl90ZW1wbGF0ZXMvdDE=",
            "create_revision": "5",
            "mod_revision": "11",
            "version": "3",
            "value": "e30="
        }],
        "count": "1"
    });

    let response: RangeResponse = serde_json::from_value(body).unwrap();

    assert_eq!(response.kvs.len(), 1);
    assert_eq!(response.total_count(), 1);
    assert!(!response.more);
    assert_eq!(response.kvs[0].value, "e30=");
    assert_eq!(response.kvs[0].mod_revision.as_deref(), Some("11"));
    assert_eq!(response.kvs[0].decoded_key().unwrap(), "/plugin_templates/t1");
}

#[test]
fn test_empty_range_response_omits_kvs() {
    let body = json!({ "header": { "revision": "12" } });

    let response: RangeResponse = serde_json::from_value(body).unwrap();

    assert!(response.kvs.is_empty());
    assert_eq!(response.total_count(), 0);
}

#[test]
fn test_delete_range_response_counts() {
    let deleted: DeleteRangeResponse =
        serde_json::from_value(json!({ "header": {}, "deleted": "1" })).unwrap();
    let nothing: DeleteRangeResponse = serde_json::from_value(json!({ "header": {} })).unwrap();

    assert_eq!(deleted.deleted_count(), 1);
    assert_eq!(nothing.deleted_count(), 0);
}
