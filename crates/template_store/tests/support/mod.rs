//! In-memory stand-in for the key-value gateway.
//!
//! Implements the range, put and deleterange verbs over a sorted map so that
//! store operations can be exercised end to end.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use kv_client::key_codec;
use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Stored entries keyed by raw key bytes; values are kept in wire form so
/// tests can plant values that are not valid base64.
#[derive(Clone, Default)]
pub struct FakeKvGateway {
    entries: Arc<Mutex<BTreeMap<Vec<u8>, String>>>,
}

impl FakeKvGateway {
    /// Starts a mock server answering every `POST` with this gateway.
    pub async fn start() -> (MockServer, Self) {
        let gateway = Self::default();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(gateway.clone())
            .mount(&server)
            .await;
        (server, gateway)
    }

    /// Stores `wire_value` under `key` without encoding it.
    pub fn insert_raw(&self, key: &str, wire_value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.as_bytes().to_vec(), wire_value.to_string());
    }

    /// Returns the wire value stored under `key`.
    pub fn raw_value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key.as_bytes()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn range(&self, body: &Value) -> ResponseTemplate {
        let Some(key) = decoded_field(body, "key") else {
            return bad_request("key is required");
        };
        let range_end = decoded_field(body, "range_end");
        let limit = body["limit"].as_u64().unwrap_or(0) as usize;

        let entries = self.entries.lock().unwrap();
        let matching: Vec<(&Vec<u8>, &String)> = entries
            .iter()
            .filter(|(k, _)| in_range(k, &key, range_end.as_deref()))
            .collect();
        let count = matching.len();
        let returned: Vec<Value> = matching
            .into_iter()
            .take(if limit == 0 { usize::MAX } else { limit })
            .map(|(k, v)| {
                json!({
                    "key": key_codec::encode_bytes(k),
                    "value": v,
                    "mod_revision": "1"
                })
            })
            .collect();

        let mut response = json!({ "header": { "revision": "1" } });
        if count > 0 {
            response["more"] = json!(returned.len() < count);
            response["kvs"] = json!(returned);
            response["count"] = json!(count.to_string());
        }
        ResponseTemplate::new(200).set_body_json(response)
    }

    fn put(&self, body: &Value) -> ResponseTemplate {
        let (Some(key), Some(value)) = (decoded_field(body, "key"), body["value"].as_str()) else {
            return bad_request("key and value are required");
        };
        self.entries.lock().unwrap().insert(key, value.to_string());
        ResponseTemplate::new(200).set_body_json(json!({ "header": { "revision": "2" } }))
    }

    fn delete_range(&self, body: &Value) -> ResponseTemplate {
        let Some(key) = decoded_field(body, "key") else {
            return bad_request("key is required");
        };
        let mut response = json!({ "header": { "revision": "3" } });
        if self.entries.lock().unwrap().remove(&key).is_some() {
            response["deleted"] = json!("1");
        }
        ResponseTemplate::new(200).set_body_json(response)
    }
}

impl Respond for FakeKvGateway {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return bad_request("body is not JSON"),
        };

        match request.url.path() {
            "/v3/kv/range" => self.range(&body),
            "/v3/kv/put" => self.put(&body),
            "/v3/kv/deleterange" => self.delete_range(&body),
            _ => ResponseTemplate::new(404).set_body_string("Not Found"),
        }
    }
}

fn decoded_field(body: &Value, field: &str) -> Option<Vec<u8>> {
    body[field]
        .as_str()
        .and_then(|wire| key_codec::decode_bytes(wire).ok())
}

fn in_range(key: &[u8], start: &[u8], range_end: Option<&[u8]>) -> bool {
    match range_end {
        None => key == start,
        Some([0]) => key >= start,
        Some(end) => key >= start && key < end,
    }
}

fn bad_request(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({ "error": message, "code": 3 }))
}
