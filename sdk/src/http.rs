//! Request description and the response envelope.
//!
//! # Design
//! A [`Request`] is plain data: method, path, query pairs, optional JSON
//! body. It is built fresh for every call and never reused, which keeps the
//! endpoint wrappers trivially testable without touching the network. The
//! envelope is generic over its `data` payload so each call site names its
//! own decode target and no runtime type assertions are needed.

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::page::PageMeta;

/// An outgoing API call described as plain data.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Path relative to the configured base URL, identifiers resolved.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The outer JSON object wrapping every API response.
///
/// `data` is polymorphic on the wire; each service method supplies the
/// concrete `T` it expects. All fields except `status` are optional — a
/// missing `meta` block is not an error.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    pub message: Option<String>,
    pub data: Option<T>,
    pub meta: Option<PageMeta>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_fields() {
        let req = Request::new(Method::GET, "/api/v1/servers")
            .with_query(vec![("page".to_string(), "2".to_string())])
            .with_body(serde_json::json!({"hostname": "web-1"}));
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "/api/v1/servers");
        assert_eq!(req.query.len(), 1);
        assert!(req.body.is_some());
    }

    #[test]
    fn envelope_decodes_full_shape() {
        let raw = r#"{
            "status": "success",
            "message": "ok",
            "data": {"value": 1},
            "meta": {"page": 1, "limit": 10, "total_items": 1, "total_pages": 1}
        }"#;
        let envelope: Envelope<Value> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.status, "success");
        assert_eq!(envelope.message.as_deref(), Some("ok"));
        assert_eq!(envelope.data.unwrap()["value"], 1);
        assert_eq!(envelope.meta.unwrap().total_items, 1);
    }

    #[test]
    fn envelope_decodes_payload_without_default_impl() {
        // The generic decode step must not demand Default from the payload
        // type; each call site only supplies Deserialize.
        #[derive(Debug, Deserialize, PartialEq)]
        struct Payload {
            value: u32,
        }

        let raw = r#"{"status":"success","data":{"value":7}}"#;
        let envelope: Envelope<Payload> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.data, Some(Payload { value: 7 }));

        let empty: Envelope<Payload> = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(empty.data.is_none());
    }

    #[test]
    fn envelope_tolerates_missing_optional_fields() {
        let envelope: Envelope<Value> = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(envelope.message.is_none());
        assert!(envelope.data.is_none());
        assert!(envelope.meta.is_none());
    }

    #[test]
    fn envelope_rejects_mismatched_data_shape() {
        // data is an object, decode target expects a list.
        let raw = r#"{"status":"success","data":{"id":1}}"#;
        let result: std::result::Result<Envelope<Vec<Value>>, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }
}
