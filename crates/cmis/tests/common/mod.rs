//! Shared helpers for tests that stand a wiremock server in for CMIS

#![allow(dead_code)]

use docpreview_cmis::{CmisClient, CmisConfig};
use serde_json::json;
use wiremock::{Match, MockServer, Request, ResponseTemplate};

pub const BROWSER_PATH: &str = "/core/browser/bedroom";
pub const ROOT_ID: &str = "e02f784f8360a02cc14d1314c10038ff";

/// Matches when the raw request body contains `needle`.
///
/// Multipart bodies carry binary uploads, so this compares bytes rather than
/// requiring the body to be valid UTF-8.
pub struct BodyHas(pub &'static str);

impl Match for BodyHas {
    fn matches(&self, request: &Request) -> bool {
        contains(&request.body, self.0.as_bytes())
    }
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

pub fn position(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

pub fn config_for(server: &MockServer) -> CmisConfig {
    CmisConfig {
        base_url: server.uri(),
        ..Default::default()
    }
}

pub fn client_for(server: &MockServer) -> CmisClient {
    CmisClient::new(&config_for(server)).unwrap()
}

/// A create-response envelope
pub fn created(id: &str, name: &str) -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({
        "succinctProperties": {
            "cmis:objectId": id,
            "cmis:name": name,
        }
    }))
}

/// Requests whose body contains `needle`, in arrival order
pub async fn requests_with(server: &MockServer, needle: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| contains(&r.body, needle.as_bytes()))
        .collect()
}
