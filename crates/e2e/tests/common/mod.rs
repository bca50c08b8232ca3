//! Mock CMIS server and fake browser driver for runner tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use docpreview_cmis::{CmisClient, CmisConfig};
use docpreview_e2e::runner::CaseOutcome;
use docpreview_e2e::{E2eError, E2eResult, PreviewCase, PreviewDriver, PreviewKind, SuiteConfig, SuiteContext};
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

pub const ROOT_ID: &str = "e02f784f8360a02cc14d1314c10038ff";
pub const FOLDER_ID: &str = "folder-1";

/// Matches when the raw request body contains the needle
pub struct BodyHas(pub &'static str);

impl Match for BodyHas {
    fn matches(&self, request: &Request) -> bool {
        body_has(request, self.0)
    }
}

pub fn body_has(request: &Request, needle: &str) -> bool {
    let needle = needle.as_bytes();
    request.body.windows(needle.len()).any(|w| w == needle)
}

/// Requests whose body contains `needle`, in arrival order
pub async fn requests_with(server: &MockServer, needle: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| body_has(r, needle))
        .collect()
}

pub fn suite_config(server: &MockServer) -> SuiteConfig {
    let mut config = SuiteConfig::with_defaults();
    config.cmis = CmisConfig {
        base_url: server.uri(),
        ..Default::default()
    };
    config
}

pub fn client(config: &SuiteConfig) -> CmisClient {
    CmisClient::new(&config.cmis).unwrap()
}

pub async fn mount_create_folder(server: &MockServer) {
    Mock::given(method("POST"))
        .and(query_param("objectId", ROOT_ID))
        .and(BodyHas("createFolder"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "succinctProperties": {
                "cmis:objectId": FOLDER_ID,
                "cmis:name": "playwright-preview-test-1700000000000"
            }
        })))
        .mount(server)
        .await;
}

pub async fn mount_uploads(server: &MockServer) {
    Mock::given(method("POST"))
        .and(query_param("objectId", FOLDER_ID))
        .and(BodyHas("createDocument"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "succinctProperties": { "cmis:objectId": "doc", "cmis:name": "doc" }
        })))
        .expect(3)
        .mount(server)
        .await;
}

pub async fn mount_children(server: &MockServer, names: &[&str]) {
    let objects: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({ "object": { "succinctProperties": { "cmis:objectId": format!("d{i}"), "cmis:name": name } } })
        })
        .collect();

    Mock::given(method("GET"))
        .and(query_param("cmisselector", "children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "objects": objects })))
        .mount(server)
        .await;
}

pub async fn mount_delete_tree(server: &MockServer, status: u16, expect: u64) {
    Mock::given(method("POST"))
        .and(BodyHas("deleteTree"))
        .respond_with(ResponseTemplate::new(status))
        .expect(expect)
        .mount(server)
        .await;
}

/// Folder creation, three uploads and a listing that matches the samples
pub async fn mount_healthy_setup(server: &MockServer) {
    mount_create_folder(server).await;
    mount_uploads(server).await;
    mount_children(server, &["テキストサンプル.txt", "PDFサンプル.pdf", "画像サンプル.png"]).await;
}

/// Driver that fails or errors chosen kinds and records every call
#[derive(Default)]
pub struct FakeDriver {
    pub fail: HashSet<PreviewKind>,
    pub error: HashSet<PreviewKind>,
    pub calls: Mutex<Vec<(String, PreviewKind)>>,
}

impl FakeDriver {
    pub fn failing(kinds: &[PreviewKind]) -> Self {
        Self {
            fail: kinds.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn erroring(kinds: &[PreviewKind]) -> Self {
        Self {
            error: kinds.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, PreviewKind)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PreviewDriver for FakeDriver {
    async fn check_preview(&self, ctx: &SuiteContext, case: &PreviewCase) -> E2eResult<CaseOutcome> {
        self.calls
            .lock()
            .unwrap()
            .push((ctx.folder_id().to_string(), case.kind));

        if self.error.contains(&case.kind) {
            return Err(E2eError::Timeout(format!("{} after 1000 ms", case.name())));
        }
        if self.fail.contains(&case.kind) {
            return Ok(CaseOutcome {
                success: false,
                failed_step: Some("visible:marker".to_string()),
                error: Some("Timed out 30000ms waiting for expect(locator).toBeVisible()".to_string()),
                screenshot: None,
            });
        }
        Ok(CaseOutcome::passed())
    }
}
