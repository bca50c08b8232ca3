//! Fixture setup and teardown against a mock CMIS server

mod common;

use std::time::Duration;

use common::*;
use docpreview_cmis::fixture::{
    cleanup_stale_folders, create_test_folder, delete_test_folder, folder_name_at, is_suite_folder_name,
};
use docpreview_cmis::samples::ALL_SAMPLES;
use docpreview_cmis::{CmisClient, CmisConfig, CmisError, PreviewFixture, TestFolder};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_create_folder(server: &MockServer, expect: u64) {
    Mock::given(method("POST"))
        .and(query_param("objectId", ROOT_ID))
        .and(BodyHas("createFolder"))
        .respond_with(created("folder-1", "playwright-preview-test-1700000000000"))
        .expect(expect)
        .mount(server)
        .await;
}

async fn mount_delete_tree(server: &MockServer, status: u16, expect: u64) {
    Mock::given(method("POST"))
        .and(BodyHas("deleteTree"))
        .respond_with(ResponseTemplate::new(status))
        .expect(expect)
        .mount(server)
        .await;
}

fn fixture() -> PreviewFixture {
    PreviewFixture {
        folder: TestFolder {
            id: "folder-1".to_string(),
            name: "playwright-preview-test-1700000000000".to_string(),
        },
        documents: Vec::new(),
    }
}

#[tokio::test]
async fn setup_uploads_three_samples_in_order() {
    let server = MockServer::start().await;
    mount_create_folder(&server, 1).await;
    Mock::given(method("POST"))
        .and(query_param("objectId", "folder-1"))
        .and(BodyHas("createDocument"))
        .respond_with(created("doc", "ignored"))
        .expect(3)
        .mount(&server)
        .await;

    let fixture = PreviewFixture::setup(&client_for(&server), ROOT_ID).await.unwrap();

    assert_eq!(fixture.folder.id, "folder-1");
    assert!(is_suite_folder_name(&fixture.folder.name));
    assert_eq!(fixture.documents.len(), 3);

    let uploads = requests_with(&server, "createDocument").await;
    assert_eq!(uploads.len(), 3);
    for (request, sample) in uploads.iter().zip(ALL_SAMPLES.iter()) {
        assert!(contains(&request.body, sample.file_name.as_bytes()), "{}", sample.file_name);
        assert!(contains(&request.body, sample.mime_type.as_bytes()));
        assert!(contains(&request.body, sample.content));
    }
}

#[tokio::test]
async fn folder_creation_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(BodyHas("createFolder"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_delete_tree(&server, 200, 0).await;

    let err = PreviewFixture::setup(&client_for(&server), ROOT_ID).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(requests_with(&server, "createDocument").await.is_empty());
}

#[tokio::test]
async fn upload_failure_aborts_and_removes_partial_folder() {
    let server = MockServer::start().await;
    mount_create_folder(&server, 1).await;
    Mock::given(method("POST"))
        .and(BodyHas("createDocument"))
        .respond_with(ResponseTemplate::new(409).set_body_string("nameConstraintViolation"))
        .expect(1)
        .mount(&server)
        .await;
    mount_delete_tree(&server, 200, 1).await;

    let err = PreviewFixture::setup(&client_for(&server), ROOT_ID).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    assert!(err.to_string().contains("nameConstraintViolation"));
}

#[tokio::test]
async fn teardown_swallows_error_status() {
    let server = MockServer::start().await;
    mount_delete_tree(&server, 500, 1).await;

    fixture().teardown(&client_for(&server)).await;

    let deletes = requests_with(&server, "deleteTree").await;
    assert!(contains(&deletes[0].body, b"folder-1"));
    assert!(contains(&deletes[0].body, b"allVersions"));
}

#[tokio::test]
async fn teardown_swallows_transport_error() {
    // Nothing listens on port 1
    let client = CmisClient::new(&CmisConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        ..Default::default()
    })
    .unwrap();

    fixture().teardown(&client).await;
}

#[tokio::test]
async fn verify_accepts_exact_contents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("cmisselector", "children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [
                { "object": { "succinctProperties": { "cmis:objectId": "d3", "cmis:name": "画像サンプル.png" } } },
                { "object": { "succinctProperties": { "cmis:objectId": "d1", "cmis:name": "テキストサンプル.txt" } } },
                { "object": { "succinctProperties": { "cmis:objectId": "d2", "cmis:name": "PDFサンプル.pdf" } } }
            ]
        })))
        .mount(&server)
        .await;

    fixture().verify(&client_for(&server)).await.unwrap();
}

#[tokio::test]
async fn verify_rejects_missing_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("cmisselector", "children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [
                { "object": { "succinctProperties": { "cmis:objectId": "d1", "cmis:name": "テキストサンプル.txt" } } }
            ]
        })))
        .mount(&server)
        .await;

    let err = fixture().verify(&client_for(&server)).await.unwrap_err();
    match err {
        CmisError::UnexpectedContents { found, expected, .. } => {
            assert_eq!(found, ["テキストサンプル.txt"]);
            assert_eq!(expected.len(), 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn query_results(folders: &[(&str, String)]) -> ResponseTemplate {
    let results: Vec<_> = folders
        .iter()
        .map(|(id, name)| json!({ "succinctProperties": { "cmis:objectId": id, "cmis:name": name } }))
        .collect();
    ResponseTemplate::new(200).set_body_json(json!({ "results": results }))
}

#[tokio::test]
async fn cleanup_stale_only_touches_old_suite_folders() {
    let server = MockServer::start().await;
    let now = chrono::Utc::now().timestamp_millis();
    let hour = 3_600_000;
    Mock::given(method("GET"))
        .and(query_param("cmisselector", "query"))
        .respond_with(query_results(&[
            ("s1", folder_name_at(now - 3 * hour)),
            ("s2", "playwright-preview-test-backup".to_string()),
            ("s3", folder_name_at(now - 2 * hour)),
            ("s4", folder_name_at(now - 60_000)),
            ("s5", folder_name_at(now - 5 * hour)),
        ]))
        .mount(&server)
        .await;
    mount_delete_tree(&server, 200, 2).await;

    let deleted = cleanup_stale_folders(&client_for(&server), 2, Duration::from_secs(1800))
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let deletes = requests_with(&server, "deleteTree").await;
    assert!(contains(&deletes[0].body, b"s1"));
    assert!(contains(&deletes[1].body, b"s3"));
}

#[tokio::test]
async fn cleanup_stale_leaves_a_live_run_alone() {
    let server = MockServer::start().await;
    let now = chrono::Utc::now().timestamp_millis();
    Mock::given(method("GET"))
        .and(query_param("cmisselector", "query"))
        .respond_with(query_results(&[
            ("live-3", folder_name_at(now - 5_000)),
            ("stale-7", folder_name_at(now - 7_200_000)),
        ]))
        .mount(&server)
        .await;
    mount_delete_tree(&server, 200, 1).await;

    let deleted = cleanup_stale_folders(&client_for(&server), 10, Duration::from_secs(1800))
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let deletes = requests_with(&server, "deleteTree").await;
    assert_eq!(deletes.len(), 1);
    assert!(contains(&deletes[0].body, b"stale-7"));
}

#[tokio::test]
async fn delete_test_folder_returns_status_unchecked() {
    let server = MockServer::start().await;
    mount_delete_tree(&server, 404, 1).await;

    let status = delete_test_folder(&client_for(&server), "folder-1").await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);

    let deletes = requests_with(&server, "deleteTree").await;
    assert!(contains(&deletes[0].body, b"folder-1"));
}

#[tokio::test]
async fn created_folder_keeps_requested_name_when_server_omits_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(BodyHas("createFolder"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "succinctProperties": { "cmis:objectId": "folder-9" }
        })))
        .mount(&server)
        .await;

    let folder = create_test_folder(&client_for(&server), ROOT_ID).await.unwrap();
    assert_eq!(folder.id, "folder-9");
    assert!(is_suite_folder_name(&folder.name), "{}", folder.name);

    let creates = requests_with(&server, "createFolder").await;
    assert!(contains(&creates[0].body, folder.name.as_bytes()));
}
