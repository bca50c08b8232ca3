//! Disposable CMIS folder holding the preview sample files
//!
//! Lifecycle: [`PreviewFixture::setup`] creates one uniquely named folder and
//! uploads the three samples, every test reads it, and
//! [`PreviewFixture::teardown`] deletes it. Setup failures are fatal;
//! teardown failures are logged and swallowed.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::CmisClient;
use crate::error::{CmisError, Result};
use crate::samples::{SampleFile, ALL_SAMPLES};

/// Prefix shared by every folder this suite creates
pub const FOLDER_PREFIX: &str = "playwright-preview-test-";

/// The folder created for one suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFolder {
    pub id: String,
    pub name: String,
}

/// Folder name for a given unix timestamp in milliseconds
pub fn folder_name_at(unix_millis: i64) -> String {
    format!("{FOLDER_PREFIX}{unix_millis}")
}

/// Folder name for the current instant
pub fn folder_name_now() -> String {
    folder_name_at(chrono::Utc::now().timestamp_millis())
}

/// Whether `name` is exactly a suite folder name
pub fn is_suite_folder_name(name: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^playwright-preview-test-\d+$").expect("static pattern"))
        .is_match(name)
}

/// Create the suite folder under `parent_id`
pub async fn create_test_folder(client: &CmisClient, parent_id: &str) -> Result<TestFolder> {
    let requested = folder_name_now();
    let object = client.create_folder(parent_id, &requested).await?;

    let folder = TestFolder {
        id: object.id,
        name: if object.name.is_empty() { requested } else { object.name },
    };
    info!("Created test folder: {} ({})", folder.name, folder.id);
    Ok(folder)
}

/// Upload one sample into the folder, returning the document id
pub async fn upload_file(client: &CmisClient, folder_id: &str, file: &SampleFile) -> Result<String> {
    client.create_document(folder_id, file).await
}

/// Delete the folder tree. The status is handed back unchecked.
pub async fn delete_test_folder(client: &CmisClient, folder_id: &str) -> Result<StatusCode> {
    client.delete_tree(folder_id).await
}

impl TestFolder {
    /// Best-effort delete of the folder tree; failures are logged only
    pub async fn remove(&self, client: &CmisClient) {
        info!("Cleaning up test folder: {}", self.id);

        match delete_test_folder(client, &self.id).await {
            Ok(status) if status.is_success() => {}
            Ok(status) => warn!("Failed to cleanup test folder {}: {}", self.id, status),
            Err(e) => warn!("Failed to cleanup test folder {}: {}", self.id, e),
        }
    }
}

/// An uploaded sample and its CMIS object id
#[derive(Debug, Clone, Serialize)]
pub struct UploadedSample {
    pub file: SampleFile,
    pub object_id: String,
}

/// Suite-scoped fixture: the folder and its three documents
#[derive(Debug, Clone, Serialize)]
pub struct PreviewFixture {
    pub folder: TestFolder,
    pub documents: Vec<UploadedSample>,
}

impl PreviewFixture {
    /// Create the folder and upload every sample, one after another.
    ///
    /// If an upload fails after the folder exists, the folder is deleted
    /// before the error is returned.
    pub async fn setup(client: &CmisClient, parent_id: &str) -> Result<Self> {
        info!("Setting up test data...");

        let folder = create_test_folder(client, parent_id).await?;
        match Self::populate(client, folder.clone()).await {
            Ok(fixture) => Ok(fixture),
            Err(e) => {
                folder.remove(client).await;
                Err(e)
            }
        }
    }

    /// Upload every sample into an existing folder. The folder is left in
    /// place on failure; the caller owns its removal.
    pub async fn populate(client: &CmisClient, folder: TestFolder) -> Result<Self> {
        let mut documents = Vec::with_capacity(ALL_SAMPLES.len());
        for file in ALL_SAMPLES.iter() {
            let object_id = upload_file(client, &folder.id, file).await?;
            info!("Uploaded: {}", file.file_name);
            documents.push(UploadedSample { file: *file, object_id });
        }

        info!("Test data setup complete!");
        Ok(Self { folder, documents })
    }

    /// Check the folder holds exactly the sample files
    pub async fn verify(&self, client: &CmisClient) -> Result<()> {
        let mut found: Vec<String> = client
            .children(&self.folder.id)
            .await?
            .into_iter()
            .map(|child| child.name)
            .collect();
        let mut expected: Vec<String> = ALL_SAMPLES.iter().map(|s| s.file_name.to_string()).collect();

        found.sort();
        expected.sort();

        if found != expected {
            return Err(CmisError::UnexpectedContents {
                folder_id: self.folder.id.clone(),
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Best-effort delete of the folder tree
    pub async fn teardown(self, client: &CmisClient) {
        self.folder.remove(client).await;
    }
}

/// Creation time encoded in a suite folder name
pub fn folder_created_at(name: &str) -> Option<i64> {
    if !is_suite_folder_name(name) {
        return None;
    }
    name[FOLDER_PREFIX.len()..].parse().ok()
}

/// Whether `name` is a suite folder created at or before `cutoff_millis`
pub fn is_stale_folder(name: &str, cutoff_millis: i64) -> bool {
    folder_created_at(name).is_some_and(|created| created <= cutoff_millis)
}

/// Delete up to `max` suite folders older than `min_age`. Younger folders
/// may belong to a run still in progress and are left alone.
///
/// Returns how many deletions the server accepted.
pub async fn cleanup_stale_folders(client: &CmisClient, max: usize, min_age: Duration) -> Result<usize> {
    let age_millis = i64::try_from(min_age.as_millis()).unwrap_or(i64::MAX);
    let cutoff = chrono::Utc::now().timestamp_millis().saturating_sub(age_millis);

    let statement = format!(
        "SELECT cmis:objectId, cmis:name FROM cmis:folder WHERE cmis:name LIKE '{FOLDER_PREFIX}%'"
    );
    let stale: Vec<_> = client
        .query(&statement)
        .await?
        .into_iter()
        .filter(|folder| is_stale_folder(&folder.name, cutoff))
        .take(max)
        .collect();

    let mut deleted = 0;
    for folder in stale {
        match delete_test_folder(client, &folder.id).await {
            Ok(status) if status.is_success() => {
                info!("Removed stale folder: {}", folder.name);
                deleted += 1;
            }
            Ok(status) => warn!("Failed to remove stale folder {}: {}", folder.name, status),
            Err(e) => warn!("Failed to remove stale folder {}: {}", folder.name, e),
        }
    }

    Ok(deleted)
}
