//! CMIS endpoint configuration

use serde::{Deserialize, Serialize};

/// Root folder of the `bedroom` repository in the reference deployment
pub const DEFAULT_ROOT_FOLDER_ID: &str = "e02f784f8360a02cc14d1314c10038ff";

/// Connection settings for a CMIS Browser Binding endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmisConfig {
    /// Server origin, e.g. `http://localhost:8080`
    pub base_url: String,

    /// Repository id appended to the browser binding path
    pub repository_id: String,

    pub username: String,
    pub password: String,

    /// Parent of the test folders. `None` looks it up via repositoryInfo.
    pub root_folder_id: Option<String>,
}

impl Default for CmisConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            repository_id: "bedroom".to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
            root_folder_id: Some(DEFAULT_ROOT_FOLDER_ID.to_string()),
        }
    }
}

impl CmisConfig {
    /// Browser binding URL for the configured repository
    pub fn browser_url(&self) -> String {
        format!(
            "{}/core/browser/{}",
            self.base_url.trim_end_matches('/'),
            self.repository_id
        )
    }
}
