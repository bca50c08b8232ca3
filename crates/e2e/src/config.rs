//! Suite configuration
//!
//! Every field has a default matching the reference deployment
//! (`http://localhost:8080`, repository `bedroom`, `admin`/`admin`), so an
//! absent config file runs against a local server unchanged.

use std::path::{Path, PathBuf};
use std::time::Duration;

use docpreview_cmis::CmisConfig;
use serde::{Deserialize, Serialize};

use crate::error::E2eResult;
use crate::playwright::PlaywrightConfig;

/// Complete suite configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub cmis: CmisConfig,
    pub ui: UiConfig,
    pub playwright: PlaywrightConfig,
    pub timeouts: Timeouts,

    /// Where `preview-results.json` is written
    pub output_dir: PathBuf,
}

/// Web UI login settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// SPA entry point, relative to the UI origin
    pub login_path: String,
    pub username: String,
    pub password: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            login_path: "/core/ui/".to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

/// Wait budgets in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Login form submit until the main layout renders
    pub login_ms: u64,
    /// Network idle / active tab pane after navigation and tab switches
    pub settle_ms: u64,
    /// File row in the document listing
    pub row_visible_ms: u64,
    /// The preview tab in the detail view
    pub tab_visible_ms: u64,
    /// The type-specific preview marker
    pub marker_visible_ms: u64,
    /// Setup and teardown of the CMIS fixture
    pub hook_ms: u64,
    /// Minimum age before `--cleanup-stale` treats a suite folder as abandoned.
    /// Must exceed one whole run so a concurrent run keeps its folder.
    pub stale_after_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            login_ms: 30_000,
            settle_ms: 15_000,
            row_visible_ms: 10_000,
            tab_visible_ms: 10_000,
            marker_visible_ms: 30_000,
            hook_ms: 60_000,
            stale_after_ms: 1_800_000,
        }
    }
}

impl Timeouts {
    pub fn hook(&self) -> Duration {
        Duration::from_millis(self.hook_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }
}

impl SuiteConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let mut config: Self = toml::from_str(&content)?;
            if config.output_dir.as_os_str().is_empty() {
                config.output_dir = default_output_dir();
            }
            Ok(config)
        } else {
            Ok(Self::with_defaults())
        }
    }

    pub fn with_defaults() -> Self {
        Self {
            output_dir: default_output_dir(),
            ..Default::default()
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("test-results")
}
