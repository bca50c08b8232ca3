//! Suite runner: fixture setup, independent preview cases, teardown

use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use docpreview_cmis::fixture::create_test_folder;
use docpreview_cmis::{CmisClient, PreviewFixture, TestFolder};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::browser::{login_steps, open_preview_steps};
use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};
use crate::playwright::{PageStep, PlaywrightHandle};
use crate::preview::PreviewCase;

/// State shared read-only by every case of one run
#[derive(Debug, Clone)]
pub struct SuiteContext {
    pub fixture: PreviewFixture,
}

impl SuiteContext {
    pub fn folder_id(&self) -> &str {
        &self.fixture.folder.id
    }
}

/// Outcome of one case as reported by a driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub success: bool,
    pub failed_step: Option<String>,
    pub error: Option<String>,
    pub screenshot: Option<PathBuf>,
}

impl CaseOutcome {
    pub fn passed() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }
}

/// Opens a case's preview in a fresh browser context and checks its marker
#[async_trait]
pub trait PreviewDriver: Send + Sync {
    async fn check_preview(&self, ctx: &SuiteContext, case: &PreviewCase) -> E2eResult<CaseOutcome>;
}

/// Every step of one case: login, open the preview tab, assert the marker
pub fn case_steps(config: &SuiteConfig, folder_id: &str, case: &PreviewCase) -> Vec<PageStep> {
    let ui = &config.ui;
    let timeouts = &config.timeouts;

    let mut steps = login_steps(ui, timeouts);
    steps.extend(open_preview_steps(ui, timeouts, folder_id, case.file.file_name));
    steps.push(case.assertion(timeouts.marker_visible_ms));
    steps
}

/// Production driver backed by a Playwright script per case
pub struct PlaywrightDriver {
    handle: PlaywrightHandle,
    config: SuiteConfig,
}

impl PlaywrightDriver {
    pub fn new(config: SuiteConfig) -> E2eResult<Self> {
        let handle = PlaywrightHandle::new(config.playwright.clone())?;
        Ok(Self { handle, config })
    }
}

#[async_trait]
impl PreviewDriver for PlaywrightDriver {
    async fn check_preview(&self, ctx: &SuiteContext, case: &PreviewCase) -> E2eResult<CaseOutcome> {
        let steps = case_steps(&self.config, ctx.folder_id(), case);
        let outcome = self.handle.run_steps(&case.name(), &steps).await?;
        Ok(CaseOutcome {
            success: outcome.success,
            failed_step: outcome.step,
            error: outcome.error,
            screenshot: outcome.screenshot,
        })
    }
}

/// Result of running a single case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub file_name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub failed_step: Option<String>,
    pub error: Option<String>,
    pub screenshot: Option<PathBuf>,
}

/// Result of running the suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub folder_name: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

/// Main preview suite runner
pub struct TestRunner<D> {
    client: CmisClient,
    driver: D,
    config: SuiteConfig,
    cases: Vec<PreviewCase>,
    verify_fixture: bool,
}

impl<D: PreviewDriver> TestRunner<D> {
    pub fn new(client: CmisClient, driver: D, config: SuiteConfig) -> Self {
        Self {
            client,
            driver,
            config,
            cases: PreviewCase::all(),
            verify_fixture: true,
        }
    }

    /// Restrict the run to the given cases
    pub fn with_cases(mut self, cases: Vec<PreviewCase>) -> Self {
        self.cases = cases;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Skip the post-setup folder listing check
    pub fn skip_fixture_check(mut self) -> Self {
        self.verify_fixture = false;
        self
    }

    /// Parent folder for the fixture, looked up when not configured
    async fn parent_folder_id(&self) -> E2eResult<String> {
        match &self.config.cmis.root_folder_id {
            Some(id) => Ok(id.clone()),
            None => self.client.root_folder_id().await.map_err(E2eError::Setup),
        }
    }

    /// Create the fixture within the hook timeout. Any failure is fatal.
    ///
    /// Folder creation and the uploads share one deadline but run as separate
    /// phases, so the folder id survives an upload timeout and the folder is
    /// removed on every failure after it exists.
    async fn setup(&self) -> E2eResult<SuiteContext> {
        let limit = self.config.timeouts.hook();
        let deadline = tokio::time::Instant::now() + limit;
        let timed_out = || E2eError::Timeout(format!("test data setup after {} ms", limit.as_millis()));

        info!("Setting up test data...");

        let folder = tokio::time::timeout_at(deadline, async {
            let parent = self.parent_folder_id().await?;
            create_test_folder(&self.client, &parent).await.map_err(E2eError::Setup)
        })
        .await
        .map_err(|_| timed_out())??;

        let populated = tokio::time::timeout_at(deadline, PreviewFixture::populate(&self.client, folder.clone())).await;
        let fixture = match populated {
            Ok(Ok(fixture)) => fixture,
            Ok(Err(e)) => {
                self.remove_folder(&folder).await;
                return Err(E2eError::Setup(e));
            }
            Err(_) => {
                self.remove_folder(&folder).await;
                return Err(timed_out());
            }
        };

        if self.verify_fixture {
            if let Err(e) = fixture.verify(&self.client).await {
                self.remove_folder(&fixture.folder).await;
                return Err(E2eError::Setup(e));
            }
        }

        Ok(SuiteContext { fixture })
    }

    /// Best-effort delete under its own hook timeout; never fails the run
    async fn remove_folder(&self, folder: &TestFolder) {
        let limit = self.config.timeouts.hook();
        if tokio::time::timeout(limit, folder.remove(&self.client)).await.is_err() {
            warn!("Failed to cleanup test folder {}: timed out after {} ms", folder.id, limit.as_millis());
        }
    }

    async fn teardown(&self, ctx: SuiteContext) {
        let limit = self.config.timeouts.hook();
        let folder_id = ctx.folder_id().to_string();
        if tokio::time::timeout(limit, ctx.fixture.teardown(&self.client)).await.is_err() {
            warn!("Failed to cleanup test folder {}: timed out after {} ms", folder_id, limit.as_millis());
        }
    }

    /// Run one case, turning driver errors into a failed result
    async fn run_case(&self, ctx: &SuiteContext, case: &PreviewCase) -> TestResult {
        let start = Instant::now();
        debug!("Running test: {}", case.name());

        let outcome = match self.driver.check_preview(ctx, case).await {
            Ok(outcome) => outcome,
            Err(e) => CaseOutcome {
                success: false,
                error: Some(e.to_string()),
                ..Default::default()
            },
        };

        TestResult {
            name: case.name(),
            file_name: case.file.file_name.to_string(),
            success: outcome.success,
            duration_ms: start.elapsed().as_millis() as u64,
            failed_step: outcome.failed_step,
            error: outcome.error,
            screenshot: outcome.screenshot,
        }
    }

    /// Setup, every case, teardown.
    ///
    /// Setup errors abort the run before any case executes. Case failures are
    /// recorded and do not stop later cases. Teardown always runs once setup
    /// has produced a folder.
    pub async fn run(&self) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();

        let ctx = self.setup().await?;

        info!("Running {} test(s)...", self.cases.len());

        let mut results = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            let result = self.run_case(&ctx, case).await;
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let folder_name = ctx.fixture.folder.name.clone();
        self.teardown(ctx).await;

        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!("Test Results: {} passed, {} failed ({} ms)", passed, failed, duration_ms);

        Ok(TestSuiteResult {
            folder_name,
            total: results.len(),
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    /// Write suite results to JSON
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("preview-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}
