//! Playwright browser automation
//!
//! Steps are rendered into a standalone Node script that drives one fresh
//! browser context, then run with `node`. The script reports its result as a
//! single JSON line on stdout.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::process::Command as TokioCommand;
use tracing::{debug, warn};

use crate::error::{E2eError, E2eResult};

/// Encode a Rust string as a JavaScript string literal
pub(crate) fn js(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(format!("unknown browser: {other}")),
        }
    }
}

/// A Playwright locator expression rooted at `page`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    expr: String,
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Self {
            expr: format!("page.locator({})", js(selector)),
        }
    }

    pub fn placeholder(text: &str) -> Self {
        Self {
            expr: format!("page.getByPlaceholder({})", js(text)),
        }
    }

    pub fn button(name: &str) -> Self {
        Self {
            expr: format!("page.getByRole('button', {{ name: {} }})", js(name)),
        }
    }

    /// Descendants of this locator matching `selector`
    pub fn child(self, selector: &str) -> Self {
        Self {
            expr: format!("{}.locator({})", self.expr, js(selector)),
        }
    }

    /// Keep matches whose text contains `text`
    pub fn has_text(self, text: &str) -> Self {
        Self {
            expr: format!("{}.filter({{ hasText: {} }})", self.expr, js(text)),
        }
    }

    /// Keep matches containing an element matching `selector`
    pub fn has(self, selector: &str) -> Self {
        Self {
            expr: format!("{}.filter({{ has: page.locator({}) }})", self.expr, js(selector)),
        }
    }

    pub fn first(self) -> Self {
        Self {
            expr: format!("{}.first()", self.expr),
        }
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }
}

/// One browser action or assertion
#[derive(Debug, Clone)]
pub enum PageStep {
    /// Navigate to a URL relative to the UI base
    Goto { url: String },

    Fill { target: Locator, value: String },

    Click { target: Locator, timeout_ms: u64 },

    /// No network connections for at least 500 ms
    WaitForNetworkIdle { timeout_ms: u64 },

    /// Fails once `timeout_ms` elapses without the target becoming visible
    ExpectVisible { target: Locator, timeout_ms: u64 },

    ExpectHidden { target: Locator, timeout_ms: u64 },

    Log { message: String },
}

/// Budget for steps that carry no explicit timeout (Playwright's default)
const DEFAULT_ACTION_TIMEOUT_MS: u64 = 30_000;

impl PageStep {
    /// Short label used in logs and failure reports
    pub fn name(&self) -> String {
        match self {
            PageStep::Goto { url } => format!("goto:{}", url),
            PageStep::Fill { target, .. } => format!("fill:{}", target.expr()),
            PageStep::Click { target, .. } => format!("click:{}", target.expr()),
            PageStep::WaitForNetworkIdle { .. } => "wait:networkidle".to_string(),
            PageStep::ExpectVisible { target, .. } => format!("visible:{}", target.expr()),
            PageStep::ExpectHidden { target, .. } => format!("hidden:{}", target.expr()),
            PageStep::Log { message } => format!("log:{}", message.chars().take(30).collect::<String>()),
        }
    }

    /// Upper bound this step may take
    pub fn timeout_ms(&self) -> u64 {
        match self {
            PageStep::Click { timeout_ms, .. }
            | PageStep::WaitForNetworkIdle { timeout_ms }
            | PageStep::ExpectVisible { timeout_ms, .. }
            | PageStep::ExpectHidden { timeout_ms, .. } => *timeout_ms,
            PageStep::Goto { .. } | PageStep::Fill { .. } => DEFAULT_ACTION_TIMEOUT_MS,
            PageStep::Log { .. } => 0,
        }
    }

    fn to_js(&self) -> String {
        match self {
            PageStep::Goto { url } => {
                format!("    await page.goto(baseUrl + {});", js(url))
            }
            PageStep::Fill { target, value } => {
                format!("    await {}.fill({});", target.expr(), js(value))
            }
            PageStep::Click { target, timeout_ms } => {
                format!("    await {}.click({{ timeout: {} }});", target.expr(), timeout_ms)
            }
            PageStep::WaitForNetworkIdle { timeout_ms } => {
                format!("    await page.waitForLoadState('networkidle', {{ timeout: {} }});", timeout_ms)
            }
            PageStep::ExpectVisible { target, timeout_ms } => {
                format!(
                    "    await expect({}).toBeVisible({{ timeout: {} }});",
                    target.expr(),
                    timeout_ms
                )
            }
            PageStep::ExpectHidden { target, timeout_ms } => {
                format!(
                    "    await expect({}).toBeHidden({{ timeout: {} }});",
                    target.expr(),
                    timeout_ms
                )
            }
            PageStep::Log { message } => {
                format!("    console.error('[TEST] ' + {});", js(message))
            }
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaywrightConfig {
    /// UI origin, e.g. `http://localhost:8080`
    pub base_url: String,
    pub screenshot_dir: PathBuf,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub browser: Browser,
    pub headless: bool,
    /// Exposed to node as `NODE_PATH` so the script resolves `playwright`
    pub node_modules: Option<PathBuf>,
    /// Allowance for browser launch and close on top of the step budgets
    pub launch_timeout_ms: u64,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            viewport_width: 1280,
            viewport_height: 720,
            browser: Browser::Chromium,
            headless: true,
            node_modules: Some(PathBuf::from("node_modules")),
            launch_timeout_ms: 30_000,
        }
    }
}

/// Final status line printed by the script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptOutcome {
    pub success: bool,
    #[serde(default)]
    pub step: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub screenshot: Option<PathBuf>,
}

/// Render the Node script for one case
pub fn render_script(config: &PlaywrightConfig, screenshot_path: &Path, steps: &[PageStep]) -> String {
    let mut script = String::new();

    script.push_str(&format!(
        r#"const {{ chromium, firefox, webkit }} = require('playwright');
const {{ expect }} = require('@playwright/test');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  const baseUrl = {base_url};
  const screenshotPath = {screenshot};
  let step = 'launch';

  try {{
"#,
        browser = config.browser.as_str(),
        headless = config.headless,
        width = config.viewport_width,
        height = config.viewport_height,
        base_url = js(config.base_url.trim_end_matches('/')),
        screenshot = js(&screenshot_path.to_string_lossy()),
    ));

    for (i, step) in steps.iter().enumerate() {
        script.push_str(&format!("\n    // Step {}\n", i + 1));
        script.push_str(&format!("    step = {};\n", js(&step.name())));
        script.push_str(&step.to_js());
        script.push('\n');
    }

    script.push_str(
        r#"
    console.log(JSON.stringify({ success: true }));
  } catch (error) {
    let screenshot = null;
    try {
      await page.screenshot({ path: screenshotPath, fullPage: true });
      screenshot = screenshotPath;
    } catch (_) {}
    console.log(JSON.stringify({ success: false, step, error: error.message, screenshot }));
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})();
"#,
    );

    script
}

/// Extract the last status line from script stdout
pub fn parse_outcome(stdout: &str) -> Option<ScriptOutcome> {
    static STATUS_LINE: OnceLock<Regex> = OnceLock::new();
    let pattern = STATUS_LINE.get_or_init(|| Regex::new(r#"(?m)^\{"success":.*\}\s*$"#).expect("static pattern"));

    pattern
        .find_iter(stdout)
        .last()
        .and_then(|m| serde_json::from_str(m.as_str().trim()).ok())
}

/// Whole-process bound: every step budget plus launch allowance
pub fn process_budget(steps: &[PageStep], launch_timeout_ms: u64) -> Duration {
    let steps_ms: u64 = steps.iter().map(PageStep::timeout_ms).sum();
    Duration::from_millis(steps_ms.saturating_add(launch_timeout_ms))
}

/// Run `cmd` to completion, killing it once `limit` elapses
pub(crate) async fn output_within(cmd: &mut TokioCommand, limit: Duration, label: &str) -> E2eResult<Output> {
    cmd.kill_on_drop(true);
    tokio::time::timeout(limit, cmd.output())
        .await
        .map_err(|_| E2eError::Timeout(format!("{label} after {} ms", limit.as_millis())))?
        .map_err(E2eError::from)
}

/// Playwright runner handle
pub struct PlaywrightHandle {
    config: PlaywrightConfig,
}

impl PlaywrightHandle {
    /// Create a handle after checking Playwright is installed
    pub fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;
        std::fs::create_dir_all(&config.screenshot_dir)?;

        Ok(Self { config })
    }

    fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    pub fn process_timeout(&self, steps: &[PageStep]) -> Duration {
        process_budget(steps, self.config.launch_timeout_ms)
    }

    /// Run `steps` in a fresh browser context
    pub async fn run_steps(&self, case_name: &str, steps: &[PageStep]) -> E2eResult<ScriptOutcome> {
        let screenshot_path = self.config.screenshot_dir.join(format!("{case_name}-failure.png"));
        let script = render_script(&self.config, &screenshot_path, steps);

        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join(format!("{case_name}.js"));
        std::fs::write(&script_path, script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path);
        if let Some(dir) = &self.config.node_modules {
            let dir = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.clone());
            cmd.env("NODE_PATH", dir);
        }

        let output = output_within(&mut cmd, self.process_timeout(steps), case_name).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| l.starts_with("[TEST]")) {
            debug!("{}", line);
        }

        match parse_outcome(&stdout) {
            Some(outcome) => Ok(outcome),
            None => {
                warn!("Playwright script produced no status line");
                Err(E2eError::Playwright(format!(
                    "Script failed:\nstdout: {}\nstderr: {}",
                    stdout, stderr
                )))
            }
        }
    }
}
