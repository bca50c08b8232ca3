//! Preview suite entry point
//!
//! Exit status: 0 when every case passed, 1 when a case failed, 2 when the
//! suite could not run (setup failure, missing Playwright, bad config).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use docpreview_cmis::fixture::cleanup_stale_folders;
use docpreview_cmis::CmisClient;
use docpreview_e2e::playwright::Browser;
use docpreview_e2e::{PlaywrightDriver, PreviewCase, PreviewKind, SuiteConfig, TestRunner};

#[derive(Parser, Debug)]
#[command(name = "docpreview-e2e")]
#[command(about = "Document preview E2E suite")]
struct Args {
    /// TOML config file; missing file means defaults
    #[arg(short, long, env = "DOCPREVIEW_CONFIG", default_value = "docpreview.toml")]
    config: PathBuf,

    /// CMIS server origin
    #[arg(long, env = "DOCPREVIEW_CMIS_URL")]
    cmis_url: Option<String>,

    /// Web UI origin
    #[arg(long, env = "DOCPREVIEW_UI_URL")]
    ui_url: Option<String>,

    /// CMIS repository id
    #[arg(long, env = "DOCPREVIEW_REPOSITORY")]
    repository: Option<String>,

    /// User for both CMIS and the UI login
    #[arg(long, env = "DOCPREVIEW_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "DOCPREVIEW_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Parent folder for the test folder ("auto" looks it up)
    #[arg(long, env = "DOCPREVIEW_ROOT_FOLDER_ID")]
    root_folder_id: Option<String>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long)]
    browser: Option<Browser>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Run only these cases (pdf, image, text)
    #[arg(long = "case", value_delimiter = ',')]
    cases: Vec<PreviewKind>,

    /// Delete abandoned test folders (older than timeouts.stale_after_ms) before running
    #[arg(long)]
    cleanup_stale: bool,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<(SuiteConfig, Vec<PreviewKind>, bool)> {
        let mut config = SuiteConfig::load(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;

        if let Some(url) = self.cmis_url {
            config.cmis.base_url = url;
        }
        if let Some(url) = self.ui_url {
            config.playwright.base_url = url;
        }
        if let Some(repository) = self.repository {
            config.cmis.repository_id = repository;
        }
        if let Some(username) = self.username {
            config.cmis.username = username.clone();
            config.ui.username = username;
        }
        if let Some(password) = self.password {
            config.cmis.password = password.clone();
            config.ui.password = password;
        }
        match self.root_folder_id.as_deref() {
            Some("auto") => config.cmis.root_folder_id = None,
            Some(id) => config.cmis.root_folder_id = Some(id.to_string()),
            None => {}
        }
        if let Some(browser) = self.browser {
            config.playwright.browser = browser;
        }
        if self.headed {
            config.playwright.headless = false;
        }
        if let Some(output) = self.output {
            config.playwright.screenshot_dir = output.join("screenshots");
            config.output_dir = output;
        }

        Ok((config, self.cases, self.cleanup_stale))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ExitCode::from(2);
        }
    };

    match rt.block_on(async_main(args)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn async_main(args: Args) -> anyhow::Result<bool> {
    let (config, kinds, cleanup_stale) = args.into_config()?;

    let client = CmisClient::new(&config.cmis)?;

    if cleanup_stale {
        match cleanup_stale_folders(&client, 10, config.timeouts.stale_after()).await {
            Ok(removed) => info!("Removed {} stale test folder(s)", removed),
            Err(e) => warn!("Stale folder cleanup failed: {}", e),
        }
    }

    let driver = PlaywrightDriver::new(config.clone())?;
    let mut runner = TestRunner::new(client, driver, config);
    if !kinds.is_empty() {
        runner = runner.with_cases(kinds.into_iter().map(PreviewCase::new).collect());
    }

    let results = runner.run().await?;
    runner.write_results(&results)?;

    Ok(results.failed == 0)
}
