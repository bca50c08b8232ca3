//! Document preview E2E suite
//!
//! This crate drives the CMIS document management UI's preview feature:
//! - Creates a disposable CMIS folder holding a text, a PDF and a PNG sample
//! - Logs into the web UI through Playwright and opens each file's preview tab
//! - Asserts the type-specific renderer becomes visible
//! - Deletes the folder again, best-effort
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Preview Suite Runner (Rust)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── setup()      -> SuiteContext   (CMIS, fatal)         │
//! │    ├── run_case()   -> TestResult     (per case, isolated)  │
//! │    └── teardown()                     (CMIS, best-effort)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PreviewDriver (PlaywrightDriver)                           │
//! │    ├── login_steps          goto, fill, click, wait layout  │
//! │    ├── open_preview_steps   row, eye icon, プレビュー tab    │
//! │    └── PreviewCase::assertion                               │
//! │          ├── pdf    .react-pdf__Document                    │
//! │          ├── image  .ant-tabs-tabpane-active img            │
//! │          └── text   .ant-tabs-tabpane-active h4             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod playwright;
pub mod preview;
pub mod runner;

pub use config::SuiteConfig;
pub use error::{E2eError, E2eResult};
pub use preview::{PreviewCase, PreviewKind};
pub use runner::{PlaywrightDriver, PreviewDriver, SuiteContext, TestRunner};
