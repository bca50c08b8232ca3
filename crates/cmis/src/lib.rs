//! CMIS Browser Binding client and the document preview test fixture
//!
//! - [`CmisClient`] issues Basic-authenticated requests against
//!   `{base_url}/core/browser/{repository}` and exposes the handful of
//!   actions the preview suite needs.
//! - [`PreviewFixture`] creates a uniquely named folder, uploads the three
//!   fixed [`samples`], and tears the folder down again.

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod fixture;
pub mod samples;
pub mod types;

pub use client::{CmisClient, FetchOptions};
pub use config::CmisConfig;
pub use error::{CmisError, Result};
pub use fixture::{PreviewFixture, TestFolder};
pub use samples::SampleFile;
pub use types::CmisObject;
