//! Authenticated HTTP client for the CMIS Browser Binding

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::Form;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::action::CmisAction;
use crate::config::CmisConfig;
use crate::error::{CmisError, Result};
use crate::samples::SampleFile;
use crate::types::{ChildrenResponse, CmisObject, CmisResponse, QueryResponse, RepositoryInfo};

/// Options for a single request
#[derive(Debug)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: HeaderMap,
    /// Multipart body; every Browser Binding action is a form POST
    pub form: Option<Form>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            form: None,
        }
    }
}

impl FetchOptions {
    pub fn post(form: Form) -> Self {
        Self {
            method: Method::POST,
            form: Some(form),
            ..Default::default()
        }
    }
}

/// CMIS Browser Binding client.
///
/// Every request carries a fixed Basic `Authorization` header. The client
/// performs each request exactly once: no retries and no timeout beyond the
/// transport default.
#[derive(Debug, Clone)]
pub struct CmisClient {
    http: reqwest::Client,
    browser_url: String,
    repository_id: String,
    auth_header: HeaderValue,
}

impl CmisClient {
    pub fn new(config: &CmisConfig) -> Result<Self> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(config: &CmisConfig, http: reqwest::Client) -> Result<Self> {
        let credentials = STANDARD.encode(format!("{}:{}", config.username, config.password));
        let mut auth_header = HeaderValue::from_str(&format!("Basic {credentials}"))?;
        auth_header.set_sensitive(true);

        Ok(Self {
            http,
            browser_url: config.browser_url(),
            repository_id: config.repository_id.clone(),
            auth_header,
        })
    }

    pub fn browser_url(&self) -> &str {
        &self.browser_url
    }

    /// Issue one authenticated request and return the raw response.
    ///
    /// Caller headers are applied after the `Authorization` header and replace
    /// it when they set the same name. A non-success status is returned as-is;
    /// only transport failures are errors.
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> Result<Response> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        for name in options.headers.keys() {
            headers.remove(name);
            for value in options.headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        debug!("{} {}", options.method, url);

        let mut request = self.http.request(options.method, url).headers(headers);
        if let Some(form) = options.form {
            request = request.multipart(form);
        }

        Ok(request.send().await?)
    }

    /// POST an action, optionally addressed at an object via `?objectId=`
    async fn post_action(&self, object_id: Option<&str>, action: CmisAction<'_>) -> Result<Response> {
        let url = match object_id {
            Some(id) => format!("{}?objectId={}", self.browser_url, id),
            None => self.browser_url.clone(),
        };
        self.fetch(&url, FetchOptions::post(action.into_form()?)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, action: &'static str) -> Result<T> {
        let response = self.fetch(url, FetchOptions::default()).await?;
        let response = ensure_success(response, action).await?;
        Ok(response.json().await?)
    }

    /// Create a folder under `parent_id`
    pub async fn create_folder(&self, parent_id: &str, name: &str) -> Result<CmisObject> {
        let action = CmisAction::CreateFolder { name };
        let label = action.label();
        let response = self.post_action(Some(parent_id), action).await?;
        let response = ensure_success(response, label).await?;

        let envelope: CmisResponse = response.json().await?;
        envelope.into_object(label)
    }

    /// Upload a document into `folder_id`, returning its object id
    pub async fn create_document(&self, folder_id: &str, file: &SampleFile) -> Result<String> {
        let action = CmisAction::CreateDocument { file };
        let label = action.label();
        let response = self.post_action(Some(folder_id), action).await?;
        let response = ensure_success(response, label).await?;

        let envelope: CmisResponse = response.json().await?;
        Ok(envelope.into_object(label)?.id)
    }

    /// Delete a folder and everything under it. The status is returned
    /// unchecked.
    pub async fn delete_tree(&self, folder_id: &str) -> Result<StatusCode> {
        let action = CmisAction::DeleteTree {
            folder_id,
            all_versions: true,
            continue_on_failure: true,
        };
        let response = self.post_action(None, action).await?;
        Ok(response.status())
    }

    /// Root folder id from `cmisselector=repositoryInfo`
    pub async fn root_folder_id(&self) -> Result<String> {
        let url = format!("{}?cmisselector=repositoryInfo", self.browser_url);
        let mut info: std::collections::HashMap<String, RepositoryInfo> =
            self.get_json(&url, "get repository info").await?;

        info.remove(&self.repository_id)
            .map(|repo| repo.root_folder_id)
            .ok_or_else(|| CmisError::UnknownRepository(self.repository_id.clone()))
    }

    /// Direct children of a folder
    pub async fn children(&self, folder_id: &str) -> Result<Vec<CmisObject>> {
        let url = format!(
            "{}?objectId={}&cmisselector=children&succinct=true",
            self.browser_url, folder_id
        );
        let children: ChildrenResponse = self.get_json(&url, "list children").await?;

        children
            .objects
            .into_iter()
            .map(|entry| entry.object.into_object("list children"))
            .collect()
    }

    /// Run a CMIS SQL query
    pub async fn query(&self, statement: &str) -> Result<Vec<CmisObject>> {
        let url = reqwest::Url::parse_with_params(
            &self.browser_url,
            &[("cmisselector", "query"), ("q", statement), ("succinct", "true")],
        )
        .map_err(|e| CmisError::InvalidUrl(e.to_string()))?;
        let results: QueryResponse = self.get_json(url.as_str(), "query").await?;

        results
            .results
            .into_iter()
            .map(|row| row.into_object("query"))
            .collect()
    }
}

/// Turn a non-success response into [`CmisError::Status`]
async fn ensure_success(response: Response, action: &'static str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CmisError::Status {
        action,
        status,
        body: body.chars().take(200).collect(),
    })
}
