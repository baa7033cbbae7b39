//! Catalog HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Authenticated calls
//! send HTTP Basic credentials; the catalog has no token exchange.

use std::time::Duration;

use log::debug;
use reqwest::blocking::{multipart, RequestBuilder, Response};
use thiserror::Error;

use datashelf_config::Settings;
use datashelf_io::rows::RowObject;

use crate::auth::Credentials;
use crate::metadata::{DatasetMetadata, DatasetSummary, MetadataUpdate};

/// Error type for catalog operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No saved credentials
    #[error("not signed in, run `dshelf login` first")]
    NotAuthenticated,
    /// Server rejected the credentials (401/403)
    #[error("credentials rejected (HTTP {0})")]
    Unauthorized(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {0}: {1}")]
    Http(u16, String),
    #[error("unexpected response: {0}")]
    Parse(String),
}

/// Catalog API client (blocking).
#[derive(Clone)]
pub struct DatasetClient {
    pub(crate) http: reqwest::blocking::Client,
    api_base: String,
}

/// How the catalog addresses a dataset: lowercase, spaces as underscores.
pub fn collection_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

impl DatasetClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("dshelf/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Client for the API base and timeout in `settings` (env override applied).
    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        Self::new(
            &settings.effective_api_base(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Check credentials against the catalog. Returns them with the role the
    /// server reported. Any success status accepts the credentials; a body
    /// without a readable role leaves `role` unset.
    pub fn login(&self, username: &str, password: &str) -> Result<Credentials, ClientError> {
        let mut creds = Credentials::new(username, password);
        let resp = self.send(self.http.get(self.url("/login")), Some(&creds))?;
        let body = resp.text().unwrap_or_default();
        creds.role = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| json["role"].as_str().map(String::from));
        if creds.role.is_none() {
            debug!("Login response carried no role");
        }
        Ok(creds)
    }

    /// All datasets visible to the signed-in user, private ones included.
    pub fn list_datasets(&self, creds: &Credentials) -> Result<Vec<DatasetSummary>, ClientError> {
        let resp = self.send(self.http.get(self.url("/datasets")), Some(creds))?;
        resp.json().map_err(|e| ClientError::Parse(e.to_string()))
    }

    pub fn public_datasets(&self) -> Result<Vec<DatasetSummary>, ClientError> {
        let resp = self.send(self.http.get(self.url("/datasets/public")), None)?;
        resp.json().map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Sample rows of a dataset, as row objects.
    pub fn sample(&self, name: &str, creds: Option<&Credentials>) -> Result<Vec<RowObject>, ClientError> {
        let resp = self.send(self.http.get(self.dataset_url(name, "")), creds)?;
        resp.json().map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Stored metadata. The endpoint answers with an array; the first entry
    /// is the dataset's.
    pub fn metadata(&self, name: &str, creds: Option<&Credentials>) -> Result<DatasetMetadata, ClientError> {
        let resp = self.send(self.http.get(self.dataset_url(name, "/metadata")), creds)?;
        let entries: Vec<DatasetMetadata> =
            resp.json().map_err(|e| ClientError::Parse(e.to_string()))?;
        entries
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Parse(format!("no metadata returned for '{}'", name)))
    }

    pub fn update_metadata(&self, name: &str, update: &MetadataUpdate, creds: &Credentials) -> Result<(), ClientError> {
        let form = multipart::Form::new()
            .text("description", update.description.clone())
            .text("tags", update.tags.clone())
            .text("visibility", update.visibility.as_str());
        self.send(self.http.put(self.dataset_url(name, "")).multipart(form), Some(creds))?;
        Ok(())
    }

    pub fn delete_dataset(&self, name: &str, creds: &Credentials) -> Result<(), ClientError> {
        self.send(self.http.delete(self.dataset_url(name, "")), Some(creds))?;
        Ok(())
    }

    /// Raw bytes of the stored dataset file.
    pub fn download(&self, name: &str, creds: Option<&Credentials>) -> Result<Vec<u8>, ClientError> {
        let resp = self.send(self.http.get(self.dataset_url(name, "/download")), creds)?;
        let bytes = resp.bytes().map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    // ── Internal helpers ────────────────────────────────────────────

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn dataset_url(&self, name: &str, suffix: &str) -> String {
        self.url(&format!("/dataset/{}{}", collection_name(name), suffix))
    }

    /// Attach credentials, send, and turn non-2xx answers into errors.
    pub(crate) fn send(&self, req: RequestBuilder, creds: Option<&Credentials>) -> Result<Response, ClientError> {
        let req = match creds {
            Some(c) => req.basic_auth(&c.username, Some(&c.password)),
            None => req,
        };

        let response = req.send().map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        debug!("{} {}", status, response.url());
        if !response.status().is_success() {
            if status == 401 || status == 403 {
                return Err(ClientError::Unauthorized(status));
            }
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Http(status, body));
        }

        Ok(response)
    }
}
