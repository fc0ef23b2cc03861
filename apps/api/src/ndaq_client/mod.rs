/// NDAQ client — the single point of entry for all calls to the upstream
/// document-assembly API.
///
/// ARCHITECTURAL RULE: No other module may call the NDAQ API directly.
/// All upstream interactions (submit, status, download) MUST go through
/// this module, which owns the Basic-Auth credentials.
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
const STATUS_TIMEOUT: Duration = Duration::from_secs(10);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum NdaqError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Protocol(String),
}

impl From<reqwest::Error> for NdaqError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL so error text surfaced to callers never reveals
        // the upstream endpoint.
        NdaqError::Http(err.without_url())
    }
}

/// One element of the status endpoint's response array. The upstream shape
/// is not formally guaranteed, so every field is defaulted: an empty array
/// or missing field reads as a still-pending job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobStatus {
    #[serde(rename = "Failed", default)]
    pub failed: bool,
    #[serde(rename = "Complete", default)]
    pub complete: bool,
    #[serde(rename = "FileId", default)]
    pub file_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    data: Vec<SubmitEntry>,
}

#[derive(Debug, Deserialize)]
struct SubmitEntry {
    #[serde(default)]
    files: Vec<SubmitFile>,
}

#[derive(Debug, Deserialize)]
struct SubmitFile {
    requestid: Option<OpaqueId>,
}

/// The upstream assigns identifiers we treat as opaque; they have been
/// observed both as JSON strings and as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OpaqueId {
    Text(String),
    Number(i64),
}

impl OpaqueId {
    fn into_string(self) -> String {
        match self {
            OpaqueId::Text(s) => s,
            OpaqueId::Number(n) => n.to_string(),
        }
    }
}

/// Client for the upstream NDAQ document-assembly API.
#[derive(Clone)]
pub struct NdaqClient {
    client: Client,
    auth_header: String,
    submit_url: String,
    status_url: String,
    download_url: String,
}

impl NdaqClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            auth_header: basic_auth(&config.ndaq_username, &config.ndaq_password),
            submit_url: config.ndaq_submit_url.clone(),
            status_url: config.ndaq_status_url.clone(),
            download_url: config.ndaq_download_url.clone(),
        }
    }

    /// Submits a base64-encoded job descriptor and returns the assigned
    /// request id. The expected nesting (`data[0].files[0].requestid`) is
    /// checked defensively; its absence is a normal upstream failure mode.
    pub async fn submit(&self, base64_xml: String) -> Result<String, NdaqError> {
        let response = self
            .client
            .post(&self.submit_url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(CONTENT_TYPE, "text/plain")
            .timeout(SUBMIT_TIMEOUT)
            .body(base64_xml)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NdaqError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| NdaqError::Protocol(format!("submit response is not valid JSON: {e}")))?;

        let request_id = body
            .data
            .into_iter()
            .next()
            .and_then(|entry| entry.files.into_iter().next())
            .and_then(|file| file.requestid)
            .ok_or_else(|| {
                NdaqError::Protocol(
                    "submit response missing data[0].files[0].requestid".to_string(),
                )
            })?
            .into_string();

        debug!("NDAQ submit accepted, request id {request_id}");
        Ok(request_id)
    }

    /// Fetches the generation status for a request id. Returns the first
    /// element of the response array, or a default (pending) status when
    /// the array is empty.
    pub async fn fetch_status(&self, request_id: &str) -> Result<JobStatus, NdaqError> {
        let url = format!("{}&rid={}", self.status_url, request_id);
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.auth_header)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NdaqError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let mut entries: Vec<JobStatus> = response
            .json()
            .await
            .map_err(|e| NdaqError::Protocol(format!("status response is not valid JSON: {e}")))?;

        if entries.is_empty() {
            return Ok(JobStatus::default());
        }
        Ok(entries.remove(0))
    }

    /// Fetches the finished artifact, returning the raw response so the
    /// caller can stream the body through without buffering it.
    pub async fn download(
        &self,
        request_id: &str,
        file_id: i64,
    ) -> Result<reqwest::Response, NdaqError> {
        let url = format!("{}&fid={}&rid={}", self.download_url, file_id, request_id);
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.auth_header)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NdaqError::Api {
                status: status.as_u16(),
                message: "upstream refused the download".to_string(),
            });
        }

        Ok(response)
    }
}

fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
}
