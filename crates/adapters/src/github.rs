// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub contents API store
//!
//! The scope is a branch, the document is a file on it, and the version token is
//! the file's blob SHA. GitHub rejects a contents update carrying a stale SHA with
//! 409, which is what the protocols rely on.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{StatusCode, Url};
use semlock_core::{DocumentLocation, DocumentStore, StoreError, StoredDocument, VersionToken, WriteOutcome};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// Store backed by files on a GitHub repository branch
#[derive(Clone)]
pub struct GitHubStore {
    client: reqwest::Client,
    api_url: Url,
    owner: String,
    repo: String,
    token: String,
}

impl std::fmt::Debug for GitHubStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubStore")
            .field("api_url", &self.api_url.as_str())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

impl GitHubStore {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let api_url = parse_api_url(DEFAULT_API_URL)?;

        Ok(Self {
            client,
            api_url,
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        })
    }

    /// Point at a different API root, e.g. a GitHub Enterprise server
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, StoreError> {
        self.api_url = parse_api_url(api_url)?;
        Ok(self)
    }

    fn endpoint<'a>(&self, tail: impl IntoIterator<Item = &'a str>) -> Result<Url, StoreError> {
        repo_url(&self.api_url, &self.owner, &self.repo, tail)
    }

    fn contents_url(&self, location: &DocumentLocation) -> Result<Url, StoreError> {
        let segments = location.path.split('/').filter(|s| !s.is_empty());
        self.endpoint(std::iter::once("contents").chain(segments))
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("semlock/", env!("CARGO_PKG_VERSION")))
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

fn parse_api_url(raw: &str) -> Result<Url, StoreError> {
    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|e| StoreError::Transport(format!("invalid API URL '{}': {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(StoreError::Transport(format!("invalid API URL '{}'", raw)));
    }
    Ok(url)
}

/// `{api}/repos/{owner}/{repo}/{tail...}` with every segment percent-encoded
fn repo_url<'a>(
    api_url: &Url,
    owner: &str,
    repo: &str,
    tail: impl IntoIterator<Item = &'a str>,
) -> Result<Url, StoreError> {
    let mut url = api_url.clone();
    url.path_segments_mut()
        .map_err(|_| StoreError::Transport(format!("invalid API URL '{}'", api_url)))?
        .pop_if_empty()
        .extend(["repos", owner, repo])
        .extend(tail);
    Ok(url)
}

fn transport(e: reqwest::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

async fn http_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_string());
    StoreError::Http { status, message }
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentResponse {
    content: PutContentEntry,
}

#[derive(Debug, Deserialize)]
struct PutContentEntry {
    sha: String,
}

/// Turn a contents API payload into raw document bytes
fn decode_content(body: &[u8]) -> Result<StoredDocument, StoreError> {
    let response: ContentResponse = serde_json::from_slice(body)
        .map_err(|e| StoreError::Decode(format!("content not found in response: {}", e)))?;

    if response.kind != "file" {
        return Err(StoreError::Decode(format!(
            "expected a file, found {}",
            response.kind
        )));
    }
    if response.encoding != "base64" {
        return Err(StoreError::Decode(format!(
            "unsupported content encoding '{}'",
            response.encoding
        )));
    }

    // GitHub wraps base64 content at 60 columns
    let packed: String = response
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let content = STANDARD
        .decode(packed)
        .map_err(|e| StoreError::Decode(e.to_string()))?;

    Ok(StoredDocument {
        content,
        version: VersionToken::new(response.sha),
    })
}

/// Parse the PUT answer down to the new blob sha
fn decode_written(body: &[u8]) -> Result<VersionToken, StoreError> {
    let written: PutContentResponse =
        serde_json::from_slice(body).map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(VersionToken::new(written.content.sha))
}

/// How a GET status should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GetStatus {
    Found,
    Missing,
    Failed,
}

fn classify_branch(status: StatusCode) -> GetStatus {
    match status {
        status if status.is_success() => GetStatus::Found,
        StatusCode::NOT_FOUND => GetStatus::Missing,
        _ => GetStatus::Failed,
    }
}

/// Only a plain 200 carries file content; other 2xx answers are not a document
fn classify_get(status: StatusCode) -> GetStatus {
    match status {
        StatusCode::OK => GetStatus::Found,
        StatusCode::NOT_FOUND => GetStatus::Missing,
        _ => GetStatus::Failed,
    }
}

/// How a contents PUT status should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PutStatus {
    Written,
    Conflict,
    Failed,
}

fn classify_put(status: StatusCode, creating: bool) -> PutStatus {
    match status {
        StatusCode::OK | StatusCode::CREATED => PutStatus::Written,
        StatusCode::CONFLICT => PutStatus::Conflict,
        // Create without sha against an existing file: "sha wasn't supplied"
        StatusCode::UNPROCESSABLE_ENTITY if creating => PutStatus::Conflict,
        _ => PutStatus::Failed,
    }
}

#[async_trait]
impl DocumentStore for GitHubStore {
    async fn scope_exists(&self, scope: &str) -> Result<bool, StoreError> {
        let url = self.endpoint(["branches", scope])?;
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(transport)?;

        match classify_branch(response.status()) {
            GetStatus::Found => Ok(true),
            GetStatus::Missing => Ok(false),
            GetStatus::Failed => Err(http_error(response).await),
        }
    }

    async fn read(
        &self,
        location: &DocumentLocation,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let mut url = self.contents_url(location)?;
        url.query_pairs_mut().append_pair("ref", &location.scope);

        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(transport)?;

        match classify_get(response.status()) {
            GetStatus::Found => {
                let body = response.bytes().await.map_err(transport)?;
                decode_content(&body).map(Some)
            }
            GetStatus::Missing => Ok(None),
            GetStatus::Failed => Err(http_error(response).await),
        }
    }

    async fn write(
        &self,
        location: &DocumentLocation,
        content: &[u8],
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<WriteOutcome, StoreError> {
        let url = self.contents_url(location)?;
        let body = PutContentRequest {
            message,
            content: STANDARD.encode(content),
            branch: &location.scope,
            sha: expected.map(VersionToken::as_str),
        };

        let response = self
            .request(reqwest::Method::PUT, url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        match classify_put(response.status(), expected.is_none()) {
            PutStatus::Written => {
                let body = response.bytes().await.map_err(transport)?;
                Ok(WriteOutcome::Written {
                    version: decode_written(&body)?,
                })
            }
            PutStatus::Conflict => Ok(WriteOutcome::Conflict),
            PutStatus::Failed => Err(http_error(response).await),
        }
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
