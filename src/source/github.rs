//! GitHub REST v3 repository source
//!
//! Speaks the contents and languages endpoints with token auth. File
//! content arrives base64 encoded with embedded newlines, so decoding
//! strips whitespace first. Listing entries that are neither files nor
//! directories (symlinks, submodules) are dropped from listings.

use crate::core::retry::{retry_async_where, RetryPolicy};
use crate::source::error::{SourceError, SourceResult};
use crate::source::traits::RepositorySource;
use crate::source::types::{EntryKind, RepoEntry};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("repoaudit/", env!("CARGO_PKG_VERSION"));

pub struct GithubSource {
    client: Client,
    token: String,
    base_url: String,
    retry: RetryPolicy,
}

impl GithubSource {
    /// An empty token sends unauthenticated requests, which GitHub rate
    /// limits aggressively but allows for public repositories.
    pub fn new(
        token: impl Into<String>,
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!(
                    "Failed to build HTTP client with custom timeout, using default client: {}",
                    e
                );
                Client::new()
            });

        Self {
            client,
            token: token.into(),
            base_url: base_url.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the API base URL, mainly for tests against a local server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the transport retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn contents_url(&self, target: &str, path: &str, branch: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() {
            format!("{}/repos/{}/contents?ref={}", base, target, branch)
        } else {
            format!("{}/repos/{}/contents/{}?ref={}", base, target, path, branch)
        }
    }

    fn languages_url(&self, target: &str) -> String {
        format!(
            "{}/repos/{}/languages",
            self.base_url.trim_end_matches('/'),
            target
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, resource: &str) -> SourceResult<T> {
        retry_async_where(
            "github_get",
            self.retry.clone(),
            || self.send(url, resource),
            |e: &SourceError| e.is_transient(),
        )
        .await
    }

    async fn send<T: DeserializeOwned>(&self, url: &str, resource: &str) -> SourceResult<T> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", ACCEPT_HEADER)
            .header("User-Agent", USER_AGENT);
        if !self.token.is_empty() {
            request = request.header("Authorization", format!("token {}", self.token));
        }

        let response = request.send().await.map_err(|e| SourceError::Request {
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                404 => SourceError::NotFound {
                    resource: resource.to_string(),
                },
                429 => SourceError::RateLimited,
                401 | 403 => SourceError::Auth { message: body },
                s if s >= 500 => SourceError::Unavailable { message: body },
                s => SourceError::Request {
                    message: format!("API error {}: {}", s, body),
                },
            });
        }

        response.json().await.map_err(|e| SourceError::Request {
            message: format!("invalid response body: {}", e),
        })
    }
}

#[async_trait]
impl RepositorySource for GithubSource {
    async fn list(&self, target: &str, path: &str, branch: &str) -> SourceResult<Vec<RepoEntry>> {
        let url = self.contents_url(target, path, branch);
        let resource = if path.is_empty() {
            target.to_string()
        } else {
            format!("{}/{}", target, path)
        };
        let entries: Vec<ContentsEntry> = self.get_json(&url, &resource).await?;

        let mut listed = Vec::with_capacity(entries.len());
        for entry in entries {
            let kind = match entry.kind.as_str() {
                "file" => EntryKind::File,
                "dir" => EntryKind::Dir,
                other => {
                    log::trace!(
                        "Ignoring '{}' with unsupported entry type '{}'",
                        entry.path,
                        other
                    );
                    continue;
                }
            };
            listed.push(RepoEntry {
                name: entry.name,
                path: entry.path,
                kind,
            });
        }
        Ok(listed)
    }

    async fn fetch(&self, target: &str, path: &str, branch: &str) -> SourceResult<String> {
        let url = self.contents_url(target, path, branch);
        let resource = format!("{}/{}", target, path);
        let file: ContentsFile = self.get_json(&url, &resource).await?;
        decode_content(path, &file)
    }

    async fn dominant_language(&self, target: &str) -> SourceResult<String> {
        let url = self.languages_url(target);
        let languages: BTreeMap<String, u64> = self.get_json(&url, target).await?;

        let mut dominant = ("Unknown".to_string(), 0u64);
        for (language, bytes) in languages {
            if bytes > dominant.1 {
                dominant = (language, bytes);
            }
        }
        Ok(dominant.0)
    }
}

/// Contents API listing entry. The `type` field distinguishes files,
/// directories, symlinks, and submodules.
#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Contents API file response. GitHub reports `encoding: "none"` with
/// empty content for blobs over its size cap.
#[derive(Debug, Deserialize)]
struct ContentsFile {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

fn decode_content(path: &str, file: &ContentsFile) -> SourceResult<String> {
    if file.encoding != "base64" {
        return Err(SourceError::Decode {
            path: path.to_string(),
            message: format!("unsupported content encoding '{}'", file.encoding),
        });
    }
    let cleaned: String = file
        .content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = BASE64
        .decode(cleaned.as_bytes())
        .map_err(|e| SourceError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| SourceError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
