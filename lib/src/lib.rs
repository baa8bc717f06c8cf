//! GitHub REST bindings for Rust
//! Provides the refs, contents and pulls calls needed to ship content through a pull request

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("GitHub API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid header value")]
    InvalidHeader,
}

impl GitHubError {
    /// HTTP status of the failed call, when the API answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Api { status, .. } => Some(*status),
            GitHubError::RequestError(e) => e.status().map(|s| s.as_u16()),
            GitHubError::InvalidHeader => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitObject {
    pub sha: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: String,
    pub object: GitObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestHead {
    #[serde(rename = "ref")]
    pub branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub head: PullRequestHead,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ContentWriteResponse {
    commit: GitObject,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct CreateRefPayload<'a> {
    #[serde(rename = "ref")]
    name: String,
    sha: &'a str,
}

#[derive(Debug, Serialize)]
struct PutContentPayload<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreatePullPayload<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdatePullPayload {
    state: &'static str,
}

pub struct GitHubClient {
    api_url: String,
    owner: String,
    repo: String,
    client: Client,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: &str, owner: &str, repo: &str) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| GitHubError::InvalidHeader)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("pr-bot"));
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            client,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url,
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }

    /// Resolve a branch to the SHA its head points at
    pub fn get_branch_sha(&self, branch: &str) -> Result<String, GitHubError> {
        let response = self
            .client
            .get(self.repo_url(&format!("git/ref/heads/{}", branch)))
            .send()?;

        let git_ref: GitRef = check(response)?.json()?;
        Ok(git_ref.object.sha)
    }

    /// Create `refs/heads/<branch>` pointing at `sha`
    pub fn create_ref(&self, branch: &str, sha: &str) -> Result<GitRef, GitHubError> {
        let payload = CreateRefPayload {
            name: format!("refs/heads/{}", branch),
            sha,
        };

        let response = self
            .client
            .post(self.repo_url("git/refs"))
            .json(&payload)
            .send()?;

        Ok(check(response)?.json()?)
    }

    /// Delete `refs/heads/<branch>`
    pub fn delete_ref(&self, branch: &str) -> Result<(), GitHubError> {
        let response = self
            .client
            .delete(self.repo_url(&format!("git/refs/heads/{}", branch)))
            .send()?;

        check(response)?;
        Ok(())
    }

    /// Blob SHA of a file on a branch, or None if the file does not exist there
    pub fn get_file_sha(&self, path: &str, branch: &str) -> Result<Option<String>, GitHubError> {
        let response = self
            .client
            .get(self.repo_url(&format!("contents/{}", path)))
            .query(&[("ref", branch)])
            .send()?;

        // Missing files are expected for new content
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let entry: ContentEntry = check(response)?.json()?;
        Ok(Some(entry.sha))
    }

    /// Create or update a single file on a branch, returning the new commit SHA
    pub fn put_file(
        &self,
        path: &str,
        branch: &str,
        content: &str,
        message: &str,
        sha: Option<String>,
    ) -> Result<String, GitHubError> {
        let payload = PutContentPayload {
            message,
            content: encode_content(content),
            branch,
            sha,
        };

        let response = self
            .client
            .put(self.repo_url(&format!("contents/{}", path)))
            .json(&payload)
            .send()?;

        let written: ContentWriteResponse = check(response)?.json()?;
        Ok(written.commit.sha)
    }

    /// Open a pull request from `head` into `base`
    pub fn create_pull(
        &self,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<PullRequest, GitHubError> {
        let payload = CreatePullPayload {
            title,
            body,
            head,
            base,
        };

        let response = self
            .client
            .post(self.repo_url("pulls"))
            .json(&payload)
            .send()?;

        Ok(check(response)?.json()?)
    }

    /// List open pull requests (first page of 100)
    pub fn list_open_pulls(&self) -> Result<Vec<PullRequest>, GitHubError> {
        let response = self
            .client
            .get(self.repo_url("pulls"))
            .query(&[("state", "open"), ("per_page", "100")])
            .send()?;

        Ok(check(response)?.json()?)
    }

    /// Close a pull request without merging it
    pub fn close_pull(&self, number: u64) -> Result<PullRequest, GitHubError> {
        let response = self
            .client
            .patch(self.repo_url(&format!("pulls/{}", number)))
            .json(&UpdatePullPayload { state: "closed" })
            .send()?;

        Ok(check(response)?.json()?)
    }
}

/// Base64 encoding expected by the contents API
pub fn encode_content(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}

/// Turn a non-success response into `GitHubError::Api`, keeping GitHub's message
fn check(response: Response) -> Result<Response, GitHubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);

    Err(GitHubError::Api {
        status: status.as_u16(),
        message,
    })
}
