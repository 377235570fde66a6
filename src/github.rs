use std::env;

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Remote directories probed when resolving a category's file. Legacy
/// word lists are spread across both with inconsistent naming.
const REMOTE_DIRS: &[&str] = &["data/graphic", "data/common"];

#[derive(Clone)]
pub struct GithubConfig {
    pub token: String,
    pub repo: String,
    pub branch: String,
    pub api_url: Option<String>,
}

impl GithubConfig {
    /// Build the sync configuration from the environment. Returns `None`
    /// when the token or repository is missing, in which case saves stay
    /// local-only.
    pub fn from_env() -> Option<Self> {
        let token = env::var("GITHUB_TOKEN").ok()?;
        let repo = env::var("GITHUB_REPO").ok()?;
        Some(Self {
            token,
            repo,
            branch: env::var("GITHUB_BRANCH").unwrap_or_else(|_| "main".to_string()),
            api_url: env::var("GITHUB_API_URL").ok(),
        })
    }
}

#[derive(Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
}

#[derive(Deserialize)]
struct FileInfo {
    sha: String,
}

/// Pushes word-list files to a GitHub repository via the contents API.
///
/// Writes are "update if exists else create", keyed by the current blob
/// sha. A stale sha gets exactly one refresh-and-retry; a second conflict
/// is reported to the caller.
pub struct GithubSync {
    config: GithubConfig,
    client: reqwest::Client,
}

/// Candidate remote file names for a category, most specific first.
/// Legacy naming is not homogeneous, so this is best-effort probing.
pub fn candidate_names(category: &str) -> [String; 4] {
    let clean = category.trim().to_lowercase();
    [
        format!("{clean}.txt"),
        format!("styles_{clean}.txt"),
        format!("{clean}s.txt"),
        format!("styles_{clean}s.txt"),
    ]
}

impl GithubSync {
    pub fn new(config: GithubConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_base(&self) -> &str {
        self.config.api_url.as_deref().unwrap_or(GITHUB_API_URL)
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base(),
            self.config.repo,
            path
        )
    }

    async fn list_dir(&self, dir: &str) -> Result<Vec<ContentEntry>> {
        let resp = self
            .client
            .get(self.contents_url(dir))
            .query(&[("ref", self.config.branch.as_str())])
            .bearer_auth(&self.config.token)
            .header(reqwest::header::USER_AGENT, "kvengine")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("listing {dir} failed: {}", resp.status()));
        }
        Ok(resp.json().await?)
    }

    /// Find the real remote path for a category by probing the known
    /// directories for any candidate file name; first match wins. When
    /// nothing matches, a default path is synthesized so a first save
    /// creates the file.
    #[instrument(level = "debug", skip(self))]
    pub async fn resolve_remote_path(&self, category: &str) -> String {
        let candidates = candidate_names(category);
        for dir in REMOTE_DIRS {
            let entries = match self.list_dir(dir).await {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(dir, error = %err, "Skipping unreadable remote directory");
                    continue;
                }
            };
            for entry in entries {
                let name = entry.name.to_lowercase();
                if candidates.iter().any(|c| c == &name) {
                    debug!(category, path = %entry.path, "Resolved remote path");
                    return entry.path;
                }
            }
        }
        let fallback = format!("data/graphic/{category}.txt");
        debug!(category, path = %fallback, "No remote file found, synthesizing path");
        fallback
    }

    /// Fetch the current blob sha of a remote file, `None` if it does not
    /// exist yet.
    async fn fetch_sha(&self, path: &str) -> Result<Option<String>> {
        let resp = self
            .client
            .get(self.contents_url(path))
            .query(&[("ref", self.config.branch.as_str())])
            .bearer_auth(&self.config.token)
            .header(reqwest::header::USER_AGENT, "kvengine")
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(anyhow!("reading {path} failed: {}", resp.status()));
        }
        let info: FileInfo = resp.json().await?;
        Ok(Some(info.sha))
    }

    async fn put_file(
        &self,
        path: &str,
        content: &str,
        sha: Option<&str>,
        message: &str,
    ) -> Result<reqwest::StatusCode> {
        let mut body = json!({
            "message": message,
            "content": BASE64.encode(content),
            "branch": self.config.branch,
        });
        if let Some(sha) = sha {
            body["sha"] = json!(sha);
        }
        let resp = self
            .client
            .put(self.contents_url(path))
            .bearer_auth(&self.config.token)
            .header(reqwest::header::USER_AGENT, "kvengine")
            .json(&body)
            .send()
            .await?;
        Ok(resp.status())
    }

    /// Commit a category's word list to the repository.
    ///
    /// Returns the remote path written. Local state is never touched here;
    /// callers treat a failure as a warning, not a rollback.
    #[instrument(level = "debug", skip(self, words))]
    pub async fn save_category(&self, category: &str, words: &[String]) -> Result<String> {
        let content = words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let path = self.resolve_remote_path(category).await;
        let message = format!("Update {category} word list");

        let sha = self.fetch_sha(&path).await?;
        let status = self.put_file(&path, &content, sha.as_deref(), &message).await?;
        if status.is_success() {
            debug!(category, path = %path, "Remote sync committed");
            return Ok(path);
        }

        // GitHub answers 409 (or 422) when the sha went stale under us.
        // Re-read the token and retry exactly once.
        if status == reqwest::StatusCode::CONFLICT
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            warn!(category, path = %path, %status, "Stale sha, retrying remote write once");
            let sha = self.fetch_sha(&path).await?;
            let status = self.put_file(&path, &content, sha.as_deref(), &message).await?;
            if status.is_success() {
                debug!(category, path = %path, "Remote sync committed on retry");
                return Ok(path);
            }
            return Err(anyhow!("remote write to {path} failed after retry: {status}"));
        }

        Err(anyhow!("remote write to {path} failed: {status}"))
    }
}
