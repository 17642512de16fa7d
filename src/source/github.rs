//! Text source backed by a public GitHub repository: the git tree API for
//! the candidate list, raw.githubusercontent.com for content.

use std::collections::HashMap;

use serde::Deserialize;

use crate::source::cache::DiskCache;
use crate::source::{SourceError, TextSource};
use crate::text::strip;

pub struct GitHubSource {
    owner: String,
    repo: String,
    branch: String,
    extension: String,
    strip_comments: bool,
    memory: HashMap<String, String>,
    disk: Option<DiskCache>,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

impl GitHubSource {
    pub fn new(
        owner: &str,
        repo: &str,
        branch: &str,
        extension: &str,
        strip_comments: bool,
    ) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            extension: extension.to_lowercase(),
            strip_comments,
            memory: HashMap::new(),
            disk: DiskCache::new("files"),
        }
    }

    fn tree_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/git/trees/{}?recursive=1",
            self.owner, self.repo, self.branch
        )
    }

    fn raw_url(&self, path: &str) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}",
            self.owner, self.repo, self.branch, path
        )
    }

    /// Blob paths matching the configured extension, sorted for a stable
    /// dropdown order.
    fn candidate_paths(payload: &TreeResponse, extension: &str) -> Vec<String> {
        let mut paths: Vec<String> = payload
            .tree
            .iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| entry.path.clone())
            .filter(|path| path.to_lowercase().ends_with(extension))
            .collect();
        paths.sort();
        paths
    }
}

impl TextSource for GitHubSource {
    fn list_candidates(&mut self) -> Result<Vec<String>, SourceError> {
        let body = http_get(&self.tree_url())?;
        let payload: TreeResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Network(e.to_string()))?;
        Ok(Self::candidate_paths(&payload, &self.extension))
    }

    fn fetch_content(&mut self, identifier: &str) -> Result<String, SourceError> {
        if let Some(text) = self.memory.get(identifier) {
            return Ok(text.clone());
        }
        if let Some(text) = self.disk.as_ref().and_then(|d| d.get(identifier)) {
            self.memory.insert(identifier.to_string(), text.clone());
            return Ok(text);
        }

        let raw = http_get(&self.raw_url(identifier)).map_err(|e| match e {
            SourceError::NotFound(_) => SourceError::NotFound(identifier.to_string()),
            other => other,
        })?;
        let text = strip::normalize_source(&raw, self.strip_comments);

        if let Some(ref disk) = self.disk {
            disk.put(identifier, &text);
        }
        self.memory.insert(identifier.to_string(), text.clone());
        Ok(text)
    }
}

#[cfg(feature = "network")]
fn http_get(url: &str) -> Result<String, SourceError> {
    use reqwest::StatusCode;

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .user_agent(concat!("labtype/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SourceError::Network(e.to_string()))?;
    let response = client
        .get(url)
        .header("Accept", "application/vnd.github+json")
        .send()
        .map_err(|e| SourceError::Network(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        response
            .text()
            .map_err(|e| SourceError::Network(e.to_string()))
    } else if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        // Unauthenticated API quota exhaustion comes back as 403.
        Err(SourceError::RateLimited)
    } else if status == StatusCode::NOT_FOUND {
        Err(SourceError::NotFound(url.to_string()))
    } else {
        Err(SourceError::Network(format!("{url} returned {status}")))
    }
}

#[cfg(not(feature = "network"))]
fn http_get(_url: &str) -> Result<String, SourceError> {
    Err(SourceError::Network(
        "built without the network feature".to_string(),
    ))
}
