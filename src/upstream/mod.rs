//! Read-only view of a hosted repository.
//!
//! Every call degrades to [`Fetched::Missing`] or [`Fetched::Failed`] instead of
//! returning an error, so one unreachable file never aborts a whole refresh.

mod github;
pub mod markdown;

pub use github::{GitHubClient, GitHubConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Outcome of a single upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Found(T),
    /// The upstream answered, but there is nothing at that location.
    Missing,
    /// Transport error, timeout, unexpected status or undecodable body.
    Failed,
}

impl<T> Fetched<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Fetched::Found(value) => Some(value),
            Fetched::Missing | Fetched::Failed => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Fetched<U> {
        match self {
            Fetched::Found(value) => Fetched::Found(f(value)),
            Fetched::Missing => Fetched::Missing,
            Fetched::Failed => Fetched::Failed,
        }
    }
}

impl<T> Fetched<Vec<T>> {
    /// Collapses a list result, treating any failure as an empty list.
    pub fn into_list(self) -> Vec<T> {
        self.found().unwrap_or_default()
    }
}

/// Repository profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    #[serde(rename = "stargazers_count", default)]
    pub stars: i32,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpstreamRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// Unset for draft releases.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub html_url: String,
    #[serde(default)]
    pub assets: Vec<UpstreamAsset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpstreamAsset {
    pub name: String,
    #[serde(default)]
    pub size: i64,
    pub browser_download_url: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl DirectoryEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// The calls a mod refresh makes against its repository host.
///
/// `repository` is an `owner/name` identifier. Implementations must answer
/// [`Fetched::Missing`] for an empty identifier without touching the network.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn repository(&self, repository: &str) -> Fetched<Repository>;

    /// README rendered to HTML.
    async fn readme_html(&self, repository: &str) -> Fetched<String>;

    async fn releases(&self, repository: &str) -> Fetched<Vec<UpstreamRelease>>;

    async fn directory(&self, repository: &str, path: &str) -> Fetched<Vec<DirectoryEntry>>;

    /// Decoded text of the file at `path`.
    async fn raw_file(&self, repository: &str, path: &str) -> Fetched<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_list_collapses_to_empty() {
        let fetched: Fetched<Vec<u8>> = Fetched::Failed;
        assert!(fetched.into_list().is_empty());
        assert_eq!(Fetched::Found(vec![1, 2]).into_list(), vec![1, 2]);
    }

    #[test]
    fn directory_entry_kinds_deserialize() {
        let entries: Vec<DirectoryEntry> = serde_json::from_str(
            r#"[
                {"name": "a.png", "path": ".openmods/img/a.png", "type": "file", "download_url": "https://raw/a.png"},
                {"name": "nested", "path": ".openmods/img/nested", "type": "dir", "download_url": null},
                {"name": "odd", "path": ".openmods/img/odd", "type": "something-new"}
            ]"#,
        )
        .unwrap();
        assert_eq!(entries[0].kind, EntryKind::File);
        assert!(entries[0].is_file());
        assert_eq!(entries[1].kind, EntryKind::Dir);
        assert_eq!(entries[1].download_url, None);
        assert_eq!(entries[2].kind, EntryKind::Other);
    }

    #[test]
    fn draft_release_has_no_publish_time() {
        let release: UpstreamRelease = serde_json::from_str(
            r#"{"tag_name": "v2.0.0-rc1", "name": null, "html_url": "https://github.com/o/r/releases/tag/v2.0.0-rc1", "published_at": null}"#,
        )
        .unwrap();
        assert_eq!(release.published_at, None);
        assert!(release.assets.is_empty());
    }
}
