use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, warn};
use tracing_unwrap::ResultExt;
use url::Url;

use super::{markdown, DirectoryEntry, Fetched, Repository, RepositorySource, UpstreamRelease};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "OpenMods/1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_base: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect_or_log("default API base is a valid URL"),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Payload of the `readme` and `contents/{file}` endpoints.
#[derive(Debug, Deserialize)]
struct EncodedContent {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// Unauthenticated client for the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, repository: &str, suffix: &str) -> String {
        format!("{}/repos/{}{}", self.api_base, repository, suffix)
    }

    fn contents_endpoint(&self, repository: &str, path: &str) -> String {
        self.endpoint(
            repository,
            &format!("/contents/{}", path.trim_start_matches('/')),
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Fetched<T> {
        debug!(%url, "GET");
        let response = match self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(%url, error = %e, "Request to GitHub failed");
                return Fetched::Failed;
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%url, "Not found upstream");
            return Fetched::Missing;
        }
        if !status.is_success() {
            warn!(%url, %status, "Unexpected status from GitHub");
            return Fetched::Failed;
        }

        match response.json::<T>().await {
            Ok(value) => Fetched::Found(value),
            Err(e) => {
                error!(%url, error = %e, "Failed to decode GitHub response");
                Fetched::Failed
            }
        }
    }

    async fn get_decoded(&self, url: &str) -> Fetched<String> {
        match self.get_json::<EncodedContent>(url).await {
            Fetched::Found(payload) => decode_content(&payload, url),
            Fetched::Missing => Fetched::Missing,
            Fetched::Failed => Fetched::Failed,
        }
    }
}

/// Decodes a base64 `content` field. The API wraps the payload every 60
/// characters, so line breaks are stripped first.
fn decode_content(payload: &EncodedContent, url: &str) -> Fetched<String> {
    if payload.content.is_empty() {
        return Fetched::Missing;
    }
    if let Some(encoding) = payload.encoding.as_deref() {
        if encoding != "base64" {
            warn!(%url, encoding, "Unsupported content encoding");
            return Fetched::Failed;
        }
    }
    let compact: String = payload
        .content
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect();
    match base64::engine::general_purpose::STANDARD.decode(compact) {
        Ok(bytes) => Fetched::Found(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            error!(%url, error = %e, "Failed to decode base64 content");
            Fetched::Failed
        }
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn repository(&self, repository: &str) -> Fetched<Repository> {
        if repository.trim().is_empty() {
            return Fetched::Missing;
        }
        self.get_json(&self.endpoint(repository, "")).await
    }

    async fn readme_html(&self, repository: &str) -> Fetched<String> {
        if repository.trim().is_empty() {
            return Fetched::Missing;
        }
        let url = self.endpoint(repository, "/readme");
        let fetched = self.get_decoded(&url).await;
        if let Fetched::Found(markdown) = &fetched {
            info!(repository, length = markdown.len(), "Fetched README");
        }
        fetched.map(|markdown| markdown::render_html(&markdown))
    }

    async fn releases(&self, repository: &str) -> Fetched<Vec<UpstreamRelease>> {
        if repository.trim().is_empty() {
            return Fetched::Missing;
        }
        self.get_json(&self.endpoint(repository, "/releases")).await
    }

    async fn directory(&self, repository: &str, path: &str) -> Fetched<Vec<DirectoryEntry>> {
        if repository.trim().is_empty() {
            return Fetched::Missing;
        }
        self.get_json(&self.contents_endpoint(repository, path))
            .await
    }

    async fn raw_file(&self, repository: &str, path: &str) -> Fetched<String> {
        if repository.trim().is_empty() || path.trim().is_empty() {
            return Fetched::Missing;
        }
        self.get_decoded(&self.contents_endpoint(repository, path))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GitHubClient {
        let config = GitHubConfig {
            api_base: Url::parse(&server.uri()).unwrap(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        };
        GitHubClient::new(&config).unwrap()
    }

    fn encoded(text: &str) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        // Mimic the API's wrapped payload.
        encoded
            .as_bytes()
            .chunks(8)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn fetches_repository_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widget"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "widget",
                "full_name": "octo/widget",
                "description": "A widget mod",
                "stargazers_count": 42,
                "html_url": "https://github.com/octo/widget",
                "language": "Rust"
            })))
            .mount(&server)
            .await;

        let repo = client_for(&server).repository("octo/widget").await;
        let repo = repo.found().unwrap();
        assert_eq!(repo.full_name, "octo/widget");
        assert_eq!(repo.description.as_deref(), Some("A widget mod"));
        assert_eq!(repo.stars, 42);
    }

    #[tokio::test]
    async fn not_found_is_missing_and_server_error_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/flaky/releases"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.repository("octo/gone").await, Fetched::Missing);
        assert_eq!(client.releases("octo/flaky").await, Fetched::Failed);
        assert!(client.releases("octo/flaky").await.into_list().is_empty());
    }

    #[tokio::test]
    async fn empty_identifier_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.repository("").await, Fetched::Missing);
        assert_eq!(client.readme_html("  ").await, Fetched::Missing);
        assert_eq!(client.raw_file("", "FAQ.md").await, Fetched::Missing);
        assert_eq!(client.raw_file("octo/widget", "").await, Fetched::Missing);
        assert!(client.directory("", ".openmods/img").await.into_list().is_empty());
    }

    #[tokio::test]
    async fn decodes_wrapped_raw_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widget/contents/.openmods/install.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "install.json",
                "encoding": "base64",
                "content": encoded("{\"target\": \"BepInEx/plugins\"}")
            })))
            .mount(&server)
            .await;

        let text = client_for(&server)
            .raw_file("octo/widget", "/.openmods/install.json")
            .await;
        assert_eq!(
            text,
            Fetched::Found("{\"target\": \"BepInEx/plugins\"}".to_string())
        );
    }

    #[tokio::test]
    async fn renders_readme() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widget/readme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "encoding": "base64",
                "content": encoded("# Widget\n\n| a | b |\n|---|---|\n| 1 | 2 |\n")
            })))
            .mount(&server)
            .await;

        let html = client_for(&server)
            .readme_html("octo/widget")
            .await
            .found()
            .unwrap();
        assert!(html.contains("<h1>Widget</h1>"));
        assert!(html.contains("<table>"));
    }

    #[tokio::test]
    async fn lists_releases_with_assets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widget/releases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "tag_name": "v1.0.0",
                "name": "First",
                "body": "notes",
                "published_at": "2026-02-01T10:00:00Z",
                "html_url": "https://github.com/octo/widget/releases/tag/v1.0.0",
                "assets": [{
                    "name": "widget.zip",
                    "size": 1024,
                    "browser_download_url": "https://github.com/octo/widget/releases/download/v1.0.0/widget.zip",
                    "content_type": "application/zip"
                }]
            }])))
            .mount(&server)
            .await;

        let releases = client_for(&server).releases("octo/widget").await.into_list();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].tag_name, "v1.0.0");
        assert!(releases[0].published_at.is_some());
        assert_eq!(releases[0].assets[0].size, 1024);
        assert_eq!(
            releases[0].assets[0].content_type.as_deref(),
            Some("application/zip")
        );
    }

    #[tokio::test]
    async fn file_path_listed_as_directory_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widget/contents/.openmods/img"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "img",
                "type": "file",
                "content": ""
            })))
            .mount(&server)
            .await;

        let listing = client_for(&server)
            .directory("octo/widget", ".openmods/img")
            .await;
        assert_eq!(listing, Fetched::Failed);
    }

    #[tokio::test]
    async fn slow_upstream_times_out_as_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let config = GitHubConfig {
            api_base: Url::parse(&server.uri()).unwrap(),
            timeout: Duration::from_millis(200),
            ..Default::default()
        };
        let client = GitHubClient::new(&config).unwrap();
        assert_eq!(client.repository("octo/slow").await, Fetched::Failed);
    }
}
