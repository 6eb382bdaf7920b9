//! Shared fixtures for database-backed tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::entities::*;
use crate::migrator::Migrator;
use crate::sync::IMAGE_DIR;
use crate::upstream::{
    DirectoryEntry, EntryKind, Fetched, Repository, RepositorySource, UpstreamAsset,
    UpstreamRelease,
};

pub const INSTALL_JSON: &str = r#"{"target": "BepInEx/plugins"}"#;

pub fn timestamp(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, day, 12, 0, 0).unwrap()
}

pub async fn memory_database() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn seed_developer(db: &DatabaseConnection, username: &str) -> developer::Model {
    developer::ActiveModel {
        github_username: ActiveValue::Set(username.to_string()),
        display_name: ActiveValue::Set(None),
        joined_at: ActiveValue::Set(timestamp(1)),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_mod(
    db: &DatabaseConnection,
    developer_id: i32,
    repo_url: Option<&str>,
) -> game_mod::Model {
    game_mod::ActiveModel {
        developer_id: ActiveValue::Set(developer_id),
        name: ActiveValue::Set("Widget".to_string()),
        description: ActiveValue::Set(None),
        long_description: ActiveValue::Set(None),
        image_url: ActiveValue::Set(None),
        github_repo_url: ActiveValue::Set(repo_url.map(str::to_string)),
        gallery_image_urls: ActiveValue::Set("[]".to_string()),
        install_json: ActiveValue::Set(None),
        stars: ActiveValue::Set(0),
        is_archived: ActiveValue::Set(false),
        created_at: ActiveValue::Set(timestamp(1)),
        updated_at: ActiveValue::Set(timestamp(1)),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_api_key(db: &DatabaseConnection, developer_id: i32, key: &str) -> api_key::Model {
    api_key::ActiveModel {
        developer_id: ActiveValue::Set(developer_id),
        name: ActiveValue::Set("ci".to_string()),
        key: ActiveValue::Set(key.to_string()),
        created_at: ActiveValue::Set(timestamp(1)),
        last_used_at: ActiveValue::Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// What [`FakeSource`] answers. Files and directories not in the maps are
/// `Missing`.
#[derive(Debug, Clone)]
pub struct FakeState {
    pub repository_id: String,
    pub repository: Fetched<Repository>,
    pub readme: Fetched<String>,
    pub releases: Fetched<Vec<UpstreamRelease>>,
    pub files: HashMap<String, Fetched<String>>,
    pub directories: HashMap<String, Fetched<Vec<DirectoryEntry>>>,
    /// Applied before every answer.
    pub delay: Option<Duration>,
    requested: Vec<String>,
}

/// In-memory repository host. Clones share state, so a test can keep a
/// handle and change the upstream between passes.
#[derive(Debug, Clone)]
pub struct FakeSource {
    state: Arc<Mutex<FakeState>>,
}

fn image(name: &str) -> DirectoryEntry {
    DirectoryEntry {
        name: name.to_string(),
        path: format!("{}/{}", IMAGE_DIR, name),
        kind: EntryKind::File,
        download_url: Some(format!("https://raw.example/{}", name)),
    }
}

fn asset(tag: &str, name: &str) -> UpstreamAsset {
    UpstreamAsset {
        name: name.to_string(),
        size: 4096,
        browser_download_url: format!("https://github.com/octo/widget/releases/download/{}/{}", tag, name),
        content_type: Some("application/zip".to_string()),
    }
}

impl FakeSource {
    /// A repository with a profile, README, two releases (three assets),
    /// two links, two FAQs, an install manifest and three image entries.
    pub fn populated(repository_id: &str) -> Self {
        let releases = vec![
            UpstreamRelease {
                tag_name: "v1.1.0".to_string(),
                name: Some("Widget 1.1".to_string()),
                body: None,
                published_at: Some(timestamp(10)),
                html_url: "https://github.com/octo/widget/releases/tag/v1.1.0".to_string(),
                assets: vec![asset("v1.1.0", "widget.zip"), asset("v1.1.0", "widget-extras.zip")],
            },
            UpstreamRelease {
                tag_name: "v1.0.0".to_string(),
                name: None,
                body: None,
                published_at: Some(timestamp(3)),
                html_url: "https://github.com/octo/widget/releases/tag/v1.0.0".to_string(),
                assets: vec![asset("v1.0.0", "widget.zip")],
            },
        ];
        let files = HashMap::from([
            (
                ".openmods/LINKS.md".to_string(),
                Fetched::Found(
                    "[icon:github] [Repo](https://github.com/octo/widget)\n[Wiki](https://wiki.example)\n"
                        .to_string(),
                ),
            ),
            (
                ".openmods/FAQ.md".to_string(),
                Fetched::Found("### Does it work?\nYes.\n### Where?\nEverywhere.\n".to_string()),
            ),
            (
                ".openmods/install.json".to_string(),
                Fetched::Found(INSTALL_JSON.to_string()),
            ),
        ]);
        let directories = HashMap::from([(
            IMAGE_DIR.to_string(),
            Fetched::Found(vec![image("icon.png"), image("readme.md"), image("cover.jpg")]),
        )]);

        Self::new(FakeState {
            repository_id: repository_id.to_string(),
            repository: Fetched::Found(Repository {
                name: "widget".to_string(),
                full_name: repository_id.to_string(),
                description: Some("A widget mod".to_string()),
                stars: 42,
                html_url: format!("https://github.com/{}", repository_id),
            }),
            readme: Fetched::Found("<h1>Widget</h1>".to_string()),
            releases: Fetched::Found(releases),
            files,
            directories,
            delay: None,
            requested: Vec::new(),
        })
    }

    pub fn new(state: FakeState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }

    /// Every call so far, as `kind:path`.
    pub fn requested(&self) -> Vec<String> {
        self.state.lock().unwrap().requested.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requested.len()
    }

    async fn answer<T>(
        &self,
        repository: &str,
        request: String,
        f: impl FnOnce(&FakeState) -> Fetched<T>,
    ) -> Fetched<T> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.requested.push(request);
            state.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.lock().unwrap();
        if repository.trim().is_empty() || repository != state.repository_id {
            return Fetched::Missing;
        }
        f(&state)
    }
}

#[async_trait]
impl RepositorySource for FakeSource {
    async fn repository(&self, repository: &str) -> Fetched<Repository> {
        self.answer(repository, "repository".to_string(), |s| s.repository.clone())
            .await
    }

    async fn readme_html(&self, repository: &str) -> Fetched<String> {
        self.answer(repository, "readme".to_string(), |s| s.readme.clone())
            .await
    }

    async fn releases(&self, repository: &str) -> Fetched<Vec<UpstreamRelease>> {
        self.answer(repository, "releases".to_string(), |s| s.releases.clone())
            .await
    }

    async fn directory(&self, repository: &str, path: &str) -> Fetched<Vec<DirectoryEntry>> {
        self.answer(repository, format!("dir:{}", path), |s| {
            s.directories.get(path).cloned().unwrap_or(Fetched::Missing)
        })
        .await
    }

    async fn raw_file(&self, repository: &str, path: &str) -> Fetched<String> {
        self.answer(repository, format!("file:{}", path), |s| {
            s.files.get(path).cloned().unwrap_or(Fetched::Missing)
        })
        .await
    }
}
