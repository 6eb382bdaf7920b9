//! Mirrors a mod's GitHub repository into the database.
//!
//! A pass loads the mod into a [`ModDraft`], verifies the repository is
//! reachable, fetches the remaining facets concurrently, applies them to the
//! draft and commits once. Passes for the same mod are serialized through
//! [`ModLocks`]; anything that stops a pass early leaves the database as it
//! was.

mod draft;
mod facets;
pub mod parse;

pub use draft::ModDraft;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use futures::{stream, StreamExt};
use sea_orm::{prelude::*, DatabaseConnection};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::entities::{prelude::*, *};
use crate::error::SyncError;
use crate::upstream::{Fetched, RepositorySource};

pub const LINK_PATHS: [&str; 4] = [
    ".openmods/LINKS.md",
    ".openmods/LINK.md",
    ".openmods/links.md",
    "LINKS.md",
];
pub const FAQ_PATHS: [&str; 3] = [".openmods/FAQ.md", ".openmods/faq.md", "FAQ.md"];
pub const INSTALL_PATHS: [&str; 2] = [".openmods/install.json", "install.json"];
pub const IMAGE_DIR: &str = ".openmods/img";

/// What a successful pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub readme_updated: bool,
    pub releases_created: usize,
    pub releases_updated: usize,
    pub assets_created: usize,
    pub assets_updated: usize,
    /// Size of the replacement link set, if one was written.
    pub links: Option<usize>,
    pub faqs: Option<usize>,
    pub install_updated: bool,
    /// Number of images a previously empty gallery was seeded with.
    pub gallery_images: usize,
    pub thumbnail_updated: bool,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "releases +{}/~{}, assets +{}/~{}",
            self.releases_created, self.releases_updated, self.assets_created, self.assets_updated
        )?;
        if let Some(links) = self.links {
            write!(f, ", {} links", links)?;
        }
        if let Some(faqs) = self.faqs {
            write!(f, ", {} faqs", faqs)?;
        }
        if self.readme_updated {
            write!(f, ", readme")?;
        }
        if self.install_updated {
            write!(f, ", install.json")?;
        }
        if self.gallery_images > 0 {
            write!(f, ", {} gallery images", self.gallery_images)?;
        }
        if self.thumbnail_updated {
            write!(f, ", thumbnail")?;
        }
        Ok(())
    }
}

type LockTable = Arc<Mutex<HashMap<i32, Arc<tokio::sync::Mutex<()>>>>>;

/// One async mutex per mod id, held by refreshes and media edits. Only
/// serializes work inside this process; several processes sharing a database
/// must coordinate themselves.
#[derive(Debug, Clone, Default)]
pub struct ModLocks {
    locks: LockTable,
}

impl ModLocks {
    pub async fn acquire(&self, mod_id: i32) -> ModLockGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(mod_id).or_default().clone()
        };
        ModLockGuard {
            mod_id,
            guard: Some(lock.lock_owned().await),
            locks: self.locks.clone(),
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Releases the mod's mutex on drop, and forgets it once nobody else holds
/// or waits for it.
#[derive(Debug)]
pub struct ModLockGuard {
    mod_id: i32,
    guard: Option<OwnedMutexGuard<()>>,
    locks: LockTable,
}

impl Drop for ModLockGuard {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        self.guard.take();
        // Waiters hold a clone, so a count of one means only the table is left.
        if locks
            .get(&self.mod_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.mod_id);
        }
    }
}

/// `owner/name` from a repository URL such as `https://github.com/owner/name/`.
pub fn repository_id(mod_id: i32, url: &str) -> Result<String, SyncError> {
    let parsed = Url::parse(url.trim()).map_err(|source| SyncError::InvalidRepositoryUrl {
        mod_id,
        url: url.to_string(),
        source,
    })?;
    let path = parsed.path().trim_matches('/');
    Ok(path.strip_suffix(".git").unwrap_or(path).to_string())
}

pub struct Synchronizer<S> {
    db: DatabaseConnection,
    source: S,
    locks: ModLocks,
}

impl<S> Synchronizer<S>
where
    S: RepositorySource,
{
    pub fn new(db: DatabaseConnection, source: S) -> Self {
        Self {
            db,
            source,
            locks: ModLocks::default(),
        }
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Replaces a mod's gallery once no refresh of it is running.
    pub async fn update_gallery(&self, mod_id: i32, image_urls: Vec<String>) -> Result<(), SyncError> {
        let _guard = self.locks.acquire(mod_id).await;
        draft::update_gallery(&self.db, mod_id, image_urls).await?;
        info!(mod_id, "Replaced gallery");
        Ok(())
    }

    pub async fn update_thumbnail(&self, mod_id: i32, image_url: String) -> Result<(), SyncError> {
        let _guard = self.locks.acquire(mod_id).await;
        draft::update_thumbnail(&self.db, mod_id, image_url).await?;
        info!(mod_id, "Replaced thumbnail");
        Ok(())
    }

    /// Runs one refresh pass for `mod_id`. Waits for any pass already running
    /// for the same mod.
    pub async fn synchronize(&self, mod_id: i32) -> Result<SyncReport, SyncError> {
        let _guard = self.locks.acquire(mod_id).await;
        let result = self.run(mod_id).await;
        match &result {
            Ok(report) => info!(mod_id, %report, "Refreshed mod"),
            Err(e) => error!(mod_id, error = %e, "Refresh failed"),
        }
        result
    }

    async fn run(&self, mod_id: i32) -> Result<SyncReport, SyncError> {
        let mut draft = ModDraft::load(&self.db, mod_id).await?;
        let url = draft
            .record
            .github_repo_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SyncError::MissingRepositoryUrl(mod_id))?;
        let repository = repository_id(mod_id, &url)?;
        debug!(mod_id, %repository, "Starting refresh");

        let profile = match self.source.repository(&repository).await {
            Fetched::Found(profile) => profile,
            Fetched::Missing => {
                warn!(mod_id, %repository, facet = "profile", "Repository not found");
                return Err(SyncError::RepositoryUnavailable { mod_id, repository });
            }
            Fetched::Failed => {
                warn!(mod_id, %repository, facet = "profile", "Repository unreachable");
                return Err(SyncError::RepositoryUnavailable { mod_id, repository });
            }
        };
        debug!(mod_id, full_name = %profile.full_name, stars = profile.stars, "Fetched profile");
        draft.apply_profile(&profile);

        let (readme, releases, links, faqs, install, images) = tokio::join!(
            self.source.readme_html(&repository),
            self.source.releases(&repository),
            self.probe(mod_id, &repository, "links", &LINK_PATHS),
            self.probe(mod_id, &repository, "faq", &FAQ_PATHS),
            self.probe(mod_id, &repository, "install", &INSTALL_PATHS),
            self.source.directory(&repository, IMAGE_DIR),
        );

        let now = Utc::now();
        let mut report = SyncReport::default();
        draft.apply_readme(settle(readme, mod_id, &repository, "readme").found(), &mut report);
        draft.apply_releases(
            settle(releases, mod_id, &repository, "releases").into_list(),
            now,
            &mut report,
        );
        draft.apply_links(links, &mut report);
        draft.apply_faqs(faqs, &mut report);
        draft.apply_install(install, &mut report);
        let images = settle(images, mod_id, &repository, "images").into_list();
        draft.apply_images(&images, &mut report);
        draft.touch(now);

        draft.commit(&self.db).await?;
        Ok(report)
    }

    /// First non-empty file among `paths`, in order.
    async fn probe(
        &self,
        mod_id: i32,
        repository: &str,
        facet: &'static str,
        paths: &[&str],
    ) -> Option<String> {
        for path in paths {
            match self.source.raw_file(repository, path).await {
                Fetched::Found(content) if !content.is_empty() => {
                    debug!(mod_id, repository, facet, path, "Found convention file");
                    return Some(content);
                }
                Fetched::Failed => {
                    warn!(mod_id, repository, facet, path, "Upstream unavailable, trying next path");
                }
                Fetched::Found(_) | Fetched::Missing => {}
            }
        }
        None
    }

    /// Refreshes every active mod with a repository, `concurrency` at a time.
    /// One failing mod does not stop the others.
    pub async fn synchronize_all(
        &self,
        concurrency: usize,
    ) -> Result<Vec<(i32, Result<SyncReport, SyncError>)>, SyncError> {
        let mod_ids: Vec<i32> = GameMod::find()
            .filter(game_mod::Column::GithubRepoUrl.is_not_null())
            .filter(game_mod::Column::IsArchived.eq(false))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();
        info!(mods = mod_ids.len(), concurrency, "Refreshing all mods");

        let mut results: Vec<_> = stream::iter(mod_ids)
            .map(|mod_id| async move { (mod_id, self.synchronize(mod_id).await) })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;
        results.sort_by_key(|(mod_id, _)| *mod_id);
        Ok(results)
    }
}

/// Logs a degraded facet and keeps whatever data arrived.
fn settle<T>(fetched: Fetched<T>, mod_id: i32, repository: &str, facet: &'static str) -> Fetched<T> {
    if let Fetched::Failed = fetched {
        warn!(mod_id, repository, facet, "Upstream unavailable, keeping stored data");
    }
    fetched
}
