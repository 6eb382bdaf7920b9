//! In-memory copy of one mod and everything a refresh may touch.
//!
//! A draft is loaded once, mutated by the facets without any database access,
//! and written back in a single transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{prelude::*, ActiveValue, IntoActiveModel, TransactionTrait};
use tracing::{debug, warn};

use super::parse::{ParsedFaq, ParsedLink};
use crate::entities::{prelude::*, *};
use crate::error::SyncError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDraft {
    /// `None` until the asset has been inserted.
    pub id: Option<i32>,
    pub name: String,
    pub size: i64,
    pub download_url: String,
    pub content_type: Option<String>,
    /// Never written by a refresh.
    pub download_count: i32,
    pub(super) dirty: bool,
}

impl From<release_asset::Model> for AssetDraft {
    fn from(model: release_asset::Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            size: model.size,
            download_url: model.download_url,
            content_type: model.content_type,
            download_count: model.download_count,
            dirty: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseDraft {
    pub id: Option<i32>,
    pub version: String,
    pub released_at: DateTime<Utc>,
    pub html_url: String,
    pub assets: Vec<AssetDraft>,
    asset_index: HashMap<String, usize>,
    pub(super) dirty: bool,
}

impl ReleaseDraft {
    pub(super) fn new(version: String, released_at: DateTime<Utc>, html_url: String) -> Self {
        Self {
            id: None,
            version,
            released_at,
            html_url,
            assets: Vec::new(),
            asset_index: HashMap::new(),
            dirty: true,
        }
    }

    fn loaded(model: release::Model, assets: Vec<release_asset::Model>) -> Self {
        let mut draft = Self {
            id: Some(model.id),
            version: model.version,
            released_at: model.released_at,
            html_url: model.html_url,
            assets: Vec::with_capacity(assets.len()),
            asset_index: HashMap::new(),
            dirty: false,
        };
        for asset in assets {
            draft.push_asset(asset.into());
        }
        draft
    }

    pub fn asset_mut(&mut self, name: &str) -> Option<&mut AssetDraft> {
        let index = *self.asset_index.get(name)?;
        self.assets.get_mut(index)
    }

    pub(super) fn push_asset(&mut self, asset: AssetDraft) {
        self.asset_index.insert(asset.name.clone(), self.assets.len());
        self.assets.push(asset);
    }
}

/// Mod columns a refresh rewrote. Anything not flagged is left as stored,
/// so edits committed while the pass was fetching survive it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changed {
    pub long_description: bool,
    pub install_json: bool,
    pub image_url: bool,
    pub gallery: bool,
}

#[derive(Debug, Clone)]
pub struct ModDraft {
    pub record: game_mod::Model,
    pub gallery: Vec<String>,
    /// False when the stored gallery could not be decoded.
    pub(super) gallery_readable: bool,
    pub releases: Vec<ReleaseDraft>,
    release_index: HashMap<String, usize>,
    /// `Some` replaces the stored set on commit.
    pub links: Option<Vec<ParsedLink>>,
    pub faqs: Option<Vec<ParsedFaq>>,
    pub changed: Changed,
}

impl ModDraft {
    /// Loads a mod with its releases and their assets.
    pub async fn load<C>(db: &C, mod_id: i32) -> Result<Self, SyncError>
    where
        C: ConnectionTrait,
    {
        debug!(mod_id, "Loading mod");
        let record = GameMod::find_by_id(mod_id)
            .one(db)
            .await?
            .ok_or(SyncError::ModNotFound(mod_id))?;

        let releases = Release::find()
            .filter(release::Column::ModId.eq(mod_id))
            .find_with_related(ReleaseAsset)
            .all(db)
            .await?;
        debug!(mod_id, releases = releases.len(), "Loaded releases");

        Ok(Self::from_models(record, releases))
    }

    pub fn from_models(
        record: game_mod::Model,
        releases: Vec<(release::Model, Vec<release_asset::Model>)>,
    ) -> Self {
        let decoded = decode_gallery(record.id, &record.gallery_image_urls);
        let mut draft = Self {
            gallery_readable: decoded.is_some(),
            gallery: decoded.unwrap_or_default(),
            record,
            releases: Vec::with_capacity(releases.len()),
            release_index: HashMap::new(),
            links: None,
            faqs: None,
            changed: Changed::default(),
        };
        for (release, assets) in releases {
            draft.push_release(ReleaseDraft::loaded(release, assets));
        }
        draft
    }

    pub(super) fn release_position(&self, version: &str) -> Option<usize> {
        self.release_index.get(version).copied()
    }

    pub(super) fn push_release(&mut self, release: ReleaseDraft) -> usize {
        let index = self.releases.len();
        self.release_index.insert(release.version.clone(), index);
        self.releases.push(release);
        index
    }

    /// Writes the draft in one transaction. Nothing is written if any
    /// statement fails.
    pub async fn commit(self, db: &DatabaseConnection) -> Result<(), SyncError> {
        let mod_id = self.record.id;
        db.transaction::<_, (), DbErr>(|txn| Box::pin(async move { self.write(txn).await }))
            .await?;
        debug!(mod_id, "Committed refresh");
        Ok(())
    }

    async fn write<C>(self, txn: &C) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let mod_id = self.record.id;
        let changed = self.changed;
        debug!(mod_id, ?changed, "Updating mod");

        let mut active_model = game_mod::ActiveModel {
            id: ActiveValue::Unchanged(mod_id),
            stars: ActiveValue::Set(self.record.stars),
            description: ActiveValue::Set(self.record.description),
            updated_at: ActiveValue::Set(self.record.updated_at),
            ..Default::default()
        };
        if changed.long_description {
            active_model.long_description = ActiveValue::Set(self.record.long_description);
        }
        if changed.install_json {
            active_model.install_json = ActiveValue::Set(self.record.install_json);
        }
        if changed.image_url {
            active_model.image_url = ActiveValue::Set(self.record.image_url);
        }
        if changed.gallery {
            let gallery = serde_json::to_string(&self.gallery)
                .map_err(|e| DbErr::Custom(format!("Failed to encode gallery: {}", e)))?;
            active_model.gallery_image_urls = ActiveValue::Set(gallery);
        }
        active_model.update(txn).await?;

        for release in self.releases {
            let release_id = match release.id {
                Some(id) if release.dirty => {
                    debug!(mod_id, version = %release.version, "Updating release");
                    release::ActiveModel {
                        id: ActiveValue::Unchanged(id),
                        released_at: ActiveValue::Set(release.released_at),
                        html_url: ActiveValue::Set(release.html_url),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    id
                }
                Some(id) => id,
                None => {
                    debug!(mod_id, version = %release.version, "Inserting release");
                    let new_release = release::ActiveModel {
                        mod_id: ActiveValue::Set(mod_id),
                        version: ActiveValue::Set(release.version),
                        released_at: ActiveValue::Set(release.released_at),
                        html_url: ActiveValue::Set(release.html_url),
                        ..Default::default()
                    };
                    Release::insert(new_release).exec(txn).await?.last_insert_id
                }
            };

            for asset in release.assets.into_iter().filter(|a| a.dirty) {
                match asset.id {
                    Some(id) => {
                        // download_count stays NotSet.
                        release_asset::ActiveModel {
                            id: ActiveValue::Unchanged(id),
                            size: ActiveValue::Set(asset.size),
                            download_url: ActiveValue::Set(asset.download_url),
                            content_type: ActiveValue::Set(asset.content_type),
                            ..Default::default()
                        }
                        .update(txn)
                        .await?;
                    }
                    None => {
                        let new_asset = release_asset::ActiveModel {
                            release_id: ActiveValue::Set(release_id),
                            name: ActiveValue::Set(asset.name),
                            size: ActiveValue::Set(asset.size),
                            download_url: ActiveValue::Set(asset.download_url),
                            content_type: ActiveValue::Set(asset.content_type),
                            download_count: ActiveValue::Set(0),
                            ..Default::default()
                        };
                        ReleaseAsset::insert(new_asset).exec(txn).await?;
                    }
                }
            }
        }

        if let Some(links) = self.links {
            replace_links(txn, mod_id, links).await?;
        }
        if let Some(faqs) = self.faqs {
            replace_faqs(txn, mod_id, faqs).await?;
        }
        Ok(())
    }
}

async fn replace_links<C>(txn: &C, mod_id: i32, links: Vec<ParsedLink>) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let removed = ModLink::delete_many()
        .filter(mod_link::Column::ModId.eq(mod_id))
        .exec(txn)
        .await?;
    debug!(mod_id, removed = removed.rows_affected, added = links.len(), "Replacing links");
    if links.is_empty() {
        return Ok(());
    }
    ModLink::insert_many(links.into_iter().map(|link| mod_link::ActiveModel {
        mod_id: ActiveValue::Set(mod_id),
        label: ActiveValue::Set(link.label),
        icon: ActiveValue::Set(link.icon),
        url: ActiveValue::Set(link.url),
        ..Default::default()
    }))
    .exec(txn)
    .await?;
    Ok(())
}

async fn replace_faqs<C>(txn: &C, mod_id: i32, faqs: Vec<ParsedFaq>) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let removed = ModFaq::delete_many()
        .filter(mod_faq::Column::ModId.eq(mod_id))
        .exec(txn)
        .await?;
    debug!(mod_id, removed = removed.rows_affected, added = faqs.len(), "Replacing FAQs");
    if faqs.is_empty() {
        return Ok(());
    }
    ModFaq::insert_many(faqs.into_iter().map(|faq| mod_faq::ActiveModel {
        mod_id: ActiveValue::Set(mod_id),
        question: ActiveValue::Set(faq.question),
        answer: ActiveValue::Set(faq.answer),
        ..Default::default()
    }))
    .exec(txn)
    .await?;
    Ok(())
}

/// `None` when the stored value is not a JSON list of URLs.
fn decode_gallery(mod_id: i32, raw: &str) -> Option<Vec<String>> {
    if raw.trim().is_empty() {
        return Some(Vec::new());
    }
    match serde_json::from_str(raw) {
        Ok(gallery) => Some(gallery),
        Err(e) => {
            warn!(mod_id, error = %e, "Stored gallery is not a JSON list, leaving it alone");
            None
        }
    }
}

/// Replaces a mod's gallery. Callers serialize against refreshes through
/// [`super::Synchronizer::update_gallery`].
pub(super) async fn update_gallery(
    db: &DatabaseConnection,
    mod_id: i32,
    image_urls: Vec<String>,
) -> Result<(), SyncError> {
    let record = GameMod::find_by_id(mod_id)
        .one(db)
        .await?
        .ok_or(SyncError::ModNotFound(mod_id))?;
    let gallery = serde_json::to_string(&image_urls)
        .map_err(|e| DbErr::Custom(format!("Failed to encode gallery: {}", e)))?;
    let mut active_model = record.into_active_model();
    active_model.gallery_image_urls = ActiveValue::Set(gallery);
    active_model.updated_at = ActiveValue::Set(Utc::now());
    active_model.update(db).await?;
    Ok(())
}

/// Sets a mod's thumbnail. See [`update_gallery`].
pub(super) async fn update_thumbnail(
    db: &DatabaseConnection,
    mod_id: i32,
    image_url: String,
) -> Result<(), SyncError> {
    let record = GameMod::find_by_id(mod_id)
        .one(db)
        .await?
        .ok_or(SyncError::ModNotFound(mod_id))?;
    let mut active_model = record.into_active_model();
    active_model.image_url = ActiveValue::Set(Some(image_url));
    active_model.updated_at = ActiveValue::Set(Utc::now());
    active_model.update(db).await?;
    Ok(())
}
