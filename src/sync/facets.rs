//! Reconciliation rules, one method per facet. None of these touch the
//! database; they only mutate the draft and record what changed.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::draft::{AssetDraft, ModDraft, ReleaseDraft};
use super::parse::{self, ParsedFaq, ParsedLink};
use super::SyncReport;
use crate::upstream::{DirectoryEntry, Repository, UpstreamRelease};

const PLACEHOLDER_MARKER: &str = "placeholder";

impl ModDraft {
    /// Upstream is authoritative for stars and the short description.
    pub fn apply_profile(&mut self, repository: &Repository) {
        self.record.stars = repository.stars;
        self.record.description = repository.description.clone();
    }

    pub fn apply_readme(&mut self, html: Option<String>, report: &mut SyncReport) {
        if let Some(html) = html.filter(|html| !html.is_empty()) {
            self.record.long_description = Some(html);
            self.changed.long_description = true;
            report.readme_updated = true;
        }
    }

    /// Upserts releases by tag and their assets by filename. Nothing is
    /// removed; `now` stands in for a missing publish time on new releases.
    pub fn apply_releases(
        &mut self,
        upstream: Vec<UpstreamRelease>,
        now: DateTime<Utc>,
        report: &mut SyncReport,
    ) {
        for upstream_release in upstream {
            let index = match self.release_position(&upstream_release.tag_name) {
                Some(index) => {
                    let release = &mut self.releases[index];
                    if let Some(published_at) = upstream_release.published_at {
                        release.released_at = published_at;
                    }
                    release.html_url = upstream_release.html_url;
                    if release.id.is_some() && !release.dirty {
                        report.releases_updated += 1;
                    }
                    release.dirty = true;
                    index
                }
                None => {
                    debug!(version = %upstream_release.tag_name, "New release");
                    report.releases_created += 1;
                    self.push_release(ReleaseDraft::new(
                        upstream_release.tag_name,
                        upstream_release.published_at.unwrap_or(now),
                        upstream_release.html_url,
                    ))
                }
            };
            let release = &mut self.releases[index];

            for upstream_asset in upstream_release.assets {
                match release.asset_mut(&upstream_asset.name) {
                    Some(asset) => {
                        asset.size = upstream_asset.size;
                        asset.download_url = upstream_asset.browser_download_url;
                        asset.content_type = upstream_asset.content_type;
                        if asset.id.is_some() && !asset.dirty {
                            report.assets_updated += 1;
                        }
                        asset.dirty = true;
                    }
                    None => {
                        report.assets_created += 1;
                        release.push_asset(AssetDraft {
                            id: None,
                            name: upstream_asset.name,
                            size: upstream_asset.size,
                            download_url: upstream_asset.browser_download_url,
                            content_type: upstream_asset.content_type,
                            download_count: 0,
                            dirty: true,
                        });
                    }
                }
            }
        }
    }

    /// Queues a full replacement of the link set, unless nothing parsed.
    pub fn apply_links(&mut self, content: Option<String>, report: &mut SyncReport) {
        let Some(content) = content else { return };
        let links: Vec<ParsedLink> = parse::parse_links(&content);
        if links.is_empty() {
            debug!(mod_id = self.record.id, "Links file has no usable links");
            return;
        }
        report.links = Some(links.len());
        self.links = Some(links);
    }

    pub fn apply_faqs(&mut self, content: Option<String>, report: &mut SyncReport) {
        let Some(content) = content else { return };
        let faqs: Vec<ParsedFaq> = parse::parse_faqs(&content);
        if faqs.is_empty() {
            debug!(mod_id = self.record.id, "FAQ file has no usable entries");
            return;
        }
        report.faqs = Some(faqs.len());
        self.faqs = Some(faqs);
    }

    /// Stored verbatim; validation belongs to the installer.
    pub fn apply_install(&mut self, content: Option<String>, report: &mut SyncReport) {
        if let Some(content) = content.filter(|c| !c.is_empty()) {
            self.record.install_json = Some(content);
            self.changed.install_json = true;
            report.install_updated = true;
        }
    }

    /// Seeds an empty gallery and replaces a missing or placeholder
    /// thumbnail. A curated or undecodable gallery is never touched.
    pub fn apply_images(&mut self, entries: &[DirectoryEntry], report: &mut SyncReport) {
        if entries.is_empty() {
            return;
        }

        if self.gallery.is_empty() && self.gallery_readable {
            self.gallery = parse::gallery_images(entries);
            self.changed.gallery = true;
            report.gallery_images = self.gallery.len();
        }

        let needs_thumbnail = match self.record.image_url.as_deref() {
            None | Some("") => true,
            Some(url) => url.contains(PLACEHOLDER_MARKER),
        };
        if needs_thumbnail {
            let candidate = parse::thumbnail_candidate(entries)
                .and_then(|entry| entry.download_url.as_deref())
                .filter(|url| !url.is_empty());
            if let Some(url) = candidate {
                self.record.image_url = Some(url.to_string());
                self.changed.image_url = true;
                report.thumbnail_updated = true;
            }
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.record.updated_at = now;
    }
}
