//! GitHub push/release webhook handling.
//!
//! A delivery is authenticated against the API keys of the developer who owns
//! the mod linked to the repository, then triggers a refresh of that mod.

use hmac::{Hmac, Mac};
use sea_orm::{prelude::*, ActiveValue, IntoActiveModel};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, info, warn};
use tracing_unwrap::ResultExt;

use crate::entities::{prelude::*, *};
use crate::error::WebhookError;
use crate::sync::{SyncReport, Synchronizer};
use crate::upstream::RepositorySource;

pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
const SIGNATURE_PREFIX: &str = "sha256=";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Deserialize)]
struct Payload {
    repository: Option<PayloadRepository>,
}

#[derive(Debug, Deserialize)]
struct PayloadRepository {
    html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// No mod is linked to the repository.
    Ignored { repository_url: String },
    Refreshed { mod_id: i32, report: SyncReport },
}

/// `sha256=<hex>` signature of `body` under `secret`.
pub fn sign(body: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect_or_log("HMAC accepts keys of any length");
    mac.update(body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a `sha256=<hex>` header value.
pub fn verify_signature(body: &[u8], secret: &str, header: &str) -> bool {
    let Some(signature) = header.trim().strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let Ok(signature) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

/// The same URL with a trailing `.git` removed, or appended if absent.
fn alternate_url(url: &str) -> String {
    match url.strip_suffix(".git") {
        Some(stripped) => stripped.to_string(),
        None => format!("{}.git", url),
    }
}

async fn find_linked_mod<C>(db: &C, url: &str) -> Result<Option<game_mod::Model>, DbErr>
where
    C: ConnectionTrait,
{
    for candidate in [url.to_string(), alternate_url(url)] {
        let found = GameMod::find()
            .filter(game_mod::Column::GithubRepoUrl.eq(candidate))
            .one(db)
            .await?;
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

pub async fn handle_github_webhook<S>(
    synchronizer: &Synchronizer<S>,
    body: &[u8],
    signature: Option<&str>,
) -> Result<WebhookOutcome, WebhookError>
where
    S: RepositorySource,
{
    let Some(signature) = signature else {
        warn!("Missing {} header", SIGNATURE_HEADER);
        return Err(WebhookError::MissingSignature);
    };

    let payload: Payload = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Undecodable webhook payload");
        WebhookError::InvalidPayload(e.to_string())
    })?;
    let Some(repository_url) = payload.repository.and_then(|r| r.html_url) else {
        warn!("Webhook payload missing repository URL");
        return Err(WebhookError::InvalidPayload(
            "missing repository.html_url".to_string(),
        ));
    };
    info!(%repository_url, "Received webhook");

    let db = synchronizer.database();
    let Some(linked) = find_linked_mod(db, &repository_url).await? else {
        info!(%repository_url, "No mod linked to repository, ignoring");
        return Ok(WebhookOutcome::Ignored { repository_url });
    };

    let keys = ApiKey::find()
        .filter(api_key::Column::DeveloperId.eq(linked.developer_id))
        .all(db)
        .await?;
    debug!(mod_id = linked.id, keys = keys.len(), "Checking signature");
    let Some(key) = keys
        .into_iter()
        .find(|key| verify_signature(body, &key.key, signature))
    else {
        warn!(
            mod_id = linked.id,
            developer_id = linked.developer_id,
            "No API key matches the webhook signature"
        );
        return Err(WebhookError::InvalidSignature {
            developer_id: linked.developer_id,
        });
    };

    let key_id = key.id;
    let mut active_key = key.into_active_model();
    active_key.last_used_at = ActiveValue::Set(Some(chrono::Utc::now()));
    active_key.update(db).await?;
    info!(mod_id = linked.id, key_id, name = %linked.name, "Webhook verified, refreshing mod");

    let report = synchronizer.synchronize(linked.id).await?;
    Ok(WebhookOutcome::Refreshed {
        mod_id: linked.id,
        report,
    })
}
