use std::path::PathBuf;

use colored::Colorize;
use tracing::error;

use crate::sync::Synchronizer;
use crate::upstream::RepositorySource;
use crate::webhook::{handle_github_webhook, sign, WebhookOutcome, SIGNATURE_HEADER};

/// Replays a stored delivery. The signature is taken as given, or computed
/// from `sign_with` when replaying with a known key.
pub async fn webhook<S>(
    synchronizer: &Synchronizer<S>,
    payload: PathBuf,
    signature: Option<String>,
    sign_with: Option<String>,
) -> crate::Result<()>
where
    S: RepositorySource,
{
    let body = tokio::fs::read(&payload).await?;
    let signature = signature.or_else(|| sign_with.map(|key| sign(&body, &key)));

    match handle_github_webhook(synchronizer, &body, signature.as_deref()).await {
        Ok(WebhookOutcome::Ignored { repository_url }) => {
            println!("{} {}: no linked mod", "200 Ignored".yellow().bold(), repository_url);
            Ok(())
        }
        Ok(WebhookOutcome::Refreshed { mod_id, report }) => {
            println!("{} mod {}: {}", "200 Refreshed".green().bold(), mod_id, report);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, header = SIGNATURE_HEADER, "Webhook rejected");
            println!("{} {}", e.status_code().to_string().red().bold(), e);
            Err(e.into())
        }
    }
}
