use sea_orm::{DbErr, TransactionError};
use thiserror::Error;

/// Why a refresh pass ended without committing anything.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("mod {0} does not exist")]
    ModNotFound(i32),

    #[error("mod {0} has no repository URL")]
    MissingRepositoryUrl(i32),

    #[error("mod {mod_id} has an invalid repository URL '{url}'")]
    InvalidRepositoryUrl {
        mod_id: i32,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("repository '{repository}' for mod {mod_id} is unavailable")]
    RepositoryUnavailable { mod_id: i32, repository: String },

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("failed to commit refresh: {0}")]
    Commit(#[from] TransactionError<DbErr>),
}

impl SyncError {
    /// Not-found class errors: the pass cannot start, nothing to retry soon.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SyncError::ModNotFound(_)
                | SyncError::MissingRepositoryUrl(_)
                | SyncError::InvalidRepositoryUrl { .. }
                | SyncError::RepositoryUnavailable { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("missing signature header")]
    MissingSignature,

    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),

    #[error("no API key of developer {developer_id} matches the signature")]
    InvalidSignature { developer_id: i32 },

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl WebhookError {
    /// HTTP status the receiving endpoint should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature { .. } => 401,
            WebhookError::InvalidPayload(_) => 400,
            WebhookError::Database(_) | WebhookError::Sync(_) => 500,
        }
    }
}
