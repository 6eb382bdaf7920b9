mod commands;
mod config;
mod entities;
mod error;
mod migrator;
mod sync;
#[cfg(test)]
mod testing;
mod upstream;
mod util;
mod webhook;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalOptions;
use crate::sync::Synchronizer;
use crate::upstream::GitHubClient;

/// Mirrors OpenMods mod metadata from GitHub
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initializes the database
    Initialize {
        /// Replace an existing database, if found
        #[arg(short, long)]
        force: bool,
    },
    /// Registers a mod, creating its developer if needed
    Register {
        /// GitHub username of the developer
        #[arg(short, long)]
        developer: String,

        /// Display name of the mod
        #[arg(short, long)]
        name: String,

        /// Repository URL, e.g. https://github.com/owner/repo
        #[arg(short, long)]
        repo_url: Option<String>,
    },
    /// Issues an API key used to sign webhook deliveries
    AddKey {
        /// GitHub username of the developer
        #[arg(short, long)]
        developer: String,

        /// Label to remember the key by
        #[arg(short, long, default_value = "webhook")]
        name: String,
    },
    /// Refreshes one mod from its repository
    Sync {
        /// Mod ID to refresh
        mod_id: i32,
    },
    /// Refreshes every active mod that has a repository
    SyncAll {
        /// Number of mods refreshed at the same time
        #[arg(short, long, default_value_t = 4)]
        concurrency: usize,
    },
    /// Shows stored information about a mod
    Show {
        /// Mod ID to show
        mod_id: i32,
    },
    /// Replaces the gallery of a mod
    Gallery {
        /// Mod ID to edit
        mod_id: i32,

        /// Image URLs, in display order
        #[arg(value_delimiter = ',')]
        urls: Vec<String>,
    },
    /// Sets the thumbnail of a mod
    Thumbnail {
        /// Mod ID to edit
        mod_id: i32,

        /// Image URL
        url: String,
    },
    /// Replays a GitHub webhook delivery from a file
    Webhook {
        /// File holding the raw request body
        payload: PathBuf,

        /// Value of the X-Hub-Signature-256 header
        #[arg(short, long, conflicts_with = "sign_with")]
        signature: Option<String>,

        /// Compute the signature with this API key instead
        #[arg(long)]
        sign_with: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    info!("Starting openmods-sync version {}", env!("CARGO_PKG_VERSION"));
    let args = Args::parse();
    let database_path = args.global.database_path()?;

    if let Command::Initialize { force } = args.command {
        return util::init_database(&database_path, force).await;
    }

    let db = util::open_database(&database_path).await?;
    match args.command {
        Command::Initialize { .. } => Ok(()),
        Command::Register {
            developer,
            name,
            repo_url,
        } => commands::register(&db, developer, name, repo_url).await,
        Command::AddKey { developer, name } => commands::add_key(&db, developer, name).await,
        Command::Show { mod_id } => commands::show(&db, mod_id).await,
        Command::Gallery { mod_id, urls } => {
            let synchronizer = Synchronizer::new(db, GitHubClient::new(&args.global.github())?);
            commands::gallery(&synchronizer, mod_id, urls).await
        }
        Command::Thumbnail { mod_id, url } => {
            let synchronizer = Synchronizer::new(db, GitHubClient::new(&args.global.github())?);
            commands::thumbnail(&synchronizer, mod_id, url).await
        }
        Command::Sync { mod_id } => {
            let synchronizer = Synchronizer::new(db, GitHubClient::new(&args.global.github())?);
            commands::sync(&synchronizer, mod_id).await
        }
        Command::SyncAll { concurrency } => {
            let synchronizer = Synchronizer::new(db, GitHubClient::new(&args.global.github())?);
            commands::sync_all(&synchronizer, concurrency).await
        }
        Command::Webhook {
            payload,
            signature,
            sign_with,
        } => {
            let synchronizer = Synchronizer::new(db, GitHubClient::new(&args.global.github())?);
            commands::webhook(&synchronizer, payload, signature, sign_with).await
        }
    }
}
