use std::io::{Error as IOError, ErrorKind as IOErrorKind};
use std::path::{Path, PathBuf};

use sea_orm_migration::prelude::*;
use tracing::{debug, info};
use tracing_unwrap::OptionExt;

use crate::{migrator::Migrator, Result};

pub fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .expect_or_log("Failed to get user data directory")
        .join("com.openmods.sync");
    if !data_dir.is_dir() {
        info!("Creating data directory");
        std::fs::create_dir_all(&data_dir)?;
    }
    Ok(data_dir.join("openmods.sqlite"))
}

fn connection_url(database_path: &Path, create: bool) -> Result<String> {
    let path = database_path.to_str().ok_or_else(|| {
        IOError::new(
            IOErrorKind::InvalidInput,
            format!("Database path is not UTF-8: {}", database_path.display()),
        )
    })?;
    Ok(format!(
        "sqlite://{}?mode={}",
        path,
        if create { "rwc" } else { "rw" }
    ))
}

async fn open_db_internal(database_path: &Path, create: bool) -> Result<sea_orm::DbConn> {
    debug!("Opening database with create = {}", create);
    debug!("Database path: {}", database_path.display());
    let connect_options = sea_orm::ConnectOptions::new(connection_url(database_path, create)?);
    sea_orm::SqlxSqliteConnector::connect(connect_options)
        .await
        .map_err(|e| e.into())
}

pub async fn open_database(database_path: &Path) -> Result<sea_orm::DbConn> {
    debug!("Opening existing mod database");
    if !database_path.is_file() {
        return Err(IOError::new(
            IOErrorKind::NotFound,
            format!(
                "No database at {}, run `initialize` first",
                database_path.display()
            ),
        )
        .into());
    }
    open_db_internal(database_path, false).await
}

pub async fn init_database(database_path: &Path, force: bool) -> Result<()> {
    debug!("Initializing database");
    if database_path.is_file() {
        if force {
            info!("Deleting existing database...");
            tokio::fs::remove_file(database_path).await?;
        } else {
            return Err(IOError::new(IOErrorKind::AlreadyExists, "Database file exists!").into());
        }
    }
    if let Some(parent) = database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    info!("Opening database...");
    let db = open_db_internal(database_path, true).await?;
    info!("Initializing...");
    Migrator::refresh(&db).await?;
    Ok(())
}
