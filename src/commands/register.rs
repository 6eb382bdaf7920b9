use chrono::Utc;
use colored::Colorize;
use sea_orm::{prelude::*, ActiveValue, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::entities::{prelude::*, *};

async fn find_developer<C>(db: &C, username: &str) -> Result<Option<developer::Model>, DbErr>
where
    C: ConnectionTrait,
{
    Developer::find()
        .filter(developer::Column::GithubUsername.eq(username))
        .one(db)
        .await
}

/// Creates the mod, and its developer if this is their first mod.
pub async fn register_mod(
    db: &DatabaseConnection,
    username: String,
    name: String,
    repo_url: Option<String>,
) -> Result<game_mod::Model, sea_orm::TransactionError<DbErr>> {
    db.transaction::<_, game_mod::Model, DbErr>(|txn| {
        Box::pin(async move {
            let now = Utc::now();
            let developer = match find_developer(txn, &username).await? {
                Some(developer) => developer,
                None => {
                    info!(%username, "Creating developer");
                    developer::ActiveModel {
                        github_username: ActiveValue::Set(username.clone()),
                        display_name: ActiveValue::Set(None),
                        joined_at: ActiveValue::Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?
                }
            };

            game_mod::ActiveModel {
                developer_id: ActiveValue::Set(developer.id),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(None),
                long_description: ActiveValue::Set(None),
                image_url: ActiveValue::Set(None),
                github_repo_url: ActiveValue::Set(repo_url.filter(|url| !url.trim().is_empty())),
                gallery_image_urls: ActiveValue::Set("[]".to_string()),
                install_json: ActiveValue::Set(None),
                stars: ActiveValue::Set(0),
                is_archived: ActiveValue::Set(false),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(txn)
            .await
        })
    })
    .await
}

/// Issues a new random key. Returns `None` if the developer is unknown.
pub async fn add_api_key(
    db: &DatabaseConnection,
    username: &str,
    label: String,
) -> Result<Option<api_key::Model>, DbErr> {
    let Some(developer) = find_developer(db, username).await? else {
        return Ok(None);
    };
    let key = api_key::ActiveModel {
        developer_id: ActiveValue::Set(developer.id),
        name: ActiveValue::Set(label),
        key: ActiveValue::Set(Uuid::new_v4().simple().to_string()),
        created_at: ActiveValue::Set(Utc::now()),
        last_used_at: ActiveValue::Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(Some(key))
}

pub async fn register(
    db: &DatabaseConnection,
    developer: String,
    name: String,
    repo_url: Option<String>,
) -> crate::Result<()> {
    let registered = register_mod(db, developer, name, repo_url).await?;
    println!(
        "{} {} ({})",
        "Registered".green().bold(),
        registered.name,
        registered.id
    );
    Ok(())
}

pub async fn add_key(db: &DatabaseConnection, developer: String, label: String) -> crate::Result<()> {
    match add_api_key(db, &developer, label).await? {
        Some(key) => {
            println!("{} {}", "API key:".bold(), key.key);
            println!("{}", "Store it now, it will not be shown again.".yellow());
            Ok(())
        }
        None => {
            eprintln!("No developer named {}", developer);
            Err(std::io::Error::from(std::io::ErrorKind::NotFound).into())
        }
    }
}
