use colored::Colorize;

use crate::sync::Synchronizer;
use crate::upstream::RepositorySource;

pub async fn gallery<S>(synchronizer: &Synchronizer<S>, mod_id: i32, urls: Vec<String>) -> crate::Result<()>
where
    S: RepositorySource,
{
    let count = urls.len();
    synchronizer.update_gallery(mod_id, urls).await?;
    println!("{} gallery of mod {} ({} images)", "Replaced".green().bold(), mod_id, count);
    Ok(())
}

pub async fn thumbnail<S>(synchronizer: &Synchronizer<S>, mod_id: i32, url: String) -> crate::Result<()>
where
    S: RepositorySource,
{
    synchronizer.update_thumbnail(mod_id, url).await?;
    println!("{} thumbnail of mod {}", "Updated".green().bold(), mod_id);
    Ok(())
}
