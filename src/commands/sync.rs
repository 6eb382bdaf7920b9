use colored::Colorize;
use tracing::warn;

use crate::sync::{SyncReport, Synchronizer};
use crate::upstream::RepositorySource;

fn print_report(mod_id: i32, report: &SyncReport) {
    println!("{} mod {}: {}", "Refreshed".green().bold(), mod_id, report);
}

pub async fn sync<S>(synchronizer: &Synchronizer<S>, mod_id: i32) -> crate::Result<()>
where
    S: RepositorySource,
{
    // Dropping the pass on Ctrl-C is safe: it only writes in its final commit.
    tokio::select! {
        result = synchronizer.synchronize(mod_id) => {
            let report = result?;
            print_report(mod_id, &report);
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            warn!(mod_id, "Interrupted, nothing was committed");
            Err(std::io::Error::from(std::io::ErrorKind::Interrupted).into())
        }
    }
}

pub async fn sync_all<S>(synchronizer: &Synchronizer<S>, concurrency: usize) -> crate::Result<()>
where
    S: RepositorySource,
{
    let results = tokio::select! {
        results = synchronizer.synchronize_all(concurrency) => results?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, passes still in flight were not committed");
            return Err(std::io::Error::from(std::io::ErrorKind::Interrupted).into());
        }
    };

    let mut failed = 0;
    for (mod_id, result) in &results {
        match result {
            Ok(report) => print_report(*mod_id, report),
            Err(e) if e.is_not_found() => {
                failed += 1;
                println!("{} mod {}: {}", "Skipped".yellow().bold(), mod_id, e);
            }
            Err(e) => {
                failed += 1;
                println!("{} mod {}: {}", "Failed".red().bold(), mod_id, e);
            }
        }
    }
    println!(
        "{} {} refreshed, {} not refreshed",
        "Done:".bold(),
        results.len() - failed,
        failed
    );
    Ok(())
}
