use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use url::Url;

use crate::upstream::GitHubConfig;

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// SQLite database file [default: <data dir>/com.openmods.sync/openmods.sqlite]
    #[arg(long, global = true, env = "OPENMODS_DATABASE")]
    pub database: Option<PathBuf>,

    /// Base URL of the GitHub REST API
    #[arg(
        long,
        global = true,
        env = "OPENMODS_GITHUB_API",
        default_value = crate::upstream::DEFAULT_API_BASE
    )]
    pub api_base: Url,

    /// Timeout for each upstream request, in seconds
    #[arg(
        long,
        global = true,
        env = "OPENMODS_HTTP_TIMEOUT",
        default_value_t = crate::upstream::DEFAULT_TIMEOUT.as_secs()
    )]
    pub timeout_secs: u64,

    /// User-Agent sent to GitHub
    #[arg(
        long,
        global = true,
        default_value = crate::upstream::DEFAULT_USER_AGENT
    )]
    pub user_agent: String,
}

impl GlobalOptions {
    pub fn github(&self) -> GitHubConfig {
        GitHubConfig {
            api_base: self.api_base.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn database_path(&self) -> crate::Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => crate::util::default_db_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser, Debug)]
    struct Cli {
        #[command(flatten)]
        global: GlobalOptions,
    }

    #[test]
    fn defaults_match_public_github() {
        let cli = Cli::try_parse_from(["openmods-sync"]).unwrap();
        let github = cli.global.github();
        assert_eq!(github.api_base.as_str(), "https://api.github.com/");
        assert_eq!(github.timeout, Duration::from_secs(30));
        assert_eq!(github.user_agent, "OpenMods/1.0");
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "openmods-sync",
            "--database",
            "/tmp/mods.sqlite",
            "--api-base",
            "http://127.0.0.1:8080/api/v3",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(
            cli.global.database_path().unwrap(),
            PathBuf::from("/tmp/mods.sqlite")
        );
        let github = cli.global.github();
        assert_eq!(github.api_base.as_str(), "http://127.0.0.1:8080/api/v3");
        assert_eq!(github.timeout, Duration::from_secs(5));
    }
}
