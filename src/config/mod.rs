use std::path::PathBuf;

use url::Url;

use crate::errors::{BotError, BotResult};
use crate::logging::LogFormat;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_GITHUB_API_URL: &str = github::DEFAULT_API_URL;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_HASH_STORE: &str = ".content-hashes.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub gc_articles_url: Url,
    pub gc_articles_username: String,
    pub gc_articles_password: String,
    pub github_token: String,
    pub github_owner: String,
    pub github_repo: String,
    pub github_default_branch: String,
    pub github_api_url: Url,
    pub log_level: String,
    pub log_format: LogFormat,
    pub hash_store_path: PathBuf,
    pub site_dir: Option<PathBuf>,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> BotResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &str| optional(key).ok_or_else(|| BotError::MissingEnvVar(key.to_string()));

        let gc_articles_url = parse_url("GC_ARTICLES_API_URL", &required("GC_ARTICLES_API_URL")?)?;
        let gc_articles_username = required("GC_ARTICLES_API_USERNAME")?;
        let gc_articles_password = required("GC_ARTICLES_API_PASSWORD")?;
        let github_token = required("GITHUB_TOKEN")?;
        let github_owner = required("GITHUB_OWNER")?;
        let github_repo = required("GITHUB_REPO")?;

        let github_default_branch =
            optional("GITHUB_DEFAULT_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        let github_api_url = parse_url(
            "GITHUB_API_URL",
            &optional("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
        )?;

        let log_level = optional("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_format = optional("LOG_FORMAT")
            .map(|v| v.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        let hash_store_path = optional("PR_BOT_HASH_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HASH_STORE));
        let site_dir = optional("PR_BOT_SITE_DIR").map(PathBuf::from);

        Ok(Self {
            gc_articles_url,
            gc_articles_username,
            gc_articles_password,
            github_token,
            github_owner,
            github_repo,
            github_default_branch,
            github_api_url,
            log_level,
            log_format,
            hash_store_path,
            site_dir,
        })
    }
}

fn parse_url(key: &str, value: &str) -> BotResult<Url> {
    Url::parse(value.trim())
        .map_err(|e| BotError::Config(format!("{} is not a valid URL ({}): {}", key, e, value)))
}
