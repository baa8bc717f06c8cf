use anyhow::Context;
use clap::Parser;
use tracing::info;

use pr_bot::cli::Cli;
use pr_bot::config::Config;
use pr_bot::logging;
use pr_bot::publish::GitHubPublisher;
use pr_bot::services::{SyncOptions, SyncService};
use pr_bot::sources::GcArticlesSource;
use pr_bot::storage::JsonHashStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    logging::init(&config.log_level, config.log_format);

    let source = GcArticlesSource::new(
        &config.gc_articles_url,
        &config.gc_articles_username,
        &config.gc_articles_password,
    )
    .context("Failed to create GC Articles client")?;

    let publisher = GitHubPublisher::new(
        config.github_api_url.as_str(),
        &config.github_token,
        &config.github_owner,
        &config.github_repo,
        &config.github_default_branch,
    )
    .context("Failed to create GitHub client")?;

    let store = JsonHashStore::new(&config.hash_store_path);
    let options = SyncOptions {
        site_dir: config.site_dir.clone(),
        ..SyncOptions::default()
    };

    let mut service = SyncService::new(source, publisher, store, options);
    let report = service.run().context("Content sync failed")?;

    match report.pull_request {
        Some(number) => info!(number, files = report.files.len(), "Content sync opened a pull request"),
        None => info!("Content sync found no changes"),
    }

    Ok(())
}
