use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "pr-bot")]
#[command(about = "Sync GC Articles content into the Hugo site repository through a pull request")]
#[command(long_about = "Fetches English and French articles from GC Articles, converts them to \
Hugo Markdown, and opens one pull request with every changed file.\n\n\
All settings come from the environment (or a .env file): GC_ARTICLES_API_URL, \
GC_ARTICLES_API_USERNAME, GC_ARTICLES_API_PASSWORD, GITHUB_TOKEN, GITHUB_OWNER, GITHUB_REPO, \
and optionally GITHUB_DEFAULT_BRANCH, GITHUB_API_URL, LOG_LEVEL, LOG_FORMAT, \
PR_BOT_HASH_STORE, PR_BOT_SITE_DIR.")]
#[command(version)]
pub struct Cli {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rejects_unknown_arguments() {
        assert!(Cli::try_parse_from(["pr-bot", "--dry-run"]).is_err());
        assert!(Cli::try_parse_from(["pr-bot"]).is_ok());
    }
}
