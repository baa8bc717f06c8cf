use github::{GitHubClient, GitHubError};
use tracing::{debug, info};

use crate::domain::{FileChange, PullRequest};
use crate::errors::{BotError, BotResult};
use crate::publish::traits::VersionControl;

/// `VersionControl` over the GitHub REST API
pub struct GitHubPublisher {
    client: GitHubClient,
    base_branch: String,
}

impl GitHubPublisher {
    pub fn new(
        api_url: &str,
        token: &str,
        owner: &str,
        repo: &str,
        base_branch: &str,
    ) -> BotResult<Self> {
        let client = GitHubClient::new(api_url, token, owner, repo)
            .map_err(|e| describe_failure(e, "configure GitHub client"))?;

        Ok(Self {
            client,
            base_branch: base_branch.to_string(),
        })
    }
}

impl VersionControl for GitHubPublisher {
    fn create_branch(&self, name: &str) -> BotResult<String> {
        let operation = "create branch";
        let sha = self
            .client
            .get_branch_sha(&self.base_branch)
            .map_err(|e| describe_failure(e, operation))?;
        let created = self
            .client
            .create_ref(name, &sha)
            .map_err(|e| describe_failure(e, operation))?;

        info!(branch = name, base = %self.base_branch, sha = %created.object.sha, "Created branch");
        Ok(created.object.sha)
    }

    fn delete_branch(&self, name: &str) -> BotResult<()> {
        self.client
            .delete_ref(name)
            .map_err(|e| describe_failure(e, "delete branch"))?;
        info!(branch = name, "Deleted branch");
        Ok(())
    }

    fn commit_files(&self, branch: &str, files: &[FileChange], message: &str) -> BotResult<String> {
        let operation = "commit files";
        let mut last_commit = None;

        for file in files {
            let existing = self
                .client
                .get_file_sha(&file.path, branch)
                .map_err(|e| describe_failure(e, operation))?;
            debug!(file_path = %file.path, update = existing.is_some(), "Writing file to branch");

            let commit = self
                .client
                .put_file(&file.path, branch, &file.content, message, existing)
                .map_err(|e| describe_failure(e, operation))?;
            last_commit = Some(commit);
        }

        let commit = last_commit.ok_or_else(|| BotError::VersionControl {
            operation: operation.to_string(),
            status: None,
            cause: "No files to commit".to_string(),
        })?;

        info!(branch, files = files.len(), commit = %commit, "Committed files");
        Ok(commit)
    }

    fn create_pull_request(&self, branch: &str, title: &str, body: &str) -> BotResult<u64> {
        let pull = self
            .client
            .create_pull(title, body, branch, &self.base_branch)
            .map_err(|e| describe_failure(e, "create pull request"))?;

        info!(
            number = pull.number,
            url = pull.html_url.as_deref().unwrap_or_default(),
            "Opened pull request"
        );
        Ok(pull.number)
    }

    fn list_open_pull_requests(&self) -> BotResult<Vec<PullRequest>> {
        let pulls = self
            .client
            .list_open_pulls()
            .map_err(|e| describe_failure(e, "list pull requests"))?;

        Ok(pulls
            .into_iter()
            .map(|p| PullRequest {
                number: p.number,
                title: p.title,
                head_branch: p.head.branch,
            })
            .collect())
    }

    fn close_pull_request(&self, number: u64) -> BotResult<()> {
        self.client
            .close_pull(number)
            .map_err(|e| describe_failure(e, "close pull request"))?;
        info!(number, "Closed pull request");
        Ok(())
    }
}

/// Map a GitHub failure to an actionable message for the operation that hit it
pub fn describe_failure(err: GitHubError, operation: &str) -> BotError {
    let status = err.status();
    let message = match &err {
        GitHubError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    };

    let cause = match status {
        Some(401) => "Authentication failed, check GITHUB_TOKEN".to_string(),
        Some(403) if message.to_lowercase().contains("rate limit") => {
            "Rate limit exceeded, try again later".to_string()
        }
        Some(403) => "Permission denied, check the token's repository permissions".to_string(),
        Some(404) => "Resource not found, check GITHUB_OWNER and GITHUB_REPO".to_string(),
        Some(422) => format!("Validation failed: {}", message),
        _ => format!("GitHub request failed: {}", message),
    };

    BotError::VersionControl {
        operation: operation.to_string(),
        status,
        cause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, message: &str) -> GitHubError {
        GitHubError::Api {
            status,
            message: message.to_string(),
        }
    }

    fn cause_of(err: BotError) -> String {
        match err {
            BotError::VersionControl { cause, .. } => cause,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_authentication_failure() {
        let err = describe_failure(api_error(401, "Bad credentials"), "create branch");
        assert_eq!(
            err.to_string(),
            "Authentication failed, check GITHUB_TOKEN (operation: create branch)"
        );
    }

    #[test]
    fn test_rate_limit_versus_permission() {
        let limited = describe_failure(
            api_error(403, "API rate limit exceeded for installation"),
            "commit files",
        );
        assert_eq!(cause_of(limited), "Rate limit exceeded, try again later");

        let denied = describe_failure(api_error(403, "Resource not accessible"), "commit files");
        assert!(cause_of(denied).starts_with("Permission denied"));
    }

    #[test]
    fn test_not_found_and_validation() {
        let missing = describe_failure(api_error(404, "Not Found"), "create branch");
        assert!(matches!(
            missing,
            BotError::VersionControl { status: Some(404), .. }
        ));

        let invalid = describe_failure(
            api_error(422, "Reference already exists"),
            "create branch",
        );
        assert_eq!(cause_of(invalid), "Validation failed: Reference already exists");
    }

    #[test]
    fn test_other_status_is_generic() {
        let err = describe_failure(api_error(502, "Bad gateway"), "create pull request");
        assert_eq!(
            err.to_string(),
            "GitHub request failed: Bad gateway (operation: create pull request)"
        );
    }

    #[test]
    fn test_unreachable_api_has_no_status() {
        let publisher =
            GitHubPublisher::new("http://127.0.0.1:9", "token", "cds-snc", "site", "main").unwrap();

        let err = publisher.create_branch("content-sync-test").unwrap_err();
        assert!(matches!(
            err,
            BotError::VersionControl { status: None, ref operation, .. } if operation == "create branch"
        ));
    }

    #[test]
    fn test_commit_without_files_is_rejected() {
        let publisher =
            GitHubPublisher::new("http://127.0.0.1:9", "token", "cds-snc", "site", "main").unwrap();

        let err = publisher.commit_files("branch", &[], "msg").unwrap_err();
        assert_eq!(cause_of(err), "No files to commit");
    }
}
