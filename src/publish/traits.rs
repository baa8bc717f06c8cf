use crate::domain::{FileChange, PullRequest};
use crate::errors::BotResult;

/// Remote repository operations needed to ship a content update
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// Create `name` from the default branch, returning its head SHA
    fn create_branch(&self, name: &str) -> BotResult<String>;
    fn delete_branch(&self, name: &str) -> BotResult<()>;
    /// Write every file onto `branch` in order, returning the last commit SHA
    fn commit_files(&self, branch: &str, files: &[FileChange], message: &str) -> BotResult<String>;
    fn create_pull_request(&self, branch: &str, title: &str, body: &str) -> BotResult<u64>;
    fn list_open_pull_requests(&self) -> BotResult<Vec<PullRequest>>;
    fn close_pull_request(&self, number: u64) -> BotResult<()>;
}
