pub mod github_publisher;
pub mod traits;

pub use github_publisher::{describe_failure, GitHubPublisher};
pub use traits::VersionControl;
