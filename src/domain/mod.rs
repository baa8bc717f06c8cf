pub mod article;
pub mod document;
pub mod language;
pub mod pull_request;

pub use article::{Article, ArticleContent, ContentBlock, FeaturedMedia};
pub use document::{FileChange, TransformedDocument};
pub use language::Language;
pub use pull_request::{PullRequest, PullRequestSummary};
