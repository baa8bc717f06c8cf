use crate::domain::{Article, Language};
use crate::errors::BotResult;

/// A CMS feed that can list published articles per language
#[cfg_attr(test, mockall::automock)]
pub trait ContentSource: Send + Sync {
    /// Fetch every published article for one language, in feed order
    fn fetch_posts(&self, lang: Language) -> BotResult<Vec<Article>>;
}
