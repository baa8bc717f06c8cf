use std::collections::HashSet;
use std::thread::ScopedJoinHandle;

use tracing::info;

use crate::domain::{Article, Language};
use crate::errors::BotResult;
use crate::sources::traits::ContentSource;

/// Both language feeds of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BilingualFeed {
    pub en: Vec<Article>,
    pub fr: Vec<Article>,
}

impl BilingualFeed {
    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.fr.is_empty()
    }

    /// Ids present in either feed
    pub fn active_ids(&self) -> HashSet<String> {
        self.en
            .iter()
            .chain(self.fr.iter())
            .map(|a| a.id.clone())
            .collect()
    }
}

/// Fetch both languages concurrently. Either failure fails the whole fetch.
pub fn fetch_bilingual<S>(source: &S) -> BotResult<BilingualFeed>
where
    S: ContentSource + ?Sized,
{
    let (en, fr) = std::thread::scope(|scope| {
        let en = scope.spawn(|| source.fetch_posts(Language::En));
        let fr = scope.spawn(|| source.fetch_posts(Language::Fr));
        (join(en), join(fr))
    });

    let feed = BilingualFeed { en: en?, fr: fr? };
    info!(en = feed.en.len(), fr = feed.fr.len(), "Fetched bilingual feed");
    Ok(feed)
}

fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BotError;
    use crate::sources::traits::MockContentSource;

    fn article(id: &str) -> Article {
        Article::new(id.to_string(), format!("Title {}", id))
    }

    #[test]
    fn test_fetches_both_languages() {
        let mut source = MockContentSource::new();
        source
            .expect_fetch_posts()
            .withf(|lang| *lang == Language::En)
            .times(1)
            .returning(|_| Ok(vec![article("1"), article("2")]));
        source
            .expect_fetch_posts()
            .withf(|lang| *lang == Language::Fr)
            .times(1)
            .returning(|_| Ok(vec![article("3")]));

        let feed = fetch_bilingual(&source).unwrap();

        assert_eq!(feed.en.len(), 2);
        assert_eq!(feed.fr[0].id, "3");
        assert_eq!(feed.active_ids().len(), 3);
    }

    #[test]
    fn test_one_language_failing_fails_the_fetch() {
        let mut source = MockContentSource::new();
        source
            .expect_fetch_posts()
            .withf(|lang| *lang == Language::En)
            .returning(|_| Ok(vec![article("1")]));
        source
            .expect_fetch_posts()
            .withf(|lang| *lang == Language::Fr)
            .returning(|_| Err(BotError::feed("fr", Some(500), "boom")));

        let err = fetch_bilingual(&source).unwrap_err();
        assert!(matches!(err, BotError::Feed { status: Some(500), .. }));
    }

    #[test]
    fn test_empty_feeds() {
        let mut source = MockContentSource::new();
        source.expect_fetch_posts().returning(|_| Ok(Vec::new()));

        let feed = fetch_bilingual(&source).unwrap();
        assert!(feed.is_empty());
        assert!(feed.active_ids().is_empty());
    }
}
