//! Matching the English and French variants of one article.
//!
//! When every article in both feeds carries an explicit translation key the
//! pairs are formed on that key. Otherwise the feeds are zipped by position,
//! iterating the longer feed fully.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::domain::{Article, Language};
use crate::sources::bilingual::BilingualFeed;

/// Up to two language variants sharing a translation key
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationPair<'a> {
    pub translation_key: String,
    pub en: Option<&'a Article>,
    pub fr: Option<&'a Article>,
}

impl<'a> TranslationPair<'a> {
    fn new(en: Option<&'a Article>, fr: Option<&'a Article>) -> Self {
        Self {
            translation_key: derive_translation_key(en, fr),
            en,
            fr,
        }
    }

    pub fn get(&self, lang: Language) -> Option<&'a Article> {
        match lang {
            Language::En => self.en,
            Language::Fr => self.fr,
        }
    }

    /// Present variants, English first
    pub fn variants(&self) -> impl Iterator<Item = (Language, &'a Article)> + '_ {
        Language::ALL
            .iter()
            .filter_map(move |lang| self.get(*lang).map(|article| (*lang, article)))
    }
}

pub fn pair_translations(feed: &BilingualFeed) -> Vec<TranslationPair<'_>> {
    let all_keyed = !feed.is_empty()
        && feed
            .en
            .iter()
            .chain(feed.fr.iter())
            .all(|a| explicit_key(a).is_some());

    if all_keyed {
        pair_by_key(feed)
    } else {
        pair_by_position(feed)
    }
}

fn pair_by_key(feed: &BilingualFeed) -> Vec<TranslationPair<'_>> {
    let mut pairs: Vec<TranslationPair<'_>> = Vec::new();
    let mut by_key: HashMap<&str, usize> = HashMap::new();

    for article in &feed.en {
        let key = explicit_key(article).unwrap_or_default();
        if by_key.contains_key(key) {
            warn!(translation_key = key, post_id = %article.id, "Duplicate translation key in English feed");
        } else {
            by_key.insert(key, pairs.len());
        }
        pairs.push(TranslationPair::new(Some(article), None));
    }

    for article in &feed.fr {
        let key = explicit_key(article).unwrap_or_default();
        match by_key.get(key).copied() {
            Some(index) if pairs[index].fr.is_none() => {
                pairs[index].fr = Some(article);
            }
            _ => {
                if !by_key.contains_key(key) {
                    by_key.insert(key, pairs.len());
                }
                pairs.push(TranslationPair::new(None, Some(article)));
            }
        }
    }

    pairs
}

fn pair_by_position(feed: &BilingualFeed) -> Vec<TranslationPair<'_>> {
    if feed.en.len() != feed.fr.len() {
        warn!(
            en = feed.en.len(),
            fr = feed.fr.len(),
            "Feed lengths differ, pairing by position leaves unmatched articles"
        );
    }

    let len = feed.en.len().max(feed.fr.len());
    (0..len)
        .map(|i| TranslationPair::new(feed.en.get(i), feed.fr.get(i)))
        .collect()
}

fn explicit_key(article: &Article) -> Option<&str> {
    article
        .translation_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
}

/// Key shared by a pair: explicit key, else id, else slug, else the first
/// eight hex digits of the SHA-256 of the title. English is consulted first.
pub fn derive_translation_key(en: Option<&Article>, fr: Option<&Article>) -> String {
    let present: Vec<&Article> = en.into_iter().chain(fr).collect();

    if let Some(key) = present.iter().find_map(|a| explicit_key(a)) {
        return key.to_string();
    }

    if let Some(id) = present
        .iter()
        .map(|a| a.id.as_str())
        .find(|id| !id.trim().is_empty())
    {
        return id.to_string();
    }

    if let Some(slug) = present
        .iter()
        .filter_map(|a| a.slug.as_deref())
        .find(|slug| !slug.trim().is_empty())
    {
        return slug.to_string();
    }

    let title = present.first().map(|a| a.title.as_str()).unwrap_or_default();
    let digest = hex::encode(Sha256::digest(title.as_bytes()));
    digest[..8].to_string()
}
