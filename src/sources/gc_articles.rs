use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::content::html::html_to_text;
use crate::domain::{Article, FeaturedMedia, Language};
use crate::errors::{BotError, BotResult};
use crate::sources::traits::ContentSource;

const PER_PAGE: u32 = 100;
const MAX_PAGES: u32 = 100;
const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";
const ERROR_BODY_LIMIT: usize = 200;

/// GC Articles (WordPress REST) feed client
pub struct GcArticlesSource {
    client: Client,
    posts_url: String,
    username: String,
    password: String,
}

impl GcArticlesSource {
    pub fn new(base_url: &Url, username: &str, password: &str) -> BotResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("pr-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            posts_url: posts_url(base_url),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// One page of posts plus the total page count the server reports
    fn fetch_page(&self, lang: Language, page: u32) -> BotResult<(Vec<Article>, u32)> {
        let response = self
            .client
            .get(&self.posts_url)
            .query(&[
                ("lang", lang.as_str().to_string()),
                ("_embed", "1".to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ])
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .map_err(|e| BotError::feed(lang.as_str(), None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let excerpt: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(BotError::feed(lang.as_str(), Some(status.as_u16()), excerpt));
        }

        let total_pages = response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(1);

        let body = response
            .text()
            .map_err(|e| BotError::feed(lang.as_str(), None, e.to_string()))?;
        let articles = parse_posts(&body)
            .map_err(|e| BotError::feed(lang.as_str(), None, format!("invalid response: {}", e)))?;

        Ok((articles, total_pages))
    }
}

impl ContentSource for GcArticlesSource {
    fn fetch_posts(&self, lang: Language) -> BotResult<Vec<Article>> {
        let (mut articles, total_pages) = self.fetch_page(lang, 1)?;

        if total_pages > MAX_PAGES {
            warn!(lang = %lang, total_pages, "Feed reports more pages than will be fetched");
        }

        for page in 2..=total_pages.min(MAX_PAGES) {
            debug!(lang = %lang, page, total_pages, "Fetching next feed page");
            let (more, _) = self.fetch_page(lang, page)?;
            articles.extend(more);
        }

        info!(lang = %lang, count = articles.len(), "Fetched articles");
        Ok(articles)
    }
}

fn posts_url(base_url: &Url) -> String {
    format!("{}/posts", base_url.as_str().trim_end_matches('/'))
}

/// Parse a `/posts` response body into articles
pub fn parse_posts(body: &str) -> Result<Vec<Article>, serde_json::Error> {
    let posts: Vec<WirePost> = serde_json::from_str(body)?;
    Ok(posts.into_iter().map(Article::from).collect())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Rendered {
    Text(String),
    Html { rendered: String },
}

impl Rendered {
    fn into_html(self) -> String {
        match self {
            Rendered::Text(text) => text,
            Rendered::Html { rendered } => rendered,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WirePost {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default)]
    title: Option<Rendered>,
    #[serde(default, rename = "publishDate")]
    publish_date: Option<String>,
    #[serde(default)]
    date_gmt: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    excerpt: Option<Rendered>,
    #[serde(default, rename = "translationKey")]
    translation_key: Option<String>,
    // WordPress sends `[]` instead of `{}` when a post has no meta
    #[serde(default)]
    meta: Value,
    #[serde(default, rename = "_embedded")]
    embedded: Option<WireEmbedded>,
}

#[derive(Debug, Default, Deserialize)]
struct WireEmbedded {
    #[serde(default)]
    author: Vec<WireAuthor>,
    #[serde(default, rename = "wp:featuredmedia")]
    featured_media: Vec<WireMedia>,
}

#[derive(Debug, Deserialize)]
struct WireAuthor {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMedia {
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    alt_text: Option<String>,
    #[serde(default)]
    media_details: Value,
}

impl WireMedia {
    fn size_url(&self, size: &str) -> Option<String> {
        self.media_details
            .pointer(&format!("/sizes/{}/source_url", size))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

impl From<WirePost> for Article {
    fn from(post: WirePost) -> Self {
        let meta_text = |key: &str| {
            post.meta
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let embedded = post.embedded.unwrap_or_default();

        let author = meta_text("gc_author_name").or_else(|| {
            embedded
                .author
                .first()
                .and_then(|a| a.name.clone())
                .filter(|n| !n.trim().is_empty())
        });

        let featured_media = embedded.featured_media.first().and_then(|media| {
            let source_url = media
                .size_url("full")
                .or_else(|| media.source_url.clone())?;
            Some(FeaturedMedia {
                source_url: Some(source_url),
                alt_text: media.alt_text.clone().filter(|a| !a.trim().is_empty()),
                thumbnail_url: media.size_url("thumbnail"),
            })
        });

        let translation_key = post
            .translation_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| meta_text("translation_key"));

        let title = post
            .title
            .map(|t| html_to_text(&t.into_html()))
            .unwrap_or_default();
        let excerpt = post
            .excerpt
            .map(|e| html_to_text(&e.into_html()))
            .filter(|e| !e.is_empty());
        let publish_date = post.publish_date.or(post.date_gmt).or(post.date);

        Article::new(post.id, title)
            .with_content(post.content)
            .with_publish_date(publish_date)
            .with_author(author)
            .with_slug(post.slug.filter(|s| !s.is_empty()))
            .with_excerpt(excerpt)
            .with_featured_media(featured_media)
            .with_translation_key(translation_key)
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_i64<E>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_str<E>(self, v: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
