use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Featured image metadata expanded from the CMS media relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedMedia {
    pub source_url: Option<String>,
    pub alt_text: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub publish_date: Option<String>,
    /// Raw content as delivered by the feed, interpreted by [`ArticleContent::parse`]
    pub content: Value,
    pub author: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub featured_media: Option<FeaturedMedia>,
    pub translation_key: Option<String>,
}

impl Article {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            publish_date: None,
            content: Value::Null,
            author: None,
            slug: None,
            excerpt: None,
            featured_media: None,
            translation_key: None,
        }
    }

    pub fn with_html(mut self, html: &str) -> Self {
        self.content = Value::String(html.to_string());
        self
    }

    pub fn with_content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    pub fn with_publish_date(mut self, publish_date: Option<String>) -> Self {
        self.publish_date = publish_date;
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_slug(mut self, slug: Option<String>) -> Self {
        self.slug = slug;
        self
    }

    pub fn with_excerpt(mut self, excerpt: Option<String>) -> Self {
        self.excerpt = excerpt;
        self
    }

    pub fn with_featured_media(mut self, media: Option<FeaturedMedia>) -> Self {
        self.featured_media = media;
        self
    }

    pub fn with_translation_key(mut self, key: Option<String>) -> Self {
        self.translation_key = key;
        self
    }
}

/// One structured block of a block-based article body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentBlock {
    Heading {
        #[serde(default = "default_heading_level")]
        level: u8,
        #[serde(alias = "content")]
        text: String,
    },
    Paragraph {
        #[serde(alias = "content")]
        text: String,
    },
    List {
        #[serde(default)]
        ordered: bool,
        items: Vec<String>,
    },
    Image {
        #[serde(alias = "src")]
        url: String,
        #[serde(default)]
        alt: String,
    },
    #[serde(alias = "gcds-button")]
    Button {
        href: String,
        #[serde(alias = "content")]
        text: String,
    },
    #[serde(alias = "gcds-alert")]
    Alert {
        #[serde(default, rename = "alertType", alias = "alert_type")]
        alert_type: Option<String>,
        #[serde(alias = "text")]
        content: String,
    },
    /// Any block type the site has no rendering for
    #[serde(other)]
    Unknown,
}

fn default_heading_level() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleContent {
    Html(String),
    Blocks(Vec<ContentBlock>),
}

impl ArticleContent {
    /// Interpret the raw feed value.
    ///
    /// Accepts an HTML string, a WordPress `{ "rendered": ... }` object, or an
    /// array of blocks. Anything else is structurally malformed.
    pub fn parse(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(html) => Ok(ArticleContent::Html(html.clone())),
            Value::Object(map) => match map.get("rendered") {
                Some(Value::String(html)) => Ok(ArticleContent::Html(html.clone())),
                _ => Err("content object has no rendered HTML".to_string()),
            },
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    serde_json::from_value::<ContentBlock>(item.clone())
                        .map_err(|e| format!("block {} is malformed: {}", i, e))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ArticleContent::Blocks),
            Value::Null => Err("content is missing".to_string()),
            other => Err(format!(
                "content must be HTML or a list of blocks, got {}",
                json_kind(other)
            )),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
