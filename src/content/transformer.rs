use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::content::front_matter::FrontMatter;
use crate::content::fragment::render_blocks;
use crate::content::html::html_to_markdown;
use crate::content::slug;
use crate::domain::{Article, ArticleContent, Language, TransformedDocument};
use crate::errors::{BotError, BotResult};

/// Convert one CMS article into a Hugo content file.
///
/// Missing optional fields are simply left out of the front matter; a missing
/// title or date yields a document the validator will reject. Only content
/// that is neither HTML nor a block list is an error.
pub fn transform(
    article: &Article,
    lang: Language,
    translation_key: &str,
) -> BotResult<TransformedDocument> {
    let content = ArticleContent::parse(&article.content)
        .map_err(|reason| BotError::transform(&article.id, reason))?;

    let body = match content {
        ArticleContent::Html(html) => html_to_markdown(&html),
        ArticleContent::Blocks(blocks) => render_blocks(&blocks),
    };

    let front_matter = build_front_matter(article, lang, translation_key);
    let stem = slug::normalize(&article.title);

    Ok(TransformedDocument {
        content: format!("{}\n\n{}", front_matter.render(), body),
        file_path: TransformedDocument::file_path_for(lang, &stem),
    })
}

pub fn build_front_matter(article: &Article, lang: Language, translation_key: &str) -> FrontMatter {
    let media = article.featured_media.as_ref();
    let image = media.and_then(|m| m.source_url.as_deref());
    let thumb = media.and_then(|m| m.thumbnail_url.as_deref()).or(image);
    let date = article.publish_date.as_deref().and_then(format_publish_date);

    let mut front_matter = FrontMatter::new();
    front_matter
        .text("title", Some(article.title.as_str()))
        .text("date", date.as_deref())
        .text("lang", Some(lang.as_str()))
        .text("translationKey", Some(translation_key))
        .text("author", article.author.as_deref())
        .text("slug", article.slug.as_deref())
        .block("description", article.excerpt.as_deref())
        .flag("draft", false)
        .text("image", image)
        .text("imageAlt", media.and_then(|m| m.alt_text.as_deref()))
        .text("thumb", thumb);
    front_matter
}

/// Normalize a CMS date to `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// Dates without an offset (WordPress `date_gmt`) are taken as UTC.
pub fn format_publish_date(raw: &str) -> Option<String> {
    let raw = raw.trim();

    let utc = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(&Utc)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        naive.and_utc()
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        naive.and_utc()
    } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)?.and_utc()
    } else {
        return None;
    };

    Some(utc.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeaturedMedia;
    use serde_json::json;

    fn budget_article() -> Article {
        Article::new("101".to_string(), "Budget 2024".to_string())
            .with_html("<h1>Intro</h1><p>Text</p>")
            .with_publish_date(Some("2024-01-15T12:00:00".to_string()))
    }

    #[test]
    fn test_transform_html_article() {
        let doc = transform(&budget_article(), Language::En, "101").unwrap();

        assert_eq!(doc.file_path, "content/en/budget-2024.md");
        assert_eq!(
            doc.content,
            "---\n\
             date: \"2024-01-15T12:00:00.000Z\"\n\
             draft: false\n\
             lang: \"en\"\n\
             title: \"Budget 2024\"\n\
             translationKey: \"101\"\n\
             ---\n\n\
             # Intro\n\nText"
        );
    }

    #[test]
    fn test_transform_block_article() {
        let article = Article::new("7".to_string(), "Services en ligne".to_string()).with_content(json!([
            {"type": "heading", "level": 2, "text": "Démarrer"},
            {"type": "list", "ordered": true, "items": ["Créer un compte", "Se connecter"]},
            {"type": "button", "href": "/fr/connexion", "text": "Connexion"},
            {"type": "alert", "content": "Service interrompu"}
        ]));

        let doc = transform(&article, Language::Fr, "shared-7").unwrap();

        assert_eq!(doc.file_path, "content/fr/services-en-ligne.md");
        assert!(doc.content.ends_with(
            "## Démarrer\n\n\
             1. Créer un compte\n2. Se connecter\n\n\
             {{< gcds-button href=\"/fr/connexion\" >}}Connexion{{< /gcds-button >}}\n\n\
             {{< gcds-alert type=\"info\" >}}Service interrompu{{< /gcds-alert >}}"
        ));
        assert!(doc.content.contains("lang: \"fr\"\n"));
        assert!(doc.content.contains("translationKey: \"shared-7\"\n"));
    }

    #[test]
    fn test_featured_media_and_optional_fields() {
        let article = budget_article()
            .with_author(Some("Jo Tremblay".to_string()))
            .with_slug(Some("budget-2024".to_string()))
            .with_excerpt(Some("Highlights.\nMore details.".to_string()))
            .with_featured_media(Some(FeaturedMedia {
                source_url: Some("https://cdn.example.ca/full.jpg".to_string()),
                alt_text: Some("Parliament".to_string()),
                thumbnail_url: None,
            }));

        let front_matter = transform(&article, Language::En, "101")
            .unwrap()
            .content
            .split("\n---")
            .next()
            .unwrap()
            .to_string();

        assert!(front_matter.contains("author: \"Jo Tremblay\"\n"));
        assert!(front_matter.contains("description: |-\n  Highlights.\n  More details.\n"));
        assert!(front_matter.contains("image: \"https://cdn.example.ca/full.jpg\"\n"));
        assert!(front_matter.contains("imageAlt: \"Parliament\"\n"));
        assert!(front_matter.contains("thumb: \"https://cdn.example.ca/full.jpg\"\n"));
        assert!(front_matter.contains("slug: \"budget-2024\"\n"));
    }

    #[test]
    fn test_thumbnail_preferred_when_present() {
        let article = budget_article().with_featured_media(Some(FeaturedMedia {
            source_url: Some("/full.jpg".to_string()),
            alt_text: None,
            thumbnail_url: Some("/thumb.jpg".to_string()),
        }));

        let doc = transform(&article, Language::En, "101").unwrap();
        assert!(doc.content.contains("thumb: \"/thumb.jpg\"\n"));
        assert!(!doc.content.contains("imageAlt"));
    }

    #[test]
    fn test_missing_title_and_date_still_produce_document() {
        let article = Article::new("9".to_string(), String::new()).with_html("<p>Body</p>");

        let doc = transform(&article, Language::En, "9").unwrap();
        assert!(!doc.content.contains("title:"));
        assert!(!doc.content.contains("date:"));
        assert!(!doc.has_file_stem());
    }

    #[test]
    fn test_malformed_content_errors() {
        let article = Article::new("13".to_string(), "Broken".to_string()).with_content(json!(13));

        let err = transform(&article, Language::En, "13").unwrap_err();
        assert!(matches!(err, BotError::Transform { ref id, .. } if id == "13"));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let a = transform(&budget_article(), Language::En, "101").unwrap();
        let b = transform(&budget_article(), Language::En, "101").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_publish_date_variants() {
        assert_eq!(
            format_publish_date("2024-01-15T08:00:00-04:00").as_deref(),
            Some("2024-01-15T12:00:00.000Z")
        );
        assert_eq!(
            format_publish_date("2024-01-15T12:00:00.250Z").as_deref(),
            Some("2024-01-15T12:00:00.250Z")
        );
        assert_eq!(
            format_publish_date("2024-01-15 12:00:00").as_deref(),
            Some("2024-01-15T12:00:00.000Z")
        );
        assert_eq!(
            format_publish_date("2024-01-15").as_deref(),
            Some("2024-01-15T00:00:00.000Z")
        );
        assert_eq!(format_publish_date("last tuesday"), None);
    }
}
