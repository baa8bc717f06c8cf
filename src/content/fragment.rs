//! Markdown fragments shared by the HTML and block renderers.
//!
//! Both input shapes are lowered into [`Fragment`] first, so every element
//! type has exactly one rendering rule.

use crate::domain::ContentBlock;

pub const DEFAULT_ALERT_TYPE: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Heading { level: u8, text: String },
    Paragraph(String),
    Link { text: String, href: String },
    List { ordered: bool, items: Vec<String> },
    Image { alt: String, src: String },
    Quote(String),
    InlineCode(String),
    CodeBlock(String),
    Button { href: String, text: String },
    Alert { alert_type: String, content: String },
}

impl Fragment {
    pub fn heading(level: u8, text: String) -> Self {
        Fragment::Heading {
            level: level.clamp(1, 4),
            text,
        }
    }

    pub fn alert(alert_type: Option<String>, content: String) -> Self {
        let alert_type = alert_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ALERT_TYPE.to_string());
        Fragment::Alert {
            alert_type,
            content,
        }
    }

    /// Markdown for the inline forms, used inside paragraph text
    pub fn render_inline(&self) -> Option<String> {
        match self {
            Fragment::Link { text, href } => Some(format!("[{}]({})", text, href)),
            Fragment::Image { alt, src } => Some(format!("![{}]({})", alt, src)),
            Fragment::InlineCode(text) => Some(format!("`{}`", text)),
            _ => None,
        }
    }

    /// Markdown for this fragment at block level, including its trailing blank line
    pub fn render(&self) -> String {
        match self {
            Fragment::Link { .. } | Fragment::Image { .. } | Fragment::InlineCode(_) => {
                format!("{}\n\n", self.render_inline().unwrap_or_default())
            }
            Fragment::Heading { level, text } => {
                format!("{} {}\n\n", "#".repeat(*level as usize), text)
            }
            Fragment::Paragraph(text) => format!("{}\n\n", text),
            Fragment::List { ordered, items } => {
                let mut out = String::new();
                for (i, item) in items.iter().enumerate() {
                    if *ordered {
                        out.push_str(&format!("{}. {}\n", i + 1, item));
                    } else {
                        out.push_str(&format!("- {}\n", item));
                    }
                }
                out.push('\n');
                out
            }
            Fragment::Quote(text) => {
                let quoted: Vec<String> = text.lines().map(|l| format!("> {}", l)).collect();
                format!("{}\n\n", quoted.join("\n"))
            }
            Fragment::CodeBlock(code) => {
                format!("```\n{}\n```\n\n", code.trim_end_matches('\n'))
            }
            Fragment::Button { href, text } => format!(
                "{{{{< gcds-button href=\"{}\" >}}}}{}{{{{< /gcds-button >}}}}\n\n",
                href, text
            ),
            Fragment::Alert {
                alert_type,
                content,
            } => format!(
                "{{{{< gcds-alert type=\"{}\" >}}}}{}{{{{< /gcds-alert >}}}}\n\n",
                alert_type, content
            ),
        }
    }

    /// Lower a CMS block. Unknown block types produce nothing.
    pub fn from_block(block: &ContentBlock) -> Option<Self> {
        let fragment = match block {
            ContentBlock::Heading { level, text } => Fragment::heading(*level, text.clone()),
            ContentBlock::Paragraph { text } => Fragment::Paragraph(text.clone()),
            ContentBlock::List { ordered, items } => Fragment::List {
                ordered: *ordered,
                items: items.clone(),
            },
            ContentBlock::Image { url, alt } => Fragment::Image {
                alt: alt.clone(),
                src: url.clone(),
            },
            ContentBlock::Button { href, text } => Fragment::Button {
                href: href.clone(),
                text: text.clone(),
            },
            ContentBlock::Alert {
                alert_type,
                content,
            } => Fragment::alert(alert_type.clone(), content.clone()),
            ContentBlock::Unknown => return None,
        };
        Some(fragment)
    }
}

/// Concatenate fragments in order and trim trailing whitespace
pub fn render_all(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(Fragment::render)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Render a block sequence to Markdown
pub fn render_blocks(blocks: &[ContentBlock]) -> String {
    let fragments: Vec<Fragment> = blocks.iter().filter_map(Fragment::from_block).collect();
    render_all(&fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels_clamped() {
        assert_eq!(Fragment::heading(0, "A".into()).render(), "# A\n\n");
        assert_eq!(Fragment::heading(3, "A".into()).render(), "### A\n\n");
        assert_eq!(Fragment::heading(9, "A".into()).render(), "#### A\n\n");
    }

    #[test]
    fn test_lists() {
        let unordered = Fragment::List {
            ordered: false,
            items: vec!["one".into(), "two".into()],
        };
        assert_eq!(unordered.render(), "- one\n- two\n\n");

        let ordered = Fragment::List {
            ordered: true,
            items: vec!["one".into(), "two".into()],
        };
        assert_eq!(ordered.render(), "1. one\n2. two\n\n");
    }

    #[test]
    fn test_shortcodes() {
        let button = Fragment::Button {
            href: "/apply".into(),
            text: "Apply now".into(),
        };
        assert_eq!(
            button.render(),
            "{{< gcds-button href=\"/apply\" >}}Apply now{{< /gcds-button >}}\n\n"
        );

        let alert = Fragment::alert(None, "Heads up".into());
        assert_eq!(
            alert.render(),
            "{{< gcds-alert type=\"info\" >}}Heads up{{< /gcds-alert >}}\n\n"
        );
    }

    #[test]
    fn test_quote_and_code() {
        assert_eq!(Fragment::Quote("a\nb".into()).render(), "> a\n> b\n\n");
        assert_eq!(
            Fragment::CodeBlock("let x = 1;\n".into()).render(),
            "```\nlet x = 1;\n```\n\n"
        );
        assert_eq!(
            Fragment::InlineCode("cargo".into()).render_inline().unwrap(),
            "`cargo`"
        );
    }

    #[test]
    fn test_render_blocks_skips_unknown() {
        let blocks = vec![
            ContentBlock::Heading {
                level: 2,
                text: "Intro".into(),
            },
            ContentBlock::Unknown,
            ContentBlock::Paragraph { text: "Text".into() },
            ContentBlock::Image {
                url: "/a.png".into(),
                alt: "A".into(),
            },
        ];

        assert_eq!(render_blocks(&blocks), "## Intro\n\nText\n\n![A](/a.png)");
    }

    #[test]
    fn test_render_blocks_only_unknown_is_empty() {
        assert_eq!(render_blocks(&[ContentBlock::Unknown]), "");
    }
}
