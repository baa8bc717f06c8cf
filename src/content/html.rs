use scraper::{ElementRef, Html};

use super::fragment::{render_all, Fragment};

/// HTML elements with a Markdown rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HtmlTag {
    Heading(u8),
    Paragraph,
    Link,
    UnorderedList,
    OrderedList,
    Image,
    Quote,
    Code,
    Pre,
    Button,
    Alert,
}

impl HtmlTag {
    fn from_name(name: &str) -> Option<Self> {
        let tag = match name {
            "h1" => HtmlTag::Heading(1),
            "h2" => HtmlTag::Heading(2),
            "h3" => HtmlTag::Heading(3),
            "h4" => HtmlTag::Heading(4),
            "p" => HtmlTag::Paragraph,
            "a" => HtmlTag::Link,
            "ul" => HtmlTag::UnorderedList,
            "ol" => HtmlTag::OrderedList,
            "img" => HtmlTag::Image,
            "blockquote" => HtmlTag::Quote,
            "code" => HtmlTag::Code,
            "pre" => HtmlTag::Pre,
            "gcds-button" => HtmlTag::Button,
            "gcds-alert" => HtmlTag::Alert,
            _ => return None,
        };
        Some(tag)
    }

    fn is_inline(&self) -> bool {
        matches!(self, HtmlTag::Link | HtmlTag::Image | HtmlTag::Code)
    }
}

/// Convert article HTML to Markdown
pub fn html_to_markdown(html: &str) -> String {
    render_all(&html_to_fragments(html))
}

/// Walk the document in order. A recognized element becomes one fragment and
/// its subtree is consumed; unrecognized elements are transparent.
pub fn html_to_fragments(html: &str) -> Vec<Fragment> {
    let document = Html::parse_fragment(html);
    let mut fragments = Vec::new();
    collect(document.root_element(), &mut fragments);
    fragments
}

/// Plain text of an HTML snippet, one line per top-level block
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut lines = Vec::new();

    for child in document.root_element().children() {
        let text = if let Some(text) = child.value().as_text() {
            collapse_whitespace(text)
        } else if let Some(element) = ElementRef::wrap(child) {
            collapse_whitespace(&element.text().collect::<String>())
        } else {
            continue;
        };

        if !text.is_empty() {
            lines.push(text);
        }
    }

    lines.join("\n")
}

fn collect(parent: ElementRef<'_>, out: &mut Vec<Fragment>) {
    for child in parent.children() {
        let Some(element) = ElementRef::wrap(child) else {
            continue;
        };

        match HtmlTag::from_name(element.value().name()) {
            Some(tag) => out.extend(lower(tag, element)),
            None => collect(element, out),
        }
    }
}

fn lower(tag: HtmlTag, element: ElementRef<'_>) -> Option<Fragment> {
    let fragment = match tag {
        HtmlTag::Heading(level) => Fragment::heading(level, non_empty(inline_text(element))?),
        HtmlTag::Paragraph => Fragment::Paragraph(non_empty(inline_text(element))?),
        HtmlTag::Link => Fragment::Link {
            text: inline_text(element),
            href: attr(element, "href"),
        },
        HtmlTag::UnorderedList | HtmlTag::OrderedList => {
            let items: Vec<String> = element
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|li| li.value().name() == "li")
                .map(inline_text)
                .collect();
            if items.is_empty() {
                return None;
            }
            Fragment::List {
                ordered: tag == HtmlTag::OrderedList,
                items,
            }
        }
        HtmlTag::Image => Fragment::Image {
            alt: attr(element, "alt"),
            src: attr(element, "src"),
        },
        HtmlTag::Quote => {
            let paragraphs: Vec<String> = element
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|p| p.value().name() == "p")
                .map(inline_text)
                .filter(|p| !p.is_empty())
                .collect();
            let text = if paragraphs.is_empty() {
                inline_text(element)
            } else {
                paragraphs.join("\n")
            };
            Fragment::Quote(non_empty(text)?)
        }
        HtmlTag::Code => Fragment::InlineCode(element.text().collect()),
        HtmlTag::Pre => Fragment::CodeBlock(element.text().collect()),
        HtmlTag::Button => Fragment::Button {
            href: attr(element, "href"),
            text: inline_text(element),
        },
        HtmlTag::Alert => Fragment::alert(
            element.value().attr("type").map(str::to_string),
            element.inner_html().trim().to_string(),
        ),
    };
    Some(fragment)
}

/// Text of an element with links, images and code kept as inline Markdown
fn inline_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_inline(element, &mut raw);
    collapse_whitespace(&raw)
}

fn push_inline(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }

        let Some(el) = ElementRef::wrap(child) else {
            continue;
        };

        match HtmlTag::from_name(el.value().name()) {
            Some(tag) if tag.is_inline() => {
                if let Some(inline) = lower(tag, el).and_then(|f| f.render_inline()) {
                    out.push_str(&inline);
                }
            }
            _ if el.value().name() == "br" => out.push(' '),
            _ => push_inline(el, out),
        }
    }
}

fn attr(element: ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or_default().to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
