use regex::Regex;
use serde_yaml::Value;

const REQUIRED_FIELDS: [&str; 4] = ["title", "date", "lang", "translationKey"];
const SUPPORTED_LANGS: [&str; 2] = ["en", "fr"];
const MIN_TITLE_LEN: usize = 3;

/// Outcome of validating one document. Valid iff there are no errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }
}

/// Structural gate run on every transformed document before it may ship
pub struct ContentValidator {
    document: Regex,
    date: Regex,
    shortcode: Regex,
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentValidator {
    pub fn new() -> Self {
        Self {
            document: Regex::new(r"(?s)\A---(.*?)\n---(.*)\z").unwrap(),
            date: Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$").unwrap(),
            // Quoted attribute values may contain `>`
            shortcode: Regex::new(r#"\{\{<\s*(/)?\s*([A-Za-z0-9_-]+)((?:"[^"]*"|[^>"])*)>\}\}"#)
                .unwrap(),
        }
    }

    pub fn validate(&self, content: &str) -> ValidationResult {
        let mut result = ValidationResult::default();

        let Some(captures) = self.document.captures(content) else {
            result.push("Invalid document structure: missing front matter delimiters");
            return result;
        };

        let front_matter = captures.get(1).map_or("", |m| m.as_str());
        let body = captures.get(2).map_or("", |m| m.as_str());

        self.check_front_matter(front_matter, &mut result);
        self.check_body(body, &mut result);
        result
    }

    fn check_front_matter(&self, front_matter: &str, result: &mut ValidationResult) {
        let parsed: Value = match serde_yaml::from_str(front_matter) {
            Ok(value) => value,
            Err(e) => {
                result.push(format!("Invalid YAML in front matter: {}", e));
                return;
            }
        };

        let field = |key: &str| -> Option<String> {
            let value = match parsed.get(key)? {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some(value).filter(|v| !v.trim().is_empty())
        };

        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|key| field(*key).is_none())
            .collect();
        if !missing.is_empty() {
            result.push(format!("Missing required fields: {}", missing.join(", ")));
        }

        if let Some(date) = field("date") {
            if !self.date.is_match(&date) {
                result.push(format!("Invalid date format: {}", date));
            }
        }

        if let Some(lang) = field("lang") {
            if !SUPPORTED_LANGS.contains(&lang.as_str()) {
                result.push(format!("Invalid language: {}", lang));
            }
        }

        if let Some(title) = field("title") {
            if title.chars().count() < MIN_TITLE_LEN {
                result.push(format!("Title too short: {:?}", title));
            }
        }
    }

    fn check_body(&self, body: &str, result: &mut ValidationResult) {
        let body = body.trim();
        if body.is_empty() {
            result.push("Empty content body");
            return;
        }

        let mut open: Vec<&str> = Vec::new();

        for token in self.shortcode.captures_iter(body) {
            let name = token.get(2).map_or("", |m| m.as_str());
            let closing = token.get(1).is_some();

            if closing {
                match open.iter().rposition(|n| *n == name) {
                    Some(pos) => {
                        open.remove(pos);
                    }
                    None => result.push(format!("Unexpected closing shortcode: {}", name)),
                }
                continue;
            }

            let attrs = token.get(3).map_or("", |m| m.as_str());
            match name {
                "gcds-button" if !attrs.contains("href=") => {
                    result.push("Button shortcode missing href attribute");
                }
                "gcds-alert" if !attrs.contains("type=") => {
                    result.push("Alert shortcode missing type attribute");
                }
                _ => {}
            }
            open.push(name);
        }

        for name in open {
            result.push(format!("Unclosed shortcode: {}", name));
        }

        if self.shortcode.replace_all(body, "").contains("{{<") {
            result.push("Unclosed shortcode marker: '{{<' without '>}}'");
        }
    }
}
