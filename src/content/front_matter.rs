//! YAML front matter builder with deterministic key order.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatterValue {
    /// Single-line string, emitted double-quoted
    Text(String),
    /// Multi-line string, emitted as a `|-` block literal
    Block(String),
    Bool(bool),
}

/// Flat key/value front matter. Keys render in lexicographic order so the same
/// logical content always produces byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: BTreeMap<String, FrontMatterValue>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a scalar string. Empty values are omitted; newlines fold to spaces.
    pub fn text(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.map(fold_newlines).filter(|v| !v.is_empty()) {
            self.fields.insert(key.to_string(), FrontMatterValue::Text(value));
        }
        self
    }

    /// Insert a string that keeps its line breaks as a block literal.
    pub fn block(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return self;
        };

        let value = if value.contains('\n') {
            FrontMatterValue::Block(value.replace("\r\n", "\n"))
        } else {
            FrontMatterValue::Text(value.to_string())
        };
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn flag(&mut self, key: &str, value: bool) -> &mut Self {
        self.fields.insert(key.to_string(), FrontMatterValue::Bool(value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&FrontMatterValue> {
        self.fields.get(key)
    }

    /// Render the `---` delimited block (no trailing newline)
    pub fn render(&self) -> String {
        let mut output = String::from("---\n");

        for (key, value) in &self.fields {
            match value {
                FrontMatterValue::Text(text) => {
                    output.push_str(&format!("{}: \"{}\"\n", key, escape(text)));
                }
                FrontMatterValue::Block(text) => {
                    output.push_str(&format!("{}: |-\n", key));
                    for line in text.lines() {
                        let line = line.trim_end();
                        if line.is_empty() {
                            output.push('\n');
                        } else {
                            output.push_str(&format!("  {}\n", line));
                        }
                    }
                }
                FrontMatterValue::Bool(flag) => {
                    output.push_str(&format!("{}: {}\n", key, flag));
                }
            }
        }

        output.push_str("---");
        output
    }
}

/// Escape a value for a double-quoted YAML scalar
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Collapse each run of line breaks (and the spaces around it) into one space
fn fold_newlines(text: &str) -> String {
    let text = text.trim();
    if !text.contains(['\n', '\r']) {
        return text.to_string();
    }

    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
