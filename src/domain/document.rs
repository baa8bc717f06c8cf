use serde::{Deserialize, Serialize};

use super::Language;

/// A rendered Hugo content file: front matter, blank line, Markdown body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedDocument {
    pub content: String,
    pub file_path: String,
}

impl TransformedDocument {
    pub fn file_path_for(lang: Language, stem: &str) -> String {
        format!("content/{}/{}.md", lang, stem)
    }

    /// False when the title normalized to nothing and the file would be `.md`
    pub fn has_file_stem(&self) -> bool {
        !self.file_path.ends_with("/.md")
    }
}

/// A file queued for the commit batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

impl From<&TransformedDocument> for FileChange {
    fn from(doc: &TransformedDocument) -> Self {
        Self {
            path: doc.file_path.clone(),
            content: doc.content.clone(),
        }
    }
}
