use std::path::PathBuf;

use tracing::debug;

use crate::domain::TransformedDocument;
use crate::errors::BotResult;

/// Writes accepted documents into a local checkout of the Hugo site
pub struct SiteWriter {
    root: PathBuf,
}

impl SiteWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write via `<target>.tmp` and rename so a partial file is never visible.
    pub fn write(&self, document: &TransformedDocument) -> BotResult<PathBuf> {
        let target = self.root.join(&document.file_path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut tmp = target.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, document.content.replace("\r\n", "\n"))?;
        if let Err(e) = std::fs::rename(&tmp, &target) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(file_path = %target.display(), "Wrote document to site directory");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn document() -> TransformedDocument {
        TransformedDocument {
            content: "---\ntitle: \"Budget 2024\"\n---\n\n# Intro\r\n".to_string(),
            file_path: "content/en/budget-2024.md".to_string(),
        }
    }

    #[test]
    fn test_writes_under_root_with_lf_endings() {
        let dir = TempDir::new().unwrap();
        let writer = SiteWriter::new(dir.path());

        let written = writer.write(&document()).unwrap();

        assert_eq!(written, dir.path().join("content/en/budget-2024.md"));
        let raw = std::fs::read_to_string(&written).unwrap();
        assert!(raw.ends_with("# Intro\n"));
        assert!(!dir.path().join("content/en/budget-2024.md.tmp").exists());
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let writer = SiteWriter::new(dir.path());
        writer.write(&document()).unwrap();

        let mut updated = document();
        updated.content = "---\ntitle: \"Budget 2025\"\n---\n\nNew".to_string();
        let written = writer.write(&updated).unwrap();

        assert_eq!(std::fs::read_to_string(written).unwrap(), updated.content);
    }

    #[test]
    fn test_blocked_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("content"), "not a directory").unwrap();

        assert!(SiteWriter::new(dir.path()).write(&document()).is_err());
    }
}
