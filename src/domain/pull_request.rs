use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::Language;

/// An open pull request as reported by the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub head_branch: String,
}

/// Description body for the pull request opened by a sync run
#[derive(Debug, Clone)]
pub struct PullRequestSummary {
    pub files: Vec<(Language, String)>,
    pub updated_at: DateTime<Utc>,
}

impl PullRequestSummary {
    pub fn new(files: Vec<(Language, String)>, updated_at: DateTime<Utc>) -> Self {
        Self { files, updated_at }
    }

    /// Title is the automation prefix plus the run date, e.g. "Content Sync: 2024-01-15"
    pub fn title(prefix: &str, run_at: DateTime<Utc>) -> String {
        format!("{} {}", prefix, run_at.format("%Y-%m-%d"))
    }

    pub fn render(&self) -> String {
        let mut body = String::from("## Content Update Summary\n\n");
        body.push_str(&format!("🔄 {} file(s) updated\n", self.files.len()));
        body.push_str(&format!(
            "⏰ Updated at: {}\n\n",
            self.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
        body.push_str("### Changed Files\n");

        for lang in Language::ALL {
            let paths: Vec<&String> = self
                .files
                .iter()
                .filter(|(l, _)| *l == lang)
                .map(|(_, p)| p)
                .collect();

            if paths.is_empty() {
                continue;
            }

            let flag = match lang {
                Language::En => "🇬🇧",
                Language::Fr => "🇫🇷",
            };
            body.push_str(&format!("\n{} {} Content:\n", flag, lang.label()));
            for path in paths {
                body.push_str(&format!("- `{}`\n", path));
            }
        }

        body
    }
}
