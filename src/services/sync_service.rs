use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::content::{transform, ContentValidator};
use crate::domain::{Article, FileChange, Language, PullRequestSummary, TransformedDocument};
use crate::errors::BotResult;
use crate::logging::timed;
use crate::publish::VersionControl;
use crate::sources::{fetch_bilingual, pair_translations, BilingualFeed, ContentSource};
use crate::storage::{HashStore, SiteWriter};

pub const DEFAULT_PR_TITLE_PREFIX: &str = "Content Sync:";
pub const DEFAULT_BRANCH_PREFIX: &str = "content-sync";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Content: Update from GC-Articles";

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Local Hugo checkout to mirror accepted documents into
    pub site_dir: Option<PathBuf>,
    /// Prefix of every PR title this bot opens, also used to find stale ones
    pub pr_title_prefix: String,
    pub branch_prefix: String,
    pub commit_message: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            site_dir: None,
            pr_title_prefix: DEFAULT_PR_TITLE_PREFIX.to_string(),
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Init,
    ClosingStalePrs,
    Fetching,
    Branching,
    Processing,
    CommittingAndPr,
    NoChanges,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncState::Init => "init",
            SyncState::ClosingStalePrs => "closing_stale_prs",
            SyncState::Fetching => "fetching",
            SyncState::Branching => "branching",
            SyncState::Processing => "processing",
            SyncState::CommittingAndPr => "committing_and_pr",
            SyncState::NoChanges => "no_changes",
            SyncState::Persisting => "persisting",
            SyncState::Done => "done",
            SyncState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// What one run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub state: SyncState,
    pub branch: Option<String>,
    pub pull_request: Option<u64>,
    pub files: Vec<String>,
    pub processed: usize,
    pub unchanged: usize,
    pub invalid: usize,
    pub failed: usize,
    pub stale_prs_closed: usize,
}

impl Default for SyncReport {
    fn default() -> Self {
        Self {
            state: SyncState::Init,
            branch: None,
            pull_request: None,
            files: Vec::new(),
            processed: 0,
            unchanged: 0,
            invalid: 0,
            failed: 0,
            stale_prs_closed: 0,
        }
    }
}

/// A document that passed every gate and will be committed
#[derive(Debug, Clone)]
struct Accepted {
    lang: Language,
    article_id: String,
    document: TransformedDocument,
}

/// Documents to ship, plus those a later document replaced at the same path
#[derive(Debug, Default)]
struct Batch {
    shipped: Vec<Accepted>,
    superseded: Vec<Accepted>,
}

enum ItemOutcome {
    Queued(Accepted),
    Unchanged,
    Invalid,
    Failed,
}

/// Runs one fetch, transform, commit and PR cycle
pub struct SyncService<S, V, H>
where
    S: ContentSource,
    V: VersionControl,
    H: HashStore,
{
    source: S,
    vcs: V,
    store: H,
    validator: ContentValidator,
    writer: Option<SiteWriter>,
    options: SyncOptions,
    state: SyncState,
}

impl<S, V, H> SyncService<S, V, H>
where
    S: ContentSource,
    V: VersionControl,
    H: HashStore,
{
    pub fn new(source: S, vcs: V, store: H, options: SyncOptions) -> Self {
        let writer = options.site_dir.clone().map(SiteWriter::new);
        Self {
            source,
            vcs,
            store,
            validator: ContentValidator::new(),
            writer,
            options,
            state: SyncState::Init,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    pub fn run(&mut self) -> BotResult<SyncReport> {
        self.run_at(Utc::now())
    }

    /// Run with an explicit timestamp, used for the branch name and PR title
    pub fn run_at(&mut self, run_at: DateTime<Utc>) -> BotResult<SyncReport> {
        let mut report = SyncReport::default();

        match self.execute(run_at, &mut report) {
            Ok(()) => {
                self.transition(SyncState::Done);
                report.state = SyncState::Done;
                info!(
                    processed = report.processed,
                    files = report.files.len(),
                    unchanged = report.unchanged,
                    invalid = report.invalid,
                    failed = report.failed,
                    pull_request = ?report.pull_request,
                    "Content sync finished"
                );
                Ok(report)
            }
            Err(e) => {
                error!(state = %self.state, error = %e, "Content sync failed");
                self.transition(SyncState::Failed);
                Err(e)
            }
        }
    }

    fn execute(&mut self, run_at: DateTime<Utc>, report: &mut SyncReport) -> BotResult<()> {
        self.transition(SyncState::Init);
        timed("load hash store", || self.store.load())?;

        self.transition(SyncState::ClosingStalePrs);
        report.stale_prs_closed = self.close_stale_pull_requests();

        self.transition(SyncState::Fetching);
        let feed = timed("fetch articles", || fetch_bilingual(&self.source))?;
        if feed.is_empty() {
            info!("No articles in either feed, nothing to sync");
            return Ok(());
        }

        self.transition(SyncState::Branching);
        let branch = branch_name(&self.options.branch_prefix, run_at);
        timed("create branch", || self.vcs.create_branch(&branch))?;
        report.branch = Some(branch.clone());

        self.transition(SyncState::Processing);
        let batch = self.process(&feed, report);
        let accepted = &batch.shipped;

        if accepted.is_empty() {
            self.transition(SyncState::NoChanges);
            info!(branch = %branch, "No content changes, removing branch");
            if let Err(e) = self.vcs.delete_branch(&branch) {
                warn!(branch = %branch, error = %e, "Failed to delete unused branch");
            }
        } else {
            self.transition(SyncState::CommittingAndPr);
            let number = self.commit_and_open_pr(&branch, accepted, run_at)?;
            report.pull_request = Some(number);
            report.files = accepted.iter().map(|a| a.document.file_path.clone()).collect();
        }

        self.transition(SyncState::Persisting);
        // Superseded ids are recorded too, or the next run would ship them again
        for item in batch.shipped.iter().chain(&batch.superseded) {
            self.store.update_hash(&item.article_id, &item.document.content);
        }
        self.store.cleanup(&feed.active_ids());
        timed("save hash store", || self.store.save())?;

        Ok(())
    }

    /// Close PRs left open by earlier runs. Never fails the run.
    fn close_stale_pull_requests(&self) -> usize {
        let pulls = match self.vcs.list_open_pull_requests() {
            Ok(pulls) => pulls,
            Err(e) => {
                warn!(error = %e, "Could not list open pull requests, skipping stale cleanup");
                return 0;
            }
        };

        let mut closed = 0;
        for pull in pulls
            .iter()
            .filter(|p| p.title.starts_with(&self.options.pr_title_prefix))
        {
            if let Err(e) = self.vcs.close_pull_request(pull.number) {
                warn!(number = pull.number, error = %e, "Failed to close stale pull request");
                continue;
            }
            closed += 1;
            info!(number = pull.number, title = %pull.title, "Closed stale pull request");

            if let Err(e) = self.vcs.delete_branch(&pull.head_branch) {
                warn!(branch = %pull.head_branch, error = %e, "Failed to delete stale branch");
            }
        }

        closed
    }

    /// Run every present article through the gates. Item failures are counted, never raised.
    fn process(&self, feed: &BilingualFeed, report: &mut SyncReport) -> Batch {
        let mut batch = Batch::default();
        let mut by_path: HashMap<String, usize> = HashMap::new();

        for pair in pair_translations(feed) {
            for (lang, article) in pair.variants() {
                report.processed += 1;

                let accepted = match self.process_item(lang, article, &pair.translation_key) {
                    ItemOutcome::Queued(accepted) => accepted,
                    ItemOutcome::Unchanged => {
                        report.unchanged += 1;
                        continue;
                    }
                    ItemOutcome::Invalid => {
                        report.invalid += 1;
                        continue;
                    }
                    ItemOutcome::Failed => {
                        report.failed += 1;
                        continue;
                    }
                };

                let path = accepted.document.file_path.clone();
                match by_path.get(&path) {
                    Some(&index) => {
                        warn!(
                            file_path = %path,
                            replaced = %batch.shipped[index].article_id,
                            post_id = %accepted.article_id,
                            "Two articles map to the same file, keeping the later one"
                        );
                        let replaced = std::mem::replace(&mut batch.shipped[index], accepted);
                        batch.superseded.push(replaced);
                    }
                    None => {
                        by_path.insert(path, batch.shipped.len());
                        batch.shipped.push(accepted);
                    }
                }
            }
        }

        batch
    }

    fn process_item(&self, lang: Language, article: &Article, translation_key: &str) -> ItemOutcome {
        let document = match transform(article, lang, translation_key) {
            Ok(document) => document,
            Err(e) => {
                warn!(post_id = %article.id, lang = %lang, error = %e, "Skipping article that could not be transformed");
                return ItemOutcome::Failed;
            }
        };

        let validation = self.validator.validate(&document.content);
        if !validation.is_valid() {
            warn!(
                post_id = %article.id,
                file_path = %document.file_path,
                errors = ?validation.errors,
                "Skipping article that failed validation"
            );
            return ItemOutcome::Invalid;
        }

        if !document.has_file_stem() {
            warn!(post_id = %article.id, title = %article.title, "Skipping article whose title yields an empty file name");
            return ItemOutcome::Invalid;
        }

        if !self.store.has_changed(&article.id, &document.content) {
            info!(post_id = %article.id, file_path = %document.file_path, "Content unchanged, skipping");
            return ItemOutcome::Unchanged;
        }

        if let Some(writer) = &self.writer {
            if let Err(e) = writer.write(&document) {
                error!(post_id = %article.id, file_path = %document.file_path, error = %e, "Failed to write document to site directory");
                return ItemOutcome::Failed;
            }
        }

        debug!(post_id = %article.id, file_path = %document.file_path, "Queued document");
        ItemOutcome::Queued(Accepted {
            lang,
            article_id: article.id.clone(),
            document,
        })
    }

    fn commit_and_open_pr(
        &self,
        branch: &str,
        accepted: &[Accepted],
        run_at: DateTime<Utc>,
    ) -> BotResult<u64> {
        let files: Vec<FileChange> = accepted.iter().map(|a| FileChange::from(&a.document)).collect();
        timed("commit files", || {
            self.vcs.commit_files(branch, &files, &self.options.commit_message)
        })?;

        let summary = PullRequestSummary::new(
            accepted
                .iter()
                .map(|a| (a.lang, a.document.file_path.clone()))
                .collect(),
            run_at,
        );
        let title = PullRequestSummary::title(&self.options.pr_title_prefix, run_at);

        timed("create pull request", || {
            self.vcs.create_pull_request(branch, &title, &summary.render())
        })
    }

    fn transition(&mut self, next: SyncState) {
        debug!(from = %self.state, to = %next, "Sync state transition");
        self.state = next;
    }
}

/// `<prefix>-<ISO timestamp>` with `:` and `.` replaced so it is a valid ref name
pub fn branch_name(prefix: &str, run_at: DateTime<Utc>) -> String {
    let stamp = run_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    format!("{}-{}", prefix, stamp.replace([':', '.'], "-"))
}
