//! Commit analysis.
//!
//! Drives the parser and differ over the change records of each commit and
//! collects the results into [`CommitReport`]s. Rendering is left to callers.

use serde::{Deserialize, Serialize};

use crate::changeset::{has_extension, ChangeRecord, CommitMetadata, FileOperation};
use crate::differ::{compare_lines, EntityChange};
use crate::error::Result;
use crate::parser::ParseOptions;
use crate::vcs::VersionControl;

/// Default extensions that receive an entity-level diff.
pub const DEFAULT_EXTENSIONS: &[&str] = &["c", "h"];

/// Renames at or above this similarity get no entity diff.
pub const DEFAULT_RENAME_THRESHOLD: u8 = 100;

/// Paths containing any of these are skipped.
pub const DEFAULT_EXCLUDES: &[&str] = &["ChangeLog"];

/// Options controlling which files are analyzed and how.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub parse: ParseOptions,
    pub extensions: Vec<String>,
    pub rename_threshold: u8,
    pub exclude: Vec<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            rename_threshold: DEFAULT_RENAME_THRESHOLD,
            exclude: DEFAULT_EXCLUDES.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ReportOptions {
    fn wants_entity_diff(&self, record: &ChangeRecord) -> bool {
        let eligible = match record.operation {
            FileOperation::Modified => true,
            FileOperation::Renamed(similarity) => similarity < self.rename_threshold,
            FileOperation::Added | FileOperation::Deleted => false,
        };
        eligible && has_extension(record.path(), &self.extensions)
    }
}

/// File-level action as shown in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileAction {
    NewFile,
    DeleteFile,
    Modified,
    Moved { from: String, to: String },
}

/// Everything reported about one file of a commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub action: FileAction,
    /// Entity changes, empty when no entity diff was attempted.
    pub changes: Vec<EntityChange>,
    /// Parse failure that aborted this file's entity diff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn new(path: impl Into<String>, action: FileAction) -> Self {
        Self {
            path: path.into(),
            action,
            changes: Vec::new(),
            error: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub commit: String,
    pub metadata: CommitMetadata,
    /// Always empty for merge commits.
    pub files: Vec<FileReport>,
}

/// Analyze every commit in `from..to`, in the order the VCS lists them.
pub fn analyze_range<V: VersionControl + ?Sized>(
    vcs: &V,
    from: &str,
    to: &str,
    options: &ReportOptions,
) -> Result<Vec<CommitReport>> {
    let commits = vcs.list_commits(from, to)?;
    tracing::debug!(from, to, count = commits.len(), "listed commits");

    commits
        .iter()
        .map(|commit| analyze_commit(vcs, commit, options))
        .collect()
}

/// Analyze one commit.
///
/// Parse failures confined to one file are logged and recorded on that
/// file's report; collaborator failures and unknown operation codes abort.
pub fn analyze_commit<V: VersionControl + ?Sized>(
    vcs: &V,
    commit: &str,
    options: &ReportOptions,
) -> Result<CommitReport> {
    let metadata = vcs.commit_metadata(commit)?;
    let mut report = CommitReport {
        commit: commit.to_string(),
        metadata,
        files: Vec::new(),
    };

    if report.metadata.is_merge {
        tracing::debug!(commit, "merge commit, skipping file changes");
        return Ok(report);
    }

    for record in vcs.show_raw_change_record(commit, &options.exclude)? {
        report.files.push(analyze_record(vcs, &record, options)?);
    }

    Ok(report)
}

fn analyze_record<V: VersionControl + ?Sized>(
    vcs: &V,
    record: &ChangeRecord,
    options: &ReportOptions,
) -> Result<FileReport> {
    let action = match record.operation {
        FileOperation::Added => FileAction::NewFile,
        FileOperation::Deleted => FileAction::DeleteFile,
        FileOperation::Modified => FileAction::Modified,
        FileOperation::Renamed(_) => FileAction::Moved {
            from: record.old_path.clone(),
            to: record.path().to_string(),
        },
    };
    let mut file = FileReport::new(record.path(), action);

    if !options.wants_entity_diff(record) {
        return Ok(file);
    }

    let old = vcs.read_blob(&record.old_blob)?;
    let new = vcs.read_blob(&record.new_blob)?;

    match compare_lines(&old, &new, &options.parse) {
        Ok(changes) => file.changes = changes,
        Err(err) if err.is_file_local() => {
            tracing::warn!(path = record.path(), error = %err, "entity diff aborted");
            file.error = Some(err.to_string());
        }
        Err(err) => return Err(err),
    }

    Ok(file)
}
