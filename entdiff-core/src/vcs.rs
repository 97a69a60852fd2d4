//! Version-control collaborator interface.
//!
//! The core never talks to a repository directly. Everything it needs about
//! commits, change records and file contents arrives through
//! [`VersionControl`], which the command-line crate implements on top of the
//! `git` executable.

use crate::changeset::{ChangeRecord, CommitMetadata};
use crate::error::Result;

/// Source of commits, change records and blob contents.
pub trait VersionControl {
    /// Commits between `from` (exclusive) and `to` (inclusive), in the order
    /// they should be reported.
    fn list_commits(&self, from: &str, to: &str) -> Result<Vec<String>>;

    /// File-level change records of one commit, in record order. Records
    /// whose raw line contains any of `exclude` are left out.
    fn show_raw_change_record(&self, commit: &str, exclude: &[String])
        -> Result<Vec<ChangeRecord>>;

    /// Raw text lines of a blob.
    fn read_blob(&self, blob: &str) -> Result<Vec<String>>;

    fn commit_metadata(&self, commit: &str) -> Result<CommitMetadata>;
}
