//! Per-commit file change records.
//!
//! Records follow the raw diff format of `git show --raw --no-abbrev`:
//!
//! ```text
//! :100644 100644 <old blob> <new blob> M\tpath
//! :100644 100644 <old blob> <new blob> R085\told path\tnew path
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EntdiffError, Result};

/// What happened to a file in a commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOperation {
    Added,
    Deleted,
    Modified,
    /// Rename with the similarity percentage reported by the VCS.
    Renamed(u8),
}

impl FileOperation {
    /// Decode an operation field such as `M` or `R085`.
    pub fn from_code(code: &str, record: &str) -> Result<Self> {
        let unknown = || EntdiffError::UnknownOperation {
            code: code.to_string(),
            record: record.to_string(),
        };

        match code {
            "A" => Ok(FileOperation::Added),
            "D" => Ok(FileOperation::Deleted),
            "M" => Ok(FileOperation::Modified),
            _ => {
                let similarity = code.strip_prefix('R').ok_or_else(unknown)?;
                let value = if similarity.is_empty() {
                    100
                } else {
                    similarity.parse::<u8>().map_err(|_| unknown())?
                };
                if value > 100 {
                    return Err(unknown());
                }
                Ok(FileOperation::Renamed(value))
            }
        }
    }
}

/// One file entry of a commit's raw change record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub old_mode: String,
    pub new_mode: String,
    pub old_blob: String,
    pub new_blob: String,
    pub operation: FileOperation,
    pub old_path: String,
    /// Destination path, present only for renames.
    pub new_path: Option<String>,
}

impl ChangeRecord {
    /// Path of the file after the commit.
    pub fn path(&self) -> &str {
        self.new_path.as_deref().unwrap_or(&self.old_path)
    }
}

impl FromStr for ChangeRecord {
    type Err = EntdiffError;

    fn from_str(line: &str) -> Result<Self> {
        let malformed = || EntdiffError::MalformedRecord {
            record: line.to_string(),
        };

        let mut fields = line.split('\t');
        let header = fields.next().ok_or_else(malformed)?;
        let header = header.strip_prefix(':').ok_or_else(malformed)?;

        let parts: Vec<&str> = header.split_whitespace().collect();
        let &[old_mode, new_mode, old_blob, new_blob, code] = parts.as_slice() else {
            return Err(malformed());
        };

        let operation = FileOperation::from_code(code, line)?;
        let old_path = fields.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?;
        let new_path = match operation {
            FileOperation::Renamed(_) => {
                Some(fields.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?)
            }
            _ => None,
        };

        Ok(ChangeRecord {
            old_mode: old_mode.to_string(),
            new_mode: new_mode.to_string(),
            old_blob: old_blob.to_string(),
            new_blob: new_blob.to_string(),
            operation,
            old_path: old_path.to_string(),
            new_path: new_path.map(str::to_string),
        })
    }
}

/// Parse every non-blank line of a raw change listing.
///
/// Lines containing any of `exclude` are dropped before parsing, so an
/// excluded record never has its operation code inspected.
pub fn parse_raw_records<S: AsRef<str>>(
    lines: &[S],
    exclude: &[String],
) -> Result<Vec<ChangeRecord>> {
    lines
        .iter()
        .map(|line| line.as_ref().trim_end())
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let excluded = exclude.iter().any(|pattern| line.contains(pattern.as_str()));
            if excluded {
                tracing::debug!(record = *line, "excluded change record");
            }
            !excluded
        })
        .map(str::parse::<ChangeRecord>)
        .collect()
}

/// Whether `path` ends in one of `extensions` (given without the dot).
pub fn has_extension(path: &str, extensions: &[String]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

/// Author and merge information for one commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMetadata {
    pub author_name: String,
    pub author_email: String,
    /// Commit date as `YYYY-MM-DD`.
    pub date: String,
    pub is_merge: bool,
}
