//! `git` executable adapter for the version-control interface.

use std::path::PathBuf;
use std::process::Command;

use chrono::DateTime;
use entdiff_core::changeset::parse_raw_records;
use entdiff_core::{ChangeRecord, CommitMetadata, EntdiffError, Result, VersionControl};

/// Runs `git` against one repository.
pub struct GitCli {
    repo: PathBuf,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    fn git(&self, args: &[&str]) -> Result<Vec<u8>> {
        tracing::debug!(repo = %self.repo.display(), args = ?args, "running git");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .args(args)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EntdiffError::vcs(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }

    fn git_lines(&self, args: &[&str]) -> Result<Vec<String>> {
        let stdout = self.git(args)?;
        Ok(decode_lines(&stdout, args.first().copied().unwrap_or("git")))
    }
}

impl VersionControl for GitCli {
    /// Newest first, as `git log` lists them.
    fn list_commits(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let range = format!("{from}..{to}");
        let lines = self.git_lines(&["log", "--pretty=%H", &range])?;
        Ok(lines.into_iter().filter(|l| !l.is_empty()).collect())
    }

    fn show_raw_change_record(
        &self,
        commit: &str,
        exclude: &[String],
    ) -> Result<Vec<ChangeRecord>> {
        let lines = self.git_lines(&["show", "--raw", "-M", "--no-abbrev", "--pretty=format:", commit])?;
        parse_raw_records(&lines, exclude)
    }

    fn read_blob(&self, blob: &str) -> Result<Vec<String>> {
        self.git_lines(&["cat-file", "blob", blob])
    }

    fn commit_metadata(&self, commit: &str) -> Result<CommitMetadata> {
        let lines = self.git_lines(&["log", "-1", "--pretty=%an%x00%ae%x00%aI%x00%P", commit])?;
        let line = lines.first().map(String::as_str).unwrap_or_default();
        parse_metadata(line)
    }
}

/// Parse `name NUL email NUL iso-date NUL parents`.
fn parse_metadata(line: &str) -> Result<CommitMetadata> {
    let fields: Vec<&str> = line.split('\0').collect();
    let &[author_name, author_email, date, parents] = fields.as_slice() else {
        return Err(EntdiffError::vcs(format!("unexpected commit metadata: {line:?}")));
    };

    let date = DateTime::parse_from_rfc3339(date.trim())
        .map_err(|e| EntdiffError::vcs(format!("invalid commit date '{date}': {e}")))?;

    Ok(CommitMetadata {
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        is_merge: parents.split_whitespace().count() > 1,
    })
}

/// Split output into lines, dropping (with a warning) any line that is not
/// valid UTF-8.
pub fn decode_lines(bytes: &[u8], source: &str) -> Vec<String> {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    if bytes.is_empty() {
        return Vec::new();
    }

    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .filter_map(|(i, raw)| {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            match std::str::from_utf8(raw) {
                Ok(line) => Some(line.to_string()),
                Err(e) => {
                    tracing::warn!(source, line = i + 1, error = %e, "dropping undecodable line");
                    None
                }
            }
        })
        .collect()
}
