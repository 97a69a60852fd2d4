//! Log command - ChangeLog entries for a range of commits

use std::path::Path;

use anyhow::Context;
use entdiff_core::{analyze_range, ReportOptions};

use crate::git::GitCli;
use crate::output::{ChangeLog, OutputConfig, Outputter};

/// Analyze `from..to` in `repo` and print one entry per commit.
pub fn run(
    repo: &Path,
    from: &str,
    to: &str,
    options: &ReportOptions,
    output: &OutputConfig,
) -> anyhow::Result<()> {
    let git = GitCli::new(repo);
    let commits = analyze_range(&git, from, to, options)
        .with_context(|| format!("Failed to analyze {}..{} in {}", from, to, repo.display()))?;

    tracing::info!(count = commits.len(), "analyzed commits");
    ChangeLog { commits }.output(output);
    Ok(())
}
