//! Files command - entity diff of two files on disk

use std::path::Path;

use anyhow::Context;
use entdiff_core::differ::compare_lines;
use entdiff_core::ParseOptions;

use crate::git::decode_lines;
use crate::output::{FileDiff, OutputConfig, Outputter};

pub fn run(old: &Path, new: &Path, options: &ParseOptions, output: &OutputConfig) -> anyhow::Result<()> {
    let old_lines = read_source(old)?;
    let new_lines = read_source(new)?;

    let changes = compare_lines(&old_lines, &new_lines, options)
        .with_context(|| format!("Failed to compare {} and {}", old.display(), new.display()))?;

    FileDiff::new(old.display().to_string(), new.display().to_string(), changes).output(output);
    Ok(())
}

/// Read a source file as lines; undecodable lines are dropped with a warning.
pub(crate) fn read_source(path: &Path) -> anyhow::Result<Vec<String>> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(decode_lines(&bytes, &path.display().to_string()))
}
