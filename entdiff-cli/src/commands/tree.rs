//! Tree command - show the scope tree of one file

use std::path::Path;

use anyhow::Context;
use entdiff_core::{parse_lines, ParseOptions};

use super::files::read_source;
use crate::output::{OutputConfig, Outputter, ScopeTreeView};

pub fn run(file: &Path, options: &ParseOptions, output: &OutputConfig) -> anyhow::Result<()> {
    let lines = read_source(file)?;
    let tree = parse_lines(&lines, options)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    tracing::debug!(nodes = tree.len(), "parsed scope tree");
    ScopeTreeView::new(file.display().to_string(), &tree).output(output);
    Ok(())
}
