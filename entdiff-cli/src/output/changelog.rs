//! ChangeLog-style text rendering.
//!
//! ```text
//! 2024-03-01  Ada Lovelace  <ada@example.org>
//!
//! 	COMMIT: 3f2a...
//! 	* src/io.c: Modified.
//! 	[HAVE_MMAP](buffer_map): Modified.
//! ```

use colored::Color;
use entdiff_core::{ChangeAction, CommitReport, DiffSummary, EntityChange, FileAction, FileReport};
use serde::Serialize;

use super::{dim, paint, OutputConfig, Outputter};

/// Reports for a range of commits.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ChangeLog {
    pub commits: Vec<CommitReport>,
}

impl Outputter for ChangeLog {
    fn to_text(&self, config: &OutputConfig) -> String {
        self.commits
            .iter()
            .map(|commit| render_commit(commit, config))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Entity diff of two files on disk.
#[derive(Debug, Serialize)]
pub struct FileDiff {
    pub old_path: String,
    pub new_path: String,
    pub summary: DiffSummary,
    pub changes: Vec<EntityChange>,
}

impl FileDiff {
    pub fn new(old_path: String, new_path: String, changes: Vec<EntityChange>) -> Self {
        Self {
            old_path,
            new_path,
            summary: DiffSummary::from_changes(&changes),
            changes,
        }
    }
}

impl Outputter for FileDiff {
    fn to_text(&self, config: &OutputConfig) -> String {
        let mut output = format!(
            "{} -> {}: {}",
            self.old_path,
            self.new_path,
            dim(&self.summary.text(), config)
        );
        for change in &self.changes {
            output.push('\n');
            output.push_str(&render_change(change, config));
        }
        output
    }
}

fn render_commit(report: &CommitReport, config: &OutputConfig) -> String {
    let meta = &report.metadata;
    let mut lines = vec![
        format!("{}  {}  <{}>", meta.date, meta.author_name, meta.author_email),
        String::new(),
        format!("\tCOMMIT: {}", report.commit),
    ];

    if meta.is_merge {
        lines.push(format!("\t{}", dim("Merge commit, no file changes listed.", config)));
    }

    for file in &report.files {
        render_file(file, config, &mut lines);
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn render_file(file: &FileReport, config: &OutputConfig, lines: &mut Vec<String>) {
    match &file.action {
        FileAction::NewFile => {
            lines.push(format!("\t* {}: {}", file.path, paint("New file.", Color::Green, config)));
        }
        FileAction::DeleteFile => {
            lines.push(format!("\t* {}: {}", file.path, paint("Delete file.", Color::Red, config)));
        }
        FileAction::Modified => {
            lines.push(format!("\t* {}: {}", file.path, paint("Modified.", Color::Yellow, config)));
        }
        FileAction::Moved { from, to } => {
            lines.push(format!("\t* {}: {}", from, paint("Move to...", Color::Cyan, config)));
            lines.push(format!("\t* {}: {}", to, paint("...here.", Color::Cyan, config)));
        }
    }

    for change in &file.changes {
        lines.push(render_change(change, config));
    }

    if let Some(error) = &file.error {
        lines.push(format!("\t{}", dim(&format!("(entity diff skipped: {error})"), config)));
    }
}

fn render_change(change: &EntityChange, config: &OutputConfig) -> String {
    let color = match change.action {
        ChangeAction::Added => Color::Green,
        ChangeAction::Removed => Color::Red,
        ChangeAction::Modified => Color::Yellow,
    };
    let label = format!("{}.", change.action.label());
    format!(
        "\t{}({}): {}",
        change.scope_label(),
        change.name,
        paint(&label, color, config)
    )
}
