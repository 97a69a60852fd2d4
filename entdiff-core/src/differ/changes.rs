//! Change types and summary structures for entity diffs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::NodeKind;

/// What happened to an entity between the two versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeAction {
    Added,
    Removed,
    Modified,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Added => "added",
            ChangeAction::Removed => "removed",
            ChangeAction::Modified => "modified",
        }
    }

    /// Word used in ChangeLog entries.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeAction::Added => "New",
            ChangeAction::Removed => "Removed",
            ChangeAction::Modified => "Modified",
        }
    }

    /// The action seen from the other side of the comparison.
    pub fn mirrored(&self) -> Self {
        match self {
            ChangeAction::Added => ChangeAction::Removed,
            ChangeAction::Removed => ChangeAction::Added,
            ChangeAction::Modified => ChangeAction::Modified,
        }
    }
}

/// A single entity-level change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityChange {
    /// Conditions of the enclosing `#if` scopes, outermost first.
    pub prologue: Vec<String>,

    /// Name of the entity
    pub name: String,

    /// Kind of the entity
    pub kind: NodeKind,

    pub action: ChangeAction,
}

impl EntityChange {
    pub fn new(prologue: Vec<String>, name: String, kind: NodeKind, action: ChangeAction) -> Self {
        Self {
            prologue,
            name,
            kind,
            action,
        }
    }

    /// Scope breadcrumb, e.g. `[CONFIG_A][!(DEBUG)]`.
    pub fn scope_label(&self) -> String {
        self.prologue.iter().map(|c| format!("[{}]", c)).collect()
    }
}

impl fmt::Display for EntityChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}): {}.",
            self.scope_label(),
            self.name,
            self.action.label()
        )
    }
}

/// Summary statistics for a diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: u32,
    pub removed: u32,
    pub modified: u32,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_changes(changes: &[EntityChange]) -> Self {
        let mut summary = Self::new();
        for change in changes {
            summary.record(change.action);
        }
        summary
    }

    pub fn record(&mut self, action: ChangeAction) {
        match action {
            ChangeAction::Added => self.added += 1,
            ChangeAction::Removed => self.removed += 1,
            ChangeAction::Modified => self.modified += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.added + self.removed + self.modified
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        if self.added > 0 {
            parts.push(format!("{} added", self.added));
        }
        if self.removed > 0 {
            parts.push(format!("{} removed", self.removed));
        }
        if self.modified > 0 {
            parts.push(format!("{} modified", self.modified));
        }

        if parts.is_empty() {
            "no entity changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}
