//! Structural matching of two scope trees.

use crate::differ::changes::{ChangeAction, EntityChange};
use crate::error::Result;
use crate::parser::{parse_lines, ParseOptions};
use crate::types::{NodeId, NodeKind, ScopeTree};

/// Compare two scope trees of the same file.
///
/// Siblings are matched greedily in order of appearance on identical
/// `(kind, name)`. Matched conditionals are compared recursively, matched
/// leaves by exact content. Everything left unmatched is reported as removed
/// (left side) or added (right side), including whole conditional subtrees
/// whose condition text changed.
pub fn compare(left: &ScopeTree, right: &ScopeTree) -> Vec<EntityChange> {
    let mut comparison = Comparison {
        left,
        right,
        prologue: Vec::new(),
        changes: Vec::new(),
    };
    comparison.compare_scopes(left.root(), right.root());
    comparison.changes
}

/// Parse both versions and compare them.
pub fn compare_lines<S: AsRef<str>>(
    old: &[S],
    new: &[S],
    options: &ParseOptions,
) -> Result<Vec<EntityChange>> {
    let left = parse_lines(old, options)?;
    let right = parse_lines(new, options)?;
    let changes = compare(&left, &right);

    if options.trace {
        tracing::debug!(
            left_nodes = left.len(),
            right_nodes = right.len(),
            changes = changes.len(),
            "compared scope trees"
        );
    }

    Ok(changes)
}

/// Convenience wrapper over [`compare_lines`] for whole source texts.
pub fn compare_sources(old: &str, new: &str, options: &ParseOptions) -> Result<Vec<EntityChange>> {
    let old: Vec<&str> = old.lines().collect();
    let new: Vec<&str> = new.lines().collect();
    compare_lines(&old, &new, options)
}

/// State for one `compare` call. Match flags live on the stack of
/// `compare_scopes`, one table per sibling-list pair, so trees are never
/// mutated.
struct Comparison<'a> {
    left: &'a ScopeTree,
    right: &'a ScopeTree,
    prologue: Vec<String>,
    changes: Vec<EntityChange>,
}

impl Comparison<'_> {
    fn compare_scopes(&mut self, left_scope: NodeId, right_scope: NodeId) {
        let left_children = self.left.children(left_scope);
        let right_children = self.right.children(right_scope);
        let mut left_matched = vec![false; left_children.len()];
        let mut right_matched = vec![false; right_children.len()];

        for (i, &left_id) in left_children.iter().enumerate() {
            let left_node = self.left.node(left_id);
            let partner = right_children.iter().enumerate().position(|(j, &right_id)| {
                let right_node = self.right.node(right_id);
                !right_matched[j]
                    && right_node.kind == left_node.kind
                    && right_node.name == left_node.name
            });
            let Some(j) = partner else {
                continue;
            };

            left_matched[i] = true;
            right_matched[j] = true;
            let right_id = right_children[j];

            if left_node.kind == NodeKind::MacroConditional {
                self.prologue.push(left_node.name.clone());
                self.compare_scopes(left_id, right_id);
                self.prologue.pop();
            } else if left_node.content != self.right.node(right_id).content {
                self.emit(left_node.name.clone(), left_node.kind, ChangeAction::Modified);
            }
        }

        for (i, &left_id) in left_children.iter().enumerate() {
            if !left_matched[i] {
                self.report_subtree(Side::Left, left_id, ChangeAction::Removed);
            }
        }
        for (j, &right_id) in right_children.iter().enumerate() {
            if !right_matched[j] {
                self.report_subtree(Side::Right, right_id, ChangeAction::Added);
            }
        }
    }

    /// Report every leaf under `id` (or `id` itself) with `action`.
    fn report_subtree(&mut self, side: Side, id: NodeId, action: ChangeAction) {
        let tree = match side {
            Side::Left => self.left,
            Side::Right => self.right,
        };
        let node = tree.node(id);

        if node.kind != NodeKind::MacroConditional {
            self.emit(node.name.clone(), node.kind, action);
            return;
        }

        if node.children.is_empty() {
            // Nothing inside: report the conditional so the change is not lost.
            self.emit(node.name.clone(), node.kind, action);
            return;
        }

        self.prologue.push(node.name.clone());
        for &child in &node.children {
            self.report_subtree(side, child, action);
        }
        self.prologue.pop();
    }

    fn emit(&mut self, name: String, kind: NodeKind, action: ChangeAction) {
        self.changes
            .push(EntityChange::new(self.prologue.clone(), name, kind, action));
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}
