//! Macro-aware scope tree construction for C sources.
//!
//! Source text is cleaned by [`preprocess`], then walked line by line.
//! Directives open and close [`NodeKind::MacroConditional`] scopes; all other
//! text is accumulated and handed to the [`classifier`] until it recognizes a
//! top-level construct.

use crate::error::{EntdiffError, Result};
use crate::types::{Node, NodeId, NodeKind, ScopeTree};

pub mod classifier;
pub mod directive;
pub mod preprocess;

use classifier::classify;
use directive::{join_continuation, parse_directive, Directive};

/// Default limit on nested conditional scopes.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options threaded through every parse.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Emit per-line trace events.
    pub trace: bool,
    /// Maximum number of nested conditional scopes (chained `#elif`/`#else`
    /// arms count as one level each).
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            trace: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Outcome of processing a directive or a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Keep going in the current scope from this line index.
    Continue(usize),
    /// The current scope was closed by `#elif`, `#else` or `#endif`;
    /// the enclosing scope resumes at this line index.
    ScopeClosed(usize),
}

impl Flow {
    pub fn next_index(self) -> usize {
        match self {
            Flow::Continue(next) | Flow::ScopeClosed(next) => next,
        }
    }
}

/// Parse a whole source text into a scope tree.
pub fn parse_source(source: &str, options: &ParseOptions) -> Result<ScopeTree> {
    let raw: Vec<&str> = source.lines().collect();
    parse_lines(&raw, options)
}

/// Parse raw source lines into a scope tree.
pub fn parse_lines<S: AsRef<str>>(raw: &[S], options: &ParseOptions) -> Result<ScopeTree> {
    let lines = preprocess::clean_lines(raw);
    let mut builder = ScopeBuilder {
        lines: &lines,
        tree: ScopeTree::new(),
        options,
    };
    let root = builder.tree.root();
    builder.parse_scope(0, root, 0)?;
    Ok(builder.tree)
}

/// Text accumulated while waiting for the classifier to match.
#[derive(Default)]
struct Pending {
    text: String,
    lines: Vec<String>,
}

impl Pending {
    fn push(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(line);
        self.lines.push(line.to_string());
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

struct ScopeBuilder<'a> {
    lines: &'a [String],
    tree: ScopeTree,
    options: &'a ParseOptions,
}

impl ScopeBuilder<'_> {
    fn parse_scope(&mut self, start: usize, scope: NodeId, depth: usize) -> Result<Flow> {
        let lines = self.lines;
        let mut pending = Pending::default();
        let mut idx = start;

        while idx < lines.len() {
            let line = lines[idx].as_str();
            if line.is_empty() {
                idx += 1;
                continue;
            }

            if line.starts_with('#') {
                match self.directive(idx, scope, depth)? {
                    Flow::Continue(next) => idx = next,
                    closed @ Flow::ScopeClosed(_) => {
                        self.discard(&pending, scope);
                        return Ok(closed);
                    }
                }
                continue;
            }

            pending.push(line);
            match classify(&pending.text, lines, idx) {
                Some(found) => {
                    if self.options.trace {
                        tracing::trace!(
                            kind = found.kind.as_str(),
                            name = %found.name,
                            line = found.last_line + 1,
                            "classified entity"
                        );
                    }
                    let mut content = std::mem::take(&mut pending.lines);
                    content.extend_from_slice(&lines[idx + 1..=found.last_line]);
                    self.tree.push(scope, Node::new(found.kind, found.name, content));
                    pending = Pending::default();
                    idx = found.last_line + 1;
                }
                None => idx += 1,
            }
        }

        self.discard(&pending, scope);
        Ok(Flow::Continue(idx))
    }

    fn directive(&mut self, idx: usize, scope: NodeId, depth: usize) -> Result<Flow> {
        let (logical, last) = join_continuation(self.lines, idx);
        let content = self.lines[idx..=last].to_vec();
        let next = last + 1;

        if self.options.trace {
            tracing::trace!(line = idx + 1, directive = %logical, "directive");
        }

        match parse_directive(&logical)? {
            Directive::Include(path) => {
                self.tree.push(scope, Node::new(NodeKind::MacroInclude, path, content));
            }
            Directive::Define(name) => {
                self.tree.push(scope, Node::new(NodeKind::MacroDefine, name, content));
            }
            Directive::Undef(name) => {
                self.tree.push(scope, Node::new(NodeKind::MacroUndef, name, content));
            }
            Directive::Info(message) => {
                self.tree.push(scope, Node::new(NodeKind::MacroInfo, message, content));
            }
            Directive::If(condition) => {
                let child = self.tree.push(
                    scope,
                    Node::new(NodeKind::MacroConditional, condition, content),
                );
                let resume = self.enter(child, next, depth + 1, &logical)?;
                return Ok(Flow::Continue(resume));
            }
            Directive::Elif(condition) => {
                return self.next_arm(scope, condition, content, next, depth, &logical);
            }
            Directive::Else => {
                let condition = format!("!({})", self.tree.node(scope).name);
                return self.next_arm(scope, condition, content, next, depth, &logical);
            }
            Directive::Endif => {
                if self.tree.parent(scope).is_none() {
                    tracing::warn!(line = idx + 1, "#endif without matching #if ignored");
                    return Ok(Flow::Continue(next));
                }
                return Ok(Flow::ScopeClosed(next));
            }
            Directive::Other(keyword) => {
                if self.options.trace {
                    tracing::trace!(keyword = %keyword, "untracked directive skipped");
                }
            }
        }

        Ok(Flow::Continue(next))
    }

    /// Close `scope` and continue with a sibling arm under its parent.
    fn next_arm(
        &mut self,
        scope: NodeId,
        condition: String,
        content: Vec<String>,
        next: usize,
        depth: usize,
        logical: &str,
    ) -> Result<Flow> {
        let Some(parent) = self.tree.parent(scope) else {
            tracing::warn!(directive = %logical, "conditional arm outside #if ignored");
            return Ok(Flow::Continue(next));
        };

        let arm = self.tree.push(
            parent,
            Node::new(NodeKind::MacroConditional, condition, content),
        );
        let resume = self.enter(arm, next, depth + 1, logical)?;
        Ok(Flow::ScopeClosed(resume))
    }

    fn enter(&mut self, scope: NodeId, start: usize, depth: usize, logical: &str) -> Result<usize> {
        if depth > self.options.max_depth {
            return Err(EntdiffError::NestingTooDeep {
                limit: self.options.max_depth,
                line: logical.to_string(),
            });
        }
        Ok(self.parse_scope(start, scope, depth)?.next_index())
    }

    fn discard(&self, pending: &Pending, scope: NodeId) {
        if !pending.is_empty() {
            tracing::debug!(
                scope = %self.tree.node(scope).name,
                text = %pending.text,
                "unclassified text dropped at end of scope"
            );
        }
    }
}
