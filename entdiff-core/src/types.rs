//! Data models for parsed scope trees.
//!
//! A scope tree is an arena of [`Node`]s rooted at a single `File` node.
//! Preprocessor conditionals own their children; every other node is a leaf
//! holding the raw source lines of one top-level construct.

use serde::{Deserialize, Serialize};

/// Kind of a scope tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    MacroConditional,
    MacroDefine,
    MacroUndef,
    MacroInclude,
    MacroInfo,
    Declaration,
    FunctionDecl,
    FunctionDef,
    Composite,
    MacroCall,
    Assignment,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::MacroConditional => "macro_conditional",
            NodeKind::MacroDefine => "macro_define",
            NodeKind::MacroUndef => "macro_undef",
            NodeKind::MacroInclude => "macro_include",
            NodeKind::MacroInfo => "macro_info",
            NodeKind::Declaration => "declaration",
            NodeKind::FunctionDecl => "function_decl",
            NodeKind::FunctionDef => "function_def",
            NodeKind::Composite => "composite",
            NodeKind::MacroCall => "macro_call",
            NodeKind::Assignment => "assignment",
        }
    }

    /// Whether nodes of this kind own children.
    pub fn is_scope(&self) -> bool {
        matches!(self, NodeKind::File | NodeKind::MacroConditional)
    }
}

/// Index of a node inside its [`ScopeTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A single entity in a scope tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Identifier, normalized condition text, or diagnostic message.
    pub name: String,
    /// Raw source lines spanning the construct.
    pub content: Vec<String>,
    pub children: Vec<NodeId>,
    /// Only used to rebuild the scope breadcrumb.
    pub parent: Option<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind, name: impl Into<String>, content: Vec<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            content,
            children: Vec::new(),
            parent: None,
        }
    }
}

/// Arena-backed scope tree for one file version.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScopeTree {
    nodes: Vec<Node>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Create a tree holding only the `File` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::File, "", Vec::new())],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the file produced no entities.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Append `node` as the last child of `parent`.
    pub fn push(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Condition names from the outermost conditional down to `id`'s scope.
    ///
    /// The node itself is included when it is a conditional.
    #[cfg(test)]
    pub(crate) fn prologue(&self, id: NodeId) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current);
            if node.kind == NodeKind::MacroConditional {
                names.push(node.name.clone());
            }
            cursor = node.parent;
        }
        names.reverse();
        names
    }

    /// Depth-first iterator over the descendants of `id`, in source order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }
}

/// Pre-order walk produced by [`ScopeTree::descendants`].
pub struct Descendants<'a> {
    tree: &'a ScopeTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
