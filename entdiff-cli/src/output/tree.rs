//! Tree output for scope trees.
//!
//! Uses Unicode box-drawing characters, similar to the `tree` command.

use colored::Color;
use entdiff_core::{NodeId, NodeKind, ScopeTree};
use serde::Serialize;

use super::{dim, paint, OutputConfig, Outputter};

/// Tree branch characters
struct TreeChars {
    pipe: &'static str,
    branch: &'static str,
    last: &'static str,
    space: &'static str,
}

const UNICODE: TreeChars = TreeChars {
    pipe: "\u{2502}   ",                 // |
    branch: "\u{251c}\u{2500}\u{2500} ", // |--
    last: "\u{2514}\u{2500}\u{2500} ",   // L--
    space: "    ",
};

/// Serializable snapshot of one file's scope tree.
#[derive(Debug, Serialize)]
pub struct ScopeTreeView {
    pub path: String,
    pub root: TreeNodeView,
}

#[derive(Debug, Serialize)]
pub struct TreeNodeView {
    pub kind: NodeKind,
    pub name: String,
    pub content: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNodeView>,
}

impl ScopeTreeView {
    pub fn new(path: impl Into<String>, tree: &ScopeTree) -> Self {
        Self {
            path: path.into(),
            root: TreeNodeView::build(tree, tree.root()),
        }
    }
}

impl TreeNodeView {
    fn build(tree: &ScopeTree, id: NodeId) -> Self {
        let node = tree.node(id);
        Self {
            kind: node.kind,
            name: node.name.clone(),
            content: node.content.clone(),
            children: node
                .children
                .iter()
                .map(|&child| Self::build(tree, child))
                .collect(),
        }
    }

    fn label(&self, config: &OutputConfig) -> String {
        let kind = paint(self.kind.as_str(), Color::Cyan, config);
        if self.kind.is_scope() {
            return format!("{} {}", kind, paint(&self.name, Color::Yellow, config));
        }
        let lines = match self.content.len() {
            1 => "1 line".to_string(),
            n => format!("{n} lines"),
        };
        format!("{} {} {}", kind, self.name, dim(&format!("({lines})"), config))
    }
}

impl Outputter for ScopeTreeView {
    fn to_text(&self, config: &OutputConfig) -> String {
        let mut lines = vec![self.path.clone()];
        write_children(&self.root.children, "", config, &mut lines);
        lines.join("\n")
    }
}

fn write_children(
    children: &[TreeNodeView],
    prefix: &str,
    config: &OutputConfig,
    lines: &mut Vec<String>,
) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let connector = if is_last { UNICODE.last } else { UNICODE.branch };
        lines.push(format!("{}{}{}", prefix, connector, child.label(config)));

        let child_prefix = format!("{}{}", prefix, if is_last { UNICODE.space } else { UNICODE.pipe });
        write_children(&child.children, &child_prefix, config, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use entdiff_core::{parse_source, ParseOptions};

    fn view(source: &str) -> ScopeTreeView {
        let tree = parse_source(source, &ParseOptions::default()).unwrap();
        ScopeTreeView::new("demo.c", &tree)
    }

    #[test]
    fn test_tree_text() {
        let source = "#include <stdio.h>\n#ifdef X\nint foo (void)\n{\n  return 1;\n}\n#endif\nint counter;\n";
        let config = OutputConfig::new(OutputFormat::Text).without_colors();
        let expected = [
            "demo.c",
            "├── macro_include stdio.h (1 line)",
            "├── macro_conditional X",
            "│   └── function_def foo (4 lines)",
            "└── declaration counter (1 line)",
        ]
        .join("\n");
        assert_eq!(view(source).to_text(&config), expected);
    }

    #[test]
    fn test_tree_json_nests_children() {
        let config = OutputConfig::new(OutputFormat::Json);
        let json: serde_json::Value =
            serde_json::from_str(&view("#ifdef X\nint a;\n#endif\n").to_json(&config)).unwrap();

        assert_eq!(json["path"], "demo.c");
        assert_eq!(json["root"]["kind"], "File");
        let cond = &json["root"]["children"][0];
        assert_eq!(cond["kind"], "MacroConditional");
        assert_eq!(cond["name"], "X");
        assert_eq!(cond["children"][0]["content"][0], "int a;");
    }

    #[test]
    fn test_empty_file_prints_path_only() {
        let config = OutputConfig::new(OutputFormat::Text).without_colors();
        assert_eq!(view("").to_text(&config), "demo.c");
    }
}
