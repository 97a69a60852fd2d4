//! Heuristic classification of top-level C constructs.
//!
//! The scope builder accumulates non-directive lines into a pending buffer
//! and asks [`classify`] after every line whether the buffer now starts a
//! recognizable construct. Rules are tried in order and the first match
//! wins; when nothing matches the buffer simply keeps growing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::NodeKind;

/// How far past the matching line a construct extends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extent {
    /// Ends on the line that completed the match.
    Line,
    /// Runs until a line containing `;`.
    Semicolon,
    /// Runs until `{` and `}` balance out.
    Braces,
    /// Ends on the current line, unless the next line starts with `{`.
    Call,
}

/// One classification rule.
pub struct EntityRule {
    pub kind: NodeKind,
    pub regex: &'static Lazy<Regex>,
    pub extent: Extent,
}

/// Result of a successful classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub kind: NodeKind,
    pub name: String,
    /// Index of the last line that belongs to the construct.
    pub last_line: usize,
}

const ANONYMOUS: &str = "<anonymous>";

// GNU attribute and asm annotations, any number of them.
macro_rules! attributes {
    () => {
        r"(?:(?:__attribute__\s*\(\(.*?\)\)|(?:__asm__|asm)\s*\([^)]*\))\s*)*"
    };
}

// Trailing annotation on a prototype: attributes, ALL_CAPS macros like __THROW,
// or `__`-prefixed macros with an optional argument list like __nonnull ((1)).
macro_rules! trailer {
    () => {
        concat!(
            r"(?:\s*(?:",
            attributes!(),
            r"|[A-Z_][A-Z0-9_]*\b",
            r"|__\w+(?:\s*\((?:\([^()]*\)|[^()])*\))?",
            r"))*"
        )
    };
}

static COMPOSITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:struct|union|enum)\b\s*(?P<name>\w*)\s*\{").unwrap());
static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[^=({]*?\b(?P<name>\w+)\s*(?:\[[^\]]*\]\s*)*(?:\S*attribute[\s\w()]+)?\s*=(?:[^=]|$)",
    )
    .unwrap()
});
static FUNCTION_POINTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*\*\s*(?P<name>\w+)\s*\)\s*\([^)]*\)\s*;").unwrap());
static FUNCTION_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?P<name>\w+)\s*\((?:[^({;][^{;]*)?\)",
        trailer!(),
        r"\s*;"
    ))
    .unwrap()
});
static FUNCTION_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?P<name>\w+)\s*\((?:[^({;][^{;]*)?\)",
        trailer!(),
        r"\s*\{"
    ))
    .unwrap()
});
static MACRO_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>\w+)\s*\(.*\)$").unwrap());
static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?P<name>\w+)\s*(?:\[[^\]]*\]\s*)*",
        attributes!(),
        r";"
    ))
    .unwrap()
});

/// Classification rules in precedence order.
pub static DEFAULT_RULES: &[EntityRule] = &[
    EntityRule {
        kind: NodeKind::Composite,
        regex: &COMPOSITE,
        extent: Extent::Braces,
    },
    EntityRule {
        kind: NodeKind::Assignment,
        regex: &ASSIGNMENT,
        extent: Extent::Semicolon,
    },
    EntityRule {
        kind: NodeKind::Declaration,
        regex: &FUNCTION_POINTER,
        extent: Extent::Line,
    },
    EntityRule {
        kind: NodeKind::FunctionDecl,
        regex: &FUNCTION_DECL,
        extent: Extent::Line,
    },
    EntityRule {
        kind: NodeKind::FunctionDef,
        regex: &FUNCTION_DEF,
        extent: Extent::Braces,
    },
    EntityRule {
        kind: NodeKind::MacroCall,
        regex: &MACRO_CALL,
        extent: Extent::Call,
    },
    EntityRule {
        kind: NodeKind::Declaration,
        regex: &DECLARATION,
        extent: Extent::Line,
    },
];

/// Try to classify the pending buffer.
///
/// `pending` is the space-joined text accumulated so far and `cursor` the
/// index in `lines` of the line appended last. On a match the returned
/// `last_line` tells the caller how many further lines the construct
/// consumed.
pub fn classify(pending: &str, lines: &[String], cursor: usize) -> Option<Classification> {
    let pending = pending.trim();

    for rule in DEFAULT_RULES {
        let Some(caps) = rule.regex.captures(pending) else {
            continue;
        };
        let start = caps.get(0).map_or(0, |m| m.start());
        let name = caps
            .name("name")
            .map(|m| m.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string();

        let last_line = match rule.extent {
            Extent::Line => cursor,
            Extent::Semicolon => consume_to_semicolon(pending, lines, cursor),
            Extent::Braces => consume_balanced(&pending[start..], lines, cursor),
            Extent::Call => {
                let opens_body = lines
                    .get(cursor + 1)
                    .is_some_and(|next| next.trim_start().starts_with('{'));
                if opens_body {
                    continue;
                }
                cursor
            }
        };

        return Some(Classification {
            kind: rule.kind,
            name,
            last_line,
        });
    }

    None
}

/// Net brace depth contributed by `text`.
pub fn brace_delta(text: &str) -> i64 {
    text.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

fn consume_balanced(matched: &str, lines: &[String], cursor: usize) -> usize {
    let mut depth = brace_delta(matched);
    let mut last = cursor;
    while depth > 0 && last + 1 < lines.len() {
        last += 1;
        depth += brace_delta(&lines[last]);
    }
    last
}

fn consume_to_semicolon(pending: &str, lines: &[String], cursor: usize) -> usize {
    if pending.contains(';') {
        return cursor;
    }
    let mut last = cursor;
    while last + 1 < lines.len() {
        last += 1;
        if lines[last].contains(';') {
            break;
        }
    }
    last
}
