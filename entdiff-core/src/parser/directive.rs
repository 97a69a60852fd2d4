//! Preprocessor directive recognition.
//!
//! Only the directive keyword and the identifier or expression that follows
//! it are inspected; macro bodies and conditions are never evaluated.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{EntdiffError, Result};

/// Placeholder name for `#error`/`#warning` without a message.
pub const BLANK_MESSAGE: &str = "<blank>";

static KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\s*(\w*)").unwrap());
static INCLUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^include\s*["<]?([^">]+)[">]?"#).unwrap());
static DEFINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^define\s+(\w+)").unwrap());
static UNDEF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^undef\s+(\w+)").unwrap());
static INFO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:error|warning)\s+"?([^"]*)"?"#).unwrap());
static IFDEF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ifn?def\s+(\w+)").unwrap());
static DEFINED_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdefined\s*\(\s*(\w+)\s*\)").unwrap());
static DEFINED_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdefined\s+(\w+)").unwrap());

/// A recognized directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Include(String),
    Define(String),
    Undef(String),
    /// `#error` or `#warning`.
    Info(String),
    /// `#if`, `#ifdef` or `#ifndef` with its normalized condition.
    If(String),
    Elif(String),
    Else,
    Endif,
    /// Any directive we do not track (`#pragma`, `#line`, ...).
    Other(String),
}

/// Join a directive and its backslash continuations.
///
/// Returns the logical line and the index of its last physical line.
pub fn join_continuation(lines: &[String], start: usize) -> (String, usize) {
    let mut joined = String::new();
    let mut last = start;

    loop {
        let line = lines[last].as_str();
        match line.strip_suffix('\\') {
            Some(head) if last + 1 < lines.len() => {
                joined.push_str(head.trim_end());
                joined.push(' ');
                last += 1;
            }
            Some(head) => {
                joined.push_str(head.trim_end());
                break;
            }
            None => {
                joined.push_str(line);
                break;
            }
        }
    }

    (joined, last)
}

/// Classify a logical directive line (including the leading `#`).
pub fn parse_directive(line: &str) -> Result<Directive> {
    let keyword = KEYWORD
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");
    let body = line.trim_start_matches('#').trim_start();

    let directive = match keyword {
        "include" => Directive::Include(capture(&INCLUDE, body, line)?.trim().to_string()),
        "define" => Directive::Define(capture(&DEFINE, body, line)?),
        "undef" => Directive::Undef(capture(&UNDEF, body, line)?),
        "error" | "warning" => {
            let message = INFO
                .captures(body)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim())
                .filter(|m| !m.is_empty())
                .unwrap_or(BLANK_MESSAGE);
            Directive::Info(message.to_string())
        }
        "ifdef" => Directive::If(capture(&IFDEF, body, line)?),
        "ifndef" => Directive::If(format!("!{}", capture(&IFDEF, body, line)?)),
        "if" => Directive::If(expression("if", body, line)?),
        "elif" => Directive::Elif(expression("elif", body, line)?),
        "else" => Directive::Else,
        "endif" => Directive::Endif,
        other => Directive::Other(other.to_string()),
    };

    Ok(directive)
}

/// Strip `defined(X)` / `defined X` wrappers and collapse whitespace.
pub fn normalize_condition(expr: &str) -> String {
    let expr = DEFINED_PAREN.replace_all(expr, "$1");
    let expr = DEFINED_BARE.replace_all(&expr, "$1");
    expr.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capture(regex: &Regex, body: &str, line: &str) -> Result<String> {
    regex
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| EntdiffError::malformed(line))
}

fn expression(keyword: &str, body: &str, line: &str) -> Result<String> {
    let condition = normalize_condition(&body[keyword.len()..]);
    if condition.is_empty() {
        return Err(EntdiffError::malformed(line));
    }
    Ok(condition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Directive {
        parse_directive(line).unwrap()
    }

    #[test]
    fn test_include_forms() {
        assert_eq!(parse("#include <stdio.h>"), Directive::Include("stdio.h".into()));
        assert_eq!(parse("# include \"local.h\""), Directive::Include("local.h".into()));
        assert_eq!(parse("#include CONFIG_HEADER"), Directive::Include("CONFIG_HEADER".into()));
    }

    #[test]
    fn test_define_and_undef() {
        assert_eq!(parse("#define DEBUG 1"), Directive::Define("DEBUG".into()));
        assert_eq!(parse("#define MAX(a, b) ((a) > (b) ? (a) : (b))"), Directive::Define("MAX".into()));
        assert_eq!(parse("#undef DEBUG"), Directive::Undef("DEBUG".into()));
    }

    #[test]
    fn test_malformed_define() {
        let err = parse_directive("#define").unwrap_err();
        assert!(matches!(err, EntdiffError::MalformedDirective { ref line } if line == "#define"));
        assert!(parse_directive("#undef   ").is_err());
        assert!(parse_directive("#include").is_err());
        assert!(parse_directive("#ifdef").is_err());
        assert!(parse_directive("#if").is_err());
    }

    #[test]
    fn test_info_messages() {
        assert_eq!(
            parse("#error \"unsupported platform\""),
            Directive::Info("unsupported platform".into())
        );
        assert_eq!(parse("#warning deprecated header"), Directive::Info("deprecated header".into()));
        assert_eq!(parse("#error"), Directive::Info(BLANK_MESSAGE.into()));
    }

    #[test]
    fn test_conditionals_are_normalized() {
        assert_eq!(parse("#ifdef X"), Directive::If("X".into()));
        assert_eq!(parse("#ifndef X"), Directive::If("!X".into()));
        assert_eq!(parse("#if CONST"), Directive::If("CONST".into()));
        assert_eq!(parse("#if defined(A) && !defined B"), Directive::If("A && !B".into()));
        assert_eq!(parse("#if   X  >  1"), Directive::If("X > 1".into()));
        assert_eq!(parse("#elif defined (Y)"), Directive::Elif("Y".into()));
        assert_eq!(parse("#else"), Directive::Else);
        assert_eq!(parse("#endif /* X */"), Directive::Endif);
    }

    #[test]
    fn test_untracked_directives() {
        assert_eq!(parse("#pragma once"), Directive::Other("pragma".into()));
        assert_eq!(parse("#"), Directive::Other(String::new()));
    }

    #[test]
    fn test_join_continuation() {
        let lines: Vec<String> = ["#define SUM(a, b) \\", "((a) + \\", "(b))", "int x;"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (joined, last) = join_continuation(&lines, 0);
        assert_eq!(joined, "#define SUM(a, b) ((a) + (b))");
        assert_eq!(last, 2);
    }

    #[test]
    fn test_join_continuation_at_end_of_input() {
        let lines = vec!["#define BROKEN \\".to_string()];
        let (joined, last) = join_continuation(&lines, 0);
        assert_eq!(joined, "#define BROKEN");
        assert_eq!(last, 0);
    }
}
