//! Output formatting module for the entdiff CLI
//!
//! Provides unified output formatting across commands with two formats:
//! text (ChangeLog style, human-readable) and json (machine-readable).
//!
//! Automatically detects TTY context to decide on colors.

use clap::ValueEnum;
use colored::{Color, Colorize};
use serde::Serialize;
use std::io::IsTerminal;
use std::str::FromStr;

mod changelog;
mod json;
mod tree;

pub use self::changelog::{ChangeLog, FileDiff};
pub use self::json::JsonOutput;
pub use self::tree::ScopeTreeView;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// ChangeLog-style text (default)
    #[default]
    Text,
    /// JSON format for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

/// Configuration for output rendering
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Disable colored output
    pub no_color: bool,
    /// Compact mode (single-line JSON)
    pub compact: bool,
}

impl OutputConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            no_color: false,
            compact: false,
        }
    }

    /// Create an OutputConfig with automatic TTY detection and optional color override.
    ///
    /// `color_override` of `Some(_)` forces colors on or off; `None` enables
    /// them only when stdout is a terminal.
    pub fn auto_detect_with_color_override(
        format: OutputFormat,
        color_override: Option<bool>,
    ) -> Self {
        let config = Self::new(format);
        if color_override.unwrap_or_else(|| std::io::stdout().is_terminal()) {
            config
        } else {
            config.without_colors()
        }
    }

    pub fn use_colors(&self) -> bool {
        !self.no_color
    }

    /// Builder: disable colors
    pub fn without_colors(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Builder: enable compact mode
    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }
}

/// Trait for types that can be formatted as output
pub trait Outputter: Serialize + Sized {
    /// Render as text format
    fn to_text(&self, config: &OutputConfig) -> String;

    /// Render as JSON format
    fn to_json(&self, config: &OutputConfig) -> String {
        JsonOutput::format(self, config)
    }

    /// Render using the format specified in config
    fn render(&self, config: &OutputConfig) -> String {
        match config.format {
            OutputFormat::Text => self.to_text(config),
            OutputFormat::Json => self.to_json(config),
        }
    }

    /// Render and print to stdout
    fn output(&self, config: &OutputConfig) {
        println!("{}", self.render(config));
    }
}

/// Color `text` when the config allows it.
pub(crate) fn paint(text: &str, color: Color, config: &OutputConfig) -> String {
    if config.use_colors() {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

/// Dim `text` when the config allows colors.
pub(crate) fn dim(text: &str, config: &OutputConfig) -> String {
    if config.use_colors() {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}
