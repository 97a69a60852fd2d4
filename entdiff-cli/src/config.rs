//! Configuration loading from `.entdiffrc.toml`.
//!
//! Configuration is optional; defaults apply when the file is missing or
//! cannot be parsed. Command-line flags override anything set here.
//!
//! # Example Configuration
//!
//! ```toml
//! [parser]
//! max_depth = 256
//! trace = false
//!
//! [report]
//! extensions = ["c", "h"]
//! rename_threshold = 100
//! exclude = ["ChangeLog"]
//!
//! [output]
//! format = "text"
//! color = true
//! ```

use std::path::Path;

use entdiff_core::{ParseOptions, ReportOptions};
use serde::Deserialize;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".entdiffrc.toml";

/// Root configuration structure loaded from `.entdiffrc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct EntdiffConfig {
    #[serde(default)]
    pub parser: ParserConfig,

    /// Which files get entity diffs during `entdiff log`.
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Default)]
pub struct ParserConfig {
    /// Maximum conditional nesting before a file is rejected.
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Emit per-line parser trace events (needs `-v` or `RUST_LOG` to show).
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReportConfig {
    /// File extensions, with or without the leading dot.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    /// Renames at or above this similarity percentage get no entity diff.
    #[serde(default)]
    pub rename_threshold: Option<u8>,

    /// Path substrings whose records are skipped entirely.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
}

/// Output formatting preferences.
///
/// Distinct from the runtime `OutputConfig` in the output module, which
/// handles actual rendering.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Valid values: `text`, `json`
    #[serde(default)]
    pub format: Option<String>,

    /// Defaults to `true` when stdout is a TTY.
    #[serde(default)]
    pub color: Option<bool>,
}

impl EntdiffConfig {
    /// Load configuration from `.entdiffrc.toml` in the given directory.
    ///
    /// Read and parse errors are logged as warnings and defaults are used.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Parser options; `trace` from the command line wins over the file.
    pub fn parse_options(&self, trace: bool) -> ParseOptions {
        let defaults = ParseOptions::default();
        ParseOptions {
            trace: trace || self.parser.trace,
            max_depth: self.parser.max_depth.unwrap_or(defaults.max_depth),
        }
    }

    pub fn report_options(&self, parse: ParseOptions) -> ReportOptions {
        let defaults = ReportOptions::default();
        ReportOptions {
            parse,
            extensions: self
                .report
                .extensions
                .as_ref()
                .map(|exts| {
                    exts.iter()
                        .map(|e| e.trim_start_matches('.').to_string())
                        .collect()
                })
                .unwrap_or(defaults.extensions),
            rename_threshold: self
                .report
                .rename_threshold
                .unwrap_or(defaults.rename_threshold),
            exclude: self.report.exclude.clone().unwrap_or(defaults.exclude),
        }
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
