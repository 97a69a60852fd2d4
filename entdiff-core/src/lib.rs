//! entdiff core - entity-level change detection for C sources.
//!
//! This crate turns two revisions of a C file into a list of changed
//! top-level entities (functions, macros, composite types, declarations),
//! each tagged with the preprocessor conditionals that guard it.
//!
//! # Features
//!
//! - **Heuristic parsing**: macro-aware scope trees without a full C grammar
//! - **Structural diffing**: greedy sibling matching per conditional scope
//! - **Commit analysis**: drives both over a version-control collaborator
//!
//! # Example
//!
//! ```
//! use entdiff_core::{compare_sources, ParseOptions};
//!
//! let changes = compare_sources(
//!     "int counter;\n",
//!     "#define DEBUG 1\nint counter;\n",
//!     &ParseOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(changes.len(), 1);
//! assert_eq!(changes[0].to_string(), "(DEBUG): New.");
//! ```

pub mod changeset;
pub mod differ;
pub mod error;
pub mod parser;
pub mod report;
pub mod types;
pub mod vcs;

pub use changeset::{ChangeRecord, CommitMetadata, FileOperation};
pub use differ::{compare, compare_sources, ChangeAction, DiffSummary, EntityChange};
pub use error::{EntdiffError, Result};
pub use parser::{parse_lines, parse_source, ParseOptions};
pub use report::{analyze_commit, analyze_range, CommitReport, FileAction, FileReport, ReportOptions};
pub use types::{Node, NodeId, NodeKind, ScopeTree};
pub use vcs::VersionControl;
