//! Entity-level diff engine for scope trees.
//!
//! Two trees built from the old and new text of one file are matched
//! structurally, sibling list by sibling list, producing an ordered list of
//! [`EntityChange`]s suitable for ChangeLog entries.
//!
//! # Example
//!
//! ```
//! use entdiff_core::differ::compare_sources;
//! use entdiff_core::parser::ParseOptions;
//!
//! let old = "#ifdef X\nint foo(void) { return 1; }\n#endif\n";
//! let new = "#ifdef X\nint foo(void) { return 2; }\n#endif\n";
//! let changes = compare_sources(old, new, &ParseOptions::default()).unwrap();
//! assert_eq!(changes[0].to_string(), "[X](foo): Modified.");
//! ```

pub mod changes;
pub mod comparator;

pub use changes::{ChangeAction, DiffSummary, EntityChange};
pub use comparator::{compare, compare_lines, compare_sources};
