//! Error types for entdiff-core.

use thiserror::Error;

/// Result type alias for entdiff-core operations.
pub type Result<T> = std::result::Result<T, EntdiffError>;

/// Errors that can occur while parsing sources or analyzing commits.
#[derive(Error, Debug)]
pub enum EntdiffError {
    /// A preprocessor directive whose keyword-specific pattern did not match.
    #[error("Malformed directive: {line}")]
    MalformedDirective {
        /// The offending (continuation-joined) directive line.
        line: String,
    },

    /// Conditional nesting exceeded the configured limit.
    #[error("Conditional nesting deeper than {limit} at: {line}")]
    NestingTooDeep {
        /// Configured maximum depth.
        limit: usize,
        /// Directive that opened the scope past the limit.
        line: String,
    },

    /// A raw change record carried an operation code we do not handle.
    #[error("Unknown change operation '{code}' in record: {record}")]
    UnknownOperation {
        /// The operation field as it appeared in the record.
        code: String,
        /// The full raw record.
        record: String,
    },

    /// A raw change record did not have the expected shape.
    #[error("Malformed change record: {record}")]
    MalformedRecord {
        /// The full raw record.
        record: String,
    },

    /// The version-control collaborator failed.
    #[error("Version control error: {message}")]
    Vcs {
        /// Description of the failure.
        message: String,
    },

    /// IO error talking to the collaborator or reading sources.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EntdiffError {
    pub fn malformed(line: impl Into<String>) -> Self {
        EntdiffError::MalformedDirective { line: line.into() }
    }

    pub fn vcs(message: impl Into<String>) -> Self {
        EntdiffError::Vcs {
            message: message.into(),
        }
    }

    /// Errors that only invalidate the file being parsed, not the whole run.
    pub fn is_file_local(&self) -> bool {
        matches!(
            self,
            EntdiffError::MalformedDirective { .. } | EntdiffError::NestingTooDeep { .. }
        )
    }
}
