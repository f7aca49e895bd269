//! Error types for the mc-go-parser crate.
//!
//! This module provides the [`ParseError`] type for errors that can occur
//! while parsing Go source and extracting constant declarations.

use mc_core::SourceLocation;

/// Errors that can occur during Go parsing.
///
/// # Examples
///
/// ```
/// use mc_go_parser::ParseError;
///
/// fn handle_error(err: ParseError) {
///     match err {
///         ParseError::LanguageInit => eprintln!("Failed to set Go language"),
///         ParseError::QueryCompile { offset, .. } => {
///             eprintln!("Query compilation failed at offset {offset}");
///         }
///         ParseError::Parse => eprintln!("Failed to parse source code"),
///         ParseError::Syntax { location, message } => eprintln!("{location}: {message}"),
///         ParseError::MissingPackageClause => eprintln!("No package clause"),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the Go language on the parser.
    #[error("failed to set Go language")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The underlying query error.
        kind: tree_sitter::QueryError,
    },

    /// The parser produced no tree (cancelled or out of memory).
    #[error("failed to parse source code")]
    Parse,

    /// The source is not valid Go.
    #[error("{location}: {message}")]
    Syntax {
        /// Position of the first error node.
        location: SourceLocation,
        /// Short description of the problem.
        message: String,
    },

    /// The file has no `package` clause.
    #[error("expected 'package' clause")]
    MissingPackageClause,
}

impl ParseError {
    /// Returns the location of a syntax error, if this is one.
    #[must_use]
    pub const fn location(&self) -> Option<SourceLocation> {
        match self {
            Self::Syntax { location, .. } => Some(*location),
            _ => None,
        }
    }
}
