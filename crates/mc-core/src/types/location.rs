//! Source location types for tracking positions in Go source files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position within a source file.
///
/// # Field Conventions
///
/// - `line` is 1-indexed (first line is line 1)
/// - `column` is 0-indexed (first character is column 0)
/// - `byte_offset` is the absolute byte position from the start of the file
///
/// Displays as `line:column`, with the column shifted to 1-indexed the way
/// compiler diagnostics print it.
///
/// # Examples
///
/// ```
/// use mc_core::SourceLocation;
///
/// let loc = SourceLocation::new(3, 4, 40);
/// assert_eq!(loc.to_string(), "3:5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: u32,

    /// Column number (0-indexed, UTF-8 byte offset within the line).
    pub column: u32,

    /// Absolute byte offset from the start of the file.
    pub byte_offset: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    #[inline]
    #[must_use]
    pub const fn new(line: u32, column: u32, byte_offset: u32) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column + 1)
    }
}
