//! Go parser using tree-sitter for constant declaration extraction.
//!
//! This crate parses Go source files to:
//!
//! - Read the `package` clause
//! - Extract top-level `const` declaration groups, spec by spec, in source order
//! - Reject source that is not syntactically valid Go
//!
//! # Overview
//!
//! The main entry point is [`GoParser`], which wraps a tree-sitter parser
//! configured for Go:
//!
//! ```
//! use mc_go_parser::GoParser;
//!
//! let mut parser = GoParser::new()?;
//! let source = r#"
//! package paint
//!
//! const (
//!     Red Color = iota
//!     Green
//!     Blue
//! )
//! "#;
//!
//! let result = parser.parse(source)?;
//! for spec in &result.groups[0].specs {
//!     println!("{} typed={}", spec.first_name(), spec.ty.is_some());
//! }
//! # Ok::<(), mc_go_parser::ParseError>(())
//! ```
//!
//! # What Is Extracted
//!
//! | Source | `names` | `ty` | `has_value` |
//! |--------|---------|------|-------------|
//! | `A Color = iota` | `[A]` | `Named("Color")` | `true` |
//! | `B` | `[B]` | `None` | `false` |
//! | `C = 7` | `[C]` | `None` | `true` |
//! | `D time.Duration = 1` | `[D]` | `Other("time.Duration")` | `true` |
//! | `E, F Color = 1, 2` | `[E, F]` | `Named("Color")` | `true` |
//!
//! Declarations inside function bodies are not extracted.
//!
//! # Syntax Validation
//!
//! Tree-sitter recovers from errors instead of failing. [`GoParser::parse`]
//! and [`GoParser::validate`] turn the first `ERROR`/`MISSING` node into
//! [`ParseError::Syntax`] with its line and column, so invalid files are
//! never half-read.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod decls;
pub mod error;
mod parser;
pub mod queries;
mod syntax;

// Re-export main types for convenient access
pub use decls::{extract_declarations, Declarations};
pub use error::ParseError;
pub use parser::{GoParser, ParseResult};
pub use syntax::first_syntax_error;
