//! Pre-compiled tree-sitter queries for Go declaration extraction.
//!
//! This module provides the [`DECLARATION_QUERY`] constant containing
//! S-expression patterns anchored at `source_file`, and
//! [`get_declaration_query`] for lazily compiling and caching the query.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;

/// Tree-sitter query for the package clause and top-level `const` declarations.
///
/// Both patterns are anchored on `source_file`, so declarations nested in
/// function bodies never match.
///
/// # Capture Names
///
/// - `package.name` - The identifier of the `package` clause
/// - `const.declaration` - A top-level `const_declaration` node
pub const DECLARATION_QUERY: &str = r"
; package name
(source_file
  (package_clause
    (package_identifier) @package.name))

; const X T = v  /  const ( ... )
(source_file
  (const_declaration) @const.declaration)
";

/// Capture index for `package.name`.
pub const CAPTURE_PACKAGE_NAME: u32 = 0;

/// Capture index for `const.declaration`.
pub const CAPTURE_CONST_DECLARATION: u32 = 1;

/// Global cache for the compiled declaration query.
static COMPILED_QUERY: OnceLock<Query> = OnceLock::new();

/// Returns the compiled declaration query.
///
/// The query is compiled once and cached for all subsequent calls.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn get_declaration_query() -> Result<&'static Query, ParseError> {
    if let Some(query) = COMPILED_QUERY.get() {
        return Ok(query);
    }

    let language: Language = tree_sitter_go::LANGUAGE.into();
    let query = compile_query(&language)?;

    Ok(COMPILED_QUERY.get_or_init(|| query))
}

/// Compiles the declaration query for the given language.
fn compile_query(language: &Language) -> Result<Query, ParseError> {
    Query::new(language, DECLARATION_QUERY).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_compiles() {
        let language: Language = tree_sitter_go::LANGUAGE.into();
        let result = compile_query(&language);
        assert!(result.is_ok(), "Query should compile: {result:?}");
    }

    #[test]
    fn test_capture_indices() {
        let query = get_declaration_query().expect("Query should compile");
        let names = query.capture_names();
        assert_eq!(names[CAPTURE_PACKAGE_NAME as usize], "package.name");
        assert_eq!(names[CAPTURE_CONST_DECLARATION as usize], "const.declaration");
        assert_eq!(query.pattern_count(), 2);
    }
}
