//! Go parser management using tree-sitter.
//!
//! This module provides the [`GoParser`] struct for parsing Go files and
//! extracting their top-level constant declarations.

use mc_core::DeclarationGroup;
use tree_sitter::{Language, Parser, Tree};

use crate::decls::extract_declarations;
use crate::error::ParseError;
use crate::queries::get_declaration_query;
use crate::syntax::first_syntax_error;

/// Result of parsing a Go file.
#[derive(Debug)]
pub struct ParseResult {
    /// Name from the `package` clause.
    pub package_name: String,

    /// Top-level constant declaration groups in source order.
    pub groups: Vec<DeclarationGroup>,

    /// The syntax tree from parsing.
    pub tree: Tree,
}

/// Go parser for extracting constant declarations from source files.
///
/// Wraps a tree-sitter parser configured for Go. The parser can be reused
/// for multiple files to avoid repeated initialization.
///
/// `GoParser` is `Send` but not `Sync`; the compiled query behind it is
/// shared globally.
///
/// # Examples
///
/// ```
/// use mc_go_parser::GoParser;
///
/// let mut parser = GoParser::new()?;
/// let source = "package paint\n\nconst (\n\tRed Color = iota\n\tGreen\n)\n";
/// let result = parser.parse(source)?;
///
/// assert_eq!(result.package_name, "paint");
/// assert_eq!(result.groups[0].specs.len(), 2);
/// # Ok::<(), mc_go_parser::ParseError>(())
/// ```
pub struct GoParser {
    /// The underlying tree-sitter parser.
    parser: Parser,
    /// The Go language for the parser.
    language: Language,
}

impl GoParser {
    /// Creates a new Go parser.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the Go language cannot be set
    /// on the parser.
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_go::LANGUAGE.into();

        parser
            .set_language(&language)
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self { parser, language })
    }

    /// Parses Go source and extracts its constant declaration groups.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Parse`] if tree-sitter produced no tree
    /// - [`ParseError::Syntax`] if the source is not valid Go
    /// - [`ParseError::MissingPackageClause`] if there is no `package` clause
    /// - [`ParseError::QueryCompile`] if the declaration query fails to compile
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, ParseError> {
        let tree = self.parse_tree(source)?;

        let query = get_declaration_query()?;
        let declarations = extract_declarations(&tree, source, query);
        let package_name = declarations
            .package_name
            .ok_or(ParseError::MissingPackageClause)?;

        Ok(ParseResult {
            package_name,
            groups: declarations.groups,
            tree,
        })
    }

    /// Checks that `source` is syntactically valid Go.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] with the first error position, or
    /// [`ParseError::Parse`] if tree-sitter produced no tree.
    pub fn validate(&mut self, source: &str) -> Result<(), ParseError> {
        self.parse_tree(source).map(drop)
    }

    fn parse_tree(&mut self, source: &str) -> Result<Tree, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::Parse)?;

        match first_syntax_error(&tree, source) {
            Some(err) => Err(err),
            None => Ok(tree),
        }
    }

    /// Returns the tree-sitter language used by this parser.
    #[inline]
    pub fn language(&self) -> &Language {
        &self.language
    }
}

impl std::fmt::Debug for GoParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoParser")
            .field("language", &"Go")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_core::TypeExpr;

    #[test]
    fn test_parser_new() {
        assert!(GoParser::new().is_ok());
    }

    #[test]
    fn test_parse_iota_group() {
        let mut parser = GoParser::new().expect("Parser creation failed");
        let source = r"package week

type Day int

const (
	Sunday Day = iota
	Monday
	Tuesday
)
";
        let result = parser.parse(source).expect("Parse failed");
        assert_eq!(result.package_name, "week");
        assert_eq!(result.groups.len(), 1);

        let specs = &result.groups[0].specs;
        assert_eq!(specs[0].ty, Some(TypeExpr::named("Day")));
        assert!(specs[1].ty.is_none());
        assert_eq!(specs[2].first_name(), "Tuesday");
        assert_eq!(specs[2].location.line, 8);
    }

    #[test]
    fn test_parse_syntax_error() {
        let mut parser = GoParser::new().expect("Parser creation failed");
        let err = parser
            .parse("package p\n\nconst ( A = \n")
            .expect_err("should fail");
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_parse_missing_package_clause() {
        let mut parser = GoParser::new().expect("Parser creation failed");
        let err = parser.parse("const A = 1\n").expect_err("should fail");
        assert!(matches!(
            err,
            ParseError::MissingPackageClause | ParseError::Syntax { .. }
        ));
    }

    #[test]
    fn test_parse_reuses_parser() {
        let mut parser = GoParser::new().expect("Parser creation failed");
        let first = parser.parse("package a\n").expect("Parse failed");
        let second = parser.parse("package b\n\nconst X = 1\n").expect("Parse failed");
        assert_eq!(first.package_name, "a");
        assert_eq!(second.package_name, "b");
        assert_eq!(second.groups.len(), 1);
    }

    #[test]
    fn test_validate() {
        let mut parser = GoParser::new().expect("Parser creation failed");
        assert!(parser.validate("package p\n\nvar M = map[string]T{\n\t\"A\": A,\n}\n").is_ok());
        assert!(parser.validate("package p\n\nvar M = map[string]{\n").is_err());
    }

    #[test]
    fn test_parser_debug() {
        let parser = GoParser::new().expect("Parser creation failed");
        let debug = format!("{parser:?}");
        assert!(debug.contains("GoParser"));
    }
}
