//! Syntax error location for error-tolerant tree-sitter trees.
//!
//! Tree-sitter always produces a tree, recovering from errors with `ERROR`
//! and `MISSING` nodes. Go source that needs recovery is not valid Go, so
//! the first such node becomes a [`ParseError::Syntax`].

use tree_sitter::{Node, Tree};

use crate::decls::{location_of, node_text};
use crate::error::ParseError;

/// Longest snippet quoted in an error message.
const SNIPPET_LIMIT: usize = 24;

/// Returns the first syntax error in the tree, or `None` for a clean tree.
pub fn first_syntax_error(tree: &Tree, source: &str) -> Option<ParseError> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }

    let node = find_error_node(root).unwrap_or(root);
    Some(ParseError::Syntax {
        location: location_of(node),
        message: describe(node, source),
    })
}

/// Pre-order search for the first `ERROR` or `MISSING` node, descending only
/// into subtrees that contain one.
fn find_error_node(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn describe(node: Node<'_>, source: &str) -> String {
    if node.is_missing() {
        return format!("expected '{}'", node.kind());
    }

    let text = node_text(node, source);
    let first_line = text.lines().next().unwrap_or_default().trim();
    if first_line.is_empty() {
        return "unexpected end of input".to_owned();
    }

    let snippet: String = first_line.chars().take(SNIPPET_LIMIT).collect();
    if snippet.len() < first_line.len() {
        format!("syntax error near '{snippet}...'")
    } else {
        format!("syntax error near '{snippet}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .expect("Go language");
        parser.parse(source, None).expect("tree")
    }

    #[test]
    fn test_clean_tree_has_no_error() {
        let source = "package p\n\nconst A = 1\n";
        assert!(first_syntax_error(&parse(source), source).is_none());
    }

    #[test]
    fn test_error_reports_line() {
        let source = "package p\n\nconst (\n\tA Kind = 1\n\tB Kind =\n)\n";
        let err = first_syntax_error(&parse(source), source).expect("syntax error");
        let location = err.location().expect("location");
        assert!(location.line >= 3, "unexpected line {}", location.line);
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_garbage_is_error() {
        let source = "package p\n\nvar x = map[string]int{ \"a\": ,, }\n";
        assert!(first_syntax_error(&parse(source), source).is_some());
    }
}
