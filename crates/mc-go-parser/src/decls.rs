//! Constant declaration extraction from a parsed Go syntax tree.
//!
//! Runs the declaration query over the tree and converts every top-level
//! `const_declaration` node into a [`DeclarationGroup`]. The relevant
//! grammar shapes are:
//!
//! ```text
//! const_declaration := 'const' ( const_spec | '(' { const_spec ';' } ')' )
//! const_spec        := name { ',' name } [ [ type ] '=' expression_list ]
//! ```

use mc_core::{ConstSpec, DeclarationGroup, SourceLocation, TypeExpr};
use smallvec::SmallVec;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor, Tree};

use crate::queries::{CAPTURE_CONST_DECLARATION, CAPTURE_PACKAGE_NAME};

/// Node kind of one spec inside a `const_declaration`.
const CONST_SPEC: &str = "const_spec";

/// Node kind of a bare type name.
const TYPE_IDENTIFIER: &str = "type_identifier";

/// Package name and constant groups of one file.
#[derive(Debug, Default)]
pub struct Declarations {
    /// The `package` clause name, if present.
    pub package_name: Option<String>,
    /// Top-level constant groups in source order.
    pub groups: Vec<DeclarationGroup>,
}

/// Extracts the package name and top-level constant groups from a tree.
///
/// # Arguments
///
/// * `tree` - The parsed syntax tree
/// * `source` - The source text the tree was parsed from
/// * `query` - The compiled declaration query
pub fn extract_declarations(tree: &Tree, source: &str, query: &Query) -> Declarations {
    let mut declarations = Declarations::default();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());

    while let Some(matched) = matches.next() {
        for capture in matched.captures {
            match capture.index {
                CAPTURE_PACKAGE_NAME => {
                    declarations.package_name = Some(node_text(capture.node, source).to_owned());
                }
                CAPTURE_CONST_DECLARATION => {
                    declarations.groups.push(extract_group(capture.node, source));
                }
                _ => {}
            }
        }
    }

    declarations
        .groups
        .sort_by_key(|group| group.location.byte_offset);
    declarations
}

/// Converts one `const_declaration` node into a group.
fn extract_group(node: Node<'_>, source: &str) -> DeclarationGroup {
    let mut cursor = node.walk();
    let specs = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == CONST_SPEC)
        .map(|spec| extract_spec(spec, source))
        .collect();

    DeclarationGroup {
        specs,
        location: location_of(node),
    }
}

/// Converts one `const_spec` node.
fn extract_spec(node: Node<'_>, source: &str) -> ConstSpec {
    let mut cursor = node.walk();
    let names: SmallVec<[String; 1]> = node
        .children_by_field_name("name", &mut cursor)
        .filter(Node::is_named)
        .map(|name| node_text(name, source).to_owned())
        .collect();

    let ty = node.child_by_field_name("type").map(|ty| {
        let text = node_text(ty, source);
        if ty.kind() == TYPE_IDENTIFIER {
            TypeExpr::named(text)
        } else {
            TypeExpr::other(text)
        }
    });

    ConstSpec {
        names,
        ty,
        has_value: node.child_by_field_name("value").is_some(),
        location: location_of(node),
    }
}

/// Returns the source text covered by a node.
pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Converts a node's start position into a [`SourceLocation`].
pub(crate) fn location_of(node: Node<'_>) -> SourceLocation {
    let point = node.start_position();
    SourceLocation::new(
        to_u32(point.row).saturating_add(1),
        to_u32(point.column),
        to_u32(node.start_byte()),
    )
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::get_declaration_query;

    fn extract(source: &str) -> Declarations {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .expect("Go language");
        let tree = parser.parse(source, None).expect("tree");
        let query = get_declaration_query().expect("query");
        extract_declarations(&tree, source, query)
    }

    #[test]
    fn test_extract_package_name() {
        let decls = extract("package colors\n");
        assert_eq!(decls.package_name.as_deref(), Some("colors"));
        assert!(decls.groups.is_empty());
    }

    #[test]
    fn test_extract_grouped_specs() {
        let decls = extract(
            r"package p

const (
	A Color = iota
	B
	C = 7
	D, E Color = 1, 2
)
",
        );
        assert_eq!(decls.groups.len(), 1);
        let specs = &decls.groups[0].specs;
        assert_eq!(specs.len(), 4);

        assert_eq!(specs[0].first_name(), "A");
        assert_eq!(specs[0].ty, Some(TypeExpr::named("Color")));
        assert!(specs[0].has_value);

        assert_eq!(specs[1].first_name(), "B");
        assert!(specs[1].ty.is_none());
        assert!(!specs[1].has_value);

        assert!(specs[2].is_untyped_value());

        assert_eq!(specs[3].names.as_slice(), ["D", "E"]);
        assert_eq!(specs[3].ty, Some(TypeExpr::named("Color")));
    }

    #[test]
    fn test_extract_single_spec_and_order() {
        let decls = extract(
            r"package p

const First Kind = 1

const (
	Second Kind = 2
)

const Third = 3
",
        );
        let firsts: Vec<_> = decls
            .groups
            .iter()
            .map(|g| g.specs[0].first_name().to_owned())
            .collect();
        assert_eq!(firsts, vec!["First", "Second", "Third"]);
        assert_eq!(decls.groups[0].location.line, 3);
    }

    #[test]
    fn test_qualified_type_is_other() {
        let decls = extract(
            r#"package p

import "time"

const Tick time.Duration = 5
"#,
        );
        let spec = &decls.groups[0].specs[0];
        assert_eq!(spec.ty, Some(TypeExpr::other("time.Duration")));
    }

    #[test]
    fn test_function_local_consts_ignored() {
        let decls = extract(
            r"package p

func f() {
	const Local Kind = 1
	_ = Local
}
",
        );
        assert!(decls.groups.is_empty());
    }

    #[test]
    fn test_comments_between_specs_ignored() {
        let decls = extract(
            r"package p

const (
	// the first
	A Kind = iota
	B // trailing
)
",
        );
        let names: Vec<_> = decls.groups[0]
            .specs
            .iter()
            .map(|s| s.first_name().to_owned())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
