//! Tree-sitter based structural index for Python sources.
//!
//! The index is built once per file and records every function, class and
//! assignment target in depth-first pre-order together with its line span.

use std::ops::Range;

use omni_types::{SymbolKind, SymbolSpan, split_qualified};
use tree_sitter::{Language, Node, Parser, TreeCursor};

use crate::error::AstError;

/// A definition found while walking the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Kind of definition.
    pub kind: SymbolKind,
    /// Bare identifier.
    pub name: String,
    /// 1-based inclusive line span.
    pub span: SymbolSpan,
    /// Byte range of the node, used for containment checks.
    pub bytes: Range<usize>,
}

/// Tree-sitter parser configured for Python.
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new parser.
    ///
    /// # Errors
    /// `AstError::Language` when the grammar ABI does not match the runtime.
    pub fn new() -> Result<Self, AstError> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| AstError::Language(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse `code` and index its definitions.
    ///
    /// # Errors
    /// `AstError::SyntaxInvalid` when the tree contains error or missing nodes.
    pub fn index(&mut self, code: &str) -> Result<StructuralIndex, AstError> {
        let tree = self.parser.parse(code, None).ok_or_else(|| AstError::SyntaxInvalid {
            line: 1,
            detail: "parser produced no tree".to_string(),
        })?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(first_syntax_error(root));
        }

        let mut definitions = Vec::new();
        walk_preorder(&mut root.walk(), |node| {
            if let Some(def) = definition_of(node, code) {
                definitions.push(def);
            }
        });

        Ok(StructuralIndex {
            definitions,
            line_count: code.split('\n').count(),
        })
    }
}

/// Per-file lookup table of definitions.
#[derive(Debug, Clone, Default)]
pub struct StructuralIndex {
    definitions: Vec<Definition>,
    line_count: usize,
}

impl StructuralIndex {
    /// Parse `code` with a fresh parser.
    ///
    /// # Errors
    /// See [`PythonParser::index`].
    pub fn build(code: &str) -> Result<Self, AstError> {
        PythonParser::new()?.index(code)
    }

    /// Every definition in depth-first pre-order.
    #[must_use]
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Number of `\n`-separated lines in the indexed source.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Spans of every definition of `kind` named `name`, in traversal order.
    ///
    /// A qualified `Class.member` name only matches members nested inside the
    /// first class named `Class`.
    #[must_use]
    pub fn find_by_name(&self, kind: SymbolKind, name: &str) -> Vec<SymbolSpan> {
        self.matching(kind, name).map(|d| d.span).collect()
    }

    /// First definition of `kind` named `name`.
    #[must_use]
    pub fn first(&self, kind: SymbolKind, name: &str) -> Option<&Definition> {
        self.matching(kind, name).next()
    }

    fn matching<'a: 'n, 'n>(
        &'a self,
        kind: SymbolKind,
        name: &'n str,
    ) -> Box<dyn Iterator<Item = &'a Definition> + 'n> {
        let Some((owner, member)) = split_qualified(name) else {
            return Box::new(
                self.definitions
                    .iter()
                    .filter(move |d| d.kind == kind && d.name == name),
            );
        };

        let Some(class) = self
            .definitions
            .iter()
            .find(|d| d.kind == SymbolKind::Class && d.name == owner)
        else {
            return Box::new(std::iter::empty());
        };
        let scope = class.bytes.clone();
        Box::new(self.definitions.iter().filter(move |d| {
            d.kind == kind
                && d.name == member
                && d.bytes.start >= scope.start
                && d.bytes.end <= scope.end
        }))
    }
}

fn definition_of(node: Node<'_>, code: &str) -> Option<Definition> {
    let (kind, name_node) = match node.kind() {
        "function_definition" => (SymbolKind::Function, node.child_by_field_name("name")?),
        "class_definition" => (SymbolKind::Class, node.child_by_field_name("name")?),
        "assignment" => {
            let left = node.child_by_field_name("left")?;
            if left.kind() != "identifier" {
                return None;
            }
            (SymbolKind::Variable, left)
        }
        _ => return None,
    };

    let name = name_node.utf8_text(code.as_bytes()).ok()?.to_string();
    Some(Definition {
        kind,
        name,
        span: span_of(node),
        bytes: node.start_byte()..node.end_byte(),
    })
}

fn span_of(node: Node<'_>) -> SymbolSpan {
    let start = node.start_position().row;
    let end_pos = node.end_position();
    let mut end = end_pos.row;
    // A node ending at column 0 stops before that line's content.
    if end_pos.column == 0 && end > start {
        end -= 1;
    }
    SymbolSpan {
        start_line: start + 1,
        end_line: end + 1,
    }
}

fn walk_preorder<'t>(cursor: &mut TreeCursor<'t>, mut visit: impl FnMut(Node<'t>)) {
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn first_syntax_error(root: Node<'_>) -> AstError {
    let mut found: Option<Node<'_>> = None;
    walk_preorder(&mut root.walk(), |node| {
        if found.is_none() && (node.is_error() || node.is_missing()) {
            found = Some(node);
        }
    });

    match found {
        Some(node) if node.is_missing() => AstError::SyntaxInvalid {
            line: node.start_position().row + 1,
            detail: format!("missing `{}`", node.kind()),
        },
        Some(node) => AstError::SyntaxInvalid {
            line: node.start_position().row + 1,
            detail: "unexpected syntax".to_string(),
        },
        None => AstError::SyntaxInvalid {
            line: root.start_position().row + 1,
            detail: "unexpected syntax".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CART: &str = "import os
from typing import Dict, List

items_db: Dict[int, Dict] = {
    1: {\"name\": \"item1\", \"price\": 10},
    2: {\"name\": \"item2\", \"price\": 20}
}

shopping_carts: Dict[int, List[int]] = {}

def add_to_cart(user_id: int, item_id: int):
    if user_id not in shopping_carts:
        shopping_carts[user_id] = []
    shopping_carts[user_id].append(item_id)
    return True

class ShoppingCart:
    def __init__(self, user_id: int):
        self.user_id = user_id
        self.items = []

    async def total(self):
        return 0
";

    #[test]
    fn test_definitions_in_preorder() {
        let index = StructuralIndex::build(CART).unwrap();
        let names: Vec<&str> = index.definitions().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "items_db",
                "shopping_carts",
                "add_to_cart",
                "ShoppingCart",
                "__init__",
                "total"
            ]
        );
    }

    #[test]
    fn test_spans() {
        let index = StructuralIndex::build(CART).unwrap();
        let spans = |kind, name| index.find_by_name(kind, name);
        assert_eq!(
            spans(SymbolKind::Variable, "items_db"),
            vec![SymbolSpan {
                start_line: 4,
                end_line: 7
            }]
        );
        assert_eq!(
            spans(SymbolKind::Function, "add_to_cart"),
            vec![SymbolSpan {
                start_line: 11,
                end_line: 15
            }]
        );
        assert_eq!(
            spans(SymbolKind::Class, "ShoppingCart"),
            vec![SymbolSpan {
                start_line: 17,
                end_line: 23
            }]
        );
    }

    #[test]
    fn test_async_and_qualified() {
        let index = StructuralIndex::build(CART).unwrap();
        assert_eq!(
            index.find_by_name(SymbolKind::Function, "ShoppingCart.total"),
            vec![SymbolSpan {
                start_line: 22,
                end_line: 23
            }]
        );
        assert!(
            index
                .find_by_name(SymbolKind::Function, "Missing.total")
                .is_empty()
        );
    }

    #[test]
    fn test_nested_owner_scopes_to_inner_class() {
        let code = "class Outer:\n    class Inner:\n        def run(self):\n            pass\n\n    def run(self):\n        pass\n";
        let index = StructuralIndex::build(code).unwrap();
        assert_eq!(
            index.find_by_name(SymbolKind::Function, "Outer.Inner.run"),
            vec![SymbolSpan {
                start_line: 3,
                end_line: 4
            }]
        );
    }

    #[test]
    fn test_attribute_targets_ignored() {
        let index = StructuralIndex::build(CART).unwrap();
        assert!(index.find_by_name(SymbolKind::Variable, "user_id").is_empty());
        assert!(index.find_by_name(SymbolKind::Variable, "items").is_empty());
    }

    #[test]
    fn test_syntax_invalid() {
        let err = StructuralIndex::build("def broken(:\n    pass\n").unwrap_err();
        assert!(matches!(err, AstError::SyntaxInvalid { line: 1, .. }));
    }
}
