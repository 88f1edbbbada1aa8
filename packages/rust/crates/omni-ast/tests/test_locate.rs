//! Tests for locate module - symbol spans and excerpts.

use tempfile::TempDir;

use omni_ast::{AstError, StructuralIndex, SymbolLocator};
use omni_types::{Symbol, SymbolKind, SymbolSpan};

/// Sixteen-line module with `foo` on lines 10-12.
fn module_with_foo() -> String {
    let mut lines: Vec<String> = (1..=9).map(|n| format!("v{n} = {n}")).collect();
    lines.push("def foo():".to_string());
    lines.push("    total = v1 + v2".to_string());
    lines.push("    return total".to_string());
    lines.extend((13..=16).map(|n| format!("w{n} = {n}")));
    lines.join("\n")
}

#[test]
fn test_span_without_window() {
    let content = module_with_foo();
    let mut locator = SymbolLocator::new().expect("parser");
    let excerpt = locator
        .locate(&content, &Symbol::function("foo"), 0)
        .expect("parse")
        .expect("found");

    assert_eq!(
        excerpt.span,
        SymbolSpan {
            start_line: 10,
            end_line: 12
        }
    );
    assert_eq!(excerpt.text, "def foo():\n    total = v1 + v2\n    return total");
}

#[test]
fn test_span_with_window() {
    let content = module_with_foo();
    let lines: Vec<&str> = content.split('\n').collect();
    let mut locator = SymbolLocator::new().expect("parser");
    let excerpt = locator
        .locate(&content, &Symbol::function("foo"), 2)
        .expect("parse")
        .expect("found");

    assert_eq!((excerpt.start_line, excerpt.end_line), (8, 14));
    assert_eq!(excerpt.text, lines[7..14].join("\n"));
}

#[test]
fn test_window_clamped_at_file_end() {
    let content = module_with_foo();
    let mut locator = SymbolLocator::new().expect("parser");
    let excerpt = locator
        .locate(&content, &Symbol::variable("w16"), 3)
        .expect("parse")
        .expect("found");
    assert_eq!((excerpt.start_line, excerpt.end_line), (13, 16));
}

#[test]
fn test_annotated_variable() {
    let content = "limits: Dict[str, int] = {\n    \"a\": 1,\n}\nplain = 2\n";
    let mut locator = SymbolLocator::new().expect("parser");
    let annotated = locator
        .locate(content, &Symbol::variable("limits"), 0)
        .expect("parse")
        .expect("found");
    assert_eq!((annotated.span.start_line, annotated.span.end_line), (1, 3));

    let plain = locator
        .locate(content, &Symbol::variable("plain"), 0)
        .expect("parse")
        .expect("found");
    assert_eq!(plain.text, "plain = 2");
}

#[test]
fn test_duplicate_names_first_match_wins() {
    let content = "class A:\n    def run(self):\n        return 1\n\nclass B:\n    def run(self):\n        return 2\n";
    let index = StructuralIndex::build(content).expect("parse");
    assert_eq!(index.find_by_name(SymbolKind::Function, "run").len(), 2);

    let mut locator = SymbolLocator::new().expect("parser");
    let first = locator
        .locate(content, &Symbol::function("run"), 0)
        .expect("parse")
        .expect("found");
    assert_eq!(first.span.start_line, 2);

    let scoped = locator
        .locate(content, &Symbol::function("B.run"), 0)
        .expect("parse")
        .expect("found");
    assert_eq!(scoped.span.start_line, 6);
    assert_eq!(scoped.text, "    def run(self):\n        return 2");
}

#[test]
fn test_file_not_found() {
    let dir = TempDir::new().expect("Create temp dir");
    let mut locator = SymbolLocator::new().expect("parser");
    let result = locator.locate_in_file(
        dir.path().join("missing.py"),
        &Symbol::function("foo"),
        0,
        1024,
    );
    assert!(matches!(result, Err(AstError::NotFound(_))));
}

#[test]
fn test_syntax_invalid_is_distinct() {
    let dir = TempDir::new().expect("Create temp dir");
    let path = dir.path().join("broken.py");
    std::fs::write(&path, "def foo(:\n    return 1\n").expect("write");

    let mut locator = SymbolLocator::new().expect("parser");
    let result = locator.locate_in_file(&path, &Symbol::function("foo"), 0, 1024);
    assert!(matches!(result, Err(AstError::SyntaxInvalid { .. })));
}
