//! Tests for block module - SEARCH/REPLACE parsing.

use omni_edit::{parse_blocks, parse_edit_operations, render_block};
use omni_types::{CollectingSink, DiagnosticKind, LineHint};

const SUGGESTION: &str = r#"The total ignores prices.

```python
### app/cart.py
<<<<<<< SEARCH (line 4-4)
        t += i
=======
        t += i.price
>>>>>>> REPLACE
```

And the tax helper:

```python
### app/tax.py
<<<<<<< SEARCH
def rate():

    return 0.1
=======
def rate():

    return 0.2
>>>>>>> REPLACE
<<<<<<< SEARCH (line 9)
x = 1
=======
x = 2
>>>>>>> REPLACE
```
"#;

#[test]
fn test_parses_blocks_in_order() {
    let outcomes = parse_blocks(SUGGESTION);
    assert_eq!(outcomes.len(), 3);
    let ops: Vec<_> = outcomes.into_iter().map(Result::unwrap).collect();

    assert_eq!(ops[0].file, "app/cart.py");
    assert_eq!(ops[0].line_hint, Some(LineHint { start: 4, end: 4 }));
    assert_eq!(ops[0].old_text, "        t += i");
    assert_eq!(ops[0].new_text, "        t += i.price");

    assert_eq!(ops[1].file, "app/tax.py");
    assert_eq!(ops[1].line_hint, None);
    assert_eq!(ops[1].old_text, "def rate():\n\n    return 0.1");

    assert_eq!(ops[2].file, "app/tax.py");
    assert_eq!(ops[2].line_hint, Some(LineHint { start: 9, end: 9 }));
    assert!(ops[2].raw_block.contains("### app/tax.py"));
}

#[test]
fn test_round_trip() {
    for outcome in parse_blocks(SUGGESTION) {
        let op = outcome.unwrap();
        let reparsed = parse_blocks(&render_block(&op));
        assert_eq!(reparsed.len(), 1);
        let again = reparsed.into_iter().next().unwrap().unwrap();
        assert_eq!(again.file, op.file);
        assert_eq!(again.old_text, op.old_text);
        assert_eq!(again.new_text, op.new_text);
        assert_eq!(again.line_hint, op.line_hint);
    }
}

#[test]
fn test_malformed_blocks_dropped_individually() {
    let text = "```\n### a.py\n<<<<<<< SEARCH\nx = 1\n>>>>>>> REPLACE\n```\n\
                ```\n<<<<<<< SEARCH\nx = 1\n=======\nx = 2\n>>>>>>> REPLACE\n```\n\
                ```\n### b.py\n<<<<<<< SEARCH\ny = 1\n=======\ny = 2\n>>>>>>> REPLACE\n```\n";
    let sink = CollectingSink::new();
    let ops = parse_edit_operations(text, &sink);

    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].file, "b.py");
    assert_eq!(sink.count(DiagnosticKind::MalformedBlock), 2);
}

#[test]
fn test_unterminated_block_is_malformed() {
    let outcomes = parse_blocks("```\n### a.py\n<<<<<<< SEARCH\nx = 1\n=======\nx = 2\n```");
    assert_eq!(outcomes.len(), 1);
    let malformed = outcomes[0].as_ref().unwrap_err();
    assert_eq!(malformed.file.as_deref(), Some("a.py"));
}

#[test]
fn test_prose_without_fences_yields_nothing() {
    assert!(parse_blocks("No changes are needed here.").is_empty());
    assert!(parse_blocks("```python\nprint('just code')\n```").is_empty());
}

#[test]
fn test_header_without_block_is_malformed() {
    let outcomes = parse_blocks("```\n### a.py\nprint('hi')\n```");
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_err());
}

#[test]
fn test_empty_replacement_kept_empty() {
    let ops: Vec<_> = parse_blocks("```\n### a.py\n<<<<<<< SEARCH\nx = 1\n=======\n>>>>>>> REPLACE\n```")
        .into_iter()
        .map(Result::unwrap)
        .collect();
    assert_eq!(ops[0].new_text, "");
    assert_eq!(ops[0].old_text, "x = 1");
}
