//! Tests for diff module - unified diff generation.

use omni_edit::file_diff;

#[test]
fn test_addition_only() {
    let diff = file_diff("new.py", "", "new line\n");
    assert!(diff.contains("+new line\n"));
    assert!(!diff.contains("\n-"));
}

#[test]
fn test_distant_changes_get_separate_hunks() {
    let old: String = (1..=20).map(|n| format!("v{n} = {n}\n")).collect();
    let new = old.replace("v2 = 2\n", "v2 = 0\n").replace("v19 = 19\n", "v19 = 0\n");

    let diff = file_diff("vars.py", &old, &new);

    assert_eq!(diff.matches("\n@@ ").count(), 2);
    assert!(!diff.contains(" v10 = 10\n"));
}

#[test]
fn test_file_diff_is_git_style() {
    let old = "def total(cart):\n    t = 0\n    for i in cart:\n        t += i\n    return t\n";
    let new = old.replace("t += i\n", "t += i.price\n");

    let diff = file_diff("cart.py", old, &new);

    assert!(diff.starts_with("--- a/cart.py\n+++ b/cart.py\n@@"));
    assert!(diff.contains("-        t += i\n"));
    assert!(diff.contains("+        t += i.price\n"));
}

#[test]
fn test_file_diff_empty_when_unchanged() {
    assert_eq!(file_diff("cart.py", "x = 1\n", "x = 1\n"), "");
}
