//! Unified diffs for applied fixes using the `similar` crate.

use similar::TextDiff;

const CONTEXT_LINES: usize = 3;

/// Unified diff with `a/` `b/` file headers and `@@` hunk ranges, as `git
/// diff` prints it. Empty when nothing changed.
#[must_use]
pub fn file_diff(file: &str, original: &str, modified: &str) -> String {
    if original == modified {
        return String::new();
    }
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(&format!("a/{file}"), &format!("b/{file}"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_changes() {
        let content = "unchanged content";
        assert!(file_diff("a.py", content, content).is_empty());
    }

    #[test]
    fn test_file_diff_headers() {
        let diff = file_diff("pkg/cart.py", "a = 1\nb = 2\n", "a = 1\nb = 3\n");
        assert!(diff.starts_with("--- a/pkg/cart.py\n+++ b/pkg/cart.py\n"));
        assert!(diff.contains("@@ -1,2 +1,2 @@"));
        assert!(diff.contains("-b = 2\n"));
        assert!(diff.contains("+b = 3\n"));
    }
}
