//! Condensed structural preview of a source file.
//!
//! Keeps imports, definition headers and top-level declarations; everything
//! else collapses into elision rows. Pure keyword/indentation heuristic, no
//! parser involved.

use serde::Serialize;

const DEFINITION_MARKERS: [&str; 3] = ["class ", "def ", "async def "];
const DECLARATION_MARKERS: [&str; 6] = ["var", "let", "const", ": Dict", ": List", ": Set"];
const IMPORT_MARKERS: [&str; 2] = ["import ", "from "];

/// One output row of a skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum SkeletonRow {
    /// A retained source line.
    Line {
        /// Original 1-based line number.
        number: usize,
        /// Exact original line text.
        text: String,
    },
    /// A run of omitted lines.
    Elision,
}

/// Retained lines of a file, in original order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Skeleton {
    rows: Vec<SkeletonRow>,
    total_lines: usize,
}

impl Skeleton {
    /// Scan `content` and keep its structural lines.
    #[must_use]
    pub fn build(content: &str) -> Self {
        let mut rows = Vec::new();
        let mut last_kept = 0usize;
        let mut total_lines = 0usize;

        for (idx, line) in content.split('\n').enumerate() {
            total_lines += 1;
            let number = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            if !is_structural(line) {
                continue;
            }
            if last_kept > 0 && number - last_kept > 1 {
                rows.push(SkeletonRow::Elision);
            }
            rows.push(SkeletonRow::Line {
                number,
                text: line.to_string(),
            });
            last_kept = number;
        }

        Self { rows, total_lines }
    }

    /// All rows, elisions included.
    #[must_use]
    pub fn rows(&self) -> &[SkeletonRow] {
        &self.rows
    }

    /// Retained `(line_number, text)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.rows.iter().filter_map(|row| match row {
            SkeletonRow::Line { number, text } => Some((*number, text.as_str())),
            SkeletonRow::Elision => None,
        })
    }

    /// Whether nothing was retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render rows joined by newline.
    ///
    /// With `line_numbers`, each row is `{n:>width} |{line}` and elisions are
    /// padded to the numbering column width.
    #[must_use]
    pub fn render(&self, line_numbers: bool) -> String {
        let width = self.total_lines.to_string().len();
        let rendered: Vec<String> = self
            .rows
            .iter()
            .map(|row| match (row, line_numbers) {
                (SkeletonRow::Line { number, text }, true) => format!("{number:>width$} |{text}"),
                (SkeletonRow::Line { text, .. }, false) => text.clone(),
                (SkeletonRow::Elision, true) => format!("...{}", " ".repeat(width)),
                (SkeletonRow::Elision, false) => "...".to_string(),
            })
            .collect();
        rendered.join("\n")
    }
}

/// Build and render a skeleton in one call.
#[must_use]
pub fn create_skeleton(content: &str, line_numbers: bool) -> String {
    Skeleton::build(content).render(line_numbers)
}

fn is_structural(line: &str) -> bool {
    let stripped = line.trim();
    if DEFINITION_MARKERS.iter().any(|m| stripped.contains(m)) {
        return true;
    }
    if stripped.contains('=') && !stripped.starts_with('#') {
        // Assignments only qualify as top-level declarations; they never fall
        // through to the import check.
        let indent = line.len() - line.trim_start().len();
        let lhs = stripped.split('=').next().unwrap_or_default();
        return indent == 0 && DECLARATION_MARKERS.iter().any(|m| lhs.contains(m));
    }
    IMPORT_MARKERS.iter().any(|m| stripped.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "import os
from typing import List

class TestClass:
    def __init__(self):
        self.x = 1
        some_var = 42

    def test_method(self):
        local_var = 123
        pass

def main_function():
    # Some comment
    x = 5
    my_list: List[int] = []
    return x

# Some space here


var = 10
items_db: Dict[int, Dict] = {}
";

    #[test]
    fn test_numbered_skeleton() {
        let expected = [
            " 1 |import os",
            " 2 |from typing import List",
            "...  ",
            " 4 |class TestClass:",
            " 5 |    def __init__(self):",
            "...  ",
            " 9 |    def test_method(self):",
            "...  ",
            "13 |def main_function():",
            "...  ",
            "22 |var = 10",
            "23 |items_db: Dict[int, Dict] = {}",
        ]
        .join("\n");
        assert_eq!(create_skeleton(SAMPLE, true), expected);
    }

    #[test]
    fn test_plain_skeleton() {
        let out = create_skeleton(SAMPLE, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "import os");
        assert_eq!(lines[2], "...");
        assert!(lines.contains(&"    def test_method(self):"));
        assert!(!out.contains("my_list"));
    }

    #[test]
    fn test_assignment_does_not_fall_through_to_imports() {
        let skeleton = Skeleton::build("x = 'import this'\nimport sys\n");
        let kept: Vec<usize> = skeleton.entries().map(|(n, _)| n).collect();
        assert_eq!(kept, vec![2]);
    }

    #[test]
    fn test_empty_input() {
        assert!(Skeleton::build("").is_empty());
        assert_eq!(create_skeleton("", true), "");
    }
}
