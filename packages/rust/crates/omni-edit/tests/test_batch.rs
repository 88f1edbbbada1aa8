//! Tests for batch module - sequential application across files.

use std::fs;

use tempfile::TempDir;

use omni_edit::{ApplyConfig, BatchApplier, EditError, PatchApplier};
use omni_io::{FileProvider, FsProvider, IoError};
use omni_types::{CollectingSink, EditOperation, LineHint};

fn edit(file: &str, old: &str, new: &str, hint: Option<LineHint>) -> EditOperation {
    EditOperation {
        file: file.to_string(),
        line_hint: hint,
        old_text: old.to_string(),
        new_text: new.to_string(),
        raw_block: String::new(),
    }
}

#[test]
fn test_later_ops_see_earlier_edits() {
    let dir = TempDir::new().expect("Create temp dir");
    fs::write(dir.path().join("m.py"), "a = 1\nb = 2\nc = 3\n").expect("Write file");
    let repo = FsProvider::new(dir.path());
    let batch = BatchApplier::new(PatchApplier::new(&repo, ApplyConfig::default()));
    let sink = CollectingSink::new();

    let ops = vec![
        // Inserts two lines above `b`, shifting it down.
        edit("m.py", "a = 1", "a = 1\nextra_1 = 0\nextra_2 = 0", Some(LineHint::single(1))),
        // Depends on the first edit having landed.
        edit("m.py", "extra_2 = 0", "extra_2 = 9", Some(LineHint::single(3))),
        edit("m.py", "c = 3", "c = 30", Some(LineHint::single(5))),
    ];
    let report = batch.apply_all(&ops, &sink);

    assert_eq!(report.applied_count(), 3);
    assert_eq!(report.modified_files(), vec!["m.py".to_string()]);
    assert_eq!(
        fs::read_to_string(dir.path().join("m.py")).expect("Read file"),
        "a = 1\nextra_1 = 0\nextra_2 = 9\nb = 2\nc = 30\n"
    );
}

#[test]
fn test_failures_do_not_stop_batch() {
    let dir = TempDir::new().expect("Create temp dir");
    fs::write(dir.path().join("a.py"), "x = 1\n").expect("Write file");
    fs::write(dir.path().join("b.py"), "y = 1\n").expect("Write file");
    let repo = FsProvider::new(dir.path());
    let batch = BatchApplier::new(PatchApplier::new(&repo, ApplyConfig::default()));
    let sink = CollectingSink::new();

    let ops = vec![
        edit("a.py", "not here", "z", None),
        edit("missing.py", "x", "y", None),
        edit("b.py", "y = 1", "y = 2", None),
    ];
    let report = batch.apply_all(&ops, &sink);

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.applied_count(), 1);
    assert_eq!(report.rejected_count(), 2);
    assert_eq!(report.error_count(), 0);
    assert_eq!(sink.diagnostics().len(), 2);
}

/// Provider that refuses every write to one file.
struct FailingWrites {
    inner: FsProvider,
    broken: &'static str,
}

impl FileProvider for FailingWrites {
    fn read(&self, rel_path: &str) -> Result<String, IoError> {
        self.inner.read(rel_path)
    }

    fn write(&self, rel_path: &str, text: &str) -> Result<(), IoError> {
        if rel_path == self.broken {
            return Err(IoError::System(std::io::Error::other("disk full")));
        }
        self.inner.write(rel_path, text)
    }
}

#[test]
fn test_write_failure_abandons_only_that_file() {
    let dir = TempDir::new().expect("Create temp dir");
    fs::write(dir.path().join("bad.py"), "a = 1\nb = 2\n").expect("Write file");
    fs::write(dir.path().join("good.py"), "c = 3\n").expect("Write file");
    let repo = FailingWrites {
        inner: FsProvider::new(dir.path()),
        broken: "bad.py",
    };
    let batch = BatchApplier::new(PatchApplier::new(&repo, ApplyConfig::default()));
    let sink = CollectingSink::new();

    let ops = vec![
        edit("bad.py", "a = 1", "a = 10", None),
        edit("bad.py", "b = 2", "b = 20", None),
        edit("good.py", "c = 3", "c = 30", None),
    ];
    let report = batch.apply_all(&ops, &sink);

    assert!(matches!(report.results[0], Err(EditError::Write { .. })));
    assert!(matches!(report.results[1], Err(EditError::FileAbandoned(ref f)) if f == "bad.py"));
    assert!(report.results[2].as_ref().is_ok_and(|fix| fix.applied));
    assert_eq!(report.error_count(), 2);
    assert_eq!(
        fs::read_to_string(dir.path().join("bad.py")).expect("Read file"),
        "a = 1\nb = 2\n"
    );
}
