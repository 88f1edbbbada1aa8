//! Tests for provider module - repository-rooted reads and writes.

use tempfile::TempDir;

use omni_io::{FileProvider, FsProvider, IoError, LineEnding};

#[test]
fn test_read_nested_path() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("app")).unwrap();
    std::fs::write(dir.path().join("app/cart.py"), "items = []\n").unwrap();

    let provider = FsProvider::new(dir.path());
    assert_eq!(provider.read("app/cart.py").unwrap(), "items = []\n");
}

#[test]
fn test_size_limit() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("big.py"), "x = 1\n".repeat(100)).unwrap();

    let provider = FsProvider::new(dir.path()).with_max_bytes(16);
    assert!(matches!(
        provider.read("big.py"),
        Err(IoError::TooLarge(_, 16))
    ));
}

#[test]
fn test_forced_lf() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("m.py"), "a\r\nb\r\n").unwrap();

    let provider = FsProvider::new(dir.path()).with_line_ending(LineEnding::Lf);
    provider.write("m.py", "a\r\nc\r\n").unwrap();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("m.py")).unwrap(),
        "a\nc\n"
    );
}

#[test]
fn test_write_outside_root_rejected() {
    let dir = TempDir::new().unwrap();
    let provider = FsProvider::new(dir.path());
    assert!(matches!(
        provider.write("../escape.py", "x"),
        Err(IoError::OutsideRoot(_))
    ));
}
