//! Tests for config module - settings file merging.

use std::fs;

use tempfile::TempDir;

use omni_io::LineEnding;
use omni_repair::{RepairError, load_settings_file, load_settings_from_paths};

#[test]
fn test_user_overrides_system() {
    let dir = TempDir::new().expect("Create temp dir");
    let system = dir.path().join("system.yaml");
    let user = dir.path().join("user.yaml");
    fs::write(
        &system,
        "locate:\n  context_window: 5\n  top_n_files: 4\nrepair:\n  max_samples: 3\n",
    )
    .expect("Write system");
    fs::write(&user, "locate:\n  context_window: 1\nrepair:\n  line_ending: lf\n")
        .expect("Write user");

    let config = load_settings_from_paths(&system, &user).resolve();
    assert_eq!(config.context_window, 1);
    assert_eq!(config.top_n_files, 4);
    assert_eq!(config.max_samples, 3);
    assert_eq!(config.line_ending, LineEnding::Lf);
}

#[test]
fn test_missing_and_invalid_files_are_ignored() {
    let dir = TempDir::new().expect("Create temp dir");
    let system = dir.path().join("system.yaml");
    fs::write(&system, "locate: 12\n").expect("Write system");

    let config = load_settings_from_paths(&system, &dir.path().join("absent.yaml")).resolve();
    assert_eq!(config.context_window, 0);
    assert_eq!(config.top_n_files, 3);
}

#[test]
fn test_explicit_file_is_strict() {
    let dir = TempDir::new().expect("Create temp dir");
    let missing = dir.path().join("absent.yaml");
    assert!(matches!(
        load_settings_file(&missing),
        Err(RepairError::Settings { .. })
    ));

    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "oracle:\n  max_tokens: lots\n").expect("Write bad");
    assert!(matches!(
        load_settings_file(&bad),
        Err(RepairError::Settings { .. })
    ));
}
