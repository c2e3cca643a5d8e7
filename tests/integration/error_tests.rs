use blockdupe::config::{ConfigError, ScanConfig};
use blockdupe::duplicates::{DuplicateFinder, FinderError};
use blockdupe::scanner::ScanError;
use std::fs::{self, File};
use tempfile::tempdir;

#[test]
fn test_scan_non_existent_path() {
    let finder = DuplicateFinder::new(ScanConfig::new("/non/existent/path/12345"));
    let result = finder.find_duplicates();

    match result {
        Err(FinderError::PathNotFound(path)) => {
            assert!(path.to_string_lossy().contains("non/existent/path/12345"));
        }
        _ => panic!("Expected PathNotFound error, got {:?}", result),
    }
}

#[test]
fn test_scan_file_instead_of_directory() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("file.txt");
    File::create(&file_path).unwrap();

    let finder = DuplicateFinder::new(ScanConfig::new(&file_path));
    let result = finder.find_duplicates();

    match result {
        Err(FinderError::NotADirectory(path)) => {
            assert!(path.to_string_lossy().contains("file.txt"));
        }
        _ => panic!("Expected NotADirectory error, got {:?}", result),
    }
}

#[test]
fn test_invalid_mask_fails_before_walking() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()).with_mask("a[b"));

    match finder.find_duplicates() {
        Err(FinderError::Config(ConfigError::InvalidPattern { pattern, .. })) => {
            assert_eq!(pattern, "a[b");
        }
        other => panic!("Expected InvalidPattern error, got {:?}", other),
    }
}

#[test]
fn test_zero_block_size_is_rejected() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()).with_block_size(0));

    assert!(matches!(
        finder.find_duplicates(),
        Err(FinderError::Config(ConfigError::InvalidBlockSize))
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_aborts_recursive_scan() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inside.txt"), b"hidden").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to assert in that case
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()).with_level(1));
    let result = finder.find_duplicates();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(
        result,
        Err(FinderError::Scan(ScanError::PermissionDenied(_)))
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_ignored_at_level_zero() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("b.txt"), b"same").unwrap();

    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()));
    let result = finder.find_duplicates();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let (groups, _) = result.unwrap();
    assert_eq!(groups.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_reported_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("c_locked.txt");
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("b.txt"), b"same").unwrap();
    fs::write(&locked, b"same").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if File::open(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()));
    let result = finder.find_duplicates();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    let (groups, summary) = result.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.comparison_errors, 1);
}
