use blockdupe::config::ScanConfig;
use blockdupe::duplicates::DuplicateFinder;
use blockdupe::scanner::HashAlgorithm;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
    path.to_path_buf()
}

/// Canonical form of a path inside the scanned root, as reported by the finder.
fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()));

    let (groups, summary) = finder.find_duplicates().unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"content a");
    write_file(&dir.path().join("b.txt"), b"content b");
    write_file(&dir.path().join("c.txt"), b"content c");

    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()));
    let (groups, summary) = finder.find_duplicates().unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.candidates, 3);
}

#[test]
fn test_identical_pair_with_small_blocks() {
    let dir = tempdir().unwrap();
    let a = write_file(&dir.path().join("a.txt"), b"0123456789");
    let b = write_file(&dir.path().join("b.txt"), b"0123456789");

    let config = ScanConfig::new(dir.path())
        .with_mask("*.txt")
        .with_min_size(0)
        .with_block_size(4);
    let (groups, summary) = DuplicateFinder::new(config).find_duplicates().unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert!(groups[0].contains(&canonical(&a)));
    assert!(groups[0].contains(&canonical(&b)));
    assert_eq!(summary.reclaimable_space, 10);
}

#[test]
fn test_size_mismatch_is_not_duplicate() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"0123456789");
    write_file(&dir.path().join("b.txt"), b"0123456789ab");

    let config = ScanConfig::new(dir.path())
        .with_mask("*.txt")
        .with_min_size(0)
        .with_block_size(4);
    let (groups, summary) = DuplicateFinder::new(config).find_duplicates().unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.comparisons, 1);
    assert_eq!(summary.storage_reads, 0);
}

#[test]
fn test_level_zero_ignores_subdirectories() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("top.bin"), b"shared content");
    write_file(&dir.path().join("sub/nested.bin"), b"shared content");

    let config = ScanConfig::new(dir.path()).with_level(0);
    let (groups, summary) = DuplicateFinder::new(config).find_duplicates().unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.candidates, 1);
}

#[test]
fn test_level_one_recurses() {
    let dir = tempdir().unwrap();
    let top = write_file(&dir.path().join("top.bin"), b"shared content");
    let nested = write_file(&dir.path().join("sub/deeper/nested.bin"), b"shared content");

    let config = ScanConfig::new(dir.path()).with_level(1);
    let (groups, _) = DuplicateFinder::new(config).find_duplicates().unwrap();

    assert_eq!(groups.len(), 1);
    assert!(groups[0].contains(&canonical(&top)));
    assert!(groups[0].contains(&canonical(&nested)));
}

#[test]
fn test_crc32_and_md5_agree() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("1.dat"), &[7u8; 10_000]);
    write_file(&dir.path().join("2.dat"), &[7u8; 10_000]);
    write_file(&dir.path().join("3.dat"), &[8u8; 10_000]);
    let mut almost = vec![7u8; 10_000];
    almost[9_999] = 0;
    write_file(&dir.path().join("4.dat"), &almost);

    let mut results = Vec::new();
    for algorithm in [HashAlgorithm::Crc32, HashAlgorithm::Md5] {
        let config = ScanConfig::new(dir.path())
            .with_block_size(1024)
            .with_algorithm(algorithm);
        let (groups, _) = DuplicateFinder::new(config).find_duplicates().unwrap();
        results.push(groups);
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[0].len(), 1);
    assert_eq!(results[0][0].len(), 2);
}

#[test]
fn test_block_size_does_not_change_result() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..5_000u32).map(|i| (i % 251) as u8).collect();
    write_file(&dir.path().join("a.bin"), &content);
    write_file(&dir.path().join("b.bin"), &content);
    let mut changed = content.clone();
    changed[2_500] ^= 0xFF;
    write_file(&dir.path().join("c.bin"), &changed);

    for block_size in [1, 7, 512, 4096, 1 << 20] {
        let config = ScanConfig::new(dir.path()).with_block_size(block_size);
        let (groups, _) = DuplicateFinder::new(config).find_duplicates().unwrap();

        assert_eq!(groups.len(), 1, "block size {block_size}");
        assert_eq!(groups[0].len(), 2, "block size {block_size}");
    }
}

#[test]
fn test_multiple_groups_are_disjoint() {
    let dir = tempdir().unwrap();
    for name in ["a1", "a2", "a3"] {
        write_file(&dir.path().join(name), b"group a data");
    }
    for name in ["b1", "b2"] {
        write_file(&dir.path().join(name), b"group b data");
    }
    write_file(&dir.path().join("loner"), b"nothing else");

    let (groups, summary) = DuplicateFinder::new(ScanConfig::new(dir.path()))
        .find_duplicates()
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(summary.duplicate_files, 3);
    let total: usize = groups.iter().map(|g| g.len()).sum();
    let unique: std::collections::BTreeSet<_> = groups.iter().flat_map(|g| g.paths.iter()).collect();
    assert_eq!(total, unique.len());
}

#[test]
fn test_results_are_deterministic() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        write_file(&dir.path().join(format!("f{i}.txt")), format!("v{}", i % 3).as_bytes());
    }

    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()));
    let (first, _) = finder.find_duplicates().unwrap();
    let (second, _) = finder.find_duplicates().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_default_min_size_skips_empty_files() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("empty1"), b"");
    write_file(&dir.path().join("empty2"), b"");

    let (groups, summary) = DuplicateFinder::new(ScanConfig::new(dir.path()))
        .find_duplicates()
        .unwrap();
    assert!(groups.is_empty());
    assert_eq!(summary.candidates, 0);

    let config = ScanConfig::new(dir.path()).with_min_size(0);
    let (groups, _) = DuplicateFinder::new(config).find_duplicates().unwrap();
    assert_eq!(groups.len(), 1);
}

#[test]
fn test_relative_root_reports_absolute_paths() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a"), b"same");
    write_file(&dir.path().join("b"), b"same");
    fs::create_dir(dir.path().join("sub")).unwrap();
    let relative = dir.path().join("sub").join("..");

    let (groups, _) = DuplicateFinder::new(ScanConfig::new(&relative))
        .find_duplicates()
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert!(groups[0].paths.iter().all(|p| p.is_absolute()));
    assert!(groups[0].paths.iter().all(|p| !p.to_string_lossy().contains("..")));
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_is_compared_like_a_file() {
    let dir = tempdir().unwrap();
    let a = write_file(&dir.path().join("a.txt"), b"linked content");
    std::os::unix::fs::symlink(&a, dir.path().join("link.txt")).unwrap();

    let config = ScanConfig::new(dir.path()).with_min_size(0);
    let (groups, summary) = DuplicateFinder::new(config).find_duplicates().unwrap();

    let root = canonical(dir.path());
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.candidates, 2);
    assert_eq!(groups.len(), 1);
    assert!(groups[0].contains(&root.join("a.txt")));
    assert!(groups[0].contains(&root.join("link.txt")));
}
