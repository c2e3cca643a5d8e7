//! Integration tests for layered configuration.
//!
//! These tests verify the full configuration stack: defaults, TOML file
//! parsing, environment variable overrides and CLI flag overrides.

use blockdupe::cli::{Cli, Commands};
use blockdupe::config::{ConfigError, ConfigOverrides, ScanConfig, DEFAULT_BLOCK_SIZE};
use blockdupe::scanner::HashAlgorithm;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::tempdir;

// =============================================================================
// Helper Functions
// =============================================================================

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all BLOCKDUPE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("BLOCKDUPE_") {
            std::env::remove_var(key);
        }
    }
}

fn load(config_file: &Path, overrides: ConfigOverrides) -> Result<ScanConfig, ConfigError> {
    ScanConfig::load(Some(config_file), overrides)
}

fn root_override(root: &str) -> ConfigOverrides {
    ConfigOverrides {
        root: Some(PathBuf::from(root)),
        ..Default::default()
    }
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn test_missing_config_file_yields_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    let config = load(&dir.path().join("absent.toml"), root_override("/data")).unwrap();

    assert_eq!(config.root, PathBuf::from("/data"));
    assert_eq!(config.level, 0);
    assert_eq!(config.min_size, 1);
    assert_eq!(config.mask, "*");
    assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE);
    assert_eq!(config.algorithm, HashAlgorithm::Crc32);
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
level = 1
min_size = 1024
mask = "*.iso"
block_size = 65536
algorithm = "md5"
exclude = ["tmp", "cache"]
"#,
    )
    .unwrap();

    let config = load(&path, root_override("/data")).unwrap();

    assert_eq!(config.level, 1);
    assert_eq!(config.min_size, 1024);
    assert_eq!(config.mask, "*.iso");
    assert_eq!(config.block_size, 65536);
    assert_eq!(config.algorithm, HashAlgorithm::Md5);
    assert_eq!(config.exclude, vec!["tmp", "cache"]);
}

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "block_size = 512\nmask = \"*.log\"\n").unwrap();

    std::env::set_var("BLOCKDUPE_BLOCK_SIZE", "8192");
    std::env::set_var("BLOCKDUPE_ALGORITHM", "MD5");
    let result = load(&path, root_override("/data"));
    clear_env();

    let config = result.unwrap();
    assert_eq!(config.block_size, 8192);
    assert_eq!(config.algorithm, HashAlgorithm::Md5);
    assert_eq!(config.mask, "*.log");
}

#[test]
fn test_cli_overrides_env_and_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "level = 1\nmin_size = 10\nexclude = [\"tmp\"]\n").unwrap();

    std::env::set_var("BLOCKDUPE_MIN_SIZE", "20");
    let cli = Cli::try_parse_from([
        "blockdupe",
        "scan",
        "/from/cli",
        "--min-size",
        "30",
        "--level",
        "0",
    ])
    .unwrap();
    let Commands::Scan(args) = cli.command;
    let result = load(&path, args.overrides());
    clear_env();

    let config = result.unwrap();
    assert_eq!(config.root, PathBuf::from("/from/cli"));
    assert_eq!(config.min_size, 30);
    assert_eq!(config.level, 0);
    // Not given on the command line, so the file value survives
    assert_eq!(config.exclude, vec!["tmp"]);
}

#[test]
fn test_env_exclude_as_plain_values() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let absent = dir.path().join("absent.toml");

    std::env::set_var("BLOCKDUPE_EXCLUDE", "tmp");
    let single = load(&absent, root_override("/data"));
    std::env::set_var("BLOCKDUPE_EXCLUDE", "tmp,cache");
    let joined = load(&absent, root_override("/data"));
    clear_env();

    assert_eq!(single.unwrap().exclude, vec!["tmp"]);
    assert_eq!(joined.unwrap().exclude, vec!["tmp", "cache"]);
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_unknown_algorithm_in_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "algorithm = \"sha256\"\n").unwrap();

    let err = load(&path, root_override("/data")).unwrap_err();

    assert!(matches!(err, ConfigError::Load(_)));
    assert!(err.to_string().contains("Unknown hash algorithm"));
}

#[test]
fn test_zero_block_size_in_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "block_size = 0\n").unwrap();

    let err = load(&path, root_override("/data")).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBlockSize));
}

#[test]
fn test_malformed_toml_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "level = [unterminated\n").unwrap();

    assert!(matches!(
        load(&path, root_override("/data")),
        Err(ConfigError::Load(_))
    ));
}

#[test]
fn test_algorithm_suggestion() {
    let err = "md4".parse::<HashAlgorithm>().unwrap_err();
    assert!(err.to_string().contains("did you mean 'md5'?"));

    let err = "zzzzzz".parse::<HashAlgorithm>().unwrap_err();
    assert!(!err.to_string().contains("did you mean"));
}
