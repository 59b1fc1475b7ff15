use super::*;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) {
    fs::write(dir.path().join(CONFIG_FILE_NAME), content).unwrap();
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_project_config(dir.path());

    assert!(!config.scan.fail_fast);
    assert!(config.scan.group_by_directory);
    assert_eq!(config.scan.progress_interval(), Duration::from_secs(10));
    assert_eq!(config.recognizer.threshold, 0.9);
    assert!(config.exclude.paths.is_empty());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"
[scan]
fail_fast = true

[recognizer]
threshold = 0.75

[exclude]
paths = ["generated/**"]
"#,
    );

    let config = load_project_config(dir.path());
    assert!(config.scan.fail_fast);
    assert!(config.scan.group_by_directory);
    assert_eq!(config.recognizer.threshold, 0.75);
    assert_eq!(config.exclude.paths, vec!["generated/**"]);
}

#[test]
fn test_invalid_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "[scan\nfail_fast = yes");

    let config = load_project_config(dir.path());
    assert!(!config.scan.fail_fast);

    let err = load_config_file(&dir.path().join(CONFIG_FILE_NAME)).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_out_of_range_threshold_rejected() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "[recognizer]\nthreshold = 1.5\n");

    let err = load_config_file(&dir.path().join(CONFIG_FILE_NAME)).unwrap_err();
    assert!(err.to_string().contains("threshold"));
    assert_eq!(load_project_config(dir.path()).recognizer.threshold, 0.9);
}

#[test]
fn test_effective_patterns() {
    let exclude = ExcludeConfig {
        paths: vec!["**/vendor/**".to_string(), "gen/**".to_string()],
        skip_defaults: false,
    };
    let patterns = exclude.effective_patterns();
    assert_eq!(patterns.len(), DEFAULT_EXCLUDE_PATTERNS.len() + 1);
    assert!(patterns.contains(&"gen/**".to_string()));

    let only_user = ExcludeConfig {
        paths: vec!["gen/**".to_string()],
        skip_defaults: true,
    };
    assert_eq!(only_user.effective_patterns(), vec!["gen/**"]);
}

#[test]
fn test_overrides_ignore_excluded_paths() {
    let dir = TempDir::new().unwrap();
    let exclude = ExcludeConfig {
        paths: vec!["gen/**".to_string()],
        skip_defaults: false,
    };
    let overrides = exclude.overrides(dir.path()).unwrap();

    assert!(overrides
        .matched(dir.path().join("src/vendor/lib.c"), false)
        .is_ignore());
    assert!(overrides
        .matched(dir.path().join("gen/model.rs"), false)
        .is_ignore());
    assert!(!overrides
        .matched(dir.path().join("src/main.rs"), false)
        .is_ignore());
}
