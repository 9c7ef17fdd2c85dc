//! Integration tests for glob search over the live tree

use super::test_utils::sample_project;
use memfs::{ErrorKind, GlobOptions};

#[test]
fn test_recursive_pattern_with_ignore() {
    let fs = sample_project();
    let options = GlobOptions {
        ignore: vec!["node_modules".to_string()],
        ..GlobOptions::default()
    };
    assert_eq!(
        fs.glob("**/*.ts", &options).unwrap(),
        vec!["/src/index.ts", "/src/utils/helper.ts"]
    );
}

#[test]
fn test_dotfiles_need_opt_in() {
    let fs = sample_project();
    let files_only = GlobOptions {
        only_files: true,
        ..GlobOptions::default()
    };
    assert_eq!(fs.glob("*", &files_only).unwrap(), vec!["/README.md"]);

    let with_dot = GlobOptions {
        dot: true,
        ..files_only
    };
    assert_eq!(fs.glob("*", &with_dot).unwrap(), vec!["/.env", "/README.md"]);
}

#[test]
fn test_relative_results_and_working_directory() {
    let mut fs = sample_project();
    let relative = GlobOptions {
        cwd: "/src".to_string(),
        absolute: false,
        ..GlobOptions::default()
    };
    assert_eq!(fs.glob("*.ts", &relative).unwrap(), vec!["index.ts"]);
    assert_eq!(fs.glob("**/*.ts", &relative).unwrap(), vec!["utils/helper.ts"]);

    fs.set_cwd("/src").unwrap();
    let here = GlobOptions {
        cwd: ".".to_string(),
        ..GlobOptions::default()
    };
    assert_eq!(fs.glob("*.ts", &here).unwrap(), vec!["/src/index.ts"]);
}

#[test]
fn test_absolute_and_single_character_patterns() {
    let fs = sample_project();
    let options = GlobOptions::default();
    assert_eq!(
        fs.glob("/src/*/*.js", &options).unwrap(),
        vec!["/src/utils/format.js"]
    );
    assert_eq!(fs.glob("src/????x.ts", &options).unwrap(), vec!["/src/index.ts"]);
}

#[test]
fn test_symlinked_directories_are_followed_on_request() {
    let mut fs = sample_project();
    fs.create_symlink("/src/utils", "/lib").unwrap();

    let follow = GlobOptions::default();
    assert_eq!(fs.glob("lib/*.ts", &follow).unwrap(), vec!["/lib/helper.ts"]);

    let no_follow = GlobOptions {
        follow_symlinks: false,
        ..GlobOptions::default()
    };
    assert!(fs.glob("lib/*.ts", &no_follow).unwrap().is_empty());
}

#[test]
fn test_results_are_deterministic() {
    let fs = sample_project();
    let options = GlobOptions {
        dot: true,
        ..GlobOptions::default()
    };
    let first = fs.glob("**", &options).unwrap();
    for _ in 0..5 {
        assert_eq!(fs.glob("**", &options).unwrap(), first);
    }
    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(first, sorted);
}

#[test]
fn test_missing_start_directory() {
    let fs = sample_project();
    let options = GlobOptions {
        cwd: "/nope".to_string(),
        ..GlobOptions::default()
    };
    let err = fs.glob("*", &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryNotFound);
}
