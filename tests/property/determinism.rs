//! Property-based tests for deterministic output

use super::file_set;
use memfs::{GlobOptions, MemoryFs};
use proptest::prelude::*;

fn build(files: &std::collections::BTreeMap<String, Vec<u8>>) -> MemoryFs {
    let mut fs = MemoryFs::new();
    for (path, content) in files {
        fs.write_file(path, content).unwrap();
    }
    fs
}

/// Glob finds exactly the files written, sorted, on every run
#[test]
fn test_glob_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&file_set(), |files| {
            let fs = build(&files);
            let options = GlobOptions {
                only_files: true,
                ..GlobOptions::default()
            };

            let first = fs.glob("**/*.txt", &options).unwrap();
            let second = fs.glob("**/*.txt", &options).unwrap();
            assert_eq!(first, second);

            let expected: Vec<String> = files.keys().cloned().collect();
            assert_eq!(first, expected);
            Ok(())
        })
        .unwrap();
}

/// Trees built from the same files in any order share a fingerprint
#[test]
fn test_fingerprint_ignores_insertion_order() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&file_set(), |files| {
            let forward = build(&files);

            let mut backward = MemoryFs::new();
            for (path, content) in files.iter().rev() {
                backward.write_file(path, content).unwrap();
            }

            assert_eq!(forward.fingerprint(), backward.fingerprint());
            Ok(())
        })
        .unwrap();
}
