//! Path normalization and content round trips

use super::file_path;
use memfs::path;
use memfs::MemoryFs;
use proptest::prelude::*;

/// Normalizing an already normalized path changes nothing
#[test]
fn test_normalize_idempotent_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[ab/.]{0,24}", |raw| {
            let once = path::normalize(&raw);
            let twice = path::normalize(&once);
            assert_eq!(once, twice);

            // Absolute input stays absolute and never ends in a separator
            if raw.starts_with('/') {
                assert!(once.starts_with('/'));
                assert!(once == "/" || !once.ends_with('/'));
                assert!(!once.split('/').any(|s| s == ".." || s == "."));
            }

            Ok(())
        })
        .unwrap();
}

/// Joining an absolute path with a relative one lands under it
#[test]
fn test_resolve_stays_under_base_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                proptest::collection::vec("d[a-z]{0,3}", 0..4),
                proptest::collection::vec("d[a-z]{0,3}", 1..4),
            ),
            |(base, rel)| {
                let base = format!("/{}", base.join("/"));
                let rel = rel.join("/");
                let resolved = path::resolve(&base, &rel);
                let prefix = if base == "/" { base.clone() } else { format!("{}/", base) };
                assert!(resolved.starts_with(&prefix));
                assert_eq!(path::normalize(&resolved), resolved);
                Ok(())
            },
        )
        .unwrap();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Bytes written come back unchanged, empty content included
    #[test]
    fn write_then_read_returns_same_bytes(
        target in file_path(),
        content in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut fs = MemoryFs::new();
        fs.write_file(&target, &content).unwrap();

        prop_assert_eq!(fs.read_file(&target).unwrap(), content.clone());
        let stats = fs.stat(&target).unwrap();
        prop_assert!(stats.is_file);
        prop_assert_eq!(stats.size, content.len() as u64);
    }

    /// Appending concatenates
    #[test]
    fn append_concatenates(
        target in file_path(),
        first in proptest::collection::vec(any::<u8>(), 0..64),
        second in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut fs = MemoryFs::new();
        fs.write_file(&target, &first).unwrap();
        fs.append_file(&target, &second).unwrap();

        let mut expected = first.clone();
        expected.extend_from_slice(&second);
        prop_assert_eq!(fs.read_file(&target).unwrap(), expected);
    }
}
