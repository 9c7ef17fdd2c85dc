//! Snapshot isolation and diff exactness

use super::file_set;
use memfs::{ChangeKind, MemoryFs};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn build(files: &BTreeMap<String, Vec<u8>>) -> MemoryFs {
    let mut fs = MemoryFs::new();
    for (path, content) in files {
        fs.write_file(path, content).unwrap();
    }
    fs
}

/// Move the live file set from `from` to `to`
fn transition(fs: &mut MemoryFs, from: &BTreeMap<String, Vec<u8>>, to: &BTreeMap<String, Vec<u8>>) {
    for path in from.keys().filter(|path| !to.contains_key(*path)) {
        fs.delete_file(path).unwrap();
    }
    for (path, content) in to {
        fs.write_file(path, content).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Restoring undoes every mutation made after the snapshot
    #[test]
    fn restore_undoes_later_mutations(before in file_set(), after in file_set()) {
        let mut fs = build(&before);
        let snapshot = fs.create_snapshot();

        transition(&mut fs, &before, &after);
        fs.restore_snapshot(&snapshot.id).unwrap();

        prop_assert_eq!(fs.fingerprint(), snapshot.fingerprint.clone());
        for (path, content) in &before {
            prop_assert_eq!(&fs.read_file(path).unwrap(), content);
        }
        for path in after.keys().filter(|path| !before.contains_key(*path)) {
            prop_assert!(!fs.exists(path));
        }
    }

    /// The diff lists exactly the added, deleted and changed files
    #[test]
    fn diff_matches_file_set_changes(before in file_set(), after in file_set()) {
        let mut fs = build(&before);
        let snapshot = fs.create_snapshot();
        transition(&mut fs, &before, &after);

        let mut expected = Vec::new();
        for (path, content) in &before {
            match after.get(path) {
                None => expected.push((path.clone(), ChangeKind::Deleted)),
                Some(new) if new != content => expected.push((path.clone(), ChangeKind::Modified)),
                Some(_) => {}
            }
        }
        for path in after.keys().filter(|path| !before.contains_key(*path)) {
            expected.push((path.clone(), ChangeKind::Added));
        }
        expected.sort_by(|a, b| a.0.cmp(&b.0));

        let mut actual: Vec<(String, ChangeKind)> = fs
            .diff(Some(&snapshot.id), None)
            .unwrap()
            .into_iter()
            .map(|entry| (entry.path, entry.kind))
            .collect();
        actual.sort_by(|a, b| a.0.cmp(&b.0));

        prop_assert_eq!(actual, expected);
    }
}
