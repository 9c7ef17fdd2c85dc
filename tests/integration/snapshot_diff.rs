//! Integration tests for snapshots, restore and diff

use super::test_utils::sample_project;
use memfs::{ChangeKind, DiffEntry, ErrorKind};

fn summary(diff: &[DiffEntry]) -> Vec<(ChangeKind, String)> {
    diff.iter().map(|d| (d.kind, d.path.clone())).collect()
}

#[test]
fn test_diff_covers_add_modify_delete() {
    let mut fs = sample_project();
    let id = fs.create_snapshot().id;

    fs.write_file("/src/index.ts", "export const x = 1").unwrap();
    fs.delete_file("/README.md").unwrap();
    fs.write_file("/src/new.ts", "new").unwrap();
    fs.create_directory("/empty", false).unwrap();
    fs.chmod("/src/utils/helper.ts", 0o600).unwrap();

    assert_eq!(
        summary(&fs.diff(Some(&id), None).unwrap()),
        vec![
            (ChangeKind::Deleted, "/README.md".to_string()),
            (ChangeKind::Modified, "/src/index.ts".to_string()),
            (ChangeKind::Added, "/src/new.ts".to_string()),
        ]
    );
}

/// Renaming a directory reports every file under it as deleted and added
#[test]
fn test_directory_rename_is_add_plus_delete() {
    let mut fs = sample_project();
    let id = fs.create_snapshot().id;
    fs.rename("/src/utils", "/src/helpers").unwrap();

    assert_eq!(
        summary(&fs.diff(Some(&id), None).unwrap()),
        vec![
            (ChangeKind::Added, "/src/helpers/format.js".to_string()),
            (ChangeKind::Added, "/src/helpers/helper.ts".to_string()),
            (ChangeKind::Deleted, "/src/utils/format.js".to_string()),
            (ChangeKind::Deleted, "/src/utils/helper.ts".to_string()),
        ]
    );
}

#[test]
fn test_diff_records_carry_stats() {
    let mut fs = sample_project();
    let id = fs.create_snapshot().id;
    fs.write_file("/README.md", "# longer title").unwrap();

    let diff = fs.diff(Some(&id), None).unwrap();
    let entry = &diff[0];
    assert_eq!(entry.old_stats.as_ref().unwrap().size, 9);
    assert_eq!(entry.new_stats.as_ref().unwrap().size, 14);

    let json = serde_json::to_value(entry).unwrap();
    assert_eq!(json["kind"], "modified");
    assert!(json.get("oldContent").is_some());
}

#[test]
fn test_snapshot_is_isolated_from_later_mutation() {
    let mut fs = sample_project();
    let info = fs.create_snapshot();

    fs.write_file("/src/index.ts", "changed").unwrap();
    fs.delete_directory("/src/utils", true).unwrap();
    fs.write_file("/added", "x").unwrap();

    fs.restore_snapshot(&info.id).unwrap();
    assert_eq!(fs.read_file("/src/index.ts").unwrap(), b"export {}");
    assert!(fs.is_file("/src/utils/helper.ts"));
    assert!(!fs.exists("/added"));
    assert_eq!(fs.fingerprint(), info.fingerprint);
    assert!(fs.diff(Some(&info.id), None).unwrap().is_empty());
}

#[test]
fn test_snapshot_bookkeeping() {
    let mut fs = sample_project();
    let a = fs.create_snapshot();
    fs.write_file("/more", "12345").unwrap();
    let b = fs.create_snapshot();

    assert_eq!(b.counts.file_count, a.counts.file_count + 1);
    assert_eq!(b.counts.total_size, a.counts.total_size + 5);
    assert_ne!(a.fingerprint, b.fingerprint);

    let listed: Vec<String> = fs.list_snapshots().into_iter().map(|s| s.id).collect();
    assert_eq!(listed, vec![a.id.clone(), b.id.clone()]);

    fs.delete_snapshot(&a.id).unwrap();
    let err = fs.restore_snapshot(&a.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert_eq!(err.path(), format!("snapshot:{}", a.id));
}
