//! Integration tests for the async shared handle

use memfs::{AsyncFileSystem, ChangeKind, GlobOptions, MemoryFs, SharedFs};

/// Another task scheduled during a rename sees both source and destination
#[tokio::test]
async fn test_rename_is_observable_between_steps() {
    let fs = SharedFs::default();
    fs.write_file("/src.txt", b"payload".to_vec()).await.unwrap();

    let observer = fs.clone();
    let seen = tokio::spawn(async move {
        (
            observer.exists("/src.txt").await,
            observer.exists("/dst.txt").await,
        )
    });

    fs.rename("/src.txt", "/dst.txt").await.unwrap();
    assert_eq!(seen.await.unwrap(), (true, true));
    assert!(!fs.exists("/src.txt").await);
    assert_eq!(fs.read_file("/dst.txt").await.unwrap(), b"payload");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_disjoint_writers_do_not_interfere() {
    let fs = SharedFs::new(MemoryFs::new());
    let mut handles = Vec::new();
    for i in 0..16 {
        let fs = fs.clone();
        handles.push(tokio::spawn(async move {
            let path = format!("/w{}/data.txt", i);
            fs.write_file(&path, format!("writer {}", i).into_bytes()).await?;
            fs.append_file(&path, b"!".to_vec()).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let files = fs
        .glob("**/data.txt", GlobOptions::default())
        .await
        .unwrap();
    assert_eq!(files.len(), 16);
    assert_eq!(fs.read_file("/w7/data.txt").await.unwrap(), b"writer 7!");
}

#[tokio::test]
async fn test_snapshot_round_trip_through_trait() {
    let fs = SharedFs::default();
    fs.create_directory("/cfg", false).await.unwrap();
    fs.write_file("/cfg/a", b"1".to_vec()).await.unwrap();
    let snapshot = fs.create_snapshot().await;

    fs.write_file("/cfg/a", b"2".to_vec()).await.unwrap();
    let diff = fs.diff(Some(&snapshot.id), None).await.unwrap();
    assert_eq!(diff.len(), 1);
    assert_eq!(diff[0].kind, ChangeKind::Modified);

    fs.restore_snapshot(&snapshot.id).await.unwrap();
    assert_eq!(fs.read_file("/cfg/a").await.unwrap(), b"1");
    assert_eq!(fs.read_directory("/cfg").await.unwrap(), vec!["a"]);
    assert!(fs.stat("/cfg").await.unwrap().is_directory);
}

/// Code written against the trait works with any implementation
#[tokio::test]
async fn test_trait_object_usage() {
    async fn touch(fs: &dyn AsyncFileSystem, path: &str) -> bool {
        fs.write_file(path, Vec::new()).await.is_ok() && fs.exists(path).await
    }

    let fs = SharedFs::default();
    assert!(touch(&fs, "/marker").await);
    fs.create_symlink("/marker", "/link").await.unwrap();
    fs.delete_file("/link").await.unwrap();
    fs.delete_directory("/", true).await.unwrap_err();
    assert!(fs.exists("/marker").await);
}
