// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fs_store_writes_blob_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsContentStore::new(dir.path(), "http://librarian.local/");
    let mut content: &[u8] = b"hello world";

    let stored = store.store("build.log", 11, &mut content, "text/plain", true).await.unwrap();

    assert_eq!(stored.url, format!("http://librarian.local/{}/build.log", stored.id));
    let meta = store.metadata(&stored.id).await.unwrap().unwrap();
    assert_eq!(meta.filename, "build.log");
    assert_eq!(meta.content_type, "text/plain");
    assert!(meta.private);
    assert_eq!(meta.size, 11);
    assert_eq!(meta.sha256, "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9");
    let blob = std::fs::read(store.blob_path(&meta.sha256)).unwrap();
    assert_eq!(blob, b"hello world");
}

#[tokio::test]
async fn fs_store_rejects_size_mismatch_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsContentStore::new(dir.path(), "http://librarian.local");
    let mut content: &[u8] = b"short";

    let err = store.store("x.txt", 100, &mut content, "text/plain", false).await.unwrap_err();

    assert!(matches!(err, ContentStoreError::SizeMismatch { expected: 100, actual: 5 }));
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".upload-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn fs_store_gives_each_upload_its_own_identity() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsContentStore::new(dir.path(), "http://librarian.local");

    let mut a: &[u8] = b"same";
    let mut b: &[u8] = b"same";
    let first = store.store("a.txt", 4, &mut a, "text/plain", false).await.unwrap();
    let second = store.store("b.txt", 4, &mut b, "text/plain", false).await.unwrap();

    assert_ne!(first.id, second.id);
    let meta_a = store.metadata(&first.id).await.unwrap().unwrap();
    let meta_b = store.metadata(&second.id).await.unwrap().unwrap();
    assert_eq!(meta_a.sha256, meta_b.sha256);
}

#[tokio::test]
async fn fs_store_metadata_for_unknown_id_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsContentStore::new(dir.path(), "http://librarian.local");
    let missing = store.metadata(&ContentId::from_string("lfa-missing")).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn fake_store_records_content() {
    let store = FakeContentStore::new();
    let mut content: &[u8] = b"log";
    let stored = store.store("x.txt.gz", 3, &mut content, "application/gzip", false).await.unwrap();

    assert_eq!(stored.id, "lfa-1");
    let calls = store.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].content, b"log");
}
