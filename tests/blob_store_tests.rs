use bytes::Bytes;
use localdrop::blob_store::{BlobStore, BlobStoreError, LocalStore};

fn test_store() -> (tempfile::TempDir, LocalStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("uploads")).unwrap();
    (dir, store)
}

/// A key shaped like the ones the file registry generates:
/// millisecond prefix, random token, sanitized display name.
fn storage_key(name: &str) -> String {
    format!("1756200000000_6f1a0c2b9d8e4f70a1b2c3d4e5f60718_{name}")
}

#[tokio::test]
async fn test_blob_round_trip_under_storage_key() {
    let (_dir, store) = test_store();
    let key = storage_key("notes.txt");

    let data = Bytes::from("drop contents");
    store.put(&key, data.clone()).await.unwrap();

    assert!(store.exists(&key).await.unwrap());
    assert_eq!(store.get(&key).await.unwrap(), data);
}

#[tokio::test]
async fn test_missing_blob_reports_not_found() {
    let (_dir, store) = test_store();
    let key = storage_key("never-uploaded.bin");

    assert!(!store.exists(&key).await.unwrap());
    let err = store.get(&key).await.unwrap_err();
    assert!(matches!(err, BlobStoreError::NotFound(k) if k == key));
}

#[tokio::test]
async fn test_delete_removes_the_backing_file() {
    let (dir, store) = test_store();
    let key = storage_key("remove-me.dat");

    store.put(&key, Bytes::from("x")).await.unwrap();
    assert!(dir.path().join("uploads").join(&key).exists());

    store.delete(&key).await.unwrap();
    assert!(!store.exists(&key).await.unwrap());
    assert!(!dir.path().join("uploads").join(&key).exists());
}

#[tokio::test]
async fn test_delete_of_absent_key_is_satisfied() {
    let (_dir, store) = test_store();

    // No blob behind the key is the state a delete is after anyway
    store.delete(&storage_key("already-gone.txt")).await.unwrap();
}

#[tokio::test]
async fn test_path_shaped_keys_are_rejected() {
    let (dir, store) = test_store();

    for key in [
        "",
        ".",
        "..",
        "../escape.txt",
        "nested/key.txt",
        "nested\\key.txt",
        "..\\escape.txt",
    ] {
        let err = store.put(key, Bytes::from("x")).await.unwrap_err();
        assert!(matches!(err, BlobStoreError::InvalidKey(_)), "put {key:?}");

        let err = store.get(key).await.unwrap_err();
        assert!(matches!(err, BlobStoreError::InvalidKey(_)), "get {key:?}");

        let err = store.delete(key).await.unwrap_err();
        assert!(matches!(err, BlobStoreError::InvalidKey(_)), "delete {key:?}");
    }

    // Nothing escaped the upload directory and nothing landed inside it
    assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 0);
    assert!(!dir.path().join("escape.txt").exists());
}

#[tokio::test]
async fn test_dotted_filenames_are_still_plain_keys() {
    let (_dir, store) = test_store();

    // Dots inside a name are harmless; only exact self-references are paths
    let key = storage_key("archive..v2.tar.gz");
    store.put(&key, Bytes::from("tar")).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), Bytes::from("tar"));
}

#[tokio::test]
async fn test_flat_layout_one_file_per_key() {
    let (dir, store) = test_store();

    let key_a = storage_key("a.png");
    let key_b = storage_key("b.png");
    store.put(&key_a, Bytes::from("a")).await.unwrap();
    store.put(&key_b, Bytes::from("b")).await.unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dir.path().join("uploads"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    let mut expected = vec![key_a, key_b];
    expected.sort();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_new_creates_missing_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("data").join("uploads");

    let store = LocalStore::new(&nested).unwrap();
    store.put(&storage_key("k.bin"), Bytes::from("v")).await.unwrap();
    assert!(nested.join(storage_key("k.bin")).exists());
}
