use crate::*;
use bulkify::error::{Error, Result};
use bulkify::storage::StorageClient;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_list_objects_recursively,
        test_list_objects_matches_partial_names,
        test_get_object_metadata,
        test_get_metadata_of_missing_object,
        test_delete_object,
        test_delete_missing_object
    ));
}

async fn test_list_objects_recursively(client: StorageClient) -> Result<()> {
    let prefix = TEST_FIXTURE.new_dir_path();
    for name in ["b.txt", "a.txt", "deep/c.txt"] {
        client
            .operator()
            .write(&format!("{prefix}{name}"), b"x".to_vec())
            .await?;
    }

    let listed = client.list_objects(client.bucket(), &prefix).await?;
    assert_eq!(
        listed,
        vec![
            format!("{prefix}a.txt"),
            format!("{prefix}b.txt"),
            format!("{prefix}deep/c.txt"),
        ]
    );
    Ok(())
}

async fn test_list_objects_matches_partial_names(client: StorageClient) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();
    for name in ["abc.txt", "ab/inner.txt", "b.txt"] {
        client
            .operator()
            .write(&format!("{dir}{name}"), b"x".to_vec())
            .await?;
    }

    let listed = client
        .list_objects(client.bucket(), &format!("{dir}ab"))
        .await?;
    assert_eq!(
        listed,
        vec![format!("{dir}ab/inner.txt"), format!("{dir}abc.txt")]
    );

    let listed = client
        .list_objects(client.bucket(), &format!("{dir}ab/"))
        .await?;
    assert_eq!(listed, vec![format!("{dir}ab/inner.txt")]);
    Ok(())
}

async fn test_get_object_metadata(client: StorageClient) -> Result<()> {
    let path = format!("{}meta.bin", TEST_FIXTURE.new_dir_path());
    let content = TEST_FIXTURE.new_content(1..4096);
    client.operator().write(&path, content.clone()).await?;

    let meta = client
        .get_object_metadata(client.bucket(), &path)
        .await?
        .expect("metadata for staged object");
    assert_eq!(meta.path, path);
    assert_eq!(meta.entry_type, "file");
    assert_eq!(meta.size, content.len() as u64);
    assert!(client.object_exists(client.bucket(), &path).await?);
    Ok(())
}

async fn test_get_metadata_of_missing_object(client: StorageClient) -> Result<()> {
    let path = format!("{}absent.bin", TEST_FIXTURE.new_dir_path());
    assert!(
        client
            .get_object_metadata(client.bucket(), &path)
            .await?
            .is_none()
    );
    assert!(!client.object_exists(client.bucket(), &path).await?);
    Ok(())
}

async fn test_delete_object(client: StorageClient) -> Result<()> {
    let path = format!("{}doomed.bin", TEST_FIXTURE.new_dir_path());
    client.operator().write(&path, b"bye".to_vec()).await?;

    client.delete_object(client.bucket(), &path).await?;
    assert!(!client.operator().exists(&path).await?);
    Ok(())
}

async fn test_delete_missing_object(client: StorageClient) -> Result<()> {
    let path = format!("{}never-written.bin", TEST_FIXTURE.new_dir_path());
    let err = client
        .delete_object(client.bucket(), &path)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PathNotFound { .. }));
    Ok(())
}
