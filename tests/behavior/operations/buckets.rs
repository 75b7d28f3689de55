use crate::*;
use bulkify::error::{Error, Result};
use bulkify::storage::StorageClient;
use bulkify::storage::batch::{BatchConfig, TransferItem};

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_bucket_lifecycle,
        test_delete_non_empty_bucket_fails,
        test_batch_into_another_bucket
    ));
}

async fn test_bucket_lifecycle(client: StorageClient) -> Result<()> {
    let bucket = TEST_FIXTURE.new_bucket_name();
    assert!(!client.bucket_exists(&bucket).await?);

    client.create_bucket(&bucket).await?;
    assert!(client.bucket_exists(&bucket).await?);
    assert!(client.list_buckets().await?.contains(&bucket));

    let err = client.create_bucket(&bucket).await.unwrap_err();
    assert!(matches!(err, Error::BucketAlreadyExists { .. }));

    client.delete_bucket(&bucket).await?;
    assert!(!client.bucket_exists(&bucket).await?);
    Ok(())
}

async fn test_delete_non_empty_bucket_fails(client: StorageClient) -> Result<()> {
    let bucket = TEST_FIXTURE.new_bucket_name();
    client.create_bucket(&bucket).await?;

    let local_dir = TEST_FIXTURE.new_local_dir();
    let files = TEST_FIXTURE.new_local_files(&local_dir, 1).await?;
    client
        .upload_object(&bucket, &files[0].0, "kept.bin")
        .await?;

    let err = client.delete_bucket(&bucket).await.unwrap_err();
    assert!(matches!(err, Error::BucketNotEmpty { .. }));
    Ok(())
}

async fn test_batch_into_another_bucket(client: StorageClient) -> Result<()> {
    let bucket = TEST_FIXTURE.new_bucket_name();
    client.create_bucket(&bucket).await?;

    let local_dir = TEST_FIXTURE.new_local_dir();
    let files = TEST_FIXTURE.new_local_files(&local_dir, 3).await?;
    let items: Vec<TransferItem> = files
        .iter()
        .enumerate()
        .map(|(i, (path, _))| TransferItem::new(path.to_string_lossy(), format!("in/{i}.bin")))
        .collect();

    let result = client
        .submit_upload_batch(&bucket, items, &BatchConfig::default())
        .await?;
    assert!(result.all_succeeded());

    assert_eq!(
        client.list_objects(&bucket, "in").await?,
        vec!["in/0.bin", "in/1.bin", "in/2.bin"]
    );
    assert!(client.list_objects(client.bucket(), "in").await?.is_empty());
    Ok(())
}
