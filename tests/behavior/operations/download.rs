use crate::*;
use bulkify::error::{Error, Result};
use bulkify::storage::StorageClient;
use bulkify::storage::batch::{BatchConfig, OutcomeStatus, TransferItem};
use std::time::Duration;
use tokio::fs;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_download_batch_mirrors_remote_prefix,
        test_download_batch_missing_object_fails_only_that_item,
        test_download_batch_skips_existing_local_files,
        test_download_batch_with_zero_deadline_starts_nothing,
        test_download_object_creates_parent_directories,
        test_download_missing_object_leaves_no_directories
    ));
}

/// Stage `count` random objects below a fresh prefix, returning (path, content) pairs.
async fn stage_remote_files(client: &StorageClient, count: usize) -> Result<(String, Vec<(String, Vec<u8>)>)> {
    let prefix = TEST_FIXTURE.new_dir_path();
    let mut staged = Vec::with_capacity(count);
    for i in 0..count {
        let path = if i % 2 == 0 {
            format!("{prefix}obj-{i}.bin")
        } else {
            format!("{prefix}sub/obj-{i}.bin")
        };
        let content = TEST_FIXTURE.new_content(1..32 * 1024);
        client.operator().write(&path, content.clone()).await?;
        staged.push((path, content));
    }
    Ok((prefix, staged))
}

async fn test_download_batch_mirrors_remote_prefix(client: StorageClient) -> Result<()> {
    let (prefix, staged) = stage_remote_files(&client, 6).await?;
    let local_dir = TEST_FIXTURE.new_local_dir();

    let items = client
        .collect_download_items(client.bucket(), &prefix, &local_dir)
        .await?;
    assert_eq!(items.len(), 6);

    let config = BatchConfig::default().with_max_workers(3);
    let result = client
        .submit_download_batch(client.bucket(), items, &config)
        .await?;
    assert!(result.all_succeeded());

    for (remote, content) in staged {
        let relative = remote.strip_prefix(&prefix).unwrap();
        let downloaded = fs::read(local_dir.join(relative)).await?;
        assert_eq!(content, downloaded);
    }
    Ok(())
}

async fn test_download_batch_missing_object_fails_only_that_item(
    client: StorageClient,
) -> Result<()> {
    let (prefix, staged) = stage_remote_files(&client, 1).await?;
    let local_dir = TEST_FIXTURE.new_local_dir();

    let items = vec![
        TransferItem::new(staged[0].0.clone(), local_dir.join("x.bin").to_string_lossy()),
        TransferItem::new(format!("{prefix}missing"), local_dir.join("y.bin").to_string_lossy()),
    ];
    let result = client
        .submit_download_batch(client.bucket(), items, &BatchConfig::default())
        .await?;

    assert_eq!(result.len(), 2);
    assert!(result.outcomes()[0].succeeded());
    assert!(matches!(
        result.outcomes()[1].error(),
        Some(Error::OpenDal { .. })
    ));
    assert!(!local_dir.join("y.bin").exists());
    Ok(())
}

async fn test_download_batch_skips_existing_local_files(client: StorageClient) -> Result<()> {
    let (_, staged) = stage_remote_files(&client, 2).await?;
    let local_dir = TEST_FIXTURE.new_local_dir();
    fs::create_dir_all(&local_dir).await?;
    let existing = local_dir.join("existing.bin");
    fs::write(&existing, b"local copy").await?;

    let items = vec![
        TransferItem::new(staged[0].0.clone(), existing.to_string_lossy()),
        TransferItem::new(staged[1].0.clone(), local_dir.join("new.bin").to_string_lossy()),
    ];
    let config = BatchConfig::default().with_skip_if_exists(true);
    let result = client
        .submit_download_batch(client.bucket(), items, &config)
        .await?;

    assert!(matches!(result.outcomes()[0].status(), OutcomeStatus::Skipped));
    assert!(result.outcomes()[1].succeeded());
    assert_eq!(fs::read(&existing).await?, b"local copy".to_vec());
    assert_eq!(fs::read(local_dir.join("new.bin")).await?, staged[1].1);
    Ok(())
}

async fn test_download_batch_with_zero_deadline_starts_nothing(
    client: StorageClient,
) -> Result<()> {
    let (prefix, _) = stage_remote_files(&client, 3).await?;
    let local_dir = TEST_FIXTURE.new_local_dir();
    let items = client
        .collect_download_items(client.bucket(), &prefix, &local_dir)
        .await?;

    let config = BatchConfig::default().with_deadline(Duration::ZERO);
    let result = client
        .submit_download_batch(client.bucket(), items, &config)
        .await?;

    assert_eq!(result.summary().deadline_exceeded, 3);
    assert!(!local_dir.exists());
    Ok(())
}

async fn test_download_object_creates_parent_directories(client: StorageClient) -> Result<()> {
    let (_, staged) = stage_remote_files(&client, 1).await?;
    let local_path = TEST_FIXTURE.new_local_dir().join("a").join("b").join("obj.bin");

    client
        .download_object(client.bucket(), &staged[0].0, &local_path)
        .await?;
    assert_eq!(fs::read(&local_path).await?, staged[0].1);

    let err = client
        .download_object(client.bucket(), "does/not/exist", &local_path)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DownloadFailed { .. }));
    Ok(())
}

async fn test_download_missing_object_leaves_no_directories(client: StorageClient) -> Result<()> {
    let remote = format!("{}missing.bin", TEST_FIXTURE.new_dir_path());
    let local_dir = TEST_FIXTURE.new_local_dir();
    let target = local_dir.join("deep").join("nested").join("missing.bin");

    let err = client
        .download_object(client.bucket(), &remote, &target)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DownloadFailed { .. }));
    assert!(!local_dir.exists());
    Ok(())
}
