use crate::*;
use assert_cmd::prelude::*;
use drivezip::error::{Error, Result};
use drivezip::storage::StorageClient;
use drivezip::storage::utils::progress::TransferProgress;
use predicates::prelude::*;
use std::sync::Mutex;
use tokio::fs;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_upload_file_into_folder,
        test_upload_files_in_input_order,
        test_upload_reports_progress,
        test_upload_missing_local_file,
        test_upload_folder_recreates_tree
    ));

    tests.extend(async_trials!(
        client,
        e2e_test_put_command,
        e2e_test_put_directory_needs_recursive
    ));
}

async fn remote_folder(client: &StorageClient) -> Result<String> {
    let folder = TEST_FIXTURE.new_dir_path();
    client.operator().create_dir(&folder).await?;
    Ok(folder)
}

async fn test_upload_file_into_folder(client: StorageClient) -> Result<()> {
    let folder = remote_folder(&client).await?;
    let local = TEST_FIXTURE.new_local_dir().join("small.txt");
    let content = TEST_FIXTURE.new_content(1..4096);
    fs::write(&local, &content).await?;

    let id = client.upload_file(&local, &[folder.clone()], None).await?;

    assert_eq!(id, format!("{folder}small.txt"));
    assert_eq!(client.operator().read(&id).await?.to_vec(), content);
    assert_eq!(client.stat(&id).await?.mime_type, "text/plain");
    Ok(())
}

async fn test_upload_files_in_input_order(client: StorageClient) -> Result<()> {
    let folder = remote_folder(&client).await?;
    let dir = TEST_FIXTURE.new_local_dir();
    let mut paths = Vec::new();
    for i in 0..3 {
        let path = dir.join(format!("test{i}.txt"));
        fs::write(&path, format!("Test file content {i}")).await?;
        paths.push(path);
    }

    let ids = client.upload_files(&paths, &[folder.clone()], None).await?;

    assert_eq!(ids.len(), 3);
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(id, &format!("{folder}test{i}.txt"));
        assert_eq!(
            client.operator().read(id).await?.to_vec(),
            format!("Test file content {i}").into_bytes()
        );
    }
    Ok(())
}

async fn test_upload_reports_progress(client: StorageClient) -> Result<()> {
    let folder = remote_folder(&client).await?;
    let local = TEST_FIXTURE.new_local_dir().join("large.pdf");
    let content = TEST_FIXTURE.new_content(3 * 1024 * 1024..4 * 1024 * 1024);
    fs::write(&local, &content).await?;
    let seen = Mutex::new(Vec::new());
    let callback = |p: &TransferProgress| seen.lock().unwrap().push(p.clone());

    client
        .upload_file(&local, &[folder], Some(&callback))
        .await?;

    let seen = seen.into_inner().unwrap();
    assert!(seen.len() >= 3, "expected one report per chunk");
    assert!(seen.windows(2).all(|w| w[0].done < w[1].done));
    let last = seen.last().unwrap();
    assert_eq!(last.total, content.len() as u64);
    assert!(last.is_complete());
    Ok(())
}

async fn test_upload_missing_local_file(client: StorageClient) -> Result<()> {
    let missing = TEST_FIXTURE.new_local_dir().join("missing.txt");

    let err = client.upload_file(&missing, &[], None).await.unwrap_err();

    assert!(matches!(err.root_cause(), Error::PathNotFound { .. }));
    Ok(())
}

async fn test_upload_folder_recreates_tree(client: StorageClient) -> Result<()> {
    let folder = remote_folder(&client).await?;
    let local = TEST_FIXTURE.new_local_dir().join("album");
    fs::create_dir_all(local.join("2024/summer")).await?;
    fs::write(local.join("cover.png"), b"cover").await?;
    fs::write(local.join("2024/summer/beach.jpg"), b"beach").await?;

    let id = client.upload_folder(&local, &[folder.clone()], None).await?;

    assert_eq!(id, format!("{folder}album/"));
    let op = client.operator();
    assert_eq!(op.read(&format!("{id}cover.png")).await?.to_vec(), b"cover");
    assert_eq!(
        op.read(&format!("{id}2024/summer/beach.jpg")).await?.to_vec(),
        b"beach"
    );
    Ok(())
}

async fn e2e_test_put_command(client: StorageClient) -> Result<()> {
    let folder = remote_folder(&client).await?;
    let local = TEST_FIXTURE.new_local_dir().join("upload.csv");
    let content = TEST_FIXTURE.new_content(1..4096);
    fs::write(&local, &content).await?;

    drivezip_cmd()
        .arg("put")
        .arg(&local)
        .arg("--parent")
        .arg(&folder)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{folder}upload.csv")));

    let uploaded = client
        .operator()
        .read(&format!("{folder}upload.csv"))
        .await?;
    assert_eq!(uploaded.to_vec(), content);
    Ok(())
}

async fn e2e_test_put_directory_needs_recursive(client: StorageClient) -> Result<()> {
    let folder = remote_folder(&client).await?;
    let local = TEST_FIXTURE.new_local_dir();
    fs::write(local.join("inside.txt"), b"inside").await?;

    drivezip_cmd()
        .arg("put")
        .arg(&local)
        .arg("--parent")
        .arg(&folder)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Use -R to upload directories"));

    drivezip_cmd()
        .arg("put")
        .arg("-R")
        .arg(&local)
        .arg("--parent")
        .arg(&folder)
        .assert()
        .success();

    let name = local.file_name().unwrap().to_string_lossy().to_string();
    assert!(
        client
            .operator()
            .exists(&format!("{folder}{name}/inside.txt"))
            .await?
    );
    Ok(())
}
