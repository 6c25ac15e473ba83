use crate::*;
use assert_cmd::prelude::*;
use drivezip::error::Result;
use drivezip::storage::StorageClient;
use drivezip::storage::constants::UNBOUNDED_DEPTH;
use predicates::prelude::*;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_download_file_round_trip,
        test_download_file_custom_name,
        test_download_folder_as_zip,
        test_download_all_files,
        test_download_file_rejects_folder
    ));

    tests.extend(async_trials!(client, e2e_test_get_command));
}

async fn test_download_file_round_trip(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let path = format!("{root}notes.txt");
    let content = TEST_FIXTURE.write_file(client.operator(), &path).await;
    let local = TEST_FIXTURE.new_local_dir();

    let written = client.download_file(&path, &local, None).await?;

    assert_eq!(written, local.join("notes.txt"));
    assert_eq!(tokio::fs::read(&written).await?, content);
    Ok(())
}

async fn test_download_file_custom_name(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let path = format!("{root}notes.txt");
    TEST_FIXTURE.write_file(client.operator(), &path).await;
    let local = TEST_FIXTURE.new_local_dir().join("nested");

    let written = client
        .download_file(&path, &local, Some("renamed.txt"))
        .await?;

    assert_eq!(written, local.join("renamed.txt"));
    assert!(written.exists());
    Ok(())
}

async fn test_download_folder_as_zip(client: StorageClient) -> Result<()> {
    let op = client.operator();
    let parent = TEST_FIXTURE.new_dir_path();
    let folder = format!("{parent}project/");
    TEST_FIXTURE.write_file(op, &format!("{folder}readme.txt")).await;
    TEST_FIXTURE.write_file(op, &format!("{folder}src/main.txt")).await;
    let local = TEST_FIXTURE.new_local_dir();

    let written = client
        .download_folder(&folder, &local, None, UNBOUNDED_DEPTH)
        .await?;

    assert_eq!(written, local.join("project.zip"));
    let bytes = tokio::fs::read(&written).await?;
    assert_eq!(
        zip_entry_names(&bytes),
        vec!["readme.txt", "src/", "src/main.txt"]
    );
    Ok(())
}

async fn test_download_all_files(client: StorageClient) -> Result<()> {
    let op = client.operator();
    let parent = TEST_FIXTURE.new_dir_path();
    let folder = format!("{parent}project/");
    TEST_FIXTURE.write_file(op, &format!("{folder}readme.txt")).await;
    TEST_FIXTURE.write_file(op, &format!("{folder}src/main.txt")).await;
    let local = TEST_FIXTURE.new_local_dir();

    let written = client
        .download_all_files(&folder, &local, Some("flat"), UNBOUNDED_DEPTH)
        .await?;

    assert_eq!(written, local.join("flat.zip"));
    let bytes = tokio::fs::read(&written).await?;
    assert_eq!(zip_entry_names(&bytes), vec!["readme.txt", "main.txt"]);
    Ok(())
}

async fn test_download_file_rejects_folder(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    client.operator().create_dir(&root).await?;
    let local = TEST_FIXTURE.new_local_dir();

    let err = client.download_file(&root, &local, None).await.unwrap_err();

    assert!(err.is_invalid_argument(), "unexpected error: {err}");
    Ok(())
}

async fn e2e_test_get_command(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let path = format!("{root}photo.png");
    let content = TEST_FIXTURE.write_file(client.operator(), &path).await;
    let local = TEST_FIXTURE.new_local_dir();

    drivezip_cmd()
        .arg("get")
        .arg(&path)
        .arg(&local)
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloaded"));

    assert_eq!(tokio::fs::read(local.join("photo.png")).await?, content);
    Ok(())
}
