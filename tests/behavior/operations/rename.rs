use crate::*;
use assert_cmd::prelude::*;
use drivezip::error::Result;
use drivezip::storage::StorageClient;
use predicates::prelude::*;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_rename_file,
        test_rename_folder_moves_descendants,
        test_rename_missing_entry,
        test_rename_onto_existing_entry
    ));

    tests.extend(async_trials!(client, e2e_test_rename_command));
}

async fn test_rename_file(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let path = format!("{root}draft.txt");
    let content = TEST_FIXTURE.write_file(client.operator(), &path).await;

    let entry = client.rename(&path, "final.txt").await?;

    assert_eq!(entry.id, format!("{root}final.txt"));
    assert_eq!(entry.name, "final");
    assert!(!client.operator().exists(&path).await?);
    assert_eq!(client.operator().read(&entry.id).await?.to_vec(), content);
    Ok(())
}

async fn test_rename_folder_moves_descendants(client: StorageClient) -> Result<()> {
    let op = client.operator();
    let root = TEST_FIXTURE.new_dir_path();
    let folder = format!("{root}old/");
    let a = TEST_FIXTURE.write_file(op, &format!("{folder}a.txt")).await;
    let b = TEST_FIXTURE
        .write_file(op, &format!("{folder}inner/b.txt"))
        .await;

    let entry = client.rename(&folder, "new").await?;

    assert_eq!(entry.id, format!("{root}new/"));
    assert!(entry.is_folder());
    assert_eq!(op.read(&format!("{root}new/a.txt")).await?.to_vec(), a);
    assert_eq!(op.read(&format!("{root}new/inner/b.txt")).await?.to_vec(), b);
    assert!(client.stat(&folder).await.unwrap_err().is_not_found());
    Ok(())
}

async fn test_rename_missing_entry(client: StorageClient) -> Result<()> {
    let missing = TEST_FIXTURE.new_dir_path();

    let err = client.rename(&missing, "anything").await.unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {err}");
    Ok(())
}

async fn test_rename_onto_existing_entry(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let first = format!("{root}one.txt");
    TEST_FIXTURE.write_file(client.operator(), &first).await;
    TEST_FIXTURE
        .write_file(client.operator(), &format!("{root}two.txt"))
        .await;

    let err = client.rename(&first, "two.txt").await.unwrap_err();

    assert!(err.is_invalid_argument(), "unexpected error: {err}");
    assert!(client.operator().exists(&first).await?);
    Ok(())
}

async fn e2e_test_rename_command(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let path = format!("{root}before.png");
    TEST_FIXTURE.write_file(client.operator(), &path).await;

    drivezip_cmd()
        .arg("rename")
        .arg(&path)
        .arg("after.png")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{root}after.png")));

    assert!(client.operator().exists(&format!("{root}after.png")).await?);
    Ok(())
}
