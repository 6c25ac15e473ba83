use crate::*;
use assert_cmd::prelude::*;
use drivezip::error::{Error, Result};
use drivezip::storage::StorageClient;
use predicates::prelude::*;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_delete_file,
        test_delete_folder_with_contents,
        test_delete_missing_entry,
        test_delete_many_reports_failures
    ));

    tests.extend(async_trials!(
        client,
        e2e_test_rm_command_with_force,
        e2e_test_rm_command_cancelled
    ));
}

async fn test_delete_file(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let path = format!("{root}a.txt");
    TEST_FIXTURE.write_file(client.operator(), &path).await;

    client.delete(&path).await?;

    assert!(!client.operator().exists(&path).await?);
    assert!(client.operator().exists(&root).await?);
    Ok(())
}

async fn test_delete_folder_with_contents(client: StorageClient) -> Result<()> {
    let op = client.operator();
    let root = TEST_FIXTURE.new_dir_path();
    TEST_FIXTURE.write_file(op, &format!("{root}a.txt")).await;
    TEST_FIXTURE.write_file(op, &format!("{root}sub/b.txt")).await;

    client.delete(&root).await?;

    assert!(client.stat(&root).await.unwrap_err().is_not_found());
    assert!(!op.exists(&format!("{root}sub/b.txt")).await?);
    Ok(())
}

async fn test_delete_missing_entry(client: StorageClient) -> Result<()> {
    let missing = TEST_FIXTURE.new_dir_path();

    let err = client.delete(&missing).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");

    let err = client.delete("").await.unwrap_err();
    assert!(err.is_invalid_argument(), "unexpected error: {err}");
    Ok(())
}

async fn test_delete_many_reports_failures(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let a = format!("{root}a.txt");
    let b = format!("{root}b.txt");
    let ghost = format!("{root}ghost.txt");
    TEST_FIXTURE.write_file(client.operator(), &a).await;
    TEST_FIXTURE.write_file(client.operator(), &b).await;

    let err = client
        .delete_many(&[a.clone(), ghost.clone(), b.clone()])
        .await
        .unwrap_err();

    match err {
        Error::PartialDeletion { failed_ids } => assert_eq!(failed_ids, vec![ghost]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!client.operator().exists(&a).await?);
    assert!(!client.operator().exists(&b).await?);
    Ok(())
}

async fn e2e_test_rm_command_with_force(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let a = format!("{root}a.txt");
    let b = format!("{root}b.txt");
    TEST_FIXTURE.write_file(client.operator(), &a).await;
    TEST_FIXTURE.write_file(client.operator(), &b).await;

    drivezip_cmd()
        .arg("rm")
        .arg("-f")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 item(s)"));

    assert!(!client.operator().exists(&a).await?);
    assert!(!client.operator().exists(&b).await?);
    Ok(())
}

async fn e2e_test_rm_command_cancelled(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let a = format!("{root}a.txt");
    TEST_FIXTURE.write_file(client.operator(), &a).await;

    assert_cmd::Command::from_std(drivezip_cmd())
        .arg("rm")
        .arg(&a)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deletion cancelled"));

    assert!(client.operator().exists(&a).await?);
    Ok(())
}
