use crate::*;
use assert_cmd::prelude::*;
use drivezip::error::Result;
use drivezip::storage::StorageClient;
use drivezip::storage::mime::FOLDER_MIME;
use predicates::prelude::*;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_list_folder_across_pages,
        test_list_reports_names_and_kinds,
        test_stat_file,
        test_stat_folder_without_trailing_slash,
        test_list_missing_folder
    ));

    tests.extend(async_trials!(
        client,
        e2e_test_ls_command,
        e2e_test_ls_command_json,
        e2e_test_stat_command_missing
    ));
}

async fn test_list_folder_across_pages(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let mut expected = Vec::new();
    for i in 0..7 {
        let path = format!("{root}item-{i}.txt");
        TEST_FIXTURE.write_file(client.operator(), &path).await;
        expected.push(path);
    }

    let entries = client.list_folder(&root).await?;

    let ids: Vec<_> = entries.into_iter().map(|e| e.id).collect();
    assert_eq!(ids, expected);
    Ok(())
}

async fn test_list_reports_names_and_kinds(client: StorageClient) -> Result<()> {
    let op = client.operator();
    let root = TEST_FIXTURE.new_dir_path();
    let content = TEST_FIXTURE.write_file(op, &format!("{root}report.pdf")).await;
    TEST_FIXTURE.write_file(op, &format!("{root}archive.tar")).await;
    op.create_dir(&format!("{root}docs/")).await?;

    let entries = client.list_folder(&root).await?;

    let summary: Vec<_> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.mime_type.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("archive.tar", "*/*"),
            ("docs", FOLDER_MIME),
            ("report", "application/pdf"),
        ]
    );
    assert_eq!(entries[2].size, content.len() as u64);
    assert_eq!(entries[1].parents, vec![root.clone()]);
    Ok(())
}

async fn test_stat_file(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let path = format!("{root}table.csv");
    let content = TEST_FIXTURE.write_file(client.operator(), &path).await;

    let entry = client.stat(&path).await?;

    assert_eq!(entry.id, path);
    assert_eq!(entry.file_name(), "table.csv");
    assert_eq!(entry.mime_type, "text/csv");
    assert_eq!(entry.size, content.len() as u64);
    Ok(())
}

async fn test_stat_folder_without_trailing_slash(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    client.operator().create_dir(&root).await?;

    let entry = client.stat(root.trim_end_matches('/')).await?;

    assert!(entry.is_folder());
    assert_eq!(entry.id, root);
    Ok(())
}

async fn test_list_missing_folder(client: StorageClient) -> Result<()> {
    let missing = TEST_FIXTURE.new_dir_path();

    let err = client.list_folder(&missing).await.unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {err}");
    Ok(())
}

async fn e2e_test_ls_command(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    TEST_FIXTURE
        .write_file(client.operator(), &format!("{root}summary.txt"))
        .await;
    client.operator().create_dir(&format!("{root}nested/")).await?;

    drivezip_cmd()
        .arg("ls")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("summary.txt"))
        .stdout(predicate::str::contains("DIR"))
        .stdout(predicate::str::contains(format!("{root}nested/")));

    Ok(())
}

async fn e2e_test_ls_command_json(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_dir_path();
    let path = format!("{root}data.json");
    TEST_FIXTURE.write_file(client.operator(), &path).await;

    let output = drivezip_cmd()
        .arg("ls")
        .arg(&root)
        .arg("--json")
        .output()
        .expect("failed to run drivezip");
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries[0]["id"], path.as_str());
    assert_eq!(entries[0]["name"], "data");
    Ok(())
}

async fn e2e_test_stat_command_missing(_client: StorageClient) -> Result<()> {
    let missing = TEST_FIXTURE.new_dir_path();

    drivezip_cmd()
        .arg("stat")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entry not found"));

    Ok(())
}
