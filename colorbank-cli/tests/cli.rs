//! Binary-level tests: import a file, then list it back

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ENV_VARS: [&str; 6] = [
    "DATABASE_URL",
    "COLORBANK_UPLOAD_DIR",
    "COLORBANK_PAGE_SIZE",
    "COLORBANK_COMMIT_MODE",
    "COLORBANK_MAX_UPLOAD_BYTES",
    "COLORBANK_BIND",
];

fn colorbank(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("colorbank").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.current_dir(dir.path());
    cmd
}

fn store_args(dir: &TempDir) -> Vec<String> {
    vec![
        "--database-url".into(),
        format!("sqlite://{}", dir.path().join("colors.db").display()),
        "--upload-dir".into(),
        dir.path().join("uploads").display().to_string(),
    ]
}

#[test]
fn import_then_list() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("colors.csv");
    std::fs::write(
        &file,
        "1;Red;FF0000;255;0;0;16711680\n2;Lime;00FF00;0;255;0;65280\n",
    )
    .unwrap();

    colorbank(&dir)
        .arg("import")
        .arg(&file)
        .args(store_args(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored 2 colors"));

    colorbank(&dir)
        .args(["list", "--page", "1"])
        .args(store_args(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Lime\""));

    colorbank(&dir)
        .args(["list", "--page", "2"])
        .args(store_args(&dir))
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of bounds"));
}

#[test]
fn import_rejects_non_csv_name() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("colors.txt");
    std::fs::write(&file, "1;Red;FF0000;255;0;0;16711680\n").unwrap();

    colorbank(&dir)
        .arg("import")
        .arg(&file)
        .args(store_args(&dir))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid file format"));
}
