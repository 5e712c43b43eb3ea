use assert_cmd::cargo;
use predicates::prelude::*;

#[tokio::test]
async fn test_cli_help() {
    let mut cmd = cargo::cargo_bin_cmd!("sitepulse");
    let assert = cmd.arg("--help").assert();

    // On Windows, the binary name in help might be "sitepulse.exe"
    let expected_pattern = if cfg!(windows) {
        "sitepulse.exe [OPTIONS] <COMMAND>"
    } else {
        "sitepulse [OPTIONS] <COMMAND>"
    };

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains(expected_pattern))
        .stdout(predicate::str::contains("crawl"))
        .stdout(predicate::str::contains("audit"))
        .stdout(predicate::str::contains("serve"));
}

#[tokio::test]
async fn test_crawl_help_lists_limits() {
    let mut cmd = cargo::cargo_bin_cmd!("sitepulse");
    cmd.args(["crawl", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-pages"))
        .stdout(predicate::str::contains("--batch-size"))
        .stdout(predicate::str::contains("[default: 25]"));
}

#[tokio::test]
async fn test_missing_subcommand_fails() {
    let mut cmd = cargo::cargo_bin_cmd!("sitepulse");
    cmd.assert().failure();
}

#[tokio::test]
async fn test_unreachable_site_exits_with_error() {
    let mut cmd = cargo::cargo_bin_cmd!("sitepulse");
    cmd.args(["crawl", "http://127.0.0.1:1/", "--output", "json"])
        .env("XDG_CONFIG_HOME", "/nonexistent-sitepulse-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot fetch homepage"));
}
