use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pr_bot_cmd(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pr-bot").unwrap();
    cmd.env_clear().current_dir(workdir.path());
    cmd
}

fn with_required_env(cmd: &mut Command, workdir: &TempDir) {
    cmd.env("GC_ARTICLES_API_URL", "http://127.0.0.1:9/wp-json/wp/v2")
        .env("GC_ARTICLES_API_USERNAME", "bot")
        .env("GC_ARTICLES_API_PASSWORD", "app-password")
        .env("GITHUB_TOKEN", "test-token")
        .env("GITHUB_OWNER", "cds-snc")
        .env("GITHUB_REPO", "site")
        .env("GITHUB_API_URL", "http://127.0.0.1:9")
        .env("LOG_LEVEL", "error")
        .env(
            "PR_BOT_HASH_STORE",
            workdir.path().join("hashes.json").to_str().unwrap(),
        );
}

#[test]
fn test_help_describes_the_bot() {
    let workdir = TempDir::new().unwrap();

    pr_bot_cmd(&workdir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pull request"))
        .stdout(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn test_version_flag() {
    let workdir = TempDir::new().unwrap();

    pr_bot_cmd(&workdir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pr-bot"));
}

#[test]
fn test_unknown_flag_rejected() {
    let workdir = TempDir::new().unwrap();

    pr_bot_cmd(&workdir).arg("--dry-run").assert().failure();
}

#[test]
fn test_missing_configuration_exits_with_error() {
    let workdir = TempDir::new().unwrap();

    pr_bot_cmd(&workdir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Missing environment variable: GC_ARTICLES_API_URL",
        ));
}

#[test]
fn test_invalid_url_exits_with_error() {
    let workdir = TempDir::new().unwrap();
    let mut cmd = pr_bot_cmd(&workdir);
    with_required_env(&mut cmd, &workdir);

    cmd.env("GITHUB_API_URL", "::not a url::")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_API_URL is not a valid URL"));
}

#[test]
fn test_unreachable_services_fail_without_touching_store() {
    let workdir = TempDir::new().unwrap();
    let mut cmd = pr_bot_cmd(&workdir);
    with_required_env(&mut cmd, &workdir);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Content sync failed"));

    assert!(!workdir.path().join("hashes.json").exists());
}
