use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("postbox")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("mark-read"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_send_help_shows_arguments() {
    cargo_bin_cmd!("postbox")
        .args(["send", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--message"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn test_send_requires_recipient() {
    cargo_bin_cmd!("postbox")
        .args(["send", "--message", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--to"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("postbox")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
