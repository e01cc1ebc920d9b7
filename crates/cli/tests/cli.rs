use assert_cmd::Command;
use predicates::prelude::*;

fn stocksync() -> Command {
    let mut cmd = Command::cargo_bin("stocksync").unwrap();
    for var in ["REMOTE_URL", "REMOTE_TOKEN", "SYNC_ENABLED", "LOG_ONLY"] {
        cmd.env_remove(format!("STOCKSYNC_{var}"));
    }
    cmd
}

#[test]
fn settings_masks_the_token() {
    stocksync()
        .arg("settings")
        .env("STOCKSYNC_REMOTE_URL", "https://shop.example.com")
        .env("STOCKSYNC_REMOTE_TOKEN", "super-secret")
        .assert()
        .success()
        .stdout(predicate::str::contains("STOCKSYNC_REMOTE_URL=https://shop.example.com"))
        .stdout(predicate::str::contains("STOCKSYNC_REMOTE_TOKEN=********"))
        .stdout(predicate::str::contains("STOCKSYNC_SYNC_ENABLED=true\t# Enable Sync:"))
        .stdout(predicate::str::contains("# Access Token, required:"))
        .stdout(predicate::str::contains("super-secret").not());
}

#[test]
fn probe_fails_when_unconfigured() {
    stocksync().arg("probe").assert().failure();
}

#[test]
fn reconcile_without_remote_is_reported_but_not_an_error() {
    stocksync()
        .args(["reconcile", "--sku", "WIDGET-1", "--quantity", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("outcome=remote not configured"));
}

#[test]
fn reconcile_rejects_unrelated_kinds() {
    stocksync()
        .args(["reconcile", "--sku", "WIDGET-1", "--quantity", "5", "--kind", "part.saved"])
        .assert()
        .failure();
}
