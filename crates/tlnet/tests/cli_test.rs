//! Integration tests for the `tlnet` CLI binary.
//!
//! Argument parsing, help output, completions, profile management and
//! error exit codes, plus a few end-to-end runs against a mock card.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tlnet` binary with env isolation.
///
/// Clears all `TLNET_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn tlnet_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tlnet");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("TLNET_PROFILE")
        .env_remove("TLNET_HOST")
        .env_remove("TLNET_USER")
        .env_remove("TLNET_PORT")
        .env_remove("TLNET_NO_TLS")
        .env_remove("TLNET_INSECURE")
        .env_remove("TLNET_TIMEOUT")
        .env_remove("TLNET_OUTPUT")
        .env_remove("TLNET_PASSWORD");
    cmd
}

fn isolated() -> (tempfile::TempDir, assert_cmd::Command) {
    let home = tempfile::tempdir().unwrap();
    let cmd = tlnet_cmd(home.path());
    (home, cmd)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const LOGIN_PAGE: &str = r#"<div id="login_title"></div>
<input type="hidden" name="Challenge" value="K9x2mQ7z">"#;

async fn mock_card(accept_login: bool) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/home.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/delta/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let landing = if accept_login { "<h1>UPS Status</h1>" } else { LOGIN_PAGE };
    Mock::given(method("GET"))
        .and(path("/home.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(landing))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/delta/adm_batch"))
        .and(body_string_contains("DL_SYSTEM=Download"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("SSH Port=22\r\nSysLog Server1=10.0.0.9\r\n"),
        )
        .mount(&server)
        .await;
    server
}

/// Run the binary against `server` off the async runtime.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let port = server.address().port().to_string();
    let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
    tokio::task::spawn_blocking(move || {
        let (_home, mut cmd) = isolated();
        cmd.env("TLNET_PASSWORD", "secret")
            .args(["--host", "127.0.0.1", "--port", &port, "--no-tls"])
            .args(&args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_home, mut cmd) = isolated();
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let (_home, mut cmd) = isolated();
    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("UPS")
            .and(predicate::str::contains("batch"))
            .and(predicate::str::contains("syslog"))
            .and(predicate::str::contains("users")),
    );
}

#[test]
fn test_version_flag() {
    let (_home, mut cmd) = isolated();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tlnet"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    let (_home, mut cmd) = isolated();
    cmd.args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    let (_home, mut cmd) = isolated();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let (_home, mut cmd) = isolated();
    let output = cmd.arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_show_without_card_is_usage_error() {
    let (_home, mut cmd) = isolated();
    cmd.args(["show", "system"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No card configured"));
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let (_home, mut cmd) = isolated();
    cmd.args(["--profile", "nope", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_invalid_toggle_value() {
    let (_home, mut cmd) = isolated();
    let output = cmd
        .args(["--host", "ups", "console", "ssh", "maybe"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

#[test]
fn test_connection_refused_exit_code() {
    let (_home, mut cmd) = isolated();
    cmd.env("TLNET_PASSWORD", "pw")
        .args(["--host", "127.0.0.1", "--port", "1", "--no-tls", "--timeout", "2"])
        .args(["show", "system"])
        .assert()
        .code(7);
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_time_zones_offline() {
    let (_home, mut cmd) = isolated();
    cmd.args(["time", "zones"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GMT+05:30").and(predicate::str::contains("GMT-12")));
}

#[test]
fn test_profiles_add_use_list() {
    let home = tempfile::tempdir().unwrap();

    tlnet_cmd(home.path())
        .args(["profiles", "add", "rack1", "--host", "10.0.0.5", "--no-tls"])
        .assert()
        .success();
    tlnet_cmd(home.path())
        .args(["profiles", "add", "lab", "--host", "ups-lab.local"])
        .assert()
        .success();
    tlnet_cmd(home.path())
        .args(["profiles", "use", "lab"])
        .assert()
        .success();

    tlnet_cmd(home.path())
        .args(["--output", "plain", "profiles", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rack1").and(predicate::str::contains("lab")));

    tlnet_cmd(home.path())
        .args(["profiles", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile = \"lab\""));
}

#[test]
fn test_profiles_use_unknown() {
    let (_home, mut cmd) = isolated();
    cmd.args(["profiles", "use", "ghost"]).assert().code(2);
}

// ── Against a mock card ─────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_show_system_as_json() {
    let server = mock_card(true).await;
    let output = run_against(&server, &["--output", "json", "show", "system"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"SSH Port\""), "{stdout}");
    assert!(stdout.contains("\"22\""), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_syslog_list_plain() {
    let server = mock_card(true).await;
    let output = run_against(&server, &["--output", "plain", "syslog", "list"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "10.0.0.9");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exit_code() {
    let server = mock_card(false).await;
    let output = run_against(&server, &["login"]).await;

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("rejected"));
}
