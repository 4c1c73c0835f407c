//! Integration tests for the `eventos` CLI binary.
//!
//! Argument parsing, help output, completions and error classes run
//! without a server; the session round trip runs against a wiremock API.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `eventos` binary with env isolation.
///
/// Clears all `EVENTOS_*` env vars and points config and data
/// directories at `home` so tests never touch the user's real files.
fn eventos_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("eventos");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("EVENTOS_PROFILE")
        .env_remove("EVENTOS_API_URL")
        .env_remove("EVENTOS_OUTPUT")
        .env_remove("EVENTOS_INSECURE")
        .env_remove("EVENTOS_TIMEOUT")
        .env_remove("EVENTOS_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = eventos_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("events")
            .and(predicate::str::contains("sessions"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("eventos"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .args(["config", "set", "api_url", "https://eventos.example.com/api"])
        .assert()
        .success();

    eventos_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://eventos.example.com/api"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let output = eventos_cmd(home.path())
        .args(["config", "set", "color_scheme", "dark"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("unknown config key"));
}

#[test]
fn test_unknown_profile_is_reported() {
    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .args(["--profile", "nowhere", "events", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = eventos_cmd(home.path())
        .args(["--output", "invalid", "events", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("invalid"));
}

#[test]
fn test_protected_command_without_session() {
    let home = tempfile::tempdir().unwrap();
    let output = eventos_cmd(home.path())
        .args(["--ephemeral", "events", "create", "--name", "Rust Meetup"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("signed-in user"), "{text}");
    assert!(text.contains("eventos login"), "{text}");
}

#[test]
fn test_gated_action_without_session_sends_nothing() {
    let home = tempfile::tempdir().unwrap();
    // Nothing listens on the discard port; reaching it would be a
    // connection error (exit 7) rather than a sign-in error.
    eventos_cmd(home.path())
        .args([
            "--ephemeral",
            "--api-url",
            "http://127.0.0.1:9/api",
            "events",
            "join",
            "1",
        ])
        .assert()
        .code(3);
}

#[test]
fn test_whoami_without_session() {
    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .args(["--ephemeral", "whoami"])
        .assert()
        .code(3);
}

#[test]
fn test_register_validates_locally() {
    let home = tempfile::tempdir().unwrap();
    let output = eventos_cmd(home.path())
        .args([
            "--ephemeral",
            "--api-url",
            "http://127.0.0.1:9/api",
            "register",
            "--email",
            "not-an-email",
            "--password",
            "123",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("email:"), "{text}");
    assert!(text.contains("password:"), "{text}");
}

#[test]
fn test_connection_error_exit_code() {
    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .args([
            "--ephemeral",
            "--api-url",
            "http://127.0.0.1:9/api",
            "events",
            "list",
        ])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not connect"));
}

// ── Against a mock API ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_events_list_plain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/eventos/eventos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "eventos": [
                {
                    "id": 7,
                    "nombre": "Rust Meetup",
                    "fecha_inicio": "2025-06-01T18:00:00",
                    "fecha_fin": "2025-06-01T21:00:00",
                    "capacidad_maxima": 40
                },
                {
                    "id": 8,
                    "nombre": "Data Day",
                    "fecha_inicio": "2025-06-02T09:00:00",
                    "fecha_fin": "2025-06-02T17:00:00",
                    "capacidad_maxima": 120
                }
            ],
            "total": 12,
            "page": 2,
            "total_pages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .args(["--ephemeral", "--api-url"])
        .arg(format!("{}/api", server.uri()))
        .args(["-o", "plain", "events", "list", "--page", "2"])
        .assert()
        .success()
        .stdout("7\n8\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_session_between_runs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-123",
            "user": { "id": 5, "email": "ana@example.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/eventos/3/registrarse"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Registrado" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let api_url = format!("{}/api", server.uri());

    eventos_cmd(home.path())
        .args(["--api-url", &api_url, "login"])
        .args(["--email", "ana@example.com", "--password", "secret"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Signed in as ana@example.com"));

    eventos_cmd(home.path())
        .args(["--api-url", &api_url, "-o", "plain", "whoami"])
        .assert()
        .success()
        .stdout("ana@example.com\n");

    eventos_cmd(home.path())
        .args(["--api-url", &api_url, "events", "join", "3"])
        .assert()
        .success();

    eventos_cmd(home.path())
        .args(["--api-url", &api_url, "logout"])
        .assert()
        .success();

    eventos_cmd(home.path())
        .args(["--api-url", &api_url, "whoami"])
        .assert()
        .code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected_shows_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "Credenciales inválidas" })),
        )
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .args(["--ephemeral", "--api-url"])
        .arg(format!("{}/api", server.uri()))
        .args(["login", "--email", "ana@example.com", "--password", "wrong"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Credenciales inválidas"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_event_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/eventos/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Evento no encontrado" })),
        )
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    eventos_cmd(home.path())
        .args(["--ephemeral", "--api-url"])
        .arg(format!("{}/api", server.uri()))
        .args(["events", "show", "99"])
        .assert()
        .code(4);
}
