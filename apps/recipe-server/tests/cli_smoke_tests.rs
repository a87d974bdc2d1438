//! CLI smoke tests for the recipe-server binary
//!
//! Config validation, help output and a short `run --mock` start-up.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn run_recipe_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_recipe-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute recipe-server")
}

/// Write `body` below a `server` section rooted in the temp dir.
fn write_config(dir: &Path, name: &str, body: &str) -> PathBuf {
    let home = dir.join("home").to_string_lossy().replace('\\', "/");
    let content = format!(
        r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 0
{body}
"#
    );
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path
}

const QUIET_LOGGING: &str = r#"
logging:
  default:
    console_level: error
    file: ""
"#;

#[test]
fn test_cli_help_command() {
    let output = run_recipe_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("recipe-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_recipe_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("recipe-server 0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_recipe_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report an error: {stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    for flag in ["--config", "-c"] {
        let output = run_recipe_server(&[flag, "/nonexistent/config.yaml", "check"]);

        assert!(!output.status.success(), "Should fail with missing config");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("config file not found"),
            "Should mention the missing file: {stderr}"
        );
    }
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_recipe_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!(
        r#"
database:
  url: "sqlite://database/recipes.db"
{QUIET_LOGGING}
modules:
  recipes:
    min_password_length: 8
  api_ingress:
    cors_enabled: true
"#
    );
    let config_path = write_config(temp_dir.path(), "valid.yaml", &body);

    let output = run_recipe_server(&["--config", config_path.to_str().unwrap(), "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "STDOUT: {stdout}\nSTDERR: {stderr}");
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("Database backend: Sqlite"));
    assert!(temp_dir.path().join("home").is_dir(), "home_dir is created");
}

#[test]
fn test_cli_unknown_module_key_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!(
        r#"
{QUIET_LOGGING}
modules:
  recipes:
    min_pasword_length: 8
"#
    );
    let config_path = write_config(temp_dir.path(), "typo.yaml", &body);

    let output = run_recipe_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid configuration for module 'recipes'"),
        "{stderr}"
    );
}

#[test]
fn test_cli_mock_flag_skips_database_validation() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!(
        r#"
database:
  url: "mysql://localhost/nonexistent"
{QUIET_LOGGING}
"#
    );
    let config_path = write_config(temp_dir.path(), "mock.yaml", &body);
    let config = config_path.to_str().unwrap();

    let output = run_recipe_server(&["--config", config, "check"]);
    assert!(!output.status.success(), "mysql is not a supported backend");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported database type"), "{stderr}");

    let output = run_recipe_server(&["--config", config, "--mock", "check"]);
    assert!(output.status.success(), "--mock ignores the configured database");
}

#[test]
fn test_cli_print_config_applies_overrides() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "print.yaml", QUIET_LOGGING);

    let output = run_recipe_server(&[
        "--config",
        config_path.to_str().unwrap(),
        "--port",
        "9321",
        "--print-config",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("server:"));
    assert!(stdout.contains("port: 9321"));
}

#[test]
fn test_cli_run_without_database_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "nodb.yaml", QUIET_LOGGING);

    let output = run_recipe_server(&["--config", config_path.to_str().unwrap(), "run"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("database section is required"), "{stderr}");
}

#[tokio::test]
async fn test_cli_run_command_with_mock_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "run.yaml", QUIET_LOGGING);

    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_recipe-server"));
    cmd.args(["--config", config_path.to_str().unwrap(), "--mock", "run"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // A running server never exits on its own; the timeout is the success path.
    match timeout(Duration::from_secs(3), cmd.output()).await {
        Err(_elapsed) => {}
        Ok(output) => {
            let output = output.expect("Failed to execute recipe-server");
            panic!(
                "server exited early: {}\nSTDERR: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            );
        }
    }
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_recipe_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Start the server"));

    let output = run_recipe_server(&["check", "--help"]);
    assert!(output.status.success(), "Check subcommand help should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Check configuration"));
}
