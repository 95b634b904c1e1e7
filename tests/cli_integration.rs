//! Integration tests for the CryptoVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Commands that talk to the store run against a `mockito` server with
//! the token supplied through `CRYPTOVAULT_TOKEN`, so nothing prompts.

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;
use serde_json::json;

use cryptovault::crypto;

/// Helper: get a Command pointing at the cryptovault binary.
fn cryptovault() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("cryptovault").expect("binary should exist")
}

#[test]
fn help_flag_shows_usage() {
    cryptovault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Client-side encrypted credential vault",
        ))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("reveal"))
        .stdout(predicate::str::contains("open"));
}

#[test]
fn version_flag_shows_version() {
    cryptovault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cryptovault"));
}

#[test]
fn version_command_shows_cipher() {
    cryptovault()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("RSA-2048 OAEP"));
}

#[test]
fn no_args_shows_help() {
    cryptovault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn completions_for_bash() {
    cryptovault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cryptovault"));
}

#[test]
fn audit_with_no_log_is_empty() {
    let tmp = TempDir::new().unwrap();
    cryptovault()
        .arg("audit")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries found"));
}

#[test]
fn init_refuses_to_overwrite_key_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("key.pem"), "existing").unwrap();

    cryptovault()
        .arg("init")
        .current_dir(tmp.path())
        .env("CRYPTOVAULT_TOKEN", "t")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        std::fs::read_to_string(tmp.path().join("key.pem")).unwrap(),
        "existing"
    );
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(".cryptovault.toml"),
        "api_url = \"ftp://example.com\"\n",
    )
    .unwrap();

    cryptovault()
        .arg("list")
        .current_dir(tmp.path())
        .env("CRYPTOVAULT_TOKEN", "t")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config"));
}

#[test]
fn reveal_with_unreachable_store_fails() {
    let tmp = TempDir::new().unwrap();
    cryptovault()
        .args(["reveal", "1", "--api-url", "http://127.0.0.1:9"])
        .current_dir(tmp.path())
        .env("CRYPTOVAULT_TOKEN", "t")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Credential store error"));
}

#[test]
fn reveal_prints_decrypted_password() {
    let tmp = TempDir::new().unwrap();
    let pair = crypto::generate_key_pair().unwrap();
    let private_text = crypto::serialize_private(&pair.decryption).unwrap();
    let public_text = crypto::serialize_public(&pair.encryption).unwrap();
    crypto::write_key_file(&tmp.path().join("key.pem"), &private_text).unwrap();

    let ciphertext = crypto::encrypt("Senha@Netflix123", &pair.encryption).unwrap();

    let mut server = mockito::Server::new();
    server
        .mock("GET", "/private/credentials")
        .match_header("authorization", "Bearer cli-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{ "id": 1, "site": "Netflix", "login": "me", "password": ciphertext }])
                .to_string(),
        )
        .create();
    server
        .mock("GET", "/private/publickey")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "publicKey": public_text }]).to_string())
        .create();

    cryptovault()
        .args(["reveal", "1", "--api-url", &server.url()])
        .current_dir(tmp.path())
        .env("CRYPTOVAULT_TOKEN", "cli-token")
        .assert()
        .success()
        .stdout(predicate::str::contains("Senha@Netflix123"));
}

#[test]
fn list_masks_passwords() {
    let tmp = TempDir::new().unwrap();

    let mut server = mockito::Server::new();
    server
        .mock("GET", "/private/credentials")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{ "id": 3, "site": "Gmail", "login": "me@example.com", "password": "Q0lQSEVS" }])
                .to_string(),
        )
        .create();

    cryptovault()
        .args(["list", "--api-url", &server.url()])
        .current_dir(tmp.path())
        .env("CRYPTOVAULT_TOKEN", "t")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gmail"))
        .stdout(predicate::str::contains("me@example.com"))
        .stdout(predicate::str::contains("Q0lQSEVS").not());
}
