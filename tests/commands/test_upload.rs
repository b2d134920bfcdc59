//! Tests for the upload command and the tgbot binary
//!
//! Everything except the ignored test stops before any network activity.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;
use tgbot::config::PROXY_VARS;

fn tgbot(session_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tgbot"));
    cmd.env_remove("BOT_TOKEN")
        .env_remove("CHAT_ID")
        .env_remove("TGBOT_SESSION")
        .env_remove("TELEGRAM_API_ID")
        .env_remove("TELEGRAM_API_HASH")
        .env_remove("RUST_LOG")
        .arg("--session")
        .arg(session_dir.join("tgbot.session"));
    for key in PROXY_VARS {
        cmd.env_remove(key);
    }
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_missing_bot_token_exits_1() {
    let temp = tempdir().expect("tempdir");
    let output = tgbot(temp.path())
        .env("CHAT_ID", "42")
        .arg("file.txt")
        .output()
        .expect("run tgbot");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("[-] Invalid BOT_TOKEN"));
    assert!(!temp.path().join("tgbot.session").exists());
}

#[test]
fn test_missing_chat_id_exits_1() {
    let temp = tempdir().expect("tempdir");
    let output = tgbot(temp.path())
        .env("BOT_TOKEN", "123:abc")
        .arg("file.txt")
        .output()
        .expect("run tgbot");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("[-] Invalid CHAT_ID"));
}

#[test]
fn test_no_files_exits_1() {
    let temp = tempdir().expect("tempdir");
    let output = tgbot(temp.path())
        .env("BOT_TOKEN", "123:abc")
        .env("CHAT_ID", "42")
        .output()
        .expect("run tgbot");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("[-] No files to upload"));
}

#[test]
fn test_missing_file_exits_1_before_login() {
    let temp = tempdir().expect("tempdir");
    let output = tgbot(temp.path())
        .env("BOT_TOKEN", "123:abc")
        .env("CHAT_ID", "42")
        .arg(temp.path().join("does-not-exist.bin"))
        .output()
        .expect("run tgbot");

    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("[-] An error occurred"));
    assert!(out.contains("does-not-exist.bin"));
    assert!(!out.contains("Logging in"));
}

#[test]
fn test_unsupported_proxy_exits_1() {
    let temp = tempdir().expect("tempdir");
    let file = temp.path().join("payload.txt");
    std::fs::write(&file, b"payload").unwrap();

    let output = tgbot(temp.path())
        .env("BOT_TOKEN", "123:abc")
        .env("CHAT_ID", "42")
        .env("ALL_PROXY", "ftp://host:21")
        .arg(&file)
        .output()
        .expect("run tgbot");

    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("[-] An error occurred"));
    assert!(out.contains("Unsupported proxy scheme"));
}

#[test]
fn test_usage_error_exits_1() {
    let temp = tempdir().expect("tempdir");
    let output = tgbot(temp.path())
        .env("BOT_TOKEN", "123:abc")
        .env("CHAT_ID", "42")
        .arg("--session")
        .output()
        .expect("run tgbot");

    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stderr).is_empty());
}

#[test]
fn test_file_starting_with_hyphen_is_a_path() {
    let temp = tempdir().expect("tempdir");
    let output = tgbot(temp.path())
        .current_dir(temp.path())
        .env("BOT_TOKEN", "123:abc")
        .env("CHAT_ID", "42")
        .arg("-build.log")
        .output()
        .expect("run tgbot");

    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("File not found: -build.log"), "{out}");
}

#[test]
fn test_http_proxy_is_refused_before_login() {
    let temp = tempdir().expect("tempdir");
    let file = temp.path().join("payload.txt");
    std::fs::write(&file, b"payload").unwrap();

    let output = tgbot(temp.path())
        .env("BOT_TOKEN", "123:abc")
        .env("CHAT_ID", "42")
        .env("HTTPS_PROXY", "http://10.0.0.1:3128")
        .arg(&file)
        .output()
        .expect("run tgbot");

    let out = stdout(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("Proxy type not supported"), "{out}");
    assert!(!temp.path().join("tgbot.session").exists());
}

#[test]
fn test_help_exits_0() {
    let temp = tempdir().expect("tempdir");
    let output = tgbot(temp.path()).arg("--help").output().expect("run tgbot");
    assert!(output.status.success());
    assert!(stdout(&output).contains("Files to upload"));
}

#[test]
#[ignore] // Requires BOT_TOKEN, CHAT_ID and network access
fn test_upload_real_file() {
    let temp = tempdir().expect("tempdir");
    let file = temp.path().join("tgbot-integration.txt");
    std::fs::write(&file, b"uploaded by the tgbot integration test\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tgbot"))
        .arg("--session")
        .arg(temp.path().join("tgbot.session"))
        .arg(&file)
        .output()
        .expect("run tgbot");

    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("[+] Done!"));
}
