//! Runs the `mailpack` binary for commands that need no mail server.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn mailpack(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mailpack"))
        .args(args)
        .current_dir(home)
        .env("MAILPACK_HOME", home)
        .env_remove("MAILPACK_TOKEN")
        .output()
        .unwrap()
}

fn write_config(dir: &Path) {
    let root = dir.join("projects");
    let config = format!(
        "[mailbox]\naddress = \"packages@example.org\"\n\n[token]\nkey = \"saltvalue\"\n\n[install]\nroot = {:?}\n",
        root.to_string_lossy()
    );
    fs::write(dir.join("mailpack.toml"), config).unwrap();
}

#[test]
fn test_token_encode_then_life() {
    let home = TempDir::new().unwrap();
    write_config(home.path());

    let output = mailpack(home.path(), &["token", "encode", "hunter2", "--life", "3600"]);
    assert!(output.status.success());
    let token = String::from_utf8(output.stdout).unwrap();
    let token = token.trim();
    assert!(!token.is_empty());

    let output = mailpack(home.path(), &["token", "life", token]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "3600 (1 hour)");
}

#[test]
fn test_token_life_rejects_garbage() {
    let home = TempDir::new().unwrap();
    let output = mailpack(home.path(), &["token", "life", "%%%"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_remove_and_list_installed() {
    let home = TempDir::new().unwrap();
    write_config(home.path());
    let project = home.path().join("projects/demo-1.0");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("main.py"), "print('demo')").unwrap();

    let output = mailpack(home.path(), &["list", "--installed"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("demo-1.0"));

    let output = mailpack(home.path(), &["remove", "demo", "1.0"]);
    assert!(output.status.success());
    assert!(!project.exists());

    let output = mailpack(home.path(), &["remove", "demo", "1.0"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_logout_without_cached_token() {
    let home = TempDir::new().unwrap();
    let output = mailpack(home.path(), &["logout"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No cached token"));
}

#[test]
fn test_publish_requires_content() {
    let home = TempDir::new().unwrap();
    write_config(home.path());
    let output = mailpack(home.path(), &["publish", "demo", "1.0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Nothing to publish"));
}
