//! End-to-end CLI tests that run the binary without touching the network.
//!
//! Each test that reaches config loading runs inside a temp directory with a
//! local `config.yaml`, so nothing is written to the real config directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TEST_CONFIG: &str = r#"api:
  base_url: https://api.bilibili.com
  timeout_secs: 30
  resolve_proxy: null
asr:
  endpoint: http://localhost:9000
  timeout_secs: 60
polling:
  interval_secs: 10
  max_attempts: 90
llm:
  endpoint: https://api.openai.com/v1
  api_key: ""
  model: test-model
  timeout_secs: 120
app:
  simplify: true
  default_format: text
"#;

fn workdir_with_config() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs_err::write(dir.path().join("config.yaml"), TEST_CONFIG).unwrap();
    dir
}

fn bilisub() -> Command {
    Command::cargo_bin("bilisub").unwrap()
}

#[test]
fn help_lists_subcommands() {
    bilisub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("transcribe"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_reports_package() {
    bilisub()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bilisub"));
}

#[test]
fn transcribe_requires_input() {
    bilisub()
        .arg("transcribe")
        .assert()
        .failure()
        .stderr(predicate::str::contains("INPUT"));
}

#[test]
fn transcribe_rejects_unknown_format() {
    bilisub()
        .args(["transcribe", "BV1GJ411x7h7", "--format", "toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn resolve_prints_bvid_and_canonical_url() {
    let dir = workdir_with_config();
    bilisub()
        .current_dir(dir.path())
        .args(["resolve", "BV1GJ411x7h7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BV1GJ411x7h7"))
        .stdout(predicate::str::contains(
            "https://www.bilibili.com/video/BV1GJ411x7h7",
        ));
}

#[test]
fn resolve_extracts_bvid_from_surrounding_text() {
    let dir = workdir_with_config();
    bilisub()
        .current_dir(dir.path())
        .args(["resolve", "看看这个视频 https://www.bilibili.com/video/BV1qt4y1X7TW?p=2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BV1qt4y1X7TW"));
}

#[test]
fn resolve_fails_on_text_without_identifier() {
    let dir = workdir_with_config();
    bilisub()
        .current_dir(dir.path())
        .args(["resolve", "just some plain text here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not resolve a video id"));
}

#[test]
fn summarize_requires_api_key() {
    let dir = workdir_with_config();
    bilisub()
        .current_dir(dir.path())
        .args(["summarize", "BV1GJ411x7h7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_key"));
}

#[test]
fn config_show_reads_local_override() {
    let dir = workdir_with_config();
    bilisub()
        .current_dir(dir.path())
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("test-model"))
        .stdout(predicate::str::contains("http://localhost:9000"));
}
