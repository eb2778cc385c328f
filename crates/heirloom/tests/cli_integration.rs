#![allow(deprecated)] // cargo_bin! macro doesn't exist yet in assert_cmd 2.1

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with a clean environment so host variables can't leak in.
fn heirloom() -> Command {
    let mut cmd = Command::cargo_bin("heirloom").unwrap();
    cmd.env_clear();
    cmd
}

/// Project root with throttling disabled.
fn project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("heirloom.toml"), "[acquire]\nthrottle_ms = 0\n").unwrap();
    dir
}

/// Single-asset catalog whose URL is never reachable.
fn write_catalog(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("catalog.toml");
    std::fs::write(
        &path,
        r#"
[[asset]]
id = "a"
name = "Asset A"
url = "http://127.0.0.1:9/a.jpg"
source_org = "Test Archive"
asset_type = "map"
target_path = "x/a.jpg"

[asset.metadata]
year = 1776
"#,
    )
    .unwrap();
    path
}

fn write_store(dir: &Path, local_path: &str, file_size: u64) {
    std::fs::create_dir_all(dir.join("data")).unwrap();
    let store = serde_json::json!({
        "sources": {},
        "downloads": {
            "a": {
                "asset_id": "a",
                "name": "Asset A",
                "url": "http://127.0.0.1:9/a.jpg",
                "local_path": local_path,
                "source_org": "Test Archive",
                "description": "",
                "asset_type": "map",
                "metadata": {},
                "downloaded_at": "2026-07-04 12:00:00",
                "file_hash": "098890dde069e9abad63f19a0d9e1f32",
                "file_size": file_size
            }
        }
    });
    std::fs::write(dir.join("data/SourceLog.json"), store.to_string()).unwrap();
}

#[test]
fn test_help_lists_commands() {
    heirloom()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("acquire"))
        .stdout(predicate::str::contains("signing-env"))
        .stdout(predicate::str::contains("encode"));
}

#[test]
fn test_version() {
    heirloom()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("heirloom"));
}

#[test]
fn test_unknown_asset_type_is_empty_run() {
    let dir = project();

    heirloom()
        .args(["acquire", "--asset-type", "hologram", "--project-root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total assets: 0"))
        .stdout(predicate::str::contains("DOWNLOAD COMPLETE"))
        .stdout(predicate::str::contains("Successful: 0/0 (0.0%)"));

    let report: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("tools/download_log.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(report["download_session"]["total_assets"], 0);
    assert_eq!(report["download_session"]["success_rate"], "0.0%");
    assert!(dir.path().join("data/SourceLog.json").exists());
    assert!(dir.path().join("assets/portraits").is_dir());
}

#[test]
fn test_project_root_from_env() {
    let dir = project();

    heirloom()
        .env("HEIRLOOM_PROJECT_ROOT", dir.path())
        .args(["acquire", "--asset-type", "hologram"])
        .assert()
        .success();

    assert!(dir.path().join("tools/download_log.json").exists());
}

#[test]
fn test_existing_files_are_skipped() {
    let dir = project();
    let catalog = write_catalog(dir.path());
    std::fs::create_dir_all(dir.path().join("x")).unwrap();
    std::fs::write(dir.path().join("x/a.jpg"), b"AAAA").unwrap();

    heirloom()
        .args(["acquire", "--project-root"])
        .arg(dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloading Asset A..."))
        .stdout(predicate::str::contains("  Already exists: x/a.jpg"))
        .stdout(predicate::str::contains("Successful: 1/1 (100.0%)"))
        .stdout(predicate::str::contains("Assets by Type:\n  Map: 1/1"));
}

#[test]
fn test_quiet_hides_progress() {
    let dir = project();
    let catalog = write_catalog(dir.path());
    std::fs::create_dir_all(dir.path().join("x")).unwrap();
    std::fs::write(dir.path().join("x/a.jpg"), b"AAAA").unwrap();

    heirloom()
        .args(["-q", "acquire", "--project-root"])
        .arg(dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloading").not())
        .stdout(predicate::str::contains("DOWNLOAD COMPLETE"));
}

#[test]
fn test_corrupt_store_is_fatal() {
    let dir = project();
    let catalog = write_catalog(dir.path());
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(dir.path().join("data/SourceLog.json"), "{ not json").unwrap();

    heirloom()
        .args(["acquire", "--project-root"])
        .arg(dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("corrupt"));

    assert!(!dir.path().join("tools/download_log.json").exists());
}

#[test]
fn test_invalid_catalog_exit_code() {
    let dir = project();
    let catalog = dir.path().join("bad.toml");
    std::fs::write(&catalog, "[[asset]]\nid = \"a\"\n").unwrap();

    heirloom()
        .args(["catalog", "--catalog"])
        .arg(&catalog)
        .assert()
        .code(4);
}

#[test]
fn test_verify_only_reports_problems() {
    let dir = project();
    write_store(dir.path(), "x/a.jpg", 4);

    heirloom()
        .args(["acquire", "--verify-only", "--project-root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Verifying asset integrity..."))
        .stdout(predicate::str::contains("  Missing: Asset A"))
        .stdout(predicate::str::contains("Asset verification: 0/1 valid"));

    std::fs::create_dir_all(dir.path().join("x")).unwrap();
    std::fs::write(dir.path().join("x/a.jpg"), b"AAA").unwrap();
    heirloom()
        .args(["acquire", "--verify-only", "--project-root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("  Size mismatch: Asset A"));

    std::fs::write(dir.path().join("x/a.jpg"), b"AAAA").unwrap();
    heirloom()
        .args(["acquire", "--verify-only", "--rehash", "--project-root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Asset verification: 1/1 valid"));

    // Verification is read-only.
    assert!(!dir.path().join("tools/download_log.json").exists());
}

#[test]
fn test_rehash_requires_verify_only() {
    heirloom()
        .args(["acquire", "--rehash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--verify-only"));
}

#[test]
fn test_catalog_listing() {
    heirloom()
        .args(["catalog", "--asset-type", "portrait"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jefferson_portrait"))
        .stdout(predicate::str::contains("philly_map_1752").not())
        .stdout(predicate::str::contains("5 assets"));

    let output = heirloom().args(["catalog", "--json"]).output().unwrap();
    assert!(output.status.success());
    let assets: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(assets.as_array().unwrap().len(), 11);
    assert_eq!(assets[0]["id"], "philly_map_1752");
}

#[test]
fn test_signing_env_complete() {
    heirloom()
        .env("CM_CERTIFICATE_BASE64", "cert-value")
        .env("IOS_PROFILE_BASE64", "profile-value")
        .env("IOS_BUNDLE_ID", "com.example.game")
        .arg("signing-env")
        .assert()
        .success()
        .stdout(predicate::str::contains(" • IOS_CERT_BASE64 (via CM_CERTIFICATE_BASE64)"))
        .stdout(predicate::str::contains("Optional values: (none found)"))
        .stdout(predicate::str::contains("✅ All required Codemagic signing secrets are present."))
        .stdout(predicate::str::contains("cert-value").not());
}

#[test]
fn test_signing_env_missing() {
    heirloom()
        .env("IOS_BUNDLE_ID", "com.example.game")
        .arg("signing-env")
        .assert()
        .code(7)
        .stdout(predicate::str::contains("Missing required values:"))
        .stdout(predicate::str::contains(" • IOS_PROFILE_BASE64"))
        .stdout(predicate::str::contains("❌ Codemagic signing secrets are incomplete."));
}

#[test]
fn test_signing_env_json() {
    let output = heirloom()
        .env("APPSTORECONNECT_KEY_ID", "key")
        .args(["signing-env", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));

    let check: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(check["required"]["missing"].as_array().unwrap().len(), 3);
    assert_eq!(check["optional"]["ready"][0]["source"], "APPSTORECONNECT_KEY_ID");
}

#[test]
fn test_encode() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cert.p12");
    std::fs::write(&input, b"hello\nworld").unwrap();

    heirloom()
        .arg("encode")
        .arg(&input)
        .assert()
        .success()
        .stdout("aGVsbG8Kd29ybGQ=\n");

    let out = dir.path().join("cert.env");
    heirloom()
        .arg("encode")
        .arg(&input)
        .args(["--env-var", "IOS_CERT_BASE64", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote base64 output to"));
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "IOS_CERT_BASE64=aGVsbG8Kd29ybGQ="
    );
}

#[test]
fn test_encode_missing_file() {
    heirloom()
        .args(["encode", "/nonexistent/cert.p12"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_completions() {
    heirloom()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("heirloom"));
}
