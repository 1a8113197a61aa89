use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mapsync() -> Command {
    let mut cmd = Command::cargo_bin("mapsync").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_zip(path: &Path, files: &[(&str, &str)]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in files {
        zip.start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn seeded_base() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let zipped = tmp.path().join("raw/maps-zipped");
    fs::create_dir_all(&zipped).unwrap();
    write_zip(
        &zipped.join("Forest.zip"),
        &[
            ("Forest/Gridless/Forest Camp (Day).png", "day"),
            ("Forest/Gridded/Forest Camp (Day).png", "grid"),
            (".DS_Store", ""),
        ],
    );
    tmp
}

#[test]
fn test_help_output() {
    mapsync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Asset archive mirroring tool"))
        .stdout(predicate::str::contains("unzip"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("diff"))
        .stdout(predicate::str::contains("generate-download-helper"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_output() {
    mapsync()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_unknown_subcommand() {
    mapsync()
        .arg("explode")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_config_conflicts_with_no_config() {
    mapsync()
        .args(["--config", "x.toml", "--no-config", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_missing_config_file() {
    let tmp = TempDir::new().unwrap();
    mapsync()
        .current_dir(tmp.path())
        .args(["--config", "missing.toml", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_config_shows_defaults() {
    let tmp = TempDir::new().unwrap();
    mapsync()
        .current_dir(tmp.path())
        .args(["--no-config", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("download_delay_ms = 7000"))
        .stdout(predicate::str::contains("name = \"maps\""))
        .stdout(predicate::str::contains("__MACOSX"));
}

#[test]
fn test_unknown_category() {
    let tmp = TempDir::new().unwrap();
    mapsync()
        .args(["--no-config", "--base-dir"])
        .arg(tmp.path())
        .args(["sync", "-c", "tokens"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category 'tokens'"));
}

#[test]
fn test_missing_zipped_root() {
    let tmp = TempDir::new().unwrap();
    mapsync()
        .args(["--no-config", "--base-dir"])
        .arg(tmp.path())
        .arg("unzip")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Archive directory does not exist"));
}

#[test]
#[cfg(unix)]
fn test_build_end_to_end() {
    let tmp = seeded_base();

    mapsync()
        .args(["--no-config", "--base-dir"])
        .arg(tmp.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created:    1"))
        .stdout(predicate::str::contains("Manifest updated"));

    let link = tmp.path().join("maps/Forest/Forest_Camp_Day.png");
    assert!(link.is_symlink());
    assert_eq!(fs::read_to_string(&link).unwrap(), "day");
    assert!(!tmp.path().join("raw/maps-unzipped/.DS_Store").exists());
    assert!(!tmp.path().join("raw/maps-unzipped/Forest/Gridded").exists());

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(tmp.path().join("maps-manifest.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["entries"][1]["path"], "Forest/Forest_Camp_Day.png");

    // Second run converges without changes
    mapsync()
        .args(["--no-config", "--base-dir"])
        .arg(tmp.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total operations: 0"))
        .stdout(predicate::str::contains("Manifest unchanged"));

    mapsync()
        .args(["--no-config", "--base-dir"])
        .arg(tmp.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn test_dry_run_build_writes_nothing() {
    let tmp = seeded_base();

    mapsync()
        .args(["--no-config", "--dry-run", "--base-dir"])
        .arg(tmp.path())
        .arg("build")
        .assert()
        .success()
        .stderr(predicate::str::contains("[DRY RUN] Would extract"));

    assert!(!tmp.path().join("raw/maps-unzipped").exists());
    assert!(!tmp.path().join("maps").exists());
}

#[test]
fn test_corrupt_archive_fails_after_run() {
    let tmp = seeded_base();
    fs::write(tmp.path().join("raw/maps-zipped/Broken.zip"), "not a zip").unwrap();

    mapsync()
        .args(["--no-config", "--base-dir"])
        .arg(tmp.path())
        .arg("unzip")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Broken.zip"))
        .stderr(predicate::str::contains("1 archive(s) failed to extract"));

    assert!(
        tmp.path()
            .join("raw/maps-unzipped/Forest/Gridless/Forest Camp (Day).png")
            .exists()
    );
}

#[test]
fn test_generate_download_helper() {
    let tmp = seeded_base();

    mapsync()
        .args(["--no-config", "--base-dir"])
        .arg(tmp.path())
        .args(["generate-download-helper", "--delay-ms", "1500"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"window.alreadyDownloaded = ["Forest.zip"];"#,
        ))
        .stdout(predicate::str::contains("await delay(1500);"))
        .stdout(predicate::str::contains("downloadZips();"));
}

#[test]
fn test_download_alias_and_config_delay() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("mapsync.toml");
    fs::write(
        &config,
        r#"
download_delay_ms = 300

[[category]]
name = "tokens"
origin = "https://example.com/tokens"
"#,
    )
    .unwrap();

    mapsync()
        .current_dir(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["download", "-c", "tokens"])
        .assert()
        .success()
        .stdout(predicate::str::contains("await delay(300);"))
        .stdout(predicate::str::contains(
            r#"const expectedOrigin = "https://example.com/tokens";"#,
        ))
        .stdout(predicate::str::contains("window.alreadyDownloaded = [];"));
}

#[test]
fn test_invalid_delay_value() {
    mapsync()
        .args(["generate-download-helper", "--delay-ms", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'soon'"));
}
