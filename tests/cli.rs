#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn rkyv() -> Command {
    Command::cargo_bin("rkyv").unwrap()
}

#[test]
fn create_then_info() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, b"some notes\n").unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let output = rkyv()
        .arg("create")
        .arg(&input)
        .arg("--dir")
        .arg(&out)
        .args(["-t", "personal", "-s", "notes"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let name = stdout
        .trim()
        .strip_prefix("Created rkyv file: ")
        .expect("unexpected create output")
        .to_string();
    assert!(name.ends_with(".rkyv"));

    let container = out.join(&name);
    assert!(container.is_file());

    let output = rkyv().arg("info").arg(&container).output().unwrap();
    assert!(output.status.success());
    let info: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(format!("{}.rkyv", info["uuid"].as_str().unwrap()), name);
    assert_eq!(info["version"], "1.0");
    assert_eq!(info["files"][0]["name"], "notes.txt");
    assert_eq!(info["files"][0]["type"], "text/plain; charset=utf-8");
    assert_eq!(info["files"][0]["size"], 11);
    assert_eq!(info["tags"][0], "personal");
    assert_eq!(info["search"][0], "notes");
}

#[test]
fn create_rejects_directories() {
    let dir = tempdir().unwrap();
    rkyv()
        .arg("create")
        .arg(dir.path())
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("directories are not supported"));

    // nothing was written
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn create_requires_files() {
    rkyv()
        .arg("create")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input files specified"));
}

#[test]
fn info_rejects_foreign_files() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus.rkyv");
    fs::write(&bogus, b"PK\x03\x04 definitely not rkyv").unwrap();

    rkyv()
        .arg("info")
        .arg(&bogus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not an rkyv file"));
}

#[test]
fn info_missing_file() {
    rkyv()
        .args(["info", "does-not-exist.rkyv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not open file"));
}

#[test]
fn placeholders_fail() {
    for cmd in ["update", "extract", "list", "scan"] {
        rkyv()
            .arg(cmd)
            .assert()
            .failure()
            .stderr(predicate::str::contains("not implemented"));
    }
}
