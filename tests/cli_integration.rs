/*!
 * Integration tests driving the compiled fconcat binary
 */

use std::fs::{self, File};
use std::io::Write;
use std::process::Command;

use tempfile::tempdir;

fn fconcat() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fconcat"))
}

#[test]
fn test_end_to_end_run() {
    let temp_dir = tempdir().unwrap();
    let mut file = File::create(temp_dir.path().join("a.txt")).unwrap();
    writeln!(file, "hello from a").unwrap();
    fs::create_dir(temp_dir.path().join("sub")).unwrap();
    fs::write(temp_dir.path().join("sub").join("b.txt"), "nested").unwrap();

    let output_file = temp_dir.path().join("out.txt");
    let status = fconcat()
        .args([
            temp_dir.path().to_str().unwrap(),
            output_file.to_str().unwrap(),
            "--show-size",
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let body = fs::read_to_string(&output_file).unwrap();
    assert!(body.contains("Directory Structure:"));
    assert!(body.contains("📁 sub/"));
    assert!(body.contains("// File: a.txt"));
    assert!(body.contains("// File: sub/b.txt"));
    assert!(body.contains("Total Size:"));
    // the output file must not concatenate itself
    assert!(!body.contains("// File: out.txt"));
}

#[test]
fn test_exclude_flag() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("keep.txt"), "keep").unwrap();
    fs::write(temp_dir.path().join("drop.log"), "drop").unwrap();

    let output_file = temp_dir.path().join("out.txt");
    let status = fconcat()
        .args([
            temp_dir.path().to_str().unwrap(),
            output_file.to_str().unwrap(),
            "--exclude",
            "*.log",
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let body = fs::read_to_string(&output_file).unwrap();
    assert!(body.contains("keep.txt"));
    assert!(!body.contains("drop.log"));
}

#[test]
fn test_plugin_flag() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "ab\ncd").unwrap();

    let output_file = temp_dir.path().join("out.txt");
    let status = fconcat()
        .args([
            temp_dir.path().to_str().unwrap(),
            output_file.to_str().unwrap(),
            "--plugin",
            "upcase",
            "--plugin",
            "prefix=> ",
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let body = fs::read_to_string(&output_file).unwrap();
    assert!(body.contains("// File: a.txt\n> AB\n> CD\n\n"));
}

#[test]
fn test_missing_arguments_fail() {
    let status = fconcat().status().unwrap();
    assert!(!status.success());
}

#[test]
fn test_unknown_symlink_mode_fails() {
    let temp_dir = tempdir().unwrap();
    let status = fconcat()
        .args([
            temp_dir.path().to_str().unwrap(),
            temp_dir.path().join("out.txt").to_str().unwrap(),
            "--symlinks",
            "bogus",
        ])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn test_unknown_plugin_fails() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "hi").unwrap();
    let status = fconcat()
        .args([
            temp_dir.path().to_str().unwrap(),
            temp_dir.path().join("out.txt").to_str().unwrap(),
            "--plugin",
            "nosuch",
        ])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn test_missing_input_directory_fails() {
    let temp_dir = tempdir().unwrap();
    let status = fconcat()
        .args([
            temp_dir.path().join("absent").to_str().unwrap(),
            temp_dir.path().join("out.txt").to_str().unwrap(),
        ])
        .status()
        .unwrap();
    assert!(!status.success());
}
