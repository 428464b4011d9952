//! Test harness for the label parser against fixture files.
//!
//! Every `test/pass/*.labels` file must parse, and its labels (one sorted
//! `key=value` line each) must match the neighbouring `.txt` file. Every
//! `test/fail/*.labels` file must fail with the message in its `.error`
//! file.

use std::fs;
use std::path::{Path, PathBuf};

use liblabels::{parse_labels, BuildResult};

/// Root test directory.
fn test_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// All `.labels` files in a subdirectory of `test/`, sorted.
fn fixtures(subdir: &str) -> Vec<PathBuf> {
    let pattern = test_root().join(subdir).join("*.labels");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .unwrap()
        .flatten()
        .collect();
    files.sort();
    files
}

/// Fixture input, without the newline that ends the file.
fn read_input(path: &Path) -> String {
    let content = fs::read_to_string(path).unwrap();
    match content.strip_suffix('\n') {
        Some(line) => line.to_string(),
        None => content,
    }
}

fn name_of(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().to_string()
}

/// Run a single passing fixture.
fn run_pass_test(path: &Path) -> Result<(), String> {
    let name = name_of(path);
    let input = read_input(path);
    let expected = fs::read_to_string(path.with_extension("txt"))
        .map_err(|e| format!("{}: missing .txt file: {}", name, e))?;

    match parse_labels(&input) {
        Ok(labels) => {
            let actual = BuildResult::from(labels).to_text();
            if actual == expected {
                println!("  {} => ok", name);
                Ok(())
            } else {
                Err(format!(
                    "{}: Label mismatch\n    expected: {:?}\n    actual:   {:?}",
                    name, expected, actual
                ))
            }
        }
        Err(e) => Err(format!("{}: Unexpected parse error: {}", name, e)),
    }
}

/// Run a single failing fixture.
fn run_fail_test(path: &Path) -> Result<(), String> {
    let name = name_of(path);
    let input = read_input(path);

    match parse_labels(&input) {
        Ok(labels) => Err(format!(
            "{}: Expected parse error, but got success: {:?}",
            name, labels
        )),
        Err(e) => {
            let actual = e.to_string();
            match fs::read_to_string(path.with_extension("error")) {
                Ok(expected) => {
                    let expected = expected.trim_end();
                    if actual == expected {
                        println!("  {} => error (as expected)", name);
                        Ok(())
                    } else {
                        Err(format!(
                            "{}: Error mismatch\n    expected: {:?}\n    actual:   {:?}",
                            name, expected, actual
                        ))
                    }
                }
                Err(_) => {
                    println!("  {} => error: {} (no .error file to compare)", name, actual);
                    Ok(())
                }
            }
        }
    }
}

fn run_all(subdir: &str, run: fn(&Path) -> Result<(), String>) {
    let files = fixtures(subdir);
    assert!(!files.is_empty(), "no fixtures found in test/{}", subdir);

    println!("\nRunning {} test/{} fixtures:", files.len(), subdir);

    let errors: Vec<String> = files.iter().filter_map(|f| run(f).err()).collect();

    println!(
        "\nResults: {} passed, {} failed",
        files.len() - errors.len(),
        errors.len()
    );

    if !errors.is_empty() {
        println!("\nErrors:");
        for error in &errors {
            println!("  - {}", error);
        }
    }

    assert!(errors.is_empty(), "{} {} fixtures failed", errors.len(), subdir);
}

#[test]
fn test_all_pass_fixtures() {
    run_all("pass", run_pass_test);
}

#[test]
fn test_all_fail_fixtures() {
    run_all("fail", run_fail_test);
}

#[test]
fn test_every_fixture_has_an_expectation() {
    for path in fixtures("pass") {
        assert!(path.with_extension("txt").exists(), "{}", path.display());
    }
    for path in fixtures("fail") {
        assert!(path.with_extension("error").exists(), "{}", path.display());
    }
}
