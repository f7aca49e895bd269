//! End-to-end tests for the `mapconst` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const COLORS: &str = "package paint

type Color int

const (
\tRed Color = iota
\tGreen
\tBlue
)

const Unrelated = 3
";

fn mapconst(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mapconst"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("MAPCONST_CONFIG")
        .env_remove("MAPCONST_TAGS")
        .env_remove("MAPCONST_GOFMT")
        .env("NO_COLOR", "1")
        .output()
        .expect("run mapconst")
}

fn package(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).expect("write");
    }
    dir
}

#[test]
fn prints_mapping_to_stdout() {
    let dir = package(&[("colors.go", COLORS)]);
    let out = mapconst(dir.path(), &["-t", "Color", "-o", "stdout"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    assert_eq!(
        stdout,
        "// Code generated by \"mapconst -t Color -o stdout\"; DO NOT EDIT.

package paint

var ColorNameToValue = map[string]Color{
\t\"Red\":   Red,
\t\"Green\": Green,
\t\"Blue\":  Blue,
}
"
    );
    assert!(!dir.path().join("color_mapconst.go").exists());
}

#[test]
fn writes_default_file_in_package_dir() {
    let dir = package(&[("colors.go", COLORS)]);
    let out = mapconst(dir.path(), &["--type", "Color"]);

    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    let written = fs::read_to_string(dir.path().join("color_mapconst.go")).expect("output file");
    assert!(written.contains("var ColorNameToValue = map[string]Color{"));

    // A second run sees its own output in the package and produces the same bytes.
    let again = mapconst(dir.path(), &["--type", "Color"]);
    assert_eq!(again.status.code(), Some(0));
    let rewritten = fs::read_to_string(dir.path().join("color_mapconst.go")).expect("output file");
    assert_eq!(written, rewritten);
}

#[test]
fn explicit_output_path_and_file_inputs() {
    let dir = package(&[("colors.go", COLORS), ("notes.txt", "not go")]);
    let out = mapconst(
        dir.path(),
        &["-t", "Color", "-o", "gen.go", "colors.go", "notes.txt"],
    );

    assert_eq!(out.status.code(), Some(0));
    let written = fs::read_to_string(dir.path().join("gen.go")).expect("output file");
    assert!(written.contains("\t\"Blue\":  Blue,\n"));
}

#[test]
fn multiple_types_keep_request_order() {
    let dir = package(&[
        ("colors.go", COLORS),
        (
            "shapes.go",
            "package paint\n\ntype Shape int\n\nconst (\n\tCircle Shape = iota\n\tSquare\n)\n",
        ),
    ]);
    let out = mapconst(dir.path(), &["-t", "Shape,Color", "-o", "stdout"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    let shape = stdout.find("ShapeNameToValue").expect("shape mapping");
    let color = stdout.find("ColorNameToValue").expect("color mapping");
    assert!(shape < color);
}

#[test]
fn missing_type_is_a_usage_error() {
    let dir = package(&[("colors.go", COLORS)]);
    let out = mapconst(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn unknown_type_fails() {
    let dir = package(&[("colors.go", COLORS)]);
    let out = mapconst(dir.path(), &["-t", "Nope", "-o", "stdout"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no constant defined for type Nope"));
}

#[test]
fn syntax_error_fails() {
    let dir = package(&[("broken.go", "package paint\n\nconst ( A Color = \n")]);
    let out = mapconst(dir.path(), &["-t", "Color", "-o", "stdout"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("broken.go"));
}

#[test]
fn empty_directory_fails() {
    let dir = package(&[]);
    let out = mapconst(dir.path(), &["-t", "Color"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no buildable Go files"));
}

#[test]
fn config_file_supplies_defaults() {
    let dir = package(&[
        ("colors.go", COLORS),
        ("mapconst.json", r#"{"output": "stdout"}"#),
    ]);
    let out = mapconst(dir.path(), &["-t", "Color", "--config", "mapconst.json"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    assert!(stdout.contains("ColorNameToValue"));
}

#[test]
fn config_file_supplies_type_names() {
    let dir = package(&[
        ("colors.go", COLORS),
        ("mapconst.json", r#"{"type_names": ["Color"], "output": "stdout"}"#),
    ]);
    let out = mapconst(dir.path(), &["--config", "mapconst.json"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    assert!(stdout.contains("var ColorNameToValue = map[string]Color{"));
}

#[test]
fn type_flag_overrides_config_type_names() {
    let dir = package(&[
        ("colors.go", COLORS),
        ("mapconst.json", r#"{"type_names": ["Nope"], "output": "stdout"}"#),
    ]);
    let out = mapconst(dir.path(), &["-t", "Color", "--config", "mapconst.json"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    assert!(stdout.contains("ColorNameToValue"));
    assert!(!stdout.contains("Nope"));
}

#[test]
fn config_without_type_names_is_a_usage_error() {
    let dir = package(&[
        ("colors.go", COLORS),
        ("mapconst.json", r#"{"output": "stdout"}"#),
    ]);
    let out = mapconst(dir.path(), &["--config", "mapconst.json"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
}
