//! Integration tests for striper CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_striper"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Fresh scratch directory for one test.
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("striper-it-{}-{}", test, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

const RING_RECIPE: &str = r##"
name: ring
canvas: { width: 100, height: 100 }
layers:
  - name: ring
    outer: { kind: circle, center: { x: 50, y: 50 }, radius: 40 }
    inner: { kind: circle, center: { x: 50, y: 50 }, radius: 20 }
    spacing: 4
    styles:
      - { color: "#ff0000" }
      - { color: "#0000ff" }
"##;

const SQUARE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 50 50">
  <rect id="sq" x="5" y="5" width="40" height="40"/>
</svg>"#;

#[test]
fn help_lists_commands() {
    let output = run(&["help"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("render"));
    assert!(stderr.contains("fill"));
}

#[test]
fn unknown_command_fails() {
    let output = run(&["frobnicate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown command"));
}

#[test]
fn render_yaml_recipe_produces_svg() {
    let dir = scratch_dir("render-yaml");
    let recipe = dir.join("ring.yaml");
    fs::write(&recipe, RING_RECIPE).unwrap();

    let output = run(&["render", recipe.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<?xml"), "Should have XML declaration");
    assert!(stdout.contains("<line"), "Should have line elements");
    assert!(stdout.contains("#ff0000"));
    assert!(stdout.contains("#0000ff"));
    assert!(stdout.contains("</svg>"), "Should close SVG element");
}

#[test]
fn render_json_recipe_to_file() {
    let dir = scratch_dir("render-json");
    let recipe = dir.join("ring.json");
    fs::write(
        &recipe,
        r#"{
            "name": "json ring",
            "canvas": { "width": 100, "height": 100 },
            "layers": [{
                "name": "ring",
                "outer": { "kind": "circle", "center": { "x": 50, "y": 50 }, "radius": 40 },
                "spacing": 5,
                "angle": 90
            }]
        }"#,
    )
    .unwrap();
    let out = dir.join("ring-out.json");

    let output = run(&["render", recipe.to_str().unwrap(), "-f", "json", "-o", out.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("\"json ring\""));
    assert!(written.contains("\"x1\""));
    assert!(written.contains("\"exhausted\""));
}

#[test]
fn render_reads_polygons_from_svg_next_to_recipe() {
    let dir = scratch_dir("render-svg-source");
    fs::write(dir.join("square.svg"), SQUARE_SVG).unwrap();
    let recipe = dir.join("from-svg.yaml");
    fs::write(
        &recipe,
        "name: from svg\ncanvas: { width: 50, height: 50 }\nlayers:\n  - name: sq\n    outer: { svg: square.svg, id: sq }\n    spacing: 3\n",
    )
    .unwrap();

    let output = run(&["render", recipe.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("<line"));
}

#[test]
fn render_missing_recipe_fails() {
    let output = run(&["render", "/definitely/not/here.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
}

#[test]
fn render_invalid_shape_fails_with_layer_name() {
    let dir = scratch_dir("render-invalid");
    let recipe = dir.join("bad.yaml");
    fs::write(
        &recipe,
        "name: bad\ncanvas: { width: 10, height: 10 }\nlayers:\n  - name: flat\n    outer: { kind: circle, center: { x: 0, y: 0 }, radius: 0 }\n",
    )
    .unwrap();

    let output = run(&["render", recipe.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("layer 'flat'"));
}

#[test]
fn fill_command_produces_svg() {
    let dir = scratch_dir("fill-svg");
    let svg = dir.join("square.svg");
    fs::write(&svg, SQUARE_SVG).unwrap();

    let output = run(&["fill", svg.to_str().unwrap(), "-s", "2", "-a", "0"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("viewBox=\"0 0 50 50\""), "Should keep the source viewBox");
    assert!(stdout.contains("<line"), "Should have line elements");
}

#[test]
fn fill_command_produces_json() {
    let dir = scratch_dir("fill-json");
    let svg = dir.join("square.svg");
    fs::write(&svg, SQUARE_SVG).unwrap();

    let output = run(&["fill", svg.to_str().unwrap(), "--json", "--crosshatch"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"shapes\""));
    assert!(stdout.contains("\"id\": \"sq\""));
    assert!(stdout.contains("\"x1\""));
}

#[test]
fn fill_reads_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(env!("CARGO_BIN_EXE_striper"))
        .args(["fill", "-", "-s", "5"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn");
    child.stdin.take().unwrap().write_all(SQUARE_SVG.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("<line"));
}

#[test]
fn example_recipe_renders() {
    let dir = scratch_dir("example");
    let output = run(&["example"]);
    assert!(output.status.success());
    let recipe = dir.join("example.yaml");
    fs::write(&recipe, &output.stdout).unwrap();

    let output = run(&["render", recipe.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("<line"));
}
