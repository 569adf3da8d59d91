use std::fs;

use tempfile::tempdir;

use meridian_cli::{Args, run};

/// Run one source string through the full CLI pipeline and return the SVG.
fn run_source(source: &str) -> Result<String, String> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input_path = temp_dir.path().join("input.mer");
    let output_path = temp_dir.path().join("output.svg");
    fs::write(&input_path, source).expect("Failed to write input file");

    let args = Args {
        input: input_path.to_string_lossy().to_string(),
        output: output_path.to_string_lossy().to_string(),
        log_level: "off".to_string(),
    };

    run(&args).map_err(|e| e.to_string())?;
    fs::read_to_string(&output_path).map_err(|e| e.to_string())
}

#[test]
fn e2e_smoke_test_valid_source() {
    let source = r#"
        // Login round-trip
        actor user "User";
        component gateway "Gateway";
        component auth "Auth Service";

        -> gateway : "login" {
            -> auth : "check credentials" {
                -> * : "audit";
                return "token";
            };
            ~> user : "welcome email";
            return "session";
        };
    "#;

    let svg = run_source(source).expect("pipeline should succeed");

    // All three participant heads made it into the SVG
    assert!(svg.contains("User"));
    assert!(svg.contains("Gateway"));
    assert!(svg.contains("Auth Service"));
    // And the message labels
    assert!(svg.contains("login"));
    assert!(svg.contains("audit"));
}

#[test]
fn e2e_smoke_test_invalid_source_fails() {
    let err = run_source("-> nowhere;").expect_err("undeclared participant");
    assert!(err.contains("undeclared participant"));
}

#[test]
fn e2e_smoke_test_missing_input_file() {
    let args = Args {
        input: "/nonexistent/input.mer".to_string(),
        output: "/tmp/never-written.svg".to_string(),
        log_level: "off".to_string(),
    };

    assert!(run(&args).is_err());
}
