use std::error::Error;
use std::fs;

use tempfile::TempDir;

use distkit::pipeline::{
    build_sequencer, default_config_path, load_and_validate, load_from_path, terminal_steps,
};

type TestResult = Result<(), Box<dyn Error>>;

fn write_pipeline(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("Distkit.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_and_plans_a_pipeline() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_pipeline(
        &dir,
        r#"
[step.check]
description = "verify package metadata"

[step.register]
after = ["check"]

[step.sdist]
after = ["check"]

[step.upload_sdist]
after = ["register", "sdist"]
"#,
    );

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.step.len(), 4);
    assert_eq!(
        cfg.step["check"].description.as_deref(),
        Some("verify package metadata")
    );

    let seq = build_sequencer(&cfg);
    assert_eq!(
        seq.get_steps("upload_sdist")?,
        vec!["check", "register", "sdist", "upload_sdist"]
    );
    assert_eq!(terminal_steps(&seq), vec!["upload_sdist"]);
    Ok(())
}

#[test]
fn empty_pipeline_is_rejected() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_pipeline(&dir, "");
    let err = load_and_validate(&path).unwrap_err();
    assert!(err.to_string().contains("at least one"));
    Ok(())
}

#[test]
fn unknown_dependency_is_rejected() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_pipeline(
        &dir,
        r#"
[step.build]
after = ["missing"]
"#,
    );
    let err = load_and_validate(&path).unwrap_err();
    assert!(err.to_string().contains("unknown dependency"));
    Ok(())
}

#[test]
fn self_dependency_is_rejected() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_pipeline(
        &dir,
        r#"
[step.build]
after = ["build"]
"#,
    );
    let err = load_and_validate(&path).unwrap_err();
    assert!(err.to_string().contains("cannot depend on itself"));
    Ok(())
}

#[test]
fn cycles_are_tolerated_with_a_warning() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_pipeline(
        &dir,
        r#"
[step.a]
after = ["b"]

[step.b]
after = ["a"]
"#,
    );
    // Validation reports the cycle but does not fail; ordering still works.
    let cfg = load_and_validate(&path)?;
    let seq = build_sequencer(&cfg);
    assert!(!seq.is_acyclic());
    let plan = seq.get_steps("a")?;
    assert_eq!(plan.len(), 2);
    assert_eq!(plan.last().map(String::as_str), Some("a"));
    Ok(())
}

#[test]
fn malformed_toml_errors_with_context() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_pipeline(&dir, "[step.a\n");
    let err = load_from_path(&path).unwrap_err();
    assert!(err.to_string().contains("parsing TOML"));
    Ok(())
}

#[test]
fn the_default_path_matches_the_cli_default() {
    assert_eq!(default_config_path(), std::path::PathBuf::from("Distkit.toml"));
}

#[test]
fn missing_file_errors_with_context() {
    let err = load_from_path("/definitely/not/here/Distkit.toml").unwrap_err();
    assert!(err.to_string().contains("reading pipeline file"));
}
