use distkit::metadata::{LegacyMetadata, Metadata, MetadataError};
use tempfile::TempDir;

fn sample_json() -> String {
    serde_json::json!({
        "metadata_version": "2.0",
        "name": "demo",
        "version": "1.0",
        "summary": "a demo package"
    })
    .to_string()
}

#[test]
fn fresh_metadata_is_json_with_the_current_version() {
    let md = Metadata::new();
    assert!(!md.is_legacy());
    assert_eq!(md.metadata_version().as_deref(), Some("2.0"));
}

#[test]
fn fresh_metadata_is_incomplete_until_the_mandatory_keys_are_set() {
    let mut md = Metadata::new();
    assert!(matches!(md.validate(), Err(MetadataError::Missing(_))));

    md.set("name", "demo").unwrap();
    md.set("version", "1.0").unwrap();
    md.set("summary", "a demo package").unwrap();
    md.validate().unwrap();
    assert_eq!(md.name_and_version(), "demo-1.0");
}

#[test]
fn set_rejects_syntactically_invalid_values() {
    let mut md = Metadata::new();
    let err = md.set("name", "-leading-dash").unwrap_err();
    assert!(matches!(err, MetadataError::Invalid { ref key, .. } if key == "name"));

    let err = md.set("version", "one point oh").unwrap_err();
    assert!(matches!(err, MetadataError::Invalid { ref key, .. } if key == "version"));
}

#[test]
fn parses_a_json_mapping() {
    let md = Metadata::from_text(&sample_json()).unwrap();
    assert!(!md.is_legacy());
    assert_eq!(md.name().as_deref(), Some("demo"));
    assert_eq!(md.version().as_deref(), Some("1.0"));
    assert_eq!(md.summary().as_deref(), Some("a demo package"));
}

#[test]
fn rejects_a_json_mapping_with_the_wrong_version() {
    let text = serde_json::json!({
        "metadata_version": "3.0",
        "name": "demo",
        "version": "1.0",
        "summary": "a demo package"
    })
    .to_string();
    assert!(matches!(
        Metadata::from_text(&text),
        Err(MetadataError::UnrecognizedVersion(_))
    ));
}

#[test]
fn rejects_json_that_is_not_a_mapping() {
    assert!(matches!(
        Metadata::from_text("[1, 2, 3]"),
        Err(MetadataError::Invalid { .. })
    ));
}

#[test]
fn falls_back_to_the_legacy_format() {
    let text = "Metadata-Version: 1.1\nName: demo\nVersion: 1.0\nSummary: a demo package\n";
    let md = Metadata::from_text(text).unwrap();
    assert!(md.is_legacy());
    assert_eq!(md.name().as_deref(), Some("demo"));
    assert_eq!(md.metadata_version().as_deref(), Some("1.1"));
}

#[test]
fn add_requirements_extends_run_requires() {
    let mut md = Metadata::from_text(&sample_json()).unwrap();
    assert!(md.run_requires().is_empty());
    md.add_requirements(&["requests".to_string(), "urllib3".to_string()]);
    md.add_requirements(&["idna".to_string()]);
    assert_eq!(md.run_requires(), vec!["requests", "urllib3", "idna"]);
}

#[test]
fn add_requirements_drops_old_style_fields_from_1_1_metadata() {
    let text = "Name: demo\nVersion: 1.0\nRequires: old-style\n";
    let mut md = Metadata::from_text(text).unwrap();
    assert_eq!(md.metadata_version().as_deref(), Some("1.1"));

    md.add_requirements(&["requests".to_string()]);
    assert_eq!(md.run_requires(), vec!["requests"]);
    // Re-rendering must not mix Requires with Requires-Dist.
    let rendered = md.to_text(true).unwrap();
    assert!(rendered.contains("Requires-Dist: requests"));
    assert!(!rendered.contains("Requires: old-style"));
}

#[test]
fn converts_legacy_to_json() {
    let mut legacy = LegacyMetadata::new();
    legacy.set_str("Name", "demo");
    legacy.set_str("Version", "1.0");
    legacy.set_str("Summary", "a demo package");
    legacy.set_metadata_version().unwrap();

    let md = Metadata::from_legacy(legacy);
    let text = md.to_text(false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["metadata_version"], "2.0");
    assert_eq!(value["name"], "demo");
    let provides = value["provides"].as_array().unwrap();
    assert!(provides.contains(&serde_json::json!("demo (1.0)")));
}

#[test]
fn converts_json_to_legacy() {
    let md = Metadata::from_text(&sample_json()).unwrap();
    let text = md.to_text(true).unwrap();
    assert!(text.contains("Name: demo\n"));
    assert!(text.contains("Version: 1.0\n"));
    assert!(text.contains("Summary: a demo package\n"));
}

#[test]
fn index_record_carries_the_index_keys_only() {
    let mut md = Metadata::from_text(&sample_json()).unwrap();
    md.add_requirements(&["requests".to_string()]);
    let record = md.index_record();
    assert_eq!(record.get("name"), Some(&serde_json::json!("demo")));
    assert_eq!(record.get("summary"), Some(&serde_json::json!("a demo package")));
    assert!(!record.contains_key("run_requires"));
}

#[test]
fn round_trips_through_a_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metadata.json");

    let md = Metadata::from_text(&sample_json()).unwrap();
    md.write_path(&path, false).unwrap();

    let back = Metadata::from_path(&path).unwrap();
    assert!(!back.is_legacy());
    assert_eq!(back.name().as_deref(), Some("demo"));
    assert_eq!(back.version().as_deref(), Some("1.0"));
}
