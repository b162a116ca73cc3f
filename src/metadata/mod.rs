// src/metadata/mod.rs

//! Package metadata across the historical format versions.
//!
//! - [`fields`] carries the per-version field tables and version
//!   negotiation.
//! - [`legacy`] implements the key/value (1.x) format.
//! - [`Metadata`] is the unified entry point: JSON (2.0) where possible,
//!   wrapping a [`LegacyMetadata`] otherwise.

pub mod fields;
pub mod legacy;

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::warn;

pub use fields::{MetadataVersion, best_version};
pub use legacy::{FieldValue, LegacyMetadata, UNKNOWN};

/// Errors raised while reading, validating or writing metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A required metadata item is missing.
    #[error("missing required metadata: {0}")]
    Missing(String),

    /// Fields from incompatible metadata versions are mixed.
    #[error("metadata version conflict: {0}")]
    Conflict(String),

    /// Unknown metadata version number.
    #[error("unrecognized metadata version '{0}'")]
    UnrecognizedVersion(String),

    /// A metadata value failed syntax validation.
    #[error("'{value}' is an invalid value for '{key}'")]
    Invalid { key: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// JSON metadata version this implementation writes.
pub const JSON_METADATA_VERSION: &str = "2.0";

/// Keys a JSON metadata mapping must carry.
const MANDATORY_KEYS: &[&str] = &["name", "version", "summary"];

/// Keys exported into an index record.
const INDEX_KEYS: &[&str] = &["name", "version", "license", "summary", "description"];

static METADATA_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("hardcoded regex"));
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Za-z]([0-9A-Za-z_.-]*[0-9A-Za-z])?$").expect("hardcoded regex")
});
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+)*((a|b|c|rc)\d+)?(\.post\d+)?(\.dev\d+)?$")
        .expect("hardcoded regex")
});
static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.{1,2047}$").expect("hardcoded regex"));

/// Light syntactic version check used for warnings; full version-scheme
/// matching is out of scope here.
pub(crate) fn looks_like_version(s: &str) -> bool {
    VERSION_RE.is_match(s)
}

fn validate_value(key: &str, value: &str) -> Result<(), MetadataError> {
    let pattern = match key {
        "metadata_version" => &METADATA_VERSION_RE,
        "name" => &NAME_RE,
        "version" => &VERSION_RE,
        "summary" => &SUMMARY_RE,
        _ => return Ok(()),
    };
    if !pattern.is_match(value) {
        return Err(MetadataError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum Repr {
    Json(Map<String, Value>),
    Legacy(LegacyMetadata),
}

/// The metadata of a release.
///
/// Uses the 2.0 (JSON) representation where possible; anything that is not
/// valid JSON is read as key/value legacy metadata instead.
#[derive(Debug, Clone)]
pub struct Metadata {
    repr: Repr,
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

impl Metadata {
    /// Fresh, empty 2.0 metadata.
    pub fn new() -> Self {
        let mut map = Map::new();
        map.insert(
            "metadata_version".to_string(),
            json!(JSON_METADATA_VERSION),
        );
        Self {
            repr: Repr::Json(map),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let data = fs::read_to_string(path)?;
        Self::from_text(&data)
    }

    /// Parse metadata from text.
    ///
    /// Valid JSON must be a 2.0 mapping and is validated as such; anything
    /// that does not parse as JSON falls back to the legacy format.
    pub fn from_text(data: &str) -> Result<Self, MetadataError> {
        match serde_json::from_str::<Value>(data) {
            Ok(Value::Object(map)) => {
                validate_mapping(&map)?;
                Ok(Self {
                    repr: Repr::Json(map),
                })
            }
            Ok(other) => Err(MetadataError::Invalid {
                key: "metadata".to_string(),
                value: other.to_string(),
            }),
            Err(_) => {
                let legacy = LegacyMetadata::from_text(data)?;
                let md = Self::from_legacy(legacy);
                md.validate_lenient();
                Ok(md)
            }
        }
    }

    /// Wrap existing legacy metadata.
    pub fn from_legacy(legacy: LegacyMetadata) -> Self {
        Self {
            repr: Repr::Legacy(legacy),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self.repr, Repr::Legacy(_))
    }

    pub fn metadata_version(&self) -> Option<String> {
        match &self.repr {
            Repr::Json(map) => map
                .get("metadata_version")
                .and_then(Value::as_str)
                .map(str::to_string),
            Repr::Legacy(legacy) => legacy.version().map(|v| v.as_str().to_string()),
        }
    }

    pub fn name(&self) -> Option<String> {
        self.get_common("name", "Name")
    }

    pub fn version(&self) -> Option<String> {
        self.get_common("version", "Version")
    }

    pub fn summary(&self) -> Option<String> {
        self.get_common("summary", "Summary")
    }

    fn get_common(&self, json_key: &str, legacy_field: &str) -> Option<String> {
        match &self.repr {
            Repr::Json(map) => map.get(json_key).and_then(Value::as_str).map(str::to_string),
            Repr::Legacy(legacy) => {
                if legacy.contains(legacy_field) {
                    Some(legacy.get_str(legacy_field))
                } else {
                    None
                }
            }
        }
    }

    /// Set one of the syntax-validated common keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), MetadataError> {
        validate_value(key, value)?;
        match &mut self.repr {
            Repr::Json(map) => {
                map.insert(key.to_string(), json!(value));
            }
            Repr::Legacy(legacy) => legacy.set_str(key, value),
        }
        Ok(())
    }

    /// `name-version`, filename-escaped.
    pub fn name_and_version(&self) -> String {
        match &self.repr {
            Repr::Legacy(legacy) => legacy.fullname(true),
            Repr::Json(_) => {
                let name = self.name().unwrap_or_else(|| UNKNOWN.to_string());
                let version = self.version().unwrap_or_else(|| UNKNOWN.to_string());
                let mut tmp = LegacyMetadata::new();
                tmp.set_str("Name", &name);
                tmp.set_str("Version", &version);
                tmp.fullname(true)
            }
        }
    }

    /// Requirements that always apply (`run_requires` / `Requires-Dist`).
    pub fn run_requires(&self) -> Vec<String> {
        match &self.repr {
            Repr::Json(map) => string_list(map.get("run_requires")),
            Repr::Legacy(legacy) => legacy.get_list("Requires-Dist"),
        }
    }

    /// Append run-time requirements.
    ///
    /// For 1.1 legacy metadata the old-style `Obsoletes`/`Requires`/
    /// `Provides` fields cannot coexist with `Requires-Dist`, so they are
    /// dropped first.
    pub fn add_requirements(&mut self, requirements: &[String]) {
        match &mut self.repr {
            Repr::Json(map) => {
                let entry = map
                    .entry("run_requires".to_string())
                    .or_insert_with(|| json!([]));
                if let Value::Array(items) = entry {
                    items.extend(requirements.iter().map(|r| json!(r)));
                }
            }
            Repr::Legacy(legacy) => {
                if legacy.version() == Some(MetadataVersion::V1_1) {
                    for field in ["Obsoletes", "Requires", "Provides"] {
                        legacy.remove(field);
                    }
                }
                let mut reqs = legacy.get_list("Requires-Dist");
                reqs.extend(requirements.iter().cloned());
                legacy.set_list("Requires-Dist", reqs);
            }
        }
    }

    /// Validate; JSON mappings strictly, legacy via `check(strict)`.
    pub fn validate(&mut self) -> Result<(), MetadataError> {
        match &mut self.repr {
            Repr::Json(map) => validate_mapping(map),
            Repr::Legacy(legacy) => {
                legacy.check(true)?;
                Ok(())
            }
        }
    }

    /// Lenient validation used on read: problems are logged, not raised.
    fn validate_lenient(&self) {
        if let Repr::Legacy(legacy) = &self.repr {
            let mut probe = legacy.clone();
            match probe.check(false) {
                Ok((missing, warnings)) => {
                    if !missing.is_empty() || !warnings.is_empty() {
                        warn!(?missing, ?warnings, "metadata incomplete");
                    }
                }
                Err(err) => warn!(%err, "metadata failed validation"),
            }
        }
    }

    /// The subset of keys an index would record about this release.
    pub fn index_record(&self) -> Map<String, Value> {
        let mut out = Map::new();
        match &self.repr {
            Repr::Json(map) => {
                for key in INDEX_KEYS {
                    if let Some(value) = map.get(*key) {
                        out.insert((*key).to_string(), value.clone());
                    }
                }
            }
            Repr::Legacy(legacy) => {
                for (key, field) in [
                    ("name", "Name"),
                    ("version", "Version"),
                    ("license", "License"),
                    ("summary", "Summary"),
                    ("description", "Description"),
                ] {
                    if legacy.contains(field) {
                        out.insert(key.to_string(), json!(legacy.get_str(field)));
                    }
                }
            }
        }
        out
    }

    /// Serialise; `legacy_format` selects key/value output, converting from
    /// JSON if needed, and vice versa.
    pub fn to_text(&self, legacy_format: bool) -> Result<String, MetadataError> {
        if legacy_format {
            let mut legacy = match &self.repr {
                Repr::Legacy(legacy) => legacy.clone(),
                Repr::Json(map) => to_legacy(map),
            };
            legacy.to_text(true)
        } else {
            let map = match &self.repr {
                Repr::Json(map) => map.clone(),
                Repr::Legacy(legacy) => from_legacy(legacy),
            };
            Ok(serde_json::to_string_pretty(&Value::Object(map))?)
        }
    }

    pub fn write_path(
        &self,
        path: impl AsRef<Path>,
        legacy_format: bool,
    ) -> Result<(), MetadataError> {
        let text = self.to_text(legacy_format)?;
        fs::write(path, text)?;
        Ok(())
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn validate_mapping(map: &Map<String, Value>) -> Result<(), MetadataError> {
    match map.get("metadata_version").and_then(Value::as_str) {
        Some(JSON_METADATA_VERSION) => {}
        Some(other) => return Err(MetadataError::UnrecognizedVersion(other.to_string())),
        None => return Err(MetadataError::UnrecognizedVersion("<absent>".to_string())),
    }
    let missing: Vec<&str> = MANDATORY_KEYS
        .iter()
        .copied()
        .filter(|key| !map.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(MetadataError::Missing(missing.join(", ")));
    }
    for (key, value) in map {
        if let Some(value) = value.as_str() {
            validate_value(key, value)?;
        }
    }
    Ok(())
}

/// Field pairs shared between the JSON and legacy renderings.
const LEGACY_MAPPING: &[(&str, &str)] = &[
    ("name", "Name"),
    ("version", "Version"),
    ("license", "License"),
    ("summary", "Summary"),
    ("description", "Description"),
];

fn from_legacy(legacy: &LegacyMetadata) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(
        "metadata_version".to_string(),
        json!(JSON_METADATA_VERSION),
    );
    for (json_key, field) in LEGACY_MAPPING {
        if legacy.contains(field) {
            map.insert((*json_key).to_string(), json!(legacy.get_str(field)));
        }
    }
    let classifiers = legacy.get_list("Classifier");
    if !classifiers.is_empty() {
        map.insert("classifiers".to_string(), json!(classifiers));
    }
    let keywords = legacy.get_list("Keywords");
    map.insert("keywords".to_string(), json!(keywords));
    map.insert("run_requires".to_string(), json!(legacy.get_list("Requires-Dist")));
    map.insert(
        "build_requires".to_string(),
        json!(legacy.get_list("Setup-Requires-Dist")),
    );

    let mut provides = legacy.get_list("Provides-Dist");
    let this = format!(
        "{} ({})",
        legacy.get_str("Name"),
        legacy.get_str("Version")
    );
    if !provides.contains(&this) {
        provides.push(this);
    }
    map.insert("provides".to_string(), json!(provides));
    map
}

fn to_legacy(map: &Map<String, Value>) -> LegacyMetadata {
    let mut legacy = LegacyMetadata::new();
    for (json_key, field) in LEGACY_MAPPING {
        if let Some(value) = map.get(*json_key).and_then(Value::as_str) {
            legacy.set_str(field, value);
        }
    }
    let classifiers = string_list(map.get("classifiers"));
    if !classifiers.is_empty() {
        legacy.set_list("Classifier", classifiers);
    }
    let keywords = string_list(map.get("keywords"));
    if !keywords.is_empty() {
        legacy.set_list("Keywords", keywords);
    }
    let run = string_list(map.get("run_requires"));
    if !run.is_empty() {
        legacy.set_list("Requires-Dist", run);
    }
    let build = string_list(map.get("build_requires"));
    if !build.is_empty() {
        legacy.set_list("Setup-Requires-Dist", build);
    }
    legacy
}
