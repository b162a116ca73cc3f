// src/metadata/legacy.rs

//! Key/value ("PKG-INFO" style) metadata: the 1.x format line of
//! `Key: value` headers, with repeated keys for list-valued fields and
//! folded continuation lines for the description.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::metadata::MetadataError;
use crate::metadata::fields::{
    MetadataVersion, best_version, canonical_name, is_elements_field, is_list_field,
};

/// Placeholder the format historically uses for absent scalar fields.
pub const UNKNOWN: &str = "UNKNOWN";

/// Continuation prefix used when folding multi-line description values.
const FOLD_PREFIX: &str = "\n       |";

static LINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n       \|").expect("hardcoded regex"));
static FILESAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.]+").expect("hardcoded regex"));

/// A single metadata field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Str(String),
    List(Vec<String>),
}

/// Legacy metadata of a release: versions 1.0, 1.1 and 1.2 (and the
/// key/value rendering of 2.0), auto-negotiated from the fields in use.
#[derive(Debug, Clone, Default)]
pub struct LegacyMetadata {
    fields: BTreeMap<String, FieldValue>,
}

impl LegacyMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read metadata from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    /// Parse metadata from `Key: value` header text.
    ///
    /// Repeated keys accumulate for list-valued fields; lines starting with
    /// whitespace continue the previous value; anything after the first
    /// blank line becomes the description when none was given in a header.
    pub fn from_text(text: &str) -> Result<Self, MetadataError> {
        let mut md = Self::new();
        let mut pending: Option<(String, String)> = None;
        let mut lines = text.lines();

        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }
            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some((_, value)) = pending.as_mut() {
                    value.push('\n');
                    value.push_str(line);
                }
                continue;
            }
            if let Some((name, value)) = pending.take() {
                md.insert_raw(&name, value);
            }
            match line.split_once(':') {
                Some((name, value)) => {
                    pending = Some((name.trim().to_string(), value.trim_start().to_string()));
                }
                None => {
                    return Err(MetadataError::Invalid {
                        key: "header".to_string(),
                        value: line.to_string(),
                    });
                }
            }
        }
        if let Some((name, value)) = pending.take() {
            md.insert_raw(&name, value);
        }

        let body = lines.collect::<Vec<_>>().join("\n");
        let body = body.trim_matches('\n');
        if !body.is_empty() && !md.contains("Description") {
            md.set_str("Description", body);
        }

        md.set_metadata_version()?;
        Ok(md)
    }

    /// Fold a repeated or scalar header into the field map.
    fn insert_raw(&mut self, name: &str, value: String) {
        let field = canonical_name(name);
        if value == UNKNOWN && !is_list_field(&field) {
            return;
        }
        if is_list_field(&field) {
            match self.fields.get_mut(&field) {
                Some(FieldValue::List(items)) => items.push(value),
                _ => {
                    self.fields.insert(field, FieldValue::List(vec![value]));
                }
            }
        } else {
            self.set_str(&field, &value);
        }
    }

    /// Set a scalar field. List-valued fields given a scalar become a
    /// single-element list; `Keywords` and `Platform` split on commas.
    pub fn set_str(&mut self, name: &str, value: &str) {
        let field = canonical_name(name);
        if is_elements_field(&field) || field == "Platform" {
            let items = value
                .split(',')
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect();
            self.fields.insert(field, FieldValue::List(items));
        } else if is_list_field(&field) {
            self.fields
                .insert(field, FieldValue::List(vec![value.to_string()]));
        } else {
            let value = if field == "Description" {
                LINE_PREFIX.replace_all(value, "\n").into_owned()
            } else {
                value.to_string()
            };
            self.fields.insert(field, FieldValue::Str(value));
        }
    }

    /// Set a list field wholesale.
    pub fn set_list(&mut self, name: &str, values: Vec<String>) {
        let field = canonical_name(name);
        self.fields.insert(field, FieldValue::List(values));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(&canonical_name(name))
    }

    /// Scalar accessor with the format's traditional `UNKNOWN` default.
    pub fn get_str(&self, name: &str) -> String {
        match self.get(name) {
            Some(FieldValue::Str(s)) => s.clone(),
            Some(FieldValue::List(items)) => items.join(","),
            None => UNKNOWN.to_string(),
        }
    }

    /// List accessor; scalar values come back as a single element, absent
    /// fields as an empty list.
    pub fn get_list(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(FieldValue::List(items)) => items.clone(),
            Some(FieldValue::Str(s)) => vec![s.clone()],
            None => Vec::new(),
        }
    }

    /// `Project-URL` entries as (label, url) pairs.
    pub fn project_urls(&self) -> Vec<(String, String)> {
        self.get_list("Project-URL")
            .into_iter()
            .map(|entry| match entry.split_once(',') {
                Some((label, url)) => (label.trim().to_string(), url.trim().to_string()),
                None => (entry.trim().to_string(), String::new()),
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&canonical_name(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(&canonical_name(name))
    }

    /// Field names currently set, excluding empty lists.
    fn used_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, v)| match v {
                FieldValue::Str(s) => !s.is_empty() && s != UNKNOWN,
                FieldValue::List(items) => !items.is_empty(),
            })
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Negotiate and record `Metadata-Version` from the fields in use.
    pub fn set_metadata_version(&mut self) -> Result<MetadataVersion, MetadataError> {
        let version = best_version(self.used_fields())?;
        self.fields.insert(
            "Metadata-Version".to_string(),
            FieldValue::Str(version.as_str().to_string()),
        );
        Ok(version)
    }

    /// The currently recorded metadata version, if any.
    pub fn version(&self) -> Option<MetadataVersion> {
        match self.fields.get("Metadata-Version") {
            Some(FieldValue::Str(s)) => MetadataVersion::parse(s).ok(),
            _ => None,
        }
    }

    /// Serialise as `Key: value` header text for the negotiated version.
    ///
    /// With `skip_unknown`, absent scalar fields and empty lists are left
    /// out instead of being written as `UNKNOWN`.
    pub fn to_text(&mut self, skip_unknown: bool) -> Result<String, MetadataError> {
        let version = self.set_metadata_version()?;
        let mut out = String::new();

        for field in version.fields() {
            let present = self.contains(field);
            if skip_unknown && !present {
                continue;
            }
            if is_elements_field(field) {
                let items = self.get_list(field);
                if skip_unknown && items.is_empty() {
                    continue;
                }
                out.push_str(&format!("{field}: {}\n", items.join(",")));
            } else if is_list_field(field) {
                let items = self.get_list(field);
                if skip_unknown && items.is_empty() {
                    continue;
                }
                for item in items {
                    out.push_str(&format!("{field}: {item}\n"));
                }
            } else {
                let mut value = self.get_str(field);
                if field == &"Description" {
                    value = value.replace('\n', FOLD_PREFIX);
                }
                out.push_str(&format!("{field}: {value}\n"));
            }
        }
        Ok(out)
    }

    /// Write the metadata fields to a file path.
    pub fn write_path(
        &mut self,
        path: impl AsRef<Path>,
        skip_unknown: bool,
    ) -> Result<(), MetadataError> {
        let text = self.to_text(skip_unknown)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Check compliance.
    ///
    /// Returns (missing, warnings): `Name` and `Version` are required,
    /// `Home-page` and `Author` recommended. With `strict`, missing required
    /// fields become a [`MetadataError::Missing`] instead.
    pub fn check(&mut self, strict: bool) -> Result<(Vec<String>, Vec<String>), MetadataError> {
        self.set_metadata_version()?;

        let mut missing = Vec::new();
        let mut warnings = Vec::new();

        for field in ["Name", "Version"] {
            if !self.contains(field) {
                missing.push(field.to_string());
            }
        }
        if strict && !missing.is_empty() {
            return Err(MetadataError::Missing(missing.join(", ")));
        }
        for field in ["Home-page", "Author"] {
            if !self.contains(field) {
                missing.push(field.to_string());
            }
        }

        if self.contains("Version") {
            let version = self.get_str("Version");
            if !crate::metadata::looks_like_version(&version) {
                warnings.push(format!("wrong value for 'Version': {version}"));
            }
        }

        Ok((missing, warnings))
    }

    /// The distribution name with version, optionally filename-escaped
    /// (runs of non-alphanumeric characters collapse to `-`, spaces in the
    /// version become `.`).
    pub fn fullname(&self, filesafe: bool) -> String {
        let name = self.get_str("Name");
        let version = self.get_str("Version");
        if filesafe {
            let name = FILESAFE.replace_all(&name, "-");
            let version = version.replace(' ', ".");
            let version = FILESAFE.replace_all(&version, "-");
            format!("{name}-{version}")
        } else {
            format!("{name}-{version}")
        }
    }
}
