// src/export.rs

//! Export-entry parsing: the `name = prefix:suffix [flag1, flag2=value]`
//! strings packages use to declare scripts and plugin hooks.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("invalid export specification '{0}'")]
    Malformed(String),
}

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?P<name>(\w|[-.+])+)
        \s*=\s*(?P<callable>(\w+)([:.]\w+)*)
        \s*(\[\s*(?P<flags>\w+(=\w+)?(,\s*\w+(=\w+)?)*)\s*\])?
        ",
    )
    .expect("hardcoded regex")
});

/// A parsed export entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub name: String,
    /// Dotted path prefix (module-like part before the colon).
    pub prefix: String,
    /// Attribute path after the colon, when present.
    pub suffix: Option<String>,
    pub flags: Vec<String>,
}

impl ExportEntry {
    /// The full dotted path, prefix and suffix joined.
    pub fn dist_path(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}.{}", self.prefix, suffix),
            None => self.prefix.clone(),
        }
    }
}

/// Parse an export-entry specification.
///
/// Returns `Ok(None)` for strings that are not entries at all (no match);
/// strings that look like entries but are malformed — more than one colon
/// in the callable part, or bracket characters without a valid flag list —
/// fail with [`ExportError::Malformed`].
pub fn parse_export_entry(spec: &str) -> Result<Option<ExportEntry>, ExportError> {
    let caps = match ENTRY_RE.captures(spec) {
        Some(caps) => caps,
        None => return Ok(None),
    };

    let name = caps["name"].to_string();
    let path = &caps["callable"];

    let (prefix, suffix) = match path.matches(':').count() {
        0 => (path.to_string(), None),
        1 => {
            let (prefix, suffix) = path
                .split_once(':')
                .unwrap_or((path, ""));
            (prefix.to_string(), Some(suffix.to_string()))
        }
        _ => return Err(ExportError::Malformed(spec.to_string())),
    };

    let flags = match caps.name("flags") {
        Some(flags) => flags
            .as_str()
            .split(',')
            .map(|f| f.trim().to_string())
            .collect(),
        None => {
            if spec.contains('[') || spec.contains(']') {
                return Err(ExportError::Malformed(spec.to_string()));
            }
            Vec::new()
        }
    };

    Ok(Some(ExportEntry {
        name,
        prefix,
        suffix,
        flags,
    }))
}
