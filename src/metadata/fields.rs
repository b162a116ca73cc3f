// src/metadata/fields.rs

//! Field tables for the historical metadata format versions, and the
//! negotiation logic that picks the best version for a given set of fields.

use crate::metadata::MetadataError;

/// A metadata format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataVersion {
    V1_0,
    V1_1,
    V1_2,
    V2_0,
}

/// Version written when field usage does not force a specific one.
pub const PREFERRED_VERSION: MetadataVersion = MetadataVersion::V1_1;

impl MetadataVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataVersion::V1_0 => "1.0",
            MetadataVersion::V1_1 => "1.1",
            MetadataVersion::V1_2 => "1.2",
            MetadataVersion::V2_0 => "2.0",
        }
    }

    pub fn parse(s: &str) -> Result<Self, MetadataError> {
        match s {
            "1.0" => Ok(MetadataVersion::V1_0),
            "1.1" => Ok(MetadataVersion::V1_1),
            "1.2" => Ok(MetadataVersion::V1_2),
            "2.0" => Ok(MetadataVersion::V2_0),
            other => Err(MetadataError::UnrecognizedVersion(other.to_string())),
        }
    }

    /// The full field list this version may carry, in canonical write order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            MetadataVersion::V1_0 => FIELDS_1_0,
            MetadataVersion::V1_1 => FIELDS_1_1,
            MetadataVersion::V1_2 => FIELDS_1_2,
            MetadataVersion::V2_0 => FIELDS_2_0,
        }
    }

    /// Fields that only exist in this version (or later within its line);
    /// their presence pins negotiation to it.
    fn markers(self) -> &'static [&'static str] {
        match self {
            MetadataVersion::V1_0 => &[],
            MetadataVersion::V1_1 => MARKERS_1_1,
            MetadataVersion::V1_2 => MARKERS_1_2,
            MetadataVersion::V2_0 => MARKERS_2_0,
        }
    }
}

impl std::fmt::Display for MetadataVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Metadata 1.0 (PEP 241).
const FIELDS_1_0: &[&str] = &[
    "Metadata-Version",
    "Name",
    "Version",
    "Platform",
    "Summary",
    "Description",
    "Keywords",
    "Home-page",
    "Author",
    "Author-email",
    "License",
];

// Metadata 1.1 (PEP 314).
const FIELDS_1_1: &[&str] = &[
    "Metadata-Version",
    "Name",
    "Version",
    "Platform",
    "Supported-Platform",
    "Summary",
    "Description",
    "Keywords",
    "Home-page",
    "Author",
    "Author-email",
    "License",
    "Classifier",
    "Download-URL",
    "Obsoletes",
    "Provides",
    "Requires",
];

const MARKERS_1_1: &[&str] = &[
    "Obsoletes",
    "Provides",
    "Requires",
    "Classifier",
    "Download-URL",
];

// Metadata 1.2 (PEP 345).
const FIELDS_1_2: &[&str] = &[
    "Metadata-Version",
    "Name",
    "Version",
    "Platform",
    "Supported-Platform",
    "Summary",
    "Description",
    "Keywords",
    "Home-page",
    "Author",
    "Author-email",
    "Maintainer",
    "Maintainer-email",
    "License",
    "Classifier",
    "Download-URL",
    "Obsoletes-Dist",
    "Project-URL",
    "Provides-Dist",
    "Requires-Dist",
    "Requires-Python",
    "Requires-External",
];

const MARKERS_1_2: &[&str] = &[
    "Provides-Dist",
    "Requires-Dist",
    "Requires-Python",
    "Obsoletes-Dist",
    "Requires-External",
    "Maintainer",
    "Maintainer-email",
    "Project-URL",
];

// Metadata 2.0 (PEP 426, experimental key/value rendering).
const FIELDS_2_0: &[&str] = &[
    "Metadata-Version",
    "Name",
    "Version",
    "Platform",
    "Supported-Platform",
    "Summary",
    "Description",
    "Keywords",
    "Home-page",
    "Author",
    "Author-email",
    "Maintainer",
    "Maintainer-email",
    "License",
    "Classifier",
    "Download-URL",
    "Obsoletes-Dist",
    "Project-URL",
    "Provides-Dist",
    "Requires-Dist",
    "Requires-Python",
    "Requires-External",
    "Private-Version",
    "Obsoleted-By",
    "Setup-Requires-Dist",
    "Extension",
    "Provides-Extra",
];

const MARKERS_2_0: &[&str] = &[
    "Private-Version",
    "Provides-Extra",
    "Obsoleted-By",
    "Setup-Requires-Dist",
    "Extension",
];

/// Fields that hold one value per line and may repeat.
const LIST_FIELDS: &[&str] = &[
    "Platform",
    "Classifier",
    "Obsoletes",
    "Requires",
    "Provides",
    "Obsoletes-Dist",
    "Provides-Dist",
    "Requires-Dist",
    "Requires-External",
    "Project-URL",
    "Supported-Platform",
    "Setup-Requires-Dist",
    "Provides-Extra",
    "Extension",
];

/// (attribute-style name, canonical field name) pairs, used to accept
/// `home_page` where `Home-page` is meant.
const ATTR_TO_FIELD: &[(&str, &str)] = &[
    ("metadata_version", "Metadata-Version"),
    ("name", "Name"),
    ("version", "Version"),
    ("platform", "Platform"),
    ("supported_platform", "Supported-Platform"),
    ("summary", "Summary"),
    ("description", "Description"),
    ("keywords", "Keywords"),
    ("home_page", "Home-page"),
    ("author", "Author"),
    ("author_email", "Author-email"),
    ("maintainer", "Maintainer"),
    ("maintainer_email", "Maintainer-email"),
    ("license", "License"),
    ("classifier", "Classifier"),
    ("download_url", "Download-URL"),
    ("obsoletes_dist", "Obsoletes-Dist"),
    ("provides_dist", "Provides-Dist"),
    ("requires_dist", "Requires-Dist"),
    ("setup_requires_dist", "Setup-Requires-Dist"),
    ("requires_python", "Requires-Python"),
    ("requires_external", "Requires-External"),
    ("requires", "Requires"),
    ("provides", "Provides"),
    ("obsoletes", "Obsoletes"),
    ("project_url", "Project-URL"),
    ("private_version", "Private-Version"),
    ("obsoleted_by", "Obsoleted-By"),
    ("extension", "Extension"),
    ("provides_extra", "Provides-Extra"),
];

pub fn is_known_field(name: &str) -> bool {
    FIELDS_2_0.contains(&name) || FIELDS_1_1.contains(&name) || FIELDS_1_0.contains(&name)
}

/// True for fields that hold a list of values.
pub fn is_list_field(name: &str) -> bool {
    LIST_FIELDS.contains(&name)
}

/// `Keywords` is a single comma-separated line that reads back as a list.
pub fn is_elements_field(name: &str) -> bool {
    name == "Keywords"
}

/// Map an arbitrary spelling (canonical, or `snake_case` attribute style)
/// to the canonical field name. Unknown names come back lowercased and
/// underscored, unchanged in meaning.
pub fn canonical_name(name: &str) -> String {
    if is_known_field(name) {
        return name.to_string();
    }
    let attr = name.replace('-', "_").to_lowercase();
    for (a, field) in ATTR_TO_FIELD {
        if *a == attr {
            return (*field).to_string();
        }
    }
    attr
}

/// Detect the best metadata version for the set of fields in use.
///
/// A version stays possible only while every used field belongs to it; when
/// several versions remain, a field specific to exactly one of them decides.
/// Mixing fields specific to different versions is a conflict, as is a field
/// set no version covers.
pub fn best_version<'a, I>(used: I) -> Result<MetadataVersion, MetadataError>
where
    I: IntoIterator<Item = &'a str>,
{
    use MetadataVersion::*;

    let keys: Vec<&str> = used.into_iter().collect();

    let mut possible = vec![V1_0, V1_1, V1_2, V2_0];
    for key in &keys {
        possible.retain(|v| v.fields().contains(key));
    }

    match possible.len() {
        0 => {
            return Err(MetadataError::Conflict(
                "fields do not fit any known metadata version".to_string(),
            ));
        }
        1 => return Ok(possible[0]),
        _ => {}
    }

    let pins: Vec<MetadataVersion> = [V1_1, V1_2, V2_0]
        .into_iter()
        .filter(|v| possible.contains(v) && keys.iter().any(|k| v.markers().contains(k)))
        .collect();

    if pins.len() > 1 {
        return Err(MetadataError::Conflict(
            "incompatible mix of 1.1/1.2/2.0 fields".to_string(),
        ));
    }
    if let Some(v) = pins.first() {
        return Ok(*v);
    }
    if possible.contains(&PREFERRED_VERSION) {
        return Ok(PREFERRED_VERSION);
    }
    Ok(V2_0)
}
