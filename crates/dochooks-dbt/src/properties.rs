//! YAML properties files (`macros:` and `sources:` declarations)
//!
//! Reading is best-effort. A file that cannot be read or parsed, or that
//! declares nothing we look for, contributes no schemas; the problem is
//! logged and the other files are still processed. Within a file, a
//! top-level key that is not a list is treated as empty without hiding
//! the other key, and scalar names and descriptions are read as text.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// Top-level keys of a properties file that the checks consume
///
/// Entries are kept as raw YAML so one malformed entry does not hide
/// its siblings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertiesFile {
    #[serde(default, deserialize_with = "lenient_sequence")]
    pub macros: Vec<Value>,

    #[serde(default, deserialize_with = "lenient_sequence")]
    pub sources: Vec<Value>,
}

impl PropertiesFile {
    /// Load and parse a properties file
    pub fn from_file(path: &Path) -> Result<Self, SchemaFileError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SchemaFileError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_yaml(&contents)
            .map_err(|e| SchemaFileError::ParseError(path.display().to_string(), e.to_string()))
    }

    /// Parse properties YAML; an empty or non-mapping document declares nothing
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        match serde_yaml::from_str::<Value>(yaml)? {
            value @ Value::Mapping(_) => serde_yaml::from_value(value),
            _ => Ok(Self::default()),
        }
    }

    /// Declared macros that carry a name
    pub fn macro_entries(&self) -> impl Iterator<Item = MacroProperties> + '_ {
        self.macros
            .iter()
            .filter_map(|v| serde_yaml::from_value::<MacroProperties>(v.clone()).ok())
            .filter(|m| m.name.is_some())
    }

    /// Declared sources
    pub fn source_entries(&self) -> impl Iterator<Item = SourceProperties> + '_ {
        self.sources
            .iter()
            .filter_map(|v| serde_yaml::from_value::<SourceProperties>(v.clone()).ok())
    }
}

/// One entry of a `macros:` list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MacroProperties {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub description: Option<String>,
}

/// One entry of a `sources:` list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SourceProperties {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_sequence")]
    pub tables: Vec<Value>,
}

/// One entry of a source's `tables:` list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TableProperties {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub description: Option<String>,
}

/// A macro declaration found in a properties file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroSchema {
    pub macro_name: String,
    pub description: Option<String>,
    pub file: String,
}

/// A source table declaration found in a properties file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSchema {
    pub source_name: String,
    pub table_name: String,
    pub description: Option<String>,
    pub file: String,
}

/// Macro declarations whose name is one of `filenames`
pub fn get_macro_schemas<P: AsRef<Path>>(yml_paths: &[P], filenames: &BTreeSet<String>) -> Vec<MacroSchema> {
    let mut schemas = Vec::new();

    for path in yml_paths {
        let path = AsRef::<Path>::as_ref(path);
        let Some(properties) = load_best_effort(path) else {
            continue;
        };

        for entry in properties.macro_entries() {
            let Some(name) = entry.name else { continue };
            if filenames.contains(&name) {
                schemas.push(MacroSchema {
                    macro_name: name,
                    description: entry.description,
                    file: path.display().to_string(),
                });
            }
        }
    }

    schemas
}

/// Every table of every declared source, flattened
pub fn get_source_schemas<P: AsRef<Path>>(yml_paths: &[P]) -> Vec<SourceSchema> {
    let mut schemas = Vec::new();

    for path in yml_paths {
        let path = AsRef::<Path>::as_ref(path);
        let Some(properties) = load_best_effort(path) else {
            continue;
        };

        for source in properties.source_entries() {
            let source_name = source.name.unwrap_or_default();

            for table in &source.tables {
                let Ok(table) = serde_yaml::from_value::<TableProperties>(table.clone()) else {
                    tracing::debug!(file = %path.display(), source = %source_name, "skipping malformed table entry");
                    continue;
                };

                schemas.push(SourceSchema {
                    source_name: source_name.clone(),
                    table_name: table.name.unwrap_or_default(),
                    description: table.description,
                    file: path.display().to_string(),
                });
            }
        }
    }

    schemas
}

fn load_best_effort(path: &Path) -> Option<PropertiesFile> {
    match PropertiesFile::from_file(path) {
        Ok(properties) => Some(properties),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

/// Any list; anything else reads as empty
fn lenient_sequence<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Sequence(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

/// Strings, numbers and booleans as text; null and collections as absent
fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Properties file errors (logged, never fatal)
#[derive(Debug, thiserror::Error)]
pub enum SchemaFileError {
    #[error("Failed to read properties file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse properties file {0}: {1}")]
    ParseError(String, String),
}
