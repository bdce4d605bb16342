//! dbt manifest.json parsing and record selection
//!
//! Only `macros` and `nodes` are required top-level keys; every node
//! attribute is optional and defaults when absent.

use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::paths::{file_stem, get_filenames, normalize_path};

/// dbt manifest.json structure (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Manifest {
    /// Metadata about the manifest
    #[serde(default)]
    pub metadata: Option<ManifestMetadata>,

    /// Macro definitions
    pub macros: BTreeMap<String, MacroNode>,

    /// Model, test, seed and snapshot nodes
    pub nodes: BTreeMap<String, ManifestNode>,

    /// Source table definitions
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: BTreeMap<String, ManifestSource>,
}

impl Manifest {
    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse manifest from JSON string
    pub fn from_str(json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json)
            .map_err(|e| ManifestError::ParseError(e.to_string()))
    }

    /// Get all model nodes (filters out tests, seeds, etc.)
    pub fn models(&self) -> impl Iterator<Item = (&String, &ManifestNode)> {
        self.nodes.iter().filter(|(_, node)| node.is_model())
    }

    /// Get a specific node by unique_id
    pub fn get_node(&self, unique_id: &str) -> Option<&ManifestNode> {
        self.nodes.get(unique_id)
    }

    /// Get a specific macro by unique_id
    pub fn get_macro(&self, unique_id: &str) -> Option<&MacroNode> {
        self.macros.get(unique_id)
    }

    /// Normalized file paths of every macro
    pub fn macro_paths(&self) -> BTreeSet<String> {
        self.macros
            .values()
            .filter_map(|m| m.file_path())
            .collect()
    }
}

/// Manifest metadata
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default)]
    pub dbt_schema_version: Option<String>,
    #[serde(default)]
    pub dbt_version: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

/// A macro in the manifest
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MacroNode {
    /// Macro name (e.g., "cents_to_dollars")
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub package_name: String,

    /// Path relative to the macro directory
    #[serde(default)]
    pub path: Option<String>,

    /// Path relative to the project root
    #[serde(default)]
    pub original_file_path: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl MacroNode {
    /// Normalized file path, preferring `original_file_path`
    pub fn file_path(&self) -> Option<String> {
        resolve_file_path(self.original_file_path.as_deref(), self.path.as_deref())
    }
}

/// A node in the manifest (model, test, snapshot, etc.)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ManifestNode {
    /// Node name (e.g., "users")
    #[serde(default)]
    pub name: String,

    /// Resource type (model, test, snapshot, etc.)
    #[serde(default)]
    pub resource_type: String,

    #[serde(default)]
    pub package_name: String,

    /// Path relative to the model directory
    #[serde(default)]
    pub path: Option<String>,

    /// Path relative to the project root
    #[serde(default)]
    pub original_file_path: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub config: NodeConfig,

    #[serde(default)]
    pub description: Option<String>,

    /// Column definitions keyed by column name
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: BTreeMap<String, ColumnDefinition>,
}

impl ManifestNode {
    pub fn is_model(&self) -> bool {
        self.resource_type == "model"
    }

    pub fn is_ephemeral(&self) -> bool {
        self.config.materialized.as_deref() == Some("ephemeral")
    }

    /// Normalized file path, preferring `original_file_path`
    pub fn file_path(&self) -> Option<String> {
        resolve_file_path(self.original_file_path.as_deref(), self.path.as_deref())
    }
}

/// Node configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NodeConfig {
    /// Materialization type
    #[serde(default)]
    pub materialized: Option<String>,
}

/// Column definition from manifest
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ColumnDefinition {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

impl ColumnDefinition {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A source table in the manifest
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ManifestSource {
    /// Source name (e.g., "raw")
    #[serde(default)]
    pub source_name: String,

    /// Table name (e.g., "users")
    #[serde(default)]
    pub name: String,

    /// Properties file declaring the source
    #[serde(default)]
    pub original_file_path: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// A macro selected for a changed file
#[derive(Debug, Clone, PartialEq)]
pub struct MacroRecord<'a> {
    pub key: &'a str,
    pub file_path: String,
    /// File stem the macro was matched on
    pub filename: String,
    pub node: &'a MacroNode,
}

/// A model selected for a changed file
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRecord<'a> {
    pub key: &'a str,
    pub model_name: String,
    pub file_path: String,
    pub node: &'a ManifestNode,
}

/// A source table selected for a changed properties file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord<'a> {
    pub key: &'a str,
    pub file_path: String,
    pub node: &'a ManifestSource,
}

/// Normalized relative file path -> node key, over macros and nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilenameIndex {
    entries: BTreeMap<String, String>,
}

impl FilenameIndex {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let nodes = manifest
            .nodes
            .iter()
            .filter_map(|(key, node)| Some((node.file_path()?, key.clone())));
        let macros = manifest
            .macros
            .iter()
            .filter_map(|(key, node)| Some((node.file_path()?, key.clone())));

        // First node wins when several nodes share a file
        let mut entries = BTreeMap::new();
        for (path, key) in nodes.chain(macros) {
            entries.entry(path).or_insert(key);
        }

        Self { entries }
    }

    /// Node key for a path (normalized before lookup)
    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.entries.get(&normalize_path(path)).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

}

/// Macros whose file stem is one of `filenames`
pub fn get_macros<'a>(manifest: &'a Manifest, filenames: &BTreeSet<String>) -> Vec<MacroRecord<'a>> {
    manifest
        .macros
        .iter()
        .filter_map(|(key, node)| {
            let file_path = node.file_path()?;
            let filename = file_stem(&file_path);
            filenames.contains(&filename).then(|| MacroRecord {
                key: key.as_str(),
                file_path,
                filename,
                node,
            })
        })
        .collect()
}

/// Models whose file stem is one of `filenames`
pub fn get_models<'a>(
    manifest: &'a Manifest,
    filenames: &BTreeSet<String>,
    include_ephemeral: bool,
) -> Vec<ModelRecord<'a>> {
    manifest
        .models()
        .filter(|(_, node)| include_ephemeral || !node.is_ephemeral())
        .filter_map(|(key, node)| {
            let file_path = node.file_path()?;
            if !filenames.contains(&file_stem(&file_path)) {
                return None;
            }

            let model_name = if node.name.is_empty() {
                key.rsplit('.').next().unwrap_or(key).to_string()
            } else {
                node.name.clone()
            };

            Some(ModelRecord {
                key: key.as_str(),
                model_name,
                file_path,
                node,
            })
        })
        .collect()
}

/// Source tables declared in one of `yml_paths`
pub fn get_sources<'a, P: AsRef<str>>(manifest: &'a Manifest, yml_paths: &[P]) -> Vec<SourceRecord<'a>> {
    let wanted: BTreeSet<String> = yml_paths
        .iter()
        .map(|p| normalize_path(AsRef::<str>::as_ref(p)))
        .collect();

    manifest
        .sources
        .iter()
        .filter_map(|(key, node)| {
            let file_path = normalize_path(node.original_file_path.as_deref()?);
            wanted.contains(&file_path).then_some(SourceRecord {
                key: key.as_str(),
                file_path,
                node,
            })
        })
        .collect()
}

/// Changed `.sql` files that define macros, keyed by file stem
///
/// Paths the manifest does not know are skipped.
pub fn get_macro_sqls<P: AsRef<str>>(paths: &[P], manifest: &Manifest) -> BTreeMap<String, String> {
    let macro_paths = manifest.macro_paths();

    get_filenames(paths, &[".sql"])
        .into_iter()
        .filter(|(_, path)| macro_paths.contains(&normalize_path(path)))
        .collect()
}

/// Changed `.sql` files that define models, keyed by file stem
///
/// Macro files and paths the manifest does not know are skipped.
pub fn get_model_sqls<P: AsRef<str>>(
    paths: &[P],
    manifest: &Manifest,
    include_ephemeral: bool,
) -> BTreeMap<String, String> {
    let macro_paths = manifest.macro_paths();
    let model_paths: BTreeSet<String> = manifest
        .models()
        .filter(|(_, node)| include_ephemeral || !node.is_ephemeral())
        .filter_map(|(_, node)| node.file_path())
        .collect();

    get_filenames(paths, &[".sql"])
        .into_iter()
        .filter(|(_, path)| {
            let normalized = normalize_path(path);
            model_paths.contains(&normalized) && !macro_paths.contains(&normalized)
        })
        .collect()
}

fn resolve_file_path(original_file_path: Option<&str>, path: Option<&str>) -> Option<String> {
    original_file_path
        .filter(|p| !p.is_empty())
        .or(path.filter(|p| !p.is_empty()))
        .map(normalize_path)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Manifest parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse manifest JSON: {0}")]
    ParseError(String),
}
