//! dbt artifact access for the documentation checks
//!
//! This crate handles:
//! - Parsing manifest.json into typed node records
//! - Selecting macro, model and source records for changed files
//! - Classifying changed paths and resolving them against the manifest
//! - Reading macro and source declarations from YAML properties files

pub mod manifest;
pub mod paths;
pub mod properties;

pub use manifest::{
    get_macro_sqls, get_macros, get_model_sqls, get_models, get_sources, ColumnDefinition,
    FilenameIndex, MacroNode, MacroRecord, Manifest, ManifestError, ManifestMetadata,
    ManifestNode, ManifestSource, ModelRecord, NodeConfig, SourceRecord,
};
pub use paths::{file_stem, get_filenames, get_missing_file_paths, has_extension, normalize_path};
pub use properties::{
    get_macro_schemas, get_source_schemas, MacroSchema, PropertiesFile, SchemaFileError,
    SourceSchema,
};
