//! Changed macros must have a description
//!
//! A macro file is documented when one of its manifest macros, or a
//! `macros:` entry named after the file in a changed properties file,
//! carries a non-empty description.

use dochooks_core::{CheckKind, Config, Diagnostic, DiagnosticCode, Location, Report};
use dochooks_dbt::{get_macro_schemas, get_macro_sqls, get_macros, has_extension, Manifest};
use std::collections::{BTreeMap, BTreeSet};

use crate::documentation::is_documented;

pub struct MacroDescriptionCheck;

impl MacroDescriptionCheck {
    pub const MESSAGE: &'static str = "does not have defined description or properties file is missing.";

    /// Run the check over changed `paths`
    pub fn run<P: AsRef<str>>(paths: &[P], manifest: &Manifest, config: &Config) -> Report {
        let sqls = get_macro_sqls(paths, manifest);
        let filenames: BTreeSet<String> = sqls
            .keys()
            .filter(|stem| {
                let skipped = config.skip.is_macro_skipped(stem);
                if skipped {
                    tracing::debug!(macro_file = %stem, "skipped by config");
                }
                !skipped
            })
            .cloned()
            .collect();

        let ymls: Vec<&str> = paths
            .iter()
            .map(|p| AsRef::<str>::as_ref(p))
            .filter(|p| has_extension(p, &[".yml", ".yaml"]))
            .collect();

        // Manifest view, then properties files edited but not yet compiled
        let mut in_manifest: BTreeMap<&str, &str> = BTreeMap::new();
        let macros = get_macros(manifest, &filenames);
        for record in &macros {
            if let Some(description) = record.node.description.as_deref().filter(|d| !d.is_empty()) {
                in_manifest.entry(record.filename.as_str()).or_insert(description);
            }
        }

        let schemas = get_macro_schemas(&ymls, &filenames);
        let mut in_schemas: BTreeMap<&str, &str> = BTreeMap::new();
        for schema in &schemas {
            if let Some(description) = schema.description.as_deref().filter(|d| !d.is_empty()) {
                in_schemas.entry(schema.macro_name.as_str()).or_insert(description);
            }
        }

        tracing::debug!(
            changed = filenames.len(),
            manifest_macros = macros.len(),
            schema_entries = schemas.len(),
            "collected macro documentation"
        );

        let mut report = Report::new(CheckKind::MacroHasDescription);
        for filename in &filenames {
            let documented = is_documented(
                in_manifest.get(filename.as_str()).copied(),
                in_schemas.get(filename.as_str()).copied(),
            );

            if !documented {
                let path = &sqls[filename];
                report.push(
                    Diagnostic::new(DiagnosticCode::MacroMissingDescription, path.clone(), Self::MESSAGE)
                        .with_location(Location::new(path.clone())),
                );
            }
        }

        report
    }
}
