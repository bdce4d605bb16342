//! Primary-key columns of changed models must have a description

use dochooks_core::{CheckKind, Config, Diagnostic, DiagnosticCode, Location, Report};
use dochooks_dbt::{get_missing_file_paths, get_model_sqls, get_models, Manifest, ManifestNode};
use std::collections::{BTreeMap, BTreeSet};

use crate::documentation::is_primary_key_description_missing;

pub struct PrimaryKeyDescriptionCheck;

impl PrimaryKeyDescriptionCheck {
    pub const HEADER: &'static str = "Following models are missing primary-key description:";
    pub const MESSAGE: &'static str = "is missing primary-key description";

    /// Run the check over changed `paths`
    ///
    /// Each model is reported once, however many of its primary-key
    /// columns lack a description. Models come out sorted by name.
    pub fn run<P: AsRef<str>>(paths: &[P], manifest: &Manifest, config: &Config) -> Report {
        let rules = &config.primary_key;

        let paths = get_missing_file_paths(paths, manifest);
        let sqls = get_model_sqls(&paths, manifest, rules.include_ephemeral);
        let filenames: BTreeSet<String> = sqls.keys().cloned().collect();

        // model name -> file
        let mut missing: BTreeMap<String, String> = BTreeMap::new();

        for model in get_models(manifest, &filenames, rules.include_ephemeral) {
            if config.skip.is_model_skipped(&model.model_name) {
                tracing::debug!(model = %model.model_name, "skipped by config");
                continue;
            }

            let columns = undocumented_primary_keys(model.node, &rules.tag, rules.min_description_length);
            if !columns.is_empty() {
                tracing::debug!(model = %model.model_name, ?columns, "primary-key columns without description");
                missing.entry(model.model_name).or_insert(model.file_path);
            }
        }

        let diagnostics = missing
            .into_iter()
            .map(|(model_name, file)| {
                Diagnostic::new(DiagnosticCode::ModelPrimaryKeyMissingDescription, model_name, Self::MESSAGE)
                    .with_location(Location::new(file))
            })
            .collect();

        Report::from_diagnostics(CheckKind::ModelHasPrimaryKeyDescription, diagnostics)
    }
}

/// Names of columns tagged `tag` whose description is missing
fn undocumented_primary_keys<'a>(node: &'a ManifestNode, tag: &str, min_length: usize) -> Vec<&'a str> {
    node.columns
        .iter()
        .filter(|(_, column)| column.has_tag(tag))
        .filter(|(_, column)| is_primary_key_description_missing(column.description.as_deref(), min_length))
        .map(|(name, _)| name.as_str())
        .collect()
}
