//! Source tables declared in changed properties files must have a description
//!
//! Works from the YAML alone; no manifest is needed.

use dochooks_core::{CheckKind, Config, Diagnostic, DiagnosticCode, Location, Report};
use dochooks_dbt::{get_source_schemas, has_extension};

pub struct SourceTableDescriptionCheck;

impl SourceTableDescriptionCheck {
    pub const MESSAGE: &'static str = "does not have defined description.";

    /// Run the check over changed `paths`; non-YAML paths are ignored
    pub fn run<P: AsRef<str>>(paths: &[P], config: &Config) -> Report {
        let ymls: Vec<&str> = paths
            .iter()
            .map(|p| AsRef::<str>::as_ref(p))
            .filter(|p| has_extension(p, &[".yml", ".yaml"]))
            .collect();

        let mut report = Report::new(CheckKind::SourceTableHasDescription);

        for schema in get_source_schemas(&ymls) {
            if config.skip.is_source_table_skipped(&schema.source_name, &schema.table_name) {
                tracing::debug!(source = %schema.source_name, table = %schema.table_name, "skipped by config");
                continue;
            }

            if schema.description.as_deref().map_or(true, str::is_empty) {
                report.push(
                    Diagnostic::new(
                        DiagnosticCode::SourceTableMissingDescription,
                        format!("{}.{}", schema.source_name, schema.table_name),
                        Self::MESSAGE,
                    )
                    .with_location(Location::new(schema.file)),
                );
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reports_tables_without_description() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.yml");
        std::fs::write(
            &path,
            r#"
sources:
  - name: raw
    tables:
      - name: customers
        description: Customers
      - name: orders
      - name: payments
        description: ""
"#,
        )
        .unwrap();

        let path = path.display().to_string();
        let report = SourceTableDescriptionCheck::run(&[path.as_str()], &Config::default());

        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.subjects(), vec!["raw.orders", "raw.payments"]);
        assert_eq!(report.diagnostics[0].location.as_ref().unwrap().file, path);
    }

    #[test]
    fn described_tables_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.yaml");
        std::fs::write(&path, "sources: [{name: s, tables: [{name: t, description: ok}]}]\n").unwrap();

        let report = SourceTableDescriptionCheck::run(&[path.display().to_string()], &Config::default());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn non_yaml_paths_are_ignored() {
        let report = SourceTableDescriptionCheck::run(&["models/orders.sql"], &Config::default());
        assert!(!report.has_violations());
    }
}
