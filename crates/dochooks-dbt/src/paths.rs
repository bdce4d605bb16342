//! Changed-path classification
//!
//! Paths arrive as given on the command line. They are normalized to
//! forward slashes only for comparison; the original spelling is what
//! gets reported back.

use std::collections::BTreeMap;

use crate::manifest::{FilenameIndex, Manifest};

/// Forward-slash separators, no leading `./`
pub fn normalize_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let mut rest = normalized.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest.to_string()
}

/// File name without directory and final extension
pub fn file_stem(path: &str) -> String {
    let normalized = normalize_path(path);
    let name = normalized.rsplit('/').next().unwrap_or_default();
    match name.rfind('.') {
        Some(0) | None => name.to_string(),
        Some(dot) => name[..dot].to_string(),
    }
}

/// Whether the final extension of `path` is one of `extensions` (e.g. `".yml"`)
pub fn has_extension(path: &str, extensions: &[&str]) -> bool {
    let name = path.rsplit(['/', '\\']).next().unwrap_or_default();
    match name.rfind('.') {
        Some(dot) if dot > 0 => extensions.contains(&&name[dot..]),
        _ => false,
    }
}

/// Paths with one of `extensions`, keyed by file stem
///
/// Later paths win when two share a stem.
pub fn get_filenames<P: AsRef<str>>(paths: &[P], extensions: &[&str]) -> BTreeMap<String, String> {
    paths
        .iter()
        .map(|p| AsRef::<str>::as_ref(p))
        .filter(|p| has_extension(p, extensions))
        .map(|p| (file_stem(p), p.to_string()))
        .collect()
}

/// Resolve changed paths against the manifest
///
/// A path the manifest knows under its own spelling is kept as is.
/// Otherwise the first node (models before macros) whose dbt `path`
/// equals it, or whose project path is a `/`-bounded suffix of it, stands
/// in with its `original_file_path`. Paths that resolve neither way are
/// dropped: files not yet compiled into the manifest produce no findings.
pub fn get_missing_file_paths<P: AsRef<str>>(paths: &[P], manifest: &Manifest) -> Vec<String> {
    let index = FilenameIndex::from_manifest(manifest);

    paths
        .iter()
        .map(|p| AsRef::<str>::as_ref(p))
        .filter_map(|path| {
            if index.contains(path) {
                return Some(path.to_string());
            }

            let resolved = resolve_by_node_path(&normalize_path(path), manifest);
            match &resolved {
                Some(found) => tracing::debug!(path, resolved = %found, "resolved path through node path"),
                None => tracing::debug!(path, "path not found in manifest, skipping"),
            }
            resolved
        })
        .collect()
}

fn resolve_by_node_path(path: &str, manifest: &Manifest) -> Option<String> {
    let nodes = manifest
        .nodes
        .values()
        .map(|n| (n.path.as_deref(), n.file_path()));
    let macros = manifest
        .macros
        .values()
        .map(|m| (m.path.as_deref(), m.file_path()));

    nodes.chain(macros).find_map(|(node_path, file_path)| {
        let file_path = file_path?;
        let by_path = node_path.is_some_and(|p| !p.is_empty() && normalize_path(p) == path);
        let by_suffix = path
            .strip_suffix(file_path.as_str())
            .is_some_and(|prefix| prefix.ends_with('/'));

        (by_path || by_suffix).then_some(file_path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest() -> Manifest {
        Manifest::from_str(
            r#"{
                "macros": {
                    "macro.shop.cents_to_dollars": {
                        "path": "macros/cents_to_dollars.sql",
                        "original_file_path": "macros/cents_to_dollars.sql"
                    }
                },
                "nodes": {
                    "model.shop.orders": {
                        "resource_type": "model",
                        "path": "marts/orders.sql",
                        "original_file_path": "models/marts/orders.sql"
                    },
                    "model.shop.customers": {
                        "resource_type": "model",
                        "path": "models/marts/orders.sql",
                        "original_file_path": "models/customers.sql"
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn normalizes_separators_and_dot_prefix() {
        assert_eq!(normalize_path(".\\models\\orders.sql"), "models/orders.sql");
        assert_eq!(normalize_path("././models/a.sql"), "models/a.sql");
        assert_eq!(normalize_path("models/a.sql"), "models/a.sql");
    }

    #[test]
    fn stems_and_extensions() {
        assert_eq!(file_stem("models/staging/stg_users.sql"), "stg_users");
        assert_eq!(file_stem("schema.v2.yml"), "schema.v2");
        assert_eq!(file_stem(".hidden"), ".hidden");
        assert!(has_extension("a/b.yaml", &[".yml", ".yaml"]));
        assert!(!has_extension("a.sql/b", &[".sql"]));
        assert!(!has_extension(".yml", &[".yml"]));
    }

    #[test]
    fn filenames_merge_extensions_and_drop_others() {
        let paths = vec!["models/a.yml", "models/b.yaml", "models/c.sql", "README.md"];
        let ymls = get_filenames(&paths, &[".yml", ".yaml"]);

        assert_eq!(ymls.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(ymls["b"], "models/b.yaml");
    }

    #[test]
    fn direct_lookup_passes_path_through() {
        let resolved = get_missing_file_paths(&["./models/marts/orders.sql"], &manifest());
        assert_eq!(resolved, vec!["./models/marts/orders.sql".to_string()]);
    }

    #[test]
    fn fallback_substitutes_original_file_path() {
        let m = manifest();

        let resolved = get_missing_file_paths(&["marts/orders.sql"], &m);
        assert_eq!(resolved, vec!["models/marts/orders.sql".to_string()]);

        let resolved = get_missing_file_paths(&["transform/models/marts/orders.sql"], &m);
        assert_eq!(resolved, vec!["models/marts/orders.sql".to_string()]);
    }

    #[test]
    fn direct_lookup_wins_over_fallback() {
        // "models/marts/orders.sql" is also the dbt path of customers
        let resolved = get_missing_file_paths(&["models/marts/orders.sql"], &manifest());
        assert_eq!(resolved, vec!["models/marts/orders.sql".to_string()]);
    }

    #[test]
    fn suffix_must_be_path_bounded() {
        let resolved = get_missing_file_paths(&["othermodels/customers.sql"], &manifest());
        assert!(resolved.is_empty());
    }

    #[test]
    fn unknown_paths_are_dropped() {
        let resolved = get_missing_file_paths(&["models/brand_new.sql", "macros/cents_to_dollars.sql"], &manifest());
        assert_eq!(resolved, vec!["macros/cents_to_dollars.sql".to_string()]);
    }
}
