//! Configuration schema (dochooks.toml)

use serde::Deserialize;
use std::path::Path;

/// Default file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "dochooks.toml";

/// Rules for the primary-key description check
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrimaryKeyRules {
    /// Column tag that marks a primary key
    pub tag: String,

    /// Descriptions shorter than this (in characters) count as missing
    pub min_description_length: usize,

    /// Also check models materialized as ephemeral
    pub include_ephemeral: bool,
}

impl Default for PrimaryKeyRules {
    fn default() -> Self {
        Self {
            tag: "primary-key".to_string(),
            min_description_length: 2,
            include_ephemeral: false,
        }
    }
}

/// Items excluded from checks
///
/// Entries are exact names or patterns where each `*` matches any text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SkipRules {
    /// Macro file stems
    #[serde(default)]
    pub macros: Vec<String>,

    /// Model names
    #[serde(default)]
    pub models: Vec<String>,

    /// Source tables as `source.table`
    #[serde(default)]
    pub sources: Vec<String>,
}

impl SkipRules {
    /// Check if a name matches any pattern in the list
    fn matches_pattern(name: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, name)
            } else {
                pattern == name
            }
        })
    }

    pub fn is_macro_skipped(&self, stem: &str) -> bool {
        Self::matches_pattern(stem, &self.macros)
    }

    pub fn is_model_skipped(&self, model: &str) -> bool {
        Self::matches_pattern(model, &self.models)
    }

    pub fn is_source_table_skipped(&self, source: &str, table: &str) -> bool {
        Self::matches_pattern(&format!("{}.{}", source, table), &self.sources)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub primary_key: PrimaryKeyRules,

    #[serde(default)]
    pub skip: SkipRules,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load an explicit config file, else `dochooks.toml` in `dir` if present,
    /// else defaults
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

/// Glob matching where every `*` matches any run of characters
fn glob_match(pattern: &str, text: &str) -> bool {
    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or_default();
    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };

    let mut middle: Vec<&str> = parts.collect();
    let Some(last) = middle.pop() else {
        // no wildcard
        return rest.is_empty();
    };

    for part in middle {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.primary_key.tag, "primary-key");
        assert_eq!(config.primary_key.min_description_length, 2);
        assert!(!config.primary_key.include_ephemeral);
        assert!(config.skip.models.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [primary_key]
            tag = "pk"

            [skip]
            models = ["stg_*"]
            "#,
        )
        .unwrap();

        assert_eq!(config.primary_key.tag, "pk");
        assert_eq!(config.primary_key.min_description_length, 2);
        assert!(config.skip.is_model_skipped("stg_orders"));
        assert!(!config.skip.is_model_skipped("orders"));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = Config::from_toml("[primary_key\ntag = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn source_table_skip_uses_qualified_name() {
        let rules = SkipRules {
            sources: vec!["legacy.*".to_string()],
            ..SkipRules::default()
        };

        assert!(rules.is_source_table_skipped("legacy", "events"));
        assert!(!rules.is_source_table_skipped("raw", "legacy"));
    }

    #[test]
    fn discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn discover_reads_file_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[skip]\nmacros = [\"grant_*\"]\n",
        )
        .unwrap();

        let config = Config::discover(None, dir.path()).unwrap();
        assert!(config.skip.is_macro_skipped("grant_select"));
    }

    #[test]
    fn discover_explicit_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::discover(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_, _)));
    }

    #[test]
    fn glob_matching() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("stg_*", "stg_users"));
        assert!(glob_match("*_tmp", "users_tmp"));
        assert!(!glob_match("ab*ba", "aba"));
        assert!(!glob_match("stg_*", "users"));
        assert!(glob_match("exact", "exact"));
        assert!(!glob_match("exact", "exactly"));
    }

    #[test]
    fn glob_matching_multiple_wildcards() {
        assert!(glob_match("stg_*_tmp*", "stg_users_tmp"));
        assert!(glob_match("stg_*_tmp*", "stg_users_tmp_v2"));
        assert!(!glob_match("stg_*_tmp*", "stg_users"));
        assert!(glob_match("*.*", "raw.orders"));
        assert!(glob_match("a*b*c", "abc"));
        assert!(!glob_match("a*b*c", "acb"));
        assert!(glob_match("**", ""));
    }

    #[test]
    fn skip_rules_accept_multi_wildcard_patterns() {
        let rules = SkipRules {
            models: vec!["stg_*_tmp*".to_string()],
            ..SkipRules::default()
        };

        assert!(rules.is_model_skipped("stg_orders_tmp_2"));
        assert!(!rules.is_model_skipped("stg_orders"));
    }
}
