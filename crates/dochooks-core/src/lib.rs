//! dochooks Core
//!
//! Shared domain types for the documentation checks: diagnostics, the
//! per-run report and the `dochooks.toml` configuration.
//! Never rename diagnostic codes - hook users grep for them.

pub mod diagnostic;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Location};
pub use report::{CheckKind, Report};
pub use config::{Config, ConfigError, PrimaryKeyRules, SkipRules};
