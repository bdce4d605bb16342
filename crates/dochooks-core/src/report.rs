//! Per-run check report
//!
//! A report is the outcome of one check over one set of changed files.
//! It carries no state between runs.

use crate::diagnostic::Diagnostic;

/// Which documentation rule produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    MacroHasDescription,
    ModelHasPrimaryKeyDescription,
    SourceTableHasDescription,
}

impl CheckKind {
    /// Hook id, as registered in `.pre-commit-hooks.yaml`
    pub fn hook_id(&self) -> &'static str {
        match self {
            Self::MacroHasDescription => "check-macro-has-description",
            Self::ModelHasPrimaryKeyDescription => "check-model-has-primary-key-description",
            Self::SourceTableHasDescription => "check-source-table-has-description",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hook_id())
    }
}

/// Check report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// The check that ran
    pub check: CheckKind,

    /// One entry per undocumented item
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Create a new empty report
    pub fn new(check: CheckKind) -> Self {
        Self {
            check,
            diagnostics: Vec::new(),
        }
    }

    /// Create a report from diagnostics
    pub fn from_diagnostics(check: CheckKind, diagnostics: Vec<Diagnostic>) -> Self {
        Self { check, diagnostics }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Whether at least one item is missing documentation
    pub fn has_violations(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Process exit code: 1 if anything was reported, else 0
    pub fn exit_code(&self) -> u8 {
        if self.has_violations() {
            1
        } else {
            0
        }
    }

    /// Subjects of all diagnostics, in report order
    pub fn subjects(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.subject.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;

    #[test]
    fn empty_report_passes() {
        let report = Report::new(CheckKind::MacroHasDescription);
        assert!(!report.has_violations());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn report_with_diagnostic_fails() {
        let mut report = Report::new(CheckKind::SourceTableHasDescription);
        report.push(Diagnostic::new(
            DiagnosticCode::SourceTableMissingDescription,
            "raw.orders",
            "does not have defined description.",
        ));

        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.subjects(), vec!["raw.orders"]);
    }

    #[test]
    fn hook_ids() {
        assert_eq!(CheckKind::MacroHasDescription.to_string(), "check-macro-has-description");
        assert_eq!(
            CheckKind::ModelHasPrimaryKeyDescription.hook_id(),
            "check-model-has-primary-key-description"
        );
    }
}
