//! Diagnostic codes and violation records
//!
//! Codes are stable identifiers. Add new codes with new names only.

/// Diagnostic code registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A changed macro file has no description in the manifest or in any properties file
    MacroMissingDescription,

    /// A model has a primary-key tagged column without a usable description
    ModelPrimaryKeyMissingDescription,

    /// A source table declared in a properties file has no description
    SourceTableMissingDescription,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MacroMissingDescription => "MACRO_MISSING_DESCRIPTION",
            Self::ModelPrimaryKeyMissingDescription => "MODEL_PRIMARY_KEY_MISSING_DESCRIPTION",
            Self::SourceTableMissingDescription => "SOURCE_TABLE_MISSING_DESCRIPTION",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source location in a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// File path relative to project root
    pub file: String,
}

impl Location {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }
}

/// One missing-documentation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// The undocumented item: a file path, a model name or `source.table`
    pub subject: String,

    /// Human-readable message, printed after the subject
    pub message: String,

    /// File the finding came from (best-effort)
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            subject: subject.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        assert_eq!(DiagnosticCode::MacroMissingDescription.as_str(), "MACRO_MISSING_DESCRIPTION");
        assert_eq!(
            DiagnosticCode::SourceTableMissingDescription.to_string(),
            "SOURCE_TABLE_MISSING_DESCRIPTION"
        );
    }

    #[test]
    fn diagnostic_display() {
        let diag = Diagnostic::new(
            DiagnosticCode::SourceTableMissingDescription,
            "raw.users",
            "does not have defined description.",
        )
        .with_location(Location::new("models/sources.yml"));

        assert_eq!(diag.to_string(), "raw.users: does not have defined description.");
        assert_eq!(diag.location.unwrap().file, "models/sources.yml");
    }
}
