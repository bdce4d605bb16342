//! Documentation verdicts, independent of where descriptions come from

/// Whether either source declares a non-empty description
///
/// The manifest can lag behind an edited properties file that has not
/// been recompiled yet, so a description in either place counts.
pub fn is_documented(manifest_description: Option<&str>, schema_description: Option<&str>) -> bool {
    has_text(manifest_description) || has_text(schema_description)
}

/// Absent, or shorter than `min_length` characters
///
/// With the default minimum of 2 this also catches single-space values.
/// It is not a trim: longer whitespace-only descriptions pass.
pub fn is_primary_key_description_missing(description: Option<&str>, min_length: usize) -> bool {
    match description {
        None => true,
        Some(d) => d.is_empty() || d.chars().count() < min_length,
    }
}

fn has_text(description: Option<&str>) -> bool {
    description.is_some_and(|d| !d.is_empty())
}
