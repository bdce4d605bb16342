//! dochooks engine - the documentation checks
//!
//! Each check is a one-shot batch over a manifest and a set of changed
//! paths, producing a [`Report`](dochooks_core::Report):
//! - macros have a description (manifest or properties file)
//! - primary-key columns of models have a description
//! - source tables declared in properties files have a description

pub mod documentation;
pub mod macro_description;
pub mod primary_key_description;
pub mod source_description;

pub use documentation::{is_documented, is_primary_key_description_missing};
pub use macro_description::MacroDescriptionCheck;
pub use primary_key_description::PrimaryKeyDescriptionCheck;
pub use source_description::SourceTableDescriptionCheck;
