//! Supported target languages.
//!
//! Everything language-related lives here:
//!
//! - `registry`: single source of truth for supported languages and their labels
//! - `language`: validated `Language` type used by requests and history entries
//!
//! Request validation and the `/api/languages` listing both consume the
//! registry, so adding a language is a one-line change in `registry.rs`.

mod language;
mod registry;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
