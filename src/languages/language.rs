//! Language type: validated target-language representation.
//!
//! A `Language` can only be constructed for identifiers present in the
//! registry, so downstream code never has to re-check membership.

use crate::languages::{LanguageConfig, LanguageRegistry};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Registered identifier (e.g., "python")
    code: &'static str,
}

impl Language {
    pub const PYTHON: Language = Language { code: "python" };
    pub const JAVASCRIPT: Language = Language { code: "javascript" };
    pub const CPP: Language = Language { code: "cpp" };

    /// Create a Language from an identifier string.
    ///
    /// # Returns
    /// * `Some(Language)` if the identifier is registered
    /// * `None` otherwise
    pub fn from_code(code: &str) -> Option<Language> {
        LanguageRegistry::get().get_by_code(code).map(|config| Language {
            code: config.code, // Use the static str from the registry
        })
    }

    /// The registered identifier (e.g., "python", "cpp").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// The full registry entry for this language.
    ///
    /// # Panics
    /// Panics if the code is not in the registry, which cannot happen for a
    /// properly constructed `Language`.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("language code should always be registered")
    }

    /// Human-readable display label (e.g., "Python", "C++").
    pub fn label(&self) -> &'static str {
        self.config().label
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

// On the wire and on disk a language is just its identifier string; unknown
// identifiers fail deserialization so stale history records surface as parse
// errors rather than invalid entries.

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Language::from_code(&code)
            .ok_or_else(|| D::Error::custom(format!("unknown language identifier: '{}'", code)))
    }
}
