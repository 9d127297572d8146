//! Language registry: Single source of truth for all supported target languages.
//!
//! This module provides the centralized registry of languages the assistant can
//! generate code for. It uses a singleton pattern with `OnceLock` to ensure
//! thread-safe initialization and access. Request validation and the language
//! listing endpoint both read from here, so the set is never duplicated.

use std::sync::OnceLock;

/// Configuration for a supported target language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Stable identifier used on the wire (e.g., "python", "cpp")
    pub code: &'static str,

    /// Human-readable display label (e.g., "Python", "C++")
    pub label: &'static str,
}

/// Global language registry singleton.
///
/// Contains every language the assistant supports. It's initialized once on
/// first access and remains immutable thereafter.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Look up a language configuration by its identifier.
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the identifier is registered
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Display label for an identifier, if it is registered.
    pub fn label_for(&self, code: &str) -> Option<&'static str> {
        self.get_by_code(code).map(|lang| lang.label)
    }

    /// All registered languages, in declaration order.
    pub fn list_all(&self) -> &[LanguageConfig] {
        &self.languages
    }

    /// Check whether an identifier is a registered language.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

/// The closed set of supported target languages.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "python",
            label: "Python",
        },
        LanguageConfig {
            code: "javascript",
            label: "JavaScript",
        },
        LanguageConfig {
            code: "cpp",
            label: "C++",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        // Should return the same instance (same memory address)
        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_python() {
        let registry = LanguageRegistry::get();
        let config = registry.get_by_code("python");

        assert!(config.is_some());
        let config = config.unwrap();
        assert_eq!(config.code, "python");
        assert_eq!(config.label, "Python");
    }

    #[test]
    fn test_get_by_code_cpp_label() {
        let registry = LanguageRegistry::get();
        let config = registry.get_by_code("cpp").unwrap();
        assert_eq!(config.label, "C++");
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        let registry = LanguageRegistry::get();
        assert!(registry.get_by_code("rust").is_none());
    }

    #[test]
    fn test_label_for_registered() {
        let registry = LanguageRegistry::get();
        assert_eq!(registry.label_for("javascript"), Some("JavaScript"));
    }

    #[test]
    fn test_label_for_unregistered() {
        let registry = LanguageRegistry::get();
        assert_eq!(registry.label_for("haskell"), None);
    }

    #[test]
    fn test_list_all_contains_every_language() {
        let registry = LanguageRegistry::get();
        let all = registry.list_all();

        assert_eq!(all.len(), 3);
        assert!(all.iter().any(|lang| lang.code == "python"));
        assert!(all.iter().any(|lang| lang.code == "javascript"));
        assert!(all.iter().any(|lang| lang.code == "cpp"));
    }

    #[test]
    fn test_is_supported() {
        let registry = LanguageRegistry::get();
        assert!(registry.is_supported("python"));
        assert!(registry.is_supported("javascript"));
        assert!(registry.is_supported("cpp"));
        assert!(!registry.is_supported("java"));
        assert!(!registry.is_supported(""));
        assert!(!registry.is_supported("Python"));
    }

    #[test]
    fn test_language_config_clone() {
        let config = LanguageConfig {
            code: "python",
            label: "Python",
        };

        let cloned = config.clone();
        assert_eq!(config.code, cloned.code);
        assert_eq!(config.label, cloned.label);
    }
}
