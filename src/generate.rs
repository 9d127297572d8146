//! Generation request and response types, plus request validation.
//!
//! Validation is pure and synchronous: a raw payload either becomes a
//! well-formed [`GenerateRequest`] or a [`ValidationError`] naming what was
//! wrong. Nothing downstream of validation has to re-check the prompt or the
//! language.

use crate::languages::Language;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw, untyped generation payload as it arrives over the wire.
///
/// Both fields are optional so that missing keys are a validation failure
/// rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawGenerateRequest {
    pub prompt: Option<String>,
    pub language: Option<String>,
}

/// A validated generation request: non-empty prompt, registered language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub language: Language,
}

/// Result of a generation: the produced source text.
///
/// `code` may be an empty string when the upstream provider returns no
/// content; it is never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub code: String,
}

/// Client input errors. These never reach the upstream provider and are not
/// logged as system faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("unsupported language: '{0}'")]
    UnsupportedLanguage(String),
}

impl GenerateRequest {
    /// Validate a raw payload into a well-formed request.
    ///
    /// Rules:
    /// - `prompt` must be present and non-empty after trimming whitespace
    /// - `language` must be present and registered
    ///
    /// The prompt is kept verbatim (untrimmed); only the emptiness check
    /// trims.
    pub fn from_raw(raw: RawGenerateRequest) -> Result<Self, ValidationError> {
        let prompt = match raw.prompt {
            Some(prompt) if !prompt.trim().is_empty() => prompt,
            _ => return Err(ValidationError::EmptyPrompt),
        };

        let language = match raw.language {
            Some(code) => Language::from_code(&code)
                .ok_or(ValidationError::UnsupportedLanguage(code))?,
            None => return Err(ValidationError::UnsupportedLanguage(String::new())),
        };

        Ok(Self { prompt, language })
    }
}
