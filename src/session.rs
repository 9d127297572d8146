//! Session: the orchestration behind one UI interaction slot.
//!
//! A session validates the user's input, runs it through the completion
//! gateway, and records successful generations in the local history store.
//! Rendering, notifications, and clipboard handling belong to the embedding
//! UI, not here.

use crate::generate::{GenerateRequest, GenerateResponse, RawGenerateRequest, ValidationError};
use crate::history::{HistoryEntry, HistoryStore};
use crate::openrouter::{CompletionGateway, GenerationFailed};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// What a single generation attempt can fail with.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("failed to generate code: {0}")]
    Failed(#[from] GenerationFailed),
}

pub struct Session {
    gateway: Arc<dyn CompletionGateway>,
    history: HistoryStore,
}

impl Session {
    pub fn new(gateway: Arc<dyn CompletionGateway>, history: HistoryStore) -> Self {
        Self { gateway, history }
    }

    /// Run one generation: validate, call the provider, record the result.
    ///
    /// Takes `&mut self` so a second submission cannot start while one is in
    /// flight on this session. Failed generations leave the history
    /// untouched.
    pub async fn generate(
        &mut self,
        prompt: &str,
        language: &str,
    ) -> Result<GenerateResponse, SessionError> {
        let request = GenerateRequest::from_raw(RawGenerateRequest {
            prompt: Some(prompt.to_string()),
            language: Some(language.to_string()),
        })?;

        let response = self.gateway.generate(&request).await?;

        self.history.append(HistoryEntry::new(
            request.prompt,
            request.language,
            response.code.clone(),
        ));
        info!(entries = self.history.len(), "Recorded generation in history");

        Ok(response)
    }

    /// The session's history store, for delete/clear/search and shutdown
    /// flushing.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
}
