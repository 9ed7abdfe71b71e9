//! AI Draft Assistant boundary.
//!
//! The provider is an opaque capability: free-text prompt in, free text out.
//! Structure is recovered afterwards by the two-stage parser in
//! [`parse`]. Provider failures are always recoverable and never block core
//! messaging.

mod gemini;
pub mod parse;

pub use gemini::GeminiClient;

use serde::Serialize;

/// A generated subject/body pair, ready to prefill the compose form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDraft {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Please provide a prompt for AI generation.")]
    EmptyPrompt,

    #[error("AI provider API key not configured.")]
    NotConfigured,

    #[error("Error generating AI content: {0}")]
    Generation(String),
}

/// Narrow provider contract consumed by the compose UI.
#[async_trait::async_trait]
pub trait DraftAssistant: Send + Sync {
    /// `prompt` is non-blank by the time it reaches a provider; blank
    /// prompts are rejected at the boundary with [`AssistantError::EmptyPrompt`].
    async fn generate(&self, prompt: &str) -> Result<GeneratedDraft, AssistantError>;
}
