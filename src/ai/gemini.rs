//! Gemini API client for draft generation.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parse::parse_generated;
use super::{AssistantError, DraftAssistant, GeneratedDraft};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MODEL: &str = "gemini-2.0-flash";

/// Gemini API request format
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, AssistantError> {
        if api_key.is_empty() {
            return Err(AssistantError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Generation(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: BASE_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Wrap the user's request in the email-generation instruction block so
    /// the provider answers with a subject/body JSON object.
    fn build_prompt(prompt: &str) -> String {
        format!(
            r#"Generate a professional email based on the following request: {prompt}

Please format the response as JSON with the following structure:
{{
    "subject": "appropriate email subject",
    "body": "email body content"
}}

Guidelines:
- Keep the tone professional and courteous
- Make the subject concise and relevant
- Structure the body with proper greeting, content, and closing
- Ensure the content is appropriate for a business/project communication
"#
        )
    }
}

#[async_trait::async_trait]
impl DraftAssistant for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedDraft, AssistantError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, MODEL, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Self::build_prompt(prompt),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Generation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AssistantError::Generation(format!(
                "provider returned {status}: {detail}"
            )));
        }

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Generation(e.to_string()))?;

        let text: String = body
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AssistantError::Generation(
                "provider returned an empty response".to_string(),
            ));
        }

        debug!(chars = text.len(), "gemini response received");
        Ok(parse_generated(&text))
    }
}
