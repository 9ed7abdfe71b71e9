//! Environment-derived configuration.

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Gemini API key; `None` disables the AI draft assistant.
    pub gemini_api_key: Option<String>,
    /// Timeout for AI provider calls, in seconds.
    pub ai_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost:5432/projmail".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .unwrap_or(3000);

        // A placeholder key from a copied env template counts as unconfigured.
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty() && k != "your_gemini_api_key_here");

        let ai_timeout_secs = std::env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Self {
            database_url,
            port,
            gemini_api_key,
            ai_timeout_secs,
        }
    }
}
