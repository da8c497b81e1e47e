//! API credentials from the environment.

use veoprompt_error::{GeminiError, GeminiErrorKind};

/// Secrets for the inference boundary.
#[derive(Clone)]
pub struct Credentials {
    gemini_api_key: String,
}

impl Credentials {
    /// Primary variable holding the Gemini key.
    pub const GEMINI_API_KEY: &'static str = "GEMINI_API_KEY";
    /// Fallback variable.
    pub const GOOGLE_API_KEY: &'static str = "GOOGLE_API_KEY";

    /// Reads the key from `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiErrorKind::MissingApiKey`] if neither is set to a
    /// non-blank value.
    pub fn from_env() -> Result<Self, GeminiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the key through `lookup`, for callers that source variables
    /// from somewhere other than the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GeminiError> {
        [Self::GEMINI_API_KEY, Self::GOOGLE_API_KEY]
            .into_iter()
            .filter_map(|name| lookup(name))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .map(|gemini_api_key| Self { gemini_api_key })
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingApiKey))
    }

    /// The Gemini API key.
    pub fn gemini_api_key(&self) -> &str {
        &self.gemini_api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("gemini_api_key", &"<redacted>")
            .finish()
    }
}
