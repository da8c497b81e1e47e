//! Google Gemini API implementation.
//!
//! The [`GeminiClient`] keeps one `gemini-rust` client per model, created on
//! first use, so the elaborator, composer and judge can run on different
//! models through a single driver.

use crate::classify_error;
use async_trait::async_trait;
use gemini_rust::{Gemini, client::Model};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};
use veoprompt_config::Credentials;
use veoprompt_core::{GenerateRequest, GenerateResponse, Input, Output, Role};
use veoprompt_error::{GeminiError, GeminiErrorKind, VeoResult};
use veoprompt_interface::VeoDriver;

/// Client for the Gemini API with per-model client pooling.
#[derive(Clone)]
pub struct GeminiClient {
    /// Model-specific REST clients, keyed by model name
    clients: Arc<Mutex<HashMap<String, Gemini>>>,
    /// API key for creating new clients
    api_key: String,
    /// Model used when `GenerateRequest.model` is None
    model_name: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let client_count = self
            .clients
            .lock()
            .map(|clients| clients.len())
            .unwrap_or_default();
        f.debug_struct("GeminiClient")
            .field("model_name", &self.model_name)
            .field("cached_clients", &client_count)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Client with explicit credentials and default model.
    pub fn new(credentials: &Credentials, default_model: impl Into<String>) -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            api_key: credentials.gemini_api_key().to_string(),
            model_name: default_model.into(),
        }
    }

    /// Client with credentials read from `GEMINI_API_KEY` / `GOOGLE_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiErrorKind::MissingApiKey`] if no key is set.
    #[instrument(name = "gemini_client_from_env")]
    pub fn from_env(default_model: &str) -> Result<Self, GeminiError> {
        let credentials = Credentials::from_env()?;
        Ok(Self::new(&credentials, default_model))
    }

    /// Maps a model name to a `gemini-rust` model, adding the `models/`
    /// prefix the API expects for names the SDK has no variant for.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other if other.starts_with("models/") => Model::Custom(other.to_string()),
            other => Model::Custom(format!("models/{}", other)),
        }
    }

    fn client_for(&self, model_name: &str) -> Result<Gemini, GeminiError> {
        let mut clients = self
            .clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(client) = clients.get(model_name) {
            return Ok(client.clone());
        }
        debug!(model = %model_name, "Creating Gemini client");
        let client = Gemini::with_model(&self.api_key, Self::model_name_to_enum(model_name))
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;
        clients.insert(model_name.to_string(), client.clone());
        Ok(client)
    }

    fn texts(content: &[Input]) -> impl Iterator<Item = &str> {
        content.iter().map(|input| match input {
            Input::Text(text) => text.as_str(),
        })
    }

    #[instrument(skip(self, req), fields(model, messages = req.messages.len()))]
    async fn generate_internal(&self, req: &GenerateRequest) -> Result<GenerateResponse, GeminiError> {
        let model_name = req.model.as_deref().unwrap_or(&self.model_name);
        tracing::Span::current().record("model", model_name);
        let client = self.client_for(model_name)?;

        let mut builder = client.generate_content();
        let mut system_prompt: Option<String> = None;

        for msg in &req.messages {
            match msg.role {
                Role::System => {
                    let text = Self::texts(&msg.content).collect::<Vec<_>>().join("\n");
                    system_prompt = Some(match system_prompt {
                        Some(existing) => format!("{}\n\n{}", existing, text),
                        None => text,
                    });
                }
                Role::User => {
                    for text in Self::texts(&msg.content) {
                        builder = builder.with_user_message(text);
                    }
                }
                Role::Assistant => {
                    for text in Self::texts(&msg.content) {
                        builder = builder.with_model_message(text);
                    }
                }
            }
        }

        if let Some(prompt) = system_prompt {
            builder = builder.with_system_prompt(&prompt);
        }
        if let Some(temperature) = req.temperature {
            builder = builder.with_temperature(temperature);
        }
        if let Some(max_tokens) = req.max_tokens {
            builder = builder.with_max_output_tokens(max_tokens as i32);
        }

        let response = builder
            .execute()
            .await
            .map_err(|e| classify_error(&e.to_string()))?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse(
                model_name.to_string(),
            )));
        }
        debug!(chars = text.len(), "Gemini response received");

        Ok(GenerateResponse {
            outputs: vec![Output::Text(text)],
        })
    }
}

#[async_trait]
impl VeoDriver for GeminiClient {
    async fn generate(&self, req: &GenerateRequest) -> VeoResult<GenerateResponse> {
        self.generate_internal(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
