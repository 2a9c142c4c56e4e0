//! Translation client with retry and backoff

use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::config::ClientConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{ChatMessage, Sampling, TranslationRequest, TranslationResult};
use crate::core::prompts::{build_user_prompt, SYSTEM_PROMPT};
use crate::core::retry::{backoff_delay, DEFAULT_MAX_RETRIES};
use crate::core::session_cache::SessionCache;
use crate::core::transport::{CompletionTransport, HttpTransport};

/// Prefix of the message carried by a failed [`TranslationResult`]
pub const FAILURE_PREFIX: &str = "翻译发生错误：";

/// Subtitle translator targeting Simplified Chinese
#[derive(Debug, Clone)]
pub struct Translator {
    config: Arc<ClientConfig>,
    transport: Arc<dyn CompletionTransport>,
    sessions: Option<Arc<SessionCache>>,
}

impl Translator {
    /// Create a translator talking HTTP to the configured endpoint
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a translator over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn CompletionTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            sessions: None,
        }
    }

    /// Attach a session cache, enabling [`Translator::chat`]
    pub fn with_session_cache(mut self, sessions: Arc<SessionCache>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Configuration this translator was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Translate `text` into Simplified Chinese.
    ///
    /// `max_retries` defaults to 3. Never fails: errors come back as
    /// [`TranslationResult::Failure`] carrying the last error.
    pub async fn translate_to_zh(
        &self,
        text: &str,
        context: Option<&str>,
        max_retries: Option<u32>,
    ) -> TranslationResult {
        match self.try_translate_to_zh(text, context, max_retries).await {
            Ok(text) => TranslationResult::Success { text },
            Err(e) => TranslationResult::Failure {
                message: format!("{FAILURE_PREFIX}{e}"),
            },
        }
    }

    /// Translate a request with the default retry budget
    pub async fn translate(&self, request: &TranslationRequest) -> TranslationResult {
        self.translate_to_zh(&request.text, request.context.as_deref(), None)
            .await
    }

    /// Like [`Translator::translate_to_zh`] but returns the typed error
    pub async fn try_translate_to_zh(
        &self,
        text: &str,
        context: Option<&str>,
        max_retries: Option<u32>,
    ) -> Result<String> {
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_user_prompt(text, context)),
        ];
        let max_retries = max_retries.unwrap_or(DEFAULT_MAX_RETRIES);

        self.complete_with_retry(&messages, max_retries).await
    }

    /// One turn of a cached multi-turn conversation
    pub async fn chat(&self, session_id: &str, message: &str) -> Result<String> {
        let sessions = self
            .sessions
            .as_ref()
            .ok_or_else(|| TranslationError::ConfigError {
                message: "chat requires a session cache".to_string(),
            })?;

        let history = sessions.get_session(session_id, message);
        debug!("Session {} has {} message(s)", session_id, history.len());

        match self.transport.complete(&history, Sampling::default()).await {
            Ok(reply) => {
                let reply = reply.trim().to_string();
                sessions.save_session(session_id, &reply);
                Ok(reply)
            }
            Err(e) => {
                warn!("Chat turn for session {} failed: {}", session_id, e);
                sessions.discard_user_turn(session_id);
                Err(e)
            }
        }
    }

    /// Retry loop: the attempt count is `max_retries + 1` at most
    async fn complete_with_retry(
        &self,
        messages: &[ChatMessage],
        max_retries: u32,
    ) -> Result<String> {
        let mut attempt = 0;

        loop {
            let error = match self.send(messages).await {
                Ok(text) => {
                    if attempt > 0 {
                        info!("Successfully translated after {} retries", attempt);
                    }
                    return Ok(text);
                }
                Err(e) => e,
            };

            if !error.is_retryable() {
                warn!("Translation failed with permanent error: {}", error);
                return Err(error);
            }

            if attempt >= max_retries {
                warn!(
                    "Translation failed after {} attempt(s): {}",
                    attempt + 1,
                    error
                );
                return Err(error);
            }

            let delay = backoff_delay(attempt);
            warn!(
                "Translation attempt {}/{} failed: {}; retrying in {:.2}s",
                attempt + 1,
                max_retries + 1,
                error,
                delay.as_secs_f64()
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    async fn send(&self, messages: &[ChatMessage]) -> Result<String> {
        let text = self
            .transport
            .complete(messages, Sampling::TRANSLATION)
            .await?;
        let text = text.trim();

        if text.is_empty() {
            return Err(TranslationError::InvalidResponseError {
                message: "Empty translation in response".to_string(),
            });
        }

        Ok(text.to_string())
    }
}
