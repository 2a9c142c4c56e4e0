//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote API shape used for completions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStyle {
    /// `POST {base}/responses` with `input`, reply in `output_text`
    #[default]
    Responses,
    /// `POST {base}/chat/completions` with `messages`, reply in `choices[0].message.content`
    ChatCompletions,
}

impl ApiStyle {
    /// Path appended to the effective base URL
    pub fn path(&self) -> &'static str {
        match self {
            ApiStyle::Responses => "responses",
            ApiStyle::ChatCompletions => "chat/completions",
        }
    }
}

impl fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiStyle::Responses => write!(f, "responses"),
            ApiStyle::ChatCompletions => write!(f, "chat_completions"),
        }
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction message
    System,
    /// Caller turn
    User,
    /// Model turn
    Assistant,
}

/// A single role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System instruction message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent alongside the messages
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sampling {
    /// Sampling temperature, omitted from the request when `None`
    pub temperature: Option<f64>,
    /// Nucleus sampling mass, omitted from the request when `None`
    pub top_p: Option<f64>,
}

impl Sampling {
    /// Low-randomness decoding used for translation
    pub const TRANSLATION: Sampling = Sampling {
        temperature: Some(0.2),
        top_p: Some(0.9),
    };
}

/// Translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Subtitle text to translate
    pub text: String,
    /// Surrounding lines given to the model for coherence
    pub context: Option<String>,
}

impl TranslationRequest {
    /// Request without context
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: None,
        }
    }

    /// Attach context lines
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Translation outcome handed back to the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TranslationResult {
    /// Translated text, trimmed
    Success {
        /// Translation
        text: String,
    },
    /// Last error after the retry budget was spent
    Failure {
        /// Prefixed error description
        message: String,
    },
}

impl TranslationResult {
    /// Whether the translation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, TranslationResult::Success { .. })
    }

    /// `(success, text_or_error)` pair
    pub fn into_parts(self) -> (bool, String) {
        match self {
            TranslationResult::Success { text } => (true, text),
            TranslationResult::Failure { message } => (false, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn test_message_serialization() {
        let msg = ChatMessage::assistant("好的");
        assert_json_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"role": "assistant", "content": "好的"})
        );
    }

    #[test]
    fn test_result_into_parts() {
        let ok = TranslationResult::Success {
            text: "你好。".to_string(),
        };
        assert!(ok.is_success());
        assert_eq!(ok.into_parts(), (true, "你好。".to_string()));

        let failed = TranslationResult::Failure {
            message: "boom".to_string(),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.into_parts(), (false, "boom".to_string()));
    }

    #[test]
    fn test_api_style_from_config_value() {
        let style: ApiStyle = serde_json::from_value(json!("chat_completions")).unwrap();
        assert_eq!(style, ApiStyle::ChatCompletions);
        assert_eq!(style.path(), "chat/completions");
        assert_eq!(ApiStyle::default().path(), "responses");
    }
}
