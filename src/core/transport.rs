//! Completion transport: the seam between the client and the remote API

use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt::Debug;
use std::time::Duration;
use tracing::debug;

use crate::core::config::ClientConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{ApiStyle, ChatMessage, Sampling};

/// Sends a message history to a completion endpoint and returns the reply text
#[async_trait]
pub trait CompletionTransport: Send + Sync + Debug {
    /// Complete one request. The returned text is not trimmed.
    async fn complete(&self, messages: &[ChatMessage], sampling: Sampling) -> Result<String>;
}

/// reqwest-backed transport for OpenAI-compatible endpoints
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    style: ApiStyle,
}

impl HttpTransport {
    /// Build the HTTP client, routing through the HTTPS proxy when one is configured
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)));

        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        if let Some(proxy) = config.https_proxy() {
            debug!("Routing HTTPS traffic through proxy {}", proxy);
            builder = builder.proxy(reqwest::Proxy::https(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            url: config.request_url(),
            api_key: config.api_key.clone(),
            model: config.effective_model().to_string(),
            style: config.api_style,
        })
    }

    /// Endpoint this transport posts to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn complete(&self, messages: &[ChatMessage], sampling: Sampling) -> Result<String> {
        let body = build_body(self.style, &self.model, messages, sampling);

        debug!(
            "Sending {} message(s) to {} ({})",
            messages.len(),
            self.url,
            self.model
        );

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let json: Value =
            serde_json::from_str(&text).map_err(|e| TranslationError::InvalidResponseError {
                message: e.to_string(),
            })?;

        extract_text(self.style, &json)
    }
}

/// Request body for the given API style
pub fn build_body(
    style: ApiStyle,
    model: &str,
    messages: &[ChatMessage],
    sampling: Sampling,
) -> Value {
    let mut body = match style {
        ApiStyle::Responses => json!({ "model": model, "input": messages }),
        ApiStyle::ChatCompletions => json!({ "model": model, "messages": messages }),
    };

    if let Some(obj) = body.as_object_mut() {
        if let Some(temperature) = sampling.temperature {
            obj.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(top_p) = sampling.top_p {
            obj.insert("top_p".to_string(), json!(top_p));
        }
    }

    body
}

/// Pull the generated text out of a response body
pub fn extract_text(style: ApiStyle, json: &Value) -> Result<String> {
    let text = match style {
        ApiStyle::Responses => json["output_text"]
            .as_str()
            .map(str::to_string)
            .or_else(|| collect_output_text(json)),
        ApiStyle::ChatCompletions => json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .map(str::to_string),
    };

    text.ok_or_else(|| TranslationError::InvalidResponseError {
        message: "No translation in response".to_string(),
    })
}

/// Responses API without the `output_text` convenience field:
/// concatenate every `output_text` content part of the output items.
fn collect_output_text(json: &Value) -> Option<String> {
    let parts: Vec<&str> = json["output"]
        .as_array()?
        .iter()
        .filter_map(|item| item["content"].as_array())
        .flatten()
        .filter(|part| part["type"] == "output_text")
        .filter_map(|part| part["text"].as_str())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::system("sys"), ChatMessage::user("请翻译：\nHi")]
    }

    #[test]
    fn test_responses_body() {
        let body = build_body(
            ApiStyle::Responses,
            "gpt-4.1-mini",
            &messages(),
            Sampling {
                temperature: Some(0.5),
                top_p: Some(0.75),
            },
        );
        assert_json_eq!(
            body,
            json!({
                "model": "gpt-4.1-mini",
                "input": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "请翻译：\nHi"}
                ],
                "temperature": 0.5,
                "top_p": 0.75
            })
        );
    }

    #[test]
    fn test_chat_completions_body_without_sampling() {
        let body = build_body(
            ApiStyle::ChatCompletions,
            "gpt-4o",
            &messages(),
            Sampling::default(),
        );
        assert_json_eq!(
            body,
            json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "请翻译：\nHi"}
                ]
            })
        );
    }

    #[test]
    fn test_extract_output_text() {
        let json = json!({"id": "resp_1", "output_text": "  你好。\n"});
        assert_eq!(
            extract_text(ApiStyle::Responses, &json).unwrap(),
            "  你好。\n"
        );
    }

    #[test]
    fn test_extract_nested_output() {
        let json = json!({
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "你好，"},
                    {"type": "output_text", "text": "朋友。"}
                ]}
            ]
        });
        assert_eq!(
            extract_text(ApiStyle::Responses, &json).unwrap(),
            "你好，朋友。"
        );
    }

    #[test]
    fn test_extract_choices() {
        let json = json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": "再见。"}}]});
        assert_eq!(
            extract_text(ApiStyle::ChatCompletions, &json).unwrap(),
            "再见。"
        );
    }

    #[test]
    fn test_extract_missing_field() {
        let json = json!({"choices": []});
        let err = extract_text(ApiStyle::ChatCompletions, &json).unwrap_err();
        assert!(matches!(err, TranslationError::InvalidResponseError { .. }));
        assert!(extract_text(ApiStyle::Responses, &json!({"output": []})).is_err());
    }

    #[test]
    fn test_transport_builds_with_proxy() {
        let config = ClientConfig::new("k", "https://api.openai.com/")
            .with_https_proxy("http://127.0.0.1:7890");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.url(), "https://api.openai.com/v1/responses");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let config = ClientConfig::new("k", "http://127.0.0.1:9").with_compatible(true);
        let transport = HttpTransport::new(&config).unwrap();
        let err = transport
            .complete(&messages(), Sampling::TRANSLATION)
            .await
            .unwrap_err();
        assert!(err.is_retryable(), "{err}");
    }
}
