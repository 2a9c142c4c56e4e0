//! Subtitle translator - Simplified Chinese translation over OpenAI-compatible APIs
//!
//! This library wraps a chat-completion endpoint with a fixed subtitle-translation
//! prompt, exponential backoff retries and an optional multi-turn session cache.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;

// Re-export key types for convenience
pub use core::{
    client::Translator,
    config::{ClientConfig, ProxyConfig},
    errors::{Result, TranslationError},
    models::{ApiStyle, ChatMessage, Role, TranslationRequest, TranslationResult},
    session_cache::SessionCache,
    transport::{CompletionTransport, HttpTransport},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
