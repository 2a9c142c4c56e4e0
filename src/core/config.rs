//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::ApiStyle;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Prefix for environment overrides, e.g. `ZH_TRANSLATOR_API_KEY`
pub const ENV_PREFIX: &str = "ZH_TRANSLATOR";

/// Outbound proxy settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy URL used for HTTPS requests
    #[serde(default)]
    pub https: Option<String>,
}

/// Configuration for the translator client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Bearer token sent to the endpoint
    pub api_key: String,
    /// API base URL, versioned or not depending on `compatible`
    pub api_url: String,
    /// Optional outbound proxy
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    /// Model override, [`DEFAULT_MODEL`] otherwise
    #[serde(default)]
    pub model: Option<String>,
    /// Endpoint is a relay that already carries the version segment
    #[serde(default)]
    pub compatible: bool,
    /// Remote API shape
    #[serde(default)]
    pub api_style: ApiStyle,
    /// HTTP request timeout; reqwest's default when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Create a config with defaults for everything but credentials
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
            proxy: None,
            model: None,
            compatible: false,
            api_style: ApiStyle::default(),
            timeout_secs: None,
        }
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Route HTTPS requests through `proxy`
    pub fn with_https_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(ProxyConfig {
            https: Some(proxy.into()),
        });
        self
    }

    /// Use `api_url` verbatim
    pub fn with_compatible(mut self, compatible: bool) -> Self {
        self.compatible = compatible;
        self
    }

    /// Select the remote API shape
    pub fn with_api_style(mut self, api_style: ApiStyle) -> Self {
        self.api_style = api_style;
        self
    }

    /// Load configuration from `ZH_TRANSLATOR_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(None::<&Path>)
    }

    /// Load an optional JSON/TOML file, then apply environment overrides
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            let path = path.as_ref();
            info!("Loading config from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(config_error("API key is required"));
        }

        if self.api_url.is_empty() {
            return Err(config_error("API URL is required"));
        }

        if let Some(proxy) = self.https_proxy() {
            reqwest::Url::parse(proxy)
                .map_err(|e| config_error(format!("Invalid HTTPS proxy {proxy}: {e}")))?;
        }

        Ok(())
    }

    /// Base URL the client sends requests under.
    ///
    /// Without `compatible` the trailing slashes are stripped and `/v1` is appended.
    pub fn effective_base_url(&self) -> String {
        if self.compatible {
            self.api_url.clone()
        } else {
            format!("{}/v1", self.api_url.trim_end_matches('/'))
        }
    }

    /// Configured model, or [`DEFAULT_MODEL`] when unset or empty
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }

    /// Full request URL for the configured API style
    pub fn request_url(&self) -> String {
        format!(
            "{}/{}",
            self.effective_base_url().trim_end_matches('/'),
            self.api_style.path()
        )
    }

    /// Non-empty HTTPS proxy URL, if any
    pub fn https_proxy(&self) -> Option<&str> {
        self.proxy
            .as_ref()
            .and_then(|p| p.https.as_deref())
            .filter(|p| !p.is_empty())
    }
}

fn config_error(message: impl Into<String>) -> TranslationError {
    TranslationError::ConfigError {
        message: message.into(),
    }
}
