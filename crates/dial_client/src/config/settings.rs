//! Connection settings sourced from the environment

use lazy_static::lazy_static;
use std::env;

/// DIAL endpoint used when `DIAL_URL` is not set
pub const DEFAULT_DIAL_URL: &str = "https://ai-proxy.lab.epam.com";

/// Static DIAL connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialSettings {
    pub api_key: String,
    pub dial_url: String,
}

impl Default for DialSettings {
    fn default() -> Self {
        Self {
            api_key: env::var("DIAL_API_KEY").unwrap_or_default(),
            dial_url: env::var("DIAL_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DIAL_URL.to_string()),
        }
    }
}

impl DialSettings {
    /// Create settings with explicit values
    pub fn new(api_key: impl Into<String>, dial_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            dial_url: dial_url.into(),
        }
    }

    /// Override the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Override the DIAL base URL
    pub fn with_dial_url(mut self, dial_url: impl Into<String>) -> Self {
        self.dial_url = dial_url.into();
        self
    }

    /// Chat completions endpoint template; `{model}` is replaced by the deployment name
    pub fn completions_endpoint(&self) -> String {
        format!(
            "{}/openai/deployments/{{model}}/chat/completions",
            self.dial_url.trim_end_matches('/')
        )
    }
}

lazy_static! {
    /// Settings loaded once from `DIAL_API_KEY` and `DIAL_URL`
    pub static ref DIAL_SETTINGS: DialSettings = DialSettings::default();
}
