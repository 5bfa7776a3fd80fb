//! Model client for DIAL chat completion deployments

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::message::{RequestMessage, Response};
use super::options::CustomFields;
use crate::config::DialSettings;
use crate::error::{check_status, DialError, Result};

const DEPLOYMENTS_PATH: &str = "/openai/deployments/";
const COMPLETIONS_PATH: &str = "/chat/completions";
const PLACEHOLDERS: [&str; 2] = ["{model}", "{deployment}"];

/// Configuration for a model deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Completions endpoint template (`{model}` is replaced by the deployment
    /// name) or a bare DIAL base URL
    pub endpoint: String,
    pub deployment_name: String,
    pub api_key: String,
}

impl ModelConfig {
    /// Create a new ModelConfig for a deployment
    pub fn new(endpoint: impl Into<String>, deployment_name: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            deployment_name: deployment_name.into(),
            api_key: String::new(),
        }
    }

    /// Build from environment settings
    pub fn from_settings(settings: &DialSettings, deployment_name: impl Into<String>) -> Self {
        Self::new(settings.completions_endpoint(), deployment_name).with_api_key(&settings.api_key)
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Resolve the completions URL for the configured deployment
    ///
    /// The deployment name is inserted as a single percent-encoded path segment.
    pub fn completions_url(&self) -> Result<Url> {
        let placeholder = PLACEHOLDERS
            .iter()
            .find_map(|p| self.endpoint.find(p).map(|idx| (idx, p.len())));
        let (prefix, suffix) = match placeholder {
            Some((idx, len)) => (
                self.endpoint[..idx].to_string(),
                &self.endpoint[idx + len..],
            ),
            None => (
                format!("{}{}", self.endpoint.trim_end_matches('/'), DEPLOYMENTS_PATH),
                COMPLETIONS_PATH,
            ),
        };
        let (suffix_path, query) = match suffix.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (suffix, None),
        };

        let invalid = |reason: String| {
            DialError::InvalidRequest(format!("invalid endpoint {}: {}", self.endpoint, reason))
        };
        let mut url = Url::parse(&prefix).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot hold paths".to_string()))?
            .pop_if_empty()
            .push(&self.deployment_name)
            .extend(suffix_path.split('/').filter(|s| !s.is_empty()));
        if query.is_some() {
            url.set_query(query);
        }
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Response,
}

/// Client for a single DIAL model deployment
pub struct ModelClient {
    config: ModelConfig,
    http: reqwest::Client,
}

impl ModelClient {
    /// Create a new ModelClient
    pub fn new(config: ModelConfig) -> Result<Self> {
        let mut api_key = HeaderValue::from_str(&config.api_key)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("api-key", api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { config, http })
    }

    /// Send messages to the deployment and return the first choice's message
    ///
    /// `custom_fields` are merged into the request body as-is, without
    /// validation. No retry is attempted on failure.
    pub async fn get_completion<I, M>(
        &self,
        messages: I,
        custom_fields: CustomFields,
    ) -> Result<Response>
    where
        I: IntoIterator<Item = M>,
        M: Into<RequestMessage>,
    {
        let messages: Vec<RequestMessage> = messages.into_iter().map(Into::into).collect();
        let body = build_request_body(&messages, custom_fields)?;
        let url = self.config.completions_url()?;

        debug!(
            "Requesting completion from {} ({} messages)",
            self.config.deployment_name,
            messages.len()
        );

        let response = self.http.post(url).json(&body).send().await?;
        let text = check_status(response).await?.text().await?;

        parse_response(&text)
    }

    /// Completion without custom fields
    pub async fn complete<I, M>(&self, messages: I) -> Result<Response>
    where
        I: IntoIterator<Item = M>,
        M: Into<RequestMessage>,
    {
        self.get_completion(messages, CustomFields::new()).await
    }
}

/// Build `{"messages": [...], ...custom_fields}`
fn build_request_body(messages: &[RequestMessage], custom_fields: CustomFields) -> Result<Value> {
    if messages.is_empty() {
        return Err(DialError::InvalidRequest(
            "at least one message is required".to_string(),
        ));
    }
    if let Some(idx) = messages.iter().position(|m| !m.is_well_formed()) {
        return Err(DialError::InvalidRequest(format!(
            "message {} has no content",
            idx
        )));
    }

    if custom_fields.contains_key("messages") {
        return Err(DialError::InvalidRequest(
            "custom field 'messages' would replace the message list".to_string(),
        ));
    }

    let mut body = Map::new();
    body.insert("messages".to_string(), serde_json::to_value(messages)?);
    body.extend(custom_fields);
    Ok(Value::Object(body))
}

fn parse_response(text: &str) -> Result<Response> {
    let parsed: CompletionResponse = serde_json::from_str(text)?;
    let message = parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| DialError::Decode("response contained no choices".to_string()))?;
    if !message.is_well_formed() {
        return Err(DialError::Decode(
            "response message has no content".to_string(),
        ));
    }
    Ok(message)
}
