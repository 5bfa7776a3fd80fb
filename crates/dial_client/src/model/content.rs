//! Multi-part message content (text and images)

use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::message::Role;
use crate::error::{DialError, Result};

lazy_static! {
    static ref DATA_URL: Regex =
        Regex::new(r"(?s)^data:(?P<mime>[\w.+-]+/[\w.+-]+);base64,(?P<data>.*)$")
            .expect("data URL pattern is valid");
}

/// Image location: a remote `https://` URL or an inline `data:` URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImgUrl {
    pub url: String,
}

impl ImgUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Inline image from an already base64-encoded payload
    pub fn from_base64(mime_type: &str, payload: &str) -> Self {
        Self::new(format!("data:{};base64,{}", mime_type, payload))
    }

    /// Inline image from raw bytes
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self::from_base64(mime_type, &general_purpose::STANDARD.encode(bytes))
    }

    /// Inline image from raw bytes, detecting the MIME type from the image header
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)?;
        Ok(Self::from_bytes(format.to_mime_type(), bytes))
    }

    pub fn is_inline(&self) -> bool {
        self.url.starts_with("data:")
    }

    /// Split an inline URL into its MIME type and decoded bytes
    pub fn decode_inline(&self) -> Result<(String, Vec<u8>)> {
        let caps = DATA_URL
            .captures(&self.url)
            .ok_or_else(|| DialError::InvalidDataUrl(truncate(&self.url, 48)))?;
        let bytes = general_purpose::STANDARD.decode(caps["data"].trim())?;
        Ok((caps["mime"].to_string(), bytes))
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImgContent {
    pub image_url: ImgUrl,
}

/// One part of a multi-part message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text(TxtContent),
    #[serde(rename = "image_url")]
    Image(ImgContent),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(TxtContent { text: text.into() })
    }

    pub fn image(image_url: ImgUrl) -> Self {
        Content::Image(ImgContent { image_url })
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self::image(ImgUrl::new(url))
    }
}

/// Message whose content is an ordered list of text and image parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContentedMessage")]
pub struct ContentedMessage {
    pub role: Role,
    pub content: Vec<Content>,
}

#[derive(Deserialize)]
struct RawContentedMessage {
    role: Role,
    content: Vec<Content>,
}

impl TryFrom<RawContentedMessage> for ContentedMessage {
    type Error = DialError;

    fn try_from(raw: RawContentedMessage) -> Result<Self> {
        Self::new(raw.role, raw.content)
    }
}

impl ContentedMessage {
    /// Create a multi-part message; at least one part is required
    pub fn new(role: Role, content: Vec<Content>) -> Result<Self> {
        if content.is_empty() {
            return Err(DialError::InvalidRequest(
                "contented message requires at least one content part".to_string(),
            ));
        }
        Ok(Self { role, content })
    }

    pub fn user(content: Vec<Content>) -> Result<Self> {
        Self::new(Role::User, content)
    }

    /// Text prompt followed by a single image
    pub fn describe(prompt: impl Into<String>, image_url: ImgUrl) -> Self {
        Self {
            role: Role::User,
            content: vec![Content::text(prompt), Content::image(image_url)],
        }
    }
}
