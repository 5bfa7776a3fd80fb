//! Chat message types exchanged with the completions API

use serde::{Deserialize, Serialize};

use super::content::ContentedMessage;

/// Speaker of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a file stored in the bucket
///
/// `url` stays `None` until the file has been uploaded and the store has
/// assigned it a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl Attachment {
    /// Create an attachment that has not been uploaded yet
    pub fn new(title: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            mime_type: mime_type.into(),
        }
    }

    /// Same attachment, pointing at its stored location
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn is_uploaded(&self) -> bool {
        self.url.is_some()
    }
}

/// Structured attachments carried alongside a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomContent {
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl CustomContent {
    pub fn new(attachments: Vec<Attachment>) -> Self {
        Self { attachments }
    }
}

/// A chat message with flat text content and optional attachments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_content: Option<CustomContent>,
}

/// Message returned by a completion call
pub type Response = Message;

impl Message {
    /// Create a text message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            custom_content: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Attach structured custom content
    pub fn with_custom_content(mut self, custom_content: CustomContent) -> Self {
        self.custom_content = Some(custom_content);
        self
    }

    /// Attach files by reference
    pub fn with_attachments(self, attachments: Vec<Attachment>) -> Self {
        self.with_custom_content(CustomContent::new(attachments))
    }

    /// Attachments carried by this message (empty when there is no custom content)
    pub fn attachments(&self) -> &[Attachment] {
        self.custom_content
            .as_ref()
            .map(|c| c.attachments.as_slice())
            .unwrap_or(&[])
    }

    /// At least one of `content` / `custom_content` is present
    pub fn is_well_formed(&self) -> bool {
        self.content.is_some() || self.custom_content.is_some()
    }
}

/// Any message shape accepted by the model client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestMessage {
    Plain(Message),
    Contented(ContentedMessage),
}

impl RequestMessage {
    pub fn is_well_formed(&self) -> bool {
        match self {
            RequestMessage::Plain(m) => m.is_well_formed(),
            RequestMessage::Contented(m) => !m.content.is_empty(),
        }
    }
}

impl From<Message> for RequestMessage {
    fn from(message: Message) -> Self {
        RequestMessage::Plain(message)
    }
}

impl From<ContentedMessage> for RequestMessage {
    fn from(message: ContentedMessage) -> Self {
        RequestMessage::Contented(message)
    }
}
