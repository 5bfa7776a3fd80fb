//! Model module for chat completions
//!
//! This module provides:
//! - `message`: roles, plain messages and attachments
//! - `content`: multi-part text/image content
//! - `options`: custom request fields for image generation
//! - `client`: DIAL chat completions client

mod client;
mod content;
mod message;
mod options;

pub use client::{ModelClient, ModelConfig};
pub use content::{Content, ContentedMessage, ImgContent, ImgUrl, TxtContent};
pub use message::{Attachment, CustomContent, Message, RequestMessage, Response, Role};
pub use options::{CustomFields, ImageOptions, ImageQuality, ImageSize, ImageStyle};
