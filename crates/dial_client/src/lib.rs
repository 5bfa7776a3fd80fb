//! dial_client: chat completion and file bucket clients for DIAL
//!
//! This library provides:
//! - A typed message model (plain text, multi-part text/image, attachments)
//! - `ModelClient` for chat completion deployments (image-to-text, text-to-image)
//! - `BucketClient` for uploading and downloading files referenced by attachments
//!
//! # Example
//!
//! ```no_run
//! use dial_client::{Message, ModelClient, ModelConfig, DIAL_SETTINGS};
//!
//! #[tokio::main]
//! async fn main() -> dial_client::Result<()> {
//!     let client = ModelClient::new(ModelConfig::from_settings(&DIAL_SETTINGS, "gpt-4o"))?;
//!     let response = client.complete([Message::user("Hello")]).await?;
//!     println!("{:?}", response.content);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Core functionality
pub mod bucket;
pub mod mime;
pub mod model;

pub use error::{DialError, Result};

pub use config::{DialSettings, DEFAULT_DIAL_URL, DIAL_SETTINGS};

pub use model::{
    Attachment, Content, ContentedMessage, CustomContent, CustomFields, ImageOptions,
    ImageQuality, ImageSize, ImageStyle, ImgContent, ImgUrl, Message, ModelClient, ModelConfig,
    RequestMessage, Response, Role, TxtContent,
};

pub use bucket::{BucketClient, FileMetadata};

pub use mime::{extension_for_mime, mime_for_extension};
