//! Configuration module for dial_client
//!
//! This module contains:
//! - `settings`: environment-sourced DIAL connection settings

mod settings;

pub use settings::{DialSettings, DEFAULT_DIAL_URL, DIAL_SETTINGS};
