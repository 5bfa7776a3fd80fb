//! Bucket module for the DIAL file store
//!
//! This module provides:
//! - `client`: scoped upload/download session

mod client;

pub use client::{BucketClient, FileMetadata};
