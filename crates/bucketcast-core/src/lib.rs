//! Bucketcast Core Library
//!
//! Core types, errors and configuration for forwarding S3 object-created
//! notifications to an SNS topic.

pub mod config;
pub mod error;
pub mod types;

pub use config::ForwarderConfig;
pub use error::{Error, Result};

/// Bucketcast version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default AWS region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Environment variable holding the destination topic ARN
pub const TOPIC_ENV_VAR: &str = "SNS_TOPIC";

/// Message structure declared on every publish call
pub const MESSAGE_STRUCTURE: &str = "json";
