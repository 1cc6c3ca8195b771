//! Configuration for Bucketcast
//!
//! Resolved once at start-up: defaults, then an optional TOML file, then the
//! process environment. The resulting [`TopicArn`] is handed to the forwarder
//! explicitly; nothing reads the environment per record.
//!
//! Example config:
//! ```toml
//! [topic]
//! arn = "arn:aws:sns:us-east-1:123456789012:uploads"
//! region = "us-east-1"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use crate::types::TopicArn;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForwarderConfig {
    #[serde(default)]
    pub topic: TopicConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ForwarderConfig {
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::Configuration(format!("Failed to read config {:?}: {}", path, e))
        })?;

        toml::from_str(&content)
            .map_err(|e| crate::Error::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(arn) = lookup(crate::TOPIC_ENV_VAR) {
            self.topic.arn = Some(arn);
        }
        if let Some(region) = lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION")) {
            self.topic.region = Some(region);
        }
        if let Some(endpoint) = lookup("BUCKETCAST_SNS_ENDPOINT") {
            self.topic.endpoint_url = Some(endpoint);
        }
        if let Some(level) = lookup("BUCKETCAST_LOG_LEVEL") {
            self.logging.level = level;
        }

        match lookup("BUCKETCAST_LOG_FORMAT") {
            Some(format) => match format.parse() {
                Ok(format) => self.logging.format = format,
                Err(_) => tracing::warn!("Ignoring unknown log format {:?}", format),
            },
            // CloudWatch wants one JSON object per line
            None if lookup("AWS_LAMBDA_FUNCTION_NAME").is_some() => {
                self.logging.format = LogFormat::Json;
            }
            None => {}
        }
    }

    /// The validated destination topic
    pub fn topic_arn(&self) -> crate::Result<TopicArn> {
        match self.topic.arn.as_deref() {
            Some(arn) => TopicArn::parse(arn),
            None => Err(crate::Error::Configuration(format!(
                "destination topic not configured (set {})",
                crate::TOPIC_ENV_VAR
            ))),
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.topic_arn()?;

        if let Some(ref endpoint) = self.topic.endpoint_url {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(crate::Error::Configuration(format!(
                    "SNS endpoint must be an http(s) URL: {}",
                    endpoint
                )));
            }
        }
        Ok(())
    }
}

/// Destination topic configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Topic ARN
    pub arn: Option<String>,
    /// Region for the SNS client (falls back to the SDK default chain)
    pub region: Option<String>,
    /// Endpoint override, e.g. LocalStack
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(crate::Error::Configuration(format!(
                "unknown log format: {}",
                other
            ))),
        }
    }
}
