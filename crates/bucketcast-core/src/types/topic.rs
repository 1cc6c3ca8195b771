//! Destination topic reference

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated SNS topic ARN
///
/// Format: `arn:<partition>:sns:<region>:<account-id>:<topic-name>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicArn(String);

impl TopicArn {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::Configuration("topic ARN is empty".into()));
        }

        let parts: Vec<&str> = value.splitn(6, ':').collect();
        if parts.len() != 6 || parts[0] != "arn" {
            return Err(Error::Configuration(format!(
                "invalid topic ARN: {}",
                value
            )));
        }
        if parts[2] != "sns" {
            return Err(Error::Configuration(format!(
                "not an SNS topic ARN (service `{}`): {}",
                parts[2], value
            )));
        }
        if parts[1].is_empty() || parts[5].is_empty() {
            return Err(Error::Configuration(format!(
                "invalid topic ARN: {}",
                value
            )));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Region component, empty for region-less ARNs
    pub fn region(&self) -> &str {
        self.0.split(':').nth(3).unwrap_or("")
    }

    pub fn topic_name(&self) -> &str {
        self.0.splitn(6, ':').nth(5).unwrap_or("")
    }
}

impl FromStr for TopicArn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TopicArn {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TopicArn> for String {
    fn from(arn: TopicArn) -> Self {
        arn.0
    }
}

impl AsRef<str> for TopicArn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
