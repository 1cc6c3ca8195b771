//! SNS transport

use crate::publisher::{MessagePublisher, PublishReceipt};
use anyhow::Context;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client;
use bucketcast_core::config::TopicConfig;
use bucketcast_core::types::TopicArn;
use bucketcast_core::MESSAGE_STRUCTURE;
use tracing::debug;

/// Publishes through the AWS SNS `Publish` API
#[derive(Debug, Clone)]
pub struct SnsPublisher {
    client: Client,
}

impl SnsPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from topic configuration.
    ///
    /// Region: configured value, else the topic ARN's region, else the SDK
    /// default provider chain.
    pub async fn connect(config: &TopicConfig, topic: &TopicArn) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        let region = config
            .region
            .clone()
            .or_else(|| Some(topic.region().to_string()).filter(|r| !r.is_empty()));
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(ref endpoint) = config.endpoint_url {
            debug!("Using SNS endpoint override {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }

        let shared_config = loader.load().await;
        Self::new(Client::new(&shared_config))
    }
}

#[async_trait]
impl MessagePublisher for SnsPublisher {
    async fn publish(&self, topic: &TopicArn, payload: &str) -> anyhow::Result<PublishReceipt> {
        let output = self
            .client
            .publish()
            .topic_arn(topic.as_str())
            .message(payload)
            .message_structure(MESSAGE_STRUCTURE)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("{}", DisplayErrorContext(e)))
            .with_context(|| format!("SNS publish to {} failed", topic))?;

        Ok(PublishReceipt {
            message_id: output.message_id().map(str::to_string),
        })
    }
}
