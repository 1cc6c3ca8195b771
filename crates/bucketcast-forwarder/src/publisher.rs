//! Message publishing seam
//!
//! The forwarder only knows how to hand a `(topic, payload)` pair to a
//! [`MessagePublisher`]. Payloads are always structured JSON messages, so
//! implementations must declare `MessageStructure = "json"` to the service.

use async_trait::async_trait;
use bucketcast_core::types::TopicArn;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
#[cfg(any(test, feature = "test-util"))]
use tokio::sync::Mutex;
use tracing::info;

/// Outcome of one accepted publish call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Service-assigned message ID, if the service returned one
    pub message_id: Option<String>,
}

impl PublishReceipt {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            message_id: Some(id.into()),
        }
    }
}

/// Capability to publish a structured message to a topic
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, topic: &TopicArn, payload: &str) -> anyhow::Result<PublishReceipt>;
}

#[async_trait]
impl<T: MessagePublisher + ?Sized> MessagePublisher for Arc<T> {
    async fn publish(&self, topic: &TopicArn, payload: &str) -> anyhow::Result<PublishReceipt> {
        (**self).publish(topic, payload).await
    }
}

#[async_trait]
impl<T: MessagePublisher + ?Sized> MessagePublisher for Box<T> {
    async fn publish(&self, topic: &TopicArn, payload: &str) -> anyhow::Result<PublishReceipt> {
        (**self).publish(topic, payload).await
    }
}

// ============================================================================
// Dry run
// ============================================================================

/// Logs every message instead of sending it
#[derive(Debug, Default)]
pub struct LogPublisher {
    sent: AtomicUsize,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePublisher for LogPublisher {
    async fn publish(&self, topic: &TopicArn, payload: &str) -> anyhow::Result<PublishReceipt> {
        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        info!(topic = %topic, message_structure = bucketcast_core::MESSAGE_STRUCTURE, "Would publish: {}", payload);
        Ok(PublishReceipt::with_id(format!("dry-run-{}", n)))
    }
}

// ============================================================================
// In-memory recorder (tests only)
// ============================================================================

/// A message captured by [`RecordingPublisher`]
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: String,
}

/// Keeps every published message in memory, in call order.
///
/// Can be told to reject the n-th call (zero based) to simulate a transport
/// failure part-way through a batch.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<PublishedMessage>>,
    calls: AtomicUsize,
    fail_at: Option<usize>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(call: usize) -> Self {
        Self {
            fail_at: Some(call),
            ..Self::default()
        }
    }

    /// Messages accepted so far
    pub async fn published(&self) -> Vec<PublishedMessage> {
        self.messages.lock().await.clone()
    }

    /// Publish calls attempted so far, including rejected ones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl MessagePublisher for RecordingPublisher {
    async fn publish(&self, topic: &TopicArn, payload: &str) -> anyhow::Result<PublishReceipt> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(call) {
            anyhow::bail!("simulated publish failure on call {}", call);
        }

        let mut messages = self.messages.lock().await;
        messages.push(PublishedMessage {
            topic: topic.to_string(),
            payload: payload.to_string(),
        });
        Ok(PublishReceipt::with_id(format!("msg-{}", messages.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic() -> TopicArn {
        TopicArn::parse("arn:aws:sns:us-east-1:123:topic").unwrap()
    }

    #[tokio::test]
    async fn test_recording_publisher() {
        let publisher = RecordingPublisher::new();
        let receipt = publisher.publish(&topic(), "{}").await.unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("msg-1"));
        assert_eq!(
            publisher.published().await,
            vec![PublishedMessage {
                topic: "arn:aws:sns:us-east-1:123:topic".to_string(),
                payload: "{}".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_recording_publisher_failure() {
        let publisher = RecordingPublisher::failing_at(1);
        assert!(publisher.publish(&topic(), "a").await.is_ok());
        assert!(publisher.publish(&topic(), "b").await.is_err());
        assert!(publisher.publish(&topic(), "c").await.is_ok());

        assert_eq!(publisher.calls(), 3);
        assert_eq!(publisher.published().await.len(), 2);
    }

    #[tokio::test]
    async fn test_log_publisher_ids() {
        let publisher = LogPublisher::new();
        let first = publisher.publish(&topic(), "a").await.unwrap();
        let second = publisher.publish(&topic(), "b").await.unwrap();

        assert_eq!(first.message_id.as_deref(), Some("dry-run-1"));
        assert_eq!(second.message_id.as_deref(), Some("dry-run-2"));
    }

    #[tokio::test]
    async fn test_shared_publisher() {
        let shared = Arc::new(RecordingPublisher::new());
        let boxed: Box<dyn MessagePublisher> = Box::new(shared.clone());

        boxed.publish(&topic(), "x").await.unwrap();
        assert_eq!(shared.published().await.len(), 1);
    }
}
