//! Notification Forwarder
//!
//! Publishes one SNS message per S3 event record, strictly in batch order.
//! The first failure aborts the batch: earlier records stay published, later
//! records are never attempted.

use crate::metrics;
use crate::publisher::{MessagePublisher, PublishReceipt};
use bucketcast_core::types::{ChangeRecord, NotificationMessage, S3EventMessage, TopicArn};
use bucketcast_core::{Error, Result};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Summary of a forwarded batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForwardReport {
    /// Number of messages published
    pub published: usize,
    /// One entry per published record, in batch order; `None` when the
    /// publisher returned no message ID
    pub message_ids: Vec<Option<String>>,
}

impl ForwardReport {
    fn push(&mut self, receipt: PublishReceipt) {
        self.published += 1;
        self.message_ids.push(receipt.message_id);
    }
}

/// Forwards S3 change records to a single topic
pub struct NotificationForwarder<P> {
    topic: TopicArn,
    publisher: P,
}

impl<P: MessagePublisher> NotificationForwarder<P> {
    pub fn new(topic: TopicArn, publisher: P) -> Self {
        Self { topic, publisher }
    }

    pub fn topic(&self) -> &TopicArn {
        &self.topic
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Publish a notification for every record of the batch
    #[instrument(skip_all, fields(topic = %self.topic, records = batch.len()))]
    pub async fn process(&self, batch: &S3EventMessage) -> Result<ForwardReport> {
        let mut report = ForwardReport::default();

        if batch.is_empty() {
            debug!("Empty batch, nothing to publish");
            return Ok(report);
        }

        metrics::record_batch(batch.len());
        info!("Forwarding {} records to {}", batch.len(), self.topic);

        for (index, record) in batch.records.iter().enumerate() {
            let change = ChangeRecord::from_event_record(index, record).map_err(|e| {
                metrics::record_malformed();
                error!("Rejecting record {}: {}", index, e);
                e
            })?;

            let receipt = self.forward(index, &change).await?;
            report.push(receipt);
        }

        info!("Published {} notifications", report.published);
        Ok(report)
    }

    /// Publish the notification for a single record
    pub async fn forward(&self, index: usize, change: &ChangeRecord) -> Result<PublishReceipt> {
        let message = NotificationMessage::for_record(change);
        let payload = message.to_payload()?;

        let started = Instant::now();
        match self.publisher.publish(&self.topic, &payload).await {
            Ok(receipt) => {
                metrics::record_published(self.topic.as_str(), started.elapsed());
                debug!(
                    "Published {} (message id {:?})",
                    change.s3_uri(),
                    receipt.message_id
                );
                Ok(receipt)
            }
            Err(e) => {
                metrics::record_publish_error(self.topic.as_str());
                error!("Failed to publish {}: {:#}", change.s3_uri(), e);
                Err(Error::Publish {
                    index,
                    message: format!("{:#}", e),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::RecordingPublisher;
    use bucketcast_core::types::S3EventRecord;

    const TOPIC: &str = "arn:aws:sns:us-east-1:123:topic";

    fn forwarder(publisher: RecordingPublisher) -> NotificationForwarder<RecordingPublisher> {
        NotificationForwarder::new(TopicArn::parse(TOPIC).unwrap(), publisher)
    }

    fn text_of(payload: &str) -> String {
        let value: serde_json::Value = serde_json::from_str(payload).unwrap();
        value["default"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_single_record() {
        let forwarder = forwarder(RecordingPublisher::new());
        let batch = S3EventMessage::from_json(
            r#"{"Records":[{"s3":{"bucket":{"name":"my-bucket"},"object":{"key":"a/b.txt"}}}]}"#,
        )
        .unwrap();

        let report = forwarder.process(&batch).await.unwrap();
        assert_eq!(report.published, 1);
        assert_eq!(report.message_ids, vec![Some("msg-1".to_string())]);

        let published = forwarder.publisher().published().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].topic, TOPIC);
        assert_eq!(
            published[0].payload,
            r#"{"default": "version 2 - New file uploaded: s3://my-bucket/a/b.txt"}"#
        );
    }

    #[tokio::test]
    async fn test_records_published_in_order() {
        let forwarder = forwarder(RecordingPublisher::new());
        let batch = S3EventMessage::from_records(vec![
            S3EventRecord::object_created("first", "one.txt"),
            S3EventRecord::object_created("second", "dir/two.txt"),
            S3EventRecord::object_created("first", "three.txt"),
        ]);

        let report = forwarder.process(&batch).await.unwrap();
        assert_eq!(report.published, 3);

        let texts: Vec<String> = forwarder
            .publisher()
            .published()
            .await
            .iter()
            .map(|m| text_of(&m.payload))
            .collect();
        assert_eq!(
            texts,
            vec![
                "version 2 - New file uploaded: s3://first/one.txt",
                "version 2 - New file uploaded: s3://second/dir/two.txt",
                "version 2 - New file uploaded: s3://first/three.txt",
            ]
        );
    }

    /// Returns a message ID only for even-numbered calls
    #[derive(Default)]
    struct SometimesAnonymousPublisher {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl MessagePublisher for SometimesAnonymousPublisher {
        async fn publish(&self, _topic: &TopicArn, _payload: &str) -> anyhow::Result<PublishReceipt> {
            let call = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if call % 2 == 0 {
                Ok(PublishReceipt::with_id(format!("id-{}", call)))
            } else {
                Ok(PublishReceipt::default())
            }
        }
    }

    #[tokio::test]
    async fn test_message_ids_line_up_with_records() {
        let forwarder = NotificationForwarder::new(
            TopicArn::parse(TOPIC).unwrap(),
            SometimesAnonymousPublisher::default(),
        );
        let batch = S3EventMessage::from_records(vec![
            S3EventRecord::object_created("b", "0"),
            S3EventRecord::object_created("b", "1"),
            S3EventRecord::object_created("b", "2"),
        ]);

        let report = forwarder.process(&batch).await.unwrap();
        assert_eq!(report.published, 3);
        assert_eq!(
            report.message_ids,
            vec![Some("id-0".to_string()), None, Some("id-2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let forwarder = forwarder(RecordingPublisher::new());

        let report = forwarder.process(&S3EventMessage::default()).await.unwrap();
        assert_eq!(report, ForwardReport::default());
        assert_eq!(forwarder.publisher().calls(), 0);
    }

    #[tokio::test]
    async fn test_publish_failure_aborts_batch() {
        let forwarder = forwarder(RecordingPublisher::failing_at(1));
        let batch = S3EventMessage::from_records(vec![
            S3EventRecord::object_created("b", "0"),
            S3EventRecord::object_created("b", "1"),
            S3EventRecord::object_created("b", "2"),
        ]);

        let err = forwarder.process(&batch).await.unwrap_err();
        match &err {
            Error::Publish { index, message } => {
                assert_eq!(*index, 1);
                assert!(message.contains("simulated publish failure"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_retryable());

        // record 0 went out, record 2 was never attempted
        assert_eq!(forwarder.publisher().calls(), 2);
        let published = forwarder.publisher().published().await;
        assert_eq!(published.len(), 1);
        assert_eq!(text_of(&published[0].payload), "version 2 - New file uploaded: s3://b/0");
    }

    #[tokio::test]
    async fn test_malformed_record_aborts_batch() {
        let forwarder = forwarder(RecordingPublisher::new());
        let batch = S3EventMessage::from_json(
            r#"{"Records":[
                {"s3":{"bucket":{"name":"b"},"object":{"key":"ok.txt"}}},
                {"s3":{"bucket":{"name":"b"}}},
                {"s3":{"bucket":{"name":"b"},"object":{"key":"never.txt"}}}
            ]}"#,
        )
        .unwrap();

        let err = forwarder.process(&batch).await.unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { index: 1, .. }));
        assert!(!err.is_retryable());
        assert_eq!(forwarder.publisher().calls(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_records_are_not_deduplicated() {
        let forwarder = forwarder(RecordingPublisher::new());
        let record = S3EventRecord::object_created("b", "same.txt");
        let batch = S3EventMessage::from_records(vec![record.clone(), record]);

        forwarder.process(&batch).await.unwrap();
        let published = forwarder.publisher().published().await;
        assert_eq!(published.len(), 2);
        assert_eq!(published[0], published[1]);
    }

    #[tokio::test]
    async fn test_forward_single() {
        let forwarder = forwarder(RecordingPublisher::new());
        let receipt = forwarder
            .forward(0, &ChangeRecord::new("bucket", "key with spaces.txt"))
            .await
            .unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("msg-1"));
        let published = forwarder.publisher().published().await;
        assert_eq!(
            text_of(&published[0].payload),
            "version 2 - New file uploaded: s3://bucket/key with spaces.txt"
        );
    }
}
