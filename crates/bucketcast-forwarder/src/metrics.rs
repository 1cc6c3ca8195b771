//! Forwarding metrics
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! host process installs a recorder.

use metrics::{counter, histogram};
use std::time::Duration;

/// Metric names
pub mod names {
    pub const RECORDS_RECEIVED_TOTAL: &str = "bucketcast_records_received_total";
    pub const MESSAGES_PUBLISHED_TOTAL: &str = "bucketcast_messages_published_total";
    pub const PUBLISH_ERRORS_TOTAL: &str = "bucketcast_publish_errors_total";
    pub const MALFORMED_RECORDS_TOTAL: &str = "bucketcast_malformed_records_total";
    pub const PUBLISH_DURATION_SECONDS: &str = "bucketcast_publish_duration_seconds";
}

pub fn record_batch(records: usize) {
    counter!(names::RECORDS_RECEIVED_TOTAL).increment(records as u64);
}

pub fn record_published(topic: &str, elapsed: Duration) {
    counter!(names::MESSAGES_PUBLISHED_TOTAL, "topic" => topic.to_string()).increment(1);
    histogram!(names::PUBLISH_DURATION_SECONDS, "topic" => topic.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_publish_error(topic: &str) {
    counter!(names::PUBLISH_ERRORS_TOTAL, "topic" => topic.to_string()).increment(1);
}

pub fn record_malformed() {
    counter!(names::MALFORMED_RECORDS_TOTAL).increment(1);
}
