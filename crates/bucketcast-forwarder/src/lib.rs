//! Bucketcast Forwarder
//!
//! Turns S3 object-created event batches into SNS notifications:
//! - [`NotificationForwarder`] walks a batch in order and publishes one
//!   message per record
//! - [`MessagePublisher`] is the transport seam, with an SNS implementation
//!   and a logging dry-run implementation. The in-memory recorder used by
//!   tests is behind the `test-util` feature.

mod forwarder;
pub mod metrics;
mod publisher;
mod sns;

pub use forwarder::{ForwardReport, NotificationForwarder};
pub use publisher::{LogPublisher, MessagePublisher, PublishReceipt};
#[cfg(any(test, feature = "test-util"))]
pub use publisher::{PublishedMessage, RecordingPublisher};
pub use sns::SnsPublisher;
