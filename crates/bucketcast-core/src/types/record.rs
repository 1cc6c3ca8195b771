//! Change records and the notification text derived from them

use super::event::S3EventRecord;
use super::json;
use crate::{Error, Result};
use std::fmt;

/// Prefix of every notification. Subscribers match on it, keep it verbatim.
pub const MESSAGE_PREFIX: &str = "version 2 - New file uploaded: ";

/// The two fields of an S3 event record that a notification is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub bucket_name: String,
    pub object_key: String,
}

impl ChangeRecord {
    pub fn new(bucket_name: impl Into<String>, object_key: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            object_key: object_key.into(),
        }
    }

    /// Extract the bucket and key of the `index`-th record of a batch.
    ///
    /// The key is taken as delivered; S3 URL-encodes it and no decoding
    /// happens here.
    pub fn from_event_record(index: usize, record: &S3EventRecord) -> Result<Self> {
        let bucket_name = required(index, "s3.bucket.name", record.bucket_name())?;
        let object_key = required(index, "s3.object.key", record.object_key())?;

        Ok(Self::new(bucket_name, object_key))
    }

    /// `s3://bucket/key`
    pub fn s3_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket_name, self.object_key)
    }
}

fn required<'a>(index: usize, field: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(Error::MalformedRecord {
            index,
            reason: format!("field `{}` is empty", field),
        }),
        None => Err(Error::missing_field(index, field)),
    }
}

/// Human-readable notification for one change record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage(String);

impl NotificationMessage {
    pub fn for_record(record: &ChangeRecord) -> Self {
        Self(format!("{}{}", MESSAGE_PREFIX, record.s3_uri()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Structured SNS payload: `{"default": <text>}`
    pub fn to_payload(&self) -> Result<String> {
        json::default_payload(&self.0)
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
