//! S3 Event notification types
//!
//! AWS-compatible event message format as delivered to a Lambda function.
//! Every field is optional on the wire so that a single bad record is
//! reported when it is reached instead of rejecting the whole batch.

use serde::{Deserialize, Serialize};

// ============================================================================
// Event Message
// ============================================================================

/// S3 Event message (contains multiple records)
///
/// `Records` is required: a document without it (an `s3:TestEvent`, a
/// misrouted payload) is rejected as an invalid event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3EventMessage {
    pub records: Vec<S3EventRecord>,
}

impl S3EventMessage {
    pub fn from_records(records: Vec<S3EventRecord>) -> Self {
        Self { records }
    }

    /// Decode an event document
    pub fn from_json(data: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Event Record
// ============================================================================

/// S3 Event record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    /// e.g. `ObjectCreated:Put`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Info>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_schema_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<S3BucketInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<S3ObjectInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3BucketInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3ObjectInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequencer: Option<String>,
}

impl S3EventRecord {
    /// Create an `ObjectCreated:Put` record for a bucket and key
    pub fn object_created(bucket: &str, key: &str) -> Self {
        Self {
            event_version: Some("2.1".to_string()),
            event_source: Some("aws:s3".to_string()),
            aws_region: Some(crate::DEFAULT_REGION.to_string()),
            event_time: None,
            event_name: Some("ObjectCreated:Put".to_string()),
            s3: Some(S3Info {
                s3_schema_version: Some("1.0".to_string()),
                configuration_id: None,
                bucket: Some(S3BucketInfo {
                    name: Some(bucket.to_string()),
                    arn: Some(format!("arn:aws:s3:::{}", bucket)),
                }),
                object: Some(S3ObjectInfo {
                    key: Some(key.to_string()),
                    ..Default::default()
                }),
            }),
        }
    }

    pub fn bucket_name(&self) -> Option<&str> {
        self.s3
            .as_ref()
            .and_then(|s3| s3.bucket.as_ref())
            .and_then(|b| b.name.as_deref())
    }

    pub fn object_key(&self) -> Option<&str> {
        self.s3
            .as_ref()
            .and_then(|s3| s3.object.as_ref())
            .and_then(|o| o.key.as_deref())
    }
}
