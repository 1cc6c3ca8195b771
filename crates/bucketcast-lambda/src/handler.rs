//! Lambda invocation handler

use bucketcast_core::types::S3EventMessage;
use bucketcast_core::Error;
use bucketcast_forwarder::{ForwardReport, MessagePublisher, NotificationForwarder};
use lambda_runtime::{Diagnostic, LambdaEvent};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Error reported back to the Lambda service.
///
/// The error code becomes the `errorType` of the invocation result so that
/// configuration, record and transport failures are distinguishable in the
/// function's error metrics and dead-letter payloads.
#[derive(Debug)]
pub struct HandlerError(pub Error);

impl From<Error> for HandlerError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<HandlerError> for Diagnostic {
    fn from(err: HandlerError) -> Self {
        Diagnostic {
            error_type: err.0.code().to_string(),
            error_message: err.0.to_string(),
        }
    }
}

pub async fn function_handler<P: MessagePublisher>(
    event: LambdaEvent<S3EventMessage>,
    forwarder: &NotificationForwarder<P>,
) -> Result<ForwardReport, HandlerError> {
    let (batch, context) = event.into_parts();
    info!(
        request_id = %context.request_id,
        "Received {} S3 event records",
        batch.len()
    );

    Ok(forwarder.process(&batch).await?)
}

/// Read an event document from a file, or from stdin when `source` is `-`
pub fn read_event(source: &str) -> bucketcast_core::Result<S3EventMessage> {
    let data = if source == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(Path::new(source))?
    };

    S3EventMessage::from_json(&data)
}
