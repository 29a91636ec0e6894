use crate::error::TransportError;
use crate::models::Job;
use async_trait::async_trait;

/// Outbound message transport.
///
/// Delivery is best effort: callers log a failed send and move on.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, to: &str, text: &str) -> Result<(), TransportError>;

    /// Name of the transport, for logs
    fn name(&self) -> &'static str;
}

/// Hook called after a job has been posted
#[async_trait]
pub trait JobObserver: Send + Sync {
    async fn job_posted(&self, job: &Job);
}
