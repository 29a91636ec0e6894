use async_trait::async_trait;
use tracing::debug;

use crate::messaging::traits::JobObserver;
use crate::models::Job;

/// Observer that does nothing beyond a debug line.
///
/// Farmers are not notified about new postings; they find them by browsing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

#[async_trait]
impl JobObserver for NoopObserver {
    async fn job_posted(&self, job: &Job) {
        debug!(job_id = %job.job_id, work_type = %job.work_type, "New job posted");
    }
}
