use crate::error::OracleError;
use crate::models::{Job, Profile};
use crate::oracle::types::OracleScore;
use async_trait::async_trait;

/// External relevance scorer for job recommendations.
/// Lets the matching engine swap Gemini for any other text-generation backend.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    /// Score `jobs` against a farmer's preferences.
    ///
    /// Indices in the result refer to positions in `jobs`. Any error means
    /// "no usable result"; an empty list is a valid "nothing matches" answer.
    async fn score_jobs(
        &self,
        jobs: &[Job],
        profile: &Profile,
    ) -> Result<Vec<OracleScore>, OracleError>;

    /// Get the name of the oracle backend
    fn name(&self) -> &'static str;
}
