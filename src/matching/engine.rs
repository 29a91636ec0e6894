use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::OracleError;
use crate::matching::rules::{rule_based_match, MAX_RESULTS};
use crate::models::{Job, Profile};
use crate::oracle::{OracleScore, ScoringOracle};

/// Oracle assessment attached to a recommended job
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub score: f64,
    pub reason: String,
}

/// A recommended job, best first
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedJob {
    pub job: Job,
    /// Present only when the oracle produced the ranking
    pub verdict: Option<Verdict>,
}

impl MatchedJob {
    fn unscored(job: Job) -> Self {
        Self { job, verdict: None }
    }
}

/// Ranks open jobs for a farmer.
///
/// Uses the oracle when one is configured and falls back to the rule-based
/// strategy on any oracle failure. Never returns an error.
pub struct MatchingEngine {
    oracle: Option<Arc<dyn ScoringOracle>>,
    timeout: Duration,
}

impl MatchingEngine {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

    /// Engine that only uses the deterministic strategy
    pub fn rule_based() -> Self {
        Self {
            oracle: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Engine that asks `oracle` first, giving up after `timeout`
    pub fn with_oracle(oracle: Arc<dyn ScoringOracle>, timeout: Duration) -> Self {
        Self {
            oracle: Some(oracle),
            timeout,
        }
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Return at most `MAX_RESULTS` jobs for `profile`, best first
    pub async fn rank(&self, jobs: Vec<Job>, profile: &Profile) -> Vec<MatchedJob> {
        if let Some(oracle) = &self.oracle {
            match self.rank_with_oracle(oracle.as_ref(), &jobs, profile).await {
                Ok(ranked) => {
                    info!(
                        oracle = oracle.name(),
                        candidates = jobs.len(),
                        matched = ranked.len(),
                        "Oracle ranking complete"
                    );
                    return ranked;
                }
                Err(e) => {
                    warn!(oracle = oracle.name(), error = %e, "Oracle ranking failed, falling back to rules");
                }
            }
        }

        rule_based_match(jobs, profile)
            .into_iter()
            .map(MatchedJob::unscored)
            .collect()
    }

    async fn rank_with_oracle(
        &self,
        oracle: &dyn ScoringOracle,
        jobs: &[Job],
        profile: &Profile,
    ) -> Result<Vec<MatchedJob>, OracleError> {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let scores = tokio::time::timeout(self.timeout, oracle.score_jobs(jobs, profile))
            .await
            .map_err(|_| OracleError::Timeout(self.timeout))??;

        Ok(attach_scores(jobs, scores))
    }
}

/// Pair oracle records with their jobs, dropping out-of-range indices
pub fn attach_scores(jobs: &[Job], scores: Vec<OracleScore>) -> Vec<MatchedJob> {
    let mut ranked: Vec<MatchedJob> = scores
        .into_iter()
        .filter_map(|entry| {
            let job = usize::try_from(entry.job_index)
                .ok()
                .and_then(|index| jobs.get(index))?;
            Some(MatchedJob {
                job: job.clone(),
                verdict: Some(Verdict {
                    score: entry.score,
                    reason: entry.reason,
                }),
            })
        })
        .collect();

    ranked.sort_by(|a, b| score_of(b).partial_cmp(&score_of(a)).unwrap_or(Ordering::Equal));
    ranked.truncate(MAX_RESULTS);
    ranked
}

fn score_of(matched: &MatchedJob) -> f64 {
    matched.verdict.as_ref().map(|v| v.score).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewJob, Payment};
    use async_trait::async_trait;

    /// Oracle with a canned answer
    enum Scripted {
        Scores(Vec<OracleScore>),
        Fails,
        Hangs,
    }

    #[async_trait]
    impl ScoringOracle for Scripted {
        async fn score_jobs(
            &self,
            _jobs: &[Job],
            _profile: &Profile,
        ) -> Result<Vec<OracleScore>, OracleError> {
            match self {
                Scripted::Scores(scores) => Ok(scores.clone()),
                Scripted::Fails => Err(OracleError::Malformed("not json".to_string())),
                Scripted::Hangs => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Vec::new())
                }
            }
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn job(id: &str, work_type: &str, rate: f64) -> Job {
        Job::open(
            id.to_string(),
            NewJob {
                work_type: work_type.to_string(),
                workers_needed: 1,
                work_hours: String::new(),
                payment: Payment::PerHour(rate),
                location: "Davis, CA".to_string(),
                transportation: None,
                meeting_point: None,
                description: None,
                owner_phone: "owner".to_string(),
                owner_name: "Owner".to_string(),
                farm_name: "Farm".to_string(),
                schedule: None,
            },
        )
    }

    fn jobs() -> Vec<Job> {
        vec![
            job("A", "Harvesting", 15.0),
            job("B", "Planting", 25.0),
            job("C", "Irrigation", 20.0),
        ]
    }

    fn score(index: i64, score: f64) -> OracleScore {
        OracleScore {
            job_index: index,
            score,
            reason: format!("reason {index}"),
        }
    }

    fn engine(oracle: Scripted) -> MatchingEngine {
        MatchingEngine::with_oracle(Arc::new(oracle), Duration::from_millis(50))
    }

    fn ids(ranked: &[MatchedJob]) -> Vec<&str> {
        ranked.iter().map(|m| m.job.job_id.as_str()).collect()
    }

    #[tokio::test]
    async fn oracle_scores_are_sorted_and_attached() {
        let engine = engine(Scripted::Scores(vec![score(0, 60.0), score(2, 90.0)]));

        let ranked = engine.rank(jobs(), &Profile::default()).await;

        assert_eq!(ids(&ranked), vec!["C", "A"]);
        let verdict = ranked[0].verdict.as_ref().unwrap();
        assert_eq!(verdict.score, 90.0);
        assert_eq!(verdict.reason, "reason 2");
    }

    #[tokio::test]
    async fn invalid_indices_are_discarded() {
        let engine = engine(Scripted::Scores(vec![score(-1, 99.0), score(7, 98.0), score(1, 50.0)]));

        let ranked = engine.rank(jobs(), &Profile::default()).await;

        assert_eq!(ids(&ranked), vec!["B"]);
    }

    #[tokio::test]
    async fn empty_oracle_answer_is_not_replaced() {
        let engine = engine(Scripted::Scores(Vec::new()));

        assert!(engine.rank(jobs(), &Profile::default()).await.is_empty());
    }

    #[tokio::test]
    async fn oracle_failure_falls_back_to_rules() {
        let ranked = engine(Scripted::Fails).rank(jobs(), &Profile::default()).await;

        assert_eq!(ids(&ranked), vec!["B", "C", "A"]);
        assert!(ranked.iter().all(|m| m.verdict.is_none()));
    }

    #[tokio::test]
    async fn oracle_timeout_falls_back_to_rules() {
        let ranked = engine(Scripted::Hangs).rank(jobs(), &Profile::default()).await;

        assert_eq!(ids(&ranked), vec!["B", "C", "A"]);
    }

    #[tokio::test]
    async fn oracle_results_are_capped() {
        let many: Vec<Job> = (0..8).map(|i| job(&format!("J{i}"), "Weeding", 10.0)).collect();
        let scores = (0..8).map(|i| score(i, 50.0 + i as f64)).collect();

        let ranked = engine(Scripted::Scores(scores))
            .rank(many, &Profile::default())
            .await;

        assert_eq!(ranked.len(), MAX_RESULTS);
        assert_eq!(ranked[0].job.job_id, "J7");
    }

    #[tokio::test]
    async fn rule_based_engine_never_calls_oracle() {
        let engine = MatchingEngine::rule_based();
        assert!(!engine.has_oracle());

        let ranked = engine.rank(jobs(), &Profile::default()).await;
        assert_eq!(ids(&ranked), vec!["B", "C", "A"]);
    }
}
