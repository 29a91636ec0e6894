use std::cmp::Ordering;

use crate::models::{Job, Profile};

/// Most recommendations returned for one request
pub const MAX_RESULTS: usize = 5;

/// Work-type preference that disables filtering
pub const ALL_TYPES: &str = "All types of work";

/// Whether a job's work type satisfies a comma-separated preference list.
///
/// Matching is case-insensitive containment in either direction, so
/// "harvest" matches "Tomato Harvest" and "Tomato Harvest" matches "harvest".
/// An empty entry (as in "Harvesting,") is contained in every work type.
pub fn work_type_matches(preferences: &str, job_type: &str) -> bool {
    let preferences = preferences.to_lowercase();
    if preferences.is_empty() || preferences.contains(&ALL_TYPES.to_lowercase()) {
        return true;
    }

    let job_type = job_type.to_lowercase();
    preferences
        .split(',')
        .map(str::trim)
        .any(|p| job_type.contains(p) || p.contains(job_type.as_str()))
}

/// Deterministic ranking: work-type filter, then highest effective hourly rate.
///
/// `min_pay_rate` is deliberately not applied here.
pub fn rule_based_match(jobs: Vec<Job>, profile: &Profile) -> Vec<Job> {
    let preferences = profile.work_types.as_deref().unwrap_or("");

    let mut matched: Vec<Job> = jobs
        .into_iter()
        .filter(|job| work_type_matches(preferences, &job.work_type))
        .collect();

    // Stable sort keeps posting order among equal rates
    matched.sort_by(|a, b| {
        b.payment
            .effective_hourly_rate()
            .partial_cmp(&a.payment.effective_hourly_rate())
            .unwrap_or(Ordering::Equal)
    });
    matched.truncate(MAX_RESULTS);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewJob, Payment};

    fn job(id: &str, work_type: &str, payment: Payment) -> Job {
        Job::open(
            id.to_string(),
            NewJob {
                work_type: work_type.to_string(),
                workers_needed: 2,
                work_hours: "7:00 AM - 3:00 PM".to_string(),
                payment,
                location: "Sacramento, CA".to_string(),
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

    fn prefs(work_types: &str) -> Profile {
        Profile {
            work_types: Some(work_types.to_string()),
            min_pay_rate: Some(15.0),
            ..Profile::default()
        }
    }

    fn sample_jobs() -> Vec<Job> {
        vec![
            job("JOB_001", "Harvesting", Payment::Legacy(18.5)),
            job("JOB_002", "Planting", Payment::Legacy(16.0)),
            job("JOB_003", "Irrigation", Payment::Legacy(22.0)),
            job("JOB_004", "General Labor", Payment::Legacy(14.0)),
        ]
    }

    fn ids(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|j| j.job_id.as_str()).collect()
    }

    #[test]
    fn filters_by_preferred_work_types() {
        let matched = rule_based_match(sample_jobs(), &prefs("Harvesting, Planting"));
        assert_eq!(ids(&matched), vec!["JOB_001", "JOB_002"]);
    }

    #[test]
    fn partial_lowercase_preference_matches() {
        let matched = rule_based_match(sample_jobs(), &prefs("harvest"));
        assert_eq!(ids(&matched), vec!["JOB_001"]);

        assert!(work_type_matches("harvest", "Tomato Harvest"));
        assert!(work_type_matches("Tomato Harvest, Weeding", "harvest"));
        assert!(!work_type_matches("Irrigation", "Tomato Harvest"));
    }

    #[test]
    fn empty_preferences_match_everything_sorted_by_rate() {
        let matched = rule_based_match(sample_jobs(), &prefs(""));
        assert_eq!(ids(&matched), vec!["JOB_003", "JOB_001", "JOB_002", "JOB_004"]);

        let unset = rule_based_match(sample_jobs(), &Profile::default());
        assert_eq!(unset.len(), 4);
    }

    #[test]
    fn all_types_sentinel_disables_filter() {
        let matched = rule_based_match(sample_jobs(), &prefs("Harvesting, All types of work"));
        assert_eq!(matched.len(), 4);
    }

    #[test]
    fn minimum_pay_is_not_enforced() {
        let matched = rule_based_match(sample_jobs(), &prefs("General Labor"));
        assert_eq!(ids(&matched), vec!["JOB_004"]);
    }

    #[test]
    fn ranks_by_effective_hourly_rate() {
        let jobs = vec![
            job("DAY", "Tomato Harvest", Payment::PerDay(150.0)),
            job("HOUR", "Harvesting", Payment::PerHour(20.0)),
            job("TASK", "Berry Harvest", Payment::PerTask(2.5)),
        ];

        let matched = rule_based_match(jobs, &prefs("harvest"));
        assert_eq!(ids(&matched), vec!["HOUR", "DAY", "TASK"]);
    }

    #[test]
    fn result_is_capped() {
        let jobs = (0..12)
            .map(|i| job(&format!("JOB_{i}"), "Weeding", Payment::PerHour(10.0 + i as f64)))
            .collect();

        let matched = rule_based_match(jobs, &Profile::default());
        assert_eq!(matched.len(), MAX_RESULTS);
        assert_eq!(matched[0].job_id, "JOB_11");
    }

    #[test]
    fn empty_entries_match_every_work_type() {
        assert!(work_type_matches("Planting,", "Irrigation"));
        assert!(work_type_matches(" , ", "Irrigation"));
        assert!(!work_type_matches("Planting, Weeding", "Irrigation"));

        let matched = rule_based_match(sample_jobs(), &prefs("Harvesting,"));
        assert_eq!(ids(&matched), vec!["JOB_003", "JOB_001", "JOB_002", "JOB_004"]);
    }
}
