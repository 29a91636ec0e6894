use crate::models::{Job, Payment, Profile};

/// Pay line shown to the oracle, including the normalized hourly rate where it differs
pub fn pay_context(payment: &Payment) -> String {
    match *payment {
        Payment::PerDay(amount) => format!(
            "${}/day (${:.2}/hr effective)",
            amount,
            payment.effective_hourly_rate()
        ),
        Payment::PerHour(amount) | Payment::Legacy(amount) => format!("${}/hour", amount),
        Payment::PerTask(amount) => format!("${}/task (piece rate)", amount),
    }
}

/// Build the ranking prompt for one farmer and a list of candidate jobs
pub fn build_prompt(jobs: &[Job], profile: &Profile) -> String {
    let mut prompt = String::from(
        "You are a job matching assistant for agricultural workers. \
         Analyze the farmer's profile and the available jobs to find the best matches.\n\n",
    );

    let distance = match profile.max_distance {
        Some(Profile::ANY_DISTANCE_MILES) | None => "Any".to_string(),
        Some(miles) => format!("{} miles", miles),
    };

    prompt.push_str(&format!(
        "FARMER PROFILE:
- Name: {}
- Location: {}
- Preferred work types: {}
- Minimum pay rate: ${}/hour
- Maximum travel distance: {}
- Hours preference: {}
",
        profile.display_name("Unknown"),
        profile.location.as_deref().unwrap_or("Unknown"),
        profile.work_types.as_deref().unwrap_or("Any"),
        profile.min_pay_rate.unwrap_or(0.0),
        distance,
        profile
            .hours_preference
            .map(|h| h.as_str())
            .unwrap_or("Any"),
    ));

    prompt.push_str("\nAVAILABLE JOBS:\n");
    for (index, job) in jobs.iter().enumerate() {
        prompt.push_str(&format!(
            "
Job index {} (ID: {}):
- Farm: {}
- Work Type: {}
- Pay: {}
- Location: {}
- Schedule: {}
- Work Hours: {}
- Workers Needed: {}
- Description: {}
- Transportation: {}
",
            index,
            job.job_id,
            job.farm_name,
            job.work_type,
            pay_context(&job.payment),
            job.location,
            job.schedule.map(|s| s.as_str()).unwrap_or("Not specified"),
            job.work_hours,
            job.workers_needed,
            job.description.as_deref().unwrap_or("No description"),
            job.transportation
                .map(|t| t.to_string())
                .unwrap_or_else(|| "Not specified".to_string()),
        ));
    }

    prompt.push_str(RANKING_RULES);
    prompt
}

const RANKING_RULES: &str = r#"
TASK: Score each job from 0-100 based on how well it matches the farmer's preferences. Consider:
1. Pay rate vs minimum required (must meet minimum to be considered)
2. Work type alignment with preferences
3. Location/distance considerations
4. Schedule compatibility
5. Overall job quality and fit

RULES:
- Jobs that don't meet the minimum pay rate score 0
- Exact work type matches score higher than related types
- Reward semantic similarity (e.g. "Tomato Harvest" matches "Harvesting")
- Hours preference:
  - "full-time": the worker wants 40+ hours/week only
  - "part-time": the worker wants 20-40 hours/week only
  - "flexible": the worker accepts both full-time and part-time jobs

Return ONLY a JSON array sorted by score (highest first), using the job index shown above:
[
  {"job_index": 0, "score": 85, "reason": "Brief explanation"},
  {"job_index": 2, "score": 72, "reason": "Brief explanation"}
]

Only include jobs with score > 0. Return [] if no jobs match.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HoursPreference, NewJob};

    fn job(id: &str, payment: Payment) -> Job {
        Job::open(
            id.to_string(),
            NewJob {
                work_type: "Harvesting".to_string(),
                workers_needed: 3,
                work_hours: "6:00 AM - 2:00 PM".to_string(),
                payment,
                location: "Sacramento, CA".to_string(),
                transportation: None,
                meeting_point: None,
                description: None,
                owner_phone: "owner".to_string(),
                owner_name: "Sarah".to_string(),
                farm_name: "Test Farm".to_string(),
                schedule: Some(HoursPreference::FullTime),
            },
        )
    }

    #[test]
    fn prompt_includes_farmer_profile() {
        let profile = Profile {
            name: Some("Test Farmer".to_string()),
            location: Some("Sacramento, CA".to_string()),
            work_types: Some("Harvesting".to_string()),
            min_pay_rate: Some(15.5),
            max_distance: Some(25),
            hours_preference: Some(HoursPreference::FullTime),
            ..Profile::default()
        };

        let prompt = build_prompt(&[], &profile);

        assert!(prompt.contains("Test Farmer"));
        assert!(prompt.contains("Sacramento, CA"));
        assert!(prompt.contains("$15.5/hour"));
        assert!(prompt.contains("25 miles"));
        assert!(prompt.contains("Hours preference: full-time"));
    }

    #[test]
    fn prompt_lists_jobs_with_effective_rate() {
        let jobs = vec![
            job("JOB_A", Payment::PerDay(160.0)),
            job("JOB_B", Payment::PerTask(2.5)),
        ];

        let prompt = build_prompt(&jobs, &Profile::default());

        assert!(prompt.contains("Job index 0 (ID: JOB_A)"));
        assert!(prompt.contains("$160/day ($20.00/hr effective)"));
        assert!(prompt.contains("Job index 1 (ID: JOB_B)"));
        assert!(prompt.contains("$2.5/task (piece rate)"));
        assert!(prompt.contains("Test Farm"));
    }

    #[test]
    fn any_distance_sentinel_is_rendered_as_any() {
        let profile = Profile {
            max_distance: Some(Profile::ANY_DISTANCE_MILES),
            ..Profile::default()
        };

        assert!(build_prompt(&[], &profile).contains("Maximum travel distance: Any"));
    }

    #[test]
    fn missing_fields_use_placeholders_line_by_line() {
        let mut unscheduled = job("JOB_C", Payment::PerHour(18.0));
        unscheduled.schedule = None;

        let prompt = build_prompt(&[unscheduled], &Profile::default());

        assert!(prompt.contains(
            "- Minimum pay rate: $0/hour\n- Maximum travel distance: Any\n- Hours preference: Any\n"
        ));
        assert!(prompt.contains("- Schedule: Not specified\n- Work Hours: 6:00 AM - 2:00 PM\n"));
        assert!(prompt.contains(
            "- Description: No description\n- Transportation: Not specified\n"
        ));
        assert!(prompt.ends_with(RANKING_RULES));
    }
}
