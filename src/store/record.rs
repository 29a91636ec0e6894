//! On-disk job document and its conversion to the `Job` model.
//!
//! Job documents come in two payment schemas: `payment_type` +
//! `payment_amount`, or a flat hourly `pay_rate` from older postings. Both are
//! resolved into a single `Payment` here and nowhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamp;
use crate::models::{HoursPreference, Job, JobStatus, Payment, PaymentKind, Transportation};

fn default_status() -> JobStatus {
    JobStatus::Open
}

/// Posting time for documents that never recorded one; sorts before every dated job
fn unknown_posting_time() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Job as stored in `jobs.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecord {
    pub job_id: String,
    #[serde(
        default = "unknown_posting_time",
        deserialize_with = "timestamp::deserialize"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_status")]
    pub status: JobStatus,
    #[serde(default)]
    pub work_type: String,
    #[serde(default)]
    pub workers_needed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_rate: Option<f64>,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transportation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    /// Coarse schedule label ("full-time", "part-time", "flexible")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
}

impl JobRecord {
    fn payment(&self) -> Option<Payment> {
        let typed = self
            .payment_type
            .as_deref()
            .and_then(PaymentKind::from_label)
            .zip(self.payment_amount)
            .map(|(kind, amount)| kind.with_amount(amount));

        typed.or_else(|| self.pay_rate.map(Payment::Legacy))
    }
}

fn parse_transportation(label: &str) -> Option<Transportation> {
    match label.trim().to_lowercase().as_str() {
        "provided" | "yes" => Some(Transportation::Provided),
        "not provided" | "no" => Some(Transportation::NotProvided),
        _ => None,
    }
}

impl TryFrom<JobRecord> for Job {
    type Error = String;

    fn try_from(record: JobRecord) -> Result<Self, Self::Error> {
        let payment = record
            .payment()
            .ok_or_else(|| format!("job {} has no usable payment fields", record.job_id))?;

        Ok(Job {
            payment,
            transportation: record
                .transportation
                .as_deref()
                .and_then(parse_transportation),
            schedule: record.hours.as_deref().and_then(HoursPreference::parse),
            job_id: record.job_id,
            status: record.status,
            created_at: record.created_at,
            work_type: record.work_type,
            workers_needed: record.workers_needed,
            work_hours: record.work_hours.unwrap_or_default(),
            location: record.location,
            meeting_point: record.meeting_point,
            description: record.description,
            owner_phone: record.owner_phone,
            owner_name: record.owner_name.unwrap_or_else(|| "Farm Owner".to_string()),
            farm_name: record.farm_name.unwrap_or_else(|| "Farm".to_string()),
        })
    }
}

impl From<&Job> for JobRecord {
    fn from(job: &Job) -> Self {
        let (payment_type, payment_amount, pay_rate) = match job.payment.kind() {
            Some(kind) => (
                Some(kind.label().to_string()),
                Some(job.payment.amount()),
                None,
            ),
            None => (None, None, Some(job.payment.amount())),
        };

        Self {
            job_id: job.job_id.clone(),
            created_at: job.created_at,
            status: job.status,
            work_type: job.work_type.clone(),
            workers_needed: job.workers_needed,
            work_hours: Some(job.work_hours.clone()).filter(|h| !h.is_empty()),
            payment_type,
            payment_amount,
            pay_rate,
            location: job.location.clone(),
            transportation: job.transportation.map(|t| match t {
                Transportation::Provided => "provided".to_string(),
                Transportation::NotProvided => "not provided".to_string(),
            }),
            meeting_point: job.meeting_point.clone(),
            description: job.description.clone(),
            owner_phone: job.owner_phone.clone(),
            owner_name: Some(job.owner_name.clone()),
            farm_name: Some(job.farm_name.clone()),
            hours: job.schedule.map(|s| s.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Result<Job, String> {
        let record: JobRecord = serde_json::from_value(value).map_err(|e| e.to_string())?;
        Job::try_from(record)
    }

    #[test]
    fn typed_payment_wins_over_legacy_rate() {
        let job = decode(json!({
            "job_id": "JOB_V2_001",
            "work_type": "Tomato Harvest",
            "workers_needed": 5,
            "payment_type": "per day",
            "payment_amount": 150.0,
            "pay_rate": 12.0,
            "transportation": "provided",
            "hours": "full-time",
            "status": "open"
        }))
        .unwrap();

        assert_eq!(job.payment, Payment::PerDay(150.0));
        assert_eq!(job.transportation, Some(Transportation::Provided));
        assert_eq!(job.schedule, Some(HoursPreference::FullTime));
    }

    #[test]
    fn legacy_rate_is_decoded() {
        let job = decode(json!({
            "job_id": "JOB_001",
            "work_type": "Harvesting",
            "pay_rate": 18.5,
            "hours": "Full day"
        }))
        .unwrap();

        assert_eq!(job.payment, Payment::Legacy(18.5));
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.schedule, None);
        assert_eq!(job.farm_name, "Farm");
    }

    #[test]
    fn record_without_payment_is_rejected() {
        assert!(decode(json!({ "job_id": "JOB_X", "work_type": "Weeding" })).is_err());
    }

    #[test]
    fn encoding_keeps_the_schema_of_the_payment() {
        let job = decode(json!({
            "job_id": "JOB_001",
            "work_type": "Harvesting",
            "pay_rate": 18.5
        }))
        .unwrap();

        let record = JobRecord::from(&job);
        assert_eq!(record.pay_rate, Some(18.5));
        assert_eq!(record.payment_type, None);
        assert_eq!(Job::try_from(record).unwrap(), job);
    }

    #[test]
    fn undated_records_get_a_fixed_posting_time() {
        let undated = json!({ "job_id": "JOB_001", "work_type": "Harvesting", "pay_rate": 18.5 });
        let first = decode(undated.clone()).unwrap();
        let second = decode(undated).unwrap();

        assert_eq!(first.created_at, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(first.created_at, second.created_at);
    }

    #[test]
    fn naive_posting_time_is_read_as_utc() {
        let job = decode(json!({
            "job_id": "JOB_001",
            "work_type": "Harvesting",
            "pay_rate": 18.5,
            "created_at": "2025-01-01T08:00:00.123456"
        }))
        .unwrap();

        assert_eq!(job.created_at.to_rfc3339(), "2025-01-01T08:00:00.123456+00:00");
    }
}
