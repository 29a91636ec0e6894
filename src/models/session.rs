use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HoursPreference, NewJob, PaymentKind, Transportation, User};

/// Placeholder meeting point when workers arrange their own transport
pub const OWN_TRANSPORT_MEETING_POINT: &str = "N/A - Workers arrange own transport";

/// Stored description when the owner skips the details step
pub const SKIPPED_DESCRIPTION: &str = "See job details above";

/// Where a sender currently is inside a multi-step dialog.
///
/// Each variant carries the scratch data its handler needs; no entry at all
/// means the sender is idle at the main menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Dialog {
    AwaitingRole,

    FarmerName,
    FarmerLocation,
    FarmerIdPhoto,

    PreferenceWorkTypes,
    PreferenceDistance,
    PreferenceHours,

    UpdateMenu,
    UpdateWorkTypes,
    UpdateLocation,
    UpdatePayRate,
    UpdateDistance,
    UpdateHours,

    OwnerName,
    OwnerFarmName,
    OwnerLocation,

    PostingJob {
        step: PostingStep,
        draft: JobDraft,
    },

    SelectingJob {
        jobs: Vec<String>,
    },
    ViewingJob {
        job_id: String,
        jobs: Vec<String>,
    },
    ReviewingJob {
        jobs: Vec<String>,
        index: usize,
        /// Oracle reason per job, parallel to `jobs`
        #[serde(default)]
        reasons: Vec<String>,
    },

    ChoosingChatPartner {
        partners: Vec<String>,
    },
    Chatting {
        with: String,
    },
}

/// Persisted conversation state for one sender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub dialog: Dialog,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(dialog: Dialog) -> Self {
        Self {
            dialog,
            updated_at: Utc::now(),
        }
    }
}

/// Steps of the job posting dialog, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingStep {
    WorkType,
    WorkersNeeded,
    WorkHours,
    PaymentType,
    PaymentAmount,
    Location,
    Transportation,
    MeetingPoint,
    Description,
}

/// Partially built job carried between posting steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers_needed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_kind: Option<PaymentKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transportation: Option<Transportation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_point: Option<String>,
}

impl JobDraft {
    /// Complete the draft with the final description and the owner's details.
    ///
    /// Returns `None` if any mandatory step is missing.
    pub fn finish(self, description: &str, owner: &User) -> Option<NewJob> {
        let kind = self.payment_kind?;
        let description = if description.trim().eq_ignore_ascii_case("skip") {
            SKIPPED_DESCRIPTION.to_string()
        } else {
            description.trim().to_string()
        };

        // Day rates imply a full shift; everything else is treated as flexible
        let schedule = match kind {
            PaymentKind::PerDay => HoursPreference::FullTime,
            PaymentKind::PerHour | PaymentKind::PerTask => HoursPreference::Flexible,
        };

        Some(NewJob {
            work_type: self.work_type?,
            workers_needed: self.workers_needed?,
            work_hours: self.work_hours?,
            payment: kind.with_amount(self.payment_amount?),
            location: self.location?,
            transportation: self.transportation,
            meeting_point: self.meeting_point,
            description: Some(description),
            owner_phone: owner.phone.clone(),
            owner_name: owner.profile.display_name("Farm Owner").to_string(),
            farm_name: owner
                .profile
                .farm_name
                .clone()
                .unwrap_or_else(|| "Farm".to_string()),
            schedule: Some(schedule),
        })
    }
}
