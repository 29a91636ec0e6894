use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod session;
pub mod timestamp;

pub use session::{Dialog, JobDraft, PostingStep, Session};

/// Which side of the marketplace a user is on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Farmer,
    FarmOwner,
}

/// Preferred weekly schedule of a farmer, or the schedule a job offers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HoursPreference {
    FullTime,
    PartTime,
    Flexible,
}

impl HoursPreference {
    /// Map a numbered menu reply (1/2/3) to a preference
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::FullTime),
            "2" => Some(Self::PartTime),
            "3" => Some(Self::Flexible),
            _ => None,
        }
    }

    /// Lenient parse of stored labels such as "full-time" or "Part time"
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().replace(' ', "-").as_str() {
            "full-time" => Some(Self::FullTime),
            "part-time" => Some(Self::PartTime),
            "flexible" => Some(Self::Flexible),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Flexible => "flexible",
        }
    }
}

impl fmt::Display for HoursPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-dependent profile attributes, filled in one dialog step at a time.
///
/// Farmers use name, location, work types, pay, distance, hours and the ID
/// fields; farm owners use name, farm name and location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Comma-separated list of preferred work types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_types: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pay_rate: Option<f64>,
    /// Miles; `ANY_DISTANCE_MILES` means no limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_preference: Option<HoursPreference>,
    #[serde(default)]
    pub id_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
}

impl Profile {
    /// Sentinel distance stored for "any distance"
    pub const ANY_DISTANCE_MILES: u32 = 999;

    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }

    /// Merge the populated fields of `update` into this profile
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            name,
            location,
            work_types,
            min_pay_rate,
            max_distance,
            hours_preference,
            id_verified,
            id_photo_url,
            farm_name,
        } = update;

        if name.is_some() {
            self.name = name;
        }
        if location.is_some() {
            self.location = location;
        }
        if work_types.is_some() {
            self.work_types = work_types;
        }
        if min_pay_rate.is_some() {
            self.min_pay_rate = min_pay_rate;
        }
        if max_distance.is_some() {
            self.max_distance = max_distance;
        }
        if hours_preference.is_some() {
            self.hours_preference = hours_preference;
        }
        if let Some(verified) = id_verified {
            self.id_verified = verified;
        }
        if id_photo_url.is_some() {
            self.id_photo_url = id_photo_url;
        }
        if farm_name.is_some() {
            self.farm_name = farm_name;
        }
    }
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub work_types: Option<String>,
    pub min_pay_rate: Option<f64>,
    pub max_distance: Option<u32>,
    pub hours_preference: Option<HoursPreference>,
    pub id_verified: Option<bool>,
    pub id_photo_url: Option<String>,
    pub farm_name: Option<String>,
}

/// A registered (or registering) participant, keyed by phone identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub phone: String,
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub registered: bool,
    #[serde(default)]
    pub profile: Profile,
}

impl User {
    pub fn new(phone: &str, role: Role) -> Self {
        Self {
            phone: phone.to_string(),
            role,
            created_at: Utc::now(),
            registered: false,
            profile: Profile::default(),
        }
    }
}

/// Partial update of the user record itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub registered: Option<bool>,
}

/// Payment scheme picked while posting a job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    PerHour,
    PerDay,
    PerTask,
}

impl PaymentKind {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::PerHour),
            "2" => Some(Self::PerDay),
            "3" => Some(Self::PerTask),
            _ => None,
        }
    }

    /// Stored label, e.g. "per day"
    pub fn label(&self) -> &'static str {
        match self {
            Self::PerHour => "per hour",
            Self::PerDay => "per day",
            Self::PerTask => "per task",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "per hour" => Some(Self::PerHour),
            "per day" => Some(Self::PerDay),
            "per task" => Some(Self::PerTask),
            _ => None,
        }
    }

    pub fn with_amount(self, amount: f64) -> Payment {
        match self {
            Self::PerHour => Payment::PerHour(amount),
            Self::PerDay => Payment::PerDay(amount),
            Self::PerTask => Payment::PerTask(amount),
        }
    }
}

/// How a job pays. Exactly one shape per job, resolved when the record is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payment {
    PerHour(f64),
    PerDay(f64),
    PerTask(f64),
    /// Flat hourly `pay_rate` from records that predate payment types
    Legacy(f64),
}

impl Payment {
    pub const HOURS_PER_DAY: f64 = 8.0;

    /// Amount normalized to an hourly basis for ranking.
    ///
    /// Piece rates are taken at face value; they have no time basis to
    /// normalize against.
    pub fn effective_hourly_rate(&self) -> f64 {
        match *self {
            Payment::PerHour(amount) => amount,
            Payment::PerDay(amount) => amount / Self::HOURS_PER_DAY,
            Payment::PerTask(amount) => amount,
            Payment::Legacy(rate) => rate,
        }
    }

    pub fn amount(&self) -> f64 {
        match *self {
            Payment::PerHour(amount)
            | Payment::PerDay(amount)
            | Payment::PerTask(amount)
            | Payment::Legacy(amount) => amount,
        }
    }

    /// `None` for legacy flat-rate records
    pub fn kind(&self) -> Option<PaymentKind> {
        match self {
            Payment::PerHour(_) => Some(PaymentKind::PerHour),
            Payment::PerDay(_) => Some(PaymentKind::PerDay),
            Payment::PerTask(_) => Some(PaymentKind::PerTask),
            Payment::Legacy(_) => None,
        }
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payment::PerHour(amount) | Payment::Legacy(amount) => write!(f, "${}/hour", amount),
            Payment::PerDay(amount) => write!(f, "${}/day", amount),
            Payment::PerTask(amount) => write!(f, "${}/task", amount),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Transportation {
    #[serde(rename = "provided")]
    Provided,
    #[serde(rename = "not provided")]
    NotProvided,
}

impl Transportation {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Provided),
            "2" => Some(Self::NotProvided),
            _ => None,
        }
    }
}

impl fmt::Display for Transportation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transportation::Provided => f.write_str("Provided"),
            Transportation::NotProvided => f.write_str("Not provided"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Closed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Open => f.write_str("open"),
            JobStatus::Closed => f.write_str("closed"),
        }
    }
}

/// Job fields gathered by the posting dialog, before the store assigns an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub work_type: String,
    pub workers_needed: u32,
    pub work_hours: String,
    pub payment: Payment,
    pub location: String,
    pub transportation: Option<Transportation>,
    pub meeting_point: Option<String>,
    pub description: Option<String>,
    pub owner_phone: String,
    pub owner_name: String,
    pub farm_name: String,
    /// Coarse schedule used when comparing against hours preferences
    pub schedule: Option<HoursPreference>,
}

/// Core job posting model
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub job_id: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub work_type: String,
    pub workers_needed: u32,
    pub work_hours: String,
    pub payment: Payment,
    pub location: String,
    pub transportation: Option<Transportation>,
    pub meeting_point: Option<String>,
    pub description: Option<String>,
    pub owner_phone: String,
    pub owner_name: String,
    pub farm_name: String,
    pub schedule: Option<HoursPreference>,
}

impl Job {
    /// Open job built from posted fields
    pub fn open(job_id: String, new_job: NewJob) -> Self {
        let NewJob {
            work_type,
            workers_needed,
            work_hours,
            payment,
            location,
            transportation,
            meeting_point,
            description,
            owner_phone,
            owner_name,
            farm_name,
            schedule,
        } = new_job;

        Self {
            job_id,
            status: JobStatus::Open,
            created_at: Utc::now(),
            work_type,
            workers_needed,
            work_hours,
            payment,
            location,
            transportation,
            meeting_point,
            description,
            owner_phone,
            owner_name,
            farm_name,
            schedule,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Declined,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Pending => f.write_str("pending"),
            MatchStatus::Accepted => f.write_str("accepted"),
            MatchStatus::Declined => f.write_str("declined"),
        }
    }
}

/// A farmer's application to a job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub match_id: String,
    pub job_id: String,
    pub farmer_phone: String,
    pub status: MatchStatus,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}
