use crate::error::StoreError;
use crate::models::{
    Dialog, Job, Match, MatchStatus, NewJob, ProfileUpdate, Role, Session, User, UserUpdate,
};
use async_trait::async_trait;

/// Key-value persistence for users, jobs, matches and conversation state.
///
/// Implementations are responsible for their own atomicity per call; the bot
/// serializes turns per sender on top of that.
#[async_trait]
pub trait Store: Send + Sync {
    // ── Users ────────────────────────────────────────────────────────────────

    async fn get_user(&self, phone: &str) -> Result<Option<User>, StoreError>;

    /// Create (or reset) the user record for `phone`
    async fn create_user(&self, phone: &str, role: Role) -> Result<User, StoreError>;

    /// Apply `update` to the user record; a missing user is left alone
    async fn update_user(&self, phone: &str, update: UserUpdate) -> Result<(), StoreError>;

    /// Merge `update` into the profile; returns `false` if the user does not exist
    async fn update_profile(&self, phone: &str, update: ProfileUpdate)
        -> Result<bool, StoreError>;

    // ── Jobs ─────────────────────────────────────────────────────────────────

    /// Persist a new open job and return its generated id
    async fn create_job(&self, job: NewJob) -> Result<String, StoreError>;

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, StoreError>;

    /// Open jobs in posting order
    async fn get_open_jobs(&self) -> Result<Vec<Job>, StoreError>;

    /// Every job posted by `owner_phone`, in posting order
    async fn get_jobs_for_owner(&self, owner_phone: &str) -> Result<Vec<Job>, StoreError>;

    // ── Matches ──────────────────────────────────────────────────────────────

    /// Record an application; duplicates for the same pair are allowed
    async fn create_match(
        &self,
        job_id: &str,
        farmer_phone: &str,
        status: MatchStatus,
    ) -> Result<String, StoreError>;

    async fn get_matches_for_farmer(&self, farmer_phone: &str) -> Result<Vec<Match>, StoreError>;

    async fn get_matches_for_job(&self, job_id: &str) -> Result<Vec<Match>, StoreError>;

    // ── Conversation state ───────────────────────────────────────────────────

    async fn get_session(&self, phone: &str) -> Result<Option<Session>, StoreError>;

    async fn set_session(&self, phone: &str, dialog: Dialog) -> Result<(), StoreError>;

    async fn clear_session(&self, phone: &str) -> Result<(), StoreError>;
}
