use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{
    Dialog, Job, JobStatus, Match, MatchStatus, NewJob, ProfileUpdate, Role, Session, User,
    UserUpdate,
};
use crate::store::traits::Store;
use crate::store::{new_job_id, new_match_id};

/// Volatile in-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    jobs: RwLock<Vec<Job>>,
    matches: RwLock<Vec<Match>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed job, e.g. a fixture with a fixed id
    pub async fn insert_job(&self, job: Job) {
        self.jobs.write().await.push(job);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, phone: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(phone).cloned())
    }

    async fn create_user(&self, phone: &str, role: Role) -> Result<User, StoreError> {
        let user = User::new(phone, role);
        self.users
            .write()
            .await
            .insert(phone.to_string(), user.clone());
        Ok(user)
    }

    async fn update_user(&self, phone: &str, update: UserUpdate) -> Result<(), StoreError> {
        if let Some(user) = self.users.write().await.get_mut(phone) {
            if let Some(registered) = update.registered {
                user.registered = registered;
            }
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        phone: &str,
        update: ProfileUpdate,
    ) -> Result<bool, StoreError> {
        match self.users.write().await.get_mut(phone) {
            Some(user) => {
                user.profile.apply(update);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_job(&self, job: NewJob) -> Result<String, StoreError> {
        let job_id = new_job_id();
        self.jobs.write().await.push(Job::open(job_id.clone(), job));
        Ok(job_id)
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, StoreError> {
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .find(|job| job.job_id == job_id)
            .cloned())
    }

    async fn get_open_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .filter(|job| job.status == JobStatus::Open)
            .cloned()
            .collect())
    }

    async fn get_jobs_for_owner(&self, owner_phone: &str) -> Result<Vec<Job>, StoreError> {
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .filter(|job| job.owner_phone == owner_phone)
            .cloned()
            .collect())
    }

    async fn create_match(
        &self,
        job_id: &str,
        farmer_phone: &str,
        status: MatchStatus,
    ) -> Result<String, StoreError> {
        let match_id = new_match_id();
        self.matches.write().await.push(Match {
            match_id: match_id.clone(),
            job_id: job_id.to_string(),
            farmer_phone: farmer_phone.to_string(),
            status,
            created_at: Utc::now(),
        });
        Ok(match_id)
    }

    async fn get_matches_for_farmer(&self, farmer_phone: &str) -> Result<Vec<Match>, StoreError> {
        Ok(self
            .matches
            .read()
            .await
            .iter()
            .filter(|m| m.farmer_phone == farmer_phone)
            .cloned()
            .collect())
    }

    async fn get_matches_for_job(&self, job_id: &str) -> Result<Vec<Match>, StoreError> {
        Ok(self
            .matches
            .read()
            .await
            .iter()
            .filter(|m| m.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn get_session(&self, phone: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(phone).cloned())
    }

    async fn set_session(&self, phone: &str, dialog: Dialog) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(phone.to_string(), Session::new(dialog));
        Ok(())
    }

    async fn clear_session(&self, phone: &str) -> Result<(), StoreError> {
        self.sessions.write().await.remove(phone);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Payment, Profile};

    fn new_job(owner: &str) -> NewJob {
        NewJob {
            work_type: "Weeding".to_string(),
            workers_needed: 2,
            work_hours: "7:00 AM - 3:00 PM".to_string(),
            payment: Payment::PerHour(20.0),
            location: "Davis, CA".to_string(),
            transportation: None,
            meeting_point: None,
            description: None,
            owner_phone: owner.to_string(),
            owner_name: "Owner".to_string(),
            farm_name: "Farm".to_string(),
            schedule: None,
        }
    }

    #[tokio::test]
    async fn profile_updates_require_existing_user() {
        let store = MemoryStore::new();
        let update = ProfileUpdate {
            name: Some("Jane".to_string()),
            ..ProfileUpdate::default()
        };

        assert!(!store.update_profile("nobody", update.clone()).await.unwrap());

        store.create_user("w1", Role::Farmer).await.unwrap();
        assert!(store.update_profile("w1", update).await.unwrap());

        let user = store.get_user("w1").await.unwrap().unwrap();
        assert_eq!(
            user.profile,
            Profile {
                name: Some("Jane".to_string()),
                ..Profile::default()
            }
        );
        assert!(!user.registered);
    }

    #[tokio::test]
    async fn jobs_get_unique_ids_and_stay_in_order() {
        let store = MemoryStore::new();
        let first = store.create_job(new_job("o1")).await.unwrap();
        let second = store.create_job(new_job("o2")).await.unwrap();

        assert_ne!(first, second);
        let open: Vec<_> = store
            .get_open_jobs()
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.job_id)
            .collect();
        assert_eq!(open, vec![first.clone(), second]);

        let owned = store.get_jobs_for_owner("o1").await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].job_id, first);
    }

    #[tokio::test]
    async fn duplicate_applications_are_kept() {
        let store = MemoryStore::new();
        let job_id = store.create_job(new_job("o1")).await.unwrap();

        store
            .create_match(&job_id, "w1", MatchStatus::Accepted)
            .await
            .unwrap();
        store
            .create_match(&job_id, "w1", MatchStatus::Accepted)
            .await
            .unwrap();

        assert_eq!(store.get_matches_for_job(&job_id).await.unwrap().len(), 2);
        assert_eq!(store.get_matches_for_farmer("w1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn session_set_and_clear() {
        let store = MemoryStore::new();
        store.set_session("w1", Dialog::FarmerName).await.unwrap();

        let session = store.get_session("w1").await.unwrap().unwrap();
        assert_eq!(session.dialog, Dialog::FarmerName);

        store.clear_session("w1").await.unwrap();
        assert!(store.get_session("w1").await.unwrap().is_none());
    }
}
