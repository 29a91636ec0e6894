use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::{
    Dialog, Job, JobStatus, Match, MatchStatus, NewJob, ProfileUpdate, Role, Session, User,
    UserUpdate,
};
use crate::store::record::JobRecord;
use crate::store::traits::Store;
use crate::store::{new_job_id, new_match_id};

const USERS_FILE: &str = "users.json";
const JOBS_FILE: &str = "jobs.json";
const CONVERSATIONS_FILE: &str = "conversations.json";
const MATCHES_FILE: &str = "matches.json";

type Collection<T> = BTreeMap<String, T>;

/// Store backed by one JSON document per collection
pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes every read-modify-write against the files
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (and initialize if needed) a store rooted at `dir`
    pub async fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        for file in [USERS_FILE, JOBS_FILE, CONVERSATIONS_FILE, MATCHES_FILE] {
            let path = dir.join(file);
            if tokio::fs::metadata(&path).await.is_err() {
                tokio::fs::write(&path, "{}")
                    .await
                    .with_context(|| format!("Failed to initialize {}", path.display()))?;
                debug!("Initialized {}", path.display());
            }
        }

        info!("Using data directory {}", dir.display());
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a document as raw entries.
    ///
    /// A missing file is an empty collection. A file that does not parse is an
    /// error, so callers about to write never replace data they could not read.
    async fn load(&self, file: &str) -> Result<Collection<Value>, StoreError> {
        let path = self.dir.join(file);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Collection::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load a document for querying; an unparseable document reads as empty
    async fn load_for_read(&self, file: &str) -> Result<Collection<Value>, StoreError> {
        match self.load(file).await {
            Err(StoreError::Serialization(e)) => {
                warn!("Ignoring corrupt {}: {}", self.dir.join(file).display(), e);
                Ok(Collection::new())
            }
            other => other,
        }
    }

    /// Decode every entry of a document, skipping the ones that do not fit `T`
    async fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Collection<T>, StoreError> {
        let raw = self.load_for_read(file).await?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value(value) {
                Ok(entry) => Some((key, entry)),
                Err(e) => {
                    warn!(%key, "Skipping unreadable entry in {}: {}", file, e);
                    None
                }
            })
            .collect())
    }

    /// Decode a single entry that is about to be modified
    fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, StoreError> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Replace a collection, writing through a temp file so readers never see a partial document
    async fn write(&self, file: &str, collection: &Collection<Value>) -> Result<(), StoreError> {
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{file}.tmp"));
        let json = serde_json::to_string_pretty(collection)?;

        let io_err = |source| StoreError::Io {
            path: path.display().to_string(),
            source,
        };
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(io_err)?;
        Ok(())
    }

    /// Decode job documents, skipping any that cannot be resolved
    async fn read_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let raw = self.load_for_read(JOBS_FILE).await?;
        let mut jobs: Vec<Job> = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let record: JobRecord = match serde_json::from_value(value) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(job_id = %key, "Skipping unreadable job: {}", e);
                        return None;
                    }
                };
                match Job::try_from(record) {
                    Ok(job) => Some(job),
                    Err(reason) => {
                        warn!(job_id = %key, "Skipping job: {}", reason);
                        None
                    }
                }
            })
            .collect();

        jobs.sort_by_key(|job| job.created_at);
        Ok(jobs)
    }

    async fn read_matches(&self) -> Result<Vec<Match>, StoreError> {
        let matches: Collection<Match> = self.read(MATCHES_FILE).await?;
        let mut matches: Vec<Match> = matches.into_values().collect();
        matches.sort_by_key(|m| m.created_at);
        Ok(matches)
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn get_user(&self, phone: &str) -> Result<Option<User>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut users: Collection<User> = self.read(USERS_FILE).await?;
        Ok(users.remove(phone))
    }

    async fn create_user(&self, phone: &str, role: Role) -> Result<User, StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load(USERS_FILE).await?;
        let user = User::new(phone, role);
        users.insert(phone.to_string(), serde_json::to_value(&user)?);
        self.write(USERS_FILE, &users).await?;
        Ok(user)
    }

    async fn update_user(&self, phone: &str, update: UserUpdate) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load(USERS_FILE).await?;
        if let Some(entry) = users.get_mut(phone) {
            let mut user: User = Self::decode(entry)?;
            if let Some(registered) = update.registered {
                user.registered = registered;
            }
            *entry = serde_json::to_value(&user)?;
            self.write(USERS_FILE, &users).await?;
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        phone: &str,
        update: ProfileUpdate,
    ) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load(USERS_FILE).await?;
        let Some(entry) = users.get_mut(phone) else {
            return Ok(false);
        };
        let mut user: User = Self::decode(entry)?;
        user.profile.apply(update);
        *entry = serde_json::to_value(&user)?;
        self.write(USERS_FILE, &users).await?;
        Ok(true)
    }

    async fn create_job(&self, job: NewJob) -> Result<String, StoreError> {
        let _guard = self.lock.lock().await;
        let mut jobs = self.load(JOBS_FILE).await?;
        let job = Job::open(new_job_id(), job);
        let record = serde_json::to_value(JobRecord::from(&job))?;
        jobs.insert(job.job_id.clone(), record);
        self.write(JOBS_FILE, &jobs).await?;
        Ok(job.job_id)
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self
            .read_jobs()
            .await?
            .into_iter()
            .find(|job| job.job_id == job_id))
    }

    async fn get_open_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut jobs = self.read_jobs().await?;
        jobs.retain(|job| job.status == JobStatus::Open);
        Ok(jobs)
    }

    async fn get_jobs_for_owner(&self, owner_phone: &str) -> Result<Vec<Job>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut jobs = self.read_jobs().await?;
        jobs.retain(|job| job.owner_phone == owner_phone);
        Ok(jobs)
    }

    async fn create_match(
        &self,
        job_id: &str,
        farmer_phone: &str,
        status: MatchStatus,
    ) -> Result<String, StoreError> {
        let _guard = self.lock.lock().await;
        let mut matches = self.load(MATCHES_FILE).await?;
        let match_id = new_match_id();
        let record = Match {
            match_id: match_id.clone(),
            job_id: job_id.to_string(),
            farmer_phone: farmer_phone.to_string(),
            status,
            created_at: Utc::now(),
        };
        matches.insert(match_id.clone(), serde_json::to_value(&record)?);
        self.write(MATCHES_FILE, &matches).await?;
        Ok(match_id)
    }

    async fn get_matches_for_farmer(&self, farmer_phone: &str) -> Result<Vec<Match>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut matches = self.read_matches().await?;
        matches.retain(|m| m.farmer_phone == farmer_phone);
        Ok(matches)
    }

    async fn get_matches_for_job(&self, job_id: &str) -> Result<Vec<Match>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut matches = self.read_matches().await?;
        matches.retain(|m| m.job_id == job_id);
        Ok(matches)
    }

    async fn get_session(&self, phone: &str) -> Result<Option<Session>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut sessions: Collection<Session> = self.read(CONVERSATIONS_FILE).await?;
        Ok(sessions.remove(phone))
    }

    async fn set_session(&self, phone: &str, dialog: Dialog) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut sessions = self.load(CONVERSATIONS_FILE).await?;
        sessions.insert(phone.to_string(), serde_json::to_value(Session::new(dialog))?);
        self.write(CONVERSATIONS_FILE, &sessions).await
    }

    async fn clear_session(&self, phone: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut sessions = self.load(CONVERSATIONS_FILE).await?;
        if sessions.remove(phone).is_some() {
            self.write(CONVERSATIONS_FILE, &sessions).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Payment, PostingStep, JobDraft};
    use serde_json::json;

    fn new_job() -> NewJob {
        NewJob {
            work_type: "Corn Planting".to_string(),
            workers_needed: 4,
            work_hours: "7:00 AM - 3:00 PM".to_string(),
            payment: Payment::PerHour(18.0),
            location: "Woodland, CA".to_string(),
            transportation: None,
            meeting_point: None,
            description: Some("Plant corn seeds".to_string()),
            owner_phone: "owner".to_string(),
            owner_name: "Sarah".to_string(),
            farm_name: "Sunny Acres".to_string(),
            schedule: None,
        }
    }

    #[tokio::test]
    async fn open_creates_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data")).await.unwrap();

        for file in [USERS_FILE, JOBS_FILE, CONVERSATIONS_FILE, MATCHES_FILE] {
            let raw = std::fs::read_to_string(store.dir().join(file)).unwrap();
            assert_eq!(raw, "{}");
        }
    }

    #[tokio::test]
    async fn users_and_sessions_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::open(dir.path()).await.unwrap();
            store.create_user("w1", Role::Farmer).await.unwrap();
            store
                .update_user("w1", UserUpdate { registered: Some(true) })
                .await
                .unwrap();
            store
                .set_session(
                    "w1",
                    Dialog::PostingJob {
                        step: PostingStep::WorkersNeeded,
                        draft: JobDraft {
                            work_type: Some("Weeding".to_string()),
                            ..JobDraft::default()
                        },
                    },
                )
                .await
                .unwrap();
        }

        let store = JsonFileStore::open(dir.path()).await.unwrap();
        let user = store.get_user("w1").await.unwrap().unwrap();
        assert!(user.registered);
        assert_eq!(user.role, Role::Farmer);

        let session = store.get_session("w1").await.unwrap().unwrap();
        assert!(matches!(
            session.dialog,
            Dialog::PostingJob { step: PostingStep::WorkersNeeded, .. }
        ));
    }

    #[tokio::test]
    async fn legacy_and_broken_job_documents_are_handled_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        let jobs = json!({
            "JOB_001": { "job_id": "JOB_001", "work_type": "Harvesting", "pay_rate": 18.5,
                         "status": "open", "created_at": "2025-01-01T08:00:00Z" },
            "JOB_002": { "job_id": "JOB_002", "work_type": "Weeding",
                         "status": "open", "created_at": "2025-01-01T09:00:00Z" },
            "JOB_003": { "job_id": "JOB_003", "work_type": "Pruning", "pay_rate": 15.0,
                         "status": "closed", "created_at": "2025-01-01T10:00:00Z" }
        });
        std::fs::write(dir.path().join(JOBS_FILE), jobs.to_string()).unwrap();

        let open = store.get_open_jobs().await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].payment, Payment::Legacy(18.5));

        assert!(store.get_job("JOB_002").await.unwrap().is_none());
        assert!(store.get_job("JOB_003").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn created_jobs_and_matches_are_queryable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();

        let job_id = store.create_job(new_job()).await.unwrap();
        let job = store.get_job(&job_id).await.unwrap().unwrap();
        assert_eq!(job.payment, Payment::PerHour(18.0));
        assert_eq!(job.status, JobStatus::Open);

        store
            .create_match(&job_id, "w1", MatchStatus::Accepted)
            .await
            .unwrap();
        let matches = store.get_matches_for_job(&job_id).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].farmer_phone, "w1");
        assert_eq!(store.get_jobs_for_owner("owner").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_collection_reads_as_empty_but_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        std::fs::write(dir.path().join(USERS_FILE), "{not json").unwrap();

        assert!(store.get_user("w1").await.unwrap().is_none());
        assert!(matches!(
            store.create_user("w1", Role::Farmer).await,
            Err(StoreError::Serialization(_))
        ));
        assert!(store
            .update_profile("w1", ProfileUpdate::default())
            .await
            .is_err());

        let raw = std::fs::read_to_string(dir.path().join(USERS_FILE)).unwrap();
        assert_eq!(raw, "{not json");
    }

    #[tokio::test]
    async fn one_bad_record_does_not_cost_the_rest_of_the_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        let users = json!({
            "good": { "phone": "good", "type": "farmer", "registered": true,
                      "created_at": "2025-01-01T08:00:00Z" },
            "naive": { "phone": "naive", "type": "farm_owner",
                       "created_at": "2025-01-01T08:00:00.123456" },
            "broken": { "phone": "broken", "type": "astronaut",
                        "created_at": "2025-01-01T08:00:00Z" }
        });
        std::fs::write(dir.path().join(USERS_FILE), users.to_string()).unwrap();

        assert!(store.get_user("good").await.unwrap().unwrap().registered);
        assert_eq!(
            store.get_user("naive").await.unwrap().unwrap().role,
            Role::FarmOwner
        );
        assert!(store.get_user("broken").await.unwrap().is_none());

        store.create_user("new", Role::Farmer).await.unwrap();
        assert!(store
            .update_profile(
                "good",
                ProfileUpdate {
                    name: Some("Jane".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap());

        let raw = std::fs::read_to_string(dir.path().join(USERS_FILE)).unwrap();
        let on_disk: Collection<Value> = serde_json::from_str(&raw).unwrap();
        let keys: Vec<&str> = on_disk.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["broken", "good", "naive", "new"]);
        assert_eq!(on_disk["broken"]["type"], "astronaut");
        assert_eq!(on_disk["good"]["profile"]["name"], "Jane");
    }

    #[tokio::test]
    async fn undated_legacy_jobs_sort_before_dated_ones() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        let jobs = json!({
            "JOB_A": { "job_id": "JOB_A", "work_type": "Weeding", "pay_rate": 15.0,
                       "created_at": "2025-01-01T08:00:00Z" },
            "JOB_B": { "job_id": "JOB_B", "work_type": "Harvesting", "pay_rate": 18.5 }
        });
        std::fs::write(dir.path().join(JOBS_FILE), jobs.to_string()).unwrap();

        for _ in 0..2 {
            let ids: Vec<String> = store
                .get_open_jobs()
                .await
                .unwrap()
                .into_iter()
                .map(|job| job.job_id)
                .collect();
            assert_eq!(ids, vec!["JOB_B", "JOB_A"]);
        }
    }
}
