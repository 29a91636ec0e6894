//! Sample farm owners and postings for trying the bot locally.

use tracing::info;

use crate::error::StoreError;
use crate::models::session::OWN_TRANSPORT_MEETING_POINT;
use crate::models::{
    HoursPreference, NewJob, Payment, ProfileUpdate, Role, Transportation, UserUpdate,
};
use crate::store::Store;

struct SampleOwner {
    phone: &'static str,
    name: &'static str,
    farm_name: &'static str,
    location: &'static str,
}

static SUNNY_ACRES: SampleOwner = SampleOwner {
    phone: "whatsapp:+15555550001",
    name: "Sarah Johnson",
    farm_name: "Sunny Acres Farm",
    location: "Sacramento, CA",
};

static BLUE_RIDGE: SampleOwner = SampleOwner {
    phone: "whatsapp:+19195550001",
    name: "James Wilson",
    farm_name: "Blue Ridge Farms",
    location: "Chapel Hill, NC",
};

struct SampleJob {
    owner: &'static SampleOwner,
    work_type: &'static str,
    workers_needed: u32,
    work_hours: &'static str,
    payment: Payment,
    location: &'static str,
    transportation: Option<Transportation>,
    meeting_point: Option<&'static str>,
    description: &'static str,
    schedule: HoursPreference,
}

impl SampleJob {
    fn to_new_job(&self) -> NewJob {
        NewJob {
            work_type: self.work_type.to_string(),
            workers_needed: self.workers_needed,
            work_hours: self.work_hours.to_string(),
            payment: self.payment,
            location: self.location.to_string(),
            transportation: self.transportation,
            meeting_point: self.meeting_point.map(str::to_string),
            description: Some(self.description.to_string()),
            owner_phone: self.owner.phone.to_string(),
            owner_name: self.owner.name.to_string(),
            farm_name: self.owner.farm_name.to_string(),
            schedule: Some(self.schedule),
        }
    }
}

fn sample_jobs() -> Vec<SampleJob> {
    vec![
        SampleJob {
            owner: &SUNNY_ACRES,
            work_type: "Tomato Harvest",
            workers_needed: 5,
            work_hours: "6:00 AM - 2:00 PM",
            payment: Payment::PerDay(150.0),
            location: "Green Valley Farm, Sacramento, CA",
            transportation: Some(Transportation::Provided),
            meeting_point: Some("Town Square, 5:45 AM pickup"),
            description: "Pick ripe tomatoes, sort by size. Bring water bottle and sun hat.",
            schedule: HoursPreference::FullTime,
        },
        SampleJob {
            owner: &SUNNY_ACRES,
            work_type: "Strawberry Picking",
            workers_needed: 8,
            work_hours: "5:00 AM - 12:00 PM",
            payment: Payment::PerDay(120.0),
            location: "Berry Fields Farm, Davis, CA",
            transportation: Some(Transportation::Provided),
            meeting_point: Some("Main Street Bus Stop, 4:45 AM pickup"),
            description: "Early morning harvest. Experience helpful but not required.",
            schedule: HoursPreference::PartTime,
        },
        SampleJob {
            owner: &SUNNY_ACRES,
            work_type: "Corn Planting",
            workers_needed: 4,
            work_hours: "7:00 AM - 3:00 PM",
            payment: Payment::PerHour(18.0),
            location: "Valley View Farm, Woodland, CA",
            transportation: Some(Transportation::NotProvided),
            meeting_point: Some(OWN_TRANSPORT_MEETING_POINT),
            description: "Plant corn seeds using machinery. Training provided.",
            schedule: HoursPreference::FullTime,
        },
        SampleJob {
            owner: &SUNNY_ACRES,
            work_type: "Orange Picking",
            workers_needed: 3,
            work_hours: "7:00 AM - 2:00 PM",
            payment: Payment::PerTask(25.0),
            location: "Citrus Grove, Elk Grove, CA",
            transportation: Some(Transportation::Provided),
            meeting_point: Some("Library parking lot, 6:45 AM"),
            description: "$25 per bin filled. Picking bags provided.",
            schedule: HoursPreference::Flexible,
        },
        SampleJob {
            owner: &BLUE_RIDGE,
            work_type: "Tobacco Harvesting",
            workers_needed: 8,
            work_hours: "",
            payment: Payment::Legacy(16.5),
            location: "Chapel Hill, NC",
            transportation: None,
            meeting_point: None,
            description: "Harvest tobacco leaves. Training provided.",
            schedule: HoursPreference::FullTime,
        },
    ]
}

async fn register_owner(store: &dyn Store, owner: &SampleOwner) -> Result<(), StoreError> {
    store.create_user(owner.phone, Role::FarmOwner).await?;
    store
        .update_profile(
            owner.phone,
            ProfileUpdate {
                name: Some(owner.name.to_string()),
                farm_name: Some(owner.farm_name.to_string()),
                location: Some(owner.location.to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await?;
    store
        .update_user(
            owner.phone,
            UserUpdate {
                registered: Some(true),
            },
        )
        .await
}

/// Register the sample owners and post their jobs; returns the new job ids
pub async fn seed_sample_data(store: &dyn Store) -> Result<Vec<String>, StoreError> {
    for owner in [&SUNNY_ACRES, &BLUE_RIDGE] {
        register_owner(store, owner).await?;
    }

    let mut ids = Vec::new();
    for job in sample_jobs() {
        ids.push(store.create_job(job.to_new_job()).await?);
    }

    info!("🌱 Seeded {} sample jobs", ids.len());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn seeding_registers_owners_and_opens_jobs() {
        let store = MemoryStore::new();
        let ids = seed_sample_data(&store).await.unwrap();

        assert_eq!(ids.len(), 5);
        assert_eq!(store.get_open_jobs().await.unwrap().len(), 5);

        let owner = store.get_user(SUNNY_ACRES.phone).await.unwrap().unwrap();
        assert!(owner.registered);
        assert_eq!(owner.profile.farm_name.as_deref(), Some("Sunny Acres Farm"));
        assert_eq!(
            store.get_jobs_for_owner(BLUE_RIDGE.phone).await.unwrap()[0].payment,
            Payment::Legacy(16.5)
        );
    }
}
