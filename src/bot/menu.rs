use super::{replies, Bot, Reply};
use crate::models::{Role, User};

impl Bot {
    /// Numbered choice typed at the idle main menu
    pub(super) async fn menu_selection(&self, user: &User, choice: &str) -> Reply {
        match (user.role, choice) {
            (Role::Farmer, "1") => self.recommend(&user.phone, false).await,
            (Role::Farmer, "2") => self.open_update_menu(user).await,
            (Role::Farmer, "3") => self.view_applications(user).await,

            (Role::FarmOwner, "1") => self.start_posting(user).await,
            (Role::FarmOwner, "2") => self.view_postings(user).await,
            (Role::FarmOwner, "3") => self.view_applicants(user).await,

            (_, "4") => self.list_chat_partners(user).await,
            (_, "5") => Ok(replies::help()),
            _ => self.main_menu(user).await,
        }
    }

    async fn view_applications(&self, user: &User) -> Reply {
        let matches = self.store.get_matches_for_farmer(&user.phone).await?;

        let mut entries = Vec::with_capacity(matches.len());
        for m in matches {
            if let Some(job) = self.store.get_job(&m.job_id).await? {
                entries.push((job, m));
            }
        }

        if entries.is_empty() {
            return self.then_main_menu(user, replies::no_applications()).await;
        }
        self.then_main_menu(user, replies::applications(&entries))
            .await
    }

    async fn view_postings(&self, user: &User) -> Reply {
        let jobs = self.store.get_jobs_for_owner(&user.phone).await?;
        if jobs.is_empty() {
            return self.then_main_menu(user, replies::no_postings()).await;
        }

        let mut entries = Vec::with_capacity(jobs.len());
        for job in jobs {
            let applications = self.store.get_matches_for_job(&job.job_id).await?.len();
            entries.push((job, applications));
        }
        self.then_main_menu(user, replies::postings(&entries)).await
    }

    async fn view_applicants(&self, user: &User) -> Reply {
        let jobs = self.store.get_jobs_for_owner(&user.phone).await?;
        if jobs.is_empty() {
            return self.then_main_menu(user, replies::no_postings()).await;
        }

        let mut entries = Vec::with_capacity(jobs.len());
        for job in jobs {
            let mut people = Vec::new();
            for m in self.store.get_matches_for_job(&job.job_id).await? {
                let name = self.display_name(&m.farmer_phone, "Unknown worker").await?;
                people.push((name, m.status.to_string()));
            }
            entries.push((job, people));
        }
        self.then_main_menu(user, replies::applicants(&entries)).await
    }
}
