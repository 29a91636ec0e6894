use tracing::info;

use super::{not_found, parse_selection, replies, Bot, Reply};
use crate::error::StoreError;
use crate::models::{Dialog, Job, MatchStatus, User};

impl Bot {
    /// Rank open jobs for the farmer at `phone` and present them.
    ///
    /// Oracle-ranked results are shown one at a time with their reasons;
    /// rule-based results are shown as a numbered list.
    pub(super) async fn recommend(&self, phone: &str, profile_completed: bool) -> Reply {
        let user = self
            .store
            .get_user(phone)
            .await?
            .ok_or_else(|| not_found("user", phone))?;
        let heading = replies::recommendations_heading(profile_completed);

        let open = self.store.get_open_jobs().await?;
        let candidates = open.len();
        let ranked = self.engine.rank(open, &user.profile).await;
        info!(sender = %phone, candidates, matched = ranked.len(), "Recommendations ready");

        let Some(first) = ranked.first() else {
            return self.then_main_menu(&user, replies::no_matches(heading)).await;
        };

        if first.verdict.is_some() {
            let card = replies::review_card(
                &first.job,
                first.verdict.as_ref().map(|v| v.reason.as_str()),
                0,
                ranked.len(),
            );
            let (jobs, reasons): (Vec<String>, Vec<String>) = ranked
                .into_iter()
                .map(|m| {
                    let reason = m.verdict.map(|v| v.reason).unwrap_or_default();
                    (m.job.job_id, reason)
                })
                .unzip();
            self.set_dialog(
                &user,
                Dialog::ReviewingJob {
                    jobs,
                    index: 0,
                    reasons,
                },
            )
            .await?;
            return Ok(card);
        }

        let jobs: Vec<Job> = ranked.into_iter().map(|m| m.job).collect();
        self.show_job_list(&user, heading, jobs).await
    }

    async fn show_job_list(&self, user: &User, heading: &str, jobs: Vec<Job>) -> Reply {
        let ids = jobs.iter().map(|job| job.job_id.clone()).collect();
        self.set_dialog(user, Dialog::SelectingJob { jobs: ids }).await?;
        Ok(replies::job_list(heading, &jobs))
    }

    pub(super) async fn select_job(&self, user: &User, jobs: Vec<String>, text: &str) -> Reply {
        let Some(index) = parse_selection(text, jobs.len()) else {
            return Ok(replies::selection_reprompt(jobs.len()));
        };

        let job = self.load_job(&jobs[index]).await?;
        let reply = replies::job_details(&job);
        self.set_dialog(
            user,
            Dialog::ViewingJob {
                job_id: job.job_id,
                jobs,
            },
        )
        .await?;
        Ok(reply)
    }

    pub(super) async fn viewing_job(
        &self,
        user: &User,
        job_id: String,
        jobs: Vec<String>,
        text: &str,
    ) -> Reply {
        if text == "1" {
            return self.apply(user, &job_id).await;
        }
        if text == "2" || text.eq_ignore_ascii_case("back") {
            return self.back_to_list(user, jobs).await;
        }
        Ok(replies::apply_or_back_reprompt())
    }

    /// Re-render the list, without jobs that disappeared in the meantime
    async fn back_to_list(&self, user: &User, ids: Vec<String>) -> Reply {
        let mut jobs = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(job) = self.store.get_job(id).await? {
                jobs.push(job);
            }
        }

        let heading = replies::recommendations_heading(false);
        if jobs.is_empty() {
            return self.then_main_menu(user, replies::no_matches(heading)).await;
        }
        self.show_job_list(user, heading, jobs).await
    }

    pub(super) async fn reviewing_job(
        &self,
        user: &User,
        jobs: Vec<String>,
        index: usize,
        reasons: Vec<String>,
        text: &str,
    ) -> Reply {
        let Some(current) = jobs.get(index).cloned() else {
            return self.main_menu(user).await;
        };

        match text {
            "1" => self.apply(user, &current).await,
            "2" => self.show_review(user, jobs, index + 1, reasons).await,
            _ => Ok(replies::review_reprompt()),
        }
    }

    /// Show the first job still on file at or after `index`
    async fn show_review(
        &self,
        user: &User,
        jobs: Vec<String>,
        mut index: usize,
        reasons: Vec<String>,
    ) -> Reply {
        while let Some(job_id) = jobs.get(index) {
            if let Some(job) = self.store.get_job(job_id).await? {
                let reason = reasons.get(index).map(String::as_str);
                let card = replies::review_card(&job, reason, index, jobs.len());
                self.set_dialog(
                    user,
                    Dialog::ReviewingJob {
                        jobs,
                        index,
                        reasons,
                    },
                )
                .await?;
                return Ok(card);
            }
            index += 1;
        }

        self.then_main_menu(user, replies::all_reviewed()).await
    }

    /// Record an application, tell the owner, and return to the farmer menu
    async fn apply(&self, user: &User, job_id: &str) -> Reply {
        let job = self.load_job(job_id).await?;
        let match_id = self
            .store
            .create_match(job_id, &user.phone, MatchStatus::Accepted)
            .await?;
        info!(sender = %user.phone, %job_id, %match_id, "Application submitted");

        if !job.owner_phone.is_empty() {
            self.relay(
                &job.owner_phone,
                &replies::new_application_notice(user, &job),
            )
            .await;
        }

        self.then_main_menu(user, replies::application_submitted(&job, &match_id))
            .await
    }

    pub(super) async fn load_job(&self, job_id: &str) -> Result<Job, StoreError> {
        self.store
            .get_job(job_id)
            .await?
            .ok_or_else(|| not_found("job", job_id))
    }
}
