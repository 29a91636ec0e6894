use tracing::{info, warn};

use super::preferences::parse_amount;
use super::{not_found, replies, Bot, Reply};
use crate::models::session::OWN_TRANSPORT_MEETING_POINT;
use crate::models::{Dialog, JobDraft, PaymentKind, PostingStep, Transportation, User};

/// What a posting step does with one reply
enum Advance {
    /// Input rejected; stay on the current step
    Reprompt(String),
    /// Input accepted; move to `step` and show its prompt
    Next(PostingStep, JobDraft, String),
}

impl Bot {
    pub(super) async fn start_posting(&self, user: &User) -> Reply {
        self.set_dialog(
            user,
            Dialog::PostingJob {
                step: PostingStep::WorkType,
                draft: JobDraft::default(),
            },
        )
        .await?;
        Ok(replies::posting_work_type_prompt())
    }

    pub(super) async fn posting_step(
        &self,
        user: &User,
        step: PostingStep,
        draft: JobDraft,
        text: &str,
    ) -> Reply {
        if step == PostingStep::Description {
            return self.finish_posting(user, draft, text).await;
        }

        match advance(step, draft, text) {
            Advance::Reprompt(message) => Ok(message),
            Advance::Next(step, draft, prompt) => {
                self.set_dialog(user, Dialog::PostingJob { step, draft })
                    .await?;
                Ok(prompt)
            }
        }
    }

    async fn finish_posting(&self, user: &User, draft: JobDraft, text: &str) -> Reply {
        if text.is_empty() {
            return Ok(replies::not_empty_reprompt("job details (or 'skip')"));
        }
        let Some(new_job) = draft.finish(text, user) else {
            warn!(sender = %user.phone, "Job draft incomplete at description step");
            return Err(not_found("job draft", &user.phone));
        };

        let job_id = self.store.create_job(new_job).await?;
        let job = self.load_job(&job_id).await?;
        info!(sender = %user.phone, %job_id, work_type = %job.work_type, "Job posted");

        self.observer.job_posted(&job).await;
        self.then_main_menu(user, replies::job_posted(&job)).await
    }
}

/// Validate `text` for `step` and fold it into the draft
fn advance(step: PostingStep, mut draft: JobDraft, text: &str) -> Advance {
    use Advance::{Next, Reprompt};

    match step {
        PostingStep::WorkType => {
            if text.is_empty() {
                return Reprompt(replies::not_empty_reprompt("type of work"));
            }
            draft.work_type = Some(text.to_string());
            Next(PostingStep::WorkersNeeded, draft, replies::workers_needed_prompt())
        }
        PostingStep::WorkersNeeded => match text.parse::<u32>() {
            Ok(workers) if workers > 0 => {
                draft.workers_needed = Some(workers);
                Next(PostingStep::WorkHours, draft, replies::work_hours_prompt())
            }
            _ => Reprompt(replies::whole_number_reprompt(5)),
        },
        PostingStep::WorkHours => {
            if text.is_empty() {
                return Reprompt(replies::not_empty_reprompt("work hours"));
            }
            draft.work_hours = Some(text.to_string());
            Next(PostingStep::PaymentType, draft, replies::payment_type_prompt())
        }
        PostingStep::PaymentType => match PaymentKind::from_choice(text) {
            Some(kind) => {
                draft.payment_kind = Some(kind);
                Next(
                    PostingStep::PaymentAmount,
                    draft,
                    replies::payment_amount_prompt(kind),
                )
            }
            None => Reprompt(replies::choice_reprompt("1, 2, or 3")),
        },
        PostingStep::PaymentAmount => match parse_amount(text) {
            Some(amount) => {
                draft.payment_amount = Some(amount);
                Next(PostingStep::Location, draft, replies::job_location_prompt())
            }
            None => Reprompt(replies::payment_amount_reprompt()),
        },
        PostingStep::Location => {
            if text.is_empty() {
                return Reprompt(replies::not_empty_reprompt("work location"));
            }
            draft.location = Some(text.to_string());
            Next(PostingStep::Transportation, draft, replies::transportation_prompt())
        }
        PostingStep::Transportation => match Transportation::from_choice(text) {
            Some(Transportation::Provided) => {
                draft.transportation = Some(Transportation::Provided);
                Next(PostingStep::MeetingPoint, draft, replies::meeting_point_prompt())
            }
            Some(Transportation::NotProvided) => {
                draft.transportation = Some(Transportation::NotProvided);
                draft.meeting_point = Some(OWN_TRANSPORT_MEETING_POINT.to_string());
                Next(PostingStep::Description, draft, replies::description_prompt())
            }
            None => Reprompt(replies::choice_reprompt("1 or 2")),
        },
        PostingStep::MeetingPoint => {
            if text.is_empty() {
                return Reprompt(replies::not_empty_reprompt("meeting point"));
            }
            draft.meeting_point = Some(text.to_string());
            Next(PostingStep::Description, draft, replies::description_prompt())
        }
        // Completion is handled by the caller
        PostingStep::Description => Reprompt(replies::description_prompt()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next_step(advance: Advance) -> (PostingStep, JobDraft) {
        match advance {
            Advance::Next(step, draft, _) => (step, draft),
            Advance::Reprompt(message) => panic!("unexpected reprompt: {message}"),
        }
    }

    #[test]
    fn workers_must_be_a_positive_integer() {
        for bad in ["0", "five", "-2", "2.5"] {
            assert!(matches!(
                advance(PostingStep::WorkersNeeded, JobDraft::default(), bad),
                Advance::Reprompt(_)
            ));
        }
        let (step, draft) = next_step(advance(PostingStep::WorkersNeeded, JobDraft::default(), "5"));
        assert_eq!(step, PostingStep::WorkHours);
        assert_eq!(draft.workers_needed, Some(5));
    }

    #[test]
    fn transportation_decides_whether_to_ask_for_meeting_point() {
        let (step, draft) = next_step(advance(PostingStep::Transportation, JobDraft::default(), "1"));
        assert_eq!(step, PostingStep::MeetingPoint);
        assert_eq!(draft.meeting_point, None);

        let (step, draft) = next_step(advance(PostingStep::Transportation, JobDraft::default(), "2"));
        assert_eq!(step, PostingStep::Description);
        assert_eq!(draft.meeting_point.as_deref(), Some(OWN_TRANSPORT_MEETING_POINT));
    }

    #[test]
    fn payment_amount_strips_dollar_sign() {
        let (_, draft) = next_step(advance(PostingStep::PaymentAmount, JobDraft::default(), "$18"));
        assert_eq!(draft.payment_amount, Some(18.0));
        assert!(matches!(
            advance(PostingStep::PaymentAmount, JobDraft::default(), "a lot"),
            Advance::Reprompt(_)
        ));
    }
}
