//! Direct chat relay between a farmer and a farm owner.
//!
//! A bridge is one-sided: the sender forwards into the counterpart's inbox
//! until "endchat". The counterpart answers by opening a chat of their own.

use tracing::debug;

use super::{parse_selection, replies, Bot, Reply};
use crate::error::StoreError;
use crate::models::{Dialog, Role, User};

impl Bot {
    /// People `user` has an application in common with, in first-seen order
    async fn chat_partners(&self, user: &User) -> Result<Vec<String>, StoreError> {
        let mut candidates = Vec::new();
        match user.role {
            Role::Farmer => {
                for m in self.store.get_matches_for_farmer(&user.phone).await? {
                    if let Some(job) = self.store.get_job(&m.job_id).await? {
                        candidates.push(job.owner_phone);
                    }
                }
            }
            Role::FarmOwner => {
                for job in self.store.get_jobs_for_owner(&user.phone).await? {
                    for m in self.store.get_matches_for_job(&job.job_id).await? {
                        candidates.push(m.farmer_phone);
                    }
                }
            }
        }

        let mut partners: Vec<String> = Vec::new();
        for phone in candidates {
            if !phone.is_empty() && phone != user.phone && !partners.contains(&phone) {
                partners.push(phone);
            }
        }
        Ok(partners)
    }

    pub(super) async fn list_chat_partners(&self, user: &User) -> Reply {
        let partners = self.chat_partners(user).await?;
        if partners.is_empty() {
            let hint = match user.role {
                Role::Farmer => "Apply to a job first, then you can chat with its farm owner.",
                Role::FarmOwner => "Once workers apply to your jobs you can chat with them here.",
            };
            return self
                .then_main_menu(user, replies::no_chat_partners(hint))
                .await;
        }

        let mut names = Vec::with_capacity(partners.len());
        for phone in &partners {
            names.push(self.partner_label(phone).await?);
        }
        self.set_dialog(user, Dialog::ChoosingChatPartner { partners })
            .await?;
        Ok(replies::chat_partners(&names))
    }

    pub(super) async fn choose_chat_partner(
        &self,
        user: &User,
        partners: Vec<String>,
        text: &str,
    ) -> Reply {
        let Some(index) = parse_selection(text, partners.len()) else {
            return Ok(replies::selection_reprompt(partners.len()));
        };

        let with = partners[index].clone();
        let name = self.display_name(&with, "User").await?;
        self.set_dialog(user, Dialog::Chatting { with }).await?;
        Ok(replies::chat_started(&name))
    }

    pub(super) async fn chatting(&self, user: &User, with: &str, text: &str) -> Reply {
        if text.eq_ignore_ascii_case("endchat") {
            return self.then_main_menu(user, replies::chat_ended()).await;
        }
        if text.is_empty() {
            return Ok(replies::chat_empty_reprompt());
        }

        debug!(sender = %user.phone, %with, "Forwarding chat message");
        let sender_name = user.profile.display_name("User");
        self.relay(with, &replies::chat_relay(sender_name, text))
            .await;
        Ok(replies::chat_sent())
    }

    /// Profile name of `phone`, or `fallback` if unknown
    pub(super) async fn display_name(&self, phone: &str, fallback: &str) -> Result<String, StoreError> {
        Ok(self
            .store
            .get_user(phone)
            .await?
            .and_then(|u| u.profile.name)
            .unwrap_or_else(|| fallback.to_string()))
    }

    /// Name plus farm, for owners
    async fn partner_label(&self, phone: &str) -> Result<String, StoreError> {
        let Some(partner) = self.store.get_user(phone).await? else {
            return Ok(phone.to_string());
        };
        let name = partner.profile.display_name(phone);
        Ok(match &partner.profile.farm_name {
            Some(farm) => format!("{name} ({farm})"),
            None => name.to_string(),
        })
    }
}
