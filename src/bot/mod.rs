//! Conversation state machine.
//!
//! `Bot::handle_turn` consumes one inbound turn and produces one reply. The
//! sender's `Dialog` (if any) decides which handler sees the text; handlers
//! live in the submodules, grouped by dialog.

mod browsing;
mod chat;
pub mod locks;
mod menu;
mod posting;
mod preferences;
mod registration;
pub mod replies;

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::matching::MatchingEngine;
use crate::messaging::{JobObserver, Messenger, NoopObserver};
use crate::models::{Dialog, ProfileUpdate, Role, User};
use crate::store::Store;

pub use locks::SenderLocks;

/// Result of a single handler; `NotFound` is recovered from, anything else fails the turn
type Reply = Result<String, StoreError>;

pub struct Bot {
    store: Arc<dyn Store>,
    messenger: Arc<dyn Messenger>,
    observer: Arc<dyn JobObserver>,
    engine: MatchingEngine,
    locks: SenderLocks,
}

impl Bot {
    pub fn new(store: Arc<dyn Store>, messenger: Arc<dyn Messenger>, engine: MatchingEngine) -> Self {
        Self {
            store,
            messenger,
            observer: Arc::new(NoopObserver),
            engine,
            locks: SenderLocks::new(),
        }
    }

    /// Replace the hook called after each new posting
    pub fn with_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Process one turn from `sender` and return the reply.
    ///
    /// Turns from the same sender are applied one at a time, in arrival
    /// order. An `Err` means the store failed; the reply text never carries
    /// error detail.
    pub async fn handle_turn(
        &self,
        sender: &str,
        text: &str,
        attachment: Option<&str>,
    ) -> anyhow::Result<String> {
        let _guard = self.locks.acquire(sender).await;
        let text = text.trim();
        let attachment = attachment.map(str::trim).filter(|a| !a.is_empty());
        debug!(%sender, %text, has_attachment = attachment.is_some(), "📩 Turn received");

        match self.dispatch(sender, text, attachment).await {
            Ok(reply) => Ok(reply),
            Err(StoreError::NotFound { entity, id }) => {
                warn!(%sender, entity, %id, "Referenced record is gone, returning to menu");
                self.recover(sender)
                    .await
                    .with_context(|| format!("Failed to recover session for {sender}"))
            }
            Err(e) => {
                Err(e).with_context(|| format!("Failed to handle turn from {sender}"))
            }
        }
    }

    async fn dispatch(&self, sender: &str, text: &str, attachment: Option<&str>) -> Reply {
        if text.eq_ignore_ascii_case("menu") {
            return self.menu_command(sender).await;
        }
        if text.eq_ignore_ascii_case("help") {
            return Ok(replies::help());
        }

        let user = self.store.get_user(sender).await?;

        if let Some(session) = self.store.get_session(sender).await? {
            return self
                .handle_state(sender, user, session.dialog, text, attachment)
                .await;
        }

        match user {
            None => self.welcome(sender).await,
            Some(user) if user.registered => {
                if is_bare_number(text) {
                    self.menu_selection(&user, text).await
                } else {
                    self.main_menu(&user).await
                }
            }
            Some(_) => self.welcome(sender).await,
        }
    }

    async fn handle_state(
        &self,
        sender: &str,
        user: Option<User>,
        dialog: Dialog,
        text: &str,
        attachment: Option<&str>,
    ) -> Reply {
        let user = match user {
            Some(user) => user,
            // Role selection is the only state that runs before the user exists
            None if dialog == Dialog::AwaitingRole => return self.choose_role(sender, text).await,
            None => return Err(not_found("user", sender)),
        };

        match dialog {
            Dialog::AwaitingRole => self.choose_role(sender, text).await,

            Dialog::FarmerName => self.farmer_name(&user, text).await,
            Dialog::FarmerLocation => self.farmer_location(&user, text).await,
            Dialog::FarmerIdPhoto => self.farmer_id_photo(&user, attachment).await,

            Dialog::PreferenceWorkTypes => self.preference_work_types(&user, text).await,
            Dialog::PreferenceDistance => self.preference_distance(&user, text).await,
            Dialog::PreferenceHours => self.preference_hours(&user, text).await,

            Dialog::UpdateMenu => self.update_menu(&user, text).await,
            Dialog::UpdateWorkTypes => self.update_work_types(&user, text).await,
            Dialog::UpdateLocation => self.update_location(&user, text).await,
            Dialog::UpdatePayRate => self.update_pay_rate(&user, text).await,
            Dialog::UpdateDistance => self.update_distance(&user, text).await,
            Dialog::UpdateHours => self.update_hours(&user, text).await,

            Dialog::OwnerName => self.owner_name(&user, text).await,
            Dialog::OwnerFarmName => self.owner_farm_name(&user, text).await,
            Dialog::OwnerLocation => self.owner_location(&user, text).await,

            Dialog::PostingJob { step, draft } => self.posting_step(&user, step, draft, text).await,

            Dialog::SelectingJob { jobs } => self.select_job(&user, jobs, text).await,
            Dialog::ViewingJob { job_id, jobs } => {
                self.viewing_job(&user, job_id, jobs, text).await
            }
            Dialog::ReviewingJob {
                jobs,
                index,
                reasons,
            } => self.reviewing_job(&user, jobs, index, reasons, text).await,

            Dialog::ChoosingChatPartner { partners } => {
                self.choose_chat_partner(&user, partners, text).await
            }
            Dialog::Chatting { with } => self.chatting(&user, &with, text).await,
        }
    }

    /// Global "menu": abandon whatever dialog is in progress
    async fn menu_command(&self, sender: &str) -> Reply {
        match self.store.get_user(sender).await? {
            Some(user) if user.registered => self.main_menu(&user).await,
            _ => self.welcome(sender).await,
        }
    }

    async fn welcome(&self, sender: &str) -> Reply {
        self.store.set_session(sender, Dialog::AwaitingRole).await?;
        Ok(replies::welcome())
    }

    /// Clear any dialog and show the role's numbered menu
    async fn main_menu(&self, user: &User) -> Reply {
        self.store.clear_session(&user.phone).await?;
        Ok(match user.role {
            Role::Farmer => replies::farmer_menu(),
            Role::FarmOwner => replies::owner_menu(),
        })
    }

    /// `main_menu`, preceded by `message`
    async fn then_main_menu(&self, user: &User, message: impl AsRef<str>) -> Reply {
        let menu = self.main_menu(user).await?;
        Ok(replies::join(message, menu))
    }

    /// Apologize and fall back to a safe menu, dropping the dialog
    async fn recover(&self, sender: &str) -> Reply {
        let menu = match self.store.get_user(sender).await? {
            Some(user) if user.registered => self.main_menu(&user).await?,
            _ => self.welcome(sender).await?,
        };
        Ok(replies::join(replies::apology(), menu))
    }

    async fn set_dialog(&self, user: &User, dialog: Dialog) -> Result<(), StoreError> {
        self.store.set_session(&user.phone, dialog).await
    }

    /// Merge `update` into the sender's profile, failing if the user vanished
    async fn update_profile(&self, user: &User, update: ProfileUpdate) -> Result<(), StoreError> {
        if self.store.update_profile(&user.phone, update).await? {
            Ok(())
        } else {
            Err(not_found("user", &user.phone))
        }
    }

    /// Best-effort outbound message; failures are logged and dropped
    async fn relay(&self, to: &str, text: &str) {
        match self.messenger.send_message(to, text).await {
            Ok(()) => info!(%to, transport = self.messenger.name(), "Message relayed"),
            Err(e) => warn!(%to, transport = self.messenger.name(), error = %e, "Failed to relay message"),
        }
    }
}

fn not_found(entity: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

fn is_bare_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Parse a 1-based selection into a 0-based index below `len`
fn parse_selection(text: &str, len: usize) -> Option<usize> {
    let choice: usize = text.trim().parse().ok()?;
    (1..=len).contains(&choice).then(|| choice - 1)
}
