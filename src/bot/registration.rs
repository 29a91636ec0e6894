use tracing::info;

use super::{replies, Bot, Reply};
use crate::models::{Dialog, ProfileUpdate, Role, User, UserUpdate};

impl Bot {
    pub(super) async fn choose_role(&self, sender: &str, text: &str) -> Reply {
        let (role, next, prompt) = match text {
            "1" => (Role::Farmer, Dialog::FarmerName, replies::farmer_name_prompt()),
            "2" => (Role::FarmOwner, Dialog::OwnerName, replies::owner_name_prompt()),
            _ => return Ok(replies::role_reprompt()),
        };

        self.store.create_user(sender, role).await?;
        self.store.set_session(sender, next).await?;
        info!(%sender, ?role, "New user registering");
        Ok(prompt)
    }

    // ── Farmer ──────────────────────────────────────────────────────────────

    pub(super) async fn farmer_name(&self, user: &User, text: &str) -> Reply {
        if text.is_empty() {
            return Ok(replies::not_empty_reprompt("full name"));
        }
        self.update_profile(
            user,
            ProfileUpdate {
                name: Some(text.to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.set_dialog(user, Dialog::FarmerLocation).await?;
        Ok(replies::farmer_location_prompt(text))
    }

    pub(super) async fn farmer_location(&self, user: &User, text: &str) -> Reply {
        if text.is_empty() {
            return Ok(replies::not_empty_reprompt("location"));
        }
        self.update_profile(
            user,
            ProfileUpdate {
                location: Some(text.to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.set_dialog(user, Dialog::FarmerIdPhoto).await?;
        Ok(replies::id_photo_prompt())
    }

    /// Last mandatory farmer step; registration completes here
    pub(super) async fn farmer_id_photo(&self, user: &User, attachment: Option<&str>) -> Reply {
        let Some(photo) = attachment else {
            return Ok(replies::id_photo_reprompt());
        };

        self.update_profile(
            user,
            ProfileUpdate {
                id_verified: Some(true),
                id_photo_url: Some(photo.to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.store
            .update_user(
                &user.phone,
                UserUpdate {
                    registered: Some(true),
                },
            )
            .await?;
        self.set_dialog(user, Dialog::PreferenceWorkTypes).await?;

        info!(sender = %user.phone, "Farmer registered");
        Ok(replies::id_received())
    }

    // ── Farm owner ──────────────────────────────────────────────────────────

    pub(super) async fn owner_name(&self, user: &User, text: &str) -> Reply {
        if text.is_empty() {
            return Ok(replies::not_empty_reprompt("full name"));
        }
        self.update_profile(
            user,
            ProfileUpdate {
                name: Some(text.to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.set_dialog(user, Dialog::OwnerFarmName).await?;
        Ok(replies::farm_name_prompt())
    }

    pub(super) async fn owner_farm_name(&self, user: &User, text: &str) -> Reply {
        if text.is_empty() {
            return Ok(replies::not_empty_reprompt("farm name"));
        }
        self.update_profile(
            user,
            ProfileUpdate {
                farm_name: Some(text.to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.set_dialog(user, Dialog::OwnerLocation).await?;
        Ok(replies::farm_location_prompt())
    }

    pub(super) async fn owner_location(&self, user: &User, text: &str) -> Reply {
        if text.is_empty() {
            return Ok(replies::not_empty_reprompt("farm location"));
        }
        self.update_profile(
            user,
            ProfileUpdate {
                location: Some(text.to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.store
            .update_user(
                &user.phone,
                UserUpdate {
                    registered: Some(true),
                },
            )
            .await?;

        info!(sender = %user.phone, "Farm owner registered");
        self.then_main_menu(user, replies::owner_registered()).await
    }
}
