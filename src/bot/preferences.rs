use super::{replies, Bot, Reply};
use crate::matching::ALL_TYPES;
use crate::models::{Dialog, HoursPreference, Profile, ProfileUpdate, User};

/// Work-type vocabulary offered at registration
const WORK_TYPES: [(&str, &str); 6] = [
    ("1", "Harvesting"),
    ("2", "Planting"),
    ("3", "Irrigation"),
    ("4", "Livestock care"),
    ("5", "General labor"),
    ("6", ALL_TYPES),
];

/// Travel distance menu, in miles
const DISTANCES: [(&str, u32); 4] = [
    ("1", 10),
    ("2", 25),
    ("3", 50),
    ("4", Profile::ANY_DISTANCE_MILES),
];

/// Map "1, 3" style replies to a comma-separated work-type list.
///
/// Unknown tokens are ignored; picking "all types" stores only the sentinel.
fn parse_work_types(text: &str) -> Option<String> {
    let mut selected: Vec<&str> = Vec::new();
    for token in text.split(',').map(str::trim) {
        let Some((_, label)) = WORK_TYPES.iter().find(|(key, _)| *key == token) else {
            continue;
        };
        if *label == ALL_TYPES {
            return Some(ALL_TYPES.to_string());
        }
        if !selected.contains(label) {
            selected.push(*label);
        }
    }

    (!selected.is_empty()).then(|| selected.join(", "))
}

fn parse_distance(text: &str) -> Option<u32> {
    DISTANCES
        .iter()
        .find(|(key, _)| *key == text)
        .map(|(_, miles)| *miles)
}

/// Dollar amount as typed by a user, e.g. "$18.50"
pub(super) fn parse_amount(text: &str) -> Option<f64> {
    text.replace('$', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

impl Bot {
    // ── Collection after registration ───────────────────────────────────────

    pub(super) async fn preference_work_types(&self, user: &User, text: &str) -> Reply {
        let Some(work_types) = parse_work_types(text) else {
            return Ok(replies::work_type_reprompt());
        };
        self.update_profile(
            user,
            ProfileUpdate {
                work_types: Some(work_types),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.set_dialog(user, Dialog::PreferenceDistance).await?;
        Ok(replies::distance_menu())
    }

    pub(super) async fn preference_distance(&self, user: &User, text: &str) -> Reply {
        let Some(miles) = parse_distance(text) else {
            return Ok(replies::distance_reprompt());
        };
        self.update_profile(
            user,
            ProfileUpdate {
                max_distance: Some(miles),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.set_dialog(user, Dialog::PreferenceHours).await?;
        Ok(replies::hours_menu())
    }

    /// Final preference step: store it and go straight to recommendations
    pub(super) async fn preference_hours(&self, user: &User, text: &str) -> Reply {
        let Some(hours) = HoursPreference::from_choice(text) else {
            return Ok(replies::hours_reprompt());
        };
        self.update_profile(
            user,
            ProfileUpdate {
                hours_preference: Some(hours),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.store.clear_session(&user.phone).await?;
        self.recommend(&user.phone, true).await
    }

    // ── Update submenu ──────────────────────────────────────────────────────

    pub(super) async fn open_update_menu(&self, user: &User) -> Reply {
        self.set_dialog(user, Dialog::UpdateMenu).await?;
        Ok(replies::update_menu())
    }

    pub(super) async fn update_menu(&self, user: &User, text: &str) -> Reply {
        let profile = &user.profile;
        let (next, prompt) = match text {
            "1" => (Dialog::UpdateWorkTypes, replies::update_work_types_prompt(profile)),
            "2" => (Dialog::UpdateLocation, replies::update_location_prompt(profile)),
            "3" => (Dialog::UpdatePayRate, replies::update_pay_rate_prompt(profile)),
            "4" => (Dialog::UpdateDistance, replies::update_distance_prompt(profile)),
            "5" => (Dialog::UpdateHours, replies::update_hours_prompt(profile)),
            "6" => return self.main_menu(user).await,
            _ => return Ok(replies::update_menu_reprompt()),
        };
        self.set_dialog(user, next).await?;
        Ok(prompt)
    }

    pub(super) async fn update_work_types(&self, user: &User, text: &str) -> Reply {
        if text.is_empty() {
            return Ok(replies::not_empty_reprompt("preferred work types"));
        }
        self.update_profile(
            user,
            ProfileUpdate {
                work_types: Some(text.to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.then_main_menu(user, replies::updated("Work Type", text))
            .await
    }

    pub(super) async fn update_location(&self, user: &User, text: &str) -> Reply {
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
        self.then_main_menu(user, replies::updated("Location", text))
            .await
    }

    pub(super) async fn update_pay_rate(&self, user: &User, text: &str) -> Reply {
        let Some(rate) = parse_amount(text) else {
            return Ok(replies::pay_rate_reprompt());
        };
        self.update_profile(
            user,
            ProfileUpdate {
                min_pay_rate: Some(rate),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.then_main_menu(user, replies::updated("Pay Rate", &format!("${rate}/hour")))
            .await
    }

    pub(super) async fn update_distance(&self, user: &User, text: &str) -> Reply {
        let Ok(miles) = text.parse::<u32>() else {
            return Ok(replies::whole_number_reprompt(20));
        };
        self.update_profile(
            user,
            ProfileUpdate {
                max_distance: Some(miles),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.then_main_menu(
            user,
            replies::updated("Travel Distance", &format!("{miles} miles")),
        )
        .await
    }

    pub(super) async fn update_hours(&self, user: &User, text: &str) -> Reply {
        let Some(hours) = HoursPreference::from_choice(text) else {
            return Ok(replies::hours_reprompt());
        };
        self.update_profile(
            user,
            ProfileUpdate {
                hours_preference: Some(hours),
                ..ProfileUpdate::default()
            },
        )
        .await?;
        self.then_main_menu(user, replies::updated("Hours Preference", hours.as_str()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_type_tokens_map_to_labels() {
        assert_eq!(
            parse_work_types("1, 3").as_deref(),
            Some("Harvesting, Irrigation")
        );
        assert_eq!(parse_work_types("2,2,9").as_deref(), Some("Planting"));
        assert_eq!(parse_work_types("1,6").as_deref(), Some(ALL_TYPES));
        assert_eq!(parse_work_types("7, x"), None);
    }

    #[test]
    fn distance_sentinel_for_any() {
        assert_eq!(parse_distance("2"), Some(25));
        assert_eq!(parse_distance("4"), Some(Profile::ANY_DISTANCE_MILES));
        assert_eq!(parse_distance("5"), None);
    }

    #[test]
    fn amounts_accept_dollar_sign() {
        assert_eq!(parse_amount("$18.50"), Some(18.5));
        assert_eq!(parse_amount(" 150 "), Some(150.0));
        assert_eq!(parse_amount("-3"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("lots"), None);
    }
}
