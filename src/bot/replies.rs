//! Outbound message text.
//!
//! Everything the bot says lives here so the handlers only decide *what* to
//! say next. None of these functions touch the store.

use crate::models::{Job, Match, PaymentKind, Profile, User};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

pub fn welcome() -> String {
    "🌾 *Welcome to FarmConnect!* 🌾

We connect agricultural workers with farm employers.

Please select your role:
1️⃣ I'm looking for farm work (Farmer/Laborer)
2️⃣ I'm hiring workers (Farm Owner)

Reply with 1 or 2"
        .to_string()
}

pub fn role_reprompt() -> String {
    "Please reply with 1 (for Farmer) or 2 (for Farm Owner)".to_string()
}

pub fn help() -> String {
    "❓ *FarmConnect Help*

• Type 'menu' anytime to return to main menu
• Type 'help' to see this message

For support, contact: support@farmconnect.com"
        .to_string()
}

pub fn farmer_menu() -> String {
    "🌾 *Farmer Menu*

1️⃣ Browse available jobs
2️⃣ Update my preferences
3️⃣ View my job applications
4️⃣ Chat with farm owner
5️⃣ Help

Reply with the number of your choice"
        .to_string()
}

pub fn owner_menu() -> String {
    "🏡 *Farm Owner Menu*

1️⃣ Post a new job
2️⃣ View my job postings
3️⃣ View applicants
4️⃣ Chat with applicants
5️⃣ Help

Reply with the number of your choice"
        .to_string()
}

pub fn apology() -> String {
    "Sorry, we couldn't find that anymore. Let's start again from the menu.".to_string()
}

pub fn not_empty_reprompt(what: &str) -> String {
    format!("Please type your {what}, or 'menu' to go back.")
}

// ── Farmer registration ─────────────────────────────────────────────────────

pub fn farmer_name_prompt() -> String {
    "✅ Great! Let's get you registered.

📝 *Step 1 of 3: Personal Information*

What's your full name?"
        .to_string()
}

pub fn farmer_location_prompt(name: &str) -> String {
    format!(
        "Nice to meet you, {name}! 👋

📍 *Step 2 of 3: Location*

What's your location? (City or area where you're looking for work)"
    )
}

pub fn id_photo_prompt() -> String {
    "📸 *Step 3 of 3: ID Verification*

Please upload a photo of your ID card or driver's license.

This helps us keep FarmConnect safe for everyone."
        .to_string()
}

pub fn id_photo_reprompt() -> String {
    "Please send a photo of your ID card.".to_string()
}

pub fn id_received() -> String {
    format!(
        "✅ ID received! Thank you.

Now let's set up your job preferences to find the best matches.

{}",
        work_type_menu()
    )
}

// ── Preferences ─────────────────────────────────────────────────────────────

pub fn work_type_menu() -> String {
    "🛠 *Work Type Preferences*
What type of farm work are you interested in? (Select all that apply)

1️⃣ Harvesting
2️⃣ Planting
3️⃣ Irrigation
4️⃣ Livestock care
5️⃣ General labor
6️⃣ All types of work

Reply with numbers separated by commas (e.g., 1,2,3) or just one number:"
        .to_string()
}

pub fn work_type_reprompt() -> String {
    "Please select valid options (1-6).

Reply with numbers separated by commas (e.g., 1,2,3):"
        .to_string()
}

const DISTANCE_OPTIONS: &str = "1️⃣ Up to 10 miles
2️⃣ Up to 25 miles
3️⃣ Up to 50 miles
4️⃣ Any distance

Reply with 1, 2, 3, or 4:";

pub fn distance_menu() -> String {
    format!(
        "📍 *Work Location Preference*

How far are you willing to travel for work?

{DISTANCE_OPTIONS}"
    )
}

pub fn distance_reprompt() -> String {
    format!("Please select a valid option (1-4).\n\n{DISTANCE_OPTIONS}")
}

pub fn hours_menu() -> String {
    "⏰ *Working Hours Preference*

What's your preferred work schedule?

1️⃣ Full-time (40+ hours/week)
2️⃣ Part-time (20-40 hours/week)
3️⃣ Flexible (open to both full-time and part-time)

Reply with 1, 2, or 3:"
        .to_string()
}

pub fn hours_reprompt() -> String {
    "Please reply with 1 (Full-time), 2 (Part-time), or 3 (Flexible)".to_string()
}

pub fn update_menu() -> String {
    "⚙️ *Update Profile*

What would you like to update?

1️⃣ Work type preferences
2️⃣ Location (city/state)
3️⃣ Minimum pay rate
4️⃣ Travel distance
5️⃣ Hours preference
6️⃣ Back to main menu

Reply with number (1-6):"
        .to_string()
}

pub fn update_menu_reprompt() -> String {
    "Please reply with a number from 1 to 6".to_string()
}

fn current<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "Not set".to_string())
}

pub fn update_work_types_prompt(profile: &Profile) -> String {
    format!(
        "🛠 *Update Work Type Preferences*

Current preferences: {}

What type of farm work are you interested in?

Examples: Harvesting, Planting, Irrigation, Livestock care, General labor

Type your preferred work types (separated by commas if multiple):",
        current(profile.work_types.as_deref())
    )
}

pub fn update_location_prompt(profile: &Profile) -> String {
    format!(
        "📍 *Update Location*

Current location: {}

Where are you located?

Example: Chapel Hill, NC",
        current(profile.location.as_deref())
    )
}

pub fn update_pay_rate_prompt(profile: &Profile) -> String {
    let minimum = profile
        .min_pay_rate
        .map(|rate| format!("${rate}/hour"))
        .unwrap_or_else(|| "Not set".to_string());
    format!(
        "💰 *Update Minimum Pay Rate*

Current minimum: {minimum}

What's your minimum acceptable hourly pay rate?

Example: 18"
    )
}

pub fn update_distance_prompt(profile: &Profile) -> String {
    let distance = match profile.max_distance {
        Some(Profile::ANY_DISTANCE_MILES) => "Any distance".to_string(),
        Some(miles) => format!("{miles} miles"),
        None => "Not set".to_string(),
    };
    format!(
        "🚗 *Update Travel Distance*

Current max distance: {distance}

How far are you willing to travel for work? (in miles)

Example: 20"
    )
}

pub fn update_hours_prompt(profile: &Profile) -> String {
    format!(
        "⏰ *Update Hours Preference*

Current preference: {}

What's your preferred work schedule?

1️⃣ Full-time (40+ hours/week)
2️⃣ Part-time (20-40 hours/week)
3️⃣ Flexible (open to both)

Reply with 1, 2, or 3:",
        current(profile.hours_preference)
    )
}

pub fn pay_rate_reprompt() -> String {
    "Please enter a valid number for the hourly rate. Example: 18".to_string()
}

pub fn whole_number_reprompt(example: u32) -> String {
    format!("Please enter a valid number. Example: {example}")
}

pub fn updated(what: &str, value: &str) -> String {
    format!("✅ *{what} Updated!*\n\nNew value: {value}")
}

// ── Farm owner registration ─────────────────────────────────────────────────

pub fn owner_name_prompt() -> String {
    "✅ Welcome, farm owner!

📝 *Registration - Step 1 of 3*

What's your full name?"
        .to_string()
}

pub fn farm_name_prompt() -> String {
    "🏡 *Step 2 of 3*

What's your farm/business name?"
        .to_string()
}

pub fn farm_location_prompt() -> String {
    "📍 *Step 3 of 3*

Where is your farm located? (City/Area)"
        .to_string()
}

pub fn owner_registered() -> String {
    "✅ Registration complete! Welcome to FarmConnect.

You can now post job opportunities and connect with workers."
        .to_string()
}

// ── Job posting ─────────────────────────────────────────────────────────────

pub fn posting_work_type_prompt() -> String {
    "📝 *New Job Posting - Step 1 of 8*

🌾 *Type of Work*

What type of work is needed?

Examples: Tomato Harvest, Berry Picking, Planting Corn, Irrigation Setup"
        .to_string()
}

pub fn workers_needed_prompt() -> String {
    "👥 *Step 2 of 8: Workers Needed*

How many workers do you need?

Example: 5"
        .to_string()
}

pub fn work_hours_prompt() -> String {
    "⏰ *Step 3 of 8: Work Hours*

What are the work hours?

Format: START - END (use AM/PM)

Examples:
• 6:00 AM - 2:00 PM
• 7:00 AM - 3:00 PM
• 5:00 AM - 1:00 PM"
        .to_string()
}

pub fn payment_type_prompt() -> String {
    "💰 *Step 4 of 8: Payment Type*

How will workers be paid?

1️⃣ Per hour
2️⃣ Per day
3️⃣ Per task/piece

Reply with 1, 2, or 3:"
        .to_string()
}

pub fn choice_reprompt(options: &str) -> String {
    format!("Please reply with {options}")
}

pub fn payment_amount_prompt(kind: PaymentKind) -> String {
    let example = match kind {
        PaymentKind::PerHour => "18 (for $18/hour)",
        PaymentKind::PerDay => "150 (for $150/day)",
        PaymentKind::PerTask => "2.50 (for $2.50 per basket)",
    };
    format!(
        "💵 *Step 5 of 8: Payment Amount*

How much will you pay {}?

Example: {example}",
        kind.label()
    )
}

pub fn payment_amount_reprompt() -> String {
    "Please enter a valid amount. Example: 150".to_string()
}

pub fn job_location_prompt() -> String {
    "📍 *Step 6 of 8: Work Location*

Where is the work located?

Example: Green Valley Farm, 123 Farm Road, Sacramento"
        .to_string()
}

pub fn transportation_prompt() -> String {
    "🚗 *Step 7 of 8: Transportation*

Is transportation provided?

1️⃣ Yes, we provide transportation
2️⃣ No, workers must arrange their own

Reply with 1 or 2:"
        .to_string()
}

pub fn meeting_point_prompt() -> String {
    "📍 *Step 8 of 8: Meeting Point*

Where should workers meet for pickup?

Include time and location.

Example: Town Square, 5:45 AM pickup"
        .to_string()
}

pub fn description_prompt() -> String {
    "📋 *Additional Details (Optional)*

Add any other important details about the job:

Examples:
• Experience required
• What to bring
• Lunch provided
• Special requirements

Type your details or 'skip':"
        .to_string()
}

pub fn job_posted(job: &Job) -> String {
    format!(
        "✅ *Job Posted Successfully!*

{RULE}
📋 *Job Summary*

🌾 Work: {}
👥 Workers: {} people
⏰ Hours: {}
💰 Pay: {}
📍 Location: {}
🚗 Transport: {}
📍 Meeting: {}

{RULE}

Job ID: {}

Workers will see it when they browse jobs.",
        job.work_type,
        job.workers_needed,
        work_hours(job),
        job.payment,
        job.location,
        transportation(job),
        meeting_point(job),
        job.job_id,
    )
}

// ── Browsing ────────────────────────────────────────────────────────────────

fn work_hours(job: &Job) -> String {
    if !job.work_hours.is_empty() {
        return job.work_hours.clone();
    }
    job.schedule
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Full day".to_string())
}

fn transportation(job: &Job) -> String {
    job.transportation
        .map(|t| t.to_string())
        .unwrap_or_else(|| "Not specified".to_string())
}

fn meeting_point(job: &Job) -> &str {
    job.meeting_point.as_deref().unwrap_or("See location above")
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "es"
    }
}

fn job_card(job: &Job) -> String {
    format!(
        "🏡 *Farm:* {}

🌾 *Type of Work*
{}

👥 *Workers Needed*
{} people

⏰ *Work Hours*
{}

💰 *Payment*
{}

📍 *Work Location*
{}

🚗 *Transportation*
{}

📍 *Meeting Point*
{}

📋 *Additional Details:*
{}",
        job.farm_name,
        job.work_type,
        job.workers_needed,
        work_hours(job),
        job.payment,
        job.location,
        transportation(job),
        meeting_point(job),
        job.description.as_deref().unwrap_or("No additional details"),
    )
}

/// Heading for a fresh set of recommendations
pub fn recommendations_heading(profile_completed: bool) -> &'static str {
    if profile_completed {
        "✅ *Profile Complete!*"
    } else {
        "🔎 *Job Matches*"
    }
}

pub fn no_matches(heading: &str) -> String {
    format!(
        "{heading}

No job matches found right now. We'll notify you when new jobs matching your preferences are posted."
    )
}

pub fn job_list(heading: &str, jobs: &[Job]) -> String {
    let mut msg = format!(
        "{heading}

We found {} job match{} for you!
(Sorted by highest pay)

{RULE}

",
        jobs.len(),
        plural(jobs.len())
    );

    for (i, job) in jobs.iter().enumerate() {
        msg.push_str(&format!(
            "*{}. {}*
🏡 {}
💰 {}
📍 {}
⏰ {}
👥 {} workers needed

",
            i + 1,
            job.work_type,
            job.farm_name,
            job.payment,
            job.location,
            work_hours(job),
            job.workers_needed,
        ));
    }

    msg.push_str(&format!(
        "{RULE}

*Select a job to view details and apply:*

Reply with the job number (1-{}) or type 'menu' to return to main menu.",
        jobs.len()
    ));
    msg
}

pub fn selection_reprompt(count: usize) -> String {
    format!("Please enter a number between 1 and {count}, or type 'menu'.")
}

pub fn job_details(job: &Job) -> String {
    format!(
        "{RULE}
*Job Details*
{RULE}

{}

{RULE}

*Would you like to apply for this job?*

1️⃣ Yes, apply for this job
2️⃣ No, go back to job list

Reply with 1 or 2:",
        job_card(job)
    )
}

pub fn apply_or_back_reprompt() -> String {
    "Please reply with 1 (Apply) or 2 (Go back).".to_string()
}

/// One card of the one-at-a-time review, `index` zero-based
pub fn review_card(job: &Job, reason: Option<&str>, index: usize, total: usize) -> String {
    let header = if index == 0 {
        format!(
            "🤖 *AI Matching Complete!*

We found {total} job match{} for you!

{RULE}
*Job 1 of {total}*
{RULE}",
            plural(total)
        )
    } else {
        format!(
            "{RULE}
*Next Job Recommendation* ({} of {total})
{RULE}",
            index + 1
        )
    };

    let why = reason
        .filter(|r| !r.is_empty())
        .map(|r| format!("\n\n💡 *Why this job:* {r}"))
        .unwrap_or_default();

    format!(
        "{header}

{}{why}

{RULE}

*Are you interested in this job?*

1️⃣ Yes, apply for this job
2️⃣ No, show me the next job

Reply with 1 or 2 (or type 'menu' to return to main menu):",
        job_card(job)
    )
}

pub fn review_reprompt() -> String {
    "Please reply with 1 (Apply) or 2 (Show next job), or type 'menu' for main menu.".to_string()
}

pub fn all_reviewed() -> String {
    "✅ *No more job matches available.*

You've reviewed all matching jobs for now. We'll notify you when new jobs are posted."
        .to_string()
}

pub fn application_submitted(job: &Job, match_id: &str) -> String {
    format!(
        "✅ *Application Submitted!*

The farm owner has been notified and will contact you soon.

*Job Details:*
• Position: {}
• Farm: {}
• Pay: {}
• Hours: {}
• Match ID: {match_id}",
        job.work_type,
        job.farm_name,
        job.payment,
        work_hours(job),
    )
}

pub fn new_application_notice(farmer: &User, job: &Job) -> String {
    format!(
        "🎉 *New Job Application!*

{} has applied for your job: {}

Location: {}
Pay: {}

Type '3' from the menu to view applicants.",
        farmer.profile.display_name("A worker"),
        job.work_type,
        job.location,
        job.payment,
    )
}

// ── Menu listings ───────────────────────────────────────────────────────────

pub fn no_applications() -> String {
    "You haven't applied to any jobs yet.".to_string()
}

pub fn applications(entries: &[(Job, Match)]) -> String {
    let mut msg = "📋 *Your Job Applications:*\n\n".to_string();
    for (job, m) in entries {
        msg.push_str(&format!(
            "• {} at {} - Status: {}\n",
            job.work_type, job.farm_name, m.status
        ));
    }
    msg
}

pub fn no_postings() -> String {
    "You haven't posted any jobs yet.".to_string()
}

pub fn postings(entries: &[(Job, usize)]) -> String {
    let mut msg = "📋 *Your Job Postings:*\n\n".to_string();
    for (job, applications) in entries {
        msg.push_str(&format!(
            "*{}*
Pay: {}
Status: {}
Applications: {}
━━━━━━━━━━━

",
            job.work_type, job.payment, job.status, applications
        ));
    }
    msg
}

/// Applicants grouped by posting: (job, [(applicant name, status)])
pub fn applicants(entries: &[(Job, Vec<(String, String)>)]) -> String {
    let mut msg = "👥 *Applicants:*\n\n".to_string();
    for (job, people) in entries {
        msg.push_str(&format!("*{}* ({})\n", job.work_type, job.location));
        if people.is_empty() {
            msg.push_str("• No applications yet\n");
        }
        for (name, status) in people {
            msg.push_str(&format!("• {name} - {status}\n"));
        }
        msg.push('\n');
    }
    msg
}

// ── Chat ────────────────────────────────────────────────────────────────────

pub fn no_chat_partners(role_hint: &str) -> String {
    format!("You don't have anyone to chat with yet. {role_hint}")
}

pub fn chat_partners(names: &[String]) -> String {
    let mut msg = "💬 *Who would you like to chat with?*\n\n".to_string();
    for (i, name) in names.iter().enumerate() {
        msg.push_str(&format!("{}. {}\n", i + 1, name));
    }
    msg.push_str(&format!(
        "\nReply with a number (1-{}) or type 'menu'.",
        names.len()
    ));
    msg
}

pub fn chat_started(name: &str) -> String {
    format!(
        "💬 *Chat Started*

You're now chatting with {name}.

Type your message to send. Type 'endchat' to return to main menu."
    )
}

pub fn chat_relay(sender_name: &str, text: &str) -> String {
    format!(
        "💬 Message from {sender_name}:

{text}

(Open the chat option in your menu to reply, or type 'menu' for main menu)"
    )
}

pub fn chat_sent() -> String {
    "✅ Message sent!".to_string()
}

pub fn chat_empty_reprompt() -> String {
    "Type a message to send, or 'endchat' to finish.".to_string()
}

pub fn chat_ended() -> String {
    "Chat ended.".to_string()
}

/// Two blocks separated by a blank line
pub fn join(first: impl AsRef<str>, second: impl AsRef<str>) -> String {
    format!("{}\n\n{}", first.as_ref(), second.as_ref())
}
