//! Human-facing formatting helpers shared by the front ends.

use chrono::{DateTime, Utc};

/// Relative age of a timestamp, e.g. `"5 min ago"` or `"2 days ago"`.
///
/// Anything a week or older falls back to the calendar date.
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let mins = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if mins < 1 {
        "just now".to_owned()
    } else if mins < 60 {
        format!("{mins} min ago")
    } else if hours < 24 {
        format!("{hours} hour{} ago", plural(hours))
    } else if days < 7 {
        format!("{days} day{} ago", plural(days))
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// File name an exported capsule is saved under: every character outside
/// `[A-Za-z0-9]` becomes `_`, the rest is lowercased.
#[must_use]
pub fn export_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("{stem}.json")
}

/// `"1 known card"` / `"3 known cards"`.
#[must_use]
pub fn known_cards_label(count: usize) -> String {
    format!("{count} known card{}", if count == 1 { "" } else { "s" })
}
