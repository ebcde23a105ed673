//! Plain-text rendering for the terminal.

use confddl_core::models::{Conference, NOT_AVAILABLE, TBD};
use confddl_core::utils::{format_optional, truncate};
use confddl_core::ConferenceStore;

const TITLE_WIDTH: usize = 22;
const CATEGORY_WIDTH: usize = 12;

pub fn status_line(store: &ConferenceStore) -> String {
    let count = store.conferences().len();
    let age = store
        .freshness()
        .map(|f| f.age_display())
        .unwrap_or_else(|| "never".to_string());
    if store.is_network_error() {
        format!("{} conferences, updated {} (offline)", count, age)
    } else {
        format!("{} conferences, updated {}", count, age)
    }
}

/// One conference per line: favorite marker, level, title, deadline, category, rate.
pub fn line(conf: &Conference, favorite: bool) -> String {
    let marker = if favorite { '*' } else { ' ' };
    format!(
        "{} {:<1} {:<title$} {:<19}  {:<category$}  {}",
        marker,
        conf.ccf_level,
        truncate(&conf.title, TITLE_WIDTH),
        conf.deadline,
        truncate(&conf.category, CATEGORY_WIDTH),
        conf.acceptance_rate_display(),
        title = TITLE_WIDTH,
        category = CATEGORY_WIDTH,
    )
}

pub fn section(heading: &str, conferences: &[Conference], favorites: &[String]) -> String {
    if conferences.is_empty() {
        return String::new();
    }
    let mut out = format!("\n{} ({})\n", heading, conferences.len());
    for conf in conferences {
        out.push_str(&line(conf, favorites.contains(&conf.id)));
        out.push('\n');
    }
    out
}

pub fn detail(conf: &Conference, favorite: bool) -> String {
    let mut out = format!("{}{}\n", conf.title, if favorite { " *" } else { "" });
    let rows = [
        ("Name", conf.full_title.clone()),
        ("Id", conf.id.clone()),
        ("CCF", conf.ccf_level.clone()),
        ("Category", conf.category.clone()),
        ("Deadline", conf.deadline.clone()),
        ("Abstract", format_optional(&conf.abstract_deadline, TBD)),
        ("Date", conf.conference_date.clone()),
        ("Location", conf.location.clone()),
        ("Website", format_optional(&conf.website, NOT_AVAILABLE)),
        ("Accepted", conf.acceptance_rate_display().to_string()),
    ];
    for (label, value) in rows {
        out.push_str(&format!("  {:<9} {}\n", label, value));
    }
    out
}
