//! Turns the YAML feed into `Conference` records.

use chrono::{Datelike, NaiveDateTime};
use tracing::debug;

use crate::api::ApiError;
use crate::deadline::{select_deadline, DeadlineSelection};
use crate::merge::ConferenceSet;
use crate::models::{
    category_label, Conference, RawConf, RawFeedItem, NOT_AVAILABLE, TBD, UNKNOWN_CATEGORY,
    UNRANKED,
};

/// Parse the feed document. Entries that do not match the expected shape are skipped.
pub fn parse_feed(body: &str) -> Result<Vec<RawFeedItem>, ApiError> {
    let values: Vec<serde_yaml::Value> = serde_yaml::from_str(body)?;
    let total = values.len();

    let items: Vec<RawFeedItem> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_yaml::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!(index, error = %e, "Skipping malformed feed entry");
                None
            }
        })
        .collect();

    debug!(total, parsed = items.len(), "Parsed conference feed");
    Ok(items)
}

/// Build the deduplicated conference list for editions from the current year on.
pub fn build_conferences(items: &[RawFeedItem], now: NaiveDateTime) -> Vec<Conference> {
    let current_year = now.year();
    let mut set = ConferenceSet::new();

    for item in items {
        let editions = item
            .confs
            .iter()
            .filter(|conf| conf.year.unwrap_or(0) >= current_year)
            .filter(|conf| !conf.timeline.is_empty());

        for conf in editions {
            let Some(selection) = select_deadline(&conf.timeline, now) else {
                debug!(title = %item.title, year = ?conf.year, "No usable deadline, skipping edition");
                continue;
            };
            set.insert(build_conference(item, conf, &selection));
        }
    }

    set.into_vec()
}

/// Identifier from the feed, or synthesized from title and year.
pub fn conference_id(item: &RawFeedItem, conf: &RawConf) -> String {
    match conf.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            let title: String = item
                .title
                .to_lowercase()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            format!("{}{}", title, year_label(conf))
        }
    }
}

fn year_label(conf: &RawConf) -> String {
    conf.year.map(|y| y.to_string()).unwrap_or_default()
}

fn build_conference(item: &RawFeedItem, conf: &RawConf, selection: &DeadlineSelection) -> Conference {
    let timezone = conf.timezone.as_deref();
    let category = match item.sub_code() {
        Some(code) => category_label(code).to_string(),
        None => UNKNOWN_CATEGORY.to_string(),
    };
    let ccf_level = item
        .rank
        .as_ref()
        .and_then(|rank| rank.ccf_level())
        .unwrap_or_else(|| UNRANKED.to_string());

    Conference {
        id: conference_id(item, conf),
        title: format!("{}-{}", item.title, year_label(conf)),
        full_title: item
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| item.title.clone()),
        ccf_level,
        category,
        deadline: selection.display_deadline(timezone),
        conference_date: conf.date.clone().unwrap_or_else(|| TBD.to_string()),
        location: conf.place.clone().unwrap_or_else(|| TBD.to_string()),
        website: conf.link.clone(),
        acceptance_rate: Some(NOT_AVAILABLE.to_string()),
        abstract_deadline: Some(selection.display_abstract_deadline(timezone)),
        dblp: item.dblp.clone(),
        sub: item.sub_code().map(str::to_string),
        year: conf.year,
    }
}
