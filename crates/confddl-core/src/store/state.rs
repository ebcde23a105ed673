//! Live store state and the filtered/sorted views derived from it.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::models::Conference;
use crate::utils::contains_ignore_case;

#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub conferences: Vec<Conference>,
    pub search_query: String,
    pub selected_levels: Vec<String>,
    pub selected_categories: Vec<String>,
    pub is_loading: bool,
    pub is_network_error: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub favorites: Vec<String>,
    pub accept_rates_loaded: bool,
}

/// Filtered conferences split by deadline status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedConferences {
    /// Soonest first.
    pub upcoming: Vec<Conference>,
    /// Most recently passed first.
    pub passed: Vec<Conference>,
    pub tbd: Vec<Conference>,
}

impl CategorizedConferences {
    /// Upcoming, then passed, then TBD.
    pub fn into_filtered(self) -> Vec<Conference> {
        let mut all = self.upcoming;
        all.extend(self.passed);
        all.extend(self.tbd);
        all
    }
}

impl StoreState {
    fn matches_filters(&self, conf: &Conference) -> bool {
        let matches_search = contains_ignore_case(&conf.title, &self.search_query)
            || contains_ignore_case(&conf.full_title, &self.search_query);
        let matches_level =
            self.selected_levels.is_empty() || self.selected_levels.contains(&conf.ccf_level);
        let matches_category = self.selected_categories.is_empty()
            || self.selected_categories.contains(&conf.category);
        matches_search && matches_level && matches_category
    }

    pub fn categorized(&self, now: NaiveDateTime) -> CategorizedConferences {
        let mut views = CategorizedConferences::default();

        for conf in self.conferences.iter().filter(|c| self.matches_filters(c)) {
            if conf.is_tbd() {
                views.tbd.push(conf.clone());
                continue;
            }
            match conf.deadline_time() {
                Some(at) if at > now => views.upcoming.push(conf.clone()),
                _ => views.passed.push(conf.clone()),
            }
        }

        views.upcoming.sort_by(|a, b| {
            compare_deadlines(a, b).then_with(|| a.level_rank().cmp(&b.level_rank()))
        });
        views.passed.sort_by(|a, b| {
            compare_deadlines(b, a).then_with(|| a.level_rank().cmp(&b.level_rank()))
        });
        views.tbd.sort_by_key(Conference::level_rank);

        views
    }

    pub fn get_conference_by_id(&self, id: &str) -> Option<&Conference> {
        self.conferences.iter().find(|c| c.id == id)
    }

    /// Conferences that are favorited. Stored ids without a conference are ignored.
    pub fn favorite_conferences(&self) -> Vec<Conference> {
        self.conferences
            .iter()
            .filter(|c| self.favorites.contains(&c.id))
            .cloned()
            .collect()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }

    pub fn toggle_level(&mut self, level: &str) {
        toggle(&mut self.selected_levels, level);
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.selected_categories, category);
    }

    /// Flip favorite status. Returns true if the id is now a favorite.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        toggle(&mut self.favorites, id)
    }
}

fn compare_deadlines(a: &Conference, b: &Conference) -> Ordering {
    a.deadline_time().cmp(&b.deadline_time())
}

/// Remove `value` if present, else append it. Returns true if it was added.
fn toggle(values: &mut Vec<String>, value: &str) -> bool {
    match values.iter().position(|v| v == value) {
        Some(index) => {
            values.remove(index);
            false
        }
        None => {
            values.push(value.to_string());
            true
        }
    }
}
