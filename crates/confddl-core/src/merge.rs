//! Deduplication of conference records within one fetch pass.
//!
//! The first record seen for an identifier keeps all of its fields. Later
//! duplicates can only improve the deadline: a concrete deadline replaces
//! TBD, and a sooner concrete deadline replaces a later one.

use std::collections::HashMap;

use tracing::debug;

use crate::models::Conference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    Inserted,
    DeadlineReplaced,
    KeptExisting,
}

/// Insertion-ordered set of conferences keyed by identifier.
#[derive(Debug, Default)]
pub struct ConferenceSet {
    conferences: Vec<Conference>,
    positions: HashMap<String, usize>,
}

impl ConferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, incoming: Conference) -> MergeAction {
        let Some(&position) = self.positions.get(&incoming.id) else {
            self.positions
                .insert(incoming.id.clone(), self.conferences.len());
            self.conferences.push(incoming);
            return MergeAction::Inserted;
        };

        let existing = &mut self.conferences[position];
        let replace = match (existing.is_tbd(), incoming.is_tbd()) {
            (true, false) => true,
            (false, false) => match (incoming.deadline_time(), existing.deadline_time()) {
                (Some(new), Some(old)) => new < old,
                _ => false,
            },
            _ => false,
        };

        if replace {
            debug!(
                conference = %existing.id,
                old = %existing.deadline,
                new = %incoming.deadline,
                "Duplicate entry has a better deadline"
            );
            existing.deadline = incoming.deadline;
            MergeAction::DeadlineReplaced
        } else {
            MergeAction::KeptExisting
        }
    }

    pub fn len(&self) -> usize {
        self.conferences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conferences.is_empty()
    }

    pub fn into_vec(self) -> Vec<Conference> {
        self.conferences
    }
}

impl FromIterator<Conference> for ConferenceSet {
    fn from_iter<I: IntoIterator<Item = Conference>>(iter: I) -> Self {
        let mut set = ConferenceSet::new();
        for conference in iter {
            set.insert(conference);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TBD;

    fn conference(id: &str, title: &str, deadline: &str) -> Conference {
        Conference {
            id: id.to_string(),
            title: title.to_string(),
            full_title: title.to_string(),
            ccf_level: "A".to_string(),
            category: "人工智能".to_string(),
            deadline: deadline.to_string(),
            conference_date: TBD.to_string(),
            location: TBD.to_string(),
            website: None,
            acceptance_rate: None,
            abstract_deadline: None,
            dblp: None,
            sub: None,
            year: Some(2025),
        }
    }

    #[test]
    fn test_tbd_and_concrete_converge_in_both_orders() {
        let set: ConferenceSet = vec![
            conference("icml2025", "first", TBD),
            conference("icml2025", "second", "2025-05-01 12:00:00"),
        ]
        .into_iter()
        .collect();
        let merged = set.into_vec();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].deadline, "2025-05-01 12:00:00");
        assert_eq!(merged[0].title, "first");

        let set: ConferenceSet = vec![
            conference("icml2025", "first", "2025-05-01 12:00:00"),
            conference("icml2025", "second", TBD),
        ]
        .into_iter()
        .collect();
        let merged = set.into_vec();
        assert_eq!(merged[0].deadline, "2025-05-01 12:00:00");
        assert_eq!(merged[0].title, "first");
    }

    #[test]
    fn test_sooner_concrete_deadline_wins() {
        let mut set = ConferenceSet::new();
        assert_eq!(set.insert(conference("a", "A", "2025-06-01 00:00:00")), MergeAction::Inserted);
        assert_eq!(
            set.insert(conference("a", "A", "2025-07-01 00:00:00")),
            MergeAction::KeptExisting
        );
        assert_eq!(
            set.insert(conference("a", "A", "2025-05-01 00:00:00")),
            MergeAction::DeadlineReplaced
        );
        assert_eq!(set.into_vec()[0].deadline, "2025-05-01 00:00:00");
    }

    #[test]
    fn test_two_tbds_keep_first() {
        let mut set = ConferenceSet::new();
        set.insert(conference("a", "first", TBD));
        assert_eq!(set.insert(conference("a", "second", TBD)), MergeAction::KeptExisting);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_distinct_ids_keep_encounter_order() {
        let set: ConferenceSet = vec![
            conference("b", "B", TBD),
            conference("a", "A", TBD),
            conference("c", "C", TBD),
        ]
        .into_iter()
        .collect();
        let ids: Vec<String> = set.into_vec().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
