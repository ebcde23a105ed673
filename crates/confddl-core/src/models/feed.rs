//! Raw shapes of the remote `allconf.yml` feed.
//!
//! The feed is community-maintained, so every field is optional and
//! unknown keys are ignored.

use serde::Deserialize;

/// One venue in the feed, with all of its yearly editions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFeedItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Category code. Kept loose since a few entries carry a mapping here.
    #[serde(default)]
    pub sub: Option<serde_yaml::Value>,
    #[serde(default)]
    pub rank: Option<RawRank>,
    #[serde(default)]
    pub dblp: Option<String>,
    #[serde(default)]
    pub confs: Vec<RawConf>,
}

impl RawFeedItem {
    /// The category code when it is a plain string.
    pub fn sub_code(&self) -> Option<&str> {
        self.sub.as_ref().and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRank {
    Label(String),
    Table {
        #[serde(default)]
        ccf: Option<String>,
    },
}

impl RawRank {
    /// CCF level letter, with any `CCF-` prefix removed.
    pub fn ccf_level(&self) -> Option<String> {
        match self {
            RawRank::Label(label) => Some(label.replace("CCF-", "")),
            RawRank::Table { ccf } => ccf.clone().filter(|c| !c.is_empty()),
        }
    }
}

/// One yearly edition of a venue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConf {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub timeline: Vec<RawTimelineItem>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTimelineItem {
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub abstract_deadline: Option<String>,
}

impl RawTimelineItem {
    pub fn new(deadline: Option<&str>, abstract_deadline: Option<&str>) -> Self {
        Self {
            deadline: deadline.map(str::to_string),
            abstract_deadline: abstract_deadline.map(str::to_string),
        }
    }
}
