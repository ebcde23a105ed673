use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

use crate::deadline::parse_timestamp;

/// Sentinel for a deadline that has not been announced yet.
pub const TBD: &str = "TBD";

/// Placeholder shown for missing acceptance rates and abstract deadlines ("none yet").
pub const NOT_AVAILABLE: &str = "暂无";

/// Category label used when the feed entry has no usable `sub` code.
pub const UNKNOWN_CATEGORY: &str = "未知";

/// Rank used when the feed entry carries no CCF rank.
pub const UNRANKED: &str = "N";

/// A single conference edition as shown to the user.
///
/// Serialized with camelCase keys so cached records stay readable by
/// other front ends sharing the same storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    pub id: String,
    pub title: String,
    pub full_title: String,
    pub ccf_level: String,
    pub category: String,
    /// Display-zone timestamp (`YYYY-MM-DD HH:mm:ss`) or `TBD`.
    pub deadline: String,
    pub conference_date: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dblp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl Conference {
    pub fn is_tbd(&self) -> bool {
        self.deadline == TBD
    }

    /// Parsed deadline, `None` for TBD or anything unparseable.
    pub fn deadline_time(&self) -> Option<NaiveDateTime> {
        if self.is_tbd() {
            return None;
        }
        parse_timestamp(&self.deadline)
    }

    /// Sort key for the CCF level: A before B before C before everything else.
    pub fn level_rank(&self) -> u8 {
        level_rank(&self.ccf_level)
    }

    /// Acceptance rate for display, falling back to the placeholder.
    pub fn acceptance_rate_display(&self) -> &str {
        self.acceptance_rate.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

pub fn level_rank(level: &str) -> u8 {
    match level {
        "A" => 1,
        "B" => 2,
        "C" => 3,
        _ => 4,
    }
}

/// Map a feed category code to its display label.
/// Unknown codes are shown as-is.
pub fn category_label(code: &str) -> &str {
    match code {
        "AI" => "人工智能",
        "Sec" | "SC" => "网络与信息安全",
        "CN" | "NW" => "计算机网络",
        "SE" | "PL" => "软件工程",
        "DB" | "DM" => "数据库",
        "OS" => "计算机系统",
        "DS" => "计算机体系结构/并行与分布计算/存储系统",
        "Arch" | "AR" => "计算机体系结构",
        "HCI" | "HI" => "人机交互",
        "Multimedia" | "CG" => "计算机图形学与多媒体",
        "MX" | "Web" => "交叉/综合/新兴",
        "Theory" | "CT" => "计算机理论",
        other => other,
    }
}
