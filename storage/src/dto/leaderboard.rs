use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::MembershipType;

/// Time window a leaderboard is computed over, relative to evaluation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    #[default]
    All,
    Year,
    Month,
    Week,
}

impl TimePeriod {
    /// Earliest `created_at` still inside the window, or `None` for all-time.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::Year => Some(now - Duration::days(365)),
            Self::Month => Some(now - Duration::days(30)),
            Self::Week => Some(now - Duration::days(7)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

fn validate_page(page: u32, limit: u32) -> Result<(), String> {
    if page < 1 {
        return Err("page must be >= 1".to_string());
    }
    if limit < 1 || limit > 100 {
        return Err("limit must be between 1 and 100".to_string());
    }
    Ok(())
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct OverallLeaderboardQuery {
    pub discipline: Option<String>,
    pub category: Option<MembershipType>,
    #[serde(default)]
    pub time_period: TimePeriod,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl OverallLeaderboardQuery {
    pub fn validate(&self) -> Result<(), String> {
        validate_page(self.page, self.limit)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EventLeaderboardQuery {
    pub discipline: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl EventLeaderboardQuery {
    pub fn validate(&self) -> Result<(), String> {
        validate_page(self.page, self.limit)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClubLeaderboardQuery {
    #[serde(default)]
    pub time_period: TimePeriod,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ClubLeaderboardQuery {
    pub fn validate(&self) -> Result<(), String> {
        validate_page(self.page, self.limit)
    }
}

/// A ranked individual standing, recomputed on every query.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: Uuid,
    pub user_name: String,
    pub club: String,
    pub category: MembershipType,
    pub best_score: i32,
    pub average_score: f64,
    pub total_score: i64,
    pub total_x_count: i64,
    pub event_count: u32,
}

/// A ranked club standing over the club's aggregated score set.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClubLeaderboardEntry {
    pub rank: u32,
    pub club: String,
    pub best_score: i32,
    pub average_score: f64,
    pub total_score: i64,
    pub total_x_count: i64,
    pub event_count: u32,
    pub member_count: u32,
}

/// One approved result on an event-scoped board.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventLeaderboardEntry {
    pub rank: u32,
    pub score_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub club: String,
    pub discipline: String,
    pub score: i32,
    pub x_count: Option<i32>,
}

/// Echo of the filters a leaderboard was computed with.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct LeaderboardFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discipline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<MembershipType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_period: Option<TimePeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardPage<T> {
    pub entries: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub filters: LeaderboardFilters,
}

impl<T> LeaderboardPage<T> {
    /// Paginate an already-ranked list; rank values stay global, never
    /// per-page.
    pub fn from_ranked(ranked: Vec<T>, page: u32, limit: u32, filters: LeaderboardFilters) -> Self {
        let total = ranked.len() as u64;
        let total_pages = total.div_ceil(limit as u64) as u32;
        let start = ((page - 1) * limit) as usize;

        let entries: Vec<T> = ranked
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();

        Self {
            entries,
            total,
            page,
            limit,
            total_pages,
            filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_time_has_no_cutoff() {
        assert!(TimePeriod::All.cutoff(Utc::now()).is_none());
    }

    #[test]
    fn week_cutoff_is_seven_days_back() {
        let now = Utc::now();
        let cutoff = TimePeriod::Week.cutoff(now).unwrap();
        assert_eq!(now - cutoff, Duration::days(7));
    }

    #[test]
    fn pagination_keeps_global_ranks() {
        let ranked: Vec<u32> = (1..=10).collect();
        let page = LeaderboardPage::from_ranked(ranked, 2, 3, LeaderboardFilters::default());

        assert_eq!(page.entries, vec![4, 5, 6]);
        assert_eq!(page.total, 10);
        assert_eq!(page.total_pages, 4);
    }

    #[test]
    fn page_past_end_is_empty() {
        let ranked: Vec<u32> = (1..=4).collect();
        let page = LeaderboardPage::from_ranked(ranked, 3, 4, LeaderboardFilters::default());

        assert!(page.entries.is_empty());
        assert_eq!(page.total, 4);
    }

    #[test]
    fn rejects_limit_above_100() {
        let query = OverallLeaderboardQuery {
            discipline: None,
            category: None,
            time_period: TimePeriod::All,
            page: 1,
            limit: 101,
        };
        assert!(query.validate().is_err());
    }
}
