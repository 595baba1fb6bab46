use serde::Serialize;
use utoipa::ToSchema;

/// A member's own aggregate statistics plus their positions in the overall,
/// category, and club boards. Ranks are absent when the member (or their
/// club) has not cleared the relevant eligibility floor.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserStatistics {
    pub total_scores: u32,
    pub best_score: i32,
    pub average_score: f64,
    pub total_x_count: i64,
    pub overall_rank: Option<u32>,
    pub category_rank: Option<u32>,
    pub club_rank: Option<u32>,
}

impl UserStatistics {
    pub fn empty() -> Self {
        Self {
            total_scores: 0,
            best_score: 0,
            average_score: 0.0,
            total_x_count: 0,
            overall_rank: None,
            category_rank: None,
            club_rank: None,
        }
    }
}
