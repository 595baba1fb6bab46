use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Score, ScoreStatus};

use super::common::PaginationParams;

/// Request payload for submitting a new score
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitScoreRequest {
    pub event_id: Uuid,

    #[validate(length(
        min = 2,
        max = 100,
        message = "Discipline must be between 2 and 100 characters"
    ))]
    pub discipline: String,

    #[validate(range(min = 0, max = 600, message = "Score must be between 0 and 600"))]
    pub score: i32,

    #[validate(range(min = 0, max = 60, message = "X count must be between 0 and 60"))]
    pub x_count: Option<i32>,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,

    #[validate(url)]
    #[validate(length(max = 500))]
    pub document_url: Option<String>,
}

/// Request payload for editing a pending score
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateScoreRequest {
    #[validate(range(min = 0, max = 600, message = "Score must be between 0 and 600"))]
    pub score: Option<i32>,

    #[validate(range(min = 0, max = 60, message = "X count must be between 0 and 60"))]
    pub x_count: Option<i32>,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,

    #[validate(url)]
    #[validate(length(max = 500))]
    pub document_url: Option<String>,
}

impl UpdateScoreRequest {
    pub fn is_empty(&self) -> bool {
        self.score.is_none()
            && self.x_count.is_none()
            && self.notes.is_none()
            && self.document_url.is_none()
    }
}

/// Request payload for rejecting a score; the reason is kept verbatim for
/// the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RejectScoreRequest {
    #[validate(length(min = 1, max = 500, message = "A rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MyScoresQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub status: Option<ScoreStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EventScoresQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub discipline: Option<String>,
}

/// Response containing score details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreResponse {
    pub score_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub club: String,
    pub discipline: String,
    pub score: i32,
    pub x_count: Option<i32>,
    pub notes: Option<String>,
    pub document_url: Option<String>,
    pub status: ScoreStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl From<Score> for ScoreResponse {
    fn from(score: Score) -> Self {
        Self {
            score_id: score.score_id,
            event_id: score.event_id,
            user_id: score.user_id,
            user_name: score.user_name,
            club: score.club,
            discipline: score.discipline,
            score: score.score,
            x_count: score.x_count,
            notes: score.notes,
            document_url: score.document_url,
            status: score.status,
            created_at: score.created_at,
            updated_at: score.updated_at,
            approved_by: score.approved_by,
            approved_at: score.approved_at,
            rejected_by: score.rejected_by,
            rejected_at: score.rejected_at,
            rejection_reason: score.rejection_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit_request(score: i32, x_count: Option<i32>) -> SubmitScoreRequest {
        SubmitScoreRequest {
            event_id: Uuid::new_v4(),
            discipline: "50m Rifle Prone".to_string(),
            score,
            x_count,
            notes: None,
            document_url: None,
        }
    }

    #[test]
    fn accepts_scores_within_range() {
        assert!(submit_request(0, None).validate().is_ok());
        assert!(submit_request(600, Some(60)).validate().is_ok());
        assert!(submit_request(550, Some(40)).validate().is_ok());
    }

    #[test]
    fn rejects_score_above_600() {
        assert!(submit_request(601, None).validate().is_err());
    }

    #[test]
    fn rejects_negative_score() {
        assert!(submit_request(-1, None).validate().is_err());
    }

    #[test]
    fn rejects_x_count_above_60() {
        assert!(submit_request(550, Some(61)).validate().is_err());
    }

    #[test]
    fn rejects_empty_rejection_reason() {
        let req = RejectScoreRequest {
            reason: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
