//! Score lifecycle: pending -> approved | rejected, and who may trigger
//! which transition. The terminal write itself is a conditional update in
//! the repository (`WHERE status = 'pending'`), so two concurrent calls can
//! never both succeed; this module owns the capability and ownership rules
//! evaluated before the write.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::score::{
    EventScoresQuery, MyScoresQuery, RejectScoreRequest, SubmitScoreRequest, UpdateScoreRequest,
};
use crate::error::{Result, StorageError};
use crate::models::{Actor, Score, ScoreStatus, UserRole};
use crate::repository::event::EventRepository;
use crate::repository::score::ScoreRepository;

/// A transition out of the pending state is the only legal one.
pub fn can_transition(from: ScoreStatus) -> bool {
    from == ScoreStatus::Pending
}

/// Owner may touch their own record; an admin may touch any.
pub fn can_modify(actor: &Actor, score: &Score) -> bool {
    score.user_id == actor.user_id || actor.is_admin()
}

fn require_admin(actor: &Actor) -> Result<()> {
    if actor.has_role(UserRole::Admin) {
        Ok(())
    } else {
        Err(StorageError::Forbidden("Admin access required".to_string()))
    }
}

/// Submit a new score; the referenced event must exist.
pub async fn submit_score(pool: &PgPool, actor: &Actor, req: &SubmitScoreRequest) -> Result<Score> {
    EventRepository::new(pool).find_by_id(req.event_id).await?;

    ScoreRepository::new(pool).create(actor, req).await
}

pub async fn approve_score(pool: &PgPool, actor: &Actor, score_id: Uuid) -> Result<Score> {
    require_admin(actor)?;

    ScoreRepository::new(pool)
        .approve(score_id, actor.user_id)
        .await
}

pub async fn reject_score(
    pool: &PgPool,
    actor: &Actor,
    score_id: Uuid,
    req: &RejectScoreRequest,
) -> Result<Score> {
    require_admin(actor)?;

    ScoreRepository::new(pool)
        .reject(score_id, actor.user_id, &req.reason)
        .await
}

/// Edit a pending score. Ownership is checked against the stored record
/// before the conditional update runs.
pub async fn update_score(
    pool: &PgPool,
    actor: &Actor,
    score_id: Uuid,
    req: &UpdateScoreRequest,
) -> Result<Score> {
    let repo = ScoreRepository::new(pool);
    let score = repo.find_by_id(score_id).await?;

    if !can_modify(actor, &score) {
        return Err(StorageError::Forbidden(
            "Not authorized to update this score".to_string(),
        ));
    }

    repo.update_pending(score_id, req).await
}

pub async fn delete_score(pool: &PgPool, actor: &Actor, score_id: Uuid) -> Result<()> {
    let repo = ScoreRepository::new(pool);
    let score = repo.find_by_id(score_id).await?;

    if !can_modify(actor, &score) {
        return Err(StorageError::Forbidden(
            "Not authorized to delete this score".to_string(),
        ));
    }

    repo.delete(score_id).await
}

pub async fn my_scores(
    pool: &PgPool,
    actor: &Actor,
    query: &MyScoresQuery,
) -> Result<(Vec<Score>, i64)> {
    ScoreRepository::new(pool)
        .list_by_user(
            actor.user_id,
            query.status,
            query.pagination.offset() as i64,
            query.pagination.limit() as i64,
        )
        .await
}

pub async fn event_scores(
    pool: &PgPool,
    event_id: Uuid,
    query: &EventScoresQuery,
) -> Result<(Vec<Score>, i64)> {
    EventRepository::new(pool).find_by_id(event_id).await?;

    ScoreRepository::new(pool)
        .list_by_event(
            event_id,
            query.discipline.as_deref(),
            query.pagination.offset() as i64,
            query.pagination.limit() as i64,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MembershipType;
    use chrono::Utc;

    fn actor(id: u128, role: UserRole) -> Actor {
        Actor {
            user_id: Uuid::from_u128(id),
            name: "Kari Nordmann".to_string(),
            role,
            club: "Oslo Skytterklubb".to_string(),
            membership_type: MembershipType::Senior,
        }
    }

    fn score_owned_by(owner: &Actor, status: ScoreStatus) -> Score {
        let now = Utc::now();
        Score {
            score_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            user_id: owner.user_id,
            user_name: owner.name.clone(),
            club: owner.club.clone(),
            discipline: "25m Pistol".to_string(),
            score: 540,
            x_count: Some(12),
            notes: None,
            document_url: None,
            status,
            created_at: now,
            updated_at: now,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
        }
    }

    #[test]
    fn only_pending_may_transition() {
        assert!(can_transition(ScoreStatus::Pending));
        assert!(!can_transition(ScoreStatus::Approved));
        assert!(!can_transition(ScoreStatus::Rejected));
    }

    #[test]
    fn owner_and_admin_may_modify() {
        let owner = actor(1, UserRole::User);
        let admin = actor(2, UserRole::Admin);
        let stranger = actor(3, UserRole::User);
        let score = score_owned_by(&owner, ScoreStatus::Pending);

        assert!(can_modify(&owner, &score));
        assert!(can_modify(&admin, &score));
        assert!(!can_modify(&stranger, &score));
    }

    #[test]
    fn event_scorer_is_not_an_admin() {
        let scorer = actor(4, UserRole::EventScorer);
        assert!(require_admin(&scorer).is_err());
        assert!(require_admin(&actor(5, UserRole::Admin)).is_ok());
    }
}
