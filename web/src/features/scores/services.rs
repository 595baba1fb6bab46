use sqlx::PgPool;
use storage::{
    dto::{
        import::{ImportResult, IssfScoreRow},
        score::{
            EventScoresQuery, MyScoresQuery, RejectScoreRequest, SubmitScoreRequest,
            UpdateScoreRequest,
        },
    },
    error::Result,
    models::{Actor, Score},
    services::{import, lifecycle},
};
use uuid::Uuid;

/// Submit a new score for an existing event
pub async fn submit_score(pool: &PgPool, actor: &Actor, req: &SubmitScoreRequest) -> Result<Score> {
    lifecycle::submit_score(pool, actor, req).await
}

/// List the caller's own scores
pub async fn my_scores(
    pool: &PgPool,
    actor: &Actor,
    query: &MyScoresQuery,
) -> Result<(Vec<Score>, i64)> {
    lifecycle::my_scores(pool, actor, query).await
}

/// List all scores submitted for an event
pub async fn event_scores(
    pool: &PgPool,
    event_id: Uuid,
    query: &EventScoresQuery,
) -> Result<(Vec<Score>, i64)> {
    lifecycle::event_scores(pool, event_id, query).await
}

/// Edit a pending score (owner or admin)
pub async fn update_score(
    pool: &PgPool,
    actor: &Actor,
    score_id: Uuid,
    req: &UpdateScoreRequest,
) -> Result<Score> {
    lifecycle::update_score(pool, actor, score_id, req).await
}

/// Hard-delete a score (owner or admin)
pub async fn delete_score(pool: &PgPool, actor: &Actor, score_id: Uuid) -> Result<()> {
    lifecycle::delete_score(pool, actor, score_id).await
}

/// Approve a pending score (admin only)
pub async fn approve_score(pool: &PgPool, actor: &Actor, score_id: Uuid) -> Result<Score> {
    lifecycle::approve_score(pool, actor, score_id).await
}

/// Reject a pending score with a reason (admin only)
pub async fn reject_score(
    pool: &PgPool,
    actor: &Actor,
    score_id: Uuid,
    req: &RejectScoreRequest,
) -> Result<Score> {
    lifecycle::reject_score(pool, actor, score_id, req).await
}

/// Bulk-import ISSF match rows (admin only)
pub async fn import_issf_scores(
    pool: &PgPool,
    actor: &Actor,
    rows: &[IssfScoreRow],
) -> Result<ImportResult> {
    import::import_scores(pool, actor, rows).await
}
