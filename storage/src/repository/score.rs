use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::score::{SubmitScoreRequest, UpdateScoreRequest};
use crate::error::{InvalidStateKind, Result, StorageError};
use crate::models::{Actor, Score, ScoreStatus};

const SCORE_COLUMNS: &str = "score_id, event_id, user_id, user_name, club, discipline, score, \
     x_count, notes, document_url, status, created_at, updated_at, approved_by, approved_at, \
     rejected_by, rejected_at, rejection_reason";

pub struct ScoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new submission in the initial `pending` state, with the
    /// submitter's name and club denormalized onto the record.
    pub async fn create(&self, actor: &Actor, req: &SubmitScoreRequest) -> Result<Score> {
        let score = sqlx::query_as::<_, Score>(&format!(
            r#"
            INSERT INTO scores (
                event_id, user_id, user_name, club, discipline,
                score, x_count, notes, document_url, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending')
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(req.event_id)
        .bind(actor.user_id)
        .bind(&actor.name)
        .bind(&actor.club)
        .bind(&req.discipline)
        .bind(req.score)
        .bind(req.x_count)
        .bind(&req.notes)
        .bind(&req.document_url)
        .fetch_one(self.pool)
        .await?;

        Ok(score)
    }

    pub async fn find_by_id(&self, score_id: Uuid) -> Result<Score> {
        let score = sqlx::query_as::<_, Score>(&format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE score_id = $1"
        ))
        .bind(score_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(score)
    }

    /// Approve transition, legal only from `pending`. The status predicate in
    /// the WHERE clause is the compare-and-set: of two concurrent calls at
    /// most one matches a pending row.
    pub async fn approve(&self, score_id: Uuid, admin_id: Uuid) -> Result<Score> {
        let updated = sqlx::query_as::<_, Score>(&format!(
            r#"
            UPDATE scores
            SET status = 'approved', approved_by = $2, approved_at = now(), updated_at = now()
            WHERE score_id = $1 AND status = 'pending'
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(score_id)
        .bind(admin_id)
        .fetch_optional(self.pool)
        .await?;

        match updated {
            Some(score) => Ok(score),
            None => {
                self.find_by_id(score_id).await?;
                Err(StorageError::InvalidState(InvalidStateKind::NotPending))
            }
        }
    }

    /// Reject transition, symmetric to approve; the reason is stored verbatim.
    pub async fn reject(&self, score_id: Uuid, admin_id: Uuid, reason: &str) -> Result<Score> {
        let updated = sqlx::query_as::<_, Score>(&format!(
            r#"
            UPDATE scores
            SET status = 'rejected', rejected_by = $2, rejected_at = now(),
                rejection_reason = $3, updated_at = now()
            WHERE score_id = $1 AND status = 'pending'
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(score_id)
        .bind(admin_id)
        .bind(reason)
        .fetch_optional(self.pool)
        .await?;

        match updated {
            Some(score) => Ok(score),
            None => {
                self.find_by_id(score_id).await?;
                Err(StorageError::InvalidState(InvalidStateKind::NotPending))
            }
        }
    }

    /// Patch the mutable fields of a score that is still pending. Terminal
    /// records are immutable; corrections go through a new submission.
    pub async fn update_pending(&self, score_id: Uuid, req: &UpdateScoreRequest) -> Result<Score> {
        let updated = sqlx::query_as::<_, Score>(&format!(
            r#"
            UPDATE scores
            SET score = COALESCE($2, score),
                x_count = COALESCE($3, x_count),
                notes = COALESCE($4, notes),
                document_url = COALESCE($5, document_url),
                updated_at = now()
            WHERE score_id = $1 AND status = 'pending'
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(score_id)
        .bind(req.score)
        .bind(req.x_count)
        .bind(&req.notes)
        .bind(&req.document_url)
        .fetch_optional(self.pool)
        .await?;

        match updated {
            Some(score) => Ok(score),
            None => {
                self.find_by_id(score_id).await?;
                Err(StorageError::InvalidState(InvalidStateKind::TerminalImmutable))
            }
        }
    }

    /// Hard delete. Leaderboards are recomputed on read, so removal
    /// self-heals on the next query.
    pub async fn delete(&self, score_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM scores WHERE score_id = $1")
            .bind(score_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        status: Option<ScoreStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Score>, i64)> {
        let mut count_query =
            QueryBuilder::new("SELECT COUNT(*) FROM scores WHERE user_id = ");
        count_query.push_bind(user_id);
        if let Some(status) = status {
            count_query.push(" AND status = ");
            count_query.push_bind(status.as_str());
        }
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        let mut query = QueryBuilder::new(format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE user_id = "
        ));
        query.push_bind(user_id);
        if let Some(status) = status {
            query.push(" AND status = ");
            query.push_bind(status.as_str());
        }
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        let scores: Vec<Score> = query.build_query_as().fetch_all(self.pool).await?;

        Ok((scores, total))
    }

    pub async fn list_by_event(
        &self,
        event_id: Uuid,
        discipline: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Score>, i64)> {
        let mut count_query =
            QueryBuilder::new("SELECT COUNT(*) FROM scores WHERE event_id = ");
        count_query.push_bind(event_id);
        if let Some(discipline) = discipline {
            count_query.push(" AND discipline = ");
            count_query.push_bind(discipline);
        }
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        let mut query = QueryBuilder::new(format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE event_id = "
        ));
        query.push_bind(event_id);
        if let Some(discipline) = discipline {
            query.push(" AND discipline = ");
            query.push_bind(discipline);
        }
        query.push(" ORDER BY score DESC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        let scores: Vec<Score> = query.build_query_as().fetch_all(self.pool).await?;

        Ok((scores, total))
    }

    /// The approved-score set the aggregation engine folds over, optionally
    /// narrowed to a creation-time window.
    pub async fn list_approved(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Score>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE status = 'approved'"
        ));
        if let Some(since) = since {
            query.push(" AND created_at >= ");
            query.push_bind(since);
        }
        query.push(" ORDER BY score DESC");

        let scores: Vec<Score> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(scores)
    }

    pub async fn list_approved_by_event(
        &self,
        event_id: Uuid,
        discipline: Option<&str>,
    ) -> Result<Vec<Score>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE status = 'approved' AND event_id = "
        ));
        query.push_bind(event_id);
        if let Some(discipline) = discipline {
            query.push(" AND discipline = ");
            query.push_bind(discipline);
        }
        query.push(" ORDER BY score DESC");

        let scores: Vec<Score> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(scores)
    }

    pub async fn list_approved_by_user(&self, user_id: Uuid) -> Result<Vec<Score>> {
        let scores = sqlx::query_as::<_, Score>(&format!(
            r#"
            SELECT {SCORE_COLUMNS} FROM scores
            WHERE status = 'approved' AND user_id = $1
            ORDER BY score DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(scores)
    }
}
