use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::import::IssfScoreRow;
use crate::error::Result;
use crate::models::IssfScore;

const ISSF_COLUMNS: &str = "issf_score_id, event_name, match_number, shooter_name, shooter_id, \
     club, division_class, veteran, series_1, series_2, series_3, series_4, series_5, series_6, \
     total, place, status, source, imported_by, imported_at, created_at, updated_at";

pub struct IssfScoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> IssfScoreRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Imported rows bypass the pending gate: they land approved with
    /// `source = upload`.
    pub async fn insert(&self, row: &IssfScoreRow, imported_by: Uuid) -> Result<IssfScore> {
        let stored = sqlx::query_as::<_, IssfScore>(&format!(
            r#"
            INSERT INTO issf_scores (
                event_name, match_number, shooter_name, shooter_id, club,
                division_class, veteran, series_1, series_2, series_3,
                series_4, series_5, series_6, total, place,
                status, source, imported_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    'approved', 'upload', $16)
            RETURNING {ISSF_COLUMNS}
            "#
        ))
        .bind(&row.event_name)
        .bind(&row.match_number)
        .bind(&row.shooter_name)
        .bind(&row.shooter_id)
        .bind(&row.club)
        .bind(&row.division_class)
        .bind(row.veteran)
        .bind(row.series_1)
        .bind(row.series_2)
        .bind(row.series_3)
        .bind(row.series_4)
        .bind(row.series_5)
        .bind(row.series_6)
        .bind(row.total)
        .bind(row.place)
        .bind(imported_by)
        .fetch_one(self.pool)
        .await?;

        Ok(stored)
    }
}
