use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A bulk-imported ISSF match result. These rows carry free-text shooter
/// identities rather than member ids and are approved on insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct IssfScore {
    pub issf_score_id: Uuid,
    pub event_name: String,
    pub match_number: String,
    pub shooter_name: String,
    pub shooter_id: String,
    pub club: String,
    pub division_class: String,
    pub veteran: bool,
    pub series_1: Decimal,
    pub series_2: Decimal,
    pub series_3: Decimal,
    pub series_4: Decimal,
    pub series_5: Decimal,
    pub series_6: Decimal,
    pub total: Decimal,
    pub place: Option<i32>,
    pub status: String,
    pub source: String,
    pub imported_by: Uuid,
    pub imported_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
