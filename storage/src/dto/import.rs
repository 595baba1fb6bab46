use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of an ISSF match result sheet. Series values use decimal scoring
/// (10.9 max per shot, 109.0 per series).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssfScoreRow {
    pub event_name: String,
    pub match_number: String,
    pub shooter_name: String,
    pub shooter_id: String,
    pub club: String,
    pub division_class: String,
    #[serde(default)]
    pub veteran: bool,
    pub series_1: Decimal,
    pub series_2: Decimal,
    pub series_3: Decimal,
    pub series_4: Decimal,
    pub series_5: Decimal,
    pub series_6: Decimal,
    pub total: Decimal,
    pub place: Option<i32>,
}

impl IssfScoreRow {
    pub fn series(&self) -> [Decimal; 6] {
        [
            self.series_1,
            self.series_2,
            self.series_3,
            self.series_4,
            self.series_5,
            self.series_6,
        ]
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportScoresRequest {
    pub scores: Vec<IssfScoreRow>,
}

/// A single failed row; the batch continues past it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportRowError {
    pub row_number: usize,
    pub field: String,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResult {
    pub records_added: u32,
    pub records_failed: u32,
    pub errors: Vec<ImportRowError>,
    pub summary: String,
}

impl ImportResult {
    pub fn new(records_added: u32, errors: Vec<ImportRowError>) -> Self {
        let records_failed = errors.len() as u32;
        let mut summary = format!(
            "Import completed: {records_added} records added, {records_failed} records failed"
        );
        if !errors.is_empty() {
            summary.push_str(&format!(". {} validation errors occurred.", errors.len()));
        }
        Self {
            records_added,
            records_failed,
            errors,
            summary,
        }
    }
}
