//! ISSF bulk import. Row failures are collected and the batch keeps going;
//! only the storage layer failing aborts the whole import.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::import::{ImportResult, ImportRowError, IssfScoreRow};
use crate::error::{Result, StorageError};
use crate::models::{Actor, UserRole};
use crate::repository::issf::IssfScoreRepository;

/// Decimal scoring: 10.9 per shot, ten shots per series.
fn series_max() -> Decimal {
    Decimal::new(1090, 1)
}

/// Declared totals may disagree with the series sum by at most 0.01.
fn total_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Validate one row against the required-field and numeric rules. Returns
/// the offending field with a message on failure.
pub fn validate_row(row: &IssfScoreRow) -> std::result::Result<(), (String, String)> {
    let required = [
        ("event_name", &row.event_name),
        ("match_number", &row.match_number),
        ("shooter_name", &row.shooter_name),
        ("shooter_id", &row.shooter_id),
        ("club", &row.club),
        ("division_class", &row.division_class),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err((field.to_string(), format!("{field} is required")));
        }
    }

    for (index, value) in row.series().iter().enumerate() {
        if *value < Decimal::ZERO || *value > series_max() {
            return Err((
                format!("series_{}", index + 1),
                format!("Series {} score must be between 0 and 109.0", index + 1),
            ));
        }
    }

    let sum: Decimal = row.series().iter().sum();
    if (sum - row.total).abs() > total_tolerance() {
        return Err((
            "total".to_string(),
            format!("Total {} does not match sum of series {}", row.total, sum),
        ));
    }

    if let Some(place) = row.place {
        if place < 1 {
            return Err(("place".to_string(), "Place must be >= 1".to_string()));
        }
    }

    Ok(())
}

/// Split a batch into valid rows (with their 1-based row numbers) and
/// per-row errors.
pub fn validate_rows(rows: &[IssfScoreRow]) -> (Vec<(usize, &IssfScoreRow)>, Vec<ImportRowError>) {
    let mut valid = Vec::new();
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        match validate_row(row) {
            Ok(()) => valid.push((row_number, row)),
            Err((field, error)) => errors.push(ImportRowError {
                row_number,
                field,
                error,
            }),
        }
    }

    (valid, errors)
}

/// Run an admin-only bulk import. Valid rows land auto-approved with
/// `source = upload`; constraint failures on individual rows are captured
/// alongside the validation errors.
pub async fn import_scores(
    pool: &PgPool,
    actor: &Actor,
    rows: &[IssfScoreRow],
) -> Result<ImportResult> {
    if !actor.has_role(UserRole::Admin) {
        return Err(StorageError::Forbidden("Admin access required".to_string()));
    }

    let (valid, mut errors) = validate_rows(rows);

    let repo = IssfScoreRepository::new(pool);
    let mut records_added = 0u32;

    for (row_number, row) in valid {
        match repo.insert(row, actor.user_id).await {
            Ok(_) => records_added += 1,
            Err(StorageError::Database(sqlx::Error::Database(db_err))) => {
                errors.push(ImportRowError {
                    row_number,
                    field: "row".to_string(),
                    error: db_err.message().to_string(),
                });
            }
            // Anything else (pool exhausted, connection gone) is
            // unrecoverable for the rest of the batch as well.
            Err(other) => return Err(other),
        }
    }

    errors.sort_by_key(|e| e.row_number);

    Ok(ImportResult::new(records_added, errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(series: [i64; 6], total_tenths: i64) -> IssfScoreRow {
        // Series values given in tenths: 1023 -> 102.3.
        let [s1, s2, s3, s4, s5, s6] = series.map(|v| Decimal::new(v, 1));
        IssfScoreRow {
            event_name: "District Championship 2025".to_string(),
            match_number: "M-14".to_string(),
            shooter_name: "Kari Nordmann".to_string(),
            shooter_id: "NOR-1123".to_string(),
            club: "Oslo Skytterklubb".to_string(),
            division_class: "Open".to_string(),
            veteran: false,
            series_1: s1,
            series_2: s2,
            series_3: s3,
            series_4: s4,
            series_5: s5,
            series_6: s6,
            total: Decimal::new(total_tenths, 1),
            place: None,
        }
    }

    #[test]
    fn accepts_a_consistent_row() {
        let r = row([1023, 1015, 990, 1040, 1001, 987], 6056);
        assert!(validate_row(&r).is_ok());
    }

    #[test]
    fn rejects_series_above_109() {
        let r = row([1100, 1015, 990, 1040, 1001, 987], 6133);
        let (field, _) = validate_row(&r).unwrap_err();
        assert_eq!(field, "series_1");
    }

    #[test]
    fn rejects_negative_series() {
        let r = row([1023, -10, 990, 1040, 1001, 987], 6031);
        let (field, _) = validate_row(&r).unwrap_err();
        assert_eq!(field, "series_2");
    }

    #[test]
    fn rejects_total_that_misses_the_series_sum() {
        // Sum is 605.6 but the row declares 606.0.
        let r = row([1023, 1015, 990, 1040, 1001, 987], 6060);
        let (field, _) = validate_row(&r).unwrap_err();
        assert_eq!(field, "total");
    }

    #[test]
    fn tolerates_a_rounding_sliver_in_the_total() {
        let mut r = row([1023, 1015, 990, 1040, 1001, 987], 6056);
        r.total += Decimal::new(1, 2);
        assert!(validate_row(&r).is_ok());
    }

    #[test]
    fn rejects_missing_shooter_name() {
        let mut r = row([1023, 1015, 990, 1040, 1001, 987], 6056);
        r.shooter_name = "  ".to_string();
        let (field, _) = validate_row(&r).unwrap_err();
        assert_eq!(field, "shooter_name");
    }

    #[test]
    fn batch_keeps_going_past_a_bad_row() {
        let mut rows = vec![
            row([1023, 1015, 990, 1040, 1001, 987], 6056),
            row([1000, 1000, 1000, 1000, 1000, 1000], 6000),
            row([1023, 1015, 990, 1040, 1001, 987], 6056),
            row([990, 990, 990, 990, 990, 990], 5940),
            row([980, 980, 980, 980, 980, 980], 5880),
        ];
        // Row 3 carries an impossible series value.
        rows[2].series_1 = Decimal::new(1100, 1);

        let (valid, errors) = validate_rows(&rows);

        assert_eq!(valid.len(), 4);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row_number, 3);
        assert_eq!(errors[0].field, "series_1");
    }
}
