use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{InvalidStateKind, Result, StorageError};
use crate::models::EventRegistration;

const REGISTRATION_COLUMNS: &str =
    "registration_id, event_id, user_id, status, registered_at";

/// Registration queries run on a borrowed connection so callers can keep
/// them inside the same transaction as the capacity recompute.
pub struct RegistrationRepository;

impl RegistrationRepository {
    /// The authoritative count the capacity tracker derives from. Always a
    /// recount of the active set, never an increment.
    pub async fn count_active(conn: &mut PgConnection, event_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND status = 'active'",
        )
        .bind(event_id)
        .fetch_one(conn)
        .await?;

        Ok(count)
    }

    pub async fn find_active(
        conn: &mut PgConnection,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<EventRegistration>> {
        let registration = sqlx::query_as::<_, EventRegistration>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS} FROM event_registrations
            WHERE event_id = $1 AND user_id = $2 AND status = 'active'
            "#
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(registration)
    }

    pub async fn insert(
        conn: &mut PgConnection,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<EventRegistration> {
        let registration = sqlx::query_as::<_, EventRegistration>(&format!(
            r#"
            INSERT INTO event_registrations (event_id, user_id, status)
            VALUES ($1, $2, 'active')
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            // The partial unique index backstops the duplicate check.
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.code().as_deref() == Some("23505") {
                    return StorageError::InvalidState(InvalidStateKind::AlreadyRegistered);
                }
            }
            StorageError::from(e)
        })?;

        Ok(registration)
    }

    pub async fn cancel(conn: &mut PgConnection, registration_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE event_registrations SET status = 'cancelled' WHERE registration_id = $1",
        )
        .bind(registration_id)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
