use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::event::{CreateEventRequest, UpdateEventRequest};
use crate::error::{Result, StorageError};
use crate::models::{Event, EventStatus};

const EVENT_COLUMNS: &str = "event_id, title, description, date, location, type, status, \
     max_participants, current_participants, registration_deadline, created_at, updated_at";

pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    pub async fn find_by_id(&self, event_id: Uuid) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1"
        ))
        .bind(event_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    /// Lock the event row for the duration of the surrounding transaction.
    /// Registration flows take this lock first so concurrent registrations
    /// for the same event serialize instead of racing the capacity check.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        event_id: Uuid,
    ) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1 FOR UPDATE"
        ))
        .bind(event_id)
        .fetch_optional(conn)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn create(&self, req: &CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (
                title, description, date, location, type, status,
                max_participants, current_participants, registration_deadline
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.date)
        .bind(&req.location)
        .bind(&req.event_type)
        .bind(req.status.as_str())
        .bind(req.max_participants)
        .bind(req.registration_deadline)
        .fetch_one(self.pool)
        .await?;

        Ok(event)
    }

    pub async fn update(&self, event_id: Uuid, req: &UpdateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                location = COALESCE($5, location),
                type = COALESCE($6, type),
                status = COALESCE($7, status),
                max_participants = COALESCE($8, max_participants),
                registration_deadline = COALESCE($9, registration_deadline),
                updated_at = now()
            WHERE event_id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.date)
        .bind(&req.location)
        .bind(&req.event_type)
        .bind(req.status.map(|s| s.as_str()))
        .bind(req.max_participants)
        .bind(req.registration_deadline)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn delete(&self, event_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(event_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Write back a recomputed participant count and derived status.
    pub async fn write_capacity(
        conn: &mut PgConnection,
        event_id: Uuid,
        current_participants: i32,
        status: EventStatus,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE events
            SET current_participants = $2, status = $3, updated_at = now()
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .bind(current_participants)
        .bind(status.as_str())
        .execute(conn)
        .await?;

        Ok(())
    }
}
