//! Event capacity tracking. The participant counter is always recomputed
//! from the authoritative registration set, never incremented in place:
//! a partial failure can strand an increment, a recount cannot drift.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{InvalidStateKind, Result, StorageError};
use crate::models::{Actor, Event, EventRegistration, EventStatus};
use crate::repository::event::EventRepository;
use crate::repository::registration::RegistrationRepository;

/// Derive the capacity-facing status from the active-registration count.
/// Only the open <-> full transition is owned by the tracker; statuses like
/// `cancelled` or `closed` are never overridden.
pub fn derive_status(count: i64, max_participants: Option<i32>, current: EventStatus) -> EventStatus {
    let at_capacity = max_participants.is_some_and(|cap| count >= cap as i64);

    if at_capacity {
        match current {
            EventStatus::Open | EventStatus::Upcoming | EventStatus::Full => EventStatus::Full,
            other => other,
        }
    } else if current == EventStatus::Full {
        EventStatus::Open
    } else {
        current
    }
}

/// Recount the active registrations for an event and write the counter and
/// derived status back. Runs on the caller's connection so it shares the
/// transaction of the registration write it follows.
pub async fn recompute_capacity(
    conn: &mut PgConnection,
    event_id: Uuid,
) -> Result<(i32, EventStatus)> {
    let event = EventRepository::find_by_id_for_update(conn, event_id).await?;
    let count = RegistrationRepository::count_active(conn, event_id).await?;
    let status = derive_status(count, event.max_participants, event.status);

    EventRepository::write_capacity(conn, event_id, count as i32, status).await?;

    Ok((count as i32, status))
}

/// Register the actor for an event. The event row is locked up front, so
/// concurrent registrations for the last spot serialize: exactly one commits
/// and the rest fail the capacity precondition.
pub async fn register(pool: &PgPool, actor: &Actor, event_id: Uuid) -> Result<EventRegistration> {
    let mut tx = pool.begin().await?;

    let event = EventRepository::find_by_id_for_update(&mut tx, event_id).await?;
    check_registration_preconditions(&event)?;

    if RegistrationRepository::find_active(&mut tx, event_id, actor.user_id)
        .await?
        .is_some()
    {
        return Err(StorageError::InvalidState(InvalidStateKind::AlreadyRegistered));
    }

    if let Some(cap) = event.max_participants {
        let count = RegistrationRepository::count_active(&mut tx, event_id).await?;
        if count >= cap as i64 {
            return Err(StorageError::InvalidState(InvalidStateKind::EventFull));
        }
    }

    let registration = RegistrationRepository::insert(&mut tx, event_id, actor.user_id).await?;
    recompute_capacity(&mut tx, event_id).await?;

    tx.commit().await?;

    Ok(registration)
}

/// Cancel the actor's active registration and recount.
pub async fn unregister(pool: &PgPool, actor: &Actor, event_id: Uuid) -> Result<()> {
    let mut tx = pool.begin().await?;

    EventRepository::find_by_id_for_update(&mut tx, event_id).await?;

    let registration = RegistrationRepository::find_active(&mut tx, event_id, actor.user_id)
        .await?
        .ok_or(StorageError::NotFound)?;

    RegistrationRepository::cancel(&mut tx, registration.registration_id).await?;
    recompute_capacity(&mut tx, event_id).await?;

    tx.commit().await?;

    Ok(())
}

fn check_registration_preconditions(event: &Event) -> Result<()> {
    if event.status == EventStatus::Full {
        return Err(StorageError::InvalidState(InvalidStateKind::EventFull));
    }
    if !event.status.allows_registration() {
        return Err(StorageError::InvalidState(InvalidStateKind::EventNotOpen));
    }
    if let Some(deadline) = event.registration_deadline {
        if Utc::now() > deadline {
            return Err(StorageError::InvalidState(InvalidStateKind::RegistrationClosed));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(status: EventStatus, max_participants: Option<i32>) -> Event {
        let now = Utc::now();
        Event {
            event_id: Uuid::new_v4(),
            title: "Club Championship".to_string(),
            description: None,
            date: now + Duration::days(30),
            location: "Oslo".to_string(),
            event_type: "competition".to_string(),
            status,
            max_participants,
            current_participants: 0,
            registration_deadline: Some(now + Duration::days(14)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn fills_exactly_at_capacity() {
        assert_eq!(derive_status(1, Some(2), EventStatus::Open), EventStatus::Open);
        assert_eq!(derive_status(2, Some(2), EventStatus::Open), EventStatus::Full);
        assert_eq!(derive_status(3, Some(2), EventStatus::Open), EventStatus::Full);
    }

    #[test]
    fn reverts_to_open_below_capacity() {
        assert_eq!(derive_status(1, Some(2), EventStatus::Full), EventStatus::Open);
        assert_eq!(derive_status(0, Some(2), EventStatus::Full), EventStatus::Open);
    }

    #[test]
    fn never_overrides_other_statuses() {
        assert_eq!(
            derive_status(5, Some(2), EventStatus::Cancelled),
            EventStatus::Cancelled
        );
        assert_eq!(
            derive_status(0, Some(2), EventStatus::Closed),
            EventStatus::Closed
        );
        assert_eq!(
            derive_status(1, Some(2), EventStatus::Completed),
            EventStatus::Completed
        );
    }

    #[test]
    fn uncapped_events_never_fill() {
        assert_eq!(derive_status(1000, None, EventStatus::Open), EventStatus::Open);
    }

    #[test]
    fn upcoming_events_can_fill() {
        assert_eq!(
            derive_status(2, Some(2), EventStatus::Upcoming),
            EventStatus::Full
        );
    }

    #[test]
    fn full_event_rejects_registration_with_full_kind() {
        let err = check_registration_preconditions(&event(EventStatus::Full, Some(2)))
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidState(InvalidStateKind::EventFull)
        ));
    }

    #[test]
    fn closed_event_rejects_registration_with_not_open_kind() {
        for status in [
            EventStatus::Closed,
            EventStatus::Cancelled,
            EventStatus::Completed,
            EventStatus::Ongoing,
        ] {
            let err = check_registration_preconditions(&event(status, None)).unwrap_err();
            assert!(matches!(
                err,
                StorageError::InvalidState(InvalidStateKind::EventNotOpen)
            ));
        }
    }

    #[test]
    fn past_deadline_rejects_with_closed_kind() {
        let mut e = event(EventStatus::Open, None);
        e.registration_deadline = Some(Utc::now() - Duration::hours(1));

        let err = check_registration_preconditions(&e).unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidState(InvalidStateKind::RegistrationClosed)
        ));
    }

    #[test]
    fn open_and_upcoming_pass_preconditions() {
        assert!(check_registration_preconditions(&event(EventStatus::Open, Some(10))).is_ok());
        assert!(check_registration_preconditions(&event(EventStatus::Upcoming, None)).is_ok());
    }
}
