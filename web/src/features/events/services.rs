use sqlx::PgPool;
use storage::{
    dto::event::{CreateEventRequest, UpdateEventRequest},
    error::Result,
    models::{Actor, Event, EventRegistration},
    repository::event::EventRepository,
    services::capacity,
};
use uuid::Uuid;

/// List all events
pub async fn list_events(pool: &PgPool) -> Result<Vec<Event>> {
    let repo = EventRepository::new(pool);
    repo.list().await
}

/// Get an event by id
pub async fn get_event(pool: &PgPool, event_id: Uuid) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.find_by_id(event_id).await
}

/// Create a new event with an empty participant counter
pub async fn create_event(pool: &PgPool, req: &CreateEventRequest) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.create(req).await
}

/// Update an event
pub async fn update_event(pool: &PgPool, event_id: Uuid, req: &UpdateEventRequest) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.update(event_id, req).await
}

/// Delete an event
pub async fn delete_event(pool: &PgPool, event_id: Uuid) -> Result<()> {
    let repo = EventRepository::new(pool);
    repo.delete(event_id).await
}

/// Register the caller for an event
pub async fn register(pool: &PgPool, actor: &Actor, event_id: Uuid) -> Result<EventRegistration> {
    capacity::register(pool, actor, event_id).await
}

/// Cancel the caller's registration
pub async fn unregister(pool: &PgPool, actor: &Actor, event_id: Uuid) -> Result<()> {
    capacity::unregister(pool, actor, event_id).await
}
