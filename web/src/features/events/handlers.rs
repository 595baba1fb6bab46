use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::event::{
        CreateEventRequest, EventResponse, RegistrationResponse, UpdateEventRequest,
    },
    error::StorageError,
    models::{Actor, UserRole},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::CurrentUser;

use super::services;

fn require_admin(actor: &Actor) -> Result<(), WebError> {
    if actor.has_role(UserRole::Admin) {
        Ok(())
    } else {
        Err(WebError::Storage(StorageError::Forbidden(
            "Admin access required".to_string(),
        )))
    }
}

#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "List all events", body = Vec<EventResponse>)
    ),
    tag = "events"
)]
pub async fn list_events(State(db): State<Database>) -> Result<Response, WebError> {
    let events = services::list_events(db.pool()).await?;

    let response: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let event = services::get_event(db.pool(), event_id).await?;

    Ok(Json(EventResponse::from(event)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, WebError> {
    require_admin(&actor)?;
    req.validate()?;

    let event = services::create_event(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Response, WebError> {
    require_admin(&actor)?;
    req.validate()?;

    let event = services::update_event(db.pool(), event_id, &req).await?;

    Ok(Json(EventResponse::from(event)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    CurrentUser(actor): CurrentUser,
) -> Result<Response, WebError> {
    require_admin(&actor)?;

    services::delete_event(db.pool(), event_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/register",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 201, description = "Registered for the event", body = RegistrationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event not open, full, past its deadline, or already registered")
    ),
    tag = "events"
)]
pub async fn register_for_event(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    CurrentUser(actor): CurrentUser,
) -> Result<Response, WebError> {
    let registration = services::register(db.pool(), &actor, event_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse::from(registration)),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/events/{event_id}/register",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 204, description = "Registration cancelled"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No active registration for this event")
    ),
    tag = "events"
)]
pub async fn unregister_from_event(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    CurrentUser(actor): CurrentUser,
) -> Result<Response, WebError> {
    services::unregister(db.pool(), &actor, event_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
