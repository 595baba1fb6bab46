use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Event, EventRegistration, EventStatus, RegistrationStatus};

/// Request payload for creating a new event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(
        min = 3,
        max = 200,
        message = "Title must be between 3 and 200 characters"
    ))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub date: DateTime<Utc>,

    #[validate(length(
        min = 2,
        max = 200,
        message = "Location must be between 2 and 200 characters"
    ))]
    pub location: String,

    #[validate(length(min = 2, max = 100))]
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default = "default_event_status")]
    pub status: EventStatus,

    #[validate(range(min = 1, message = "Max participants must be positive"))]
    pub max_participants: Option<i32>,

    pub registration_deadline: Option<DateTime<Utc>>,
}

fn default_event_status() -> EventStatus {
    EventStatus::Open
}

/// Request payload for updating an existing event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub date: Option<DateTime<Utc>>,

    #[validate(length(min = 2, max = 200))]
    pub location: Option<String>,

    #[validate(length(min = 2, max = 100))]
    #[serde(rename = "type")]
    pub event_type: Option<String>,

    pub status: Option<EventStatus>,

    #[validate(range(min = 1))]
    pub max_participants: Option<i32>,

    pub registration_deadline: Option<DateTime<Utc>>,
}

/// Response containing event details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub event_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub status: EventStatus,
    pub max_participants: Option<i32>,
    pub current_participants: i32,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            event_id: event.event_id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            event_type: event.event_type,
            status: event.status,
            max_participants: event.max_participants,
            current_participants: event.current_participants,
            registration_deadline: event.registration_deadline,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Response confirming an event registration
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub registration_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

impl From<EventRegistration> for RegistrationResponse {
    fn from(registration: EventRegistration) -> Self {
        Self {
            registration_id: registration.registration_id,
            event_id: registration.event_id,
            user_id: registration.user_id,
            status: registration.status,
            registered_at: registration.registered_at,
        }
    }
}
