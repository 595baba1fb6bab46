use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    create_event, delete_event, get_event, list_events, register_for_event,
    unregister_from_event, update_event,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/:event_id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route(
            "/:event_id/register",
            post(register_for_event).delete(unregister_from_event),
        )
}
