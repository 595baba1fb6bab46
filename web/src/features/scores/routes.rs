use axum::{
    Router,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{
    approve_score, delete_score, event_scores, import_issf_scores, my_scores, reject_score,
    submit_score, update_score,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", post(submit_score))
        .route("/my-scores", get(my_scores))
        .route("/event/:event_id", get(event_scores))
        .route("/:score_id", put(update_score).delete(delete_score))
        .route("/:score_id/approve", put(approve_score))
        .route("/:score_id/reject", put(reject_score))
        .route("/import-issf", post(import_issf_scores))
}
