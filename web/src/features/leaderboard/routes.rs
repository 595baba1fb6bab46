use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{
    get_club_leaderboard, get_event_leaderboard, get_overall_leaderboard, get_user_statistics,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/overall", get(get_overall_leaderboard))
        .route("/event/:event_id", get(get_event_leaderboard))
        .route("/club", get(get_club_leaderboard))
        .route("/statistics", get(get_user_statistics))
}
