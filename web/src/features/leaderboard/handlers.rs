use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        leaderboard::{
            ClubLeaderboardEntry, ClubLeaderboardQuery, EventLeaderboardEntry,
            EventLeaderboardQuery, LeaderboardEntry, LeaderboardPage, OverallLeaderboardQuery,
        },
        user::UserStatistics,
    },
};
use uuid::Uuid;

use crate::error::WebError;
use crate::extract::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard/overall",
    params(OverallLeaderboardQuery),
    responses(
        (status = 200, description = "Overall standings, recomputed from the approved-score set", body = LeaderboardPage<LeaderboardEntry>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "leaderboard"
)]
pub async fn get_overall_leaderboard(
    State(db): State<Database>,
    Query(query): Query<OverallLeaderboardQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let page = services::overall_leaderboard(db.pool(), &query).await?;

    Ok(Json(page).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/event/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        EventLeaderboardQuery
    ),
    responses(
        (status = 200, description = "Event standings, one entry per approved score", body = LeaderboardPage<EventLeaderboardEntry>),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "Event not found")
    ),
    tag = "leaderboard"
)]
pub async fn get_event_leaderboard(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<EventLeaderboardQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let page = services::event_leaderboard(db.pool(), event_id, &query).await?;

    Ok(Json(page).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/club",
    params(ClubLeaderboardQuery),
    responses(
        (status = 200, description = "Club standings over club-aggregated totals", body = LeaderboardPage<ClubLeaderboardEntry>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "leaderboard"
)]
pub async fn get_club_leaderboard(
    State(db): State<Database>,
    Query(query): Query<ClubLeaderboardQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let page = services::club_leaderboard(db.pool(), &query).await?;

    Ok(Json(page).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/statistics",
    responses(
        (status = 200, description = "The caller's aggregates and board positions", body = UserStatistics),
        (status = 401, description = "Unauthorized")
    ),
    tag = "leaderboard"
)]
pub async fn get_user_statistics(
    State(db): State<Database>,
    CurrentUser(actor): CurrentUser,
) -> Result<Response, WebError> {
    let statistics = services::user_statistics(db.pool(), &actor).await?;

    Ok(Json(statistics).into_response())
}
