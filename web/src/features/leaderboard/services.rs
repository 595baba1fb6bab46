use sqlx::PgPool;
use storage::{
    dto::{
        leaderboard::{
            ClubLeaderboardEntry, ClubLeaderboardQuery, EventLeaderboardEntry,
            EventLeaderboardQuery, LeaderboardEntry, LeaderboardPage, OverallLeaderboardQuery,
        },
        user::UserStatistics,
    },
    error::Result,
    models::Actor,
    services::aggregation,
};
use uuid::Uuid;

/// Overall standings with filtering and pagination
pub async fn overall_leaderboard(
    pool: &PgPool,
    query: &OverallLeaderboardQuery,
) -> Result<LeaderboardPage<LeaderboardEntry>> {
    aggregation::get_overall_leaderboard(pool, query).await
}

/// Standings for a single event
pub async fn event_leaderboard(
    pool: &PgPool,
    event_id: Uuid,
    query: &EventLeaderboardQuery,
) -> Result<LeaderboardPage<EventLeaderboardEntry>> {
    aggregation::get_event_leaderboard(pool, event_id, query).await
}

/// Club standings with filtering and pagination
pub async fn club_leaderboard(
    pool: &PgPool,
    query: &ClubLeaderboardQuery,
) -> Result<LeaderboardPage<ClubLeaderboardEntry>> {
    aggregation::get_club_leaderboard(pool, query).await
}

/// The caller's aggregates plus overall, category, and club ranks
pub async fn user_statistics(pool: &PgPool, actor: &Actor) -> Result<UserStatistics> {
    aggregation::get_user_statistics(pool, actor).await
}
