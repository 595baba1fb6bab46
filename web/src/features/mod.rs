pub mod events;
pub mod leaderboard;
pub mod scores;
