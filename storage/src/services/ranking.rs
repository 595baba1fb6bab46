//! The ordering contract for every leaderboard variant, centralized so the
//! aggregation engine stays swappable.

use std::cmp::Ordering;

use crate::dto::leaderboard::{ClubLeaderboardEntry, EventLeaderboardEntry, LeaderboardEntry};

/// Half-up rounding to one decimal place. Applied once at aggregation time;
/// never re-derived from an already-rounded value.
pub fn round_score_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average over integer totals, rounded per the policy above.
pub fn average_score(total: i64, count: u32) -> f64 {
    round_score_1dp(total as f64 / count as f64)
}

/// Individual boards: best score first, average as tie-break, then ascending
/// user id so equal pairs order deterministically and pagination stays
/// stable.
pub fn individual_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.best_score
        .cmp(&a.best_score)
        .then_with(|| b.average_score.total_cmp(&a.average_score))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Club boards: same keys over club-aggregated totals, club name as the
/// final deterministic tie-break.
pub fn club_order(a: &ClubLeaderboardEntry, b: &ClubLeaderboardEntry) -> Ordering {
    b.best_score
        .cmp(&a.best_score)
        .then_with(|| b.average_score.total_cmp(&a.average_score))
        .then_with(|| a.club.cmp(&b.club))
}

/// Event boards rank raw scores only; equal scores order by score id.
pub fn event_order(a: &EventLeaderboardEntry, b: &EventLeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.score_id.cmp(&b.score_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MembershipType;
    use uuid::Uuid;

    fn entry(best: i32, average: f64, user_id: Uuid) -> LeaderboardEntry {
        LeaderboardEntry {
            rank: 0,
            user_id,
            user_name: "A Shooter".to_string(),
            club: "Club".to_string(),
            category: MembershipType::Senior,
            best_score: best,
            average_score: average,
            total_score: 0,
            total_x_count: 0,
            event_count: 3,
        }
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_score_1dp(523.25), 523.3);
        assert_eq!(round_score_1dp(523.24), 523.2);
        assert_eq!(average_score(1441, 3), 480.3);
    }

    #[test]
    fn rounding_is_single_pass() {
        // 1475 / 3 = 491.666..., rounded once to 491.7 (not 491.6 -> 492).
        assert_eq!(average_score(1475, 3), 491.7);
    }

    #[test]
    fn best_score_dominates_average() {
        let a = entry(590, 500.0, Uuid::new_v4());
        let b = entry(580, 575.0, Uuid::new_v4());
        assert_eq!(individual_order(&a, &b), Ordering::Less);
    }

    #[test]
    fn average_breaks_best_score_ties() {
        let a = entry(580, 540.0, Uuid::new_v4());
        let b = entry(580, 560.0, Uuid::new_v4());
        assert_eq!(individual_order(&a, &b), Ordering::Greater);
    }

    #[test]
    fn equal_pairs_order_by_user_id() {
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);
        let a = entry(580, 540.0, low);
        let b = entry(580, 540.0, high);
        assert_eq!(individual_order(&a, &b), Ordering::Less);
        assert_eq!(individual_order(&b, &a), Ordering::Greater);
    }
}
