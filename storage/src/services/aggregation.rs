//! Leaderboard aggregation: pure folds over the approved-score set, with
//! thin async wrappers that fetch the inputs and paginate the ranked output.
//!
//! Standings are ephemeral projections recomputed on every query. Nothing
//! here is cached or persisted, so a deleted or newly approved score is
//! reflected on the next read without any invalidation machinery.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::leaderboard::{
    ClubLeaderboardEntry, ClubLeaderboardQuery, EventLeaderboardEntry, EventLeaderboardQuery,
    LeaderboardEntry, LeaderboardFilters, LeaderboardPage, OverallLeaderboardQuery, TimePeriod,
};
use crate::dto::user::UserStatistics;
use crate::error::Result;
use crate::models::{Actor, MembershipType, Score, ScoreStatus, User};
use crate::repository::event::EventRepository;
use crate::repository::score::ScoreRepository;
use crate::repository::user::UserRepository;

use super::ranking;

/// A shooter appears in individual boards only from their third approved
/// event onward; single-event outliers never dominate the rankings.
pub const INDIVIDUAL_EVENT_FLOOR: u32 = 3;

/// A club needs results from at least two distinct members to be ranked.
pub const CLUB_MEMBER_FLOOR: u32 = 2;

#[derive(Default)]
struct Accumulator {
    total_score: i64,
    best_score: i32,
    total_x_count: i64,
    event_count: u32,
}

impl Accumulator {
    fn add(&mut self, score: &Score) {
        self.total_score += score.score as i64;
        self.total_x_count += score.x_count.unwrap_or(0) as i64;
        self.event_count += 1;
        self.best_score = self.best_score.max(score.score);
    }
}

fn in_window(score: &Score, cutoff: Option<DateTime<Utc>>) -> bool {
    match cutoff {
        Some(cutoff) => score.created_at >= cutoff,
        None => true,
    }
}

/// Fold approved scores into ranked per-shooter standings. A score whose
/// user record is missing at join time is excluded, never an error.
pub fn overall_leaderboard(
    scores: &[Score],
    users: &HashMap<Uuid, User>,
    discipline: Option<&str>,
    category: Option<MembershipType>,
    time_period: TimePeriod,
    now: DateTime<Utc>,
) -> Vec<LeaderboardEntry> {
    let cutoff = time_period.cutoff(now);
    let mut stats: HashMap<Uuid, Accumulator> = HashMap::new();

    for score in scores {
        if score.status != ScoreStatus::Approved || !in_window(score, cutoff) {
            continue;
        }
        if discipline.is_some_and(|d| score.discipline != d) {
            continue;
        }
        let Some(user) = users.get(&score.user_id) else {
            continue;
        };
        if category.is_some_and(|c| user.membership_type != c) {
            continue;
        }

        stats.entry(score.user_id).or_default().add(score);
    }

    let mut entries: Vec<LeaderboardEntry> = stats
        .into_iter()
        .filter(|(_, acc)| acc.event_count >= INDIVIDUAL_EVENT_FLOOR)
        .filter_map(|(user_id, acc)| {
            let user = users.get(&user_id)?;
            Some(LeaderboardEntry {
                rank: 0,
                user_id,
                user_name: user.full_name(),
                club: user.club.clone(),
                category: user.membership_type,
                best_score: acc.best_score,
                average_score: ranking::average_score(acc.total_score, acc.event_count),
                total_score: acc.total_score,
                total_x_count: acc.total_x_count,
                event_count: acc.event_count,
            })
        })
        .collect();

    entries.sort_by(ranking::individual_order);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }

    entries
}

/// Fold approved scores into ranked club standings, grouped by the club
/// denormalized onto each score at submission time.
pub fn club_leaderboard(
    scores: &[Score],
    time_period: TimePeriod,
    now: DateTime<Utc>,
) -> Vec<ClubLeaderboardEntry> {
    let cutoff = time_period.cutoff(now);

    struct ClubAccumulator {
        acc: Accumulator,
        members: HashSet<Uuid>,
    }

    let mut stats: HashMap<String, ClubAccumulator> = HashMap::new();

    for score in scores {
        if score.status != ScoreStatus::Approved || !in_window(score, cutoff) {
            continue;
        }

        let club = stats
            .entry(score.club.clone())
            .or_insert_with(|| ClubAccumulator {
                acc: Accumulator::default(),
                members: HashSet::new(),
            });
        club.acc.add(score);
        club.members.insert(score.user_id);
    }

    let mut entries: Vec<ClubLeaderboardEntry> = stats
        .into_iter()
        .filter(|(_, club)| club.members.len() as u32 >= CLUB_MEMBER_FLOOR)
        .map(|(name, club)| ClubLeaderboardEntry {
            rank: 0,
            club: name,
            best_score: club.acc.best_score,
            average_score: ranking::average_score(club.acc.total_score, club.acc.event_count),
            total_score: club.acc.total_score,
            total_x_count: club.acc.total_x_count,
            event_count: club.acc.event_count,
            member_count: club.members.len() as u32,
        })
        .collect();

    entries.sort_by(ranking::club_order);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }

    entries
}

/// Event-scoped board: one entry per approved score, raw score ordering, no
/// eligibility floor — a single result is enough on an event board.
pub fn event_leaderboard(scores: &[Score]) -> Vec<EventLeaderboardEntry> {
    let mut entries: Vec<EventLeaderboardEntry> = scores
        .iter()
        .filter(|score| score.status == ScoreStatus::Approved)
        .map(|score| EventLeaderboardEntry {
            rank: 0,
            score_id: score.score_id,
            user_id: score.user_id,
            user_name: score.user_name.clone(),
            club: score.club.clone(),
            discipline: score.discipline.clone(),
            score: score.score,
            x_count: score.x_count,
        })
        .collect();

    entries.sort_by(ranking::event_order);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }

    entries
}

/// One member's aggregate numbers plus their positions in the overall,
/// category, and club boards, found by scanning the freshly computed
/// rankings. No incremental or cached rank exists anywhere.
pub fn user_statistics(
    user_scores: &[Score],
    actor: &Actor,
    overall: &[LeaderboardEntry],
    category_board: &[LeaderboardEntry],
    club_board: &[ClubLeaderboardEntry],
) -> UserStatistics {
    let approved: Vec<&Score> = user_scores
        .iter()
        .filter(|score| score.status == ScoreStatus::Approved)
        .collect();

    if approved.is_empty() {
        return UserStatistics::empty();
    }

    let total_score: i64 = approved.iter().map(|s| s.score as i64).sum();
    let best_score = approved.iter().map(|s| s.score).max().unwrap_or(0);
    let total_x_count: i64 = approved
        .iter()
        .map(|s| s.x_count.unwrap_or(0) as i64)
        .sum();
    let total_scores = approved.len() as u32;

    let rank_of = |board: &[LeaderboardEntry]| {
        board
            .iter()
            .find(|entry| entry.user_id == actor.user_id)
            .map(|entry| entry.rank)
    };

    UserStatistics {
        total_scores,
        best_score,
        average_score: ranking::average_score(total_score, total_scores),
        total_x_count,
        overall_rank: rank_of(overall),
        category_rank: rank_of(category_board),
        club_rank: club_board
            .iter()
            .find(|entry| entry.club == actor.club)
            .map(|entry| entry.rank),
    }
}

/// Fetch the approved set plus its join targets, fold, rank, paginate.
pub async fn get_overall_leaderboard(
    pool: &PgPool,
    query: &OverallLeaderboardQuery,
) -> Result<LeaderboardPage<LeaderboardEntry>> {
    let now = Utc::now();
    let scores = ScoreRepository::new(pool)
        .list_approved(query.time_period.cutoff(now))
        .await?;
    let users = fetch_users_for(pool, &scores).await?;

    let ranked = overall_leaderboard(
        &scores,
        &users,
        query.discipline.as_deref(),
        query.category,
        query.time_period,
        now,
    );

    let filters = LeaderboardFilters {
        discipline: query.discipline.clone(),
        category: query.category,
        time_period: Some(query.time_period),
        event_id: None,
    };

    Ok(LeaderboardPage::from_ranked(
        ranked,
        query.page,
        query.limit,
        filters,
    ))
}

pub async fn get_event_leaderboard(
    pool: &PgPool,
    event_id: Uuid,
    query: &EventLeaderboardQuery,
) -> Result<LeaderboardPage<EventLeaderboardEntry>> {
    EventRepository::new(pool).find_by_id(event_id).await?;

    let scores = ScoreRepository::new(pool)
        .list_approved_by_event(event_id, query.discipline.as_deref())
        .await?;

    let ranked = event_leaderboard(&scores);

    let filters = LeaderboardFilters {
        discipline: query.discipline.clone(),
        category: None,
        time_period: None,
        event_id: Some(event_id),
    };

    Ok(LeaderboardPage::from_ranked(
        ranked,
        query.page,
        query.limit,
        filters,
    ))
}

pub async fn get_club_leaderboard(
    pool: &PgPool,
    query: &ClubLeaderboardQuery,
) -> Result<LeaderboardPage<ClubLeaderboardEntry>> {
    let now = Utc::now();
    let scores = ScoreRepository::new(pool)
        .list_approved(query.time_period.cutoff(now))
        .await?;

    let ranked = club_leaderboard(&scores, query.time_period, now);

    let filters = LeaderboardFilters {
        discipline: None,
        category: None,
        time_period: Some(query.time_period),
        event_id: None,
    };

    Ok(LeaderboardPage::from_ranked(
        ranked,
        query.page,
        query.limit,
        filters,
    ))
}

pub async fn get_user_statistics(pool: &PgPool, actor: &Actor) -> Result<UserStatistics> {
    let score_repo = ScoreRepository::new(pool);

    let user_scores = score_repo.list_approved_by_user(actor.user_id).await?;
    if user_scores.is_empty() {
        return Ok(UserStatistics::empty());
    }

    let now = Utc::now();
    let scores = score_repo.list_approved(None).await?;
    let users = fetch_users_for(pool, &scores).await?;

    let overall = overall_leaderboard(&scores, &users, None, None, TimePeriod::All, now);
    let category_board = overall_leaderboard(
        &scores,
        &users,
        None,
        Some(actor.membership_type),
        TimePeriod::All,
        now,
    );
    let club_board = club_leaderboard(&scores, TimePeriod::All, now);

    Ok(user_statistics(
        &user_scores,
        actor,
        &overall,
        &category_board,
        &club_board,
    ))
}

async fn fetch_users_for(pool: &PgPool, scores: &[Score]) -> Result<HashMap<Uuid, User>> {
    let user_ids: Vec<Uuid> = scores
        .iter()
        .map(|score| score.user_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    UserRepository::new(pool).find_map_by_ids(&user_ids).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use chrono::Duration;

    fn user(id: u128, club: &str, membership: MembershipType) -> User {
        User {
            user_id: Uuid::from_u128(id),
            first_name: format!("Shooter{id}"),
            last_name: "Test".to_string(),
            email: format!("shooter{id}@example.org"),
            role: UserRole::User,
            membership_type: membership,
            club: club.to_string(),
            created_at: Utc::now(),
        }
    }

    fn approved_score(user: &User, points: i32, x_count: Option<i32>) -> Score {
        let now = Utc::now();
        Score {
            score_id: Uuid::new_v4(),
            event_id: Uuid::from_u128(9000),
            user_id: user.user_id,
            user_name: user.full_name(),
            club: user.club.clone(),
            discipline: "50m Rifle Prone".to_string(),
            score: points,
            x_count,
            notes: None,
            document_url: None,
            status: ScoreStatus::Approved,
            created_at: now,
            updated_at: now,
            approved_by: Some(Uuid::from_u128(1)),
            approved_at: Some(now),
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
        }
    }

    fn user_map(users: &[User]) -> HashMap<Uuid, User> {
        users.iter().map(|u| (u.user_id, u.clone())).collect()
    }

    #[test]
    fn three_users_rank_in_score_order() {
        let users = [
            user(1, "Oslo SK", MembershipType::Senior),
            user(2, "Bergen SK", MembershipType::Senior),
            user(3, "Oslo SK", MembershipType::Senior),
        ];
        let mut scores = Vec::new();
        for (u, best) in users.iter().zip([500, 480, 460]) {
            scores.push(approved_score(u, best, None));
            scores.push(approved_score(u, best - 20, None));
            scores.push(approved_score(u, best - 40, None));
        }

        let board = overall_leaderboard(
            &scores,
            &user_map(&users),
            None,
            None,
            TimePeriod::All,
            Utc::now(),
        );

        assert_eq!(board.len(), 3);
        assert_eq!(
            board.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(
            board.iter().map(|e| e.best_score).collect::<Vec<_>>(),
            vec![500, 480, 460]
        );
        assert!(board.iter().all(|e| e.event_count == 3));
    }

    #[test]
    fn two_events_stay_below_the_floor() {
        let u = user(1, "Oslo SK", MembershipType::Senior);
        let scores = vec![approved_score(&u, 550, None), approved_score(&u, 540, None)];

        let board = overall_leaderboard(
            &scores,
            &user_map(std::slice::from_ref(&u)),
            None,
            None,
            TimePeriod::All,
            Utc::now(),
        );

        assert!(board.is_empty());
    }

    #[test]
    fn third_event_clears_the_floor() {
        let u = user(1, "Oslo SK", MembershipType::Senior);
        let scores = vec![
            approved_score(&u, 550, Some(10)),
            approved_score(&u, 540, Some(12)),
            approved_score(&u, 530, None),
        ];

        let board = overall_leaderboard(
            &scores,
            &user_map(std::slice::from_ref(&u)),
            None,
            None,
            TimePeriod::All,
            Utc::now(),
        );

        assert_eq!(board.len(), 1);
        let entry = &board[0];
        assert_eq!(entry.event_count, 3);
        assert_eq!(entry.best_score, 550);
        assert_eq!(entry.total_score, 1620);
        assert_eq!(entry.total_x_count, 22);
        assert_eq!(entry.average_score, 540.0);
    }

    #[test]
    fn average_matches_single_pass_rounding() {
        let u = user(1, "Oslo SK", MembershipType::Senior);
        let scores = vec![
            approved_score(&u, 500, None),
            approved_score(&u, 499, None),
            approved_score(&u, 477, None),
        ];

        let board = overall_leaderboard(
            &scores,
            &user_map(std::slice::from_ref(&u)),
            None,
            None,
            TimePeriod::All,
            Utc::now(),
        );

        // 1476 / 3 = 492.0
        assert_eq!(board[0].average_score, ranking::average_score(1476, 3));
    }

    #[test]
    fn rank_order_is_lexicographic_on_best_then_average() {
        let users: Vec<User> = (1..=4)
            .map(|i| user(i, "Oslo SK", MembershipType::Senior))
            .collect();
        let mut scores = Vec::new();
        for (u, (best, rest)) in users
            .iter()
            .zip([(580, 500), (580, 560), (560, 550), (590, 400)])
        {
            scores.push(approved_score(u, best, None));
            scores.push(approved_score(u, rest, None));
            scores.push(approved_score(u, rest, None));
        }

        let board = overall_leaderboard(
            &scores,
            &user_map(&users),
            None,
            None,
            TimePeriod::All,
            Utc::now(),
        );

        for pair in board.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.rank < b.rank);
            assert!(
                (a.best_score, a.average_score) >= (b.best_score, b.average_score),
                "rank {} ({}, {}) must dominate rank {} ({}, {})",
                a.rank,
                a.best_score,
                a.average_score,
                b.rank,
                b.best_score,
                b.average_score,
            );
        }
    }

    #[test]
    fn pending_and_rejected_scores_are_invisible() {
        let u = user(1, "Oslo SK", MembershipType::Senior);
        let mut pending = approved_score(&u, 600, None);
        pending.status = ScoreStatus::Pending;
        let mut rejected = approved_score(&u, 599, None);
        rejected.status = ScoreStatus::Rejected;
        let scores = vec![
            pending,
            rejected,
            approved_score(&u, 510, None),
            approved_score(&u, 505, None),
            approved_score(&u, 500, None),
        ];

        let board = overall_leaderboard(
            &scores,
            &user_map(std::slice::from_ref(&u)),
            None,
            None,
            TimePeriod::All,
            Utc::now(),
        );

        assert_eq!(board[0].best_score, 510);
        assert_eq!(board[0].event_count, 3);
    }

    #[test]
    fn missing_user_record_is_skipped_not_fatal() {
        let known = user(1, "Oslo SK", MembershipType::Senior);
        let ghost = user(2, "Bergen SK", MembershipType::Senior);
        let mut scores = Vec::new();
        for points in [510, 505, 500] {
            scores.push(approved_score(&known, points, None));
            scores.push(approved_score(&ghost, points, None));
        }

        // Only the known user's record is present at join time.
        let board = overall_leaderboard(
            &scores,
            &user_map(std::slice::from_ref(&known)),
            None,
            None,
            TimePeriod::All,
            Utc::now(),
        );

        assert_eq!(board.len(), 1);
        assert_eq!(board[0].user_id, known.user_id);
    }

    #[test]
    fn discipline_and_category_filters_narrow_the_set() {
        let senior = user(1, "Oslo SK", MembershipType::Senior);
        let junior = user(2, "Oslo SK", MembershipType::Junior);
        let mut scores = Vec::new();
        for points in [510, 505, 500] {
            scores.push(approved_score(&senior, points, None));
            scores.push(approved_score(&junior, points, None));
        }
        let users = user_map(&[senior.clone(), junior.clone()]);

        let juniors_only = overall_leaderboard(
            &scores,
            &users,
            None,
            Some(MembershipType::Junior),
            TimePeriod::All,
            Utc::now(),
        );
        assert_eq!(juniors_only.len(), 1);
        assert_eq!(juniors_only[0].user_id, junior.user_id);

        let air_pistol = overall_leaderboard(
            &scores,
            &users,
            Some("10m Air Pistol"),
            None,
            TimePeriod::All,
            Utc::now(),
        );
        assert!(air_pistol.is_empty());
    }

    #[test]
    fn time_window_excludes_old_scores() {
        let u = user(1, "Oslo SK", MembershipType::Senior);
        let now = Utc::now();
        let mut old = approved_score(&u, 600, None);
        old.created_at = now - Duration::days(40);
        let scores = vec![
            old,
            approved_score(&u, 510, None),
            approved_score(&u, 505, None),
            approved_score(&u, 500, None),
        ];

        let board = overall_leaderboard(
            &scores,
            &user_map(std::slice::from_ref(&u)),
            None,
            None,
            TimePeriod::Month,
            now,
        );

        assert_eq!(board[0].best_score, 510);
        assert_eq!(board[0].event_count, 3);
    }

    #[test]
    fn club_needs_two_distinct_members() {
        let solo = user(1, "Solo SK", MembershipType::Senior);
        let a = user(2, "Oslo SK", MembershipType::Senior);
        let b = user(3, "Oslo SK", MembershipType::Junior);
        let scores = vec![
            approved_score(&solo, 590, None),
            approved_score(&solo, 580, None),
            approved_score(&a, 550, Some(20)),
            approved_score(&b, 540, Some(15)),
        ];

        let board = club_leaderboard(&scores, TimePeriod::All, Utc::now());

        assert_eq!(board.len(), 1);
        let entry = &board[0];
        assert_eq!(entry.club, "Oslo SK");
        assert_eq!(entry.member_count, 2);
        assert_eq!(entry.event_count, 2);
        assert_eq!(entry.best_score, 550);
        assert_eq!(entry.total_x_count, 35);
        assert_eq!(entry.average_score, 545.0);
    }

    #[test]
    fn event_board_ranks_every_score_without_floor() {
        let a = user(1, "Oslo SK", MembershipType::Senior);
        let b = user(2, "Bergen SK", MembershipType::Senior);
        let scores = vec![
            approved_score(&a, 480, None),
            approved_score(&b, 520, Some(18)),
        ];

        let board = event_leaderboard(&scores);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].score, 520);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].score, 480);
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn statistics_report_aggregates_and_ranks() {
        let me = user(1, "Oslo SK", MembershipType::Senior);
        let rival = user(2, "Oslo SK", MembershipType::Senior);
        let mut scores = Vec::new();
        for points in [560, 550, 540] {
            scores.push(approved_score(&rival, points, Some(10)));
        }
        for points in [530, 520, 510] {
            scores.push(approved_score(&me, points, Some(5)));
        }
        let users = user_map(&[me.clone(), rival.clone()]);

        let now = Utc::now();
        let overall = overall_leaderboard(&scores, &users, None, None, TimePeriod::All, now);
        let category = overall_leaderboard(
            &scores,
            &users,
            None,
            Some(MembershipType::Senior),
            TimePeriod::All,
            now,
        );
        let clubs = club_leaderboard(&scores, TimePeriod::All, now);

        let my_scores: Vec<Score> = scores
            .iter()
            .filter(|s| s.user_id == me.user_id)
            .cloned()
            .collect();
        let actor = Actor {
            user_id: me.user_id,
            name: me.full_name(),
            role: UserRole::User,
            club: me.club.clone(),
            membership_type: me.membership_type,
        };

        let stats = user_statistics(&my_scores, &actor, &overall, &category, &clubs);

        assert_eq!(stats.total_scores, 3);
        assert_eq!(stats.best_score, 530);
        assert_eq!(stats.average_score, 520.0);
        assert_eq!(stats.total_x_count, 15);
        assert_eq!(stats.overall_rank, Some(2));
        assert_eq!(stats.category_rank, Some(2));
        assert_eq!(stats.club_rank, Some(1));
    }

    #[test]
    fn statistics_for_user_without_scores_are_empty() {
        let me = user(1, "Oslo SK", MembershipType::Senior);
        let actor = Actor {
            user_id: me.user_id,
            name: me.full_name(),
            role: UserRole::User,
            club: me.club.clone(),
            membership_type: me.membership_type,
        };

        let stats = user_statistics(&[], &actor, &[], &[], &[]);

        assert_eq!(stats.total_scores, 0);
        assert_eq!(stats.overall_rank, None);
        assert_eq!(stats.club_rank, None);
    }
}
