use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::User;

const USER_COLUMNS: &str =
    "user_id, first_name, last_name, email, role, membership_type, club, created_at";

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    /// Batch-fetch the join targets for leaderboard aggregation. Ids without
    /// a user record are simply absent from the map; the aggregation engine
    /// excludes their scores rather than failing.
    pub async fn find_map_by_ids(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, User>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = ANY($1)"
        ))
        .bind(user_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(users.into_iter().map(|u| (u.user_id, u)).collect())
    }
}
