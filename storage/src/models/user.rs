use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
pub enum UserRole {
    User,
    Admin,
    EventScorer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::EventScorer => "event_scorer",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "event_scorer" => Ok(Self::EventScorer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
pub enum MembershipType {
    Junior,
    Senior,
    Veteran,
}

impl MembershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Senior => "senior",
            Self::Veteran => "veteran",
        }
    }
}

impl std::str::FromStr for MembershipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "junior" => Ok(Self::Junior),
            "senior" => Ok(Self::Senior),
            "veteran" => Ok(Self::Veteran),
            other => Err(format!("unknown membership type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub membership_type: MembershipType,
    pub club: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The identity tuple resolved by the auth gateway for the current request.
/// Everything the domain layer needs to evaluate ownership and capability
/// checks without reaching back into the users table.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub name: String,
    pub role: UserRole,
    pub club: String,
    pub membership_type: MembershipType,
}

impl Actor {
    /// Capability predicate: an exact role match satisfies the check, and an
    /// admin satisfies any check.
    pub fn has_role(&self, required: UserRole) -> bool {
        self.role == required || self.role == UserRole::Admin
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: UserRole) -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            name: "Erik Berg".to_string(),
            role,
            club: "Oslo Skytterklubb".to_string(),
            membership_type: MembershipType::Senior,
        }
    }

    #[test]
    fn exact_role_satisfies_check() {
        assert!(actor(UserRole::EventScorer).has_role(UserRole::EventScorer));
        assert!(actor(UserRole::User).has_role(UserRole::User));
    }

    #[test]
    fn admin_satisfies_any_check() {
        let admin = actor(UserRole::Admin);
        assert!(admin.has_role(UserRole::User));
        assert!(admin.has_role(UserRole::EventScorer));
        assert!(admin.has_role(UserRole::Admin));
    }

    #[test]
    fn plain_user_does_not_escalate() {
        let user = actor(UserRole::User);
        assert!(!user.has_role(UserRole::Admin));
        assert!(!user.has_role(UserRole::EventScorer));
    }
}
