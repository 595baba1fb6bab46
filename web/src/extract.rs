use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use storage::models::Actor;
use uuid::Uuid;

use crate::error::WebError;

/// The identity the auth gateway resolved for this request, forwarded as
/// `x-user-*` headers. Protected handlers take this extractor; a missing or
/// malformed identity rejects the request before any domain code runs.
pub struct CurrentUser(pub Actor);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, WebError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(WebError::Unauthorized)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id: Uuid = header(parts, "x-user-id")?
            .parse()
            .map_err(|_| WebError::Unauthorized)?;
        let name = header(parts, "x-user-name")?.to_string();
        let role = header(parts, "x-user-role")?
            .parse()
            .map_err(|_| WebError::Unauthorized)?;
        let club = header(parts, "x-user-club")?.to_string();
        let membership_type = header(parts, "x-membership-type")?
            .parse()
            .map_err(|_| WebError::Unauthorized)?;

        Ok(CurrentUser(Actor {
            user_id,
            name,
            role,
            club,
            membership_type,
        }))
    }
}
