use axum::{extract::FromRequestParts, http::request::Parts};

use crate::domain::model::{Actor, Role};
use crate::utils::error::RegistrarError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Caller identity as forwarded by the session layer in front of this service.
/// A missing or unparsable user id is unauthenticated; the role defaults to student.
impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = RegistrarError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .ok_or(RegistrarError::Unauthenticated)?;

        let role = match parts.headers.get(USER_ROLE_HEADER) {
            Some(value) => value
                .to_str()
                .map_err(|_| RegistrarError::Unauthenticated)?
                .trim()
                .parse::<Role>()
                .map_err(|_| RegistrarError::Unauthenticated)?,
            None => Role::Student,
        };

        Ok(Actor { id, role })
    }
}
