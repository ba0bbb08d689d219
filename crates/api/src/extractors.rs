//! Request extractors.

use awards_common::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::middleware::AppState;

/// Signed-in user, as forwarded by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

/// Optional identity extractor.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Identity>().cloned()))
    }
}

/// Administrator extractor. Rejects anonymous requests with 401 and
/// users outside the allow-list with 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Identity);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AppError::Unauthorized)?;

        let allowed = identity
            .email
            .as_deref()
            .is_some_and(|email| state.admin_directory.is_admin(email));

        if !allowed {
            tracing::debug!(user_id = %identity.user_id, "Review access denied");
            return Err(AppError::Forbidden(
                "Only administrators can review nominations".to_string(),
            ));
        }

        Ok(Self(identity))
    }
}
