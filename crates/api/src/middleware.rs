//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use awards_common::{Config, StorageBackend};
use awards_core::{
    AdminDirectory, ChangeNotifier, LiveFeed, MediaConfig, MediaService, NominationFeed,
    NominationService, ReviewService, WallService,
};
use awards_db::repositories::NominationRepository;
use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;

use crate::extractors::Identity;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's email.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub nomination_service: NominationService,
    pub review_service: ReviewService,
    pub wall_service: WallService,
    pub admin_directory: AdminDirectory,
}

impl AppState {
    /// Wire every service onto one connection and blob store.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        storage: Arc<dyn StorageBackend>,
        config: &Config,
    ) -> Self {
        let nomination_repo = NominationRepository::new(db);
        let notifier = ChangeNotifier::default();
        let feed: Arc<dyn NominationFeed> = Arc::new(LiveFeed::new(
            Arc::new(nomination_repo.clone()),
            notifier.clone(),
        ));

        Self {
            nomination_service: NominationService::new(
                nomination_repo.clone(),
                storage,
                MediaService::new(MediaConfig::from(config.media)),
                notifier.clone(),
            ),
            review_service: ReviewService::new(nomination_repo, Arc::clone(&feed), notifier),
            wall_service: WallService::new(feed),
            admin_directory: AdminDirectory::from_config(&config.admin),
        }
    }
}

fn read_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Identity forwarded in the request headers, if any.
#[must_use]
pub fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let user_id = read_header(headers, USER_ID_HEADER)?;
    Some(Identity {
        user_id,
        email: read_header(headers, USER_EMAIL_HEADER),
    })
}

/// Authentication middleware.
///
/// The identity provider in front of the portal forwards the signed-in user
/// as headers. A request without a user id carries no identity.
pub async fn auth_middleware(mut req: Request<Body>, next: Next) -> Response {
    if let Some(identity) = identity_from_headers(req.headers()) {
        tracing::trace!(user_id = %identity.user_id, "Request identity");
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(identity_from_headers(&headers), None);

        headers.insert(USER_EMAIL_HEADER, HeaderValue::from_static("hod.cse@university.edu"));
        assert_eq!(identity_from_headers(&headers), None);

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  admin1 "));
        assert_eq!(
            identity_from_headers(&headers),
            Some(Identity {
                user_id: "admin1".to_string(),
                email: Some("hod.cse@university.edu".to_string()),
            })
        );
    }

    #[test]
    fn test_blank_user_id_is_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("   "));
        assert_eq!(identity_from_headers(&headers), None);
    }
}
