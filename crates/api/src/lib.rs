//! HTTP API layer for the awards portal.
//!
//! This crate provides the REST API and live streams:
//!
//! - **Endpoints**: submission, review, public wall, form metadata
//! - **Extractors**: identity and administrator checks
//! - **Middleware**: identity headers, shared application state
//! - **Streaming**: Server-Sent Events over live subscriptions
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod sse;

pub use endpoints::router;
pub use extractors::{AdminUser, Identity, MaybeIdentity};
pub use middleware::{AppState, auth_middleware};
pub use sse::SseEvent;
