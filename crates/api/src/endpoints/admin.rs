//! Review endpoints. Every route requires an allow-listed administrator.

use std::convert::Infallible;

use awards_common::AppResult;
use awards_core::{ReviewBoard, ReviewSummary};
use axum::{
    Router,
    extract::{Path, State},
    response::sse::{Event, Sse},
    routing::{get, post},
};
use futures::Stream;

use crate::{
    extractors::AdminUser,
    middleware::AppState,
    response::{ApiResponse, NominationDetailResponse, NominationResponse},
    sse::{SseEvent, snapshot_sse},
};

/// All nominations, newest first.
async fn list(
    AdminUser(_): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<NominationResponse>>> {
    let nominations = state.review_service.list().await?;
    Ok(ApiResponse::ok(
        nominations.into_iter().map(Into::into).collect(),
    ))
}

/// One nomination with its proof view.
async fn detail(
    AdminUser(_): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<NominationDetailResponse>> {
    let detail = state.review_service.detail(&id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

async fn approve(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<NominationResponse>> {
    tracing::debug!(reviewer = %admin.user_id, id = %id, "Approving nomination");
    let nomination = state.review_service.approve(&id).await?;
    Ok(ApiResponse::ok(nomination.into()))
}

async fn reject(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<NominationResponse>> {
    tracing::debug!(reviewer = %admin.user_id, id = %id, "Rejecting nomination");
    let nomination = state.review_service.reject(&id).await?;
    Ok(ApiResponse::ok(nomination.into()))
}

/// Counts by category and by year.
async fn stats(
    AdminUser(_): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ReviewSummary>> {
    Ok(ApiResponse::ok(state.review_service.summary().await?))
}

/// Live review snapshots.
async fn stream(
    AdminUser(_): AdminUser,
    State(state): State<AppState>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let subscription = state.review_service.subscribe().await?;

    Ok(snapshot_sse(subscription, |snapshot| {
        let board = ReviewBoard::new(snapshot);
        SseEvent::ReviewSnapshot {
            nominations: board.rows().iter().map(NominationResponse::from).collect(),
            summary: board.summary(),
        }
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/nominations", get(list))
        .route("/nominations/{id}", get(detail))
        .route("/nominations/{id}/approve", post(approve))
        .route("/nominations/{id}/reject", post(reject))
        .route("/stats", get(stats))
        .route("/stream", get(stream))
}
