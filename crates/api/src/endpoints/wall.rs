//! Public wall endpoints.

use std::convert::Infallible;

use awards_common::{AppError, AppResult};
use awards_core::{Filter, WallCard, WallOfFame, WallView};
use awards_db::entities::nomination::{AcademicYear, Category};
use axum::{
    Router,
    extract::{Query, State},
    response::sse::{Event, Sse},
    routing::get,
};
use futures::Stream;
use serde::Deserialize;

use crate::{
    middleware::AppState,
    response::ApiResponse,
    sse::{SseEvent, snapshot_sse},
};

/// Wall filters. Missing values and `All` mean no filter.
#[derive(Debug, Default, Deserialize)]
pub struct WallQuery {
    pub year: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub index: usize,
}

impl WallQuery {
    fn filters(&self) -> AppResult<(Filter<AcademicYear>, Filter<Category>)> {
        let year: Filter<AcademicYear> = self
            .year
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|e| AppError::BadRequest(format!("year: {e}")))?;
        let category: Filter<Category> = self
            .category
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|e| AppError::BadRequest(format!("category: {e}")))?;
        Ok((year, category))
    }
}

/// Current carousel entry for the given filters.
async fn view(
    State(state): State<AppState>,
    Query(query): Query<WallQuery>,
) -> AppResult<ApiResponse<WallView>> {
    let (year, category) = query.filters()?;
    let view = state.wall_service.view(year, category, query.index).await?;
    Ok(ApiResponse::ok(view))
}

/// Live approved snapshots, filtered.
async fn stream(
    State(state): State<AppState>,
    Query(query): Query<WallQuery>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let (year, category) = query.filters()?;
    let subscription = state.wall_service.subscribe().await?;

    Ok(snapshot_sse(subscription, move |snapshot| {
        let mut wall = WallOfFame::new(snapshot);
        wall.set_year_filter(year);
        wall.set_category_filter(category);
        let cards: Vec<WallCard> = wall.filtered().map(WallCard::from).collect();
        SseEvent::WallSnapshot {
            total: cards.len(),
            cards,
        }
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view))
        .route("/stream", get(stream))
}
