//! Server-Sent Events (SSE) for live nomination snapshots.

#![allow(missing_docs)]

use std::convert::Infallible;
use std::time::Duration;

use awards_core::{ReviewSummary, Snapshot, Subscription, WallCard};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio_stream::StreamExt;

use crate::response::NominationResponse;

/// SSE event types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SseEvent {
    /// Connection established.
    Connected,
    /// Every nomination plus review counts.
    ReviewSnapshot {
        nominations: Vec<NominationResponse>,
        summary: ReviewSummary,
    },
    /// Approved nominations matching the wall filters.
    WallSnapshot { cards: Vec<WallCard>, total: usize },
}

fn to_event(event: &SseEvent) -> Event {
    Event::default()
        .json_data(event)
        .unwrap_or_else(|_| Event::default().data("error"))
}

/// Turn a subscription into an SSE response. Closing the connection drops
/// the stream, which cancels the subscription.
pub fn snapshot_sse<F>(
    subscription: Subscription,
    render: F,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    F: Fn(Snapshot) -> SseEvent + Send + 'static,
{
    let updates = subscription
        .into_stream()
        .map(move |snapshot| Ok(to_event(&render(snapshot))));

    let initial = stream::once(async { Ok(to_event(&SseEvent::Connected)) });

    Sse::new(initial.chain(updates)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}
