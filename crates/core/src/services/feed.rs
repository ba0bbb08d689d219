//! Live nomination feeds.
//!
//! A subscription delivers the current result of a query and then a fresh
//! snapshot every time the underlying records change, until it is cancelled
//! or dropped. Writers announce changes through [`ChangeNotifier`].

use std::sync::Arc;

use async_trait::async_trait;
use awards_common::AppResult;
use awards_db::entities::nomination::{self, NominationStatus};
use awards_db::repositories::NominationRepository;
use futures::{Stream, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// An immutable query result.
pub type Snapshot = Arc<Vec<nomination::Model>>;

/// Queries a subscription can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NominationQuery {
    /// Every nomination, most recent first.
    AllByRecent,
    /// Approved nominations only, most recent first.
    Approved,
}

/// A change to the nomination collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NominationChange {
    Created { id: String },
    StatusChanged { id: String, status: NominationStatus },
    Imported { count: u64 },
}

/// Fan-out of change events to live subscriptions.
#[derive(Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<NominationChange>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ChangeNotifier {
    /// Create a notifier buffering up to `capacity` unread events per
    /// subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Announce a change. Having no listeners is not an error.
    pub fn notify(&self, change: NominationChange) {
        let receivers = self.sender.send(change).unwrap_or(0);
        tracing::trace!(receivers, "Nomination change announced");
    }

    /// Listen for raw change events.
    #[must_use]
    pub fn listen(&self) -> broadcast::Receiver<NominationChange> {
        self.sender.subscribe()
    }

    /// Number of active listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Something that can answer a [`NominationQuery`].
#[async_trait]
pub trait NominationSource: Send + Sync {
    async fn fetch(&self, query: NominationQuery) -> AppResult<Vec<nomination::Model>>;
}

#[async_trait]
impl NominationSource for NominationRepository {
    async fn fetch(&self, query: NominationQuery) -> AppResult<Vec<nomination::Model>> {
        match query {
            NominationQuery::AllByRecent => self.list_recent().await,
            NominationQuery::Approved => self.list_by_status(NominationStatus::Approved).await,
        }
    }
}

/// Opens live subscriptions to nomination queries.
#[async_trait]
pub trait NominationFeed: Send + Sync {
    /// Current result of `query`, without following changes.
    async fn snapshot(&self, query: NominationQuery) -> AppResult<Snapshot>;

    async fn subscribe(&self, query: NominationQuery) -> AppResult<Subscription>;
}

/// Feed that re-runs the query whenever the notifier reports a change.
#[derive(Clone)]
pub struct LiveFeed {
    source: Arc<dyn NominationSource>,
    notifier: ChangeNotifier,
}

impl LiveFeed {
    #[must_use]
    pub fn new(source: Arc<dyn NominationSource>, notifier: ChangeNotifier) -> Self {
        Self { source, notifier }
    }
}

#[async_trait]
impl NominationFeed for LiveFeed {
    async fn snapshot(&self, query: NominationQuery) -> AppResult<Snapshot> {
        Ok(Arc::new(self.source.fetch(query).await?))
    }

    async fn subscribe(&self, query: NominationQuery) -> AppResult<Subscription> {
        // Listen before the first fetch so a concurrent write is not missed.
        let mut changes = self.notifier.listen();
        let initial = Arc::new(self.source.fetch(query).await?);

        let (tx, rx) = mpsc::channel(16);
        let source = Arc::clone(&self.source);

        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }

                match source.fetch(query).await {
                    Ok(rows) => {
                        if tx.send(Arc::new(rows)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, ?query, "Failed to refresh nomination snapshot");
                    }
                }
            }
            tracing::debug!(?query, "Subscription closed");
        });

        Ok(Subscription {
            initial,
            updates: rx,
            task,
        })
    }
}

/// A live view of one query.
///
/// Dropping the subscription stops delivery.
pub struct Subscription {
    initial: Snapshot,
    updates: mpsc::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Result of the query at the time of subscribing.
    #[must_use]
    pub fn initial(&self) -> Snapshot {
        Arc::clone(&self.initial)
    }

    /// Wait for the next snapshot. Returns `None` once the feed has shut
    /// down.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.updates.recv().await
    }

    /// Stop receiving updates.
    pub fn cancel(self) {
        drop(self);
    }

    /// The initial snapshot followed by every update, as a stream.
    pub fn into_stream(self) -> impl Stream<Item = Snapshot> + Send {
        let initial = self.initial();
        futures::stream::once(async move { initial }).chain(futures::stream::unfold(
            self,
            |mut sub| async move { sub.next().await.map(|snapshot| (snapshot, sub)) },
        ))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
