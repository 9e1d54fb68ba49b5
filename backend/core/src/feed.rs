use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::record::ContactRecord;

/// Append-only log of every accepted contact record.
///
/// The log lives as long as the process that owns it; nothing is persisted
/// and a restart starts from empty. Appends publish the new length on a
/// `watch` channel so subscribers wake on growth instead of polling.
pub struct FeedLog {
    records: RwLock<Vec<ContactRecord>>,
    len_tx: watch::Sender<usize>,
}

impl FeedLog {
    pub fn new() -> Self {
        let (len_tx, _) = watch::channel(0);
        Self {
            records: RwLock::new(Vec::new()),
            len_tx,
        }
    }

    /// Append a record and notify subscribers. Returns the new length.
    pub async fn append(&self, record: ContactRecord) -> usize {
        let mut records = self.records.write().await;
        records.push(record);
        let len = records.len();
        // Published while the write lock is held so subscribers never observe a
        // length the vector has not reached yet.
        self.len_tx.send_replace(len);
        debug!(feed_len = len, "Feed record appended");
        len
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Every record appended so far, in order.
    pub async fn snapshot(&self) -> Vec<ContactRecord> {
        self.records.read().await.clone()
    }

    /// Records at positions `watermark..`.
    pub async fn since(&self, watermark: usize) -> Vec<ContactRecord> {
        let records = self.records.read().await;
        records.get(watermark..).map(<[_]>::to_vec).unwrap_or_default()
    }

    /// Subscribe to records appended after this call.
    pub async fn subscribe(self: &Arc<Self>) -> FeedSubscription {
        // Holding the read lock pins the length against concurrent appends.
        let records = self.records.read().await;
        let watermark = records.len();
        let len_rx = self.len_tx.subscribe();
        drop(records);
        FeedSubscription {
            log: Arc::clone(self),
            len_rx,
            watermark,
        }
    }

    /// Subscribe starting at position zero, so the first batch replays the backlog.
    pub async fn subscribe_from_start(self: &Arc<Self>) -> FeedSubscription {
        let mut subscription = self.subscribe().await;
        subscription.watermark = 0;
        subscription
    }
}

impl Default for FeedLog {
    fn default() -> Self {
        Self::new()
    }
}

/// A live view over a [`FeedLog`], tracking how much of it has been delivered.
pub struct FeedSubscription {
    log: Arc<FeedLog>,
    len_rx: watch::Receiver<usize>,
    watermark: usize,
}

impl FeedSubscription {
    /// Number of records already delivered (or skipped at subscription time).
    pub fn watermark(&self) -> usize {
        self.watermark
    }

    /// Wait for growth and return exactly the newly appended slice.
    ///
    /// Appends that land between two calls are coalesced into one batch.
    /// Returns `None` only if the log has been dropped.
    pub async fn next_batch(&mut self) -> Option<Vec<ContactRecord>> {
        loop {
            let len = *self.len_rx.borrow_and_update();
            if len > self.watermark {
                let batch = self.log.since(self.watermark).await;
                self.watermark += batch.len();
                return Some(batch);
            }
            if self.len_rx.changed().await.is_err() {
                return None;
            }
        }
    }
}
