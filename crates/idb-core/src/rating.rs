//! Leaderboard rendered from the score store and cached between refreshes.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Local};
use tokio::{sync::RwLock, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{scores::ScoreStore, texts, Result};

#[derive(Clone, Debug)]
struct Snapshot {
    html: String,
    refreshed_at: Option<DateTime<Local>>,
}

pub struct RatingBoard {
    store: Arc<dyn ScoreStore>,
    limit: usize,
    snapshot: RwLock<Snapshot>,
}

impl RatingBoard {
    pub fn new(store: Arc<dyn ScoreStore>, limit: usize) -> Self {
        Self {
            store,
            limit,
            snapshot: RwLock::new(Snapshot {
                html: texts::rating(std::iter::empty()),
                refreshed_at: None,
            }),
        }
    }

    /// Last rendered rating. Never touches the store.
    pub async fn current_snapshot(&self) -> String {
        self.snapshot.read().await.html.clone()
    }

    pub async fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.snapshot.read().await.refreshed_at
    }

    /// Re-read the store and replace the cached rating.
    pub async fn refresh(&self) -> Result<String> {
        let records = self.store.list_sorted_by_score_desc().await?;
        let html = texts::rating(
            records
                .into_iter()
                .take(self.limit)
                .map(|r| (r.user_id, r.score)),
        );

        let mut snap = self.snapshot.write().await;
        snap.html = html.clone();
        snap.refreshed_at = Some(Local::now());
        Ok(html)
    }

    /// Refresh now, then every `every` until `cancel` fires.
    ///
    /// A failed refresh keeps the previous snapshot.
    pub fn spawn_refresher(
        self: &Arc<Self>,
        every: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let board = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            loop {
                tokio::select! {
                  _ = cancel.cancelled() => break,
                  _ = tick.tick() => {
                    if let Err(e) = board.refresh().await {
                      tracing::warn!(error = %e, "rating refresh failed");
                    }
                  }
                }
            }
            tracing::debug!("rating refresher stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::UserId,
        errors::Error,
        scores::{submit_score, MemoryScoreStore, ScoreRecord},
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose listing can be switched to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryScoreStore,
        down: AtomicBool,
    }

    #[async_trait]
    impl ScoreStore for FlakyStore {
        async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<ScoreRecord>> {
            self.inner.find_by_user_id(user_id).await
        }

        async fn save(&self, record: ScoreRecord) -> Result<()> {
            self.inner.save(record).await
        }

        async fn save_if_higher(&self, user_id: UserId, score: i64) -> Result<bool> {
            self.inner.save_if_higher(user_id, score).await
        }

        async fn list_sorted_by_score_desc(&self) -> Result<Vec<ScoreRecord>> {
            if self.down.load(Ordering::SeqCst) {
                return Err(Error::External("store unavailable".into()));
            }
            self.inner.list_sorted_by_score_desc().await
        }
    }

    #[tokio::test]
    async fn snapshot_is_stale_until_refresh() {
        let store = Arc::new(MemoryScoreStore::new());
        let board = RatingBoard::new(store.clone(), 10);

        submit_score(store.as_ref(), UserId(1), 50).await.unwrap();
        assert_eq!(
            board.current_snapshot().await,
            "Users' rating by message id:\n"
        );
        assert!(board.refreshed_at().await.is_none());

        board.refresh().await.unwrap();
        assert!(board
            .current_snapshot()
            .await
            .contains("<code>1</code> — <i>50</i>"));
        assert!(board.refreshed_at().await.is_some());
    }

    #[tokio::test]
    async fn refresh_keeps_only_top_entries() {
        let store = Arc::new(MemoryScoreStore::new());
        for (user_id, score) in [(1, 10), (2, 30), (3, 20)] {
            store
                .save(ScoreRecord {
                    user_id,
                    score: Some(score),
                })
                .await
                .unwrap();
        }

        let board = RatingBoard::new(store, 2);
        let html = board.refresh().await.unwrap();
        assert_eq!(
            html,
            "Users' rating by message id:\n<code>2</code> — <i>30</i>\n<code>3</code> — <i>20</i>"
        );
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let store = Arc::new(FlakyStore::default());
        submit_score(store.as_ref(), UserId(4), 400).await.unwrap();
        let board = RatingBoard::new(store.clone(), 10);

        let before = board.refresh().await.unwrap();
        let refreshed_at = board.refreshed_at().await;

        submit_score(store.as_ref(), UserId(5), 500).await.unwrap();
        store.down.store(true, Ordering::SeqCst);
        assert!(board.refresh().await.is_err());

        assert_eq!(board.current_snapshot().await, before);
        assert_eq!(board.refreshed_at().await, refreshed_at);
    }

    #[tokio::test]
    async fn refresher_runs_until_cancelled() {
        let store = Arc::new(MemoryScoreStore::new());
        submit_score(store.as_ref(), UserId(9), 7).await.unwrap();
        let board = Arc::new(RatingBoard::new(store, 10));

        let cancel = CancellationToken::new();
        let handle = board.spawn_refresher(Duration::from_millis(10), cancel.clone());

        // The first tick fires immediately.
        for _ in 0..50 {
            if board.refreshed_at().await.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(board.current_snapshot().await.contains("<code>9</code>"));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
