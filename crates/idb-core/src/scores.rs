//! Per-user scores fed by resolved inline messages.
//!
//! The store is a port so the bot can run against a JSON document on disk or
//! an in-memory map (tests, throwaway runs).

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{domain::UserId, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub user_id: i64,
    #[serde(default)]
    pub score: Option<i64>,
}

#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<ScoreRecord>>;

    /// Insert or replace the record for `record.user_id`.
    async fn save(&self, record: ScoreRecord) -> Result<()>;

    /// Store `score` unless an equal or better one is already recorded.
    ///
    /// Check and write happen under one lock, so concurrent callers can never
    /// lower a stored score. Returns whether the store was updated.
    async fn save_if_higher(&self, user_id: UserId, score: i64) -> Result<bool>;

    /// All records, best score first. Records without a score come last.
    async fn list_sorted_by_score_desc(&self) -> Result<Vec<ScoreRecord>>;
}

/// Record `score` for `user_id` unless an equal or better one is already stored.
///
/// Returns whether the store was updated.
pub async fn submit_score(store: &dyn ScoreStore, user_id: UserId, score: i64) -> Result<bool> {
    store.save_if_higher(user_id, score).await
}

fn beats(records: &BTreeMap<i64, Option<i64>>, user_id: UserId, score: i64) -> bool {
    match records.get(&user_id.0) {
        Some(Some(prev)) => score > *prev,
        _ => true,
    }
}

fn by_score_desc(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    match (a.score, b.score) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(a.user_id.cmp(&b.user_id))
}

fn sorted(records: &BTreeMap<i64, Option<i64>>) -> Vec<ScoreRecord> {
    let mut out: Vec<ScoreRecord> = records
        .iter()
        .map(|(&user_id, &score)| ScoreRecord { user_id, score })
        .collect();
    out.sort_by(by_score_desc);
    out
}

#[derive(Default)]
pub struct MemoryScoreStore {
    records: Mutex<BTreeMap<i64, Option<i64>>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<ScoreRecord>> {
        let records = self.records.lock().await;
        Ok(records.get(&user_id.0).map(|&score| ScoreRecord {
            user_id: user_id.0,
            score,
        }))
    }

    async fn save(&self, record: ScoreRecord) -> Result<()> {
        self.records
            .lock()
            .await
            .insert(record.user_id, record.score);
        Ok(())
    }

    async fn save_if_higher(&self, user_id: UserId, score: i64) -> Result<bool> {
        let mut records = self.records.lock().await;
        if !beats(&records, user_id, score) {
            return Ok(false);
        }
        records.insert(user_id.0, Some(score));
        Ok(true)
    }

    async fn list_sorted_by_score_desc(&self) -> Result<Vec<ScoreRecord>> {
        Ok(sorted(&*self.records.lock().await))
    }
}

/// Scores kept as one JSON array on disk.
///
/// The whole document is loaded on open and rewritten (temp file + rename) on
/// every save.
pub struct JsonFileScoreStore {
    path: PathBuf,
    records: Mutex<BTreeMap<i64, Option<i64>>>,
}

impl JsonFileScoreStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = load_scores_file(&path).await?;
        tracing::info!(path = %path.display(), users = records.len(), "score store opened");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    // Caller holds the lock. On a failed write the in-memory map is rolled
    // back so memory and disk stay in agreement.
    async fn write_record(
        &self,
        records: &mut BTreeMap<i64, Option<i64>>,
        record: ScoreRecord,
    ) -> Result<()> {
        let previous = records.insert(record.user_id, record.score);
        if let Err(e) = save_scores_file(&self.path, records).await {
            match previous {
                Some(score) => records.insert(record.user_id, score),
                None => records.remove(&record.user_id),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl ScoreStore for JsonFileScoreStore {
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<ScoreRecord>> {
        let records = self.records.lock().await;
        Ok(records.get(&user_id.0).map(|&score| ScoreRecord {
            user_id: user_id.0,
            score,
        }))
    }

    async fn save(&self, record: ScoreRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        self.write_record(&mut records, record).await
    }

    async fn save_if_higher(&self, user_id: UserId, score: i64) -> Result<bool> {
        let mut records = self.records.lock().await;
        if !beats(&records, user_id, score) {
            return Ok(false);
        }
        self.write_record(
            &mut records,
            ScoreRecord {
                user_id: user_id.0,
                score: Some(score),
            },
        )
        .await?;
        Ok(true)
    }

    async fn list_sorted_by_score_desc(&self) -> Result<Vec<ScoreRecord>> {
        Ok(sorted(&*self.records.lock().await))
    }
}

async fn load_scores_file(path: &Path) -> Result<BTreeMap<i64, Option<i64>>> {
    let txt = match tokio::fs::read_to_string(path).await {
        Ok(txt) => txt,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };
    if txt.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let list: Vec<ScoreRecord> = serde_json::from_str(&txt)?;
    Ok(list.into_iter().map(|r| (r.user_id, r.score)).collect())
}

async fn save_scores_file(path: &Path, records: &BTreeMap<i64, Option<i64>>) -> Result<()> {
    let list: Vec<ScoreRecord> = records
        .iter()
        .map(|(&user_id, &score)| ScoreRecord { user_id, score })
        .collect();
    let txt = serde_json::to_string_pretty(&list)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, txt).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}
