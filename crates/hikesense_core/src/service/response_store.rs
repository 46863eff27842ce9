//! Response store: the single owner of the ordered response collection.
//!
//! # Responsibility
//! - Load, seed, add, edit and delete responses with write-through
//!   persistence.
//! - Score text through the async scorer before committing a record.
//! - Broadcast collection changes to subscribers.
//!
//! # Invariants
//! - The in-memory collection is newest-first and free of duplicate ids.
//! - Mutations are serialized: each holds the write gate across its whole
//!   score-then-commit sequence.
//! - A canceled or failed scoring call never mutates memory or storage.
//! - Edits replace a record in one assignment; readers see either the old or
//!   the new record, never a mix.
//! - Memory only runs ahead of storage after `add` reports `PersistFailed`.
//! - Storage calls run on the blocking pool, never on a runtime worker.

use crate::config::StoreConfig;
use crate::model::response::{Response, ResponseId, SAMPLE_RESPONSES};
use crate::model::sentiment::Sentiment;
use crate::report::{filter_by_sentiment, summarize, SurveySummary};
use crate::repo::response_repo::{RepoError, RepoResult, ResponseStorage};
use crate::scoring::analyzer::AnalysisError;
use crate::scoring::cancel::CancelToken;
use crate::scoring::scorer::Scorer;
use crate::scoring::ScoreError;
use log::{debug, error, info, warn};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, Mutex};

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome taxonomy of store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Scoring was canceled; nothing was mutated.
    Cancelled,
    /// The analysis engine failed; nothing was mutated.
    ScoringFailed(AnalysisError),
    /// Durable storage failed.
    ///
    /// `in_memory` holds a record that was committed to memory but not to
    /// storage. It is `None` when memory was left untouched.
    PersistFailed {
        in_memory: Option<Response>,
        source: RepoError,
    },
    /// The referenced response does not exist.
    NotFound(ResponseId),
}

impl StoreError {
    /// Whether memory is known to be ahead of durable storage.
    pub fn is_diverged(&self) -> bool {
        matches!(
            self,
            Self::PersistFailed {
                in_memory: Some(_),
                ..
            }
        )
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "operation cancelled during scoring"),
            Self::ScoringFailed(err) => write!(f, "{err}"),
            Self::PersistFailed {
                in_memory: Some(response),
                source,
            } => write!(
                f,
                "response {} kept in memory but not persisted: {source}",
                response.id
            ),
            Self::PersistFailed {
                in_memory: None,
                source,
            } => write!(f, "persistence failed: {source}"),
            Self::NotFound(id) => write!(f, "response not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ScoringFailed(err) => Some(err),
            Self::PersistFailed { source, .. } => Some(source),
            Self::Cancelled | Self::NotFound(_) => None,
        }
    }
}

impl From<ScoreError> for StoreError {
    fn from(value: ScoreError) -> Self {
        match value {
            ScoreError::Cancelled => Self::Cancelled,
            ScoreError::ScoringFailed(err) => Self::ScoringFailed(err),
        }
    }
}

/// Collection change broadcast to subscribers after memory is updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Loaded { count: usize },
    Added { id: ResponseId },
    Updated { id: ResponseId },
    Deleted { id: ResponseId },
}

/// Repository object owning the ordered response collection.
pub struct ResponseStore<S: ResponseStorage> {
    storage: Arc<S>,
    scorer: Scorer,
    config: StoreConfig,
    responses: RwLock<Vec<Response>>,
    write_gate: Mutex<()>,
    changes: broadcast::Sender<StoreChange>,
}

impl<S: ResponseStorage + 'static> ResponseStore<S> {
    /// Creates an empty store. Call [`ResponseStore::load_all`] to populate it.
    pub fn new(storage: S, scorer: Scorer, config: StoreConfig) -> Self {
        let (changes, _) = broadcast::channel(config.change_buffer.max(1));
        Self {
            storage: Arc::new(storage),
            scorer,
            config,
            responses: RwLock::new(Vec::new()),
            write_gate: Mutex::new(()),
            changes,
        }
    }

    /// Rebuilds memory from durable storage, newest first.
    ///
    /// Seeds the sample responses when storage is empty and seeding is
    /// enabled. Returns the resulting collection.
    pub async fn load_all(&self) -> StoreResult<Vec<Response>> {
        self.load_all_with(&CancelToken::new()).await
    }

    /// [`ResponseStore::load_all`] with a token that can stop seeding.
    ///
    /// Samples committed before cancellation stay committed.
    pub async fn load_all_with(&self, cancel: &CancelToken) -> StoreResult<Vec<Response>> {
        let _gate = self.write_gate.lock().await;
        let started_at = Instant::now();

        let fetched = self
            .with_storage(|storage| storage.fetch_all())
            .await
            .map_err(|err| {
                error!(
                    "event=store_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                StoreError::PersistFailed {
                    in_memory: None,
                    source: err,
                }
            })?;

        let loaded = dedupe_by_id(fetched);
        let count = loaded.len();
        *self.responses.write() = loaded;
        self.notify(StoreChange::Loaded { count });
        info!(
            "event=store_load module=store status=ok count={} duration_ms={}",
            count,
            started_at.elapsed().as_millis()
        );

        if count == 0 && self.config.seed_on_empty {
            self.seed_locked(cancel).await?;
        }

        Ok(self.snapshot())
    }

    /// Scores `text` and commits it as the newest response.
    ///
    /// # Errors
    /// - `Cancelled` / `ScoringFailed`: nothing was mutated.
    /// - `PersistFailed { in_memory: Some(_) }`: the record is in memory only.
    pub async fn add(&self, text: &str, cancel: &CancelToken) -> StoreResult<Response> {
        let _gate = self.write_gate.lock().await;
        self.add_locked(text, cancel).await
    }

    /// Re-scores `new_text` and replaces the record keeping its id.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    /// - `Cancelled` / `ScoringFailed`: nothing was mutated.
    /// - `PersistFailed { in_memory: None }`: storage rejected the update and
    ///   memory still holds the previous record.
    pub async fn edit(
        &self,
        id: ResponseId,
        new_text: &str,
        cancel: &CancelToken,
    ) -> StoreResult<Response> {
        let _gate = self.write_gate.lock().await;
        let current = self.get(id).ok_or(StoreError::NotFound(id))?;

        let result = self.scorer.score_async(new_text, cancel).await?;
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let updated = current.rescored(new_text, result);

        let persisted = updated.clone();
        if let Err(err) = self
            .with_storage(move |storage| storage.update(&persisted))
            .await
        {
            error!(
                "event=store_edit module=store status=error id={} error={}",
                id, err
            );
            return Err(StoreError::PersistFailed {
                in_memory: None,
                source: err,
            });
        }

        {
            let mut responses = self.responses.write();
            if let Some(slot) = responses.iter_mut().find(|response| response.id == id) {
                *slot = updated.clone();
            }
        }
        self.notify(StoreChange::Updated { id });
        info!(
            "event=store_edit module=store status=ok id={} chars={} sentiment={}",
            id,
            updated.text.chars().count(),
            updated.sentiment()
        );

        Ok(updated)
    }

    /// Removes a response from storage and memory. Absent ids are a no-op.
    ///
    /// # Errors
    /// - `PersistFailed { in_memory: None }` when storage fails; memory is
    ///   left untouched.
    pub async fn delete(&self, id: ResponseId) -> StoreResult<()> {
        let _gate = self.write_gate.lock().await;

        let removed_from_storage = self
            .with_storage(move |storage| storage.delete(id))
            .await
            .map_err(|err| {
                error!(
                    "event=store_delete module=store status=error id={} error={}",
                    id, err
                );
                StoreError::PersistFailed {
                    in_memory: None,
                    source: err,
                }
            })?;

        let removed_from_memory = {
            let mut responses = self.responses.write();
            let before = responses.len();
            responses.retain(|response| response.id != id);
            responses.len() != before
        };

        if removed_from_storage || removed_from_memory {
            self.notify(StoreChange::Deleted { id });
            info!("event=store_delete module=store status=ok id={}", id);
        } else {
            debug!("event=store_delete module=store status=noop id={}", id);
        }

        Ok(())
    }

    /// Copy of the current collection, newest first.
    pub fn snapshot(&self) -> Vec<Response> {
        self.responses.read().clone()
    }

    pub fn get(&self, id: ResponseId) -> Option<Response> {
        self.responses
            .read()
            .iter()
            .find(|response| response.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.responses.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.read().is_empty()
    }

    /// Responses matching `filter` (all when `None`), newest first.
    pub fn filtered(&self, filter: Option<Sentiment>) -> Vec<Response> {
        let responses = self.responses.read();
        filter_by_sentiment(&responses, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Aggregate view over the current collection.
    pub fn summary(&self) -> SurveySummary {
        summarize(&self.responses.read())
    }

    /// Subscribes to collection changes emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    async fn add_locked(&self, text: &str, cancel: &CancelToken) -> StoreResult<Response> {
        let result = self.scorer.score_async(text, cancel).await?;
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        let response = Response::new(text, result);
        let id = response.id;
        self.responses.write().insert(0, response.clone());
        self.notify(StoreChange::Added { id });

        let persisted = response.clone();
        if let Err(err) = self
            .with_storage(move |storage| storage.insert(&persisted))
            .await
        {
            error!(
                "event=store_add module=store status=error id={} diverged=true error={}",
                id, err
            );
            return Err(StoreError::PersistFailed {
                in_memory: Some(response),
                source: err,
            });
        }

        info!(
            "event=store_add module=store status=ok id={} chars={} sentiment={}",
            id,
            response.text.chars().count(),
            response.sentiment()
        );
        Ok(response)
    }

    /// Adds each sample in list order, one at a time.
    ///
    /// Samples that fail to score are skipped.
    async fn seed_locked(&self, cancel: &CancelToken) -> StoreResult<usize> {
        let started_at = Instant::now();
        let mut seeded = 0;

        for (index, text) in SAMPLE_RESPONSES.iter().enumerate() {
            match self.add_locked(text, cancel).await {
                Ok(_) => seeded += 1,
                Err(StoreError::ScoringFailed(err)) => {
                    warn!(
                        "event=store_seed module=store status=skipped sample_index={} error={}",
                        index, err
                    );
                }
                Err(StoreError::Cancelled) => {
                    debug!(
                        "event=store_seed module=store status=cancelled seeded={}",
                        seeded
                    );
                    return Err(StoreError::Cancelled);
                }
                Err(other) => return Err(other),
            }
        }

        info!(
            "event=store_seed module=store status=ok seeded={} duration_ms={}",
            seeded,
            started_at.elapsed().as_millis()
        );
        Ok(seeded)
    }

    /// Runs one storage call on the blocking pool.
    async fn with_storage<T, F>(&self, call: F) -> RepoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> RepoResult<T> + Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || call(storage.as_ref()))
            .await
            .map_err(|err| RepoError::Backend(format!("storage worker failed: {err}")))?
    }

    fn notify(&self, change: StoreChange) {
        // No receivers is fine; subscription is optional.
        let _ = self.changes.send(change);
    }
}

/// Keeps the first occurrence of every id, preserving order.
fn dedupe_by_id(responses: Vec<Response>) -> Vec<Response> {
    let mut seen = HashSet::with_capacity(responses.len());
    let total = responses.len();
    let unique: Vec<Response> = responses
        .into_iter()
        .filter(|response| seen.insert(response.id))
        .collect();
    if unique.len() != total {
        warn!(
            "event=store_load module=store status=deduped dropped={}",
            total - unique.len()
        );
    }
    unique
}
