//! Client-side query cache for problem collections.
//!
//! Collections are cached per `(entity kind, sort mode)`. Concurrent reads of
//! the same key share a single in-flight fetch. Every successful mutation goes
//! through this cache and drops every cached key of the `problems` kind, so
//! the next read goes back to the backend.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Problems,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: EntityKind,
    pub sort: SortMode,
}

impl QueryKey {
    pub fn problems(sort: SortMode) -> Self {
        QueryKey {
            kind: EntityKind::Problems,
            sort,
        }
    }
}

pub type Collection = Arc<Vec<Problem>>;

type SharedFetch = Shared<BoxFuture<'static, Result<Collection>>>;

enum Entry {
    Fresh(Collection),
    InFlight { fetch_id: u64, fetch: SharedFetch },
}

pub struct QueryCache<R> {
    repo: Arc<R>,
    entries: Mutex<HashMap<QueryKey, Entry>>,
    next_fetch_id: AtomicU64,
}

impl<R: ProblemRepository> QueryCache<R> {
    pub fn new(repo: R) -> Self {
        QueryCache {
            repo: Arc::new(repo),
            entries: Mutex::new(HashMap::new()),
            next_fetch_id: AtomicU64::new(0),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns the collection for `sort`, fetching it only when nothing fresh
    /// is cached. A read that arrives while a fetch for the same key is
    /// running waits for that fetch instead of starting another.
    pub async fn read(&self, sort: SortMode) -> Result<Collection> {
        let key = QueryKey::problems(sort);

        let (fetch_id, fetch) = {
            let mut entries = self.lock();
            match entries.get(&key) {
                Some(Entry::Fresh(collection)) => return Ok(Arc::clone(collection)),
                Some(Entry::InFlight { fetch_id, fetch }) => {
                    debug!(?key, fetch_id, "joining in-flight fetch");
                    (*fetch_id, fetch.clone())
                }
                None => {
                    let fetch_id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                    debug!(?key, fetch_id, "fetching");
                    let repo = Arc::clone(&self.repo);
                    let fetch = async move { repo.list_sorted_by(sort).await.map(Arc::new) }
                        .boxed()
                        .shared();
                    entries.insert(
                        key,
                        Entry::InFlight {
                            fetch_id,
                            fetch: fetch.clone(),
                        },
                    );
                    (fetch_id, fetch)
                }
            }
        };

        let result = fetch.await;

        // Only the fetch that still owns the slot may settle it. If the key was
        // invalidated meanwhile, the result goes back to the waiting readers
        // but is never cached as fresh.
        let mut entries = self.lock();
        let owns_slot = matches!(
            entries.get(&key),
            Some(Entry::InFlight { fetch_id: current, .. }) if *current == fetch_id
        );
        if owns_slot {
            match &result {
                Ok(collection) => {
                    entries.insert(key, Entry::Fresh(Arc::clone(collection)));
                }
                Err(e) => {
                    warn!(?key, error = %e, "fetch failed");
                    entries.remove(&key);
                }
            }
        }
        result
    }

    /// The cached collection for `sort`, if one is fresh. Never fetches.
    pub fn peek(&self, sort: SortMode) -> Option<Collection> {
        match self.lock().get(&QueryKey::problems(sort)) {
            Some(Entry::Fresh(collection)) => Some(Arc::clone(collection)),
            _ => None,
        }
    }

    /// Marks every key of `kind` stale, including ones still being fetched.
    pub fn invalidate(&self, kind: EntityKind) {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| key.kind != kind);
        debug!(?kind, dropped = before - entries.len(), "invalidated");
    }

    pub async fn create(&self, problem: &NewProblem) -> Result<Problem> {
        let created = self.repo.create(problem).await?;
        info!(id = created.id, "created problem");
        self.invalidate(EntityKind::Problems);
        Ok(created)
    }

    pub async fn update(&self, id: i64, fields: &ProblemUpdate) -> Result<Problem> {
        let updated = self.repo.update(id, fields).await?;
        info!(id, "updated problem");
        self.invalidate(EntityKind::Problems);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await?;
        info!(id, "deleted problem");
        self.invalidate(EntityKind::Problems);
        Ok(())
    }

    pub async fn touch_timestamp(&self, id: i64) -> Result<Problem> {
        let touched = self.repo.touch_timestamp(id).await?;
        info!(id, "touched problem");
        self.invalidate(EntityKind::Problems);
        Ok(touched)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}


use crate::api::ProblemRepository;
use crate::error::Result;
use crate::problems::{NewProblem, Problem, ProblemUpdate, SortMode};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
