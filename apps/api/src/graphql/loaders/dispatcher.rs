//! Per-request batch scheduler
//!
//! A [`Dispatcher`] collects the keys requested by sibling resolvers during
//! one scheduler tick (a "wave") and hands them to its [`BatchLoader`] in a
//! single call. Outcomes are computed once per distinct key and cloned back
//! to every caller that asked for it. Nothing is cached between waves.
//!
//! A wave is closed by the first caller to resume after yielding to the
//! runtime. Resolvers that async-graphql polls together (list items, sibling
//! fields) have all enqueued by then, so they share one storage round trip.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_graphql::ErrorExtensions;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::GENERIC_ERROR_MESSAGE;

/// Outcome of loading a single key
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// No record exists for the key
    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    /// The bulk query for the wave failed
    #[error("storage error: {0}")]
    Storage(Arc<sqlx::Error>),

    /// The request was cancelled or timed out before the wave resolved
    #[error("request cancelled")]
    Cancelled,

    /// The loader broke its contract (wrong number of outcomes)
    #[error("loader error: {0}")]
    Internal(String),
}

impl LoadError {
    pub fn not_found(resource: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            resource,
            key: key.to_string(),
        }
    }

    /// Stable code exposed in GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Cancelled => "CANCELLED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for LoadError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(Arc::new(err))
    }
}

impl ErrorExtensions for LoadError {
    fn extend(&self) -> async_graphql::Error {
        let message = match self {
            Self::NotFound { .. } | Self::Cancelled => self.to_string(),
            Self::Storage(_) | Self::Internal(_) => GENERIC_ERROR_MESSAGE.to_string(),
        };
        async_graphql::Error::new(message).extend_with(|_, e| {
            e.set("code", self.code());
        })
    }
}

/// Fetches many keys of one access path in a single storage call
///
/// `load` receives distinct keys and must return exactly one outcome per key,
/// in the same order.
pub trait BatchLoader: Send + Sync + 'static {
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;
    type Value: Clone + Send + Sync + 'static;

    /// Loader name used in logs
    const NAME: &'static str;

    fn load(
        &self,
        keys: &[Self::Key],
    ) -> impl Future<Output = Vec<Result<Self::Value, LoadError>>> + Send;
}

type Outcome<L> = Result<<L as BatchLoader>::Value, LoadError>;
type Slot<L> = oneshot::Sender<Outcome<L>>;

struct Wave<L: BatchLoader> {
    id: u64,
    pending: Vec<(L::Key, Slot<L>)>,
}

/// Batching scheduler for one [`BatchLoader`]
pub struct Dispatcher<L: BatchLoader> {
    loader: L,
    wave: Mutex<Wave<L>>,
    cancel: CancellationToken,
    dispatches: AtomicU64,
}

impl<L: BatchLoader> Dispatcher<L> {
    pub fn new(loader: L, cancel: CancellationToken) -> Self {
        Self {
            loader,
            wave: Mutex::new(Wave {
                id: 0,
                pending: Vec::new(),
            }),
            cancel,
            dispatches: AtomicU64::new(0),
        }
    }

    /// Load one key, joining the current wave
    pub async fn load(&self, key: L::Key) -> Outcome<L> {
        let (rx, wave) = {
            let mut state = self.lock();
            let (tx, rx) = oneshot::channel();
            state.pending.push((key, tx));
            (rx, state.id)
        };

        self.close_wave(wave).await;
        rx.await.unwrap_or(Err(LoadError::Cancelled))
    }

    /// Load several keys into the same wave; outcome `i` belongs to key `i`
    pub async fn load_many(&self, keys: impl IntoIterator<Item = L::Key>) -> Vec<Outcome<L>> {
        let (receivers, wave) = {
            let mut state = self.lock();
            let receivers: Vec<_> = keys
                .into_iter()
                .map(|key| {
                    let (tx, rx) = oneshot::channel();
                    state.pending.push((key, tx));
                    rx
                })
                .collect();
            (receivers, state.id)
        };

        if receivers.is_empty() {
            return Vec::new();
        }

        self.close_wave(wave).await;

        let mut outcomes = Vec::with_capacity(receivers.len());
        for rx in receivers {
            outcomes.push(rx.await.unwrap_or(Err(LoadError::Cancelled)));
        }
        outcomes
    }

    /// Number of times the batch loader has been invoked
    pub fn dispatch_count(&self) -> u64 {
        self.dispatches.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Wave<L>> {
        self.wave.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Yield once, then dispatch the wave unless another caller already did
    async fn close_wave(&self, wave: u64) {
        tokio::task::yield_now().await;

        if let Some(pending) = self.take_wave(wave) {
            self.dispatch(pending).await;
        }
    }

    fn take_wave(&self, wave: u64) -> Option<Vec<(L::Key, Slot<L>)>> {
        let mut state = self.lock();
        if state.id != wave || state.pending.is_empty() {
            return None;
        }
        state.id += 1;
        Some(std::mem::take(&mut state.pending))
    }

    async fn dispatch(&self, pending: Vec<(L::Key, Slot<L>)>) {
        let mut seen = HashSet::with_capacity(pending.len());
        let keys: Vec<L::Key> = pending
            .iter()
            .filter(|(key, _)| seen.insert(key.clone()))
            .map(|(key, _)| key.clone())
            .collect();

        if self.cancel.is_cancelled() {
            tracing::warn!(loader = L::NAME, keys = keys.len(), "Request cancelled before dispatch");
            fail_all(pending, LoadError::Cancelled);
            return;
        }

        self.dispatches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            loader = L::NAME,
            keys = keys.len(),
            waiters = pending.len(),
            "Dispatching batch"
        );

        let outcomes = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::warn!(loader = L::NAME, keys = keys.len(), "Request cancelled during dispatch");
                fail_all(pending, LoadError::Cancelled);
                return;
            }
            outcomes = self.loader.load(&keys) => outcomes,
        };

        if outcomes.len() != keys.len() {
            tracing::error!(
                loader = L::NAME,
                keys = keys.len(),
                outcomes = outcomes.len(),
                "Batch loader returned the wrong number of outcomes"
            );
            let err = LoadError::Internal(format!(
                "{} returned {} outcomes for {} keys",
                L::NAME,
                outcomes.len(),
                keys.len()
            ));
            fail_all(pending, err);
            return;
        }

        let resolved: HashMap<L::Key, Outcome<L>> = keys.into_iter().zip(outcomes).collect();
        for (key, slot) in pending {
            let outcome = resolved.get(&key).cloned().unwrap_or_else(|| {
                Err(LoadError::Internal(format!("{} lost key {:?}", L::NAME, key)))
            });
            // The caller may have gone away; its result is simply dropped
            let _ = slot.send(outcome);
        }
    }
}

fn fail_all<V>(pending: Vec<(impl Sized, oneshot::Sender<Result<V, LoadError>>)>, err: LoadError) {
    for (_, slot) in pending {
        let _ = slot.send(Err(err.clone()));
    }
}
