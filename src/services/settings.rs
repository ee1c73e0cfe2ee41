//! Settings holder: the single in-memory settings value with change observers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use anyhow::Result;
use chrono::Utc;

use crate::error::{EngineError, EngineResult};
use crate::models::Settings;

/// Durable storage for the settings value.
pub trait SettingsStore: Send + Sync {
    /// Reads the stored value. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<Settings>>;

    /// Writes the value durably.
    fn persist(&self, settings: &Settings) -> Result<()>;
}

/// Handle returned by [`SettingsHolder::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&Settings) + Send + Sync>;

/// Holds the current settings and notifies subscribers after each durable save.
pub struct SettingsHolder {
    store: Arc<dyn SettingsStore>,
    current: RwLock<Arc<Settings>>,
    persisted: RwLock<Option<Arc<Settings>>>,
    revision: AtomicU64,
    next_subscription: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Handler)>>,
    save_gate: Mutex<()>,
}

impl fmt::Debug for SettingsHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsHolder")
            .field("revision", &self.revision())
            .field("subscribers", &lock(&self.subscribers).len())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SettingsHolder {
    /// Loads the stored value, falling back to defaults.
    ///
    /// A missing value is normal on first run. A failing store is logged and
    /// also falls back, so [`SettingsHolder::get`] always has a value.
    pub fn load(store: Arc<dyn SettingsStore>) -> Self {
        let (current, persisted) = match store.load() {
            Ok(Some(settings)) => {
                tracing::debug!("Loaded stored settings");
                let settings = Arc::new(settings);
                (Arc::clone(&settings), Some(settings))
            }
            Ok(None) => {
                tracing::info!("No stored settings, using defaults");
                (Arc::new(Settings::default()), None)
            }
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {:#}", e);
                (Arc::new(Settings::default()), None)
            }
        };

        Self {
            store,
            current: RwLock::new(current),
            persisted: RwLock::new(persisted),
            revision: AtomicU64::new(0),
            next_subscription: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
            save_gate: Mutex::new(()),
        }
    }

    /// The current in-memory value.
    pub fn get(&self) -> Arc<Settings> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// The last value that was durably written, if any.
    pub fn last_persisted(&self) -> Option<Arc<Settings>> {
        self.persisted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of saves since load, successful or not.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Replaces the value wholesale, persists it, then notifies subscribers.
    ///
    /// The in-memory value is replaced even when persisting fails; the failure
    /// is returned as `PersistenceFailure` and subscribers are not notified.
    /// Saves are serialized, so subscribers see values in save order.
    pub fn save(&self, mut settings: Settings) -> EngineResult<Arc<Settings>> {
        let _gate = lock(&self.save_gate);

        settings.last_modified = Utc::now();
        let settings = Arc::new(settings);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&settings);
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(e) = self.store.persist(&settings) {
            tracing::warn!("Failed to persist settings revision {}: {:#}", revision, e);
            return Err(EngineError::PersistenceFailure(format!("{e:#}")));
        }
        *self.persisted.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Arc::clone(&settings));
        tracing::info!("Saved settings revision {}", revision);

        let handlers: Vec<Handler> = lock(&self.subscribers)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(&settings);
        }

        Ok(settings)
    }

    /// Saves the default value.
    pub fn reset(&self) -> EngineResult<Arc<Settings>> {
        self.save(Settings::default())
    }

    /// Registers a change observer. Observers run in registration order.
    ///
    /// Handlers run on the saving thread while later saves wait; a handler
    /// must not call `save`.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        lock(&self.subscribers).push((id, Arc::new(handler)));
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock(&self.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }
}
