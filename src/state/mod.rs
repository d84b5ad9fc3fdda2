//! Shared application state threaded through every route and service.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{
    clock::SharedClock, config::AppConfig, dao::pick_store::PickStore, error::ServiceError,
    provider::ProviderClient,
};

/// Cheaply clonable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state holding the storage handle, the injected clock
/// and provider client, and the runtime configuration.
pub struct AppState {
    config: AppConfig,
    clock: SharedClock,
    provider: Arc<dyn ProviderClient>,
    pick_store: RwLock<Option<Arc<dyn PickStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is
    /// installed.
    pub fn new(
        config: AppConfig,
        clock: SharedClock,
        provider: Arc<dyn ProviderClient>,
    ) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            clock,
            provider,
            pick_store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Injected time source.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Handle to the sports-data provider client.
    pub fn provider(&self) -> Arc<dyn ProviderClient> {
        self.provider.clone()
    }

    /// Obtain a handle to the current pick store, if one is installed.
    pub async fn pick_store(&self) -> Option<Arc<dyn PickStore>> {
        let guard = self.pick_store.read().await;
        guard.as_ref().cloned()
    }

    /// Pick store handle, or a degraded-mode error when none is installed.
    pub async fn require_pick_store(&self) -> Result<Arc<dyn PickStore>, ServiceError> {
        self.pick_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a storage backend and leave degraded mode.
    pub async fn set_pick_store(&self, store: Arc<dyn PickStore>) {
        {
            let mut guard = self.pick_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current storage backend and enter degraded mode.
    pub async fn clear_pick_store(&self) {
        {
            let mut guard = self.pick_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }
}
