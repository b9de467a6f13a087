//! Request-scoped state shared with handlers through the salvo depot.

use std::sync::Arc;

use salvo::{Depot, FlowCtrl, Handler, Request, Response, async_trait};

use rodeo_core::config::Settings;
use rodeo_core::error::CoreError;
use rodeo_db::db::EventStore;

use crate::error::AppResult;

/// Injects the loaded settings. Every request shares one allocation.
pub struct SettingsHandler {
    settings: Arc<Settings>,
}

impl SettingsHandler {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl Handler for SettingsHandler {
    async fn handle(
        &self,
        _req: &mut Request,
        depot: &mut Depot,
        _res: &mut Response,
        _ctrl: &mut FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.settings));
    }
}

/// Injects the event store used by submission handlers.
pub struct EventStoreHandler {
    store: Arc<dyn EventStore>,
}

impl EventStoreHandler {
    #[must_use]
    pub fn new(store: impl EventStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[async_trait]
impl Handler for EventStoreHandler {
    async fn handle(
        &self,
        _req: &mut Request,
        depot: &mut Depot,
        _res: &mut Response,
        _ctrl: &mut FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.store));
    }
}

/// ## Summary
/// Settings injected by [`SettingsHandler`].
///
/// ## Errors
/// Returns `CoreError::InvariantViolation` if no settings were injected.
pub fn settings_from_depot(depot: &Depot) -> AppResult<Arc<Settings>> {
    depot
        .obtain::<Arc<Settings>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Settings not found in depot").into())
}

/// ## Summary
/// Store injected by [`EventStoreHandler`].
///
/// ## Errors
/// Returns `CoreError::InvariantViolation` if no store was injected.
pub fn store_from_depot(depot: &Depot) -> AppResult<Arc<dyn EventStore>> {
    depot
        .obtain::<Arc<dyn EventStore>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Event store not found in depot").into())
}
