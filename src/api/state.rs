//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, EventBroadcaster, PhotoStorage, RateLimiter};
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Use cases
    pub services: Arc<dyn ServiceContainer>,
    /// Request counters backing the rate limit middleware
    pub limiter: Arc<dyn RateLimiter>,
    /// Database connection
    pub database: Arc<Database>,
    /// Change notifications for SSE clients
    pub events: EventBroadcaster,
    pub config: Config,
}

impl AppState {
    /// Wire every service against one database connection.
    ///
    /// This is the recommended way to create AppState; services and the SSE
    /// endpoint share the returned broadcaster.
    pub fn from_config(
        database: Arc<Database>,
        limiter: Arc<dyn RateLimiter>,
        config: Config,
    ) -> Self {
        let events = EventBroadcaster::default();
        let storage = PhotoStorage::new(config.uploads_dir.clone());
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            config.clone(),
            events.clone(),
            storage,
        ));

        Self::new(services, limiter, database, events, config)
    }

    /// Create application state with manually injected services.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        limiter: Arc<dyn RateLimiter>,
        database: Arc<Database>,
        events: EventBroadcaster,
        config: Config,
    ) -> Self {
        Self {
            services,
            limiter,
            database,
            events,
            config,
        }
    }
}
