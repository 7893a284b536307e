//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use bluedrop_core::BusinessId;

use crate::config::ServerConfig;
use crate::models::Customer;

/// How long a cached customer list stays valid without being refreshed.
const CUSTOMER_CACHE_TTL: Duration = Duration::from_secs(60);

/// Maximum number of businesses whose customer lists are cached at once.
const CUSTOMER_CACHE_CAPACITY: u64 = 1_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    http: reqwest::Client,
    customers: Cache<BusinessId, Arc<Vec<Customer>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let customers = Cache::builder()
            .max_capacity(CUSTOMER_CACHE_CAPACITY)
            .time_to_live(CUSTOMER_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                http: reqwest::Client::new(),
                customers,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the shared HTTP client used for QR provisioning.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    /// Get a reference to the per-business customer list cache.
    ///
    /// The cache is only ever written after the corresponding database
    /// write has succeeded, so a hit is at worst `CUSTOMER_CACHE_TTL` stale
    /// relative to writes from another instance, never wrong about this one.
    #[must_use]
    pub fn customer_cache(&self) -> &Cache<BusinessId, Arc<Vec<Customer>>> {
        &self.inner.customers
    }
}
