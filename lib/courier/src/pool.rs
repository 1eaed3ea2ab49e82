//! Cache of pooled clients keyed by transport settings.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::{Config, PooledClient};

/// Cache of [`PooledClient`]s, one per configuration fingerprint.
///
/// Calls whose configurations share timeout, max idle connections, idle
/// timeout and TLS handshake timeout reuse the same client and so the same
/// connections. Entries are never evicted.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use courier::{ClientPool, Config};
///
/// let pool = ClientPool::new();
/// let a = pool.get_client(&Config::new());
/// let b = pool.get_client(&Config::new().acceptable_status([404]));
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Default)]
pub struct ClientPool {
    clients: RwLock<HashMap<String, Arc<PooledClient>>>,
}

impl ClientPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Client for `config`, built on first use.
    ///
    /// Concurrent first uses may each build a client; only the first one
    /// inserted is kept and returned to everyone.
    pub fn get_client(&self, config: &Config) -> Arc<PooledClient> {
        let settings = config.transport_settings();
        let fingerprint = settings.fingerprint();

        if let Some(client) = self.read().get(&fingerprint) {
            return Arc::clone(client);
        }

        debug!(%fingerprint, "creating pooled client");
        let client = Arc::new(PooledClient::new(settings));

        Arc::clone(self.write().entry(fingerprint).or_insert(client))
    }

    /// Returns `true` if a client for `config` is cached.
    #[must_use]
    pub fn contains(&self, config: &Config) -> bool {
        let fingerprint = config.transport_settings().fingerprint();
        self.read().contains_key(&fingerprint)
    }

    /// Number of cached clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if no client was built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<PooledClient>>> {
        self.clients.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<PooledClient>>> {
        self.clients.write().unwrap_or_else(PoisonError::into_inner)
    }
}
