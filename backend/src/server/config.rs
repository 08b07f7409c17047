//! HTTP server configuration object and helpers.

use actix_web::cookie::{Key, SameSite};
use backend::domain::AdmissionPolicy;
use backend::inbound::ws::state::OriginAllowList;
use backend::outbound::persistence::DbPool;
use backend::outbound::storage::DirectoryImageStore;
use std::net::SocketAddr;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) images: DirectoryImageStore,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) policy: AdmissionPolicy,
    pub(crate) origins: OriginAllowList,
    pub(crate) development_accounts: bool,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        images: DirectoryImageStore,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            images,
            db_pool: None,
            policy: AdmissionPolicy::default(),
            origins: OriginAllowList::default(),
            development_accounts: false,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool the catalog and ledger live in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Replace the admission and cancellation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Origins allowed to open the change socket.
    #[must_use]
    pub fn with_origins(mut self, origins: OriginAllowList) -> Self {
        self.origins = origins;
        self
    }

    /// Create the development admin and guest sign-ins at start-up.
    #[must_use]
    pub fn with_development_accounts(mut self, enabled: bool) -> Self {
        self.development_accounts = enabled;
        self
    }

    /// Address the server will bind.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
