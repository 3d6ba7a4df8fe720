//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::domain::ports::IdentityProvider;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity: Option<Arc<dyn IdentityProvider>>,
}

impl ServerConfig {
    /// Construct a server configuration for the given bind address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            identity: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, todo storage uses the Diesel adapter; otherwise an
    /// in-memory repository serves the process lifetime.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach an identity provider for authenticating requests.
    ///
    /// When absent the server authenticates against the built-in fixture
    /// users.
    #[must_use]
    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
